// Fixed settings for the spotlight demo. Built once in main and handed to
// the game; nothing here is read from disk or the environment.

use std::path::PathBuf;

use minifb::Key;

use crate::types::{Color, Vec2};

#[derive(Debug, Clone)]
pub struct Config {
    pub window_title: String,
    pub window_width: usize,
    pub window_height: usize,
    /// Logic updates per second.
    pub tick_rate: u32,
    /// Radius of the spotlight disk in pixels.
    pub spotlight_radius: f32,
    /// Tint applied to the background while the lights are off.
    pub dim_color: Color,
    pub exit_key: Key,
    pub toggle_lights_key: Key,
    pub font_path: PathBuf,
    pub image_path: PathBuf,
    pub text: TextStyle,
}

/// How the instruction message looks on screen.
#[derive(Debug, Clone)]
pub struct TextStyle {
    pub message: String,
    pub position: Vec2,
    pub character_size: f32,
    pub fill_color: Color,
    pub outline_color: Color,
    pub outline_thickness: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_title: "Spotlight".to_string(),
            window_width: 900,
            window_height: 500,
            tick_rate: 60,
            spotlight_radius: 75.0,
            dim_color: Color::rgb(55, 55, 55),
            exit_key: Key::Escape,
            toggle_lights_key: Key::L,
            font_path: PathBuf::from("ASSETS/FONTS/ariblk.ttf"),
            image_path: PathBuf::from("ASSETS/IMAGES/cave.png"),
            text: TextStyle::default(),
        }
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            message: "<L> to toggle light \nmouse drag to move spotlight".to_string(),
            position: Vec2::new(40.0, 40.0),
            character_size: 20.0,
            fill_color: Color::WHITE,
            outline_color: Color::RED,
            outline_thickness: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_demo() {
        let c = Config::default();
        assert_eq!((c.window_width, c.window_height), (900, 500));
        assert_eq!(c.tick_rate, 60);
        assert_eq!(c.spotlight_radius, 75.0);
        assert_eq!(c.dim_color, Color::rgb(55, 55, 55));
        assert_eq!(c.exit_key, Key::Escape);
        assert_eq!(c.toggle_lights_key, Key::L);
        assert_eq!(c.text.position, Vec2::new(40.0, 40.0));
    }
}
