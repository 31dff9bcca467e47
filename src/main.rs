// What you SEE:
// • A 900x500 window showing the cave background image.
// • L toggles the lights: the background dims to a dark gray and back.
// • Hold Left Mouse: a bright spotlight of the undimmed image follows the pointer.
// • ESC (or closing the window) quits.

mod assets;
mod config;
mod draw;
mod error;
mod game;
mod input;
mod spotlight;
mod surface;
mod text;
mod timing;
mod types;

use config::Config;
use draw::Drawer;
use error::Error;
use game::Game;
use log::info;
use text::TextOverlay;
use timing::SystemClock;

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::default();
    info!(
        "starting spotlight: {}x{}, image {:?}, font {:?}",
        config.window_width, config.window_height, config.image_path, config.font_path
    );

    /* --- Window ---
       Visual: an empty fixed-size window appears. */
    let drawer = Drawer::new(&config.window_title, config.window_width, config.window_height)?;

    /* --- Assets (best effort) ---
       Visual: a missing image leaves the window black; a missing font
       shows the instructions in the blocky built-in font. */
    let background = assets::load_image_or_empty(&config.image_path);
    let text = TextOverlay::load(
        &config.font_path,
        config.text.clone(),
        config.window_width as f32,
        config.window_height as f32,
    );
    if !text.has_font() {
        info!("instructions use the built-in bitmap font");
    }

    let mut game = Game::new(config, drawer, SystemClock::new(), background, text);
    game.run()?;

    info!("bye");
    Ok(())
}
