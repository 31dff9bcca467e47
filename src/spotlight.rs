// The circular cut-out that shows the undimmed background around the pointer.
//
// Geometry follows a sprite with its origin at (2R, 2R): `position` is the
// pointer plus R, so the disk's bounding square starts at pointer - R and the
// disk is centered on the pointer. The mask rectangle selects the same region
// of the background texture, so the cut-out lines up with the image below it.

use image::RgbaImage;

use crate::draw::draw_textured_disk;
use crate::types::{Color, FrameBuffer, IntRect, Vec2};

#[derive(Debug, Clone)]
pub struct Spotlight {
    radius: f32,
    position: Vec2,
    origin: Vec2,
    mask: IntRect,
}

impl Spotlight {
    pub fn new(radius: f32) -> Self {
        let diameter = (radius * 2.0) as i32;
        Self {
            radius,
            position: Vec2::ZERO,
            origin: Vec2::new(2.0 * radius, 2.0 * radius),
            mask: IntRect { left: 0, top: 0, width: diameter, height: diameter },
        }
    }

    /// Recenter the cut-out on the pointer at (x,y).
    pub fn track(&mut self, x: i32, y: i32) {
        let r = self.radius as i32;
        self.mask.left = x - r;
        self.mask.top = y - r;
        self.position = Vec2::new(x as f32 + self.radius, y as f32 + self.radius);
    }

    #[cfg(test)]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[cfg(test)]
    pub fn mask(&self) -> IntRect {
        self.mask
    }

    /// Top-left of the disk's bounding square on screen.
    pub fn top_left(&self) -> (i32, i32) {
        (
            (self.position.x - self.origin.x).round() as i32,
            (self.position.y - self.origin.y).round() as i32,
        )
    }

    /// Visual: a bright disk of the background appears around the pointer.
    pub fn draw(&self, fb: &mut FrameBuffer, texture: &RgbaImage) {
        let (x, y) = self.top_left();
        let diameter = (self.radius * 2.0) as u32;
        draw_textured_disk(fb, texture, self.mask, x, y, diameter, Color::WHITE);
    }
}
