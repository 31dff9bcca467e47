// Window + software drawing utilities.
// Visual effects provided here:
// 1) A fixed-size window that shows the composed frame.
// 2) Image blits: the whole background with a tint, and a disk-shaped cut-out.
// 3) A tiny 5x7 bitmap font, used when the real font could not be loaded.

use std::collections::VecDeque;

use image::RgbaImage;
use log::debug;
use minifb::{KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use crate::error::Error;
use crate::input::{Event, InputTracker, WindowSnapshot};
use crate::surface::Surface;
use crate::types::{Color, FrameBuffer, IntRect};

/// The on-screen window. minifb only exposes polled state, so each poll takes
/// a snapshot of it and `InputTracker` turns the changes into discrete events,
/// each delivered exactly once by `poll_event`.
pub struct Drawer {
    window: Window,
    pending: VecDeque<Event>,
    tracker: InputTracker,
    fresh: bool,  // a window update happened since keys were last read
    closed: bool, // closed by the game (Escape or after a close request)
}

impl Drawer {
    /// Create a non-resizable window of the given size.
    /// Visual: a new empty window appears with your chosen title.
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let mut window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        // Render as often as the loop asks; logic is paced by the game itself.
        window.set_target_fps(0);
        Ok(Self {
            window,
            pending: VecDeque::new(),
            tracker: InputTracker::new(),
            fresh: true,
            closed: false,
        })
    }

    /// Read the window state. Key presses are only read once per window
    /// update; everything else is level state and safe to read on every poll.
    fn snapshot(&mut self) -> WindowSnapshot {
        let keys_pressed = if std::mem::replace(&mut self.fresh, false) {
            self.window.get_keys_pressed(KeyRepeat::No)
        } else {
            Vec::new()
        };
        WindowSnapshot {
            open: self.window.is_open(),
            keys_pressed,
            mouse: self
                .window
                .get_mouse_pos(MouseMode::Discard)
                .map(|(x, y)| (x as i32, y as i32)),
            buttons_down: [
                self.window.get_mouse_down(MouseButton::Left),
                self.window.get_mouse_down(MouseButton::Right),
                self.window.get_mouse_down(MouseButton::Middle),
            ],
        }
    }
}

impl Surface for Drawer {
    /// Stays true after the user closes the window until the game reacts to
    /// the `Closed` event and calls `close`.
    fn is_open(&self) -> bool {
        !self.closed
    }

    fn close(&mut self) {
        debug!("closing window");
        self.closed = true;
    }

    fn poll_event(&mut self) -> Option<Event> {
        if self.pending.is_empty() {
            let snap = self.snapshot();
            self.tracker.diff(&snap, &mut self.pending);
        }
        self.pending.pop_front()
    }

    fn primary_button_held(&self) -> bool {
        self.window.get_mouse_down(MouseButton::Left)
    }

    /// Push the pixels for this frame to the screen.
    /// Visual: the window immediately displays the new image.
    fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        if self.closed || !self.window.is_open() {
            return Ok(());
        }
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        self.fresh = true;
        Ok(())
    }
}

/* ---------- Software drawing: pixels, blending, image blits ---------- */

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
/// Visual: the exact pixel at (x,y) changes color.
#[inline]
fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

/// Alpha-blend `color` over the pixel at (x,y).
#[inline]
pub fn blend_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: Color) {
    match color.a {
        0 => {}
        255 => put_pixel(fb, x, y, color.to_u32()),
        a => {
            let Some(old) = (x >= 0 && y >= 0)
                .then(|| fb.get(x as usize, y as usize))
                .flatten()
            else {
                return;
            };
            let a = a as u32;
            let mix = |src: u8, dst: u32| (src as u32 * a + dst * (255 - a)) / 255;
            let r = mix(color.r, (old >> 16) & 0xFF);
            let g = mix(color.g, (old >> 8) & 0xFF);
            let b = mix(color.b, old & 0xFF);
            put_pixel(fb, x, y, (r << 16) | (g << 8) | b);
        }
    }
}

/// Fill a w×h rectangle with blending.
pub fn fill_rect(fb: &mut FrameBuffer, x: i32, y: i32, w: u32, h: u32, color: Color) {
    for yy in y..y + h as i32 {
        for xx in x..x + w as i32 {
            blend_pixel(fb, xx, yy, color);
        }
    }
}

/// Visual: the whole frame turns one flat color.
pub fn clear(fb: &mut FrameBuffer, color: Color) {
    let packed = color.to_u32();
    for p in &mut fb.pixels {
        *p = packed;
    }
}

/// Draw a thin line between (x0,y0) and (x1,y1) using Bresenham.
/// Visual: a straight 1-pixel line appears on top of the image.
pub fn draw_line(fb: &mut FrameBuffer, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
    let (mut x0, mut y0, x1, y1) = (x0, y0, x1, y1);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        blend_pixel(fb, x0, y0, color);
        if x0 == x1 && y0 == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; x0 += sx; }
        if e2 <= dx { err += dx; y0 += sy; }
    }
}

#[inline]
fn texel(img: &RgbaImage, x: i32, y: i32) -> Option<Color> {
    if x < 0 || y < 0 || x as u32 >= img.width() || y as u32 >= img.height() {
        return None;
    }
    let p = img.get_pixel(x as u32, y as u32);
    Some(Color::rgba(p[0], p[1], p[2], p[3]))
}

/// Draw the whole image with its top-left at (x,y), every texel modulated by `tint`.
/// Visual: white keeps the picture as-is, a gray tint darkens it.
pub fn draw_image_tinted(fb: &mut FrameBuffer, img: &RgbaImage, x: i32, y: i32, tint: Color) {
    for (ix, iy, p) in img.enumerate_pixels() {
        let c = Color::rgba(p[0], p[1], p[2], p[3]).modulate(tint);
        blend_pixel(fb, x + ix as i32, y + iy as i32, c);
    }
}

/// Draw the `src` region of the image stretched over a disk whose bounding
/// square has its top-left at (x,y) and side `diameter`.
/// Texels outside the image leave the frame untouched.
pub fn draw_textured_disk(
    fb: &mut FrameBuffer,
    img: &RgbaImage,
    src: IntRect,
    x: i32,
    y: i32,
    diameter: u32,
    tint: Color,
) {
    if diameter == 0 {
        return;
    }
    let r = diameter as f32 / 2.0;
    for j in 0..diameter {
        for i in 0..diameter {
            let dx = i as f32 + 0.5 - r;
            let dy = j as f32 + 0.5 - r;
            if dx * dx + dy * dy > r * r {
                continue;
            }
            let sx = src.left + (i as i64 * src.width as i64 / diameter as i64) as i32;
            let sy = src.top + (j as i64 * src.height as i64 / diameter as i64) as i32;
            if let Some(c) = texel(img, sx, sy) {
                blend_pixel(fb, x + i as i32, y + j as i32, c.modulate(tint));
            }
        }
    }
}

/* ---------- 5x7 bitmap font (fallback when no TrueType font is loaded) ---------- */

/// Return a 5x7 glyph bitmap for a limited character set.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    // Helper macro to define a glyph quickly
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        // Digits 0..9
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        // Letters A..Z
        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'B' => g!(0b11110,0b10001,0b10001,0b11110,0b10001,0b10001,0b11110),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'D' => g!(0b11100,0b10010,0b10001,0b10001,0b10001,0b10010,0b11100),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'H' => g!(0b10001,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'I' => g!(0b01110,0b00100,0b00100,0b00100,0b00100,0b00100,0b01110),
        'J' => g!(0b00111,0b00010,0b00010,0b00010,0b00010,0b10010,0b01100),
        'K' => g!(0b10001,0b10010,0b10100,0b11000,0b10100,0b10010,0b10001),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'M' => g!(0b10001,0b11011,0b10101,0b10101,0b10001,0b10001,0b10001),
        'N' => g!(0b10001,0b10001,0b11001,0b10101,0b10011,0b10001,0b10001),
        'O' => g!(0b01110,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'Q' => g!(0b01110,0b10001,0b10001,0b10001,0b10101,0b10010,0b01101),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'U' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b10001,0b01110),
        'V' => g!(0b10001,0b10001,0b10001,0b10001,0b10001,0b01010,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'X' => g!(0b10001,0b10001,0b01010,0b00100,0b01010,0b10001,0b10001),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),
        'Z' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b10000,0b11111),

        // Punctuation
        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),
        '-' => g!(0b00000,0b00000,0b00000,0b11111,0b00000,0b00000,0b00000),
        '<' => g!(0b00010,0b00100,0b01000,0b10000,0b01000,0b00100,0b00010),
        '>' => g!(0b01000,0b00100,0b00010,0b00001,0b00010,0b00100,0b01000),

        _ => None,
    }
}

/// Width of one glyph cell (5 pixels + 1 spacing) at scale 1.
pub const GLYPH_ADVANCE: i32 = 6;
/// Height of one text line (7 pixels + 2 spacing) at scale 1.
pub const GLYPH_LINE_HEIGHT: i32 = 9;

fn draw_glyph_pass(fb: &mut FrameBuffer, x: i32, y: i32, rows: &[u8; 7], scale: i32, color: Color) {
    for (ry, rowbits) in rows.iter().enumerate() {
        for rx in 0..5 {
            if (rowbits & (1 << (4 - rx))) != 0 {
                fill_rect(
                    fb,
                    x + rx * scale,
                    y + ry as i32 * scale,
                    scale as u32,
                    scale as u32,
                    color,
                );
            }
        }
    }
}

/// Draw a single 5x7 character at (x,y), `scale` screen pixels per font pixel.
/// Visual: a blocky glyph, ringed by `outline` pixels when `thickness > 0`.
fn draw_char_5x7(
    fb: &mut FrameBuffer,
    x: i32,
    y: i32,
    ch: char,
    scale: i32,
    color: Color,
    outline: Color,
    thickness: i32,
) {
    if let Some(rows) = glyph5x7(ch) {
        // Outline pass: the glyph stamped around its own position
        for oy in -thickness..=thickness {
            for ox in -thickness..=thickness {
                if ox != 0 || oy != 0 {
                    draw_glyph_pass(fb, x + ox, y + oy, &rows, scale, outline);
                }
            }
        }

        // Foreground pass: actual glyph in chosen color
        draw_glyph_pass(fb, x, y, &rows, scale, color);
    }
}

/// Draw a (possibly multi-line) string using 5x7 glyphs.
/// Visual: compact blocky text; each glyph is 5x7 with 1-pixel spacing.
pub fn draw_text_5x7(
    fb: &mut FrameBuffer,
    x: i32,
    y: i32,
    text: &str,
    scale: i32,
    color: Color,
    outline: Color,
    thickness: i32,
) {
    for (line_no, line) in text.lines().enumerate() {
        let ly = y + line_no as i32 * GLYPH_LINE_HEIGHT * scale;
        let mut lx = x;
        for ch in line.chars() {
            draw_char_5x7(fb, lx, ly, ch, scale, color, outline, thickness);
            lx += GLYPH_ADVANCE * scale;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const GRAY: u32 = 0x00_C8_C8_C8;

    fn gray_image(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([200, 200, 200, 255]))
    }

    #[test]
    fn tinted_blit_modulates_every_pixel() {
        let mut fb = FrameBuffer::new(8, 8);
        draw_image_tinted(&mut fb, &gray_image(8, 8), 0, 0, Color::rgb(55, 55, 55));
        // 200 * 55 / 255 = 43
        assert!(fb.pixels.iter().all(|&p| p == 0x00_2B_2B_2B));
    }

    #[test]
    fn tinted_blit_clips_to_frame() {
        let mut fb = FrameBuffer::new(4, 4);
        draw_image_tinted(&mut fb, &gray_image(8, 8), -2, 2, Color::WHITE);
        assert_eq!(fb.get(0, 1), Some(0));
        assert_eq!(fb.get(0, 2), Some(GRAY));
        assert_eq!(fb.get(3, 3), Some(GRAY));
    }

    #[test]
    fn empty_image_draws_nothing() {
        let mut fb = FrameBuffer::new(4, 4);
        draw_image_tinted(&mut fb, &RgbaImage::new(0, 0), 0, 0, Color::WHITE);
        assert!(fb.pixels.iter().all(|&p| p == 0));
    }

    #[test]
    fn disk_covers_center_but_not_corners() {
        let mut fb = FrameBuffer::new(20, 20);
        let src = IntRect { left: 0, top: 0, width: 10, height: 10 };
        draw_textured_disk(&mut fb, &gray_image(20, 20), src, 5, 5, 10, Color::WHITE);
        assert_eq!(fb.get(10, 10), Some(GRAY));
        assert_eq!(fb.get(5, 5), Some(0));
        assert_eq!(fb.get(14, 14), Some(0));
        assert_eq!(fb.get(4, 10), Some(0));
    }

    #[test]
    fn disk_samples_from_source_rect() {
        let mut img = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
        img.put_pixel(7, 7, Rgba([255, 0, 0, 255]));
        let mut fb = FrameBuffer::new(10, 10);
        // Source rect starting at (6,6) mapped 1:1 onto a disk at (0,0).
        let src = IntRect { left: 6, top: 6, width: 2, height: 2 };
        draw_textured_disk(&mut fb, &img, src, 0, 0, 2, Color::WHITE);
        assert_eq!(fb.get(1, 1), Some(0x00_FF_00_00));
    }

    #[test]
    fn half_alpha_blends_with_frame() {
        let mut fb = FrameBuffer::new(1, 1);
        clear(&mut fb, Color::WHITE);
        blend_pixel(&mut fb, 0, 0, Color::rgba(0, 0, 0, 128));
        // 255 * 127 / 255 = 127
        assert_eq!(fb.get(0, 0), Some(0x00_7F_7F_7F));
    }

    #[test]
    fn horizontal_line_is_continuous() {
        let mut fb = FrameBuffer::new(10, 3);
        draw_line(&mut fb, 1, 1, 8, 1, Color::WHITE);
        for x in 1..=8 {
            assert_eq!(fb.get(x, 1), Some(0x00_FF_FF_FF));
        }
        assert_eq!(fb.get(0, 1), Some(0));
        assert_eq!(fb.get(9, 1), Some(0));
    }

    #[test]
    fn bitmap_text_outlines_glyphs() {
        let mut fb = FrameBuffer::new(20, 20);
        draw_text_5x7(&mut fb, 2, 2, "l", 1, Color::WHITE, Color::RED, 1);
        // Left column of 'L' is lit; the pixel left of it is outline.
        assert_eq!(fb.get(2, 2), Some(0x00_FF_FF_FF));
        assert_eq!(fb.get(1, 2), Some(0x00_FF_00_00));
        // Far from the glyph nothing is drawn.
        assert_eq!(fb.get(15, 15), Some(0));
    }

    #[test]
    fn bitmap_font_covers_instruction_text() {
        let msg = "<L> to toggle light \nmouse drag to move spotlight";
        assert!(msg.chars().filter(|c| *c != '\n').all(|c| glyph5x7(c).is_some()));
    }
}
