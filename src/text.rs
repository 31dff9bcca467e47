// The instruction message drawn over the scene.
// With a loaded TrueType font the text is shaped and rasterized by
// cosmic-text (bold, italic, underlined, outlined). Without one it falls
// back to the blocky 5x7 font from `draw`.

use std::path::Path;

use cosmic_text::{
    fontdb, Attrs, Buffer, Color as TextColor, Family, FontSystem, Metrics, Shaping, Style,
    SwashCache, Weight,
};
use log::{info, warn};

use crate::assets;
use crate::config::TextStyle;
use crate::draw::{self, draw_line, fill_rect};
use crate::error::Error;
use crate::types::{Color, FrameBuffer};

/// Scale of the bitmap fallback font (5x7 → 10x14 screen pixels).
const FALLBACK_SCALE: i32 = 2;

struct ShapedText {
    font_system: FontSystem,
    swash_cache: SwashCache,
    buffer: Buffer,
}

pub struct TextOverlay {
    style: TextStyle,
    shaped: Option<ShapedText>,
}

impl TextOverlay {
    /// Load the font at `font_path`; on any failure log a warning and keep
    /// the bitmap fallback.
    pub fn load(font_path: &Path, style: TextStyle, surface_width: f32, surface_height: f32) -> Self {
        let shaped = match ShapedText::new(font_path, &style, surface_width, surface_height) {
            Ok(shaped) => {
                info!("loaded font {}", font_path.display());
                Some(shaped)
            }
            Err(e) => {
                warn!("problem loading font, using built-in bitmap font: {e}");
                None
            }
        };
        Self { style, shaped }
    }

    /// Overlay that always uses the bitmap font.
    #[cfg(test)]
    pub fn fallback(style: TextStyle) -> Self {
        Self { style, shaped: None }
    }

    pub fn has_font(&self) -> bool {
        self.shaped.is_some()
    }

    pub fn draw(&mut self, fb: &mut FrameBuffer) {
        let x = self.style.position.x as i32;
        let y = self.style.position.y as i32;
        match self.shaped.as_mut() {
            Some(shaped) => shaped.draw(fb, x, y, &self.style),
            None => draw::draw_text_5x7(
                fb,
                x,
                y,
                &self.style.message,
                FALLBACK_SCALE,
                self.style.fill_color,
                self.style.outline_color,
                self.style.outline_thickness,
            ),
        }
    }
}

impl ShapedText {
    fn new(font_path: &Path, style: &TextStyle, width: f32, height: f32) -> Result<Self, Error> {
        let bytes = assets::load_font_bytes(font_path)?;

        // Only the font we were given: no system font scan.
        let mut font_system = FontSystem::new_with_locale_and_db("en-US".to_string(), fontdb::Database::new());
        font_system.db_mut().load_font_data(bytes);
        let family = font_system
            .db()
            .faces()
            .find_map(|face| face.families.first().map(|(name, _)| name.clone()))
            .ok_or_else(|| Error::FontFace { path: font_path.to_path_buf() })?;

        let size = style.character_size;
        let mut buffer = Buffer::new(&mut font_system, Metrics::new(size, size * 1.2));
        buffer.set_size(&mut font_system, Some(width), Some(height));
        let attrs = Attrs::new()
            .family(Family::Name(&family))
            .weight(Weight::BOLD)
            .style(Style::Italic);
        buffer.set_text(&mut font_system, &style.message, attrs, Shaping::Advanced);
        buffer.shape_until_scroll(&mut font_system, false);

        Ok(Self { font_system, swash_cache: SwashCache::new(), buffer })
    }

    fn draw(&mut self, fb: &mut FrameBuffer, x: i32, y: i32, style: &TextStyle) {
        let t = style.outline_thickness;
        for oy in -t..=t {
            for ox in -t..=t {
                if ox != 0 || oy != 0 {
                    self.draw_pass(fb, x + ox, y + oy, style.outline_color);
                }
            }
        }
        self.draw_pass(fb, x, y, style.fill_color);

        // Underline every laid-out line, just below its baseline.
        let lines: Vec<(f32, f32)> = self.buffer.layout_runs().map(|run| (run.line_y, run.line_w)).collect();
        for (line_y, line_w) in lines {
            let uy = y + line_y as i32 + 2;
            let x1 = x + line_w as i32;
            for oy in -t..=t {
                draw_line(fb, x - t, uy + oy, x1 + t, uy + oy, style.outline_color);
            }
            draw_line(fb, x, uy, x1, uy, style.fill_color);
        }
    }

    fn draw_pass(&mut self, fb: &mut FrameBuffer, x: i32, y: i32, color: Color) {
        let base = TextColor::rgba(color.r, color.g, color.b, color.a);
        self.buffer
            .draw(&mut self.font_system, &mut self.swash_cache, base, |gx, gy, w, h, c| {
                fill_rect(fb, x + gx, y + gy, w, h, Color::rgba(c.r(), c.g(), c.b(), c.a()));
            });
    }
}
