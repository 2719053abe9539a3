use std::path::Path;

use log::{debug, trace};
use skrifa::instance::{LocationRef, Size};
use skrifa::outline::{DrawSettings, OutlinePen};
use skrifa::{FontRef, MetadataProvider};
use tiny_skia::{FillRule, PathBuilder, Pixmap, Transform};

use crate::canvas::{paint, TextStyle};
use crate::error::{RenderError, Result};

/// A TrueType/OpenType font used for place labels.
///
/// Glyphs are laid out left to right by their advance widths. There is no
/// shaping, kerning or fallback; characters the font lacks are skipped.
pub struct LabelFont {
    data: Vec<u8>,
}

impl LabelFont {
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        FontRef::new(&data).map_err(|e| RenderError::Font(e.to_string()))?;
        Ok(Self { data })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let font = Self::from_bytes(std::fs::read(path)?)?;
        debug!("loaded label font {}", path.display());
        Ok(font)
    }

    /// Fill `text` into `pixmap` with the top of the line at (`x`, `y`).
    pub(crate) fn draw(&self, pixmap: &mut Pixmap, text: &str, x: f32, y: f32, style: &TextStyle) {
        let Ok(font) = FontRef::new(&self.data) else {
            return;
        };

        let size = Size::new(style.size);
        let location = LocationRef::default();
        let charmap = font.charmap();
        let outlines = font.outline_glyphs();
        let advances = font.glyph_metrics(size, location);
        let ascent = font.metrics(size, location).ascent;

        let mut pen = GlyphPen {
            x,
            baseline: y + ascent,
            path: PathBuilder::new(),
        };

        for ch in text.chars() {
            let Some(glyph_id) = charmap.map(ch) else {
                continue;
            };
            if let Some(glyph) = outlines.get(glyph_id) {
                // A glyph that fails to draw leaves a gap.
                if let Err(err) = glyph.draw(DrawSettings::unhinted(size, location), &mut pen) {
                    trace!("glyph {:?} for {:?} not drawn: {}", glyph_id, ch, err);
                }
            } else {
                trace!("no outline for glyph {:?} ({:?})", glyph_id, ch);
            }
            pen.x += advances.advance_width(glyph_id).unwrap_or(0.0);
        }

        if let Some(path) = pen.path.finish() {
            pixmap.fill_path(
                &path,
                &paint(style.color),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }
}

/// Collects glyph outlines into one path. Font units are y-up, so y is
/// flipped around the baseline.
struct GlyphPen {
    x: f32,
    baseline: f32,
    path: PathBuilder,
}

impl OutlinePen for GlyphPen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.path.move_to(self.x + x, self.baseline - y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.path.line_to(self.x + x, self.baseline - y);
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        self.path
            .quad_to(self.x + cx0, self.baseline - cy0, self.x + x, self.baseline - y);
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        self.path.cubic_to(
            self.x + cx0,
            self.baseline - cy0,
            self.x + cx1,
            self.baseline - cy1,
            self.x + x,
            self.baseline - y,
        );
    }

    fn close(&mut self) {
        self.path.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_font_bytes() {
        assert!(matches!(
            LabelFont::from_bytes(b"not a font".to_vec()),
            Err(RenderError::Font(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = LabelFont::load("/nonexistent/label-font.ttf").err().unwrap();
        assert!(matches!(err, RenderError::Io(_)));
    }
}
