use tiny_skia::{FillRule, Paint, Path, PathBuilder, Pixmap, Rect, StrokeDash, Transform};

use crate::error::{RenderError, Result};
use crate::font::LabelFont;
use crate::projection::Point;

/// Straight 8-bit RGBA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Rgba,
    pub width: f32,
    /// Alternating on/off lengths in pixels; empty for a solid line.
    pub dash: &'static [f32],
}

impl Stroke {
    pub const fn solid(color: Rgba, width: f32) -> Self {
        Self {
            color,
            width,
            dash: &[],
        }
    }

    pub const fn dashed(color: Rgba, width: f32, dash: &'static [f32]) -> Self {
        Self { color, width, dash }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub color: Rgba,
    /// Pixel size of the em box.
    pub size: f32,
}

/// Drawing surface in screen pixels, origin top-left, y down.
pub trait Canvas {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    fn fill_background(&mut self, color: Rgba);
    fn stroke_polyline(&mut self, points: &[Point], stroke: &Stroke);
    fn fill_polygon(&mut self, points: &[Point], color: Rgba);
    /// Draw `text` with its top-left corner at `anchor`.
    fn draw_text(&mut self, text: &str, anchor: Point, style: &TextStyle);
}

/// Anti-aliased [`Canvas`] backed by a `tiny_skia::Pixmap`.
pub struct PixmapCanvas<'f> {
    pixmap: Pixmap,
    font: Option<&'f LabelFont>,
}

impl<'f> PixmapCanvas<'f> {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap = Pixmap::new(width, height).ok_or(RenderError::EmptyCanvas { width, height })?;
        Ok(Self { pixmap, font: None })
    }

    /// Draw labels with `font` instead of marker squares.
    pub fn with_font(mut self, font: Option<&'f LabelFont>) -> Self {
        self.font = font;
        self
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }
}

pub(crate) fn paint(color: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

fn path(points: &[Point], close: bool) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    let mut builder = PathBuilder::new();
    builder.move_to(first.x as f32, first.y as f32);
    for point in rest {
        builder.line_to(point.x as f32, point.y as f32);
    }
    if close {
        builder.close();
    }
    builder.finish()
}

impl Canvas for PixmapCanvas<'_> {
    fn width(&self) -> u32 {
        self.pixmap.width()
    }

    fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn fill_background(&mut self, color: Rgba) {
        self.pixmap
            .fill(tiny_skia::Color::from_rgba8(color.r, color.g, color.b, color.a));
    }

    fn stroke_polyline(&mut self, points: &[Point], stroke: &Stroke) {
        if points.len() < 2 {
            return;
        }
        let Some(path) = path(points, false) else {
            return;
        };

        let mut style = tiny_skia::Stroke {
            width: stroke.width,
            ..Default::default()
        };
        if !stroke.dash.is_empty() {
            style.dash = StrokeDash::new(stroke.dash.to_vec(), 0.0);
        }

        self.pixmap.stroke_path(
            &path,
            &paint(stroke.color),
            &style,
            Transform::identity(),
            None,
        );
    }

    fn fill_polygon(&mut self, points: &[Point], color: Rgba) {
        if points.len() < 3 {
            return;
        }
        let Some(path) = path(points, true) else {
            return;
        };

        self.pixmap.fill_path(
            &path,
            &paint(color),
            FillRule::EvenOdd,
            Transform::identity(),
            None,
        );
    }

    fn draw_text(&mut self, text: &str, anchor: Point, style: &TextStyle) {
        let (x, y) = (anchor.x as f32, anchor.y as f32);
        match self.font {
            Some(font) => font.draw(&mut self.pixmap, text, x, y, style),
            None => {
                // No font: mark the spot.
                let side = (style.size / 3.0).max(2.0);
                if let Some(rect) = Rect::from_xywh(x - side / 2.0, y - side / 2.0, side, side) {
                    self.pixmap
                        .fill_rect(rect, &paint(style.color), Transform::identity(), None);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = Rgba::opaque(255, 0, 0);
    const WHITE: Rgba = Rgba::opaque(255, 255, 255);

    fn pixel(canvas: &PixmapCanvas<'_>, x: u32, y: u32) -> (u8, u8, u8) {
        let p = canvas.pixmap().pixel(x, y).unwrap();
        (p.red(), p.green(), p.blue())
    }

    #[test]
    fn zero_sized_canvas_is_an_error() {
        assert!(matches!(
            PixmapCanvas::new(0, 10),
            Err(RenderError::EmptyCanvas { width: 0, height: 10 })
        ));
    }

    #[test]
    fn fills_polygons() {
        let mut canvas = PixmapCanvas::new(20, 20).unwrap();
        canvas.fill_background(WHITE);
        canvas.fill_polygon(
            &[
                Point::new(2.0, 2.0),
                Point::new(18.0, 2.0),
                Point::new(18.0, 18.0),
                Point::new(2.0, 18.0),
            ],
            RED,
        );
        assert_eq!(pixel(&canvas, 10, 10), (255, 0, 0));
        assert_eq!(pixel(&canvas, 0, 0), (255, 255, 255));
    }

    #[test]
    fn strokes_dashed_lines() {
        let mut canvas = PixmapCanvas::new(40, 10).unwrap();
        canvas.fill_background(WHITE);
        canvas.stroke_polyline(
            &[Point::new(0.0, 5.0), Point::new(40.0, 5.0)],
            &Stroke::dashed(RED, 4.0, &[4.0, 4.0]),
        );
        // First dash covers x in [0, 4), the first gap [4, 8).
        assert_eq!(pixel(&canvas, 2, 5), (255, 0, 0));
        assert_eq!(pixel(&canvas, 6, 5), (255, 255, 255));
    }

    #[test]
    fn degenerate_geometry_is_ignored() {
        let mut canvas = PixmapCanvas::new(10, 10).unwrap();
        canvas.fill_background(WHITE);
        canvas.stroke_polyline(&[Point::new(1.0, 1.0)], &Stroke::solid(RED, 2.0));
        canvas.fill_polygon(&[Point::new(1.0, 1.0), Point::new(5.0, 5.0)], RED);
        assert!(canvas
            .pixmap()
            .pixels()
            .iter()
            .all(|p| p.red() == 255 && p.green() == 255));
    }

    #[test]
    fn text_without_font_draws_a_marker() {
        let mut canvas = PixmapCanvas::new(20, 20).unwrap();
        canvas.fill_background(WHITE);
        canvas.draw_text(
            "Springfield",
            Point::new(10.0, 10.0),
            &TextStyle {
                color: Rgba::opaque(0, 0, 0),
                size: 12.0,
            },
        );
        assert_eq!(pixel(&canvas, 10, 10), (0, 0, 0));
    }
}
