use log::debug;
use tiny_skia::Pixmap;

use crate::canvas::{Canvas, PixmapCanvas, Rgba};
use crate::error::Result;
use crate::font::LabelFont;
use crate::projection::Point;
use crate::scene::Scene;
use crate::shape::PlanarBounds;
use crate::style::{self, draw_shape};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub background: Rgba,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            background: style::WHITE,
        }
    }
}

/// Uniform scale from projected space to a canvas, with y flipped so north
/// is up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub min_x: f64,
    pub min_y: f64,
    pub scale: f64,
    pub height: f64,
}

impl Viewport {
    /// Fit `bounds` into a `width` x `height` canvas, keeping the aspect
    /// ratio. An axis with zero extent does not constrain the scale; if
    /// neither axis does, the scale is 1.
    pub fn fit(bounds: &PlanarBounds, width: u32, height: u32) -> Self {
        if bounds.is_empty() {
            return Self {
                min_x: 0.0,
                min_y: 0.0,
                scale: 1.0,
                height: height as f64,
            };
        }

        let sx = width as f64 / bounds.width();
        let sy = height as f64 / bounds.height();
        let scale = match (sx.is_finite(), sy.is_finite()) {
            (true, true) => sx.min(sy),
            (true, false) => sx,
            (false, true) => sy,
            (false, false) => 1.0,
        };

        Self {
            min_x: bounds.min_x,
            min_y: bounds.min_y,
            scale,
            height: height as f64,
        }
    }

    #[inline]
    pub fn apply(&self, point: Point) -> Point {
        Point::new(
            (point.x - self.min_x) * self.scale,
            self.height - (point.y - self.min_y) * self.scale,
        )
    }
}

/// Clear `canvas` and draw every queued shape, lowest z-index first.
pub fn composite<C: Canvas + ?Sized>(scene: Scene, canvas: &mut C, background: Rgba) {
    let viewport = Viewport::fit(&scene.bounds(), canvas.width(), canvas.height());
    debug!(
        "compositing {} shapes at scale {:.6} onto {}x{}",
        scene.len(),
        viewport.scale,
        canvas.width(),
        canvas.height()
    );

    canvas.fill_background(background);

    let mut points = Vec::new();
    for shape in scene {
        points.clear();
        points.extend(shape.points.iter().map(|&p| viewport.apply(p)));
        draw_shape(canvas, &shape, &points);
    }
}

/// Rasterize `scene` into a new pixmap.
pub fn render(scene: Scene, options: &RenderOptions, font: Option<&LabelFont>) -> Result<Pixmap> {
    let mut canvas = PixmapCanvas::new(options.width, options.height)?.with_font(font);
    composite(scene, &mut canvas, options.background);
    Ok(canvas.into_pixmap())
}
