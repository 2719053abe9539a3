//! Turns features queried from a MAPT file into a raster map.
//!
//! Features are tessellated into [`Shape`]s and queued in a [`Scene`], which
//! also tracks the projected extent. [`render`] then drains the scene from
//! the lowest z-index up onto a `tiny_skia::Pixmap`, scaled so the extent
//! fills the image.

pub mod canvas;
pub mod compose;
pub mod error;
pub mod font;
pub mod projection;
pub mod scene;
pub mod shape;
pub mod style;
pub mod tessellate;

pub use canvas::{Canvas, PixmapCanvas, Rgba, Stroke, TextStyle};
pub use compose::{composite, render, RenderOptions, Viewport};
pub use error::{RenderError, Result};
pub use font::LabelFont;
pub use projection::{Point, Projection, WebMercator};
pub use scene::Scene;
pub use shape::{PlanarBounds, Shape, ShapeKind, TerrainKind};
pub use tessellate::{tessellate, ShapeRule};

pub use tiny_skia::Pixmap;
