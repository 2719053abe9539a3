//! How each shape kind looks.

use crate::canvas::{Canvas, Rgba, Stroke, TextStyle};
use crate::projection::Point;
use crate::shape::{Shape, ShapeKind, TerrainKind};

pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);
pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);
pub const LIGHT_GREEN: Rgba = Rgba::opaque(144, 238, 144);
pub const DARK_GREEN: Rgba = Rgba::opaque(0, 100, 0);
pub const GREEN: Rgba = Rgba::opaque(0, 128, 0);
pub const LIGHT_GRAY: Rgba = Rgba::opaque(211, 211, 211);
pub const DARK_GRAY: Rgba = Rgba::opaque(169, 169, 169);
pub const GRAY: Rgba = Rgba::opaque(128, 128, 128);
pub const SANDY_BROWN: Rgba = Rgba::opaque(244, 164, 96);
pub const MAGENTA: Rgba = Rgba::opaque(255, 0, 255);
pub const LIGHT_BLUE: Rgba = Rgba::opaque(173, 216, 230);
pub const LIGHT_CORAL: Rgba = Rgba::opaque(240, 128, 128);
pub const YELLOW: Rgba = Rgba::opaque(255, 255, 0);
pub const CORAL: Rgba = Rgba::opaque(255, 127, 80);

const THIN: f32 = 1.2;

const RAIL_BED: Stroke = Stroke::solid(DARK_GRAY, 2.0);
/// `[2, 4, 2]` written out twice; tiny-skia wants an even-length array.
const RAIL_TIES: Stroke = Stroke::dashed(LIGHT_GRAY, THIN, &[2.0, 4.0, 2.0, 2.0, 4.0, 2.0]);
const ROAD_CASING: Stroke = Stroke::solid(YELLOW, 2.2);
const ROAD_FILL: Stroke = Stroke::solid(CORAL, 2.0);
const BORDER: Stroke = Stroke::solid(GRAY, 2.0);

pub const LABEL: TextStyle = TextStyle {
    color: BLACK,
    size: 12.0,
};

pub fn terrain_color(kind: TerrainKind) -> Rgba {
    match kind {
        TerrainKind::Plain => LIGHT_GREEN,
        TerrainKind::Hills => DARK_GREEN,
        TerrainKind::Mountains => LIGHT_GRAY,
        TerrainKind::Forest => GREEN,
        TerrainKind::Desert => SANDY_BROWN,
        TerrainKind::Unknown => MAGENTA,
        TerrainKind::Water => LIGHT_BLUE,
        TerrainKind::Residential => LIGHT_CORAL,
    }
}

fn area_or_line<C: Canvas + ?Sized>(canvas: &mut C, shape: &Shape, points: &[Point], color: Rgba) {
    if shape.is_polygon {
        canvas.fill_polygon(points, color);
    } else {
        canvas.stroke_polyline(points, &Stroke::solid(color, THIN));
    }
}

/// Issue the draw calls for `shape`, whose points have already been moved
/// into canvas space as `points`.
pub fn draw_shape<C: Canvas + ?Sized>(canvas: &mut C, shape: &Shape, points: &[Point]) {
    match &shape.kind {
        ShapeKind::Terrain(kind) => area_or_line(canvas, shape, points, terrain_color(*kind)),
        ShapeKind::Waterway => area_or_line(canvas, shape, points, LIGHT_BLUE),
        ShapeKind::Border => canvas.stroke_polyline(points, &BORDER),
        ShapeKind::Railway => {
            canvas.stroke_polyline(points, &RAIL_BED);
            canvas.stroke_polyline(points, &RAIL_TIES);
        }
        ShapeKind::Road => {
            if !shape.is_polygon {
                canvas.stroke_polyline(points, &ROAD_CASING);
                canvas.stroke_polyline(points, &ROAD_FILL);
            }
        }
        ShapeKind::PopulatedPlace {
            name,
            should_render,
        } => {
            if let (true, Some(anchor)) = (*should_render, points.first()) {
                canvas.draw_text(name, *anchor, &LABEL);
            }
        }
    }
}
