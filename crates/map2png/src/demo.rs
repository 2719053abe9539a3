//! A small synthetic map near 47.0°N 8.0°E, one of every shape kind.

use std::path::Path;

use anyhow::{Context, Result};
use mapfile::{
    BoundingBox, Coordinate, FeatureSpec, GeometryType, GridTiling, TileFileBuilder, TileSpec,
};

/// A box that covers the whole demo map.
pub const DEMO_BBOX: BoundingBox = BoundingBox {
    min_lat: 47.0,
    min_lon: 8.0,
    max_lat: 47.1,
    max_lon: 8.1,
};

fn ring(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> [(f64, f64); 4] {
    [
        (min_lat, min_lon),
        (min_lat, max_lon),
        (max_lat, max_lon),
        (max_lat, min_lon),
    ]
}

fn demo_features() -> Vec<FeatureSpec> {
    use GeometryType::*;

    vec![
        FeatureSpec::new(1, Polygon)
            .with_coordinates(ring(47.0, 8.0, 47.1, 8.1))
            .with_tag("landuse", "meadow"),
        FeatureSpec::new(2, Polygon)
            .with_coordinates(ring(47.06, 8.0, 47.1, 8.04))
            .with_tag("natural", "wood"),
        FeatureSpec::new(3, Polygon)
            .with_coordinates(ring(47.01, 8.06, 47.04, 8.09))
            .with_label("Demo Lake")
            .with_tag("natural", "water"),
        FeatureSpec::new(4, Polygon)
            .with_coordinates(ring(47.045, 8.045, 47.07, 8.08))
            .with_tag("landuse", "residential"),
        FeatureSpec::new(5, Polygon)
            .with_coordinates(ring(47.055, 8.055, 47.058, 8.06))
            .with_tag("building", "house"),
        FeatureSpec::new(6, Line)
            .with_coordinates([(47.1, 8.02), (47.07, 8.05), (47.04, 8.07)])
            .with_tag("waterway", "river"),
        FeatureSpec::new(7, Line)
            .with_coordinates([(47.0, 8.05), (47.05, 8.05), (47.1, 8.07)])
            .with_tag("highway", "primary")
            .with_tag("name", "Main Road"),
        FeatureSpec::new(8, Line)
            .with_coordinates([(47.02, 8.0), (47.03, 8.1)])
            .with_tag("railway", "rail"),
        FeatureSpec::new(9, Line)
            .with_coordinates([(47.0, 8.099), (47.1, 8.099)])
            .with_tag("boundary", "administrative")
            .with_tag("admin_level", "2"),
        FeatureSpec::new(10, Point)
            .with_coordinates([(47.06, 8.065)])
            .with_label("Demoville")
            .with_tag("place", "town"),
    ]
}

/// Group the demo features into the `grid` cell of their first vertex.
pub fn demo_tiles(grid: &GridTiling) -> Vec<TileSpec> {
    let mut tiles: Vec<TileSpec> = Vec::new();
    for feature in demo_features() {
        let (lat, lon) = feature.coordinates[0];
        let id = grid.tile_for(&Coordinate::new(lat, lon));
        match tiles.iter_mut().find(|tile| tile.id == id) {
            Some(tile) => tile.features.push(feature),
            None => tiles.push(TileSpec::new(id).with_feature(feature)),
        }
    }
    tiles
}

pub fn write_demo(path: &Path, grid: &GridTiling) -> Result<()> {
    let mut builder = TileFileBuilder::new();
    for tile in demo_tiles(grid) {
        builder.add_tile(tile);
    }
    builder
        .write_file(path)
        .with_context(|| format!("writing demo file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapfile::DataFile;
    use maprender::{Scene, WebMercator};

    #[test]
    fn demo_renders_every_feature() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demo.mapt");
        let grid = GridTiling::default();
        write_demo(&path, &grid).unwrap();

        let file = DataFile::open(&path).unwrap();
        let mut scene = Scene::new();
        let mut seen = 0;
        file.for_each_feature(&grid, &DEMO_BBOX, |feature| {
            seen += 1;
            assert!(scene.tessellate(&feature, &WebMercator).is_some());
            true
        })
        .unwrap();

        assert_eq!(seen, 10);
        assert_eq!(scene.len(), 10);
    }

    #[test]
    fn fine_grid_spreads_demo_over_tiles() {
        let tiles = demo_tiles(&GridTiling::new(0.05));
        assert!(tiles.len() > 1);
        assert_eq!(tiles.iter().map(|t| t.features.len()).sum::<usize>(), 10);
    }
}
