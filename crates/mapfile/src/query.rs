use log::{debug, trace};

use crate::error::Result;
use crate::reader::DataFile;
use crate::records::{Coordinate, GeometryType};
use crate::tags::ClassifiedTags;
use crate::text::Utf16Str;
use crate::tiling::SpatialIndex;

/// Geographic box in degrees. Both bounds of both axes are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn new(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.min_lat <= self.max_lat && self.min_lon <= self.max_lon
    }

    #[inline]
    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        let (lat, lon) = (coordinate.latitude(), coordinate.longitude());
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }
}

/// Everything a visitor gets for one feature. Label and coordinates still
/// point into the file.
#[derive(Debug, Clone)]
pub struct MapFeatureData<'a> {
    pub id: i64,
    pub geometry_type: GeometryType,
    pub label: Utf16Str<'a>,
    pub coordinates: &'a [Coordinate],
    pub properties: ClassifiedTags,
}

impl DataFile {
    /// Visit every feature with at least one vertex inside `bbox`.
    ///
    /// Tiles are visited in the order `index` returns them; ids missing from
    /// the file are skipped. Only vertices are tested, so a polygon that
    /// encloses the whole box without a vertex inside it is not visited.
    ///
    /// Returning `false` from `visitor` skips the rest of the current tile;
    /// the next tile is still visited.
    pub fn for_each_feature<S, F>(&self, index: &S, bbox: &BoundingBox, mut visitor: F) -> Result<()>
    where
        S: SpatialIndex + ?Sized,
        F: FnMut(MapFeatureData<'_>) -> bool,
    {
        let tile_ids = index.tiles_for_bounding_box(bbox);
        let mut visited = 0usize;

        for tile_id in &tile_ids {
            let Some(tile) = self.locate_tile(*tile_id)? else {
                trace!("tile {} not in file, skipping", tile_id);
                continue;
            };

            for feature in tile.features() {
                let feature = feature?;
                let coordinates = tile.coordinates(feature)?;
                if !coordinates.iter().any(|c| bbox.contains(c)) {
                    continue;
                }

                let label = tile.label(feature)?;
                let pairs = tile.properties(feature).collect::<Result<Vec<_>>>()?;

                let data = MapFeatureData {
                    id: feature.id(),
                    geometry_type: feature.geometry_type()?,
                    label,
                    coordinates,
                    properties: ClassifiedTags::classify(pairs),
                };

                visited += 1;
                if !visitor(data) {
                    trace!("visitor stopped tile {}", tile_id);
                    break;
                }
            }
        }

        debug!(
            "bbox query over {} tiles visited {} features",
            tile_ids.len(),
            visited
        );

        Ok(())
    }
}
