use crate::query::BoundingBox;
use crate::records::Coordinate;

/// Maps a geographic bounding box to the ids of the tiles that may hold
/// features inside it. Ids come back in the order they should be visited.
pub trait SpatialIndex {
    fn tiles_for_bounding_box(&self, bbox: &BoundingBox) -> Vec<i32>;
}

/// A fixed list of tile ids, returned for every box.
impl SpatialIndex for [i32] {
    fn tiles_for_bounding_box(&self, _bbox: &BoundingBox) -> Vec<i32> {
        self.to_vec()
    }
}

impl SpatialIndex for Vec<i32> {
    fn tiles_for_bounding_box(&self, bbox: &BoundingBox) -> Vec<i32> {
        self.as_slice().tiles_for_bounding_box(bbox)
    }
}

/// Regular latitude/longitude grid over the whole globe.
///
/// Rows count up from -90° latitude and columns from -180° longitude; a
/// tile id is `row * columns + column`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridTiling {
    cell_size_deg: f64,
    rows: i32,
    columns: i32,
}

impl Default for GridTiling {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl GridTiling {
    /// `cell_size_deg` is clamped to `[0.01, 180]` degrees.
    pub fn new(cell_size_deg: f64) -> Self {
        let cell_size_deg = if cell_size_deg.is_finite() {
            cell_size_deg.clamp(0.01, 180.0)
        } else {
            1.0
        };

        Self {
            cell_size_deg,
            rows: (180.0 / cell_size_deg).ceil() as i32,
            columns: (360.0 / cell_size_deg).ceil() as i32,
        }
    }

    pub fn cell_size_deg(&self) -> f64 {
        self.cell_size_deg
    }

    #[inline]
    fn row(&self, latitude: f64) -> i32 {
        (((latitude + 90.0) / self.cell_size_deg).floor() as i32).clamp(0, self.rows - 1)
    }

    #[inline]
    fn column(&self, longitude: f64) -> i32 {
        (((longitude + 180.0) / self.cell_size_deg).floor() as i32).clamp(0, self.columns - 1)
    }

    /// The tile a single coordinate falls into.
    pub fn tile_for(&self, coordinate: &Coordinate) -> i32 {
        self.row(coordinate.latitude()) * self.columns + self.column(coordinate.longitude())
    }
}

impl SpatialIndex for GridTiling {
    fn tiles_for_bounding_box(&self, bbox: &BoundingBox) -> Vec<i32> {
        if !bbox.is_valid() {
            return Vec::new();
        }

        let (row_lo, row_hi) = (self.row(bbox.min_lat), self.row(bbox.max_lat));
        let (col_lo, col_hi) = (self.column(bbox.min_lon), self.column(bbox.max_lon));

        let mut ids = Vec::with_capacity(((row_hi - row_lo + 1) * (col_hi - col_lo + 1)) as usize);
        for row in row_lo..=row_hi {
            for column in col_lo..=col_hi {
                ids.push(row * self.columns + column);
            }
        }
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_cell_box() {
        let grid = GridTiling::new(1.0);
        let bbox = BoundingBox::new(10.2, 20.2, 10.8, 20.9);
        let ids = grid.tiles_for_bounding_box(&bbox);
        assert_eq!(ids, vec![grid.tile_for(&Coordinate::new(10.5, 20.5))]);
        assert_eq!(ids[0], 100 * 360 + 200);
    }

    #[test]
    fn spanning_box_is_row_major() {
        let grid = GridTiling::new(10.0);
        let bbox = BoundingBox::new(-5.0, -5.0, 5.0, 5.0);
        let ids = grid.tiles_for_bounding_box(&bbox);
        // rows 8..=9, columns 17..=18, 36 columns.
        assert_eq!(ids, vec![8 * 36 + 17, 8 * 36 + 18, 9 * 36 + 17, 9 * 36 + 18]);
    }

    #[test]
    fn poles_and_antimeridian_clamp() {
        let grid = GridTiling::new(1.0);
        let corner = grid.tile_for(&Coordinate::new(90.0, 180.0));
        assert_eq!(corner, 179 * 360 + 359);
        assert_eq!(grid.tile_for(&Coordinate::new(-90.0, -180.0)), 0);
    }

    #[test]
    fn inverted_box_has_no_tiles() {
        let grid = GridTiling::default();
        assert!(grid
            .tiles_for_bounding_box(&BoundingBox::new(5.0, 0.0, 1.0, 1.0))
            .is_empty());
    }

    #[test]
    fn fixed_list_ignores_the_box() {
        let ids = vec![3, 1, 2];
        assert_eq!(
            ids.tiles_for_bounding_box(&BoundingBox::new(0.0, 0.0, 1.0, 1.0)),
            vec![3, 1, 2]
        );
    }
}
