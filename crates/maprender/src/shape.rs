use crate::projection::Point;

/// Kinds of ground cover drawn as flat areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerrainKind {
    Plain,
    Hills,
    Mountains,
    Forest,
    Desert,
    Unknown,
    Water,
    Residential,
}

impl TerrainKind {
    pub const fn z_index(self) -> i32 {
        match self {
            TerrainKind::Unknown => 8,
            TerrainKind::Desert => 9,
            TerrainKind::Plain => 10,
            TerrainKind::Forest => 11,
            TerrainKind::Hills => 12,
            TerrainKind::Mountains => 13,
            TerrainKind::Water => 40,
            TerrainKind::Residential => 41,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    Terrain(TerrainKind),
    Border,
    Waterway,
    Railway,
    Road,
    /// A settlement label anchored at the first point. `should_render` is
    /// false when the feature carried neither a name nor a label.
    PopulatedPlace { name: String, should_render: bool },
}

impl ShapeKind {
    pub fn z_index(&self) -> i32 {
        match self {
            ShapeKind::Terrain(kind) => kind.z_index(),
            ShapeKind::Border => 30,
            ShapeKind::Waterway => 40,
            ShapeKind::Railway => 45,
            ShapeKind::Road => 50,
            ShapeKind::PopulatedPlace { .. } => 60,
        }
    }
}

/// One renderable item in projected space.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub kind: ShapeKind,
    pub is_polygon: bool,
    pub points: Vec<Point>,
}

impl Shape {
    pub fn new(kind: ShapeKind, is_polygon: bool, points: Vec<Point>) -> Self {
        Self {
            kind,
            is_polygon,
            points,
        }
    }

    #[inline]
    pub fn z_index(&self) -> i32 {
        self.kind.z_index()
    }
}

/// Running extent of projected points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarBounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Default for PlanarBounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl PlanarBounds {
    pub const EMPTY: PlanarBounds = PlanarBounds {
        min_x: f64::INFINITY,
        min_y: f64::INFINITY,
        max_x: f64::NEG_INFINITY,
        max_y: f64::NEG_INFINITY,
    };

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    pub fn include(&mut self, point: Point) {
        self.min_x = self.min_x.min(point.x);
        self.min_y = self.min_y.min(point.y);
        self.max_x = self.max_x.max(point.x);
        self.max_y = self.max_y.max(point.y);
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}
