use mapfile::Coordinate;

/// A projected point. Units are whatever the projection produces; the
/// compositor only cares that both axes share them and y grows northwards.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Maps geographic coordinates onto a plane.
pub trait Projection {
    fn project(&self, coordinate: &Coordinate) -> Point;
}

impl<F> Projection for F
where
    F: Fn(&Coordinate) -> Point,
{
    fn project(&self, coordinate: &Coordinate) -> Point {
        self(coordinate)
    }
}

/// WGS-84 semi-major axis in metres.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Latitude at which spherical Mercator becomes a square.
pub const MAX_LATITUDE: f64 = 85.051_128_78;

/// Spherical ("web") Mercator in metres.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebMercator;

impl Projection for WebMercator {
    #[inline]
    fn project(&self, coordinate: &Coordinate) -> Point {
        let lat = coordinate.latitude().clamp(-MAX_LATITUDE, MAX_LATITUDE);
        let lon = coordinate.longitude();

        let x = EARTH_RADIUS_M * lon.to_radians();
        let y = EARTH_RADIUS_M * (std::f64::consts::FRAC_PI_4 + lat.to_radians() / 2.0).tan().ln();
        Point::new(x, y)
    }
}
