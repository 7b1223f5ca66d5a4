//! Coordinate types.
//!
//! The engine works in a planar, metre-based frame: `Position { x, y }`.
//! Risk interpolation and edge midpoints use plain Euclidean geometry, which
//! is exact in the projected frame and keeps IDW weights cheap.
//!
//! `GeoPoint` is the WGS-84 form incident reports arrive in.  Use
//! [`GeoPoint::project`] with a fixed origin to move them into the planar
//! frame; the equirectangular approximation is well under 0.5 % off at city
//! scale.

/// A point in the planar network frame, in metres.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn distance(self, other: Position) -> f64 {
        self.distance_2(other).sqrt()
    }

    /// Squared Euclidean distance; avoids the `sqrt` for comparisons.
    #[inline]
    pub fn distance_2(self, other: Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Point halfway between `self` and `other`.
    #[inline]
    pub fn midpoint(self, other: Position) -> Position {
        Position::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    /// `true` if both coordinates are finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[inline]
    pub fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// A WGS-84 geographic coordinate.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Mean Earth radius, metres.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }

    /// Equirectangular projection into the planar frame centred on `origin`.
    ///
    /// `x` grows east, `y` grows north, both in metres.
    pub fn project(self, origin: GeoPoint) -> Position {
        let mean_lat = ((self.lat + origin.lat) * 0.5).to_radians();
        let x = (self.lon - origin.lon).to_radians() * mean_lat.cos() * EARTH_RADIUS_M;
        let y = (self.lat - origin.lat).to_radians() * EARTH_RADIUS_M;
        Position::new(x, y)
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}
