use crate::error::{Error, Result};
use crate::projection::GeoPoint;
use crate::tile_range::TileRange;

/// A bounding box consisting of south, west, north and east coordinate
/// boundaries in degrees.
///
/// Boxes crossing the antimeridian (east < west) are not supported.
///
/// # Example
/// ```rust
/// # use tripmap::BoundingBox;
/// let four_corners = BoundingBox::new(34.85, -112.23, 40.67, -104.58).unwrap();
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    /// Create a new bounding box from coordinates in degrees.
    ///
    /// Fails if a latitude can't be projected, if `south >= north` or if
    /// `east < west`.
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Result<Self> {
        GeoPoint::new(south, west)?;
        GeoPoint::new(north, east)?;

        if south >= north {
            return Err(Error::InvalidBoundingBox(format!(
                "south ({}) must be less than north ({})",
                south, north
            )));
        }
        if east < west {
            return Err(Error::InvalidBoundingBox(format!(
                "east ({}) must not be less than west ({}), crossing the antimeridian isn't supported",
                east, west
            )));
        }

        Ok(BoundingBox {
            south,
            west,
            north,
            east,
        })
    }

    pub fn south_west(&self) -> GeoPoint {
        GeoPoint {
            lat: self.south,
            lon: self.west,
        }
    }

    pub fn north_west(&self) -> GeoPoint {
        GeoPoint {
            lat: self.north,
            lon: self.west,
        }
    }

    pub fn north_east(&self) -> GeoPoint {
        GeoPoint {
            lat: self.north,
            lon: self.east,
        }
    }

    /// The tiles covering the bounding box at `zoom`.
    pub fn tile_range(&self, zoom: u8) -> TileRange {
        TileRange::new(self, zoom)
    }

    /// Whether the two boxes share any area (touching counts).
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.south <= other.north
            && self.north >= other.south
            && self.west <= other.east
            && self.east >= other.west
    }

    pub fn contains(&self, point: GeoPoint) -> bool {
        point.lat >= self.south
            && point.lat <= self.north
            && point.lon >= self.west
            && point.lon <= self.east
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_inverted_latitudes() {
        assert!(BoundingBox::new(40.67, -112.23, 34.85, -104.58).is_err());
        assert!(BoundingBox::new(40.0, -112.23, 40.0, -104.58).is_err());
    }

    #[test]
    fn rejects_antimeridian() {
        assert!(BoundingBox::new(-20.0, 170.0, -10.0, -170.0).is_err());
    }

    #[test]
    fn rejects_poles() {
        assert!(BoundingBox::new(-90.0, 0.0, 10.0, 1.0).is_err());
        assert!(BoundingBox::new(10.0, 0.0, 90.0, 1.0).is_err());
    }

    #[test]
    fn intersection() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0).unwrap();
        let b = BoundingBox::new(5.0, 5.0, 15.0, 15.0).unwrap();
        let c = BoundingBox::new(20.0, 20.0, 30.0, 30.0).unwrap();

        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
        assert!(a.contains(GeoPoint::new(5.0, 5.0).unwrap()));
        assert!(!a.contains(GeoPoint::new(25.0, 5.0).unwrap()));
    }
}
