//! Web Mercator conversions between geographic coordinates, tile indices and
//! absolute pixel positions.
//!
//! ref: https://wiki.openstreetmap.org/wiki/Slippy_map_tilenames

use std::f64::consts::PI;
use std::ops::Sub;

use crate::error::{Error, Result};

/// Edge length of a single tile in pixels.
pub const TILE_SIZE: u32 = 256;

/// A geographic position in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    /// Creates a point, rejecting latitudes the projection cannot handle.
    ///
    /// Longitudes only need to be finite, points slightly beyond ±180° are
    /// kept.
    ///
    /// # Example
    /// ```rust
    /// # use tripmap::GeoPoint;
    /// assert!(GeoPoint::new(50.7929, 6.0402).is_ok());
    /// assert!(GeoPoint::new(90.0, 0.0).is_err());
    /// assert!(GeoPoint::new(0.0, 180.5).is_ok());
    /// ```
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        if !lat.is_finite() || lat <= -90_f64 || lat >= 90_f64 {
            return Err(Error::InvalidLatitude(lat));
        }
        if !lon.is_finite() {
            return Err(Error::InvalidLongitude(lon));
        }

        Ok(Self { lat, lon })
    }
}

/// An absolute position in the pixel space of the tile pyramid at some zoom level.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct PixelCoordinate {
    pub x: i64,
    pub y: i64,
}

impl PixelCoordinate {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// The pixel a geographic point falls into at `zoom`.
    pub fn from_geo(point: GeoPoint, zoom: u8) -> Self {
        let (x, y) = geo_to_tile(point.lat, point.lon, zoom, f64::from(TILE_SIZE));
        Self { x, y }
    }
}

impl Sub for PixelCoordinate {
    type Output = PixelCoordinate;

    fn sub(self, rhs: Self) -> Self::Output {
        PixelCoordinate::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Projects a coordinate onto the tile grid at `zoom`.
///
/// With `scale == 1.0` the result are tile indices, with `scale == TILE_SIZE`
/// absolute pixel coordinates. The result is not clamped to the grid.
///
/// The latitude must lie strictly between -90° and 90°; the projection
/// diverges at the poles.
pub fn geo_to_tile(lat: f64, lon: f64, zoom: u8, scale: f64) -> (i64, i64) {
    let lat_rad = lat.to_radians();
    let n = scale * 2_f64.powi(i32::from(zoom));

    let x = (lon + 180_f64) / 360_f64 * n;
    let y = (1_f64 - (lat_rad.tan() + 1_f64 / lat_rad.cos()).ln() / PI) / 2_f64 * n;

    (x.floor() as i64, y.floor() as i64)
}

/// Returns the north-west corner of tile `x`/`y` as (latitude, longitude),
/// rounded to five decimal places.
pub fn tile_to_geo(x: i64, y: i64, zoom: u8) -> (f64, f64) {
    let n = 2_f64.powi(i32::from(zoom));

    let lon = x as f64 / n * 360_f64 - 180_f64;
    let lat = (PI * (1_f64 - 2_f64 * y as f64 / n)).sinh().atan().to_degrees();

    (round5(lat), round5(lon))
}

fn round5(v: f64) -> f64 {
    (v * 100_000_f64).round() / 100_000_f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_index() {
        assert_eq!(geo_to_tile(50.7929, 6.0402, 18, 1.0), (135470, 87999));
    }

    #[test]
    fn pixel_scale() {
        let (tx, ty) = geo_to_tile(50.7929, 6.0402, 10, 1.0);
        let (px, py) = geo_to_tile(50.7929, 6.0402, 10, f64::from(TILE_SIZE));
        assert_eq!(px / i64::from(TILE_SIZE), tx);
        assert_eq!(py / i64::from(TILE_SIZE), ty);
    }

    #[test]
    fn origin_tile() {
        assert_eq!(tile_to_geo(0, 0, 0), (85.05113, -180.0));
        assert_eq!(tile_to_geo(1, 1, 1), (0.0, 0.0));
    }

    #[test]
    fn round_trip_within_a_pixel() {
        let scale = f64::from(TILE_SIZE);
        for zoom in 0..=16u8 {
            for &lat in &[-70.0, -33.9, -0.5, 12.3, 40.67, 69.9] {
                for &lon in &[-179.5, -112.23, -0.1, 6.04, 151.2] {
                    let (x, y) = geo_to_tile(lat, lon, zoom, 1.0);
                    let (back_lat, back_lon) = tile_to_geo(x, y, zoom);
                    let (px, py) = geo_to_tile(back_lat, back_lon, zoom, scale);

                    let expected = (x * i64::from(TILE_SIZE), y * i64::from(TILE_SIZE));
                    assert!(
                        (px - expected.0).abs() <= 1 && (py - expected.1).abs() <= 1,
                        "{}/{} at zoom {}: {:?} vs {:?}",
                        lat,
                        lon,
                        zoom,
                        (px, py),
                        expected
                    );
                }
            }
        }
    }

    #[test]
    fn rejects_poles() {
        assert!(GeoPoint::new(90.0, 0.0).is_err());
        assert!(GeoPoint::new(-90.0, 0.0).is_err());
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn longitude_is_unconstrained() {
        assert!(GeoPoint::new(0.0, 180.5).is_ok());
        assert!(GeoPoint::new(0.0, -181.0).is_ok());
        assert!(GeoPoint::new(0.0, f64::INFINITY).is_err());
        assert!(GeoPoint::new(0.0, f64::NAN).is_err());
    }

    #[test]
    fn pixel_difference() {
        let a = PixelCoordinate::new(300, 700);
        let b = PixelCoordinate::new(256, 512);
        assert_eq!(a - b, PixelCoordinate::new(44, 188));
    }
}
