//! Readers for the overlay data: places from Overpass, tracks and waypoints
//! from GPX files, roads from shapefiles.

pub mod gpx;
pub mod overpass;
pub mod roads;

use log::warn;

use crate::projection::GeoPoint;

/// Parses a `lat`/`lon` attribute pair, skipping (and logging) positions the
/// projection can't handle.
pub(crate) fn parse_point(lat: Option<&str>, lon: Option<&str>) -> Option<GeoPoint> {
    let lat = lat?.trim().parse::<f64>().ok()?;
    let lon = lon?.trim().parse::<f64>().ok()?;

    match GeoPoint::new(lat, lon) {
        Ok(point) => Some(point),
        Err(e) => {
            warn!("ignoring position {}/{}: {}", lat, lon, e);
            None
        }
    }
}
