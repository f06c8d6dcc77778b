//! Road polylines from an ESRI shapefile.
//!
//! Each shape's road class is taken from its `level` attribute, or from
//! `class` for files without one.

use log::{debug, warn};
use shapefile::dbase::FieldValue;
use shapefile::{Point, PointM, PointZ, Shape};
use std::path::Path;

use crate::bounding_box::BoundingBox;
use crate::error::Result;
use crate::projection::GeoPoint;
use crate::style::RoadClass;

/// One shapefile record: a road class and the polylines drawn with it.
#[derive(Clone, Debug, PartialEq)]
pub struct RoadSegment {
    pub class: RoadClass,
    pub parts: Vec<Vec<GeoPoint>>,
}

fn text_value(value: Option<&FieldValue>) -> Option<&str> {
    match value {
        Some(FieldValue::Character(Some(text))) => Some(text.trim()),
        _ => None,
    }
}

/// Road class from the `level` attribute, falling back to `class`.
fn road_class(level: Option<&FieldValue>, class: Option<&FieldValue>) -> RoadClass {
    RoadClass::classify(text_value(level).or_else(|| text_value(class)).unwrap_or(""))
}

trait XY {
    fn xy(&self) -> (f64, f64);
}

impl XY for Point {
    fn xy(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

impl XY for PointM {
    fn xy(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

impl XY for PointZ {
    fn xy(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

/// Converts shapefile parts to geographic polylines. Points outside the
/// projectable range are dropped.
fn to_geo_parts<P: XY>(parts: &[Vec<P>]) -> Vec<Vec<GeoPoint>> {
    parts
        .iter()
        .map(|part| {
            part.iter()
                .filter_map(|p| {
                    let (lon, lat) = p.xy();
                    GeoPoint::new(lat, lon).ok()
                })
                .collect::<Vec<_>>()
        })
        .filter(|part| part.len() > 1)
        .collect()
}

/// Whether the bounding rectangle of `parts` touches `extent`.
fn overlaps(parts: &[Vec<GeoPoint>], extent: &BoundingBox) -> bool {
    let mut points = parts.iter().flatten();
    let first = match points.next() {
        Some(p) => *p,
        None => return false,
    };

    let (south, west, north, east) = points.fold(
        (first.lat, first.lon, first.lat, first.lon),
        |(s, w, n, e), p| (s.min(p.lat), w.min(p.lon), n.max(p.lat), e.max(p.lon)),
    );

    south <= extent.north && north >= extent.south && west <= extent.east && east >= extent.west
}

/// Reads all polylines from the shapefile at `path` that overlap `extent`.
pub fn read_roads(path: &Path, extent: &BoundingBox) -> Result<Vec<RoadSegment>> {
    let mut reader = shapefile::Reader::from_path(path)?;
    let mut roads = Vec::new();
    let mut skipped = 0;

    for item in reader.iter_shapes_and_records() {
        let (shape, record) = item?;

        let parts = match shape {
            Shape::Polyline(line) => to_geo_parts(line.parts()),
            Shape::PolylineM(line) => to_geo_parts(line.parts()),
            Shape::PolylineZ(line) => to_geo_parts(line.parts()),
            Shape::NullShape => continue,
            other => {
                warn!("ignoring {:?} shape in road file", other.shapetype());
                continue;
            }
        };

        if !overlaps(&parts, extent) {
            skipped += 1;
            continue;
        }

        roads.push(RoadSegment {
            class: road_class(record.get("level"), record.get("class")),
            parts,
        });
    }

    debug!(
        "read {} roads from {}, {} outside the map",
        roads.len(),
        path.display(),
        skipped
    );

    Ok(roads)
}
