//! Tracks and waypoints from GPX files.

use log::warn;
use std::{fs, path::PathBuf, str::FromStr};

use crate::error::{Error, Result};
use crate::projection::GeoPoint;
use crate::sources::parse_point;

/// Which parts of a GPX file to draw.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GpxFeatures {
    Tracks,
    Waypoints,
    Any,
}

impl GpxFeatures {
    pub fn tracks(self) -> bool {
        self != GpxFeatures::Waypoints
    }

    pub fn waypoints(self) -> bool {
        self != GpxFeatures::Tracks
    }
}

/// A GPX file given as `[(trk|wpt|any),]file.gpx`.
#[derive(Clone, Debug, PartialEq)]
pub struct GpxSpec {
    pub features: GpxFeatures,
    pub path: PathBuf,
}

impl FromStr for GpxSpec {
    type Err = Error;

    /// Splits off a leading feature selector. Anything else, including
    /// commas within the file name, is taken as the path.
    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let (features, path) = match spec.split_once(',') {
            Some(("trk", path)) => (GpxFeatures::Tracks, path),
            Some(("wpt", path)) => (GpxFeatures::Waypoints, path),
            Some(("any", path)) => (GpxFeatures::Any, path),
            _ => (GpxFeatures::Any, spec),
        };

        if path.trim().is_empty() {
            return Err(Error::InvalidGpxSpec(spec.to_owned()));
        }

        Ok(GpxSpec {
            features,
            path: PathBuf::from(path),
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Waypoint {
    pub point: GeoPoint,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// The drawable content of one GPX file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GpxData {
    /// Description from the file's metadata.
    pub title: Option<String>,
    /// One polyline per track segment.
    pub tracks: Vec<Vec<GeoPoint>>,
    pub waypoints: Vec<Waypoint>,
}

fn child_text(node: roxmltree::Node<'_, '_>, name: &str) -> Option<String> {
    node.children()
        .find(|c| c.tag_name().name() == name)
        .map(|c| c.text().unwrap_or("").trim().to_owned())
}

/// Parses a GPX document, keeping only the requested `features`.
pub fn parse(xml: &str, features: GpxFeatures) -> Result<GpxData> {
    let doc = roxmltree::Document::parse(xml)?;
    let root = doc.root_element();
    let mut data = GpxData::default();

    if features.tracks() {
        data.tracks = doc
            .descendants()
            .filter(|n| n.tag_name().name() == "trkseg")
            .map(|segment| {
                segment
                    .children()
                    .filter(|c| c.tag_name().name() == "trkpt")
                    .filter_map(|pt| parse_point(pt.attribute("lat"), pt.attribute("lon")))
                    .collect::<Vec<_>>()
            })
            .filter(|segment| !segment.is_empty())
            .collect();
    }

    if features.waypoints() {
        data.title = root
            .children()
            .find(|c| c.tag_name().name() == "metadata")
            .and_then(|metadata| child_text(metadata, "desc"))
            .or_else(|| child_text(root, "desc"));

        data.waypoints = root
            .children()
            .filter(|c| c.tag_name().name() == "wpt")
            .filter_map(|wpt| {
                Some(Waypoint {
                    point: parse_point(wpt.attribute("lat"), wpt.attribute("lon"))?,
                    name: child_text(wpt, "name"),
                    description: child_text(wpt, "desc"),
                })
            })
            .collect();
    }

    Ok(data)
}

/// Reads the file named by `spec`. A missing file is logged and yields
/// `None`.
pub fn read(spec: &GpxSpec) -> Result<Option<GpxData>> {
    if !spec.path.exists() {
        warn!("GPX file »{}« does not exist, ignored", spec.path.display());
        return Ok(None);
    }

    let xml = fs::read_to_string(&spec.path)?;
    parse(&xml, spec.features).map(Some)
}

/// Removes all `trk` and `rte` elements from a GPX document, leaving the
/// metadata and waypoints untouched.
pub fn strip_tracks_and_routes(xml: &str) -> Result<String> {
    let doc = roxmltree::Document::parse(xml)?;

    let is_stripped = |n: &roxmltree::Node<'_, '_>| {
        n.is_element() && matches!(n.tag_name().name(), "trk" | "rte")
    };

    let mut ranges: Vec<std::ops::Range<usize>> = doc
        .descendants()
        .filter(|n| is_stripped(n) && !n.ancestors().skip(1).any(|a| is_stripped(&a)))
        .map(|n| n.range())
        .collect();
    ranges.sort_by_key(|r| r.start);

    let mut out = String::with_capacity(xml.len());
    let mut pos = 0;
    for range in ranges {
        out.push_str(&xml[pos..range.start]);
        pos = range.end;
    }
    out.push_str(&xml[pos..]);

    Ok(out)
}
