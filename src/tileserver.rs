use std::str::FromStr;

use crate::error::Error;
use crate::style::StyleId;
use crate::url::UrlFormat;

/// Handle used for tile servers given by URL.
pub const USER_HANDLE: &str = "user";

pub const DEFAULT_TILE_SOURCE: &str = "wikimedia";

/// Known tile servers as (handle, style, URL template).
const TILE_SOURCES: &[(&str, StyleId, &str)] = &[
    (
        "natgeo",
        StyleId::Default,
        "https://services.arcgisonline.com/ArcGIS/rest/services/NatGeo_World_Map/MapServer/tile/{z}/{y}/{x}.jpg",
    ),
    (
        "natgeo-us-topo",
        StyleId::Default,
        "https://services.arcgisonline.com/arcgis/rest/services/USA_Topo_Maps/MapServer/tile/{z}/{y}/{x}.jpg",
    ),
    (
        "esri-terrain",
        StyleId::Default,
        "https://services.arcgisonline.com/arcgis/rest/services/World_Terrain_Base/MapServer/tile/{z}/{y}/{x}.jpg",
    ),
    (
        "esri-topo",
        StyleId::Default,
        "https://services.arcgisonline.com/arcgis/rest/services/World_Topo_Map/MapServer/tile/{z}/{y}/{x}.jpg",
    ),
    (
        "usgs-relief",
        StyleId::Default,
        "https://basemap.nationalmap.gov/arcgis/rest/services/USGSShadedReliefOnly/MapServer/tile/{z}/{y}/{x}",
    ),
    (
        "stamen-terrain",
        StyleId::Stamen,
        "http://b.tile.stamen.com/terrain/{z}/{x}/{y}.png",
    ),
    (
        "stamen-terrain-background",
        StyleId::Stamen,
        "http://b.tile.stamen.com/terrain-background/{z}/{x}/{y}.png",
    ),
    (
        "stamen-toner",
        StyleId::Stamen,
        "http://b.tile.stamen.com/toner/{z}/{x}/{y}.png",
    ),
    (
        "korona-roads",
        StyleId::Default,
        "https://korona.geog.uni-heidelberg.de/tiles/roads/x={x}&y={y}&z={z}",
    ),
    (
        "wikimedia-labels",
        StyleId::Default,
        "https://maps.wikimedia.org/osm-intl/{z}/{x}/{y}.png",
    ),
    (
        "wikimedia",
        StyleId::Default,
        "https://maps.wikimedia.org/osm/{z}/{x}/{y}.png",
    ),
];

/// A tile server: cache handle, URL template and overlay style.
#[derive(Debug, PartialEq)]
pub struct TileServer {
    pub handle: String,
    pub url: UrlFormat,
    pub style: StyleId,
}

impl TileServer {
    /// Handles of all known tile servers, sorted.
    pub fn handles() -> Vec<&'static str> {
        let mut handles: Vec<&str> = TILE_SOURCES.iter().map(|(h, _, _)| *h).collect();
        handles.sort_unstable();
        handles
    }

    /// A tile server that isn't one of the presets.
    pub fn from_url(url: &str) -> Self {
        TileServer {
            handle: USER_HANDLE.to_owned(),
            url: UrlFormat::from_str(url),
            style: StyleId::Default,
        }
    }
}

impl FromStr for TileServer {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TILE_SOURCES
            .iter()
            .find(|(handle, _, _)| *handle == s)
            .map(|(handle, style, url)| TileServer {
                handle: (*handle).to_owned(),
                url: UrlFormat::from_str(url),
                style: *style,
            })
            .ok_or_else(|| Error::UnknownTileSource(s.to_owned()))
    }
}
