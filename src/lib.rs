//! Make printable trip maps from OpenStreetMap-style tiles.
//!
//! Given a bounding box and a paper format, the most detailed zoom level
//! whose tiles still fit on the page is picked, the tiles are downloaded
//! (and cached), stitched into one image and decorated with roads from a
//! shapefile, tracks and waypoints from GPX files and labels of the cities
//! and towns in the area. Labels are placed greedily, most important
//! first, and skipped if they'd overlap one placed before.
//!
//! **Be nice to the tile servers.** Big maps at high zoom levels need a lot
//! of tiles; check with `--dry-run` first.
//!
//! # CLI Example
//!
//! ```bash
//! tripmap \
//!   --papersize A3 \
//!   --gpx trk,day1.gpx --gpx wpt,sights.gpx \
//!   --out fourcorners-{}.jpg \
//!   -- -112.23 34.85 -104.58 40.67
//! ```
//!
//! # Library Example
//! ```rust
//! use tripmap::{render, BoundingBox, Fonts, Layers, Style, Tile, TILE_SIZE};
//! use image::{Rgba, RgbaImage};
//!
//! let bbox = BoundingBox::new(34.85, -112.23, 40.67, -104.58).unwrap();
//! let range = bbox.tile_range(6);
//!
//! // a provider is anything that turns a tile into an image
//! let grey = |_: &Tile| Some(RgbaImage::from_pixel(TILE_SIZE, TILE_SIZE, Rgba([200, 200, 200, 255])));
//!
//! let style = Style::default();
//! let icon = tripmap::waypoint_icon(None, &style).unwrap();
//! let map = render(&range, &grey, &style, &Fonts::none(), &Layers::default(), &icon);
//! assert_eq!(map.dimensions(), (512, 512));
//! ```

mod bounding_box;
mod canvas;
mod config;
mod enhance;
mod error;
mod fetch;
mod html;
mod labels;
mod paper;
mod projection;
mod provider;
mod render;
mod stitch;
mod style;
mod text;
mod tile;
mod tile_range;
mod tileserver;
mod url;
mod zoom;

pub mod sources;

pub use bounding_box::BoundingBox;
pub use canvas::{default_waypoint_icon, Canvas};
pub use config::{Config, HANDLE_PLACEHOLDER};
pub use enhance::{adjust_colors, brighten, contrast, saturate};
pub use error::{Error, Result};
pub use fetch::{fetch_places, fetch_tiles, http_client};
pub use html::waypoints_html;
pub use labels::{
    label_boxes, parse_population, place_label, place_labels, sort_labels, Label, LabelBoxes,
    PlaceRecord, Rect,
};
pub use paper::{Orientation, PaperSize};
pub use projection::{geo_to_tile, tile_to_geo, GeoPoint, PixelCoordinate, TILE_SIZE};
pub use provider::{tile_cache_path, CacheTileProvider, TileProvider};
pub use render::{plan, render, waypoint_icon, Layers, MapPlan};
pub use stitch::stitch;
pub use style::{
    ColorAdjust, FontSpec, FontWeight, LineStyle, Outline, PlaceClass, RoadClass, Style, StyleId,
    WaypointColors,
};
pub use text::Fonts;
pub use tile::Tile;
pub use tile_range::TileRange;
pub use tileserver::{TileServer, DEFAULT_TILE_SOURCE, USER_HANDLE};
pub use url::UrlFormat;
pub use zoom::{select_zoom, ZoomChoice, MAX_ZOOM};
