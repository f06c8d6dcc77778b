use std::{path::PathBuf, time::Duration};

use crate::bounding_box::BoundingBox;
use crate::paper::{Orientation, PaperSize};
use crate::sources::gpx::GpxSpec;
use crate::tileserver::TileServer;

/// Placeholder in the output file name that is replaced with the tile
/// server's handle.
pub const HANDLE_PLACEHOLDER: &str = "{}";

/// Map making configuration.
#[derive(Debug, PartialEq)]
pub struct Config {
    /// The area that must be visible on the map.
    pub bounding_box: BoundingBox,

    /// Paper format the map is printed on.
    pub paper: PaperSize,

    /// Print resolution.
    pub dpi: u32,

    /// Width of the paper margins in millimetres.
    pub margin_mm: u32,

    /// Page orientations the zoom search may choose from.
    pub orientation: Orientation,

    /// Fixed zoom level, bypassing the search for the best fitting one.
    pub zoom: Option<u8>,

    /// Don't download or write anything, only use what's already cached.
    pub dry_run: bool,

    /// Where map tiles come from.
    pub tile_server: TileServer,

    /// Root folder of the tile and place cache.
    pub cache_dir: PathBuf,

    /// GPX files with tracks and waypoints to draw.
    pub gpx: Vec<GpxSpec>,

    /// Shapefile with roads to draw.
    pub shapefile: Option<PathBuf>,

    /// Output file name, may contain `{}` for the tile server handle.
    pub output: String,

    pub regular_font: Option<PathBuf>,
    pub bold_font: Option<PathBuf>,

    /// Image drawn for each waypoint instead of the built-in flag.
    pub waypoint_icon: Option<PathBuf>,

    /// Maximum number of parallel downloads.
    pub fetch_rate: u8,

    /// How many times to retry a failed HTTP request.
    pub request_retries_amount: u8,

    /// Timeout for a single HTTP request.
    ///
    /// Pass the zero duration to disable the timeout.
    pub timeout: Duration,
}

impl Config {
    /// Usable portrait page size in pixels.
    pub fn page_size(&self) -> (u32, u32) {
        self.paper.pixel_size(self.dpi, self.margin_mm)
    }

    /// Where the composed map is written to.
    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(
            self.output
                .replacen(HANDLE_PLACEHOLDER, &self.tile_server.handle, 1),
        )
    }

    /// The companion HTML page, next to the map image.
    pub fn html_path(&self) -> PathBuf {
        self.output_path().with_extension("html")
    }
}
