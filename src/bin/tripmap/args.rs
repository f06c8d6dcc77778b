use anyhow::{Context, Result};
use clap::{
    app_from_crate, crate_authors, crate_description, crate_name, crate_version, AppSettings, Arg,
    ArgMatches,
};
use std::{env, path::PathBuf, str::FromStr, time::Duration};

use crate::validators::*;
use tripmap::sources::gpx::GpxSpec;
use tripmap::{BoundingBox, Config, Orientation, PaperSize, TileServer, DEFAULT_TILE_SOURCE};

const WEST_ARG: &str = "west";
const SOUTH_ARG: &str = "south";
const EAST_ARG: &str = "east";
const NORTH_ARG: &str = "north";
const PAPER_ARG: &str = "paper";
const LANDSCAPE_ARG: &str = "landscape";
const PORTRAIT_ARG: &str = "portrait";
const DPI_ARG: &str = "dpi";
const MARGIN_ARG: &str = "margin";
const ZOOM_ARG: &str = "zoom";
const DRY_RUN_ARG: &str = "dry_run";
const TILE_SOURCE_ARG: &str = "tile_source";
const TILE_SERVER_ARG: &str = "tile_server";
const GPX_ARG: &str = "gpx";
const SHAPEFILE_ARG: &str = "shapefile";
const OUTPUT_ARG: &str = "output";
const CACHE_DIR_ARG: &str = "cache_dir";
const FONT_ARG: &str = "font";
const BOLD_FONT_ARG: &str = "bold_font";
const WAYPOINT_ICON_ARG: &str = "waypoint_icon";
const TIMEOUT_ARG: &str = "timeout";
const REQUEST_RETRIES_ARG: &str = "num_retries";
const PARALLEL_FETCHES_ARG: &str = "num_parallel";
const LOGLEVEL_ARG: &str = "loglevel";

pub struct Args {
    pub bounding_box: BoundingBox,
    pub paper: PaperSize,
    pub orientation: Orientation,
    pub dpi: u32,
    pub margin_mm: u32,
    pub zoom: Option<u8>,
    pub dry_run: bool,
    pub tile_server: TileServer,
    pub gpx: Vec<GpxSpec>,
    pub shapefile: Option<PathBuf>,
    pub output: String,
    pub cache_dir: PathBuf,
    pub regular_font: Option<PathBuf>,
    pub bold_font: Option<PathBuf>,
    pub waypoint_icon: Option<PathBuf>,
    pub parallel_fetches: u8,
    pub retries: u8,
    pub timeout: Duration,
    pub loglevel: Option<String>,
}

impl std::convert::From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            bounding_box: args.bounding_box,
            paper: args.paper,
            dpi: args.dpi,
            margin_mm: args.margin_mm,
            orientation: args.orientation,
            zoom: args.zoom,
            dry_run: args.dry_run,
            tile_server: args.tile_server,
            cache_dir: args.cache_dir,
            gpx: args.gpx,
            shapefile: args.shapefile,
            output: args.output,
            regular_font: args.regular_font,
            bold_font: args.bold_font,
            waypoint_icon: args.waypoint_icon,
            fetch_rate: args.parallel_fetches,
            request_retries_amount: args.retries,
            timeout: args.timeout,
        }
    }
}

/// Parses the value of a validated (or defaulted) argument.
fn value<T>(matches: &ArgMatches<'_>, name: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    matches
        .value_of(name)
        .with_context(|| format!("missing argument `{}`", name))?
        .parse()
        .with_context(|| format!("invalid value for `{}`", name))
}

fn default_cache_dir() -> PathBuf {
    let mut dir = env::var_os("HOME").map(PathBuf::from).unwrap_or_default();
    dir.push(".cache");
    dir.push("tripmap");
    dir
}

impl Args {
    pub fn parse() -> Result<Self> {
        let matches = get_matches();

        let bounding_box = BoundingBox::new(
            value(&matches, SOUTH_ARG)?,
            value(&matches, WEST_ARG)?,
            value(&matches, NORTH_ARG)?,
            value(&matches, EAST_ARG)?,
        )?;

        let orientation = if matches.is_present(LANDSCAPE_ARG) {
            Orientation::Landscape
        } else if matches.is_present(PORTRAIT_ARG) {
            Orientation::Portrait
        } else {
            Orientation::Any
        };

        // an explicit URL wins over the named sources
        let tile_server = match matches.value_of(TILE_SERVER_ARG) {
            Some(url) => TileServer::from_url(url),
            None => value(&matches, TILE_SOURCE_ARG)?,
        };

        let gpx = matches
            .values_of(GPX_ARG)
            .map(|specs| specs.map(str::parse).collect::<Result<Vec<GpxSpec>, _>>())
            .transpose()?
            .unwrap_or_default();

        let cache_dir = matches
            .value_of(CACHE_DIR_ARG)
            .map(PathBuf::from)
            .unwrap_or_else(default_cache_dir);

        Ok(Self {
            bounding_box,
            paper: value(&matches, PAPER_ARG)?,
            orientation,
            dpi: value(&matches, DPI_ARG)?,
            margin_mm: value(&matches, MARGIN_ARG)?,
            zoom: matches
                .value_of(ZOOM_ARG)
                .map(str::parse::<u8>)
                .transpose()
                .context("invalid zoom level")?,
            dry_run: matches.is_present(DRY_RUN_ARG),
            tile_server,
            gpx,
            shapefile: matches.value_of(SHAPEFILE_ARG).map(PathBuf::from),
            output: value(&matches, OUTPUT_ARG)?,
            cache_dir,
            regular_font: matches.value_of(FONT_ARG).map(PathBuf::from),
            bold_font: matches.value_of(BOLD_FONT_ARG).map(PathBuf::from),
            waypoint_icon: matches.value_of(WAYPOINT_ICON_ARG).map(PathBuf::from),
            parallel_fetches: value(&matches, PARALLEL_FETCHES_ARG)?,
            retries: value(&matches, REQUEST_RETRIES_ARG)?,
            timeout: Duration::from_secs(value(&matches, TIMEOUT_ARG)?),
            loglevel: matches.value_of(LOGLEVEL_ARG).map(str::to_owned),
        })
    }
}

fn get_matches() -> ArgMatches<'static> {
    let handles = TileServer::handles();

    app_from_crate!()
        .setting(AppSettings::AllowNegativeNumbers)
        .arg(
            Arg::with_name(WEST_ARG)
                .help("Longitude of the west bounding box boundary (in degrees)")
                .required(true)
                .validator(is_geo_coord)
                .index(1),
        )
        .arg(
            Arg::with_name(SOUTH_ARG)
                .help("Latitude of the south bounding box boundary (in degrees)")
                .required(true)
                .validator(is_geo_coord)
                .index(2),
        )
        .arg(
            Arg::with_name(EAST_ARG)
                .help("Longitude of the east bounding box boundary (in degrees)")
                .required(true)
                .validator(is_geo_coord)
                .index(3),
        )
        .arg(
            Arg::with_name(NORTH_ARG)
                .help("Latitude of the north bounding box boundary (in degrees)")
                .required(true)
                .validator(is_geo_coord)
                .index(4),
        )
        .arg(
            Arg::with_name(PAPER_ARG)
                .help("Size of the paper the map is printed on")
                .possible_values(PaperSize::ALL)
                .case_insensitive(true)
                .default_value("A4")
                .takes_value(true)
                .short("P")
                .long("papersize"),
        )
        .arg(
            Arg::with_name(LANDSCAPE_ARG)
                .help("Force landscape orientation")
                .conflicts_with(PORTRAIT_ARG)
                .short("l")
                .long("landscape"),
        )
        .arg(
            Arg::with_name(PORTRAIT_ARG)
                .help("Force portrait orientation")
                .short("p")
                .long("portrait"),
        )
        .arg(
            Arg::with_name(DPI_ARG)
                .help("Print resolution")
                .validator(is_numeric_min(1))
                .default_value("300")
                .takes_value(true)
                .short("d")
                .long("dpi"),
        )
        .arg(
            Arg::with_name(MARGIN_ARG)
                .help("Width of the paper margins in mm")
                .validator(is_numeric_min(0))
                .default_value("5")
                .takes_value(true)
                .short("m")
                .long("margin"),
        )
        .arg(
            Arg::with_name(ZOOM_ARG)
                .help("Use this zoom level instead of the one best fitting the paper")
                .validator(is_zoom)
                .takes_value(true)
                .short("z")
                .long("zoom"),
        )
        .arg(
            Arg::with_name(DRY_RUN_ARG)
                .help("Don't download or write anything, only use cached data and print the HTML page.")
                .short("D")
                .long("dry-run"),
        )
        .arg(
            Arg::with_name(TILE_SOURCE_ARG)
                .help("The tile server to use")
                .possible_values(&handles)
                .default_value(DEFAULT_TILE_SOURCE)
                .takes_value(true)
                .short("s")
                .long("tilesource"),
        )
        .arg(
            Arg::with_name(TILE_SERVER_ARG)
                .help("URL of a tile server with format specifiers `{x}`, `{y}`, `{z}` and optionally `{s}` (replaced with `a`, `b` or `c` in turn). Overrides --tilesource.")
                .takes_value(true)
                .short("t")
                .long("tileserver"),
        )
        .arg(
            Arg::with_name(GPX_ARG)
                .help("GPX file: [(trk|wpt|any),]file.gpx - may be given multiple times")
                .validator(is_gpx_spec)
                .takes_value(true)
                .multiple(true)
                .number_of_values(1)
                .short("g")
                .long("gpx"),
        )
        .arg(
            Arg::with_name(SHAPEFILE_ARG)
                .help("Shapefile with the roads to draw")
                .takes_value(true)
                .short("S")
                .long("shapefile"),
        )
        .arg(
            Arg::with_name(OUTPUT_ARG)
                .help("Name of the output image; `{}` is replaced with the tile source")
                .default_value("mapfile-{}.jpg")
                .takes_value(true)
                .short("o")
                .long("out"),
        )
        .arg(
            Arg::with_name(CACHE_DIR_ARG)
                .help("Folder tiles and places are cached in [default: ~/.cache/tripmap]")
                .takes_value(true)
                .long("cache"),
        )
        .arg(
            Arg::with_name(FONT_ARG)
                .help("TrueType font for labels")
                .takes_value(true)
                .long("font"),
        )
        .arg(
            Arg::with_name(BOLD_FONT_ARG)
                .help("Bold TrueType font for labels")
                .takes_value(true)
                .long("bold-font"),
        )
        .arg(
            Arg::with_name(WAYPOINT_ICON_ARG)
                .help("Image drawn at each waypoint, anchored at its bottom-left corner")
                .takes_value(true)
                .long("waypoint-icon"),
        )
        .arg(
            Arg::with_name(PARALLEL_FETCHES_ARG)
                .help("The amount of tiles fetched in parallel.")
                .validator(is_numeric_min(1))
                .default_value("5")
                .takes_value(true)
                .short("r")
                .long("rate"),
        )
        .arg(
            Arg::with_name(REQUEST_RETRIES_ARG)
                .help("The amount of times to try a failed HTTP request.")
                .validator(is_numeric_min(1))
                .default_value("3")
                .takes_value(true)
                .long("retries"),
        )
        .arg(
            Arg::with_name(TIMEOUT_ARG)
                .help("The timeout (in seconds) for a single HTTP request. Pass 0 for no timeout.")
                .validator(is_numeric_min(0))
                .default_value("10")
                .takes_value(true)
                .long("timeout"),
        )
        .arg(
            Arg::with_name(LOGLEVEL_ARG)
                .help("Log level (overrides RUST_LOG)")
                .possible_values(&["error", "warn", "info", "debug", "trace"])
                .takes_value(true)
                .long("loglevel"),
        )
        .get_matches()
}
