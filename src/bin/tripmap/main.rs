mod args;
mod validators;

use anyhow::{Context, Result};
use env_logger::Builder;
use image::DynamicImage;
use log::{info, warn};
use std::{env, fs, io::Write};

use args::Args;
use tripmap::{
    fetch_places, fetch_tiles, plan, render, tile_cache_path, waypoint_icon, waypoints_html,
    CacheTileProvider, Config, Fonts, Layers, Style,
};

/// Rough size of a single tile, for the dry run estimate.
const BYTES_PER_TILE: f64 = 10_000f64;

fn init_logger(loglevel: Option<&str>) {
    let mut builder = Builder::new();
    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} {:5} {}",
            buf.timestamp_millis(),
            record.level(),
            record.args()
        )
    });

    let rust_log_env = env::var("RUST_LOG").ok();
    let rust_log = match (loglevel, rust_log_env.as_deref()) {
        (None, Some(env_filter)) => env_filter,
        (Some("debug"), _) => "debug,hyper=info,reqwest=info",
        (Some(level), _) => level,
        (None, None) => "info",
    };
    builder.parse_filters(rust_log);

    builder.init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse()?;
    init_logger(args.loglevel.as_deref());
    let config: Config = args.into();

    let plan = plan(&config)?;
    let range = plan.range;
    let (page_width, page_height) = config.page_size();
    let (image_width, image_height) = range.pixel_size();

    info!("SW tile: {}", range.south_west);
    info!("NE tile: {}", range.north_east);
    info!(
        "{}x{} tiles at zoom {} ({})",
        range.num_x,
        range.num_y,
        plan.zoom,
        if plan.landscape { "landscape" } else { "portrait" }
    );
    info!("size of paper: {}×{}", page_width, page_height);
    info!("size of graphics: {}×{}", image_width, image_height);

    if config.dry_run {
        let missing = range
            .tiles()
            .filter(|tile| {
                !tile_cache_path(&config.cache_dir, &config.tile_server.handle, tile).exists()
            })
            .count();

        info!(
            "would download {} tiles (approx {}, assuming 10 kb per tile)",
            missing,
            pretty_bytes::converter::convert((missing as f64) * BYTES_PER_TILE)
        );
    } else {
        fetch_tiles(&config, &range).await?;
    }

    let osm = match fetch_places(&config, &range).await {
        Ok(osm) => osm,
        Err(e) => {
            warn!("no town labels: {:?}", e);
            None
        }
    };

    let layers = Layers::load(&config, &range.extent(), osm.as_deref())?;
    let style = Style::new(config.tile_server.style);
    let fonts = Fonts::load(config.regular_font.as_deref(), config.bold_font.as_deref());
    let icon = waypoint_icon(config.waypoint_icon.as_deref(), &style)
        .context("failed loading the waypoint icon")?;
    let provider = CacheTileProvider::new(&config.cache_dir, &config.tile_server.handle);

    let map = render(&range, &provider, &style, &fonts, &layers, &icon);

    let output = config.output_path();
    let html = waypoints_html(&layers.gpx, &output, config.margin_mm);

    if config.dry_run {
        println!("{}", html);
        return Ok(());
    }

    DynamicImage::ImageRgba8(map)
        .into_rgb8()
        .save(&output)
        .with_context(|| format!("failed writing map to {}", output.display()))?;

    let html_path = config.html_path();
    fs::write(&html_path, html)
        .with_context(|| format!("failed writing {}", html_path.display()))?;

    info!("wrote {} and {}", output.display(), html_path.display());

    Ok(())
}
