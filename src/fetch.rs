use anyhow::{Context, Result};
use clap::crate_version;
use futures::{prelude::*, stream};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info};
use std::time::Duration;
use tokio::fs;

use crate::config::Config;
use crate::provider::tile_cache_path;
use crate::sources::overpass::{self, OVERPASS_URI};
use crate::tile_range::TileRange;

pub(crate) const BACKOFF_DELAY: Duration = Duration::from_secs(10);
const ZERO_DURATION: Duration = Duration::from_secs(0);

/// Builds the HTTP client used for tiles and place queries.
pub fn http_client(cfg: &Config) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if cfg.timeout > ZERO_DURATION {
        builder = builder.timeout(cfg.timeout);
    }

    let mut headers = reqwest::header::HeaderMap::new();
    headers.append(
        reqwest::header::USER_AGENT,
        reqwest::header::HeaderValue::from_str(&format!("tripmap_rs_{}", crate_version!()))
            .context("invalid user agent")?,
    );

    builder
        .default_headers(headers)
        .build()
        .context("failed creating HTTP client")
}

/// Asynchronously downloads all tiles of `range` that aren't cached yet
/// from the configured tile server.
///
/// Tiles that can't be fetched after all retries are logged and skipped,
/// they'll show up as blank areas on the map.
///
/// # Example
/// ```rust,no_run
/// use std::time::Duration;
/// use tripmap::{fetch_tiles, BoundingBox, Config, Orientation, PaperSize};
///
/// # #[tokio::main]
/// # async fn main() {
/// let config = Config {
///     bounding_box: BoundingBox::new(34.85, -112.23, 40.67, -104.58).unwrap(),
///     paper: PaperSize::A4,
///     dpi: 300,
///     margin_mm: 5,
///     orientation: Orientation::Any,
///     zoom: None,
///     dry_run: false,
///     tile_server: "wikimedia".parse().unwrap(),
///     cache_dir: "./cache".into(),
///     gpx: vec![],
///     shapefile: None,
///     output: "mapfile-{}.jpg".into(),
///     regular_font: None,
///     bold_font: None,
///     waypoint_icon: None,
///     fetch_rate: 5,
///     request_retries_amount: 3,
///     timeout: Duration::from_secs(10),
/// };
///
/// let range = config.bounding_box.tile_range(7);
/// fetch_tiles(&config, &range).await.expect("failed fetching tiles");
/// # }
/// ```
pub async fn fetch_tiles(cfg: &Config, range: &TileRange) -> Result<()> {
    let server = &cfg.tile_server;
    let cache_dir = cfg.cache_dir.as_path();

    let missing: Vec<_> = range
        .tiles()
        .filter(|tile| !tile_cache_path(cache_dir, &server.handle, tile).exists())
        .collect();

    if missing.is_empty() {
        debug!("all {} tiles are cached", range.len());
        return Ok(());
    }

    info!(
        "fetching {} of {} tiles from {}",
        missing.len(),
        range.len(),
        server.url.as_str()
    );

    fs::create_dir_all(cache_dir)
        .await
        .context("failed to create cache directory")?;

    let pb = ProgressBar::new(missing.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:60.cyan/blue} {pos:>7}/{len:7} ETA: {eta} {msg}")
            .progress_chars("##-"),
    );

    let client = http_client(cfg)?;
    let num_retries = cfg.request_retries_amount.max(1);

    let progress_bar = pb.wrap_iter(missing.into_iter());
    let s = stream::iter(progress_bar);
    s.for_each_concurrent(usize::from(cfg.fetch_rate.max(1)), |tile| {
        let http_client = client.clone();

        async move {
            let mut res = Ok(());

            for attempt in 1..=num_retries {
                res = tile.fetch_into(&http_client, server, cache_dir).await;

                if res.is_ok() {
                    return;
                }

                if attempt < num_retries {
                    tokio::time::sleep(BACKOFF_DELAY).await;
                }
            }

            if let Err(e) = res {
                error!("failed fetching tile {}: {:?}", tile, e);
            }
        }
    })
    .await;

    pb.finish_and_clear();

    Ok(())
}

/// Returns the OSM document with all cities and towns within the full
/// extent of `range`.
///
/// Responses are cached in the cache directory. In a dry run, only the
/// cache is consulted and `None` is returned on a miss.
pub async fn fetch_places(cfg: &Config, range: &TileRange) -> Result<Option<String>> {
    let cache_file = cfg.cache_dir.join(overpass::cache_file_name(range));

    if cache_file.exists() {
        debug!("reading places from {}", cache_file.display());
        let data = fs::read_to_string(&cache_file)
            .await
            .with_context(|| format!("failed reading {}", cache_file.display()))?;
        return Ok(Some(data));
    }

    if cfg.dry_run {
        info!("dry run, no cached places for this map");
        return Ok(None);
    }

    let query = overpass::query(&range.extent());
    info!("querying places from {}", OVERPASS_URI);
    debug!("overpass query: {}", query);

    let client = http_client(cfg)?;
    let data = client
        .post(OVERPASS_URI)
        .form(&[("data", query.as_str())])
        .send()
        .await
        .context("failed querying places")?
        .error_for_status()
        .context("received invalid status code querying places")?
        .text()
        .await
        .context("failed reading places")?;

    fs::create_dir_all(&cfg.cache_dir)
        .await
        .context("failed to create cache directory")?;
    fs::write(&cache_file, &data)
        .await
        .with_context(|| format!("failed writing {}", cache_file.display()))?;

    Ok(Some(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounding_box::BoundingBox;
    use crate::paper::{Orientation, PaperSize};

    fn config(cache_dir: std::path::PathBuf) -> Config {
        Config {
            bounding_box: BoundingBox::new(34.85, -112.23, 40.67, -104.58).unwrap(),
            paper: PaperSize::A4,
            dpi: 300,
            margin_mm: 5,
            orientation: Orientation::Any,
            zoom: None,
            dry_run: true,
            tile_server: "wikimedia".parse().unwrap(),
            cache_dir,
            gpx: vec![],
            shapefile: None,
            output: "mapfile-{}.jpg".into(),
            regular_font: None,
            bold_font: None,
            waypoint_icon: None,
            fetch_rate: 5,
            request_retries_amount: 3,
            timeout: Duration::from_secs(10),
        }
    }

    #[test]
    fn builds_client() {
        assert!(http_client(&config("cache".into())).is_ok());
    }

    #[tokio::test]
    async fn dry_run_places_use_cache_only() {
        let dir = std::env::temp_dir().join(format!("tripmap-places-{}", std::process::id()));
        let cfg = config(dir.clone());
        let range = cfg.bounding_box.tile_range(6);

        assert_eq!(fetch_places(&cfg, &range).await.unwrap(), None);

        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("6-12-25-13-24.osm"), "<osm/>").unwrap();
        assert_eq!(
            fetch_places(&cfg, &range).await.unwrap().as_deref(),
            Some("<osm/>")
        );

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn cached_tiles_are_not_fetched() {
        let dir = std::env::temp_dir().join(format!("tripmap-tiles-{}", std::process::id()));
        let cfg = config(dir.clone());
        let range = cfg.bounding_box.tile_range(6);

        for tile in range.tiles() {
            let path = tile_cache_path(&dir, "wikimedia", &tile);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, b"cached").unwrap();
        }

        // completes without touching the network
        fetch_tiles(&cfg, &range).await.unwrap();

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
