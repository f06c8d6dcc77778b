use anyhow::{Context, Result};
use log::debug;
use reqwest::StatusCode;
use std::{fmt, path::Path, time::Duration};
use tokio::fs;

use crate::fetch::BACKOFF_DELAY;
use crate::projection::{geo_to_tile, GeoPoint, PixelCoordinate, TILE_SIZE};
use crate::provider::tile_cache_path;
use crate::tileserver::TileServer;

/// An OSM slippy-map tile with x, y and z-coordinate.
/// ref: https://wiki.openstreetmap.org/wiki/Slippy_map_tilenames
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Tile {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

impl Tile {
    pub fn new(x: u32, y: u32, z: u8) -> Self {
        Self { x, y, z }
    }

    /// The tile containing `point` at `zoom`, clamped onto the tile grid.
    pub fn from_geo(point: GeoPoint, zoom: u8) -> Self {
        let (x, y) = geo_to_tile(point.lat, point.lon, zoom, 1.0);
        let max = (1_i64 << zoom) - 1;

        Self::new(x.max(0).min(max) as u32, y.max(0).min(max) as u32, zoom)
    }

    /// Absolute pixel position of the tile's top-left corner.
    pub fn pixel_origin(&self) -> PixelCoordinate {
        let edge = i64::from(TILE_SIZE);
        PixelCoordinate::new(i64::from(self.x) * edge, i64::from(self.y) * edge)
    }

    /// Downloads the tile into the cache below `cache_dir`, unless it's
    /// already there.
    pub async fn fetch_into(
        &self,
        client: &reqwest::Client,
        server: &TileServer,
        cache_dir: &Path,
    ) -> Result<()> {
        let output_file = tile_cache_path(cache_dir, &server.handle, self);

        if output_file.exists() {
            return Ok(());
        }

        if let Some(parent) = output_file.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed creating cache directory for tile {}", self))?;
        }

        let formatted_url = server.url.tile_url(self)?;
        debug!("fetching tile {} from {}", self, formatted_url);

        let body = loop {
            let raw_response = client
                .get(&formatted_url)
                .send()
                .await
                .with_context(|| format!("failed fetching tile {}", self))?;

            if raw_response.status() == StatusCode::TOO_MANY_REQUESTS {
                let retry_after = raw_response
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|val| val.parse::<u64>().ok())
                    .map(Duration::from_secs)
                    .unwrap_or(BACKOFF_DELAY);

                tokio::time::sleep(retry_after).await;
                continue;
            }

            break raw_response
                .error_for_status()
                .with_context(|| format!("received invalid status code fetching tile {}", self))?
                .bytes()
                .await
                .with_context(|| format!("failed reading tile {}", self))?;
        };

        // the decoder sniffs the format later, so reject anything that isn't an image now
        image::guess_format(&body)
            .with_context(|| format!("tile {} is not an image", self))?;

        fs::write(&output_file, &body)
            .await
            .with_context(|| format!("failed writing tile {} to the cache", self))?;

        Ok(())
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_index() {
        let tile = Tile::from_geo(GeoPoint::new(50.7929, 6.0402).unwrap(), 18);
        assert_eq!((tile.x, tile.y), (135470, 87999));
    }

    #[test]
    fn clamps_to_grid() {
        let east = Tile::from_geo(GeoPoint::new(0.0, 180.0).unwrap(), 3);
        assert_eq!(east.x, 7);

        let north = Tile::from_geo(GeoPoint::new(89.9, 0.0).unwrap(), 3);
        assert_eq!(north.y, 0);

        let world = Tile::from_geo(GeoPoint::new(-89.9, 180.0).unwrap(), 0);
        assert_eq!(world, Tile::new(0, 0, 0));
    }

    #[test]
    fn pixel_origin() {
        assert_eq!(
            Tile::new(3, 5, 4).pixel_origin(),
            PixelCoordinate::new(768, 1280)
        );
    }

    #[test]
    fn display() {
        assert_eq!(Tile::new(3, 5, 4).to_string(), "4/3/5");
    }
}
