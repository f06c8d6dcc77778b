use image::{ImageReader, RgbaImage};
use log::{debug, warn};
use std::path::{Path, PathBuf};

use crate::tile::Tile;

/// Source of tile images for the stitcher.
///
/// Returns `None` if the tile is unavailable; the stitcher leaves a gap in
/// that case. Repeated calls for the same tile must yield the same image.
pub trait TileProvider {
    fn fetch(&self, tile: &Tile) -> Option<RgbaImage>;
}

impl<F> TileProvider for F
where
    F: Fn(&Tile) -> Option<RgbaImage>,
{
    fn fetch(&self, tile: &Tile) -> Option<RgbaImage> {
        self(tile)
    }
}

/// Location of a cached tile: `<cache_dir>/<handle>/<z>/<x>/<y>.png`.
pub fn tile_cache_path(cache_dir: &Path, handle: &str, tile: &Tile) -> PathBuf {
    let mut path = cache_dir.join(handle);
    path.push(tile.z.to_string());
    path.push(tile.x.to_string());
    path.push(format!("{}.png", tile.y));
    path
}

/// Serves tiles from the on-disk cache filled by [`crate::fetch_tiles`].
#[derive(Debug, Clone)]
pub struct CacheTileProvider {
    cache_dir: PathBuf,
    handle: String,
}

impl CacheTileProvider {
    pub fn new(cache_dir: impl Into<PathBuf>, handle: impl Into<String>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            handle: handle.into(),
        }
    }
}

impl TileProvider for CacheTileProvider {
    fn fetch(&self, tile: &Tile) -> Option<RgbaImage> {
        let path = tile_cache_path(&self.cache_dir, &self.handle, tile);
        if !path.exists() {
            debug!("tile {} is not cached", tile);
            return None;
        }

        // cached tiles may be JPEGs despite the file name
        let decoded = ImageReader::open(&path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(image::ImageError::from)
            .and_then(|reader| reader.decode());

        match decoded {
            Ok(img) => Some(img.into_rgba8()),
            Err(e) => {
                warn!("can't read tile {} from {}: {}", tile, path.display(), e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_layout() {
        let path = tile_cache_path(Path::new("/cache"), "esri-topo", &Tile::new(12, 34, 7));
        assert_eq!(path, PathBuf::from("/cache/esri-topo/7/12/34.png"));
    }

    #[test]
    fn missing_tile_is_unavailable() {
        let provider = CacheTileProvider::new("/nonexistent/tripmap-cache", "wikimedia");
        assert!(provider.fetch(&Tile::new(0, 0, 0)).is_none());
    }

    #[test]
    fn closures_are_providers() {
        let provider = |tile: &Tile| {
            if tile.x == 0 {
                Some(RgbaImage::new(1, 1))
            } else {
                None
            }
        };
        assert!(provider.fetch(&Tile::new(0, 0, 1)).is_some());
        assert!(provider.fetch(&Tile::new(1, 0, 1)).is_none());
    }
}
