use image::{imageops, RgbaImage};
use log::{info, warn};

use crate::provider::TileProvider;
use crate::tile_range::TileRange;

/// Composes the tiles of `range` into one image.
///
/// Tiles the provider can't deliver are left transparent; a missing tile
/// never aborts the composition.
pub fn stitch<P: TileProvider + ?Sized>(range: &TileRange, provider: &P) -> RgbaImage {
    let (width, height) = range.pixel_size();
    let mut image = RgbaImage::new(width, height);
    let mut missing = 0;

    for tile in range.tiles() {
        let (x, y) = range.offset_of(&tile);

        match provider.fetch(&tile) {
            Some(tile_image) => {
                imageops::replace(&mut image, &tile_image, i64::from(x), i64::from(y))
            }
            None => {
                warn!("can't read tile {}", tile);
                missing += 1;
            }
        }
    }

    info!(
        "stitched {} of {} tiles into a {}x{} image",
        range.len() - missing,
        range.len(),
        width,
        height
    );

    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounding_box::BoundingBox;
    use crate::projection::TILE_SIZE;
    use crate::tile::Tile;
    use image::Rgba;

    fn tile_color(tile: &Tile) -> Rgba<u8> {
        Rgba([(tile.x % 256) as u8, (tile.y % 256) as u8, 200, 255])
    }

    fn three_by_two() -> TileRange {
        // zoom 3 tiles are 45° wide; this spans columns 1..=3 and rows 3..=4
        let bbox = BoundingBox::new(-30.0, -120.0, 30.0, -10.0).unwrap();
        let range = bbox.tile_range(3);
        assert_eq!((range.num_x, range.num_y), (3, 2));
        range
    }

    #[test]
    fn leaves_gap_for_missing_tile() {
        let range = three_by_two();
        let missing = Tile::new(range.west() + 1, range.south(), 3);

        let provider = |tile: &Tile| {
            if *tile == missing {
                None
            } else {
                Some(RgbaImage::from_pixel(TILE_SIZE, TILE_SIZE, tile_color(tile)))
            }
        };

        let image = stitch(&range, &provider);
        assert_eq!(image.dimensions(), (3 * TILE_SIZE, 2 * TILE_SIZE));

        for tile in range.tiles() {
            let (x, y) = range.offset_of(&tile);
            for &(dx, dy) in &[(0, 0), (TILE_SIZE - 1, TILE_SIZE - 1), (17, 200)] {
                let pixel = *image.get_pixel(x + dx, y + dy);
                if tile == missing {
                    assert_eq!(pixel, Rgba([0, 0, 0, 0]));
                } else {
                    assert_eq!(pixel, tile_color(&tile));
                }
            }
        }
    }

    #[test]
    fn all_tiles_missing() {
        let range = three_by_two();
        let provider = |_: &Tile| -> Option<RgbaImage> { None };

        let image = stitch(&range, &provider);
        assert!(image.pixels().all(|p| p[3] == 0));
    }
}
