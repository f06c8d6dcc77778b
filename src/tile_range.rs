use std::fmt::Debug;

use crate::bounding_box::BoundingBox;
use crate::projection::{tile_to_geo, PixelCoordinate, TILE_SIZE};
use crate::tile::Tile;

/// The rectangle of tiles covering a bounding box at one zoom level.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TileRange {
    pub zoom: u8,
    pub south_west: Tile,
    pub north_east: Tile,
    pub num_x: u32,
    pub num_y: u32,
}

impl TileRange {
    pub fn new(bbox: &BoundingBox, zoom: u8) -> Self {
        let south_west = Tile::from_geo(bbox.south_west(), zoom);
        let north_east = Tile::from_geo(bbox.north_east(), zoom);

        TileRange {
            zoom,
            south_west,
            north_east,
            num_x: diff(north_east.x, south_west.x) + 1,
            num_y: diff(north_east.y, south_west.y) + 1,
        }
    }

    pub fn west(&self) -> u32 {
        self.south_west.x.min(self.north_east.x)
    }

    pub fn east(&self) -> u32 {
        self.south_west.x.max(self.north_east.x)
    }

    pub fn north(&self) -> u32 {
        self.south_west.y.min(self.north_east.y)
    }

    pub fn south(&self) -> u32 {
        self.south_west.y.max(self.north_east.y)
    }

    /// Number of tiles in the range.
    pub fn len(&self) -> usize {
        self.num_x as usize * self.num_y as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the range fits into a page of `max_x` by `max_y` tiles.
    pub fn fits(&self, max_x: f64, max_y: f64) -> bool {
        f64::from(self.num_x) <= max_x && f64::from(self.num_y) <= max_y
    }

    /// Iterates over all tiles row by row, from the north edge to the south
    /// edge and from west to east within a row.
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + Debug {
        let (west, east, zoom) = (self.west(), self.east(), self.zoom);

        (self.north()..=self.south())
            .flat_map(move |y| (west..=east).map(move |x| Tile::new(x, y, zoom)))
    }

    /// Size of the stitched image in pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        (self.num_x * TILE_SIZE, self.num_y * TILE_SIZE)
    }

    /// Absolute pixel position of the north-west corner of the range.
    pub fn pixel_origin(&self) -> PixelCoordinate {
        Tile::new(self.west(), self.north(), self.zoom).pixel_origin()
    }

    /// Pixel offset of `tile` inside the stitched image.
    pub fn offset_of(&self, tile: &Tile) -> (u32, u32) {
        (
            (tile.x - self.west()) * TILE_SIZE,
            (tile.y - self.north()) * TILE_SIZE,
        )
    }

    /// The geographic area covered by the whole tiles of the range.
    pub fn extent(&self) -> BoundingBox {
        let (south, west) = tile_to_geo(
            i64::from(self.west()),
            i64::from(self.south()) + 1,
            self.zoom,
        );
        let (north, east) = tile_to_geo(
            i64::from(self.east()) + 1,
            i64::from(self.north()),
            self.zoom,
        );

        BoundingBox {
            south,
            west,
            north,
            east,
        }
    }
}

fn diff(a: u32, b: u32) -> u32 {
    if a > b {
        a - b
    } else {
        b - a
    }
}
