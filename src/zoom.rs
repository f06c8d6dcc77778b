//! Picks the most detailed zoom level whose tiles fit onto a page.

use log::debug;

use crate::bounding_box::BoundingBox;
use crate::paper::Orientation;

/// Highest zoom level tried, the common ceiling of public tile servers.
pub const MAX_ZOOM: u8 = 18;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ZoomChoice {
    pub zoom: u8,
    pub landscape: bool,
}

/// Searches zoom levels from [`MAX_ZOOM`] down to 0 and returns the first one
/// whose tile range fits into `page_width` by `page_height` tiles, either
/// upright or, if that doesn't fit, rotated. Portrait wins when both fit.
///
/// Returns `None` if not even zoom level 0 fits.
///
/// # Example
/// ```rust
/// # use tripmap::{select_zoom, BoundingBox, Orientation};
/// let bbox = BoundingBox::new(34.85, -112.23, 40.67, -104.58).unwrap();
/// let choice = select_zoom(&bbox, 40.0, 56.0, Orientation::Any).unwrap();
/// assert!(choice.zoom <= 18);
/// ```
pub fn select_zoom(
    bbox: &BoundingBox,
    page_width: f64,
    page_height: f64,
    orientation: Orientation,
) -> Option<ZoomChoice> {
    (0..=MAX_ZOOM).rev().find_map(|zoom| {
        let range = bbox.tile_range(zoom);
        debug!(
            "zoom {}: {}x{} tiles for a {:.2}x{:.2} page",
            zoom, range.num_x, range.num_y, page_width, page_height
        );

        if orientation.allows_portrait() && range.fits(page_width, page_height) {
            Some(ZoomChoice {
                zoom,
                landscape: false,
            })
        } else if orientation.allows_landscape() && range.fits(page_height, page_width) {
            Some(ZoomChoice {
                zoom,
                landscape: true,
            })
        } else {
            None
        }
    })
}
