//! Composition of a whole map: zoom planning, loading of the overlay data
//! and drawing everything onto the stitched base map.

use image::RgbaImage;
use log::{debug, info, warn};
use std::path::Path;

use crate::bounding_box::BoundingBox;
use crate::canvas::{default_waypoint_icon, Canvas};
use crate::config::Config;
use crate::enhance::adjust_colors;
use crate::error::{Error, Result};
use crate::labels::{place_labels, sort_labels, PlaceRecord};
use crate::paper::Orientation;
use crate::provider::TileProvider;
use crate::sources::{gpx, gpx::GpxData, overpass, roads, roads::RoadSegment};
use crate::stitch::stitch;
use crate::style::{RoadClass, Style};
use crate::text::Fonts;
use crate::tile_range::TileRange;
use crate::zoom::select_zoom;

/// Zoom level, page orientation and tiles of a map.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MapPlan {
    pub zoom: u8,
    pub landscape: bool,
    pub range: TileRange,
}

/// Picks the zoom level for `cfg`: the configured one, or the most detailed
/// one whose tiles fit on the page.
pub fn plan(cfg: &Config) -> Result<MapPlan> {
    let (zoom, landscape) = match cfg.zoom {
        Some(zoom) => (zoom, cfg.orientation == Orientation::Landscape),
        None => {
            let (width, height) = cfg.paper.tile_budget(cfg.dpi, cfg.margin_mm);
            let choice = select_zoom(&cfg.bounding_box, width, height, cfg.orientation)
                .ok_or(Error::NoFittingZoom)?;
            (choice.zoom, choice.landscape)
        }
    };

    Ok(MapPlan {
        zoom,
        landscape,
        range: cfg.bounding_box.tile_range(zoom),
    })
}

/// Everything drawn on top of the base map.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Layers {
    pub roads: Vec<RoadSegment>,
    pub gpx: Vec<GpxData>,
    pub places: Vec<PlaceRecord>,
}

impl Layers {
    /// Reads the roads and GPX files named in `cfg` and parses the Overpass
    /// response `osm`, keeping what lies within `extent`.
    ///
    /// Missing shapefiles and GPX files are skipped, as is place data that
    /// fails to parse.
    pub fn load(cfg: &Config, extent: &BoundingBox, osm: Option<&str>) -> Result<Self> {
        let roads = match &cfg.shapefile {
            Some(path) if path.exists() => roads::read_roads(path, extent)?,
            Some(path) => {
                warn!("shapefile {} does not exist, no roads drawn", path.display());
                Vec::new()
            }
            None => Vec::new(),
        };

        let mut gpx = Vec::with_capacity(cfg.gpx.len());
        for spec in &cfg.gpx {
            if let Some(data) = gpx::read(spec)? {
                gpx.push(data);
            }
        }

        let places = match osm.map(overpass::parse) {
            Some(Ok(places)) => places,
            Some(Err(e)) => {
                warn!("unreadable place data, no town labels: {}", e);
                Vec::new()
            }
            None => Vec::new(),
        };

        debug!(
            "loaded {} roads, {} GPX files and {} places",
            roads.len(),
            gpx.len(),
            places.len()
        );

        Ok(Layers { roads, gpx, places })
    }
}

/// Loads the waypoint icon from `path`, or draws the default flag in the
/// waypoint colour of `style`.
pub fn waypoint_icon(path: Option<&Path>, style: &Style) -> Result<RgbaImage> {
    match path {
        Some(path) => Ok(image::open(path)?.into_rgba8()),
        None => Ok(default_waypoint_icon(style.waypoint_colors.background)),
    }
}

/// Stitches the base map of `range` and draws all `layers` on it: roads,
/// then GPX tracks, then place labels, then waypoints.
pub fn render<P: TileProvider + ?Sized>(
    range: &TileRange,
    provider: &P,
    style: &Style,
    fonts: &Fonts,
    layers: &Layers,
    icon: &RgbaImage,
) -> RgbaImage {
    let mut base = stitch(range, provider);
    if let Some(adjust) = &style.color_adjust {
        adjust_colors(&mut base, adjust);
    }

    let mut canvas = Canvas::for_range(base, range, style, fonts);

    for road in &layers.roads {
        for part in &road.parts {
            canvas.draw_polyline(part, road.class);
        }
    }

    for track in layers.gpx.iter().flat_map(|g| &g.tracks) {
        canvas.draw_polyline(track, RoadClass::Track);
    }

    let labels = sort_labels(&layers.places);
    let placed = place_labels(&mut canvas, &labels);

    let mut waypoints = 0;
    for waypoint in layers.gpx.iter().flat_map(|g| &g.waypoints) {
        canvas.draw_waypoint(waypoint.point, waypoint.name.as_deref(), icon);
        waypoints += 1;
    }

    info!(
        "drew {} roads, {} of {} labels and {} waypoints",
        layers.roads.len(),
        placed,
        labels.len(),
        waypoints
    );

    canvas.into_image()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paper::PaperSize;
    use crate::projection::{GeoPoint, TILE_SIZE};
    use crate::sources::gpx::Waypoint;
    use crate::tile::Tile;
    use image::Rgba;
    use std::time::Duration;

    const PAPER: Rgba<u8> = Rgba([250, 250, 250, 255]);

    fn config() -> Config {
        Config {
            bounding_box: BoundingBox::new(34.85, -112.23, 40.67, -104.58).unwrap(),
            paper: PaperSize::A4,
            dpi: 300,
            margin_mm: 5,
            orientation: Orientation::Any,
            zoom: None,
            dry_run: true,
            tile_server: "wikimedia".parse().unwrap(),
            cache_dir: "cache".into(),
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

    fn blank(_: &Tile) -> Option<RgbaImage> {
        Some(RgbaImage::from_pixel(TILE_SIZE, TILE_SIZE, PAPER))
    }

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    #[test]
    fn plan_searches_zoom() {
        let plan = plan(&config()).unwrap();
        let range = config().bounding_box.tile_range(plan.zoom);
        assert_eq!(plan.range, range);

        let (w, h) = PaperSize::A4.tile_budget(300, 5);
        if plan.landscape {
            assert!(range.fits(h, w));
        } else {
            assert!(range.fits(w, h));
        }

        let closer = config().bounding_box.tile_range(plan.zoom + 1);
        assert!(!closer.fits(w, h) && !closer.fits(h, w));
    }

    #[test]
    fn explicit_zoom_skips_search() {
        let mut cfg = config();
        cfg.zoom = Some(12);
        cfg.orientation = Orientation::Landscape;

        let plan = plan(&cfg).unwrap();
        assert_eq!(plan.zoom, 12);
        assert!(plan.landscape);
        assert_eq!(plan.range, cfg.bounding_box.tile_range(12));
    }

    #[test]
    fn tiny_paper_has_no_zoom() {
        let mut cfg = config();
        cfg.paper = PaperSize::A7;
        cfg.dpi = 10;

        assert!(matches!(plan(&cfg), Err(Error::NoFittingZoom)));
    }

    #[test]
    fn loads_nothing_without_sources() {
        let mut cfg = config();
        cfg.shapefile = Some("/nonexistent/roads.shp".into());
        cfg.gpx = vec!["trk,/nonexistent/trip.gpx".parse().unwrap()];

        let layers = Layers::load(&cfg, &cfg.bounding_box, None).unwrap();
        assert_eq!(layers, Layers::default());
    }

    #[test]
    fn loads_places() {
        let osm = r#"<osm><node lat="35.1983" lon="-111.6513"><tag k="name" v="Flagstaff"/></node></osm>"#;
        let cfg = config();

        let layers = Layers::load(&cfg, &cfg.bounding_box, Some(osm)).unwrap();
        assert_eq!(layers.places.len(), 1);
        assert_eq!(layers.places[0].name, "Flagstaff");
    }

    #[test]
    fn broken_place_data_is_skipped() {
        let cfg = config();
        let osm = r#"<osm><node lat="1" lon="2">"#;

        let layers = Layers::load(&cfg, &cfg.bounding_box, Some(osm)).unwrap();
        assert!(layers.places.is_empty());
    }

    #[test]
    fn default_icon() {
        let style = Style::default();
        let icon = waypoint_icon(None, &style).unwrap();
        assert_eq!(icon.dimensions(), (32, 40));
        assert!(waypoint_icon(Some(Path::new("/nonexistent/icon.png")), &style).is_err());
    }

    #[test]
    fn empty_layers_leave_the_base_map() {
        let range = config().bounding_box.tile_range(5);
        let style = Style::default();
        let icon = waypoint_icon(None, &style).unwrap();

        let image = render(&range, &blank, &style, &Fonts::none(), &Layers::default(), &icon);

        assert_eq!(image.dimensions(), range.pixel_size());
        assert!(image.pixels().all(|p| *p == PAPER));
    }

    #[test]
    fn draws_all_layers() {
        let bbox = config().bounding_box;
        let range = bbox.tile_range(7);
        let style = Style::default();
        let icon = waypoint_icon(None, &style).unwrap();

        let layers = Layers {
            roads: vec![RoadSegment {
                class: RoadClass::Interstate,
                parts: vec![vec![point(35.0, -112.0), point(40.5, -105.0)]],
            }],
            gpx: vec![GpxData {
                title: None,
                tracks: vec![vec![point(40.5, -112.0), point(35.0, -105.0)]],
                waypoints: vec![Waypoint {
                    point: point(37.0, -108.0),
                    name: None,
                    description: None,
                }],
            }],
            places: vec![PlaceRecord {
                name: "Flagstaff".into(),
                point: point(35.1983, -111.6513),
                population: Some("65870".into()),
                place: Some("city".into()),
                capital: false,
            }],
        };

        let image = render(&range, &blank, &style, &Fonts::none(), &layers, &icon);
        let count = |color: Rgba<u8>| image.pixels().filter(|p| **p == color).count();

        assert!(count(style.line(RoadClass::Interstate).color) > 0);
        assert!(count(style.line(RoadClass::Track).color) > 0);
        assert!(count(style.label_color) > 0);
        // the flag pole of the waypoint icon
        assert!(count(Rgba([40, 40, 40, 255])) > 0);
    }

    #[test]
    fn stamen_adjusts_colors() {
        let range = config().bounding_box.tile_range(5);
        let style = Style::new(crate::style::StyleId::Stamen);
        let icon = waypoint_icon(None, &style).unwrap();

        let image = render(&range, &blank, &style, &Fonts::none(), &Layers::default(), &icon);
        assert!(image.pixels().all(|p| *p != PAPER));
    }
}
