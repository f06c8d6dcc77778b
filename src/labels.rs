//! Town and city labels: classification, ordering and collision-avoiding
//! placement.

use log::{debug, warn};
use std::cmp::Reverse;

use crate::canvas::Canvas;
use crate::projection::GeoPoint;
use crate::style::PlaceClass;

/// Gap in pixels between a marker and the label above it.
const LABEL_GAP: f64 = 4.0;

/// An axis-aligned box in canvas pixels, `x1 <= x2` and `y1 <= y2`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Rect {
    /// Creates a box from two opposite corners in any order.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Rect {
            x1: x1.min(x2),
            y1: y1.min(y2),
            x2: x1.max(x2),
            y2: y1.max(y2),
        }
    }

    /// Whether the interiors overlap. Boxes sharing only an edge don't.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x1.max(other.x1) < self.x2.min(other.x2)
            && self.y1.max(other.y1) < self.y2.min(other.y2)
    }
}

/// A place as delivered by a label source, before classification.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaceRecord {
    pub name: String,
    pub point: GeoPoint,
    /// Raw population value, e.g. `19,517 (2010)`.
    pub population: Option<String>,
    /// Value of the `place` tag.
    pub place: Option<String>,
    /// Whether the place carries a `capital` tag.
    pub capital: bool,
}

/// A classified place label.
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    pub text: String,
    pub point: GeoPoint,
    pub class: PlaceClass,
    pub population: u64,
}

impl Label {
    pub fn new(text: impl Into<String>, point: GeoPoint, class: PlaceClass, population: u64) -> Self {
        Label {
            text: text.into(),
            point,
            class,
            population,
        }
    }

    /// Classifies a place: capitals by their `capital` tag, cities by
    /// `place=city`, everything else is a town.
    pub fn from_record(record: &PlaceRecord) -> Self {
        let class = if record.capital {
            PlaceClass::Capital
        } else if record.place.as_deref() == Some("city") {
            PlaceClass::City
        } else {
            PlaceClass::Town
        };

        let population = match record.population.as_deref() {
            None => 0,
            Some(raw) => parse_population(raw).unwrap_or_else(|| {
                warn!("can't parse population `{}` of {}", raw, record.name);
                0
            }),
        };

        Label::new(record.name.clone(), record.point, class, population)
    }
}

/// Reads a population count from free-form OSM values.
///
/// Everything from the first `;`, `(` or `[` on is dropped, then all `,`,
/// `.`, `'` and whitespace. Decimal commas and points are not told apart
/// from digit grouping, so `"1.5"` reads as 15.
///
/// # Example
/// ```rust
/// # use tripmap::parse_population;
/// assert_eq!(parse_population("19,517 (2010)"), Some(19517));
/// assert_eq!(parse_population("12 345 000"), Some(12345000));
/// assert_eq!(parse_population("unknown"), None);
/// ```
pub fn parse_population(raw: &str) -> Option<u64> {
    let head = raw.split(|c| c == ';' || c == '(' || c == '[').next()?;
    let digits: String = head
        .chars()
        .filter(|c| !matches!(c, ',' | '.' | '\'') && !c.is_whitespace())
        .collect();

    digits.parse().ok()
}

/// Classifies places and orders them for placement: capitals, then cities,
/// then towns, each by descending population. Equal populations keep their
/// input order.
pub fn sort_labels(records: &[PlaceRecord]) -> Vec<Label> {
    let mut labels: Vec<Label> = records.iter().map(Label::from_record).collect();
    labels.sort_by_key(|l| (l.class, Reverse(l.population)));
    labels
}

/// Text and marker boxes of a label, plus where its text starts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelBoxes {
    pub text: Rect,
    pub marker: Rect,
    pub text_origin: (f64, f64),
}

/// Computes the boxes of `label` on `canvas`: the marker centred on the
/// point, the text centred above it.
pub fn label_boxes(canvas: &Canvas<'_>, label: &Label) -> LabelBoxes {
    let style = canvas.style();
    let pos = canvas.to_canvas(label.point);
    let (x, y) = (pos.x as f64, pos.y as f64);

    let marker = f64::from(style.marker_size(label.class));
    let (width, height) = canvas.fonts().measure(style.font(label.class), &label.text);
    let (width, height) = (f64::from(width), f64::from(height));

    let text_x = x - width / 2.0;
    let text_y = y - height - marker - LABEL_GAP;

    LabelBoxes {
        text: Rect::new(text_x, text_y, text_x + width, text_y + height),
        marker: Rect::new(x - marker, y - marker, x + marker, y + marker),
        text_origin: (text_x, text_y),
    }
}

/// Places one label unless its text would overlap an earlier label or
/// marker. Capitals are always placed. Returns whether it was drawn.
pub fn place_label(canvas: &mut Canvas<'_>, label: &Label) -> bool {
    let boxes = label_boxes(canvas, label);

    if label.class != PlaceClass::Capital
        && canvas.history().iter().any(|placed| boxes.text.intersects(placed))
    {
        debug!("skipping {} {}, it overlaps another label", label.class, label.text);
        return false;
    }

    let style = canvas.style();
    canvas.draw_text(
        boxes.text_origin.0.floor() as i32,
        boxes.text_origin.1.floor() as i32,
        style.font(label.class),
        style.label_color,
        &label.text,
    );
    canvas.record(boxes.text);

    canvas.draw_marker(label.point, style.marker_size(label.class), style.label_color);
    canvas.record(boxes.marker);

    true
}

/// Places `labels` in the given order, see [`place_label`]. Returns how many
/// were drawn.
pub fn place_labels(canvas: &mut Canvas<'_>, labels: &[Label]) -> usize {
    let placed = labels.iter().filter(|l| place_label(canvas, l)).count();
    debug!("placed {} of {} labels", placed, labels.len());
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::PixelCoordinate;
    use crate::style::Style;
    use crate::text::Fonts;
    use image::RgbaImage;

    fn point() -> GeoPoint {
        GeoPoint::new(37.0, -110.0).unwrap()
    }

    fn canvas<'a>(style: &'a Style, fonts: &'a Fonts) -> Canvas<'a> {
        let zoom = 8;
        let center = PixelCoordinate::from_geo(point(), zoom);
        let origin = PixelCoordinate::new(center.x - 500, center.y - 500);
        Canvas::new(RgbaImage::new(1000, 1000), zoom, origin, style, fonts)
    }

    fn record(name: &str, population: &str) -> PlaceRecord {
        PlaceRecord {
            name: name.to_owned(),
            point: point(),
            population: Some(population.to_owned()),
            place: Some("town".to_owned()),
            capital: false,
        }
    }

    #[test]
    fn edge_contact_is_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 20.0, 10.0);
        let below = Rect::new(0.0, 10.0, 10.0, 20.0);
        let corner = Rect::new(10.0, 10.0, 20.0, 20.0);
        let overlapping = Rect::new(9.5, 9.5, 20.0, 20.0);

        assert!(!a.intersects(&right));
        assert!(!a.intersects(&below));
        assert!(!a.intersects(&corner));
        assert!(a.intersects(&overlapping));
        assert!(overlapping.intersects(&a));
    }

    #[test]
    fn rect_normalizes_corners() {
        assert_eq!(Rect::new(10.0, 5.0, 0.0, -5.0), Rect::new(0.0, -5.0, 10.0, 5.0));
    }

    #[test]
    fn population_formats() {
        assert_eq!(parse_population("19,517 (2010)"), Some(19517));
        assert_eq!(parse_population("1'234'567"), Some(1234567));
        assert_eq!(parse_population("52000;census"), Some(52000));
        assert_eq!(parse_population("8.000 [1]"), Some(8000));
        assert_eq!(parse_population("about 300"), None);
        assert_eq!(parse_population(""), None);
    }

    #[test]
    fn classification() {
        let mut r = record("Phoenix", "1,608,139");
        r.capital = true;
        r.place = Some("city".to_owned());
        assert_eq!(Label::from_record(&r).class, PlaceClass::Capital);

        r.capital = false;
        assert_eq!(Label::from_record(&r).class, PlaceClass::City);

        r.place = Some("town".to_owned());
        let label = Label::from_record(&r);
        assert_eq!(label.class, PlaceClass::Town);
        assert_eq!(label.population, 1608139);
    }

    #[test]
    fn malformed_population_is_zero() {
        assert_eq!(Label::from_record(&record("Tuba City", "n/a")).population, 0);

        let mut r = record("Kayenta", "");
        r.population = None;
        assert_eq!(Label::from_record(&r).population, 0);
    }

    #[test]
    fn sorts_by_class_then_population() {
        let mut capital = record("Santa Fe", "84,683");
        capital.capital = true;
        let mut city = record("Albuquerque", "564,559");
        city.place = Some("city".to_owned());

        let records = vec![
            record("Gallup", "21,899"),
            record("Farmington", "46,624"),
            city,
            record("Tie A", "1000"),
            capital,
            record("Tie B", "1,000"),
        ];

        let names: Vec<String> = sort_labels(&records).into_iter().map(|l| l.text).collect();
        assert_eq!(
            names,
            vec!["Santa Fe", "Albuquerque", "Farmington", "Gallup", "Tie A", "Tie B"]
        );
    }

    #[test]
    fn overlapping_towns_yield_to_the_largest() {
        let (style, fonts) = (Style::default(), Fonts::none());

        let records = vec![record("A", "1000"), record("B", "500"), record("C", "9999")];

        for _ in 0..3 {
            let mut canvas = canvas(&style, &fonts);
            let labels = sort_labels(&records);
            let placed: Vec<&str> = labels
                .iter()
                .filter(|l| place_label(&mut canvas, l))
                .map(|l| l.text.as_str())
                .collect();

            assert_eq!(placed, vec!["C"]);
            assert_eq!(canvas.history().len(), 2);
        }
    }

    #[test]
    fn capitals_are_never_suppressed() {
        let (style, fonts) = (Style::default(), Fonts::none());
        let mut canvas = canvas(&style, &fonts);

        let city = Label::new("Mesa", point(), PlaceClass::City, 500_000);
        let capital = Label::new("Phoenix", point(), PlaceClass::Capital, 1_600_000);
        let town = Label::new("Tempe", point(), PlaceClass::Town, 180_000);

        assert!(place_label(&mut canvas, &city));
        assert!(place_label(&mut canvas, &capital));
        assert_eq!(canvas.history().len(), 4);

        assert!(!place_label(&mut canvas, &town));
        assert_eq!(canvas.history().len(), 4);
    }

    #[test]
    fn distant_labels_both_fit() {
        let (style, fonts) = (Style::default(), Fonts::none());
        let mut canvas = canvas(&style, &fonts);

        let labels = vec![
            Label::new("Page", GeoPoint::new(37.0, -110.0).unwrap(), PlaceClass::Town, 7_000),
            Label::new("Cortez", GeoPoint::new(36.0, -109.0).unwrap(), PlaceClass::Town, 9_000),
        ];

        assert_eq!(place_labels(&mut canvas, &labels), 2);
        assert_eq!(canvas.history().len(), 4);
    }

    #[test]
    fn marker_is_drawn() {
        let (style, fonts) = (Style::default(), Fonts::none());
        let mut canvas = canvas(&style, &fonts);

        let label = Label::new("Page", point(), PlaceClass::Town, 7_000);
        assert!(place_label(&mut canvas, &label));

        let p = canvas.to_canvas(point());
        assert_eq!(*canvas.image().get_pixel(p.x as u32, p.y as u32), style.label_color);
    }

    #[test]
    fn text_sits_above_marker() {
        let (style, fonts) = (Style::default(), Fonts::none());
        let canvas = canvas(&style, &fonts);

        let label = Label::new("Page", point(), PlaceClass::Town, 7_000);
        let boxes = label_boxes(&canvas, &label);

        assert!(boxes.text.y2 <= boxes.marker.y1);
        assert!(!boxes.text.intersects(&boxes.marker));
        let center = (boxes.text.x1 + boxes.text.x2) / 2.0;
        assert!((center - (boxes.marker.x1 + boxes.marker.x2) / 2.0).abs() < 1e-9);
    }
}
