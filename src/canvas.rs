//! The drawing surface: a stitched map image plus a pen positioned in
//! geographic coordinates.

use image::{imageops, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect as PixelRect;

use crate::labels::Rect;
use crate::projection::{GeoPoint, PixelCoordinate};
use crate::style::{FontSpec, RoadClass, Style};
use crate::text::Fonts;
use crate::tile_range::TileRange;

/// A map image that overlays are drawn onto.
///
/// Positions are given as [`GeoPoint`]s and projected relative to the
/// canvas origin, the absolute pixel coordinate of the image's top-left
/// corner. Lines are drawn with a pen: [`Canvas::move_to`] lifts it,
/// [`Canvas::line_to`] draws from the pen position and advances it.
pub struct Canvas<'a> {
    image: RgbaImage,
    zoom: u8,
    origin: PixelCoordinate,
    cursor: PixelCoordinate,
    history: Vec<Rect>,
    style: &'a Style,
    fonts: &'a Fonts,
}

impl<'a> Canvas<'a> {
    pub fn new(
        image: RgbaImage,
        zoom: u8,
        origin: PixelCoordinate,
        style: &'a Style,
        fonts: &'a Fonts,
    ) -> Self {
        Canvas {
            image,
            zoom,
            origin,
            cursor: PixelCoordinate::default(),
            history: Vec::new(),
            style,
            fonts,
        }
    }

    /// A canvas for an image stitched from `range`.
    pub fn for_range(
        image: RgbaImage,
        range: &TileRange,
        style: &'a Style,
        fonts: &'a Fonts,
    ) -> Self {
        Self::new(image, range.zoom, range.pixel_origin(), style, fonts)
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn origin(&self) -> PixelCoordinate {
        self.origin
    }

    /// Current pen position in canvas pixels.
    pub fn cursor(&self) -> PixelCoordinate {
        self.cursor
    }

    pub fn style(&self) -> &'a Style {
        self.style
    }

    pub fn fonts(&self) -> &'a Fonts {
        self.fonts
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn image_mut(&mut self) -> &mut RgbaImage {
        &mut self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Boxes of all labels and markers placed so far.
    pub fn history(&self) -> &[Rect] {
        &self.history
    }

    pub(crate) fn record(&mut self, rect: Rect) {
        self.history.push(rect);
    }

    /// Canvas pixel position of `point`.
    pub fn to_canvas(&self, point: GeoPoint) -> PixelCoordinate {
        PixelCoordinate::from_geo(point, self.zoom) - self.origin
    }

    /// Moves the pen without drawing.
    pub fn move_to(&mut self, point: GeoPoint) -> &mut Self {
        self.cursor = self.to_canvas(point);
        self
    }

    /// Draws a line in the style of `class` from the pen position to `point`.
    pub fn line_to(&mut self, point: GeoPoint, class: RoadClass) -> &mut Self {
        let line = *self.style.line(class);
        self.stroke_to(point, line.width, line.color)
    }

    /// Draws a line with explicit width and colour from the pen position to
    /// `point`.
    pub fn stroke_to(&mut self, point: GeoPoint, width: u32, color: Rgba<u8>) -> &mut Self {
        let target = self.to_canvas(point);
        draw_thick_line(&mut self.image, self.cursor, target, width, color);
        self.cursor = target;
        self
    }

    /// Draws `points` as one connected line, on top of an outline if the
    /// style of `class` has one. Fewer than two points draw nothing.
    pub fn draw_polyline(&mut self, points: &[GeoPoint], class: RoadClass) {
        if points.len() < 2 {
            return;
        }

        let line = *self.style.line(class);

        if let (Some(outline), Some(width)) = (line.outline, line.outline_width()) {
            self.move_to(points[0]);
            for &point in &points[1..] {
                self.stroke_to(point, width, outline.color);
            }
        }

        self.move_to(points[0]);
        for &point in &points[1..] {
            self.stroke_to(point, line.width, line.color);
        }
    }

    /// Draws a filled circle centred on `point`.
    pub fn draw_marker(&mut self, point: GeoPoint, radius: u32, color: Rgba<u8>) {
        let center = self.to_canvas(point);
        if let Some(center) = clamp_point(center) {
            draw_filled_circle_mut(&mut self.image, center, radius as i32, color);
        }
    }

    /// Sets `text` with its top-left corner at canvas position `x`/`y`.
    pub fn draw_text(&mut self, x: i32, y: i32, spec: FontSpec, color: Rgba<u8>, text: &str) {
        self.fonts.draw(&mut self.image, spec, color, x, y, text);
    }

    /// Pastes `icon` with its bottom-left corner on `point` and, if given,
    /// sets `text` on a translucent box right of the icon.
    pub fn draw_waypoint(&mut self, point: GeoPoint, text: Option<&str>, icon: &RgbaImage) {
        let pos = self.to_canvas(point);
        let x = pos.x;
        let y = pos.y - i64::from(icon.height());

        imageops::overlay(&mut self.image, icon, x, y);

        let text = match text {
            Some(text) if !text.is_empty() => text,
            _ => return,
        };

        let spec = self.style.waypoint_font;
        let colors = self.style.waypoint_colors;
        let (text_width, text_height) = self.fonts.measure(spec, text);

        let bg_x = x + i64::from(icon.width());
        let bg_y = y - i64::from(text_height) - 4;

        let mut background = colors.background;
        background[3] = colors.background_alpha;
        let bg = RgbaImage::from_pixel(text_width + 8, text_height + 8, background);
        imageops::overlay(&mut self.image, &bg, bg_x, bg_y);

        self.draw_text(
            (bg_x + 4) as i32,
            bg_y as i32,
            spec,
            colors.text,
            text,
        );
    }
}

/// A flag-shaped waypoint icon whose pole ends in the bottom-left corner.
pub fn default_waypoint_icon(color: Rgba<u8>) -> RgbaImage {
    let mut icon = RgbaImage::new(32, 40);
    draw_filled_rect_mut(&mut icon, PixelRect::at(0, 0).of_size(3, 40), Rgba([40, 40, 40, 255]));
    draw_filled_rect_mut(&mut icon, PixelRect::at(3, 1).of_size(28, 18), color);
    icon
}

fn clamp_point(p: PixelCoordinate) -> Option<(i32, i32)> {
    let limit = i64::from(i32::MAX / 2);
    if p.x.abs() > limit || p.y.abs() > limit {
        None
    } else {
        Some((p.x as i32, p.y as i32))
    }
}

/// Draws a line of `width` pixels by stamping circles along it.
fn draw_thick_line(
    image: &mut RgbaImage,
    start: PixelCoordinate,
    end: PixelCoordinate,
    width: u32,
    color: Rgba<u8>,
) {
    let margin = i64::from(width);
    let (w, h) = (i64::from(image.width()), i64::from(image.height()));

    // entirely off the canvas
    if (start.x < -margin && end.x < -margin)
        || (start.y < -margin && end.y < -margin)
        || (start.x > w + margin && end.x > w + margin)
        || (start.y > h + margin && end.y > h + margin)
    {
        return;
    }

    let (sx, sy) = (start.x as f32, start.y as f32);
    let (ex, ey) = (end.x as f32, end.y as f32);

    if width <= 1 {
        draw_line_segment_mut(image, (sx, sy), (ex, ey), color);
        return;
    }

    let radius = (width / 2).max(1) as i32;
    let (dx, dy) = (ex - sx, ey - sy);
    let length = (dx * dx + dy * dy).sqrt();

    if length < 0.001 {
        draw_filled_circle_mut(image, (sx as i32, sy as i32), radius, color);
        return;
    }

    let step_size = (radius as f32 * 0.5).max(0.5);
    let num_steps = (length / step_size).ceil() as i32;
    let (step_x, step_y) = (dx * step_size / length, dy * step_size / length);

    for i in 0..=num_steps {
        let t = i as f32;
        let x = sx + t * step_x;
        let y = sy + t * step_y;
        draw_filled_circle_mut(image, (x as i32, y as i32), radius, color);
    }
    draw_filled_circle_mut(image, (ex as i32, ey as i32), radius, color);
}
