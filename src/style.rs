//! Overlay styles: line widths and colours per road class, fonts and marker
//! sizes per place class.

use image::Rgba;
use log::warn;
use std::fmt;

/// Classification of a road segment (and of GPX tracks).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum RoadClass {
    Interstate,
    Federal,
    State,
    Other,
    Track,
}

impl RoadClass {
    pub const COUNT: usize = 5;

    /// Looks up a road class by its shapefile name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Interstate" => Some(RoadClass::Interstate),
            "Federal" => Some(RoadClass::Federal),
            "State" => Some(RoadClass::State),
            "Other" => Some(RoadClass::Other),
            "Track" => Some(RoadClass::Track),
            _ => None,
        }
    }

    /// Like [`RoadClass::from_name`], but falls back to `Other` for unknown
    /// names.
    pub fn classify(name: &str) -> Self {
        match Self::from_name(name) {
            Some(class) => class,
            None => {
                warn!("missing style for road class `{}`, using `Other`", name);
                RoadClass::Other
            }
        }
    }
}

/// Priority tier of a place label. The declaration order is the drawing order.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum PlaceClass {
    Capital,
    City,
    Town,
}

impl PlaceClass {
    pub const COUNT: usize = 3;
}

impl fmt::Display for PlaceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlaceClass::Capital => "capital",
            PlaceClass::City => "city",
            PlaceClass::Town => "town",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FontWeight {
    Regular,
    Bold,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontSpec {
    pub weight: FontWeight,
    pub size: f32,
}

/// A halo drawn underneath a line, `extra_width` pixels wider on each side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Outline {
    pub extra_width: u32,
    pub color: Rgba<u8>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineStyle {
    pub width: u32,
    pub color: Rgba<u8>,
    pub outline: Option<Outline>,
}

impl LineStyle {
    const fn plain(width: u32, color: Rgba<u8>) -> Self {
        Self {
            width,
            color,
            outline: None,
        }
    }

    const fn outlined(width: u32, color: Rgba<u8>, outline: Rgba<u8>) -> Self {
        Self {
            width,
            color,
            outline: Some(Outline {
                extra_width: 1,
                color: outline,
            }),
        }
    }

    /// Total width of the outline pass, if any.
    pub fn outline_width(&self) -> Option<u32> {
        self.outline.map(|o| self.width + 2 * o.extra_width)
    }
}

/// Enhancement factors applied to the stitched base map; 1.0 leaves the
/// image unchanged.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorAdjust {
    pub saturation: f32,
    pub contrast: f32,
    pub brightness: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaypointColors {
    pub background: Rgba<u8>,
    pub background_alpha: u8,
    pub text: Rgba<u8>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StyleId {
    Default,
    Stamen,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Style {
    place_fonts: [FontSpec; PlaceClass::COUNT],
    marker_sizes: [u32; PlaceClass::COUNT],
    lines: [LineStyle; RoadClass::COUNT],
    pub waypoint_font: FontSpec,
    pub waypoint_colors: WaypointColors,
    pub label_color: Rgba<u8>,
    pub color_adjust: Option<ColorAdjust>,
}

const fn rgb(r: u8, g: u8, b: u8) -> Rgba<u8> {
    Rgba([r, g, b, 255])
}

const WHITE: Rgba<u8> = rgb(0xFF, 0xFF, 0xFF);
const BLACK: Rgba<u8> = rgb(0, 0, 0);
const TRACK_COLOR: Rgba<u8> = rgb(0xFF, 0x55, 0x00);

impl Style {
    pub fn new(id: StyleId) -> Self {
        let default = Style {
            place_fonts: [
                FontSpec {
                    weight: FontWeight::Bold,
                    size: 56.0,
                },
                FontSpec {
                    weight: FontWeight::Bold,
                    size: 44.0,
                },
                FontSpec {
                    weight: FontWeight::Regular,
                    size: 44.0,
                },
            ],
            marker_sizes: [14, 10, 8],
            lines: [
                LineStyle::plain(5, rgb(0x87, 0xCE, 0xFA)),
                LineStyle::plain(5, rgb(0xB8, 0xB8, 0xB8)),
                LineStyle::plain(5, rgb(0xC8, 0xC8, 0xC8)),
                LineStyle::plain(5, rgb(0xC8, 0xC8, 0xC8)),
                LineStyle::plain(6, TRACK_COLOR),
            ],
            waypoint_font: FontSpec {
                weight: FontWeight::Bold,
                size: 48.0,
            },
            waypoint_colors: WaypointColors {
                background: TRACK_COLOR,
                background_alpha: 192,
                text: rgb(0xFF, 0x00, 0x00),
            },
            label_color: BLACK,
            color_adjust: None,
        };

        match id {
            StyleId::Default => default,
            StyleId::Stamen => Style {
                lines: [
                    LineStyle::outlined(6, rgb(0xA0, 0xD0, 0xA0), rgb(0xB0, 0xF0, 0xB0)),
                    LineStyle::outlined(6, rgb(0xE8, 0xA8, 0xA8), rgb(0xFF, 0xB0, 0xFF)),
                    LineStyle::outlined(6, rgb(0xB0, 0xB0, 0xB0), WHITE),
                    LineStyle::outlined(6, rgb(0xB0, 0xB0, 0xB0), WHITE),
                    LineStyle::outlined(7, TRACK_COLOR, rgb(0xFF, 0x00, 0x00)),
                ],
                color_adjust: Some(ColorAdjust {
                    saturation: 1.0,
                    contrast: 0.4,
                    brightness: 1.15,
                }),
                ..default
            },
        }
    }

    pub fn line(&self, class: RoadClass) -> &LineStyle {
        &self.lines[class as usize]
    }

    pub fn font(&self, class: PlaceClass) -> FontSpec {
        self.place_fonts[class as usize]
    }

    pub fn marker_size(&self, class: PlaceClass) -> u32 {
        self.marker_sizes[class as usize]
    }
}

impl Default for Style {
    fn default() -> Self {
        Style::new(StyleId::Default)
    }
}
