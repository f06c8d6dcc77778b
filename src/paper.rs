use std::{fmt, str::FromStr};

use crate::error::Error;
use crate::projection::TILE_SIZE;

/// ISO 216 A-series paper formats.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PaperSize {
    A0,
    A1,
    A2,
    A3,
    A4,
    A5,
    A6,
    A7,
}

impl PaperSize {
    pub const ALL: &'static [&'static str] = &["A0", "A1", "A2", "A3", "A4", "A5", "A6", "A7"];

    /// Portrait width and height in millimetres.
    pub fn dimensions_mm(self) -> (u32, u32) {
        use PaperSize::*;

        match self {
            A0 => (841, 1189),
            A1 => (594, 841),
            A2 => (420, 594),
            A3 => (297, 420),
            A4 => (210, 297),
            A5 => (148, 210),
            A6 => (105, 148),
            A7 => (74, 105),
        }
    }

    /// Usable portrait size in pixels at `dpi` after subtracting `margin_mm`.
    pub fn pixel_size(self, dpi: u32, margin_mm: u32) -> (u32, u32) {
        let (w, h) = self.dimensions_mm();
        let to_px = |mm: u32| {
            let usable = f64::from(mm) - f64::from(margin_mm);
            (usable / 25.4 * f64::from(dpi)).round().max(0.0) as u32
        };

        (to_px(w), to_px(h))
    }

    /// Usable portrait size in (fractional) tiles.
    pub fn tile_budget(self, dpi: u32, margin_mm: u32) -> (f64, f64) {
        let (w, h) = self.pixel_size(dpi, margin_mm);
        let edge = f64::from(TILE_SIZE);

        (f64::from(w) / edge, f64::from(h) / edge)
    }
}

impl FromStr for PaperSize {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use PaperSize::*;

        match s.to_uppercase().as_str() {
            "A0" => Ok(A0),
            "A1" => Ok(A1),
            "A2" => Ok(A2),
            "A3" => Ok(A3),
            "A4" => Ok(A4),
            "A5" => Ok(A5),
            "A6" => Ok(A6),
            "A7" => Ok(A7),
            _ => Err(Error::UnknownPaperSize(s.to_owned())),
        }
    }
}

impl fmt::Display for PaperSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Which page orientations the zoom search may pick.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Orientation {
    Any,
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn allows_portrait(self) -> bool {
        self != Orientation::Landscape
    }

    pub fn allows_landscape(self) -> bool {
        self != Orientation::Portrait
    }
}
