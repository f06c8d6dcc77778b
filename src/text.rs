use ab_glyph::{FontVec, PxScale};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use log::{debug, warn};
use std::{fs, path::Path};

use crate::style::{FontSpec, FontWeight};

/// Where fonts are looked for when none is given explicitly.
const REGULAR_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/cabin/Cabin-Regular.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

const BOLD_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/cabin/Cabin-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans-Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

/// Width of a glyph relative to the font size when no font is available.
const FALLBACK_ADVANCE: f32 = 0.5;

/// Regular and bold typefaces used for labels.
///
/// Without any font file, text extents are estimated from the font size and
/// no text is drawn.
pub struct Fonts {
    regular: Option<FontVec>,
    bold: Option<FontVec>,
}

impl Fonts {
    /// Loads the given font files, or the first installed candidate for those
    /// not given. A missing bold face falls back to the regular one and
    /// vice versa.
    pub fn load(regular: Option<&Path>, bold: Option<&Path>) -> Self {
        let regular = load_font(regular, REGULAR_CANDIDATES);
        let bold = load_font(bold, BOLD_CANDIDATES);

        if regular.is_none() && bold.is_none() {
            warn!("no usable font found, labels will only show markers");
        }

        Fonts { regular, bold }
    }

    /// Estimated metrics only.
    pub fn none() -> Self {
        Fonts {
            regular: None,
            bold: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.regular.is_none() && self.bold.is_none()
    }

    fn face(&self, weight: FontWeight) -> Option<&FontVec> {
        match weight {
            FontWeight::Regular => self.regular.as_ref().or_else(|| self.bold.as_ref()),
            FontWeight::Bold => self.bold.as_ref().or_else(|| self.regular.as_ref()),
        }
    }

    /// Width and height of `text` set in `spec`.
    pub fn measure(&self, spec: FontSpec, text: &str) -> (u32, u32) {
        match self.face(spec.weight) {
            Some(font) => text_size(PxScale::from(spec.size), font, text),
            None => {
                let width = text.chars().count() as f32 * spec.size * FALLBACK_ADVANCE;
                (width.ceil() as u32, spec.size.ceil() as u32)
            }
        }
    }

    /// Draws `text` with its top-left corner at `x`/`y`.
    pub fn draw(
        &self,
        image: &mut RgbaImage,
        spec: FontSpec,
        color: Rgba<u8>,
        x: i32,
        y: i32,
        text: &str,
    ) {
        if let Some(font) = self.face(spec.weight) {
            draw_text_mut(image, color, x, y, PxScale::from(spec.size), font, text);
        }
    }
}

fn load_font(explicit: Option<&Path>, candidates: &[&str]) -> Option<FontVec> {
    let paths: Vec<&Path> = match explicit {
        Some(path) => vec![path],
        None => candidates.iter().map(|c| Path::new(*c)).collect(),
    };

    paths.into_iter().filter(|p| p.exists()).find_map(|path| {
        let data = match fs::read(path) {
            Ok(data) => data,
            Err(e) => {
                warn!("can't read font {}: {}", path.display(), e);
                return None;
            }
        };

        match FontVec::try_from_vec(data) {
            Ok(font) => {
                debug!("using font {}", path.display());
                Some(font)
            }
            Err(e) => {
                warn!("invalid font {}: {}", path.display(), e);
                None
            }
        }
    })
}
