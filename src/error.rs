use thiserror::Error;

/// Errors produced by the map composition library.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid bounding box: {0}")]
    InvalidBoundingBox(String),

    #[error("latitude {0}° cannot be projected (must be within (-90°, 90°))")]
    InvalidLatitude(f64),

    #[error("longitude {0} is not a finite number")]
    InvalidLongitude(f64),

    #[error("paper too small, no suitable zoom level found")]
    NoFittingZoom,

    #[error("unknown paper format `{0}`")]
    UnknownPaperSize(String),

    #[error("unknown tile source `{0}`")]
    UnknownTileSource(String),

    #[error("invalid GPX file spec `{0}`, expected [(trk|wpt|any),]file.gpx")]
    InvalidGpxSpec(String),

    #[error("failed parsing XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("failed reading shapefile: {0}")]
    Shapefile(#[from] shapefile::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
