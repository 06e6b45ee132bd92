use thiserror::Error;

/// Errors produced while framing a viewport.
///
/// `InvalidCoordinate` is recovered inside the feature collector (the
/// feature is dropped). Every other variant is terminal for the request and
/// its `Display` text is returned to the caller unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewportError {
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("No valid coordinates found")]
    NoValidGeometry,

    #[error("Degenerate bounds: {0}")]
    DegenerateBounds(String),

    #[error("Invalid bbox: {0}")]
    InvalidBbox(String),

    #[error("Invalid canvas: {0}")]
    InvalidCanvas(String),
}

pub type Result<T> = std::result::Result<T, ViewportError>;
