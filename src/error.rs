// Every variant states *where* things went wrong.
// The first four are expected, transient conditions: the public overlay and encode
// APIs turn them into "nothing this cycle" instead of handing them to callers.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The symbol encoder cannot produce this format/payload combination.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// No framing rectangle yet (camera geometry not configured).
    #[error("Framing geometry unavailable")]
    GeometryUnavailable,

    /// The requested raster is smaller than the symbol plus its quiet zone.
    #[error("Dimension {dimension} too small for a {required}px symbol")]
    DimensionTooSmall { dimension: u32, required: u32 },

    /// Nothing to encode.
    #[error("Empty payload")]
    EmptyPayload,

    #[error("Window init error: {0}")]
    WindowInit(String),

    #[error("Window update error: {0}")]
    WindowUpdate(String),

    #[error("Camera init error: {0}")]
    CameraInit(String),

    #[error("Camera frame error: {0}")]
    CameraFrame(String),

    /// Loading a decorative sprite failed.
    #[error("Asset {path}: {source}")]
    Asset {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, Error>;
