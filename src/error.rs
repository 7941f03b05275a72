use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort the whole run. Per-image problems (a missing source
/// file, an annotation with an unmapped category) are handled in place and
/// never surface here.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("image {id} has non-positive dimensions {width}x{height}")]
    InvalidImageDimensions { id: i64, width: u32, height: u32 },

    #[error("image dimensions must be strictly positive, got {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
