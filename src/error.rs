use std::path::PathBuf;

use thiserror::Error;

use crate::pixels::PixelError;

/// Boxed error raised by a [`crate::canvas::Canvas`] implementation.
pub type CanvasFailure = Box<dyn std::error::Error + Send + Sync>;

/// Errors produced while preparing or rendering an image grid.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("label {label} is out of range for a table of {classes} class names")]
    LabelOutOfRange { label: usize, classes: usize },
    #[error("{what} batch has {actual} entries but the image batch has {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("label row {row} has {len} values; nested labels must have shape N×1")]
    NotSingleton { row: usize, len: usize },
    #[error("invalid image at index {index}: {source}")]
    InvalidImage {
        index: usize,
        #[source]
        source: PixelError,
    },
    #[error("at least one class name is required")]
    NoClassNames,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to read batch file at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed batch file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("canvas failed: {0}")]
    Canvas(#[source] CanvasFailure),
}

pub type Result<T> = std::result::Result<T, GridError>;
