use crate::frame::InputShapeError;
use std::path::PathBuf;
use thiserror::Error;

/// A frame source failed to deliver.
#[derive(Error, Debug)]
pub enum AcquisitionError {
    #[error("Frame source {path:?} is not readable: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to decode frame {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Capture device error: {0}")]
    Device(String),
    #[error("Malformed frame: {0}")]
    Shape(#[from] InputShapeError),
}
