//! Chromalink Computer Vision Library
//!
//! HSV thresholding and largest-region selection over color classes, plus the
//! collaborator traits the acquisition loop is built from.

pub mod bbox;
pub mod detection;
pub mod error;
pub mod frame;
pub mod hsv;
pub mod mask;
pub mod region;

// Re-export commonly used types
pub use bbox::{BBox, Point};
pub use detection::{ClassifierParams, ColorClassifier, Detection};
pub use error::AcquisitionError;
pub use frame::{ChannelOrder, Frame, InputShapeError};
pub use hsv::HsvImage;

// Error handling
pub type Result<T> = anyhow::Result<T>;

/// Seams between the classifier and the outside world
pub mod traits {
    use super::*;

    /// Whether the acquisition loop should keep going after a frame.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Control {
        Continue,
        Stop,
    }

    /// Produces frames one at a time.
    pub trait FrameSource {
        /// `Ok(None)` signals end-of-stream.
        fn next_frame(&mut self) -> std::result::Result<Option<Frame>, AcquisitionError>;
    }

    /// Consumes the detections of each frame for display.
    pub trait Presenter {
        fn present(&mut self, frame: &Frame, detections: &[Detection]) -> Result<Control>;
    }
}
