//! Chromalink core data
//!
//! Color class definitions shared by the classifier and the acquisition binary.

pub mod classes;
pub mod error;

// Re-export commonly used types
pub use classes::{ClassRegistry, ClassSpec, ColorClass, ColorRange, HsvTriple, RangeSpec};
pub use error::ConfigurationError;
