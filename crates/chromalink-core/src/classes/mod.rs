//! Color classes and their HSV ranges

pub mod class;
pub mod range;
pub mod registry;

pub use class::{ClassSpec, ColorClass};
pub use range::{ColorRange, HsvTriple, RangeSpec};
pub use registry::{builtin_specs, ClassRegistry};

/// Largest hue value in the 8-bit HSV convention (degrees / 2).
pub const HUE_MAX: u8 = 180;
