//! Per-frame color classification

pub mod classifier;
pub mod config;

pub use classifier::{ColorClassifier, Detection};
pub use config::ClassifierParams;
