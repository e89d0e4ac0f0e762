use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building the class registry.
///
/// All of them are fatal at startup; nothing here is recovered from.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Failed to read class configuration {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed class configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Class registry is empty")]
    EmptyRegistry,
    #[error("Class '{class}' has no color ranges")]
    EmptyClass { class: String },
    #[error("Class '{class}' range {index}: {channel} lower bound {lower} exceeds upper bound {upper}")]
    InvertedRange {
        class: String,
        index: usize,
        channel: &'static str,
        lower: u8,
        upper: u8,
    },
    #[error("Class '{class}' range {index}: hue {value} is outside 0..={max}", max = crate::classes::HUE_MAX)]
    HueOutOfDomain { class: String, index: usize, value: u8 },
    #[error("Class '{class}' range {index}: lower hue {max} never matches, converted hue folds {max} to 0", max = crate::classes::HUE_MAX)]
    EmptyHueBand { class: String, index: usize },
    #[error("Class '{class}' has an invalid label {label:?} (must be non-empty ASCII without ',' or line breaks)")]
    InvalidLabel { class: String, label: String },
}
