//! Application configuration

use anyhow::Context;
use chromalink_core::{ClassRegistry, ClassSpec, ConfigurationError};
use chromalink_cv::ClassifierParams;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "config/chromalink.toml";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base tracing filter; `RUST_LOG` takes precedence
    pub log_level: String,
    pub classifier: ClassifierParams,
    pub source: SourceConfig,
    pub presenter: PresenterConfig,
    pub link: LinkConfig,
    /// Class table; the builtin table is used when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classes: Option<IndexMap<String, ClassSpec>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Images,
    Camera,
}

/// Where frames come from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub kind: SourceKind,
    /// Image file or directory for `images`
    pub path: PathBuf,
    /// Device index for `camera`
    pub device: i32,
    /// Stop after this many frames; 0 runs until end-of-stream
    pub max_frames: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenterKind {
    Log,
    Json,
    Window,
}

/// How detections are shown
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenterConfig {
    pub kind: PresenterKind,
}

/// Serial link to the actuator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Serial device; messages are only logged when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    pub baud_rate: u32,
    /// Wait after opening the port while the board resets
    pub settle_ms: u64,
    /// Pause after every message sent
    pub send_delay_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            classifier: ClassifierParams::default(),
            source: SourceConfig::default(),
            presenter: PresenterConfig::default(),
            link: LinkConfig::default(),
            classes: None,
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::Images,
            path: "frames".into(),
            device: 0,
            max_frames: 0,
        }
    }
}

impl Default for PresenterConfig {
    fn default() -> Self {
        Self {
            kind: PresenterKind::Log,
        }
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            port: None,
            baud_rate: 9600,
            settle_ms: 2000,
            send_delay_ms: 500,
        }
    }
}

impl LinkConfig {
    pub fn send_delay(&self) -> Duration {
        Duration::from_millis(self.send_delay_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

impl SourceConfig {
    pub fn frame_limit(&self) -> Option<u64> {
        (self.max_frames > 0).then_some(self.max_frames)
    }
}

impl AppConfig {
    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("Failed to parse configuration")
    }

    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration: {:?}", path))?;

        Self::from_toml_str(&text).with_context(|| format!("Invalid configuration: {:?}", path))
    }

    /// Load `path` if given, else the default file if present, else defaults.
    pub fn resolve(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::load(DEFAULT_CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    /// Validated class registry
    pub fn registry(&self) -> Result<ClassRegistry, ConfigurationError> {
        match &self.classes {
            Some(specs) => ClassRegistry::from_specs(specs.clone()),
            None => Ok(ClassRegistry::builtin()),
        }
    }
}
