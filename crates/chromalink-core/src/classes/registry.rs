//! Ordered, immutable table of color classes

use super::class::{ClassSpec, ColorClass};
use super::range::RangeSpec;
use crate::error::ConfigurationError;
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

/// Class table as it appears in a TOML document (`[classes.<name>]`).
#[derive(Debug, Deserialize)]
struct ClassFile {
    classes: IndexMap<String, ClassSpec>,
}

/// Color classes in configuration order.
///
/// Built once at startup and never mutated; iteration order is the order the
/// classes were declared, which fixes the order of detections and wire messages.
#[derive(Debug, Clone)]
pub struct ClassRegistry {
    classes: Vec<ColorClass>,
}

impl ClassRegistry {
    /// Validate every entry of an ordered spec table.
    pub fn from_specs(specs: IndexMap<String, ClassSpec>) -> Result<Self, ConfigurationError> {
        if specs.is_empty() {
            return Err(ConfigurationError::EmptyRegistry);
        }

        let classes = specs
            .into_iter()
            .map(|(name, spec)| ColorClass::try_from_spec(&name, spec))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { classes })
    }

    /// Parse a TOML document holding a `classes` table.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigurationError> {
        let file: ClassFile = toml::from_str(text)?;
        Self::from_specs(file.classes)
    }

    /// Load a class table from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigurationError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let registry = Self::from_toml_str(&text)?;
        tracing::info!(
            "Loaded {} color classes from {:?}",
            registry.len(),
            path
        );
        Ok(registry)
    }

    /// Yellow, green, blue and a two-range red labeled `R`.
    pub fn builtin() -> Self {
        Self::from_specs(builtin_specs()).unwrap_or_else(|e| {
            unreachable!("builtin color table is invalid: {e}")
        })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ColorClass> {
        self.classes.iter()
    }

    pub fn as_slice(&self) -> &[ColorClass] {
        &self.classes
    }

    pub fn get(&self, name: &str) -> Option<&ColorClass> {
        self.classes.iter().find(|c| c.name() == name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'a> IntoIterator for &'a ClassRegistry {
    type Item = &'a ColorClass;
    type IntoIter = std::slice::Iter<'a, ColorClass>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// The reference color table, in declaration order.
pub fn builtin_specs() -> IndexMap<String, ClassSpec> {
    let mut specs = IndexMap::new();
    specs.insert(
        "y".to_string(),
        ClassSpec::new(None, vec![RangeSpec::new([20, 100, 100], [30, 255, 255])]),
    );
    specs.insert(
        "g".to_string(),
        ClassSpec::new(None, vec![RangeSpec::new([40, 50, 50], [90, 255, 255])]),
    );
    specs.insert(
        "b".to_string(),
        ClassSpec::new(None, vec![RangeSpec::new([100, 150, 150], [140, 255, 255])]),
    );
    specs.insert(
        "r".to_string(),
        ClassSpec::new(
            Some("R"),
            vec![
                RangeSpec::new([0, 70, 50], [10, 255, 255]),
                RangeSpec::new([170, 70, 50], [180, 255, 255]),
            ],
        ),
    );
    specs
}
