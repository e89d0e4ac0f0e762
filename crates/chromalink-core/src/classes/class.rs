use super::range::{ColorRange, RangeSpec};
use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};

/// A class entry as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSpec {
    /// Label sent on the wire; defaults to the upper-cased class name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub ranges: Vec<RangeSpec>,
}

impl ClassSpec {
    pub fn new(label: Option<&str>, ranges: Vec<RangeSpec>) -> Self {
        Self {
            label: label.map(str::to_string),
            ranges,
        }
    }
}

/// A named color category: one label, one or more HSV ranges.
///
/// Multiple ranges are unioned by the classifier, which is how colors straddling
/// the hue wrap point (red) are expressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorClass {
    name: String,
    label: String,
    ranges: Vec<ColorRange>,
}

impl ColorClass {
    pub fn try_from_spec(name: &str, spec: ClassSpec) -> Result<Self, ConfigurationError> {
        if spec.ranges.is_empty() {
            return Err(ConfigurationError::EmptyClass {
                class: name.to_string(),
            });
        }

        let label = spec.label.unwrap_or_else(|| name.to_uppercase());
        if !is_wire_safe(&label) {
            return Err(ConfigurationError::InvalidLabel {
                class: name.to_string(),
                label,
            });
        }

        let ranges = spec
            .ranges
            .into_iter()
            .enumerate()
            .map(|(index, range)| ColorRange::try_from_spec(name, index, range))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: name.to_string(),
            label,
            ranges,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn ranges(&self) -> &[ColorRange] {
        &self.ranges
    }

    /// True if any of the class ranges holds the sample.
    #[inline]
    pub fn matches(&self, h: u8, s: u8, v: u8) -> bool {
        self.ranges.iter().any(|r| r.contains(h, s, v))
    }
}

fn is_wire_safe(label: &str) -> bool {
    !label.is_empty()
        && label
            .chars()
            .all(|c| c.is_ascii() && !matches!(c, ',' | '\r' | '\n'))
}
