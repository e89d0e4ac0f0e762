//! HSV bounds

use super::HUE_MAX;
use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};

/// One hue/saturation/value sample in the 8-bit convention.
///
/// Hue spans `0..=180` (degrees halved), saturation and value span `0..=255`.
/// Serialized as a `[h, s, v]` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct HsvTriple {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl HsvTriple {
    pub const fn new(h: u8, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }
}

impl From<[u8; 3]> for HsvTriple {
    fn from([h, s, v]: [u8; 3]) -> Self {
        Self { h, s, v }
    }
}

impl From<HsvTriple> for [u8; 3] {
    fn from(t: HsvTriple) -> Self {
        [t.h, t.s, t.v]
    }
}

/// Raw range as written in a configuration file, not yet validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeSpec {
    pub lower: HsvTriple,
    pub upper: HsvTriple,
}

impl RangeSpec {
    pub const fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self {
            lower: HsvTriple::new(lower[0], lower[1], lower[2]),
            upper: HsvTriple::new(upper[0], upper[1], upper[2]),
        }
    }
}

/// Validated inclusive HSV box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorRange {
    lower: HsvTriple,
    upper: HsvTriple,
}

impl ColorRange {
    /// Validate `spec` as range number `index` of `class`.
    pub fn try_from_spec(
        class: &str,
        index: usize,
        spec: RangeSpec,
    ) -> Result<Self, ConfigurationError> {
        let RangeSpec { lower, upper } = spec;

        for value in [lower.h, upper.h] {
            if value > HUE_MAX {
                return Err(ConfigurationError::HueOutOfDomain {
                    class: class.to_string(),
                    index,
                    value,
                });
            }
        }

        let channels = [
            ("hue", lower.h, upper.h),
            ("saturation", lower.s, upper.s),
            ("value", lower.v, upper.v),
        ];
        for (channel, lo, hi) in channels {
            if lo > hi {
                return Err(ConfigurationError::InvertedRange {
                    class: class.to_string(),
                    index,
                    channel,
                    lower: lo,
                    upper: hi,
                });
            }
        }

        if lower.h == HUE_MAX {
            return Err(ConfigurationError::EmptyHueBand {
                class: class.to_string(),
                index,
            });
        }

        Ok(Self { lower, upper })
    }

    pub fn lower(&self) -> HsvTriple {
        self.lower
    }

    pub fn upper(&self) -> HsvTriple {
        self.upper
    }

    /// Inclusive membership test on all three channels.
    #[inline]
    pub fn contains(&self, h: u8, s: u8, v: u8) -> bool {
        (self.lower.h..=self.upper.h).contains(&h)
            && (self.lower.s..=self.upper.s).contains(&s)
            && (self.lower.v..=self.upper.v).contains(&v)
    }
}
