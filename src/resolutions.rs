//! Pixel-density descriptor lists (`1x`, `2x`, ...).
//!
//! Preset configs carry free-form lists. Normalization keeps only lower-cased
//! strings ending in `x` and orders them by their numeric prefix:
//!
//! - `["3x", "1x", "bogus", "2X"]` → `["1x", "2x", "3x"]`
//! - `["2x", "2x", "1x"]` → `["1x", "2x", "2x"]` (duplicates kept)
//! - `["hdx", "1x"]` → `["hdx", "1x"]` (non-numeric prefix sorts as 0)
//! - absent → `["1x", "2x", "3x"]`

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// One density descriptor as it will appear in a `srcset` candidate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Density(String);

impl Density {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Integer multiplier taken from the leading digits (`"2x"` → 2,
    /// `"1.5x"` → 1, `"hdx"` → 0).
    pub fn factor(&self) -> u32 {
        let digits: String = self.0.chars().take_while(char::is_ascii_digit).collect();
        digits.parse().unwrap_or(0)
    }
}

impl fmt::Display for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Density {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// A list entry as found in config. Anything that is not a string is kept
/// as [`RawResolution::Other`] so it can be discarded during normalization
/// instead of failing the whole config.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawEntry")]
pub enum RawResolution {
    Text(String),
    Other,
}

impl From<&str> for RawResolution {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Text(String),
    Other(serde::de::IgnoredAny),
}

impl From<RawEntry> for RawResolution {
    fn from(raw: RawEntry) -> Self {
        match raw {
            RawEntry::Text(s) => Self::Text(s),
            RawEntry::Other(_) => Self::Other,
        }
    }
}

/// Densities used when a list is absent altogether.
pub const DEFAULT_RESOLUTIONS: [&str; 3] = ["1x", "2x", "3x"];

/// Normalize a raw density list. See the [module docs](self) for the rules.
pub fn normalize_resolutions(raw: Option<&[RawResolution]>) -> Vec<Density> {
    let mut densities: Vec<Density> = match raw {
        Some(entries) => entries
            .iter()
            .filter_map(|entry| match entry {
                RawResolution::Text(text) => Some(text.to_lowercase()),
                RawResolution::Other => None,
            })
            .filter(|text| text.ends_with('x'))
            .map(Density)
            .collect(),
        None => DEFAULT_RESOLUTIONS
            .iter()
            .map(|s| Density((*s).to_string()))
            .collect(),
    };
    // Stable: equal factors keep their input order.
    densities.sort_by_key(Density::factor);
    densities
}

/// Convenience for building raw lists in code.
pub fn raw_list(entries: &[&str]) -> Vec<RawResolution> {
    entries.iter().map(|e| RawResolution::from(*e)).collect()
}
