//! Media configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. A site's file is
//! layered over the stock defaults, so it only needs the keys it changes.
//!
//! ## Configuration Options
//!
//! ```toml
//! # Global breakpoint catalogue: name → activation width in pixels.
//! # A site's table REPLACES the stock one instead of merging into it.
//! [breakpoints]
//! xs = 320
//! sm = 576
//! md = 768
//! lg = 992
//! xl = 1200
//!
//! [media]
//! base_url = "/media"                 # Prefix for generated media URLs
//!
//! [placeholder]
//! base_url = "https://placehold.it"   # Editor placeholder service
//!
//! # Named presets. `default` is required and supplies field fallbacks.
//! [presets.default]
//! mode = "rc"
//! resolutions = ["1x", "2x"]
//!
//! [presets.hero]
//! size = "1600x600"
//! mode = "fill"
//! fill = "#000000"
//!
//! [presets.hero.breakpoints]
//! xs = { size = "480x480", mode = "c" }
//! sm = "xs"                           # alias for another entry in this table
//! ```
//!
//! Preset tables merge key by key. Overriding `presets.default.mode` keeps
//! the stock `resolutions`. Unknown keys are rejected to catch typos early.

use crate::preset::{BreakpointTable, DEFAULT_PRESET, PresetRegistry};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Media configuration loaded from `config.toml`.
///
/// Every section is optional in user files; missing ones come from the
/// stock defaults via [`load_config`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MediaConfig {
    /// Breakpoint name → activation width, in ascending width order.
    pub breakpoints: BreakpointTable,
    /// Named presets, including the required `default`.
    pub presets: PresetRegistry,
    /// Media URL settings.
    pub media: MediaUrlConfig,
    /// Editor placeholder settings.
    pub placeholder: PlaceholderConfig,
}

impl MediaConfig {
    /// Stock configuration with no site overrides.
    pub fn stock() -> Result<Self, ConfigError> {
        resolve_config(stock_defaults_value()?, None)
    }

    /// Validate the configuration as a whole.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.breakpoints.is_empty() {
            return Err(ConfigError::Validation(
                "breakpoints must not be empty".into(),
            ));
        }
        if let Some((name, _)) = self.breakpoints.iter().find(|(_, width)| *width == 0) {
            return Err(ConfigError::Validation(format!(
                "breakpoints.{name} must be a non-zero width"
            )));
        }
        if !self.presets.contains(DEFAULT_PRESET) {
            return Err(ConfigError::Validation(format!(
                "presets.{DEFAULT_PRESET} is required"
            )));
        }
        if self.media.base_url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "media.base_url must not be empty".into(),
            ));
        }
        if self.placeholder.base_url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "placeholder.base_url must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Media URL settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MediaUrlConfig {
    /// Prefix of every generated media URL.
    pub base_url: String,
}

impl Default for MediaUrlConfig {
    fn default() -> Self {
        Self {
            base_url: "/media".to_string(),
        }
    }
}

/// Editor placeholder settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlaceholderConfig {
    /// Placeholder image service; the size is appended as a path segment.
    pub base_url: String,
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://placehold.it".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// Parsed from [`stock_config_toml`], so the documented file and the
/// defaults cannot drift apart.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::from_str(stock_config_toml())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge a site config over a base config.
///
/// Same as [`merge_toml`] except that a `[breakpoints]` table in the overlay
/// replaces the base table wholesale, so a site can drop stock breakpoints.
pub fn merge_config(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(mut overlay_table)) => {
            if let Some(breakpoints) = overlay_table.remove("breakpoints") {
                base_table.insert("breakpoints".to_string(), breakpoints);
            }
            merge_toml(
                toml::Value::Table(base_table),
                toml::Value::Table(overlay_table),
            )
        }
        (_, overlay) => overlay,
    }
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<MediaConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_config(base, ov),
        None => base,
    };
    let config: MediaConfig = merged.try_into()?;
    config.validate()?;
    tracing::debug!(
        presets = config.presets.len(),
        breakpoints = config.breakpoints.len(),
        "media config resolved"
    );
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<MediaConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command and as the base layer of every load.
pub fn stock_config_toml() -> &'static str {
    r##"# Picture Presets Configuration
# ============================
# All settings are optional. Values shown below are the defaults.
# Each site config only needs the keys it wants to override.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Breakpoints
# ---------------------------------------------------------------------------
# Breakpoint name -> activation width in pixels. Every responsive picture
# produces one <source> per breakpoint, in ascending width order.
# A [breakpoints] table in a site config replaces this one entirely.
[breakpoints]
xs = 320
sm = 576
md = 768
lg = 992
xl = 1200

# ---------------------------------------------------------------------------
# Media URLs
# ---------------------------------------------------------------------------
[media]
# URLs are built as {base_url}/{mode}/{size}[/{fill}]/{path}
base_url = "/media"

# ---------------------------------------------------------------------------
# Editor placeholder
# ---------------------------------------------------------------------------
[placeholder]
# Shown in edit mode while no image is bound: {base_url}/{size}
base_url = "https://placehold.it"

# ---------------------------------------------------------------------------
# Presets
# ---------------------------------------------------------------------------
# Fields: mode, size, fill, resolutions, breakpoints, max_width.
# Modes: o (original), fill, e (exact), rc (fit), p (portrait),
#        l (landscape), a (auto), c (crop).
# Sizes: "WxH", a single number (square), or [W, H].
#
# Fields missing on a preset fall back to presets.default.
[presets.default]
mode = "rc"
resolutions = ["1x", "2x"]

# Example:
#
# [presets.hero]
# size = "1600x600"
# mode = "fill"
# fill = "#000000"
#
# [presets.hero.breakpoints]
# xs = { size = "480x480", mode = "c" }
# sm = "xs"
"##
}
