//! Shared test utilities.
//!
//! Provides fixture builders for registries and breakpoint tables, a media
//! URL function that encodes its arguments verbatim, and an in-memory
//! [`ContentBinder`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let registry = registry_from_toml("[default]\nmode = \"rc\"");
//! let table = breakpoints(&[("sm", 480), ("md", 768)]);
//! let resolved = resolve("default", &PresetOverrides::default(), &registry, &table).unwrap();
//!
//! let sets = build_srcsets("img/1.jpg", &resolved, &recording_media_url);
//! assert_eq!(sets[0].url("1x"), Some("img/1.jpg|0x0|o|-?src=480w&res=1x"));
//! ```

use std::collections::HashMap;
use std::sync::Mutex;

use crate::binding::{BoundAsset, ContentBinder, ContentKind};
use crate::preset::{BreakpointTable, PresetRegistry};
use crate::resolutions::{Density, normalize_resolutions, raw_list};
use crate::types::{CropMode, RenderMode, SizeSpec};

// =========================================================================
// Fixture builders
// =========================================================================

/// Parse a `[name]`-keyed TOML document straight into a registry.
pub fn registry_from_toml(toml: &str) -> PresetRegistry {
    toml::from_str(toml).unwrap_or_else(|e| panic!("invalid registry fixture: {e}\n{toml}"))
}

pub fn breakpoints(entries: &[(&str, u32)]) -> BreakpointTable {
    BreakpointTable::new(entries.iter().copied())
}

/// Densities for assertions. Input must already be in ascending order.
pub fn densities(entries: &[&str]) -> Vec<Density> {
    normalize_resolutions(Some(&raw_list(entries)))
}

/// Media URL stand-in: `path|size|mode|fill`, with `-` for absent values.
pub fn recording_media_url(
    path: &str,
    size: Option<&SizeSpec>,
    mode: CropMode,
    fill: Option<&str>,
) -> String {
    format!(
        "{path}|{}|{mode}|{}",
        size.map(|s| s.to_string()).unwrap_or_else(|| "-".into()),
        fill.unwrap_or("-")
    )
}

// =========================================================================
// In-memory binder
// =========================================================================

/// Binder backed by a map. Records every `ensure_binding_exists` call.
///
/// Uses Mutex (not RefCell) so it stays `Sync` like a real store client.
#[derive(Default)]
pub struct MemoryBinder {
    assets: Mutex<HashMap<String, BoundAsset>>,
    ensured: Mutex<Vec<String>>,
}

impl MemoryBinder {
    pub fn with_asset(area: &str, asset: BoundAsset) -> Self {
        let binder = Self::default();
        binder.assets.lock().unwrap().insert(area.to_string(), asset);
        binder
    }

    /// Areas passed to `ensure_binding_exists`, in call order.
    pub fn ensured(&self) -> Vec<String> {
        self.ensured.lock().unwrap().clone()
    }
}

impl ContentBinder for MemoryBinder {
    fn resolve_binding(&self, area: &str, _mode: RenderMode) -> Option<BoundAsset> {
        self.assets.lock().unwrap().get(area).cloned()
    }

    fn ensure_binding_exists(&self, area: &str, _kind: ContentKind) -> Option<BoundAsset> {
        self.ensured.lock().unwrap().push(area.to_string());
        let mut assets = self.assets.lock().unwrap();
        Some(assets.entry(area.to_string()).or_default().clone())
    }
}
