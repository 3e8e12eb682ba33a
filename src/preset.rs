//! Preset resolution.
//!
//! A preset is a named, partially specified rendering template. Resolving one
//! produces a root [`RenderDescriptor`] plus one descriptor per configured
//! breakpoint, with every field concrete.
//!
//! ## Field precedence (root)
//!
//! For `size`, `mode`, `fill` and `resolutions`, highest first:
//!
//! 1. instance override ([`PresetOverrides`])
//! 2. the named preset
//! 3. the registry's `"default"` preset
//! 4. built-in fallback: `mode = rc`, `resolutions = ["1x", "2x"]`, no fill,
//!    no size (which canonicalizes to `0x0`)
//!
//! ## Breakpoints
//!
//! Every key of the global [`BreakpointTable`] yields one descriptor, in
//! table order (ascending width):
//!
//! ```toml
//! [presets.hero.breakpoints]
//! mobile = { size = "100x100" }   # explicit: unset fields inherit from the resolved root
//! tablet = "mobile"               # alias: one lookup in this same map
//! # desktop absent                # synthesized as a copy of the resolved root
//! ```
//!
//! An alias whose target is missing (or is itself an alias) is dropped and
//! that breakpoint does not appear in the output. A breakpoint's `max_width`
//! is its own non-zero `max_width`, otherwise the table width.
//!
//! Whenever a resolved size is `0x0` its mode is `o`, at every level.

use crate::resolutions::{Density, RawResolution, normalize_resolutions, raw_list};
use crate::types::{CropMode, Size, SizeInput};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Registry key every configuration must provide.
pub const DEFAULT_PRESET: &str = "default";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PresetError {
    #[error("unknown media preset '{0}'")]
    UnknownPreset(String),
    #[error("no breakpoints configured; responsive presets need a breakpoint table")]
    BreakpointsMissing,
}

/// A named, partially specified rendering template.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PresetDefinition {
    pub mode: Option<CropMode>,
    pub size: Option<SizeInput>,
    pub fill: Option<String>,
    pub resolutions: Option<Vec<RawResolution>>,
    pub breakpoints: Option<BTreeMap<String, BreakpointEntry>>,
    #[serde(alias = "maxWidth")]
    pub max_width: Option<u32>,
}

/// A per-breakpoint entry inside a preset.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum BreakpointEntry {
    /// Name of another entry in the same breakpoint map.
    Alias(String),
    Inline(PresetDefinition),
}

/// Hard-coded stand-in used when a registry carries no `"default"` preset.
fn builtin_default() -> PresetDefinition {
    PresetDefinition {
        mode: Some(CropMode::Fit),
        resolutions: Some(raw_list(&["1x", "2x"])),
        ..PresetDefinition::default()
    }
}

/// Named presets, read-only while resolving.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct PresetRegistry {
    presets: BTreeMap<String, PresetDefinition>,
}

impl PresetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a preset. Meant for load time, not mid-render.
    pub fn register(&mut self, name: impl Into<String>, preset: PresetDefinition) {
        self.presets.insert(name.into(), preset);
    }

    /// Register a plain record (as found in JSON or TOML) after normalizing
    /// it into a [`PresetDefinition`].
    pub fn register_record(
        &mut self,
        name: impl Into<String>,
        record: serde_json::Value,
    ) -> Result<(), serde_json::Error> {
        let preset: PresetDefinition = serde_json::from_value(record)?;
        self.register(name, preset);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&PresetDefinition> {
        self.presets.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.presets.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// The field-level fallback preset.
    pub fn default_preset(&self) -> Cow<'_, PresetDefinition> {
        match self.presets.get(DEFAULT_PRESET) {
            Some(preset) => Cow::Borrowed(preset),
            None => {
                warn!("preset registry has no '{DEFAULT_PRESET}' entry, using built-in fallback");
                Cow::Owned(builtin_default())
            }
        }
    }
}

impl FromIterator<(String, PresetDefinition)> for PresetRegistry {
    fn from_iter<I: IntoIterator<Item = (String, PresetDefinition)>>(iter: I) -> Self {
        Self {
            presets: iter.into_iter().collect(),
        }
    }
}

/// Global catalogue of breakpoint names and activation widths, kept in
/// ascending width order. Equal widths fall back to name order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "BTreeMap<String, u32>")]
pub struct BreakpointTable {
    entries: Vec<(String, u32)>,
}

impl BreakpointTable {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let mut entries: Vec<(String, u32)> = entries
            .into_iter()
            .map(|(name, width)| (name.into(), width))
            .collect();
        entries.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(name, width)| (name.as_str(), *width))
    }

    pub fn width(&self, name: &str) -> Option<u32> {
        self.iter().find(|(n, _)| *n == name).map(|(_, w)| w)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<BTreeMap<String, u32>> for BreakpointTable {
    fn from(map: BTreeMap<String, u32>) -> Self {
        Self::new(map)
    }
}

/// Instance-level overrides layered over the named preset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresetOverrides {
    pub size: Option<SizeInput>,
    pub mode: Option<CropMode>,
    pub fill: Option<String>,
}

/// Concrete rendering instructions for one breakpoint (or the root).
///
/// Serializes as `{mode, size, fill, maxWidth, resolutions}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderDescriptor {
    pub mode: CropMode,
    pub size: Size,
    pub fill: Option<String>,
    pub max_width: u32,
    pub resolutions: Vec<Density>,
}

impl RenderDescriptor {
    fn new(
        size: Size,
        mode: CropMode,
        fill: Option<String>,
        resolutions: Vec<Density>,
        max_width: u32,
    ) -> Self {
        let mode = if size.is_original() {
            CropMode::Original
        } else {
            mode
        };
        Self {
            mode,
            size,
            fill,
            max_width,
            resolutions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedBreakpoint {
    pub name: String,
    #[serde(flatten)]
    pub descriptor: RenderDescriptor,
}

/// Output of [`resolve`]: the root descriptor and the per-breakpoint
/// descriptors in ascending `max_width` order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPreset {
    pub root: RenderDescriptor,
    pub breakpoints: Vec<ResolvedBreakpoint>,
}

impl ResolvedPreset {
    pub fn breakpoint(&self, name: &str) -> Option<&RenderDescriptor> {
        self.breakpoints
            .iter()
            .find(|bp| bp.name == name)
            .map(|bp| &bp.descriptor)
    }
}

/// Canonical size of a preset-level input. Absent sizes become `0x0`, and a
/// pair with a single zero edge collapses to a square of the other edge.
fn preset_size(input: &SizeInput) -> Size {
    match input {
        SizeInput::Pair(edge, 0) | SizeInput::Pair(0, edge) => Size::square(*edge),
        other => other.to_size(),
    }
}

fn resolve_root(
    preset: &PresetDefinition,
    default: &PresetDefinition,
    overrides: &PresetOverrides,
) -> RenderDescriptor {
    let size = overrides
        .size
        .as_ref()
        .or(preset.size.as_ref())
        .or(default.size.as_ref())
        .map(preset_size)
        .unwrap_or(Size::ORIGINAL);
    let mode = overrides
        .mode
        .or(preset.mode)
        .or(default.mode)
        .unwrap_or(CropMode::Fit);
    let fill = overrides
        .fill
        .clone()
        .or_else(|| preset.fill.clone())
        .or_else(|| default.fill.clone());
    let resolutions = match preset.resolutions.as_deref().or(default.resolutions.as_deref()) {
        Some(raw) => normalize_resolutions(Some(raw)),
        None => normalize_resolutions(Some(&raw_list(&["1x", "2x"]))),
    };

    RenderDescriptor::new(size, mode, fill, resolutions, 0)
}

/// Follow at most one alias hop inside `entries`.
fn entry_definition<'a>(
    entry: &'a BreakpointEntry,
    entries: &'a BTreeMap<String, BreakpointEntry>,
) -> Option<&'a PresetDefinition> {
    match entry {
        BreakpointEntry::Inline(definition) => Some(definition),
        BreakpointEntry::Alias(target) => match entries.get(target) {
            Some(BreakpointEntry::Inline(definition)) => Some(definition),
            _ => None,
        },
    }
}

/// Resolve a per-breakpoint definition, inheriting unset fields from the
/// resolved root.
fn inherit(definition: &PresetDefinition, root: &RenderDescriptor, table_width: u32) -> RenderDescriptor {
    let size = definition.size.as_ref().map(preset_size).unwrap_or(root.size);
    let mode = definition.mode.unwrap_or(root.mode);
    let fill = definition.fill.clone().or_else(|| root.fill.clone());
    let resolutions = match definition.resolutions.as_deref() {
        Some(raw) => normalize_resolutions(Some(raw)),
        None => root.resolutions.clone(),
    };
    let max_width = definition
        .max_width
        .filter(|w| *w > 0)
        .unwrap_or(table_width);

    RenderDescriptor::new(size, mode, fill, resolutions, max_width)
}

/// Resolve `name` against `registry` into a root descriptor and one
/// descriptor per breakpoint of `breakpoints`.
///
/// # Errors
///
/// - [`PresetError::UnknownPreset`] if `name` is not registered. Fields fall
///   back to `"default"`, existence never does.
/// - [`PresetError::BreakpointsMissing`] if the breakpoint table is empty.
#[tracing::instrument(skip(overrides, registry, breakpoints))]
pub fn resolve(
    name: &str,
    overrides: &PresetOverrides,
    registry: &PresetRegistry,
    breakpoints: &BreakpointTable,
) -> Result<ResolvedPreset, PresetError> {
    let preset = registry
        .get(name)
        .ok_or_else(|| PresetError::UnknownPreset(name.to_string()))?;
    if breakpoints.is_empty() {
        return Err(PresetError::BreakpointsMissing);
    }

    let default = registry.default_preset();
    let root = resolve_root(preset, &default, overrides);
    debug!(size = %root.size, mode = %root.mode, "resolved root descriptor");

    let entries = preset
        .breakpoints
        .as_ref()
        .or(default.breakpoints.as_ref());

    let mut resolved = Vec::with_capacity(breakpoints.len());
    for (bp_name, table_width) in breakpoints.iter() {
        let descriptor = match entries.and_then(|map| map.get(bp_name).map(|e| (e, map))) {
            None => {
                debug!(breakpoint = bp_name, "no breakpoint entry, copying root");
                RenderDescriptor {
                    max_width: table_width,
                    ..root.clone()
                }
            }
            Some((entry, map)) => match entry_definition(entry, map) {
                Some(definition) => inherit(definition, &root, table_width),
                None => {
                    warn!(
                        preset = name,
                        breakpoint = bp_name,
                        "breakpoint alias does not point at a definition, omitting"
                    );
                    continue;
                }
            },
        };
        resolved.push(ResolvedBreakpoint {
            name: bp_name.to_string(),
            descriptor,
        });
    }

    Ok(ResolvedPreset {
        root,
        breakpoints: resolved,
    })
}
