//! # Picture Presets
//!
//! Responsive image rendering for CMS templates. Named presets describe how
//! an image should be cropped and sized, the breakpoint table says which
//! viewport widths matter, and the resolver turns the two into concrete
//! per-breakpoint instructions ready for a `<picture>` element.
//!
//! # Architecture: Resolve, Then Build
//!
//! ```text
//! 1. Resolve   preset + overrides + breakpoints  →  ResolvedPreset   (pure data)
//! 2. Build     ResolvedPreset + path + MediaUrl  →  Vec<SrcSet>      (URL strings)
//! 3. Render    bindings + SrcSets                →  Markup           (maud HTML)
//! ```
//!
//! Each stage is a pure function over its inputs. The two outside
//! collaborators, the CMS content store and the media URL service, enter
//! only through the [`binding::ContentBinder`] and [`srcset::MediaUrl`]
//! traits, so every stage is testable without either of them.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | `Size`, `SizeInput`, `CropMode`, `RenderMode` and their text forms |
//! | [`resolutions`] | Density lists (`"1x"`, `"2x"`) and their normalization |
//! | [`geometry`] | Size/mode normalization for a single non-responsive image |
//! | [`preset`] | Preset registry, breakpoint table, and the resolver |
//! | [`srcset`] | Per-breakpoint srcset URLs from a resolved preset |
//! | [`binding`] | Content binding plus the image and picture components |
//! | [`html`] | `<img>` and `<picture>` markup via Maud |
//! | [`config`] | Layered `config.toml` loading and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## `0x0` Means "Original"
//!
//! There is no separate "no size" state on resolved descriptors. A size of
//! `0x0` is the sentinel, and wherever it appears the crop mode becomes `o`.
//! This holds at the root and at every breakpoint.
//!
//! ## Fields Fall Back, Existence Does Not
//!
//! A preset that omits `mode` or `resolutions` inherits them from the
//! `default` preset. A preset that does not exist is an error, never a
//! silent fallback to `default`.
//!
//! ## Breakpoint Order Is Width Order
//!
//! Browsers pick the first matching `<source>`, so source sets are always
//! emitted in ascending `max-width` order regardless of how the config file
//! lists them.
//!
//! ## Maud Over Template Engines
//!
//! Markup is generated with [Maud](https://maud.lambda.xyz/): malformed HTML
//! is a build error and every interpolated URL or caption is escaped.

pub mod binding;
pub mod config;
pub mod geometry;
pub mod html;
pub mod output;
pub mod preset;
pub mod resolutions;
pub mod srcset;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
