//! CLI output formatting for every subcommand.
//!
//! # Information-First Display
//!
//! Each entity (preset, breakpoint, source set) leads with its positional
//! index and name. The geometry follows on the same line, and URLs or
//! details go on indented context lines below it.
//!
//! # Output Format
//!
//! ## Resolve
//!
//! ```text
//! hero
//!     root: fill 1600x600 (1x, 2x) fill=#000000
//!     001 xs ≤320px: c 480x480 (1x, 2x) fill=#000000
//!     002 sm ≤576px: c 480x480 (1x, 2x) fill=#000000
//! ```
//!
//! ## Srcset
//!
//! ```text
//! 001 xs ≤320px
//!     1x: /media/c/480x480/000000/img/1.jpg?src=320w&res=1x
//!     2x: /media/c/480x480/000000/img/1.jpg?src=320w&res=2x
//! ```
//!
//! ## Check
//!
//! ```text
//! Breakpoints
//! 001 xs 320px
//! Presets
//! 001 default: ok
//! 002 poster: unknown media preset 'x'
//! ```
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::binding::ImageBinding;
use crate::config::MediaConfig;
use crate::preset::{PresetError, RenderDescriptor, ResolvedPreset};
use crate::srcset::SrcSet;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// One-line summary of a descriptor: `mode size (densities) [fill=..]`.
fn descriptor_line(descriptor: &RenderDescriptor) -> String {
    let densities = descriptor
        .resolutions
        .iter()
        .map(|d| d.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let mut line = format!("{} {} ({})", descriptor.mode, descriptor.size, densities);
    if let Some(fill) = &descriptor.fill {
        line.push_str(&format!(" fill={fill}"));
    }
    line
}

/// `001 sm ≤480px`
fn breakpoint_header(index: usize, name: &str, max_width: u32) -> String {
    format!("{} {} ≤{}px", format_index(index), name, max_width)
}

// ============================================================================
// resolve
// ============================================================================

/// Format a resolved preset: root line, then one line per breakpoint.
pub fn format_resolved(name: &str, resolved: &ResolvedPreset) -> Vec<String> {
    let mut lines = vec![name.to_string()];
    lines.push(format!("{}root: {}", indent(1), descriptor_line(&resolved.root)));
    for (i, bp) in resolved.breakpoints.iter().enumerate() {
        lines.push(format!(
            "{}{}: {}",
            indent(1),
            breakpoint_header(i + 1, &bp.name, bp.descriptor.max_width),
            descriptor_line(&bp.descriptor)
        ));
    }
    lines
}

pub fn print_resolved(name: &str, resolved: &ResolvedPreset) {
    for line in format_resolved(name, resolved) {
        println!("{}", line);
    }
}

// ============================================================================
// srcset
// ============================================================================

/// Format source sets: header per breakpoint, one line per density.
pub fn format_srcsets(sets: &[SrcSet]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, set) in sets.iter().enumerate() {
        lines.push(breakpoint_header(i + 1, &set.breakpoint, set.max_width));
        if set.sources.is_empty() {
            lines.push(format!("{}(no densities)", indent(1)));
        }
        for (density, url) in &set.sources {
            lines.push(format!("{}{}: {}", indent(1), density, url));
        }
    }
    lines
}

pub fn print_srcsets(sets: &[SrcSet]) {
    for line in format_srcsets(sets) {
        println!("{}", line);
    }
}

// ============================================================================
// image
// ============================================================================

/// Format a single image's normalized geometry and URL.
pub fn format_image(image: &ImageBinding, src: Option<&str>) -> Vec<String> {
    let size = image
        .size()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "none".to_string());
    let mut lines = vec![format!("size: {}", size), format!("mode: {}", image.mode())];
    match src {
        Some(src) => lines.push(format!("src: {}", src)),
        None => lines.push("src: (not rendered)".to_string()),
    }
    lines
}

pub fn print_image(image: &ImageBinding, src: Option<&str>) {
    for line in format_image(image, src) {
        println!("{}", line);
    }
}

// ============================================================================
// check
// ============================================================================

/// Format the config check: breakpoint table, then each preset's status.
pub fn format_check(
    config: &MediaConfig,
    results: &[(String, Result<ResolvedPreset, PresetError>)],
) -> Vec<String> {
    let mut lines = vec!["Breakpoints".to_string()];
    for (i, (name, width)) in config.breakpoints.iter().enumerate() {
        lines.push(format!("{} {} {}px", format_index(i + 1), name, width));
    }
    lines.push("Presets".to_string());
    for (i, (name, result)) in results.iter().enumerate() {
        let status = match result {
            Ok(resolved) => {
                let omitted = config.breakpoints.len().saturating_sub(resolved.breakpoints.len());
                if omitted == 0 {
                    "ok".to_string()
                } else {
                    format!("ok ({} breakpoint(s) omitted by dangling aliases)", omitted)
                }
            }
            Err(e) => e.to_string(),
        };
        lines.push(format!("{} {}: {}", format_index(i + 1), name, status));
    }
    lines
}

pub fn print_check(config: &MediaConfig, results: &[(String, Result<ResolvedPreset, PresetError>)]) {
    for line in format_check(config, results) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{ImageArgs, Unbound};
    use crate::preset::{PresetOverrides, resolve};
    use crate::srcset::build_srcsets;
    use crate::test_helpers::{breakpoints, recording_media_url, registry_from_toml};
    use crate::types::RenderMode;

    fn resolved() -> ResolvedPreset {
        let registry = registry_from_toml(
            r##"
[default]
mode = "rc"
resolutions = ["1x", "2x"]

[hero]
size = "800x400"
fill = "#000"

[hero.breakpoints]
sm = { size = "200x200", mode = "c" }
"##,
        );
        resolve(
            "hero",
            &PresetOverrides::default(),
            &registry,
            &breakpoints(&[("sm", 480), ("md", 768)]),
        )
        .unwrap()
    }

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
    }

    #[test]
    fn resolved_lists_root_then_breakpoints() {
        let lines = format_resolved("hero", &resolved());
        assert_eq!(
            lines,
            vec![
                "hero",
                "    root: rc 800x400 (1x, 2x) fill=#000",
                "    001 sm ≤480px: c 200x200 (1x, 2x) fill=#000",
                "    002 md ≤768px: rc 800x400 (1x, 2x) fill=#000",
            ]
        );
    }

    #[test]
    fn srcsets_list_each_density() {
        let sets = build_srcsets("a.jpg", &resolved(), &recording_media_url);
        let lines = format_srcsets(&sets);
        assert_eq!(lines[0], "001 sm ≤480px");
        assert_eq!(lines[1], "    1x: a.jpg|200x200|c|#000?src=480w&res=1x");
        assert_eq!(lines[3], "002 md ≤768px");
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn image_without_size() {
        let image = ImageBinding::new(ImageArgs::default(), RenderMode::Live, &Unbound);
        let lines = format_image(&image, None);
        assert_eq!(lines, vec!["size: none", "mode: o", "src: (not rendered)"]);
    }

    #[test]
    fn check_reports_errors_per_preset() {
        let config = MediaConfig::stock().unwrap();
        let results = vec![
            ("default".to_string(), Ok(resolved())),
            (
                "poster".to_string(),
                Err(PresetError::UnknownPreset("poster".into())),
            ),
        ];
        let lines = format_check(&config, &results);
        assert_eq!(lines[0], "Breakpoints");
        assert_eq!(lines[1], "001 xs 320px");
        assert!(lines.contains(&"Presets".to_string()));
        assert_eq!(lines.last().unwrap(), "002 poster: unknown media preset 'poster'");
    }
}
