//! End-to-end checks through the public API: config file on disk, preset
//! resolution, srcset building and markup.
//!
//! Run with: cargo test --test end_to_end

use picture_presets::binding::{PictureArgs, PictureBinding, Unbound};
use picture_presets::config::{ConfigError, load_config};
use picture_presets::html::render_picture;
use picture_presets::preset::{
    BreakpointTable, PresetError, PresetOverrides, PresetRegistry, resolve,
};
use picture_presets::srcset::{PathMediaUrl, build_srcsets};
use picture_presets::types::{CropMode, RenderMode, Size};
use std::fs;
use tempfile::TempDir;

fn site(config: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("config.toml"), config).unwrap();
    dir
}

fn registry(json: serde_json::Value) -> PresetRegistry {
    let mut registry = PresetRegistry::new();
    for (name, record) in json.as_object().unwrap() {
        registry.register_record(name.clone(), record.clone()).unwrap();
    }
    registry
}

#[test]
fn default_preset_with_size_override_yields_four_urls() {
    let registry = registry(serde_json::json!({
        "default": { "mode": "rc", "resolutions": ["1x", "2x"] }
    }));
    let table = BreakpointTable::new([("sm", 480), ("md", 768)]);
    let overrides = PresetOverrides {
        size: Some("200x100".into()),
        ..PresetOverrides::default()
    };

    let resolved = resolve("default", &overrides, &registry, &table).unwrap();
    assert_eq!(resolved.root.size, Size::new(200, 100));
    assert_eq!(resolved.root.mode, CropMode::Fit);

    let media = PathMediaUrl::new("/media");
    let sets = build_srcsets("img/1.jpg", &resolved, &media);
    let urls: Vec<&str> = sets
        .iter()
        .flat_map(|set| set.sources.iter().map(|(_, url)| url.as_str()))
        .collect();
    assert_eq!(
        urls,
        [
            "/media/rc/200x100/img/1.jpg?src=480w&res=1x",
            "/media/rc/200x100/img/1.jpg?src=480w&res=2x",
            "/media/rc/200x100/img/1.jpg?src=768w&res=1x",
            "/media/rc/200x100/img/1.jpg?src=768w&res=2x",
        ]
    );
}

#[test]
fn unknown_preset_is_reported() {
    let registry = registry(serde_json::json!({ "default": {} }));
    let table = BreakpointTable::new([("sm", 480)]);
    let err = resolve("missing-preset", &PresetOverrides::default(), &registry, &table);
    assert_eq!(err, Err(PresetError::UnknownPreset("missing-preset".into())));
}

#[test]
fn empty_breakpoint_table_is_reported() {
    let registry = registry(serde_json::json!({ "default": {} }));
    let err = resolve(
        "default",
        &PresetOverrides::default(),
        &registry,
        &BreakpointTable::default(),
    );
    assert_eq!(err, Err(PresetError::BreakpointsMissing));
}

#[test]
fn resolution_is_repeatable() {
    let registry = registry(serde_json::json!({
        "default": { "mode": "c", "size": 300 },
        "card": { "breakpoints": { "sm": { "size": "150x100" }, "md": "sm" } }
    }));
    let table = BreakpointTable::new([("md", 768), ("sm", 480)]);
    let a = resolve("card", &PresetOverrides::default(), &registry, &table).unwrap();
    let b = resolve("card", &PresetOverrides::default(), &registry, &table).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.breakpoints[0].name, "sm");
    assert_eq!(a.breakpoint("md").unwrap().size, Size::new(150, 100));
}

#[test]
fn config_file_drives_rendered_picture() {
    let dir = site(
        r#"
[breakpoints]
sm = 480
md = 768

[media]
base_url = "https://cdn.example.com/m/"

[presets.hero]
size = "800x400"

[presets.hero.breakpoints]
sm = { size = "400x400", mode = "c" }
"#,
    );
    let config = load_config(dir.path()).unwrap();
    assert_eq!(config.breakpoints.len(), 2);

    let media = PathMediaUrl::new(config.media.base_url.clone());
    let picture = PictureBinding::new(
        PictureArgs {
            src: Some("gallery/sunset.jpg".into()),
            preset: "hero".into(),
            alt: Some("Sunset".into()),
            ..PictureArgs::default()
        },
        RenderMode::Live,
        &Unbound,
    );
    let html = render_picture(&picture, &config, &media)
        .unwrap()
        .unwrap()
        .into_string();

    assert!(html.contains(
        r#"<source media="(max-width: 480px)" srcset="https://cdn.example.com/m/c/400x400/gallery/sunset.jpg?src=480w&amp;res=1x 1x"#
    ));
    assert!(html.contains("https://cdn.example.com/m/rc/800x400/gallery/sunset.jpg?src=768w&amp;res=2x 2x"));
    assert!(html.contains(r#"src="https://cdn.example.com/m/rc/800x400/gallery/sunset.jpg""#));
    assert!(html.contains(r#"alt="Sunset""#));
}

#[test]
fn missing_config_file_uses_stock_defaults() {
    let dir = TempDir::new().unwrap();
    let config = load_config(dir.path()).unwrap();
    let names: Vec<&str> = config.breakpoints.iter().map(|(n, _)| n).collect();
    assert_eq!(names, ["xs", "sm", "md", "lg", "xl"]);
    assert!(config.presets.contains("default"));
}

#[test]
fn typo_in_preset_is_rejected() {
    let dir = site("[presets.hero]\nsise = \"10x10\"\n");
    let err = load_config(dir.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
}
