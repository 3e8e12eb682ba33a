//! HTML markup for the image and picture components.
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating,
//! so every interpolated URL and text is escaped.
//!
//! ```html
//! <picture class="hero">
//!   <source media="(max-width: 480px)" srcset="…?src=480w&amp;res=1x 1x ,…?src=480w&amp;res=2x 2x">
//!   <source media="(max-width: 768px)" srcset="…">
//!   <img src="…" alt="…">
//! </picture>
//! ```

use crate::binding::{ImageBinding, PictureBinding};
use crate::config::MediaConfig;
use crate::preset::PresetError;
use crate::srcset::MediaUrl;
use maud::{Markup, html};

fn setting<'a>(settings: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
    settings
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.as_str())
}

/// Render a `<picture>` with one `<source>` per resolved breakpoint.
///
/// Returns `Ok(None)` when the component should not render at all.
pub fn render_picture<M: MediaUrl + ?Sized>(
    picture: &PictureBinding,
    config: &MediaConfig,
    media: &M,
) -> Result<Option<Markup>, PresetError> {
    if !picture.should_render() {
        return Ok(None);
    }
    let resolved = picture.preset(&config.presets, &config.breakpoints)?;
    let sets = picture.src_sets(&resolved, media);
    let default_src = picture.default_src(&resolved, media, &config.placeholder.base_url);
    let editor = picture.editor_settings(&resolved);

    Ok(Some(html! {
        picture class=[picture.picture_class()] {
            @for set in &sets {
                @if !set.combined.is_empty() {
                    source media=(format!("(max-width: {}px)", set.max_width)) srcset=(set.combined);
                }
            }
            img src=[default_src]
                alt=[picture.alt()]
                title=[picture.title()]
                class=[picture.image_class()]
                id=[setting(&editor, "id")]
                data-content-type=[setting(&editor, "data-content-type")]
                data-content-field=[setting(&editor, "data-content-field")]
                data-content-dimensions=[setting(&editor, "data-content-dimensions")]
                data-content-compressiontype=[setting(&editor, "data-content-compressiontype")]
                data-content-id=[setting(&editor, "data-content-id")];
        }
    }))
}

/// Render a single `<img>`. Returns `None` when the component should not
/// render.
pub fn render_image<M: MediaUrl + ?Sized>(
    image: &ImageBinding,
    config: &MediaConfig,
    media: &M,
) -> Option<Markup> {
    if !image.should_render() {
        return None;
    }
    let src = image.src(media, &config.placeholder.base_url);
    let content_id = image.is_inline().then(|| image.id()).flatten();

    Some(html! {
        img src=[src]
            alt=[image.alt()]
            title=[image.title()]
            class=[image.class()]
            style=[image.style()]
            data-content-id=[content_id];
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{BoundAsset, ImageArgs, PictureArgs, Unbound};
    use crate::test_helpers::{MemoryBinder, recording_media_url};
    use crate::types::RenderMode;

    fn config() -> MediaConfig {
        let overlay: toml::Value = toml::from_str(
            r#"
[breakpoints]
sm = 480
md = 768

[presets.hero]
size = "800x400"
"#,
        )
        .unwrap();
        crate::config::resolve_config(crate::config::stock_defaults_value().unwrap(), Some(overlay))
            .unwrap()
    }

    #[test]
    fn picture_emits_sources_in_breakpoint_order() {
        let picture = PictureBinding::new(
            PictureArgs {
                src: Some("img/1.jpg".into()),
                preset: "hero".into(),
                alt: Some("Hero".into()),
                picture_class: Some("hero".into()),
                ..PictureArgs::default()
            },
            RenderMode::Live,
            &Unbound,
        );
        let html = render_picture(&picture, &config(), &recording_media_url)
            .unwrap()
            .unwrap()
            .into_string();

        assert!(html.starts_with(r#"<picture class="hero">"#));
        let sm = html.find("(max-width: 480px)").unwrap();
        let md = html.find("(max-width: 768px)").unwrap();
        assert!(sm < md);
        assert!(html.contains("src=480w&amp;res=2x 2x"));
        assert!(html.contains(r#"src="img/1.jpg|800x400|rc|-""#));
        assert!(html.contains(r#"alt="Hero""#));
        assert!(!html.contains("data-content-id"));
    }

    #[test]
    fn unknown_preset_surfaces_as_error() {
        let picture = PictureBinding::new(
            PictureArgs {
                src: Some("img/1.jpg".into()),
                preset: "poster".into(),
                ..PictureArgs::default()
            },
            RenderMode::Live,
            &Unbound,
        );
        let result = render_picture(&picture, &config(), &recording_media_url);
        assert!(matches!(result, Err(PresetError::UnknownPreset(_))));
    }

    #[test]
    fn live_picture_without_source_renders_nothing() {
        let picture = PictureBinding::new(PictureArgs::default(), RenderMode::Live, &Unbound);
        let result = render_picture(&picture, &config(), &recording_media_url).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn edit_picture_has_placeholder_and_editor_attributes() {
        let binder = MemoryBinder::default();
        let picture = PictureBinding::new(
            PictureArgs {
                area: Some("banner".into()),
                preset: "hero".into(),
                ..PictureArgs::default()
            },
            RenderMode::Edit,
            &binder,
        );
        let html = render_picture(&picture, &config(), &recording_media_url)
            .unwrap()
            .unwrap()
            .into_string();
        assert!(!html.contains("<source"));
        assert!(html.contains(r#"src="https://placehold.it/800x400""#));
        assert!(html.contains(r#"data-content-dimensions="800x400""#));
        assert!(html.contains(r#"data-content-compressiontype="rc""#));
    }

    #[test]
    fn image_renders_img_tag() {
        let binder = MemoryBinder::with_asset(
            "logo",
            BoundAsset {
                id: Some("7".into()),
                path: Some("logo.png".into()),
                title: Some("Logo".into()),
                description: Some("Company <logo>".into()),
            },
        );
        let image = ImageBinding::new(
            ImageArgs {
                area: Some("logo".into()),
                height: Some(64),
                class: Some("brand".into()),
                ..ImageArgs::default()
            },
            RenderMode::Live,
            &binder,
        );
        let html = render_image(&image, &config(), &recording_media_url)
            .unwrap()
            .into_string();
        assert!(html.contains(r#"src="logo.png|64x64|p|0,0,0""#));
        assert!(html.contains(r#"alt="Company &lt;logo&gt;""#));
        assert!(html.contains(r#"class="brand""#));
        assert!(html.contains(r#"data-content-id="7""#));
    }

    #[test]
    fn live_image_without_source_renders_nothing() {
        let image = ImageBinding::new(ImageArgs::default(), RenderMode::Live, &Unbound);
        assert!(render_image(&image, &config(), &recording_media_url).is_none());
    }
}
