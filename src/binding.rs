//! Content binding and the image/picture components.
//!
//! Editors bind an image to a named content *area*. At render time the
//! components below ask a [`ContentBinder`] for the stored asset, combine it
//! with the template arguments, and hand geometry to the normalizer (image)
//! or the preset resolver (picture).
//!
//! The binder is an external collaborator (storage, network). The
//! components only rely on its two calls and never cache their results.
//!
//! ## Edit mode
//!
//! - Bindings are created on demand through
//!   [`ContentBinder::ensure_binding_exists`].
//! - With nothing bound yet, images get the `256x256` placeholder box and
//!   both components fall back to a placeholder URL.
//! - Everything is rendered, even without a source.

use crate::geometry::{self, Geometry, GeometryRequest, PLACEHOLDER_SIZE};
use crate::preset::{
    BreakpointTable, PresetError, PresetOverrides, PresetRegistry, ResolvedPreset, resolve,
};
use crate::srcset::{self, MediaUrl, SrcSet};
use crate::types::{CropMode, RenderMode, SizeInput, SizeSpec};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Asset metadata returned by the binder for an area.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundAsset {
    pub id: Option<String>,
    pub path: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

impl BoundAsset {
    /// True once an actual file has been bound (an editor-created empty
    /// binding has no path yet).
    pub fn has_asset(&self) -> bool {
        self.path.as_deref().is_some_and(|p| !p.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Image,
}

impl ContentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
        }
    }
}

/// Boundary to the CMS content store.
pub trait ContentBinder {
    /// Look up the asset bound to `area`.
    fn resolve_binding(&self, area: &str, mode: RenderMode) -> Option<BoundAsset>;

    /// Edit mode only: create an empty binding if none exists yet.
    fn ensure_binding_exists(&self, area: &str, kind: ContentKind) -> Option<BoundAsset>;
}

/// Binder with nothing bound, for static (non-inline) rendering.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unbound;

impl ContentBinder for Unbound {
    fn resolve_binding(&self, _area: &str, _mode: RenderMode) -> Option<BoundAsset> {
        None
    }

    fn ensure_binding_exists(&self, _area: &str, _kind: ContentKind) -> Option<BoundAsset> {
        None
    }
}

/// A raw `src` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Path(String),
    /// Record carrying a `path` and/or `image` field.
    Asset {
        path: Option<String>,
        image: Option<String>,
    },
    Bound(BoundAsset),
}

impl ImageSource {
    /// File path to hand to the media service; `path` wins over `image`.
    pub fn path(&self) -> Option<&str> {
        let path = match self {
            Self::Path(path) => Some(path.as_str()),
            Self::Asset { path, image } => path.as_deref().or(image.as_deref()),
            Self::Bound(asset) => asset.path.as_deref(),
        };
        path.filter(|p| !p.is_empty())
    }
}

impl From<&str> for ImageSource {
    fn from(value: &str) -> Self {
        Self::Path(value.to_string())
    }
}

fn placeholder_url(base_url: &str, size: impl fmt::Display) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), size)
}

// ============================================================================
// Image
// ============================================================================

/// Template arguments of the image component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageArgs {
    pub area: Option<String>,
    pub size: Option<SizeInput>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub mode: Option<CropMode>,
    pub color: Option<String>,
    pub src: Option<ImageSource>,
    pub alt: Option<String>,
    pub title: Option<String>,
    pub class: Option<String>,
    pub style: Option<String>,
}

impl Default for ImageArgs {
    fn default() -> Self {
        Self {
            area: None,
            size: None,
            width: None,
            height: None,
            mode: None,
            color: Some("0,0,0".to_string()),
            src: None,
            alt: None,
            title: None,
            class: None,
            style: None,
        }
    }
}

/// A single, non-responsive image, resolved once per render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBinding {
    args: ImageArgs,
    render_mode: RenderMode,
    content: Option<BoundAsset>,
    geometry: Geometry,
}

impl ImageBinding {
    pub fn new(mut args: ImageArgs, render_mode: RenderMode, binder: &dyn ContentBinder) -> Self {
        let area = args.area.clone().filter(|a| !a.is_empty());
        let content = area.as_deref().and_then(|area| {
            if render_mode.is_edit() {
                binder.ensure_binding_exists(area, ContentKind::Image)
            } else {
                binder.resolve_binding(area, render_mode)
            }
        });

        if let Some(asset) = &content {
            args.alt = asset.description.clone();
            args.title = asset.title.clone();
            args.src = Some(ImageSource::Bound(asset.clone()));
        }

        let placeholder =
            render_mode.is_edit() && !content.as_ref().is_some_and(BoundAsset::has_asset);
        let request = GeometryRequest {
            size: args.size.clone(),
            width: args.width,
            height: args.height,
            mode: args.mode,
        };
        let geometry = geometry::normalize(&request, placeholder);

        Self {
            args,
            render_mode,
            content,
            geometry,
        }
    }

    pub fn is_inline(&self) -> bool {
        self.args.area.as_deref().is_some_and(|a| !a.is_empty())
    }

    /// Identifier of the bound content, for inline images.
    pub fn id(&self) -> Option<&str> {
        self.content.as_ref().and_then(|c| c.id.as_deref())
    }

    pub fn size(&self) -> Option<&SizeSpec> {
        self.geometry.size.as_ref()
    }

    pub fn mode(&self) -> CropMode {
        self.geometry.mode
    }

    pub fn color(&self) -> Option<&str> {
        self.args.color.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.args.src.as_ref().and_then(ImageSource::path)
    }

    /// Final image URL, or a placeholder in edit mode when nothing is bound.
    pub fn src<M: MediaUrl + ?Sized>(&self, media: &M, placeholder_base: &str) -> Option<String> {
        match self.path() {
            Some(path) => Some(media.media_url(path, self.size(), self.mode(), self.color())),
            None if self.render_mode.is_edit() => Some(match self.size() {
                Some(size) => placeholder_url(placeholder_base, size),
                None => placeholder_url(placeholder_base, PLACEHOLDER_SIZE),
            }),
            None => None,
        }
    }

    pub fn alt(&self) -> Option<&str> {
        self.args.alt.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.args.title.as_deref()
    }

    pub fn class(&self) -> Option<&str> {
        self.args.class.as_deref()
    }

    pub fn style(&self) -> Option<&str> {
        self.args.style.as_deref()
    }

    /// Live pages skip images without a source; every other mode renders.
    pub fn should_render(&self) -> bool {
        !(self.render_mode == RenderMode::Live && self.path().is_none())
    }
}

// ============================================================================
// Picture
// ============================================================================

/// Template arguments of the responsive picture component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PictureArgs {
    pub area: Option<String>,
    pub alt: Option<String>,
    pub title: Option<String>,
    pub src: Option<ImageSource>,
    pub mode: Option<CropMode>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub size: Option<SizeInput>,
    pub fill: Option<String>,
    pub image_class: Option<String>,
    pub picture_class: Option<String>,
    pub preset: String,
}

impl Default for PictureArgs {
    fn default() -> Self {
        Self {
            area: None,
            alt: None,
            title: None,
            src: None,
            mode: None,
            width: None,
            height: None,
            size: None,
            fill: None,
            image_class: None,
            picture_class: None,
            preset: crate::preset::DEFAULT_PRESET.to_string(),
        }
    }
}

/// Suffix source for editor element ids; unique per process.
static EDITOR_ID_SEQ: AtomicU64 = AtomicU64::new(1);

/// A responsive picture bound to a named preset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PictureBinding {
    args: PictureArgs,
    render_mode: RenderMode,
    content: Option<BoundAsset>,
    overrides: PresetOverrides,
}

impl PictureBinding {
    pub fn new(args: PictureArgs, render_mode: RenderMode, binder: &dyn ContentBinder) -> Self {
        let content = args
            .area
            .as_deref()
            .filter(|a| !a.is_empty())
            .and_then(|area| {
                if render_mode.is_edit() {
                    binder.ensure_binding_exists(area, ContentKind::Image);
                }
                binder.resolve_binding(area, render_mode)
            });

        let width = args.width.filter(|w| *w > 0);
        let height = args.height.filter(|h| *h > 0);
        let size = args
            .size
            .clone()
            .filter(|s| !matches!(s, SizeInput::Scalar(0)) && *s != SizeInput::Text(String::new()))
            .or_else(|| match (width.or(height), height.or(width)) {
                (Some(w), Some(h)) => Some(SizeInput::Pair(w, h)),
                _ => None,
            });
        let overrides = PresetOverrides {
            size,
            mode: args.mode,
            fill: args.fill.clone(),
        };

        Self {
            args,
            render_mode,
            content,
            overrides,
        }
    }

    pub fn is_inline(&self) -> bool {
        self.args.area.as_deref().is_some_and(|a| !a.is_empty())
    }

    pub fn preset_name(&self) -> &str {
        &self.args.preset
    }

    /// Instance-level overrides layered over the named preset.
    pub fn overrides(&self) -> &PresetOverrides {
        &self.overrides
    }

    pub fn preset(
        &self,
        registry: &PresetRegistry,
        breakpoints: &BreakpointTable,
    ) -> Result<ResolvedPreset, PresetError> {
        resolve(&self.args.preset, &self.overrides, registry, breakpoints)
    }

    /// Source path: the bound asset for inline pictures, the `src`
    /// argument otherwise.
    pub fn src(&self) -> Option<&str> {
        if self.is_inline() {
            return self
                .content
                .as_ref()
                .and_then(|c| c.path.as_deref())
                .filter(|p| !p.is_empty());
        }
        self.args.src.as_ref().and_then(ImageSource::path)
    }

    /// Fallback `<img>` URL built from the root descriptor.
    pub fn default_src<M: MediaUrl + ?Sized>(
        &self,
        resolved: &ResolvedPreset,
        media: &M,
        placeholder_base: &str,
    ) -> Option<String> {
        if let Some(path) = self.src() {
            return Some(srcset::default_src(path, &resolved.root, media));
        }
        if self.is_inline() && self.render_mode.is_edit() {
            let size = if resolved.root.size.is_original() {
                PLACEHOLDER_SIZE
            } else {
                resolved.root.size
            };
            return Some(placeholder_url(placeholder_base, size));
        }
        None
    }

    /// Per-breakpoint source sets; empty while there is no source.
    pub fn src_sets<M: MediaUrl + ?Sized>(&self, resolved: &ResolvedPreset, media: &M) -> Vec<SrcSet> {
        match self.src() {
            Some(path) => srcset::build_srcsets(path, resolved, media),
            None => Vec::new(),
        }
    }

    /// Attributes the editor needs to attach its image picker, only for
    /// inline pictures in edit mode.
    pub fn editor_settings(&self, resolved: &ResolvedPreset) -> Vec<(&'static str, String)> {
        if !(self.is_inline() && self.render_mode.is_edit()) {
            return Vec::new();
        }
        let content_id = self.content.as_ref().and_then(|c| c.id.clone()).unwrap_or_default();
        let seq = EDITOR_ID_SEQ.fetch_add(1, Ordering::Relaxed);
        vec![
            ("id", format!("e-{content_id}-picture-{seq:x}")),
            ("data-content-type", ContentKind::Image.as_str().to_string()),
            ("data-content-field", ContentKind::Image.as_str().to_string()),
            ("data-content-dimensions", resolved.root.size.to_string()),
            ("data-content-compressiontype", resolved.root.mode.to_string()),
            ("data-content-id", content_id),
        ]
    }

    pub fn should_render(&self) -> bool {
        self.render_mode.is_edit() || self.src().is_some()
    }

    pub fn title(&self) -> Option<&str> {
        self.content
            .as_ref()
            .and_then(|c| c.title.as_deref())
            .or(self.args.title.as_deref())
    }

    pub fn alt(&self) -> Option<&str> {
        self.content
            .as_ref()
            .and_then(|c| c.description.as_deref())
            .or(self.args.alt.as_deref())
    }

    pub fn image_class(&self) -> Option<&str> {
        self.args.image_class.as_deref()
    }

    pub fn picture_class(&self) -> Option<&str> {
        self.args.picture_class.as_deref()
    }
}
