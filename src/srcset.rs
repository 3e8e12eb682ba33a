//! Srcset assembly from a resolved preset.
//!
//! For every resolved breakpoint and every density of that breakpoint one URL
//! is produced by the injected [`MediaUrl`] and tagged with a
//! `?src={maxWidth}w&res={density}` suffix, so that breakpoints sharing the
//! same geometry still yield distinct URLs:
//!
//! ```text
//! sm (480)  →  /media/rc/200x100/img/1.jpg?src=480w&res=1x 1x ,/media/rc/200x100/img/1.jpg?src=480w&res=2x 2x
//! md (768)  →  /media/rc/200x100/img/1.jpg?src=768w&res=1x 1x ,/media/rc/200x100/img/1.jpg?src=768w&res=2x 2x
//! ```
//!
//! Nothing here touches the network or the filesystem.

use crate::preset::{RenderDescriptor, ResolvedPreset};
use crate::resolutions::Density;
use crate::types::{CropMode, SizeSpec};
use serde::Serialize;

/// Boundary to the media service that turns geometry into a URL.
///
/// Implemented for plain closures so callers (and tests) can inject any
/// URL scheme.
pub trait MediaUrl {
    fn media_url(
        &self,
        path: &str,
        size: Option<&SizeSpec>,
        mode: CropMode,
        fill: Option<&str>,
    ) -> String;
}

impl<F> MediaUrl for F
where
    F: Fn(&str, Option<&SizeSpec>, CropMode, Option<&str>) -> String,
{
    fn media_url(
        &self,
        path: &str,
        size: Option<&SizeSpec>,
        mode: CropMode,
        fill: Option<&str>,
    ) -> String {
        self(path, size, mode, fill)
    }
}

/// Path-style media URLs: `{base}/{mode}/{size}[/{fill}]/{path}`.
///
/// Without a size the URL is `{base}/o/{path}`. A leading `#` on the fill
/// colour is dropped so it survives as a path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMediaUrl {
    base_url: String,
}

impl PathMediaUrl {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }
}

impl MediaUrl for PathMediaUrl {
    fn media_url(
        &self,
        path: &str,
        size: Option<&SizeSpec>,
        mode: CropMode,
        fill: Option<&str>,
    ) -> String {
        let path = path.trim_start_matches('/');
        match size {
            None => format!("{}/{}/{}", self.base_url, CropMode::Original, path),
            Some(size) => match fill.map(|f| f.trim_start_matches('#')).filter(|f| !f.is_empty()) {
                Some(fill) => format!("{}/{}/{}/{}/{}", self.base_url, mode, size, fill, path),
                None => format!("{}/{}/{}/{}", self.base_url, mode, size, path),
            },
        }
    }
}

/// One `<source>` worth of candidates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SrcSet {
    pub breakpoint: String,
    pub max_width: u32,
    /// Density → URL, ascending by density.
    /// Keyed by density, so a density listed twice yields one candidate.
    pub sources: Vec<(Density, String)>,
    /// `"URL density"` pairs joined with `" ,"`, ready for a `srcset`
    /// attribute.
    pub combined: String,
}

impl SrcSet {
    pub fn url(&self, density: &str) -> Option<&str> {
        self.sources
            .iter()
            .find(|(d, _)| d.as_str() == density)
            .map(|(_, url)| url.as_str())
    }
}

fn candidate_url<M: MediaUrl + ?Sized>(
    path: &str,
    descriptor: &RenderDescriptor,
    density: &Density,
    media: &M,
) -> String {
    let base = media.media_url(
        path,
        Some(&SizeSpec::Known(descriptor.size)),
        descriptor.mode,
        descriptor.fill.as_deref(),
    );
    format!("{base}?src={}w&res={density}", descriptor.max_width)
}

/// Build one [`SrcSet`] per resolved breakpoint, preserving breakpoint order.
#[tracing::instrument(skip(preset, media))]
pub fn build_srcsets<M: MediaUrl + ?Sized>(
    path: &str,
    preset: &ResolvedPreset,
    media: &M,
) -> Vec<SrcSet> {
    preset
        .breakpoints
        .iter()
        .map(|bp| {
            let mut sources: Vec<(Density, String)> = Vec::new();
            for density in &bp.descriptor.resolutions {
                let url = candidate_url(path, &bp.descriptor, density, media);
                match sources.iter_mut().find(|(d, _)| d == density) {
                    Some(existing) => existing.1 = url,
                    None => sources.push((density.clone(), url)),
                }
            }
            let combined = sources
                .iter()
                .map(|(density, url)| format!("{url} {density}"))
                .collect::<Vec<_>>()
                .join(" ,");
            SrcSet {
                breakpoint: bp.name.clone(),
                max_width: bp.descriptor.max_width,
                sources,
                combined,
            }
        })
        .collect()
}

/// Fallback `<img src>` built from the root descriptor.
pub fn default_src<M: MediaUrl + ?Sized>(path: &str, root: &RenderDescriptor, media: &M) -> String {
    media.media_url(
        path,
        Some(&SizeSpec::Known(root.size)),
        root.mode,
        root.fill.as_deref(),
    )
}
