//! Geometry and crop-mode normalization for the single image component.
//!
//! Template arguments arrive raw: an optional `size` in any of the
//! [`SizeInput`] shapes, optional `width`/`height`, and an optional crop
//! mode. [`normalize`] turns them into one canonical `(size, mode)` pair.
//!
//! ## Rules
//!
//! | Input | Size | Mode |
//! |---|---|---|
//! | nothing | none | `o` |
//! | nothing, editor placeholder | `256x256` | requested or `e` |
//! | `width = 300` | `300x300` | `l` (forced) |
//! | `height = 300` | `300x300` | `p` (forced) |
//! | `width = 300, height = 200` | `300x200` | requested or `e` |
//! | `size = "200X100"` | `200x100` | requested or `e` |
//! | `size = 300` | `300x300` | requested or `e` |
//! | `size = "x100"`, `"large"` | same text, lower-cased | requested or `e` |
//! | `size = "0x0"` or malformed | `0x0` | `o` (forced) |
//!
//! A crop mode without a size is meaningless, so the mode is discarded
//! whenever no size could be resolved.

use crate::types::{CropMode, Size, SizeInput, SizeSpec};

/// Size of the placeholder box shown in the editor before any asset is bound.
pub const PLACEHOLDER_SIZE: Size = Size {
    width: 256,
    height: 256,
};

/// Raw geometry arguments of an image component.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeometryRequest {
    pub size: Option<SizeInput>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub mode: Option<CropMode>,
}

/// Canonical geometry handed to the media URL function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Geometry {
    pub size: Option<SizeSpec>,
    pub mode: CropMode,
}

/// Text that does not parse is passed through; an empty string counts as
/// no size at all.
fn image_size(input: &SizeInput) -> Option<SizeSpec> {
    match input {
        SizeInput::Text(text) => {
            let lower = text.trim().to_lowercase();
            if lower.is_empty() {
                return None;
            }
            Some(match Size::parse_text(&lower) {
                Some(size) => SizeSpec::Known(size),
                None => SizeSpec::Verbatim(lower),
            })
        }
        other => Some(SizeSpec::Known(other.to_size())),
    }
}

/// Normalize raw geometry arguments.
///
/// `placeholder` is true when rendering in the editor with no bound content;
/// it is the only way the render mode influences geometry.
pub fn normalize(request: &GeometryRequest, placeholder: bool) -> Geometry {
    // Zero reads as "not given", matching template semantics.
    let width = request.width.filter(|w| *w > 0);
    let height = request.height.filter(|h| *h > 0);

    let mode = match (width, height) {
        (Some(_), None) => Some(CropMode::Landscape),
        (None, Some(_)) => Some(CropMode::Portrait),
        _ => request.mode,
    };

    let explicit = request.size.as_ref().and_then(image_size);
    let from_edges = match (width.or(height), height.or(width)) {
        (Some(w), Some(h)) => Some(SizeSpec::Known(Size::new(w, h))),
        _ => None,
    };

    let size = explicit
        .or(from_edges)
        .or_else(|| placeholder.then_some(SizeSpec::Known(PLACEHOLDER_SIZE)));

    let mode = match &size {
        None => CropMode::Original,
        Some(size) if size.is_original() => CropMode::Original,
        Some(_) => mode.unwrap_or(CropMode::Exact),
    };

    Geometry { size, mode }
}
