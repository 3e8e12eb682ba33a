//! Shared value types used by the normalizers, the resolver and the srcset
//! builder.
//!
//! Everything here is plain data: `Copy` where possible, serialized in the
//! compact wire forms the media service understands (`"WxH"` sizes, one- or
//! two-letter crop mode codes).

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown crop mode '{0}'")]
    Mode(String),
    #[error("unknown render mode '{0}'")]
    RenderMode(String),
}

/// Target geometry, rendered canonically as `WxH`.
///
/// `0x0` is a sentinel meaning "keep the original asset dimensions". Any
/// descriptor carrying it is forced to [`CropMode::Original`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    /// The `0x0` "no resizing" sentinel.
    pub const ORIGINAL: Self = Self {
        width: 0,
        height: 0,
    };

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn square(edge: u32) -> Self {
        Self::new(edge, edge)
    }

    pub fn is_original(self) -> bool {
        self == Self::ORIGINAL
    }

    /// Parse a free-form size string.
    ///
    /// - `"200x100"` / `"200X100"` → 200x100 (split at the first `x`, the
    ///   height part ends at the next `x`)
    /// - `"300"` → 300x300
    /// - anything else, including a leading `x` → `None`
    pub fn parse_text(text: &str) -> Option<Self> {
        let lower = text.trim().to_lowercase();
        match lower.find('x') {
            Some(pos) if pos > 0 => {
                let width = &lower[..pos];
                let height = lower[pos + 1..].split('x').next().unwrap_or_default();
                match (width.parse::<u32>(), height.parse::<u32>()) {
                    (Ok(w), Ok(h)) => Some(Self::new(w, h)),
                    _ => None,
                }
            }
            Some(_) => None,
            None => lower.parse::<u32>().ok().map(Self::square),
        }
    }

    /// Preset-side canonicalization: text that does not parse becomes `0x0`.
    pub fn from_text(text: &str) -> Self {
        Self::parse_text(text).unwrap_or(Self::ORIGINAL)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl Serialize for Size {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Size handed to the media service for a single image.
///
/// Text that does not parse as a size is forwarded lower-cased but otherwise
/// untouched, so the media service sees exactly what the template asked for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SizeSpec {
    Known(Size),
    Verbatim(String),
}

impl SizeSpec {
    /// True only for a parsed `0x0`.
    pub fn is_original(&self) -> bool {
        matches!(self, Self::Known(size) if size.is_original())
    }
}

impl From<Size> for SizeSpec {
    fn from(size: Size) -> Self {
        Self::Known(size)
    }
}

impl fmt::Display for SizeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(size) => size.fmt(f),
            Self::Verbatim(text) => f.write_str(text),
        }
    }
}

/// A raw, not yet canonicalized size as it arrives from config or template
/// arguments. Absence is modelled with `Option<SizeInput>`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawSize")]
pub enum SizeInput {
    /// A single edge, e.g. `300` → `300x300`.
    Scalar(u32),
    /// Explicit `[width, height]`.
    Pair(u32, u32),
    /// Free-form text such as `"200x100"` or `"300"`.
    Text(String),
    /// A shape that cannot describe a size. Canonicalizes to `0x0`.
    Malformed,
}

impl SizeInput {
    /// Canonical geometry for this input (image component rules).
    pub fn to_size(&self) -> Size {
        match self {
            Self::Scalar(n) => Size::square(*n),
            Self::Pair(w, h) => Size::new(*w, *h),
            Self::Text(text) => Size::from_text(text),
            Self::Malformed => Size::ORIGINAL,
        }
    }
}

impl From<&str> for SizeInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<u32> for SizeInput {
    fn from(value: u32) -> Self {
        Self::Scalar(value)
    }
}

impl From<(u32, u32)> for SizeInput {
    fn from((w, h): (u32, u32)) -> Self {
        Self::Pair(w, h)
    }
}

impl From<Size> for SizeInput {
    fn from(size: Size) -> Self {
        Self::Pair(size.width, size.height)
    }
}

/// Deserialization shim: whatever shape the config holds, it lands in one of
/// the closed [`SizeInput`] variants.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSize {
    Int(u64),
    Float(f64),
    Text(String),
    List(Vec<u32>),
    Other(serde::de::IgnoredAny),
}

/// Zero edges carry no information in list form and are dropped before the
/// shape is chosen, so `[200, 0, 100]` reads as `[200, 100]`.
fn zero_free(list: Vec<u32>) -> Vec<u32> {
    list.into_iter().filter(|edge| *edge > 0).collect()
}

impl From<RawSize> for SizeInput {
    fn from(raw: RawSize) -> Self {
        match raw {
            RawSize::Int(n) => Self::Scalar(u32::try_from(n).unwrap_or(u32::MAX)),
            RawSize::Float(f) => Self::Scalar(f.max(0.0).min(f64::from(u32::MAX)) as u32),
            RawSize::Text(s) => Self::Text(s),
            RawSize::List(list) => match zero_free(list).as_slice() {
                [] => {
                    tracing::warn!("size list has no non-zero edge, treating as 0x0");
                    Self::Malformed
                }
                [edge] => Self::Scalar(*edge),
                [w, h, ..] => Self::Pair(*w, *h),
            },
            RawSize::Other(_) => {
                tracing::warn!("size value is neither number, text nor list, treating as 0x0");
                Self::Malformed
            }
        }
    }
}

/// How the media service fits source content into a [`Size`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CropMode {
    /// No geometry applied.
    #[serde(rename = "o", alias = "original")]
    Original,
    #[serde(rename = "fill")]
    Fill,
    #[serde(rename = "e", alias = "exact")]
    Exact,
    #[serde(rename = "rc", alias = "fit")]
    Fit,
    #[serde(rename = "p", alias = "portrait")]
    Portrait,
    #[serde(rename = "l", alias = "landscape")]
    Landscape,
    #[serde(rename = "a", alias = "auto")]
    Auto,
    #[serde(rename = "c", alias = "crop")]
    Crop,
}

impl CropMode {
    pub const ALL: [Self; 8] = [
        Self::Original,
        Self::Fill,
        Self::Exact,
        Self::Fit,
        Self::Portrait,
        Self::Landscape,
        Self::Auto,
        Self::Crop,
    ];

    /// Wire code understood by the media service.
    pub fn code(self) -> &'static str {
        match self {
            Self::Original => "o",
            Self::Fill => "fill",
            Self::Exact => "e",
            Self::Fit => "rc",
            Self::Portrait => "p",
            Self::Landscape => "l",
            Self::Auto => "a",
            Self::Crop => "c",
        }
    }

    fn long_name(self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::Fill => "fill",
            Self::Exact => "exact",
            Self::Fit => "fit",
            Self::Portrait => "portrait",
            Self::Landscape => "landscape",
            Self::Auto => "auto",
            Self::Crop => "crop",
        }
    }
}

impl fmt::Display for CropMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CropMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|mode| mode.code() == needle || mode.long_name() == needle)
            .ok_or_else(|| ParseError::Mode(s.to_string()))
    }
}

/// Request-scoped rendering mode supplied by the surrounding environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RenderMode {
    /// Editor session: placeholders are shown and bindings are created.
    Edit,
    #[default]
    Live,
    Preview,
}

impl RenderMode {
    pub fn is_edit(self) -> bool {
        self == Self::Edit
    }
}

impl FromStr for RenderMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "edit" => Ok(Self::Edit),
            "live" => Ok(Self::Live),
            "preview" => Ok(Self::Preview),
            _ => Err(ParseError::RenderMode(s.to_string())),
        }
    }
}
