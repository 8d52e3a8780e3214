//! Shared types for the twibbon compositor.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Re-export `RgbaImage` so downstream crates can hold decoded rasters
/// without depending on `image` directly.
pub use image::RgbaImage;

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Create new dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns `true` if either axis is zero.
    #[must_use]
    pub const fn is_degenerate(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width divided by height.
    ///
    /// Only meaningful for non-degenerate dimensions.
    #[must_use]
    pub fn aspect(self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// The longer of the two axes.
    #[must_use]
    pub const fn long_side(self) -> u32 {
        if self.width >= self.height {
            self.width
        } else {
            self.height
        }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Placement of the uploaded image's visible center, relative to the
/// image itself.
///
/// Nominally within `[0, 1] x [0, 1]`; `(0.5, 0.5)` is centered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelativePosition {
    /// Horizontal fraction (0.0 = left edge, 1.0 = right edge).
    pub x: f64,
    /// Vertical fraction (0.0 = top edge, 1.0 = bottom edge).
    pub y: f64,
}

impl RelativePosition {
    /// The centered position every upload resets to.
    pub const CENTER: Self = Self { x: 0.5, y: 0.5 };

    /// Create a new relative position.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Default for RelativePosition {
    fn default() -> Self {
        Self::CENTER
    }
}

/// Current scale and position of the uploaded image within the frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Zoom factor applied on top of the cover-sized image.
    pub scale: f64,
    /// Visible center, relative to the image.
    pub position: RelativePosition,
}

impl Transform {
    /// Create a centered transform at the given scale.
    #[must_use]
    pub const fn centered(scale: f64) -> Self {
        Self {
            scale,
            position: RelativePosition::CENTER,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::centered(1.0)
    }
}

/// Inclusive scale range for the current upload.
///
/// `min` is the fit scale of the current image; `max` is a fixed
/// ceiling. Candidates outside the range are clamped, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleBounds {
    /// Lower bound (the fit scale).
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl ScaleBounds {
    /// Create new bounds.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Clamp a candidate scale into the bounds.
    ///
    /// Applies `min(max(candidate, min), max)` exactly, without snapping.
    /// `f64::max` discards a NaN operand, so a NaN candidate resolves to
    /// `min` rather than leaking into the transform.
    #[must_use]
    pub fn clamp(self, candidate: f64) -> f64 {
        candidate.max(self.min).min(self.max)
    }

    /// Returns `true` if `scale` lies within the bounds.
    #[must_use]
    pub fn contains(self, scale: f64) -> bool {
        (self.min..=self.max).contains(&scale)
    }
}

/// One active touch in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    /// Horizontal client coordinate.
    pub x: f64,
    /// Vertical client coordinate.
    pub y: f64,
}

impl TouchPoint {
    /// Create a new touch point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another touch point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Which export precondition was not met.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// No image has been uploaded yet.
    NoImageSelected,
    /// The frame asset has not finished loading (or failed to load).
    FrameNotLoaded,
}

impl fmt::Display for Precondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoImageSelected => f.write_str("no image has been uploaded"),
            Self::FrameNotLoaded => f.write_str("the frame has not finished loading"),
        }
    }
}

/// Errors that can occur while loading assets or exporting.
#[derive(Debug, thiserror::Error)]
pub enum CompositorError {
    /// The input image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// Failed to decode the input image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The image has a zero-length axis and cannot be placed.
    #[error("image has degenerate dimensions {width}x{height}")]
    DegenerateImage {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },

    /// Export was requested before its inputs were available.
    #[error("please upload an image and wait for the frame to load ({0})")]
    ExportPrecondition(Precondition),

    /// The offscreen output surface could not be created.
    #[error("could not allocate a {width}x{height} output canvas")]
    CanvasAllocation {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },

    /// PNG encoding of the composed image failed.
    #[error("PNG encoding failed: {0}")]
    PngEncode(String),
}

impl CompositorError {
    pub(crate) const fn degenerate(dimensions: Dimensions) -> Self {
        Self::DegenerateImage {
            width: dimensions.width,
            height: dimensions.height,
        }
    }
}
