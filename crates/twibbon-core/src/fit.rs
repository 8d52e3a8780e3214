//! Initial fit of an uploaded image against the frame.
//!
//! The fit scale is both the starting zoom and the lower zoom bound for
//! the upload. It is clamped to `[0.5, 1.0]` by default: no upscaling
//! past native resolution, and no degenerate tiny placements.

use crate::config::CompositorConfig;
use crate::types::{CompositorError, Dimensions, RelativePosition, Transform};

/// Result of the fit computation for one upload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitialFit {
    /// Clamped fit scale.
    pub scale: f64,
    /// Always [`RelativePosition::CENTER`].
    pub position: RelativePosition,
}

impl InitialFit {
    /// The transform an upload resets to.
    #[must_use]
    pub const fn transform(self) -> Transform {
        Transform {
            scale: self.scale,
            position: self.position,
        }
    }
}

/// Compute the unclamped fit scale.
///
/// An image relatively wider than the frame is fitted by width, any
/// other image by height.
fn raw_fit_scale(frame: Dimensions, image: Dimensions) -> f64 {
    if image.aspect() > frame.aspect() {
        f64::from(frame.width) / f64::from(image.width)
    } else {
        f64::from(frame.height) / f64::from(image.height)
    }
}

/// Compute the initial scale and position for an image placed in a frame.
///
/// # Errors
///
/// Returns [`CompositorError::DegenerateImage`] if either the frame or
/// the image has a zero-length axis, rather than producing a NaN or
/// infinite scale.
pub fn compute_initial_fit(
    frame: Dimensions,
    image: Dimensions,
    config: &CompositorConfig,
) -> Result<InitialFit, CompositorError> {
    if frame.is_degenerate() {
        return Err(CompositorError::degenerate(frame));
    }
    if image.is_degenerate() {
        return Err(CompositorError::degenerate(image));
    }

    let raw = raw_fit_scale(frame, image);
    let scale = raw.clamp(config.min_fit_scale, config.max_fit_scale);
    tracing::debug!(%frame, %image, raw, scale, "computed initial fit");

    Ok(InitialFit {
        scale,
        position: RelativePosition::CENTER,
    })
}
