//! Compile-time defaults for the compositor.
//!
//! Every tunable lives on [`CompositorConfig`] with a matching
//! `DEFAULT_*` associated constant, so callers that only need one value
//! (the slider step in the UI, say) can reference it directly.

use serde::{Deserialize, Serialize};

use crate::types::{Dimensions, ScaleBounds};

/// Compositor configuration.
///
/// There is no runtime configuration source; the defaults are the
/// product. The struct exists so the session and tests can be driven
/// with explicit values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositorConfig {
    /// Path of the frame asset, fetched once at startup.
    pub frame_path: String,

    /// Frame size assumed for fit computation until the frame loads.
    pub fallback_frame: Dimensions,

    /// Longer side of the exported PNG, in pixels.
    pub export_resolution: u32,

    /// Filename offered for the downloaded PNG.
    pub export_filename: String,

    /// Upper bound on the zoom scale, independent of image size.
    pub max_scale: f64,

    /// Scale change per unit of wheel `delta_y` (inverted).
    pub wheel_sensitivity: f64,

    /// Step of the zoom slider. Display only; scale is never snapped.
    pub slider_step: f64,

    /// Lowest scale the fit calculator will return.
    pub min_fit_scale: f64,

    /// Highest scale the fit calculator will return.
    pub max_fit_scale: f64,
}

impl CompositorConfig {
    /// Default frame asset path.
    pub const DEFAULT_FRAME_PATH: &'static str = "/frame.png";

    /// Default fallback frame size.
    pub const DEFAULT_FALLBACK_FRAME: Dimensions = Dimensions::new(800, 800);

    /// Default export resolution (longer side).
    pub const DEFAULT_EXPORT_RESOLUTION: u32 = 1080;

    /// Default download filename.
    pub const DEFAULT_EXPORT_FILENAME: &'static str = "twibbon-result.png";

    /// Default zoom ceiling.
    pub const DEFAULT_MAX_SCALE: f64 = 3.0;

    /// Default wheel sensitivity.
    pub const DEFAULT_WHEEL_SENSITIVITY: f64 = 0.001;

    /// Default slider step.
    pub const DEFAULT_SLIDER_STEP: f64 = 0.05;

    /// Default lower clamp of the fit scale.
    pub const DEFAULT_MIN_FIT_SCALE: f64 = 0.5;

    /// Default upper clamp of the fit scale (no upscaling past native).
    pub const DEFAULT_MAX_FIT_SCALE: f64 = 1.0;

    /// Scale bounds for an image whose fit scale is `fit_scale`.
    #[must_use]
    pub const fn bounds_for(&self, fit_scale: f64) -> ScaleBounds {
        ScaleBounds::new(fit_scale, self.max_scale)
    }
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            frame_path: Self::DEFAULT_FRAME_PATH.to_owned(),
            fallback_frame: Self::DEFAULT_FALLBACK_FRAME,
            export_resolution: Self::DEFAULT_EXPORT_RESOLUTION,
            export_filename: Self::DEFAULT_EXPORT_FILENAME.to_owned(),
            max_scale: Self::DEFAULT_MAX_SCALE,
            wheel_sensitivity: Self::DEFAULT_WHEEL_SENSITIVITY,
            slider_step: Self::DEFAULT_SLIDER_STEP,
            min_fit_scale: Self::DEFAULT_MIN_FIT_SCALE,
            max_fit_scale: Self::DEFAULT_MAX_FIT_SCALE,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let config = CompositorConfig::default();
        assert_eq!(config.frame_path, "/frame.png");
        assert_eq!(config.export_resolution, 1080);
        assert_eq!(config.export_filename, "twibbon-result.png");
        assert_eq!(config.fallback_frame, Dimensions::new(800, 800));
        approx::assert_relative_eq!(config.max_scale, 3.0);
        approx::assert_relative_eq!(config.wheel_sensitivity, 0.001);
    }

    #[test]
    fn bounds_use_fixed_ceiling() {
        let bounds = CompositorConfig::default().bounds_for(0.62);
        approx::assert_relative_eq!(bounds.min, 0.62);
        approx::assert_relative_eq!(bounds.max, 3.0);
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let config: CompositorConfig =
            serde_json::from_str(r#"{"export_resolution": 2048}"#).unwrap();
        assert_eq!(config.export_resolution, 2048);
        assert_eq!(config.export_filename, "twibbon-result.png");
    }

    #[test]
    fn json_roundtrip() {
        let config = CompositorConfig {
            max_scale: 4.0,
            ..CompositorConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: CompositorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
