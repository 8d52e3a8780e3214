//! twibbon-core: Pure photo-framing compositor (sans-IO).
//!
//! Places an uploaded photo under a decorative frame and exports the
//! composite as PNG:
//! decode -> initial fit -> wheel/pinch/slider/drag edits -> export.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! byte slices and decoded rasters. All browser interaction (asset
//! fetches, file reads, downloads) lives in `twibbon-io`.

pub mod asset;
pub mod config;
pub mod fit;
pub mod gesture;
pub mod render;
pub mod session;
pub mod surface;
pub mod types;

pub use asset::{FrameSpec, UploadedImage};
pub use config::CompositorConfig;
pub use fit::{InitialFit, compute_initial_fit};
pub use gesture::{GestureController, PinchGesture};
pub use render::{RenderedImage, render};
pub use session::{CompositorSession, ExportArtifact};
pub use surface::{EditorSurface, Placement, RasterSurface};
pub use types::{
    CompositorError, Dimensions, Precondition, RelativePosition, RgbaImage, ScaleBounds,
    TouchPoint, Transform,
};
