//! The compositor session: all mutable editing state in one place.
//!
//! A [`CompositorSession`] owns the transform, scale bounds, pinch state,
//! the loaded frame, the current upload, and the editing surface. UI
//! code forwards input events to it and reads state back; nothing is
//! held in ambient globals.

use std::rc::Rc;

use crate::asset::{FrameSpec, UploadedImage};
use crate::config::CompositorConfig;
use crate::fit::compute_initial_fit;
use crate::gesture::GestureController;
use crate::render;
use crate::surface::{EditorSurface, Placement, RasterSurface};
use crate::types::{
    CompositorError, Dimensions, Precondition, RelativePosition, ScaleBounds, TouchPoint, Transform,
};

/// A downloadable export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// PNG-encoded bytes.
    pub png: Vec<u8>,
    /// Pixel dimensions of the PNG.
    pub dimensions: Dimensions,
    /// Filename to offer for the download.
    pub filename: String,
}

impl ExportArtifact {
    /// MIME type of the artifact.
    pub const MIME_TYPE: &'static str = "image/png";
}

/// Editing session for one page lifetime.
///
/// Generic over the editing surface so the geometry and export logic can
/// be driven by a different renderer; [`RasterSurface`] is the default.
#[derive(Debug)]
pub struct CompositorSession<S = RasterSurface> {
    config: CompositorConfig,
    frame: Option<Rc<FrameSpec>>,
    image: Option<Rc<UploadedImage>>,
    transform: Transform,
    bounds: ScaleBounds,
    gestures: GestureController,
    surface: S,
}

impl CompositorSession<RasterSurface> {
    /// Create a session backed by a [`RasterSurface`].
    #[must_use]
    pub fn new(config: CompositorConfig) -> Self {
        let surface = RasterSurface::new(config.fallback_frame);
        Self::with_surface(config, surface)
    }
}

impl Default for CompositorSession<RasterSurface> {
    fn default() -> Self {
        Self::new(CompositorConfig::default())
    }
}

impl<S: EditorSurface> CompositorSession<S> {
    /// Create a session with a caller-provided surface.
    #[must_use]
    pub fn with_surface(config: CompositorConfig, mut surface: S) -> Self {
        surface.set_canvas_size(config.fallback_frame);
        let bounds = ScaleBounds::new(config.max_fit_scale, config.max_scale);
        Self {
            frame: None,
            image: None,
            transform: Transform::centered(config.max_fit_scale),
            bounds,
            gestures: GestureController::new(),
            surface,
            config,
        }
    }

    /// Session configuration.
    #[must_use]
    pub const fn config(&self) -> &CompositorConfig {
        &self.config
    }

    /// Install the frame once its asset has loaded.
    ///
    /// Does not refit an image that was uploaded before the frame arrived.
    pub fn load_frame(&mut self, frame: FrameSpec) {
        let dimensions = frame.dimensions();
        tracing::info!(source = frame.source(), %dimensions, "frame loaded");
        self.surface.set_canvas_size(dimensions);
        self.frame = Some(Rc::new(frame));
    }

    /// The loaded frame, if any.
    #[must_use]
    pub fn frame(&self) -> Option<&FrameSpec> {
        self.frame.as_deref()
    }

    /// The current upload, if any.
    #[must_use]
    pub fn image(&self) -> Option<&UploadedImage> {
        self.image.as_deref()
    }

    /// Returns `true` once an image has been uploaded.
    #[must_use]
    pub const fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// Returns `true` when both an image and the frame are available.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.image.is_some() && self.frame.is_some()
    }

    /// Current transform.
    #[must_use]
    pub const fn transform(&self) -> Transform {
        self.transform
    }

    /// Current scale bounds.
    #[must_use]
    pub const fn bounds(&self) -> ScaleBounds {
        self.bounds
    }

    /// The editing surface.
    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    /// Working canvas size: the frame's dimensions, or the fallback.
    #[must_use]
    pub fn canvas_size(&self) -> Dimensions {
        self.frame
            .as_ref()
            .map_or(self.config.fallback_frame, |f| f.dimensions())
    }

    /// Replace the current image and reset the transform to its fit.
    ///
    /// Prior transform, bounds, and pinch state are discarded wholesale.
    ///
    /// # Errors
    ///
    /// Returns [`CompositorError::DegenerateImage`] if the fit cannot be
    /// computed; the previous session state is kept in that case.
    pub fn upload(&mut self, image: UploadedImage) -> Result<(), CompositorError> {
        let canvas = self.canvas_size();
        let fit = compute_initial_fit(canvas, image.dimensions(), &self.config)?;
        tracing::info!(
            name = image.name(),
            dimensions = %image.dimensions(),
            scale = fit.scale,
            "image uploaded"
        );

        let image = Rc::new(image);
        self.bounds = self.config.bounds_for(fit.scale);
        self.transform = fit.transform();
        self.gestures.reset();
        self.image = Some(Rc::clone(&image));

        self.surface.set_image(image);
        self.surface.set_scale(self.transform.scale);
        self.surface.set_position(self.transform.position);
        Ok(())
    }

    fn apply_scale(&mut self, scale: f64) {
        debug_assert!(self.bounds.contains(scale), "scale {scale} escaped {:?}", self.bounds);
        self.transform.scale = scale;
        self.surface.set_scale(scale);
    }

    /// Apply a wheel event. Ignored while no image is uploaded.
    pub fn wheel(&mut self, delta_y: f64) {
        if !self.has_image() {
            return;
        }
        let scale = GestureController::wheel(
            self.transform.scale,
            delta_y,
            self.config.wheel_sensitivity,
            self.bounds,
        );
        self.apply_scale(scale);
    }

    /// Handle a touch-start event. Ignored while no image is uploaded.
    pub fn touch_start(&mut self, touches: &[TouchPoint]) {
        if !self.has_image() {
            return;
        }
        self.gestures.touch_start(touches, self.transform.scale);
    }

    /// Handle a touch-move event.
    ///
    /// Returns `true` if the event was consumed as a pinch, so the
    /// caller can suppress the browser's default handling.
    pub fn touch_move(&mut self, touches: &[TouchPoint]) -> bool {
        if !self.has_image() {
            return false;
        }
        match self.gestures.touch_move(touches, self.bounds) {
            Some(scale) => {
                self.apply_scale(scale);
                true
            }
            None => false,
        }
    }

    /// Handle a touch-end event with `remaining` touches still active.
    pub fn touch_end(&mut self, remaining: usize) {
        self.gestures.touch_end(remaining);
    }

    /// Apply a zoom slider value. Ignored while no image is uploaded.
    pub fn set_slider(&mut self, value: f64) {
        if !self.has_image() {
            return;
        }
        let scale = GestureController::slider(value, self.bounds);
        self.apply_scale(scale);
    }

    /// Pan the image by a canvas-pixel delta via the surface.
    ///
    /// Returns the reported position, or `None` without an image.
    pub fn drag(&mut self, dx: f64, dy: f64) -> Option<RelativePosition> {
        if !self.has_image() {
            return None;
        }
        let position = self.surface.drag(dx, dy)?;
        self.transform.position = position;
        Some(position)
    }

    /// Store a position reported by the surface.
    pub fn set_position(&mut self, position: RelativePosition) {
        self.transform.position = position;
        self.surface.set_position(position);
    }

    /// Where the image currently sits on the canvas.
    #[must_use]
    pub fn placement(&self) -> Option<Placement> {
        let image = self.image.as_ref()?;
        crate::surface::placement(self.canvas_size(), image.dimensions(), self.transform)
    }

    /// Produce the export for the current state.
    ///
    /// # Errors
    ///
    /// Returns [`CompositorError::ExportPrecondition`] without an image
    /// or frame, and propagates allocation and encoding failures. No
    /// artifact is produced on error.
    pub fn export(&self) -> Result<ExportArtifact, CompositorError> {
        if self.image.is_none() {
            tracing::warn!("export requested without an uploaded image");
            return Err(CompositorError::ExportPrecondition(
                Precondition::NoImageSelected,
            ));
        }
        let Some(frame) = self.frame.as_deref() else {
            tracing::warn!("export requested before the frame loaded");
            return Err(CompositorError::ExportPrecondition(
                Precondition::FrameNotLoaded,
            ));
        };

        let base_layer = self.surface.canvas_snapshot()?;
        let rendered = render::render_base_layer(&base_layer, frame, self.config.export_resolution)?;
        Ok(ExportArtifact {
            png: rendered.png,
            dimensions: rendered.dimensions,
            filename: self.config.export_filename.clone(),
        })
    }
}
