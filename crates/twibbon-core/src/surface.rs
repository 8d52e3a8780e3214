//! The image-editing surface: where the uploaded photo sits inside the
//! frame-sized canvas.
//!
//! [`EditorSurface`] abstracts the pan/zoom rendering primitive so the
//! session is not tied to one renderer. [`RasterSurface`] is the
//! `tiny-skia` implementation used for export.
//!
//! # Placement geometry
//!
//! The image is first "cover" sized to the canvas (the smallest size at
//! which it fills the canvas on both axes), then multiplied by the zoom
//! scale. The relative position names the center of the visible crop.
//! The crop rectangle is clamped so the image cannot be dragged off the
//! canvas; when the scaled image is smaller than the canvas on some axis,
//! the clamp widens so the image can move anywhere within the canvas.

use std::rc::Rc;

use image::RgbaImage;

use crate::asset::UploadedImage;
use crate::render;
use crate::types::{CompositorError, Dimensions, Precondition, RelativePosition, Transform};

/// The visible crop, in fractions of the scaled image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width (greater than 1.0 when the image is narrower than the canvas).
    pub width: f64,
    /// Height (greater than 1.0 when the image is shorter than the canvas).
    pub height: f64,
}

/// Destination rectangle of the image on the canvas, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Left edge (may be negative).
    pub x: f64,
    /// Top edge (may be negative).
    pub y: f64,
    /// Drawn width.
    pub width: f64,
    /// Drawn height.
    pub height: f64,
}

impl Placement {
    /// Center of the drawn image.
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (
            self.width.mul_add(0.5, self.x),
            self.height.mul_add(0.5, self.y),
        )
    }
}

/// Cover size of `image` on `canvas` at scale 1.
fn cover_size(canvas: Dimensions, image: Dimensions) -> (f64, f64) {
    let (cw, ch) = (f64::from(canvas.width), f64::from(canvas.height));
    let (iw, ih) = (f64::from(image.width), f64::from(image.height));
    if ch / cw > ih / iw {
        (iw * (ch / ih), ch)
    } else {
        (cw, ih * (cw / iw))
    }
}

/// Shared geometry for one `(canvas, image, scale)` triple.
struct Geometry {
    cover_w: f64,
    cover_h: f64,
    rel_w: f64,
    rel_h: f64,
    scale: f64,
}

impl Geometry {
    fn new(canvas: Dimensions, image: Dimensions, scale: f64) -> Option<Self> {
        if canvas.is_degenerate() || image.is_degenerate() || !(scale.is_finite() && scale > 0.0)
        {
            return None;
        }
        let (cover_w, cover_h) = cover_size(canvas, image);
        let canvas_aspect = canvas.aspect();
        let cover_aspect = cover_w / cover_h;
        let x_scale = (canvas_aspect / cover_aspect).min(1.0);
        let y_scale = (cover_aspect / canvas_aspect).min(1.0);
        Some(Self {
            cover_w,
            cover_h,
            rel_w: x_scale / scale,
            rel_h: y_scale / scale,
            scale,
        })
    }

    fn crop(&self, position: RelativePosition) -> CropRect {
        let (x_min, x_max, y_min, y_max) = if self.rel_w > 1.0 || self.rel_h > 1.0 {
            (-self.rel_w, 1.0, -self.rel_h, 1.0)
        } else {
            (0.0, 1.0 - self.rel_w, 0.0, 1.0 - self.rel_h)
        };
        CropRect {
            x: (position.x - self.rel_w / 2.0).min(x_max).max(x_min),
            y: (position.y - self.rel_h / 2.0).min(y_max).max(y_min),
            width: self.rel_w,
            height: self.rel_h,
        }
    }

    fn drawn_size(&self) -> (f64, f64) {
        (self.cover_w * self.scale, self.cover_h * self.scale)
    }
}

/// Compute the clamped crop rectangle.
///
/// Returns `None` for degenerate dimensions or a non-positive scale.
#[must_use]
pub fn crop_rect(canvas: Dimensions, image: Dimensions, transform: Transform) -> Option<CropRect> {
    Geometry::new(canvas, image, transform.scale).map(|g| g.crop(transform.position))
}

/// Compute where the image is drawn on the canvas.
///
/// Returns `None` for degenerate dimensions or a non-positive scale.
#[must_use]
pub fn placement(canvas: Dimensions, image: Dimensions, transform: Transform) -> Option<Placement> {
    let geometry = Geometry::new(canvas, image, transform.scale)?;
    let crop = geometry.crop(transform.position);
    let (width, height) = geometry.drawn_size();
    Some(Placement {
        x: -crop.x * width,
        y: -crop.y * height,
        width,
        height,
    })
}

/// Compute the position reported after dragging by `(dx, dy)` canvas
/// pixels.
///
/// The image follows the pointer: a positive `dx` moves the image right,
/// which moves the visible crop left. The result is relative to the
/// clamped crop, so dragging past an edge does not accumulate.
#[must_use]
pub fn drag_position(
    canvas: Dimensions,
    image: Dimensions,
    transform: Transform,
    dx: f64,
    dy: f64,
) -> Option<RelativePosition> {
    let geometry = Geometry::new(canvas, image, transform.scale)?;
    let crop = geometry.crop(transform.position);
    let (width, height) = geometry.drawn_size();
    let left = crop.x.mul_add(width, -dx);
    let top = crop.y.mul_add(height, -dy);
    Some(RelativePosition::new(
        left / width + geometry.rel_w / 2.0,
        top / height + geometry.rel_h / 2.0,
    ))
}

/// Draw `image` onto a transparent `canvas`-sized raster at the
/// placement given by `transform`.
///
/// # Errors
///
/// Returns [`CompositorError::DegenerateImage`] when no placement exists
/// and [`CompositorError::CanvasAllocation`] when the canvas cannot be
/// created.
pub(crate) fn rasterize(
    canvas: Dimensions,
    image: &UploadedImage,
    transform: Transform,
) -> Result<RgbaImage, CompositorError> {
    let target = placement(canvas, image.dimensions(), transform)
        .ok_or_else(|| CompositorError::degenerate(canvas))?;

    let mut surface = render::allocate(canvas)?;
    let source = render::to_pixmap(image.pixels())?;
    render::draw_into(&mut surface, &source, target);
    Ok(render::from_pixmap(&surface))
}

/// Capabilities of the embedded pan/zoom editing surface.
///
/// The session pushes state in through the setters; drag gestures on
/// the image are handled by the surface, which reports the resulting
/// relative position back to the caller.
pub trait EditorSurface {
    /// Set the canvas size (the frame's natural dimensions).
    fn set_canvas_size(&mut self, size: Dimensions);

    /// Replace the displayed image.
    fn set_image(&mut self, image: Rc<UploadedImage>);

    /// Set the zoom scale.
    fn set_scale(&mut self, scale: f64);

    /// Set the relative position.
    fn set_position(&mut self, position: RelativePosition);

    /// Pan the image by a canvas-pixel delta.
    ///
    /// Returns the position-change report, or `None` if there is no
    /// image to drag.
    fn drag(&mut self, dx: f64, dy: f64) -> Option<RelativePosition>;

    /// Render the image at the canvas size with the current transform.
    ///
    /// # Errors
    ///
    /// Returns [`CompositorError::ExportPrecondition`] when no image has
    /// been set, and [`CompositorError::CanvasAllocation`] when the
    /// canvas cannot be created.
    fn canvas_snapshot(&self) -> Result<RgbaImage, CompositorError>;
}

/// `tiny-skia` implementation of [`EditorSurface`].
#[derive(Debug, Clone)]
pub struct RasterSurface {
    canvas: Dimensions,
    image: Option<Rc<UploadedImage>>,
    transform: Transform,
}

impl RasterSurface {
    /// Create an empty surface with the given canvas size.
    #[must_use]
    pub fn new(canvas: Dimensions) -> Self {
        Self {
            canvas,
            image: None,
            transform: Transform::default(),
        }
    }

    /// Canvas size.
    #[must_use]
    pub const fn canvas_size(&self) -> Dimensions {
        self.canvas
    }

    /// Current transform as last pushed by the session.
    #[must_use]
    pub const fn transform(&self) -> Transform {
        self.transform
    }

    /// Current placement of the image, if one is set.
    #[must_use]
    pub fn placement(&self) -> Option<Placement> {
        let image = self.image.as_ref()?;
        placement(self.canvas, image.dimensions(), self.transform)
    }
}

impl EditorSurface for RasterSurface {
    fn set_canvas_size(&mut self, size: Dimensions) {
        self.canvas = size;
    }

    fn set_image(&mut self, image: Rc<UploadedImage>) {
        self.image = Some(image);
    }

    fn set_scale(&mut self, scale: f64) {
        self.transform.scale = scale;
    }

    fn set_position(&mut self, position: RelativePosition) {
        self.transform.position = position;
    }

    fn drag(&mut self, dx: f64, dy: f64) -> Option<RelativePosition> {
        let image = self.image.as_ref()?;
        let position = drag_position(self.canvas, image.dimensions(), self.transform, dx, dy)?;
        self.transform.position = position;
        Some(position)
    }

    fn canvas_snapshot(&self) -> Result<RgbaImage, CompositorError> {
        let image = self
            .image
            .as_ref()
            .ok_or(CompositorError::ExportPrecondition(Precondition::NoImageSelected))?;
        rasterize(self.canvas, image, self.transform)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    const EPS: f64 = 1e-9;

    fn dims(w: u32, h: u32) -> Dimensions {
        Dimensions::new(w, h)
    }

    #[test]
    fn cover_wide_image_on_square_canvas() {
        let (w, h) = cover_size(dims(800, 800), dims(1200, 600));
        assert_relative_eq!(w, 1600.0, epsilon = EPS);
        assert_relative_eq!(h, 800.0, epsilon = EPS);
    }

    #[test]
    fn cover_tall_image_on_square_canvas() {
        let (w, h) = cover_size(dims(800, 800), dims(500, 1000));
        assert_relative_eq!(w, 800.0, epsilon = EPS);
        assert_relative_eq!(h, 1600.0, epsilon = EPS);
    }

    #[test]
    fn centered_placement_is_centered_on_canvas() {
        for (canvas, image, scale) in [
            (dims(800, 800), dims(1200, 600), 0.6667),
            (dims(800, 800), dims(500, 1000), 0.8),
            (dims(1600, 800), dims(640, 480), 1.0),
            (dims(800, 800), dims(800, 800), 2.5),
        ] {
            let p = placement(canvas, image, Transform::centered(scale)).unwrap();
            let (cx, cy) = p.center();
            assert_relative_eq!(cx, f64::from(canvas.width) / 2.0, epsilon = EPS);
            assert_relative_eq!(cy, f64::from(canvas.height) / 2.0, epsilon = EPS);
        }
    }

    #[test]
    fn scale_one_same_aspect_fills_canvas_exactly() {
        let p = placement(dims(800, 800), dims(400, 400), Transform::centered(1.0)).unwrap();
        assert_relative_eq!(p.x, 0.0, epsilon = EPS);
        assert_relative_eq!(p.y, 0.0, epsilon = EPS);
        assert_relative_eq!(p.width, 800.0, epsilon = EPS);
        assert_relative_eq!(p.height, 800.0, epsilon = EPS);
    }

    #[test]
    fn crop_is_clamped_inside_image_when_zoomed() {
        let transform = Transform {
            scale: 2.0,
            position: RelativePosition::new(0.0, 1.0),
        };
        let crop = crop_rect(dims(800, 800), dims(800, 800), transform).unwrap();
        assert_relative_eq!(crop.width, 0.5, epsilon = EPS);
        assert_relative_eq!(crop.x, 0.0, epsilon = EPS);
        assert_relative_eq!(crop.y, 0.5, epsilon = EPS);
    }

    #[test]
    fn drag_moves_image_with_pointer() {
        let canvas = dims(800, 800);
        let image = dims(800, 800);
        let transform = Transform::centered(2.0);
        let before = placement(canvas, image, transform).unwrap();
        let position = drag_position(canvas, image, transform, 100.0, -50.0).unwrap();
        let after = placement(
            canvas,
            image,
            Transform {
                position,
                ..transform
            },
        )
        .unwrap();
        assert_relative_eq!(after.x - before.x, 100.0, epsilon = EPS);
        assert_relative_eq!(after.y - before.y, -50.0, epsilon = EPS);
    }

    #[test]
    fn drag_past_edge_stops_at_edge() {
        let canvas = dims(800, 800);
        let image = dims(800, 800);
        let transform = Transform::centered(2.0);
        let position = drag_position(canvas, image, transform, 10_000.0, 0.0).unwrap();
        let after = placement(
            canvas,
            image,
            Transform {
                position,
                ..transform
            },
        )
        .unwrap();
        // Image left edge pinned to the canvas left edge.
        assert_relative_eq!(after.x, 0.0, epsilon = EPS);
    }

    #[test]
    fn degenerate_inputs_have_no_placement() {
        assert!(placement(dims(0, 800), dims(10, 10), Transform::centered(1.0)).is_none());
        assert!(placement(dims(800, 800), dims(10, 10), Transform::centered(0.0)).is_none());
        assert!(placement(dims(800, 800), dims(10, 10), Transform::centered(f64::NAN)).is_none());
    }

    #[test]
    fn snapshot_without_image_is_precondition_error() {
        let surface = RasterSurface::new(dims(10, 10));
        assert!(matches!(
            surface.canvas_snapshot(),
            Err(CompositorError::ExportPrecondition(
                Precondition::NoImageSelected
            ))
        ));
    }

    #[test]
    fn snapshot_has_canvas_size_and_image_color() {
        let pixels = RgbaImage::from_pixel(40, 40, image::Rgba([200, 10, 10, 255]));
        let image = Rc::new(UploadedImage::from_rgba("red.png", pixels).unwrap());
        let mut surface = RasterSurface::new(dims(20, 30));
        surface.set_image(image);
        surface.set_scale(1.0);
        let snapshot = surface.canvas_snapshot().unwrap();
        assert_eq!((snapshot.width(), snapshot.height()), (20, 30));
        let center = snapshot.get_pixel(10, 15).0;
        assert!(center[0] >= 198 && center[1] <= 12 && center[3] == 255, "{center:?}");
    }

    #[test]
    fn surface_drag_updates_its_position() {
        let pixels = RgbaImage::from_pixel(10, 10, image::Rgba([0, 0, 0, 255]));
        let mut surface = RasterSurface::new(dims(100, 100));
        assert!(surface.drag(5.0, 5.0).is_none());
        surface.set_image(Rc::new(UploadedImage::from_rgba("a", pixels).unwrap()));
        surface.set_scale(2.0);
        let reported = surface.drag(-10.0, 0.0).unwrap();
        assert_eq!(surface.transform().position, reported);
        assert!(reported.x > 0.5);
    }
}
