//! Export compositing: base layer under frame, white background, PNG out.
//!
//! The output keeps the frame's aspect ratio and its longer side equals
//! the requested target resolution, independent of the photo's
//! resolution. Rasterisation and resampling go through `tiny-skia`;
//! PNG encoding goes through the `image` crate.

use image::{ImageEncoder, RgbaImage};
use tiny_skia::{Color, FilterQuality, IntSize, Pixmap, PixmapPaint};

use crate::asset::{FrameSpec, UploadedImage};
use crate::surface::{self, Placement};
use crate::types::{CompositorError, Dimensions, Transform};

/// A composed export, encoded as PNG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    /// PNG-encoded bytes.
    pub png: Vec<u8>,
    /// Pixel dimensions of the encoded image.
    pub dimensions: Dimensions,
}

/// Compute the export size for a frame and a target longer side.
///
/// `factor = target / max(frame_w, frame_h)`; each axis is
/// `round(axis * factor)`.
///
/// # Errors
///
/// Returns [`CompositorError::DegenerateImage`] for a zero-sized frame.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn output_dimensions(frame: Dimensions, target: u32) -> Result<Dimensions, CompositorError> {
    if frame.is_degenerate() {
        return Err(CompositorError::degenerate(frame));
    }
    let factor = f64::from(target) / f64::from(frame.long_side());
    let width = (f64::from(frame.width) * factor).round() as u32;
    let height = (f64::from(frame.height) * factor).round() as u32;
    Ok(Dimensions::new(width, height))
}

/// Allocate a transparent surface.
///
/// # Errors
///
/// Returns [`CompositorError::CanvasAllocation`] if `tiny-skia` refuses
/// the size (zero-sized or too large).
pub(crate) fn allocate(size: Dimensions) -> Result<Pixmap, CompositorError> {
    Pixmap::new(size.width, size.height).ok_or(CompositorError::CanvasAllocation {
        width: size.width,
        height: size.height,
    })
}

#[allow(clippy::cast_possible_truncation)]
const fn premultiply(channel: u8, alpha: u8) -> u8 {
    ((channel as u16 * alpha as u16 + 127) / 255) as u8
}

/// Convert straight-alpha RGBA into a premultiplied `tiny-skia` pixmap.
///
/// # Errors
///
/// Returns [`CompositorError::CanvasAllocation`] if the size is rejected.
pub(crate) fn to_pixmap(image: &RgbaImage) -> Result<Pixmap, CompositorError> {
    let alloc_error = || CompositorError::CanvasAllocation {
        width: image.width(),
        height: image.height(),
    };
    let size = IntSize::from_wh(image.width(), image.height()).ok_or_else(alloc_error)?;

    let mut data = Vec::with_capacity(image.as_raw().len());
    for pixel in image.pixels() {
        let [r, g, b, a] = pixel.0;
        data.extend_from_slice(&[
            premultiply(r, a),
            premultiply(g, a),
            premultiply(b, a),
            a,
        ]);
    }
    Pixmap::from_vec(data, size).ok_or_else(alloc_error)
}

/// Convert a premultiplied pixmap back into straight-alpha RGBA.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn from_pixmap(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (pixel, src) in img.pixels_mut().zip(pixmap.data().chunks_exact(4)) {
        let a = src[3];
        if a == 0 {
            *pixel = image::Rgba([0, 0, 0, 0]);
        } else {
            let unpremultiply = |c: u8| (u16::from(c) * 255 / u16::from(a)) as u8;
            *pixel = image::Rgba([unpremultiply(src[0]), unpremultiply(src[1]), unpremultiply(src[2]), a]);
        }
    }
    img
}

/// Draw `source` stretched into `target` on `canvas`.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub(crate) fn draw_into(canvas: &mut Pixmap, source: &Pixmap, target: Placement) {
    let sx = target.width as f32 / source.width() as f32;
    let sy = target.height as f32 / source.height() as f32;
    let paint = PixmapPaint {
        quality: FilterQuality::Bicubic,
        ..PixmapPaint::default()
    };
    canvas.draw_pixmap(
        0,
        0,
        source.as_ref(),
        &paint,
        tiny_skia::Transform::from_row(sx, 0.0, 0.0, sy, target.x as f32, target.y as f32),
        None,
    );
}

/// Placement covering the whole of `size`.
fn full(size: Dimensions) -> Placement {
    Placement {
        x: 0.0,
        y: 0.0,
        width: f64::from(size.width),
        height: f64::from(size.height),
    }
}

/// Composite a base layer and the frame at the target resolution.
///
/// The output is filled opaque white, then the base layer and the frame
/// are each stretched to the full output size, frame on top.
///
/// # Errors
///
/// Returns [`CompositorError::CanvasAllocation`] if the output surface
/// cannot be created, and [`CompositorError::DegenerateImage`] for a
/// zero-sized frame.
pub fn compose(
    base_layer: &RgbaImage,
    frame: &FrameSpec,
    target: u32,
) -> Result<RgbaImage, CompositorError> {
    let size = output_dimensions(frame.dimensions(), target)?;
    let mut output = allocate(size)?;
    output.fill(Color::WHITE);

    let base = to_pixmap(base_layer)?;
    draw_into(&mut output, &base, full(size));

    let overlay = to_pixmap(frame.pixels())?;
    draw_into(&mut output, &overlay, full(size));

    Ok(from_pixmap(&output))
}

/// Encode an RGBA image as PNG bytes.
///
/// # Errors
///
/// Returns [`CompositorError::PngEncode`] if encoding fails.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, CompositorError> {
    let mut png = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut png);
    encoder
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| CompositorError::PngEncode(e.to_string()))?;
    Ok(png)
}

/// Render the final export for a transform, photo, and frame.
///
/// The base layer is drawn at the frame's natural size with the same
/// geometry the editing surface uses, then composited by [`compose`]
/// and encoded.
///
/// # Errors
///
/// Propagates allocation and encoding failures; nothing is produced on
/// error.
pub fn render(
    transform: Transform,
    image: &UploadedImage,
    frame: &FrameSpec,
    target: u32,
) -> Result<RenderedImage, CompositorError> {
    let base_layer = surface::rasterize(frame.dimensions(), image, transform)?;
    render_base_layer(&base_layer, frame, target)
}

/// Composite and encode an already-rendered base layer.
///
/// # Errors
///
/// See [`compose`] and [`encode_png`].
pub fn render_base_layer(
    base_layer: &RgbaImage,
    frame: &FrameSpec,
    target: u32,
) -> Result<RenderedImage, CompositorError> {
    let composed = compose(base_layer, frame, target)?;
    let dimensions = Dimensions::new(composed.width(), composed.height());
    let png = encode_png(&composed)?;
    tracing::info!(%dimensions, bytes = png.len(), "rendered export");
    Ok(RenderedImage { png, dimensions })
}
