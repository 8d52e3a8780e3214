//! Decoded raster assets: the frame overlay and the uploaded photo.
//!
//! Both are decoded from raw bytes (PNG, JPEG, BMP, WebP, GIF -- whatever
//! the `image` crate was built with) into straight-alpha RGBA. Neither
//! is ever mutated after construction; a re-upload replaces the
//! [`UploadedImage`] wholesale.
//!
//! The EXIF orientation tag is applied at decode time, so dimensions
//! are always the upright ones the browser shows.

use std::io::Cursor;

use image::{DynamicImage, ImageDecoder, ImageReader, RgbaImage};

use crate::types::{CompositorError, Dimensions};

/// Decode raw image bytes into an RGBA raster.
///
/// # Errors
///
/// Returns [`CompositorError::EmptyInput`] if `bytes` is empty.
/// Returns [`CompositorError::ImageDecode`] if the format is
/// unrecognized or the data is corrupt.
/// Returns [`CompositorError::DegenerateImage`] if the decoded image has
/// a zero-length axis.
pub fn decode_rgba(bytes: &[u8]) -> Result<RgbaImage, CompositorError> {
    if bytes.is_empty() {
        return Err(CompositorError::EmptyInput);
    }

    let mut decoder = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(image::ImageError::from)?
        .into_decoder()?;
    let orientation = decoder.orientation()?;
    let mut image = DynamicImage::from_decoder(decoder)?;
    image.apply_orientation(orientation);
    let rgba = image.to_rgba8();
    let dimensions = Dimensions::new(rgba.width(), rgba.height());
    if dimensions.is_degenerate() {
        return Err(CompositorError::degenerate(dimensions));
    }
    Ok(rgba)
}

/// The static decorative overlay.
///
/// Its natural dimensions define the working coordinate space for the
/// whole session and the aspect ratio of every export.
#[derive(Debug, Clone)]
pub struct FrameSpec {
    source: String,
    pixels: RgbaImage,
}

impl FrameSpec {
    /// Decode a frame from the bytes fetched at `source`.
    ///
    /// # Errors
    ///
    /// See [`decode_rgba`].
    pub fn decode(source: impl Into<String>, bytes: &[u8]) -> Result<Self, CompositorError> {
        let pixels = decode_rgba(bytes)?;
        Ok(Self {
            source: source.into(),
            pixels,
        })
    }

    /// Wrap an already-decoded raster.
    ///
    /// # Errors
    ///
    /// Returns [`CompositorError::DegenerateImage`] for a zero-sized raster.
    pub fn from_rgba(source: impl Into<String>, pixels: RgbaImage) -> Result<Self, CompositorError> {
        let dimensions = Dimensions::new(pixels.width(), pixels.height());
        if dimensions.is_degenerate() {
            return Err(CompositorError::degenerate(dimensions));
        }
        Ok(Self {
            source: source.into(),
            pixels,
        })
    }

    /// Path the frame was loaded from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Natural pixel dimensions.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.pixels.width(), self.pixels.height())
    }

    /// Decoded pixels.
    #[must_use]
    pub const fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

/// A user-supplied photo.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    name: String,
    pixels: RgbaImage,
}

impl UploadedImage {
    /// Decode an uploaded file.
    ///
    /// # Errors
    ///
    /// See [`decode_rgba`].
    pub fn decode(name: impl Into<String>, bytes: &[u8]) -> Result<Self, CompositorError> {
        let pixels = decode_rgba(bytes)?;
        Ok(Self {
            name: name.into(),
            pixels,
        })
    }

    /// Wrap an already-decoded raster.
    ///
    /// # Errors
    ///
    /// Returns [`CompositorError::DegenerateImage`] for a zero-sized raster.
    pub fn from_rgba(name: impl Into<String>, pixels: RgbaImage) -> Result<Self, CompositorError> {
        let dimensions = Dimensions::new(pixels.width(), pixels.height());
        if dimensions.is_degenerate() {
            return Err(CompositorError::degenerate(dimensions));
        }
        Ok(Self {
            name: name.into(),
            pixels,
        })
    }

    /// Original file name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Natural pixel dimensions.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.pixels.width(), self.pixels.height())
    }

    /// Decoded pixels.
    #[must_use]
    pub const fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}
