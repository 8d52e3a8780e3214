//! Blob URL creation for previewing encoded images.
//!
//! The editor shows the uploaded photo and the export result through
//! `<img src>` pointing at object URLs, so the browser decodes and
//! scales them natively.

use wasm_bindgen::JsValue;
use web_sys::BlobPropertyBag;

/// Errors that can occur during Blob URL creation.
#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    /// A browser API call returned an error.
    #[error("browser API error: {0}")]
    JsError(String),
}

impl From<JsValue> for RasterError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

/// Guess the MIME type of an uploaded file from its name.
///
/// Unknown extensions map to `application/octet-stream`; browsers sniff
/// image content regardless.
#[must_use]
pub fn mime_for_filename(name: &str) -> &'static str {
    name.rsplit_once('.')
        .and_then(|(_, ext)| image::ImageFormat::from_extension(ext))
        .map_or("application/octet-stream", |format| format.to_mime_type())
}

/// Wrap encoded image bytes in a Blob URL for use as an `<img src>`.
///
/// The returned URL must be revoked via [`revoke_blob_url`] when no
/// longer needed to avoid memory leaks.
///
/// # Errors
///
/// Returns [`RasterError::JsError`] if Blob or URL creation fails.
pub fn bytes_to_blob_url(bytes: &[u8], mime_type: &str) -> Result<String, RasterError> {
    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(bytes));

    let opts = BlobPropertyBag::new();
    opts.set_type(mime_type);
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &opts)?;

    let url = web_sys::Url::create_object_url_with_blob(&blob)?;
    Ok(url)
}

/// Revoke a Blob URL previously created by [`bytes_to_blob_url`].
///
/// Best-effort: failures are silently ignored since the URL may have
/// already been revoked or garbage collected.
pub fn revoke_blob_url(url: &str) {
    let _ = web_sys::Url::revoke_object_url(url);
}
