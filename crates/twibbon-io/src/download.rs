//! Saving the composed PNG, and the blocking alert used for export
//! failures.
//!
//! The PNG bytes go into a `Blob`; an object URL for it is clicked
//! through a temporary `<a download>` element. Browser only.

use twibbon_core::ExportArtifact;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys::BlobPropertyBag;

/// Errors that can occur when triggering a file download.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// A browser API call returned an error.
    #[error("browser API error: {0}")]
    JsError(String),
}

impl From<JsValue> for DownloadError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

/// Trigger a file download of binary `data` in the browser.
///
/// Creates a `Blob` from the bytes, generates an object URL, and
/// programmatically clicks a temporary `<a download="filename">` element.
/// The object URL is revoked after the click.
///
/// # Errors
///
/// Returns [`DownloadError::JsError`] if any browser API call fails
/// (e.g., `Blob` creation, `URL.createObjectURL`, element creation).
pub fn trigger_download(data: &[u8], filename: &str, mime_type: &str) -> Result<(), DownloadError> {
    let window =
        web_sys::window().ok_or_else(|| DownloadError::JsError("no global window".into()))?;
    let document = window
        .document()
        .ok_or_else(|| DownloadError::JsError("no document".into()))?;

    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(data));

    let opts = BlobPropertyBag::new();
    opts.set_type(mime_type);

    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &opts)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)?;

    let anchor: web_sys::HtmlAnchorElement = document
        .create_element("a")?
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .map_err(|e| DownloadError::JsError(format!("failed to cast element: {e:?}")))?;

    anchor.set_href(&url);
    anchor.set_download(filename);

    let body = document
        .body()
        .ok_or_else(|| DownloadError::JsError("no document body".into()))?;
    body.append_child(&anchor)?;
    anchor.click();

    // The download has already started; cleanup failures are not
    // download failures.
    let _ = body.remove_child(&anchor);
    let _ = web_sys::Url::revoke_object_url(&url);

    tracing::info!(filename, bytes = data.len(), "download triggered");
    Ok(())
}

/// Save an export under its own file name.
///
/// # Errors
///
/// See [`trigger_download`].
pub fn save_export(artifact: &ExportArtifact) -> Result<(), DownloadError> {
    trigger_download(&artifact.png, &artifact.filename, ExportArtifact::MIME_TYPE)
}

/// Show a blocking `window.alert` with `message`.
///
/// Falls back to a console warning when no window is available or the
/// alert call itself fails.
pub fn alert(message: &str) {
    let shown = web_sys::window().is_some_and(|w| w.alert_with_message(message).is_ok());
    if !shown {
        tracing::warn!(message, "alert unavailable");
    }
}
