//! Fetching the frame asset from the hosting origin.

use twibbon_core::{CompositorError, FrameSpec};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

/// Errors that can occur while loading the frame.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A browser API call returned an error (including network failure).
    #[error("browser API error: {0}")]
    JsError(String),

    /// The server answered with a non-success status.
    #[error("fetching {path} failed with HTTP {status}")]
    Http {
        /// Requested path.
        path: String,
        /// HTTP status code.
        status: u16,
    },

    /// The response body is not a usable image.
    #[error(transparent)]
    Decode(#[from] CompositorError),
}

impl From<JsValue> for LoadError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

/// Fetch `path` and return the response body.
///
/// # Errors
///
/// Returns [`LoadError::JsError`] on network or API failure and
/// [`LoadError::Http`] for a non-2xx status.
pub async fn fetch_bytes(path: &str) -> Result<Vec<u8>, LoadError> {
    let window = web_sys::window().ok_or_else(|| LoadError::JsError("no global window".into()))?;
    let response = JsFuture::from(window.fetch_with_str(path)).await?;
    let response: web_sys::Response = response
        .dyn_into()
        .map_err(|e| LoadError::JsError(format!("fetch did not return a Response: {e:?}")))?;

    if !response.ok() {
        return Err(LoadError::Http {
            path: path.to_owned(),
            status: response.status(),
        });
    }

    let buffer = JsFuture::from(response.array_buffer()?).await?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

/// Fetch and decode the frame at `path`.
///
/// # Errors
///
/// See [`fetch_bytes`]; decoding failures surface as [`LoadError::Decode`].
pub async fn load_frame(path: &str) -> Result<FrameSpec, LoadError> {
    let bytes = fetch_bytes(path).await?;
    tracing::debug!(path, bytes = bytes.len(), "fetched frame");
    Ok(FrameSpec::decode(path, &bytes)?)
}
