//! File download via Blob URLs.
//!
//! Used to save the annotation document and the rendered overlay from
//! the page. Downloads of job outputs are plain links to the service.
//!
//! All functions in this module require a browser environment
//! (`wasm32-unknown-unknown` target).

use gatecount_core::{JobPayload, SessionId};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys::BlobPropertyBag;

/// Errors that can occur when triggering a file download.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// A browser API call returned an error.
    #[error("browser API error: {0}")]
    JsError(String),

    /// The document could not be serialized.
    #[error(transparent)]
    Export(#[from] gatecount_export::ExportError),
}

impl From<JsValue> for DownloadError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

/// File name of a saved annotation document.
#[must_use]
pub fn document_filename(session: &SessionId) -> String {
    format!("triplines_{session}.json")
}

/// Save the annotation as a tripline document.
///
/// # Errors
///
/// See [`DownloadError`].
pub fn download_document(document: &JobPayload, session: &SessionId) -> Result<(), DownloadError> {
    let json = gatecount_export::to_document_json(document)?;
    trigger_download(&json, &document_filename(session), "application/json")
}

/// Trigger a file download in the browser.
///
/// Creates a `Blob` from `data`, generates an object URL, and
/// programmatically clicks a temporary `<a download="filename">` element.
/// The object URL is revoked after the click.
///
/// # Errors
///
/// Returns [`DownloadError::JsError`] if any browser API call fails.
pub fn trigger_download(data: &str, filename: &str, mime_type: &str) -> Result<(), DownloadError> {
    let window =
        web_sys::window().ok_or_else(|| DownloadError::JsError("no global window".into()))?;
    let document = window
        .document()
        .ok_or_else(|| DownloadError::JsError("no document".into()))?;

    let parts = js_sys::Array::new();
    parts.push(&JsValue::from_str(data));
    let opts = BlobPropertyBag::new();
    opts.set_type(mime_type);
    let blob = web_sys::Blob::new_with_str_sequence_and_options(&parts, &opts)?;
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

    // The download has started; cleanup failures are not reported.
    let _ = body.remove_child(&anchor);
    let _ = web_sys::Url::revoke_object_url(&url);

    tracing::debug!(filename, mime_type, bytes = data.len(), "download triggered");
    Ok(())
}
