//! Processing-service client over the browser `fetch` API.
//!
//! Each method issues one call of the service contract and decodes the
//! JSON body. The service reports many failures as JSON with a non-2xx
//! status (`{"error": ..}` with 400, the results endpoint's 202), so
//! bodies are decoded regardless of status and the caller interprets
//! them. Only a rejected request or an undecodable body is an error
//! here.
//!
//! All methods require a browser environment (`wasm32-unknown-unknown`).

use gatecount_core::submit::{MODEL_FILE_FIELD, VIDEO_FILE_FIELD};
use gatecount_core::{
    Endpoints, InitializeResponse, PreProcess, PreProcessResponse, ResultsResponse, SessionId,
    StageProgress, StartProcessing, StartProcessingResponse,
};
use dioxus::html::FileData;
use serde::de::DeserializeOwned;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FormData, Headers, Request, RequestInit, Response};

/// Errors from a service call.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request was rejected or a browser API call failed.
    #[error("network error: {0}")]
    JsError(String),

    /// The body was not the expected JSON.
    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<JsValue> for FetchError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

/// A file picked by the operator.
///
/// Holds the browser's `File` handle so the request body streams from
/// disk instead of being buffered in WASM memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    /// Original file name, sent as the multipart filename.
    pub name: String,
    /// The picked file.
    pub file: File,
}

impl Upload {
    /// Wrap a file from an input or drop event.
    ///
    /// Returns `None` when the event file is not backed by a browser
    /// `File` (only the web renderer provides one).
    #[must_use]
    pub fn from_file_data(data: &FileData) -> Option<Self> {
        let file = data.inner().downcast_ref::<File>()?;
        Some(Self {
            name: data.name(),
            file: file.clone(),
        })
    }
}

/// Client for the processing service.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServiceClient {
    endpoints: Endpoints,
}

impl ServiceClient {
    /// A client for `endpoints`.
    #[must_use]
    pub const fn new(endpoints: Endpoints) -> Self {
        Self { endpoints }
    }

    /// The endpoint builder in use.
    #[must_use]
    pub const fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Upload the video and request a reference frame.
    ///
    /// # Errors
    ///
    /// See [`FetchError`].
    #[allow(clippy::future_not_send)] // WASM is single-threaded; JsFuture is !Send
    pub async fn initialize(&self, video: &Upload) -> Result<InitializeResponse, FetchError> {
        let form = FormData::new()?;
        append_file(&form, VIDEO_FILE_FIELD, video)?;
        let url = self.endpoints.initialize();
        tracing::debug!(%url, file = %video.name, size = video.file.size(), "uploading video");
        post(&url, &form.into(), None).await
    }

    /// Send the job form with the serialized triplines and directions.
    ///
    /// # Errors
    ///
    /// See [`FetchError`].
    #[allow(clippy::future_not_send)]
    pub async fn pre_process(
        &self,
        step: &PreProcess,
        model: Option<&Upload>,
    ) -> Result<PreProcessResponse, FetchError> {
        let form = FormData::new()?;
        for (name, value) in step.form_fields() {
            form.append_with_str(name, value)?;
        }
        if let Some(model) = model {
            append_file(&form, MODEL_FILE_FIELD, model)?;
        }
        post(&step.url(&self.endpoints), &form.into(), None).await
    }

    /// Start the job with the structured payload.
    ///
    /// # Errors
    ///
    /// See [`FetchError`].
    #[allow(clippy::future_not_send)]
    pub async fn start_processing(
        &self,
        step: &StartProcessing,
    ) -> Result<StartProcessingResponse, FetchError> {
        let body = serde_json::to_string(step.payload())?;
        post(
            &step.url(&self.endpoints),
            &JsValue::from_str(&body),
            Some("application/json"),
        )
        .await
    }

    /// Query per-stage progress.
    ///
    /// # Errors
    ///
    /// See [`FetchError`].
    #[allow(clippy::future_not_send)]
    pub async fn progress(&self, session: &SessionId) -> Result<StageProgress, FetchError> {
        get(&self.endpoints.progress(session)).await
    }

    /// Query the failure detail of a finished job.
    ///
    /// # Errors
    ///
    /// See [`FetchError`].
    #[allow(clippy::future_not_send)]
    pub async fn results(&self, session: &SessionId) -> Result<ResultsResponse, FetchError> {
        get(&self.endpoints.results(session)).await
    }
}

/// Decode a response body.
///
/// # Errors
///
/// Returns [`FetchError::Decode`] if `text` is not JSON of shape `T`.
pub fn decode_body<T: DeserializeOwned>(text: &str) -> Result<T, FetchError> {
    Ok(serde_json::from_str(text)?)
}

fn append_file(form: &FormData, field: &str, upload: &Upload) -> Result<(), FetchError> {
    form.append_with_blob_and_filename(field, &upload.file, &upload.name)?;
    Ok(())
}

#[allow(clippy::future_not_send)]
async fn post<T: DeserializeOwned>(
    url: &str,
    body: &JsValue,
    content_type: Option<&str>,
) -> Result<T, FetchError> {
    let init = RequestInit::new();
    init.set_method("POST");
    init.set_body(body);
    if let Some(content_type) = content_type {
        let headers = Headers::new()?;
        headers.set("Content-Type", content_type)?;
        init.set_headers(&headers);
    }
    send(url, &init).await
}

#[allow(clippy::future_not_send)]
async fn get<T: DeserializeOwned>(url: &str) -> Result<T, FetchError> {
    let init = RequestInit::new();
    init.set_method("GET");
    send(url, &init).await
}

#[allow(clippy::future_not_send)]
async fn send<T: DeserializeOwned>(url: &str, init: &RequestInit) -> Result<T, FetchError> {
    let window = web_sys::window().ok_or_else(|| FetchError::JsError("no global window".into()))?;
    let request = Request::new_with_str_and_init(url, init)?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await?
        .dyn_into()
        .map_err(|e| FetchError::JsError(format!("fetch did not return a Response: {e:?}")))?;
    let status = response.status();
    let text = JsFuture::from(response.text()?)
        .await?
        .as_string()
        .ok_or_else(|| FetchError::JsError("response body is not text".into()))?;
    tracing::trace!(%url, status, "response received");
    decode_body(&text)
}
