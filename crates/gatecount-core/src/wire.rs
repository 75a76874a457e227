//! HTTP contract with the processing service.
//!
//! URL construction and the JSON bodies exchanged with each endpoint.
//! Nothing here performs I/O; the browser client in `gatecount-io`
//! sends these shapes over `fetch`.

use serde::{Deserialize, Serialize};

use crate::directions::DirectionAssignment;
use crate::error::GENERIC_ERROR;
use crate::types::{SessionId, Tripline};

/// Status string of a successful initialize or pre-process call.
pub const STATUS_SUCCESS: &str = "success";

/// Status string of a successful start-processing call.
pub const STATUS_STARTED: &str = "Processing started";

/// Shown when the video upload request itself fails.
pub const UPLOAD_ERROR_MESSAGE: &str = "An error occurred while uploading the video.";

/// Builds endpoint URLs relative to a base prefix.
///
/// An empty base targets the page's own origin.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Endpoints {
    base_url: String,
}

impl Endpoints {
    /// Endpoints under `base_url`. A trailing `/` is dropped.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    /// Multipart video upload.
    #[must_use]
    pub fn initialize(&self) -> String {
        format!("{}/initialize", self.base_url)
    }

    /// Multipart form submission for `session`.
    #[must_use]
    pub fn pre_process(&self, session: &SessionId) -> String {
        format!("{}/pre_process/{}", self.base_url, encode_component(session.as_str()))
    }

    /// JSON job start for `session`.
    #[must_use]
    pub fn start_processing(&self, session: &SessionId) -> String {
        format!(
            "{}/start_processing/{}",
            self.base_url,
            encode_component(session.as_str())
        )
    }

    /// Progress query for `session`.
    #[must_use]
    pub fn progress(&self, session: &SessionId) -> String {
        format!(
            "{}/progress?session_id={}",
            self.base_url,
            encode_component(session.as_str())
        )
    }

    /// Results (failure detail) query for `session`.
    #[must_use]
    pub fn results(&self, session: &SessionId) -> String {
        format!(
            "{}/results?session_id={}",
            self.base_url,
            encode_component(session.as_str())
        )
    }

    /// Download URL for an output file of `session`.
    #[must_use]
    pub fn download(&self, session: &SessionId, file: &str) -> String {
        format!(
            "{}/download/{}/{}",
            self.base_url,
            encode_component(session.as_str()),
            encode_component(file)
        )
    }
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
///
/// Mirrors JavaScript's `encodeURIComponent` over UTF-8, except that
/// `!'()*` are escaped too. The result decodes identically either way.
///
/// Session identifiers are opaque, so they are encoded rather than
/// trusted to be URL-safe.
#[must_use]
pub fn encode_component(raw: &str) -> String {
    use std::fmt::Write as _;

    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            out.push(char::from(byte));
        } else {
            let _ = write!(out, "%{byte:02X}");
        }
    }
    out
}

/// Response of the initialize call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InitializeResponse {
    /// `"success"` or `"error"`.
    #[serde(default)]
    pub status: String,
    /// Issued session, on success.
    #[serde(default)]
    pub session_id: Option<SessionId>,
    /// Reference frame URL, on success.
    #[serde(default)]
    pub frame_url: Option<String>,
    /// Failure text, on error.
    #[serde(default)]
    pub message: Option<String>,
}

impl InitializeResponse {
    /// Session and frame URL if the upload succeeded.
    #[must_use]
    pub fn accepted(self) -> Option<(SessionId, String)> {
        if self.status != STATUS_SUCCESS {
            return None;
        }
        Some((self.session_id?, self.frame_url?))
    }

    /// Session and frame URL, or the text to show in the upload area.
    ///
    /// # Errors
    ///
    /// Returns the server's message, or the generic text if it sent
    /// none.
    pub fn outcome(self) -> Result<(SessionId, String), String> {
        let message = self
            .message
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| GENERIC_ERROR.to_owned());
        self.accepted().ok_or(message)
    }
}

/// Response of the pre-process call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PreProcessResponse {
    /// `"success"` when the form was stored.
    #[serde(default)]
    pub status: Option<String>,
    /// Failure text.
    #[serde(default)]
    pub error: Option<String>,
}

/// Basenames of the files a job will produce.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutputPaths {
    /// Spreadsheet report.
    #[serde(default)]
    pub report_path: Option<String>,
    /// Annotated video, present only when export was requested.
    #[serde(default)]
    pub annotated_video_path: Option<String>,
}

/// Response of the start-processing call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StartProcessingResponse {
    /// `"Processing started"` on success.
    #[serde(default)]
    pub status: Option<String>,
    /// Failure text.
    #[serde(default)]
    pub error: Option<String>,
    /// Echo of the session.
    #[serde(default)]
    pub session_id: Option<SessionId>,
    /// Output file names.
    #[serde(default)]
    pub paths: OutputPaths,
}

/// Response of the results call.
///
/// The service answers `202` with an `error` field while results are not
/// ready; the body is read the same way regardless of status.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResultsResponse {
    /// Human-readable failure detail.
    #[serde(default)]
    pub error: Option<String>,
}

impl ResultsResponse {
    /// The detail, if non-blank.
    #[must_use]
    pub fn detail(self) -> Option<String> {
        self.error.filter(|e| !e.trim().is_empty())
    }
}

/// Structured body of the start-processing call and the saved tripline
/// document format.
///
/// `{"triplines": [{"start": {..}, "end": {..}}], "directions": {"1": ..}}`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct JobPayload {
    /// Committed triplines in drawing order.
    pub triplines: Vec<Tripline>,
    /// Direction labels.
    pub directions: DirectionAssignment,
}

impl JobPayload {
    /// Serialized `triplines` field on its own, as sent in the multipart
    /// form.
    ///
    /// # Errors
    ///
    /// Returns a serialization error (not expected for these types).
    pub fn triplines_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.triplines)
    }

    /// Serialized `directions` field on its own.
    ///
    /// # Errors
    ///
    /// Returns a serialization error (not expected for these types).
    pub fn directions_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.directions)
    }
}
