//! Tripline document parsing and serialization.
//!
//! The saved form of an annotation is
//! `{"triplines": [{"start": {"x", "y"}, "end": {"x", "y"}}], "directions": {"1": ..}}`,
//! the same shape the start-processing call sends.
//!
//! [`parse_document`] also accepts the processing service's session log,
//! where each entry stores the form fields under `form_data` and the
//! `triplines` and `directions` values are JSON-encoded strings:
//!
//! ```json
//! {"3f2a": {"form_data": {"site_location": "Main St",
//!                         "triplines": "[{\"start\": ...}]",
//!                         "directions": "{\"1\": \"north\"}"}}}
//! ```

use serde_json::{Map, Value};

use gatecount_core::{DirectionAssignment, Dimensions, JobPayload, Tripline};

/// Errors from reading a tripline document.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The input (or a nested JSON string inside it) is not valid JSON
    /// of the expected shape.
    #[error("invalid tripline document: {0}")]
    Json(#[from] serde_json::Error),

    /// Neither a document nor a log entry.
    #[error("no `triplines` found in document")]
    MissingTriplines,

    /// The requested session is not in the log.
    #[error("session `{0}` not found in log")]
    UnknownSession(String),

    /// A log with several entries was given without choosing one.
    #[error("log contains {0} sessions; choose one")]
    AmbiguousLog(usize),
}

/// Read a tripline document, a single log entry, or a session log.
///
/// `session` picks an entry from a multi-session log; a log with a
/// single entry needs no selection.
///
/// # Errors
///
/// See [`ExportError`].
pub fn parse_document(json: &str, session: Option<&str>) -> Result<JobPayload, ExportError> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Object(root) = value else {
        return Err(ExportError::MissingTriplines);
    };

    if root.contains_key("triplines") {
        return from_fields(&root);
    }
    if let Some(Value::Object(form)) = root.get("form_data") {
        return from_fields(form);
    }
    from_log(&root, session)
}

fn from_log(log: &Map<String, Value>, session: Option<&str>) -> Result<JobPayload, ExportError> {
    let entry = match session {
        Some(id) => log
            .get(id)
            .ok_or_else(|| ExportError::UnknownSession(id.to_owned()))?,
        None => {
            let mut entries = log.values();
            match (entries.next(), entries.next()) {
                (Some(only), None) => only,
                (None, _) => return Err(ExportError::MissingTriplines),
                (Some(_), Some(_)) => return Err(ExportError::AmbiguousLog(log.len())),
            }
        }
    };
    entry
        .get("form_data")
        .and_then(Value::as_object)
        .ok_or(ExportError::MissingTriplines)
        .and_then(from_fields)
}

/// Read `triplines` and `directions` from an object where each may be
/// inline JSON or a JSON-encoded string.
fn from_fields(fields: &Map<String, Value>) -> Result<JobPayload, ExportError> {
    let triplines: Vec<Tripline> = match fields.get("triplines") {
        Some(value) => decode_field(value)?.ok_or(ExportError::MissingTriplines)?,
        None => return Err(ExportError::MissingTriplines),
    };
    let directions: DirectionAssignment = match fields.get("directions") {
        Some(value) => decode_field(value)?.unwrap_or_default(),
        None => DirectionAssignment::default(),
    };
    Ok(JobPayload {
        triplines,
        directions,
    })
}

fn decode_field<T: serde::de::DeserializeOwned>(value: &Value) -> Result<Option<T>, ExportError> {
    match value {
        Value::Null => Ok(None),
        Value::String(encoded) => Ok(Some(serde_json::from_str(encoded)?)),
        inline => Ok(Some(T::deserialize(inline)?)),
    }
}

/// Serialize a document as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`ExportError::Json`] if serialization fails.
pub fn to_document_json(document: &JobPayload) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// 1-based indices of triplines with an endpoint outside the frame.
#[must_use]
pub fn frame_violations(triplines: &[Tripline], frame: Dimensions) -> Vec<usize> {
    triplines
        .iter()
        .enumerate()
        .filter(|(_, line)| !(frame.contains(line.start()) && frame.contains(line.end())))
        .map(|(i, _)| i + 1)
        .collect()
}
