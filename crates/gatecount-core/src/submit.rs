//! Two-step job submission as a typestate.
//!
//! A job is submitted with two strictly ordered calls. The types make
//! it impossible to issue the second before the first was acknowledged:
//!
//! ```rust
//! # use gatecount_core::{JobError, JobForm, Submission, SessionId, Tripline, Point,
//! #     DirectionAssignment, PreProcessResponse, StartProcessingResponse};
//! # fn run() -> Result<(), JobError> {
//! let triplines = [Tripline::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0))];
//! let directions = DirectionAssignment::from_pairs([(1, "in".to_owned()), (2, "out".to_owned())]);
//! let pre = Submission::prepare(SessionId::new("s1"), &triplines, directions, JobForm::default())?;
//! // ... POST pre.form_fields() to pre-process ...
//! let start = pre.accept(PreProcessResponse { status: Some("success".into()), error: None })?;
//! // ... POST start.payload() to start-processing ...
//! let started = start.accept(StartProcessingResponse {
//!     status: Some("Processing started".into()),
//!     ..StartProcessingResponse::default()
//! })?;
//! # let _ = started;
//! # Ok(())
//! # }
//! ```
//!
//! Any non-success acknowledgment ends the sequence with
//! [`JobError::Service`] carrying the server's text.

use serde::{Deserialize, Serialize};

use crate::directions::DirectionAssignment;
use crate::error::{JobError, ValidationError};
use crate::types::{SessionId, Tripline};
use crate::wire::{
    Endpoints, JobPayload, OutputPaths, PreProcessResponse, STATUS_STARTED, STATUS_SUCCESS,
    StartProcessingResponse,
};

/// Multipart field carrying the detection model upload.
pub const MODEL_FILE_FIELD: &str = "modelFile";

/// Multipart field carrying the video upload.
pub const VIDEO_FILE_FIELD: &str = "videoFile";

/// Operator-entered job parameters sent with the pre-process call.
///
/// The model file itself is a browser object and is appended by the
/// caller under [`MODEL_FILE_FIELD`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JobForm {
    /// Free-text site name; also used in output file names.
    pub site_location: String,
    /// Tracker configuration name.
    pub inference_tracker: String,
    /// Produce an annotated video.
    pub export_video: bool,
    /// Recording start date, `YYYY-MM-DD`.
    pub start_date: String,
    /// Recording start time, `HH:MM`.
    pub start_time: String,
}

impl JobForm {
    /// Text fields in submission order.
    ///
    /// `exportVideo` is sent as `"on"` only when checked, the way a
    /// browser submits a checkbox.
    #[must_use]
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("siteLocation", self.site_location.clone()),
            ("inferenceTracker", self.inference_tracker.clone()),
        ];
        if self.export_video {
            fields.push(("exportVideo", "on".to_owned()));
        }
        fields.push(("startDate", self.start_date.clone()));
        fields.push(("startTime", self.start_time.clone()));
        fields
    }
}

/// Entry point of the submission typestate.
pub struct Submission;

impl Submission {
    /// Validate the drawn triplines and directions and build the
    /// pre-process step.
    ///
    /// # Errors
    ///
    /// [`ValidationError::NoTriplines`] if `triplines` is empty, or the
    /// direction validation error from
    /// [`DirectionAssignment::validate_for`]. No request may be sent in
    /// either case.
    pub fn prepare(
        session: SessionId,
        triplines: &[Tripline],
        directions: DirectionAssignment,
        form: JobForm,
    ) -> Result<PreProcess, JobError> {
        if triplines.is_empty() {
            return Err(ValidationError::NoTriplines.into());
        }
        directions.validate_for(triplines.len())?;

        let payload = JobPayload {
            triplines: triplines.to_vec(),
            directions,
        };
        let triplines_json = payload
            .triplines_json()
            .map_err(|e| JobError::Encode(e.to_string()))?;
        let directions_json = payload
            .directions_json()
            .map_err(|e| JobError::Encode(e.to_string()))?;

        let mut fields = form.fields();
        fields.push(("directions", directions_json));
        fields.push(("triplines", triplines_json));

        tracing::debug!(
            session = %session,
            triplines = payload.triplines.len(),
            export_video = form.export_video,
            "submission prepared"
        );
        Ok(PreProcess {
            session,
            export_video: form.export_video,
            payload,
            fields,
        })
    }
}

// ───────────────────────── Step 1: PreProcess ──────────────────────────

/// Ready to send the multipart pre-process call.
#[must_use = "submission steps are consumed by advancing; call .accept() with the response"]
#[derive(Debug, Clone, PartialEq)]
pub struct PreProcess {
    session: SessionId,
    export_video: bool,
    payload: JobPayload,
    fields: Vec<(&'static str, String)>,
}

impl PreProcess {
    /// Session the job belongs to.
    #[must_use]
    pub const fn session(&self) -> &SessionId {
        &self.session
    }

    /// Whether annotated-video export was requested.
    #[must_use]
    pub const fn export_video(&self) -> bool {
        self.export_video
    }

    /// Target URL.
    #[must_use]
    pub fn url(&self, endpoints: &Endpoints) -> String {
        endpoints.pre_process(&self.session)
    }

    /// Text fields of the multipart body, including the serialized
    /// `directions` and `triplines`.
    #[must_use]
    pub fn form_fields(&self) -> &[(&'static str, String)] {
        &self.fields
    }

    /// Interpret the server's answer.
    ///
    /// # Errors
    ///
    /// [`JobError::Service`] unless the status is `"success"`.
    pub fn accept(self, response: PreProcessResponse) -> Result<StartProcessing, JobError> {
        if response.status.as_deref() != Some(STATUS_SUCCESS) {
            tracing::warn!(error = ?response.error, "pre-process rejected");
            return Err(JobError::service(response.error));
        }
        tracing::debug!(session = %self.session, "pre-process acknowledged");
        Ok(StartProcessing {
            session: self.session,
            export_video: self.export_video,
            payload: self.payload,
        })
    }
}

// ──────────────────────── Step 2: StartProcessing ───────────────────────

/// Pre-process acknowledged; ready to start the job.
#[must_use = "submission steps are consumed by advancing; call .accept() with the response"]
#[derive(Debug, Clone, PartialEq)]
pub struct StartProcessing {
    session: SessionId,
    export_video: bool,
    payload: JobPayload,
}

impl StartProcessing {
    /// Session the job belongs to.
    #[must_use]
    pub const fn session(&self) -> &SessionId {
        &self.session
    }

    /// Target URL.
    #[must_use]
    pub fn url(&self, endpoints: &Endpoints) -> String {
        endpoints.start_processing(&self.session)
    }

    /// JSON body.
    #[must_use]
    pub const fn payload(&self) -> &JobPayload {
        &self.payload
    }

    /// Interpret the server's answer.
    ///
    /// # Errors
    ///
    /// [`JobError::Service`] unless the status is `"Processing started"`.
    pub fn accept(self, response: StartProcessingResponse) -> Result<Started, JobError> {
        if response.status.as_deref() != Some(STATUS_STARTED) {
            tracing::warn!(error = ?response.error, "start-processing rejected");
            return Err(JobError::service(response.error));
        }
        tracing::info!(session = %self.session, "processing started");
        Ok(Started {
            session: self.session,
            export_video: self.export_video,
            paths: response.paths,
        })
    }
}

// ─────────────────────────── Step 3: Started ────────────────────────────

/// A running job. Progress polling may begin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Started {
    /// Session to poll.
    pub session: SessionId,
    /// Whether annotated-video export was requested.
    pub export_video: bool,
    /// Output file names announced by the service.
    pub paths: OutputPaths,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::Point;

    fn line() -> Tripline {
        Tripline::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0))
    }

    fn two_way() -> DirectionAssignment {
        DirectionAssignment::from_pairs([(1, "in".to_owned()), (2, "out".to_owned())])
    }

    fn form(export_video: bool) -> JobForm {
        JobForm {
            site_location: "Main St".into(),
            inference_tracker: "bytetrack".into(),
            export_video,
            start_date: "2024-05-01".into(),
            start_time: "08:00".into(),
        }
    }

    fn ok_pre() -> PreProcessResponse {
        PreProcessResponse {
            status: Some(STATUS_SUCCESS.into()),
            error: None,
        }
    }

    #[test]
    fn empty_triplines_fail_validation() {
        let err = Submission::prepare(SessionId::new("s"), &[], two_way(), form(false)).unwrap_err();
        assert_eq!(err, JobError::Validation(ValidationError::NoTriplines));
    }

    #[test]
    fn direction_keys_must_match_count() {
        let directions = DirectionAssignment::from_pairs([(1, "in".to_owned())]);
        let err =
            Submission::prepare(SessionId::new("s"), &[line()], directions, form(false)).unwrap_err();
        assert!(matches!(
            err,
            JobError::Validation(ValidationError::DirectionKeysMismatch { .. })
        ));
    }

    #[test]
    fn form_fields_include_serialized_payload() {
        let pre = Submission::prepare(SessionId::new("s"), &[line()], two_way(), form(true)).unwrap();
        let names: Vec<&str> = pre.form_fields().iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            vec![
                "siteLocation",
                "inferenceTracker",
                "exportVideo",
                "startDate",
                "startTime",
                "directions",
                "triplines"
            ]
        );
        let triplines = &pre.form_fields()[6].1;
        let parsed: Vec<Tripline> = serde_json::from_str(triplines).unwrap();
        assert_eq!(parsed, vec![line()]);
        assert_eq!(pre.form_fields()[5].1, r#"{"1":"in","2":"out"}"#);
    }

    #[test]
    fn unchecked_export_is_omitted() {
        assert!(!form(false).fields().iter().any(|(n, _)| *n == "exportVideo"));
        assert!(form(true).fields().contains(&("exportVideo", "on".to_owned())));
    }

    #[test]
    fn pre_process_error_is_verbatim() {
        let pre = Submission::prepare(SessionId::new("s"), &[line()], two_way(), form(false)).unwrap();
        let err = pre
            .accept(PreProcessResponse {
                status: None,
                error: Some("Missing files".into()),
            })
            .unwrap_err();
        assert_eq!(err.user_message(), "Missing files");
    }

    #[test]
    fn start_error_without_message_is_generic() {
        let pre = Submission::prepare(SessionId::new("s"), &[line()], two_way(), form(false)).unwrap();
        let start = pre.accept(ok_pre()).unwrap();
        let err = start.accept(StartProcessingResponse::default()).unwrap_err();
        assert_eq!(err, JobError::Service { message: None });
    }

    #[test]
    fn full_sequence_yields_started_job() {
        let pre = Submission::prepare(SessionId::new("s-42"), &[line()], two_way(), form(true)).unwrap();
        let endpoints = Endpoints::default();
        assert_eq!(pre.url(&endpoints), "/pre_process/s-42");

        let start = pre.accept(ok_pre()).unwrap();
        assert_eq!(start.url(&endpoints), "/start_processing/s-42");
        assert_eq!(start.payload().triplines.len(), 1);

        let started = start
            .accept(StartProcessingResponse {
                status: Some(STATUS_STARTED.into()),
                paths: OutputPaths {
                    report_path: Some("report_Main St.xlsx".into()),
                    annotated_video_path: Some("annotated_Main St_video.mp4".into()),
                },
                ..StartProcessingResponse::default()
            })
            .unwrap();
        assert_eq!(started.session.as_str(), "s-42");
        assert!(started.export_video);
        assert_eq!(started.paths.report_path.as_deref(), Some("report_Main St.xlsx"));
    }
}
