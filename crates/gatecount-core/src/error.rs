//! Error types for tripline submission and job tracking.

/// Generic text shown when the server gave no usable message.
pub const GENERIC_ERROR: &str = "An unexpected error occurred";

/// Text shown as soon as a stage reports failure, before any detail
/// has been fetched from the results endpoint.
pub const STAGE_FAILURE_MESSAGE: &str = "An error occurred during processing.";

/// Input problems caught before any network call is made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Submit was pressed with no tripline drawn.
    #[error("Please draw at least one tripline before saving and submitting.")]
    NoTriplines,

    /// A direction field was left blank.
    #[error("Please enter a label for direction {key}.")]
    MissingDirection {
        /// 1-based key of the blank field.
        key: u32,
    },

    /// The direction keys do not match the tripline count.
    #[error("expected {expected} direction labels, found {found}")]
    DirectionKeysMismatch {
        /// Number of keys the tripline count requires.
        expected: usize,
        /// Number of keys supplied.
        found: usize,
    },
}

/// Every way a job attempt can end unsuccessfully.
///
/// All variants are terminal for the current attempt; the operator has
/// to re-initiate to retry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobError {
    /// Blocked client-side; no request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A call returned a non-success status.
    #[error("{}", message.as_deref().unwrap_or(GENERIC_ERROR))]
    Service {
        /// Server-provided message, shown verbatim when present.
        message: Option<String>,
    },

    /// A processing stage reported the failure sentinel.
    #[error("{}", detail.as_ref().map_or_else(|| STAGE_FAILURE_MESSAGE.to_owned(), |d| format!("Error: {d}")))]
    StageFailure {
        /// Detail fetched from the results endpoint, if any.
        detail: Option<String>,
    },

    /// A request never produced a response.
    #[error("An unexpected error occurred.")]
    Transport(String),

    /// The request body could not be serialized.
    #[error("{}", GENERIC_ERROR)]
    Encode(String),
}

impl JobError {
    /// Service error from an optional server message.
    ///
    /// Blank messages fall back to the generic text.
    #[must_use]
    pub fn service(message: Option<String>) -> Self {
        Self::Service {
            message: message.filter(|m| !m.trim().is_empty()),
        }
    }

    /// Text for the result area.
    #[must_use]
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}
