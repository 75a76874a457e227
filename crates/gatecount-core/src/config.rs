//! Client configuration.

use serde::{Deserialize, Serialize};

use crate::label::DEFAULT_LABEL_OFFSET;
use crate::wire::Endpoints;

/// Tunables for the annotation client.
///
/// Every field has a default, so a partial JSON override such as
/// `{"poll_interval_ms": 1000}` is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Prefix for every service endpoint. Empty means same origin.
    pub base_url: String,

    /// Delay between progress queries, in milliseconds.
    pub poll_interval_ms: u32,

    /// Perpendicular distance from a line's midpoint to its label, in
    /// frame pixels.
    pub label_offset: f64,

    /// How long "Copied!" stays visible, in milliseconds.
    pub copy_feedback_ms: u32,

    /// CSS colour for lines and labels.
    pub line_color: String,

    /// Stroke width in frame pixels.
    pub line_width: f64,

    /// CSS font for labels.
    pub label_font: String,

    /// Accepted video file extensions, lowercase without the dot.
    pub allowed_video_extensions: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            poll_interval_ms: 500,
            label_offset: DEFAULT_LABEL_OFFSET,
            copy_feedback_ms: 1000,
            line_color: "red".to_owned(),
            line_width: 2.0,
            label_font: "24px sans-serif".to_owned(),
            allowed_video_extensions: ["mp4", "avi", "mov", "mkv"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
        }
    }
}

impl ClientConfig {
    /// Parse a JSON override on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns the JSON error for malformed input.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Endpoint builder for [`base_url`](Self::base_url).
    #[must_use]
    pub fn endpoints(&self) -> Endpoints {
        Endpoints::new(self.base_url.clone())
    }

    /// Whether `file_name` has an accepted video extension
    /// (case-insensitive).
    #[must_use]
    pub fn accepts_video(&self, file_name: &str) -> bool {
        file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .is_some_and(|ext| self.allowed_video_extensions.iter().any(|a| *a == ext))
    }

    /// `accept` attribute for the video file input, e.g. `.mp4,.avi`.
    #[must_use]
    pub fn video_accept_attr(&self) -> String {
        self.allowed_video_extensions
            .iter()
            .map(|e| format!(".{e}"))
            .collect::<Vec<_>>()
            .join(",")
    }
}
