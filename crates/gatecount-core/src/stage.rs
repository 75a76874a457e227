//! Processing stage identifiers and per-stage progress.
//!
//! The service runs four independent stages per job. Each reports a
//! percentage in `[0, 100]`, or the sentinel `-1` once it has failed.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Progress value a stage reports once it has failed.
pub const FAILED: f64 = -1.0;

/// Progress value of a finished stage.
pub const DONE: f64 = 100.0;

/// One server-side processing stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Object detection and tracking.
    Yolo,
    /// Tripline crossing counts.
    Counting,
    /// Spreadsheet report generation.
    Excel,
    /// Optional annotated-video export.
    Annotation,
}

impl Stage {
    /// All stages in processing order.
    pub const ALL: [Self; 4] = [Self::Yolo, Self::Counting, Self::Excel, Self::Annotation];

    /// Key used in the progress response.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Yolo => "YOLO",
            Self::Counting => "Counting",
            Self::Excel => "Excel",
            Self::Annotation => "Annotation",
        }
    }

    /// Display label for the progress indicator.
    ///
    /// The spreadsheet stage is shown to operators as "Report".
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Yolo => "YOLO",
            Self::Counting => "Counting",
            Self::Excel => "Report",
            Self::Annotation => "Annotation",
        }
    }

    /// Whether this stage counts towards completion and failure for a
    /// job with the given export setting.
    #[must_use]
    pub const fn is_tracked(self, export_video: bool) -> bool {
        !matches!(self, Self::Annotation) || export_video
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One progress report: a value per stage.
///
/// Matches the progress endpoint's body,
/// `{"YOLO": .., "Counting": .., "Excel": .., "Annotation": ..}`. A
/// stage the server has not reported yet reads as `0`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StageProgress {
    /// Detection progress.
    #[serde(rename = "YOLO")]
    pub yolo: f64,
    /// Counting progress.
    #[serde(rename = "Counting")]
    pub counting: f64,
    /// Report generation progress.
    #[serde(rename = "Excel")]
    pub excel: f64,
    /// Annotated-video export progress.
    #[serde(rename = "Annotation")]
    pub annotation: f64,
}

impl StageProgress {
    /// Build a report from the four values in stage order.
    #[must_use]
    pub const fn new(yolo: f64, counting: f64, excel: f64, annotation: f64) -> Self {
        Self {
            yolo,
            counting,
            excel,
            annotation,
        }
    }

    /// Value reported for `stage`.
    #[must_use]
    pub const fn get(&self, stage: Stage) -> f64 {
        match stage {
            Stage::Yolo => self.yolo,
            Stage::Counting => self.counting,
            Stage::Excel => self.excel,
            Stage::Annotation => self.annotation,
        }
    }

    /// Every tracked stage reports 100.
    ///
    /// Annotation is only required when video export was requested.
    #[must_use]
    pub fn is_complete(&self, export_video: bool) -> bool {
        Stage::ALL
            .into_iter()
            .filter(|s| s.is_tracked(export_video))
            .all(|s| is_done(self.get(s)))
    }

    /// First tracked stage that reports the failure sentinel.
    #[must_use]
    pub fn failed_stage(&self, export_video: bool) -> Option<Stage> {
        Stage::ALL
            .into_iter()
            .filter(|s| s.is_tracked(export_video))
            .find(|&s| is_failed(self.get(s)))
    }
}

/// Whether `value` can be shown on an indicator (`0..=100`).
#[must_use]
pub fn is_displayable(value: f64) -> bool {
    (0.0..=DONE).contains(&value)
}

#[allow(clippy::float_cmp)] // the sentinels are exact integers on the wire
fn is_done(value: f64) -> bool {
    value == DONE
}

#[allow(clippy::float_cmp)]
fn is_failed(value: f64) -> bool {
    value == FAILED
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn all_contains_every_variant() {
        let mut seen = std::collections::HashSet::new();
        for stage in Stage::ALL {
            assert!(seen.insert(stage), "Duplicate stage in ALL: {stage}");
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn excel_is_displayed_as_report() {
        assert_eq!(Stage::Excel.wire_name(), "Excel");
        assert_eq!(Stage::Excel.to_string(), "Report");
    }

    #[test]
    fn parses_progress_body() {
        let body = r#"{"YOLO": 100, "Counting": 42, "Excel": 0, "Annotation": -1}"#;
        let progress: StageProgress = serde_json::from_str(body).unwrap();
        assert_eq!(progress, StageProgress::new(100.0, 42.0, 0.0, -1.0));
    }

    #[test]
    fn parses_fractional_and_partial_bodies() {
        let progress: StageProgress = serde_json::from_str(r#"{"YOLO": 12.5}"#).unwrap();
        assert_eq!(progress, StageProgress::new(12.5, 0.0, 0.0, 0.0));
    }

    #[test]
    fn complete_with_export() {
        let p = StageProgress::new(100.0, 100.0, 100.0, 100.0);
        assert!(p.is_complete(true));
        assert!(p.is_complete(false));
    }

    #[test]
    fn annotation_ignored_without_export() {
        let p = StageProgress::new(100.0, 100.0, 100.0, 40.0);
        assert!(p.is_complete(false));
        assert!(!p.is_complete(true));
    }

    #[test]
    fn failure_detection() {
        let p = StageProgress::new(100.0, -1.0, 0.0, 0.0);
        assert_eq!(p.failed_stage(true), Some(Stage::Counting));
        assert_eq!(p.failed_stage(false), Some(Stage::Counting));
        assert_eq!(StageProgress::default().failed_stage(true), None);
    }

    #[test]
    fn annotation_failure_only_counts_with_export() {
        let p = StageProgress::new(100.0, 100.0, 100.0, -1.0);
        assert_eq!(p.failed_stage(true), Some(Stage::Annotation));
        assert_eq!(p.failed_stage(false), None);
    }

    #[test]
    fn displayable_range() {
        assert!(is_displayable(0.0));
        assert!(is_displayable(100.0));
        assert!(!is_displayable(-1.0));
        assert!(!is_displayable(101.0));
        assert!(!is_displayable(f64::NAN));
    }
}
