//! One job attempt from submit to terminal state.
//!
//! [`JobMonitor`] combines the submission outcome, the
//! [`ProgressTracker`] and the [`ResultView`] so that the UI reads a
//! single value. The I/O driver calls the `on_*` methods in the order
//! the calls complete.

use crate::error::JobError;
use crate::progress::{Indicator, PollEvent, PollState, PollStep, ProgressTracker};
use crate::results::{ResultView, download_links};
use crate::submit::Started;
use crate::wire::Endpoints;

/// Progress bars and result area for the current job.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JobMonitor {
    endpoints: Endpoints,
    tracker: Option<ProgressTracker>,
    started: Option<Started>,
    view: ResultView,
}

impl JobMonitor {
    /// An idle monitor that builds download links under `endpoints`.
    #[must_use]
    pub fn new(endpoints: Endpoints) -> Self {
        Self {
            endpoints,
            ..Self::default()
        }
    }

    /// Submit was pressed and validation passed: reset every indicator
    /// to 0 %, show the progress section and clear previous results.
    pub fn begin_submission(&mut self, export_video: bool) {
        self.tracker = Some(ProgressTracker::new(export_video));
        self.started = None;
        self.view = ResultView::Idle;
    }

    /// Either submission call failed, or validation blocked the submit.
    ///
    /// Hides the progress section so no bars remain without a terminal
    /// state.
    pub fn submission_failed(&mut self, error: &JobError) {
        tracing::warn!(%error, "submission failed");
        self.tracker = None;
        self.started = None;
        self.view = ResultView::Failed {
            message: error.user_message(),
        };
    }

    /// The job is running; polling may begin.
    pub fn started(&mut self, started: Started) {
        self.view = ResultView::Processing {
            session: started.session.clone(),
        };
        if self.tracker.is_none() {
            self.tracker = Some(ProgressTracker::new(started.export_video));
        }
        self.started = Some(started);
    }

    /// Feed one poll outcome.
    ///
    /// Polls arriving before [`started`](Self::started) or after a
    /// terminal state change nothing.
    pub fn on_poll(&mut self, event: PollEvent) -> PollStep {
        let (Some(tracker), Some(started)) = (self.tracker.as_mut(), self.started.as_ref()) else {
            tracing::trace!("poll outcome without a running job ignored");
            return PollStep {
                state: PollState::Polling,
                cancel: false,
                fetch_detail: false,
            };
        };
        let step = tracker.handle(event);
        if step.cancel {
            self.view = match step.state {
                PollState::Completed => ResultView::Completed {
                    session: started.session.clone(),
                    links: download_links(
                        &self.endpoints,
                        &started.session,
                        started.export_video,
                        &started.paths,
                    ),
                },
                PollState::Failed => ResultView::Failed {
                    message: JobError::StageFailure { detail: None }.user_message(),
                },
                PollState::NetworkError | PollState::Polling => ResultView::Failed {
                    message: JobError::Transport(String::new()).user_message(),
                },
            };
        }
        step
    }

    /// Result of the follow-up results query after a stage failure.
    ///
    /// `None` (no detail, or the query itself failed) leaves the generic
    /// stage-failure text in place.
    pub fn on_failure_detail(&mut self, detail: Option<String>) {
        let failed = self
            .tracker
            .as_ref()
            .is_some_and(|t| t.state() == PollState::Failed);
        if !failed {
            return;
        }
        if let Some(detail) = detail {
            self.view = ResultView::Failed {
                message: JobError::StageFailure {
                    detail: Some(detail),
                }
                .user_message(),
            };
        }
    }

    /// Indicators to draw, or `None` while the progress section is
    /// hidden.
    #[must_use]
    pub fn indicators(&self) -> Option<&[Indicator; 4]> {
        self.tracker.as_ref().map(ProgressTracker::indicators)
    }

    /// Poll-loop state, once a job is running.
    #[must_use]
    pub fn poll_state(&self) -> Option<PollState> {
        self.started.as_ref()?;
        self.tracker.as_ref().map(ProgressTracker::state)
    }

    /// The running or finished job.
    #[must_use]
    pub const fn job(&self) -> Option<&Started> {
        self.started.as_ref()
    }

    /// Result-area content.
    #[must_use]
    pub const fn view(&self) -> &ResultView {
        &self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{STAGE_FAILURE_MESSAGE, ValidationError};
    use crate::results::{COMPLETE_BANNER, PROCESSING_BANNER};
    use crate::stage::StageProgress;
    use crate::types::SessionId;
    use crate::wire::OutputPaths;

    fn started(export_video: bool) -> Started {
        Started {
            session: SessionId::new("job-1"),
            export_video,
            paths: OutputPaths {
                report_path: Some("report_a.xlsx".into()),
                annotated_video_path: export_video.then(|| "annotated_a_video.mp4".to_owned()),
            },
        }
    }

    fn running(export_video: bool) -> JobMonitor {
        let mut monitor = JobMonitor::new(Endpoints::default());
        monitor.begin_submission(export_video);
        monitor.started(started(export_video));
        monitor
    }

    fn report(y: f64, c: f64, e: f64, a: f64) -> PollEvent {
        PollEvent::Report(StageProgress::new(y, c, e, a))
    }

    #[test]
    fn begin_resets_and_shows_progress() {
        let mut monitor = running(true);
        let _ = monitor.on_poll(report(100.0, 100.0, 100.0, 100.0));
        monitor.begin_submission(false);
        let indicators = monitor.indicators().map(|i| i.map(|i| i.percent));
        assert_eq!(indicators, Some([0.0; 4]));
        assert_eq!(monitor.view(), &ResultView::Idle);
        assert_eq!(monitor.poll_state(), None);
    }

    #[test]
    fn submission_failure_hides_progress() {
        let mut monitor = JobMonitor::new(Endpoints::default());
        monitor.begin_submission(true);
        monitor.submission_failed(&JobError::service(Some("Missing files".into())));
        assert!(monitor.indicators().is_none());
        assert_eq!(monitor.view().headline(), Some("Missing files"));
    }

    #[test]
    fn validation_failure_is_surfaced() {
        let mut monitor = JobMonitor::new(Endpoints::default());
        monitor.submission_failed(&ValidationError::NoTriplines.into());
        assert!(
            monitor
                .view()
                .headline()
                .is_some_and(|h| h.contains("at least one tripline"))
        );
    }

    #[test]
    fn started_shows_processing_banner() {
        let monitor = running(false);
        assert_eq!(monitor.view().headline(), Some(PROCESSING_BANNER));
        assert_eq!(monitor.view().session().map(SessionId::as_str), Some("job-1"));
        assert_eq!(monitor.poll_state(), Some(PollState::Polling));
    }

    #[test]
    fn completion_builds_links() {
        let mut monitor = running(false);
        let step = monitor.on_poll(report(100.0, 100.0, 100.0, 40.0));
        assert!(step.cancel);
        assert_eq!(monitor.view().headline(), Some(COMPLETE_BANNER));
        let labels: Vec<&str> = monitor.view().links().iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["Download Report", "No video output"]);
    }

    #[test]
    fn failure_then_detail() {
        let mut monitor = running(true);
        let step = monitor.on_poll(report(100.0, -1.0, 0.0, 0.0));
        assert!(step.fetch_detail);
        assert_eq!(monitor.view().headline(), Some(STAGE_FAILURE_MESSAGE));

        monitor.on_failure_detail(Some("Error processing video: codec".into()));
        assert_eq!(
            monitor.view().headline(),
            Some("Error: Error processing video: codec")
        );
    }

    #[test]
    fn failed_detail_fetch_keeps_generic_text() {
        let mut monitor = running(true);
        let _ = monitor.on_poll(report(-1.0, 0.0, 0.0, 0.0));
        monitor.on_failure_detail(None);
        assert_eq!(monitor.view().headline(), Some(STAGE_FAILURE_MESSAGE));
    }

    #[test]
    fn detail_ignored_unless_failed() {
        let mut monitor = running(true);
        monitor.on_failure_detail(Some("stale".into()));
        assert_eq!(monitor.view().headline(), Some(PROCESSING_BANNER));
    }

    #[test]
    fn transport_failure_shows_generic_message() {
        let mut monitor = running(true);
        let step = monitor.on_poll(PollEvent::TransportFailed("offline".into()));
        assert!(step.cancel);
        assert_eq!(monitor.view().headline(), Some("An unexpected error occurred."));
        assert_eq!(monitor.poll_state(), Some(PollState::NetworkError));
    }

    #[test]
    fn poll_before_start_is_ignored() {
        let mut monitor = JobMonitor::new(Endpoints::default());
        monitor.begin_submission(true);
        let step = monitor.on_poll(report(100.0, 100.0, 100.0, 100.0));
        assert!(!step.cancel);
        assert_eq!(monitor.view(), &ResultView::Idle);
    }
}
