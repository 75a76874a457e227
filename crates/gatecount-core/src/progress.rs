//! Progress polling state machine.
//!
//! After a job starts, the caller queries the progress endpoint on a
//! fixed interval and feeds each outcome to a [`ProgressTracker`]. The
//! tracker owns the four indicators and decides, per poll, whether the
//! job has completed, failed, or lost its connection.
//!
//! | state     | event                 | next         | effects                        |
//! |-----------|-----------------------|--------------|--------------------------------|
//! | `Polling` | report, any failed    | `Failed`     | cancel, bad tone, fetch detail |
//! | `Polling` | report, all done      | `Completed`  | cancel, good tone              |
//! | `Polling` | report, otherwise     | `Polling`    | update indicators              |
//! | `Polling` | transport failure     | `NetworkError` | cancel                       |
//! | terminal  | anything              | unchanged    | none                           |
//!
//! Failure is checked before completion, so a stage that regresses to
//! `-1` after another poll saw every stage at 100 is still a failure.
//! The terminal row guarantees cancellation is requested exactly once.

use crate::stage::{Stage, StageProgress, is_displayable};

/// Poll-loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// Queries are being issued.
    Polling,
    /// Every tracked stage reached 100.
    Completed,
    /// A tracked stage reported `-1`.
    Failed,
    /// A query never produced a response.
    NetworkError,
}

impl PollState {
    /// No further queries are allowed.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Polling)
    }
}

/// One outcome of a progress query.
#[derive(Debug, Clone, PartialEq)]
pub enum PollEvent {
    /// The server answered with a progress report.
    Report(StageProgress),
    /// The query was rejected before a usable answer arrived.
    TransportFailed(String),
}

/// What the poll loop must do after feeding an event.
#[must_use = "the poll loop must honour cancel and fetch_detail"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollStep {
    /// State after the event.
    pub state: PollState,
    /// Stop the recurring query. Set on the single transition into a
    /// terminal state and never again.
    pub cancel: bool,
    /// Issue one results query for a human-readable failure detail.
    pub fetch_detail: bool,
}

/// Visual tone of an indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    /// Still running.
    #[default]
    Active,
    /// Job completed.
    Good,
    /// Job failed.
    Bad,
}

/// Display state of one stage's progress bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Indicator {
    /// Which stage this bar shows.
    pub stage: Stage,
    /// Last displayable percentage.
    pub percent: f64,
    /// Colour scheme.
    pub tone: Tone,
}

impl Indicator {
    const fn reset(stage: Stage) -> Self {
        Self {
            stage,
            percent: 0.0,
            tone: Tone::Active,
        }
    }

    /// Bar caption, e.g. `Report: 40%`.
    #[must_use]
    pub fn caption(&self) -> String {
        format!("{}: {}%", self.stage.label(), self.percent)
    }
}

/// Drives one job's progress polling.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressTracker {
    export_video: bool,
    state: PollState,
    indicators: [Indicator; 4],
    last: Option<StageProgress>,
}

impl ProgressTracker {
    /// A tracker in `Polling` with every indicator at 0 %.
    #[must_use]
    pub const fn new(export_video: bool) -> Self {
        Self {
            export_video,
            state: PollState::Polling,
            indicators: [
                Indicator::reset(Stage::Yolo),
                Indicator::reset(Stage::Counting),
                Indicator::reset(Stage::Excel),
                Indicator::reset(Stage::Annotation),
            ],
            last: None,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> PollState {
        self.state
    }

    /// Whether the annotation stage is part of this job.
    #[must_use]
    pub const fn export_video(&self) -> bool {
        self.export_video
    }

    /// The four indicators in stage order.
    #[must_use]
    pub const fn indicators(&self) -> &[Indicator; 4] {
        &self.indicators
    }

    /// The most recent report received.
    #[must_use]
    pub const fn last_report(&self) -> Option<&StageProgress> {
        self.last.as_ref()
    }

    /// Feed one poll outcome and advance the state machine.
    pub fn handle(&mut self, event: PollEvent) -> PollStep {
        if self.state.is_terminal() {
            tracing::trace!(state = ?self.state, "poll event after terminal state ignored");
            return self.idle_step();
        }

        match event {
            PollEvent::Report(progress) => self.on_report(progress),
            PollEvent::TransportFailed(reason) => {
                tracing::error!(%reason, "progress query failed");
                self.state = PollState::NetworkError;
                PollStep {
                    state: self.state,
                    cancel: true,
                    fetch_detail: false,
                }
            }
        }
    }

    fn on_report(&mut self, progress: StageProgress) -> PollStep {
        self.last = Some(progress);
        for indicator in &mut self.indicators {
            let stage = indicator.stage;
            let value = progress.get(stage);
            if is_displayable(value) && (stage != Stage::Annotation || self.export_video) {
                indicator.percent = value;
            }
        }

        if let Some(stage) = progress.failed_stage(self.export_video) {
            tracing::warn!(%stage, "processing stage failed");
            self.state = PollState::Failed;
            self.set_tone(Tone::Bad);
            return PollStep {
                state: self.state,
                cancel: true,
                fetch_detail: true,
            };
        }

        if progress.is_complete(self.export_video) {
            tracing::info!("processing complete");
            self.state = PollState::Completed;
            self.set_tone(Tone::Good);
            return PollStep {
                state: self.state,
                cancel: true,
                fetch_detail: false,
            };
        }

        tracing::debug!(?progress, "progress update");
        self.idle_step()
    }

    fn set_tone(&mut self, tone: Tone) {
        for indicator in &mut self.indicators {
            indicator.tone = tone;
        }
    }

    const fn idle_step(&self) -> PollStep {
        PollStep {
            state: self.state,
            cancel: false,
            fetch_detail: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(y: f64, c: f64, e: f64, a: f64) -> PollEvent {
        PollEvent::Report(StageProgress::new(y, c, e, a))
    }

    fn percents(tracker: &ProgressTracker) -> Vec<f64> {
        tracker.indicators().iter().map(|i| i.percent).collect()
    }

    #[test]
    fn starts_polling_at_zero() {
        let tracker = ProgressTracker::new(true);
        assert_eq!(tracker.state(), PollState::Polling);
        assert_eq!(percents(&tracker), vec![0.0; 4]);
        assert!(tracker.indicators().iter().all(|i| i.tone == Tone::Active));
    }

    #[test]
    fn partial_progress_keeps_polling() {
        let mut tracker = ProgressTracker::new(true);
        let step = tracker.handle(report(50.0, 10.0, 0.0, 0.0));
        assert_eq!(
            step,
            PollStep {
                state: PollState::Polling,
                cancel: false,
                fetch_detail: false
            }
        );
        assert_eq!(percents(&tracker), vec![50.0, 10.0, 0.0, 0.0]);
    }

    #[test]
    fn completes_with_export() {
        let mut tracker = ProgressTracker::new(true);
        let step = tracker.handle(report(100.0, 100.0, 100.0, 100.0));
        assert_eq!(step.state, PollState::Completed);
        assert!(step.cancel);
        assert!(!step.fetch_detail);
        assert!(tracker.indicators().iter().all(|i| i.tone == Tone::Good));
    }

    #[test]
    fn completes_without_export_ignoring_annotation() {
        let mut tracker = ProgressTracker::new(false);
        let step = tracker.handle(report(100.0, 100.0, 100.0, 40.0));
        assert_eq!(step.state, PollState::Completed);
        // The annotation bar is not driven when export is off.
        assert!((tracker.indicators()[3].percent).abs() < f64::EPSILON);
    }

    #[test]
    fn annotation_pending_blocks_completion_with_export() {
        let mut tracker = ProgressTracker::new(true);
        let step = tracker.handle(report(100.0, 100.0, 100.0, 40.0));
        assert_eq!(step.state, PollState::Polling);
        assert!(!step.cancel);
    }

    #[test]
    fn failure_stops_and_requests_detail() {
        let mut tracker = ProgressTracker::new(true);
        let step = tracker.handle(report(100.0, -1.0, 0.0, 0.0));
        assert_eq!(
            step,
            PollStep {
                state: PollState::Failed,
                cancel: true,
                fetch_detail: true
            }
        );
        assert!(tracker.indicators().iter().all(|i| i.tone == Tone::Bad));
        // The failure sentinel is not displayed.
        assert_eq!(percents(&tracker), vec![100.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn failure_takes_precedence_over_completion() {
        // Annotation untracked and complete elsewhere, but Excel failed
        // after reaching 100 on a previous poll.
        let mut tracker = ProgressTracker::new(false);
        let _ = tracker.handle(report(100.0, 100.0, 90.0, 0.0));
        let step = tracker.handle(report(100.0, 100.0, -1.0, 0.0));
        assert_eq!(step.state, PollState::Failed);
    }

    #[test]
    fn out_of_range_values_are_not_displayed() {
        let mut tracker = ProgressTracker::new(true);
        let _ = tracker.handle(report(30.0, 20.0, 10.0, 5.0));
        let step = tracker.handle(report(250.0, -7.0, 10.0, 5.0));
        assert_eq!(step.state, PollState::Polling);
        assert_eq!(percents(&tracker), vec![30.0, 20.0, 10.0, 5.0]);
    }

    #[test]
    fn transport_failure_is_terminal_without_detail() {
        let mut tracker = ProgressTracker::new(true);
        let step = tracker.handle(PollEvent::TransportFailed("offline".into()));
        assert_eq!(
            step,
            PollStep {
                state: PollState::NetworkError,
                cancel: true,
                fetch_detail: false
            }
        );
    }

    #[test]
    fn cancel_is_requested_exactly_once() {
        let events = [
            report(10.0, 0.0, 0.0, 0.0),
            report(100.0, 100.0, 100.0, 100.0),
            report(100.0, -1.0, 0.0, 0.0),
            PollEvent::TransportFailed("late".into()),
            report(100.0, 100.0, 100.0, 100.0),
        ];
        let mut tracker = ProgressTracker::new(true);
        let cancels = events
            .into_iter()
            .map(|e| tracker.handle(e))
            .filter(|s| s.cancel)
            .count();
        assert_eq!(cancels, 1);
        assert_eq!(tracker.state(), PollState::Completed);
    }

    #[test]
    fn captions_use_display_labels() {
        let mut tracker = ProgressTracker::new(true);
        let _ = tracker.handle(report(5.0, 6.0, 40.0, 8.0));
        let captions: Vec<String> = tracker.indicators().iter().map(Indicator::caption).collect();
        assert_eq!(
            captions,
            vec!["YOLO: 5%", "Counting: 6%", "Report: 40%", "Annotation: 8%"]
        );
    }
}
