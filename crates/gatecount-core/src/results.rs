//! What the result area shows for a job.

use crate::types::SessionId;
use crate::wire::{Endpoints, OutputPaths};

/// Banner while a job runs.
pub const PROCESSING_BANNER: &str = "Please wait, processing...";

/// Banner once every tracked stage finished.
pub const COMPLETE_BANNER: &str = "Processing complete.";

/// Acknowledgment shown after the session id was copied.
pub const COPIED_TEXT: &str = "Copied!";

/// One entry in the download list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    /// Button text.
    pub label: String,
    /// Target URL. `None` renders a disabled placeholder.
    pub href: Option<String>,
}

impl DownloadLink {
    /// Whether the link can be followed.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.href.is_some()
    }
}

/// Build the download list for a completed job.
///
/// The report link is always listed. The annotated-video link is listed
/// only when export was requested; otherwise a disabled
/// "No video output" placeholder takes its place.
#[must_use]
pub fn download_links(
    endpoints: &Endpoints,
    session: &SessionId,
    export_video: bool,
    paths: &OutputPaths,
) -> Vec<DownloadLink> {
    let href = |file: Option<&str>| file.map(|f| endpoints.download(session, f));

    let report = href(paths.report_path.as_deref());
    if report.is_none() {
        tracing::warn!(session = %session, "start response carried no report path");
    }
    let mut links = vec![DownloadLink {
        label: "Download Report".to_owned(),
        href: report,
    }];

    if export_video {
        links.push(DownloadLink {
            label: "Download Annotated Video".to_owned(),
            href: href(paths.annotated_video_path.as_deref()),
        });
    } else {
        links.push(DownloadLink {
            label: "No video output".to_owned(),
            href: None,
        });
    }
    links
}

/// Result-area content.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResultView {
    /// Nothing submitted yet, or cleared for a new submission.
    #[default]
    Idle,
    /// Job running.
    Processing {
        /// Click-to-copy identifier.
        session: SessionId,
    },
    /// Job finished.
    Completed {
        /// Click-to-copy identifier.
        session: SessionId,
        /// Download list.
        links: Vec<DownloadLink>,
    },
    /// Terminal error text.
    Failed {
        /// Shown in place of the progress summary.
        message: String,
    },
}

impl ResultView {
    /// Banner line, if any.
    #[must_use]
    pub fn headline(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Processing { .. } => Some(PROCESSING_BANNER),
            Self::Completed { .. } => Some(COMPLETE_BANNER),
            Self::Failed { message } => Some(message),
        }
    }

    /// Session shown for copying.
    #[must_use]
    pub const fn session(&self) -> Option<&SessionId> {
        match self {
            Self::Processing { session } | Self::Completed { session, .. } => Some(session),
            Self::Idle | Self::Failed { .. } => None,
        }
    }

    /// Download list; empty until completion.
    #[must_use]
    pub fn links(&self) -> &[DownloadLink] {
        match self {
            Self::Completed { links, .. } => links,
            _ => &[],
        }
    }
}

/// Transient "Copied!" acknowledgment.
///
/// Each copy bumps a generation. The timer started for a copy may only
/// hide the acknowledgment if no newer copy happened in the meantime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CopyFeedback {
    generation: u64,
    visible: bool,
}

impl CopyFeedback {
    /// Show the acknowledgment. Returns the token to pass to
    /// [`expire`](Self::expire) when the display time elapses.
    pub const fn show(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.visible = true;
        self.generation
    }

    /// Hide the acknowledgment if `token` belongs to the latest copy.
    pub fn expire(&mut self, token: u64) -> bool {
        if token == self.generation && self.visible {
            self.visible = false;
            true
        } else {
            false
        }
    }

    /// Whether "Copied!" is currently shown.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> SessionId {
        SessionId::new("abc")
    }

    fn paths() -> OutputPaths {
        OutputPaths {
            report_path: Some("report_site.xlsx".into()),
            annotated_video_path: Some("annotated_site_video.mp4".into()),
        }
    }

    #[test]
    fn export_requested_lists_video() {
        let links = download_links(&Endpoints::default(), &session(), true, &paths());
        assert_eq!(
            links,
            vec![
                DownloadLink {
                    label: "Download Report".into(),
                    href: Some("/download/abc/report_site.xlsx".into()),
                },
                DownloadLink {
                    label: "Download Annotated Video".into(),
                    href: Some("/download/abc/annotated_site_video.mp4".into()),
                },
            ]
        );
    }

    #[test]
    fn no_export_shows_disabled_placeholder() {
        let links = download_links(&Endpoints::default(), &session(), false, &paths());
        assert_eq!(links.len(), 2);
        assert!(links[0].is_enabled());
        assert_eq!(links[1].label, "No video output");
        assert!(!links[1].is_enabled());
    }

    #[test]
    fn missing_report_path_is_listed_disabled() {
        let links = download_links(
            &Endpoints::default(),
            &session(),
            false,
            &OutputPaths::default(),
        );
        assert_eq!(links[0].label, "Download Report");
        assert!(!links[0].is_enabled());
    }

    #[test]
    fn headlines() {
        assert_eq!(ResultView::Idle.headline(), None);
        assert_eq!(
            ResultView::Processing { session: session() }.headline(),
            Some(PROCESSING_BANNER)
        );
        let failed = ResultView::Failed {
            message: "Error: boom".into(),
        };
        assert_eq!(failed.headline(), Some("Error: boom"));
        assert_eq!(failed.session(), None);
        assert!(failed.links().is_empty());
    }

    #[test]
    fn copy_feedback_hides_after_its_own_timer() {
        let mut feedback = CopyFeedback::default();
        let token = feedback.show();
        assert!(feedback.is_visible());
        assert!(feedback.expire(token));
        assert!(!feedback.is_visible());
    }

    #[test]
    fn stale_timer_does_not_hide_newer_copy() {
        let mut feedback = CopyFeedback::default();
        let first = feedback.show();
        let second = feedback.show();
        assert!(!feedback.expire(first));
        assert!(feedback.is_visible());
        assert!(feedback.expire(second));
    }
}
