//! Result area: banner, click-to-copy session, download links.

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::{LdCopy, LdDownload};
use gatecount_core::results::COPIED_TEXT;
use gatecount_core::{CopyFeedback, ResultView};
use gloo_timers::future::TimeoutFuture;

use crate::clipboard;

/// Props for the [`ResultPanel`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ResultPanelProps {
    /// What to show.
    view: ResultView,
    /// How long the copy acknowledgment stays visible.
    copy_feedback_ms: u32,
}

/// Banner line, the session identifier and the download list.
#[component]
pub fn ResultPanel(props: ResultPanelProps) -> Element {
    let mut feedback = use_signal(CopyFeedback::default);
    let failed = matches!(props.view, ResultView::Failed { .. });
    let Some(headline) = props.view.headline() else {
        return rsx! {};
    };
    let headline = headline.to_owned();
    let session = props.view.session().map(ToString::to_string);
    let links = props.view.links().to_vec();
    let delay = props.copy_feedback_ms;

    rsx! {
        div { class: "gc-card gc-results",
            p { class: if failed { "gc-error" } else { "gc-banner" }, "{headline}" }

            if let Some(session) = session {
                p { class: "gc-session",
                    "Session: "
                    button {
                        class: "gc-link",
                        title: "Copy to clipboard",
                        onclick: {
                            let session = session.clone();
                            move |_| {
                                let text = session.clone();
                                spawn(async move {
                                    match clipboard::write_text(&text).await {
                                        Ok(()) => {
                                            let token = feedback.write().show();
                                            TimeoutFuture::new(delay).await;
                                            feedback.write().expire(token);
                                        }
                                        Err(e) => tracing::warn!(error = %e, "copy to clipboard failed"),
                                    }
                                });
                            }
                        },
                        "{session}"
                        Icon { width: 14, height: 14, icon: LdCopy }
                    }
                    if feedback.read().is_visible() {
                        span { class: "gc-copied", "{COPIED_TEXT}" }
                    }
                }
            }

            if !links.is_empty() {
                ul { class: "gc-downloads",
                    for link in links {
                        li { key: "{link.label}",
                            if let Some(href) = link.href {
                                a { class: "gc-button", href: "{href}", download: "",
                                    Icon { width: 16, height: 16, icon: LdDownload }
                                    "{link.label}"
                                }
                            } else {
                                a {
                                    class: "gc-button gc-disabled",
                                    aria_disabled: "true",
                                    "{link.label}"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
