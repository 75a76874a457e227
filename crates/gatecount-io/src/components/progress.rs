//! Per-stage progress bars.

use dioxus::prelude::*;
use gatecount_core::{Indicator, Tone};

/// Props for the [`ProgressBars`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ProgressBarsProps {
    /// Indicators to draw; `None` hides the section.
    indicators: Option<[Indicator; 4]>,
}

const fn tone_class(tone: Tone) -> &'static str {
    match tone {
        Tone::Active => "gc-bar-active",
        Tone::Good => "gc-bar-good",
        Tone::Bad => "gc-bar-bad",
    }
}

/// One bar per stage, captioned `"<label>: <percent>%"`.
#[component]
pub fn ProgressBars(props: ProgressBarsProps) -> Element {
    let Some(indicators) = props.indicators else {
        return rsx! {};
    };

    rsx! {
        div { class: "gc-card gc-progress",
            for indicator in indicators {
                div { key: "{indicator.stage.wire_name()}", class: "gc-bar-row",
                    span { class: "gc-bar-caption", "{indicator.caption()}" }
                    div { class: "gc-bar-track",
                        div {
                            class: "gc-bar-fill {tone_class(indicator.tone)}",
                            role: "progressbar",
                            aria_valuenow: "{indicator.percent}",
                            aria_valuemin: "0",
                            aria_valuemax: "100",
                            style: "width: {indicator.percent}%",
                        }
                    }
                }
            }
        }
    }
}
