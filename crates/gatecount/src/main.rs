use dioxus::logger::tracing::Level;
use dioxus::prelude::*;
use gatecount_core::wire::UPLOAD_ERROR_MESSAGE;
use gatecount_core::{JobForm, JobMonitor, JobPayload, PollState, SessionController};
use gatecount_io::{
    DirectionsCard, JobFormPanel, JobRun, ProgressBars, ResultPanel, ServiceClient,
    TriplineCanvas, TriplineOverlay, Upload, VideoUpload, load_page_config,
};

fn main() {
    if let Err(e) = dioxus::logger::init(Level::INFO) {
        web_sys::console::warn_1(&format!("logger unavailable: {e}").into());
    }
    dioxus::launch(app);
}

/// Root application component.
///
/// Owns the single session controller and the job monitor, and wires
/// the upload, editor, direction, form, progress and result components.
#[allow(clippy::too_many_lines)]
fn app() -> Element {
    // --- Application state ---
    let config = use_hook(load_page_config);
    let client = use_hook(|| ServiceClient::new(config.endpoints()));
    let mut controller = use_signal(|| Option::<SessionController>::None);
    let mut monitor = use_signal(|| JobMonitor::new(client.endpoints().clone()));
    let mut generation = use_signal(|| 0u64);
    let mut submitted = use_signal(|| Option::<JobPayload>::None);
    let mut uploading = use_signal(|| false);
    let mut upload_error = use_signal(|| Option::<String>::None);

    // --- Video upload: initialize a new session ---
    let on_upload = {
        let client = client.clone();
        move |video: Upload| {
            let client = client.clone();
            spawn(async move {
                uploading.set(true);
                upload_error.set(None);
                let outcome = match client.initialize(&video).await {
                    Ok(response) => response.outcome(),
                    Err(e) => {
                        tracing::error!(error = %e, "video upload failed");
                        Err(UPLOAD_ERROR_MESSAGE.to_owned())
                    }
                };
                match outcome {
                    Ok((session, frame_url)) => {
                        tracing::info!(%session, "session initialized");
                        // A job from the previous session stops polling.
                        generation += 1;
                        monitor.set(JobMonitor::new(client.endpoints().clone()));
                        submitted.set(None);
                        controller.set(Some(SessionController::new(session, frame_url)));
                    }
                    Err(message) => {
                        tracing::warn!(%message, "video upload rejected");
                        upload_error.set(Some(message));
                    }
                }
                uploading.set(false);
            });
        }
    };

    // --- Submit: validate, then run the job in the background ---
    let on_submit = {
        let client = client.clone();
        let poll_interval_ms = config.poll_interval_ms;
        move |(form, model): (JobForm, Option<Upload>)| {
            let prepared = match controller.read().as_ref() {
                Some(ctrl) => ctrl
                    .prepare_submission(form)
                    .map(|step| (step, ctrl.document())),
                None => return,
            };
            match prepared {
                Err(error) => monitor.write().submission_failed(&error),
                Ok((step, document)) => {
                    generation += 1;
                    let token = *generation.peek();
                    monitor.write().begin_submission(step.export_video());
                    submitted.set(Some(document));
                    let run = JobRun {
                        client: client.clone(),
                        monitor,
                        generation,
                        token,
                        poll_interval_ms,
                    };
                    spawn(run.run(step, model));
                }
            }
        }
    };

    // --- Derived view state ---
    let has_session = controller.read().is_some();
    let has_triplines = controller
        .read()
        .as_ref()
        .is_some_and(SessionController::has_triplines);
    let job_active = {
        let m = monitor.read();
        m.indicators().is_some() && !m.poll_state().is_some_and(PollState::is_terminal)
    };
    let indicators = monitor.read().indicators().copied();
    let view = monitor.read().view().clone();
    let overlay = submitted().zip(controller.read().as_ref().and_then(|c| {
        Some((c.session().clone(), c.frame()?, c.frame_url().to_owned()))
    }));

    // --- Layout ---
    rsx! {
        style { dangerous_inner_html: include_str!("../assets/style.css") }

        div { class: "gc-app",
            header { class: "gc-header",
                h1 { "gatecount" }
                p { class: "gc-muted",
                    "Mark triplines on a video frame and count the traffic crossing them"
                }
            }

            main { class: "gc-main",
                VideoUpload {
                    config: config.clone(),
                    busy: uploading(),
                    error: upload_error(),
                    on_upload: on_upload,
                }

                if has_session {
                    TriplineCanvas { controller, config: config.clone() }
                    DirectionsCard { controller }
                    if has_triplines {
                        JobFormPanel { busy: job_active, on_submit: on_submit }
                    }
                }

                ProgressBars { indicators }
                ResultPanel { view, copy_feedback_ms: config.copy_feedback_ms }

                if let Some((document, (session, frame, frame_url))) = overlay {
                    TriplineOverlay {
                        document,
                        session,
                        frame,
                        frame_url,
                        config: config.clone(),
                    }
                }
            }
        }
    }
}
