//! Job driver: submission calls and the progress poll loop.
//!
//! Pure decisions live in [`gatecount_core::JobMonitor`]; this module
//! only performs the calls in order and feeds each outcome back.

use dioxus::prelude::*;
use gatecount_core::{JobError, JobMonitor, PollEvent, PreProcess, SessionId, Started};
use gloo_timers::future::TimeoutFuture;

use crate::api::{FetchError, ServiceClient, Upload};

fn transport(error: FetchError) -> JobError {
    JobError::Transport(error.to_string())
}

/// Everything one job run needs from the page.
#[derive(Clone)]
pub struct JobRun {
    /// Service client.
    pub client: ServiceClient,
    /// Shared monitor the UI reads.
    pub monitor: Signal<JobMonitor>,
    /// Bumped on every submit; a run whose token no longer matches
    /// stops without touching the monitor.
    pub generation: Signal<u64>,
    /// The value of `generation` this run was started under.
    pub token: u64,
    /// Delay between progress queries.
    pub poll_interval_ms: u32,
}

impl JobRun {
    fn is_current(&self) -> bool {
        *self.generation.peek() == self.token
    }

    /// Run the two submission calls, then poll until a terminal state.
    #[allow(clippy::future_not_send)] // WASM is single-threaded; JsFuture is !Send
    pub async fn run(mut self, step: PreProcess, model: Option<Upload>) {
        let started = match self.submit(step, model.as_ref()).await {
            Ok(started) => started,
            Err(error) => {
                if self.is_current() {
                    self.monitor.write().submission_failed(&error);
                }
                return;
            }
        };
        if !self.is_current() {
            return;
        }
        tracing::info!(session = %started.session, "processing started");
        let session = started.session.clone();
        self.monitor.write().started(started);
        self.poll(&session).await;
    }

    #[allow(clippy::future_not_send)]
    async fn submit(
        &self,
        step: PreProcess,
        model: Option<&Upload>,
    ) -> Result<Started, JobError> {
        let response = self
            .client
            .pre_process(&step, model)
            .await
            .map_err(transport)?;
        let step = step.accept(response)?;
        let response = self
            .client
            .start_processing(&step)
            .await
            .map_err(transport)?;
        step.accept(response)
    }

    #[allow(clippy::future_not_send)]
    async fn poll(&mut self, session: &SessionId) {
        loop {
            TimeoutFuture::new(self.poll_interval_ms).await;
            if !self.is_current() {
                return;
            }
            let event = match self.client.progress(session).await {
                Ok(report) => PollEvent::Report(report),
                Err(e) => {
                    tracing::error!(error = %e, "progress query failed");
                    PollEvent::TransportFailed(e.to_string())
                }
            };
            if !self.is_current() {
                return;
            }
            let step = self.monitor.write().on_poll(event);
            if step.fetch_detail {
                let detail = match self.client.results(session).await {
                    Ok(results) => results.detail(),
                    Err(e) => {
                        tracing::warn!(error = %e, "results query failed");
                        None
                    }
                };
                if self.is_current() {
                    self.monitor.write().on_failure_detail(detail);
                }
            }
            if step.cancel {
                tracing::info!(%session, state = ?step.state, "polling stopped");
                return;
            }
        }
    }
}
