//! Dashboard controller: quick-add modal, refresh chains and polling
//!
//! The controller owns the chart state and drives two independent refresh
//! chains, summary and chart data. Each chain numbers its requests; a
//! result is applied only if it is newer than the last one applied, so a
//! slow response can never overwrite a fresher one. While polling, a chain
//! whose previous request is still in flight skips the tick.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use mytracker_config::Config;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::api::ApiRef;
use crate::chart::ChartRenderer;
use crate::error::{CoreError, CoreResult, DefaultErrorLogger, ErrorContext, ErrorLogger};
use crate::models::{FormData, SubmitOutcome};
use crate::page::{PageEvent, PageRef};
use crate::summary::SummaryUpdater;

/// Result of dispatching a [`PageEvent`]
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    ModalShown,
    ModalHidden,
    Submitted(SubmitOutcome),
    /// No binding for the event's element
    Ignored,
}

/// Which chains applied fresh data during a refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RefreshReport {
    pub summary: bool,
    pub charts: bool,
}

#[derive(Debug, Default)]
struct Chain {
    issued: AtomicU64,
    in_flight: AtomicBool,
}

impl Chain {
    fn next_generation(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Mark the chain busy; false if it already was
    fn try_begin(&self) -> bool {
        !self.in_flight.swap(true, Ordering::SeqCst)
    }
}

/// Clears a chain's in-flight flag when the request finishes, even on panic
struct InFlight<'a>(&'a Chain);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.in_flight.store(false, Ordering::SeqCst);
    }
}

#[derive(Debug, Default)]
struct ControllerState {
    charts: Option<ChartRenderer>,
    modal_visible: bool,
    summary_applied: u64,
    charts_applied: u64,
}

/// Drives one dashboard page
pub struct DashboardController {
    config: Config,
    api: ApiRef,
    page: PageRef,
    summary: SummaryUpdater,
    state: Mutex<ControllerState>,
    summary_chain: Chain,
    chart_chain: Chain,
    running: Arc<AtomicBool>,
    logger: Box<dyn ErrorLogger>,
}

impl DashboardController {
    pub fn new(config: Config, api: ApiRef, page: PageRef) -> Self {
        let summary = SummaryUpdater::new(&config.elements);
        Self {
            config,
            api,
            page,
            summary,
            state: Mutex::new(ControllerState::default()),
            summary_chain: Chain::default(),
            chart_chain: Chain::default(),
            running: Arc::new(AtomicBool::new(false)),
            logger: Box::new(DefaultErrorLogger),
        }
    }

    /// Replace the logger used for caught failures
    pub fn with_logger(mut self, logger: Box<dyn ErrorLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn page(&self) -> &PageRef {
        &self.page
    }

    /// Whether a polling task is active
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Create the pie and bar charts. Later calls are no-ops.
    pub async fn init_charts(&self) -> CoreResult<()> {
        let mut state = self.state.lock().await;
        if state.charts.is_none() {
            let elements = &self.config.elements;
            state.charts = Some(ChartRenderer::init(
                &elements.pie_chart,
                &elements.bar_chart,
                self.config.charts.palette.clone(),
                self.page.as_ref(),
            )?);
            log::debug!(target: "mytracker::poll", "Charts initialized");
        }
        Ok(())
    }

    pub async fn modal_visible(&self) -> bool {
        self.state.lock().await.modal_visible
    }

    pub async fn show_modal(&self) -> CoreResult<()> {
        self.set_modal(true).await
    }

    pub async fn hide_modal(&self) -> CoreResult<()> {
        self.set_modal(false).await
    }

    async fn set_modal(&self, visible: bool) -> CoreResult<()> {
        let mut state = self.state.lock().await;
        self.page.set_visible(&self.config.elements.modal, visible)?;
        state.modal_visible = visible;
        Ok(())
    }

    /// Dispatch a click or submit to its binding
    pub async fn handle_event(&self, event: PageEvent) -> CoreResult<EventOutcome> {
        let elements = &self.config.elements;
        match event {
            PageEvent::Click { id } if id == elements.quick_add_button => {
                self.show_modal().await?;
                Ok(EventOutcome::ModalShown)
            }
            PageEvent::Click { id } if id == elements.close_button => {
                self.hide_modal().await?;
                Ok(EventOutcome::ModalHidden)
            }
            PageEvent::Submit { id, form } if id == elements.form => {
                let outcome = self.submit_quick_add(&form).await?;
                Ok(EventOutcome::Submitted(outcome))
            }
            other => {
                log::debug!(target: "mytracker::form", "No binding for {:?}", other);
                Ok(EventOutcome::Ignored)
            }
        }
    }

    /// Post the quick-add form.
    ///
    /// A redirect navigates the page and leaves the modal alone. A 2xx answer
    /// hides the modal and runs one refresh. Anything else is an error and
    /// the modal stays open, unless `form.treat_failure_as_success` is set,
    /// in which case failures are handled like a 2xx answer.
    pub async fn submit_quick_add(&self, form: &FormData) -> CoreResult<SubmitOutcome> {
        let context = ErrorContext::new("submit_quick_add")
            .with_data("fields", serde_json::json!(form.len()));
        let lenient = self.config.form.treat_failure_as_success;

        log::info!(target: "mytracker::form", "Submitting quick-add form ({} fields)", form.len());

        match self.api.submit_quick_add(form).await {
            Ok(SubmitOutcome::Redirected { url }) => {
                log::info!(target: "mytracker::form", "Following redirect to {}", url);
                self.page.navigate(&url);
                Ok(SubmitOutcome::Redirected { url })
            }
            Ok(SubmitOutcome::Stayed { status }) => {
                let outcome = SubmitOutcome::Stayed { status };
                if !outcome.is_success() && !lenient {
                    let err = CoreError::SubmitFailed { status };
                    self.logger.log_error(&err, &context);
                    return Err(err);
                }
                if !outcome.is_success() {
                    self.logger.log_warning(
                        &format!("add endpoint answered {}, refreshing anyway", status),
                        &context,
                    );
                }
                self.hide_modal().await?;
                self.refresh_all().await;
                Ok(outcome)
            }
            Err(err) => {
                self.logger.log_error(&err, &context);
                if lenient {
                    self.hide_modal().await?;
                    self.refresh_all().await;
                }
                Err(err)
            }
        }
    }

    /// Run both chains once; they complete independently
    pub async fn refresh_all(&self) -> RefreshReport {
        let (summary, charts) = tokio::join!(self.refresh_summary(), self.refresh_charts());
        RefreshReport { summary, charts }
    }

    /// Fetch and display the summary figures; true if this result was applied
    pub async fn refresh_summary(&self) -> bool {
        let generation = self.summary_chain.next_generation();
        let context = ErrorContext::new("refresh_summary").with_generation(generation);

        let figures = match self.api.fetch_summary().await {
            Ok(figures) => figures,
            Err(err) => {
                self.logger.log_error(&err, &context);
                return false;
            }
        };

        let mut state = self.state.lock().await;
        if generation <= state.summary_applied {
            self.logger.log_debug("stale summary discarded", &context);
            return false;
        }
        match self.summary.apply_summary(&figures, self.page.as_ref()) {
            Ok(()) => {
                state.summary_applied = generation;
                log::debug!(target: "mytracker::poll", "Summary generation {} applied", generation);
                true
            }
            Err(err) => {
                self.logger.log_error(&err, &context);
                false
            }
        }
    }

    /// Fetch and draw the chart data; true if this result was applied
    pub async fn refresh_charts(&self) -> bool {
        let generation = self.chart_chain.next_generation();
        let context = ErrorContext::new("refresh_charts").with_generation(generation);

        let data = match self.api.fetch_chart_data().await {
            Ok(data) => data,
            Err(err) => {
                self.logger.log_error(&err, &context);
                return false;
            }
        };

        let mut state = self.state.lock().await;
        if generation <= state.charts_applied {
            self.logger.log_debug("stale chart data discarded", &context);
            return false;
        }
        let Some(charts) = state.charts.as_mut() else {
            let err = CoreError::NotRunning { message: "charts not initialized".to_string() };
            self.logger.log_error(&err, &context);
            return false;
        };
        let applied = charts.apply_chart_data(&data, self.page.as_ref());
        match applied {
            Ok(()) => {
                state.charts_applied = generation;
                log::debug!(target: "mytracker::poll", "Chart data generation {} applied", generation);
                true
            }
            Err(err) => {
                self.logger.log_error(&err, &context);
                false
            }
        }
    }

    /// Initialize the charts, refresh immediately, then keep refreshing every
    /// `polling.interval_secs` until the returned handle is stopped or dropped.
    pub async fn start(self: &Arc<Self>) -> CoreResult<PollingHandle> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(CoreError::AlreadyRunning);
        }
        if let Err(err) = self.init_charts().await {
            self.running.store(false, Ordering::SeqCst);
            return Err(err);
        }

        let period = self.config.poll_interval();
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let this = Arc::clone(self);

        log::info!(
            target: "mytracker::poll",
            "Polling {} every {}s",
            self.config.server.base_url,
            period.as_secs()
        );

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => this.poll_tick(),
                }
            }
            log::info!(target: "mytracker::poll", "Polling stopped");
        });

        Ok(PollingHandle {
            stop_tx: Some(stop_tx),
            task: Some(task),
            running: Arc::clone(&self.running),
        })
    }

    fn poll_tick(self: &Arc<Self>) {
        if self.summary_chain.try_begin() {
            let this = Arc::clone(self);
            tokio::spawn(async move {
                let _in_flight = InFlight(&this.summary_chain);
                this.refresh_summary().await;
            });
        } else {
            log::debug!(target: "mytracker::poll", "Summary request still in flight, skipping tick");
        }

        if self.chart_chain.try_begin() {
            let this = Arc::clone(self);
            tokio::spawn(async move {
                let _in_flight = InFlight(&this.chart_chain);
                this.refresh_charts().await;
            });
        } else {
            log::debug!(target: "mytracker::poll", "Chart request still in flight, skipping tick");
        }
    }
}

/// Cancels the polling task when stopped or dropped.
///
/// Requests already in flight still complete and render.
pub struct PollingHandle {
    stop_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
    running: Arc<AtomicBool>,
}

impl PollingHandle {
    pub fn is_active(&self) -> bool {
        self.task.as_ref().map(|task| !task.is_finished()).unwrap_or(false)
    }

    /// Stop polling and wait for the task to exit
    pub async fn stop(mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                log::warn!(target: "mytracker::poll", "Polling task ended abnormally: {}", err);
            }
        }
        self.running.store(false, Ordering::SeqCst);
    }
}

impl Drop for PollingHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            self.running.store(false, Ordering::SeqCst);
        }
    }
}

// ==================== Tests ====================
