//! Screen-level controller: filters, page position, fetching and export.
//!
//! Every change to (criteria, page, page size) issues a fetch immediately.
//! The previous in-flight fetch is stopped first, and an update is applied
//! only when its generation matches the live request, so at most one result
//! per controller is ever committed.

#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;

use metrics::counter;
use precast_api::error::MSG_GENERIC;
use precast_api::{fetch_page_cancellable, ApiError, FetchOutcome, Transport};
use precast_core::page::{clamp_page_size, Pagination};
use precast_core::query::ListQuery;
use precast_core::screens::Screen;
use precast_export::{ExportFormat, Exporter};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::filters::FilterState;
use crate::model::ListUpdate;
use crate::projector::ResultProjector;
use crate::toasts::{ToastKind, Toaster};
use crate::view::{ViewHandle, ViewPublisher};

pub const MSG_EMPTY_SELECTION: &str = "Please select at least one row to export.";

struct InFlight {
    generation: u64,
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl InFlight {
    fn cancel(self) {
        let _ = self.stop.send(());
        self.task.abort();
    }
}

enum Wake<R> {
    Update(Option<ListUpdate<R>>),
    Finished,
}

pub struct ListController<S: Screen> {
    api: Arc<dyn Transport>,
    toaster: Arc<dyn Toaster>,
    project_id: u64,
    filters: FilterState<S::Filter>,
    pagination: Pagination,
    projector: ResultProjector<S::Row>,
    generation: u64,
    inflight: Option<InFlight>,
    updates_tx: mpsc::UnboundedSender<ListUpdate<S::Row>>,
    updates_rx: mpsc::UnboundedReceiver<ListUpdate<S::Row>>,
    loading: bool,
    last_error: Option<ApiError>,
    view: ViewPublisher<S::Row>,
}

impl<S: Screen> ListController<S> {
    /// Build an idle controller. Nothing is fetched until `refresh` or a change.
    pub fn new(api: Arc<dyn Transport>, toaster: Arc<dyn Toaster>, project_id: u64, page_size: u32) -> Self {
        let pagination = Pagination::new(page_size);
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();
        Self {
            api,
            toaster,
            project_id,
            filters: FilterState::default(),
            pagination,
            projector: ResultProjector::new(S::KIND.columns()),
            generation: 0,
            inflight: None,
            updates_tx,
            updates_rx,
            loading: false,
            last_error: None,
            view: ViewPublisher::new(pagination),
        }
    }

    /// Seed the criteria before the first fetch.
    pub fn with_filters(mut self, filters: S::Filter) -> Self {
        self.filters = FilterState::new(filters);
        self
    }

    pub fn filters(&self) -> &S::Filter { self.filters.current() }
    pub fn has_active_filters(&self) -> bool { self.filters.has_active_filters() }
    pub fn pagination(&self) -> Pagination { self.pagination }
    pub fn is_loading(&self) -> bool { self.loading }
    pub fn last_error(&self) -> Option<&ApiError> { self.last_error.as_ref() }
    pub fn projector(&self) -> &ResultProjector<S::Row> { &self.projector }
    pub fn projector_mut(&mut self) -> &mut ResultProjector<S::Row> { &mut self.projector }
    pub fn view(&self) -> ViewHandle<S::Row> { self.view.handle() }

    /// Replace the criteria. Equal criteria are a no-op; otherwise page resets to 1.
    pub fn apply_filters(&mut self, next: S::Filter) -> bool {
        if !self.filters.apply(next) {
            debug!(screen = %S::KIND, "list: filters unchanged");
            return false;
        }
        self.pagination.page = 1;
        self.sync();
        true
    }

    pub fn reset_filters(&mut self) {
        self.filters.reset();
        self.pagination.page = 1;
        self.sync();
    }

    pub fn set_page(&mut self, page: u32) {
        let page = page.max(1);
        if page == self.pagination.page {
            return;
        }
        self.pagination.page = page;
        self.sync();
    }

    /// Advance one page when the envelope allows it.
    pub fn next_page(&mut self) -> bool {
        if !self.projector.next_enabled() {
            return false;
        }
        self.set_page(self.pagination.page.saturating_add(1));
        true
    }

    pub fn prev_page(&mut self) -> bool {
        if !self.projector.prev_enabled() || self.pagination.page <= 1 {
            return false;
        }
        self.set_page(self.pagination.page - 1);
        true
    }

    pub fn set_page_size(&mut self, page_size: u32) {
        let page_size = clamp_page_size(page_size);
        if page_size == self.pagination.page_size {
            return;
        }
        self.pagination = Pagination { page: 1, page_size };
        self.sync();
    }

    /// Re-issue the current query.
    pub fn refresh(&mut self) { self.sync(); }

    pub fn current_query(&self) -> ListQuery {
        ListQuery::build(self.filters.current(), self.pagination.page, self.pagination.page_size)
    }

    fn cancel_inflight(&mut self) {
        if let Some(prev) = self.inflight.take() {
            debug!(screen = %S::KIND, generation = prev.generation, "list: cancel superseded fetch");
            counter!("list_fetch_cancelled_total", 1, "screen" => S::KIND.name());
            prev.cancel();
        }
    }

    fn sync(&mut self) {
        self.cancel_inflight();
        self.generation = self.generation.wrapping_add(1);
        let generation = self.generation;
        let query = self.current_query();
        let api = Arc::clone(&self.api);
        let tx = self.updates_tx.clone();
        let project_id = self.project_id;
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        debug!(screen = %S::KIND, generation, page = query.page, page_size = query.page_size, "list: sync");
        let task = tokio::spawn(async move {
            let update = match fetch_page_cancellable::<S>(api.as_ref(), project_id, &query, stop_rx).await {
                FetchOutcome::Ok(page) => ListUpdate::Page { generation, page },
                FetchOutcome::Failed(error) => ListUpdate::Failed { generation, error },
                FetchOutcome::Cancelled => ListUpdate::Cancelled { generation },
            };
            let _ = tx.send(update);
        });
        self.inflight = Some(InFlight { generation, stop: stop_tx, task });
        self.loading = true;
    }

    /// Apply whatever updates have arrived without waiting.
    pub fn process_updates(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(update) = self.updates_rx.try_recv() {
            if self.apply_update(update) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait until the live request has committed (or ended without reporting).
    pub async fn settle(&mut self) {
        while let Some(mut flight) = self.inflight.take() {
            let generation = flight.generation;
            let wake = tokio::select! {
                u = self.updates_rx.recv() => Wake::Update(u),
                _ = &mut flight.task => Wake::Finished,
            };
            match wake {
                Wake::Update(Some(update)) => {
                    self.inflight = Some(flight);
                    self.apply_update(update);
                }
                Wake::Update(None) => {
                    self.loading = false;
                    return;
                }
                Wake::Finished => {
                    // the task is done; its update, if any, is already queued
                    self.inflight = Some(flight);
                    self.process_updates();
                    if self.inflight.as_ref().map(|f| f.generation) == Some(generation) {
                        // only a panicked task gets here
                        warn!(screen = %S::KIND, generation, "list: fetch task ended without reporting");
                        self.inflight = None;
                        self.loading = false;
                    }
                }
            }
        }
    }

    fn apply_update(&mut self, update: ListUpdate<S::Row>) -> bool {
        let generation = update.generation();
        if self.inflight.as_ref().map(|f| f.generation) != Some(generation) {
            if !matches!(update, ListUpdate::Cancelled { .. }) {
                counter!("list_stale_updates_total", 1, "screen" => S::KIND.name());
            }
            debug!(screen = %S::KIND, generation, live = self.generation, "list: stale update dropped");
            return false;
        }
        self.inflight = None;
        self.loading = false;
        match update {
            ListUpdate::Page { page, .. } => {
                info!(screen = %S::KIND, generation, rows = page.rows.len(), pager = page.has_pager(), "list: page committed");
                self.last_error = None;
                self.projector.set_rows(page);
                self.publish(None);
            }
            ListUpdate::Failed { error, .. } => {
                warn!(screen = %S::KIND, generation, error = %error, "list: fetch failed");
                self.projector.clear();
                let msg = error.user_message();
                if let Some(m) = msg.as_deref() {
                    self.toaster.toast(m, ToastKind::Error);
                }
                self.last_error = Some(error);
                self.publish(msg);
            }
            ListUpdate::Cancelled { .. } => {
                debug!(screen = %S::KIND, generation, "list: fetch cancelled by transport");
                return false;
            }
        }
        true
    }

    fn publish(&mut self, error: Option<String>) {
        let rows = self.projector.rows().to_vec();
        let envelope = self.projector.envelope().copied();
        self.view.publish(rows, envelope, self.pagination, error);
    }

    /// Export the selected rows of the current page.
    ///
    /// Returns the written path on success. Failures are toasted and leave the
    /// selection as it was.
    pub fn export_selected(&mut self, format: ExportFormat, exporter: &dyn Exporter) -> Option<PathBuf> {
        let title = S::KIND.title();
        let Some(doc) = self.projector.export_document(title, format, precast_export::today()) else {
            self.toaster.toast(MSG_EMPTY_SELECTION, ToastKind::Warn);
            return None;
        };
        match exporter.export(&doc, format) {
            Ok(path) => {
                counter!("list_export_total", 1, "screen" => S::KIND.name(), "format" => format.extension());
                self.toaster.toast(&doc.success_message, ToastKind::Success);
                Some(path)
            }
            Err(e) => {
                warn!(screen = %S::KIND, error = %e, "list: export failed");
                self.toaster.toast(MSG_GENERIC, ToastKind::Error);
                None
            }
        }
    }
}

impl<S: Screen> Drop for ListController<S> {
    fn drop(&mut self) { self.cancel_inflight(); }
}
