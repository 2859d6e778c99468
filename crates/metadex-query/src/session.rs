//! Metadata session — one controller wired to one source.
//!
//! Controller transitions happen under a tokio mutex. Fetch I/O runs in
//! a spawned task outside the lock and re-enters it only to hand the
//! outcome to [`QueryStateController::complete`], so completions may
//! land in any order.

use std::sync::Arc;

use chrono::{DateTime, Local};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use metadex_core::{DatasourceId, ListResult, MetricMetadataRow, SearchRequest};
use metadex_source::MetadataSource;

use crate::controller::{Completion, FetchTicket, FilterForm, QueryStateController};
use crate::notice::Notice;

/// Handle to a spawned fetch.
pub type FetchHandle = JoinHandle<Completion>;

struct SessionState {
    controller: QueryStateController,
    notices: Vec<Notice>,
    last_refreshed: Option<DateTime<Local>>,
}

/// Everything a render needs, taken in one lock.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub request: SearchRequest,
    pub result: ListResult,
    pub loading: bool,
    pub detail: Option<MetricMetadataRow>,
    pub notices: Vec<Notice>,
    pub last_refreshed: Option<DateTime<Local>>,
}

#[derive(Clone)]
pub struct MetadataSession {
    state: Arc<Mutex<SessionState>>,
    source: Arc<dyn MetadataSource>,
}

impl MetadataSession {
    pub fn new(source: Arc<dyn MetadataSource>, controller: QueryStateController) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState {
                controller,
                notices: Vec::new(),
                last_refreshed: None,
            })),
            source,
        }
    }

    pub async fn set_datasource(&self, id: DatasourceId) -> Option<FetchHandle> {
        let ticket = self.state.lock().await.controller.set_datasource(id);
        self.dispatch(ticket)
    }

    pub async fn apply_filter_form(&self, form: &FilterForm) -> Option<FetchHandle> {
        let ticket = self.state.lock().await.controller.apply_filter_form(form);
        self.dispatch(ticket)
    }

    pub async fn search(&self, keyword: &str) -> Option<FetchHandle> {
        let ticket = self.state.lock().await.controller.search(keyword);
        self.dispatch(ticket)
    }

    pub async fn set_pagination(&self, page: u32, page_size: u32) -> Option<FetchHandle> {
        let ticket = self
            .state
            .lock()
            .await
            .controller
            .set_pagination(page, page_size);
        self.dispatch(ticket)
    }

    pub async fn refresh(&self) -> Option<FetchHandle> {
        let ticket = self.state.lock().await.controller.refresh();
        self.dispatch(ticket)
    }

    /// Ask the remote service to re-sync, then refresh the list.
    ///
    /// Without a datasource this does nothing.
    pub async fn sync(&self) -> Option<FetchHandle> {
        let datasource_id = self
            .state
            .lock()
            .await
            .controller
            .current_request()
            .datasource_id
            .clone()?;

        match self.source.sync_metadata(&datasource_id).await {
            Ok(()) => {
                info!(%datasource_id, "metadata sync completed");
                let ticket = {
                    let mut state = self.state.lock().await;
                    state.notices.push(Notice::success("Metadata sync completed"));
                    state.controller.refresh()
                };
                self.dispatch(ticket)
            }
            Err(e) => {
                warn!(%datasource_id, error = %e, "metadata sync failed");
                self.state
                    .lock()
                    .await
                    .notices
                    .push(Notice::error(format!("Metadata sync failed: {e}")));
                None
            }
        }
    }

    pub async fn open_detail(&self, metadata_id: u64) -> Option<MetricMetadataRow> {
        let mut state = self.state.lock().await;
        if state.controller.open_detail_by_id(metadata_id) {
            state.controller.detail().selected().cloned()
        } else {
            debug!(metadata_id, "label view requested for a row not on screen");
            None
        }
    }

    pub async fn close_detail(&self) {
        self.state.lock().await.controller.close_detail();
    }

    pub async fn current_request(&self) -> SearchRequest {
        self.state.lock().await.controller.current_request().clone()
    }

    /// Snapshot state for rendering. Pending notices are handed out once.
    pub async fn snapshot(&self) -> SessionSnapshot {
        let mut state = self.state.lock().await;
        SessionSnapshot {
            request: state.controller.current_request().clone(),
            result: state.controller.result().clone(),
            loading: state.controller.is_loading(),
            detail: state.controller.detail().selected().cloned(),
            notices: std::mem::take(&mut state.notices),
            last_refreshed: state.last_refreshed,
        }
    }

    fn dispatch(&self, ticket: Option<FetchTicket>) -> Option<FetchHandle> {
        let ticket = ticket?;
        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);

        Some(tokio::spawn(async move {
            let outcome = source
                .list_metadata(ticket.request())
                .await
                .map(ListResult::from)
                .map_err(|e| e.to_string());

            let mut state = state.lock().await;
            let completion = state.controller.complete(&ticket, outcome);
            match &completion {
                Completion::Applied { rows, total } => {
                    state.last_refreshed = Some(Local::now());
                    debug!(generation = ticket.generation(), rows, total, "metadata page loaded");
                }
                Completion::Failed { message } => {
                    warn!(generation = ticket.generation(), error = %message, "metadata fetch failed");
                    state
                        .notices
                        .push(Notice::error(format!("Failed to load metadata: {message}")));
                }
                Completion::Superseded => {}
            }
            completion
        }))
    }
}

/// Wait for a dispatched fetch, if any.
pub async fn settle(handle: Option<FetchHandle>) -> Option<Completion> {
    match handle?.await {
        Ok(completion) => Some(completion),
        Err(e) => {
            warn!(error = %e, "fetch task did not finish");
            None
        }
    }
}
