//! metadex-dashboard — server-rendered web UI for Metadex.
//!
//! Provides axum route handlers that render HTML pages and HTMX
//! fragments for browsing metric metadata.
//!
//! # Routes
//!
//! | Route | Handler |
//! |---|---|
//! | `GET /dashboard` | Metadata page |
//! | `GET /dashboard/panel` | Table + pagination fragment |
//! | `GET /dashboard/metrics/{id}/labels` | Label modal fragment |
//! | `POST /dashboard/labels/close` | Close label modal |
//! | `POST /dashboard/datasource` | Select datasource |
//! | `POST /dashboard/filter` | Apply type + keyword filter |
//! | `POST /dashboard/search` | Apply keyword only |
//! | `POST /dashboard/page` | Change page / page size |
//! | `POST /dashboard/refresh` | Re-fetch current request |
//! | `POST /dashboard/sync` | Remote sync, then re-fetch |

pub mod actions;
pub mod pages;
pub mod partials;
pub mod views;

use std::sync::Arc;

use axum::Router;
use axum::response::Redirect;
use axum::routing::{get, post};

use metadex_core::MetadexConfig;
use metadex_query::MetadataSession;

use crate::views::DisplayOptions;

/// Shared state for dashboard handlers.
#[derive(Clone)]
pub struct DashboardState {
    pub session: MetadataSession,
    pub config: Arc<MetadexConfig>,
}

impl DashboardState {
    pub fn new(session: MetadataSession, config: Arc<MetadexConfig>) -> Self {
        Self { session, config }
    }

    pub fn display(&self) -> DisplayOptions {
        DisplayOptions::from_config(&self.config.ui)
    }
}

/// Build the dashboard router.
pub fn dashboard_router(state: DashboardState) -> Router {
    Router::new()
        .route("/", get(pages::metadata))
        .route("/panel", get(partials::panel))
        .route("/metrics/{id}/labels", get(partials::label_modal))
        .route("/labels/close", post(partials::close_labels))
        .route("/datasource", post(actions::select_datasource))
        .route("/filter", post(actions::apply_filter))
        .route("/search", post(actions::search))
        .route("/page", post(actions::paginate))
        .route("/refresh", post(actions::refresh))
        .route("/sync", post(actions::sync))
        .with_state(state)
}

/// Build the complete router: dashboard, root redirect, and health check.
pub fn build_router(state: DashboardState) -> Router {
    Router::new()
        .nest("/dashboard", dashboard_router(state))
        .route("/", get(|| async { Redirect::to("/dashboard") }))
        .route("/healthz", get(|| async { "ok" }))
}
