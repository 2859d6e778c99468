//! Dashboard action endpoints.
//!
//! HTMX form handlers that update the query state, wait for the fetch
//! they triggered (if any), and return the re-rendered panel.

use axum::extract::{Form, State};
use axum::response::{Html, IntoResponse, Redirect};
use serde::Deserialize;
use tracing::debug;

use metadex_core::{DatasourceId, MetricTypeSelection};
use metadex_query::{FilterForm, settle};

use crate::DashboardState;
use crate::partials::render_panel;

// ── Datasource ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct DatasourceForm {
    #[serde(default)]
    pub datasource_id: String,
}

/// Select the datasource, then reload the page so the info card and
/// selector follow. A blank selection keeps the current datasource.
pub async fn select_datasource(
    State(state): State<DashboardState>,
    Form(form): Form<DatasourceForm>,
) -> impl IntoResponse {
    match DatasourceId::parse(&form.datasource_id) {
        Some(id) => {
            debug!(datasource_id = %id, "datasource selected");
            settle(state.session.set_datasource(id).await).await;
        }
        None => debug!("blank datasource selection ignored"),
    }
    Redirect::to("/dashboard")
}

// ── Filters ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct FilterInput {
    #[serde(default)]
    pub metric_type: u8,
    #[serde(default)]
    pub keyword: String,
}

pub async fn apply_filter(
    State(state): State<DashboardState>,
    Form(input): Form<FilterInput>,
) -> Html<String> {
    let form = FilterForm {
        metric_type: MetricTypeSelection::from_code(input.metric_type),
        keyword: input.keyword,
    };
    settle(state.session.apply_filter_form(&form).await).await;
    render_panel(&state).await
}

#[derive(Deserialize)]
pub struct SearchInput {
    #[serde(default)]
    pub keyword: String,
}

pub async fn search(
    State(state): State<DashboardState>,
    Form(input): Form<SearchInput>,
) -> Html<String> {
    settle(state.session.search(&input.keyword).await).await;
    render_panel(&state).await
}

// ── Pagination ──────────────────────────────────────────────────

/// Page controls post strings; the quick jumper may send an empty page.
#[derive(Deserialize)]
pub struct PageInput {
    #[serde(default)]
    pub page: String,
    #[serde(default)]
    pub page_size: String,
}

pub async fn paginate(
    State(state): State<DashboardState>,
    Form(input): Form<PageInput>,
) -> Html<String> {
    let current = state.session.current_request().await.pagination;
    let page = input.page.trim().parse().unwrap_or(current.page);
    let page_size = input.page_size.trim().parse().unwrap_or(current.page_size);

    settle(state.session.set_pagination(page, page_size).await).await;
    render_panel(&state).await
}

// ── Refresh / Sync ──────────────────────────────────────────────

pub async fn refresh(State(state): State<DashboardState>) -> Html<String> {
    settle(state.session.refresh().await).await;
    render_panel(&state).await
}

pub async fn sync(State(state): State<DashboardState>) -> Html<String> {
    settle(state.session.sync().await).await;
    render_panel(&state).await
}
