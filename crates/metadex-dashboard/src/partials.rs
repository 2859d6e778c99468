//! HTMX partial endpoints.
//!
//! These return HTML fragments (not full pages) for HTMX to swap
//! into specific DOM sections.

use askama::Template;
use axum::extract::{Path, State};
use axum::response::Html;

use crate::DashboardState;
use crate::pages::render;
use crate::views::*;

// ── Metadata Panel ──────────────────────────────────────────────

#[derive(Template)]
#[template(path = "_partials/panel.html")]
struct PanelPartial {
    panel: PanelView,
}

/// Render the table panel from the session's current state.
pub(crate) async fn render_panel(state: &DashboardState) -> Html<String> {
    let snapshot = state.session.snapshot().await;
    render(PanelPartial {
        panel: PanelView::from_snapshot(&snapshot, &state.config.ui),
    })
}

pub async fn panel(State(state): State<DashboardState>) -> Html<String> {
    render_panel(&state).await
}

// ── Label Modal ─────────────────────────────────────────────────

#[derive(Template)]
#[template(path = "_partials/label_modal.html")]
struct LabelModalPartial {
    detail: LabelDetailView,
}

pub async fn label_modal(
    State(state): State<DashboardState>,
    Path(id): Path<u64>,
) -> Html<String> {
    match state.session.open_detail(id).await {
        Some(row) => render(LabelModalPartial {
            detail: LabelDetailView::from_row(&row, state.display()),
        }),
        None => Html(String::new()),
    }
}

pub async fn close_labels(State(state): State<DashboardState>) -> Html<String> {
    state.session.close_detail().await;
    Html(String::new())
}
