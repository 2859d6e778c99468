//! Dashboard page handlers.
//!
//! Each handler snapshots the session, builds view types, and renders
//! an Askama template. HTMX partials are in `partials.rs`.

use askama::Template;
use axum::extract::State;
use axum::response::Html;

use crate::DashboardState;
use crate::views::*;

pub(crate) fn render<T: Template>(tmpl: T) -> Html<String> {
    Html(tmpl.render().unwrap_or_else(|e| {
        format!("<pre>Template error: {e}</pre>")
    }))
}

// ── Metadata ────────────────────────────────────────────────────

#[derive(Template)]
#[template(path = "metadata.html")]
struct MetadataTemplate {
    display: DisplayOptions,
    datasources: Vec<DatasourceOptionView>,
    datasource_info: Option<DatasourceInfoView>,
    filter: FilterFormView,
    panel: PanelView,
}

pub async fn metadata(State(state): State<DashboardState>) -> Html<String> {
    let snapshot = state.session.snapshot().await;
    let selected = snapshot.request.datasource_id.as_ref();

    render(MetadataTemplate {
        display: state.display(),
        datasources: datasource_options(&state.config.datasources, selected),
        datasource_info: DatasourceInfoView::build(&state.config.datasources, selected),
        filter: FilterFormView::from_request(&snapshot.request),
        panel: PanelView::from_snapshot(&snapshot, &state.config.ui),
    })
}
