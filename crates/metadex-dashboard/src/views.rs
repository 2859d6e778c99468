//! View types for dashboard template rendering.
//!
//! These types are purpose-built for Askama templates: they carry
//! pre-formatted strings and computed fields so templates stay simple.

use chrono::{DateTime, Local};

use metadex_core::config::{DatasourceConfig, Theme, UiConfig};
use metadex_core::keyword::unwrap_keyword;
use metadex_core::{
    DatasourceId, MetadataLabel, MetricMetadataRow, MetricTypeSelection, PAGE_SIZE_OPTIONS,
    Pagination, SearchRequest, TagColor, type_badge,
};
use metadex_query::{Notice, NoticeLevel, SessionSnapshot};

/// Metric names longer than this are shortened in the table.
pub const NAME_DISPLAY_LIMIT: usize = 42;

// ── Display Options ─────────────────────────────────────────────

/// Read-only display flags injected from configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayOptions {
    pub theme: Theme,
    pub fullscreen: bool,
}

impl DisplayOptions {
    pub fn from_config(ui: &UiConfig) -> Self {
        Self {
            theme: ui.theme,
            fullscreen: ui.fullscreen,
        }
    }

    pub fn is_dark(&self) -> bool {
        self.theme == Theme::Dark
    }

    pub fn body_class(&self) -> &'static str {
        match self.theme {
            Theme::Dark => "bg-slate-950 text-slate-100",
            Theme::Light => "bg-white text-slate-800",
        }
    }

    pub fn container_class(&self) -> &'static str {
        if self.fullscreen {
            "w-full px-3"
        } else {
            "max-w-7xl mx-auto px-6"
        }
    }

    /// Label value tags in the detail view.
    pub fn value_tag_class(&self) -> &'static str {
        match self.theme {
            Theme::Dark => "bg-slate-800 hover:bg-slate-700 text-slate-100 transition-colors",
            Theme::Light => "bg-slate-100 hover:bg-slate-200 text-slate-700 transition-colors",
        }
    }
}

// ── Type Tags ───────────────────────────────────────────────────

pub struct TypeTagView {
    pub text: String,
    pub class: &'static str,
}

fn tag_class(color: TagColor) -> &'static str {
    match color {
        TagColor::Green => "bg-emerald-500/20 text-emerald-400",
        TagColor::Blue => "bg-sky-500/20 text-sky-400",
        TagColor::Purple => "bg-violet-500/20 text-violet-400",
        TagColor::Orange => "bg-orange-500/20 text-orange-400",
        TagColor::Default => "bg-slate-500/20 text-slate-400",
    }
}

impl TypeTagView {
    /// Tag for a table cell; an absent type shows a dash.
    pub fn for_cell(metric_type: Option<&str>) -> Self {
        match metric_type.filter(|t| !t.is_empty()) {
            None => Self {
                text: "-".to_string(),
                class: tag_class(TagColor::Default),
            },
            some => Self::for_title(some),
        }
    }

    /// Tag for the detail title; an absent type reads "unknown".
    pub fn for_title(metric_type: Option<&str>) -> Self {
        let badge = type_badge(metric_type);
        Self {
            text: badge.text,
            class: tag_class(badge.color),
        }
    }
}

// ── Filter Form ─────────────────────────────────────────────────

pub struct FilterOptionView {
    pub code: u8,
    pub label: &'static str,
    pub class: &'static str,
    pub checked: bool,
}

pub struct FilterFormView {
    pub options: Vec<FilterOptionView>,
    pub keyword: String,
}

impl FilterFormView {
    pub fn from_request(request: &SearchRequest) -> Self {
        let current = request
            .metric_type
            .as_deref()
            .map(MetricTypeSelection::from_type_str)
            .unwrap_or_default();

        let options = MetricTypeSelection::ALL
            .iter()
            .map(|selection| FilterOptionView {
                code: selection.code(),
                label: if *selection == MetricTypeSelection::Unknown {
                    "All"
                } else {
                    selection.label()
                },
                class: tag_class(selection.color()),
                checked: *selection == current,
            })
            .collect();

        Self {
            options,
            keyword: request
                .keyword
                .as_deref()
                .map(unwrap_keyword)
                .unwrap_or_default()
                .to_string(),
        }
    }
}

// ── Datasources ─────────────────────────────────────────────────

pub struct DatasourceOptionView {
    pub id: String,
    pub name: String,
    pub selected: bool,
}

pub struct DatasourceInfoView {
    pub id: String,
    pub name: String,
    pub driver: String,
    pub endpoint: String,
    pub description: String,
}

pub fn datasource_options(
    datasources: &[DatasourceConfig],
    selected: Option<&DatasourceId>,
) -> Vec<DatasourceOptionView> {
    datasources
        .iter()
        .map(|d| DatasourceOptionView {
            id: d.id.clone(),
            name: d.name.clone(),
            selected: selected.is_some_and(|s| s.as_str() == d.id),
        })
        .collect()
}

impl DatasourceInfoView {
    /// Info for the selected datasource. Ids missing from the config
    /// still get a card with the bare id.
    pub fn build(datasources: &[DatasourceConfig], selected: Option<&DatasourceId>) -> Option<Self> {
        let id = selected?;
        let view = match datasources.iter().find(|d| d.id == id.as_str()) {
            Some(d) => Self {
                id: d.id.clone(),
                name: d.name.clone(),
                driver: d.driver.clone(),
                endpoint: d.endpoint.clone().unwrap_or_else(|| "-".to_string()),
                description: d.description.clone().unwrap_or_default(),
            },
            None => Self {
                id: id.to_string(),
                name: id.to_string(),
                driver: "-".to_string(),
                endpoint: "-".to_string(),
                description: String::new(),
            },
        };
        Some(view)
    }
}

// ── Metric Rows ─────────────────────────────────────────────────

pub struct MetricRowView {
    pub metadata_id: u64,
    pub type_tag: TypeTagView,
    pub name: String,
    pub name_display: String,
    pub query_href: Option<String>,
    pub help: String,
    pub label_count_display: String,
    /// Rows without a `metadataId` cannot be looked up for the label modal.
    pub has_detail: bool,
}

impl MetricRowView {
    pub fn from_row(row: &MetricMetadataRow, query_url: Option<&str>) -> Self {
        let label_count = if row.labels.is_empty() {
            row.label_count as usize
        } else {
            row.labels.len()
        };

        Self {
            metadata_id: row.metadata_id,
            has_detail: row.metadata_id != 0,
            type_tag: TypeTagView::for_cell(row.metric_type.as_deref()),
            name: row.name.clone(),
            name_display: truncate_name(&row.name),
            query_href: query_url.map(|url| query_link(url, &row.name)),
            help: row.help.clone(),
            label_count_display: if label_count > 0 {
                label_count.to_string()
            } else {
                "-".to_string()
            },
        }
    }
}

/// Shorten long metric names to the display limit plus an ellipsis.
pub fn truncate_name(name: &str) -> String {
    if name.chars().count() > NAME_DISPLAY_LIMIT {
        let head: String = name.chars().take(NAME_DISPLAY_LIMIT).collect();
        format!("{head}...")
    } else {
        name.to_string()
    }
}

/// Fill `{expr}` in the configured query URL with the metric name.
pub fn query_link(template: &str, expr: &str) -> String {
    template.replace("{expr}", &urlencoding::encode(expr))
}

// ── Label Detail ────────────────────────────────────────────────

pub struct LabelRowView {
    pub key: String,
    pub values: Vec<String>,
}

pub struct LabelDetailView {
    pub name: String,
    pub type_tag: Option<TypeTagView>,
    pub labels: Vec<LabelRowView>,
    pub value_tag_class: &'static str,
}

impl LabelDetailView {
    pub fn from_row(row: &MetricMetadataRow, display: DisplayOptions) -> Self {
        Self {
            name: row.name.clone(),
            type_tag: row
                .metric_type
                .as_deref()
                .filter(|t| !t.is_empty())
                .map(|t| TypeTagView::for_title(Some(t))),
            labels: row.labels.iter().map(LabelRowView::from_label).collect(),
            value_tag_class: display.value_tag_class(),
        }
    }
}

impl LabelRowView {
    fn from_label(label: &MetadataLabel) -> Self {
        Self {
            key: label.key.clone(),
            values: label.values.clone(),
        }
    }
}

// ── Pagination ──────────────────────────────────────────────────

pub struct PageSizeOption {
    pub value: u32,
    pub selected: bool,
}

pub struct PaginationView {
    pub page: u32,
    pub page_size: u32,
    pub page_count: u64,
    pub total_display: String,
    pub has_prev: bool,
    pub has_next: bool,
    pub prev_page: u32,
    pub next_page: u32,
    pub size_options: Vec<PageSizeOption>,
}

impl PaginationView {
    pub fn build(pagination: Pagination, total: u64) -> Self {
        let page_count = pagination.page_count(total);
        let mut sizes: Vec<u32> = PAGE_SIZE_OPTIONS.to_vec();
        if !sizes.contains(&pagination.page_size) {
            sizes.push(pagination.page_size);
            sizes.sort_unstable();
        }

        Self {
            page: pagination.page,
            page_size: pagination.page_size,
            page_count,
            total_display: format!("Total {total} items"),
            has_prev: pagination.page > 1,
            has_next: u64::from(pagination.page) < page_count,
            prev_page: pagination.page.saturating_sub(1).max(1),
            next_page: pagination.page.saturating_add(1),
            size_options: sizes
                .into_iter()
                .map(|value| PageSizeOption {
                    value,
                    selected: value == pagination.page_size,
                })
                .collect(),
        }
    }
}

// ── Notices ─────────────────────────────────────────────────────

pub struct NoticeView {
    pub message: String,
    pub class: &'static str,
}

impl NoticeView {
    pub fn from_notice(notice: &Notice) -> Self {
        Self {
            message: notice.message.clone(),
            class: match notice.level {
                NoticeLevel::Success => "border-emerald-500/40 text-emerald-300",
                NoticeLevel::Error => "border-rose-500/40 text-rose-300",
            },
        }
    }
}

// ── Panel ───────────────────────────────────────────────────────

/// Table, pagination, and toasts; the part re-rendered after each action.
pub struct PanelView {
    pub rows: Vec<MetricRowView>,
    pub pagination: PaginationView,
    pub notices: Vec<NoticeView>,
    pub loading: bool,
    pub has_datasource: bool,
    pub last_refreshed_display: String,
}

impl PanelView {
    pub fn from_snapshot(snapshot: &SessionSnapshot, ui: &UiConfig) -> Self {
        let query_url = ui.query_url.as_deref();
        Self {
            rows: snapshot
                .result
                .items
                .iter()
                .map(|row| MetricRowView::from_row(row, query_url))
                .collect(),
            pagination: PaginationView::build(snapshot.request.pagination, snapshot.result.total),
            notices: snapshot.notices.iter().map(NoticeView::from_notice).collect(),
            loading: snapshot.loading,
            has_datasource: snapshot.request.datasource_id.is_some(),
            last_refreshed_display: format_refreshed(snapshot.last_refreshed),
        }
    }
}

fn format_refreshed(at: Option<DateTime<Local>>) -> String {
    match at {
        Some(t) => t.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "never".to_string(),
    }
}
