//! Shared types used across Metadex crates.
//!
//! `SearchRequest` and `ListReply` are the wire shapes of the remote
//! metadata listing call (camelCase JSON). `ListResult` is what the
//! console keeps after a successful fetch.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default page size used by the console before any pagination event.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Page sizes offered by the pagination control.
pub const PAGE_SIZE_OPTIONS: [u32; 3] = [20, 50, 100];

/// Identifier of a remote monitoring datasource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasourceId(String);

impl DatasourceId {
    /// Build an id from user input. Blank input is not an id.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            None
        } else {
            Some(Self(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DatasourceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for DatasourceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for DatasourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Pagination ─────────────────────────────────────────────────────

/// 1-based page number and page size. Both are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Pagination {
    /// Build a pagination, clamping zero values to 1.
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    /// Number of pages needed to show `total` items (at least 1).
    pub fn page_count(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.page_size)).max(1)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

// ── Search Request ─────────────────────────────────────────────────

/// The canonical metadata query.
///
/// Two requests are fetch-equivalent iff they compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datasource_id: Option<DatasourceId>,
    /// Metric type filter: "counter", "gauge", "histogram" or "summary".
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub metric_type: Option<String>,
    /// Wildcard-wrapped keyword (`%node%`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    pub pagination: Pagination,
}

// ── Metadata Rows ──────────────────────────────────────────────────

/// One label key with the values observed for it, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataLabel {
    pub key: String,
    #[serde(default)]
    pub values: Vec<String>,
}

/// Read-only projection of one metric's metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricMetadataRow {
    #[serde(default)]
    pub metadata_id: u64,
    pub name: String,
    #[serde(rename = "type", default)]
    pub metric_type: Option<String>,
    #[serde(default)]
    pub help: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub labels: Vec<MetadataLabel>,
    #[serde(default)]
    pub label_count: u32,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<MetadataLabel>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<MetadataLabel>>::deserialize(deserializer)?.unwrap_or_default())
}

// ── List Results ───────────────────────────────────────────────────

/// Rows of one page plus the total number of matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListResult {
    pub items: Vec<MetricMetadataRow>,
    pub total: u64,
}

/// Total count block of a listing reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyPagination {
    #[serde(default)]
    pub total: u64,
}

/// Reply of the remote listing call. Both fields may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListReply {
    #[serde(default)]
    pub items: Option<Vec<MetricMetadataRow>>,
    #[serde(default)]
    pub pagination: Option<ReplyPagination>,
}

impl From<ListReply> for ListResult {
    fn from(reply: ListReply) -> Self {
        Self {
            items: reply.items.unwrap_or_default(),
            total: reply.pagination.map(|p| p.total).unwrap_or(0),
        }
    }
}

/// Body of the remote sync call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    pub datasource_id: DatasourceId,
}
