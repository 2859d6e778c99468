//! Offline metadata source backed by a JSON fixture.
//!
//! Filtering mirrors the remote service: exact (case-insensitive) type
//! match, `%`-wildcard keyword match on name and help, then pagination.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use metadex_core::keyword::like_match;
use metadex_core::{DatasourceId, ListReply, MetricMetadataRow, ReplyPagination, SearchRequest};

use crate::error::{SourceError, SourceResult};
use crate::source::{MetadataSource, SourceFuture};

#[derive(Deserialize)]
struct FixtureFile {
    #[serde(default)]
    items: Vec<MetricMetadataRow>,
}

/// `MetadataSource` that serves a fixed set of rows.
#[derive(Debug, Clone, Default)]
pub struct FixtureSource {
    rows: Vec<MetricMetadataRow>,
}

impl FixtureSource {
    pub fn new(rows: Vec<MetricMetadataRow>) -> Self {
        Self { rows }
    }

    pub fn from_file(path: &Path) -> SourceResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SourceError::Fixture(format!("{}: {e}", path.display())))?;
        let file: FixtureFile = serde_json::from_str(&content)
            .map_err(|e| SourceError::Fixture(format!("{}: {e}", path.display())))?;
        debug!(path = %path.display(), rows = file.items.len(), "fixture loaded");
        Ok(Self::new(file.items))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn matches(row: &MetricMetadataRow, request: &SearchRequest) -> bool {
        if let Some(wanted) = &request.metric_type {
            let row_type = row.metric_type.as_deref().unwrap_or_default();
            if !row_type.eq_ignore_ascii_case(wanted) {
                return false;
            }
        }
        match &request.keyword {
            Some(pattern) => like_match(pattern, &row.name) || like_match(pattern, &row.help),
            None => true,
        }
    }

    /// Apply filters and pagination synchronously.
    pub fn query(&self, request: &SearchRequest) -> ListReply {
        let matched: Vec<&MetricMetadataRow> = self
            .rows
            .iter()
            .filter(|row| Self::matches(row, request))
            .collect();

        let page = request.pagination;
        let skip = (page.page as usize).saturating_sub(1).saturating_mul(page.page_size as usize);
        let items = matched
            .iter()
            .skip(skip)
            .take(page.page_size as usize)
            .map(|row| (*row).clone())
            .collect();

        ListReply {
            items: Some(items),
            pagination: Some(ReplyPagination {
                total: matched.len() as u64,
            }),
        }
    }
}

impl MetadataSource for FixtureSource {
    fn list_metadata<'a>(&'a self, request: &'a SearchRequest) -> SourceFuture<'a, ListReply> {
        Box::pin(async move {
            if request.datasource_id.is_none() {
                return Err(SourceError::MissingDatasource);
            }
            Ok(self.query(request))
        })
    }

    fn sync_metadata<'a>(&'a self, datasource_id: &'a DatasourceId) -> SourceFuture<'a, ()> {
        Box::pin(async move {
            debug!(%datasource_id, "fixture sync is a no-op");
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metadex_core::{MetadataLabel, Pagination};

    fn row(id: u64, name: &str, metric_type: &str, help: &str) -> MetricMetadataRow {
        MetricMetadataRow {
            metadata_id: id,
            name: name.to_string(),
            metric_type: Some(metric_type.to_string()),
            help: help.to_string(),
            labels: vec![MetadataLabel {
                key: "job".to_string(),
                values: vec!["node".to_string()],
            }],
            label_count: 1,
        }
    }

    fn source() -> FixtureSource {
        FixtureSource::new(vec![
            row(1, "node_cpu_seconds_total", "counter", "CPU time"),
            row(2, "node_load1", "gauge", "1m load average"),
            row(3, "http_request_duration_seconds", "histogram", "Request latency"),
            row(4, "go_gc_duration_seconds", "summary", "GC pauses"),
            row(5, "node_memory_MemFree_bytes", "Gauge", "Free memory"),
        ])
    }

    fn request(metric_type: Option<&str>, keyword: Option<&str>, page: u32, size: u32) -> SearchRequest {
        SearchRequest {
            datasource_id: Some("ds1".into()),
            metric_type: metric_type.map(str::to_string),
            keyword: keyword.map(str::to_string),
            pagination: Pagination::new(page, size),
        }
    }

    #[test]
    fn filters_by_type_case_insensitively() {
        let reply = source().query(&request(Some("gauge"), None, 1, 20));
        let names: Vec<String> = reply.items.unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["node_load1", "node_memory_MemFree_bytes"]);
    }

    #[test]
    fn filters_by_keyword_on_name_or_help() {
        let reply = source().query(&request(None, Some("%node%"), 1, 20));
        assert_eq!(reply.pagination.unwrap().total, 3);

        let reply = source().query(&request(None, Some("%latency%"), 1, 20));
        assert_eq!(reply.items.unwrap()[0].metadata_id, 3);
    }

    #[test]
    fn paginates_after_filtering() {
        let reply = source().query(&request(None, None, 2, 2));
        let ids: Vec<u64> = reply.items.unwrap().iter().map(|r| r.metadata_id).collect();
        assert_eq!(ids, vec![3, 4]);
        assert_eq!(reply.pagination.unwrap().total, 5);

        let reply = source().query(&request(None, None, 9, 2));
        assert!(reply.items.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_requires_datasource() {
        let mut req = request(None, None, 1, 20);
        req.datasource_id = None;
        let err = source().list_metadata(&req).await.unwrap_err();
        assert!(matches!(err, SourceError::MissingDatasource));
    }

    #[test]
    fn loads_fixture_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metadata.json");
        std::fs::write(
            &path,
            r#"{"items":[{"metadataId":1,"name":"up","type":"gauge","labels":null}]}"#,
        )
        .unwrap();
        let source = FixtureSource::from_file(&path).unwrap();
        assert_eq!(source.len(), 1);

        let missing = FixtureSource::from_file(&dir.path().join("nope.json"));
        assert!(matches!(missing, Err(SourceError::Fixture(_))));
    }
}
