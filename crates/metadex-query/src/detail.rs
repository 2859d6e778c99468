//! Label detail selection.

use metadex_core::MetricMetadataRow;

/// Which metric, if any, has its label view open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DetailState {
    #[default]
    Closed,
    Open(MetricMetadataRow),
}

impl DetailState {
    /// Open the view for `row`, replacing any record already shown.
    pub fn open(&mut self, row: MetricMetadataRow) {
        *self = DetailState::Open(row);
    }

    /// Cancel and confirm both land here.
    pub fn close(&mut self) {
        *self = DetailState::Closed;
    }

    pub fn selected(&self) -> Option<&MetricMetadataRow> {
        match self {
            DetailState::Open(row) => Some(row),
            DetailState::Closed => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, DetailState::Open(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: u64) -> MetricMetadataRow {
        MetricMetadataRow {
            metadata_id: id,
            name: format!("metric_{id}"),
            metric_type: None,
            help: String::new(),
            labels: Vec::new(),
            label_count: 0,
        }
    }

    #[test]
    fn starts_closed() {
        let state = DetailState::default();
        assert!(!state.is_open());
        assert!(state.selected().is_none());
    }

    #[test]
    fn open_then_close_discards_record() {
        let mut state = DetailState::default();
        state.open(row(1));
        assert_eq!(state.selected().map(|r| r.metadata_id), Some(1));

        state.close();
        assert_eq!(state, DetailState::Closed);
    }

    #[test]
    fn reopen_replaces_record() {
        let mut state = DetailState::default();
        state.open(row(1));
        state.open(row(2));
        assert_eq!(state.selected().map(|r| r.metadata_id), Some(2));
    }
}
