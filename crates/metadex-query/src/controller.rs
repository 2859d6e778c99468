//! Query state controller.
//!
//! Owns the canonical [`SearchRequest`] and decides when it must be
//! fetched. Every mutating operation returns an optional
//! [`FetchTicket`]; the caller performs the I/O and hands the outcome
//! back through [`QueryStateController::complete`].
//!
//! # Trigger rule
//!
//! After each update a ticket is issued iff a datasource is selected
//! and the request differs from what is on screen (or from what an
//! in-flight fetch will put on screen) and from the last request
//! issued. A failed request is therefore not retried until the request
//! changes or [`refresh`](QueryStateController::refresh) is called.
//!
//! # Ordering
//!
//! Tickets carry a generation. Only the latest generation may touch
//! state; older completions are reported as [`Completion::Superseded`].

use tracing::debug;

use metadex_core::{
    DatasourceId, ListResult, MetricMetadataRow, MetricTypeSelection, Pagination, SearchRequest,
    wrap_keyword,
};

use crate::detail::DetailState;

/// Values of the filter form: type radio group and keyword box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterForm {
    pub metric_type: MetricTypeSelection,
    pub keyword: String,
}

/// A fetch the caller must perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    request: SearchRequest,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn request(&self) -> &SearchRequest {
        &self.request
    }
}

/// What happened to a completed fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The result replaced the displayed rows.
    Applied { rows: usize, total: u64 },
    /// The fetch failed; the displayed rows were kept.
    Failed { message: String },
    /// A newer fetch was issued meanwhile; the outcome was dropped.
    Superseded,
}

#[derive(Debug, Clone, Default)]
pub struct QueryStateController {
    request: SearchRequest,
    /// Request that produced `result`.
    displayed: Option<SearchRequest>,
    /// Request of the most recent ticket.
    last_issued: Option<SearchRequest>,
    generation: u64,
    loading: bool,
    result: ListResult,
    detail: DetailState,
}

impl QueryStateController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `page_size` rows per page instead of the default.
    pub fn with_page_size(page_size: u32) -> Self {
        let mut controller = Self::default();
        controller.request.pagination = Pagination::new(1, page_size);
        controller
    }

    // ── Request updates ─────────────────────────────────────────

    /// Select the datasource to browse. Filters and page are kept.
    pub fn set_datasource(&mut self, id: DatasourceId) -> Option<FetchTicket> {
        self.update(|req| req.datasource_id = Some(id))
    }

    /// Overwrite type and keyword from the filter form.
    pub fn apply_filter_form(&mut self, form: &FilterForm) -> Option<FetchTicket> {
        let metric_type = form.metric_type.as_type_str().map(str::to_string);
        let keyword = wrap_keyword(&form.keyword);
        self.update(|req| {
            req.metric_type = metric_type;
            req.keyword = keyword;
        })
    }

    /// Search box submit: overwrite the keyword only.
    pub fn search(&mut self, keyword: &str) -> Option<FetchTicket> {
        let keyword = wrap_keyword(keyword);
        self.update(|req| req.keyword = keyword)
    }

    pub fn set_pagination(&mut self, page: u32, page_size: u32) -> Option<FetchTicket> {
        let pagination = Pagination::new(page, page_size);
        self.update(|req| req.pagination = pagination)
    }

    /// Fetch the current request again, even if it is on screen.
    pub fn refresh(&mut self) -> Option<FetchTicket> {
        if self.request.datasource_id.is_none() {
            return None;
        }
        Some(self.issue())
    }

    fn update(&mut self, apply: impl FnOnce(&mut SearchRequest)) -> Option<FetchTicket> {
        apply(&mut self.request);
        self.poll_fetch()
    }

    fn poll_fetch(&mut self) -> Option<FetchTicket> {
        if self.request.datasource_id.is_none() {
            return None;
        }
        if !self.loading && self.displayed.as_ref() == Some(&self.request) {
            return None;
        }
        if self.last_issued.as_ref() == Some(&self.request) {
            return None;
        }
        Some(self.issue())
    }

    fn issue(&mut self) -> FetchTicket {
        self.generation += 1;
        self.loading = true;
        self.last_issued = Some(self.request.clone());
        debug!(generation = self.generation, request = ?self.request, "fetch issued");
        FetchTicket {
            generation: self.generation,
            request: self.request.clone(),
        }
    }

    // ── Completion ──────────────────────────────────────────────

    /// Reconcile the outcome of `ticket` with current state.
    pub fn complete(
        &mut self,
        ticket: &FetchTicket,
        outcome: Result<ListResult, String>,
    ) -> Completion {
        if ticket.generation != self.generation || !self.loading {
            debug!(
                generation = ticket.generation,
                latest = self.generation,
                "stale fetch completion dropped"
            );
            return Completion::Superseded;
        }

        self.loading = false;
        match outcome {
            Ok(result) => {
                let completion = Completion::Applied {
                    rows: result.items.len(),
                    total: result.total,
                };
                self.result = result;
                self.displayed = Some(ticket.request.clone());
                completion
            }
            Err(message) => Completion::Failed { message },
        }
    }

    // ── Detail selection ────────────────────────────────────────

    pub fn open_detail(&mut self, row: MetricMetadataRow) {
        self.detail.open(row);
    }

    /// Open the displayed row with `metadata_id`. Unknown ids are ignored,
    /// and so is 0, which rows without an id default to.
    pub fn open_detail_by_id(&mut self, metadata_id: u64) -> bool {
        if metadata_id == 0 {
            return false;
        }
        match self
            .result
            .items
            .iter()
            .find(|row| row.metadata_id == metadata_id)
        {
            Some(row) => {
                self.detail.open(row.clone());
                true
            }
            None => false,
        }
    }

    pub fn close_detail(&mut self) {
        self.detail.close();
    }

    // ── Accessors ───────────────────────────────────────────────

    pub fn current_request(&self) -> &SearchRequest {
        &self.request
    }

    pub fn result(&self) -> &ListResult {
        &self.result
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn detail(&self) -> &DetailState {
        &self.detail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: u64, name: &str) -> MetricMetadataRow {
        MetricMetadataRow {
            metadata_id: id,
            name: name.to_string(),
            metric_type: Some("gauge".to_string()),
            help: String::new(),
            labels: Vec::new(),
            label_count: 0,
        }
    }

    fn rows(n: u64) -> ListResult {
        ListResult {
            items: (1..=n).map(|i| row(i, &format!("m{i}"))).collect(),
            total: n,
        }
    }

    fn form(code: u8, keyword: &str) -> FilterForm {
        FilterForm {
            metric_type: MetricTypeSelection::from_code(code),
            keyword: keyword.to_string(),
        }
    }

    fn with_datasource() -> (QueryStateController, FetchTicket) {
        let mut c = QueryStateController::new();
        let ticket = c.set_datasource("ds1".into()).expect("first datasource fetches");
        (c, ticket)
    }

    #[test]
    fn no_datasource_never_fetches() {
        let mut c = QueryStateController::new();
        assert!(c.apply_filter_form(&form(1, "cpu")).is_none());
        assert!(c.search("mem").is_none());
        assert!(c.set_pagination(2, 50).is_none());
        assert!(c.refresh().is_none());
        assert!(!c.is_loading());
        assert_eq!(c.current_request().metric_type.as_deref(), Some("counter"));
    }

    #[test]
    fn filter_form_builds_expected_request_with_one_fetch() {
        let (mut c, first) = with_datasource();
        c.complete(&first, Ok(rows(1)));

        let ticket = c.apply_filter_form(&form(2, "node")).expect("one fetch");
        let expected = SearchRequest {
            datasource_id: Some("ds1".into()),
            metric_type: Some("gauge".to_string()),
            keyword: Some("%node%".to_string()),
            pagination: Pagination { page: 1, page_size: 20 },
        };
        assert_eq!(ticket.request(), &expected);
        assert_eq!(c.current_request(), &expected);
    }

    #[test]
    fn every_selection_maps_per_table() {
        let (mut c, _) = with_datasource();
        for (code, expected) in [
            (0, None),
            (1, Some("counter")),
            (2, Some("gauge")),
            (3, Some("histogram")),
            (4, Some("summary")),
        ] {
            c.apply_filter_form(&form(code, ""));
            assert_eq!(c.current_request().metric_type.as_deref(), expected);
        }
    }

    #[test]
    fn cleared_form_fields_clear_filters() {
        let (mut c, _) = with_datasource();
        c.apply_filter_form(&form(3, "latency"));
        c.apply_filter_form(&form(0, "  "));
        assert_eq!(c.current_request().metric_type, None);
        assert_eq!(c.current_request().keyword, None);
    }

    #[test]
    fn applying_same_form_twice_fetches_once() {
        let (mut c, first) = with_datasource();
        c.complete(&first, Ok(rows(2)));

        let once = c.apply_filter_form(&form(1, "cpu"));
        let snapshot = c.current_request().clone();
        let twice = c.apply_filter_form(&form(1, "cpu"));
        assert!(once.is_some());
        assert!(twice.is_none());
        assert_eq!(c.current_request(), &snapshot);

        c.complete(&once.unwrap(), Ok(rows(1)));
        assert!(c.apply_filter_form(&form(1, "cpu")).is_none());
    }

    #[test]
    fn pagination_leaves_filters_alone() {
        let (mut c, _) = with_datasource();
        c.apply_filter_form(&form(4, "gc"));
        let ticket = c.set_pagination(3, 50).expect("page change fetches");
        let req = ticket.request();
        assert_eq!(req.metric_type.as_deref(), Some("summary"));
        assert_eq!(req.keyword.as_deref(), Some("%gc%"));
        assert_eq!(req.pagination, Pagination { page: 3, page_size: 50 });
    }

    #[test]
    fn search_only_touches_keyword() {
        let (mut c, _) = with_datasource();
        c.apply_filter_form(&form(2, "node"));
        c.search("disk");
        assert_eq!(c.current_request().metric_type.as_deref(), Some("gauge"));
        assert_eq!(c.current_request().keyword.as_deref(), Some("%disk%"));
        c.search("");
        assert_eq!(c.current_request().keyword, None);
    }

    #[test]
    fn datasource_change_keeps_page() {
        let (mut c, _) = with_datasource();
        c.set_pagination(4, 20);
        let ticket = c.set_datasource("ds2".into()).expect("new datasource fetches");
        assert_eq!(ticket.request().pagination.page, 4);
    }

    #[test]
    fn stale_completion_cannot_overwrite_newer_result() {
        let (mut c, _) = with_datasource();
        let a = c.set_pagination(2, 20).unwrap();
        let b = c.set_pagination(3, 20).unwrap();

        assert_eq!(c.complete(&b, Ok(rows(3))), Completion::Applied { rows: 3, total: 3 });
        assert_eq!(c.complete(&a, Ok(rows(9))), Completion::Superseded);
        assert_eq!(c.result(), &rows(3));
        assert!(!c.is_loading());
    }

    #[test]
    fn stale_completion_before_latest_keeps_loading() {
        let (mut c, first) = with_datasource();
        let latest = c.search("cpu").unwrap();

        assert_eq!(c.complete(&first, Ok(rows(7))), Completion::Superseded);
        assert!(c.is_loading());
        assert!(c.result().items.is_empty());

        c.complete(&latest, Ok(rows(1)));
        assert!(!c.is_loading());
    }

    #[test]
    fn returning_to_displayed_request_while_fetching_refetches() {
        let (mut c, first) = with_datasource();
        c.complete(&first, Ok(rows(5)));

        let away = c.search("cpu").unwrap();
        let back = c.search("").expect("in-flight fetch would replace the displayed rows");
        assert_eq!(c.complete(&away, Ok(rows(1))), Completion::Superseded);
        c.complete(&back, Ok(rows(5)));
        assert_eq!(c.result().items.len(), 5);
    }

    #[test]
    fn failure_keeps_previous_result() {
        let (mut c, first) = with_datasource();
        c.complete(&first, Ok(rows(5)));

        let ticket = c.refresh().unwrap();
        let completion = c.complete(&ticket, Err("HTTP 502".to_string()));
        assert_eq!(completion, Completion::Failed { message: "HTTP 502".to_string() });
        assert_eq!(c.result().items.len(), 5);
        assert!(!c.is_loading());
    }

    #[test]
    fn failed_request_is_not_retried_until_changed() {
        let (mut c, first) = with_datasource();
        c.complete(&first, Err("down".to_string()));
        assert!(c.set_datasource("ds1".into()).is_none());
        assert!(c.refresh().is_some());
    }

    #[test]
    fn refresh_fetches_unconditionally() {
        let (mut c, first) = with_datasource();
        c.complete(&first, Ok(rows(1)));
        let a = c.refresh().unwrap();
        let b = c.refresh().unwrap();
        assert!(b.generation() > a.generation());
        assert_eq!(a.request(), b.request());
    }

    #[test]
    fn duplicate_completion_is_ignored() {
        let (mut c, first) = with_datasource();
        c.complete(&first, Ok(rows(2)));
        assert_eq!(c.complete(&first, Ok(rows(8))), Completion::Superseded);
        assert_eq!(c.result().items.len(), 2);
    }

    #[test]
    fn detail_opens_displayed_rows_only() {
        let (mut c, first) = with_datasource();
        c.complete(&first, Ok(rows(3)));

        assert!(!c.open_detail_by_id(42));
        assert!(!c.detail().is_open());

        assert!(c.open_detail_by_id(2));
        assert_eq!(c.detail().selected().map(|r| r.name.as_str()), Some("m2"));

        c.close_detail();
        assert!(c.detail().selected().is_none());
    }

    #[test]
    fn detail_ignores_rows_without_id() {
        let (mut c, first) = with_datasource();
        let items = vec![row(0, "a"), row(0, "b")];
        c.complete(&first, Ok(ListResult { items, total: 2 }));

        assert!(!c.open_detail_by_id(0));
        assert!(!c.detail().is_open());
    }

    #[test]
    fn custom_page_size() {
        let c = QueryStateController::with_page_size(100);
        assert_eq!(c.current_request().pagination, Pagination { page: 1, page_size: 100 });
    }
}
