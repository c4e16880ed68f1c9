use std::ops::Range;
use std::path::PathBuf;
use std::time::Instant;

use crate::config::{AppConfig, ColumnDef};
use crate::data::filter::{
    apply_filter, clear_filter, compute_filter_options, ActiveFilter, FilterOptions,
};
use crate::data::loader::{spawn_load, LoadError, PendingLoad};
use crate::data::model::{Dataset, Row};
use crate::debounce::Debouncer;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until the first load completes).
    pub dataset: Option<Dataset>,

    /// Configured table columns, in display order.
    pub columns: Vec<ColumnDef>,

    /// Distinct values per column for the dropdowns.
    pub filter_options: FilterOptions,

    /// The one criterion currently applied, if any.
    pub active_filter: Option<ActiveFilter>,

    /// Indices of rows passing the active filter (cached).
    pub visible_indices: Vec<usize>,

    /// Zero-based page into `visible_indices`.
    pub page: usize,

    /// Rows per page.
    pub page_size: usize,

    /// Filter request waiting for the quiescence window to pass.
    pending_filter: Debouncer<ActiveFilter>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,

    /// Background load whose outcome has not been collected yet.
    pending_load: Option<PendingLoad>,
}

impl Default for AppState {
    fn default() -> Self {
        AppState::new(&AppConfig::default())
    }
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            dataset: None,
            columns: config.columns.clone(),
            filter_options: FilterOptions::new(),
            active_filter: None,
            visible_indices: Vec::new(),
            page: 0,
            page_size: config.page_size.max(1),
            pending_filter: Debouncer::new(config.debounce),
            status_message: None,
            loading: false,
            pending_load: None,
        }
    }

    // -- loading -----------------------------------------------------------

    /// Start loading `path` in the background. A load already in flight is
    /// abandoned; its outcome is never applied.
    pub fn begin_load<F>(&mut self, path: PathBuf, notify: F)
    where
        F: FnOnce() + Send + 'static,
    {
        log::info!("Loading {}", path.display());
        self.loading = true;
        self.pending_load = Some(spawn_load(path, notify));
    }

    /// Collect a finished background load. Returns whether the state changed.
    pub fn poll_load(&mut self) -> bool {
        let Some(pending) = self.pending_load.as_mut() else {
            return false;
        };
        let Some(outcome) = pending.poll() else {
            return false;
        };
        let path = pending.path().display().to_string();
        self.pending_load = None;

        match outcome {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} rows with columns {:?} from {path}",
                    dataset.len(),
                    dataset.columns
                );
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load {path}: {e}");
                self.set_load_error(&e);
            }
        }
        true
    }

    /// Ingest a newly loaded dataset: rebuild options, drop any filter.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.filter_options = compute_filter_options(&dataset, &self.columns);
        self.active_filter = None;
        self.pending_filter.cancel();
        self.visible_indices = clear_filter(&dataset);
        self.page = 0;

        self.status_message = (dataset.skipped_rows > 0)
            .then(|| format!("{} malformed rows skipped", dataset.skipped_rows));
        self.dataset = Some(dataset);
        self.loading = false;
    }

    /// Record a failed load. A previously loaded dataset stays visible.
    pub fn set_load_error(&mut self, err: &LoadError) {
        self.status_message = Some(format!("Error: {err}"));
        self.loading = false;
    }

    // -- filtering ---------------------------------------------------------

    /// Queue a filter change; bursts collapse into the last request.
    pub fn request_filter(&mut self, field: &str, value: &str, now: Instant) {
        log::debug!("Filter requested: {field} = {value:?}");
        self.pending_filter.request(ActiveFilter::new(field, value), now);
    }

    /// Apply the queued filter if its window has passed. Returns whether
    /// the visible rows were recomputed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.pending_filter.poll(now) {
            Some(filter) => {
                self.apply_filter_now(&filter.field, &filter.value);
                true
            }
            None => false,
        }
    }

    /// When [`AppState::tick`] next has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending_filter.deadline()
    }

    /// Replace the active filter and recompute visible rows immediately.
    pub fn apply_filter_now(&mut self, field: &str, value: &str) {
        let Some(ds) = &self.dataset else {
            return;
        };
        self.visible_indices = apply_filter(ds, field, value);
        self.active_filter =
            (!value.is_empty() && ds.has_column(field)).then(|| ActiveFilter::new(field, value));
        self.page = 0;
        log::info!(
            "Filter {field} = {value:?}: {} of {} rows visible",
            self.visible_indices.len(),
            ds.len()
        );
    }

    /// Drop the active filter and any queued request.
    pub fn clear_filters(&mut self) {
        self.pending_filter.cancel();
        self.active_filter = None;
        self.page = 0;
        if let Some(ds) = &self.dataset {
            self.visible_indices = clear_filter(ds);
        }
    }

    /// Value a column's dropdown should display: a queued request wins
    /// over the applied filter. Empty means the placeholder.
    pub fn selected_value(&self, field: &str) -> &str {
        self.pending_filter
            .pending()
            .or(self.active_filter.as_ref())
            .filter(|f| f.field == field)
            .map(|f| f.value.as_str())
            .unwrap_or("")
    }

    // -- pagination --------------------------------------------------------

    /// Number of pages; an empty result still has one (empty) page.
    pub fn page_count(&self) -> usize {
        self.visible_indices.len().div_ceil(self.page_size).max(1)
    }

    /// Range into `visible_indices` covered by the current page.
    pub fn page_range(&self) -> Range<usize> {
        let start = (self.page * self.page_size).min(self.visible_indices.len());
        let end = (start + self.page_size).min(self.visible_indices.len());
        start..end
    }

    /// Rows on the current page, in display order.
    pub fn page_rows(&self) -> Vec<&Row> {
        match &self.dataset {
            Some(ds) => ds.select(&self.visible_indices[self.page_range()]).collect(),
            None => Vec::new(),
        }
    }

    pub fn next_page(&mut self) {
        self.page = (self.page + 1).min(self.page_count() - 1);
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    pub fn first_page(&mut self) {
        self.page = 0;
    }

    pub fn last_page(&mut self) {
        self.page = self.page_count() - 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn modulo_dataset(n: u64) -> Dataset {
        let rows = (1..=n)
            .map(|i| {
                [
                    ("number", i.to_string()),
                    ("mod350", (i % 350).to_string()),
                    ("mod8000", (i % 8000).to_string()),
                    ("mod20002", (i % 20002).to_string()),
                ]
                .into_iter()
                .collect::<Row>()
            })
            .collect();
        Dataset::new(
            vec![
                "number".into(),
                "mod350".into(),
                "mod8000".into(),
                "mod20002".into(),
            ],
            rows,
        )
    }

    fn numbers(state: &AppState) -> Vec<String> {
        let ds = state.dataset.as_ref().unwrap();
        ds.select(&state.visible_indices)
            .filter_map(|r| r.get("number"))
            .map(str::to_string)
            .collect()
    }

    fn loaded(n: u64) -> AppState {
        let mut state = AppState::default();
        state.set_dataset(modulo_dataset(n));
        state
    }

    #[test]
    fn set_dataset_shows_everything_and_builds_options() {
        let state = loaded(400);
        assert_eq!(state.visible_indices.len(), 400);
        assert_eq!(state.filter_options["mod350"].len(), 350);
        assert_eq!(state.filter_options["number"].len(), 400);
        assert!(state.active_filter.is_none());
        assert!(!state.loading);
    }

    #[test]
    fn end_to_end_filter_then_clear() {
        let mut state = AppState::default();
        let rows = vec![
            [("number", "1"), ("mod350", "1"), ("mod8000", "1"), ("mod20002", "1")],
            [("number", "2"), ("mod350", "2"), ("mod8000", "2"), ("mod20002", "2")],
            [("number", "351"), ("mod350", "1"), ("mod8000", "351"), ("mod20002", "351")],
        ]
        .into_iter()
        .map(|r| r.into_iter().collect::<Row>())
        .collect();
        state.set_dataset(Dataset::new(
            vec![
                "number".into(),
                "mod350".into(),
                "mod8000".into(),
                "mod20002".into(),
            ],
            rows,
        ));

        state.apply_filter_now("mod350", "1");
        assert_eq!(numbers(&state), vec!["1", "351"]);
        assert_eq!(state.active_filter, Some(ActiveFilter::new("mod350", "1")));

        state.clear_filters();
        assert_eq!(numbers(&state), vec!["1", "2", "351"]);
        assert!(state.active_filter.is_none());
    }

    #[test]
    fn new_filter_replaces_previous_one() {
        let mut state = loaded(400);
        state.apply_filter_now("mod350", "1");
        assert_eq!(numbers(&state), vec!["1", "351"]);

        state.apply_filter_now("number", "2");
        assert_eq!(numbers(&state), vec!["2"]);
        assert_eq!(state.active_filter, Some(ActiveFilter::new("number", "2")));
    }

    #[test]
    fn debounced_requests_apply_only_the_last() {
        let mut state = loaded(400);
        let t0 = Instant::now();

        state.request_filter("mod350", "1", t0);
        state.request_filter("mod350", "2", t0 + Duration::from_millis(20));
        state.request_filter("mod350", "3", t0 + Duration::from_millis(40));
        assert_eq!(state.selected_value("mod350"), "3");

        assert!(!state.tick(t0 + Duration::from_millis(200)));
        assert_eq!(state.visible_indices.len(), 400);

        assert!(state.tick(t0 + Duration::from_millis(340)));
        assert_eq!(numbers(&state), vec!["3", "353"]);
        assert!(!state.tick(t0 + Duration::from_secs(5)));
        assert_eq!(state.selected_value("mod350"), "3");
        assert_eq!(state.selected_value("number"), "");
    }

    #[test]
    fn queued_request_exposes_wake_up_deadline() {
        let mut state = loaded(10);
        assert!(state.next_deadline().is_none());

        let t0 = Instant::now();
        state.request_filter("number", "4", t0);
        assert_eq!(state.next_deadline(), Some(t0 + Duration::from_millis(300)));

        assert!(state.tick(t0 + Duration::from_millis(300)));
        assert!(state.next_deadline().is_none());
    }

    #[test]
    fn clear_cancels_pending_request() {
        let mut state = loaded(10);
        let t0 = Instant::now();
        state.request_filter("number", "5", t0);
        state.clear_filters();
        assert!(state.next_deadline().is_none());
        assert!(!state.tick(t0 + Duration::from_secs(1)));
        assert_eq!(state.visible_indices.len(), 10);
    }

    #[test]
    fn invalid_field_or_placeholder_leaves_no_active_filter() {
        let mut state = loaded(10);
        state.apply_filter_now("bogus", "1");
        assert_eq!(state.visible_indices.len(), 10);
        assert!(state.active_filter.is_none());

        state.apply_filter_now("number", "3");
        state.apply_filter_now("number", "");
        assert_eq!(state.visible_indices.len(), 10);
        assert!(state.active_filter.is_none());
    }

    #[test]
    fn filter_before_load_is_ignored() {
        let mut state = AppState::default();
        state.apply_filter_now("number", "1");
        assert!(state.visible_indices.is_empty());
        assert!(state.page_rows().is_empty());
        assert_eq!(state.page_count(), 1);
    }

    #[test]
    fn pagination_bounds() {
        let mut state = loaded(250);
        assert_eq!(state.page_count(), 3);
        assert_eq!(state.page_range(), 0..100);

        state.last_page();
        assert_eq!(state.page_range(), 200..250);
        assert_eq!(state.page_rows().len(), 50);
        assert_eq!(state.page_rows()[0].get("number"), Some("201"));

        state.next_page();
        assert_eq!(state.page, 2);

        state.first_page();
        state.prev_page();
        assert_eq!(state.page, 0);

        state.next_page();
        state.apply_filter_now("mod350", "7");
        assert_eq!(state.page, 0);
        assert_eq!(state.page_count(), 1);
    }

    #[test]
    fn failed_load_keeps_previous_dataset() {
        let mut state = loaded(5);
        state.loading = true;
        state.set_load_error(&LoadError::MissingHeader);
        assert!(!state.loading);
        assert_eq!(state.dataset.as_ref().map(Dataset::len), Some(5));
        assert!(state.status_message.as_deref().unwrap().contains("header"));
    }

    fn wait_for_load(state: &mut AppState) {
        let start = Instant::now();
        while !state.poll_load() {
            assert!(start.elapsed() < Duration::from_secs(10), "load timed out");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn background_load_publishes_dataset() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "number,mod350\n1,1\n351,1\n2,2\n").unwrap();

        let mut state = AppState::default();
        state.begin_load(file.path().to_path_buf(), || {});
        assert!(state.loading);

        wait_for_load(&mut state);
        assert!(!state.loading);
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
        assert_eq!(state.filter_options["mod350"], vec!["1", "2"]);
        assert!(state.filter_options["mod8000"].is_empty());
        assert!(!state.poll_load());
    }

    #[test]
    fn background_load_failure_is_surfaced() {
        let mut state = AppState::default();
        state.begin_load(PathBuf::from("/definitely/not/here.csv"), || {});
        wait_for_load(&mut state);
        assert!(state.dataset.is_none());
        assert!(state.status_message.as_deref().unwrap().starts_with("Error:"));
    }

    #[test]
    fn skipped_rows_are_reported() {
        let mut state = AppState::default();
        let mut ds = modulo_dataset(3);
        ds.skipped_rows = 2;
        state.set_dataset(ds);
        assert_eq!(
            state.status_message.as_deref(),
            Some("2 malformed rows skipped")
        );
    }
}
