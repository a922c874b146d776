use std::path::PathBuf;
use std::sync::Arc;

use crate::config::StoryConfig;
use crate::data::filter::{filter_students, FilterCriteria, FilterError, FilterUpdate};
use crate::data::loader::{spawn_load, LoadError, LoadHandle};
use crate::data::model::{Dataset, StudentRecord};
use crate::stats::pca::{pca, PcaResult};

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// Where the one-time dataset load stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    /// Message suitable for showing next to a reload action.
    Failed(String),
}

/// The loaded dataset plus the current filter, passed explicitly to whatever
/// needs to read or update them.
#[derive(Debug)]
pub struct DataStore {
    /// All students; never modified after loading.
    records: Arc<[StudentRecord]>,

    filters: FilterCriteria,

    /// Students passing the current filters, recomputed on every change.
    visible: Vec<StudentRecord>,

    load: LoadState,

    pending: Option<LoadHandle>,
}

impl Default for DataStore {
    fn default() -> Self {
        Self {
            records: Arc::from(Vec::new()),
            filters: FilterCriteria::default(),
            visible: Vec::new(),
            load: LoadState::Idle,
            pending: None,
        }
    }
}

impl DataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start loading `path` in the background. A load already in flight is
    /// superseded.
    pub fn begin_load(&mut self, path: impl Into<PathBuf>) {
        let handle = spawn_load(path);
        log::info!("Loading student data from {}", handle.path().display());
        self.pending = Some(handle);
        self.load = LoadState::Loading;
    }

    /// Ingest the background load if it has finished. Returns whether the
    /// load state changed.
    pub fn poll_load(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if handle.is_finished() => {
                self.finish_load(handle.wait());
                true
            }
            other => {
                self.pending = other;
                false
            }
        }
    }

    /// Block until the background load finishes and ingest it.
    pub fn wait_for_load(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.finish_load(handle.wait());
        }
    }

    fn finish_load(&mut self, result: Result<Dataset, LoadError>) {
        match result {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => self.fail_load(&e),
        }
    }

    /// Ingest a loaded dataset; the current filters are kept and reapplied.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.records = Arc::from(dataset.records);
        self.load = LoadState::Ready;
        self.refilter();
    }

    /// Record a failed load. Previously loaded records stay untouched.
    pub fn fail_load(&mut self, error: &LoadError) {
        log::error!("Failed to load student data: {error:#}");
        self.load = LoadState::Failed(format!(
            "Failed to load student data ({error}). Please reload."
        ));
    }

    /// Recompute `visible` after a filter or dataset change.
    fn refilter(&mut self) {
        self.visible = filter_students(&self.records, &self.filters);
        log::debug!(
            "{} of {} students match {:?}",
            self.visible.len(),
            self.records.len(),
            self.filters
        );
    }

    /// Replace a single filter criterion.
    pub fn update_filter(&mut self, update: FilterUpdate) {
        self.filters.apply(update);
        self.refilter();
    }

    /// Replace a single filter criterion from filter-bar tokens.
    pub fn set_filter(&mut self, field: &str, token: &str) -> Result<(), FilterError> {
        self.update_filter(FilterUpdate::parse(field, token)?);
        Ok(())
    }

    pub fn reset_filters(&mut self) {
        self.filters.reset();
        self.refilter();
    }

    pub fn state(&self) -> &LoadState {
        &self.load
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.filters
    }

    /// Every loaded student, regardless of filters.
    pub fn records(&self) -> &[StudentRecord] {
        &self.records
    }

    /// A shared handle to the full record set.
    pub fn shared_records(&self) -> Arc<[StudentRecord]> {
        Arc::clone(&self.records)
    }

    /// Students passing the current filters.
    pub fn filtered(&self) -> &[StudentRecord] {
        &self.visible
    }

    /// Data loaded fine but the filters match nobody.
    pub fn is_empty_result(&self) -> bool {
        self.load == LoadState::Ready && self.visible.is_empty()
    }

    /// PCA of the filtered students, or `None` when fewer than
    /// `config.min_pca_records` pass the filters.
    pub fn pca(&self, config: &StoryConfig) -> Option<PcaResult> {
        if self.visible.len() < config.min_pca_records.max(2) {
            return None;
        }
        Some(pca(&self.visible, &config.pca_variables))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{record, Address, Sex};

    fn dataset() -> Dataset {
        let records = (1..=12)
            .map(|id| StudentRecord {
                sex: if id % 2 == 0 { Sex::Male } else { Sex::Female },
                address: if id <= 3 { Address::Rural } else { Address::Urban },
                going_out: 1 + (id % 5) as u8,
                g3: id as u8,
                ..record(id)
            })
            .collect();
        Dataset::new(records, 0)
    }

    #[test]
    fn starts_idle_and_empty() {
        let store = DataStore::new();
        assert_eq!(store.state(), &LoadState::Idle);
        assert!(store.records().is_empty());
        assert!(!store.is_empty_result());
    }

    #[test]
    fn filters_recompute_eagerly() {
        let mut store = DataStore::new();
        store.set_dataset(dataset());
        assert_eq!(store.filtered().len(), 12);

        store.update_filter(FilterUpdate::Sex(Some(Sex::Male)));
        assert_eq!(store.filtered().len(), 6);
        store.set_filter("address", "R").unwrap();
        let ids: Vec<u32> = store.filtered().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2]);

        store.reset_filters();
        assert!(store.criteria().is_unconstrained());
        assert_eq!(store.filtered(), store.records());
    }

    #[test]
    fn empty_result_differs_from_failure() {
        let mut store = DataStore::new();
        store.set_dataset(Dataset::new(vec![record(1)], 0));
        store.set_filter("higher", "no").unwrap();
        assert!(store.is_empty_result());
        assert_eq!(store.state(), &LoadState::Ready);

        store.fail_load(&LoadError::WorkerPanicked);
        assert!(matches!(store.state(), LoadState::Failed(_)));
        assert!(!store.is_empty_result());
        assert_eq!(store.records().len(), 1);
    }

    #[test]
    fn pca_needs_enough_filtered_records() {
        let config = StoryConfig::default();
        let mut store = DataStore::new();
        store.set_dataset(dataset());
        let result = store.pca(&config).unwrap();
        assert_eq!(result.points.len(), 12);

        store.update_filter(FilterUpdate::Sex(Some(Sex::Female)));
        assert!(store.pca(&config).is_none());
    }

    #[test]
    fn polling_ingests_a_finished_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("student-mat.csv");
        let header = crate::data::loader::COLUMNS.join(";");
        let row = "GP;M;17;R;LE3;T;3;2;other;other;home;father;1;2;0;no;no;no;no;no;yes;no;no;4;3;3;1;1;3;2;11;12;13";
        std::fs::write(&path, format!("{header}\n{row}\n{row}\n")).unwrap();

        let mut store = DataStore::new();
        store.set_filter("sex", "F").unwrap();
        store.begin_load(path);

        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(10);
        while !store.poll_load() {
            assert_eq!(store.state(), &LoadState::Loading);
            assert!(std::time::Instant::now() < deadline, "load never finished");
            std::thread::sleep(std::time::Duration::from_millis(5));
        }

        assert_eq!(store.state(), &LoadState::Ready);
        assert_eq!(store.records().len(), 2);
        assert!(store.is_empty_result());
        store.reset_filters();
        assert_eq!(store.filtered().len(), 2);
        assert!(!store.poll_load());
    }

    #[test]
    fn background_load_failure_is_reported() {
        let mut store = DataStore::new();
        store.begin_load("/no/such/dir/student-mat.csv");
        assert_eq!(store.state(), &LoadState::Loading);
        store.wait_for_load();
        assert!(matches!(store.state(), LoadState::Failed(msg) if msg.contains("Please reload")));
        assert!(!store.poll_load());
    }
}
