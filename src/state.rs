use std::path::PathBuf;
use std::sync::Arc;

use rusty_pill::data::model::Catalog;
use rusty_pill::data::search::{search, SearchOutcome};
use rusty_pill::{CatalogCache, CatalogConfig};

use crate::color::CategoryColors;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Owner of the loaded catalog; reloads on file change or request.
    pub cache: CatalogCache,

    /// Snapshot of the catalog the current results refer to.
    pub catalog: Arc<Catalog>,

    /// Search box contents.
    pub query: String,

    /// "配合剤を除外" toggle.
    pub exclude_combinations: bool,

    /// Result of the last search (cached until query/toggle/catalog change).
    pub outcome: SearchOutcome,

    /// Badge colour per category.
    pub category_colors: CategoryColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    last_search: Option<(String, bool)>,
}

impl AppState {
    pub fn new(config: CatalogConfig) -> Self {
        let mut cache = CatalogCache::new(config);
        let catalog = cache.get();
        let mut state = Self {
            cache,
            category_colors: CategoryColors::new(&catalog.categories),
            catalog,
            query: String::new(),
            exclude_combinations: true,
            outcome: SearchOutcome::NoQuery,
            status_message: None,
            last_search: None,
        };
        state.update_status();
        state
    }

    /// Re-run the search if the query, the toggle, or the files changed.
    pub fn refresh(&mut self) {
        let key = (self.query.clone(), self.exclude_combinations);
        if self.last_search.as_ref() == Some(&key) {
            return;
        }

        // Cheap mtime check; only reparses when something on disk moved.
        let catalog = self.cache.get();
        if !Arc::ptr_eq(&catalog, &self.catalog) {
            self.set_catalog(catalog);
        }

        self.outcome = search(
            &self.catalog,
            &self.query,
            self.exclude_combinations,
            &self.cache.config().search,
        );
        self.last_search = Some(key);
    }

    /// Drop the cached catalog and parse every file again.
    pub fn reload(&mut self) {
        self.cache.invalidate();
        let catalog = self.cache.get();
        self.set_catalog(catalog);
    }

    /// Point the catalog at a different directory and reload.
    pub fn set_data_dir(&mut self, dir: PathBuf) {
        let mut config = self.cache.config().clone();
        log::info!("Switching data directory to {}", dir.display());
        config.data_dir = dir;
        self.cache.set_config(config);
        let catalog = self.cache.get();
        self.set_catalog(catalog);
    }

    fn set_catalog(&mut self, catalog: Arc<Catalog>) {
        self.category_colors = CategoryColors::new(&catalog.categories);
        self.catalog = catalog;
        self.last_search = None;
        self.update_status();
    }

    fn update_status(&mut self) {
        self.status_message = if self.catalog.is_empty() {
            Some(format!(
                "データ読み込みエラー: no dataset found in {}",
                self.cache.config().data_dir.display()
            ))
        } else {
            None
        };
    }
}
