use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

use crate::config::CatalogConfig;
use super::loader::load_catalog;
use super::model::Catalog;

/// Modification time of every configured file (`None` when absent).
type Stamps = Vec<(PathBuf, Option<SystemTime>)>;

fn file_stamps(config: &CatalogConfig) -> Stamps {
    config
        .datasets
        .iter()
        .map(|ds| {
            let path = config.resolve(ds);
            let modified = std::fs::metadata(&path).and_then(|m| m.modified()).ok();
            (path, modified)
        })
        .collect()
}

/// Owns the loaded catalog and rebuilds it when a source file changes
/// (appears, disappears, or gets a new mtime) or on [`invalidate`].
///
/// [`invalidate`]: CatalogCache::invalidate
pub struct CatalogCache {
    config: CatalogConfig,
    catalog: Option<Arc<Catalog>>,
    stamps: Stamps,
    loads: usize,
}

impl CatalogCache {
    pub fn new(config: CatalogConfig) -> Self {
        Self {
            config,
            catalog: None,
            stamps: Vec::new(),
            loads: 0,
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Swap configuration (e.g. a new data directory) and drop the catalog.
    pub fn set_config(&mut self, config: CatalogConfig) {
        self.config = config;
        self.invalidate();
    }

    /// Force the next [`get`](Self::get) to reparse every file.
    pub fn invalidate(&mut self) {
        self.catalog = None;
    }

    /// Whether the cached catalog no longer reflects the files on disk.
    pub fn is_stale(&self) -> bool {
        self.catalog.is_none() || file_stamps(&self.config) != self.stamps
    }

    /// The current catalog, reloading first if stale.
    pub fn get(&mut self) -> Arc<Catalog> {
        if let (false, Some(catalog)) = (self.is_stale(), &self.catalog) {
            return Arc::clone(catalog);
        }

        self.stamps = file_stamps(&self.config);
        let catalog = Arc::new(load_catalog(&self.config));
        self.loads += 1;
        log::debug!("catalog load #{}: {} records", self.loads, catalog.len());
        self.catalog = Some(Arc::clone(&catalog));
        catalog
    }

    /// How many times the files have been parsed.
    pub fn load_count(&self) -> usize {
        self.loads
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatasetSpec;

    fn config_in(dir: &std::path::Path) -> CatalogConfig {
        CatalogConfig {
            data_dir: dir.to_path_buf(),
            datasets: vec![DatasetSpec {
                category: "内用薬".into(),
                file: "内用薬.csv".into(),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn reuses_until_invalidated() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("内用薬.csv"), "品名\nA錠\n").unwrap();
        let mut cache = CatalogCache::new(config_in(dir.path()));

        let first = cache.get();
        let second = cache.get();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.load_count(), 1);

        cache.invalidate();
        let third = cache.get();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(cache.load_count(), 2);
    }

    #[test]
    fn reloads_when_a_file_appears() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = CatalogCache::new(config_in(dir.path()));
        assert!(cache.get().is_empty());

        std::fs::write(dir.path().join("内用薬.csv"), "品名\nA錠\n").unwrap();
        assert!(cache.is_stale());
        assert_eq!(cache.get().len(), 1);
        assert_eq!(cache.load_count(), 2);
    }
}
