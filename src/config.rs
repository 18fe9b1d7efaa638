//! Catalog configuration.
//!
//! Everything is optional: an absent file (or absent section) falls back to
//! defaults that describe the three MHLW price-list exports (内用薬 / 外用薬 /
//! 注射薬). CLI flags override file values, which override defaults.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::loader::TextEncoding;
use crate::error::{CatalogError, Result};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "rusty-pill.toml";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Directory that relative dataset paths are resolved against.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Encodings tried in order for every file; the first that decodes wins.
    #[serde(default = "default_encodings")]
    pub encodings: Vec<TextEncoding>,

    /// Category → file mapping. Order here is table order in the catalog.
    #[serde(default = "default_datasets")]
    pub datasets: Vec<DatasetSpec>,

    #[serde(default)]
    pub layout: LayoutConfig,

    #[serde(default)]
    pub columns: ColumnNames,

    #[serde(default)]
    pub labels: Labels,

    /// Column-name patterns feeding the originator / generic flags.
    #[serde(default = "default_origin_rules")]
    pub origin_rules: Vec<OriginRule>,

    #[serde(default)]
    pub markers: OriginMarkers,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            encodings: default_encodings(),
            datasets: default_datasets(),
            layout: LayoutConfig::default(),
            columns: ColumnNames::default(),
            labels: Labels::default(),
            origin_rules: default_origin_rules(),
            markers: OriginMarkers::default(),
            search: SearchConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_encodings() -> Vec<TextEncoding> {
    vec![
        TextEncoding::Utf8Sig,
        TextEncoding::Utf8,
        TextEncoding::ShiftJis,
        TextEncoding::Cp932,
        TextEncoding::EucJp,
    ]
}

fn default_datasets() -> Vec<DatasetSpec> {
    ["内用薬", "外用薬", "注射薬"]
        .into_iter()
        .map(|category| DatasetSpec {
            category: category.to_string(),
            file: PathBuf::from(format!("{category}.csv")),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// `[[datasets]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSpec {
    pub category: String,
    pub file: PathBuf,
}

/// `[layout]`: positional anchors for the derived fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Header of the product-name column everything is positioned against.
    #[serde(default = "default_anchor_column")]
    pub anchor_column: String,

    /// How many columns immediately before the anchor carry regulatory markers.
    #[serde(default = "default_flag_columns")]
    pub flag_columns: usize,

    /// Distance (in columns) from the anchor back to the specification column.
    #[serde(default = "default_spec_offset")]
    pub spec_offset: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            anchor_column: default_anchor_column(),
            flag_columns: default_flag_columns(),
            spec_offset: default_spec_offset(),
        }
    }
}

fn default_anchor_column() -> String {
    "品名".into()
}
fn default_flag_columns() -> usize {
    3
}
fn default_spec_offset() -> usize {
    4
}

/// `[columns]`: named columns copied straight into each record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnNames {
    #[serde(default = "default_ingredient")]
    pub ingredient: String,
    #[serde(default = "default_manufacturer")]
    pub manufacturer: String,
    #[serde(default = "default_price")]
    pub price: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            ingredient: default_ingredient(),
            manufacturer: default_manufacturer(),
            price: default_price(),
        }
    }
}

fn default_ingredient() -> String {
    "成分名".into()
}
fn default_manufacturer() -> String {
    "メーカー名".into()
}
fn default_price() -> String {
    "薬価".into()
}

/// `[labels]`: fallback values written when a source lacks the data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Labels {
    /// Regulatory class when every marker column is empty.
    #[serde(default = "default_normal_class")]
    pub normal_class: String,
    /// Regulatory class when the anchor column is missing entirely.
    #[serde(default = "default_unknown_class")]
    pub unknown_class: String,
    /// Stand-in for wholly absent columns.
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            normal_class: default_normal_class(),
            unknown_class: default_unknown_class(),
            placeholder: default_placeholder(),
        }
    }
}

fn default_normal_class() -> String {
    "普通薬".into()
}
fn default_unknown_class() -> String {
    "不明".into()
}
fn default_placeholder() -> String {
    "-".into()
}

/// Which flag a matching column feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OriginFlag {
    Original,
    Generic,
}

/// `[[origin_rules]]` entry: a column feeds `flag` when its header contains
/// every string in `all_of` and none in `none_of`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginRule {
    pub all_of: Vec<String>,
    #[serde(default)]
    pub none_of: Vec<String>,
    pub flag: OriginFlag,
}

impl OriginRule {
    pub fn matches(&self, header: &str) -> bool {
        self.all_of.iter().all(|p| header.contains(p.as_str()))
            && !self.none_of.iter().any(|p| header.contains(p.as_str()))
    }
}

fn default_origin_rules() -> Vec<OriginRule> {
    vec![
        OriginRule {
            all_of: vec!["先発医薬品".into()],
            none_of: vec!["後発医薬品".into()],
            flag: OriginFlag::Original,
        },
        OriginRule {
            all_of: vec!["診療報酬".into(), "後発医薬品".into()],
            none_of: Vec::new(),
            flag: OriginFlag::Generic,
        },
    ]
}

/// `[markers]`: tokens looked for inside the flag values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OriginMarkers {
    #[serde(default = "default_originator_marker")]
    pub originator: String,
    #[serde(default = "default_generic_marker")]
    pub generic: String,
    #[serde(default = "default_generic_star")]
    pub generic_star: String,
}

impl Default for OriginMarkers {
    fn default() -> Self {
        Self {
            originator: default_originator_marker(),
            generic: default_generic_marker(),
            generic_star: default_generic_star(),
        }
    }
}

fn default_originator_marker() -> String {
    "先発品".into()
}
fn default_generic_marker() -> String {
    "後発品".into()
}
fn default_generic_star() -> String {
    "★".into()
}

/// `[search]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Name fragment identifying combination products (配合剤).
    #[serde(default = "default_combination_marker")]
    pub combination_marker: String,
    /// Separator between active ingredients in multi-ingredient products.
    #[serde(default = "default_ingredient_separator")]
    pub ingredient_separator: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            combination_marker: default_combination_marker(),
            ingredient_separator: default_ingredient_separator(),
        }
    }
}

fn default_max_results() -> usize {
    50
}
fn default_combination_marker() -> String {
    "配合".into()
}
fn default_ingredient_separator() -> String {
    "・".into()
}

/// `[ui]`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    /// TTF/OTF file with CJK coverage. When unset, common system fonts are probed.
    #[serde(default)]
    pub font_path: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Loading & validation
// ---------------------------------------------------------------------------

impl CatalogConfig {
    /// Parse and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
        let config: Self =
            toml::from_str(&text).map_err(|e| CatalogError::config(path, e.to_string()))?;
        config.validate(path)?;
        Ok(config)
    }

    /// Load `path` if given, else `rusty-pill.toml` in the working directory
    /// if it exists, else the built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => {
                let local = Path::new(CONFIG_FILE_NAME);
                if local.exists() {
                    Self::load(local)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Absolute-or-data-dir-relative path of a dataset file.
    pub fn resolve(&self, dataset: &DatasetSpec) -> PathBuf {
        if dataset.file.is_absolute() {
            dataset.file.clone()
        } else {
            self.data_dir.join(&dataset.file)
        }
    }

    /// Names of all configured categories, in table order.
    pub fn categories(&self) -> Vec<String> {
        self.datasets.iter().map(|d| d.category.clone()).collect()
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if self.encodings.is_empty() {
            return Err(CatalogError::config(path, "`encodings` must not be empty"));
        }
        if self.search.max_results == 0 {
            return Err(CatalogError::config(path, "`search.max_results` must be > 0"));
        }
        if self.layout.anchor_column.trim().is_empty() {
            return Err(CatalogError::config(path, "`layout.anchor_column` must not be empty"));
        }
        let mut seen = BTreeSet::new();
        for ds in &self.datasets {
            if ds.category.trim().is_empty() {
                return Err(CatalogError::config(path, "dataset category must not be empty"));
            }
            if !seen.insert(ds.category.as_str()) {
                return Err(CatalogError::config(
                    path,
                    format!("duplicate dataset category '{}'", ds.category),
                ));
            }
        }
        for rule in &self.origin_rules {
            if rule.all_of.is_empty() {
                return Err(CatalogError::config(path, "origin rule needs at least one `all_of` pattern"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_price_list_layout() {
        let cfg = CatalogConfig::default();
        assert_eq!(cfg.categories(), vec!["内用薬", "外用薬", "注射薬"]);
        assert_eq!(cfg.layout.anchor_column, "品名");
        assert_eq!(cfg.layout.flag_columns, 3);
        assert_eq!(cfg.layout.spec_offset, 4);
        assert_eq!(cfg.search.max_results, 50);
        assert_eq!(cfg.encodings.first(), Some(&TextEncoding::Utf8Sig));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg: CatalogConfig = toml::from_str(
            r#"
            data_dir = "/srv/drugs"
            encodings = ["cp932", "utf-8"]

            [search]
            max_results = 10
            "#,
        )
        .unwrap();
        assert_eq!(cfg.data_dir, PathBuf::from("/srv/drugs"));
        assert_eq!(cfg.encodings, vec![TextEncoding::Cp932, TextEncoding::Utf8]);
        assert_eq!(cfg.search.max_results, 10);
        assert_eq!(cfg.search.combination_marker, "配合");
        assert_eq!(cfg.datasets.len(), 3);
        assert_eq!(cfg.origin_rules.len(), 2);
    }

    #[test]
    fn rejects_duplicate_categories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            r#"
            [[datasets]]
            category = "内用薬"
            file = "a.csv"

            [[datasets]]
            category = "内用薬"
            file = "b.csv"
            "#,
        )
        .unwrap();
        let err = CatalogConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("duplicate"), "{err}");
    }

    #[test]
    fn rejects_unknown_encoding() {
        let parsed: std::result::Result<CatalogConfig, _> =
            toml::from_str(r#"encodings = ["latin-9000"]"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn resolves_relative_paths_against_data_dir() {
        let cfg = CatalogConfig {
            data_dir: PathBuf::from("/data"),
            ..Default::default()
        };
        let ds = &cfg.datasets[0];
        assert_eq!(cfg.resolve(ds), PathBuf::from("/data/内用薬.csv"));
    }

    #[test]
    fn origin_rule_respects_exclusions() {
        let rules = default_origin_rules();
        assert!(rules[0].matches("先発医薬品"));
        assert!(!rules[0].matches("先発医薬品・後発医薬品区分"));
        assert!(rules[1].matches("診療報酬において加算等の算定対象となる後発医薬品"));
        assert!(!rules[1].matches("後発医薬品"));
    }
}
