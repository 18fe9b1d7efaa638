use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Category – which source file a record came from
// ---------------------------------------------------------------------------

/// Dataset category (e.g. 内用薬). Assigned by the loader from the configured
/// file mapping, never read from the file itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Category(String);

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Category(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// OriginType – originator / generic classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OriginType {
    Originator,
    Generic,
    #[default]
    Unknown,
}

impl OriginType {
    /// Long label as used in the price list (先発品 / 後発品(GE)).
    pub fn label(self) -> &'static str {
        match self {
            OriginType::Originator => "先発品",
            OriginType::Generic => "後発品(GE)",
            OriginType::Unknown => "-",
        }
    }

    /// Short badge text.
    pub fn badge(self) -> &'static str {
        match self {
            OriginType::Originator => "先発",
            OriginType::Generic => "GE",
            OriginType::Unknown => "他",
        }
    }
}

impl fmt::Display for OriginType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// DrugRecord – one normalized row
// ---------------------------------------------------------------------------

/// A single product after normalization and field derivation.
#[derive(Debug, Clone, PartialEq)]
pub struct DrugRecord {
    pub name: String,
    pub ingredient: String,
    pub manufacturer: String,
    /// Raw price cell; parsed only when rendered.
    pub price: String,
    pub category: Category,
    pub specification: String,
    pub regulatory_class: String,
    pub origin_type: OriginType,
    /// Every raw cell of the source row: header → value.
    pub columns: BTreeMap<String, String>,
}

// ---------------------------------------------------------------------------
// SourceTable – one successfully loaded file
// ---------------------------------------------------------------------------

/// Records from one category file plus the header order they were read with.
#[derive(Debug, Clone)]
pub struct SourceTable {
    pub category: Category,
    pub headers: Vec<String>,
    pub records: Vec<DrugRecord>,
    /// Label of the encoding that decoded the file.
    pub encoding: &'static str,
}

// ---------------------------------------------------------------------------
// Catalog – the unified table
// ---------------------------------------------------------------------------

/// All records from every loaded source, concatenated in configuration order.
/// Immutable once built; reloads replace it wholesale.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub records: Vec<DrugRecord>,
    /// Union of source headers in first-seen order.
    pub column_names: Vec<String>,
    /// Categories that actually contributed a table, in load order.
    pub categories: Vec<Category>,
    placeholder: String,
}

impl Catalog {
    /// Concatenate source tables row-wise, unioning their schemas.
    pub fn from_sources(sources: Vec<SourceTable>, placeholder: &str) -> Self {
        let mut column_names: Vec<String> = Vec::new();
        let mut categories = Vec::with_capacity(sources.len());
        let mut records = Vec::new();

        for source in sources {
            for header in &source.headers {
                if !column_names.contains(header) {
                    column_names.push(header.clone());
                }
            }
            categories.push(source.category);
            records.extend(source.records);
        }

        Catalog {
            records,
            column_names,
            categories,
            placeholder: placeholder.to_string(),
        }
    }

    /// Raw cell of record `idx` under `column`, or the placeholder when that
    /// column does not exist in the record's source file.
    pub fn cell(&self, idx: usize, column: &str) -> &str {
        self.records
            .get(idx)
            .and_then(|r| r.columns.get(column))
            .map(String::as_str)
            .unwrap_or(&self.placeholder)
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Number of records per category, in load order.
    pub fn counts_by_category(&self) -> Vec<(Category, usize)> {
        self.categories
            .iter()
            .map(|c| {
                let n = self.records.iter().filter(|r| &r.category == c).count();
                (c.clone(), n)
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
