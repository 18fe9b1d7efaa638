use std::borrow::Cow;
use std::path::Path;
use std::str::FromStr;

use csv::{ReaderBuilder, Trim};
use serde::{Serialize, Serializer};

use crate::config::CatalogConfig;
use crate::error::{CatalogError, Result};
use super::derive::{derive_records, RawTable};
use super::model::{Catalog, Category, SourceTable};

// ---------------------------------------------------------------------------
// TextEncoding – candidates tried when decoding a file
// ---------------------------------------------------------------------------

/// Encodings the price-list exports are known to ship in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(try_from = "String")]
pub enum TextEncoding {
    /// UTF-8 with an optional byte-order mark.
    Utf8Sig,
    Utf8,
    ShiftJis,
    /// Windows-31J; decoded by the same table as `ShiftJis` in `encoding_rs`.
    Cp932,
    EucJp,
}

impl TextEncoding {
    pub fn label(self) -> &'static str {
        match self {
            TextEncoding::Utf8Sig => "utf-8-sig",
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::ShiftJis => "shift_jis",
            TextEncoding::Cp932 => "cp932",
            TextEncoding::EucJp => "euc-jp",
        }
    }

    /// Strict decode: `None` on any malformed sequence.
    pub fn decode(self, bytes: &[u8]) -> Option<Cow<'_, str>> {
        match self {
            TextEncoding::Utf8Sig => {
                let body = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
                encoding_rs::UTF_8.decode_without_bom_handling_and_without_replacement(body)
            }
            TextEncoding::Utf8 => {
                encoding_rs::UTF_8.decode_without_bom_handling_and_without_replacement(bytes)
            }
            TextEncoding::ShiftJis | TextEncoding::Cp932 => {
                encoding_rs::SHIFT_JIS.decode_without_bom_handling_and_without_replacement(bytes)
            }
            TextEncoding::EucJp => {
                encoding_rs::EUC_JP.decode_without_bom_handling_and_without_replacement(bytes)
            }
        }
    }
}

impl FromStr for TextEncoding {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "utf-8-sig" | "utf8-sig" => Ok(TextEncoding::Utf8Sig),
            "utf-8" | "utf8" => Ok(TextEncoding::Utf8),
            "shift-jis" | "sjis" => Ok(TextEncoding::ShiftJis),
            "cp932" | "windows-31j" | "ms932" => Ok(TextEncoding::Cp932),
            "euc-jp" | "eucjp" => Ok(TextEncoding::EucJp),
            _ => Err(CatalogError::UnknownEncoding(s.to_string())),
        }
    }
}

impl TryFrom<String> for TextEncoding {
    type Error = CatalogError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl Serialize for TextEncoding {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Single file
// ---------------------------------------------------------------------------

/// Parse CSV text. Header and cell whitespace is trimmed; ragged rows are
/// padded (or cut) to the header width.
pub fn parse_csv(text: &str) -> Result<RawTable> {
    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.iter().all(String::is_empty) {
        return Err(CatalogError::EmptyTable);
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        row.resize(headers.len(), String::new());
        rows.push(row);
    }

    Ok(RawTable { headers, rows })
}

/// Read a file, trying each encoding in order until one both decodes and
/// parses. Returns the table and the encoding that worked.
pub fn load_table(path: &Path, encodings: &[TextEncoding]) -> Result<(RawTable, TextEncoding)> {
    let bytes = std::fs::read(path).map_err(|e| CatalogError::io(path, e))?;

    for &encoding in encodings {
        let Some(text) = encoding.decode(&bytes) else {
            log::debug!("{}: not valid {}", path.display(), encoding.label());
            continue;
        };
        match parse_csv(&text) {
            Ok(table) => return Ok((table, encoding)),
            Err(e) => log::debug!("{}: {} decoded but did not parse: {e}", path.display(), encoding.label()),
        }
    }

    Err(CatalogError::Undecodable {
        path: path.to_path_buf(),
        tried: encodings
            .iter()
            .map(|e| e.label())
            .collect::<Vec<_>>()
            .join(", "),
    })
}

// ---------------------------------------------------------------------------
// Whole catalog
// ---------------------------------------------------------------------------

/// Load every configured dataset into one catalog.
///
/// Missing or unreadable files are skipped with a warning; if none load,
/// the returned catalog is empty and it is up to the caller to report it.
pub fn load_catalog(config: &CatalogConfig) -> Catalog {
    let mut sources = Vec::with_capacity(config.datasets.len());

    for dataset in &config.datasets {
        let path = config.resolve(dataset);
        if !path.exists() {
            log::warn!("{}: {} not found, skipping", dataset.category, path.display());
            continue;
        }

        match load_table(&path, &config.encodings) {
            Ok((table, encoding)) => {
                let category = Category::new(dataset.category.as_str());
                let records = derive_records(&table, &category, config);
                log::info!(
                    "Loaded {} records for {} from {} ({})",
                    records.len(),
                    category,
                    path.display(),
                    encoding.label()
                );
                sources.push(SourceTable {
                    category,
                    headers: table.headers,
                    records,
                    encoding: encoding.label(),
                });
            }
            Err(e) => log::warn!("{}: skipping: {e}", dataset.category),
        }
    }

    if sources.is_empty() {
        log::error!("No dataset could be loaded from {}", config.data_dir.display());
    }

    Catalog::from_sources(sources, &config.labels.placeholder)
}
