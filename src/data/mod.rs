/// Data layer: loading, field derivation, caching and search.
///
/// Architecture:
/// ```text
///  内用薬.csv / 外用薬.csv / 注射薬.csv   (utf-8 / shift_jis / euc-jp …)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  decode + parse → RawTable per category
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  derive   │  ColumnLayout → DrugRecord (regulatory class, 規格, 先発/GE)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Catalog  │  concatenated records, union of columns  (held by cache)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  search   │  kana-normalized match → ingredient expansion → filters
///   └──────────┘
/// ```

pub mod cache;
pub mod derive;
pub mod kana;
pub mod loader;
pub mod model;
pub mod search;
