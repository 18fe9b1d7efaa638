//! Pharmaceutical price-list search: loads the per-category CSV exports,
//! derives regulatory and originator/generic fields, and answers
//! kana-aware substring queries.

pub mod card;
pub mod config;
pub mod data;
pub mod error;
pub mod report;

pub use card::RecordCard;
pub use config::CatalogConfig;
pub use data::cache::CatalogCache;
pub use data::model::{Catalog, Category, DrugRecord, OriginType};
pub use data::search::{search, SearchOutcome, SearchResults};
pub use error::{CatalogError, Result};
