//! Headless rendering of a search outcome (plain text or JSON).

use std::fmt::Write as _;

use serde::Serialize;

use crate::card::RecordCard;
use crate::data::model::Catalog;
use crate::data::search::SearchOutcome;

/// Serializable view of one search, as printed by `--query`.
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    pub query: String,
    pub total: usize,
    pub truncated: bool,
    /// Set when nothing matched while combination products were excluded.
    pub exclusion_hint: bool,
    pub results: Vec<RecordCard>,
}

impl SearchReport {
    /// `None` for a blank query: nothing to report.
    pub fn new(
        query: &str,
        catalog: &Catalog,
        outcome: &SearchOutcome,
        normal_class: &str,
    ) -> Option<Self> {
        let report = match outcome {
            SearchOutcome::NoQuery => return None,
            SearchOutcome::NoMatch { exclusion_active } => SearchReport {
                query: query.to_string(),
                total: 0,
                truncated: false,
                exclusion_hint: *exclusion_active,
                results: Vec::new(),
            },
            SearchOutcome::Matches(results) => SearchReport {
                query: query.to_string(),
                total: results.total,
                truncated: results.truncated(),
                exclusion_hint: false,
                results: results
                    .indices
                    .iter()
                    .map(|&i| RecordCard::from_record(&catalog.records[i], normal_class))
                    .collect(),
            },
        };
        Some(report)
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        if self.results.is_empty() {
            out.push_str("見つかりませんでした\n");
            if self.exclusion_hint {
                out.push_str("※配合剤除外がONです\n");
            }
            return out;
        }

        let _ = writeln!(out, "{}件 ヒット", self.total);
        if self.truncated {
            let _ = writeln!(out, "上位{}件を表示", self.results.len());
        }
        for card in &self.results {
            let _ = writeln!(out, "\n{card}");
        }
        out
    }
}
