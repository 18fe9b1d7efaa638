use std::collections::HashSet;

use crate::config::SearchConfig;
use super::kana::QueryForms;
use super::model::{Catalog, DrugRecord};

// ---------------------------------------------------------------------------
// Outcome types
// ---------------------------------------------------------------------------

/// Matching records for one query, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResults {
    /// Catalog indices of the records to show (at most `max_results`).
    pub indices: Vec<usize>,
    /// Match count before truncation.
    pub total: usize,
}

impl SearchResults {
    /// Whether `indices` was cut short of `total`.
    pub fn truncated(&self) -> bool {
        self.total > self.indices.len()
    }
}

/// What the caller should show for a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Blank query; nothing was searched.
    NoQuery,
    /// The search ran and nothing survived. `exclusion_active` lets the
    /// caller hint that combination products were filtered out.
    NoMatch { exclusion_active: bool },
    Matches(SearchResults),
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

fn direct_match(record: &DrugRecord, forms: &QueryForms) -> bool {
    let name = record.name.to_lowercase();
    let ingredient = record.ingredient.to_lowercase();
    forms
        .normalized
        .iter()
        .any(|f| name.contains(f.as_str()) || ingredient.contains(f.as_str()))
        || name.contains(forms.raw.as_str())
}

/// Run a query against the catalog.
///
/// 1. Direct matches: name or ingredient contains a normalized form of the
///    query, or name contains the query as typed (case-insensitive).
/// 2. Every record sharing a non-empty ingredient with a direct match is
///    added, then rows are deduplicated on (name, ingredient).
/// 3. Combination products are optionally dropped.
/// 4. The list is capped at `settings.max_results`.
pub fn search(
    catalog: &Catalog,
    query: &str,
    exclude_combinations: bool,
    settings: &SearchConfig,
) -> SearchOutcome {
    let forms = QueryForms::new(query);
    if forms.raw.is_empty() {
        return SearchOutcome::NoQuery;
    }

    let records = &catalog.records;
    let direct: Vec<bool> = records.iter().map(|r| direct_match(r, &forms)).collect();

    let placeholder = catalog.placeholder();
    let ingredients: HashSet<&str> = records
        .iter()
        .zip(&direct)
        .filter(|(_, hit)| **hit)
        .map(|(r, _)| r.ingredient.as_str())
        .filter(|i| !i.is_empty() && *i != placeholder)
        .collect();

    let marker = settings.combination_marker.to_lowercase();
    let separator = settings.ingredient_separator.as_str();

    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let matched: Vec<usize> = records
        .iter()
        .enumerate()
        .filter(|(i, r)| direct[*i] || ingredients.contains(r.ingredient.as_str()))
        .filter(|(_, r)| seen.insert((r.name.as_str(), r.ingredient.as_str())))
        .filter(|(_, r)| {
            !exclude_combinations
                || !(contains_ci(&r.name, &marker) || r.ingredient.contains(separator))
        })
        .map(|(i, _)| i)
        .collect();

    log::debug!(
        "query {:?} (forms {:?}): {} direct, {} ingredients, {} after filters",
        forms.raw,
        forms.normalized,
        direct.iter().filter(|d| **d).count(),
        ingredients.len(),
        matched.len()
    );

    if matched.is_empty() {
        return SearchOutcome::NoMatch {
            exclusion_active: exclude_combinations,
        };
    }

    let total = matched.len();
    let mut indices = matched;
    indices.truncate(settings.max_results);
    SearchOutcome::Matches(SearchResults { indices, total })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Category, OriginType, SourceTable};

    fn rec(name: &str, ingredient: &str) -> DrugRecord {
        DrugRecord {
            name: name.into(),
            ingredient: ingredient.into(),
            manufacturer: "-".into(),
            price: "1.0".into(),
            category: Category::new("内用薬"),
            specification: String::new(),
            regulatory_class: "普通薬".into(),
            origin_type: OriginType::Unknown,
            columns: Default::default(),
        }
    }

    fn catalog(records: Vec<DrugRecord>) -> Catalog {
        Catalog::from_sources(
            vec![SourceTable {
                category: Category::new("内用薬"),
                headers: vec!["品名".into(), "成分名".into()],
                records,
                encoding: "utf-8",
            }],
            "-",
        )
    }

    fn indices(outcome: SearchOutcome) -> Vec<usize> {
        match outcome {
            SearchOutcome::Matches(r) => r.indices,
            other => panic!("expected matches, got {other:?}"),
        }
    }

    #[test]
    fn blank_query_is_not_searched() {
        let cat = catalog(vec![rec("アスピリン", "アスピリン")]);
        assert_eq!(search(&cat, "   ", true, &SearchConfig::default()), SearchOutcome::NoQuery);
    }

    #[test]
    fn hiragana_and_romaji_match_katakana() {
        let cat = catalog(vec![rec("バイアスピリン錠100mg", "アスピリン"), rec("ロキソニン錠", "ロキソプロフェン")]);
        let cfg = SearchConfig::default();
        assert_eq!(indices(search(&cat, "あすぴりん", false, &cfg)), vec![0]);
        assert_eq!(indices(search(&cat, "asupirin", false, &cfg)), vec![0]);
        assert_eq!(indices(search(&cat, "ろきそ", false, &cfg)), vec![1]);
    }

    #[test]
    fn raw_query_is_case_insensitive() {
        let cat = catalog(vec![rec("EPL カプセル", "ポリエンホスファチジルコリン")]);
        assert_eq!(indices(search(&cat, "epl", false, &SearchConfig::default())), vec![0]);
    }

    #[test]
    fn expands_by_shared_ingredient() {
        let cat = catalog(vec![
            rec("ロキソニン錠60mg", "ロキソプロフェンナトリウム水和物"),
            rec("ロキソプロフェンNa錠「サワイ」", "ロキソプロフェンナトリウム水和物"),
            rec("カロナール錠200", "アセトアミノフェン"),
            rec("ロキソニン錠60mg", "ロキソプロフェンナトリウム水和物"),
        ]);
        let outcome = search(&cat, "ろきそにん", false, &SearchConfig::default());
        // Row 3 duplicates row 0 on (name, ingredient).
        assert_eq!(indices(outcome), vec![0, 1]);
    }

    #[test]
    fn placeholder_ingredient_does_not_expand() {
        let cat = catalog(vec![rec("ガーゼA", "-"), rec("綿棒", "-"), rec("ガーゼB", "")]);
        assert_eq!(indices(search(&cat, "ガーゼ", false, &SearchConfig::default())), vec![0, 2]);
    }

    #[test]
    fn excludes_combination_products() {
        let cat = catalog(vec![
            rec("アスピリン錠", "アスピリン"),
            rec("タケルダ配合錠", "アスピリン"),
            rec("アスピリン・ダイアルミネート錠", "アスピリン・ダイアルミネート"),
        ]);
        let cfg = SearchConfig::default();
        assert_eq!(indices(search(&cat, "アスピリン", true, &cfg)), vec![0]);
        assert_eq!(indices(search(&cat, "アスピリン", false, &cfg)), vec![0, 1, 2]);
    }

    #[test]
    fn no_match_reports_exclusion() {
        let cat = catalog(vec![rec("タケルダ配合錠", "アスピリン・ランソプラゾール")]);
        let cfg = SearchConfig::default();
        assert_eq!(
            search(&cat, "タケルダ", true, &cfg),
            SearchOutcome::NoMatch { exclusion_active: true }
        );
        assert_eq!(
            search(&cat, "存在しない", false, &cfg),
            SearchOutcome::NoMatch { exclusion_active: false }
        );
    }

    #[test]
    fn truncates_and_reports_total() {
        let records = (0..60).map(|i| rec(&format!("テスト錠{i}"), "")).collect();
        let cat = catalog(records);
        match search(&cat, "テスト", true, &SearchConfig::default()) {
            SearchOutcome::Matches(r) => {
                assert_eq!(r.indices.len(), 50);
                assert_eq!(r.total, 60);
                assert!(r.truncated());
                assert_eq!(r.indices[0], 0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn repeated_queries_are_identical() {
        let cat = catalog(vec![rec("アスピリン", "アスピリン"), rec("バファリン", "アスピリン")]);
        let cfg = SearchConfig::default();
        assert_eq!(search(&cat, "あすぴりん", true, &cfg), search(&cat, "あすぴりん", true, &cfg));
    }
}
