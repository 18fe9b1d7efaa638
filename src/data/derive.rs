//! Positional field derivation: regulatory class, specification, and
//! originator / generic classification.
//!
//! Price-list exports have no stable names for their marker columns, so the
//! layout is inferred once per file header ([`ColumnLayout::resolve`]) and
//! then applied to every row without further string scanning.

use std::collections::BTreeMap;

use crate::config::{CatalogConfig, OriginFlag};
use super::model::{Category, DrugRecord, OriginType};

// ---------------------------------------------------------------------------
// RawTable – decoded CSV before derivation
// ---------------------------------------------------------------------------

/// A parsed file: trimmed headers plus rows padded to header width.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    fn position(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

// ---------------------------------------------------------------------------
// ColumnLayout – resolved once per schema
// ---------------------------------------------------------------------------

/// Column indices the deriver reads, resolved from a header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnLayout {
    pub anchor: Option<usize>,
    /// Existing marker columns immediately before the anchor, left to right.
    pub flag_columns: Vec<usize>,
    pub spec_column: Option<usize>,
    pub ingredient: Option<usize>,
    pub manufacturer: Option<usize>,
    pub price: Option<usize>,
    pub original_flag: Option<usize>,
    pub generic_flag: Option<usize>,
}

impl ColumnLayout {
    pub fn resolve(table: &RawTable, config: &CatalogConfig) -> Self {
        let layout = &config.layout;
        let anchor = table.position(&layout.anchor_column);

        let (flag_columns, spec_column) = match anchor {
            Some(idx) => {
                // Markers only count when the full run fits left of the anchor.
                let flags = match idx.checked_sub(layout.flag_columns) {
                    Some(start) => (start..idx).collect(),
                    None => Vec::new(),
                };
                (flags, idx.checked_sub(layout.spec_offset))
            }
            None => (Vec::new(), None),
        };

        // Later columns overwrite earlier ones for the same flag.
        let mut original_flag = None;
        let mut generic_flag = None;
        for (i, header) in table.headers.iter().enumerate() {
            for rule in config.origin_rules.iter().filter(|r| r.matches(header)) {
                match rule.flag {
                    OriginFlag::Original => original_flag = Some(i),
                    OriginFlag::Generic => generic_flag = Some(i),
                }
            }
        }

        ColumnLayout {
            anchor,
            flag_columns,
            spec_column,
            ingredient: table.position(&config.columns.ingredient),
            manufacturer: table.position(&config.columns.manufacturer),
            price: table.position(&config.columns.price),
            original_flag,
            generic_flag,
        }
    }
}

// ---------------------------------------------------------------------------
// Per-row derivation
// ---------------------------------------------------------------------------

/// Concatenated marker values, or `normal_class` when they are all empty.
pub fn regulatory_class(markers: &[&str], normal_class: &str) -> String {
    let joined: String = markers.concat();
    if joined.is_empty() {
        normal_class.to_string()
    } else {
        joined
    }
}

/// First matching rule wins:
/// original flag ∋ originator → generic flag ∋ generic/star → generic flag ∋ originator.
pub fn origin_type(
    original_flag: &str,
    generic_flag: &str,
    markers: &crate::config::OriginMarkers,
) -> OriginType {
    if original_flag.contains(markers.originator.as_str()) {
        OriginType::Originator
    } else if generic_flag.contains(markers.generic.as_str())
        || generic_flag.contains(markers.generic_star.as_str())
    {
        OriginType::Generic
    } else if generic_flag.contains(markers.originator.as_str()) {
        OriginType::Originator
    } else {
        OriginType::Unknown
    }
}

/// Turn one decoded table into records tagged with `category`.
pub fn derive_records(
    table: &RawTable,
    category: &Category,
    config: &CatalogConfig,
) -> Vec<DrugRecord> {
    let layout = ColumnLayout::resolve(table, config);
    let labels = &config.labels;

    if layout.anchor.is_none() {
        log::warn!(
            "{category}: no '{}' column, using fallback labels",
            config.layout.anchor_column
        );
    }

    table
        .rows
        .iter()
        .map(|row| {
            let cell = |idx: usize| row.get(idx).map(String::as_str).unwrap_or("");
            let named = |idx: Option<usize>| match idx {
                Some(i) => cell(i).to_string(),
                None => labels.placeholder.clone(),
            };

            let (name, regulatory, specification) = match layout.anchor {
                Some(anchor) => {
                    let markers: Vec<&str> = layout.flag_columns.iter().map(|&i| cell(i)).collect();
                    (
                        cell(anchor).to_string(),
                        regulatory_class(&markers, &labels.normal_class),
                        layout.spec_column.map(|i| cell(i).to_string()).unwrap_or_default(),
                    )
                }
                None => (
                    labels.placeholder.clone(),
                    labels.unknown_class.clone(),
                    String::new(),
                ),
            };

            let original = layout.original_flag.map(cell).unwrap_or("");
            let generic = layout.generic_flag.map(cell).unwrap_or("");

            let columns: BTreeMap<String, String> = table
                .headers
                .iter()
                .zip(row.iter())
                .map(|(h, v)| (h.clone(), v.clone()))
                .collect();

            DrugRecord {
                name,
                ingredient: named(layout.ingredient),
                manufacturer: named(layout.manufacturer),
                price: named(layout.price),
                category: category.clone(),
                specification,
                regulatory_class: regulatory,
                origin_type: origin_type(original, generic, &config.markers),
                columns,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OriginMarkers;

    fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    const HEADERS: &[&str] = &[
        "区分", "薬価基準収載医薬品コード", "成分名", "規格", "麻", "毒", "劇", "品名", "メーカー名",
        "診療報酬において加算等の算定対象となる後発医薬品", "先発医薬品", "薬価",
    ];

    #[test]
    fn resolves_layout_relative_to_anchor() {
        let t = table(HEADERS, &[]);
        let layout = ColumnLayout::resolve(&t, &CatalogConfig::default());
        assert_eq!(layout.anchor, Some(7));
        assert_eq!(layout.flag_columns, vec![4, 5, 6]);
        assert_eq!(layout.spec_column, Some(3));
        assert_eq!(layout.ingredient, Some(2));
        assert_eq!(layout.generic_flag, Some(9));
        assert_eq!(layout.original_flag, Some(10));
    }

    #[test]
    fn empty_markers_are_normal() {
        assert_eq!(regulatory_class(&["", "", ""], "普通薬"), "普通薬");
        assert_eq!(regulatory_class(&["", "毒", ""], "普通薬"), "毒");
        assert_eq!(regulatory_class(&["麻", "", "劇"], "普通薬"), "麻劇");
    }

    #[test]
    fn origin_decision_order() {
        let m = OriginMarkers::default();
        assert_eq!(origin_type("先発品", "後発品", &m), OriginType::Originator);
        assert_eq!(origin_type("", "後発品", &m), OriginType::Generic);
        assert_eq!(origin_type("", "★", &m), OriginType::Generic);
        assert_eq!(origin_type("", "先発品", &m), OriginType::Originator);
        assert_eq!(origin_type("", "", &m), OriginType::Unknown);
        assert_eq!(origin_type("準先発品", "", &m), OriginType::Originator);
    }

    #[test]
    fn derives_full_rows() {
        let t = table(
            HEADERS,
            &[
                &["内", "1", "アスピリン", "100mg1錠", "", "", "", "バイアスピリン錠100mg", "バイエル", "", "先発品", "5.7"],
                &["内", "2", "アスピリン", "100mg1錠", "", "", "劇", "アスピリン錠「X」", "X製薬", "★", "", "5.1"],
            ],
        );
        let cat = Category::new("内用薬");
        let recs = derive_records(&t, &cat, &CatalogConfig::default());

        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].name, "バイアスピリン錠100mg");
        assert_eq!(recs[0].specification, "100mg1錠");
        assert_eq!(recs[0].regulatory_class, "普通薬");
        assert_eq!(recs[0].origin_type, OriginType::Originator);
        assert_eq!(recs[0].price, "5.7");
        assert_eq!(recs[1].regulatory_class, "劇");
        assert_eq!(recs[1].origin_type, OriginType::Generic);
        assert!(recs.iter().all(|r| r.category == cat));
    }

    #[test]
    fn missing_columns_get_defaults() {
        let t = table(&["品名"], &[&["ガーゼ"]]);
        let recs = derive_records(&t, &Category::new("外用薬"), &CatalogConfig::default());
        let r = &recs[0];
        assert_eq!(r.name, "ガーゼ");
        assert_eq!(r.ingredient, "-");
        assert_eq!(r.manufacturer, "-");
        assert_eq!(r.price, "-");
        assert_eq!(r.specification, "");
        assert_eq!(r.regulatory_class, "普通薬");
        assert_eq!(r.origin_type, OriginType::Unknown);
    }

    #[test]
    fn missing_anchor_uses_fallback_labels() {
        let t = table(&["名称", "成分名"], &[&["何か", "成分"]]);
        let recs = derive_records(&t, &Category::new("注射薬"), &CatalogConfig::default());
        assert_eq!(recs[0].name, "-");
        assert_eq!(recs[0].regulatory_class, "不明");
        assert_eq!(recs[0].specification, "");
        assert_eq!(recs[0].ingredient, "成分");
    }

    #[test]
    fn anchor_near_left_edge_has_no_markers() {
        let t = table(&["成分名", "品名"], &[&["ケトプロフェン", "X"]]);
        let layout = ColumnLayout::resolve(&t, &CatalogConfig::default());
        assert!(layout.flag_columns.is_empty());
        assert_eq!(layout.spec_column, None);
        let recs = derive_records(&t, &Category::new("外用薬"), &CatalogConfig::default());
        assert_eq!(recs[0].regulatory_class, "普通薬");
        assert_eq!(recs[0].ingredient, "ケトプロフェン");
    }
}
