//! Presentation of a single record: badges, formatted price, detail lines.
//! Shared by the egui cards and the headless text/JSON output.

use std::fmt;

use serde::Serialize;

use crate::data::model::{Category, DrugRecord, OriginType};

/// Everything a front end needs to draw one result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordCard {
    pub name: String,
    pub category: Category,
    pub origin_type: OriginType,
    pub origin_badge: &'static str,
    /// Shown only for controlled substances (毒 / 劇 / 麻 …).
    pub regulatory_badge: Option<String>,
    pub specification: String,
    pub manufacturer: String,
    pub ingredient: String,
    pub price: String,
}

impl RecordCard {
    pub fn from_record(record: &DrugRecord, normal_class: &str) -> Self {
        let reg = record.regulatory_class.as_str();
        let regulatory_badge = if reg.is_empty() || reg == normal_class || reg == "nan" {
            None
        } else {
            Some(reg.to_string())
        };

        RecordCard {
            name: record.name.clone(),
            category: record.category.clone(),
            origin_type: record.origin_type,
            origin_badge: record.origin_type.badge(),
            regulatory_badge,
            specification: record.specification.clone(),
            manufacturer: record.manufacturer.clone(),
            ingredient: record.ingredient.clone(),
            price: format_price(&record.price),
        }
    }
}

impl fmt::Display for RecordCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}  [{}] [{}]", self.name, self.category, self.origin_badge)?;
        if let Some(reg) = &self.regulatory_badge {
            write!(f, " [{reg}]")?;
        }
        writeln!(f)?;
        writeln!(f, "  規格: {}", self.specification)?;
        writeln!(f, "  メーカー: {}", self.manufacturer)?;
        writeln!(f, "  成分: {}", self.ingredient)?;
        write!(f, "  薬価: {}", self.price)
    }
}

/// `¥1,234.5` for numeric prices; anything else is returned unchanged.
pub fn format_price(raw: &str) -> String {
    let value = match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => return raw.to_string(),
    };

    let fixed = format!("{:.1}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "0"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("¥{sign}{grouped}.{frac_part}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_formatting() {
        assert_eq!(format_price("5.7"), "¥5.7");
        assert_eq!(format_price("1234.56"), "¥1,234.6");
        assert_eq!(format_price("1234567"), "¥1,234,567.0");
        assert_eq!(format_price("100"), "¥100.0");
        assert_eq!(format_price("-"), "-");
        assert_eq!(format_price("不明"), "不明");
        assert_eq!(format_price("nan"), "nan");
    }

    #[test]
    fn badges() {
        let mut record = DrugRecord {
            name: "リン酸コデイン散1%".into(),
            ingredient: "コデインリン酸塩水和物".into(),
            manufacturer: "X".into(),
            price: "8.8".into(),
            category: Category::new("内用薬"),
            specification: "1%1g".into(),
            regulatory_class: "普通薬".into(),
            origin_type: OriginType::Generic,
            columns: Default::default(),
        };
        let card = RecordCard::from_record(&record, "普通薬");
        assert_eq!(card.regulatory_badge, None);
        assert_eq!(card.origin_badge, "GE");
        assert_eq!(card.price, "¥8.8");

        record.regulatory_class = "麻".into();
        let card = RecordCard::from_record(&record, "普通薬");
        assert_eq!(card.regulatory_badge.as_deref(), Some("麻"));
        assert!(card.to_string().starts_with("リン酸コデイン散1%  [内用薬] [GE] [麻]\n"));
    }
}
