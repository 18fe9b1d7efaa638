use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use rusty_pill::data::model::{Category, OriginType};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = 200.0 + (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.45, 0.42);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Badge colours
// ---------------------------------------------------------------------------

/// Category → badge colour, rebuilt whenever the catalog changes.
#[derive(Debug, Clone, Default)]
pub struct CategoryColors {
    mapping: BTreeMap<Category, Color32>,
}

impl CategoryColors {
    pub fn new(categories: &[Category]) -> Self {
        let palette = generate_palette(categories.len());
        CategoryColors {
            mapping: categories.iter().cloned().zip(palette).collect(),
        }
    }

    pub fn color_for(&self, category: &Category) -> Color32 {
        self.mapping
            .get(category)
            .copied()
            .unwrap_or(Color32::from_rgb(0x6c, 0x75, 0x7d))
    }
}

/// Fill and text colour of the 先発 / GE / 他 badge.
pub fn origin_colors(origin: OriginType) -> (Color32, Color32) {
    match origin {
        OriginType::Originator => (Color32::from_rgb(0x19, 0x87, 0x54), Color32::WHITE),
        OriginType::Generic => (Color32::from_rgb(0x0d, 0x6e, 0xfd), Color32::WHITE),
        OriginType::Unknown => (
            Color32::from_rgb(0xad, 0xb5, 0xbd),
            Color32::from_rgb(0x21, 0x25, 0x29),
        ),
    }
}

pub const REGULATORY_FILL: Color32 = Color32::from_rgb(0xff, 0xc1, 0x07);
pub const REGULATORY_TEXT: Color32 = Color32::from_rgb(0x21, 0x25, 0x29);
pub const PRICE: Color32 = Color32::from_rgb(0xdc, 0x35, 0x45);
