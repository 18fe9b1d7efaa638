use eframe::egui::{self, Align, Color32, Layout, RichText, ScrollArea, Ui};

use rusty_pill::data::search::{SearchOutcome, SearchResults};
use rusty_pill::RecordCard;

use crate::color::{self, CategoryColors};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Result list (central panel)
// ---------------------------------------------------------------------------

/// Render the outcome of the current search.
pub fn result_list(ui: &mut Ui, state: &AppState) {
    if state.catalog.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading(RichText::new("データ読み込みエラー").color(Color32::RED));
        });
        return;
    }

    match &state.outcome {
        SearchOutcome::NoQuery => {}
        SearchOutcome::NoMatch { exclusion_active } => {
            ui.vertical_centered(|ui: &mut Ui| {
                ui.label("見つかりませんでした");
                if *exclusion_active {
                    ui.small("※配合剤除外がONです");
                }
            });
        }
        SearchOutcome::Matches(results) => matches(ui, state, results),
    }
}

fn matches(ui: &mut Ui, state: &AppState, results: &SearchResults) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(format!("{}件 ヒット", results.total));
        if results.truncated() {
            ui.label(
                RichText::new(format!("上位{}件を表示", results.indices.len()))
                    .color(Color32::from_rgb(0xcc, 0x8a, 0x00)),
            );
        }
    });
    ui.add_space(4.0);

    let normal = &state.cache.config().labels.normal_class;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for &idx in &results.indices {
                let record = &state.catalog.records[idx];
                let card = RecordCard::from_record(record, normal);
                card_frame(ui, &card, &state.category_colors);
                details(ui, state, idx);
                ui.add_space(6.0);
            }
        });
}

fn badge(ui: &mut Ui, text: &str, fill: Color32, fg: Color32) {
    ui.label(
        RichText::new(format!(" {text} "))
            .small()
            .strong()
            .color(fg)
            .background_color(fill),
    );
}

fn card_frame(ui: &mut Ui, card: &RecordCard, colors: &CategoryColors) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_width(ui.available_width());

        ui.label(RichText::new(&card.name).strong().size(16.0));

        ui.horizontal_wrapped(|ui: &mut Ui| {
            badge(ui, card.category.as_str(), colors.color_for(&card.category), Color32::WHITE);

            let (fill, fg) = color::origin_colors(card.origin_type);
            badge(ui, card.origin_badge, fill, fg);

            if let Some(reg) = &card.regulatory_badge {
                badge(ui, reg, color::REGULATORY_FILL, color::REGULATORY_TEXT);
            }
        });

        ui.small(format!("規格: {}", card.specification));
        ui.small(format!("メーカー: {}", card.manufacturer));
        ui.small(format!("成分: {}", card.ingredient));

        ui.separator();
        ui.horizontal(|ui: &mut Ui| {
            ui.label("薬価");
            ui.with_layout(Layout::right_to_left(Align::Center), |ui: &mut Ui| {
                ui.label(RichText::new(&card.price).strong().size(17.0).color(color::PRICE));
            });
        });
    });
}

/// Every column of the unified table for one record; columns this record's
/// source file lacks show the placeholder.
fn details(ui: &mut Ui, state: &AppState, idx: usize) {
    egui::CollapsingHeader::new(RichText::new("全項目").small())
        .id_salt(("details", idx))
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new(("details_grid", idx))
                .striped(true)
                .show(ui, |ui: &mut Ui| {
                    for column in &state.catalog.column_names {
                        ui.small(column);
                        ui.small(state.catalog.cell(idx, column));
                        ui.end_row();
                    }
                });
        });
}
