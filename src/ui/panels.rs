use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Search box + toggle
// ---------------------------------------------------------------------------

/// Render the query field and the combination-product toggle.
pub fn search_bar(ui: &mut Ui, state: &mut AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(RichText::new("医薬品検索").strong());
    });
    ui.add_space(4.0);

    let edit = egui::TextEdit::singleline(&mut state.query)
        .hint_text("薬名を入力（ひらがなOK）")
        .desired_width(f32::INFINITY);
    ui.add(edit);

    ui.checkbox(&mut state.exclude_combinations, "配合剤を除外");

    // Cheap when nothing changed: the state compares against the last query.
    state.refresh();
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open data folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if !state.catalog.is_empty() {
            let per_category: Vec<String> = state
                .catalog
                .counts_by_category()
                .iter()
                .map(|(c, n)| format!("{c} {n}"))
                .collect();
            ui.label(format!(
                "{} records ({})",
                state.catalog.len(),
                per_category.join(" / ")
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Open price-list folder")
        .set_directory(&state.cache.config().data_dir)
        .pick_folder();

    if let Some(dir) = folder {
        state.set_data_dir(dir);
        if state.catalog.is_empty() {
            log::error!("No dataset could be loaded from the selected folder");
        } else {
            log::info!("Loaded {} records", state.catalog.len());
        }
    }
}
