use std::path::{Path, PathBuf};
use std::sync::Arc;

use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, results};

/// System fonts probed for CJK glyphs when none is configured.
const CJK_FONT_CANDIDATES: &[&str] = &[
    "/System/Library/Fonts/ヒラギノ角ゴシック W3.ttc",
    "/System/Library/Fonts/Hiragino Sans GB.ttc",
    "C:\\Windows\\Fonts\\meiryo.ttc",
    "C:\\Windows\\Fonts\\msgothic.ttc",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/fonts-japanese-gothic.ttf",
];

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RustyPillApp {
    pub state: AppState,
}

impl RustyPillApp {
    pub fn new(cc: &eframe::CreationContext<'_>, state: AppState) -> Self {
        let configured = state.cache.config().ui.font_path.clone();
        install_cjk_font(&cc.egui_ctx, configured);
        Self { state }
    }
}

impl eframe::App for RustyPillApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: search + results ----
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::search_bar(ui, &mut self.state);
            ui.separator();
            results::result_list(ui, &self.state);
        });
    }
}

// ---------------------------------------------------------------------------
// Fonts
// ---------------------------------------------------------------------------

/// egui's bundled fonts have no kana/kanji; append a system font as fallback.
fn install_cjk_font(ctx: &egui::Context, configured: Option<PathBuf>) {
    let candidates = configured
        .into_iter()
        .chain(CJK_FONT_CANDIDATES.iter().map(PathBuf::from));

    for path in candidates {
        match std::fs::read(&path) {
            Ok(bytes) => {
                add_font(ctx, &path, bytes);
                return;
            }
            Err(e) => log::debug!("font {}: {e}", path.display()),
        }
    }
    log::warn!("No CJK font found; Japanese text will not render. Set [ui] font_path.");
}

fn add_font(ctx: &egui::Context, path: &Path, bytes: Vec<u8>) {
    let name = "cjk".to_string();
    let mut fonts = egui::FontDefinitions::default();
    fonts
        .font_data
        .insert(name.clone(), Arc::new(egui::FontData::from_owned(bytes)));
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts.families.entry(family).or_default().push(name.clone());
    }
    ctx.set_fonts(fonts);
    log::info!("Using CJK font {}", path.display());
}
