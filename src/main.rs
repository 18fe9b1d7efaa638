mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use eframe::egui;

use app::RustyPillApp;
use rusty_pill::report::SearchReport;
use rusty_pill::{search, CatalogCache, CatalogConfig};
use state::AppState;

/// Search the drug price list by name or ingredient (hiragana and romaji OK).
#[derive(Debug, Parser)]
#[command(name = "rusty-pill", version, about)]
struct Cli {
    /// Config file (default: ./rusty-pill.toml if present).
    #[arg(short, long, env = "RUSTY_PILL_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the category CSV files.
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Search once, print the results and exit instead of opening the window.
    #[arg(short, long)]
    query: Option<String>,

    /// Keep combination products (配合剤) in the results.
    #[arg(long)]
    include_combinations: bool,

    /// Print results as JSON (with --query).
    #[arg(long, requires = "query")]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config =
        CatalogConfig::load_or_default(cli.config.as_deref()).context("loading configuration")?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    match cli.query {
        Some(query) => run_headless(config, &query, !cli.include_combinations, cli.json),
        None => run_gui(config),
    }
}

fn run_headless(config: CatalogConfig, query: &str, exclude: bool, json: bool) -> Result<()> {
    let mut cache = CatalogCache::new(config);
    let catalog = cache.get();
    if catalog.is_empty() {
        bail!(
            "データ読み込みエラー: no dataset could be loaded from {}",
            cache.config().data_dir.display()
        );
    }

    let config = cache.config();
    let outcome = search(&catalog, query, exclude, &config.search);
    let Some(report) = SearchReport::new(query, &catalog, &outcome, &config.labels.normal_class)
    else {
        return Ok(());
    };

    if json {
        let text = serde_json::to_string_pretty(&report).context("serializing results")?;
        println!("{text}");
    } else {
        print!("{}", report.to_text());
    }
    Ok(())
}

fn run_gui(config: CatalogConfig) -> Result<()> {
    let state = AppState::new(config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([480.0, 820.0])
            .with_min_inner_size([320.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Pill – 医薬品検索",
        options,
        Box::new(|cc| Ok(Box::new(RustyPillApp::new(cc, state)))),
    )
    .map_err(|e| anyhow!("failed to start UI: {e}"))
}
