mod app;
mod config;
mod data;
mod debounce;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::Result;
use app::SiftTableApp;
use clap::Parser;
use config::{AppConfig, DEFAULT_DATA_PATH, DEFAULT_DEBOUNCE_MS, DEFAULT_PAGE_SIZE};
use eframe::egui;

/// Browse a CSV file page by page and filter it one column at a time.
#[derive(Parser)]
#[command(name = "sift-table")]
#[command(version, about, long_about = None)]
struct Cli {
    /// CSV file to open at startup
    #[arg(default_value = DEFAULT_DATA_PATH)]
    data: PathBuf,

    /// JSON file listing the columns to show: [{"label": ..., "key": ...}]
    #[arg(short, long)]
    columns: Option<PathBuf>,

    /// Rows per table page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,

    /// Quiet period before a filter change is applied, in milliseconds
    #[arg(long, default_value_t = DEFAULT_DEBOUNCE_MS)]
    debounce_ms: u64,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = AppConfig::new(
        cli.data,
        cli.columns.as_deref(),
        cli.page_size,
        cli.debounce_ms,
    )?;
    log::debug!("Starting with {config:?}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Sift Table – Filter For Large Dataset",
        options,
        Box::new(move |cc| Ok(Box::new(SiftTableApp::new(cc, &config)))),
    )
    .map_err(|e| anyhow::anyhow!("UI error: {e}"))
}
