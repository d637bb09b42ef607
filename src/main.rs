//! Price vs. Cancer Incidence Viewer - interactive window and headless report.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use eframe::egui;
use price_incidence::cli::{Cli, Commands};
use price_incidence::config::AppConfig;
use price_incidence::gui::PriceIncidenceApp;
use price_incidence::{logging, report};
use tracing::info;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AppConfig::default(),
    };
    cli.apply_overrides(&mut config);

    let level = logging::level_from_flags(cli.verbose, cli.quiet, &config.logging.level);
    logging::init(&level, config.logging.format)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        price_csv = %config.data.price_csv.display(),
        cancer_csv = %config.data.cancer_csv.display(),
        "starting"
    );

    match &cli.command {
        Some(Commands::Report(args)) => report::run_report(&config, args),
        Some(Commands::Gui) | None => run_gui(config),
    }
}

fn run_gui(config: AppConfig) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([1000.0, 650.0])
            .with_title("Prices & Cancer Incidence"),
        ..Default::default()
    };

    eframe::run_native(
        "Prices & Cancer Incidence",
        options,
        Box::new(|cc| Ok(Box::new(PriceIncidenceApp::new(cc, config)))),
    )
    .map_err(|e| anyhow!("GUI error: {e}"))
}
