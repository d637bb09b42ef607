//! Main application window with control panel and chart viewer.

use crate::charts::StaticChartRenderer;
use crate::config::AppConfig;
use crate::data::{DataContext, DataLoader};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::pipeline::compute_pipeline;
use egui::SidePanel;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::thread;
use tracing::{error, info, warn};

/// Source table loading result from background thread
enum LoadResult {
    Complete(DataContext),
    Error(String),
}

/// Main application window.
pub struct PriceIncidenceApp {
    config: AppConfig,
    context: Option<DataContext>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    // Async loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl PriceIncidenceApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let mut app = Self {
            control_panel: ControlPanel::new(config.window.default_gender),
            chart_viewer: ChartViewer::new(),
            config,
            context: None,
            load_rx: None,
            is_loading: false,
        };
        app.start_loading();
        app
    }

    /// Load both source tables in a background thread.
    fn start_loading(&mut self) {
        let price_path = self.config.data.price_csv.clone();
        let cancer_path = self.config.data.cancer_csv.clone();

        let (tx, rx) = channel();
        self.load_rx = Some(rx);
        self.is_loading = true;
        self.control_panel.set_status("Loading data...");

        thread::spawn(move || {
            let result = match DataLoader::load(&price_path, &cancer_path) {
                Ok(ctx) => LoadResult::Complete(ctx),
                Err(e) => LoadResult::Error(e.to_string()),
            };
            let _ = tx.send(result);
        });
    }

    /// Check for loading results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(LoadResult::Complete(ctx)) => {
                let products = ctx.products();
                let sites = ctx.sites();
                self.control_panel.set_status(&format!(
                    "Loaded {} products, {} cancer sites",
                    products.len(),
                    sites.len()
                ));
                self.control_panel.update_options(products, sites);
                self.context = Some(ctx);
                self.is_loading = false;
                self.recompute();
            }
            Ok(LoadResult::Error(e)) => {
                error!(error = %e, "failed to load source tables");
                self.control_panel.set_status(&format!("Error: {}", e));
                self.is_loading = false;
            }
            Err(TryRecvError::Empty) => {
                self.load_rx = Some(rx);
            }
            Err(TryRecvError::Disconnected) => {
                self.control_panel.set_status("Error: loader thread stopped");
                self.is_loading = false;
            }
        }
    }

    /// Re-run the pipeline for the current selection.
    fn recompute(&mut self) {
        let Some(ctx) = &self.context else {
            return;
        };

        let selection = self.control_panel.selection();
        match compute_pipeline(ctx, &selection) {
            Ok(outcome) => {
                self.chart_viewer.set_outcome(outcome);
                self.control_panel.clear_error();
            }
            Err(e) => {
                error!(error = %e, "pipeline failed");
                self.chart_viewer.clear();
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
        self.control_panel.export_enabled = self.chart_viewer.exportable_result().is_some();
    }

    /// Handle PNG export - render charts and optionally open the image
    fn handle_export_png(&mut self) {
        let Some(result) = self.chart_viewer.exportable_result() else {
            self.control_panel.set_status("No charts to export");
            return;
        };

        // Ask user for output location
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name("price_incidence.png")
            .save_file()
        else {
            return; // User cancelled
        };

        let export = &self.config.export;
        match StaticChartRenderer::render_png(result, &path, export.width, export.height) {
            Ok(()) => {
                self.control_panel
                    .set_status(&format!("Exported {}", path.display()));
                if export.open_after_export {
                    if let Err(e) = open::that(&path) {
                        warn!(error = %e, "could not open exported image");
                    }
                }
            }
            Err(e) => {
                error!(error = %e, "export failed");
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for PriceIncidenceApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        // Request repaint while loading
        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::SelectionChanged => {
                            info!(selection = ?self.control_panel.selection(), "selection changed");
                            self.recompute();
                        }
                        ControlPanelAction::ExportPng => self.handle_export_png(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}
