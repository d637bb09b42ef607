//! Chart Viewer Widget
//! Right side scrollable panel: overview, headline metric, trend sentence and charts.

use crate::charts::ChartPlotter;
use crate::pipeline::{PipelineOutcome, PipelineResult};
use crate::report::SELECTION_PROMPT;
use crate::stats::format_thousands;
use egui::{Color32, RichText, ScrollArea};

const CHART_HEIGHT: f32 = 260.0;
const SECTION_SPACING: f32 = 15.0;

const ABOUT_TEXT: &str = "This viewer combines official price statistics for tobacco and \
alcohol products with cancer incidence counts, so their long-term trends can be compared \
side by side.\n\n\
1. Pick one or more products in the sidebar.\n\
2. Pick a single cancer site.\n\
3. Choose which incidence count to show (male, female or total).\n\
4. Click legend entries to toggle individual lines.";

/// Scrollable display of the latest pipeline outcome.
#[derive(Default)]
pub struct ChartViewer {
    pub outcome: Option<PipelineOutcome>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_outcome(&mut self, outcome: PipelineOutcome) {
        self.outcome = Some(outcome);
    }

    pub fn clear(&mut self) {
        self.outcome = None;
    }

    /// Result that can be exported, if any.
    pub fn exportable_result(&self) -> Option<&PipelineResult> {
        match &self.outcome {
            Some(PipelineOutcome::Ready(result)) if !result.is_empty() => Some(result),
            _ => None,
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading("Tobacco & alcohol prices vs. cancer incidence");
                ui.add_space(5.0);
                egui::CollapsingHeader::new("About this app")
                    .default_open(false)
                    .show(ui, |ui| {
                        ui.label(ABOUT_TEXT);
                    });
                ui.add_space(SECTION_SPACING);

                match &self.outcome {
                    None => {
                        ui.centered_and_justified(|ui| {
                            ui.label(RichText::new("No Data").size(20.0));
                        });
                    }
                    Some(PipelineOutcome::SelectionRequired) => {
                        ui.label(
                            RichText::new(format!("⚠ {SELECTION_PROMPT}"))
                                .size(16.0)
                                .color(Color32::from_rgb(243, 156, 18)),
                        );
                    }
                    Some(PipelineOutcome::Ready(result)) => Self::draw_result(ui, result),
                }
            });
    }

    fn draw_result(ui: &mut egui::Ui, result: &PipelineResult) {
        let selection = &result.selection;

        // ===== Overview =====
        ui.label(RichText::new("Data overview").size(18.0).strong());
        ui.add_space(5.0);
        match result.summary {
            Some(summary) => {
                ui.label(format!("Years: {} - {}", summary.min_year, summary.max_year));
                ui.label(format!("Records: {}", summary.record_count));
            }
            None => {
                ui.label("Years: N/A");
                ui.label("Records: 0");
            }
        }
        ui.label(format!("Cancer site: {}", selection.site));
        ui.label(format!("Products: {}", selection.products.join(", ")));
        ui.add_space(SECTION_SPACING);

        if result.is_empty() {
            ui.label(
                RichText::new("No overlapping years between the selected products and site.")
                    .color(Color32::from_rgb(220, 53, 69)),
            );
            ui.label("Latest incidence: N/A");
            return;
        }

        // ===== Findings =====
        ui.label(RichText::new("Findings").size(18.0).strong());
        ui.add_space(5.0);
        if let Some(headline) = result.headline {
            egui::Frame::none()
                .fill(ui.visuals().widgets.noninteractive.bg_fill)
                .rounding(8.0)
                .inner_margin(12.0)
                .show(ui, |ui| {
                    ui.label(
                        RichText::new(format!(
                            "{} {} incidence ({})",
                            headline.year,
                            selection.site,
                            selection.gender.label()
                        ))
                        .size(12.0)
                        .color(Color32::GRAY),
                    );
                    ui.label(
                        RichText::new(format!("{} persons", format_thousands(headline.value)))
                            .size(28.0)
                            .strong(),
                    );
                });
        }
        ui.add_space(5.0);
        ui.label(result.trend.direction.sentence());
        ui.add_space(SECTION_SPACING);

        // ===== Trend charts =====
        ui.label(
            RichText::new(format!(
                "{} incidence and {} prices",
                selection.site,
                selection.products.join(" / ")
            ))
            .size(18.0)
            .strong(),
        );
        ChartPlotter::draw_incidence_chart(ui, result, CHART_HEIGHT);
        ChartPlotter::draw_price_chart(ui, result, CHART_HEIGHT);
        ui.label(
            RichText::new(
                "Note: incidence is in persons and prices are in yen; \
                 the two scales are not directly comparable.",
            )
            .size(11.0)
            .color(Color32::GRAY),
        );
        ui.add_space(SECTION_SPACING);

        // ===== Yearly bars =====
        ui.label(RichText::new("Cancer incidence per year").size(18.0).strong());
        ChartPlotter::draw_yearly_bar_chart(ui, result, CHART_HEIGHT);
        ui.add_space(SECTION_SPACING);

        // ===== Table =====
        egui::CollapsingHeader::new("Joined data")
            .default_open(false)
            .show(ui, |ui| {
                ChartPlotter::draw_joined_table(ui, result);
            });
    }
}
