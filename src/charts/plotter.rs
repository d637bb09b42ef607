//! Chart Plotter Module
//! Creates interactive visualizations using egui_plot.

use crate::pipeline::PipelineResult;
use crate::stats::format_thousands;
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Legend, Line, LineStyle, Plot, PlotPoints, Points};

/// Color of the incidence line and bars
pub const INCIDENCE_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(231, 76, 60),  // Red
    Color32::from_rgb(46, 204, 113), // Green
    Color32::from_rgb(155, 89, 182), // Purple
    Color32::from_rgb(243, 156, 18), // Orange
    Color32::from_rgb(26, 188, 156), // Teal
    Color32::from_rgb(233, 30, 99),  // Pink
    Color32::from_rgb(0, 188, 212),  // Cyan
    Color32::from_rgb(255, 87, 34),  // Deep Orange
    Color32::from_rgb(121, 85, 72),  // Brown
    Color32::from_rgb(96, 125, 139), // Blue Grey
];

/// Creates the dashboard charts using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Get color for a product series.
    pub fn product_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Year bounds padded by half a year so edge markers stay visible.
    fn year_bounds(result: &PipelineResult) -> (f64, f64) {
        result
            .summary
            .map(|s| (s.min_year as f64 - 0.5, s.max_year as f64 + 0.5))
            .unwrap_or((0.0, 1.0))
    }

    fn year_formatter(mark: egui_plot::GridMark) -> String {
        if mark.value.fract().abs() < f64::EPSILON {
            format!("{:.0}", mark.value)
        } else {
            String::new()
        }
    }

    /// Incidence line for the selected site (left axis in the static export).
    pub fn draw_incidence_chart(ui: &mut egui::Ui, result: &PipelineResult, height: f32) {
        let (x_min, x_max) = Self::year_bounds(result);
        let name = format!("{} cancer incidence", result.selection.site);

        Plot::new("incidence_line")
            .height(height)
            .legend(Legend::default())
            .allow_scroll(false)
            .include_x(x_min)
            .include_x(x_max)
            .include_y(0.0)
            .x_axis_label("Year")
            .y_axis_label("Incidence (persons)")
            .x_axis_formatter(|mark, _range| Self::year_formatter(mark))
            .show(ui, |plot_ui| {
                let points: Vec<[f64; 2]> = result
                    .incidence_series
                    .iter()
                    .map(|&(year, value)| [year as f64, value as f64])
                    .collect();

                plot_ui.line(
                    Line::new(PlotPoints::from_iter(points.iter().copied()))
                        .color(INCIDENCE_COLOR)
                        .width(4.0)
                        .name(&name),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from_iter(points.iter().copied()))
                        .radius(4.0)
                        .color(INCIDENCE_COLOR)
                        .name(&name),
                );
            });
    }

    /// Dotted price line per product, sharing the incidence chart's year range.
    pub fn draw_price_chart(ui: &mut egui::Ui, result: &PipelineResult, height: f32) {
        let (x_min, x_max) = Self::year_bounds(result);

        Plot::new("price_lines")
            .height(height)
            .legend(Legend::default())
            .allow_scroll(false)
            .include_x(x_min)
            .include_x(x_max)
            .x_axis_label("Year")
            .y_axis_label("Price (yen)")
            .x_axis_formatter(|mark, _range| Self::year_formatter(mark))
            .show(ui, |plot_ui| {
                for (i, series) in result.price_series.iter().enumerate() {
                    let color = Self::product_color(i);
                    let name = format!("{} price", series.product);
                    let points: Vec<[f64; 2]> = series
                        .points
                        .iter()
                        .map(|&(year, price)| [year as f64, price])
                        .collect();

                    plot_ui.line(
                        Line::new(PlotPoints::from_iter(points.iter().copied()))
                            .color(color)
                            .width(2.0)
                            .style(LineStyle::dotted_dense())
                            .name(&name),
                    );
                    plot_ui.points(
                        Points::new(PlotPoints::from_iter(points.iter().copied()))
                            .radius(3.0)
                            .color(color)
                            .name(&name),
                    );
                }
            });
    }

    /// Bar chart of summed incidence per year.
    pub fn draw_yearly_bar_chart(ui: &mut egui::Ui, result: &PipelineResult, height: f32) {
        let (x_min, x_max) = Self::year_bounds(result);

        let bars: Vec<Bar> = result
            .yearly_totals
            .iter()
            .map(|&(year, value)| {
                Bar::new(year as f64, value as f64)
                    .width(0.6)
                    .name(format!("{}: {}", year, format_thousands(value)))
            })
            .collect();

        Plot::new("yearly_bars")
            .height(height)
            .allow_scroll(false)
            .include_x(x_min)
            .include_x(x_max)
            .include_y(0.0)
            .x_axis_label("Year")
            .y_axis_label("Incidence (persons)")
            .x_axis_formatter(|mark, _range| Self::year_formatter(mark))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .color(INCIDENCE_COLOR)
                        .name("Incidence"),
                );
            });
    }

    /// Draw the joined table
    pub fn draw_joined_table(ui: &mut egui::Ui, result: &PipelineResult) {
        let gender = result.gender();

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::ScrollArea::vertical()
                    .max_height(260.0)
                    .show(ui, |ui| {
                        egui::Grid::new("joined_table")
                            .striped(true)
                            .min_col_width(70.0)
                            .spacing([8.0, 4.0])
                            .show(ui, |ui| {
                                for header in ["Year", "Product", "Price", "Site", gender.label()] {
                                    ui.label(RichText::new(header).strong().size(11.0));
                                }
                                ui.end_row();

                                for row in &result.joined {
                                    ui.label(RichText::new(row.year.to_string()).size(11.0));
                                    ui.label(RichText::new(&row.product).size(11.0));
                                    ui.label(RichText::new(format!("{:.1}", row.price)).size(11.0));
                                    ui.label(RichText::new(&row.site).size(11.0));
                                    ui.label(
                                        RichText::new(format_thousands(row.incidence(gender)))
                                            .size(11.0),
                                    );
                                    ui.end_row();
                                }
                            });
                    });
            });
    }
}
