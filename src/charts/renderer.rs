//! Static Chart Renderer
//! Draws the dashboard charts to a PNG file with plotters.
//!
//! Layout:
//! 1. Title: "{site} incidence vs. {products} prices"
//! 2. Dual-axis line chart: incidence on the left axis, product prices on the right
//! 3. Bar chart of summed incidence per year

use crate::pipeline::PipelineResult;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;
use tracing::info;

const INCIDENCE_COLOR: RGBColor = RGBColor(52, 152, 219);

const PALETTE: [RGBColor; 10] = [
    RGBColor(231, 76, 60),
    RGBColor(46, 204, 113),
    RGBColor(155, 89, 182),
    RGBColor(243, 156, 18),
    RGBColor(26, 188, 156),
    RGBColor(233, 30, 99),
    RGBColor(0, 188, 212),
    RGBColor(255, 87, 34),
    RGBColor(121, 85, 72),
    RGBColor(96, 125, 139),
];

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Nothing to render: the selection has no overlapping years")]
    EmptyResult,
    #[error("Drawing failed: {0}")]
    Draw(String),
}

fn draw_err<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Draw(e.to_string())
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render the line and bar charts for `result` into a PNG at `path`.
    pub fn render_png(
        result: &PipelineResult,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        let Some(summary) = result.summary else {
            return Err(RenderError::EmptyResult);
        };

        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let title = Self::title(result);
        let root = root
            .titled(&title, ("sans-serif", 26))
            .map_err(draw_err)?;
        let (upper, lower) = root.split_vertically((height as f64 * 0.55) as u32);

        let x_range = (summary.min_year as f64 - 0.5)..(summary.max_year as f64 + 0.5);
        let (inc_max, price_min, price_max) = Self::value_ranges(result);

        // Line chart with a secondary price axis
        let mut chart = ChartBuilder::on(&upper)
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .right_y_label_area_size(70)
            .build_cartesian_2d(x_range.clone(), 0f64..inc_max)
            .map_err(draw_err)?
            .set_secondary_coord(x_range.clone(), price_min..price_max);

        chart
            .configure_mesh()
            .x_desc("Year")
            .y_desc("Incidence (persons)")
            .x_label_formatter(&|v| format!("{:.0}", v))
            .draw()
            .map_err(draw_err)?;
        chart
            .configure_secondary_axes()
            .y_desc("Price (yen)")
            .draw()
            .map_err(draw_err)?;

        let incidence: Vec<(f64, f64)> = result
            .incidence_series
            .iter()
            .map(|&(year, value)| (year as f64, value as f64))
            .collect();
        chart
            .draw_series(LineSeries::new(
                incidence.iter().copied(),
                INCIDENCE_COLOR.stroke_width(4),
            ))
            .map_err(draw_err)?
            .label(format!("{} incidence", result.selection.site))
            .legend(|(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], INCIDENCE_COLOR.stroke_width(4))
            });
        chart
            .draw_series(
                incidence
                    .iter()
                    .map(|&p| Circle::new(p, 4, INCIDENCE_COLOR.filled())),
            )
            .map_err(draw_err)?;

        for (i, series) in result.price_series.iter().enumerate() {
            let color = PALETTE[i % PALETTE.len()];
            let points: Vec<(f64, f64)> = series
                .points
                .iter()
                .map(|&(year, price)| (year as f64, price))
                .collect();

            chart
                .draw_secondary_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))
                .map_err(draw_err)?
                .label(format!("{} price", series.product))
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });
            chart
                .draw_secondary_series(points.iter().map(|&p| Circle::new(p, 3, color.filled())))
                .map_err(draw_err)?;
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.85))
            .border_style(BLACK)
            .position(SeriesLabelPosition::UpperLeft)
            .draw()
            .map_err(draw_err)?;

        // Yearly bar chart
        let bar_max = result
            .yearly_totals
            .iter()
            .map(|&(_, v)| v as f64)
            .fold(0.0, f64::max)
            .max(1.0)
            * 1.1;

        let mut bars = ChartBuilder::on(&lower)
            .margin(15)
            .caption("Cancer incidence per year", ("sans-serif", 20))
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(x_range, 0f64..bar_max)
            .map_err(draw_err)?;

        bars.configure_mesh()
            .x_desc("Year")
            .y_desc("Incidence (persons)")
            .x_label_formatter(&|v| format!("{:.0}", v))
            .draw()
            .map_err(draw_err)?;

        bars.draw_series(result.yearly_totals.iter().map(|&(year, value)| {
            let x = year as f64;
            Rectangle::new([(x - 0.3, 0.0), (x + 0.3, value as f64)], INCIDENCE_COLOR.filled())
        }))
        .map_err(draw_err)?;

        root.present().map_err(draw_err)?;
        info!(path = %path.display(), width, height, "chart image written");
        Ok(())
    }

    fn title(result: &PipelineResult) -> String {
        format!(
            "{} incidence vs. {} prices",
            result.selection.site,
            result.selection.products.join(" / ")
        )
    }

    /// (incidence axis max, price axis min, price axis max) with padding.
    fn value_ranges(result: &PipelineResult) -> (f64, f64, f64) {
        let inc_max = result
            .incidence_series
            .iter()
            .map(|&(_, v)| v as f64)
            .fold(0.0, f64::max)
            .max(1.0)
            * 1.15;

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for series in &result.price_series {
            for &(_, p) in &series.points {
                if !p.is_nan() {
                    min = min.min(p);
                    max = max.max(p);
                }
            }
        }
        if min.is_infinite() {
            return (inc_max, 0.0, 1.0);
        }
        let pad = ((max - min) * 0.15).max(1.0);
        (inc_max, (min - pad).max(0.0), max + pad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{GenderColumn, Selection};
    use crate::pipeline::{ProductSeries, Summary};
    use crate::stats::TrendSummary;

    fn result(summary: Option<Summary>) -> PipelineResult {
        PipelineResult {
            selection: Selection::new(["A"], "X", GenderColumn::Total),
            joined: Vec::new(),
            summary,
            price_series: vec![ProductSeries {
                product: "A".into(),
                points: vec![(2020, 10.0), (2021, 20.0)],
            }],
            incidence_series: vec![(2020, 100), (2021, 200)],
            yearly_totals: vec![(2020, 100), (2021, 200)],
            yearly_mean_price: vec![(2020, 10.0), (2021, 20.0)],
            trend: TrendSummary::default(),
            headline: None,
        }
    }

    #[test]
    fn test_empty_result_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");
        let err = StaticChartRenderer::render_png(&result(None), &path, 800, 600).unwrap_err();
        assert!(matches!(err, RenderError::EmptyResult));
        assert!(!path.exists());
    }

    #[test]
    fn test_render_png_writes_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");
        let summary = Summary {
            min_year: 2020,
            max_year: 2021,
            record_count: 2,
        };

        match StaticChartRenderer::render_png(&result(Some(summary)), &path, 800, 600) {
            Ok(()) => {
                let size = std::fs::metadata(&path).unwrap().len();
                assert!(size > 0);
            }
            // Hosts without any system font cannot draw text.
            Err(RenderError::Draw(msg)) => eprintln!("skipping, no font available: {msg}"),
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_value_ranges_pad_prices() {
        let (inc_max, lo, hi) = StaticChartRenderer::value_ranges(&result(None));
        assert!((inc_max - 230.0).abs() < 1e-9);
        assert!((lo - 8.5).abs() < 1e-9);
        assert!((hi - 21.5).abs() < 1e-9);
    }

    #[test]
    fn test_title_lists_products() {
        let mut r = result(None);
        r.selection = Selection::new(["Beer", "Sake"], "Liver", GenderColumn::Male);
        assert_eq!(
            StaticChartRenderer::title(&r),
            "Liver incidence vs. Beer / Sake prices"
        );
    }
}
