//! `report` command implementation.

use crate::charts::StaticChartRenderer;
use crate::cli::ReportArgs;
use crate::config::AppConfig;
use crate::data::{DataContext, DataLoader, Selection};
use crate::pipeline::{compute_pipeline, PipelineOutcome, PipelineResult};
use crate::stats::format_thousands;
use anyhow::{Context, Result};
use std::fmt::Write;
use tracing::{info, warn};

pub const SELECTION_PROMPT: &str = "Please select at least one product.";
const NOT_AVAILABLE: &str = "N/A";

/// Execute the `report` command
pub fn run_report(config: &AppConfig, args: &ReportArgs) -> Result<()> {
    let ctx = DataLoader::load(&config.data.price_csv, &config.data.cancer_csv)
        .context("Failed to load source tables")?;
    let text = build_report(&ctx, config, args)?;
    print!("{text}");
    Ok(())
}

/// Run the pipeline for `args` and format the output (text or JSON).
pub fn build_report(ctx: &DataContext, config: &AppConfig, args: &ReportArgs) -> Result<String> {
    let selection = Selection::new(args.products.iter().cloned(), &args.site, args.gender);

    let result = match compute_pipeline(ctx, &selection)? {
        PipelineOutcome::SelectionRequired => {
            warn!("report requested without products");
            return Ok(format!("{SELECTION_PROMPT}\n"));
        }
        PipelineOutcome::Ready(result) => result,
    };

    if let Some(png) = &args.png {
        StaticChartRenderer::render_png(&result, png, config.export.width, config.export.height)
            .with_context(|| format!("Failed to write {}", png.display()))?;
        info!(path = %png.display(), "chart exported");
    }

    if args.json {
        let mut json = serde_json::to_string_pretty(&result)?;
        json.push('\n');
        return Ok(json);
    }
    Ok(format_report(&result)?)
}

/// Plain-text rendering of the dashboard captions.
pub fn format_report(result: &PipelineResult) -> Result<String, std::fmt::Error> {
    let selection = &result.selection;
    let mut out = String::new();

    writeln!(out, "== Data overview ==")?;
    match result.summary {
        Some(summary) => {
            writeln!(out, "Years:    {} - {}", summary.min_year, summary.max_year)?;
            writeln!(out, "Records:  {}", summary.record_count)?;
        }
        None => {
            writeln!(out, "Years:    {NOT_AVAILABLE}")?;
            writeln!(out, "Records:  0 (no overlapping years)")?;
        }
    }
    writeln!(out, "Site:     {}", selection.site)?;
    writeln!(out, "Products: {}", selection.products.join(", "))?;
    writeln!(out, "Column:   {}", selection.gender.label())?;

    writeln!(out)?;
    writeln!(out, "== Incidence per year ==")?;
    for &(year, value) in &result.yearly_totals {
        writeln!(out, "{year}: {}", format_thousands(value))?;
    }

    writeln!(out)?;
    writeln!(out, "== Findings ==")?;
    match result.headline {
        Some(headline) => writeln!(
            out,
            "{} {} incidence: {} persons",
            headline.year,
            selection.site,
            format_thousands(headline.value)
        )?,
        None => writeln!(out, "Latest incidence: {NOT_AVAILABLE}")?,
    }
    writeln!(out, "{}", result.trend.direction.sentence())?;
    Ok(out)
}
