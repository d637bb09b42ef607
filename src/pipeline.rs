//! Filter-join-aggregate pipeline.
//!
//! `compute_pipeline` is a pure function of the read-only [`DataContext`] and
//! the user's [`Selection`]. It is re-run from scratch on every interaction.

use crate::data::{
    DataContext, DataProcessor, GenderColumn, JoinedRecord, Selection, YearlyAggregates,
};
use crate::stats::{Headline, StatsCalculator, TrendSummary};
use polars::prelude::PolarsError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Result of one pipeline invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    /// No product was selected; nothing was computed.
    SelectionRequired,
    Ready(PipelineResult),
}

/// Year range and row count of the joined table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub min_year: i64,
    pub max_year: i64,
    pub record_count: usize,
}

/// Price over time for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSeries {
    pub product: String,
    pub points: Vec<(i64, f64)>,
}

/// Everything the charts and captions need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    pub selection: Selection,
    /// Joined rows sorted ascending by year.
    pub joined: Vec<JoinedRecord>,
    /// `None` when the join produced no rows.
    pub summary: Option<Summary>,
    pub price_series: Vec<ProductSeries>,
    /// Incidence of the selected site, one point per year.
    pub incidence_series: Vec<(i64, i64)>,
    /// Incidence summed over joined rows per year (one term per matched product).
    pub yearly_totals: Vec<(i64, i64)>,
    /// Mean price per year across matched products.
    pub yearly_mean_price: Vec<(i64, f64)>,
    pub trend: TrendSummary,
    pub headline: Option<Headline>,
}

impl PipelineResult {
    pub fn is_empty(&self) -> bool {
        self.joined.is_empty()
    }

    pub fn gender(&self) -> GenderColumn {
        self.selection.gender
    }
}

/// Run the filter-join-aggregate pipeline for one selection.
pub fn compute_pipeline(
    ctx: &DataContext,
    selection: &Selection,
) -> Result<PipelineOutcome, PipelineError> {
    if !selection.has_products() {
        debug!("no product selected, skipping pipeline");
        return Ok(PipelineOutcome::SelectionRequired);
    }

    let joined_df = DataProcessor::filter_and_join(ctx, selection)?;
    let joined = DataProcessor::to_records(&joined_df)?;
    let YearlyAggregates {
        mean_price,
        incidence_sum,
    } = DataProcessor::yearly_aggregates(&joined_df, selection.gender)?;

    let summary = match (joined.first(), joined.last()) {
        (Some(first), Some(last)) => Some(Summary {
            min_year: first.year,
            max_year: last.year,
            record_count: joined.len(),
        }),
        _ => None,
    };

    let price_series = DataProcessor::joined_products(&joined)
        .into_iter()
        .map(|product| ProductSeries {
            points: joined
                .iter()
                .filter(|r| r.product == product)
                .map(|r| (r.year, r.price))
                .collect(),
            product,
        })
        .collect();

    let mut incidence_series: Vec<(i64, i64)> = Vec::new();
    for row in &joined {
        if incidence_series.last().map(|&(year, _)| year) != Some(row.year) {
            incidence_series.push((row.year, row.incidence(selection.gender)));
        }
    }

    let trend = StatsCalculator::trend_summary(&mean_price, &incidence_sum);
    let headline = StatsCalculator::headline(&incidence_sum);

    debug!(
        products = selection.products.len(),
        site = %selection.site,
        gender = ?selection.gender,
        rows = joined.len(),
        direction = ?trend.direction,
        "pipeline computed"
    );

    Ok(PipelineOutcome::Ready(PipelineResult {
        selection: selection.clone(),
        joined,
        summary,
        price_series,
        incidence_series,
        yearly_totals: incidence_sum,
        yearly_mean_price: mean_price,
        trend,
        headline,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CancerRecord, PriceRecord};
    use crate::stats::TrendDirection;

    fn context() -> DataContext {
        DataContext::from_records(
            &[
                PriceRecord::new("A", 2020, 10.0),
                PriceRecord::new("A", 2021, 12.0),
                PriceRecord::new("B", 2020, 20.0),
                PriceRecord::new("B", 2021, 18.0),
            ],
            &[
                CancerRecord::new("X", 2020, 100, 90, 190),
                CancerRecord::new("X", 2021, 110, 95, 205),
                CancerRecord::new("Y", 2021, 50, 60, 110),
            ],
        )
        .unwrap()
    }

    fn ready(outcome: PipelineOutcome) -> PipelineResult {
        match outcome {
            PipelineOutcome::Ready(result) => result,
            PipelineOutcome::SelectionRequired => panic!("expected a result"),
        }
    }

    #[test]
    fn test_two_products_double_count_yearly_totals() {
        let ctx = context();
        let selection = Selection::new(["A", "B"], "X", GenderColumn::Total);
        let result = ready(compute_pipeline(&ctx, &selection).unwrap());

        assert_eq!(result.joined.len(), 4);
        assert_eq!(result.yearly_totals, vec![(2020, 380), (2021, 410)]);
        assert_eq!(
            result.headline,
            Some(Headline {
                year: 2021,
                value: 410
            })
        );
        assert_eq!(
            result.summary,
            Some(Summary {
                min_year: 2020,
                max_year: 2021,
                record_count: 4
            })
        );
    }

    #[test]
    fn test_single_product_no_double_count() {
        let ctx = context();
        let selection = Selection::new(["A"], "X", GenderColumn::Total);
        let result = ready(compute_pipeline(&ctx, &selection).unwrap());

        assert_eq!(result.yearly_totals, vec![(2020, 190), (2021, 205)]);
        assert_eq!(result.trend.direction, TrendDirection::BothRising);
    }

    #[test]
    fn test_incidence_series_dedup_by_year() {
        let ctx = context();
        let selection = Selection::new(["A", "B"], "X", GenderColumn::Female);
        let result = ready(compute_pipeline(&ctx, &selection).unwrap());

        assert_eq!(result.incidence_series, vec![(2020, 90), (2021, 95)]);
        assert_eq!(result.price_series.len(), 2);
        for series in &result.price_series {
            assert_eq!(series.points.len(), 2);
        }
    }

    #[test]
    fn test_flat_mean_price_is_no_clear_trend() {
        let ctx = context();
        let selection = Selection::new(["A", "B"], "X", GenderColumn::Total);
        let result = ready(compute_pipeline(&ctx, &selection).unwrap());

        // mean price is 15.0 in both years
        assert_eq!(result.trend.price_trend, Some(0.0));
        assert_eq!(result.trend.direction, TrendDirection::NoClearTrend);
    }

    #[test]
    fn test_empty_selection_requires_selection() {
        let ctx = context();
        let selection = Selection::new(Vec::<String>::new(), "X", GenderColumn::Total);
        assert_eq!(
            compute_pipeline(&ctx, &selection).unwrap(),
            PipelineOutcome::SelectionRequired
        );
    }

    #[test]
    fn test_no_overlap_reports_not_available() {
        let ctx = DataContext::from_records(
            &[PriceRecord::new("A", 2010, 10.0)],
            &[CancerRecord::new("X", 2020, 100, 90, 190)],
        )
        .unwrap();
        let selection = Selection::new(["A"], "X", GenderColumn::Total);
        let result = ready(compute_pipeline(&ctx, &selection).unwrap());

        assert!(result.is_empty());
        assert_eq!(result.summary, None);
        assert_eq!(result.headline, None);
        assert!(result.yearly_totals.is_empty());
        assert_eq!(result.trend.direction, TrendDirection::NoClearTrend);
    }

    #[test]
    fn test_single_year_has_no_trend() {
        let ctx = context();
        let selection = Selection::new(["A"], "Y", GenderColumn::Total);
        let result = ready(compute_pipeline(&ctx, &selection).unwrap());

        assert_eq!(result.joined.len(), 1);
        assert_eq!(result.trend.price_trend, None);
        assert_eq!(result.trend.direction, TrendDirection::NoClearTrend);
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let ctx = context();
        let selection = Selection::new(["B", "A"], "X", GenderColumn::Male);
        let first = compute_pipeline(&ctx, &selection).unwrap();
        let second = compute_pipeline(&ctx, &selection).unwrap();
        assert_eq!(first, second);
    }
}
