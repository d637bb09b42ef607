//! Data Processor Module
//! Filters both source tables, joins them on year and derives yearly aggregates.

use crate::data::model::{
    GenderColumn, JoinedRecord, Selection, INCIDENCE_FEMALE, INCIDENCE_MALE, INCIDENCE_TOTAL,
    PRICE, PRODUCT, SITE, YEAR,
};
use crate::data::DataContext;
use polars::prelude::*;

const PRICE_MEAN: &str = "price_mean";
const INCIDENCE_SUM: &str = "incidence_sum";

/// Per-year aggregates over the joined table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YearlyAggregates {
    /// (year, mean price across matched rows); NaN when every price is null
    pub mean_price: Vec<(i64, f64)>,
    /// (year, summed incidence across matched rows)
    pub incidence_sum: Vec<(i64, i64)>,
}

/// Handles filtering, joining and grouping of the source tables.
pub struct DataProcessor;

impl DataProcessor {
    /// Filter prices by product and cancer rows by site, then inner join on year.
    ///
    /// The result is sorted ascending by year, then by product.
    pub fn filter_and_join(
        ctx: &DataContext,
        selection: &Selection,
    ) -> Result<DataFrame, PolarsError> {
        let products = Series::new("products".into(), selection.products.clone());

        let prices = ctx
            .prices()
            .clone()
            .lazy()
            .filter(col(PRODUCT).is_in(lit(products)));

        let cancer = ctx
            .cancer()
            .clone()
            .lazy()
            .filter(col(SITE).eq(lit(selection.site.as_str())));

        prices
            .inner_join(cancer, col(YEAR), col(YEAR))
            .sort(
                [YEAR, PRODUCT],
                SortMultipleOptions::default().with_maintain_order(true),
            )
            .collect()
    }

    /// Convert the joined frame into typed rows.
    pub fn to_records(df: &DataFrame) -> Result<Vec<JoinedRecord>, PolarsError> {
        let product = df.column(PRODUCT)?.str()?;
        let year = df.column(YEAR)?.i64()?;
        let price = df.column(PRICE)?.f64()?;
        let site = df.column(SITE)?.str()?;
        let male = df.column(INCIDENCE_MALE)?.i64()?;
        let female = df.column(INCIDENCE_FEMALE)?.i64()?;
        let total = df.column(INCIDENCE_TOTAL)?.i64()?;

        let mut rows = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            if let (Some(p), Some(y), Some(site)) = (product.get(i), year.get(i), site.get(i)) {
                rows.push(JoinedRecord {
                    product: p.to_string(),
                    year: y,
                    price: price.get(i).unwrap_or(f64::NAN),
                    site: site.to_string(),
                    incidence_male: male.get(i).unwrap_or(0),
                    incidence_female: female.get(i).unwrap_or(0),
                    incidence_total: total.get(i).unwrap_or(0),
                });
            }
        }
        Ok(rows)
    }

    /// Group the joined frame by year: mean price and summed incidence.
    ///
    /// The incidence value repeats once per matched product in a year, so the
    /// sum scales with the number of products selected for that year.
    pub fn yearly_aggregates(
        df: &DataFrame,
        gender: GenderColumn,
    ) -> Result<YearlyAggregates, PolarsError> {
        if df.height() == 0 {
            return Ok(YearlyAggregates::default());
        }

        let grouped = df
            .clone()
            .lazy()
            .group_by([col(YEAR)])
            .agg([
                col(PRICE).mean().alias(PRICE_MEAN),
                col(gender.column_name())
                    .sum()
                    .cast(DataType::Int64)
                    .alias(INCIDENCE_SUM),
            ])
            .sort([YEAR], SortMultipleOptions::default())
            .collect()?;

        let years = grouped.column(YEAR)?.i64()?;
        let means = grouped.column(PRICE_MEAN)?.f64()?;
        let sums = grouped.column(INCIDENCE_SUM)?.i64()?;

        let mut aggregates = YearlyAggregates::default();
        for i in 0..grouped.height() {
            let Some(year) = years.get(i) else {
                continue;
            };
            aggregates
                .mean_price
                .push((year, means.get(i).unwrap_or(f64::NAN)));
            aggregates
                .incidence_sum
                .push((year, sums.get(i).unwrap_or(0)));
        }

        Ok(aggregates)
    }

    /// Distinct products in the joined rows, in order of first appearance.
    pub fn joined_products(rows: &[JoinedRecord]) -> Vec<String> {
        let mut products: Vec<String> = Vec::new();
        for row in rows {
            if !products.contains(&row.product) {
                products.push(row.product.clone());
            }
        }
        products
    }
}
