//! CSV Data Loader Module
//! Loads the price and cancer incidence tables using Polars.

use crate::data::model::{
    canonical_column_name, CancerRecord, PriceRecord, CANCER_COLUMNS, INCIDENCE_FEMALE,
    INCIDENCE_MALE, INCIDENCE_TOTAL, PRICE, PRICE_COLUMNS, PRODUCT, SITE, YEAR,
};
use polars::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("CSV file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Column '{column}' missing from {table} table")]
    MissingColumn { table: &'static str, column: String },
}

/// Read-only source tables shared by every pipeline run.
#[derive(Debug, Clone)]
pub struct DataContext {
    prices: DataFrame,
    cancer: DataFrame,
}

impl DataContext {
    /// Validate and normalize raw tables.
    ///
    /// Headers are trimmed and mapped to canonical names, required columns are
    /// checked, and value columns are coerced to their numeric types.
    pub fn new(prices: DataFrame, cancer: DataFrame) -> Result<Self, LoaderError> {
        let prices = Self::prepare_prices(prices)?;
        let cancer = Self::prepare_cancer(cancer)?;
        Ok(Self { prices, cancer })
    }

    /// Build a context from in-memory records.
    pub fn from_records(
        prices: &[PriceRecord],
        cancer: &[CancerRecord],
    ) -> Result<Self, LoaderError> {
        let price_df = DataFrame::new(vec![
            Column::new(
                PRODUCT.into(),
                prices.iter().map(|r| r.product.clone()).collect::<Vec<_>>(),
            ),
            Column::new(YEAR.into(), prices.iter().map(|r| r.year).collect::<Vec<_>>()),
            Column::new(PRICE.into(), prices.iter().map(|r| r.price).collect::<Vec<_>>()),
        ])?;

        let cancer_df = DataFrame::new(vec![
            Column::new(
                SITE.into(),
                cancer.iter().map(|r| r.site.clone()).collect::<Vec<_>>(),
            ),
            Column::new(YEAR.into(), cancer.iter().map(|r| r.year).collect::<Vec<_>>()),
            Column::new(
                INCIDENCE_MALE.into(),
                cancer.iter().map(|r| r.incidence_male).collect::<Vec<_>>(),
            ),
            Column::new(
                INCIDENCE_FEMALE.into(),
                cancer.iter().map(|r| r.incidence_female).collect::<Vec<_>>(),
            ),
            Column::new(
                INCIDENCE_TOTAL.into(),
                cancer.iter().map(|r| r.incidence_total).collect::<Vec<_>>(),
            ),
        ])?;

        Self::new(price_df, cancer_df)
    }

    pub fn prices(&self) -> &DataFrame {
        &self.prices
    }

    pub fn cancer(&self) -> &DataFrame {
        &self.cancer
    }

    /// Distinct product names in order of first appearance.
    pub fn products(&self) -> Vec<String> {
        distinct_strings(&self.prices, PRODUCT)
    }

    /// Distinct cancer sites in order of first appearance.
    pub fn sites(&self) -> Vec<String> {
        distinct_strings(&self.cancer, SITE)
    }

    fn prepare_prices(mut df: DataFrame) -> Result<DataFrame, LoaderError> {
        canonicalize_headers(&mut df)?;
        require_columns(&df, "price", &PRICE_COLUMNS)?;

        let df = df
            .lazy()
            .select([
                col(PRODUCT).cast(DataType::String),
                col(YEAR).cast(DataType::Int64),
                col(PRICE).cast(DataType::Float64),
            ])
            .filter(col(YEAR).is_not_null())
            .collect()?;
        Ok(df)
    }

    fn prepare_cancer(mut df: DataFrame) -> Result<DataFrame, LoaderError> {
        canonicalize_headers(&mut df)?;
        require_columns(&df, "cancer", &CANCER_COLUMNS)?;

        let df = df
            .lazy()
            .select([
                col(SITE).cast(DataType::String),
                col(YEAR).cast(DataType::Int64),
                col(INCIDENCE_MALE).cast(DataType::Int64),
                col(INCIDENCE_FEMALE).cast(DataType::Int64),
                col(INCIDENCE_TOTAL).cast(DataType::Int64),
            ])
            .filter(col(YEAR).is_not_null())
            .collect()?;
        Ok(df)
    }
}

/// Loads the two source CSV files.
pub struct DataLoader;

impl DataLoader {
    /// Load both tables. The files are read concurrently.
    pub fn load(price_path: &Path, cancer_path: &Path) -> Result<DataContext, LoaderError> {
        let (prices, cancer) = rayon::join(
            || Self::read_csv(price_path),
            || Self::read_csv(cancer_path),
        );
        let context = DataContext::new(prices?, cancer?)?;

        info!(
            price_rows = context.prices().height(),
            cancer_rows = context.cancer().height(),
            products = context.products().len(),
            sites = context.sites().len(),
            "source tables loaded"
        );
        Ok(context)
    }

    /// Read a CSV file into a DataFrame without any normalization.
    pub fn read_csv(path: &Path) -> Result<DataFrame, LoaderError> {
        if !path.is_file() {
            return Err(LoaderError::NotFound(path.to_path_buf()));
        }

        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        debug!(path = %path.display(), rows = df.height(), "read csv");
        Ok(df)
    }
}

fn canonicalize_headers(df: &mut DataFrame) -> Result<(), LoaderError> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| canonical_column_name(name.as_str()))
        .collect();
    df.set_column_names(names)?;
    Ok(())
}

fn require_columns(df: &DataFrame, table: &'static str, columns: &[&str]) -> Result<(), LoaderError> {
    for column in columns {
        if df.get_column_index(column).is_none() {
            return Err(LoaderError::MissingColumn {
                table,
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

fn distinct_strings(df: &DataFrame, column: &str) -> Vec<String> {
    let Ok(values) = df.column(column).and_then(|c| c.str()) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    values
        .into_iter()
        .flatten()
        .filter(|v| seen.insert(v.to_string()))
        .map(|v| v.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, "{}", content).unwrap();
        tmp
    }

    #[test]
    fn test_load_trims_headers_and_maps_aliases() {
        let prices = write_csv(" product , year ,price \nCigarettes,2020,500\nBeer,2020,220.5\n");
        let cancer = write_csv(
            "部位,年,罹患数(男),罹患数(女),罹患数(総数)\nLung,2020,100,90,190\nStomach,2020,80,40,120\n",
        );

        let ctx = DataLoader::load(prices.path(), cancer.path()).unwrap();
        assert_eq!(ctx.prices().height(), 2);
        assert_eq!(ctx.products(), vec!["Cigarettes", "Beer"]);
        assert_eq!(ctx.sites(), vec!["Lung", "Stomach"]);
        assert!(ctx.cancer().column(INCIDENCE_TOTAL).is_ok());
        assert_eq!(ctx.prices().column(PRICE).unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn test_missing_column_is_reported() {
        let prices = write_csv("product,year\nA,2020\n");
        let cancer = write_csv("site,year,incidenceMale,incidenceFemale,incidenceTotal\nX,2020,1,1,2\n");

        let err = DataLoader::load(prices.path(), cancer.path()).unwrap_err();
        match err {
            LoaderError::MissingColumn { table, column } => {
                assert_eq!(table, "price");
                assert_eq!(column, "price");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_price_cell_becomes_null() {
        let prices = write_csv("product,year,price\nA,2020,10\nA,2021,abc\nA,2022,14\n");
        let cancer = write_csv("site,year,incidenceMale,incidenceFemale,incidenceTotal\nX,2020,1,1,2\n");

        let ctx = DataLoader::load(prices.path(), cancer.path()).unwrap();
        assert_eq!(ctx.prices().height(), 3);
        let price = ctx.prices().column(PRICE).unwrap().f64().unwrap();
        assert_eq!(price.get(0), Some(10.0));
        assert_eq!(price.get(1), None);
        assert_eq!(price.get(2), Some(14.0));
    }

    #[test]
    fn test_missing_file_is_reported() {
        let cancer = write_csv("site,year,incidenceMale,incidenceFemale,incidenceTotal\n");
        let err =
            DataLoader::load(Path::new("/nonexistent/maindata.csv"), cancer.path()).unwrap_err();
        assert!(matches!(err, LoaderError::NotFound(_)));
    }

    #[test]
    fn test_from_records_preserves_first_appearance_order() {
        let ctx = DataContext::from_records(
            &[
                PriceRecord::new("B", 2020, 1.0),
                PriceRecord::new("A", 2020, 2.0),
                PriceRecord::new("B", 2021, 3.0),
            ],
            &[CancerRecord::new("X", 2020, 1, 2, 3)],
        )
        .unwrap();
        assert_eq!(ctx.products(), vec!["B", "A"]);
        assert_eq!(ctx.sites(), vec!["X"]);
    }
}
