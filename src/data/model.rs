//! Record types and column names shared by the loader and the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const PRODUCT: &str = "product";
pub const YEAR: &str = "year";
pub const PRICE: &str = "price";
pub const SITE: &str = "site";
pub const INCIDENCE_MALE: &str = "incidenceMale";
pub const INCIDENCE_FEMALE: &str = "incidenceFemale";
pub const INCIDENCE_TOTAL: &str = "incidenceTotal";

/// Required columns of the price table.
pub const PRICE_COLUMNS: [&str; 3] = [PRODUCT, YEAR, PRICE];

/// Required columns of the cancer incidence table.
pub const CANCER_COLUMNS: [&str; 5] = [
    SITE,
    YEAR,
    INCIDENCE_MALE,
    INCIDENCE_FEMALE,
    INCIDENCE_TOTAL,
];

/// Header aliases found in the e-Stat exports.
const HEADER_ALIASES: [(&str, &str); 5] = [
    ("年", YEAR),
    ("部位", SITE),
    ("罹患数(男)", INCIDENCE_MALE),
    ("罹患数(女)", INCIDENCE_FEMALE),
    ("罹患数(総数)", INCIDENCE_TOTAL),
];

/// Map a raw CSV header to its canonical column name.
pub fn canonical_column_name(raw: &str) -> String {
    let trimmed = raw.trim();
    HEADER_ALIASES
        .iter()
        .find(|(alias, _)| *alias == trimmed)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// One retail price observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    pub product: String,
    pub year: i64,
    pub price: f64,
}

impl PriceRecord {
    pub fn new(product: impl Into<String>, year: i64, price: f64) -> Self {
        Self {
            product: product.into(),
            year,
            price,
        }
    }
}

/// Cancer incidence counts for one site in one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancerRecord {
    pub site: String,
    pub year: i64,
    pub incidence_male: i64,
    pub incidence_female: i64,
    pub incidence_total: i64,
}

impl CancerRecord {
    pub fn new(site: impl Into<String>, year: i64, male: i64, female: i64, total: i64) -> Self {
        Self {
            site: site.into(),
            year,
            incidence_male: male,
            incidence_female: female,
            incidence_total: total,
        }
    }
}

/// A row of the price ⋈ cancer inner join on `year`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinedRecord {
    pub product: String,
    pub year: i64,
    pub price: f64,
    pub site: String,
    pub incidence_male: i64,
    pub incidence_female: i64,
    pub incidence_total: i64,
}

impl JoinedRecord {
    /// Incidence value for the chosen gender column.
    pub fn incidence(&self, gender: GenderColumn) -> i64 {
        match gender {
            GenderColumn::Male => self.incidence_male,
            GenderColumn::Female => self.incidence_female,
            GenderColumn::Total => self.incidence_total,
        }
    }
}

/// Which incidence column drives the charts and statistics.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum GenderColumn {
    Male,
    Female,
    #[default]
    Total,
}

impl GenderColumn {
    pub const ALL: [GenderColumn; 3] = [
        GenderColumn::Male,
        GenderColumn::Female,
        GenderColumn::Total,
    ];

    /// Column name in the cancer table.
    pub fn column_name(self) -> &'static str {
        match self {
            GenderColumn::Male => INCIDENCE_MALE,
            GenderColumn::Female => INCIDENCE_FEMALE,
            GenderColumn::Total => INCIDENCE_TOTAL,
        }
    }

    /// Human readable label for widgets and chart legends.
    pub fn label(self) -> &'static str {
        match self {
            GenderColumn::Male => "Incidence (male)",
            GenderColumn::Female => "Incidence (female)",
            GenderColumn::Total => "Incidence (total)",
        }
    }
}

impl fmt::Display for GenderColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// User selection driving one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub products: Vec<String>,
    pub site: String,
    pub gender: GenderColumn,
}

impl Selection {
    /// Build a selection; repeated product names keep their first position.
    pub fn new<I, S>(products: I, site: impl Into<String>, gender: GenderColumn) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for product in products {
            let product = product.into();
            if !unique.contains(&product) {
                unique.push(product);
            }
        }

        Self {
            products: unique,
            site: site.into(),
            gender,
        }
    }

    pub fn has_products(&self) -> bool {
        !self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_column_name_trims_and_maps_aliases() {
        assert_eq!(canonical_column_name("  price "), "price");
        assert_eq!(canonical_column_name("年"), "year");
        assert_eq!(canonical_column_name(" 罹患数(総数)"), "incidenceTotal");
        assert_eq!(canonical_column_name("other"), "other");
    }

    #[test]
    fn test_gender_column_names() {
        assert_eq!(GenderColumn::Male.column_name(), "incidenceMale");
        assert_eq!(GenderColumn::Female.column_name(), "incidenceFemale");
        assert_eq!(GenderColumn::default(), GenderColumn::Total);
    }

    #[test]
    fn test_selection_dedups_products() {
        let sel = Selection::new(["B", "A", "B"], "Lung", GenderColumn::Total);
        assert_eq!(sel.products, vec!["B".to_string(), "A".to_string()]);
        assert!(sel.has_products());
        assert!(!Selection::default().has_products());
    }

    #[test]
    fn test_joined_record_incidence_by_gender() {
        let row = JoinedRecord {
            product: "A".into(),
            year: 2020,
            price: 10.0,
            site: "X".into(),
            incidence_male: 100,
            incidence_female: 90,
            incidence_total: 190,
        };
        assert_eq!(row.incidence(GenderColumn::Male), 100);
        assert_eq!(row.incidence(GenderColumn::Female), 90);
        assert_eq!(row.incidence(GenderColumn::Total), 190);
    }
}
