//! Statistics Calculator Module
//! Trend scalars, trend classification and headline metric.

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Direction of price and incidence over the selected years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    BothRising,
    PriceRisingIncidenceFalling,
    NoClearTrend,
}

impl TrendDirection {
    /// Classify a pair of trend scalars. Missing values count as no trend.
    pub fn classify(price_trend: Option<f64>, incidence_trend: Option<f64>) -> Self {
        match (price_trend, incidence_trend) {
            (Some(p), Some(c)) if p > 0.0 && c > 0.0 => TrendDirection::BothRising,
            (Some(p), Some(c)) if p > 0.0 && c < 0.0 => {
                TrendDirection::PriceRisingIncidenceFalling
            }
            _ => TrendDirection::NoClearTrend,
        }
    }

    /// Narrative sentence shown under the headline metric.
    pub fn sentence(self) -> &'static str {
        match self {
            TrendDirection::BothRising => {
                "Both prices and cancer incidence show an upward trend."
            }
            TrendDirection::PriceRisingIncidenceFalling => {
                "Prices are rising while cancer incidence shows a downward trend."
            }
            TrendDirection::NoClearTrend => "No clear upward or downward trend was found.",
        }
    }
}

/// Trend scalars and their classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    pub price_trend: Option<f64>,
    pub incidence_trend: Option<f64>,
    pub direction: TrendDirection,
}

impl Default for TrendSummary {
    fn default() -> Self {
        Self {
            price_trend: None,
            incidence_trend: None,
            direction: TrendDirection::NoClearTrend,
        }
    }
}

/// Latest-year incidence surfaced as the headline metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headline {
    pub year: i64,
    pub value: i64,
}

/// Handles statistical calculations over yearly series.
pub struct StatsCalculator;

impl StatsCalculator {
    /// First differences of consecutive values.
    pub fn differences(values: &[f64]) -> Vec<f64> {
        values.windows(2).map(|w| w[1] - w[0]).collect()
    }

    /// Mean year-over-year difference. `None` with fewer than two points.
    pub fn trend(values: &[f64]) -> Option<f64> {
        let diffs: Vec<f64> = Self::differences(values)
            .into_iter()
            .filter(|d| !d.is_nan())
            .collect();
        if diffs.is_empty() {
            return None;
        }
        let mean = diffs.iter().mean();
        if mean.is_nan() {
            None
        } else {
            Some(mean)
        }
    }

    /// Trend scalars from per-year mean prices and per-year summed incidence.
    pub fn trend_summary(mean_price: &[(i64, f64)], incidence_sum: &[(i64, i64)]) -> TrendSummary {
        let prices: Vec<f64> = mean_price.iter().map(|&(_, p)| p).collect();
        let incidence: Vec<f64> = incidence_sum.iter().map(|&(_, v)| v as f64).collect();

        let price_trend = Self::trend(&prices);
        let incidence_trend = Self::trend(&incidence);

        TrendSummary {
            price_trend,
            incidence_trend,
            direction: TrendDirection::classify(price_trend, incidence_trend),
        }
    }

    /// Summed incidence at the latest year of a year-sorted series.
    pub fn headline(incidence_sum: &[(i64, i64)]) -> Option<Headline> {
        incidence_sum
            .iter()
            .max_by_key(|&&(year, _)| year)
            .map(|&(year, value)| Headline { year, value })
    }
}

/// Format an integer with thousands separators.
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if value < 0 {
        out.insert(0, '-');
    }
    out
}
