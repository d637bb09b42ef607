//! Stats module - Trend and headline statistics

mod calculator;

pub use calculator::{format_thousands, Headline, StatsCalculator, TrendDirection, TrendSummary};
