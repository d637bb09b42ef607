//! Price vs. Cancer Incidence Viewer
//!
//! Joins tobacco/alcohol retail prices with cancer incidence counts by year
//! and derives the series and statistics shown in the viewer.

pub mod charts;
pub mod cli;
pub mod config;
pub mod data;
pub mod gui;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod stats;

pub use data::{DataContext, DataLoader, GenderColumn, Selection};
pub use pipeline::{compute_pipeline, PipelineError, PipelineOutcome, PipelineResult};
