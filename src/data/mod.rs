//! Data module - CSV loading, record types and table processing

mod loader;
mod model;
mod processor;

pub use loader::{DataContext, DataLoader, LoaderError};
pub use model::{
    canonical_column_name, CancerRecord, GenderColumn, JoinedRecord, PriceRecord, Selection,
};
pub use processor::{DataProcessor, YearlyAggregates};
