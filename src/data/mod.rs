//! Data module - CSV loading, filtering and missing-value handling

pub mod filter;
pub mod loader;
pub mod processor;

pub use filter::{apply_filters, distinct_values, FilterSet};
pub use loader::DataLoader;
pub use processor::{drop_missing, fill_missing, missing_summary, FillValue, MissingAction};
