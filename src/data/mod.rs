//! Data module - CSV loading, cleaning and feature derivation

mod cleaner;
mod features;
mod loader;
mod processor;
pub mod schema;

pub use cleaner::{CleaningSummary, DataCleaner};
pub use features::FeatureDeriver;
pub use loader::{CustomerLoader, LoaderError};
pub use processor::{ProcessorError, Strictness};
pub(crate) use processor::{column_as_f64, column_as_strings};
