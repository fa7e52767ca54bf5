//! Data module - snapshot loading and reshaping

mod catalog;
mod loader;
mod processor;

pub use catalog::{DatasetId, DatasetSpec, CATALOG};
pub use loader::{column_names, unique_values, LoaderError};
pub use processor::{DataProcessor, MovementColumns, ProcessorError};
