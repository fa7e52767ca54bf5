//! Stats module - filter and group-by aggregation

mod aggregator;

pub use aggregator::{
    AggregateError, AggregateSpec, Aggregation, Aggregator, RowOrder, Selection, ALL_SENTINEL,
};
