//! Statistics Aggregator Module
//! Filter-then-aggregate over a loaded table: one row per grouping value.

use polars::prelude::*;
use thiserror::Error;
use tracing::debug;

/// Dropdown value meaning "no filter".
pub const ALL_SENTINEL: &str = "Todos";

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Aggregation requires at least one grouping column")]
    MissingGroupColumns,
}

/// Current value of a categorical filter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    /// Interpret a raw dropdown value; the sentinel selects everything.
    pub fn from_input(value: &str) -> Self {
        if value == ALL_SENTINEL {
            Selection::All
        } else {
            Selection::Only(value.to_string())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    Sum,
    Mean,
}

/// Row ordering of an aggregated table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOrder {
    /// Ascending by grouping key(s), for time axes.
    ByKey,
    /// Ascending by measure, for horizontal ranking bars.
    ByMeasure,
}

/// What a filterable chart computes from its table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateSpec {
    pub filter_column: Option<String>,
    pub group_by: Vec<String>,
    pub measure: String,
    pub aggregation: Aggregation,
    pub order: RowOrder,
}

impl AggregateSpec {
    pub fn new(group_by: &[&str], measure: &str, aggregation: Aggregation) -> Self {
        Self {
            filter_column: None,
            group_by: group_by.iter().map(|s| s.to_string()).collect(),
            measure: measure.to_string(),
            aggregation,
            order: RowOrder::ByKey,
        }
    }

    pub fn filtered_by(mut self, column: &str) -> Self {
        self.filter_column = Some(column.to_string());
        self
    }

    pub fn ordered(mut self, order: RowOrder) -> Self {
        self.order = order;
        self
    }
}

/// Handles filter and group-by aggregation.
pub struct Aggregator;

impl Aggregator {
    /// Restrict `df` to rows whose `column` equals the selected value.
    ///
    /// Values are compared on their text form so that a year picked from a
    /// dropdown ("2021") matches an integer column.
    pub fn apply_selection(
        df: &DataFrame,
        column: &str,
        selection: &Selection,
    ) -> Result<DataFrame, AggregateError> {
        match selection {
            Selection::All => Ok(df.clone()),
            Selection::Only(value) => {
                let filtered = df
                    .clone()
                    .lazy()
                    .filter(col(column).cast(DataType::String).eq(lit(value.as_str())))
                    .collect()?;
                Ok(filtered)
            }
        }
    }

    /// Filter, then group and aggregate one measure.
    ///
    /// Output columns: the grouping columns followed by the measure. Grouping
    /// values absent after filtering do not appear.
    pub fn filter_then_aggregate(
        df: &DataFrame,
        spec: &AggregateSpec,
        selection: &Selection,
    ) -> Result<DataFrame, AggregateError> {
        if spec.group_by.is_empty() {
            return Err(AggregateError::MissingGroupColumns);
        }

        let filtered = match &spec.filter_column {
            Some(column) => Self::apply_selection(df, column, selection)?,
            None => df.clone(),
        };

        let keys: Vec<Expr> = spec.group_by.iter().map(|k| col(k.as_str())).collect();
        // Rows with a null grouping value belong to no group.
        let keys_present = keys
            .iter()
            .map(|k| k.clone().is_not_null())
            .reduce(|a, b| a.and(b))
            .unwrap_or_else(|| lit(true));
        let measure = col(spec.measure.as_str());
        let measure = match spec.aggregation {
            Aggregation::Sum => measure.sum(),
            Aggregation::Mean => measure.mean(),
        };

        let mut sort_by: Vec<String> = Vec::with_capacity(spec.group_by.len() + 1);
        if spec.order == RowOrder::ByMeasure {
            sort_by.push(spec.measure.clone());
        }
        sort_by.extend(spec.group_by.iter().cloned());

        let result = filtered
            .lazy()
            .filter(keys_present)
            .group_by(keys)
            .agg([measure])
            .sort(sort_by, SortMultipleOptions::default())
            .collect()?;

        debug!(
            measure = %spec.measure,
            selection = ?selection,
            rows = result.height(),
            "aggregated"
        );
        Ok(result)
    }
}
