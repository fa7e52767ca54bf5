//! Data Processor Module
//! Handles the admissions/separations reshaping and the wide-to-long stack.

use polars::prelude::*;
use thiserror::Error;
use tracing::debug;

/// Series label for hirings in the reshaped table.
pub const ADMISSIONS: &str = "admissoes";
/// Series label for separations in the reshaped table.
pub const SEPARATIONS: &str = "desligamentos";
/// Series column of the reshaped table.
pub const SERIES_COL: &str = "tipo";
/// Value column of the reshaped table.
pub const VALUE_COL: &str = "valor";

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Stack requires at least one value column")]
    MissingValueColumns,
}

/// Column names of a movement table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementColumns {
    pub month: String,
    pub indicator: String,
}

impl Default for MovementColumns {
    fn default() -> Self {
        Self {
            month: "mes".to_string(),
            indicator: "saldomovimentacao".to_string(),
        }
    }
}

/// Handles data transformation operations.
pub struct DataProcessor;

impl DataProcessor {
    /// Transform wide data to long format (stack operation).
    ///
    /// Output columns: [id_col, variable_name, value_name], ordered by
    /// id then by position of the value column in `value_cols`.
    pub fn stack_to_long(
        df: &DataFrame,
        id_col: &str,
        value_cols: &[&str],
        variable_name: &str,
        value_name: &str,
    ) -> Result<DataFrame, ProcessorError> {
        if value_cols.is_empty() {
            return Err(ProcessorError::MissingValueColumns);
        }

        let parts: Vec<LazyFrame> = value_cols
            .iter()
            .enumerate()
            .map(|(position, value_col)| {
                df.clone()
                    .lazy()
                    .select([col(id_col), col(*value_col).alias(value_name)])
                    .with_columns([
                        lit(*value_col).alias(variable_name),
                        lit(position as u32).alias("__position"),
                    ])
            })
            .collect();

        let long = concat(parts, UnionArgs::default())?
            .sort(
                [id_col, "__position"],
                SortMultipleOptions::default().with_maintain_order(true),
            )
            .select([col(id_col), col(variable_name), col(value_name)])
            .collect()?;

        Ok(long)
    }

    /// Reshape a movement table into per-month admissions and separations
    /// counts in long format: [month, "tipo", "valor"].
    ///
    /// Months present in only one of the two partitions are dropped (inner
    /// join), so every month in the output carries both series. Separation
    /// totals are reported as positive counts.
    pub fn admissions_separations(
        df: &DataFrame,
        columns: &MovementColumns,
    ) -> Result<DataFrame, ProcessorError> {
        let month = columns.month.as_str();
        let indicator = columns.indicator.as_str();
        let movements = df
            .clone()
            .lazy()
            .select([
                col(month).strict_cast(DataType::Int64),
                col(indicator).strict_cast(DataType::Int64),
            ]);

        let per_month = |flag: i64, name: &str| {
            movements
                .clone()
                .filter(col(indicator).eq(lit(flag)))
                .group_by([col(month)])
                .agg([col(indicator).sum().alias(name)])
        };
        let admissions = per_month(1, ADMISSIONS);
        let separations = per_month(-1, SEPARATIONS);

        let wide = admissions
            .join(
                separations,
                [col(month)],
                [col(month)],
                JoinArgs::new(JoinType::Inner),
            )
            .with_column(col(SEPARATIONS).abs())
            .sort([month], SortMultipleOptions::default())
            .collect()?;

        debug!(months = wide.height(), "admissions/separations joined");

        if wide.height() == 0 {
            return Ok(DataFrame::new(vec![
                Column::new_empty(month.into(), &DataType::Int64),
                Column::new_empty(SERIES_COL.into(), &DataType::String),
                Column::new_empty(VALUE_COL.into(), &DataType::Int64),
            ])?);
        }

        Self::stack_to_long(&wide, month, &[ADMISSIONS, SEPARATIONS], SERIES_COL, VALUE_COL)
    }
}
