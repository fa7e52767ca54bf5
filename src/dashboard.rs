//! Dashboard Module
//! Immutable loaded datasets plus the dispatcher that turns one filter
//! interaction into one recomputed chart table.

use crate::charts::{ChartBinding, ChartHandler, ChartTable, OptionOrder};
use crate::data::{
    unique_values, DataProcessor, DatasetId, DatasetSpec, LoaderError, ProcessorError,
};
use crate::stats::{AggregateError, Aggregator, Selection, ALL_SENTINEL};
use polars::prelude::*;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Unknown filter input: {0}")]
    UnknownInput(String),
    #[error("Unknown chart: {0}")]
    UnknownChart(String),
    #[error("Chart {0} has no filter input")]
    NotFilterable(String),
    #[error("Dataset not loaded: {0}")]
    MissingDataset(DatasetId),
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
    #[error(transparent)]
    Processor(#[from] ProcessorError),
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Every dataset, loaded once at startup and never mutated.
#[derive(Debug, Clone, Default)]
pub struct DashboardContext {
    datasets: BTreeMap<DatasetId, DataFrame>,
}

impl DashboardContext {
    /// Load every catalog entry from `data_dir`. Any failure is fatal.
    pub fn load(data_dir: &Path, catalog: &[DatasetSpec]) -> Result<Self, LoaderError> {
        let start = Instant::now();
        let datasets = catalog
            .par_iter()
            .map(|spec| -> Result<(DatasetId, DataFrame), LoaderError> {
                let df = spec.loader().load_csv(data_dir.join(spec.file_name))?;
                Ok((spec.id, df))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        info!(
            datasets = datasets.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "dashboard context ready"
        );
        Ok(Self { datasets })
    }

    #[cfg(test)]
    pub fn from_frames(frames: impl IntoIterator<Item = (DatasetId, DataFrame)>) -> Self {
        Self {
            datasets: frames.into_iter().collect(),
        }
    }

    pub fn dataset(&self, id: DatasetId) -> Result<&DataFrame, DashboardError> {
        self.datasets
            .get(&id)
            .ok_or(DashboardError::MissingDataset(id))
    }

    pub fn datasets(&self) -> impl Iterator<Item = (&DatasetId, &DataFrame)> {
        self.datasets.iter()
    }
}

/// Routes filter interactions to their chart handlers.
pub struct Dashboard {
    context: DashboardContext,
    bindings: Vec<ChartBinding>,
}

impl Dashboard {
    pub fn new(context: DashboardContext, bindings: Vec<ChartBinding>) -> Self {
        Self { context, bindings }
    }

    pub fn context(&self) -> &DashboardContext {
        &self.context
    }

    pub fn bindings(&self) -> &[ChartBinding] {
        &self.bindings
    }

    pub fn binding_for_chart(&self, output_id: &str) -> Result<&ChartBinding, DashboardError> {
        self.bindings
            .iter()
            .find(|b| b.output_id == output_id)
            .ok_or_else(|| DashboardError::UnknownChart(output_id.to_string()))
    }

    pub fn binding_for_input(&self, input_id: &str) -> Result<&ChartBinding, DashboardError> {
        self.bindings
            .iter()
            .find(|b| b.input_id == Some(input_id))
            .ok_or_else(|| DashboardError::UnknownInput(input_id.to_string()))
    }

    /// Handle one dropdown change: recompute the chart bound to `input_id`.
    pub fn on_input(&self, input_id: &str, value: &str) -> Result<ChartTable, DashboardError> {
        let binding = self.binding_for_input(input_id)?;
        self.compute(binding, &Selection::from_input(value))
    }

    /// Recompute a chart by its output id.
    pub fn render(
        &self,
        output_id: &str,
        selection: &Selection,
    ) -> Result<ChartTable, DashboardError> {
        let binding = self.binding_for_chart(output_id)?;
        if binding.input_id.is_none() && *selection != Selection::All {
            return Err(DashboardError::NotFilterable(output_id.to_string()));
        }
        self.compute(binding, selection)
    }

    /// Dropdown options for a filter input: the sentinel, then the distinct
    /// values of the filter column in the binding's dataset.
    pub fn options(&self, input_id: &str) -> Result<Vec<String>, DashboardError> {
        let binding = self.binding_for_input(input_id)?;
        let column = binding
            .handler
            .filter_column()
            .ok_or_else(|| DashboardError::NotFilterable(binding.output_id.to_string()))?;
        let df = self.context.dataset(binding.dataset)?;

        let descending = binding.option_order == OptionOrder::Descending;
        let mut options = vec![ALL_SENTINEL.to_string()];
        options.extend(unique_values(df, column, descending)?);
        Ok(options)
    }

    fn compute(
        &self,
        binding: &ChartBinding,
        selection: &Selection,
    ) -> Result<ChartTable, DashboardError> {
        let start = Instant::now();
        let df = self.context.dataset(binding.dataset)?;

        let frame = match &binding.handler {
            ChartHandler::Aggregate(spec) => {
                Aggregator::filter_then_aggregate(df, spec, selection)?
            }
            ChartHandler::AdmissionsSeparations {
                filter_column,
                columns,
            } => {
                let filtered = Aggregator::apply_selection(df, filter_column, selection)?;
                DataProcessor::admissions_separations(&filtered, columns)?
            }
            ChartHandler::Snapshot { sort_by } => df
                .clone()
                .lazy()
                .sort(sort_by.clone(), SortMultipleOptions::default())
                .collect()?,
        };

        debug!(
            chart = binding.output_id,
            selection = ?selection,
            rows = frame.height(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "chart recomputed"
        );

        Ok(ChartTable::from_frame(
            binding.output_id,
            binding.title,
            binding.kind,
            binding.source,
            frame,
        )?)
    }
}
