//! Charts module - chart bindings and the tables handed to the charting layer

mod bindings;
mod table;

pub use bindings::{default_bindings, ChartBinding, ChartHandler, ChartKind, OptionOrder};
pub use table::ChartTable;
