//! Chart Table Module
//! The serializable derived table handed to the charting layer.

use crate::charts::ChartKind;
use polars::prelude::*;
use serde::Serialize;
use serde_json::{Map, Value};

/// One derived table keyed by its chart id.
#[derive(Debug, Clone, Serialize)]
pub struct ChartTable {
    pub chart_id: String,
    pub title: String,
    pub kind: ChartKind,
    pub source: String,
    pub columns: Vec<String>,
    pub rows: Vec<Map<String, Value>>,
    #[serde(skip)]
    pub frame: DataFrame,
}

impl ChartTable {
    pub fn from_frame(
        chart_id: &str,
        title: &str,
        kind: ChartKind,
        source: &str,
        frame: DataFrame,
    ) -> PolarsResult<Self> {
        let columns: Vec<String> = frame
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let mut rows = Vec::with_capacity(frame.height());
        for i in 0..frame.height() {
            let mut row = Map::with_capacity(columns.len());
            for (name, column) in columns.iter().zip(frame.get_columns()) {
                row.insert(name.clone(), any_value_to_json(&column.get(i)?));
            }
            rows.push(row);
        }

        Ok(Self {
            chart_id: chart_id.to_string(),
            title: title.to_string(),
            kind,
            source: source.to_string(),
            columns,
            rows,
            frame,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn any_value_to_json(value: &AnyValue) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(v) => Value::from(*v),
        AnyValue::String(v) => Value::from(*v),
        AnyValue::StringOwned(v) => Value::from(v.as_str()),
        AnyValue::Int8(v) => Value::from(*v),
        AnyValue::Int16(v) => Value::from(*v),
        AnyValue::Int32(v) => Value::from(*v),
        AnyValue::Int64(v) => Value::from(*v),
        AnyValue::UInt8(v) => Value::from(*v),
        AnyValue::UInt16(v) => Value::from(*v),
        AnyValue::UInt32(v) => Value::from(*v),
        AnyValue::UInt64(v) => Value::from(*v),
        // Non-finite floats become null.
        AnyValue::Float32(v) => Value::from(f64::from(*v)),
        AnyValue::Float64(v) => Value::from(*v),
        other => Value::from(other.to_string().trim_matches('"')),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_keep_scalar_types() {
        let frame = df!(
            "ano" => [2020i64, 2021],
            "tipo" => ["admissoes", "desligamentos"],
            "media" => [1.5f64, f64::NAN]
        )
        .unwrap();
        let table =
            ChartTable::from_frame("fig", "Título", ChartKind::Line, "Fonte: IBGE", frame).unwrap();

        assert_eq!(table.columns, vec!["ano", "tipo", "media"]);
        assert_eq!(table.rows[0]["ano"], Value::from(2020));
        assert_eq!(table.rows[0]["tipo"], Value::from("admissoes"));
        assert_eq!(table.rows[0]["media"], Value::from(1.5));
        assert_eq!(table.rows[1]["media"], Value::Null);
    }

    #[test]
    fn test_serializes_without_frame() {
        let frame = df!("ano" => [2020i64]).unwrap();
        let table = ChartTable::from_frame("fig-pib-sp", "PIB", ChartKind::Area, "Fonte: IBGE", frame)
            .unwrap();
        let json = serde_json::to_value(&table).unwrap();

        assert_eq!(json["chart_id"], "fig-pib-sp");
        assert_eq!(json["kind"], "area");
        assert!(json.get("frame").is_none());
        assert_eq!(json["rows"][0]["ano"], 2020);
    }
}
