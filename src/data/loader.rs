//! CSV Data Loader Module
//! Handles delimited snapshot loading with declared column types using Polars.

use polars::prelude::*;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} is not valid {encoding}")]
    Encoding {
        path: PathBuf,
        encoding: TextEncoding,
    },
    #[error("Failed to load CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
    #[error("Missing declared column '{column}' in {path}")]
    MissingColumn { path: PathBuf, column: String },
}

/// Text encoding of a snapshot file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Latin1,
}

impl std::fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextEncoding::Utf8 => write!(f, "UTF-8"),
            TextEncoding::Latin1 => write!(f, "Latin-1"),
        }
    }
}

impl TextEncoding {
    /// Decode raw file bytes into UTF-8 text. Returns `None` on invalid UTF-8.
    pub fn decode(self, bytes: Vec<u8>) -> Option<String> {
        let text = match self {
            TextEncoding::Utf8 => String::from_utf8(bytes).ok()?,
            // Latin-1 code points are the byte values themselves.
            TextEncoding::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
        };
        match text.strip_prefix('\u{feff}') {
            Some(stripped) => Some(stripped.to_string()),
            None => Some(text),
        }
    }
}

/// Scalar type a declared column is coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    Float,
    Text,
}

impl ColumnType {
    pub fn dtype(self) -> DataType {
        match self {
            ColumnType::Int => DataType::Int64,
            ColumnType::Float => DataType::Float64,
            ColumnType::Text => DataType::String,
        }
    }
}

/// Loads one delimited snapshot file into a DataFrame.
#[derive(Debug, Clone)]
pub struct DataLoader {
    separator: u8,
    encoding: TextEncoding,
    dtypes: Vec<(String, ColumnType)>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            separator: b';',
            encoding: TextEncoding::Utf8,
            dtypes: Vec::new(),
        }
    }

    pub fn with_separator(mut self, separator: u8) -> Self {
        self.separator = separator;
        self
    }

    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Declare the type a column must be coerced to.
    pub fn with_dtype(mut self, column: &str, column_type: ColumnType) -> Self {
        self.dtypes.push((column.to_string(), column_type));
        self
    }

    /// Load a CSV file. Any value that does not parse under its declared
    /// type fails the whole load.
    pub fn load_csv(&self, file_path: impl AsRef<Path>) -> Result<DataFrame, LoaderError> {
        let path = file_path.as_ref();
        if !path.exists() {
            return Err(LoaderError::FileNotFound(path.to_path_buf()));
        }

        let bytes = fs::read(path).map_err(|source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let text = self
            .encoding
            .decode(bytes)
            .ok_or_else(|| LoaderError::Encoding {
                path: path.to_path_buf(),
                encoding: self.encoding,
            })?;

        let mut schema = Schema::with_capacity(self.dtypes.len());
        for (name, column_type) in &self.dtypes {
            schema.with_column(name.as_str().into(), column_type.dtype());
        }

        let options = CsvReadOptions::default()
            .with_has_header(true)
            // Undeclared columns are inferred from every row.
            .with_infer_schema_length(None)
            .with_ignore_errors(false)
            .with_schema_overwrite(Some(Arc::new(schema)))
            .with_parse_options(CsvParseOptions::default().with_separator(self.separator));

        let csv_error = |source: PolarsError| LoaderError::Csv {
            path: path.to_path_buf(),
            source,
        };
        let mut cursor = Cursor::new(text.as_bytes());
        let df = options
            .into_reader_with_file_handle(&mut cursor)
            .finish()
            .map_err(csv_error)?;

        if let Some((name, _)) = self
            .dtypes
            .iter()
            .find(|(name, _)| df.column(name).is_err())
        {
            return Err(LoaderError::MissingColumn {
                path: path.to_path_buf(),
                column: name.clone(),
            });
        }
        // Header-only files carry no values to infer from; pin declared types.
        let df = self.coerce_declared(df).map_err(csv_error)?;
        debug!(schema = ?df.schema(), "snapshot schema");

        info!(
            file = %path.display(),
            rows = df.height(),
            columns = df.width(),
            encoding = %self.encoding,
            "loaded snapshot"
        );
        Ok(df)
    }

    fn coerce_declared(&self, df: DataFrame) -> PolarsResult<DataFrame> {
        if self.dtypes.is_empty() {
            return Ok(df);
        }
        let casts: Vec<Expr> = self
            .dtypes
            .iter()
            .map(|(name, column_type)| col(name.as_str()).strict_cast(column_type.dtype()))
            .collect();
        df.lazy().with_columns(casts).collect()
    }
}

/// Get list of column names from a DataFrame.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Get the distinct non-null values of a column as text, sorted by the
/// column's own ordering (numeric columns sort numerically).
pub fn unique_values(
    df: &DataFrame,
    column: &str,
    descending: bool,
) -> PolarsResult<Vec<String>> {
    let unique = df.column(column)?.drop_nulls().unique()?;
    let sorted = unique
        .as_materialized_series()
        .sort(SortOptions::default().with_order_descending(descending))?;
    let text = sorted.cast(&DataType::String)?;
    Ok(text
        .str()?
        .into_iter()
        .flatten()
        .map(|v| v.to_string())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_file(bytes: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_file_not_found() {
        let result = DataLoader::new().load_csv("nonexistent.csv");
        assert!(matches!(result, Err(LoaderError::FileNotFound(_))));
    }

    #[test]
    fn test_semicolon_with_declared_types() {
        let file = write_file(b"ano;saldo;media\n2020;10;1.5\n2021;-3;2\n");
        let df = DataLoader::new()
            .with_dtype("ano", ColumnType::Int)
            .with_dtype("media", ColumnType::Float)
            .load_csv(file.path())
            .unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(column_names(&df), vec!["ano", "saldo", "media"]);
        assert_eq!(df.column("ano").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("media").unwrap().dtype(), &DataType::Float64);
        let media: Vec<Option<f64>> = df.column("media").unwrap().f64().unwrap().into_iter().collect();
        assert_eq!(media, vec![Some(1.5), Some(2.0)]);
    }

    #[test]
    fn test_comma_separator() {
        let file = write_file(b"ano,valor\n2020,1\n");
        let df = DataLoader::new()
            .with_separator(b',')
            .with_dtype("valor", ColumnType::Int)
            .load_csv(file.path())
            .unwrap();
        assert_eq!(df.width(), 2);
    }

    #[test]
    fn test_latin1_decoding() {
        // "Comércio" with é as the single byte 0xE9
        let file = write_file(b"secao;valor\nCom\xe9rcio;4\n");
        let df = DataLoader::new()
            .with_encoding(TextEncoding::Latin1)
            .with_dtype("secao", ColumnType::Text)
            .load_csv(file.path())
            .unwrap();
        let secao = df.column("secao").unwrap().str().unwrap().get(0);
        assert_eq!(secao, Some("Comércio"));
    }

    #[test]
    fn test_latin1_bytes_rejected_as_utf8() {
        let file = write_file(b"secao;valor\nCom\xe9rcio;4\n");
        let result = DataLoader::new().load_csv(file.path());
        assert!(matches!(result, Err(LoaderError::Encoding { .. })));
    }

    #[test]
    fn test_bom_is_stripped() {
        let file = write_file("\u{feff}ano;valor\n2020;1\n".as_bytes());
        let df = DataLoader::new()
            .with_dtype("ano", ColumnType::Int)
            .load_csv(file.path())
            .unwrap();
        assert!(df.column("ano").is_ok());
    }

    #[test]
    fn test_unparseable_declared_int_fails() {
        let file = write_file(b"ano;valor\n2020;1\nabc;2\n");
        let result = DataLoader::new()
            .with_dtype("ano", ColumnType::Int)
            .load_csv(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_undeclared_column_inferred_from_whole_file() {
        let mut body = String::from("mes;saldomovimentacao;salario\n");
        for _ in 0..10_000 {
            body.push_str("1;1;1500\n");
        }
        body.push_str("1;-1;1500.5\n");
        let file = write_file(body.as_bytes());

        let df = DataLoader::new()
            .with_dtype("mes", ColumnType::Int)
            .with_dtype("saldomovimentacao", ColumnType::Int)
            .load_csv(file.path())
            .unwrap();

        assert_eq!(df.height(), 10_001);
        assert_eq!(df.column("salario").unwrap().dtype(), &DataType::Float64);
        let last = df.column("salario").unwrap().f64().unwrap().get(10_000);
        assert_eq!(last, Some(1500.5));
    }

    #[test]
    fn test_missing_declared_column_fails() {
        let file = write_file(b"ano;valor\n2020;1\n");
        let result = DataLoader::new()
            .with_dtype("mes", ColumnType::Int)
            .load_csv(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_unique_values_sorting() {
        let df = df!(
            "ano" => [2019i64, 2021, 2020, 2021],
            "secao" => [Some("B"), None, Some("A"), Some("B")]
        )
        .unwrap();

        assert_eq!(
            unique_values(&df, "ano", true).unwrap(),
            vec!["2021", "2020", "2019"]
        );
        assert_eq!(unique_values(&df, "secao", false).unwrap(), vec!["A", "B"]);
    }
}
