//! CSV Data Loader Module
//! Parses uploaded CSV bytes into a Polars DataFrame and exposes column metadata.

use crate::config::CsvOptions;
use polars::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
}

/// Whether a column type takes part in numeric statistics and charts.
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Whether a column type holds whole numbers.
pub fn is_integer_dtype(dtype: &DataType) -> bool {
    is_numeric_dtype(dtype) && !matches!(dtype, DataType::Float32 | DataType::Float64)
}

/// Holds the uploaded table for the session.
pub struct DataLoader {
    df: Option<DataFrame>,
    source_name: Option<String>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            df: None,
            source_name: None,
        }
    }

    /// Parse CSV bytes. The first row is the header.
    pub fn parse_csv(bytes: Vec<u8>, options: &CsvOptions) -> Result<DataFrame, LoaderError> {
        let null_values: Vec<PlSmallStr> = options
            .null_values
            .iter()
            .map(|s| s.as_str().into())
            .collect();

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(options.infer_schema_length))
            .map_parse_options(|parse| {
                parse.with_null_values(Some(NullValues::AllColumns(null_values.clone())))
            })
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()?;

        Ok(df)
    }

    /// Read a CSV file from disk and parse it.
    pub fn load_csv(path: &Path, options: &CsvOptions) -> Result<DataFrame, LoaderError> {
        let bytes = std::fs::read(path).map_err(|source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_csv(bytes, options)
    }

    /// Replace the current table.
    pub fn set_dataframe(&mut self, df: DataFrame, source_name: impl Into<String>) {
        self.df = Some(df);
        self.source_name = Some(source_name.into());
    }

    pub fn get_dataframe(&self) -> Option<&DataFrame> {
        self.df.as_ref()
    }

    /// Name of the uploaded file.
    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }

    /// Get list of column names from the loaded table.
    pub fn get_columns(&self) -> Vec<String> {
        self.df.as_ref().map(column_names).unwrap_or_default()
    }

    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }
}

/// Column names of a table in order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect()
}
