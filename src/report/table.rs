use csv::ReaderBuilder;
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::fetch_error::FetchError;

/// CSV report content with trimmed column names.
///
/// Rows with a missing field are never stored: a row is either complete or
/// absent. A row wider than the header is malformed and fails the parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawReportTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawReportTable {
    /// The table returned when a located report could not be downloaded
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_csv(text: &str) -> Result<Self, FetchError> {
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .has_headers(true)
            .from_reader(text.as_bytes());

        let columns: Vec<String> = reader
            .headers()?
            .iter()
            .map(|name| name.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        let mut dropped_rows = 0;
        for (row_number, record) in reader.records().enumerate() {
            let record = record?;
            if record.len() > columns.len() {
                error!(
                    "Row {} has {} fields but the header has {}: {:?}",
                    row_number + 1,
                    record.len(),
                    columns.len(),
                    record
                );
                return Err(FetchError::ParseError(format!(
                    "row {} has {} fields, expected {}",
                    row_number + 1,
                    record.len(),
                    columns.len()
                )));
            }
            let complete = record.len() == columns.len()
                && record.iter().all(|v| !v.trim().is_empty());
            if !complete {
                debug!("Dropping incomplete row: {:?}", record);
                dropped_rows += 1;
                continue;
            }
            rows.push(record.iter().map(|v| v.trim().to_string()).collect());
        }

        if dropped_rows > 0 {
            warn!("Dropped {} incomplete rows out of {}", dropped_rows, rows.len() + dropped_rows);
        }
        debug!("Parsed report table with {} columns and {} rows", columns.len(), rows.len());

        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Result<usize, FetchError> {
        self.columns
            .iter()
            .position(|column| column == name)
            .ok_or_else(|| {
                error!("Column '{}' not found in report (columns: {:?})", name, self.columns);
                FetchError::ParseError(format!("missing column '{name}'"))
            })
    }
}
