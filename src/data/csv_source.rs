//! CSV ingestion
//!
//! Header row required. Empty cells become [`RawValue::Missing`], everything
//! else stays text for the normalizer to interpret.

use super::{modified_time, TableSource};
use crate::error::{RankWatchError, Result};
use crate::table::{RawTable, RawValue};
use csv::ReaderBuilder;
use std::io::Read;
use std::path::{Path, PathBuf};

/// CSV reader configuration
#[derive(Debug, Clone)]
pub struct CsvTableReader {
    delimiter: u8,
}

impl CsvTableReader {
    /// Create new CSV reader with comma delimiter
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Read a whole table from any reader
    pub fn read<R: Read>(&self, reader: R) -> Result<RawTable> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = rdr
            .headers()
            .map_err(|e| RankWatchError::DataError(format!("Failed to read headers: {}", e)))?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        let mut table = RawTable::new(headers);
        for result in rdr.records() {
            let record = result?;
            let row = record
                .iter()
                .map(|cell| {
                    if cell.trim().is_empty() {
                        RawValue::Missing
                    } else {
                        RawValue::Text(cell.to_string())
                    }
                })
                .collect();
            table.push_row(row);
        }

        log::debug!(
            "Read CSV table with {} columns and {} rows",
            table.columns().len(),
            table.len()
        );
        Ok(table)
    }

    pub fn read_str(&self, text: &str) -> Result<RawTable> {
        self.read(text.as_bytes())
    }

    /// Read a CSV file; the snapshot time is the file's modification time
    pub fn read_path(&self, path: &Path) -> Result<RawTable> {
        let file = std::fs::File::open(path).map_err(|e| {
            RankWatchError::DataError(format!("Failed to open CSV {}: {}", path.display(), e))
        })?;
        let table = self.read(file)?;
        Ok(table.with_snapshot_time(modified_time(path)?))
    }
}

impl Default for CsvTableReader {
    fn default() -> Self {
        Self::new()
    }
}

/// CSV file as a [`TableSource`]
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
    reader: CsvTableReader,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            reader: CsvTableReader::new(),
        }
    }

    pub fn with_reader(mut self, reader: CsvTableReader) -> Self {
        self.reader = reader;
        self
    }
}

impl TableSource for CsvFileSource {
    fn load(&self) -> Result<RawTable> {
        self.reader.read_path(&self.path)
    }

    fn name(&self) -> &str {
        "csv"
    }
}
