//! Snapshot table sources
//!
//! Everything that turns bytes into a [`RawTable`]: CSV and JSON files and,
//! with the `async` feature, a published sheet fetched over HTTP. Sources do
//! not interpret cells and do not retry.

pub mod csv_source;
#[cfg(feature = "async")]
pub mod http;
pub mod json_source;

pub use csv_source::{CsvFileSource, CsvTableReader};
#[cfg(feature = "async")]
pub use http::HttpCsvSource;
pub use json_source::{parse_json_table, JsonFileSource};

use crate::error::{RankWatchError, Result};
use crate::table::RawTable;
use chrono::{DateTime, Utc};
use std::path::Path;

/// Trait for synchronous table sources
pub trait TableSource: Send + Sync {
    /// Load one snapshot table
    fn load(&self) -> Result<RawTable>;

    /// Get the source name
    fn name(&self) -> &str;
}

/// Pick a file source from the extension: `.json` is JSON, anything else CSV
pub fn file_source(path: &Path) -> Box<dyn TableSource> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        Box::new(JsonFileSource::new(path))
    } else {
        Box::new(CsvFileSource::new(path))
    }
}

/// Last modification time of a file, used as the snapshot time
pub(crate) fn modified_time(path: &Path) -> Result<DateTime<Utc>> {
    let modified = std::fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map_err(|e| {
            RankWatchError::DataError(format!("Failed to stat {}: {}", path.display(), e))
        })?;
    Ok(DateTime::<Utc>::from(modified))
}
