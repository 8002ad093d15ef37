//! Published-sheet source over HTTP
//!
//! Fetches a CSV export (e.g. a Google Sheet published as CSV). One attempt,
//! no retry; failures are returned to the caller.

use super::csv_source::CsvTableReader;
use crate::error::{RankWatchError, Result};
use crate::table::RawTable;
use chrono::Utc;
use reqwest::Client;
use std::time::Duration;

/// CSV over HTTP(S)
pub struct HttpCsvSource {
    client: Client,
    url: String,
    reader: CsvTableReader,
}

impl HttpCsvSource {
    /// Create a new source for `url`
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("rankwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RankWatchError::DataError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
            reader: CsvTableReader::new(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Download and parse the table; the snapshot time is the fetch time
    pub async fn fetch(&self) -> Result<RawTable> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| RankWatchError::DataError(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(RankWatchError::DataError(format!(
                "{} returned error: {}",
                self.url,
                response.status()
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| RankWatchError::DataError(format!("Failed to read response: {}", e)))?;

        let table = self.reader.read_str(&text)?;
        log::info!("Fetched {} rows from {}", table.len(), self.url);
        Ok(table.with_snapshot_time(Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_http_source_creation() {
        let source = HttpCsvSource::new("https://example.com/sheet.csv");
        assert!(source.is_ok());
        assert_eq!(source.unwrap().url(), "https://example.com/sheet.csv");
    }
}
