//! Raw tabular input
//!
//! A [`RawTable`] is what the ingestion layer hands to the pipeline: ordered
//! column names plus rows of loosely typed cells. Nothing here interprets the
//! cells; that is the normalizer's job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// A single cell as it arrived from the source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// Numeric cell (JSON number, or a value already typed by the source)
    Number(f64),
    /// Textual cell, untrimmed
    Text(String),
    /// Empty / null cell
    Missing,
}

impl RawValue {
    /// True when the cell carries no value at all
    pub fn is_missing(&self) -> bool {
        matches!(self, RawValue::Missing)
    }

    /// Textual representation of the cell, `None` for missing cells
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            RawValue::Text(s) => Some(Cow::Borrowed(s.as_str())),
            RawValue::Number(v) => Some(Cow::Owned(v.to_string())),
            RawValue::Missing => None,
        }
    }

    /// Lenient numeric interpretation.
    ///
    /// Text is trimmed and thousands separators are dropped before parsing.
    /// Anything that does not yield a finite number is `None`.
    pub fn parse_number(&self) -> Option<f64> {
        let value = match self {
            RawValue::Number(v) => *v,
            RawValue::Text(s) => {
                let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
                if cleaned.is_empty() {
                    return None;
                }
                cleaned.parse::<f64>().ok()?
            }
            RawValue::Missing => return None,
        };

        value.is_finite().then_some(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(RawValue::Missing)
    }
}

/// Column-named table of raw cells
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "TableRecord")]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<RawValue>>,
    /// When the source produced this snapshot, if known
    snapshot_time: Option<DateTime<Utc>>,
}

/// Serialized form; rows are re-padded to the header width on the way in
#[derive(Deserialize)]
struct TableRecord {
    columns: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<RawValue>>,
    #[serde(default)]
    snapshot_time: Option<DateTime<Utc>>,
}

impl From<TableRecord> for RawTable {
    fn from(record: TableRecord) -> Self {
        let table = Self::from_rows(&record.columns, record.rows);
        match record.snapshot_time {
            Some(time) => table.with_snapshot_time(time),
            None => table,
        }
    }
}

impl RawTable {
    /// Create an empty table with the given header
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            snapshot_time: None,
        }
    }

    /// Build a table from a header and rows in one go
    pub fn from_rows<S: AsRef<str>>(columns: &[S], rows: Vec<Vec<RawValue>>) -> Self {
        let mut table = Self::new(columns.iter().map(|c| c.as_ref().to_string()).collect());
        for row in rows {
            table.push_row(row);
        }
        table
    }

    /// Attach the snapshot timestamp
    pub fn with_snapshot_time(mut self, time: DateTime<Utc>) -> Self {
        self.snapshot_time = Some(time);
        self
    }

    /// Append a row. Short rows are padded with missing cells, long rows are cut.
    pub fn push_row(&mut self, mut row: Vec<RawValue>) {
        row.resize(self.columns.len(), RawValue::Missing);
        self.rows.push(row);
    }

    /// Column names in source order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Locate a column by name, ignoring surrounding whitespace and ASCII case
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let wanted = name.trim();
        self.columns
            .iter()
            .position(|c| c.trim().eq_ignore_ascii_case(wanted))
    }

    /// Whether the schema contains the named column
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// All rows
    pub fn rows(&self) -> &[Vec<RawValue>] {
        &self.rows
    }

    /// Cell at (row, column)
    pub fn cell(&self, row: usize, column: usize) -> &RawValue {
        &self.rows[row][column]
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when there are no data rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn snapshot_time(&self) -> Option<DateTime<Utc>> {
        self.snapshot_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_lenient() {
        assert_eq!(RawValue::from(" 42 ").parse_number(), Some(42.0));
        assert_eq!(RawValue::from("1,234.5").parse_number(), Some(1234.5));
        assert_eq!(RawValue::from(7.0).parse_number(), Some(7.0));
        assert_eq!(RawValue::from("").parse_number(), None);
        assert_eq!(RawValue::from("N/A").parse_number(), None);
        assert_eq!(RawValue::from("NaN").parse_number(), None);
        assert_eq!(RawValue::from(f64::INFINITY).parse_number(), None);
        assert_eq!(RawValue::Missing.parse_number(), None);
    }

    #[test]
    fn test_as_text() {
        assert_eq!(RawValue::from("✅ in").as_text().as_deref(), Some("✅ in"));
        assert_eq!(RawValue::from(1.0).as_text().as_deref(), Some("1"));
        assert!(RawValue::Missing.as_text().is_none());
    }

    #[test]
    fn test_push_row_pads_and_cuts() {
        let mut table = RawTable::new(vec!["a".to_string(), "b".to_string()]);
        table.push_row(vec![RawValue::from("x")]);
        table.push_row(vec!["1".into(), "2".into(), "3".into()]);

        assert_eq!(table.len(), 2);
        assert!(table.cell(0, 1).is_missing());
        assert_eq!(table.rows()[1].len(), 2);
    }

    #[test]
    fn test_deserialize_pads_ragged_rows() {
        let table: RawTable = serde_json::from_str(
            r#"{"columns":["symbol","current_rank","membership_marker"],"rows":[["A"],["B","2","✅","extra"]],"snapshot_time":null}"#,
        )
        .unwrap();

        assert_eq!(table.rows()[0].len(), 3);
        assert!(table.cell(0, 2).is_missing());
        assert_eq!(table.rows()[1].len(), 3);
        assert!(table.snapshot_time().is_none());
    }

    #[test]
    fn test_serialize_then_deserialize_keeps_snapshot_time() {
        use chrono::TimeZone;

        let time = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let table = RawTable::from_rows(&["symbol"], vec![vec!["A".into()]])
            .with_snapshot_time(time);

        let json = serde_json::to_string(&table).unwrap();
        let back: RawTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn test_column_lookup() {
        let table = RawTable::from_rows(&[" Symbol ", "市值排名"], vec![]);
        assert_eq!(table.column_index("symbol"), Some(0));
        assert_eq!(table.column_index("市值排名"), Some(1));
        assert!(!table.has_column("昨日排名"));
        assert!(table.is_empty());
    }
}
