//! Report export - CSV for the main table, JSON for the whole report

use crate::error::Result;
use crate::pipeline::{MembershipStatus, RankedInstrument, RankingReport, ReconstitutionSignal};
use crate::types::Rank;
use serde::Serialize;
use std::io::Write;

/// Flat CSV row with the output columns of the ranking view
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    symbol: &'a str,
    name: &'a str,
    price: Option<f64>,
    market_cap: Option<f64>,
    current_rank: String,
    rank_delta_display: String,
    membership_status: MembershipStatus,
    reconstitution_signal: ReconstitutionSignal,
}

impl<'a> From<&'a RankedInstrument> for CsvRow<'a> {
    fn from(row: &'a RankedInstrument) -> Self {
        Self {
            symbol: &row.symbol,
            name: &row.name,
            price: row.price,
            market_cap: row.market_cap,
            current_rank: format_rank(row.current_rank),
            rank_delta_display: row.rank_delta.to_string(),
            membership_status: row.membership_status,
            reconstitution_signal: row.reconstitution_signal,
        }
    }
}

/// Whole ranks print without a fraction; absent ranks are empty
pub fn format_rank(rank: Option<Rank>) -> String {
    match rank {
        Some(r) if r.fract() == 0.0 => format!("{}", r as u64),
        Some(r) => format!("{}", r),
        None => String::new(),
    }
}

/// Write rows as CSV with a header line
pub fn write_csv<W: Write>(rows: &[RankedInstrument], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(CsvRow::from(row))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the whole report as JSON
pub fn write_json<W: Write>(report: &RankingReport, writer: W, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(writer, report)?;
    } else {
        serde_json::to_writer(writer, report)?;
    }
    Ok(())
}
