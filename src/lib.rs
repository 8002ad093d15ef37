//! # rankwatch
//!
//! Market-capitalization ranking tracker for an equities universe.
//!
//! Given a snapshot table of market-cap rankings, rankwatch derives for every
//! instrument its rank change since the previous snapshot, its membership in
//! a reference index, and whether it is a likely addition or removal at the
//! next index reconstitution under a fixed rank-threshold rule.
//!
//! ## Example
//!
//! ```rust,no_run
//! use rankwatch::prelude::*;
//!
//! # fn main() -> rankwatch::error::Result<()> {
//! let config = RankingConfig::default().with_columns(ColumnMap::twse_sheet());
//! let pipeline = RankingPipeline::new(config)?;
//!
//! let table = CsvTableReader::new().read_path("ranks.csv".as_ref())?;
//! let report = pipeline.run(&table);
//!
//! for row in &report.likely_additions {
//!     println!("{} {} {}", row.symbol, row.name, row.rank_delta);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod data;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod table;
pub mod types;

pub mod prelude {
    //! Commonly used types and traits
    pub use crate::config::{ColumnMap, Field, RankingConfig};
    pub use crate::data::{CsvTableReader, TableSource};
    pub use crate::error::{RankWatchError, Result};
    pub use crate::pipeline::{
        MembershipStatus, RankBand, RankDelta, RankedInstrument, RankingPipeline, RankingReport,
        ReconstitutionSignal,
    };
    pub use crate::table::{RawTable, RawValue};
    pub use crate::types::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lib_compile() {
        // Smoke test to ensure library compiles
    }
}
