//! Ranking pipeline engine
//!
//! Wires the stages together:
//!
//! ```text
//! RawTable -> RecordNormalizer -> (RankDeltaCalculator, MembershipClassifier)
//!          -> ThresholdPredictor -> RankingView -> RankingReport
//! ```
//!
//! A run is a pure function of the input table; the pipeline keeps no state
//! between runs.

use super::classifiers::{Classifier, MembershipClassifier};
use super::delta::RankDeltaCalculator;
use super::normalizer::{NormalizationDiagnostics, RecordNormalizer, SnapshotTable};
use super::predictor::{RankBandClassifier, ThresholdPredictor};
use super::view::{RankedInstrument, RankingView};
use crate::config::RankingConfig;
use crate::error::Result;
use crate::table::RawTable;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Output of one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingReport {
    /// Snapshot time carried over from the input table
    pub as_of: Option<DateTime<Utc>>,
    /// Rows in the input table
    pub total_rows: usize,
    /// Main table: top N by current rank
    pub rows: Vec<RankedInstrument>,
    /// Every addition candidate in the input, regardless of top N
    pub likely_additions: Vec<RankedInstrument>,
    /// Every removal candidate in the input, regardless of top N
    pub likely_removals: Vec<RankedInstrument>,
    pub diagnostics: NormalizationDiagnostics,
}

impl RankingReport {
    pub fn is_empty(&self) -> bool {
        self.total_rows == 0
    }
}

/// Validated, reusable pipeline
#[derive(Debug, Clone)]
pub struct RankingPipeline {
    config: RankingConfig,
    normalizer: RecordNormalizer,
    delta: RankDeltaCalculator,
    membership: MembershipClassifier,
    predictor: ThresholdPredictor,
    view: RankingView,
}

impl RankingPipeline {
    /// Build a pipeline; configuration errors are reported here, before any row is read.
    pub fn new(config: RankingConfig) -> Result<Self> {
        config.validate()?;

        let bands = RankBandClassifier::new(&config.rank_band_edges)?;
        let predictor =
            ThresholdPredictor::new(config.add_threshold, config.remove_threshold, bands)?;

        Ok(Self {
            normalizer: RecordNormalizer::new(config.columns.clone()),
            delta: RankDeltaCalculator::new(),
            membership: MembershipClassifier::new(config.membership_token.clone())?,
            predictor,
            view: RankingView::new(config.top_n)?,
            config,
        })
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// Normalize and derive every row, in input order
    pub fn classify(&self, table: &RawTable) -> (Vec<RankedInstrument>, NormalizationDiagnostics) {
        let SnapshotTable {
            snapshots,
            diagnostics,
        } = self.normalizer.normalize(table);

        let rows = snapshots
            .into_iter()
            .map(|snapshot| {
                let rank_delta = self.delta.calculate(&snapshot);
                let membership_status = self.membership.classify(&snapshot);
                let reconstitution_signal = self
                    .predictor
                    .signal(snapshot.current_rank, membership_status);
                let rank_band = self.predictor.band(snapshot.current_rank);

                RankedInstrument {
                    symbol: snapshot.symbol,
                    name: snapshot.name,
                    price: snapshot.price,
                    market_cap: snapshot.market_cap,
                    current_rank: snapshot.current_rank,
                    previous_rank: snapshot.previous_rank,
                    rank_delta,
                    membership_status,
                    reconstitution_signal,
                    rank_band,
                }
            })
            .collect();

        (rows, diagnostics)
    }

    /// Run the full pipeline over one snapshot table
    pub fn run(&self, table: &RawTable) -> RankingReport {
        let (rows, diagnostics) = self.classify(table);
        let total_rows = rows.len();

        let ordered = self.view.order(rows);
        let report = RankingReport {
            as_of: table.snapshot_time(),
            total_rows,
            rows: self.view.top(&ordered),
            likely_additions: self.view.likely_additions(&ordered),
            likely_removals: self.view.likely_removals(&ordered),
            diagnostics,
        };

        log::debug!(
            "Ranked {} rows: {} shown, {} likely additions, {} likely removals",
            report.total_rows,
            report.rows.len(),
            report.likely_additions.len(),
            report.likely_removals.len()
        );
        if report.diagnostics.malformed_total() > 0 {
            log::warn!(
                "{} malformed cells treated as absent",
                report.diagnostics.malformed_total()
            );
        }

        report
    }
}
