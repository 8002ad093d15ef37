//! Ranking view - ordering, top-N truncation and candidate sub-views

use super::classifiers::MembershipStatus;
use super::delta::RankDelta;
use super::filters::{Filter, SignalFilter};
use super::predictor::{RankBand, ReconstitutionSignal};
use crate::error::{RankWatchError, Result};
use crate::types::{MarketCap, Price, Rank, Symbol};
use serde::Serialize;
use std::cmp::Ordering;

/// One fully derived output row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedInstrument {
    pub symbol: Symbol,
    pub name: String,
    pub price: Option<Price>,
    pub market_cap: Option<MarketCap>,
    pub current_rank: Option<Rank>,
    pub previous_rank: Option<Rank>,
    #[serde(rename = "rank_delta_display")]
    pub rank_delta: RankDelta,
    pub membership_status: MembershipStatus,
    pub reconstitution_signal: ReconstitutionSignal,
    pub rank_band: RankBand,
}

/// Ascending by rank, absent ranks after all present ones
pub fn compare_rank(a: Option<Rank>, b: Option<Rank>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Orders and slices the classified set
#[derive(Debug, Clone)]
pub struct RankingView {
    top_n: usize,
    additions: SignalFilter,
    removals: SignalFilter,
}

impl RankingView {
    pub fn new(top_n: usize) -> Result<Self> {
        if top_n == 0 {
            return Err(RankWatchError::ConfigError(
                "top_n must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            top_n,
            additions: SignalFilter::likely_additions(),
            removals: SignalFilter::likely_removals(),
        })
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Stable sort by current rank; ties and unranked rows keep input order.
    pub fn order(&self, mut rows: Vec<RankedInstrument>) -> Vec<RankedInstrument> {
        rows.sort_by(|a, b| compare_rank(a.current_rank, b.current_rank));
        rows
    }

    /// First `top_n` rows of an ordered set
    pub fn top(&self, ordered: &[RankedInstrument]) -> Vec<RankedInstrument> {
        ordered.iter().take(self.top_n).cloned().collect()
    }

    /// Addition candidates from the full set, not only the top N
    pub fn likely_additions(&self, ordered: &[RankedInstrument]) -> Vec<RankedInstrument> {
        self.additions.apply(ordered)
    }

    /// Removal candidates from the full set, not only the top N
    pub fn likely_removals(&self, ordered: &[RankedInstrument]) -> Vec<RankedInstrument> {
        self.removals.apply(ordered)
    }
}
