//! Ranking configuration
//!
//! Holds the reconstitution thresholds, the display band edges, the top-N
//! limit and the binding from logical fields to source column names.

use crate::constants::{
    DEFAULT_ADD_THRESHOLD, DEFAULT_MEMBERSHIP_TOKEN, DEFAULT_RANK_BAND_EDGES,
    DEFAULT_REMOVE_THRESHOLD, DEFAULT_TOP_N,
};
use crate::error::{RankWatchError, Result};
use crate::types::RankThreshold;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical fields of an instrument snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Symbol,
    Name,
    Price,
    MarketCap,
    CurrentRank,
    PreviousRank,
    MembershipMarker,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Symbol,
        Field::Name,
        Field::Price,
        Field::MarketCap,
        Field::CurrentRank,
        Field::PreviousRank,
        Field::MembershipMarker,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Symbol => "symbol",
            Field::Name => "name",
            Field::Price => "price",
            Field::MarketCap => "market_cap",
            Field::CurrentRank => "current_rank",
            Field::PreviousRank => "previous_rank",
            Field::MembershipMarker => "membership_marker",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source column name for each logical field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub symbol: String,
    pub name: String,
    pub price: String,
    pub market_cap: String,
    pub current_rank: String,
    pub previous_rank: String,
    pub membership_marker: String,
}

impl ColumnMap {
    /// Column labels of the published TWSE market-cap Google Sheet
    pub fn twse_sheet() -> Self {
        Self {
            symbol: "股票代號".to_string(),
            name: "股票名稱".to_string(),
            price: "股價".to_string(),
            market_cap: "總市值".to_string(),
            current_rank: "市值排名".to_string(),
            previous_rank: "昨日排名".to_string(),
            membership_marker: "第 1 欄".to_string(),
        }
    }

    /// Source column bound to `field`
    pub fn column(&self, field: Field) -> &str {
        match field {
            Field::Symbol => &self.symbol,
            Field::Name => &self.name,
            Field::Price => &self.price,
            Field::MarketCap => &self.market_cap,
            Field::CurrentRank => &self.current_rank,
            Field::PreviousRank => &self.previous_rank,
            Field::MembershipMarker => &self.membership_marker,
        }
    }
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            symbol: Field::Symbol.as_str().to_string(),
            name: Field::Name.as_str().to_string(),
            price: Field::Price.as_str().to_string(),
            market_cap: Field::MarketCap.as_str().to_string(),
            current_rank: Field::CurrentRank.as_str().to_string(),
            previous_rank: Field::PreviousRank.as_str().to_string(),
            membership_marker: Field::MembershipMarker.as_str().to_string(),
        }
    }
}

/// Full configuration of a ranking run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Rows kept in the main table
    pub top_n: usize,
    /// Non-members with rank number <= this become addition candidates
    pub add_threshold: RankThreshold,
    /// Members with rank number > this become removal candidates
    pub remove_threshold: RankThreshold,
    /// Upper rank of the safe, watch and danger tiers
    pub rank_band_edges: Vec<RankThreshold>,
    /// Marker substring meaning "currently in the index"
    pub membership_token: String,
    pub columns: ColumnMap,
}

impl RankingConfig {
    /// Check the configuration invariants.
    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            return Err(RankWatchError::ConfigError(
                "top_n must be at least 1".to_string(),
            ));
        }

        if self.add_threshold > self.remove_threshold {
            return Err(RankWatchError::ConfigError(format!(
                "add_threshold ({}) must not exceed remove_threshold ({})",
                self.add_threshold, self.remove_threshold
            )));
        }

        if self.rank_band_edges.len() != 3 {
            return Err(RankWatchError::ConfigError(format!(
                "rank_band_edges needs exactly 3 cutoffs, got {}",
                self.rank_band_edges.len()
            )));
        }

        if self.rank_band_edges[0] == 0 || self.rank_band_edges.windows(2).any(|w| w[0] >= w[1]) {
            return Err(RankWatchError::ConfigError(format!(
                "rank_band_edges must be positive and strictly increasing: {:?}",
                self.rank_band_edges
            )));
        }

        if self.membership_token.trim().is_empty() {
            return Err(RankWatchError::ConfigError(
                "membership_token must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Builder-style override of the thresholds
    pub fn with_thresholds(mut self, add: RankThreshold, remove: RankThreshold) -> Self {
        self.add_threshold = add;
        self.remove_threshold = remove;
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_columns(mut self, columns: ColumnMap) -> Self {
        self.columns = columns;
        self
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            add_threshold: DEFAULT_ADD_THRESHOLD,
            remove_threshold: DEFAULT_REMOVE_THRESHOLD,
            rank_band_edges: DEFAULT_RANK_BAND_EDGES.to_vec(),
            membership_token: DEFAULT_MEMBERSHIP_TOKEN.to_string(),
            columns: ColumnMap::default(),
        }
    }
}
