//! Rank change between the previous and the current snapshot

use super::normalizer::InstrumentSnapshot;
use crate::types::Rank;
use serde::{Serialize, Serializer};
use std::fmt;

/// Direction plus magnitude of a rank move.
///
/// `Improved(n)` means the instrument climbed `n` places toward rank 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RankDelta {
    NoChange,
    Improved(u32),
    Worsened(u32),
}

impl RankDelta {
    /// Delta from `previous - current`.
    ///
    /// An absent rank on either side is `NoChange`; it is never treated as 0.
    /// Any non-zero delta keeps its direction; the magnitude is truncated
    /// toward zero.
    pub fn between(previous: Option<Rank>, current: Option<Rank>) -> Self {
        let (previous, current) = match (previous, current) {
            (Some(p), Some(c)) => (p, c),
            _ => return RankDelta::NoChange,
        };

        let delta = previous - current;
        if delta == 0.0 || !delta.is_finite() {
            return RankDelta::NoChange;
        }
        let magnitude = delta.abs().trunc();

        // float-to-int casts saturate
        let magnitude = magnitude as u32;
        if delta > 0.0 {
            RankDelta::Improved(magnitude)
        } else {
            RankDelta::Worsened(magnitude)
        }
    }

    /// Places moved, always non-negative
    pub fn magnitude(&self) -> u32 {
        match self {
            RankDelta::NoChange => 0,
            RankDelta::Improved(n) | RankDelta::Worsened(n) => *n,
        }
    }

    /// Signed form: positive for improvement
    pub fn signed(&self) -> i64 {
        match self {
            RankDelta::NoChange => 0,
            RankDelta::Improved(n) => i64::from(*n),
            RankDelta::Worsened(n) => -i64::from(*n),
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, RankDelta::NoChange)
    }

    /// Compact arrow form for terminal tables
    pub fn glyph(&self) -> String {
        match self {
            RankDelta::NoChange => "➖".to_string(),
            RankDelta::Improved(n) => format!("⬆️ {}", n),
            RankDelta::Worsened(n) => format!("⬇️ {}", n),
        }
    }
}

impl fmt::Display for RankDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankDelta::NoChange => write!(f, "no change"),
            RankDelta::Improved(n) => write!(f, "improved by {}", n),
            RankDelta::Worsened(n) => write!(f, "worsened by {}", n),
        }
    }
}

impl Serialize for RankDelta {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Computes [`RankDelta`] for snapshots
#[derive(Debug, Clone, Copy, Default)]
pub struct RankDeltaCalculator;

impl RankDeltaCalculator {
    pub fn new() -> Self {
        Self
    }

    pub fn calculate(&self, snapshot: &InstrumentSnapshot) -> RankDelta {
        RankDelta::between(snapshot.previous_rank, snapshot.current_rank)
    }
}
