//! Reconstitution prediction and rank banding
//!
//! Two separate questions are answered here:
//!
//! - *signal*: will the index committee likely add or remove the instrument
//!   at the next review? Depends on rank **and** membership.
//! - *band*: how close is the rank to the edge? Depends on rank only and is
//!   used for display emphasis.

use super::classifiers::{Classifier, MembershipStatus};
use super::normalizer::InstrumentSnapshot;
use crate::error::{RankWatchError, Result};
use crate::types::{Rank, RankThreshold};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Expected change at the next reconstitution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReconstitutionSignal {
    LikelyAdd,
    LikelyRemove,
    None,
}

impl fmt::Display for ReconstitutionSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconstitutionSignal::LikelyAdd => write!(f, "LIKELY_ADD"),
            ReconstitutionSignal::LikelyRemove => write!(f, "LIKELY_REMOVE"),
            ReconstitutionSignal::None => write!(f, "NONE"),
        }
    }
}

/// Display tier of a rank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankBand {
    Safe,
    Watch,
    Danger,
    /// Ranked beyond the last edge
    Outside,
    /// No rank
    Unranked,
}

impl fmt::Display for RankBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RankBand::Safe => "safe",
            RankBand::Watch => "watch",
            RankBand::Danger => "danger",
            RankBand::Outside => "outside",
            RankBand::Unranked => "unranked",
        };
        f.write_str(label)
    }
}

/// Maps ranks to [`RankBand`] using three ascending edges.
///
/// With edges `[40, 50, 60]`: 1..=40 safe, 41..=50 watch, 51..=60 danger.
#[derive(Debug, Clone, PartialEq)]
pub struct RankBandClassifier {
    edges: [RankThreshold; 3],
}

impl RankBandClassifier {
    pub fn new(edges: &[RankThreshold]) -> Result<Self> {
        let edges: [RankThreshold; 3] = edges.try_into().map_err(|_| {
            RankWatchError::ConfigError(format!(
                "rank bands need exactly 3 edges, got {}",
                edges.len()
            ))
        })?;

        if edges[0] == 0 || edges[0] >= edges[1] || edges[1] >= edges[2] {
            return Err(RankWatchError::ConfigError(format!(
                "rank band edges must be positive and strictly increasing: {:?}",
                edges
            )));
        }

        Ok(Self { edges })
    }

    pub fn edges(&self) -> &[RankThreshold; 3] {
        &self.edges
    }

    pub fn band(&self, rank: Option<Rank>) -> RankBand {
        let Some(rank) = rank else {
            return RankBand::Unranked;
        };

        let [safe, watch, danger] = self.edges.map(f64::from);
        if rank <= safe {
            RankBand::Safe
        } else if rank <= watch {
            RankBand::Watch
        } else if rank <= danger {
            RankBand::Danger
        } else {
            RankBand::Outside
        }
    }
}

impl Classifier for RankBandClassifier {
    type Label = RankBand;

    fn classify(&self, snapshot: &InstrumentSnapshot) -> RankBand {
        self.band(snapshot.current_rank)
    }

    fn name(&self) -> &str {
        "RankBandClassifier"
    }
}

/// Applies the inclusion / exclusion rank thresholds
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdPredictor {
    add_threshold: RankThreshold,
    remove_threshold: RankThreshold,
    bands: RankBandClassifier,
}

impl ThresholdPredictor {
    /// `add_threshold` must not exceed `remove_threshold`
    pub fn new(
        add_threshold: RankThreshold,
        remove_threshold: RankThreshold,
        bands: RankBandClassifier,
    ) -> Result<Self> {
        if add_threshold > remove_threshold {
            return Err(RankWatchError::ConfigError(format!(
                "add_threshold ({}) must not exceed remove_threshold ({})",
                add_threshold, remove_threshold
            )));
        }

        Ok(Self {
            add_threshold,
            remove_threshold,
            bands,
        })
    }

    pub fn add_threshold(&self) -> RankThreshold {
        self.add_threshold
    }

    pub fn remove_threshold(&self) -> RankThreshold {
        self.remove_threshold
    }

    /// Reconstitution signal. `UNKNOWN` membership or an absent rank never signals.
    pub fn signal(&self, rank: Option<Rank>, membership: MembershipStatus) -> ReconstitutionSignal {
        let Some(rank) = rank else {
            return ReconstitutionSignal::None;
        };

        match membership {
            MembershipStatus::Out if rank <= f64::from(self.add_threshold) => {
                ReconstitutionSignal::LikelyAdd
            }
            MembershipStatus::In if rank > f64::from(self.remove_threshold) => {
                ReconstitutionSignal::LikelyRemove
            }
            _ => ReconstitutionSignal::None,
        }
    }

    /// Display band, independent of membership
    pub fn band(&self, rank: Option<Rank>) -> RankBand {
        self.bands.band(rank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn predictor(add: RankThreshold, remove: RankThreshold) -> ThresholdPredictor {
        let bands = RankBandClassifier::new(&[40, 50, 60]).unwrap();
        ThresholdPredictor::new(add, remove, bands).unwrap()
    }

    #[test]
    fn test_likely_add_at_and_inside_threshold() {
        let p = predictor(40, 60);
        assert_eq!(
            p.signal(Some(38.0), MembershipStatus::Out),
            ReconstitutionSignal::LikelyAdd
        );
        assert_eq!(
            p.signal(Some(40.0), MembershipStatus::Out),
            ReconstitutionSignal::LikelyAdd
        );
        assert_eq!(
            p.signal(Some(41.0), MembershipStatus::Out),
            ReconstitutionSignal::None
        );
    }

    #[test]
    fn test_likely_remove_strictly_beyond_threshold() {
        let p = predictor(40, 60);
        assert_eq!(
            p.signal(Some(60.0), MembershipStatus::In),
            ReconstitutionSignal::None
        );
        assert_eq!(
            p.signal(Some(61.0), MembershipStatus::In),
            ReconstitutionSignal::LikelyRemove
        );
        assert_eq!(
            p.signal(Some(65.0), MembershipStatus::In),
            ReconstitutionSignal::LikelyRemove
        );
    }

    #[test]
    fn test_members_inside_and_outsiders_beyond_are_quiet() {
        let p = predictor(40, 60);
        assert_eq!(
            p.signal(Some(35.0), MembershipStatus::In),
            ReconstitutionSignal::None
        );
        assert_eq!(
            p.signal(Some(45.0), MembershipStatus::Out),
            ReconstitutionSignal::None
        );
        assert_eq!(
            p.signal(Some(90.0), MembershipStatus::Out),
            ReconstitutionSignal::None
        );
    }

    #[test]
    fn test_unknown_and_unranked_never_signal() {
        let p = predictor(40, 60);
        assert_eq!(
            p.signal(Some(1.0), MembershipStatus::Unknown),
            ReconstitutionSignal::None
        );
        assert_eq!(
            p.signal(Some(99.0), MembershipStatus::Unknown),
            ReconstitutionSignal::None
        );
        assert_eq!(
            p.signal(None, MembershipStatus::Out),
            ReconstitutionSignal::None
        );
        assert_eq!(
            p.signal(None, MembershipStatus::In),
            ReconstitutionSignal::None
        );
    }

    #[test]
    fn test_prediction_variant_threshold() {
        let p = predictor(40, 50);
        assert_eq!(
            p.signal(Some(55.0), MembershipStatus::In),
            ReconstitutionSignal::LikelyRemove
        );
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let bands = RankBandClassifier::new(&[40, 50, 60]).unwrap();
        assert!(ThresholdPredictor::new(60, 40, bands).is_err());
    }

    #[test]
    fn test_bands() {
        let p = predictor(40, 60);
        assert_eq!(p.band(Some(1.0)), RankBand::Safe);
        assert_eq!(p.band(Some(40.0)), RankBand::Safe);
        assert_eq!(p.band(Some(41.0)), RankBand::Watch);
        assert_eq!(p.band(Some(50.0)), RankBand::Watch);
        assert_eq!(p.band(Some(51.0)), RankBand::Danger);
        assert_eq!(p.band(Some(60.0)), RankBand::Danger);
        assert_eq!(p.band(Some(61.0)), RankBand::Outside);
        assert_eq!(p.band(None), RankBand::Unranked);
    }

    #[test]
    fn test_band_is_independent_of_signal() {
        let p = predictor(40, 60);
        // a member at 55 is in the danger band but not yet a removal candidate
        assert_eq!(p.band(Some(55.0)), RankBand::Danger);
        assert_eq!(
            p.signal(Some(55.0), MembershipStatus::In),
            ReconstitutionSignal::None
        );
    }

    #[test]
    fn test_band_classifier_validation() {
        assert!(RankBandClassifier::new(&[40, 50]).is_err());
        assert!(RankBandClassifier::new(&[50, 40, 60]).is_err());
        assert!(RankBandClassifier::new(&[0, 40, 60]).is_err());
        assert_eq!(
            RankBandClassifier::new(&[10, 20, 30]).unwrap().edges(),
            &[10, 20, 30]
        );
    }

    #[test]
    fn test_signal_rendering() {
        assert_eq!(ReconstitutionSignal::LikelyAdd.to_string(), "LIKELY_ADD");
        assert_eq!(
            serde_json::to_string(&ReconstitutionSignal::LikelyRemove).unwrap(),
            "\"LIKELY_REMOVE\""
        );
        assert_eq!(RankBand::Danger.to_string(), "danger");
    }
}
