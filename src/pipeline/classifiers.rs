//! Classifiers - categorical labels derived from a single snapshot
//!
//! Classifiers look at one normalized row and produce a label. They hold no
//! state between rows.

use super::normalizer::{InstrumentSnapshot, MarkerField};
use crate::error::{RankWatchError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classifier trait - produces a categorical label for a snapshot
pub trait Classifier: Send + Sync {
    type Label;

    /// Label one snapshot
    fn classify(&self, snapshot: &InstrumentSnapshot) -> Self::Label;

    /// Get classifier name for debugging
    fn name(&self) -> &str {
        "Classifier"
    }
}

/// Current membership in the reference index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MembershipStatus {
    In,
    Out,
    /// The source has no marker column; not eligible for reconstitution signals
    Unknown,
}

impl MembershipStatus {
    pub fn is_known(&self) -> bool {
        !matches!(self, MembershipStatus::Unknown)
    }

    /// Single-letter form used by the terminal table
    pub fn short(&self) -> &'static str {
        match self {
            MembershipStatus::In => "V",
            MembershipStatus::Out => "X",
            MembershipStatus::Unknown => "?",
        }
    }
}

impl fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MembershipStatus::In => write!(f, "IN"),
            MembershipStatus::Out => write!(f, "OUT"),
            MembershipStatus::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Membership from the raw marker: `IN` when the marker text contains the
/// affirmative token, `OUT` otherwise, `UNKNOWN` when the column is absent.
#[derive(Debug, Clone)]
pub struct MembershipClassifier {
    token: String,
}

impl MembershipClassifier {
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.is_empty() {
            return Err(RankWatchError::ConfigError(
                "membership token must not be empty".to_string(),
            ));
        }

        Ok(Self { token })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Classify a marker cell of a column that exists
    pub fn classify_marker(&self, marker: Option<&str>) -> MembershipStatus {
        match marker {
            Some(text) if text.contains(self.token.as_str()) => MembershipStatus::In,
            _ => MembershipStatus::Out,
        }
    }
}

impl Classifier for MembershipClassifier {
    type Label = MembershipStatus;

    fn classify(&self, snapshot: &InstrumentSnapshot) -> MembershipStatus {
        match &snapshot.membership_marker {
            MarkerField::NoColumn => MembershipStatus::Unknown,
            MarkerField::Value(marker) => self.classify_marker(marker.as_deref()),
        }
    }

    fn name(&self) -> &str {
        "MembershipClassifier"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(marker: MarkerField) -> InstrumentSnapshot {
        InstrumentSnapshot {
            symbol: "2330".to_string(),
            name: "TSMC".to_string(),
            price: None,
            market_cap: None,
            current_rank: Some(1.0),
            previous_rank: Some(1.0),
            membership_marker: marker,
        }
    }

    #[test]
    fn test_token_substring_is_member() {
        let classifier = MembershipClassifier::new("✅").unwrap();

        assert_eq!(classifier.classify_marker(Some("✅")), MembershipStatus::In);
        assert_eq!(
            classifier.classify_marker(Some("✅ included")),
            MembershipStatus::In
        );
        assert_eq!(
            classifier.classify_marker(Some("already ✅")),
            MembershipStatus::In
        );
    }

    #[test]
    fn test_other_content_is_not_member() {
        let classifier = MembershipClassifier::new("✅").unwrap();

        assert_eq!(classifier.classify_marker(Some("")), MembershipStatus::Out);
        assert_eq!(classifier.classify_marker(Some("❌")), MembershipStatus::Out);
        assert_eq!(classifier.classify_marker(Some("V")), MembershipStatus::Out);
        assert_eq!(classifier.classify_marker(None), MembershipStatus::Out);
    }

    #[test]
    fn test_missing_column_is_unknown() {
        let classifier = MembershipClassifier::new("✅").unwrap();

        assert_eq!(
            classifier.classify(&snapshot(MarkerField::NoColumn)),
            MembershipStatus::Unknown
        );
        assert_eq!(
            classifier.classify(&snapshot(MarkerField::Value(None))),
            MembershipStatus::Out
        );
        assert_eq!(
            classifier.classify(&snapshot(MarkerField::Value(Some("✅".to_string())))),
            MembershipStatus::In
        );
    }

    #[test]
    fn test_custom_token() {
        let classifier = MembershipClassifier::new("Y").unwrap();
        assert_eq!(classifier.classify_marker(Some("Y")), MembershipStatus::In);
        assert_eq!(classifier.classify_marker(Some("✅")), MembershipStatus::Out);
        assert!(MembershipClassifier::new("").is_err());
    }

    #[test]
    fn test_status_rendering() {
        assert_eq!(MembershipStatus::In.to_string(), "IN");
        assert_eq!(MembershipStatus::Unknown.short(), "?");
        assert!(!MembershipStatus::Unknown.is_known());
        assert_eq!(
            serde_json::to_string(&MembershipStatus::Out).unwrap(),
            "\"OUT\""
        );
    }

    #[test]
    fn test_classifier_name() {
        let classifier = MembershipClassifier::new("✅").unwrap();
        assert_eq!(classifier.name(), "MembershipClassifier");
    }
}
