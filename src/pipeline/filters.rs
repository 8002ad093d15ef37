//! Filters - boolean screens over derived rows

use super::predictor::ReconstitutionSignal;
use super::view::RankedInstrument;

/// Filter trait - decides whether a derived row passes
pub trait Filter: Send + Sync {
    /// True when the row passes the screen
    fn accepts(&self, row: &RankedInstrument) -> bool;

    /// Get filter name for debugging
    fn name(&self) -> &str {
        "Filter"
    }

    /// Rows that pass, in their original order
    fn apply(&self, rows: &[RankedInstrument]) -> Vec<RankedInstrument> {
        rows.iter().filter(|row| self.accepts(row)).cloned().collect()
    }
}

/// Passes rows carrying a given reconstitution signal
#[derive(Debug, Clone)]
pub struct SignalFilter {
    signal: ReconstitutionSignal,
    name: String,
}

impl SignalFilter {
    pub fn new(signal: ReconstitutionSignal) -> Self {
        Self {
            signal,
            name: format!("signal({})", signal),
        }
    }

    pub fn likely_additions() -> Self {
        Self::new(ReconstitutionSignal::LikelyAdd)
    }

    pub fn likely_removals() -> Self {
        Self::new(ReconstitutionSignal::LikelyRemove)
    }
}

impl Filter for SignalFilter {
    fn accepts(&self, row: &RankedInstrument) -> bool {
        row.reconstitution_signal == self.signal
    }

    fn name(&self) -> &str {
        &self.name
    }
}
