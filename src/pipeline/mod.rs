//! Ranking pipeline - from a raw snapshot table to the derived ranking view

pub mod classifiers;
pub mod delta;
pub mod engine;
pub mod filters;
pub mod normalizer;
pub mod predictor;
pub mod view;

pub use classifiers::{Classifier, MembershipClassifier, MembershipStatus};
pub use delta::{RankDelta, RankDeltaCalculator};
pub use engine::{RankingPipeline, RankingReport};
pub use filters::{Filter, SignalFilter};
pub use normalizer::{
    ranks_by_market_cap, InstrumentSnapshot, MarkerField, NormalizationDiagnostics,
    RankSource, RecordNormalizer, SnapshotTable,
};
pub use predictor::{RankBand, RankBandClassifier, ReconstitutionSignal, ThresholdPredictor};
pub use view::{compare_rank, RankedInstrument, RankingView};
