//! Defaults for the ranking configuration

use crate::types::RankThreshold;

/// Number of rows kept in the main ranking table
pub const DEFAULT_TOP_N: usize = 150;

/// Non-members with rank number <= this become addition candidates
pub const DEFAULT_ADD_THRESHOLD: RankThreshold = 40;

/// Members with rank number > this become removal candidates
pub const DEFAULT_REMOVE_THRESHOLD: RankThreshold = 60;

/// Upper edges of the safe / watch / danger display tiers
pub const DEFAULT_RANK_BAND_EDGES: [RankThreshold; 3] = [40, 50, 60];

/// Token whose presence in the marker cell means "index member"
pub const DEFAULT_MEMBERSHIP_TOKEN: &str = "✅";
