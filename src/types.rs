//! Core scalar types

/// Opaque instrument identifier (ticker / stock code)
pub type Symbol = String;

/// Price type (using f64 for precision)
pub type Price = f64;

/// Market capitalization, in the unit the source table uses
pub type MarketCap = f64;

/// Rank position, 1 = largest market cap.
///
/// Kept as `f64` because ranks arrive as parsed numeric cells; every present
/// rank is finite and at least 1.
pub type Rank = f64;

/// Rank threshold used by configuration (always a whole rank)
pub type RankThreshold = u32;
