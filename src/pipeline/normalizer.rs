//! Record normalization - raw cells to typed instrument snapshots
//!
//! Every numeric cell that fails to parse becomes an absent value. Missing
//! columns degrade to absent values too, with two named rules:
//!
//! - no previous-rank column: previous rank is a copy of the current rank
//!   (first run reads as "no change");
//! - no membership-marker column: every marker is [`MarkerField::NoColumn`],
//!   which classifies as `UNKNOWN` rather than `OUT`.
//!
//! When the rank column is missing but market caps are present, ranks are
//! derived from market cap (largest first, ties in input order).

use crate::config::{ColumnMap, Field};
use crate::table::{RawTable, RawValue};
use crate::types::{MarketCap, Price, Rank, Symbol};
use hashbrown::HashSet;
use serde::Serialize;
use std::collections::BTreeMap;

/// Raw membership marker of one row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerField {
    /// The schema has no marker column at all
    NoColumn,
    /// Cell content; `None` for an empty cell
    Value(Option<String>),
}

/// Canonical per-instrument record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstrumentSnapshot {
    pub symbol: Symbol,
    pub name: String,
    pub price: Option<Price>,
    pub market_cap: Option<MarketCap>,
    pub current_rank: Option<Rank>,
    pub previous_rank: Option<Rank>,
    pub membership_marker: MarkerField,
}

/// Where the current ranks came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankSource {
    /// The bound rank column
    #[default]
    Column,
    /// Derived by ordering market caps
    MarketCap,
    /// Neither column exists; all ranks are absent
    Unavailable,
}

/// What the normalizer had to repair. Never affects derived values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizationDiagnostics {
    /// Bound columns not present in the source schema
    pub missing_columns: Vec<Field>,
    /// Non-empty cells that could not be used, per field
    pub malformed_cells: BTreeMap<Field, usize>,
    /// Symbols seen on more than one row
    pub duplicate_symbols: Vec<Symbol>,
    /// Current ranks held by more than one row
    pub duplicate_ranks: Vec<Rank>,
    pub rank_source: RankSource,
    /// Previous ranks were copied from current ranks
    pub previous_rank_synthesized: bool,
}

impl NormalizationDiagnostics {
    /// Total malformed cells across all fields
    pub fn malformed_total(&self) -> usize {
        self.malformed_cells.values().sum()
    }

    pub fn is_clean(&self) -> bool {
        self.missing_columns.is_empty()
            && self.malformed_cells.is_empty()
            && self.duplicate_symbols.is_empty()
            && self.duplicate_ranks.is_empty()
    }

    fn record_malformed(&mut self, field: Field) {
        *self.malformed_cells.entry(field).or_insert(0) += 1;
    }
}

/// Normalized table handed to the classifiers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotTable {
    /// One snapshot per input row, input order
    pub snapshots: Vec<InstrumentSnapshot>,
    pub diagnostics: NormalizationDiagnostics,
}

/// Turns a [`RawTable`] into a [`SnapshotTable`] using a column binding
#[derive(Debug, Clone)]
pub struct RecordNormalizer {
    columns: ColumnMap,
}

impl RecordNormalizer {
    pub fn new(columns: ColumnMap) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &ColumnMap {
        &self.columns
    }

    /// Normalize every row of `table`. Never fails.
    pub fn normalize(&self, table: &RawTable) -> SnapshotTable {
        let mut diagnostics = NormalizationDiagnostics::default();

        let mut index = BTreeMap::new();
        for field in Field::ALL {
            match table.column_index(self.columns.column(field)) {
                Some(idx) => {
                    index.insert(field, idx);
                }
                None => diagnostics.missing_columns.push(field),
            }
        }

        let mut snapshots = Vec::with_capacity(table.len());
        for row in table.rows() {
            let symbol = lookup(&index, row, Field::Symbol)
                .and_then(text)
                .unwrap_or_default();
            let name = lookup(&index, row, Field::Name)
                .and_then(text)
                .unwrap_or_default();

            let price = parse_cell(
                lookup(&index, row, Field::Price),
                Field::Price,
                is_amount,
                &mut diagnostics,
            );
            let market_cap = parse_cell(
                lookup(&index, row, Field::MarketCap),
                Field::MarketCap,
                is_amount,
                &mut diagnostics,
            );
            let current_rank = parse_cell(
                lookup(&index, row, Field::CurrentRank),
                Field::CurrentRank,
                is_rank,
                &mut diagnostics,
            );
            let previous_rank = parse_cell(
                lookup(&index, row, Field::PreviousRank),
                Field::PreviousRank,
                is_rank,
                &mut diagnostics,
            );

            let membership_marker = if index.contains_key(&Field::MembershipMarker) {
                MarkerField::Value(
                    lookup(&index, row, Field::MembershipMarker)
                        .and_then(|v| v.as_text())
                        .map(|s| s.into_owned()),
                )
            } else {
                MarkerField::NoColumn
            };

            snapshots.push(InstrumentSnapshot {
                symbol,
                name,
                price,
                market_cap,
                current_rank,
                previous_rank,
                membership_marker,
            });
        }

        if !index.contains_key(&Field::CurrentRank) {
            if index.contains_key(&Field::MarketCap) {
                log::warn!(
                    "Rank column '{}' not found, ranking by market cap",
                    self.columns.current_rank
                );
                diagnostics.rank_source = RankSource::MarketCap;
                let caps: Vec<Option<MarketCap>> =
                    snapshots.iter().map(|s| s.market_cap).collect();
                for (snapshot, rank) in snapshots.iter_mut().zip(ranks_by_market_cap(&caps)) {
                    snapshot.current_rank = rank;
                }
            } else {
                log::warn!(
                    "Neither '{}' nor '{}' found, all ranks are absent",
                    self.columns.current_rank,
                    self.columns.market_cap
                );
                diagnostics.rank_source = RankSource::Unavailable;
            }
        }

        if !index.contains_key(&Field::PreviousRank) {
            log::debug!(
                "Previous-rank column '{}' not found, assuming no change",
                self.columns.previous_rank
            );
            diagnostics.previous_rank_synthesized = true;
            for snapshot in &mut snapshots {
                snapshot.previous_rank = snapshot.current_rank;
            }
        }

        if !index.contains_key(&Field::MembershipMarker) {
            log::warn!(
                "Membership column '{}' not found, membership is unknown",
                self.columns.membership_marker
            );
        }

        diagnostics.duplicate_symbols = duplicate_symbols(&snapshots);
        diagnostics.duplicate_ranks = duplicate_ranks(&snapshots);
        for symbol in &diagnostics.duplicate_symbols {
            log::warn!("Symbol {} appears on more than one row", symbol);
        }
        if !diagnostics.duplicate_ranks.is_empty() {
            log::warn!(
                "{} rank value(s) shared by several rows, keeping input order",
                diagnostics.duplicate_ranks.len()
            );
        }

        SnapshotTable {
            snapshots,
            diagnostics,
        }
    }
}

impl Default for RecordNormalizer {
    fn default() -> Self {
        Self::new(ColumnMap::default())
    }
}

fn lookup<'a>(
    index: &BTreeMap<Field, usize>,
    row: &'a [RawValue],
    field: Field,
) -> Option<&'a RawValue> {
    // short rows read as absent
    index.get(&field).and_then(|&idx| row.get(idx))
}

/// Prices and market caps are non-negative
fn is_amount(value: f64) -> bool {
    value >= 0.0
}

/// Ranks are whole positions starting at 1
fn is_rank(value: f64) -> bool {
    value >= 1.0 && value.fract() == 0.0
}

/// Parse a numeric cell; values failing `accept` count as malformed.
fn parse_cell(
    value: Option<&RawValue>,
    field: Field,
    accept: fn(f64) -> bool,
    diagnostics: &mut NormalizationDiagnostics,
) -> Option<f64> {
    let value = value?;
    if value.is_missing() {
        return None;
    }

    match value.parse_number() {
        Some(v) if accept(v) => Some(v),
        _ => {
            if value.as_text().is_some_and(|t| !t.trim().is_empty()) {
                diagnostics.record_malformed(field);
            }
            None
        }
    }
}

fn text(value: &RawValue) -> Option<String> {
    value.as_text().map(|s| s.trim().to_string())
}

/// Ordinal ranks by market cap descending; rows without a cap stay unranked.
pub fn ranks_by_market_cap(caps: &[Option<MarketCap>]) -> Vec<Option<Rank>> {
    let mut present: Vec<(usize, MarketCap)> = caps
        .iter()
        .enumerate()
        .filter_map(|(idx, cap)| cap.map(|c| (idx, c)))
        .collect();

    // stable: equal caps keep input order
    present.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut ranks = vec![None; caps.len()];
    for (position, (idx, _)) in present.iter().enumerate() {
        ranks[*idx] = Some((position + 1) as Rank);
    }
    ranks
}

fn duplicate_symbols(snapshots: &[InstrumentSnapshot]) -> Vec<Symbol> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut duplicates = Vec::new();

    for snapshot in snapshots.iter().filter(|s| !s.symbol.is_empty()) {
        if !seen.insert(snapshot.symbol.as_str()) && reported.insert(snapshot.symbol.as_str()) {
            duplicates.push(snapshot.symbol.clone());
        }
    }

    duplicates
}

fn duplicate_ranks(snapshots: &[InstrumentSnapshot]) -> Vec<Rank> {
    let mut ranks: Vec<Rank> = snapshots.iter().filter_map(|s| s.current_rank).collect();
    ranks.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mut duplicates: Vec<Rank> = ranks
        .windows(2)
        .filter(|w| w[0] == w[1])
        .map(|w| w[0])
        .collect();
    duplicates.dedup();
    duplicates
}
