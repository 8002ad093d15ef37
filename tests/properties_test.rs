//! Property tests over randomly generated snapshot tables

use proptest::prelude::*;
use rankwatch::config::RankingConfig;
use rankwatch::pipeline::{
    compare_rank, MembershipStatus, RankDelta, RankingPipeline, ReconstitutionSignal,
};
use rankwatch::table::{RawTable, RawValue};
use std::cmp::Ordering;

#[derive(Debug, Clone)]
struct Row {
    current: Option<u32>,
    previous: Option<u32>,
    marker: Option<&'static str>,
    garbage_rank: bool,
}

fn row_strategy() -> impl Strategy<Value = Row> {
    (
        proptest::option::of(1u32..200),
        proptest::option::of(1u32..200),
        proptest::option::of(prop_oneof![Just("✅"), Just("✅ in"), Just(""), Just("no")]),
        any::<bool>(),
    )
        .prop_map(|(current, previous, marker, garbage)| Row {
            current,
            previous,
            marker,
            garbage_rank: garbage && current.is_none(),
        })
}

fn build_table(rows: &[Row], with_marker: bool) -> RawTable {
    let mut columns = vec!["symbol", "current_rank", "previous_rank"];
    if with_marker {
        columns.push("membership_marker");
    }

    let raw_rows = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let current = match (row.current, row.garbage_rank) {
                (Some(rank), _) => RawValue::Text(rank.to_string()),
                (None, true) => RawValue::from("n/a"),
                (None, false) => RawValue::Missing,
            };
            let mut cells = vec![
                RawValue::Text(format!("S{}", idx)),
                current,
                row.previous.map(f64::from).into(),
            ];
            if with_marker {
                cells.push(row.marker.into());
            }
            cells
        })
        .collect();

    RawTable::from_rows(&columns, raw_rows)
}

fn pipeline(top_n: usize) -> RankingPipeline {
    RankingPipeline::new(RankingConfig::default().with_top_n(top_n)).unwrap()
}

proptest! {
    #[test]
    fn run_is_idempotent(rows in proptest::collection::vec(row_strategy(), 0..60), marker in any::<bool>()) {
        let table = build_table(&rows, marker);
        let pipeline = pipeline(25);
        prop_assert_eq!(pipeline.run(&table), pipeline.run(&table));
    }

    #[test]
    fn main_table_is_truncated_and_ordered(
        rows in proptest::collection::vec(row_strategy(), 0..80),
        top_n in 1usize..100,
    ) {
        let table = build_table(&rows, true);
        let report = pipeline(top_n).run(&table);

        prop_assert_eq!(report.rows.len(), top_n.min(rows.len()));
        for pair in report.rows.windows(2) {
            prop_assert_ne!(
                compare_rank(pair[0].current_rank, pair[1].current_rank),
                Ordering::Greater
            );
        }
    }

    #[test]
    fn delta_matches_rank_difference(rows in proptest::collection::vec(row_strategy(), 1..40)) {
        let table = build_table(&rows, true);
        let report = pipeline(1000).run(&table);

        for row in &report.rows {
            match (row.previous_rank, row.current_rank) {
                (Some(p), Some(c)) if p > c => {
                    prop_assert_eq!(row.rank_delta, RankDelta::Improved((p - c) as u32));
                }
                (Some(p), Some(c)) if p < c => {
                    prop_assert_eq!(row.rank_delta, RankDelta::Worsened((c - p) as u32));
                }
                _ => prop_assert_eq!(row.rank_delta, RankDelta::NoChange),
            }
        }
    }

    #[test]
    fn unknown_membership_never_signals(rows in proptest::collection::vec(row_strategy(), 0..40)) {
        let table = build_table(&rows, false);
        let report = pipeline(1000).run(&table);

        for row in &report.rows {
            prop_assert_eq!(row.membership_status, MembershipStatus::Unknown);
            prop_assert_eq!(row.reconstitution_signal, ReconstitutionSignal::None);
        }
        prop_assert!(report.likely_additions.is_empty());
        prop_assert!(report.likely_removals.is_empty());
    }

    #[test]
    fn known_membership_is_never_unknown(rows in proptest::collection::vec(row_strategy(), 0..40)) {
        let table = build_table(&rows, true);
        let report = pipeline(1000).run(&table);

        for row in &report.rows {
            prop_assert!(row.membership_status.is_known());
            if row.current_rank.is_none() {
                prop_assert_eq!(row.reconstitution_signal, ReconstitutionSignal::None);
            }
        }
    }

    #[test]
    fn sub_views_are_exact_filters_of_full_set(
        rows in proptest::collection::vec(row_strategy(), 0..80),
        top_n in 1usize..20,
    ) {
        let table = build_table(&rows, true);
        let full = pipeline(1000).run(&table);
        let truncated = pipeline(top_n).run(&table);

        let adds = full
            .rows
            .iter()
            .filter(|r| r.reconstitution_signal == ReconstitutionSignal::LikelyAdd)
            .count();
        let removes = full
            .rows
            .iter()
            .filter(|r| r.reconstitution_signal == ReconstitutionSignal::LikelyRemove)
            .count();

        prop_assert_eq!(truncated.likely_additions.len(), adds);
        prop_assert_eq!(truncated.likely_removals.len(), removes);
    }
}
