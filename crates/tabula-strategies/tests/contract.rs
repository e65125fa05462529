// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Contract conformance of every registered strategy: the invariants any
//! returned schedule must satisfy, the canonical feasibility scenarios,
//! and determinism of the exact strategies.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use tabula_model::{
    catalog::{Catalog, CatalogBuilder},
    config::{SearchConfig, Selection},
    conflict::ConflictIndex,
    section::{SectionKind, SectionRecord},
    slot::{Day, TimeSlot},
};
use tabula_search::monitor::{composite::CompositeMonitor, interrupt::InterruptMonitor};
use tabula_search::result::TerminationReason;
use tabula_strategies::registry::StrategyKind;

fn record(code: &str, main: &str, credit: u32, kind: SectionKind, slots: &[(Day, u8)]) -> SectionRecord {
    SectionRecord {
        code: code.to_string(),
        main_code: main.to_string(),
        name: format!("Course {}", main),
        credit,
        kind,
        slots: slots.iter().map(|&(d, p)| TimeSlot::new(d, p)).collect(),
        instructor: "N.N.".to_string(),
    }
}

/// A mid-sized catalog with variant choices, overlaps, and a credit
/// squeeze, so every strategy has actual decisions to make.
fn campus_catalog() -> Catalog {
    let mut builder = CatalogBuilder::new();
    builder.push(record("CS101-A", "CS101", 6, SectionKind::Lecture, &[(Day::Monday, 1), (Day::Wednesday, 1)]));
    builder.push(record("CS101-B", "CS101", 6, SectionKind::Lecture, &[(Day::Tuesday, 1), (Day::Thursday, 1)]));
    builder.push(record("MATH101-A", "MATH101", 6, SectionKind::Lecture, &[(Day::Monday, 1)]));
    builder.push(record("MATH101-B", "MATH101", 6, SectionKind::Lecture, &[(Day::Friday, 2)]));
    builder.push(record("PHYS101-A", "PHYS101", 5, SectionKind::Lecture, &[(Day::Wednesday, 3)]));
    builder.push(record("PHYS101-L", "PHYS101L", 3, SectionKind::Lab, &[(Day::Thursday, 5)]));
    builder.push(record("ENG101-A", "ENG101", 4, SectionKind::ProblemSession, &[(Day::Tuesday, 1)]));
    builder.push(record("ENG101-B", "ENG101", 4, SectionKind::ProblemSession, &[(Day::Friday, 4)]));
    builder.build().unwrap()
}

#[test]
fn test_every_strategy_upholds_the_hard_invariants() {
    let catalog = campus_catalog();
    let conflicts = ConflictIndex::build(&catalog);
    let selection = Selection::new(
        ["CS101", "MATH101"],
        ["PHYS101", "PHYS101L", "ENG101"],
    );
    let config = SearchConfig::new(18).with_max_results(8);

    for kind in StrategyKind::ALL {
        let outcome = kind
            .instantiate()
            .generate(&catalog, &conflicts, &selection, &config);

        assert!(
            !outcome.is_empty(),
            "{} found nothing on a feasible selection",
            kind
        );
        assert!(outcome.len() <= config.max_results, "{} overflowed", kind);

        for candidate in outcome.candidates() {
            // At most one section per logical course.
            let mut mains = HashSet::new();
            for &section in candidate.sections() {
                assert!(
                    mains.insert(catalog.section(section).main_code()),
                    "{} returned two sections of one course",
                    kind
                );
            }
            // Hard caps.
            assert!(
                candidate.total_credit() <= config.max_credit,
                "{} exceeded the credit ceiling",
                kind
            );
            assert_eq!(
                candidate.conflict_pairs(),
                0,
                "{} returned a conflicted schedule without a budget",
                kind
            );
            // Mandatory coverage.
            assert!(candidate.contains_course(&catalog, "CS101"), "{}", kind);
            assert!(candidate.contains_course(&catalog, "MATH101"), "{}", kind);
        }

        // Best-first ordering.
        for pair in outcome.candidates().windows(2) {
            assert!(
                pair[0].score() >= pair[1].score(),
                "{} returned candidates out of order",
                kind
            );
        }
    }
}

#[test]
fn test_conflict_budget_is_respected_when_allowed() {
    let mut builder = CatalogBuilder::new();
    builder.push(record("CS101-A", "CS101", 6, SectionKind::Lecture, &[(Day::Monday, 1)]));
    builder.push(record("CS102-A", "CS102", 6, SectionKind::Lecture, &[(Day::Monday, 1)]));
    builder.push(record("CS103-A", "CS103", 6, SectionKind::Lecture, &[(Day::Monday, 1)]));
    let catalog = builder.build().unwrap();
    let conflicts = ConflictIndex::build(&catalog);
    let selection = Selection::new(["CS101", "CS102"], ["CS103"]);
    let config = SearchConfig::new(30).with_conflicts(1).with_max_results(8);

    for kind in StrategyKind::ALL {
        let outcome = kind
            .instantiate()
            .generate(&catalog, &conflicts, &selection, &config);

        assert!(!outcome.is_empty(), "{} found nothing", kind);
        for candidate in outcome.candidates() {
            assert!(
                candidate.conflict_pairs() <= 1,
                "{} blew the conflict budget",
                kind
            );
            // CS103 would add two more pairs; it can never fit.
            assert!(
                !candidate.contains_course(&catalog, "CS103"),
                "{} accepted a third overlapping course",
                kind
            );
        }
    }
}

#[test]
fn test_two_course_scenario_has_exactly_one_answer() {
    let mut builder = CatalogBuilder::new();
    builder.push(record("CS101-A", "CS101", 6, SectionKind::Lecture, &[(Day::Monday, 1)]));
    builder.push(record("MATH101-A", "MATH101", 6, SectionKind::Lecture, &[(Day::Tuesday, 2)]));
    let catalog = builder.build().unwrap();
    let conflicts = ConflictIndex::build(&catalog);
    let selection = Selection::new(["CS101", "MATH101"], Vec::<String>::new());
    let config = SearchConfig::new(12);

    for kind in StrategyKind::ALL {
        let outcome = kind
            .instantiate()
            .generate(&catalog, &conflicts, &selection, &config);
        assert_eq!(outcome.len(), 1, "{}", kind);
        let best = outcome.best().unwrap();
        assert_eq!(best.num_sections(), 2, "{}", kind);
        assert_eq!(best.total_credit(), 12, "{}", kind);
        assert_eq!(best.conflict_pairs(), 0, "{}", kind);
    }
}

#[test]
fn test_credit_infeasible_scenario_is_empty_everywhere() {
    let mut builder = CatalogBuilder::new();
    builder.push(record("CS101-A", "CS101", 6, SectionKind::Lecture, &[(Day::Monday, 1)]));
    builder.push(record("MATH101-A", "MATH101", 6, SectionKind::Lecture, &[(Day::Tuesday, 2)]));
    let catalog = builder.build().unwrap();
    let conflicts = ConflictIndex::build(&catalog);
    let selection = Selection::new(["CS101", "MATH101"], Vec::<String>::new());
    let config = SearchConfig::new(10);

    for kind in StrategyKind::ALL {
        let outcome = kind
            .instantiate()
            .generate(&catalog, &conflicts, &selection, &config);
        assert!(outcome.is_empty(), "{} fabricated a schedule", kind);
    }
}

#[test]
fn test_empty_inputs_yield_empty_results_everywhere() {
    let empty_catalog = CatalogBuilder::new().build().unwrap();
    let empty_conflicts = ConflictIndex::build(&empty_catalog);
    let populated = campus_catalog();
    let populated_conflicts = ConflictIndex::build(&populated);
    let config = SearchConfig::new(30);

    for kind in StrategyKind::ALL {
        let outcome = kind.instantiate().generate(
            &empty_catalog,
            &empty_conflicts,
            &Selection::new(["CS101"], Vec::<String>::new()),
            &config,
        );
        assert!(outcome.is_empty(), "{} on empty catalog", kind);

        let outcome = kind.instantiate().generate(
            &populated,
            &populated_conflicts,
            &Selection::default(),
            &config,
        );
        assert!(outcome.is_empty(), "{} on empty selection", kind);

        let outcome = kind.instantiate().generate(
            &populated,
            &populated_conflicts,
            &Selection::new(["GHOST999"], Vec::<String>::new()),
            &config,
        );
        assert!(outcome.is_empty(), "{} on unknown mandatory code", kind);
    }
}

#[test]
fn test_deterministic_strategies_are_idempotent() {
    let catalog = campus_catalog();
    let conflicts = ConflictIndex::build(&catalog);
    let selection = Selection::new(
        ["CS101", "MATH101"],
        ["PHYS101", "PHYS101L", "ENG101"],
    );
    let config = SearchConfig::new(18).with_max_results(8);

    let deterministic = [
        StrategyKind::Backtracking,
        StrategyKind::BreadthFirst,
        StrategyKind::Greedy,
        StrategyKind::AStar,
        StrategyKind::ConstraintPropagation,
    ];
    for kind in deterministic {
        let first = kind
            .instantiate()
            .generate(&catalog, &conflicts, &selection, &config);
        let second = kind
            .instantiate()
            .generate(&catalog, &conflicts, &selection, &config);
        assert_eq!(
            first.candidates(),
            second.candidates(),
            "{} is not idempotent",
            kind
        );
    }
}

#[test]
fn test_stochastic_strategies_reproduce_under_a_fixed_seed() {
    let catalog = campus_catalog();
    let conflicts = ConflictIndex::build(&catalog);
    let selection = Selection::new(["CS101", "MATH101"], ["ENG101"]);
    let config = SearchConfig::new(18).with_seed(424242);

    for kind in [StrategyKind::Genetic, StrategyKind::SimulatedAnnealing] {
        let first = kind
            .instantiate()
            .generate(&catalog, &conflicts, &selection, &config);
        let second = kind
            .instantiate()
            .generate(&catalog, &conflicts, &selection, &config);
        assert_eq!(
            first.candidates(),
            second.candidates(),
            "{} diverged under a fixed seed",
            kind
        );
    }
}

#[test]
fn test_interrupt_stops_a_search_cooperatively() {
    let catalog = campus_catalog();
    let conflicts = ConflictIndex::build(&catalog);
    let selection = Selection::new(
        ["CS101", "MATH101"],
        ["PHYS101", "PHYS101L", "ENG101"],
    );
    let config = SearchConfig::new(18).with_max_results(8);

    // A pre-set flag must stop every strategy at its first checkpoint,
    // with an empty but well-formed outcome.
    let flag = AtomicBool::new(true);
    for kind in StrategyKind::ALL {
        let mut monitor = CompositeMonitor::new();
        monitor.add_monitor(InterruptMonitor::new(&flag));
        let outcome = kind.instantiate().generate_with_monitor(
            &catalog,
            &conflicts,
            &selection,
            &config,
            &mut monitor,
        );
        match outcome.reason() {
            TerminationReason::Aborted(reason) => {
                assert!(reason.contains("interrupt"), "{}: {}", kind, reason)
            }
            other => panic!("{} ignored the interrupt: {}", kind, other),
        }
    }
    assert!(flag.load(Ordering::Relaxed));
}

#[test]
fn test_time_limited_run_returns_valid_partial_results() {
    // A catalog wide enough that exhaustive enumeration cannot finish
    // within a zero deadline.
    let mut builder = CatalogBuilder::new();
    for g in 0..6usize {
        for v in 0..6u8 {
            builder.push(record(
                &format!("C{}-{}", g, v),
                &format!("C{}", g),
                2,
                SectionKind::Lecture,
                &[(Day::ALL[g % 7], v)],
            ));
        }
    }
    let catalog = builder.build().unwrap();
    let conflicts = ConflictIndex::build(&catalog);
    let selection = Selection::new(
        ["C0", "C1", "C2", "C3", "C4", "C5"],
        Vec::<String>::new(),
    );
    let config = SearchConfig::new(30)
        .with_max_results(1_000_000)
        .with_time_limit(std::time::Duration::ZERO);

    for kind in [StrategyKind::Backtracking, StrategyKind::ConstraintPropagation] {
        let outcome = kind
            .instantiate()
            .generate(&catalog, &conflicts, &selection, &config);
        assert!(
            matches!(outcome.reason(), TerminationReason::Aborted(_)),
            "{} ignored the deadline",
            kind
        );
        for candidate in outcome.candidates() {
            assert_eq!(candidate.conflict_pairs(), 0);
            assert!(candidate.total_credit() <= 30);
        }
    }
}
