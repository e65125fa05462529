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

//! # The Scheduler Contract
//!
//! Every search strategy implements `Scheduler`: identical read-only
//! inputs (catalog, conflict index, selection, configuration), identical
//! output (a ranked `SearchOutcome`), identical budget discipline through
//! the monitor stack. The contract is what makes the strategies
//! interchangeable and the benchmark harness able to attribute every
//! difference to the exploration policy alone.
//!
//! Two shared pieces live here because every strategy needs them:
//!
//! - `GroupPlan` resolves a `Selection` against a catalog into an ordered
//!   list of course groups (mandatory first, selection order preserved).
//!   Resolution fails (the search is over before it starts, with an
//!   empty result) when the mandatory list is empty, when a mandatory
//!   code matches no group, or when the catalog is empty. Unknown
//!   optional codes are dropped silently; they are best-effort by
//!   definition.
//! - `Assignment` is the incremental working state every exploration
//!   policy mutates: the chosen variant per planned group, the
//!   `SectionMask` of chosen sections, and running credit/conflict
//!   totals. `try_choose` enforces the hard caps at generation time: a
//!   state that violates the one-per-group rule, the credit ceiling, or
//!   the conflict budget is never created, so post-filtering is never
//!   needed.

use crate::{eval::Evaluator, monitor, monitor::search_monitor::SearchMonitor, result::SearchOutcome};
use rustc_hash::FxHashSet;
use tabula_model::{
    candidate::ScheduleCandidate,
    catalog::Catalog,
    config::{SearchConfig, Selection},
    conflict::{ConflictIndex, SectionMask},
    index::{GroupIndex, SectionIndex},
};

/// One course group in a resolved plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlannedGroup {
    pub group: GroupIndex,
    pub mandatory: bool,
}

/// A selection resolved against a catalog: the ordered course groups a
/// search iterates over. Mandatory groups come first, both segments in
/// selection order, duplicates removed (mandatory wins over optional).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupPlan {
    groups: Vec<PlannedGroup>,
}

impl GroupPlan {
    /// Resolves a selection. Returns `None` when no search is warranted:
    /// the catalog is empty, the mandatory list is empty, or a mandatory
    /// code has no matching course group. All of these are expected
    /// outcomes of user-chosen constraints, reported as an empty result
    /// list by the caller, never an error.
    pub fn resolve(catalog: &Catalog, selection: &Selection) -> Option<Self> {
        if catalog.is_empty() || selection.mandatory().is_empty() {
            return None;
        }

        let mut seen: FxHashSet<GroupIndex> = FxHashSet::default();
        let mut groups = Vec::new();

        for code in selection.mandatory() {
            let group = catalog.group_by_code(code)?;
            if seen.insert(group) {
                groups.push(PlannedGroup {
                    group,
                    mandatory: true,
                });
            }
        }

        for code in selection.optional() {
            if let Some(group) = catalog.group_by_code(code) {
                if seen.insert(group) {
                    groups.push(PlannedGroup {
                        group,
                        mandatory: false,
                    });
                }
            }
        }

        Some(Self { groups })
    }

    /// Returns the planned groups, mandatory first.
    #[inline]
    pub fn groups(&self) -> &[PlannedGroup] {
        &self.groups
    }

    /// Returns the number of planned groups.
    #[inline]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` if the plan holds no groups.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Returns the number of mandatory groups (the leading segment).
    #[inline]
    pub fn num_mandatory(&self) -> usize {
        self.groups.iter().filter(|g| g.mandatory).count()
    }
}

/// The incremental working state of a search: one chosen variant per
/// planned group, the mask of chosen sections, and running totals.
///
/// Invariants (debug-checked):
/// - `chosen[p]` is `Some` for at most one section of plan group `p`;
/// - `total_credit <= config.max_credit` and
///   `conflict_pairs <= config.conflict_budget()` hold after every
///   successful `try_choose`; violating states are rejected before they
///   exist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    mask: SectionMask,
    chosen: Vec<Option<SectionIndex>>,
    total_credit: u32,
    conflict_pairs: u32,
}

impl Assignment {
    /// Creates an empty assignment for `num_groups` planned groups over a
    /// catalog with `num_sections` sections.
    #[inline]
    pub fn new(num_sections: usize, num_groups: usize) -> Self {
        Self {
            mask: SectionMask::new(num_sections),
            chosen: vec![None; num_groups],
            total_credit: 0,
            conflict_pairs: 0,
        }
    }

    /// Attempts to choose `section` for plan position `position`. Returns
    /// `false`, leaving the state untouched, if the choice would exceed
    /// the credit ceiling or the conflict budget.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the position is out of bounds or
    /// already resolved.
    pub fn try_choose(
        &mut self,
        catalog: &Catalog,
        conflicts: &ConflictIndex,
        config: &SearchConfig,
        position: usize,
        section: SectionIndex,
    ) -> bool {
        debug_assert!(
            position < self.chosen.len(),
            "called `Assignment::try_choose` with position out of bounds: the len is {} but the position is {}",
            self.chosen.len(),
            position
        );
        debug_assert!(
            self.chosen[position].is_none(),
            "called `Assignment::try_choose` on an already resolved position {}",
            position
        );

        let credit = catalog.section(section).credit();
        if self.total_credit + credit > config.max_credit {
            return false;
        }

        let new_pairs = conflicts.new_conflict_pairs(&self.mask, section);
        if self.conflict_pairs + new_pairs > config.conflict_budget() {
            return false;
        }

        self.mask.add(section);
        self.chosen[position] = Some(section);
        self.total_credit += credit;
        self.conflict_pairs += new_pairs;
        true
    }

    /// Reverts the choice at `position`. A skipped (never chosen)
    /// position is a no-op.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the position is out of bounds.
    pub fn unchoose(
        &mut self,
        catalog: &Catalog,
        conflicts: &ConflictIndex,
        position: usize,
    ) {
        debug_assert!(
            position < self.chosen.len(),
            "called `Assignment::unchoose` with position out of bounds: the len is {} but the position is {}",
            self.chosen.len(),
            position
        );

        if let Some(section) = self.chosen[position].take() {
            // The conflict row carries no self bit, so the pair count is
            // exact even while the section is still in the mask.
            let pairs = conflicts.new_conflict_pairs(&self.mask, section);
            self.mask.remove(section);
            self.total_credit -= catalog.section(section).credit();
            self.conflict_pairs -= pairs;
        }
    }

    /// Returns the chosen section at a plan position.
    #[inline]
    pub fn chosen(&self, position: usize) -> Option<SectionIndex> {
        self.chosen[position]
    }

    /// Returns the mask of chosen sections.
    #[inline]
    pub fn mask(&self) -> &SectionMask {
        &self.mask
    }

    /// Returns the running credit total.
    #[inline]
    pub fn total_credit(&self) -> u32 {
        self.total_credit
    }

    /// Returns the running conflict-pair total.
    #[inline]
    pub fn conflict_pairs(&self) -> u32 {
        self.conflict_pairs
    }

    /// Returns the number of resolved (chosen, not skipped) positions.
    #[inline]
    pub fn num_chosen(&self) -> usize {
        self.chosen.iter().filter(|c| c.is_some()).count()
    }

    /// Returns the chosen sections in plan order.
    #[inline]
    pub fn sections(&self) -> Vec<SectionIndex> {
        self.chosen.iter().filter_map(|&c| c).collect()
    }

    /// Finalizes the assignment into a scored, immutable candidate.
    pub fn to_candidate(
        &self,
        catalog: &Catalog,
        config: &SearchConfig,
        evaluator: &Evaluator,
    ) -> ScheduleCandidate {
        let sections = self.sections();
        let score = evaluator.score(
            catalog,
            config,
            &sections,
            self.total_credit,
            self.conflict_pairs,
        );
        ScheduleCandidate::new(sections, self.total_credit, self.conflict_pairs, score)
    }
}

/// The contract every search strategy implements.
///
/// `generate` builds the default monitor stack from the configuration
/// (candidate limit plus optional time limit); `generate_with_monitor`
/// lets callers layer additional monitors (an external interrupt, a
/// progress logger) into the same per-step checkpoint.
pub trait Scheduler {
    /// Returns the strategy name, as used by the registry and the
    /// benchmark harness.
    fn name(&self) -> &str;

    /// Runs the search with a caller-supplied monitor.
    fn generate_with_monitor(
        &mut self,
        catalog: &Catalog,
        conflicts: &ConflictIndex,
        selection: &Selection,
        config: &SearchConfig,
        monitor: &mut dyn SearchMonitor,
    ) -> SearchOutcome;

    /// Runs the search with the default monitor stack for `config`.
    fn generate(
        &mut self,
        catalog: &Catalog,
        conflicts: &ConflictIndex,
        selection: &Selection,
        config: &SearchConfig,
    ) -> SearchOutcome {
        let mut monitor = monitor::from_config(config);
        self.generate_with_monitor(catalog, conflicts, selection, config, &mut monitor)
    }
}

impl<'a> std::fmt::Debug for dyn Scheduler + 'a {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Scheduler({})", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_model::catalog::CatalogBuilder;
    use tabula_model::section::{SectionKind, SectionRecord};
    use tabula_model::slot::{Day, TimeSlot};

    fn record(code: &str, main: &str, credit: u32, slots: &[(Day, u8)]) -> SectionRecord {
        SectionRecord {
            code: code.to_string(),
            main_code: main.to_string(),
            name: format!("Course {}", main),
            credit,
            kind: SectionKind::Lecture,
            slots: slots.iter().map(|&(d, p)| TimeSlot::new(d, p)).collect(),
            instructor: "N.N.".to_string(),
        }
    }

    fn catalog() -> Catalog {
        let mut builder = CatalogBuilder::new();
        builder.push(record("CS101-A", "CS101", 6, &[(Day::Monday, 1)]));
        builder.push(record("CS101-B", "CS101", 6, &[(Day::Tuesday, 1)]));
        builder.push(record("MATH101-A", "MATH101", 6, &[(Day::Monday, 1)]));
        builder.push(record("PHYS101-A", "PHYS101", 8, &[(Day::Friday, 2)]));
        builder.build().unwrap()
    }

    fn si(i: usize) -> SectionIndex {
        SectionIndex::new(i)
    }

    #[test]
    fn test_plan_orders_mandatory_first_and_dedups() {
        let cat = catalog();
        let selection = Selection::new(["CS101", "MATH101"], ["PHYS101", "CS101"]);
        let plan = GroupPlan::resolve(&cat, &selection).expect("resolvable");

        assert_eq!(plan.len(), 3);
        assert_eq!(plan.num_mandatory(), 2);
        assert!(plan.groups()[0].mandatory);
        assert!(plan.groups()[1].mandatory);
        assert!(!plan.groups()[2].mandatory);
        assert_eq!(
            cat.group(plan.groups()[2].group).main_code(),
            "PHYS101",
            "duplicate optional CS101 must be dropped"
        );
    }

    #[test]
    fn test_plan_fails_on_unknown_mandatory_code() {
        let cat = catalog();
        let selection = Selection::new(["CS101", "NOPE101"], Vec::<String>::new());
        assert!(GroupPlan::resolve(&cat, &selection).is_none());
    }

    #[test]
    fn test_plan_drops_unknown_optional_codes() {
        let cat = catalog();
        let selection = Selection::new(["CS101"], ["NOPE101"]);
        let plan = GroupPlan::resolve(&cat, &selection).expect("resolvable");
        assert_eq!(plan.len(), 1);
    }

    #[test]
    fn test_plan_rejects_empty_mandatory_and_empty_catalog() {
        let cat = catalog();
        let empty_selection = Selection::new(Vec::<String>::new(), vec!["CS101".to_string()]);
        assert!(GroupPlan::resolve(&cat, &empty_selection).is_none());

        let empty_catalog = CatalogBuilder::new().build().unwrap();
        let selection = Selection::new(["CS101"], Vec::<String>::new());
        assert!(GroupPlan::resolve(&empty_catalog, &selection).is_none());
    }

    #[test]
    fn test_try_choose_enforces_credit_cap() {
        let cat = catalog();
        let conflicts = ConflictIndex::build(&cat);
        let config = SearchConfig::new(12);
        let mut assignment = Assignment::new(cat.num_sections(), 3);

        assert!(assignment.try_choose(&cat, &conflicts, &config, 0, si(0)));
        // 6 + 8 = 14 > 12: the PHYS101 section must be rejected.
        assert!(!assignment.try_choose(&cat, &conflicts, &config, 1, si(3)));
        assert_eq!(assignment.total_credit(), 6);
        assert_eq!(assignment.num_chosen(), 1);
    }

    #[test]
    fn test_try_choose_enforces_conflict_budget() {
        let cat = catalog();
        let conflicts = ConflictIndex::build(&cat);

        // CS101-A and MATH101-A both occupy Mon-1.
        let strict = SearchConfig::new(40);
        let mut assignment = Assignment::new(cat.num_sections(), 2);
        assert!(assignment.try_choose(&cat, &conflicts, &strict, 0, si(0)));
        assert!(!assignment.try_choose(&cat, &conflicts, &strict, 1, si(2)));
        assert_eq!(assignment.conflict_pairs(), 0);

        let relaxed = SearchConfig::new(40).with_conflicts(1);
        let mut assignment = Assignment::new(cat.num_sections(), 2);
        assert!(assignment.try_choose(&cat, &conflicts, &relaxed, 0, si(0)));
        assert!(assignment.try_choose(&cat, &conflicts, &relaxed, 1, si(2)));
        assert_eq!(assignment.conflict_pairs(), 1);
    }

    #[test]
    fn test_unchoose_restores_totals() {
        let cat = catalog();
        let conflicts = ConflictIndex::build(&cat);
        let config = SearchConfig::new(40).with_conflicts(5);
        let mut assignment = Assignment::new(cat.num_sections(), 2);

        assignment.try_choose(&cat, &conflicts, &config, 0, si(0));
        assignment.try_choose(&cat, &conflicts, &config, 1, si(2));
        assert_eq!(assignment.total_credit(), 12);
        assert_eq!(assignment.conflict_pairs(), 1);

        assignment.unchoose(&cat, &conflicts, 1);
        assert_eq!(assignment.total_credit(), 6);
        assert_eq!(assignment.conflict_pairs(), 0);
        assert_eq!(assignment.num_chosen(), 1);
        assert!(!assignment.mask().contains(si(2)));

        // Unchoosing a skipped position is a no-op.
        assignment.unchoose(&cat, &conflicts, 1);
        assert_eq!(assignment.total_credit(), 6);
    }

    #[test]
    fn test_to_candidate_carries_metrics() {
        let cat = catalog();
        let conflicts = ConflictIndex::build(&cat);
        let config = SearchConfig::new(40);
        let evaluator = Evaluator::new();
        let mut assignment = Assignment::new(cat.num_sections(), 2);

        assignment.try_choose(&cat, &conflicts, &config, 0, si(1));
        assignment.try_choose(&cat, &conflicts, &config, 1, si(3));

        let candidate = assignment.to_candidate(&cat, &config, &evaluator);
        assert_eq!(candidate.sections(), &[si(1), si(3)]);
        assert_eq!(candidate.total_credit(), 14);
        assert_eq!(candidate.conflict_pairs(), 0);
        assert_eq!(
            candidate.score(),
            evaluator.score_candidate(&cat, &config, &candidate)
        );
    }
}
