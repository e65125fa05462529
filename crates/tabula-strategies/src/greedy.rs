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

//! # Greedy Construction
//!
//! A single committed pass, no backtracking. Mandatory groups are
//! resolved first, in selection order, each taking the variant that
//! introduces the fewest new conflicts (listed order breaks ties); a
//! mandatory group with no admissible variant makes the whole selection
//! infeasible and the pass returns empty. Optional groups are then
//! visited in static desirability order (fewest conflicts any of their
//! variants has with the already-fixed mandatory sections, then lowest
//! variant credit, then plan order), and each takes its best admissible
//! variant or is skipped.
//!
//! The payoff is speed: one candidate in O(groups × variants) conflict
//! queries, which also makes this the seeding pass for the local-search
//! strategies.

use tabula_model::{
    catalog::Catalog,
    config::{SearchConfig, Selection},
    conflict::ConflictIndex,
    index::SectionIndex,
};
use tabula_search::{
    eval::Evaluator,
    monitor::search_monitor::{SearchCommand, SearchMonitor},
    result::{SearchOutcome, TerminationReason},
    scheduler::{Assignment, GroupPlan, Scheduler},
    stats::SearchStatistics,
};

/// Greedy single-pass construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GreedyScheduler;

impl GreedyScheduler {
    #[inline]
    pub fn new() -> Self {
        Self
    }

    /// Builds one greedy assignment over the plan. Returns `None` if a
    /// mandatory group has no admissible variant.
    ///
    /// Shared with the local-search strategies, which use the greedy
    /// assignment as their starting point.
    pub(crate) fn construct(
        catalog: &Catalog,
        conflicts: &ConflictIndex,
        config: &SearchConfig,
        plan: &GroupPlan,
        stats: &mut SearchStatistics,
    ) -> Option<Assignment> {
        let mut assignment = Assignment::new(catalog.num_sections(), plan.len());

        // Mandatory segment: commit the least-conflicting admissible
        // variant of each group, in selection order.
        for (position, planned) in plan.groups().iter().enumerate() {
            if !planned.mandatory {
                continue;
            }
            stats.on_step();
            let variants = catalog.group(planned.group).sections();
            match Self::best_variant(catalog, conflicts, config, &assignment, variants) {
                Some(section) => {
                    let chosen =
                        assignment.try_choose(catalog, conflicts, config, position, section);
                    debug_assert!(
                        chosen,
                        "greedy picked an inadmissible variant for a mandatory group"
                    );
                }
                None => {
                    stats.on_pruned();
                    return None;
                }
            }
        }

        // Optional segment in static desirability order.
        let mut optional: Vec<usize> = plan
            .groups()
            .iter()
            .enumerate()
            .filter(|(_, planned)| !planned.mandatory)
            .map(|(position, _)| position)
            .collect();
        optional.sort_by_key(|&position| {
            let planned = plan.groups()[position];
            let variants = catalog.group(planned.group).sections();
            let min_conflicts = variants
                .iter()
                .map(|&s| conflicts.new_conflict_pairs(assignment.mask(), s))
                .min()
                .unwrap_or(u32::MAX);
            let min_credit = variants
                .iter()
                .map(|&s| catalog.section(s).credit())
                .min()
                .unwrap_or(u32::MAX);
            (min_conflicts, min_credit, position)
        });

        for position in optional {
            stats.on_step();
            let planned = plan.groups()[position];
            let variants = catalog.group(planned.group).sections();
            match Self::best_variant(catalog, conflicts, config, &assignment, variants) {
                Some(section) => {
                    let chosen =
                        assignment.try_choose(catalog, conflicts, config, position, section);
                    debug_assert!(
                        chosen,
                        "greedy picked an inadmissible variant for an optional group"
                    );
                }
                None => stats.on_pruned(), // skip the group
            }
        }

        Some(assignment)
    }

    /// Picks the admissible variant introducing the fewest new conflict
    /// pairs, then the lowest credit, listed order breaking ties. Returns
    /// `None` if no variant fits within the caps.
    fn best_variant(
        catalog: &Catalog,
        conflicts: &ConflictIndex,
        config: &SearchConfig,
        assignment: &Assignment,
        variants: &[SectionIndex],
    ) -> Option<SectionIndex> {
        let mut best: Option<(u32, u32, SectionIndex)> = None;
        for &section in variants {
            let credit = catalog.section(section).credit();
            if assignment.total_credit() + credit > config.max_credit {
                continue;
            }
            let new_pairs = conflicts.new_conflict_pairs(assignment.mask(), section);
            if assignment.conflict_pairs() + new_pairs > config.conflict_budget() {
                continue;
            }
            let key = (new_pairs, credit, section);
            match best {
                Some((bp, bc, _)) if (bp, bc) <= (new_pairs, credit) => {}
                _ => best = Some(key),
            }
        }
        best.map(|(_, _, section)| section)
    }
}

impl Scheduler for GreedyScheduler {
    fn name(&self) -> &str {
        "greedy"
    }

    fn generate_with_monitor(
        &mut self,
        catalog: &Catalog,
        conflicts: &ConflictIndex,
        selection: &Selection,
        config: &SearchConfig,
        monitor: &mut dyn SearchMonitor,
    ) -> SearchOutcome {
        let start_time = std::time::Instant::now();
        let mut stats = SearchStatistics::default();

        let Some(plan) = GroupPlan::resolve(catalog, selection) else {
            stats.set_duration(start_time.elapsed());
            return SearchOutcome::empty(TerminationReason::Exhausted, stats);
        };

        monitor.on_enter_search(catalog);
        monitor.on_step();

        let mut candidates = Vec::new();
        let mut aborted = None;
        if let SearchCommand::Terminate(reason) = monitor.search_command() {
            aborted = Some(reason);
        } else if let Some(assignment) =
            Self::construct(catalog, conflicts, config, &plan, &mut stats)
        {
            let candidate = assignment.to_candidate(catalog, config, &Evaluator::new());
            stats.on_candidate();
            monitor.on_candidate_found(&candidate);
            candidates.push(candidate);
        }

        stats.set_duration(start_time.elapsed());
        monitor.on_exit_search();

        let reason = match aborted {
            Some(reason) => TerminationReason::Aborted(reason),
            None => TerminationReason::Exhausted,
        };
        SearchOutcome::new(candidates, reason, stats)
    }
}
