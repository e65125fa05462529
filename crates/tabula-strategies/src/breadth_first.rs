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

//! # Breadth-First Search
//!
//! The level-synchronous sibling of the backtracking strategy: level `k`
//! of the frontier holds every valid partial assignment over the first
//! `k` course groups. Pruning is identical (children violating the
//! credit ceiling or conflict budget are never materialized), so after
//! the last level the frontier holds exactly the complete valid states.
//!
//! The frontier is the working set, and it can grow with the product of
//! group sizes, so it is capped at `config.frontier_cap`; children beyond
//! the cap are dropped and counted in the statistics. Exhaustiveness is
//! traded for the bounded memory the contract demands.

use tabula_model::{
    catalog::Catalog,
    config::{SearchConfig, Selection},
    conflict::ConflictIndex,
};
use tabula_search::{
    eval::{self, Evaluator},
    monitor::search_monitor::{SearchCommand, SearchMonitor},
    result::{SearchOutcome, TerminationReason},
    scheduler::{Assignment, GroupPlan, Scheduler},
    stats::SearchStatistics,
};

/// Breadth-first expansion, one course group per level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BreadthFirstScheduler;

impl BreadthFirstScheduler {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl Scheduler for BreadthFirstScheduler {
    fn name(&self) -> &str {
        "breadth-first"
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
        let evaluator = Evaluator::new();

        let mut frontier = vec![Assignment::new(catalog.num_sections(), plan.len())];
        let mut aborted: Option<String> = None;

        'levels: for position in 0..plan.len() {
            let planned = plan.groups()[position];
            let variants = catalog.group(planned.group).sections();
            let mut next = Vec::new();

            for state in frontier.drain(..) {
                monitor.on_step();
                stats.on_step();
                if let SearchCommand::Terminate(reason) = monitor.search_command() {
                    aborted = Some(reason);
                    break 'levels;
                }

                for &section in variants {
                    let mut child = state.clone();
                    if child.try_choose(catalog, conflicts, config, position, section) {
                        if next.len() < config.frontier_cap {
                            next.push(child);
                        } else {
                            stats.on_dropped();
                        }
                    } else {
                        stats.on_pruned();
                    }
                }

                if !planned.mandatory {
                    // Skip arm keeps the parent state alive one level down.
                    if next.len() < config.frontier_cap {
                        next.push(state);
                    } else {
                        stats.on_dropped();
                    }
                }
            }

            frontier = next;
            if frontier.is_empty() {
                break;
            }
        }

        let mut found = Vec::new();
        if aborted.is_none() {
            for state in &frontier {
                debug_assert!(
                    state.num_chosen() >= plan.num_mandatory(),
                    "breadth-first frontier held a state missing mandatory groups: {} of {}",
                    state.num_chosen(),
                    plan.num_mandatory()
                );
                let candidate = state.to_candidate(catalog, config, &evaluator);
                stats.on_candidate();
                monitor.on_candidate_found(&candidate);
                found.push(candidate);
                if found.len() >= config.max_results.saturating_mul(8).max(64) {
                    // First complete states in level order; a bounded
                    // multiple of the requested count keeps ranking cheap.
                    break;
                }
            }
        }

        eval::rank_candidates(catalog, &mut found, config.max_results);
        stats.set_duration(start_time.elapsed());
        monitor.on_exit_search();

        let reason = match aborted {
            Some(reason) => TerminationReason::Aborted(reason),
            None => TerminationReason::Exhausted,
        };
        SearchOutcome::new(found, reason, stats)
    }
}
