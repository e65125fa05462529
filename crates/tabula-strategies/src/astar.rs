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

//! # A* Best-First Search
//!
//! Frontier states are ordered by `f = g + h`, where `g` is the accrued
//! cost of the partial assignment (a large unit per conflicting pair
//! minus the credit already earned) and `h` is an admissible optimistic
//! bound on the remainder: zero future conflicts and the largest credit
//! the unresolved groups could still earn, clamped to the headroom under
//! the ceiling. `h` never overestimates the true remaining cost, so the
//! first goal states popped are the best ones under the cost model.
//!
//! Ties on `f` are broken by insertion sequence, which keeps expansion,
//! and therefore the result list, fully deterministic. The frontier is
//! the working set; `config.frontier_cap` bounds it, dropped children are
//! counted in the statistics.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
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

/// Cost of one conflicting pair, in the same integer unit as one credit
/// point. Mirrors the evaluator's penalty-to-credit ratio.
const CONFLICT_COST: i64 = 1_000;

/// A* best-first search over course groups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AStarScheduler;

impl AStarScheduler {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

/// One frontier entry. Ordered as a max-heap on `BinaryHeap`, so the
/// comparison is inverted: the smallest `f` (then the earliest sequence
/// number) is the greatest entry.
struct FrontierNode {
    f: i64,
    seq: u64,
    position: usize,
    assignment: Assignment,
}

impl PartialEq for FrontierNode {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f && self.seq == other.seq
    }
}

impl Eq for FrontierNode {}

impl PartialOrd for FrontierNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl Scheduler for AStarScheduler {
    fn name(&self) -> &str {
        "a-star"
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

        // suffix_max_credit[p]: the largest credit the groups at positions
        // p.. could still contribute, ignoring every constraint. Basis of
        // the admissible heuristic.
        let mut suffix_max_credit = vec![0u32; plan.len() + 1];
        for position in (0..plan.len()).rev() {
            let group = catalog.group(plan.groups()[position].group);
            let max_credit = group
                .sections()
                .iter()
                .map(|&s| catalog.section(s).credit())
                .max()
                .unwrap_or(0);
            suffix_max_credit[position] = suffix_max_credit[position + 1] + max_credit;
        }

        let g_of = |assignment: &Assignment| -> i64 {
            i64::from(assignment.conflict_pairs()) * CONFLICT_COST
                - i64::from(assignment.total_credit())
        };
        let h_of = |assignment: &Assignment, position: usize| -> i64 {
            let headroom = config.max_credit - assignment.total_credit();
            -i64::from(suffix_max_credit[position].min(headroom))
        };

        let mut heap: BinaryHeap<FrontierNode> = BinaryHeap::new();
        let mut seq = 0u64;
        let root = Assignment::new(catalog.num_sections(), plan.len());
        heap.push(FrontierNode {
            f: g_of(&root) + h_of(&root, 0),
            seq,
            position: 0,
            assignment: root,
        });

        let mut found = Vec::new();
        let mut aborted: Option<String> = None;

        while let Some(node) = heap.pop() {
            monitor.on_step();
            stats.on_step();
            if found.len() >= config.max_results {
                aborted = Some("candidate limit reached".to_string());
                break;
            }
            if let SearchCommand::Terminate(reason) = monitor.search_command() {
                aborted = Some(reason);
                break;
            }

            if node.position == plan.len() {
                let candidate = node.assignment.to_candidate(catalog, config, &evaluator);
                stats.on_candidate();
                monitor.on_candidate_found(&candidate);
                found.push(candidate);
                continue;
            }

            let planned = plan.groups()[node.position];
            let variants = catalog.group(planned.group).sections();
            let next_position = node.position + 1;

            for &section in variants {
                let mut child = node.assignment.clone();
                if child.try_choose(catalog, conflicts, config, node.position, section) {
                    if heap.len() < config.frontier_cap {
                        seq += 1;
                        heap.push(FrontierNode {
                            f: g_of(&child) + h_of(&child, next_position),
                            seq,
                            position: next_position,
                            assignment: child,
                        });
                    } else {
                        stats.on_dropped();
                    }
                } else {
                    stats.on_pruned();
                }
            }

            if !planned.mandatory {
                if heap.len() < config.frontier_cap {
                    seq += 1;
                    heap.push(FrontierNode {
                        f: g_of(&node.assignment) + h_of(&node.assignment, next_position),
                        seq,
                        position: next_position,
                        assignment: node.assignment,
                    });
                } else {
                    stats.on_dropped();
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
