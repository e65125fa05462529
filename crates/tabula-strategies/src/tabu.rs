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

//! # Tabu Search
//!
//! Deterministic steepest-ascent hill climbing with short-term memory.
//! Every iteration enumerates the full single-group neighborhood of the
//! current assignment (every alternative variant of every planned group,
//! plus the skip arm of optional groups), ranks the admissible neighbors,
//! and moves to the best one whose signature is not tabu. Signatures of
//! visited schedules are held in a FIFO memory of fixed `tenure`, which
//! is what keeps the walk from cycling straight back; the aspiration
//! criterion overrides the memory whenever a tabu neighbor would beat the
//! global best.
//!
//! Everything is deterministic: neighbor ordering breaks score ties by
//! group position and variant index, so two runs on the same input take
//! the same walk.

use rustc_hash::FxHasher;
use std::collections::{HashSet, VecDeque};
use std::hash::{Hash, Hasher};
use tabula_model::{
    catalog::Catalog,
    config::{SearchConfig, Selection},
    conflict::ConflictIndex,
    index::SectionIndex,
};
use tabula_search::{
    eval::{CandidatePool, Evaluator},
    monitor::{
        self,
        search_monitor::{SearchCommand, SearchMonitor},
    },
    result::{SearchOutcome, TerminationReason},
    scheduler::{Assignment, GroupPlan, Scheduler},
    stats::SearchStatistics,
};

use crate::greedy::GreedyScheduler;

/// Deterministic tabu search over single-group moves.
#[derive(Debug, Clone, Default)]
pub struct TabuSearchScheduler {
    tabu_queue: VecDeque<u64>,
    tabu_set: HashSet<u64>,
}

impl TabuSearchScheduler {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lightweight signature of an assignment: the hash of its sorted
    /// section indices.
    fn signature(assignment: &Assignment) -> u64 {
        let mut sections = assignment.sections();
        sections.sort_unstable();
        let mut hasher = FxHasher::default();
        sections.hash(&mut hasher);
        hasher.finish()
    }

    /// Records a signature, expiring the oldest entry beyond `tenure`.
    fn make_tabu(&mut self, tenure: usize, signature: u64) {
        if self.tabu_queue.len() >= tenure {
            if let Some(oldest) = self.tabu_queue.pop_front() {
                self.tabu_set.remove(&oldest);
            }
        }
        if self.tabu_set.insert(signature) {
            self.tabu_queue.push_back(signature);
        }
    }
}

/// One evaluated neighbor: the move, its resulting score, and the
/// signature of the resulting assignment.
struct Neighbor {
    score: f64,
    position: usize,
    /// Variant index, or `usize::MAX` for the skip arm. Part of the
    /// deterministic tie-break only.
    choice: usize,
    target: Option<SectionIndex>,
    signature: u64,
}

impl Scheduler for TabuSearchScheduler {
    fn name(&self) -> &str {
        "tabu-search"
    }

    fn generate(
        &mut self,
        catalog: &Catalog,
        conflicts: &ConflictIndex,
        selection: &Selection,
        config: &SearchConfig,
    ) -> SearchOutcome {
        // Local search reports only new global bests; its stack is a pure
        // time budget and `max_results` is applied by the final ranking.
        let mut monitor = monitor::time_budget(config);
        self.generate_with_monitor(catalog, conflicts, selection, config, &mut monitor)
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
        self.tabu_queue.clear();
        self.tabu_set.clear();

        let Some(plan) = GroupPlan::resolve(catalog, selection) else {
            stats.set_duration(start_time.elapsed());
            return SearchOutcome::empty(TerminationReason::Exhausted, stats);
        };

        monitor.on_enter_search(catalog);
        let evaluator = Evaluator::new();

        let Some(mut current) =
            GreedyScheduler::construct(catalog, conflicts, config, &plan, &mut stats).or_else(
                || crate::backtracking::first_feasible(catalog, conflicts, config, &plan, &mut stats),
            )
        else {
            stats.set_duration(start_time.elapsed());
            monitor.on_exit_search();
            return SearchOutcome::empty(TerminationReason::Exhausted, stats);
        };

        let mut best_score = evaluator.score(
            catalog,
            config,
            &current.sections(),
            current.total_credit(),
            current.conflict_pairs(),
        );
        let mut pool = CandidatePool::new(config.max_results);
        let initial = current.to_candidate(catalog, config, &evaluator);
        monitor.on_candidate_found(&initial);
        stats.on_candidate();
        pool.push(catalog, initial);
        self.make_tabu(config.tabu_tenure, Self::signature(&current));

        let mut stale: u64 = 0;
        let mut reason = TerminationReason::Exhausted;

        for _ in 0..config.iteration_budget {
            monitor.on_step();
            stats.on_step();
            if let SearchCommand::Terminate(cause) = monitor.search_command() {
                reason = TerminationReason::Aborted(cause);
                break;
            }
            if stale >= config.no_improvement_cutoff {
                reason = TerminationReason::LocalOptimum;
                break;
            }

            let mut neighbors =
                enumerate_neighbors(catalog, conflicts, config, &plan, &mut current, &evaluator);
            neighbors.sort_by(|a, b| {
                b.score
                    .total_cmp(&a.score)
                    .then_with(|| a.position.cmp(&b.position))
                    .then_with(|| a.choice.cmp(&b.choice))
            });

            let chosen = neighbors.into_iter().find(|neighbor| {
                !self.tabu_set.contains(&neighbor.signature) || neighbor.score > best_score
            });

            let Some(neighbor) = chosen else {
                reason = TerminationReason::LocalOptimum;
                break;
            };

            apply(catalog, conflicts, config, &mut current, &neighbor);
            self.make_tabu(config.tabu_tenure, neighbor.signature);

            let candidate = current.to_candidate(catalog, config, &evaluator);
            stats.on_candidate();
            if neighbor.score > best_score {
                best_score = neighbor.score;
                stale = 0;
                monitor.on_candidate_found(&candidate);
            } else {
                stale += 1;
            }
            pool.push(catalog, candidate);
        }

        stats.set_duration(start_time.elapsed());
        monitor.on_exit_search();
        SearchOutcome::new(pool.into_ranked(catalog), reason, stats)
    }
}

/// Applies a chosen neighbor move to `assignment`.
fn apply(
    catalog: &Catalog,
    conflicts: &ConflictIndex,
    config: &SearchConfig,
    assignment: &mut Assignment,
    neighbor: &Neighbor,
) {
    assignment.unchoose(catalog, conflicts, neighbor.position);
    if let Some(section) = neighbor.target {
        let admitted =
            assignment.try_choose(catalog, conflicts, config, neighbor.position, section);
        debug_assert!(admitted, "an enumerated neighbor must stay admissible");
    }
}

/// Enumerates and scores every admissible single-group move. The
/// assignment is mutated during probing but always restored.
fn enumerate_neighbors(
    catalog: &Catalog,
    conflicts: &ConflictIndex,
    config: &SearchConfig,
    plan: &GroupPlan,
    assignment: &mut Assignment,
    evaluator: &Evaluator,
) -> Vec<Neighbor> {
    let mut neighbors = Vec::new();

    for (position, planned) in plan.groups().iter().enumerate() {
        let variants = catalog.group(planned.group).sections();
        let previous = assignment.chosen(position);

        let probe = |target: Option<SectionIndex>,
                         choice: usize,
                         assignment: &mut Assignment,
                         neighbors: &mut Vec<Neighbor>| {
            assignment.unchoose(catalog, conflicts, position);
            let admitted = match target {
                Some(section) => {
                    assignment.try_choose(catalog, conflicts, config, position, section)
                }
                None => true,
            };

            if admitted {
                let score = evaluator.score(
                    catalog,
                    config,
                    &assignment.sections(),
                    assignment.total_credit(),
                    assignment.conflict_pairs(),
                );
                neighbors.push(Neighbor {
                    score,
                    position,
                    choice,
                    target,
                    signature: TabuSearchScheduler::signature(assignment),
                });
                if target.is_some() {
                    assignment.unchoose(catalog, conflicts, position);
                }
            }

            // Restore the previous choice.
            if let Some(section) = previous {
                let restored =
                    assignment.try_choose(catalog, conflicts, config, position, section);
                debug_assert!(restored, "restoring a probed position must always succeed");
            }
        };

        for (v, &section) in variants.iter().enumerate() {
            if previous == Some(section) {
                continue;
            }
            probe(Some(section), v, assignment, &mut neighbors);
        }

        if !planned.mandatory && previous.is_some() {
            probe(None, usize::MAX, assignment, &mut neighbors);
        }
    }

    neighbors
}
