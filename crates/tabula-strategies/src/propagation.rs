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

//! # Constraint-Propagation Search
//!
//! Backtracking with forward checking. Every unresolved course group
//! keeps a domain, the bitset of variant indices still admissible,
//! and each assignment propagates: variants of later groups that would
//! now break the credit ceiling or the conflict budget are removed
//! before any branching happens there. A mandatory group whose domain
//! empties is a proven dead end, cutting the subtree that plain
//! depth-first search would still have to enumerate variant by variant.
//!
//! Domain removals are recorded on an undo trail and rolled back on
//! backtrack, so propagation costs no allocation per node once the
//! domains exist.

use fixedbitset::FixedBitSet;
use tabula_model::{
    candidate::ScheduleCandidate,
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

/// Backtracking over forward-checked variant domains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConstraintPropagationScheduler;

impl ConstraintPropagationScheduler {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl Scheduler for ConstraintPropagationScheduler {
    fn name(&self) -> &str {
        "constraint-propagation"
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

        // Full domains: every variant of every group starts admissible.
        let domains = plan
            .groups()
            .iter()
            .map(|planned| {
                let num_variants = catalog.group(planned.group).num_variants();
                let mut domain = FixedBitSet::with_capacity(num_variants);
                domain.set_range(.., true);
                domain
            })
            .collect();

        let mut session = CpSession {
            catalog,
            conflicts,
            config,
            plan: &plan,
            evaluator: Evaluator::new(),
            monitor,
            assignment: Assignment::new(catalog.num_sections(), plan.len()),
            domains,
            trail: Vec::new(),
            found: Vec::new(),
            stats,
            aborted: None,
        };
        session.descend(0);

        let CpSession {
            mut found,
            mut stats,
            aborted,
            monitor,
            ..
        } = session;

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

/// Per-run state of one propagation search.
struct CpSession<'a> {
    catalog: &'a Catalog,
    conflicts: &'a ConflictIndex,
    config: &'a SearchConfig,
    plan: &'a GroupPlan,
    evaluator: Evaluator,
    monitor: &'a mut dyn SearchMonitor,
    assignment: Assignment,
    /// Per-group admissible variant indices.
    domains: Vec<FixedBitSet>,
    /// Undo log of `(group position, variant index)` domain removals.
    trail: Vec<(usize, usize)>,
    found: Vec<ScheduleCandidate>,
    stats: SearchStatistics,
    aborted: Option<String>,
}

impl CpSession<'_> {
    fn should_stop(&mut self) -> bool {
        if self.aborted.is_some() {
            return true;
        }
        if self.found.len() >= self.config.max_results {
            self.aborted = Some("candidate limit reached".to_string());
            return true;
        }
        if let SearchCommand::Terminate(reason) = self.monitor.search_command() {
            self.aborted = Some(reason);
            return true;
        }
        false
    }

    /// Removes now-inadmissible variants from the domains of all
    /// unresolved groups past `position`. Returns `false` if a mandatory
    /// domain empties (dead end). Every removal lands on the trail.
    fn propagate(&mut self, position: usize) -> bool {
        for later in (position + 1)..self.plan.len() {
            let planned = self.plan.groups()[later];
            let variants = self.catalog.group(planned.group).sections();

            let removals: Vec<usize> = self.domains[later]
                .ones()
                .filter(|&v| {
                    let section = variants[v];
                    let credit = self.catalog.section(section).credit();
                    if self.assignment.total_credit() + credit > self.config.max_credit {
                        return true;
                    }
                    let new_pairs = self
                        .conflicts
                        .new_conflict_pairs(self.assignment.mask(), section);
                    self.assignment.conflict_pairs() + new_pairs
                        > self.config.conflict_budget()
                })
                .collect();

            for v in removals {
                self.domains[later].set(v, false);
                self.trail.push((later, v));
            }

            if planned.mandatory && self.domains[later].count_ones(..) == 0 {
                return false;
            }
        }
        true
    }

    /// Rolls the domain trail back to `mark`.
    fn undo_trail(&mut self, mark: usize) {
        while self.trail.len() > mark {
            let (position, variant) = self.trail.pop().expect("trail underflow");
            self.domains[position].set(variant, true);
        }
    }

    fn descend(&mut self, position: usize) {
        self.monitor.on_step();
        self.stats.on_step();
        if self.should_stop() {
            return;
        }

        if position == self.plan.len() {
            let candidate =
                self.assignment
                    .to_candidate(self.catalog, self.config, &self.evaluator);
            self.stats.on_candidate();
            self.monitor.on_candidate_found(&candidate);
            self.found.push(candidate);
            return;
        }

        let planned = self.plan.groups()[position];
        let variants = self.catalog.group(planned.group).sections();
        let viable: Vec<usize> = self.domains[position].ones().collect();

        for v in viable {
            let section = variants[v];
            if self
                .assignment
                .try_choose(self.catalog, self.conflicts, self.config, position, section)
            {
                let mark = self.trail.len();
                if self.propagate(position) {
                    self.descend(position + 1);
                } else {
                    self.stats.on_pruned();
                }
                self.undo_trail(mark);
                self.assignment
                    .unchoose(self.catalog, self.conflicts, position);
                self.stats.on_backtrack();
                if self.aborted.is_some() {
                    return;
                }
            } else {
                self.stats.on_pruned();
            }
        }

        if !planned.mandatory {
            self.descend(position + 1);
        }
    }
}
