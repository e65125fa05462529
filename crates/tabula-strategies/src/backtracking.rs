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

//! # Backtracking Depth-First Search
//!
//! The exhaustive baseline: resolve one course group per depth level,
//! trying each section variant in listed order, with an explicit skip arm
//! for optional groups. A branch is cut the moment the credit ceiling or
//! the conflict budget would be exceeded: `Assignment::try_choose`
//! rejects the child before it exists, so the search never holds an
//! invalid state. Complete assignments become candidates; the run ends
//! when the space is exhausted, when `max_results` candidates have been
//! found, or when a monitor calls time.

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

/// Depth-first backtracking over course groups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BacktrackingScheduler;

impl BacktrackingScheduler {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl Scheduler for BacktrackingScheduler {
    fn name(&self) -> &str {
        "backtracking"
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

        let mut session = DfsSession {
            catalog,
            conflicts,
            config,
            plan: &plan,
            evaluator: Evaluator::new(),
            monitor,
            assignment: Assignment::new(catalog.num_sections(), plan.len()),
            found: Vec::new(),
            stats,
            aborted: None,
        };
        session.descend(0);

        let DfsSession {
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

/// Step budget of the `first_feasible` seeding search.
const SEED_STEP_CAP: u64 = 65_536;

/// Finds the first complete valid assignment in depth-first variant
/// order, within a fixed step budget. The local-search strategies use
/// this as their fallback seed when the myopic greedy pass dead-ends on
/// a feasible selection.
pub(crate) fn first_feasible(
    catalog: &Catalog,
    conflicts: &ConflictIndex,
    config: &SearchConfig,
    plan: &GroupPlan,
    stats: &mut SearchStatistics,
) -> Option<Assignment> {
    fn descend(
        catalog: &Catalog,
        conflicts: &ConflictIndex,
        config: &SearchConfig,
        plan: &GroupPlan,
        stats: &mut SearchStatistics,
        assignment: &mut Assignment,
        position: usize,
        steps: &mut u64,
    ) -> bool {
        *steps += 1;
        stats.on_step();
        if *steps > SEED_STEP_CAP {
            return false;
        }
        if position == plan.len() {
            return true;
        }

        let planned = plan.groups()[position];
        for &section in catalog.group(planned.group).sections() {
            if assignment.try_choose(catalog, conflicts, config, position, section) {
                if descend(
                    catalog, conflicts, config, plan, stats, assignment, position + 1, steps,
                ) {
                    return true;
                }
                assignment.unchoose(catalog, conflicts, position);
                stats.on_backtrack();
            } else {
                stats.on_pruned();
            }
        }

        if !planned.mandatory {
            return descend(
                catalog, conflicts, config, plan, stats, assignment, position + 1, steps,
            );
        }
        false
    }

    let mut assignment = Assignment::new(catalog.num_sections(), plan.len());
    let mut steps = 0u64;
    descend(
        catalog, conflicts, config, plan, stats, &mut assignment, 0, &mut steps,
    )
    .then_some(assignment)
}

/// Per-run state of one backtracking search.
struct DfsSession<'a> {
    catalog: &'a Catalog,
    conflicts: &'a ConflictIndex,
    config: &'a SearchConfig,
    plan: &'a GroupPlan,
    evaluator: Evaluator,
    monitor: &'a mut dyn SearchMonitor,
    assignment: Assignment,
    found: Vec<ScheduleCandidate>,
    stats: SearchStatistics,
    aborted: Option<String>,
}

impl DfsSession<'_> {
    /// Returns `true` if the search must stop: enough candidates, or a
    /// monitor said so.
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

        for &section in variants {
            if self
                .assignment
                .try_choose(self.catalog, self.conflicts, self.config, position, section)
            {
                self.descend(position + 1);
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
            // Skip arm: an optional course may be left out entirely.
            self.descend(position + 1);
        }
    }
}
