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

//! # Simulated Annealing
//!
//! Temperature-driven local search that occasionally accepts worsening
//! moves to escape local optima. The walk starts from the greedy
//! construction (falling back to a first-feasible depth-first seed),
//! mutates one course group per iteration (another variant, or toggling
//! an optional group), and accepts by the Metropolis criterion: improvements always, a worsening move with probability
//! `exp(Δ/T)` while the temperature is warm. The `CoolingSchedule` trait
//! separates acceptance from thermodynamics; geometric and linear decay
//! schedules are provided, and a frozen schedule degrades the walk into
//! strict hill climbing.
//!
//! Scores are the shared evaluator's; the best-seen candidates accumulate
//! in a bounded pool throughout, so a run cut short by the time budget
//! still returns everything valid it has visited.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
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

/// Defines the thermodynamics of the annealing process.
pub trait CoolingSchedule: Send + Sync + std::fmt::Debug {
    /// Resets the temperature to its initial state.
    fn on_start(&mut self);

    /// Updates the temperature for the next iteration.
    fn update(&mut self);

    /// Returns the current temperature.
    fn current(&self) -> f64;

    /// Returns `true` once the temperature is too low to accept
    /// worsening moves.
    fn is_frozen(&self) -> bool;
}

/// Geometric cooling: `T_{k+1} = T_k * alpha`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometricCooling {
    initial: f64,
    current: f64,
    alpha: f64,
    min_temp: f64,
}

impl GeometricCooling {
    /// Creates a new geometric cooling schedule.
    ///
    /// # Panics
    ///
    /// Panics if `alpha` is not strictly between `0.0` and `1.0`.
    #[inline]
    pub fn new(initial: f64, alpha: f64, min_temp: f64) -> Self {
        assert!(
            alpha > 0.0 && alpha < 1.0,
            "called `GeometricCooling::new()` with invalid alpha: {}. Must be in (0.0, 1.0)",
            alpha
        );
        Self {
            initial,
            current: initial,
            alpha,
            min_temp,
        }
    }
}

impl CoolingSchedule for GeometricCooling {
    #[inline]
    fn on_start(&mut self) {
        self.current = self.initial;
    }

    #[inline]
    fn update(&mut self) {
        self.current *= self.alpha;
    }

    #[inline]
    fn current(&self) -> f64 {
        self.current
    }

    #[inline]
    fn is_frozen(&self) -> bool {
        self.current <= self.min_temp
    }
}

/// Linear cooling: `T_{k+1} = max(0, T_k - decrement)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearCooling {
    initial: f64,
    current: f64,
    decrement: f64,
    min_temp: f64,
}

impl LinearCooling {
    #[inline]
    pub fn new(initial: f64, decrement: f64, min_temp: f64) -> Self {
        Self {
            initial,
            current: initial,
            decrement,
            min_temp,
        }
    }
}

impl CoolingSchedule for LinearCooling {
    #[inline]
    fn on_start(&mut self) {
        self.current = self.initial;
    }

    #[inline]
    fn update(&mut self) {
        self.current = (self.current - self.decrement).max(0.0);
    }

    #[inline]
    fn current(&self) -> f64 {
        self.current
    }

    #[inline]
    fn is_frozen(&self) -> bool {
        self.current <= self.min_temp
    }
}

/// Simulated annealing over single-group mutations.
///
/// By default the schedule is geometric with the parameters from the
/// configuration; `with_schedule` plugs in any other `CoolingSchedule`.
#[derive(Debug, Default)]
pub struct SimulatedAnnealingScheduler {
    schedule: Option<Box<dyn CoolingSchedule>>,
}

impl SimulatedAnnealingScheduler {
    #[inline]
    pub fn new() -> Self {
        Self { schedule: None }
    }

    /// Uses a custom cooling schedule instead of the configured
    /// geometric one.
    #[inline]
    pub fn with_schedule<C>(schedule: C) -> Self
    where
        C: CoolingSchedule + 'static,
    {
        Self {
            schedule: Some(Box::new(schedule)),
        }
    }
}

impl Scheduler for SimulatedAnnealingScheduler {
    fn name(&self) -> &str {
        "simulated-annealing"
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

        let Some(plan) = GroupPlan::resolve(catalog, selection) else {
            stats.set_duration(start_time.elapsed());
            return SearchOutcome::empty(TerminationReason::Exhausted, stats);
        };

        monitor.on_enter_search(catalog);
        let evaluator = Evaluator::new();
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

        let mut default_schedule;
        let schedule: &mut dyn CoolingSchedule = match self.schedule.as_deref_mut() {
            Some(custom) => custom,
            None => {
                default_schedule = GeometricCooling::new(
                    config.initial_temperature,
                    config.cooling_alpha,
                    config.min_temperature,
                );
                &mut default_schedule
            }
        };
        schedule.on_start();

        // Seed the walk with the greedy construction, falling back to the
        // first feasible depth-first assignment when the myopic pass
        // dead-ends. If neither finds a valid state, the search is over.
        let Some(mut current) =
            GreedyScheduler::construct(catalog, conflicts, config, &plan, &mut stats).or_else(
                || crate::backtracking::first_feasible(catalog, conflicts, config, &plan, &mut stats),
            )
        else {
            stats.set_duration(start_time.elapsed());
            monitor.on_exit_search();
            return SearchOutcome::empty(TerminationReason::Exhausted, stats);
        };

        let mut current_score = evaluator.score(
            catalog,
            config,
            &current.sections(),
            current.total_credit(),
            current.conflict_pairs(),
        );
        let mut best_score = current_score;
        let mut pool = CandidatePool::new(config.max_results);
        let initial = current.to_candidate(catalog, config, &evaluator);
        monitor.on_candidate_found(&initial);
        stats.on_candidate();
        pool.push(catalog, initial);

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

            let Some(applied) = propose(&mut rng, catalog, conflicts, config, &plan, &mut current)
            else {
                stats.on_pruned();
                schedule.update();
                stale += 1;
                continue;
            };

            let candidate_score = evaluator.score(
                catalog,
                config,
                &current.sections(),
                current.total_credit(),
                current.conflict_pairs(),
            );

            let delta = candidate_score - current_score;
            let accept = if delta > 0.0 {
                true
            } else if schedule.is_frozen() {
                false
            } else {
                let temperature = schedule.current();
                if temperature <= 1e-9 {
                    false
                } else {
                    rng.random_bool((delta / temperature).exp().min(1.0))
                }
            };

            if accept {
                current_score = candidate_score;
                let candidate = current.to_candidate(catalog, config, &evaluator);
                stats.on_candidate();
                if candidate_score > best_score {
                    best_score = candidate_score;
                    stale = 0;
                    monitor.on_candidate_found(&candidate);
                } else {
                    stale += 1;
                }
                pool.push(catalog, candidate);
            } else {
                applied.revert(catalog, conflicts, config, &mut current);
                stale += 1;
            }
            schedule.update();
        }

        stats.set_duration(start_time.elapsed());
        monitor.on_exit_search();
        SearchOutcome::new(pool.into_ranked(catalog), reason, stats)
    }
}

/// An applied single-group move, carrying what is needed to revert it.
pub(crate) struct AppliedMove {
    position: usize,
    previous: Option<SectionIndex>,
}

impl AppliedMove {
    /// Reverts the move on `assignment`.
    pub(crate) fn revert(
        self,
        catalog: &Catalog,
        conflicts: &ConflictIndex,
        config: &SearchConfig,
        assignment: &mut Assignment,
    ) {
        assignment.unchoose(catalog, conflicts, self.position);
        if let Some(section) = self.previous {
            let restored =
                assignment.try_choose(catalog, conflicts, config, self.position, section);
            debug_assert!(restored, "reverting a move must always succeed");
        }
    }
}

/// Applies one random single-group mutation to `assignment`: a different
/// variant of the group, or for an optional group possibly a skip.
/// Returns `None` if the sampled move is inapplicable (no alternative
/// variant, or the replacement violates the caps); the assignment is left
/// unchanged in that case.
pub(crate) fn propose(
    rng: &mut ChaCha8Rng,
    catalog: &Catalog,
    conflicts: &ConflictIndex,
    config: &SearchConfig,
    plan: &GroupPlan,
    assignment: &mut Assignment,
) -> Option<AppliedMove> {
    let position = rng.random_range(0..plan.len());
    let planned = plan.groups()[position];
    let variants = catalog.group(planned.group).sections();
    let previous = assignment.chosen(position);

    // Sample the target choice: a variant, or (optionally) a skip.
    let target: Option<SectionIndex> = if !planned.mandatory && rng.random_bool(0.25) {
        None
    } else {
        Some(variants[rng.random_range(0..variants.len())])
    };

    if target == previous {
        return None;
    }

    assignment.unchoose(catalog, conflicts, position);
    match target {
        Some(section) => {
            if assignment.try_choose(catalog, conflicts, config, position, section) {
                Some(AppliedMove { position, previous })
            } else {
                // Roll back to the previous choice.
                if let Some(previous_section) = previous {
                    let restored = assignment.try_choose(
                        catalog,
                        conflicts,
                        config,
                        position,
                        previous_section,
                    );
                    debug_assert!(restored, "restoring a previous choice must always succeed");
                }
                None
            }
        }
        None => Some(AppliedMove { position, previous }),
    }
}
