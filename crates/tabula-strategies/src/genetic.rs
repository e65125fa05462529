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

//! # Genetic Search
//!
//! A fixed-size population of genomes, one gene per planned course group:
//! the index of the chosen variant, or `None` for a skipped optional
//! group. Each generation selects parents by tournament, crosses them
//! over gene-wise, and mutates single genes. Offspring are *repaired*
//! during decoding (a mandatory gene that violates the caps falls back
//! to the group's first admissible variant, a violating optional gene is
//! dropped); offspring that cannot be repaired (no admissible variant
//! for a mandatory group) are discarded and regenerated, so the
//! population never holds an invalid individual.
//!
//! Fitness is the shared evaluator score; every decoded individual also
//! feeds the bounded candidate pool, whose ranked top `max_results` is
//! the returned result. Runs are reproducible: all randomness flows from
//! a `ChaCha8Rng` seeded with `config.seed`.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tabula_model::{
    catalog::Catalog,
    config::{SearchConfig, Selection},
    conflict::ConflictIndex,
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

/// Tournament size for parent selection.
const TOURNAMENT_SIZE: usize = 3;
/// Number of elite individuals copied unchanged into the next generation.
const ELITE: usize = 2;
/// Per-offspring probability of mutating one gene.
const MUTATION_RATE: f64 = 0.3;
/// Decode attempts per population slot before giving up on the slot.
const REPAIR_ATTEMPTS: usize = 16;

type Genome = Vec<Option<usize>>;

/// Population-based search over per-group variant genomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeneticScheduler;

impl GeneticScheduler {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

struct Individual {
    genome: Genome,
    score: f64,
}

/// Decodes a genome into a valid assignment, repairing where possible.
///
/// Mandatory positions try the gene's variant first and fall back to the
/// remaining variants in listed order; if none fits the genome is
/// unrepairable and `None` is returned. Optional positions take the
/// gene's variant if it fits and are skipped otherwise. The genome is
/// rewritten to reflect the repaired assignment.
fn decode(
    catalog: &Catalog,
    conflicts: &ConflictIndex,
    config: &SearchConfig,
    plan: &GroupPlan,
    genome: &mut Genome,
) -> Option<Assignment> {
    let mut assignment = Assignment::new(catalog.num_sections(), plan.len());

    for (position, planned) in plan.groups().iter().enumerate() {
        let variants = catalog.group(planned.group).sections();

        if planned.mandatory {
            let preferred = genome[position].unwrap_or(0).min(variants.len() - 1);
            let mut chosen = None;
            // Preferred variant first, then the rest in listed order.
            for v in std::iter::once(preferred)
                .chain((0..variants.len()).filter(|&v| v != preferred))
            {
                if assignment.try_choose(catalog, conflicts, config, position, variants[v]) {
                    chosen = Some(v);
                    break;
                }
            }
            genome[position] = Some(chosen?);
        } else {
            match genome[position] {
                Some(v) if v < variants.len() => {
                    if !assignment.try_choose(catalog, conflicts, config, position, variants[v])
                    {
                        genome[position] = None;
                    }
                }
                _ => genome[position] = None,
            }
        }
    }

    Some(assignment)
}

fn random_genome(rng: &mut ChaCha8Rng, catalog: &Catalog, plan: &GroupPlan) -> Genome {
    plan.groups()
        .iter()
        .map(|planned| {
            let num_variants = catalog.group(planned.group).num_variants();
            if planned.mandatory {
                Some(rng.random_range(0..num_variants))
            } else if rng.random_bool(0.5) {
                Some(rng.random_range(0..num_variants))
            } else {
                None
            }
        })
        .collect()
}

fn crossover(rng: &mut ChaCha8Rng, a: &Genome, b: &Genome) -> Genome {
    a.iter()
        .zip(b.iter())
        .map(|(&ga, &gb)| if rng.random_bool(0.5) { ga } else { gb })
        .collect()
}

fn mutate(rng: &mut ChaCha8Rng, catalog: &Catalog, plan: &GroupPlan, genome: &mut Genome) {
    let position = rng.random_range(0..genome.len());
    let planned = plan.groups()[position];
    let num_variants = catalog.group(planned.group).num_variants();

    if planned.mandatory {
        genome[position] = Some(rng.random_range(0..num_variants));
    } else if genome[position].is_some() && rng.random_bool(0.5) {
        // Toggle the optional course off.
        genome[position] = None;
    } else {
        genome[position] = Some(rng.random_range(0..num_variants));
    }
}

/// Tournament selection: the fittest of `TOURNAMENT_SIZE` uniform draws.
fn select<'a>(rng: &mut ChaCha8Rng, population: &'a [Individual]) -> &'a Individual {
    let mut best = &population[rng.random_range(0..population.len())];
    for _ in 1..TOURNAMENT_SIZE {
        let contender = &population[rng.random_range(0..population.len())];
        if contender.score > best.score {
            best = contender;
        }
    }
    best
}

impl Scheduler for GeneticScheduler {
    fn name(&self) -> &str {
        "genetic"
    }

    fn generate(
        &mut self,
        catalog: &Catalog,
        conflicts: &ConflictIndex,
        selection: &Selection,
        config: &SearchConfig,
    ) -> SearchOutcome {
        // Population strategies report only new global bests, so the
        // default stack is a pure time budget; `max_results` is applied
        // by the final ranking.
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
        let mut pool = CandidatePool::new(config.max_results);
        let mut best_score = f64::NEG_INFINITY;
        let mut aborted: Option<String> = None;

        // Initial population. If no genome decodes, the mandatory set is
        // infeasible under the caps and the search is over.
        let mut population: Vec<Individual> = Vec::with_capacity(config.population_size);
        for _ in 0..config.population_size {
            for _ in 0..REPAIR_ATTEMPTS {
                let mut genome = random_genome(&mut rng, catalog, &plan);
                if let Some(assignment) = decode(catalog, conflicts, config, &plan, &mut genome)
                {
                    let candidate = assignment.to_candidate(catalog, config, &evaluator);
                    let score = candidate.score();
                    if score > best_score {
                        best_score = score;
                        monitor.on_candidate_found(&candidate);
                    }
                    stats.on_candidate();
                    pool.push(catalog, candidate);
                    population.push(Individual { genome, score });
                    break;
                }
                stats.on_pruned();
            }
        }

        if population.is_empty() {
            stats.set_duration(start_time.elapsed());
            monitor.on_exit_search();
            return SearchOutcome::empty(TerminationReason::Exhausted, stats);
        }

        'generations: for _ in 0..config.generations {
            monitor.on_step();
            stats.on_step();
            if let SearchCommand::Terminate(reason) = monitor.search_command() {
                aborted = Some(reason);
                break 'generations;
            }

            // Deterministic fitness order; ties by genome keep the sort
            // independent of discovery order.
            population.sort_by(|a, b| {
                b.score
                    .total_cmp(&a.score)
                    .then_with(|| a.genome.cmp(&b.genome))
            });

            let mut next: Vec<Individual> = Vec::with_capacity(config.population_size);
            for elite in population.iter().take(ELITE) {
                next.push(Individual {
                    genome: elite.genome.clone(),
                    score: elite.score,
                });
            }

            let mut attempts = 0usize;
            while next.len() < config.population_size
                && attempts < config.population_size * REPAIR_ATTEMPTS
            {
                attempts += 1;

                let mut genome = {
                    let mother = select(&mut rng, &population);
                    let father = select(&mut rng, &population);
                    crossover(&mut rng, &mother.genome, &father.genome)
                };
                if rng.random_bool(MUTATION_RATE) {
                    mutate(&mut rng, catalog, &plan, &mut genome);
                }

                let Some(assignment) = decode(catalog, conflicts, config, &plan, &mut genome)
                else {
                    stats.on_pruned();
                    continue;
                };

                let candidate = assignment.to_candidate(catalog, config, &evaluator);
                let score = candidate.score();
                if score > best_score {
                    best_score = score;
                    monitor.on_candidate_found(&candidate);
                }
                stats.on_candidate();
                pool.push(catalog, candidate);
                next.push(Individual { genome, score });
            }

            population = next;
        }

        stats.set_duration(start_time.elapsed());
        monitor.on_exit_search();

        let reason = match aborted {
            Some(reason) => TerminationReason::Aborted(reason),
            None => TerminationReason::Exhausted,
        };
        SearchOutcome::new(pool.into_ranked(catalog), reason, stats)
    }
}
