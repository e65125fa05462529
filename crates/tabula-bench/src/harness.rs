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

//! # Cross-Strategy Comparison
//!
//! The harness freezes a single `Catalog` + `ConflictIndex` snapshot and
//! hands the identical read-only inputs to every registered strategy, so
//! that every difference in the report is attributable to the
//! exploration policy and never to input drift. Strategies run on scoped
//! threads purely to shorten wall time; they share no mutable state and
//! no stop signal, so the metric rows are independent of execution order
//! and interleaving.

use std::time::{Duration, Instant};
use tabula_model::{
    catalog::Catalog,
    config::{SearchConfig, Selection},
    conflict::ConflictIndex,
};
use tabula_search::result::{SearchOutcome, TerminationReason};
use tabula_strategies::registry::StrategyKind;

/// The per-strategy metric row of a comparison run.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyReport {
    /// Registry name of the strategy.
    pub strategy: &'static str,
    /// Wall-clock duration of the `generate` call.
    pub duration: Duration,
    /// Number of returned candidates.
    pub candidates: usize,
    /// Score of the best returned candidate.
    pub best_score: Option<f64>,
    /// Credit total of the best returned candidate.
    pub best_credit: Option<u32>,
    /// Fewest conflict pairs across the returned candidates.
    pub min_conflicts: Option<u32>,
    /// Why the run ended.
    pub reason: TerminationReason,
}

impl StrategyReport {
    fn from_outcome(strategy: &'static str, duration: Duration, outcome: &SearchOutcome) -> Self {
        Self {
            strategy,
            duration,
            candidates: outcome.len(),
            best_score: outcome.best().map(|c| c.score()),
            best_credit: outcome.best().map(|c| c.total_credit()),
            min_conflicts: outcome
                .candidates()
                .iter()
                .map(|c| c.conflict_pairs())
                .min(),
            reason: outcome.reason().clone(),
        }
    }
}

/// The full comparison result, one row per strategy in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkReport {
    rows: Vec<StrategyReport>,
}

impl BenchmarkReport {
    /// Returns the rows in the strategies' input order.
    #[inline]
    pub fn rows(&self) -> &[StrategyReport] {
        &self.rows
    }

    /// Returns the row of a specific strategy.
    pub fn row(&self, kind: StrategyKind) -> Option<&StrategyReport> {
        self.rows.iter().find(|row| row.strategy == kind.name())
    }
}

impl std::fmt::Display for BenchmarkReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{:<24} | {:<10} | {:<10} | {:<12} | {:<11} | {:<9} | {}",
            "Strategy", "Time", "Candidates", "Best Score", "Best Credit", "Conflicts", "Termination"
        )?;
        writeln!(f, "{}", "-".repeat(104))?;
        for row in &self.rows {
            let best_score = row
                .best_score
                .map_or_else(|| "-".to_string(), |s| format!("{:.2}", s));
            let best_credit = row
                .best_credit
                .map_or_else(|| "-".to_string(), |c| c.to_string());
            let min_conflicts = row
                .min_conflicts
                .map_or_else(|| "-".to_string(), |c| c.to_string());
            writeln!(
                f,
                "{:<24} | {:<10} | {:<10} | {:<12} | {:<11} | {:<9} | {}",
                row.strategy,
                format!("{:.3}s", row.duration.as_secs_f64()),
                row.candidates,
                best_score,
                best_credit,
                min_conflicts,
                row.reason
            )?;
        }
        Ok(())
    }
}

/// A comparison run over a chosen set of strategies.
#[derive(Debug, Clone, Default)]
pub struct Benchmark {
    strategies: Vec<StrategyKind>,
}

impl Benchmark {
    /// Creates an empty benchmark.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a benchmark over every registered strategy.
    #[inline]
    pub fn with_all_strategies() -> Self {
        Self {
            strategies: StrategyKind::ALL.to_vec(),
        }
    }

    /// Adds one strategy to the comparison.
    #[inline]
    pub fn add_strategy(mut self, kind: StrategyKind) -> Self {
        self.strategies.push(kind);
        self
    }

    /// Returns the strategies in input order.
    #[inline]
    pub fn strategies(&self) -> &[StrategyKind] {
        &self.strategies
    }

    /// Runs every strategy on the identical frozen inputs, in parallel,
    /// and collects one metric row per strategy.
    ///
    /// # Panics
    ///
    /// Panics if no strategy was added.
    pub fn compare(
        &self,
        catalog: &Catalog,
        conflicts: &ConflictIndex,
        selection: &Selection,
        config: &SearchConfig,
    ) -> BenchmarkReport {
        assert!(
            !self.strategies.is_empty(),
            "called `Benchmark::compare` with no strategies added"
        );

        let mut rows = Vec::with_capacity(self.strategies.len());

        std::thread::scope(|scope| {
            let mut handles = Vec::with_capacity(self.strategies.len());

            for &kind in &self.strategies {
                let handle = scope.spawn(move || {
                    let mut scheduler = kind.instantiate();
                    let started = Instant::now();
                    let outcome = scheduler.generate(catalog, conflicts, selection, config);
                    StrategyReport::from_outcome(kind.name(), started.elapsed(), &outcome)
                });
                handles.push(handle);
            }

            for handle in handles {
                rows.push(handle.join().expect("benchmark strategy thread panicked"));
            }
        });

        BenchmarkReport { rows }
    }
}
