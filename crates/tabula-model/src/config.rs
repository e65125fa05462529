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

//! # Search Configuration and Course Selection
//!
//! `SearchConfig` bundles every knob a strategy consults: the hard caps
//! (credit ceiling, conflict budget), the result and time limits, the
//! kind priority order for scoring, the RNG seed for the stochastic
//! strategies, and the per-family working-set bounds. All budgets are
//! explicit configuration values rather than compiled-in constants, so
//! tests can inject short deadlines deterministically.
//!
//! `Selection` names the student's mandatory and optional course codes;
//! order is preserved because the deterministic strategies resolve course
//! groups in selection order.

use crate::section::SectionKind;
use std::time::Duration;

/// The student's course selection: which logical course codes must appear
/// in every schedule and which are best-effort.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    mandatory: Vec<String>,
    optional: Vec<String>,
}

impl Selection {
    /// Creates a selection from mandatory and optional code lists.
    pub fn new<M, O, SM, SO>(mandatory: M, optional: O) -> Self
    where
        M: IntoIterator<Item = SM>,
        O: IntoIterator<Item = SO>,
        SM: Into<String>,
        SO: Into<String>,
    {
        Self {
            mandatory: mandatory.into_iter().map(Into::into).collect(),
            optional: optional.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the mandatory course codes in selection order.
    #[inline]
    pub fn mandatory(&self) -> &[String] {
        &self.mandatory
    }

    /// Returns the optional course codes in selection order.
    #[inline]
    pub fn optional(&self) -> &[String] {
        &self.optional
    }

    /// Returns `true` if neither mandatory nor optional codes are named.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mandatory.is_empty() && self.optional.is_empty()
    }
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Selection(mandatory: {}, optional: {})",
            self.mandatory.len(),
            self.optional.len()
        )
    }
}

/// Configuration shared by every search strategy.
///
/// Construct with `SearchConfig::new(max_credit)` and refine with the
/// `with_*` methods. The defaults favor a quick interactive search; the
/// benchmark harness and tests override the budgets they care about.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchConfig {
    /// Hard credit ceiling; candidates exceeding it are pruned, never
    /// returned.
    pub max_credit: u32,
    /// Whether schedules with overlapping sections are acceptable at all.
    pub allow_conflicts: bool,
    /// Conflict-pair budget; only consulted when `allow_conflicts` is set.
    pub max_conflict_pairs: u32,
    /// Maximum number of candidates a strategy returns.
    pub max_results: usize,
    /// Cooperative wall-clock budget; `None` means unbounded.
    pub time_limit: Option<Duration>,
    /// Kind priority order for the evaluator's bonus term; earlier kinds
    /// earn a larger bonus.
    pub priority_order: Vec<SectionKind>,
    /// Seed for the stochastic strategies; fixed seed, fixed output.
    pub seed: u64,
    /// Population size of the genetic strategy.
    pub population_size: usize,
    /// Generation budget of the genetic strategy.
    pub generations: usize,
    /// Iteration budget of the local-search strategies (annealing, tabu).
    pub iteration_budget: u64,
    /// Tabu tenure: how many iterations a visited signature stays
    /// forbidden.
    pub tabu_tenure: usize,
    /// Local-search cutoff: stop after this many iterations without a new
    /// global best.
    pub no_improvement_cutoff: u64,
    /// Hard cap on the BFS/A* frontier size; states beyond it are dropped
    /// and counted in the statistics.
    pub frontier_cap: usize,
    /// Initial temperature of the annealing schedule.
    pub initial_temperature: f64,
    /// Geometric cooling factor per iteration, in `(0, 1)`.
    pub cooling_alpha: f64,
    /// Temperature below which annealing freezes into strict descent.
    pub min_temperature: f64,
}

impl SearchConfig {
    /// Creates a configuration with the given credit ceiling and default
    /// budgets.
    pub fn new(max_credit: u32) -> Self {
        Self {
            max_credit,
            allow_conflicts: false,
            max_conflict_pairs: 0,
            max_results: 10,
            time_limit: None,
            priority_order: SectionKind::ALL.to_vec(),
            seed: 0x7AB5_1A5E,
            population_size: 64,
            generations: 200,
            iteration_budget: 20_000,
            tabu_tenure: 32,
            no_improvement_cutoff: 2_000,
            frontier_cap: 16_384,
            initial_temperature: 50.0,
            cooling_alpha: 0.995,
            min_temperature: 1e-3,
        }
    }

    /// Permits schedules with up to `max_pairs` conflicting pairs.
    #[inline]
    pub fn with_conflicts(mut self, max_pairs: u32) -> Self {
        self.allow_conflicts = true;
        self.max_conflict_pairs = max_pairs;
        self
    }

    /// Sets the maximum number of returned candidates.
    #[inline]
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Sets the cooperative wall-clock budget.
    #[inline]
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Sets the kind priority order used by the evaluator.
    #[inline]
    pub fn with_priority_order<I>(mut self, order: I) -> Self
    where
        I: IntoIterator<Item = SectionKind>,
    {
        self.priority_order = order.into_iter().collect();
        self
    }

    /// Sets the RNG seed of the stochastic strategies.
    #[inline]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Returns the effective conflict-pair budget: zero unless conflicts
    /// are allowed.
    #[inline]
    pub fn conflict_budget(&self) -> u32 {
        if self.allow_conflicts {
            self.max_conflict_pairs
        } else {
            0
        }
    }
}

impl Default for SearchConfig {
    /// A permissive default: 40 credits, no conflicts, ten results.
    #[inline]
    fn default() -> Self {
        Self::new(40)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_preserves_order() {
        let selection = Selection::new(["CS101", "MATH101"], ["PHYS101"]);
        assert_eq!(selection.mandatory(), &["CS101", "MATH101"]);
        assert_eq!(selection.optional(), &["PHYS101"]);
        assert!(!selection.is_empty());
    }

    #[test]
    fn test_empty_selection() {
        let selection = Selection::default();
        assert!(selection.is_empty());
        assert!(selection.mandatory().is_empty());
        assert!(selection.optional().is_empty());
    }

    #[test]
    fn test_conflict_budget_is_zero_unless_allowed() {
        let strict = SearchConfig::new(30);
        assert!(!strict.allow_conflicts);
        assert_eq!(strict.conflict_budget(), 0);

        let relaxed = SearchConfig::new(30).with_conflicts(2);
        assert!(relaxed.allow_conflicts);
        assert_eq!(relaxed.conflict_budget(), 2);
    }

    #[test]
    fn test_builder_methods_compose() {
        let config = SearchConfig::new(24)
            .with_max_results(3)
            .with_time_limit(Duration::from_millis(50))
            .with_seed(99)
            .with_priority_order([SectionKind::Lab, SectionKind::Lecture]);

        assert_eq!(config.max_credit, 24);
        assert_eq!(config.max_results, 3);
        assert_eq!(config.time_limit, Some(Duration::from_millis(50)));
        assert_eq!(config.seed, 99);
        assert_eq!(
            config.priority_order,
            vec![SectionKind::Lab, SectionKind::Lecture]
        );
    }
}
