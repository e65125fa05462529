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

//! # Candidate Evaluation and Ranking
//!
//! The `Evaluator` turns a candidate schedule into a scalar score, higher
//! is better. It is a pure function of the candidate and the
//! configuration, with no hidden state, so every strategy calls it
//! identically: the exact strategies for final ranking, the genetic and
//! local-search families as their fitness/objective function. Comparable
//! scores across strategies are what make the benchmark harness
//! meaningful.
//!
//! Composition:
//! - a credit term rewarding total credit up to the configured ceiling
//!   (the cap is enforced upstream by pruning; the term never rewards
//!   beyond the ceiling),
//! - a large constant penalty per conflicting pair,
//! - a bonus per section whose kind appears in the configured priority
//!   order, weighted by position (earlier kinds earn more).
//!
//! `rank_candidates` applies the contract's canonical total order: score
//! descending, then fewer conflict pairs, then higher credit, then
//! lexicographic chosen-code order. Every strategy routes its results
//! through it, which is what makes the deterministic strategies
//! idempotent.

use std::cmp::Ordering;
use tabula_model::{
    candidate::ScheduleCandidate, catalog::Catalog, config::SearchConfig, index::SectionIndex,
};

/// Scores candidate schedules. Stateless; safe to share freely.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Evaluator;

impl Evaluator {
    /// Reward per credit point up to the ceiling.
    pub const CREDIT_WEIGHT: f64 = 10.0;
    /// Penalty per conflicting pair. Large enough that one conflict
    /// outweighs any achievable credit or priority gain.
    pub const CONFLICT_PENALTY: f64 = 1_000.0;
    /// Bonus per priority-order rank step, per matching section.
    pub const PRIORITY_WEIGHT: f64 = 5.0;

    #[inline]
    pub fn new() -> Self {
        Self
    }

    /// Scores a (possibly partial) selection from its raw metrics.
    ///
    /// The credit term saturates at `config.max_credit`; callers prune
    /// above the ceiling, but saturation keeps the function well-defined
    /// for arbitrary inputs.
    pub fn score(
        &self,
        catalog: &Catalog,
        config: &SearchConfig,
        sections: &[SectionIndex],
        total_credit: u32,
        conflict_pairs: u32,
    ) -> f64 {
        let credited = total_credit.min(config.max_credit);
        let credit_term = f64::from(credited) * Self::CREDIT_WEIGHT;
        let conflict_term = f64::from(conflict_pairs) * Self::CONFLICT_PENALTY;

        let ranks = config.priority_order.len();
        let mut priority_term = 0.0;
        for &section in sections {
            let kind = catalog.section(section).kind();
            if let Some(position) = config.priority_order.iter().position(|&k| k == kind) {
                priority_term += ((ranks - position) as f64) * Self::PRIORITY_WEIGHT;
            }
        }

        credit_term - conflict_term + priority_term
    }

    /// Scores a finished candidate.
    #[inline]
    pub fn score_candidate(
        &self,
        catalog: &Catalog,
        config: &SearchConfig,
        candidate: &ScheduleCandidate,
    ) -> f64 {
        self.score(
            catalog,
            config,
            candidate.sections(),
            candidate.total_credit(),
            candidate.conflict_pairs(),
        )
    }
}

/// The canonical candidate order of the scheduler contract: score
/// descending, then fewer conflict pairs, then higher credit, then
/// lexicographic order of chosen section codes.
pub fn compare_candidates(
    catalog: &Catalog,
    a: &ScheduleCandidate,
    b: &ScheduleCandidate,
) -> Ordering {
    b.score()
        .total_cmp(&a.score())
        .then_with(|| a.conflict_pairs().cmp(&b.conflict_pairs()))
        .then_with(|| b.total_credit().cmp(&a.total_credit()))
        .then_with(|| {
            let codes_a = a.section_codes(catalog);
            let codes_b = b.section_codes(catalog);
            codes_a.cmp(&codes_b)
        })
}

/// Sorts candidates into the canonical order, removes duplicate
/// selections, and truncates to `max_results`.
pub fn rank_candidates(
    catalog: &Catalog,
    candidates: &mut Vec<ScheduleCandidate>,
    max_results: usize,
) {
    candidates.sort_by(|a, b| compare_candidates(catalog, a, b));
    // Identical selections carry identical metrics and sort adjacently.
    candidates.dedup_by(|a, b| a.sections() == b.sections());
    candidates.truncate(max_results);
}

/// A bounded collection of the best candidates seen so far.
///
/// The population and local-search strategies stream many candidates over
/// their run; the pool keeps the working set bounded independent of run
/// length by re-ranking and truncating whenever it grows past a small
/// multiple of `max_results`.
#[derive(Debug, Clone)]
pub struct CandidatePool {
    candidates: Vec<ScheduleCandidate>,
    max_results: usize,
}

impl CandidatePool {
    /// Compaction threshold, as a multiple of `max_results`.
    const SLACK: usize = 4;

    /// Creates a pool that retains at most `max_results` candidates.
    #[inline]
    pub fn new(max_results: usize) -> Self {
        Self {
            candidates: Vec::new(),
            max_results,
        }
    }

    /// Adds a candidate, compacting if the pool has grown too large.
    pub fn push(&mut self, catalog: &Catalog, candidate: ScheduleCandidate) {
        self.candidates.push(candidate);
        if self.candidates.len() > self.max_results.saturating_mul(Self::SLACK).max(8) {
            rank_candidates(catalog, &mut self.candidates, self.max_results);
        }
    }

    /// Returns the number of currently pooled candidates.
    #[inline]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Returns `true` if the pool is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Finalizes the pool into the ranked, truncated result list.
    pub fn into_ranked(mut self, catalog: &Catalog) -> Vec<ScheduleCandidate> {
        rank_candidates(catalog, &mut self.candidates, self.max_results);
        self.candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_model::catalog::CatalogBuilder;
    use tabula_model::section::{SectionKind, SectionRecord};
    use tabula_model::slot::{Day, TimeSlot};

    fn record(code: &str, main: &str, kind: SectionKind, slots: &[(Day, u8)]) -> SectionRecord {
        SectionRecord {
            code: code.to_string(),
            main_code: main.to_string(),
            name: format!("Course {}", main),
            credit: 6,
            kind,
            slots: slots.iter().map(|&(d, p)| TimeSlot::new(d, p)).collect(),
            instructor: "N.N.".to_string(),
        }
    }

    fn catalog() -> Catalog {
        let mut builder = CatalogBuilder::new();
        builder.push(record(
            "CS101-A",
            "CS101",
            SectionKind::Lecture,
            &[(Day::Monday, 1)],
        ));
        builder.push(record(
            "CS101-L",
            "CS101L",
            SectionKind::Lab,
            &[(Day::Tuesday, 1)],
        ));
        builder.push(record(
            "MATH101-A",
            "MATH101",
            SectionKind::Lecture,
            &[(Day::Wednesday, 1)],
        ));
        builder.build().unwrap()
    }

    fn si(i: usize) -> SectionIndex {
        SectionIndex::new(i)
    }

    #[test]
    fn test_score_rewards_credit_up_to_cap() {
        let cat = catalog();
        let config = SearchConfig::new(12).with_priority_order([]);
        let eval = Evaluator::new();

        let six = eval.score(&cat, &config, &[], 6, 0);
        let twelve = eval.score(&cat, &config, &[], 12, 0);
        let twenty = eval.score(&cat, &config, &[], 20, 0);

        assert_eq!(six, 60.0);
        assert_eq!(twelve, 120.0);
        assert_eq!(twenty, 120.0, "credit term saturates at the ceiling");
    }

    #[test]
    fn test_one_conflict_outweighs_any_credit_gain() {
        let cat = catalog();
        let config = SearchConfig::new(40).with_priority_order([]);
        let eval = Evaluator::new();

        let clean = eval.score(&cat, &config, &[], 6, 0);
        let conflicted = eval.score(&cat, &config, &[], 40, 1);
        assert!(
            clean > conflicted,
            "a single conflicting pair must dominate the maximal credit reward"
        );
    }

    #[test]
    fn test_priority_bonus_prefers_earlier_kinds() {
        let cat = catalog();
        let config = SearchConfig::new(40)
            .with_priority_order([SectionKind::Lecture, SectionKind::Lab]);
        let eval = Evaluator::new();

        // Section 0 is a lecture (rank 1 of 2), section 1 a lab (rank 2 of 2).
        let lecture = eval.score(&cat, &config, &[si(0)], 6, 0);
        let lab = eval.score(&cat, &config, &[si(1)], 6, 0);

        assert_eq!(lecture - lab, Evaluator::PRIORITY_WEIGHT);
    }

    #[test]
    fn test_kind_missing_from_priority_order_earns_no_bonus() {
        let cat = catalog();
        let config = SearchConfig::new(40).with_priority_order([SectionKind::Lab]);
        let eval = Evaluator::new();

        let lecture = eval.score(&cat, &config, &[si(0)], 6, 0);
        let bare = eval.score(&cat, &config, &[], 6, 0);
        assert_eq!(lecture, bare);
    }

    #[test]
    fn test_score_is_pure() {
        let cat = catalog();
        let config = SearchConfig::new(20);
        let eval = Evaluator::new();
        let first = eval.score(&cat, &config, &[si(0), si(2)], 12, 0);
        let second = eval.score(&cat, &config, &[si(0), si(2)], 12, 0);
        assert_eq!(first, second);
    }

    #[test]
    fn test_rank_orders_by_score_then_tiebreaks() {
        let cat = catalog();

        let strong = ScheduleCandidate::new(vec![si(0), si(2)], 12, 0, 130.0);
        let weak = ScheduleCandidate::new(vec![si(0)], 6, 0, 70.0);
        // Same score as `weak` but one conflict pair: loses the tie.
        let conflicted = ScheduleCandidate::new(vec![si(1)], 6, 1, 70.0);

        let mut candidates = vec![conflicted.clone(), weak.clone(), strong.clone()];
        rank_candidates(&cat, &mut candidates, 10);

        assert_eq!(candidates, vec![strong, weak, conflicted]);
    }

    #[test]
    fn test_rank_breaks_full_ties_lexicographically() {
        let cat = catalog();
        // Same score, conflicts, credit; "CS101-A" < "MATH101-A".
        let a = ScheduleCandidate::new(vec![si(0)], 6, 0, 70.0);
        let b = ScheduleCandidate::new(vec![si(2)], 6, 0, 70.0);

        let mut candidates = vec![b.clone(), a.clone()];
        rank_candidates(&cat, &mut candidates, 10);
        assert_eq!(candidates, vec![a, b]);
    }

    #[test]
    fn test_rank_dedups_and_truncates() {
        let cat = catalog();
        let a = ScheduleCandidate::new(vec![si(0)], 6, 0, 70.0);
        let duplicate = a.clone();
        let b = ScheduleCandidate::new(vec![si(2)], 6, 0, 70.0);

        let mut candidates = vec![a.clone(), duplicate, b];
        rank_candidates(&cat, &mut candidates, 1);
        assert_eq!(candidates, vec![a]);
    }
}
