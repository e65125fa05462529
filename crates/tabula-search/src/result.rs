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

use crate::stats::SearchStatistics;
use tabula_model::candidate::ScheduleCandidate;

/// Why a search run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationReason {
    /// The strategy explored everything its policy covers (the full state
    /// space for the exact strategies, the configured budget for the
    /// population and local-search families).
    Exhausted,
    /// A local-search strategy ran out of acceptable neighbors before its
    /// budget ended.
    LocalOptimum,
    /// A monitor requested termination (time limit, candidate limit,
    /// external interrupt). The string names the trigger.
    Aborted(String),
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::Exhausted => write!(f, "Exhausted"),
            TerminationReason::LocalOptimum => write!(f, "Local Optimum"),
            TerminationReason::Aborted(reason) => write!(f, "Aborted: {}", reason),
        }
    }
}

/// The result of one `Scheduler::generate` run: the ranked candidates,
/// why the run ended, and its statistics.
///
/// An empty candidate list is an ordinary outcome (infeasible selection,
/// empty catalog, or a deadline hit before the first candidate), never an
/// error.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    candidates: Vec<ScheduleCandidate>,
    reason: TerminationReason,
    statistics: SearchStatistics,
}

impl SearchOutcome {
    /// Creates a new outcome. The candidate list must already be ranked;
    /// strategies go through `eval::rank_candidates` before constructing
    /// an outcome.
    #[inline]
    pub fn new(
        candidates: Vec<ScheduleCandidate>,
        reason: TerminationReason,
        statistics: SearchStatistics,
    ) -> Self {
        Self {
            candidates,
            reason,
            statistics,
        }
    }

    /// Creates an outcome with no candidates.
    #[inline]
    pub fn empty(reason: TerminationReason, statistics: SearchStatistics) -> Self {
        Self::new(Vec::new(), reason, statistics)
    }

    /// Returns the ranked candidates, best first.
    #[inline]
    pub fn candidates(&self) -> &[ScheduleCandidate] {
        &self.candidates
    }

    /// Returns the best candidate, if any.
    #[inline]
    pub fn best(&self) -> Option<&ScheduleCandidate> {
        self.candidates.first()
    }

    /// Returns `true` if no candidate was found.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Returns the number of returned candidates.
    #[inline]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Returns why the run ended.
    #[inline]
    pub fn reason(&self) -> &TerminationReason {
        &self.reason
    }

    /// Returns the run statistics.
    #[inline]
    pub fn statistics(&self) -> &SearchStatistics {
        &self.statistics
    }

    /// Consumes the outcome and returns the candidate list.
    #[inline]
    pub fn into_candidates(self) -> Vec<ScheduleCandidate> {
        self.candidates
    }
}

impl std::fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.best() {
            Some(best) => write!(
                f,
                "SearchOutcome(candidates: {}, best score: {:.2}, reason: {})",
                self.len(),
                best.score(),
                self.reason
            ),
            None => write!(f, "SearchOutcome(empty, reason: {})", self.reason),
        }
    }
}
