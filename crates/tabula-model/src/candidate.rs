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

use crate::{catalog::Catalog, index::SectionIndex};

/// A finished, constraint-valid weekly schedule.
///
/// Candidates are produced only from complete assignments that already
/// satisfy the hard constraints (one section per course group, credit cap,
/// conflict budget); they are immutable once returned to the caller.
/// Chosen sections are kept sorted by `SectionIndex` so that identical
/// selections compare equal regardless of discovery order.
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduleCandidate {
    sections: Vec<SectionIndex>,
    total_credit: u32,
    conflict_pairs: u32,
    score: f64,
}

impl ScheduleCandidate {
    /// Constructs a new candidate.
    ///
    /// # Panics
    ///
    /// Panics if `sections` is not strictly sorted by index (which also
    /// rules out duplicates).
    pub fn new(
        mut sections: Vec<SectionIndex>,
        total_credit: u32,
        conflict_pairs: u32,
        score: f64,
    ) -> Self {
        sections.sort_unstable();
        assert!(
            sections.windows(2).all(|w| w[0] < w[1]),
            "called `ScheduleCandidate::new` with duplicate section indices"
        );

        Self {
            sections,
            total_credit,
            conflict_pairs,
            score,
        }
    }

    /// Returns the chosen sections, sorted by catalog index.
    #[inline]
    pub fn sections(&self) -> &[SectionIndex] {
        &self.sections
    }

    /// Returns the number of chosen sections.
    #[inline]
    pub fn num_sections(&self) -> usize {
        self.sections.len()
    }

    /// Returns the summed credit weight.
    #[inline]
    pub fn total_credit(&self) -> u32 {
        self.total_credit
    }

    /// Returns the number of conflicting pairs among the chosen sections,
    /// each unordered pair counted once.
    #[inline]
    pub fn conflict_pairs(&self) -> u32 {
        self.conflict_pairs
    }

    /// Returns the evaluator score. Higher is better.
    #[inline]
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Resolves the chosen section codes against a catalog, in section
    /// index order.
    ///
    /// # Panics
    ///
    /// Panics if the candidate was built for a different catalog and an
    /// index is out of bounds.
    pub fn section_codes<'a>(&self, catalog: &'a Catalog) -> Vec<&'a str> {
        self.sections
            .iter()
            .map(|&index| catalog.section(index).code())
            .collect()
    }

    /// Returns `true` if the candidate contains a section of the given
    /// logical course code.
    pub fn contains_course(&self, catalog: &Catalog, main_code: &str) -> bool {
        self.sections
            .iter()
            .any(|&index| catalog.section(index).main_code() == main_code)
    }
}

impl std::fmt::Display for ScheduleCandidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ScheduleCandidate(sections: {}, credit: {}, conflicts: {}, score: {:.2})",
            self.sections.len(),
            self.total_credit,
            self.conflict_pairs,
            self.score
        )
    }
}
