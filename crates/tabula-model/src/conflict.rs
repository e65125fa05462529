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

//! # Bitmask Conflict Index
//!
//! Precomputed pairwise conflicts between all sections of a catalog.
//! Construction performs the unavoidable O(N²) pairwise grid-intersection
//! tests exactly once; every later query against a partial schedule is a
//! word-parallel bitset operation. That trade, one quadratic
//! precomputation amortized over an unbounded number of constant-time
//! lookups, is the central design rationale of this module.
//!
//! The index stores one `FixedBitSet` row per section, bit `j` of row `i`
//! set iff sections `i` and `j` overlap in the weekly grid. A partial
//! schedule is represented as a `SectionMask` over the same index space;
//! `conflicts` is then a single disjointness test between a row and the
//! mask, and `new_conflict_pairs` a popcount of their intersection. The
//! chunked bit-vector representation carries catalogs past the 64-section
//! limit of a single machine word without changing the query cost model.

use crate::{catalog::Catalog, index::SectionIndex};
use fixedbitset::FixedBitSet;

/// A set of chosen sections over a catalog's fixed section ordering.
///
/// This is the engine's working representation of a partial schedule:
/// strategies add and remove sections as they explore, and query the
/// `ConflictIndex` against the mask.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionMask {
    bits: FixedBitSet,
}

impl SectionMask {
    /// Creates an empty mask sized for `num_sections` sections.
    #[inline]
    pub fn new(num_sections: usize) -> Self {
        Self {
            bits: FixedBitSet::with_capacity(num_sections),
        }
    }

    /// Adds a section to the mask.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the index is out of bounds.
    #[inline]
    pub fn add(&mut self, section: SectionIndex) {
        debug_assert!(
            section.get() < self.bits.len(),
            "called `SectionMask::add` with section index out of bounds: the len is {} but the index is {}",
            self.bits.len(),
            section.get()
        );

        self.bits.set(section.get(), true);
    }

    /// Removes a section from the mask.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the index is out of bounds.
    #[inline]
    pub fn remove(&mut self, section: SectionIndex) {
        debug_assert!(
            section.get() < self.bits.len(),
            "called `SectionMask::remove` with section index out of bounds: the len is {} but the index is {}",
            self.bits.len(),
            section.get()
        );

        self.bits.set(section.get(), false);
    }

    /// Returns `true` if the mask contains the section.
    #[inline]
    pub fn contains(&self, section: SectionIndex) -> bool {
        self.bits.contains(section.get())
    }

    /// Returns the number of chosen sections.
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.count_ones(..)
    }

    /// Returns `true` if no section is chosen.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.count_ones(..) == 0
    }

    /// Removes all sections from the mask.
    #[inline]
    pub fn clear(&mut self) {
        self.bits.clear();
    }

    /// Iterates over the chosen sections in index order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = SectionIndex> + '_ {
        self.bits.ones().map(SectionIndex::new)
    }

    #[inline]
    fn as_bitset(&self) -> &FixedBitSet {
        &self.bits
    }
}

/// Precomputed pairwise conflict rows for a fixed catalog.
///
/// Immutable after `build`; safe to share by reference across concurrent
/// searches.
#[derive(Clone, Debug)]
pub struct ConflictIndex {
    rows: Vec<FixedBitSet>,
}

impl ConflictIndex {
    /// Builds the index from a catalog.
    ///
    /// O(N²) pairwise weekly-grid intersection tests. An empty catalog
    /// produces an empty, valid index. A section never conflicts with
    /// itself, including sections of the same course group that share
    /// slots; the one-variant-per-group rule is enforced elsewhere.
    pub fn build(catalog: &Catalog) -> Self {
        let n = catalog.num_sections();
        let mut rows = vec![FixedBitSet::with_capacity(n); n];

        for i in 0..n {
            let grid_i = catalog.section(SectionIndex::new(i)).grid();
            for j in (i + 1)..n {
                let grid_j = catalog.section(SectionIndex::new(j)).grid();
                if grid_i.overlaps(grid_j) {
                    rows[i].set(j, true);
                    rows[j].set(i, true);
                }
            }
        }

        Self { rows }
    }

    /// Returns the number of sections the index was built for.
    #[inline]
    pub fn num_sections(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the two sections overlap in the weekly grid.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if either index is out of bounds.
    #[inline]
    pub fn pair_conflicts(&self, a: SectionIndex, b: SectionIndex) -> bool {
        debug_assert!(
            a.get() < self.num_sections() && b.get() < self.num_sections(),
            "called `ConflictIndex::pair_conflicts` with section index out of bounds: the len is {} but the indices are {} and {}",
            self.num_sections(),
            a.get(),
            b.get()
        );

        self.rows[a.get()].contains(b.get())
    }

    /// Returns `true` if adding `section` to the schedule represented by
    /// `mask` would create at least one conflict.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the index is out of bounds.
    #[inline]
    pub fn conflicts(&self, mask: &SectionMask, section: SectionIndex) -> bool {
        debug_assert!(
            section.get() < self.num_sections(),
            "called `ConflictIndex::conflicts` with section index out of bounds: the len is {} but the index is {}",
            self.num_sections(),
            section.get()
        );

        !self.rows[section.get()].is_disjoint(mask.as_bitset())
    }

    /// Returns the number of already-chosen sections in `mask` that the
    /// given section overlaps, which is the number of new conflicting
    /// pairs that adding it would introduce.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the index is out of bounds.
    #[inline]
    pub fn new_conflict_pairs(&self, mask: &SectionMask, section: SectionIndex) -> u32 {
        debug_assert!(
            section.get() < self.num_sections(),
            "called `ConflictIndex::new_conflict_pairs` with section index out of bounds: the len is {} but the index is {}",
            self.num_sections(),
            section.get()
        );

        self.rows[section.get()].intersection_count(mask.as_bitset()) as u32
    }

    /// Returns the members of `mask` that conflict with the given section,
    /// in index order.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the index is out of bounds.
    #[inline]
    pub fn conflicting_members(
        &self,
        mask: &SectionMask,
        section: SectionIndex,
    ) -> Vec<SectionIndex> {
        debug_assert!(
            section.get() < self.num_sections(),
            "called `ConflictIndex::conflicting_members` with section index out of bounds: the len is {} but the index is {}",
            self.num_sections(),
            section.get()
        );

        self.rows[section.get()]
            .intersection(mask.as_bitset())
            .map(SectionIndex::new)
            .collect()
    }

    /// Counts the conflicting pairs among the members of `mask`, each
    /// unordered pair counted exactly once.
    pub fn pair_count(&self, mask: &SectionMask) -> u32 {
        let mut total = 0u32;
        for section in mask.iter() {
            total += self.rows[section.get()].intersection_count(mask.as_bitset()) as u32;
        }
        // Each pair was seen from both of its endpoints.
        total / 2
    }
}

impl std::fmt::Display for ConflictIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let edges: usize = self.rows.iter().map(|row| row.count_ones(..)).sum();
        write!(
            f,
            "ConflictIndex(sections: {}, conflicting pairs: {})",
            self.num_sections(),
            edges / 2
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogBuilder;
    use crate::section::{SectionKind, SectionRecord};
    use crate::slot::{Day, TimeSlot};

    fn record(code: &str, main: &str, slots: &[(Day, u8)]) -> SectionRecord {
        SectionRecord {
            code: code.to_string(),
            main_code: main.to_string(),
            name: format!("Course {}", main),
            credit: 6,
            kind: SectionKind::Lecture,
            slots: slots.iter().map(|&(d, p)| TimeSlot::new(d, p)).collect(),
            instructor: "N.N.".to_string(),
        }
    }

    fn catalog(records: Vec<SectionRecord>) -> Catalog {
        let mut builder = CatalogBuilder::new();
        builder.extend(records);
        builder.build().unwrap()
    }

    fn si(i: usize) -> SectionIndex {
        SectionIndex::new(i)
    }

    #[test]
    fn test_empty_catalog_builds_empty_valid_index() {
        let cat = catalog(vec![]);
        let index = ConflictIndex::build(&cat);
        assert_eq!(index.num_sections(), 0);
        let mask = SectionMask::new(0);
        assert_eq!(index.pair_count(&mask), 0);
    }

    #[test]
    fn test_pair_conflicts_is_symmetric_and_irreflexive() {
        let cat = catalog(vec![
            record("A-1", "A", &[(Day::Monday, 1)]),
            record("B-1", "B", &[(Day::Monday, 1)]),
            record("C-1", "C", &[(Day::Tuesday, 1)]),
        ]);
        let index = ConflictIndex::build(&cat);

        assert!(index.pair_conflicts(si(0), si(1)));
        assert!(index.pair_conflicts(si(1), si(0)));
        assert!(!index.pair_conflicts(si(0), si(2)));
        assert!(!index.pair_conflicts(si(0), si(0)), "no self conflict");
    }

    #[test]
    fn test_conflicts_against_mask() {
        let cat = catalog(vec![
            record("A-1", "A", &[(Day::Monday, 1)]),
            record("B-1", "B", &[(Day::Monday, 1)]),
            record("C-1", "C", &[(Day::Tuesday, 1)]),
        ]);
        let index = ConflictIndex::build(&cat);

        let mut mask = SectionMask::new(cat.num_sections());
        mask.add(si(0));

        assert!(index.conflicts(&mask, si(1)));
        assert!(!index.conflicts(&mask, si(2)));

        mask.remove(si(0));
        assert!(!index.conflicts(&mask, si(1)));
    }

    #[test]
    fn test_new_conflict_pairs_counts_overlapping_members() {
        // A, B, C all occupy Mon-1; D is free.
        let cat = catalog(vec![
            record("A-1", "A", &[(Day::Monday, 1)]),
            record("B-1", "B", &[(Day::Monday, 1)]),
            record("C-1", "C", &[(Day::Monday, 1)]),
            record("D-1", "D", &[(Day::Friday, 3)]),
        ]);
        let index = ConflictIndex::build(&cat);

        let mut mask = SectionMask::new(cat.num_sections());
        mask.add(si(0));
        mask.add(si(1));

        assert_eq!(index.new_conflict_pairs(&mask, si(2)), 2);
        assert_eq!(index.new_conflict_pairs(&mask, si(3)), 0);
    }

    #[test]
    fn test_conflicting_members_lists_exact_sections() {
        let cat = catalog(vec![
            record("A-1", "A", &[(Day::Monday, 1)]),
            record("B-1", "B", &[(Day::Monday, 1), (Day::Tuesday, 1)]),
            record("C-1", "C", &[(Day::Tuesday, 1)]),
        ]);
        let index = ConflictIndex::build(&cat);

        let mut mask = SectionMask::new(cat.num_sections());
        mask.add(si(0));
        mask.add(si(2));

        assert_eq!(index.conflicting_members(&mask, si(1)), vec![si(0), si(2)]);
        assert_eq!(index.conflicting_members(&mask, si(0)), vec![]);
    }

    #[test]
    fn test_pair_count_counts_each_pair_once() {
        // Triangle: A-B, B-C, A-C all conflict.
        let cat = catalog(vec![
            record("A-1", "A", &[(Day::Monday, 1)]),
            record("B-1", "B", &[(Day::Monday, 1)]),
            record("C-1", "C", &[(Day::Monday, 1)]),
        ]);
        let index = ConflictIndex::build(&cat);

        let mut mask = SectionMask::new(cat.num_sections());
        mask.add(si(0));
        mask.add(si(1));
        mask.add(si(2));
        assert_eq!(index.pair_count(&mask), 3);

        mask.remove(si(2));
        assert_eq!(index.pair_count(&mask), 1);
    }

    #[test]
    fn test_incremental_popcount_sum_equals_pairwise_count() {
        // Adding sections one by one and summing new_conflict_pairs must
        // reproduce the strict unique-pair count at every step.
        let cat = catalog(vec![
            record("A-1", "A", &[(Day::Monday, 1), (Day::Tuesday, 2)]),
            record("B-1", "B", &[(Day::Monday, 1)]),
            record("C-1", "C", &[(Day::Tuesday, 2), (Day::Monday, 1)]),
            record("D-1", "D", &[(Day::Friday, 5)]),
        ]);
        let index = ConflictIndex::build(&cat);

        let mut mask = SectionMask::new(cat.num_sections());
        let mut running = 0u32;
        for i in 0..cat.num_sections() {
            running += index.new_conflict_pairs(&mask, si(i));
            mask.add(si(i));
            assert_eq!(
                running,
                index.pair_count(&mask),
                "incremental tally diverged after adding section {}",
                i
            );
        }
    }

    #[test]
    fn test_index_agrees_with_brute_force_on_dense_catalog() {
        // 70 sections spread over a narrow grid forces many collisions and
        // pushes the bitsets past a single 64-bit word.
        let mut records = Vec::new();
        for i in 0..70usize {
            let day = Day::ALL[i % 3];
            let period = (i % 5) as u8;
            records.push(record(
                &format!("S{}-A", i),
                &format!("S{}", i),
                &[(day, period)],
            ));
        }
        let cat = catalog(records);
        let index = ConflictIndex::build(&cat);

        for i in 0..cat.num_sections() {
            for j in 0..cat.num_sections() {
                let expected = i != j
                    && cat
                        .section(si(i))
                        .conflicts_with(cat.section(si(j)));
                assert_eq!(
                    index.pair_conflicts(si(i), si(j)),
                    expected,
                    "mismatch at pair ({}, {})",
                    i,
                    j
                );
            }
        }
    }

    #[test]
    fn test_mask_bitset_queries_agree_with_member_scan() {
        let mut records = Vec::new();
        for i in 0..20usize {
            records.push(record(
                &format!("S{}-A", i),
                &format!("S{}", i),
                &[(Day::ALL[i % 4], (i % 6) as u8)],
            ));
        }
        let cat = catalog(records);
        let index = ConflictIndex::build(&cat);

        let mut mask = SectionMask::new(cat.num_sections());
        for i in (0..20).step_by(3) {
            mask.add(si(i));
        }

        for probe in 0..cat.num_sections() {
            let brute = mask
                .iter()
                .filter(|&m| m != si(probe) && index.pair_conflicts(m, si(probe)))
                .count() as u32;
            // A member never conflicts with itself; the row carries no
            // self bit, so the query is exact even when the probe is in
            // the mask.
            let masked = index.new_conflict_pairs(&mask, si(probe));
            assert_eq!(masked, brute, "mismatch probing section {}", probe);
            assert_eq!(index.conflicts(&mask, si(probe)), brute > 0);
        }
    }
}
