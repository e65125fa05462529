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

//! # Sections and Course Groups
//!
//! A `Section` is one schedulable variant of a course: a concrete weekly
//! grid, a credit weight, a kind, and an instructor. All sections sharing
//! one `main_code` form a `CourseGroup`; a schedule picks at most one
//! variant per group. Both types are immutable once the owning `Catalog`
//! has been built.

use crate::{
    index::SectionIndex,
    slot::{SlotList, WeekGrid},
};

/// The kind of a section, used for priority-ordering bonuses.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum SectionKind {
    Lecture,
    ProblemSession,
    Lab,
}

impl SectionKind {
    /// All kinds, in the default priority order.
    pub const ALL: [SectionKind; 3] = [
        SectionKind::Lecture,
        SectionKind::ProblemSession,
        SectionKind::Lab,
    ];

    /// Returns a short human-readable name.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            SectionKind::Lecture => "lecture",
            SectionKind::ProblemSession => "problem-session",
            SectionKind::Lab => "lab",
        }
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A raw section record as delivered by the ingestion collaborator.
///
/// This is the input contract of the engine: an ordered list of these
/// records goes into `CatalogBuilder`, which validates them and produces
/// the immutable `Catalog`. The record itself performs no validation.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SectionRecord {
    /// Globally unique section code, e.g. `"CS101-A"`.
    pub code: String,
    /// Logical course code shared by all variants, e.g. `"CS101"`.
    pub main_code: String,
    /// Human-readable course name.
    pub name: String,
    /// Credit weight ("ECTS"); must be positive.
    pub credit: u32,
    /// Section kind.
    pub kind: SectionKind,
    /// Weekly time slots occupied by this section.
    pub slots: SlotList,
    /// Instructor name.
    pub instructor: String,
}

/// A validated, immutable section inside a `Catalog`.
///
/// Carries the precomputed `WeekGrid` occupancy mask alongside the raw
/// slot list so that conflict construction is a single `u128` AND per
/// section pair.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Section {
    code: String,
    main_code: String,
    name: String,
    credit: u32,
    kind: SectionKind,
    slots: SlotList,
    grid: WeekGrid,
    instructor: String,
}

impl Section {
    /// Builds a section from a validated record. Crate-internal: the
    /// `CatalogBuilder` is the only construction path.
    #[inline]
    pub(crate) fn from_record(record: SectionRecord) -> Self {
        let grid = WeekGrid::from_slots(&record.slots);
        Self {
            code: record.code,
            main_code: record.main_code,
            name: record.name,
            credit: record.credit,
            kind: record.kind,
            slots: record.slots,
            grid,
            instructor: record.instructor,
        }
    }

    /// Returns the globally unique section code.
    #[inline]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the logical course code shared by all variants.
    #[inline]
    pub fn main_code(&self) -> &str {
        &self.main_code
    }

    /// Returns the human-readable course name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the credit weight.
    #[inline]
    pub fn credit(&self) -> u32 {
        self.credit
    }

    /// Returns the section kind.
    #[inline]
    pub fn kind(&self) -> SectionKind {
        self.kind
    }

    /// Returns the weekly time slots.
    #[inline]
    pub fn slots(&self) -> &[crate::slot::TimeSlot] {
        &self.slots
    }

    /// Returns the precomputed weekly occupancy mask.
    #[inline]
    pub fn grid(&self) -> &WeekGrid {
        &self.grid
    }

    /// Returns the instructor name.
    #[inline]
    pub fn instructor(&self) -> &str {
        &self.instructor
    }

    /// Returns `true` if this section's weekly grid overlaps `other`'s.
    #[inline]
    pub fn conflicts_with(&self, other: &Section) -> bool {
        self.grid.overlaps(&other.grid)
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Section({}, {} ECTS, {}, {} slots)",
            self.code,
            self.credit,
            self.kind,
            self.slots.len()
        )
    }
}

/// All section variants of one logical course.
///
/// Invariant: every member section shares this group's `main_code`; the
/// `CatalogBuilder` enforces this by construction (groups are formed by
/// grouping records on their `main_code`).
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CourseGroup {
    main_code: String,
    sections: Vec<SectionIndex>,
}

impl CourseGroup {
    /// Crate-internal constructor used by `CatalogBuilder`.
    #[inline]
    pub(crate) fn new(main_code: String, sections: Vec<SectionIndex>) -> Self {
        Self {
            main_code,
            sections,
        }
    }

    /// Returns the logical course code of this group.
    #[inline]
    pub fn main_code(&self) -> &str {
        &self.main_code
    }

    /// Returns the section variants in catalog insertion order.
    #[inline]
    pub fn sections(&self) -> &[SectionIndex] {
        &self.sections
    }

    /// Returns the number of variants.
    #[inline]
    pub fn num_variants(&self) -> usize {
        self.sections.len()
    }
}

impl std::fmt::Display for CourseGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CourseGroup({}, {} variants)",
            self.main_code,
            self.sections.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::{Day, TimeSlot};
    use smallvec::smallvec;

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

    #[test]
    fn test_from_record_precomputes_grid() {
        let section = Section::from_record(record("CS101-A", "CS101", &[(Day::Monday, 1)]));
        assert!(section.grid().contains(TimeSlot::new(Day::Monday, 1)));
        assert_eq!(section.grid().count(), 1);
        assert_eq!(section.code(), "CS101-A");
        assert_eq!(section.main_code(), "CS101");
        assert_eq!(section.credit(), 6);
        assert_eq!(section.kind(), SectionKind::Lecture);
    }

    #[test]
    fn test_conflicts_with_is_slot_intersection() {
        let a = Section::from_record(record("A-1", "A", &[(Day::Monday, 1), (Day::Tuesday, 2)]));
        let b = Section::from_record(record("B-1", "B", &[(Day::Tuesday, 2)]));
        let c = Section::from_record(record("C-1", "C", &[(Day::Friday, 4)]));

        assert!(a.conflicts_with(&b));
        assert!(b.conflicts_with(&a));
        assert!(!a.conflicts_with(&c));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(SectionKind::Lecture.name(), "lecture");
        assert_eq!(SectionKind::ProblemSession.name(), "problem-session");
        assert_eq!(SectionKind::Lab.name(), "lab");
    }

    #[test]
    fn test_group_accessors() {
        let group = CourseGroup::new(
            "CS101".to_string(),
            vec![SectionIndex::new(0), SectionIndex::new(3)],
        );
        assert_eq!(group.main_code(), "CS101");
        assert_eq!(group.num_variants(), 2);
        assert_eq!(group.sections()[1], SectionIndex::new(3));
    }

    #[test]
    fn test_slot_list_stays_inline_for_typical_grids() {
        let slots: SlotList = smallvec![
            TimeSlot::new(Day::Monday, 1),
            TimeSlot::new(Day::Wednesday, 1),
            TimeSlot::new(Day::Friday, 1),
        ];
        assert!(!slots.spilled());
    }
}
