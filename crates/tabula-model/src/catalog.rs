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

//! # Catalog Construction and Validation
//!
//! The `Catalog` is the immutable universe of a search: all sections in a
//! fixed order, their grouping into course groups, and fast code lookups.
//! `CatalogBuilder::build` is the single validation gate of the engine:
//! malformed section records fail here with a descriptive error, before
//! any search begins. Everything downstream (the conflict index, every
//! strategy, the benchmark harness) may then assume well-formed data.
//!
//! Ordering is deterministic: sections keep their record insertion order,
//! groups appear in order of first appearance of their `main_code`.

use crate::{
    index::{GroupIndex, SectionIndex},
    section::{CourseGroup, Section, SectionRecord},
    slot::NUM_PERIODS,
};
use rustc_hash::FxHashMap;

/// The error type for catalog construction.
///
/// Every variant names the offending record so that ingestion layers can
/// point the user at the exact row that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// A record has an empty `code` or `main_code`.
    EmptyCode {
        /// Zero-based position of the record in the input list.
        position: usize,
    },
    /// Two records share the same section code.
    DuplicateCode { code: String },
    /// A record has a credit weight of zero.
    ZeroCredit { code: String },
    /// A record has no time slots at all.
    NoTimeSlots { code: String },
    /// A record has a slot whose period lies outside the weekly grid.
    PeriodOutOfRange { code: String, period: u8 },
    /// A record lists the same `(day, period)` cell twice.
    DuplicateSlot { code: String },
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyCode { position } => {
                write!(f, "Section record at position {} has an empty code", position)
            }
            Self::DuplicateCode { code } => {
                write!(f, "Duplicate section code '{}'", code)
            }
            Self::ZeroCredit { code } => {
                write!(f, "Section '{}' has a credit weight of zero", code)
            }
            Self::NoTimeSlots { code } => {
                write!(f, "Section '{}' has no time slots", code)
            }
            Self::PeriodOutOfRange { code, period } => {
                write!(
                    f,
                    "Section '{}' has period {} outside the grid (0..{})",
                    code, period, NUM_PERIODS
                )
            }
            Self::DuplicateSlot { code } => {
                write!(f, "Section '{}' lists the same time slot twice", code)
            }
        }
    }
}

impl std::error::Error for CatalogError {}

/// The immutable course catalog: the fixed section ordering every
/// `SectionIndex` refers to, the course groups, and code lookups.
///
/// A catalog is built once per input via `CatalogBuilder` and then shared
/// by reference across any number of concurrent searches. An empty
/// catalog is valid and yields empty searches, not errors.
#[derive(Clone, Debug)]
pub struct Catalog {
    sections: Vec<Section>,
    groups: Vec<CourseGroup>,
    section_lookup: FxHashMap<String, SectionIndex>,
    group_lookup: FxHashMap<String, GroupIndex>,
}

impl Catalog {
    /// Returns the number of sections.
    #[inline]
    pub fn num_sections(&self) -> usize {
        self.sections.len()
    }

    /// Returns the number of course groups.
    #[inline]
    pub fn num_groups(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` if the catalog holds no sections.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Returns all sections in their fixed ordering.
    #[inline]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Returns all course groups in first-appearance order.
    #[inline]
    pub fn groups(&self) -> &[CourseGroup] {
        &self.groups
    }

    /// Returns the section at the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not in `0..num_sections()`.
    #[inline]
    pub fn section(&self, index: SectionIndex) -> &Section {
        debug_assert!(
            index.get() < self.num_sections(),
            "called `Catalog::section` with section index out of bounds: the len is {} but the index is {}",
            self.num_sections(),
            index.get()
        );

        &self.sections[index.get()]
    }

    /// Returns the course group at the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not in `0..num_groups()`.
    #[inline]
    pub fn group(&self, index: GroupIndex) -> &CourseGroup {
        debug_assert!(
            index.get() < self.num_groups(),
            "called `Catalog::group` with group index out of bounds: the len is {} but the index is {}",
            self.num_groups(),
            index.get()
        );

        &self.groups[index.get()]
    }

    /// Looks up a section by its globally unique code.
    #[inline]
    pub fn section_by_code(&self, code: &str) -> Option<SectionIndex> {
        self.section_lookup.get(code).copied()
    }

    /// Looks up a course group by its logical main code.
    #[inline]
    pub fn group_by_code(&self, main_code: &str) -> Option<GroupIndex> {
        self.group_lookup.get(main_code).copied()
    }
}

impl std::fmt::Display for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Catalog(sections: {}, groups: {})",
            self.num_sections(),
            self.num_groups()
        )
    }
}

/// Builder and validation gate for `Catalog`.
///
/// Records are appended in ingestion order; `build` validates every
/// record and fails fast on the first malformed one. Infeasible *inputs*
/// (a selection no schedule can satisfy) are not errors and are not
/// checked here; they surface later as empty search results.
#[derive(Clone, Debug, Default)]
pub struct CatalogBuilder {
    records: Vec<SectionRecord>,
}

impl CatalogBuilder {
    /// Creates an empty builder.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one section record.
    #[inline]
    pub fn push(&mut self, record: SectionRecord) -> &mut Self {
        self.records.push(record);
        self
    }

    /// Appends many section records.
    #[inline]
    pub fn extend<I>(&mut self, records: I) -> &mut Self
    where
        I: IntoIterator<Item = SectionRecord>,
    {
        self.records.extend(records);
        self
    }

    /// Returns the number of records staged so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no records are staged.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Validates all staged records and builds the immutable catalog.
    ///
    /// An empty builder produces an empty, valid catalog. The first
    /// malformed record aborts construction with a descriptive error.
    pub fn build(self) -> Result<Catalog, CatalogError> {
        let mut sections = Vec::with_capacity(self.records.len());
        let mut section_lookup =
            FxHashMap::with_capacity_and_hasher(self.records.len(), Default::default());
        let mut group_lookup: FxHashMap<String, GroupIndex> = FxHashMap::default();
        let mut group_members: Vec<(String, Vec<SectionIndex>)> = Vec::new();

        for (position, record) in self.records.into_iter().enumerate() {
            Self::validate(position, &record)?;

            let index = SectionIndex::new(sections.len());
            if section_lookup
                .insert(record.code.clone(), index)
                .is_some()
            {
                return Err(CatalogError::DuplicateCode {
                    code: record.code,
                });
            }

            match group_lookup.get(&record.main_code) {
                Some(&group_index) => {
                    group_members[group_index.get()].1.push(index);
                }
                None => {
                    let group_index = GroupIndex::new(group_members.len());
                    group_lookup.insert(record.main_code.clone(), group_index);
                    group_members.push((record.main_code.clone(), vec![index]));
                }
            }

            sections.push(Section::from_record(record));
        }

        let groups = group_members
            .into_iter()
            .map(|(main_code, members)| CourseGroup::new(main_code, members))
            .collect();

        Ok(Catalog {
            sections,
            groups,
            section_lookup,
            group_lookup,
        })
    }

    fn validate(position: usize, record: &SectionRecord) -> Result<(), CatalogError> {
        if record.code.is_empty() || record.main_code.is_empty() {
            return Err(CatalogError::EmptyCode { position });
        }
        if record.credit == 0 {
            return Err(CatalogError::ZeroCredit {
                code: record.code.clone(),
            });
        }
        if record.slots.is_empty() {
            return Err(CatalogError::NoTimeSlots {
                code: record.code.clone(),
            });
        }
        for slot in &record.slots {
            if !slot.is_valid() {
                return Err(CatalogError::PeriodOutOfRange {
                    code: record.code.clone(),
                    period: slot.period,
                });
            }
        }
        for (i, a) in record.slots.iter().enumerate() {
            if record.slots[i + 1..].contains(a) {
                return Err(CatalogError::DuplicateSlot {
                    code: record.code.clone(),
                });
            }
        }
        Ok(())
    }
}
