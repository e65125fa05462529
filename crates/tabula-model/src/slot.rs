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

//! # Weekly Time-Slot Grid
//!
//! The discrete time model of the engine: a week is a fixed grid of
//! `7 × NUM_PERIODS` cells, and every section occupies a small set of
//! those cells. Because the whole grid fits into a single `u128`, a
//! section's weekly footprint is stored as a `WeekGrid` bitmask and two
//! sections overlap iff the AND of their grids is non-zero, one machine
//! instruction instead of a nested slot-list comparison.
//!
//! The slot lists themselves are kept in a `SmallVec`: weekly grids are
//! short (a handful of cells), so inline storage avoids a heap allocation
//! per section.

use smallvec::SmallVec;

/// Number of teaching periods per day. Period values are `0..NUM_PERIODS`.
pub const NUM_PERIODS: usize = 16;

/// Number of grid cells in a week (`7 * NUM_PERIODS = 112`), all of which
/// fit into a single `u128` word.
pub const NUM_WEEK_CELLS: usize = 7 * NUM_PERIODS;

/// Inline slot storage for a section's weekly grid.
pub type SlotList = SmallVec<[TimeSlot; 8]>;

/// A day of the week.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    /// All days, in week order.
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    /// Returns the zero-based position of the day within the week.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Day {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Day::Monday => "Mon",
            Day::Tuesday => "Tue",
            Day::Wednesday => "Wed",
            Day::Thursday => "Thu",
            Day::Friday => "Fri",
            Day::Saturday => "Sat",
            Day::Sunday => "Sun",
        };
        write!(f, "{}", name)
    }
}

/// One cell of the weekly grid: a `(day, period)` pair.
///
/// `period` must be in `0..NUM_PERIODS`; the catalog builder rejects
/// records that violate this before any search begins.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct TimeSlot {
    pub day: Day,
    pub period: u8,
}

impl TimeSlot {
    /// Creates a new time slot.
    #[inline]
    pub const fn new(day: Day, period: u8) -> Self {
        Self { day, period }
    }

    /// Returns `true` if the period lies within the grid bounds.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        (self.period as usize) < NUM_PERIODS
    }

    /// Returns the flat cell index of this slot within the week grid.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the period is out of bounds.
    #[inline]
    pub fn cell_index(&self) -> usize {
        debug_assert!(
            self.is_valid(),
            "called `TimeSlot::cell_index` with period out of bounds: the limit is {} but the period is {}",
            NUM_PERIODS,
            self.period
        );

        self.day.index() * NUM_PERIODS + self.period as usize
    }
}

impl std::fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.day, self.period)
    }
}

/// A section's weekly footprint as a 112-bit occupancy mask.
///
/// Bit `d * NUM_PERIODS + p` is set iff the section occupies period `p`
/// on day `d`. Two sections conflict iff their grids `overlaps`.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WeekGrid(u128);

impl WeekGrid {
    /// The empty grid.
    #[inline]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Builds a grid from a list of slots.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if any slot has a period out of bounds.
    #[inline]
    pub fn from_slots(slots: &[TimeSlot]) -> Self {
        let mut bits: u128 = 0;
        for slot in slots {
            bits |= 1u128 << slot.cell_index();
        }
        Self(bits)
    }

    /// Marks a single cell as occupied.
    #[inline]
    pub fn set(&mut self, slot: TimeSlot) {
        self.0 |= 1u128 << slot.cell_index();
    }

    /// Returns `true` if the given cell is occupied.
    #[inline]
    pub fn contains(&self, slot: TimeSlot) -> bool {
        (self.0 >> slot.cell_index()) & 1 == 1
    }

    /// Returns `true` if the two grids share at least one cell.
    #[inline]
    pub const fn overlaps(&self, other: &WeekGrid) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns the number of occupied cells.
    #[inline]
    pub const fn count(&self) -> u32 {
        self.0.count_ones()
    }

    /// Returns `true` if no cell is occupied.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Debug for WeekGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WeekGrid({:#x})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(day: Day, period: u8) -> TimeSlot {
        TimeSlot::new(day, period)
    }

    #[test]
    fn test_day_index_follows_week_order() {
        for (expected, day) in Day::ALL.iter().enumerate() {
            assert_eq!(day.index(), expected);
        }
    }

    #[test]
    fn test_cell_index_is_unique_per_slot() {
        let mut seen = std::collections::HashSet::new();
        for day in Day::ALL {
            for period in 0..NUM_PERIODS as u8 {
                assert!(
                    seen.insert(slot(day, period).cell_index()),
                    "cell index collision at {}-{}",
                    day,
                    period
                );
            }
        }
        assert_eq!(seen.len(), NUM_WEEK_CELLS);
        assert!(seen.iter().all(|&c| c < NUM_WEEK_CELLS));
    }

    #[test]
    fn test_grid_overlap_matches_slot_intersection() {
        let a = WeekGrid::from_slots(&[slot(Day::Monday, 1), slot(Day::Wednesday, 3)]);
        let b = WeekGrid::from_slots(&[slot(Day::Wednesday, 3), slot(Day::Friday, 0)]);
        let c = WeekGrid::from_slots(&[slot(Day::Tuesday, 1)]);

        assert!(a.overlaps(&b), "shared Wed-3 cell must overlap");
        assert!(b.overlaps(&a), "overlap must be symmetric");
        assert!(!a.overlaps(&c));
        assert!(!c.overlaps(&b));
    }

    #[test]
    fn test_same_period_different_day_does_not_overlap() {
        let a = WeekGrid::from_slots(&[slot(Day::Monday, 2)]);
        let b = WeekGrid::from_slots(&[slot(Day::Tuesday, 2)]);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_empty_grid_overlaps_nothing() {
        let empty = WeekGrid::empty();
        let busy = WeekGrid::from_slots(&[slot(Day::Monday, 0)]);
        assert!(empty.is_empty());
        assert!(!empty.overlaps(&busy));
        assert!(!busy.overlaps(&empty));
    }

    #[test]
    fn test_set_and_contains_round_trip() {
        let mut grid = WeekGrid::empty();
        let s = slot(Day::Sunday, 15);
        assert!(!grid.contains(s));
        grid.set(s);
        assert!(grid.contains(s));
        assert_eq!(grid.count(), 1);
    }

    #[test]
    fn test_duplicate_slots_count_once() {
        let grid = WeekGrid::from_slots(&[slot(Day::Monday, 1), slot(Day::Monday, 1)]);
        assert_eq!(grid.count(), 1);
    }
}
