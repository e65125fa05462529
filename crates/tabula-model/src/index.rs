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

//! # Typed Catalog Indices
//!
//! Zero-cost wrappers around `usize` for the two index spaces of a
//! catalog: sections and course groups. The search engine juggles both
//! constantly; a raw `usize` invites accidental swaps, while these
//! transparent wrappers make the mixup a compile error with no runtime
//! overhead.

/// Index of a section within a catalog's fixed section ordering.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SectionIndex(usize);

/// Index of a course group within a catalog's fixed group ordering.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupIndex(usize);

macro_rules! impl_typed_index {
    ($name:ident) => {
        impl $name {
            /// Creates a new index from a raw `usize`.
            #[inline(always)]
            pub const fn new(index: usize) -> Self {
                Self(index)
            }

            /// Returns the underlying `usize`.
            #[inline(always)]
            pub const fn get(self) -> usize {
                self.0
            }
        }

        impl From<usize> for $name {
            #[inline]
            fn from(index: usize) -> Self {
                Self::new(index)
            }
        }

        impl From<$name> for usize {
            #[inline]
            fn from(index: $name) -> Self {
                index.get()
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

impl_typed_index!(SectionIndex);
impl_typed_index!(GroupIndex);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_and_accessors() {
        let s = SectionIndex::new(7);
        assert_eq!(s.get(), 7);
        assert_eq!(usize::from(s), 7);
        assert_eq!(SectionIndex::from(7usize), s);

        let g = GroupIndex::new(0);
        assert_eq!(g.get(), 0);
    }

    #[test]
    fn test_display_carries_type_name() {
        assert_eq!(format!("{}", SectionIndex::new(3)), "SectionIndex(3)");
        assert_eq!(format!("{}", GroupIndex::new(12)), "GroupIndex(12)");
        assert_eq!(format!("{:?}", GroupIndex::new(12)), "GroupIndex(12)");
    }

    #[test]
    fn test_ordering_follows_raw_index() {
        assert!(SectionIndex::new(1) < SectionIndex::new(2));
        assert!(GroupIndex::new(0) < GroupIndex::new(5));
    }
}
