use std::ops::Range;

use nom::Offset;
use parse_display::Display;

#[derive(Clone, Debug, PartialEq, Eq, Display)]
#[display("{inner}", bound(T))]
pub struct Located<T> {
    pub inner: T,
    pub location: Location,
}

pub(crate) trait Locatable: Sized {
    fn with_location<L: Into<Location>>(self, location: L) -> Located<Self> {
        Located {
            inner: self,
            location: location.into(),
        }
    }
}

impl<T> Locatable for T {}

/// A byte range in the source text
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Location {
    offset: usize,
    length: usize,
}

impl Location {
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    #[must_use]
    pub const fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.length
    }

    /// Smallest location covering both `self` and `other`
    #[must_use]
    pub fn join(&self, other: &Location) -> Location {
        let start = self.offset.min(other.offset);
        let end = (self.offset + self.length).max(other.offset + other.length);
        Location {
            offset: start,
            length: end - start,
        }
    }
}

impl From<Range<usize>> for Location {
    fn from(range: Range<usize>) -> Self {
        Location {
            offset: range.start,
            length: range.len(),
        }
    }
}

impl<T> From<(T, T, T)> for Location
where
    T: Offset,
{
    fn from((full, start, end): (T, T, T)) -> Self {
        let offset = full.offset(&start);
        let length = start.offset(&end);
        Location { offset, length }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.offset, self.offset + self.length)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn location_from_slices_test() {
        let full = "SET 0 5";
        let start = &full[4..];
        let end = &full[5..];
        let location = Location::from((full, start, end));
        assert_eq!(location.range(), 4..5);
        assert_eq!(location.to_string(), "4..5");
    }

    #[test]
    fn join_test() {
        let a = Location::from(2..4);
        let b = Location::from(8..11);
        assert_eq!(a.join(&b).range(), 2..11);
        assert_eq!(b.join(&a).range(), 2..11);
    }
}
