//! Delimiter candidates and the stack of still-unresolved openers.
//!
//! The stack is a plain vector ordered by token position. Alongside it we
//! keep one index list per (character, explicitness) class so the nearest
//! opener of a class is found without walking the stack. Every entry is
//! pushed onto exactly one class list and removed from it at most once, so
//! the total work over a parse is linear in the number of markers.

use crate::lexer::{Delim, Marker};

/// The runtime record for one marker that may still open a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiter {
    /// Index of the marker token in the token sequence.
    pub position: usize,
    pub marker: Marker,
}

impl Delimiter {
    pub fn new(position: usize, marker: Marker) -> Self {
        Self { position, marker }
    }

    pub fn delim(&self) -> Delim {
        self.marker.delim
    }

    pub fn is_explicit(&self) -> bool {
        self.marker.explicit_open
    }
}

/// The class a delimiter is matched within: same character, same explicitness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Class {
    pub delim: Delim,
    pub explicit: bool,
}

impl Class {
    pub fn new(delim: Delim, explicit: bool) -> Self {
        Self { delim, explicit }
    }

    fn index(self) -> usize {
        let base = match self.delim {
            Delim::Star => 0,
            Delim::Underscore => 2,
        };
        base + usize::from(self.explicit)
    }
}

#[derive(Debug, Default)]
pub struct DelimiterStack {
    entries: Vec<Delimiter>,
    openers: [Vec<usize>; 4],
}

impl DelimiterStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, depth: usize) -> Option<&Delimiter> {
        self.entries.get(depth)
    }

    /// Pushes an active candidate. Positions must increase strictly.
    pub fn push(&mut self, delimiter: Delimiter) {
        if let Some(top) = self.entries.last() {
            assert!(
                top.position < delimiter.position,
                "delimiter at {} pushed above {}",
                delimiter.position,
                top.position
            );
        }
        let class = Class::new(delimiter.delim(), delimiter.is_explicit());
        self.openers[class.index()].push(self.entries.len());
        self.entries.push(delimiter);
    }

    /// Depth of the topmost active candidate in `class`.
    pub fn nearest(&self, class: Class) -> Option<usize> {
        self.openers[class.index()].last().copied()
    }

    /// Removes every entry from `depth` up, returning them bottom-first.
    ///
    /// Truncating at or beyond the current length means the matcher and the
    /// stack disagree about what is active, which is an internal fault.
    pub fn truncate(&mut self, depth: usize) -> Vec<Delimiter> {
        if depth >= self.entries.len() {
            panic!(
                "Delimiter stack truncated at depth {depth} with only {} entries",
                self.entries.len()
            );
        }
        for list in &mut self.openers {
            while list.last().is_some_and(|&d| d >= depth) {
                list.pop();
            }
        }
        self.entries.split_off(depth)
    }

    /// Empties the stack, yielding whatever never found a closer.
    pub fn drain(&mut self) -> Vec<Delimiter> {
        for list in &mut self.openers {
            list.clear();
        }
        std::mem::take(&mut self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opener(position: usize, delim: Delim, explicit: bool) -> Delimiter {
        let marker = Marker::classify(delim, explicit, false, None, Some('a'));
        Delimiter::new(position, marker)
    }

    #[test]
    fn nearest_is_per_class() {
        let mut stack = DelimiterStack::new();
        stack.push(opener(0, Delim::Star, false));
        stack.push(opener(2, Delim::Underscore, false));
        stack.push(opener(4, Delim::Underscore, true));

        assert_eq!(stack.nearest(Class::new(Delim::Star, false)), Some(0));
        assert_eq!(stack.nearest(Class::new(Delim::Underscore, false)), Some(1));
        assert_eq!(stack.nearest(Class::new(Delim::Underscore, true)), Some(2));
        assert_eq!(stack.nearest(Class::new(Delim::Star, true)), None);
    }

    #[test]
    fn truncate_drops_suffix_and_class_indices() {
        let mut stack = DelimiterStack::new();
        stack.push(opener(0, Delim::Underscore, false));
        stack.push(opener(1, Delim::Star, false));
        stack.push(opener(3, Delim::Underscore, false));
        stack.push(opener(5, Delim::Star, false));

        let removed = stack.truncate(1);
        let positions: Vec<_> = removed.iter().map(|d| d.position).collect();
        assert_eq!(positions, vec![1, 3, 5]);
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.nearest(Class::new(Delim::Star, false)), None);
        assert_eq!(stack.nearest(Class::new(Delim::Underscore, false)), Some(0));
    }

    #[test]
    fn push_after_truncate_reuses_depths() {
        let mut stack = DelimiterStack::new();
        stack.push(opener(0, Delim::Star, false));
        stack.push(opener(1, Delim::Star, false));
        stack.truncate(1);
        stack.push(opener(4, Delim::Star, false));

        assert_eq!(stack.nearest(Class::new(Delim::Star, false)), Some(1));
        assert_eq!(stack.get(1).map(|d| d.position), Some(4));
    }

    #[test]
    fn drain_empties_everything() {
        let mut stack = DelimiterStack::new();
        stack.push(opener(0, Delim::Star, false));
        stack.push(opener(1, Delim::Underscore, true));

        assert_eq!(stack.drain().len(), 2);
        assert!(stack.is_empty());
        assert_eq!(stack.nearest(Class::new(Delim::Underscore, true)), None);
    }

    #[test]
    #[should_panic(expected = "truncated at depth")]
    fn truncate_out_of_range_is_fatal() {
        let mut stack = DelimiterStack::new();
        stack.push(opener(0, Delim::Star, false));
        stack.truncate(1);
    }

    #[test]
    #[should_panic(expected = "pushed above")]
    fn positions_must_increase() {
        let mut stack = DelimiterStack::new();
        stack.push(opener(3, Delim::Star, false));
        stack.push(opener(3, Delim::Star, false));
    }
}
