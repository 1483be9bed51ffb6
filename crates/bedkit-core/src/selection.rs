//! Selection handling for mesh editing.
//!
//! A selection is a plain set of `(row, col)` coordinates. The frontend
//! builds selections from clicks and drag rectangles; the grid operations
//! consume them without caring how they were produced.

use std::collections::BTreeSet;

/// A set of grid coordinates, ordered for deterministic iteration.
///
/// Also used as the return type of every mutating grid operation so the
/// caller knows exactly which cells changed and what to redraw.
pub type CoordSet = BTreeSet<(usize, usize)>;

/// Build a selection containing a single point.
pub fn single(row: usize, col: usize) -> CoordSet {
    let mut set = CoordSet::new();
    set.insert((row, col));
    set
}

/// Build an inclusive rectangular selection from two drag corners.
///
/// The corners may be given in any order; the rectangle spanned by them is
/// selected, matching click-and-drag region selection.
pub fn rect(a: (usize, usize), b: (usize, usize)) -> CoordSet {
    let (r0, r1) = (a.0.min(b.0), a.0.max(b.0));
    let (c0, c1) = (a.1.min(b.1), a.1.max(b.1));
    let mut set = CoordSet::new();
    for row in r0..=r1 {
        for col in c0..=c1 {
            set.insert((row, col));
        }
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single() {
        let sel = single(2, 3);
        assert_eq!(sel.len(), 1);
        assert!(sel.contains(&(2, 3)));
    }

    #[test]
    fn test_rect_corner_order_irrelevant() {
        let a = rect((1, 1), (3, 2));
        let b = rect((3, 2), (1, 1));
        assert_eq!(a, b);
        assert_eq!(a.len(), 6);
        assert!(a.contains(&(2, 2)));
        assert!(!a.contains(&(0, 1)));
    }

    #[test]
    fn test_rect_degenerate_is_single_point() {
        assert_eq!(rect((4, 4), (4, 4)), single(4, 4));
    }
}
