use core::fmt;

/// The color of a red-black tree node.
///
/// The sentinel is always [`Black`](Color::Black); freshly inserted nodes start
/// out [`Red`](Color::Red).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Color {
    Red,
    Black,
}

impl Color {
    /// Returns `true` if the color is [`Red`](Color::Red).
    #[must_use]
    #[inline]
    pub const fn is_red(self) -> bool {
        matches!(self, Color::Red)
    }

    /// Returns `true` if the color is [`Black`](Color::Black).
    #[must_use]
    #[inline]
    pub const fn is_black(self) -> bool {
        matches!(self, Color::Black)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Color::Red => "Red",
            Color::Black => "Black",
        })
    }
}

/// Which way a rotation turns, or which child slot of a node is meant.
///
/// A [`Left`](Direction::Left) rotation promotes the pivot's right child; a
/// [`Right`](Direction::Right) rotation promotes its left child.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Returns the mirror image of this direction.
    #[must_use]
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn color_predicates() {
        assert!(Color::Red.is_red());
        assert!(!Color::Red.is_black());
        assert!(Color::Black.is_black());
        assert_eq!(Color::Red.to_string(), "Red");
        assert_eq!(Color::Black.to_string(), "Black");
    }

    #[test]
    fn opposite_is_an_involution() {
        for direction in [Direction::Left, Direction::Right] {
            assert_ne!(direction.opposite(), direction);
            assert_eq!(direction.opposite().opposite(), direction);
        }
    }
}
