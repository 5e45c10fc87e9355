use crate::color::{Color, Direction};

use super::handle::Handle;

/// A red-black tree node stored in the arena.
///
/// `value` is `None` only for the sentinel in slot zero. All three links are
/// plain handles; `Handle::NIL` means "no node".
#[derive(Clone)]
pub(crate) struct Node<T> {
    value: Option<T>,
    color: Color,
    parent: Handle,
    left: Handle,
    right: Handle,
}

impl<T> Node<T> {
    /// Creates the sentinel: black, valueless, every link pointing at itself.
    pub(crate) const fn sentinel() -> Self {
        Self {
            value: None,
            color: Color::Black,
            parent: Handle::NIL,
            left: Handle::NIL,
            right: Handle::NIL,
        }
    }

    /// Creates a fresh red leaf whose children are the sentinel.
    pub(crate) const fn leaf(value: T, parent: Handle) -> Self {
        Self {
            value: Some(value),
            color: Color::Red,
            parent,
            left: Handle::NIL,
            right: Handle::NIL,
        }
    }

    /// Returns the value, or `None` for the sentinel.
    #[inline]
    pub(crate) fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    #[inline]
    pub(crate) const fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub(crate) fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    #[inline]
    pub(crate) const fn parent(&self) -> Handle {
        self.parent
    }

    #[inline]
    pub(crate) fn set_parent(&mut self, parent: Handle) {
        self.parent = parent;
    }

    #[inline]
    pub(crate) const fn left(&self) -> Handle {
        self.left
    }

    #[inline]
    pub(crate) const fn right(&self) -> Handle {
        self.right
    }

    /// Returns the child on the given side.
    #[inline]
    pub(crate) const fn child(&self, side: Direction) -> Handle {
        match side {
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    /// Replaces the child on the given side.
    #[inline]
    pub(crate) fn set_child(&mut self, side: Direction, child: Handle) {
        match side {
            Direction::Left => self.left = child,
            Direction::Right => self.right = child,
        }
    }
}
