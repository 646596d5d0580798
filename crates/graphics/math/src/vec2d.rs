use std::ops::{Add, Mul, Sub};

/// Generate a trait impl for an operation involving two [Vec2D]s, like [Add] or [Sub]
macro_rules! impl_bin_op {
    ($trait: ident, $fn: ident, $op: tt) => {
        impl<T: $trait<T, Output = T>> $trait for Vec2D<T> {
            type Output = Vec2D<T>;

            #[must_use]
            fn $fn(self, rhs: Self) -> Self::Output {
                Self {
                    x: self.x $op rhs.x,
                    y: self.y $op rhs.y,
                }
            }
        }
    };
}

/// A point (or offset) on the pixel grid.
///
/// Canvas coordinates grow to the right and downwards, with `(0, 0)` in the
/// top left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Vec2D<T = i32> {
    pub x: T,
    pub y: T,
}

impl<T> Vec2D<T> {
    #[inline]
    #[must_use]
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    #[inline]
    #[must_use]
    pub fn map<U, F: Fn(T) -> U>(self, f: F) -> Vec2D<U> {
        Vec2D {
            x: f(self.x),
            y: f(self.y),
        }
    }
}

impl<T: Ord + Copy> Vec2D<T> {
    /// Componentwise minimum of two points
    #[inline]
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y))
    }

    /// Componentwise maximum of two points
    #[inline]
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y))
    }
}

impl<T: Mul<Output = T> + Copy> Mul<T> for Vec2D<T> {
    type Output = Vec2D<T>;

    #[must_use]
    fn mul(self, rhs: T) -> Self::Output {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

impl From<(i32, i32)> for Vec2D<i32> {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl_bin_op!(Add, add, +);
impl_bin_op!(Sub, sub, -);
