use super::Vec2D;

use std::{cmp, fmt, ops};

/// An axis-aligned rectangle.
///
/// `top_left` is inclusive, `bottom_right` is exclusive. A rectangle covering
/// exactly the pixel `(2, 3)` therefore spans from `(2, 3)` to `(3, 4)`.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rectangle<T = i32> {
    top_left: Vec2D<T>,
    bottom_right: Vec2D<T>,
}

impl<T> Rectangle<T> {
    pub const fn from_corners(top_left: Vec2D<T>, bottom_right: Vec2D<T>) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }
}

impl<T> Rectangle<T>
where
    T: Copy,
{
    pub const fn top_left(&self) -> Vec2D<T> {
        self.top_left
    }

    pub const fn bottom_right(&self) -> Vec2D<T> {
        self.bottom_right
    }
}

impl<T> Rectangle<T>
where
    T: ops::Add<Output = T> + ops::Sub<Output = T> + Copy,
{
    pub fn from_position_and_size(top_left: Vec2D<T>, width: T, height: T) -> Self {
        let bottom_right = Vec2D {
            x: top_left.x + width,
            y: top_left.y + height,
        };

        Self {
            top_left,
            bottom_right,
        }
    }

    pub fn width(&self) -> T {
        self.bottom_right.x - self.top_left.x
    }

    pub fn height(&self) -> T {
        self.bottom_right.y - self.top_left.y
    }
}

impl<T> Rectangle<T>
where
    T: Ord + Copy,
{
    /// Swap corners as needed so that `top_left` really is the top left corner
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            top_left: self.top_left.min(self.bottom_right),
            bottom_right: self.top_left.max(self.bottom_right),
        }
    }

    /// Whether the rectangle covers no area at all
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bottom_right.x <= self.top_left.x || self.bottom_right.y <= self.top_left.y
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, other: Self) -> bool {
        self.top_left.x <= other.top_left.x
            && self.top_left.y <= other.top_left.y
            && other.bottom_right.x <= self.bottom_right.x
            && other.bottom_right.y <= self.bottom_right.y
    }

    #[inline]
    #[must_use]
    pub fn contains_point(&self, point: Vec2D<T>) -> bool {
        (self.top_left.x..self.bottom_right.x).contains(&point.x)
            && (self.top_left.y..self.bottom_right.y).contains(&point.y)
    }

    /// Grow `self` to the smallest rectangle containing both `self` and `other`
    #[inline]
    pub fn grow_to_contain(&mut self, other: Self) {
        self.top_left.x = cmp::min(self.top_left.x, other.top_left.x);
        self.top_left.y = cmp::min(self.top_left.y, other.top_left.y);
        self.bottom_right.x = cmp::max(self.bottom_right.x, other.bottom_right.x);
        self.bottom_right.y = cmp::max(self.bottom_right.y, other.bottom_right.y);
    }

    #[must_use]
    pub fn union(mut self, other: Self) -> Self {
        self.grow_to_contain(other);
        self
    }

    /// The area covered by both rectangles, if there is any
    #[must_use]
    pub fn intersection(&self, other: Self) -> Option<Self> {
        let intersection = Self {
            top_left: self.top_left.max(other.top_left),
            bottom_right: self.bottom_right.min(other.bottom_right),
        };

        if intersection.is_empty() {
            None
        } else {
            Some(intersection)
        }
    }
}

impl Rectangle<i32> {
    /// The bounding box of all pixels between two corner pixels, inclusive.
    ///
    /// The corners may be given in any order. A corner at `i32::MAX` saturates,
    /// so the last column or row of the plane is never covered.
    #[must_use]
    pub fn spanning(a: Vec2D<i32>, b: Vec2D<i32>) -> Self {
        let top_left = a.min(b).map(i64::from);
        let bottom_right = a.max(b).map(|value| i64::from(value) + 1);

        Self::from_wide_corners(top_left, bottom_right)
    }

    /// The rectangle covering a single pixel
    #[must_use]
    pub fn pixel(at: Vec2D<i32>) -> Self {
        Self::spanning(at, at)
    }

    /// Build a rectangle from corners computed with 64 bit arithmetic,
    /// clamping each coordinate to the `i32` range
    #[must_use]
    pub fn from_wide_corners(top_left: Vec2D<i64>, bottom_right: Vec2D<i64>) -> Self {
        Self {
            top_left: top_left.map(saturate),
            bottom_right: bottom_right.map(saturate),
        }
    }

    /// The rectangle covering a `width` by `height` area starting at the origin
    #[must_use]
    pub fn of_size(width: usize, height: usize) -> Self {
        let width = i32::try_from(width).unwrap_or(i32::MAX);
        let height = i32::try_from(height).unwrap_or(i32::MAX);
        Self::from_position_and_size(Vec2D::new(0, 0), width, height)
    }
}

fn saturate(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

impl<T: fmt::Debug> fmt::Debug for Rectangle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rectangle({:?}, {:?} to {:?}, {:?})",
            self.top_left.x, self.top_left.y, self.bottom_right.x, self.bottom_right.y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spanning_normalizes_corners() {
        let forwards = Rectangle::spanning(Vec2D::new(1, 1), Vec2D::new(3, 4));
        let backwards = Rectangle::spanning(Vec2D::new(3, 4), Vec2D::new(1, 1));
        let mixed = Rectangle::spanning(Vec2D::new(3, 1), Vec2D::new(1, 4));

        assert_eq!(forwards, backwards);
        assert_eq!(forwards, mixed);
        assert_eq!(forwards.width(), 3);
        assert_eq!(forwards.height(), 4);
    }

    #[test]
    fn pixel_rectangle() {
        let rect = Rectangle::pixel(Vec2D::new(2, 3));
        assert_eq!(rect.top_left(), Vec2D::new(2, 3));
        assert_eq!((rect.width(), rect.height()), (1, 1));
        assert!(rect.contains_point(Vec2D::new(2, 3)));
        assert!(!rect.contains_point(Vec2D::new(3, 3)));
    }

    #[test]
    fn union_is_bounding_box() {
        let a = Rectangle::from_position_and_size(Vec2D::new(0, 0), 2, 2);
        let b = Rectangle::from_position_and_size(Vec2D::new(5, 7), 1, 1);

        let union = a.union(b);
        assert_eq!(union, Rectangle::from_corners(Vec2D::new(0, 0), Vec2D::new(6, 8)));
        assert!(union.contains(a));
        assert!(union.contains(b));
    }

    #[test]
    fn intersection() {
        let canvas = Rectangle::of_size(10, 10);
        let overhanging = Rectangle::from_corners(Vec2D::new(-5, 8), Vec2D::new(3, 20));

        assert_eq!(
            canvas.intersection(overhanging),
            Some(Rectangle::from_corners(Vec2D::new(0, 8), Vec2D::new(3, 10)))
        );

        let outside = Rectangle::from_corners(Vec2D::new(20, 20), Vec2D::new(30, 30));
        assert_eq!(canvas.intersection(outside), None);
    }

    #[test]
    fn normalized() {
        let flipped = Rectangle::from_corners(Vec2D::new(4, 4), Vec2D::new(1, 2));
        assert!(flipped.is_empty());

        let normalized = flipped.normalized();
        assert!(!normalized.is_empty());
        assert_eq!(normalized.top_left(), Vec2D::new(1, 2));
    }

    #[test]
    fn extreme_corners_saturate() {
        let rightmost = Rectangle::pixel(Vec2D::new(i32::MAX, 0));
        assert_eq!(rightmost.top_left(), Vec2D::new(i32::MAX, 0));
        assert!(rightmost.is_empty());

        let leftmost = Rectangle::pixel(Vec2D::new(i32::MIN, i32::MIN));
        assert_eq!(leftmost.bottom_right(), Vec2D::new(i32::MIN + 1, i32::MIN + 1));

        let everything = Rectangle::spanning(Vec2D::new(i32::MIN, 0), Vec2D::new(i32::MAX, 3));
        assert_eq!(everything.top_left(), Vec2D::new(i32::MIN, 0));
        assert_eq!(everything.bottom_right(), Vec2D::new(i32::MAX, 4));
        assert!(everything.contains(Rectangle::of_size(100, 4)));

        // Formatting must not compute the width
        assert!(!format!("{everything:?}").is_empty());
    }

    #[test]
    fn wide_corners_are_clamped() {
        let rect = Rectangle::from_wide_corners(
            Vec2D::new(-5_000_000_000, 1),
            Vec2D::new(5_000_000_000, 2),
        );
        assert_eq!(rect.top_left(), Vec2D::new(i32::MIN, 1));
        assert_eq!(rect.bottom_right(), Vec2D::new(i32::MAX, 2));
    }
}
