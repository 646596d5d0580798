use math::Rectangle;

/// The union of every canvas area modified since the last repaint.
///
/// This type does no locking of its own. It lives inside the [FrameBuffer](crate::FrameBuffer),
/// so both marking and taking happen while the framebuffer lock is held.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DirtyRegion {
    region: Option<Rectangle>,
}

impl DirtyRegion {
    /// A clean region
    #[must_use]
    pub const fn new() -> Self {
        Self { region: None }
    }

    /// Union `rect` into the tracked region.
    ///
    /// Empty rectangles are ignored.
    pub fn mark(&mut self, rect: Rectangle) {
        let rect = rect.normalized();
        if rect.is_empty() {
            return;
        }

        match &mut self.region {
            Some(region) => region.grow_to_contain(rect),
            None => self.region = Some(rect),
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.region.is_some()
    }

    /// Look at the region without consuming it
    #[inline]
    #[must_use]
    pub const fn peek(&self) -> Option<Rectangle> {
        self.region
    }

    /// Return the accumulated region and reset to clean.
    ///
    /// This is the only way to clear the region.
    #[must_use]
    pub fn take(&mut self) -> Option<Rectangle> {
        self.region.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use math::Vec2D;

    fn rect(x: i32, y: i32, width: i32, height: i32) -> Rectangle {
        Rectangle::from_position_and_size(Vec2D::new(x, y), width, height)
    }

    #[test]
    fn starts_clean() {
        let mut dirty = DirtyRegion::new();
        assert!(!dirty.is_dirty());
        assert_eq!(dirty.take(), None);
    }

    #[test]
    fn union_of_all_marks() {
        let marks = [
            rect(4, 4, 1, 1),
            rect(0, 7, 3, 2),
            rect(6, 1, 2, 2),
            rect(5, 5, 1, 1),
        ];

        let mut dirty = DirtyRegion::new();
        for mark in marks {
            dirty.mark(mark);
        }

        // Minimal bounding box of all four rectangles
        assert_eq!(dirty.take(), Some(rect(0, 1, 8, 8)));

        // Clean again until the next mark
        assert_eq!(dirty.take(), None);
        dirty.mark(rect(1, 1, 1, 1));
        assert_eq!(dirty.take(), Some(rect(1, 1, 1, 1)));
    }

    #[test]
    fn marks_never_shrink_the_region() {
        let mut dirty = DirtyRegion::new();
        dirty.mark(rect(0, 0, 10, 10));
        dirty.mark(rect(2, 2, 1, 1));
        assert_eq!(dirty.peek(), Some(rect(0, 0, 10, 10)));
    }

    #[test]
    fn empty_marks_are_ignored() {
        let mut dirty = DirtyRegion::new();
        dirty.mark(rect(3, 3, 0, 5));
        assert!(!dirty.is_dirty());
    }
}
