use crate::{Rectangle, Vec2D};

/// The target surface that content should be drawn to
#[derive(Clone, Debug, PartialEq)]
pub struct Bitmap<T: Copy> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T: Default + Copy> Bitmap<T> {
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![T::default(); width * height],
        }
    }
}

impl<T: Copy> Bitmap<T> {
    #[must_use]
    pub fn from_data(data: Vec<T>, width: usize, height: usize) -> Self {
        debug_assert_eq!(data.len(), width * height);

        Self {
            width,
            height,
            data,
        }
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// The area covered by the bitmap, starting at the origin
    #[must_use]
    pub fn bounds(&self) -> Rectangle {
        Rectangle::of_size(self.width, self.height)
    }

    /// Set the pixel at the given coordinates to the specified value.
    ///
    /// # Panics
    /// This function panics if the coordinates are outside of the bitmap
    pub fn set_pixel(&mut self, x: usize, y: usize, pixel: T) {
        let index = self.index_of_pixel(x, y);
        self.data[index] = pixel;
    }

    /// Get the pixel value at the given coordinates
    ///
    /// # Panics
    /// This function panics if the coordinates are outside of the bitmap
    #[must_use]
    pub fn get_pixel(&self, x: usize, y: usize) -> T {
        self.data[self.index_of_pixel(x, y)]
    }

    /// Write a pixel at signed coordinates, silently ignoring anything outside the bitmap
    #[inline]
    pub fn put(&mut self, point: Vec2D<i32>, pixel: T) {
        if let Some((x, y)) = self.to_index_space(point) {
            self.set_pixel(x, y, pixel);
        }
    }

    /// Read a pixel at signed coordinates, or `None` outside the bitmap
    #[inline]
    #[must_use]
    pub fn get(&self, point: Vec2D<i32>) -> Option<T> {
        self.to_index_space(point)
            .map(|(x, y)| self.get_pixel(x, y))
    }

    /// Return `true` if the coordinates are inside the bounds of the bitmap
    #[must_use]
    pub const fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    fn to_index_space(&self, point: Vec2D<i32>) -> Option<(usize, usize)> {
        let x = usize::try_from(point.x).ok()?;
        let y = usize::try_from(point.y).ok()?;
        self.contains(x, y).then_some((x, y))
    }

    /// Calculate the index of the pixel data for a given set of coordinates
    #[must_use]
    fn index_of_pixel(&self, x: usize, y: usize) -> usize {
        debug_assert!(self.contains(x, y));

        y * self.width + x
    }

    #[must_use]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn clear(&mut self, clear_color: T) {
        self.data.fill(clear_color);
    }

    /// Fill every pixel inside `area` (clipped to the bitmap)
    pub fn fill_region(&mut self, area: Rectangle, value: T) {
        let Some(area) = self.bounds().intersection(area) else {
            return;
        };

        let (left, right) = (area.top_left().x as usize, area.bottom_right().x as usize);
        for y in area.top_left().y as usize..area.bottom_right().y as usize {
            let row = y * self.width;
            self.data[row + left..row + right].fill(value);
        }
    }

    /// Copy the pixels inside `area` into a new, tightly packed bitmap.
    ///
    /// `area` is clipped to the bitmap first; `None` is returned when nothing remains.
    #[must_use]
    pub fn copy_region(&self, area: Rectangle) -> Option<(Rectangle, Bitmap<T>)> {
        let area = self.bounds().intersection(area)?;

        let (left, right) = (area.top_left().x as usize, area.bottom_right().x as usize);
        let mut data = Vec::with_capacity(area.width() as usize * area.height() as usize);
        for y in area.top_left().y as usize..area.bottom_right().y as usize {
            let row = y * self.width;
            data.extend_from_slice(&self.data[row + left..row + right]);
        }

        let copy = Bitmap::from_data(data, area.width() as usize, area.height() as usize);
        Some((area, copy))
    }

    /// Write `source` into `self` with its top left corner at `at`, clipping as needed
    pub fn blit(&mut self, source: &Bitmap<T>, at: Vec2D<i32>) {
        let target = Rectangle::from_position_and_size(
            at,
            source.width() as i32,
            source.height() as i32,
        );
        let Some(visible) = self.bounds().intersection(target) else {
            return;
        };

        let skip_x = (visible.top_left().x - at.x) as usize;
        let skip_y = (visible.top_left().y - at.y) as usize;
        let width = visible.width() as usize;

        for row in 0..visible.height() as usize {
            let source_start = (skip_y + row) * source.width + skip_x;
            let target_start =
                (visible.top_left().y as usize + row) * self.width + visible.top_left().x as usize;
            self.data[target_start..target_start + width]
                .copy_from_slice(&source.data[source_start..source_start + width]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_ignores_out_of_bounds() {
        let mut bitmap: Bitmap<u8> = Bitmap::new(3, 3);
        bitmap.put(Vec2D::new(-1, 0), 1);
        bitmap.put(Vec2D::new(3, 0), 1);
        bitmap.put(Vec2D::new(1, 1), 7);

        assert_eq!(bitmap.data().iter().filter(|&&p| p != 0).count(), 1);
        assert_eq!(bitmap.get(Vec2D::new(1, 1)), Some(7));
        assert_eq!(bitmap.get(Vec2D::new(1, 5)), None);
    }

    #[test]
    fn copy_and_blit_region() {
        let data = (0..16).collect();
        let bitmap: Bitmap<u8> = Bitmap::from_data(data, 4, 4);

        let area = Rectangle::from_corners(Vec2D::new(1, 1), Vec2D::new(3, 10));
        let (clipped, copy) = bitmap.copy_region(area).unwrap();
        assert_eq!(clipped, Rectangle::from_corners(Vec2D::new(1, 1), Vec2D::new(3, 4)));
        assert_eq!(copy.data(), &[5, 6, 9, 10, 13, 14]);

        let mut target: Bitmap<u8> = Bitmap::new(4, 4);
        target.blit(&copy, clipped.top_left());
        assert_eq!(target.get_pixel(2, 3), 14);
        assert_eq!(target.get_pixel(0, 0), 0);
    }

    #[test]
    fn fill_region_clips() {
        let mut bitmap: Bitmap<u8> = Bitmap::new(4, 2);
        bitmap.fill_region(
            Rectangle::from_corners(Vec2D::new(2, -5), Vec2D::new(9, 1)),
            3,
        );
        assert_eq!(bitmap.data(), &[0, 0, 3, 3, 0, 0, 0, 0]);
    }
}
