use math::{Bitmap, Color, Rectangle, Vec2D};

use crate::{raster, DirtyRegion, TextRequest};

/// A copy of part of the canvas, ready to be shown on screen
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Where the pixels belong on the canvas
    pub region: Rectangle,

    pub pixels: Bitmap<Color>,
}

/// The canvas shared between the worker and the owning thread.
///
/// A `FrameBuffer` is always accessed through a mutex. Every mutating method
/// reports the area it touched to the embedded [DirtyRegion], so marking and
/// drawing can never be observed separately.
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    image: Bitmap<Color>,
    pen: Color,
    background: Color,
    dirty: DirtyRegion,
}

impl FrameBuffer {
    /// Create a canvas cleared to white.
    ///
    /// The whole canvas starts out dirty so the first repaint shows it.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        let mut frame_buffer = Self {
            image: Bitmap::new(width, height),
            pen: Color::BLACK,
            background: Color::WHITE,
            dirty: DirtyRegion::new(),
        };
        frame_buffer.clear();
        frame_buffer
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.image.width()
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.image.height()
    }

    #[must_use]
    pub fn bounds(&self) -> Rectangle {
        self.image.bounds()
    }

    #[must_use]
    pub fn pen(&self) -> Color {
        self.pen
    }

    pub fn set_pen(&mut self, color: Color) {
        self.pen = color;
    }

    #[must_use]
    pub fn background(&self) -> Color {
        self.background
    }

    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    #[must_use]
    pub fn image(&self) -> &Bitmap<Color> {
        &self.image
    }

    /// Fill the whole canvas with the background color
    pub fn clear(&mut self) {
        self.image.clear(self.background);
        self.mark_all_dirty();
    }

    pub fn draw_point(&mut self, x: i32, y: i32) {
        let at = Vec2D::new(x, y);
        self.image.put(at, self.pen);
        self.mark_dirty(Rectangle::pixel(at));
    }

    pub fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        let (from, to) = (Vec2D::new(x1, y1), Vec2D::new(x2, y2));
        raster::line(&mut self.image, from, to, self.pen);
        self.mark_dirty(Rectangle::spanning(from, to));
    }

    /// Outline of the rectangle with corner pixels `(x1, y1)` and `(x2, y2)`
    pub fn draw_rect(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        let (a, b) = (Vec2D::new(x1, y1), Vec2D::new(x2, y2));
        raster::rect(&mut self.image, a, b, self.pen);
        self.mark_dirty(Rectangle::spanning(a, b));
    }

    pub fn fill_rect(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        let (a, b) = (Vec2D::new(x1, y1), Vec2D::new(x2, y2));
        raster::fill_rect(&mut self.image, a, b, self.pen);
        self.mark_dirty(Rectangle::spanning(a, b));
    }

    /// Circles with a negative radius are not drawn
    pub fn draw_circle(&mut self, x: i32, y: i32, radius: i32) {
        let center = Vec2D::new(x, y);
        raster::circle(&mut self.image, center, radius, self.pen);
        self.mark_circle(center, radius);
    }

    pub fn fill_circle(&mut self, x: i32, y: i32, radius: i32) {
        let center = Vec2D::new(x, y);
        raster::fill_circle(&mut self.image, center, radius, self.pen);
        self.mark_circle(center, radius);
    }

    fn mark_circle(&mut self, center: Vec2D, radius: i32) {
        if radius >= 0 {
            let (center, radius) = (center.map(i64::from), i64::from(radius));
            self.mark_dirty(Rectangle::from_wide_corners(
                Vec2D::new(center.x - radius, center.y - radius),
                Vec2D::new(center.x + radius + 1, center.y + radius + 1),
            ));
        }
    }

    pub fn draw_triangle(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, x3: i32, y3: i32) {
        let corners = [Vec2D::new(x1, y1), Vec2D::new(x2, y2), Vec2D::new(x3, y3)];
        raster::triangle(&mut self.image, corners, self.pen);
        self.mark_triangle(corners);
    }

    pub fn fill_triangle(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, x3: i32, y3: i32) {
        let corners = [Vec2D::new(x1, y1), Vec2D::new(x2, y2), Vec2D::new(x3, y3)];
        raster::fill_triangle(&mut self.image, corners, self.pen);
        self.mark_triangle(corners);
    }

    fn mark_triangle(&mut self, [a, b, c]: [Vec2D; 3]) {
        self.mark_dirty(Rectangle::spanning(a.min(b).min(c), a.max(b).max(c)));
    }

    /// Render a queued text request. Only the owning thread does this.
    pub fn draw_text(&mut self, request: &TextRequest) {
        let area = request.render(&mut self.image);
        self.mark_dirty(area);
    }

    /// The color at `(x, y)`, or `None` outside the canvas
    #[must_use]
    pub fn pixel_color(&self, x: i32, y: i32) -> Option<Color> {
        self.image.get(Vec2D::new(x, y))
    }

    /// Record that `rect` needs to be repainted.
    ///
    /// The rectangle is not clipped to the canvas.
    pub fn mark_dirty(&mut self, rect: Rectangle) {
        self.dirty.mark(rect);
    }

    pub fn mark_all_dirty(&mut self) {
        self.dirty.mark(self.bounds());
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty.is_dirty()
    }

    /// See [DirtyRegion::take]
    #[must_use]
    pub fn take_dirty_region(&mut self) -> Option<Rectangle> {
        self.dirty.take()
    }

    /// Copy the pixels inside `region`, clipped to the canvas
    #[must_use]
    pub fn snapshot(&self, region: Rectangle) -> Option<Frame> {
        self.image
            .copy_region(region)
            .map(|(region, pixels)| Frame { region, pixels })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: i32, y: i32, width: i32, height: i32) -> Rectangle {
        Rectangle::from_position_and_size(Vec2D::new(x, y), width, height)
    }

    fn clean(width: usize, height: usize) -> FrameBuffer {
        let mut frame_buffer = FrameBuffer::new(width, height);
        let _ = frame_buffer.take_dirty_region();
        frame_buffer
    }

    #[test]
    fn starts_cleared_and_dirty() {
        let mut frame_buffer = FrameBuffer::new(4, 3);
        assert_eq!(frame_buffer.pixel_color(3, 2), Some(Color::WHITE));
        assert_eq!(frame_buffer.take_dirty_region(), Some(rect(0, 0, 4, 3)));
        assert!(!frame_buffer.is_dirty());
    }

    #[test]
    fn point_marks_single_pixel() {
        let mut frame_buffer = clean(10, 10);
        frame_buffer.draw_point(2, 3);

        assert_eq!(frame_buffer.take_dirty_region(), Some(rect(2, 3, 1, 1)));
        assert_eq!(frame_buffer.pixel_color(2, 3), Some(Color::BLACK));
        assert_eq!(frame_buffer.take_dirty_region(), None);
    }

    #[test]
    fn line_and_rect_are_unioned() {
        let mut frame_buffer = clean(10, 10);
        frame_buffer.draw_line(0, 0, 9, 9);
        frame_buffer.draw_rect(1, 1, 3, 3);

        assert_eq!(frame_buffer.take_dirty_region(), Some(rect(0, 0, 10, 10)));
    }

    #[test]
    fn corners_in_any_order() {
        let mut frame_buffer = clean(10, 10);
        frame_buffer.fill_rect(6, 5, 2, 1);

        assert_eq!(frame_buffer.take_dirty_region(), Some(rect(2, 1, 5, 5)));
        assert_eq!(frame_buffer.pixel_color(2, 1), Some(Color::BLACK));
        assert_eq!(frame_buffer.pixel_color(6, 5), Some(Color::BLACK));
        assert_eq!(frame_buffer.pixel_color(7, 5), Some(Color::WHITE));
    }

    #[test]
    fn circle_marks_bounding_square() {
        let mut frame_buffer = clean(20, 20);
        frame_buffer.draw_circle(10, 10, 3);
        assert_eq!(frame_buffer.take_dirty_region(), Some(rect(7, 7, 7, 7)));

        frame_buffer.fill_circle(10, 10, -1);
        assert_eq!(frame_buffer.take_dirty_region(), None);
    }

    #[test]
    fn dirty_region_is_not_clipped() {
        let mut frame_buffer = clean(10, 10);
        frame_buffer.draw_line(-5, 2, 20, 2);
        assert_eq!(frame_buffer.take_dirty_region(), Some(rect(-5, 2, 26, 1)));
    }

    #[test]
    fn clear_uses_background() {
        let mut frame_buffer = clean(3, 3);
        frame_buffer.set_background(Color::BLUE);
        frame_buffer.clear();

        assert_eq!(frame_buffer.pixel_color(1, 1), Some(Color::BLUE));
        assert_eq!(frame_buffer.take_dirty_region(), Some(rect(0, 0, 3, 3)));
    }

    #[test]
    fn pixel_color_outside_canvas() {
        let frame_buffer = clean(3, 3);
        assert_eq!(frame_buffer.pixel_color(-1, 0), None);
        assert_eq!(frame_buffer.pixel_color(0, 3), None);
    }

    #[test]
    fn snapshot_is_clipped() {
        let mut frame_buffer = clean(8, 8);
        frame_buffer.set_pen(Color::RED);
        frame_buffer.draw_point(7, 7);

        let frame = frame_buffer.snapshot(rect(6, 6, 10, 10)).unwrap();
        assert_eq!(frame.region, rect(6, 6, 2, 2));
        assert_eq!(frame.pixels.get_pixel(1, 1), Color::RED);

        assert!(frame_buffer.snapshot(rect(20, 20, 2, 2)).is_none());
    }

    #[test]
    fn extreme_coordinates_are_clipped() {
        let (min, max) = (i32::MIN, i32::MAX);
        let mut frame_buffer = clean(10, 10);

        frame_buffer.draw_point(max, 0);
        frame_buffer.draw_point(min, min);
        frame_buffer.draw_line(-2_000_000_000, 5, 2_000_000_000, 5);
        frame_buffer.draw_line(min, min, max, max);
        frame_buffer.draw_rect(min, min, max, max);
        frame_buffer.draw_circle(5, 5, 1_500_000_000);
        frame_buffer.draw_circle(max, min, max);
        frame_buffer.fill_circle(min, max, max);
        frame_buffer.draw_triangle(min, min, max, 0, 0, max);

        let dirty = frame_buffer.take_dirty_region().unwrap();
        assert_eq!(dirty.top_left(), Vec2D::new(min, min));
        assert_eq!(dirty.bottom_right(), Vec2D::new(max, max));

        // Only the horizontal line and the long diagonal reach the canvas
        for x in 0..10 {
            assert_eq!(frame_buffer.pixel_color(x, 5), Some(Color::BLACK));
            assert_eq!(frame_buffer.pixel_color(x, x), Some(Color::BLACK));
        }
        assert_eq!(frame_buffer.pixel_color(3, 7), Some(Color::WHITE));

        frame_buffer.set_pen(Color::RED);
        frame_buffer.fill_rect(0, 0, max, max);
        frame_buffer.fill_triangle(min, min, max, min, 0, max);
        assert_eq!(frame_buffer.pixel_color(9, 9), Some(Color::RED));
        assert_eq!(frame_buffer.pixel_color(0, 9), Some(Color::RED));
    }

    #[test]
    fn huge_circle_marks_a_saturated_square() {
        let mut frame_buffer = clean(10, 10);
        frame_buffer.fill_circle(5, 5, i32::MAX);

        let dirty = frame_buffer.take_dirty_region().unwrap();
        assert_eq!(dirty.top_left(), Vec2D::new(5 - i32::MAX, 5 - i32::MAX));
        assert_eq!(dirty.bottom_right(), Vec2D::new(i32::MAX, i32::MAX));
        assert_eq!(frame_buffer.pixel_color(0, 0), Some(Color::BLACK));
    }

    #[test]
    fn text_near_the_limits() {
        let mut frame_buffer = clean(10, 10);
        frame_buffer.draw_text(&TextRequest {
            position: Vec2D::new(i32::MAX - 2, 0),
            text: String::from("abc"),
            alignment: crate::Alignment::empty(),
            color: Color::BLACK,
            background: Some(Color::RED),
        });

        assert_eq!(frame_buffer.pixel_color(9, 0), Some(Color::WHITE));
        assert!(frame_buffer.snapshot(frame_buffer.bounds()).is_some());
    }
}
