//! Text rendering with a fixed monospace font.
//!
//! Text is never drawn by the worker thread directly. The worker queues a
//! [TextRequest] and the owning thread renders it while handling the matching
//! [Request::Text](crate::Request::Text).

use std::convert::Infallible;

use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Point, Size},
    mono_font::{ascii::FONT_6X10, MonoFont, MonoTextStyleBuilder},
    pixelcolor::{Rgb888, RgbColor},
    text::{Baseline, Text},
    Drawable, Pixel,
};
use math::{Bitmap, Color, Rectangle, Vec2D};

const FONT: &MonoFont<'static> = &FONT_6X10;

bitflags::bitflags! {
    /// Where a piece of text sits relative to its anchor point.
    ///
    /// Without any horizontal flag the anchor is the left edge, without any
    /// vertical flag it is the top edge.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Alignment: u32 {
        const LEFT = 0x1;
        const RIGHT = 0x2;
        const HCENTER = 0x4;
        const TOP = 0x20;
        const BOTTOM = 0x40;
        const VCENTER = 0x80;

        const CENTER = Self::HCENTER.bits() | Self::VCENTER.bits();
    }
}

/// A deferred text drawing operation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextRequest {
    pub position: Vec2D,
    pub text: String,
    pub alignment: Alignment,
    pub color: Color,

    /// If set, the text box is filled with this color first
    pub background: Option<Color>,
}

impl TextRequest {
    /// The area covered by the text once drawn
    #[must_use]
    pub fn layout(&self) -> Rectangle {
        let lines = self.text.lines().count().max(1);
        let columns = self
            .text
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or_default();

        let advance = i64::from(FONT.character_size.width + FONT.character_spacing);
        let width = i64::try_from(columns).unwrap_or(i64::MAX / 2).saturating_mul(advance);
        let height = i64::try_from(lines)
            .unwrap_or(i64::MAX / 2)
            .saturating_mul(i64::from(FONT.character_size.height));

        let (x, y) = (i64::from(self.position.x), i64::from(self.position.y));

        let left = if self.alignment.contains(Alignment::RIGHT) {
            x - width
        } else if self.alignment.contains(Alignment::HCENTER) {
            x - width / 2
        } else {
            x
        };

        let top = if self.alignment.contains(Alignment::BOTTOM) {
            y - height
        } else if self.alignment.contains(Alignment::VCENTER) {
            y - height / 2
        } else {
            y
        };

        Rectangle::from_wide_corners(
            Vec2D::new(left, top),
            Vec2D::new(left.saturating_add(width), top.saturating_add(height)),
        )
    }

    /// Draw the text into `bitmap` and return the area that was touched
    pub fn render(&self, bitmap: &mut Bitmap<Color>) -> Rectangle {
        let area = self.layout();
        if bitmap.bounds().intersection(area).is_none() {
            return area;
        }

        if let Some(background) = self.background {
            bitmap.fill_region(area, background);
        }

        let style = MonoTextStyleBuilder::new()
            .font(FONT)
            .text_color(Rgb888::new(
                self.color.red(),
                self.color.green(),
                self.color.blue(),
            ))
            .build();

        let canvas_height = i32::try_from(bitmap.height()).unwrap_or(i32::MAX);
        let mut target = Target { bitmap };
        let line_height = FONT.character_size.height as i32;
        let mut top = area.top_left().y;
        for line in self.text.lines() {
            if top >= canvas_height {
                break;
            }

            let origin = Point::new(area.top_left().x, top);
            top = top.saturating_add(line_height);

            let _ = Text::with_baseline(line, origin, style, Baseline::Top).draw(&mut target);
        }

        area
    }
}

/// Adapts a [Bitmap] so embedded-graphics can draw into it
struct Target<'a> {
    bitmap: &'a mut Bitmap<Color>,
}

impl DrawTarget for Target<'_> {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(Point { x, y }, color) in pixels {
            self.bitmap
                .put(Vec2D::new(x, y), Color::rgb(color.r(), color.g(), color.b()));
        }
        Ok(())
    }
}

impl OriginDimensions for Target<'_> {
    fn size(&self) -> Size {
        Size::new(self.bitmap.width() as u32, self.bitmap.height() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(text: &str, alignment: Alignment) -> TextRequest {
        TextRequest {
            position: Vec2D::new(60, 40),
            text: text.to_string(),
            alignment,
            color: Color::BLACK,
            background: None,
        }
    }

    #[test]
    fn default_alignment_is_top_left() {
        let layout = request("abc", Alignment::empty()).layout();
        assert_eq!(layout.top_left(), Vec2D::new(60, 40));
        assert_eq!(layout.width(), 18);
        assert_eq!(layout.height(), 10);
    }

    #[test]
    fn alignment_moves_the_box() {
        let right_bottom = request("abc", Alignment::RIGHT | Alignment::BOTTOM).layout();
        assert_eq!(right_bottom.bottom_right(), Vec2D::new(60, 40));

        let centered = request("abcd", Alignment::CENTER).layout();
        assert_eq!(centered.top_left(), Vec2D::new(48, 35));
    }

    #[test]
    fn multiline_layout() {
        let layout = request("a\nlonger\nb", Alignment::empty()).layout();
        assert_eq!(layout.width(), 36);
        assert_eq!(layout.height(), 30);
    }

    #[test]
    fn rendering_stays_inside_the_layout() {
        let mut bitmap = Bitmap::new(120, 80);
        bitmap.clear(Color::WHITE);

        let text = request("Hi!", Alignment::CENTER);
        let area = text.render(&mut bitmap);

        let mut touched = 0;
        for y in 0..bitmap.height() {
            for x in 0..bitmap.width() {
                if bitmap.get_pixel(x, y) != Color::WHITE {
                    assert!(area.contains_point(Vec2D::new(x as i32, y as i32)));
                    touched += 1;
                }
            }
        }
        assert!(touched > 0);
    }

    #[test]
    fn background_fills_the_box() {
        let mut bitmap = Bitmap::new(120, 80);
        bitmap.clear(Color::WHITE);

        let mut text = request("x", Alignment::empty());
        text.background = Some(Color::YELLOW);
        let area = text.render(&mut bitmap);

        // The bottom right corner of a glyph cell is never inked
        let corner = area.bottom_right() - Vec2D::new(1, 1);
        assert_eq!(bitmap.get(corner), Some(Color::YELLOW));
    }

    #[test]
    fn layout_near_the_limits_saturates() {
        let mut text = request("abc", Alignment::empty());
        text.position = Vec2D::new(i32::MAX - 2, i32::MAX);
        let layout = text.layout();
        assert_eq!(layout.top_left(), Vec2D::new(i32::MAX - 2, i32::MAX));
        assert_eq!(layout.bottom_right(), Vec2D::new(i32::MAX, i32::MAX));

        text.position = Vec2D::new(i32::MIN, i32::MIN);
        text.alignment = Alignment::RIGHT | Alignment::BOTTOM;
        assert_eq!(text.layout().top_left(), Vec2D::new(i32::MIN, i32::MIN));
    }

    #[test]
    fn text_off_the_canvas_draws_nothing() {
        let mut bitmap = Bitmap::new(20, 20);
        bitmap.clear(Color::WHITE);

        for position in [
            Vec2D::new(i32::MAX - 2, 0),
            Vec2D::new(0, i32::MAX),
            Vec2D::new(i32::MIN, i32::MIN),
        ] {
            let mut text = request("abc", Alignment::CENTER);
            text.position = position;
            text.background = Some(Color::RED);
            text.render(&mut bitmap);
        }

        assert!(bitmap.data().iter().all(|&pixel| pixel == Color::WHITE));
    }
}
