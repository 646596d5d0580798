//! Pixel level drawing primitives.
//!
//! Every function here clips against the bitmap, so coordinates may lie
//! anywhere on the plane.

use std::ops::RangeInclusive;

use math::{Bitmap, Color, Rectangle, Vec2D};

/// Draw a line including both end points.
///
/// The line advances one pixel per step along its longer axis, with the other
/// coordinate rounded to the nearest pixel. Only the steps that fall onto the
/// bitmap are visited.
pub fn line(bitmap: &mut Bitmap<Color>, from: Vec2D, to: Vec2D, color: Color) {
    let delta_x = i64::from(to.x) - i64::from(from.x);
    let delta_y = i64::from(to.y) - i64::from(from.y);

    if delta_x.abs() >= delta_y.abs() {
        for step in visible_steps(from.x, delta_x, bitmap.width()) {
            let x = i64::from(from.x) + step * delta_x.signum();
            let y = i64::from(from.y) + minor_offset(step, delta_y, delta_x.abs());
            put(bitmap, x, y, color);
        }
    } else {
        for step in visible_steps(from.y, delta_y, bitmap.height()) {
            let x = i64::from(from.x) + minor_offset(step, delta_x, delta_y.abs());
            let y = i64::from(from.y) + step * delta_y.signum();
            put(bitmap, x, y, color);
        }
    }
}

/// The steps `0..=|delta|` for which `start + step * signum(delta)` lies in `0..extent`
fn visible_steps(start: i32, delta: i64, extent: usize) -> RangeInclusive<i64> {
    let start = i64::from(start);
    let last = i64::try_from(extent).unwrap_or(i64::MAX) - 1;

    let (first_step, last_step) = if delta >= 0 {
        (-start, last - start)
    } else {
        (start - last, start)
    };
    first_step.max(0)..=last_step.min(delta.abs())
}

/// `step * delta_minor / delta_major`, rounded half away from zero
fn minor_offset(step: i64, delta_minor: i64, delta_major: i64) -> i64 {
    if delta_major == 0 {
        return 0;
    }

    let numerator = 2 * i128::from(step) * i128::from(delta_minor)
        + i128::from(delta_minor.signum() * delta_major);
    (numerator / (2 * i128::from(delta_major))) as i64
}

fn put(bitmap: &mut Bitmap<Color>, x: i64, y: i64, color: Color) {
    if let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) {
        bitmap.put(Vec2D::new(x, y), color);
    }
}

/// Outline of the rectangle with corner pixels `a` and `b`, in any order
pub fn rect(bitmap: &mut Bitmap<Color>, a: Vec2D, b: Vec2D, color: Color) {
    let top_left = a.min(b);
    let bottom_right = a.max(b);
    let top_right = Vec2D::new(bottom_right.x, top_left.y);
    let bottom_left = Vec2D::new(top_left.x, bottom_right.y);

    line(bitmap, top_left, top_right, color);
    line(bitmap, top_right, bottom_right, color);
    line(bitmap, bottom_right, bottom_left, color);
    line(bitmap, bottom_left, top_left, color);
}

/// Filled rectangle with corner pixels `a` and `b`, in any order
pub fn fill_rect(bitmap: &mut Bitmap<Color>, a: Vec2D, b: Vec2D, color: Color) {
    bitmap.fill_region(Rectangle::spanning(a, b), color);
}

/// Circle outline.
///
/// One pixel is set per row and per column the circle crosses, so flat and
/// steep parts of the outline have no gaps. Rows and columns off the bitmap
/// are skipped.
pub fn circle(bitmap: &mut Bitmap<Color>, center: Vec2D, radius: i32, color: Color) {
    if radius < 0 {
        return;
    }

    let (center_x, center_y) = (i64::from(center.x), i64::from(center.y));
    let radius = i64::from(radius);

    for dy in visible_offsets(center_y, radius, bitmap.height()) {
        let dx = half_chord(radius, dy);
        put(bitmap, center_x - dx, center_y + dy, color);
        put(bitmap, center_x + dx, center_y + dy, color);
    }

    for dx in visible_offsets(center_x, radius, bitmap.width()) {
        let dy = half_chord(radius, dx);
        put(bitmap, center_x + dx, center_y - dy, color);
        put(bitmap, center_x + dx, center_y + dy, color);
    }
}

/// Filled disk, drawn one horizontal span per visible row
pub fn fill_circle(bitmap: &mut Bitmap<Color>, center: Vec2D, radius: i32, color: Color) {
    if radius < 0 {
        return;
    }

    let (center_x, center_y) = (i64::from(center.x), i64::from(center.y));
    let radius = i64::from(radius);

    for dy in visible_offsets(center_y, radius, bitmap.height()) {
        let half_width = half_chord(radius, dy);
        let span = Rectangle::from_wide_corners(
            Vec2D::new(center_x - half_width, center_y + dy),
            Vec2D::new(center_x + half_width + 1, center_y + dy + 1),
        );
        bitmap.fill_region(span, color);
    }
}

/// The offsets in `-radius..=radius` that put `center + offset` inside `0..extent`
fn visible_offsets(center: i64, radius: i64, extent: usize) -> RangeInclusive<i64> {
    let last = i64::try_from(extent).unwrap_or(i64::MAX) - 1;
    (-radius).max(-center)..=radius.min(last - center)
}

/// Half the length of the chord `offset` away from the center, rounded to the nearest pixel
fn half_chord(radius: i64, offset: i64) -> i64 {
    let remaining = radius * radius - offset * offset;
    (remaining.max(0) as f64).sqrt().round() as i64
}

pub fn triangle(bitmap: &mut Bitmap<Color>, corners: [Vec2D; 3], color: Color) {
    let [a, b, c] = corners;
    line(bitmap, a, b, color);
    line(bitmap, b, c, color);
    line(bitmap, c, a, color);
}

/// Filled triangle.
///
/// A pixel is filled if its position lies on or inside all three edges. The
/// outline is drawn as well so that degenerate triangles still show up.
pub fn fill_triangle(bitmap: &mut Bitmap<Color>, corners: [Vec2D; 3], color: Color) {
    let [a, b, c] = corners;

    let area = edge(a, b, c);
    if area != 0 {
        let bounds = Rectangle::spanning(a.min(b).min(c), a.max(b).max(c));
        let Some(visible) = bitmap.bounds().intersection(bounds) else {
            return;
        };

        for y in visible.top_left().y..visible.bottom_right().y {
            for x in visible.top_left().x..visible.bottom_right().x {
                let point = Vec2D::new(x, y);
                let w0 = edge(b, c, point);
                let w1 = edge(c, a, point);
                let w2 = edge(a, b, point);

                let inside = if area > 0 {
                    w0 >= 0 && w1 >= 0 && w2 >= 0
                } else {
                    w0 <= 0 && w1 <= 0 && w2 <= 0
                };

                if inside {
                    bitmap.put(point, color);
                }
            }
        }
    }

    triangle(bitmap, corners, color);
}

/// Twice the signed area of the triangle `(a, b, p)`
fn edge(a: Vec2D, b: Vec2D, p: Vec2D) -> i128 {
    let (ax, ay) = (i128::from(a.x), i128::from(a.y));
    let (bx, by) = (i128::from(b.x), i128::from(b.y));
    let (px, py) = (i128::from(p.x), i128::from(p.y));

    (bx - ax) * (py - ay) - (by - ay) * (px - ax)
}
