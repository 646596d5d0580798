//! Small drawing functions to try the library with

use std::f64::consts::TAU;

use canvas::{Alignment, Color, DrawingWindow, MouseButton};
use settings::Demo;

pub fn run(demo: Demo, window: &DrawingWindow) {
    match demo {
        Demo::Fan => fan(window),
        Demo::Gradient => gradient(window),
        Demo::Spinner => spinner(window),
        Demo::Hello => hello(window),
        Demo::Clicks => clicks(window),
    }
}

fn fan(window: &DrawingWindow) {
    let (width, height) = (window.width() as i32, window.height() as i32);
    let steps = 32;

    for step in 0..=steps {
        let t = step as f32 / steps as f32;
        window.set_color_rgb(t, 0.2, 1. - t);

        window.draw_line(0, 0, width - 1, (height - 1) * step / steps);
        window.draw_line(0, 0, (width - 1) * step / steps, height - 1);
        window.msleep(15);
    }
}

fn gradient(window: &DrawingWindow) {
    let (width, height) = (window.width() as i32, window.height() as i32);
    let columns = 64;
    let rows = 8;

    for row in 0..rows {
        for column in 0..columns {
            let red = column as f32 / (columns - 1) as f32;
            let green = row as f32 / (rows - 1) as f32;
            window.set_color_rgb(red, green, 1. - red);

            window.fill_rect(
                width * column / columns,
                height * row / rows,
                width * (column + 1) / columns - 1,
                height * (row + 1) / rows - 1,
            );
        }

        if !window.sync() {
            return;
        }
    }
}

fn spinner(window: &DrawingWindow) {
    let center_x = window.width() as i32 / 2;
    let center_y = window.height() as i32 / 2;
    let radius = center_x.min(center_y) - 10;

    let mut angle: f64 = 0.;
    loop {
        let x = center_x + (f64::from(radius) * angle.cos()).round() as i32;
        let y = center_y + (f64::from(radius) * angle.sin()).round() as i32;

        window.clear_graph();
        window.set_color(Color::GRAY);
        window.draw_circle(center_x, center_y, radius);
        window.set_color(Color::RED);
        window.draw_line(center_x, center_y, x, y);
        window.fill_circle(x, y, 4);

        if !window.sync() {
            return;
        }

        angle = (angle + 0.05) % TAU;
        window.msleep(20);
    }
}

fn hello(window: &DrawingWindow) {
    let (width, height) = (window.width() as i32, window.height() as i32);

    window.set_bg_color(Color::YELLOW);
    window.draw_text_bg(width / 2, height / 2, "Hello world!", Alignment::CENTER);

    window.set_color(Color::BLUE);
    window.draw_text(4, 4, "top left", Alignment::empty());
    window.draw_text(width - 4, 4, "top right", Alignment::RIGHT | Alignment::TOP);
    window.draw_text(4, height - 4, "bottom left", Alignment::LEFT | Alignment::BOTTOM);
    window.draw_text(
        width - 4,
        height - 4,
        "bottom right",
        Alignment::RIGHT | Alignment::BOTTOM,
    );

    // The pen only affects text drawn after the change
    if window.set_color_name("darkgreen").is_ok() {
        window.draw_text(width / 2, 4, "Press Escape to close", Alignment::HCENTER);
    }
}

fn clicks(window: &DrawingWindow) {
    window.set_color(Color::BLACK);
    window.draw_text(
        4,
        4,
        "Click anywhere\nRight click clears",
        Alignment::empty(),
    );

    while let Some(press) = window.wait_mouse_press(None) {
        match press.button {
            MouseButton::Right => window.clear_graph(),
            MouseButton::Middle => {
                window.set_color(Color::BLUE);
                window.draw_rect(press.x - 8, press.y - 8, press.x + 8, press.y + 8);
            },
            _ => {
                window.set_color(Color::RED);
                window.fill_circle(press.x, press.y, 8);
            },
        }

        if let Some(color) = window.pixel_color(press.x, press.y) {
            log::debug!("pixel under the cursor is now {color:?}");
        }
    }
}
