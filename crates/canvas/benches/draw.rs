use std::sync::Mutex;

use canvas::{FrameBuffer, HeadlessLoop, Ticking, WindowConfig};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn primitives(c: &mut Criterion) {
    let frame_buffer = Mutex::new(FrameBuffer::new(640, 480));

    c.bench_function("line under lock", |b| {
        b.iter(|| {
            let mut frame_buffer = frame_buffer.lock().unwrap();
            frame_buffer.draw_line(black_box(3), black_box(7), black_box(600), black_box(420));
            black_box(frame_buffer.is_dirty());
        })
    });

    c.bench_function("filled circle under lock", |b| {
        b.iter(|| {
            let mut frame_buffer = frame_buffer.lock().unwrap();
            frame_buffer.fill_circle(black_box(320), black_box(240), black_box(100));
        })
    });

    c.bench_function("take dirty region", |b| {
        b.iter(|| {
            let mut frame_buffer = frame_buffer.lock().unwrap();
            frame_buffer.draw_point(black_box(10), black_box(10));
            frame_buffer.draw_point(black_box(500), black_box(400));
            black_box(frame_buffer.take_dirty_region())
        })
    });
}

fn window_calls(c: &mut Criterion) {
    let headless = HeadlessLoop::new(WindowConfig::default(), |_| {}).with_ticking(Ticking::Never);
    let window = headless.window().clone();

    c.bench_function("draw_point through the window", |b| {
        b.iter(|| window.draw_point(black_box(17), black_box(23)))
    });
}

criterion_group!(benches, primitives, window_calls);
criterion_main!(benches);
