use std::{
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        mpsc, Arc,
    },
    thread,
    time::{Duration, Instant},
};

use canvas::{
    Control, HeadlessLoop, Key, MouseButton, MousePress, RenderLoop, Ticking, WindowConfig,
    WindowState, WorkerExit,
};

const PROMPTLY: Duration = Duration::from_secs(2);

fn config() -> WindowConfig {
    WindowConfig::default()
        .with_size(16, 16)
        .with_title("lifecycle")
}

/// Run the owning loop until `condition` holds
fn step_until(headless: &mut HeadlessLoop, mut condition: impl FnMut(&mut HeadlessLoop) -> bool) {
    let start = Instant::now();
    while !condition(headless) {
        assert!(start.elapsed() < PROMPTLY, "condition was never met");
        headless.step(Duration::from_millis(5));
    }
}

#[test]
fn worker_starts_exactly_once() {
    let runs = Arc::new(AtomicUsize::new(0));
    let (sender, _requests) = mpsc::channel();

    let mut render_loop = {
        let runs = runs.clone();
        RenderLoop::new(config(), sender, move |_| {
            runs.fetch_add(1, Ordering::SeqCst);
            7
        })
    };

    assert_eq!(render_loop.state(), WindowState::Created);
    render_loop.on_show();
    render_loop.on_show();
    assert_eq!(render_loop.state(), WindowState::Shown);

    assert_eq!(render_loop.on_close(), Some(WorkerExit::Finished(7)));
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[test]
fn closing_terminates_a_drawing_loop() {
    let mut headless = HeadlessLoop::new(config(), |window| -> i32 {
        let mut x = 0;
        loop {
            window.draw_point(x % 16, 0);
            x += 1;
        }
    });
    headless.show();
    headless.step(Duration::from_millis(20));

    let start = Instant::now();
    assert_eq!(headless.close(), Some(WorkerExit::Terminated));
    assert!(start.elapsed() < PROMPTLY);
    assert_eq!(headless.render_loop().state(), WindowState::Closed);
}

#[test]
fn closing_cuts_a_sleep_short() {
    let mut headless = HeadlessLoop::new(config(), |window| -> i32 {
        loop {
            window.sleep_secs(60);
        }
    });
    headless.show();
    headless.step(Duration::from_millis(20));

    let start = Instant::now();
    assert_eq!(headless.close(), Some(WorkerExit::Terminated));
    assert!(start.elapsed() < PROMPTLY);
}

#[test]
fn unresponsive_worker_is_detached() {
    let release = Arc::new(AtomicBool::new(false));
    let config = config().with_close_grace(Duration::from_millis(50));

    let mut headless = {
        let release = release.clone();
        HeadlessLoop::new(config, move |_| {
            // Never calls into the library, so it never reaches a safe point
            while !release.load(Ordering::SeqCst) {
                thread::sleep(Duration::from_millis(1));
            }
        })
    };
    headless.show();

    let start = Instant::now();
    assert_eq!(headless.close(), None);
    assert!(start.elapsed() >= Duration::from_millis(50));
    assert_eq!(headless.render_loop().state(), WindowState::Closed);

    release.store(true, Ordering::SeqCst);
}

#[test]
fn worker_panic_is_reported() {
    let mut headless = HeadlessLoop::new(config(), |window| -> i32 {
        window.draw_point(1, 1);
        panic!("the drawing function gave up");
    });

    assert_eq!(headless.run(), Some(WorkerExit::Panicked));
}

#[test]
fn exit_code_is_reported() {
    let mut headless = HeadlessLoop::new(config(), |window| {
        window.draw_line(0, 0, 15, 15);
        42
    });

    assert_eq!(headless.run(), Some(WorkerExit::Finished(42)));
}

#[test]
fn close_graph_closes_the_window() {
    let mut headless = HeadlessLoop::new(config(), |window| -> i32 {
        window.close_graph();
        // Stops here, at the first call after the window closed
        loop {
            window.msleep(1);
        }
    });

    assert_eq!(headless.run(), Some(WorkerExit::Terminated));
    assert_eq!(headless.step(Duration::ZERO), Control::Closed);
}

#[test]
fn escape_closes_the_window() {
    let mut headless = HeadlessLoop::new(config(), |window| -> i32 {
        loop {
            window.usleep(500);
        }
    });
    headless.show();

    assert_eq!(headless.render_loop().on_key(Key::Other), Control::Continue);
    assert_eq!(headless.render_loop().on_key(Key::Escape), Control::Closed);
    assert_eq!(headless.render_loop().worker_exit(), Some(WorkerExit::Terminated));
}

#[test]
fn worker_receives_mouse_presses() {
    let (results, pressed) = mpsc::channel();
    let waiting = Arc::new(AtomicBool::new(false));

    let mut headless = {
        let waiting = waiting.clone();
        HeadlessLoop::new(config(), move |window| {
            waiting.store(true, Ordering::SeqCst);
            let _ = results.send(window.wait_mouse_press(None));
        })
    }
    .with_ticking(Ticking::Never);
    headless.show();

    let press = MousePress {
        x: 4,
        y: 9,
        button: MouseButton::Right,
    };

    // Presses only count once the worker is actually waiting
    step_until(&mut headless, |headless| {
        waiting.load(Ordering::SeqCst) && headless.press(press)
    });

    assert_eq!(pressed.recv_timeout(PROMPTLY), Ok(Some(press)));
    assert_eq!(headless.run(), Some(WorkerExit::Finished(0)));
}

#[test]
fn mouse_wait_times_out() {
    let (results, timed_out) = mpsc::channel();

    let mut headless = HeadlessLoop::new(config(), move |window| {
        let start = Instant::now();
        let press = window.wait_mouse_press(Some(Duration::from_millis(30)));
        let _ = results.send((press, start.elapsed()));
    });

    assert_eq!(headless.run(), Some(WorkerExit::Finished(0)));

    let (press, elapsed) = timed_out.try_recv().unwrap();
    assert_eq!(press, None);
    assert!(elapsed >= Duration::from_millis(30));
}
