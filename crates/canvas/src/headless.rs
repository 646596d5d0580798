//! An event loop without a window.
//!
//! [HeadlessLoop] drives a [RenderLoop] from a plain channel and records every
//! presented frame into an offscreen bitmap.

use std::{
    sync::mpsc::{self, Receiver, RecvTimeoutError},
    time::{Duration, Instant},
};

use math::{Bitmap, Color, Rectangle, Vec2D};

use crate::{
    Control, DrawingWindow, Frame, IntoExitCode, MousePress, RenderLoop, Request, Surface,
    WindowConfig, WindowState, WorkerExit,
};

/// How long [HeadlessLoop::run] waits for events before checking on the worker
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// A [Surface] that keeps a copy of everything presented to it
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    image: Bitmap<Color>,
    frames: Vec<Rectangle>,
}

impl RecordingSurface {
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            image: Bitmap::new(width, height),
            frames: vec![],
        }
    }

    #[must_use]
    pub fn image(&self) -> &Bitmap<Color> {
        &self.image
    }

    /// The region of every frame presented so far, oldest first
    #[must_use]
    pub fn frames(&self) -> &[Rectangle] {
        &self.frames
    }

    #[must_use]
    pub fn pixel_color(&self, x: i32, y: i32) -> Option<Color> {
        self.image.get(Vec2D::new(x, y))
    }
}

impl Surface for RecordingSurface {
    fn present(&mut self, frame: &Frame) {
        self.image.blit(&frame.pixels, frame.region.top_left());
        self.frames.push(frame.region);
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Ticking {
    /// Repaint at the configured paint interval
    #[default]
    Interval,

    /// Only repaint when the worker asks for it
    Never,
}

pub struct HeadlessLoop {
    render_loop: RenderLoop,
    requests: Receiver<Request>,
    surface: RecordingSurface,
    ticking: Ticking,
    next_tick: Instant,
}

impl HeadlessLoop {
    /// The calling thread becomes the owning thread
    pub fn new<F, R>(config: WindowConfig, function: F) -> Self
    where
        F: FnOnce(&DrawingWindow) -> R + Send + 'static,
        R: IntoExitCode,
    {
        let (sender, requests) = mpsc::channel();
        let surface = RecordingSurface::new(config.width(), config.height());

        Self {
            render_loop: RenderLoop::new(config, sender, function),
            requests,
            surface,
            ticking: Ticking::default(),
            next_tick: Instant::now(),
        }
    }

    #[must_use]
    pub fn with_ticking(mut self, ticking: Ticking) -> Self {
        self.ticking = ticking;
        self
    }

    #[must_use]
    pub fn window(&self) -> &DrawingWindow {
        self.render_loop.window()
    }

    #[must_use]
    pub fn surface(&self) -> &RecordingSurface {
        &self.surface
    }

    pub fn render_loop(&mut self) -> &mut RenderLoop {
        &mut self.render_loop
    }

    /// Show the window, which starts the worker
    pub fn show(&mut self) {
        let interval = self.render_loop.on_show();
        self.next_tick = Instant::now() + interval;
    }

    /// Wait up to `timeout` for the next event and handle it.
    ///
    /// An event is either a request from the worker or a due paint tick.
    pub fn step(&mut self, timeout: Duration) -> Control {
        if self.render_loop.state() == WindowState::Closed {
            return Control::Closed;
        }

        let now = Instant::now();
        let mut deadline = now + timeout;
        if self.ticking == Ticking::Interval && self.render_loop.is_ticking() {
            deadline = deadline.min(self.next_tick);
        }

        match self.requests.recv_timeout(deadline.saturating_duration_since(now)) {
            Ok(request) => return self.render_loop.on_request(&mut self.surface, request),
            Err(RecvTimeoutError::Timeout) => {},
            Err(RecvTimeoutError::Disconnected) => {
                log::warn!("every sender for {:?} is gone", self.window().title());
                return self.close_with_control();
            },
        }

        if self.ticking == Ticking::Interval && self.next_tick <= Instant::now() {
            self.render_loop.on_tick(&mut self.surface);
            self.next_tick = Instant::now() + self.render_loop.config().paint_interval;
        }

        Control::Continue
    }

    fn close_with_control(&mut self) -> Control {
        self.render_loop.on_close();
        Control::Closed
    }

    /// Forward a mouse press to the window
    pub fn press(&mut self, press: MousePress) -> bool {
        self.render_loop.on_mouse_press(press)
    }

    /// Run until the drawing function finishes or the window is closed.
    ///
    /// Requests the worker posted before finishing are still handled and the
    /// final state of the canvas is presented before the window closes.
    pub fn run(&mut self) -> Option<WorkerExit> {
        if self.render_loop.state() == WindowState::Created {
            self.show();
        }

        loop {
            if self.step(POLL_INTERVAL) == Control::Closed {
                return self.render_loop.worker_exit();
            }

            if self.render_loop.worker_exit().is_some() {
                while let Ok(request) = self.requests.try_recv() {
                    if self.render_loop.on_request(&mut self.surface, request) == Control::Closed {
                        return self.render_loop.worker_exit();
                    }
                }

                self.render_loop.repaint_dirty(&mut self.surface);
                return self.close();
            }
        }
    }

    pub fn close(&mut self) -> Option<WorkerExit> {
        self.render_loop.on_close()
    }
}
