use std::{
    collections::VecDeque,
    fmt, mem,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    thread::{self, ThreadId},
    time::Duration,
};

use math::{Color, ParseColorError, Vec2D};

use crate::{
    Alignment, FrameBuffer, MousePress, MouseWaiter, Poster, Request, SyncGate,
    TerminationGuard, TextRequest, WindowConfig,
};

/// State shared by the worker and the owning thread
pub(crate) struct Shared {
    config: WindowConfig,
    frame_buffer: Mutex<FrameBuffer>,
    text_queue: Mutex<VecDeque<TextRequest>>,
    gate: SyncGate,
    mouse: MouseWaiter,
    guard: TerminationGuard,
    poster: Box<dyn Poster>,

    /// The thread running the event loop, which must never block on the worker
    owner: ThreadId,
}

/// The handle a drawing function uses to draw.
///
/// Every drawing method locks the canvas, draws, and marks the touched area
/// dirty. Nothing appears on screen until the owning thread repaints, either
/// on its timer or because of a [sync](Self::sync).
///
/// Once the window is closing, drawing calls do nothing and blocking calls fail
/// immediately. On the worker thread, the next call after close stops the
/// drawing function altogether.
#[derive(Clone)]
pub struct DrawingWindow {
    shared: Arc<Shared>,
}

impl DrawingWindow {
    /// Create the shared state for a new window, owned by the calling thread
    pub(crate) fn new(config: WindowConfig, poster: Box<dyn Poster>) -> Self {
        let frame_buffer = FrameBuffer::new(config.width(), config.height());

        let shared = Shared {
            config,
            frame_buffer: Mutex::new(frame_buffer),
            text_queue: Mutex::default(),
            gate: SyncGate::new(),
            mouse: MouseWaiter::new(),
            guard: TerminationGuard::new(),
            poster,
            owner: thread::current().id(),
        };

        Self {
            shared: Arc::new(shared),
        }
    }

    pub(crate) fn config(&self) -> &WindowConfig {
        &self.shared.config
    }

    pub(crate) fn guard(&self) -> &TerminationGuard {
        &self.shared.guard
    }

    pub(crate) fn gate(&self) -> &SyncGate {
        &self.shared.gate
    }

    pub(crate) fn mouse(&self) -> &MouseWaiter {
        &self.shared.mouse
    }

    /// Lock the canvas.
    ///
    /// A worker that panicked while drawing leaves the canvas usable, so poisoning is ignored.
    pub(crate) fn lock_frame_buffer(&self) -> MutexGuard<'_, FrameBuffer> {
        self.shared
            .frame_buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_text_queue(&self) -> MutexGuard<'_, VecDeque<TextRequest>> {
        self.shared
            .text_queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn take_text_requests(&self) -> VecDeque<TextRequest> {
        mem::take(&mut *self.lock_text_queue())
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.shared.config.width()
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.shared.config.height()
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.shared.config.title
    }

    /// Whether the window has started shutting down
    #[must_use]
    pub fn is_closing(&self) -> bool {
        self.shared.gate.is_shut_down()
    }

    fn assert_not_owner(&self, operation: &str) {
        assert!(
            thread::current().id() != self.shared.owner,
            "{operation} must not be called from the thread that owns the window"
        );
    }

    /// Run `f` on the locked canvas.
    ///
    /// Returns `None` without running `f` if the window is closing.
    fn with_frame_buffer<T>(&self, f: impl FnOnce(&mut FrameBuffer) -> T) -> Option<T> {
        self.shared.guard.checkpoint();
        if self.is_closing() {
            return None;
        }

        // Declared before the lock so that it is released after it
        let _section = self.shared.guard.enter();
        let mut frame_buffer = self.lock_frame_buffer();
        Some(f(&mut frame_buffer))
    }

    /// Set the pen color, either a [Color] or a packed `0xRRGGBB` value
    pub fn set_color<C: Into<Color>>(&self, color: C) {
        let color = color.into();
        self.with_frame_buffer(|frame_buffer| frame_buffer.set_pen(color));
    }

    /// Set the pen color from components in `[0, 1]`
    pub fn set_color_rgb(&self, red: f32, green: f32, blue: f32) {
        self.set_color(Color::from_rgb_f32(red, green, blue));
    }

    /// Set the pen color from a color name like `"orange"` or a `#rrggbb` string
    pub fn set_color_name(&self, name: &str) -> Result<(), ParseColorError> {
        let color = name.parse::<Color>()?;
        self.set_color(color);
        Ok(())
    }

    pub fn set_bg_color<C: Into<Color>>(&self, color: C) {
        let color = color.into();
        self.with_frame_buffer(|frame_buffer| frame_buffer.set_background(color));
    }

    pub fn set_bg_color_rgb(&self, red: f32, green: f32, blue: f32) {
        self.set_bg_color(Color::from_rgb_f32(red, green, blue));
    }

    pub fn set_bg_color_name(&self, name: &str) -> Result<(), ParseColorError> {
        let color = name.parse::<Color>()?;
        self.set_bg_color(color);
        Ok(())
    }

    /// Fill the canvas with the background color
    pub fn clear_graph(&self) {
        self.with_frame_buffer(FrameBuffer::clear);
    }

    pub fn draw_point(&self, x: i32, y: i32) {
        self.with_frame_buffer(|frame_buffer| frame_buffer.draw_point(x, y));
    }

    pub fn draw_line(&self, x1: i32, y1: i32, x2: i32, y2: i32) {
        self.with_frame_buffer(|frame_buffer| frame_buffer.draw_line(x1, y1, x2, y2));
    }

    pub fn draw_rect(&self, x1: i32, y1: i32, x2: i32, y2: i32) {
        self.with_frame_buffer(|frame_buffer| frame_buffer.draw_rect(x1, y1, x2, y2));
    }

    pub fn fill_rect(&self, x1: i32, y1: i32, x2: i32, y2: i32) {
        self.with_frame_buffer(|frame_buffer| frame_buffer.fill_rect(x1, y1, x2, y2));
    }

    pub fn draw_circle(&self, x: i32, y: i32, radius: i32) {
        self.with_frame_buffer(|frame_buffer| frame_buffer.draw_circle(x, y, radius));
    }

    pub fn fill_circle(&self, x: i32, y: i32, radius: i32) {
        self.with_frame_buffer(|frame_buffer| frame_buffer.fill_circle(x, y, radius));
    }

    pub fn draw_triangle(&self, x1: i32, y1: i32, x2: i32, y2: i32, x3: i32, y3: i32) {
        self.with_frame_buffer(|frame_buffer| {
            frame_buffer.draw_triangle(x1, y1, x2, y2, x3, y3);
        });
    }

    pub fn fill_triangle(&self, x1: i32, y1: i32, x2: i32, y2: i32, x3: i32, y3: i32) {
        self.with_frame_buffer(|frame_buffer| {
            frame_buffer.fill_triangle(x1, y1, x2, y2, x3, y3);
        });
    }

    /// Draw `text` in the pen color, anchored at `(x, y)`.
    ///
    /// Text is rendered by the owning thread; this blocks until it has been drawn
    /// and repainted. Returns `false` if the window closed first.
    ///
    /// # Panics
    /// Panics when called from the thread that owns the window.
    pub fn draw_text(&self, x: i32, y: i32, text: &str, alignment: Alignment) -> bool {
        self.queue_text(x, y, text, alignment, false)
    }

    /// Like [draw_text](Self::draw_text), but fills the text box with the background color first
    pub fn draw_text_bg(&self, x: i32, y: i32, text: &str, alignment: Alignment) -> bool {
        self.queue_text(x, y, text, alignment, true)
    }

    fn queue_text(
        &self,
        x: i32,
        y: i32,
        text: &str,
        alignment: Alignment,
        with_background: bool,
    ) -> bool {
        self.assert_not_owner("draw_text");
        let Some((pen, background)) = self
            .with_frame_buffer(|frame_buffer| (frame_buffer.pen(), frame_buffer.background()))
        else {
            return false;
        };

        let _section = self.shared.guard.enter();
        let Some(ticket) = self.shared.gate.begin() else {
            return false;
        };

        self.lock_text_queue().push_back(TextRequest {
            position: Vec2D::new(x, y),
            text: text.to_string(),
            alignment,
            color: pen,
            background: with_background.then_some(background),
        });

        if let Err(error) = self.shared.poster.post(Request::Text(ticket)) {
            log::warn!("cannot draw text: {error}");
            self.lock_text_queue().clear();
            self.shared.gate.cancel(ticket);
            return false;
        }

        self.shared.gate.wait(ticket, None)
    }

    /// Block until everything drawn so far is on screen.
    ///
    /// Returns `false` if the window closed first.
    ///
    /// # Panics
    /// Panics when called from the thread that owns the window.
    pub fn sync(&self) -> bool {
        self.sync_with(None)
    }

    /// Like [sync](Self::sync), but gives up after `timeout`
    pub fn sync_timeout(&self, timeout: Duration) -> bool {
        self.sync_with(Some(timeout))
    }

    fn sync_with(&self, timeout: Option<Duration>) -> bool {
        self.assert_not_owner("sync");
        self.shared.guard.checkpoint();

        let _section = self.shared.guard.enter();
        let Some(ticket) = self.shared.gate.begin() else {
            return false;
        };

        if let Err(error) = self.shared.poster.post(Request::Sync(ticket)) {
            log::warn!("cannot request a repaint: {error}");
            self.shared.gate.cancel(ticket);
            return false;
        }

        self.shared.gate.wait(ticket, timeout)
    }

    /// Ask the owning thread to close the window
    pub fn close_graph(&self) {
        self.shared.guard.checkpoint();

        if let Err(error) = self.shared.poster.post(Request::Close) {
            log::warn!("cannot close window: {error}");
        }
    }

    /// Sleep on the calling thread. Closing the window cuts the sleep short.
    pub fn sleep(&self, duration: Duration) {
        self.shared.guard.checkpoint();
        self.shared.gate.sleep(duration);
        self.shared.guard.checkpoint();
    }

    pub fn sleep_secs(&self, seconds: u64) {
        self.sleep(Duration::from_secs(seconds));
    }

    pub fn msleep(&self, milliseconds: u64) {
        self.sleep(Duration::from_millis(milliseconds));
    }

    pub fn usleep(&self, microseconds: u64) {
        self.sleep(Duration::from_micros(microseconds));
    }

    /// The color at `(x, y)`, or `None` outside the canvas or once the window is closing
    #[must_use]
    pub fn pixel_color(&self, x: i32, y: i32) -> Option<Color> {
        self.with_frame_buffer(|frame_buffer| frame_buffer.pixel_color(x, y))
            .flatten()
    }

    /// Block until the next mouse button press inside the window.
    ///
    /// `None` waits without a time limit. Returns `None` on timeout or if the window closes.
    ///
    /// # Panics
    /// Panics when called from the thread that owns the window.
    pub fn wait_mouse_press(&self, timeout: Option<Duration>) -> Option<MousePress> {
        self.assert_not_owner("wait_mouse_press");
        self.shared.guard.checkpoint();
        if self.is_closing() {
            return None;
        }

        let _section = self.shared.guard.enter();
        self.shared.mouse.wait(timeout)
    }
}

impl fmt::Debug for DrawingWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrawingWindow")
            .field("title", &self.title())
            .field("width", &self.width())
            .field("height", &self.height())
            .field("closing", &self.is_closing())
            .finish()
    }
}
