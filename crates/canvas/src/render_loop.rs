use std::time::Duration;

use math::Rectangle;

use crate::{
    Control, DrawingWindow, Frame, IntoExitCode, Key, MousePress, Poster, Request,
    WindowConfig, WorkerExit, WorkerThread,
};

/// Puts canvas snapshots on screen. Implemented by the hosting event loop.
pub trait Surface {
    /// Show `frame.pixels` at `frame.region` on the canvas
    fn present(&mut self, frame: &Frame);
}

/// ```text
/// Created ──on_show──► Shown ──on_close──► Closing ──worker joined──► Closed
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowState {
    Created,

    /// The paint timer and the worker are running
    Shown,

    Closing,
    Closed,
}

/// The owning thread's half of a drawing window.
///
/// Whatever event loop hosts the window forwards its events to the `on_*`
/// methods. None of them ever block on the worker, except [on_close](Self::on_close)
/// which waits up to the configured grace period for the worker to stop.
pub struct RenderLoop {
    window: DrawingWindow,
    worker: WorkerThread,
    state: WindowState,
    ticking: bool,
}

impl RenderLoop {
    /// Create a window whose drawing function will run once the window is shown.
    ///
    /// The calling thread becomes the owning thread.
    pub fn new<P, F, R>(config: WindowConfig, poster: P, function: F) -> Self
    where
        P: Poster + 'static,
        F: FnOnce(&DrawingWindow) -> R + Send + 'static,
        R: IntoExitCode,
    {
        Self {
            window: DrawingWindow::new(config, Box::new(poster)),
            worker: WorkerThread::new(function),
            state: WindowState::Created,
            ticking: false,
        }
    }

    /// A handle to the canvas, for drawing from the owning thread
    #[must_use]
    pub fn window(&self) -> &DrawingWindow {
        &self.window
    }

    #[must_use]
    pub fn config(&self) -> &WindowConfig {
        self.window.config()
    }

    #[must_use]
    pub fn state(&self) -> WindowState {
        self.state
    }

    #[must_use]
    pub fn is_ticking(&self) -> bool {
        self.ticking
    }

    /// The window became visible: start the paint timer and the worker.
    ///
    /// Returns the interval at which [on_tick](Self::on_tick) should be called.
    /// The worker is only ever started once, no matter how often this is called.
    pub fn on_show(&mut self) -> Duration {
        if self.state == WindowState::Created {
            log::debug!("window {:?} shown", self.window.title());
            self.state = WindowState::Shown;
            self.ticking = true;
        }

        if self.state == WindowState::Shown {
            let name = self.window.title().to_string();
            self.worker.start_once(self.window.clone(), &name);
        }

        self.config().paint_interval
    }

    /// Repaint whatever changed since the last repaint.
    ///
    /// Returns `true` if anything was presented.
    pub fn on_tick<S: Surface + ?Sized>(&mut self, surface: &mut S) -> bool {
        if !self.ticking {
            return false;
        }

        if let Some(exit) = self.worker.poll() {
            log::trace!("worker already exited with {exit:?}");
        }

        self.repaint_dirty(surface)
    }

    /// Present the current contents of `region`, whether or not it changed
    pub fn on_paint<S: Surface + ?Sized>(&mut self, surface: &mut S, region: Rectangle) {
        let frame = self.window.lock_frame_buffer().snapshot(region);

        if let Some(frame) = frame {
            surface.present(&frame);
        }
    }

    /// Take the dirty region and present it
    pub fn repaint_dirty<S: Surface + ?Sized>(&mut self, surface: &mut S) -> bool {
        let frame = {
            let mut frame_buffer = self.window.lock_frame_buffer();
            frame_buffer
                .take_dirty_region()
                .and_then(|region| frame_buffer.snapshot(region))
        };

        match frame {
            Some(frame) => {
                surface.present(&frame);
                true
            },
            None => false,
        }
    }

    /// Handle a request posted by the worker
    pub fn on_request<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        request: Request,
    ) -> Control {
        if self.state == WindowState::Closed {
            return Control::Closed;
        }

        match request {
            Request::Sync(ticket) | Request::Text(ticket) => {
                let text_requests = self.window.take_text_requests();
                if !text_requests.is_empty() {
                    let mut frame_buffer = self.window.lock_frame_buffer();
                    for text_request in &text_requests {
                        frame_buffer.draw_text(text_request);
                    }
                }

                self.repaint_dirty(surface);
                self.window.gate().acknowledge(ticket);
                Control::Continue
            },
            Request::Close => {
                self.on_close();
                Control::Closed
            },
        }
    }

    pub fn on_key(&mut self, key: Key) -> Control {
        match key {
            Key::Escape => {
                self.on_close();
                Control::Closed
            },
            Key::Other => Control::Continue,
        }
    }

    /// Returns `true` if the worker was waiting for the press
    pub fn on_mouse_press(&mut self, press: MousePress) -> bool {
        self.state == WindowState::Shown && self.window.mouse().deliver(press)
    }

    /// Shut the window down.
    ///
    /// Wakes every blocked call on the worker, asks the worker to stop and waits
    /// up to the close grace period for it to do so. Returns how the worker
    /// ended, or `None` if it never started or had to be detached.
    pub fn on_close(&mut self) -> Option<WorkerExit> {
        if matches!(self.state, WindowState::Closing | WindowState::Closed) {
            return self.worker.exit();
        }

        log::debug!("window {:?} closing", self.window.title());
        self.state = WindowState::Closing;
        self.ticking = false;

        self.window.guard().request();
        self.window.gate().shut_down();
        self.window.mouse().shut_down();
        drop(self.window.take_text_requests());

        let exit = self.worker.join_timeout(self.config().close_grace);
        if let Some(exit) = exit {
            log::info!("worker of {:?} ended: {exit:?}", self.window.title());
        }

        self.state = WindowState::Closed;
        log::debug!("window {:?} closed", self.window.title());
        exit
    }

    /// How the worker ended, if it has
    pub fn worker_exit(&mut self) -> Option<WorkerExit> {
        self.worker.poll()
    }
}

impl Drop for RenderLoop {
    fn drop(&mut self) {
        self.on_close();
    }
}
