//! A drawing window for programs that want to draw from a plain, blocking function.
//!
//! The user supplies one drawing function. It runs on its own worker thread and
//! draws into a shared [FrameBuffer] through a [DrawingWindow] handle. The thread
//! that owns the on-screen window drives a [RenderLoop], which periodically
//! repaints whatever changed since the last frame.
//!
//! ```text
//! worker thread                         owning thread
//! -------------                         -------------
//! draw_*  ─┬─ lock FrameBuffer           on_tick ── lock, take dirty region ── present
//!          └─ mark dirty region
//! sync()  ──── post Request::Sync ─────► on_request ── repaint ── acknowledge
//!          ◄─── wake ──────────────────────────────────────────────┘
//! ```
//!
//! Closing the window sets the shutdown flag, wakes every blocked call and asks
//! the worker to terminate. The worker only honours that request outside of
//! critical sections (see [TerminationGuard]).

mod config;
mod dirty;
mod event;
mod frame_buffer;
mod headless;
mod mouse;
pub mod raster;
mod render_loop;
mod sync;
mod termination;
mod text;
mod window;
mod worker;

pub use config::WindowConfig;
pub use dirty::DirtyRegion;
pub use event::{Control, Key, MouseButton, MousePress, PostError, Poster, Request};
pub use frame_buffer::{Frame, FrameBuffer};
pub use headless::{HeadlessLoop, RecordingSurface, Ticking};
pub use mouse::MouseWaiter;
pub use render_loop::{RenderLoop, Surface, WindowState};
pub use sync::{GatePhase, SyncGate, Ticket};
pub use termination::{CriticalSection, TerminationGuard};
pub use text::{Alignment, TextRequest};
pub use window::DrawingWindow;
pub use worker::{IntoExitCode, WorkerExit, WorkerThread};

pub use math::{Color, ParseColorError, Rectangle, Vec2D};
