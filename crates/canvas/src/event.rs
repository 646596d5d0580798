//! Messages exchanged between the worker thread and the owning event loop

use std::sync::mpsc;

use crate::Ticket;

/// A message posted from the worker thread to the owning thread.
///
/// Requests must be delivered in FIFO order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Request {
    /// Repaint everything that changed, then acknowledge the ticket
    Sync(Ticket),

    /// Render all queued text, repaint, then acknowledge the ticket
    Text(Ticket),

    /// Close the window
    Close,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PostError {
    #[error("the owning event loop is gone")]
    Disconnected,
}

/// Asynchronous delivery of [Requests](Request) to the owning thread.
///
/// This is implemented by whatever event loop hosts the window.
pub trait Poster: Send + Sync {
    fn post(&self, request: Request) -> Result<(), PostError>;
}

impl Poster for mpsc::Sender<Request> {
    fn post(&self, request: Request) -> Result<(), PostError> {
        self.send(request).map_err(|_| PostError::Disconnected)
    }
}

/// The keys a drawing window reacts to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    Other(u16),
}

/// A mouse button press, in canvas coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MousePress {
    pub x: i32,
    pub y: i32,
    pub button: MouseButton,
}

/// What the hosting event loop should do with the window after an event
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Control {
    #[default]
    Continue,

    /// The window has shut down and can be destroyed
    Closed,
}
