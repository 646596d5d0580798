mod desktop;

pub use desktop::run;

#[derive(Debug, thiserror::Error)]
pub enum ChromeError {
    #[error("failed to create the event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create a window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("failed to set up the pixel buffer: {0}")]
    Surface(#[from] softbuffer::SoftBufferError),

    #[error("cannot open a window with an empty canvas")]
    EmptyCanvas,
}
