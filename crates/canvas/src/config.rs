use std::time::Duration;

/// Static properties of a drawing window, fixed at construction time
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WindowConfig {
    pub title: String,

    /// Canvas size in pixels, never zero. Set through [with_size](Self::with_size).
    width: usize,
    height: usize,

    /// How often the owning thread looks for unpainted changes
    pub paint_interval: Duration,

    /// How long closing the window waits for the worker to reach a safe point
    pub close_grace: Duration,
}

impl WindowConfig {
    pub const DEFAULT_WIDTH: usize = 640;
    pub const DEFAULT_HEIGHT: usize = 480;

    /// Roughly 30 frames per second
    pub const DEFAULT_PAINT_INTERVAL: Duration = Duration::from_millis(33);

    pub const DEFAULT_CLOSE_GRACE: Duration = Duration::from_secs(1);

    /// Canvas width, in pixels
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Canvas height, in pixels
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// # Panics
    /// Panics if either dimension is zero
    #[must_use]
    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        assert!(
            width != 0 && height != 0,
            "a drawing window needs a non-empty canvas, got {width}x{height}"
        );

        self.width = width;
        self.height = height;
        self
    }

    #[must_use]
    pub fn with_title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_paint_interval(mut self, paint_interval: Duration) -> Self {
        self.paint_interval = paint_interval;
        self
    }

    #[must_use]
    pub fn with_close_grace(mut self, close_grace: Duration) -> Self {
        self.close_grace = close_grace;
        self
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: String::from("Drawing"),
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
            paint_interval: Self::DEFAULT_PAINT_INTERVAL,
            close_grace: Self::DEFAULT_CLOSE_GRACE,
        }
    }
}
