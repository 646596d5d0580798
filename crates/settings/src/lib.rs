//! Command line configuration for the easel binary

mod cli;

use std::{ffi::OsString, time::Duration};

use canvas::WindowConfig;
use clap::Parser;

/// The demo drawing functions that can be opened
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Demo {
    /// Lines fanning out from a corner
    Fan,

    /// Color gradient drawn as rectangles
    Gradient,

    /// A rotating line, animated with sync
    Spinner,

    /// Aligned text
    Hello,

    /// Draw circles where the mouse is clicked
    Clicks,
}

impl Demo {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Fan => "fan",
            Self::Gradient => "gradient",
            Self::Spinner => "spinner",
            Self::Hello => "hello",
            Self::Clicks => "clicks",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub demos: Vec<Demo>,
    pub width: usize,
    pub height: usize,
    pub paint_interval: Duration,

    /// Overrides the per-demo window title
    pub title: Option<String>,
}

impl Settings {
    /// Read the settings from the process arguments, exiting on invalid input
    #[must_use]
    pub fn init() -> Self {
        let mut settings = Self::default();
        cli::Arguments::parse().update_settings(&mut settings);
        settings
    }

    pub fn try_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let mut settings = Self::default();
        cli::Arguments::try_parse_from(args)?.update_settings(&mut settings);
        Ok(settings)
    }

    /// The configuration of the window showing `demo`
    #[must_use]
    pub fn window_config(&self, demo: Demo) -> WindowConfig {
        let title = self.title.as_deref().unwrap_or(demo.name());

        WindowConfig::default()
            .with_size(self.width, self.height)
            .with_title(title)
            .with_paint_interval(self.paint_interval)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            demos: vec![Demo::Fan],
            width: WindowConfig::DEFAULT_WIDTH,
            height: WindowConfig::DEFAULT_HEIGHT,
            paint_interval: WindowConfig::DEFAULT_PAINT_INTERVAL,
            title: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_arguments() {
        let settings = Settings::try_from_args(["easel"]).unwrap();
        assert_eq!(settings, Settings::default());

        let config = settings.window_config(Demo::Fan);
        assert_eq!(config.title, "fan");
        assert_eq!((config.width(), config.height()), (640, 480));
    }

    #[test]
    fn several_demos_and_overrides() {
        let settings = Settings::try_from_args([
            "easel",
            "spinner",
            "clicks",
            "--width",
            "320",
            "--height",
            "200",
            "--interval",
            "10",
            "--title",
            "mine",
        ])
        .unwrap();

        assert_eq!(settings.demos, vec![Demo::Spinner, Demo::Clicks]);

        let config = settings.window_config(Demo::Clicks);
        assert_eq!((config.width(), config.height()), (320, 200));
        assert_eq!(config.paint_interval, Duration::from_millis(10));
        assert_eq!(config.title, "mine");
    }

    #[test]
    fn invalid_arguments_are_rejected() {
        assert!(Settings::try_from_args(["easel", "no-such-demo"]).is_err());
        assert!(Settings::try_from_args(["easel", "--width", "0"]).is_err());
        assert!(Settings::try_from_args(["easel", "--interval", "0"]).is_err());
    }
}
