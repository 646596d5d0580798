use std::time::Duration;

use crate::{Demo, Settings};

#[derive(clap::Parser, Debug)]
#[command(
    name = "easel",
    version,
    about = "Small drawing programs, one window each",
    long_about = None
)]
pub struct Arguments {
    /// Demos to open, each in its own window
    #[arg(value_enum)]
    demos: Vec<Demo>,

    /// Canvas width in pixels
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=8192))]
    width: Option<u32>,

    /// Canvas height in pixels
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=8192))]
    height: Option<u32>,

    /// Milliseconds between two repaints
    #[arg(long, value_parser = parse_interval)]
    interval: Option<Duration>,

    /// Window title, defaults to the name of the demo
    #[arg(long)]
    title: Option<String>,
}

impl Arguments {
    pub(crate) fn update_settings(self, settings: &mut Settings) {
        if !self.demos.is_empty() {
            settings.demos = self.demos;
        }

        if let Some(width) = self.width {
            settings.width = width as usize;
        }

        if let Some(height) = self.height {
            settings.height = height as usize;
        }

        if let Some(interval) = self.interval {
            settings.paint_interval = interval;
        }

        if self.title.is_some() {
            settings.title = self.title;
        }
    }
}

fn parse_interval(s: &str) -> Result<Duration, String> {
    let milliseconds: u64 = s.parse().map_err(|e| format!("{e}"))?;
    if milliseconds == 0 {
        return Err(String::from("the paint interval must be at least one millisecond"));
    }
    Ok(Duration::from_millis(milliseconds))
}
