mod chrome;
mod demos;

use std::{panic, process::ExitCode, thread};

use settings::Settings;

pub fn main() -> ExitCode {
    // Drawing functions run on their own threads, say which one went down
    let previous_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let thread = thread::current();
        eprintln!(
            "The thread {:?} has panicked.\n",
            thread.name().unwrap_or("<unnamed>")
        );
        previous_hook(info);
    }));

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::init();
    chrome::run(&settings)
}
