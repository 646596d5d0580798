use std::{
    any::Any,
    io,
    panic::{self, AssertUnwindSafe},
    sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError},
    thread::{self, JoinHandle},
    time::Duration,
};

use crate::{termination::TerminationUnwind, DrawingWindow};

/// Values a drawing function may return
pub trait IntoExitCode {
    fn into_exit_code(self) -> i32;
}

impl IntoExitCode for () {
    fn into_exit_code(self) -> i32 {
        0
    }
}

impl IntoExitCode for i32 {
    fn into_exit_code(self) -> i32 {
        self
    }
}

/// How the worker thread ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkerExit {
    /// The drawing function returned
    Finished(i32),

    /// The worker stopped at a safe point after the window was closed
    Terminated,

    Panicked,
}

type DrawingFunction = Box<dyn FnOnce(&DrawingWindow) -> i32 + Send + 'static>;

/// Runs the user's drawing function exactly once, on its own thread
pub struct WorkerThread {
    function: Option<DrawingFunction>,
    handle: Option<JoinHandle<()>>,
    done: Option<Receiver<WorkerExit>>,
    exit: Option<WorkerExit>,
}

impl WorkerThread {
    pub fn new<F, R>(function: F) -> Self
    where
        F: FnOnce(&DrawingWindow) -> R + Send + 'static,
        R: IntoExitCode,
    {
        Self {
            function: Some(Box::new(move |window| function(window).into_exit_code())),
            handle: None,
            done: None,
            exit: None,
        }
    }

    /// Spawn the worker thread.
    ///
    /// Only the first call does anything; it returns `true` if a thread was started.
    /// If spawning fails the worker counts as started and ends as [WorkerExit::Panicked].
    pub fn start_once(&mut self, window: DrawingWindow, name: &str) -> bool {
        let Some(function) = self.function.take() else {
            log::trace!("worker for {name:?} was already started");
            return false;
        };

        let (sender, receiver) = mpsc::channel();
        let spawned = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                window.guard().bind_to_current_thread();

                let exit = match panic::catch_unwind(AssertUnwindSafe(|| function(&window))) {
                    Ok(code) => {
                        log::info!("drawing function returned {code}");
                        WorkerExit::Finished(code)
                    },
                    Err(payload) if payload.is::<TerminationUnwind>() => {
                        log::info!("worker thread terminated");
                        WorkerExit::Terminated
                    },
                    Err(payload) => {
                        log::error!("drawing function panicked: {}", panic_message(&*payload));
                        WorkerExit::Panicked
                    },
                };

                // The owner may have stopped listening already
                let _ = sender.send(exit);
            });

        self.record_spawn(spawned, receiver, name)
    }

    fn record_spawn(
        &mut self,
        spawned: io::Result<JoinHandle<()>>,
        done: Receiver<WorkerExit>,
        name: &str,
    ) -> bool {
        match spawned {
            Ok(handle) => {
                log::info!("started worker thread {name:?}");
                self.handle = Some(handle);
                self.done = Some(done);
                true
            },
            Err(error) => {
                log::error!("failed to spawn worker thread {name:?}: {error}");
                self.exit = Some(WorkerExit::Panicked);
                false
            },
        }
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.function.is_none()
    }

    /// Check whether the worker has exited, without blocking
    pub fn poll(&mut self) -> Option<WorkerExit> {
        if self.exit.is_none() {
            if let Some(done) = &self.done {
                match done.try_recv() {
                    Ok(exit) => self.finish(exit),
                    Err(TryRecvError::Disconnected) => self.finish(WorkerExit::Panicked),
                    Err(TryRecvError::Empty) => {},
                }
            }
        }
        self.exit
    }

    /// Wait up to `grace` for the worker to exit and join it.
    ///
    /// If it does not exit in time the thread is detached and `None` is returned.
    pub fn join_timeout(&mut self, grace: Duration) -> Option<WorkerExit> {
        if self.exit.is_some() {
            return self.exit;
        }

        let done = self.done.take()?;
        match done.recv_timeout(grace) {
            Ok(exit) => self.finish(exit),
            Err(RecvTimeoutError::Disconnected) => self.finish(WorkerExit::Panicked),
            Err(RecvTimeoutError::Timeout) => {
                log::warn!(
                    "worker thread did not reach a safe point within {grace:?}, detaching it"
                );
                self.handle = None;
            },
        }
        self.exit
    }

    fn finish(&mut self, exit: WorkerExit) {
        self.exit = Some(exit);
        self.done = None;
        if let Some(handle) = self.handle.take() {
            // The thread has already sent its exit status, joining won't block for long
            let _ = handle.join();
        }
    }

    #[must_use]
    pub fn exit(&self) -> Option<WorkerExit> {
        self.exit
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "<non-string panic payload>"
    }
}
