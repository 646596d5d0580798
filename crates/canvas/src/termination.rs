//! Cooperative termination of the worker thread.
//!
//! The owning thread never kills the worker. It [requests](TerminationGuard::request)
//! termination, and the worker honours the request at its next
//! [checkpoint](TerminationGuard::checkpoint). Checkpoints are inert while the worker
//! is inside a [CriticalSection], which is the case whenever it holds the
//! framebuffer lock or waits on another thread.

use std::{
    marker::PhantomData,
    panic,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        OnceLock,
    },
    thread::{self, ThreadId},
};

/// Unwind payload used to stop the worker thread at a safe point
pub(crate) struct TerminationUnwind;

#[derive(Debug, Default)]
pub struct TerminationGuard {
    /// Number of nested critical sections the worker is currently in
    depth: AtomicUsize,
    requested: AtomicBool,
    worker: OnceLock<ThreadId>,
}

/// Marks a region in which the worker must not be terminated.
///
/// Dropping the section leaves it.
#[must_use = "the critical section ends as soon as this is dropped"]
pub struct CriticalSection<'a> {
    guard: &'a TerminationGuard,

    // Critical sections belong to the thread that entered them
    _not_send: PhantomData<*const ()>,
}

impl TerminationGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the calling thread as the one that checkpoints may stop
    pub(crate) fn bind_to_current_thread(&self) {
        if self.worker.set(thread::current().id()).is_err() {
            log::warn!("termination guard is already bound to a worker thread");
        }
    }

    /// Enter a critical section. Sections nest.
    pub fn enter(&self) -> CriticalSection<'_> {
        if self.depth.fetch_add(1, Ordering::SeqCst) == 0 {
            log::trace!("worker termination disabled");
        }

        CriticalSection {
            guard: self,
            _not_send: PhantomData,
        }
    }

    fn leave(&self) {
        match self
            .depth
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |depth| {
                depth.checked_sub(1)
            }) {
            Ok(1) => log::trace!("worker termination enabled"),
            Ok(_) => {},
            Err(_) => panic!("left a critical section that was never entered"),
        }
    }

    /// Current nesting depth; termination is only possible at zero
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn is_terminable(&self) -> bool {
        self.depth() == 0
    }

    /// Ask the worker to stop at its next safe point. Called by the owning thread.
    pub fn request(&self) {
        if !self.requested.swap(true, Ordering::SeqCst) {
            log::debug!("worker termination requested at depth {}", self.depth());
        }
    }

    #[must_use]
    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Whether a checkpoint on the current thread would stop it right now
    #[must_use]
    pub fn would_terminate(&self) -> bool {
        self.is_requested()
            && self.is_terminable()
            && self.worker.get() == Some(&thread::current().id())
    }

    /// A safe point for the worker thread.
    ///
    /// If termination was requested and the worker is outside of every critical
    /// section, this unwinds the worker thread. On any other thread it does nothing.
    pub fn checkpoint(&self) {
        if self.would_terminate() {
            log::debug!("worker reached a safe point, terminating");
            panic::resume_unwind(Box::new(TerminationUnwind));
        }
    }
}

impl Drop for CriticalSection<'_> {
    fn drop(&mut self) {
        self.guard.leave();
    }
}
