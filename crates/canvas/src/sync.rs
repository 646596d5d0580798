//! A blocking rendezvous between the worker thread and the owning thread.
//!
//! The worker reserves a [Ticket], posts it to the owning thread and waits. The
//! owning thread repaints and [acknowledges](SyncGate::acknowledge) the ticket,
//! which wakes the worker. Shutting the gate down fails every current and future
//! wait.
//!
//! ```text
//! Idle ──begin──► RequestPending ──acknowledge──► Acknowledged ──wait returns──► Idle
//!                      │
//!                      └──── timeout / shutdown ───────────────────────────────► Idle
//! ```

use std::{
    sync::{Condvar, Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GatePhase {
    Idle,
    RequestPending,
    Acknowledged,
}

/// Identifies one request/acknowledge cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

#[derive(Debug)]
struct GateState {
    phase: GatePhase,

    /// The most recently issued ticket
    issued: u64,

    /// The most recently acknowledged ticket
    acknowledged: u64,

    shut_down: bool,
}

#[derive(Debug)]
pub struct SyncGate {
    state: Mutex<GateState>,
    condition: Condvar,
}

impl SyncGate {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(GateState {
                phase: GatePhase::Idle,
                issued: 0,
                acknowledged: 0,
                shut_down: false,
            }),
            condition: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn phase(&self) -> GatePhase {
        self.lock().phase
    }

    #[must_use]
    pub fn is_shut_down(&self) -> bool {
        self.lock().shut_down
    }

    /// Reserve a new request.
    ///
    /// Only one request can be outstanding at a time, concurrent callers queue up
    /// here. Returns `None` once the gate is shut down.
    pub fn begin(&self) -> Option<Ticket> {
        let mut state = self
            .condition
            .wait_while(self.lock(), |state| {
                state.phase == GatePhase::RequestPending && !state.shut_down
            })
            .unwrap_or_else(PoisonError::into_inner);

        if state.shut_down {
            return None;
        }

        state.issued += 1;
        state.phase = GatePhase::RequestPending;
        Some(Ticket(state.issued))
    }

    /// Block until `ticket` is acknowledged.
    ///
    /// Returns `false` if `timeout` elapses first or if the gate is shut down while
    /// waiting. `None` waits without a time limit.
    pub fn wait(&self, ticket: Ticket, timeout: Option<Duration>) -> bool {
        let deadline = timeout.map(|timeout| Instant::now() + timeout);
        let mut state = self.lock();

        loop {
            if ticket.0 <= state.acknowledged {
                if state.issued == ticket.0 {
                    state.phase = GatePhase::Idle;
                }
                self.condition.notify_all();
                return true;
            }

            if state.shut_down {
                Self::abandon(&mut state, ticket);
                self.condition.notify_all();
                return false;
            }

            state = match deadline {
                None => self
                    .condition
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner),
                Some(deadline) => {
                    let now = Instant::now();
                    if deadline <= now {
                        log::debug!("sync request {ticket:?} timed out");
                        Self::abandon(&mut state, ticket);
                        self.condition.notify_all();
                        return false;
                    }

                    self.condition
                        .wait_timeout(state, deadline - now)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0
                },
            };
        }
    }

    /// Give up on a request that could not be delivered
    pub fn cancel(&self, ticket: Ticket) {
        let mut state = self.lock();
        Self::abandon(&mut state, ticket);
        self.condition.notify_all();
    }

    fn abandon(state: &mut GateState, ticket: Ticket) {
        if state.issued == ticket.0 && state.phase == GatePhase::RequestPending {
            state.phase = GatePhase::Idle;
        }
    }

    /// Mark `ticket` as done and wake every waiter. Called by the owning thread.
    ///
    /// Acknowledging a ticket whose waiter already gave up has no effect on later tickets.
    pub fn acknowledge(&self, ticket: Ticket) {
        let mut state = self.lock();
        state.acknowledged = state.acknowledged.max(ticket.0);
        if state.issued == ticket.0 && state.phase == GatePhase::RequestPending {
            state.phase = GatePhase::Acknowledged;
        }
        self.condition.notify_all();
    }

    /// Fail all current and future waits. This cannot be undone.
    pub fn shut_down(&self) {
        let mut state = self.lock();
        state.shut_down = true;
        self.condition.notify_all();
    }

    /// Sleep for `duration`, waking early if the gate shuts down.
    ///
    /// Returns `true` if the full duration elapsed.
    pub fn sleep(&self, duration: Duration) -> bool {
        let deadline = Instant::now() + duration;
        let mut state = self.lock();

        loop {
            if state.shut_down {
                return false;
            }

            let now = Instant::now();
            if deadline <= now {
                return true;
            }

            state = self
                .condition
                .wait_timeout(state, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }
}

impl Default for SyncGate {
    fn default() -> Self {
        Self::new()
    }
}
