use std::{
    sync::{Condvar, Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant},
};

use crate::MousePress;

#[derive(Debug, Default)]
struct MouseState {
    waiting: bool,
    press: Option<MousePress>,
    shut_down: bool,
}

/// Hands a single mouse press from the owning thread to a waiting worker.
///
/// Presses that happen while nobody waits are dropped.
#[derive(Debug, Default)]
pub struct MouseWaiter {
    state: Mutex<MouseState>,
    condition: Condvar,
}

impl MouseWaiter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MouseState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Block until the next mouse press.
    ///
    /// Returns `None` if `timeout` elapses first or the window shuts down.
    pub fn wait(&self, timeout: Option<Duration>) -> Option<MousePress> {
        let deadline = timeout.map(|timeout| Instant::now() + timeout);
        let mut state = self.lock();
        state.waiting = true;
        state.press = None;

        let press = loop {
            if let Some(press) = state.press.take() {
                break Some(press);
            }

            if state.shut_down {
                break None;
            }

            state = match deadline {
                None => self
                    .condition
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner),
                Some(deadline) => {
                    let now = Instant::now();
                    if deadline <= now {
                        break None;
                    }
                    self.condition
                        .wait_timeout(state, deadline - now)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0
                },
            };
        };

        state.waiting = false;
        press
    }

    /// Offer a press to the waiting worker. Returns `true` if someone took it.
    pub fn deliver(&self, press: MousePress) -> bool {
        let mut state = self.lock();
        if !state.waiting || state.press.is_some() {
            return false;
        }

        state.press = Some(press);
        self.condition.notify_all();
        true
    }

    #[must_use]
    pub fn is_waiting(&self) -> bool {
        self.lock().waiting
    }

    pub fn shut_down(&self) {
        let mut state = self.lock();
        state.shut_down = true;
        self.condition.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MouseButton;

    use std::{sync::Arc, thread};

    const PRESS: MousePress = MousePress {
        x: 3,
        y: 4,
        button: MouseButton::Left,
    };

    #[test]
    fn presses_without_a_waiter_are_dropped() {
        let waiter = MouseWaiter::new();
        assert!(!waiter.deliver(PRESS));
        assert_eq!(waiter.wait(Some(Duration::from_millis(10))), None);
    }

    #[test]
    fn waiter_receives_press() {
        let waiter = Arc::new(MouseWaiter::new());

        let worker = {
            let waiter = waiter.clone();
            thread::spawn(move || waiter.wait(None))
        };

        while !waiter.is_waiting() {
            thread::yield_now();
        }
        assert!(waiter.deliver(PRESS));
        assert_eq!(worker.join().unwrap(), Some(PRESS));
        assert!(!waiter.is_waiting());
    }

    #[test]
    fn shutdown_wakes_waiter() {
        let waiter = Arc::new(MouseWaiter::new());

        let worker = {
            let waiter = waiter.clone();
            thread::spawn(move || waiter.wait(None))
        };

        while !waiter.is_waiting() {
            thread::yield_now();
        }
        waiter.shut_down();
        assert_eq!(worker.join().unwrap(), None);
    }
}
