//! Done signal shared between the main loop and its workers
//!
//! Firing is check-before-close: the first `fire` closes the signal and wakes
//! every waiter, later calls see it already closed and do nothing.

use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default)]
pub struct DoneSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl DoneSignal {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        self.inner
            .0
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Close the signal. Returns true only for the call that closed it.
    pub fn fire(&self) -> bool {
        let mut fired = self.lock();
        if *fired {
            return false;
        }
        *fired = true;
        self.inner.1.notify_all();
        true
    }

    pub fn is_fired(&self) -> bool {
        *self.lock()
    }

    /// Block until fired or `timeout` elapses; returns whether it fired
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut fired = self.lock();
        while !*fired {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            fired = match self.inner.1.wait_timeout(fired, deadline - now) {
                Ok((guard, _)) => guard,
                Err(poisoned) => poisoned.into_inner().0,
            };
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn fire_twice_is_a_no_op() {
        let done = DoneSignal::new();
        assert!(!done.is_fired());
        assert!(done.fire());
        assert!(!done.fire());
        assert!(done.is_fired());
    }

    #[test]
    fn wait_times_out_when_not_fired() {
        let done = DoneSignal::new();
        assert!(!done.wait_timeout(Duration::from_millis(10)));
    }

    #[test]
    fn wait_wakes_on_fire_from_other_thread() {
        let done = DoneSignal::new();
        let remote = done.clone();
        let worker = thread::spawn(move || remote.wait_timeout(Duration::from_secs(10)));
        thread::sleep(Duration::from_millis(20));
        done.fire();
        assert!(worker.join().unwrap());
    }
}
