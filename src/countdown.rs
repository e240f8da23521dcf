//! Countdown timer
//!
//! The countdown runs on its own thread and never touches the screen. It
//! writes the shared remaining time and sends signals to the main loop, which
//! decides what to draw and performs the game-over transition itself.
//!
//! Each countdown carries an epoch. Signals that were already in flight when
//! a countdown was stopped still carry the old epoch, so the main loop can
//! discard them once a newer countdown is running.

use log::{debug, warn};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::events::{EventSender, SessionEvent};
use crate::signal::DoneSignal;

/// What a countdown reports to the main loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownSignal {
    /// Seconds remaining after this tick
    Tick(u32),
    /// Remaining time dropped below the hurry threshold (sent once)
    Hurry,
    /// Remaining time reached zero; the countdown has finished
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownPhase {
    Running,
    Stopped,
    Expired,
}

/// Remaining seconds, shared between the countdown and the session
#[derive(Debug, Clone, Default)]
pub struct RemainingTime(Arc<AtomicU32>);

impl RemainingTime {
    pub fn new(seconds: u32) -> Self {
        RemainingTime(Arc::new(AtomicU32::new(seconds)))
    }

    pub fn get(&self) -> u32 {
        self.0.load(Ordering::SeqCst)
    }

    pub fn set(&self, seconds: u32) {
        self.0.store(seconds, Ordering::SeqCst);
    }
}

/// Tick bookkeeping, independent of threads and clocks
#[derive(Debug, Clone)]
pub struct CountdownState {
    remaining: u32,
    hurry_below: u32,
    hurry_sent: bool,
    phase: CountdownPhase,
}

impl CountdownState {
    pub fn new(initial: u32, hurry_below: u32) -> Self {
        CountdownState {
            remaining: initial,
            hurry_below,
            hurry_sent: false,
            phase: CountdownPhase::Running,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn phase(&self) -> CountdownPhase {
        self.phase
    }

    /// Signals for the moment the countdown starts
    pub fn start(&mut self) -> Vec<CountdownSignal> {
        if self.phase != CountdownPhase::Running {
            return Vec::new();
        }
        let mut signals = vec![CountdownSignal::Tick(self.remaining)];
        self.after_change(&mut signals);
        signals
    }

    /// Advance one tick. Does nothing unless running.
    pub fn advance(&mut self) -> Vec<CountdownSignal> {
        if self.phase != CountdownPhase::Running {
            return Vec::new();
        }
        self.remaining = self.remaining.saturating_sub(1);
        let mut signals = vec![CountdownSignal::Tick(self.remaining)];
        self.after_change(&mut signals);
        signals
    }

    fn after_change(&mut self, signals: &mut Vec<CountdownSignal>) {
        if self.remaining < self.hurry_below && !self.hurry_sent && self.remaining > 0 {
            self.hurry_sent = true;
            signals.push(CountdownSignal::Hurry);
        }
        if self.remaining == 0 {
            self.phase = CountdownPhase::Expired;
            signals.push(CountdownSignal::Expired);
        }
    }

    /// Stop a running countdown; returns false if it had already ended
    pub fn stop(&mut self) -> bool {
        if self.phase == CountdownPhase::Running {
            self.phase = CountdownPhase::Stopped;
            true
        } else {
            false
        }
    }
}

/// Countdown settings
#[derive(Debug, Clone, Copy)]
pub struct CountdownSettings {
    pub initial_secs: u32,
    pub hurry_below_secs: u32,
    pub tick: Duration,
}

/// Handle to a running countdown thread
pub struct CountdownHandle {
    epoch: u64,
    stop: DoneSignal,
    remaining: RemainingTime,
    worker: Option<JoinHandle<()>>,
}

impl CountdownHandle {
    /// Start a countdown thread that reports to `events`
    pub fn start(
        settings: CountdownSettings,
        epoch: u64,
        remaining: RemainingTime,
        events: EventSender,
    ) -> std::io::Result<CountdownHandle> {
        let stop = DoneSignal::new();
        let worker_stop = stop.clone();
        let worker_remaining = remaining.clone();
        remaining.set(settings.initial_secs);

        let worker = thread::Builder::new()
            .name(format!("door-countdown-{}", epoch))
            .spawn(move || {
                run_countdown(settings, epoch, worker_remaining, events, worker_stop)
            })?;

        debug!(
            "Countdown {} started: {}s, tick {:?}",
            epoch, settings.initial_secs, settings.tick
        );
        Ok(CountdownHandle {
            epoch,
            stop,
            remaining,
            worker: Some(worker),
        })
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn remaining(&self) -> u32 {
        self.remaining.get()
    }

    /// Stop the countdown and wait for its thread. Safe to call repeatedly
    /// and after the countdown has expired on its own.
    pub fn stop(&mut self) {
        if self.stop.fire() {
            debug!("Countdown {} stop requested", self.epoch);
        }
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("Countdown {} thread panicked", self.epoch);
            }
        }
    }
}

impl Drop for CountdownHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_countdown(
    settings: CountdownSettings,
    epoch: u64,
    remaining: RemainingTime,
    events: EventSender,
    stop: DoneSignal,
) {
    let mut state = CountdownState::new(settings.initial_secs, settings.hurry_below_secs);
    let mut signals = state.start();

    loop {
        for signal in signals.drain(..) {
            if events.send(SessionEvent::Countdown { epoch, signal }).is_err() {
                debug!("Countdown {}: session gone, exiting", epoch);
                return;
            }
        }
        if state.phase() == CountdownPhase::Expired {
            debug!("Countdown {} expired", epoch);
            return;
        }
        if stop.wait_timeout(settings.tick) {
            state.stop();
            debug!("Countdown {} stopped at {}s", epoch, state.remaining());
            return;
        }
        signals = state.advance();
        remaining.set(state.remaining());
    }
}
