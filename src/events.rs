//! Events delivered to the session's main loop
//!
//! The input worker and the countdown worker share one channel, so the main
//! loop waits on a single receiver and applies events strictly one at a time.

use std::sync::mpsc;

use crate::countdown::CountdownSignal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// One raw byte from the caller
    Byte(u8),
    /// Input reached end of file (caller hung up or pipe drained)
    InputClosed,
    /// Reading input failed; the reader has stopped
    InputFailed(String),
    /// A signal from the countdown started as `epoch`
    Countdown { epoch: u64, signal: CountdownSignal },
}

pub type EventSender = mpsc::Sender<SessionEvent>;
pub type EventReceiver = mpsc::Receiver<SessionEvent>;

pub fn channel() -> (EventSender, EventReceiver) {
    mpsc::channel()
}
