//! Raw byte input worker
//!
//! One thread reads the caller's input a byte at a time and forwards each
//! byte to the main loop. The worker stops after the first read failure, at
//! end of input, once the done signal has fired, or when the main loop has
//! dropped its receiver. A read that is already blocked cannot be cancelled,
//! so the worker is never joined; it exits at its next byte or with the
//! process.

use log::{debug, error};
use std::io::{ErrorKind, Read};
use std::thread::{self, JoinHandle};

use crate::events::{EventSender, SessionEvent};
use crate::signal::DoneSignal;

/// Spawn the input worker over `source`
pub fn spawn_reader<R>(
    source: R,
    events: EventSender,
    done: DoneSignal,
) -> std::io::Result<JoinHandle<()>>
where
    R: Read + Send + 'static,
{
    thread::Builder::new()
        .name("door-input".to_string())
        .spawn(move || read_bytes(source, events, done))
}

/// Forward bytes from `source` until it fails, ends, or the session is done
pub fn read_bytes<R: Read>(mut source: R, events: EventSender, done: DoneSignal) {
    let mut buf = [0u8; 1];
    loop {
        if done.is_fired() {
            debug!("Input worker: done signal seen");
            return;
        }
        match source.read(&mut buf) {
            Ok(0) => {
                debug!("Input worker: end of input");
                let _ = events.send(SessionEvent::InputClosed);
                return;
            }
            Ok(_) => {
                if done.is_fired() {
                    return;
                }
                if events.send(SessionEvent::Byte(buf[0])).is_err() {
                    debug!("Input worker: session gone");
                    return;
                }
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                error!("Input read failed: {}", e);
                let _ = events.send(SessionEvent::InputFailed(e.to_string()));
                return;
            }
        }
    }
}
