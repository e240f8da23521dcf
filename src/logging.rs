//! File logging
//!
//! Log lines go to a file, never to the caller's screen. Each line carries a
//! tag: INPUT for player input (records with target `input`), WARNING and
//! ERROR for problems, and the level name otherwise.

use env_logger::{Builder, Env, Target};
use log::Level;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::error::DoorError;

/// Log target for player input events
pub const INPUT_TARGET: &str = "input";

pub fn tag_for(target: &str, level: Level) -> &'static str {
    if target == INPUT_TARGET {
        return "INPUT";
    }
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARNING",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}

/// Send all logging to `path`, appending. `RUST_LOG` overrides the filter.
pub fn init(path: &Path) -> Result<(), DoorError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| DoorError::Logging(format!("{}: {}", path.display(), e)))?;

    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {} {}",
                buf.timestamp_seconds(),
                tag_for(record.target(), record.level()),
                record.args()
            )
        })
        .try_init()
        .map_err(|e| DoorError::Logging(e.to_string()))
}
