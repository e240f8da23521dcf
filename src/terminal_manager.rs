//! Terminal manager that creates the appropriate terminal implementation
//!
//! Callers connected through a BBS get the crossterm terminal. Piped or
//! redirected runs get a headless terminal that echoes plain text, so the
//! game can be scripted from a shell.

use crate::terminal_crossterm::CrosstermTerminal;
use crate::terminal_headless::HeadlessTerminal;
use crate::terminal_logging::LoggingTerminal;
use crate::terminal_trait::Terminal;

use log::debug;
use std::path::Path;

/// Environment capabilities relevant to terminal selection
#[derive(Debug)]
pub struct TerminalCapabilities {
    pub stdin_is_tty: bool,
    pub stdout_is_tty: bool,
}

impl TerminalCapabilities {
    pub fn detect() -> Self {
        Self {
            stdin_is_tty: atty::is(atty::Stream::Stdin),
            stdout_is_tty: atty::is(atty::Stream::Stdout),
        }
    }

    /// Raw mode only makes sense when a person is typing at a terminal
    pub fn is_interactive(&self) -> bool {
        self.stdin_is_tty && self.stdout_is_tty
    }
}

/// Create a terminal for the detected environment
pub fn create_terminal(caps: &TerminalCapabilities, art_dir: &Path) -> Box<dyn Terminal> {
    debug!("Terminal capabilities: {:?}", caps);

    let terminal: Box<dyn Terminal> = if caps.stdout_is_tty {
        debug!("Using crossterm terminal, art from {}", art_dir.display());
        Box::new(CrosstermTerminal::new(art_dir))
    } else {
        debug!("Using echoing headless terminal");
        Box::new(HeadlessTerminal::echoing())
    };

    if std::env::var("DOOR_TERM_LOG").is_ok() {
        debug!("Wrapping terminal with logging");
        return Box::new(LoggingTerminal::new(terminal));
    }

    terminal
}
