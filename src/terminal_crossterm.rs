//! Direct crossterm-based terminal for ANSI callers
//!
//! Output is queued and flushed explicitly. Art files are streamed to the
//! caller as raw bytes since door art is already ANSI-encoded.

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use log::{debug, warn};
use std::fs;
use std::io::{self, Stdout, Write};
use std::path::PathBuf;

use crate::terminal_trait::{Terminal, TerminalError, Tone};

pub struct CrosstermTerminal {
    stdout: Stdout,
    art_dir: PathBuf,
}

impl CrosstermTerminal {
    pub fn new(art_dir: impl Into<PathBuf>) -> Self {
        CrosstermTerminal {
            stdout: io::stdout(),
            art_dir: art_dir.into(),
        }
    }
}

fn tone_color(tone: Tone) -> Option<Color> {
    match tone {
        Tone::Normal => None,
        Tone::Green => Some(Color::Green),
        Tone::Red => Some(Color::Red),
        Tone::Yellow => Some(Color::Yellow),
        Tone::White => Some(Color::White),
    }
}

impl Terminal for CrosstermTerminal {
    fn clear_screen(&mut self) -> Result<(), TerminalError> {
        queue!(self.stdout, ResetColor, Clear(ClearType::All), MoveTo(0, 0))?;
        Ok(())
    }

    fn move_cursor(&mut self, col: u16, row: u16) -> Result<(), TerminalError> {
        queue!(
            self.stdout,
            MoveTo(col.saturating_sub(1), row.saturating_sub(1))
        )?;
        Ok(())
    }

    fn print(&mut self, text: &str, tone: Tone) -> Result<(), TerminalError> {
        match tone_color(tone) {
            Some(color) => queue!(
                self.stdout,
                SetForegroundColor(color),
                Print(text),
                ResetColor
            )?,
            None => queue!(self.stdout, Print(text))?,
        }
        Ok(())
    }

    fn erase_line(&mut self) -> Result<(), TerminalError> {
        queue!(self.stdout, Clear(ClearType::UntilNewLine))?;
        Ok(())
    }

    fn show_cursor(&mut self, visible: bool) -> Result<(), TerminalError> {
        if visible {
            queue!(self.stdout, Show)?;
        } else {
            queue!(self.stdout, Hide)?;
        }
        Ok(())
    }

    fn show_art(&mut self, name: &str) -> Result<(), TerminalError> {
        let path = self.art_dir.join(name);
        match fs::read(&path) {
            Ok(bytes) => {
                debug!("Rendering art {} ({} bytes)", path.display(), bytes.len());
                self.stdout.write_all(&bytes)?;
            }
            Err(e) => {
                // Missing art is cosmetic, the game carries on without it
                warn!("Cannot load art {}: {}", path.display(), e);
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), TerminalError> {
        self.stdout.flush()?;
        Ok(())
    }
}

/// Holds the terminal in raw mode and restores it when dropped
///
/// Restoration runs on every exit path that unwinds through the guard,
/// including errors propagated out of the session loop.
pub struct RawModeGuard {
    active: bool,
}

impl RawModeGuard {
    pub fn enable() -> Result<Self, TerminalError> {
        terminal::enable_raw_mode()
            .map_err(|e| TerminalError::new(format!("Failed to enable raw mode: {}", e)))?;
        debug!("Raw mode enabled");
        Ok(RawModeGuard { active: true })
    }

    /// Restore cooked mode now; later calls and the drop are no-ops
    pub fn restore(&mut self) {
        if self.active {
            let mut stdout = io::stdout();
            let _ = queue!(stdout, ResetColor, Show);
            let _ = stdout.flush();
            let _ = terminal::disable_raw_mode();
            self.active = false;
            debug!("Raw mode restored");
        }
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        self.restore();
    }
}
