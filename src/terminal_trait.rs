//! Core terminal trait for door game output
//!
//! The game core never writes escape sequences itself. It asks a terminal
//! implementation to clear, move the cursor, print and show art, whether that
//! terminal is a real ANSI caller connection or a headless recorder in tests.

use std::fmt;

/// Foreground colours the game uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Normal,
    Green,
    Red,
    Yellow,
    White,
}

/// Output operations the game needs from a terminal
pub trait Terminal {
    /// Clear the entire screen and home the cursor
    fn clear_screen(&mut self) -> Result<(), TerminalError>;

    /// Move the cursor (1-based column and row, like ANSI CUP)
    fn move_cursor(&mut self, col: u16, row: u16) -> Result<(), TerminalError>;

    /// Print text at the cursor using the given tone
    fn print(&mut self, text: &str, tone: Tone) -> Result<(), TerminalError>;

    /// Echo one typed character back to the caller
    fn echo_char(&mut self, ch: char) -> Result<(), TerminalError> {
        let mut buf = [0u8; 4];
        self.print(ch.encode_utf8(&mut buf), Tone::Normal)
    }

    /// Erase from the cursor to the end of the line
    fn erase_line(&mut self) -> Result<(), TerminalError>;

    /// Show or hide the cursor
    fn show_cursor(&mut self, visible: bool) -> Result<(), TerminalError>;

    /// Render a named art file
    fn show_art(&mut self, name: &str) -> Result<(), TerminalError>;

    /// Push buffered output to the caller
    fn flush(&mut self) -> Result<(), TerminalError>;

    /// Print at a position, clearing the rest of that line first
    fn print_at(&mut self, col: u16, row: u16, text: &str, tone: Tone) -> Result<(), TerminalError> {
        self.move_cursor(col, row)?;
        self.erase_line()?;
        self.print(text, tone)
    }
}

impl Terminal for Box<dyn Terminal> {
    fn clear_screen(&mut self) -> Result<(), TerminalError> {
        (**self).clear_screen()
    }

    fn move_cursor(&mut self, col: u16, row: u16) -> Result<(), TerminalError> {
        (**self).move_cursor(col, row)
    }

    fn print(&mut self, text: &str, tone: Tone) -> Result<(), TerminalError> {
        (**self).print(text, tone)
    }

    fn echo_char(&mut self, ch: char) -> Result<(), TerminalError> {
        (**self).echo_char(ch)
    }

    fn erase_line(&mut self) -> Result<(), TerminalError> {
        (**self).erase_line()
    }

    fn show_cursor(&mut self, visible: bool) -> Result<(), TerminalError> {
        (**self).show_cursor(visible)
    }

    fn show_art(&mut self, name: &str) -> Result<(), TerminalError> {
        (**self).show_art(name)
    }

    fn flush(&mut self) -> Result<(), TerminalError> {
        (**self).flush()
    }
}

/// Terminal error type
#[derive(Debug, Clone)]
pub struct TerminalError {
    pub message: String,
}

impl TerminalError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for TerminalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Terminal error: {}", self.message)
    }
}

impl std::error::Error for TerminalError {}

impl From<std::io::Error> for TerminalError {
    fn from(error: std::io::Error) -> Self {
        Self::new(format!("I/O error: {}", error))
    }
}
