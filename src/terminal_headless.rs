//! Headless terminal implementation for testing and non-interactive runs
//!
//! Every operation is recorded instead of drawn, so tests can inspect what
//! a caller would have seen and count how often screens were set up.

use crate::terminal_trait::{Terminal, TerminalError, Tone};
use log::debug;

/// One recorded terminal operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalOp {
    Clear,
    MoveCursor(u16, u16),
    Print(String),
    EraseLine,
    ShowCursor(bool),
    Art(String),
}

#[derive(Debug)]
pub struct HeadlessTerminal {
    ops: Vec<TerminalOp>,
    cursor: (u16, u16),
    /// Echo printed text to stdout instead of recording (piped local play)
    echo: bool,
}

impl HeadlessTerminal {
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            cursor: (1, 1),
            echo: false,
        }
    }

    /// A headless terminal that writes plain text to stdout and keeps no history
    pub fn echoing() -> Self {
        Self {
            echo: true,
            ..Self::new()
        }
    }

    fn record(&mut self, op: TerminalOp) {
        if !self.echo {
            self.ops.push(op);
        }
    }

    pub fn ops(&self) -> &[TerminalOp] {
        &self.ops
    }

    /// Last cursor position requested (column, row)
    pub fn cursor(&self) -> (u16, u16) {
        self.cursor
    }

    /// All printed text, in order, one print per line
    pub fn transcript(&self) -> String {
        self.ops
            .iter()
            .filter_map(|op| match op {
                TerminalOp::Print(text) => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Whether any print contained `needle`
    pub fn printed(&self, needle: &str) -> bool {
        self.ops.iter().any(|op| match op {
            TerminalOp::Print(text) => text.contains(needle),
            _ => false,
        })
    }

    /// Number of prints containing `needle`
    pub fn print_count(&self, needle: &str) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, TerminalOp::Print(text) if text.contains(needle)))
            .count()
    }

    pub fn clear_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, TerminalOp::Clear))
            .count()
    }

    pub fn art_shown(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                TerminalOp::Art(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Default for HeadlessTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal for HeadlessTerminal {
    fn clear_screen(&mut self) -> Result<(), TerminalError> {
        self.record(TerminalOp::Clear);
        self.cursor = (1, 1);
        Ok(())
    }

    fn move_cursor(&mut self, col: u16, row: u16) -> Result<(), TerminalError> {
        self.cursor = (col, row);
        self.record(TerminalOp::MoveCursor(col, row));
        Ok(())
    }

    fn print(&mut self, text: &str, _tone: Tone) -> Result<(), TerminalError> {
        if self.echo {
            println!("{}", text);
        }
        self.cursor.0 = self.cursor.0.saturating_add(text.chars().count() as u16);
        self.record(TerminalOp::Print(text.to_string()));
        Ok(())
    }

    fn echo_char(&mut self, ch: char) -> Result<(), TerminalError> {
        // Piped input was never typed, so there is nothing to echo back
        if !self.echo {
            self.print(&ch.to_string(), Tone::Normal)?;
        }
        Ok(())
    }

    fn erase_line(&mut self) -> Result<(), TerminalError> {
        self.record(TerminalOp::EraseLine);
        Ok(())
    }

    fn show_cursor(&mut self, visible: bool) -> Result<(), TerminalError> {
        self.record(TerminalOp::ShowCursor(visible));
        Ok(())
    }

    fn show_art(&mut self, name: &str) -> Result<(), TerminalError> {
        debug!("Headless: show_art({})", name);
        self.record(TerminalOp::Art(name.to_string()));
        Ok(())
    }

    fn flush(&mut self) -> Result<(), TerminalError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_prints_and_clears() {
        let mut term = HeadlessTerminal::new();
        term.clear_screen().unwrap();
        term.print_at(4, 22, "Hurry!", Tone::Yellow).unwrap();
        term.print("again", Tone::Normal).unwrap();

        assert_eq!(term.clear_count(), 1);
        assert!(term.printed("Hurry"));
        assert_eq!(term.transcript(), "Hurry!\nagain");
        assert_eq!(
            &term.ops()[1..3],
            &[TerminalOp::MoveCursor(4, 22), TerminalOp::EraseLine]
        );
    }

    #[test]
    fn print_advances_cursor_column() {
        let mut term = HeadlessTerminal::new();
        term.move_cursor(4, 24).unwrap();
        term.print("abc", Tone::Normal).unwrap();
        assert_eq!(term.cursor(), (7, 24));
    }
}
