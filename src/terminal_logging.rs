//! Logging wrapper for terminal implementations
//!
//! Logs every terminal operation, useful when a caller's screen goes wrong.

use crate::terminal_trait::{Terminal, TerminalError, Tone};
use log::info;

pub struct LoggingTerminal {
    inner: Box<dyn Terminal>,
    op_count: usize,
}

impl LoggingTerminal {
    pub fn new(inner: Box<dyn Terminal>) -> Self {
        info!("=== TERMINAL LOGGING STARTED ===");
        Self { inner, op_count: 0 }
    }

    fn log_op(&mut self, op: &str) {
        self.op_count += 1;
        info!("[OP {:04}] {}", self.op_count, op);
    }
}

impl Terminal for LoggingTerminal {
    fn clear_screen(&mut self) -> Result<(), TerminalError> {
        self.log_op("clear_screen()");
        self.inner.clear_screen()
    }

    fn move_cursor(&mut self, col: u16, row: u16) -> Result<(), TerminalError> {
        self.log_op(&format!("move_cursor({}, {})", col, row));
        self.inner.move_cursor(col, row)
    }

    fn print(&mut self, text: &str, tone: Tone) -> Result<(), TerminalError> {
        let preview = text
            .chars()
            .take(50)
            .collect::<String>()
            .replace('\n', "\\n")
            .replace('\r', "\\r");
        self.log_op(&format!("print('{}', {:?})", preview, tone));
        self.inner.print(text, tone)
    }

    fn echo_char(&mut self, ch: char) -> Result<(), TerminalError> {
        self.log_op(&format!("echo_char({:?})", ch));
        self.inner.echo_char(ch)
    }

    fn erase_line(&mut self) -> Result<(), TerminalError> {
        self.log_op("erase_line()");
        self.inner.erase_line()
    }

    fn show_cursor(&mut self, visible: bool) -> Result<(), TerminalError> {
        self.log_op(&format!("show_cursor({})", visible));
        self.inner.show_cursor(visible)
    }

    fn show_art(&mut self, name: &str) -> Result<(), TerminalError> {
        self.log_op(&format!("show_art('{}')", name));
        self.inner.show_art(name)
    }

    fn flush(&mut self) -> Result<(), TerminalError> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal_headless::HeadlessTerminal;

    #[test]
    fn forwards_to_inner_terminal() {
        let mut term = LoggingTerminal::new(Box::new(HeadlessTerminal::new()));
        term.clear_screen().unwrap();
        term.print_at(1, 1, "TIMER", Tone::Green).unwrap();
        assert_eq!(term.op_count, 4);
    }
}
