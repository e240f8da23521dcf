//! Line assembly from raw bytes
//!
//! The editor only tracks the buffer. It reports what happened to each byte
//! so the caller can echo, retreat the cursor, or dispatch a finished line.

use log::debug;

const BACKSPACE: u8 = 0x08;
const DELETE: u8 = 0x7f;
const CTRL_C: u8 = 0x03;

/// What a byte did to the line being edited
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEdit {
    /// Character appended; echo it
    Appended(char),
    /// Last character removed; move the cursor back one column
    Erased,
    /// Backspace on an empty buffer
    Ignored,
    /// Carriage return or newline completed the line
    Submitted(String),
    /// Ctrl+C
    Interrupted,
}

#[derive(Debug, Default)]
pub struct LineEditor {
    buffer: String,
}

impl LineEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one byte
    pub fn assemble(&mut self, byte: u8) -> LineEdit {
        match byte {
            b'\r' | b'\n' => {
                let line = std::mem::take(&mut self.buffer);
                debug!("Line submitted: '{}'", line);
                LineEdit::Submitted(line)
            }
            BACKSPACE | DELETE => {
                if self.buffer.pop().is_some() {
                    LineEdit::Erased
                } else {
                    LineEdit::Ignored
                }
            }
            CTRL_C => {
                debug!("Ctrl+C pressed");
                self.buffer.clear();
                LineEdit::Interrupted
            }
            other => {
                let ch = other as char;
                self.buffer.push(ch);
                LineEdit::Appended(ch)
            }
        }
    }

    /// Discard anything typed so far
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(editor: &mut LineEditor, bytes: &[u8]) -> Vec<LineEdit> {
        bytes.iter().map(|b| editor.assemble(*b)).collect()
    }

    #[test]
    fn newline_submits_and_resets() {
        let mut editor = LineEditor::new();
        let edits = feed(&mut editor, b"play\r");
        assert_eq!(edits.last(), Some(&LineEdit::Submitted("play".to_string())));
        assert_eq!(editor.buffer(), "");
        assert_eq!(
            editor.assemble(b'\n'),
            LineEdit::Submitted(String::new())
        );
    }

    #[test]
    fn backspace_and_delete_remove_last_char() {
        let mut editor = LineEditor::new();
        feed(&mut editor, b"shiz");
        assert_eq!(editor.assemble(DELETE), LineEdit::Erased);
        feed(&mut editor, b"t");
        assert_eq!(editor.buffer(), "shit");
        assert_eq!(editor.assemble(BACKSPACE), LineEdit::Erased);
        assert_eq!(editor.buffer(), "shi");
    }

    #[test]
    fn backspace_on_empty_is_ignored() {
        let mut editor = LineEditor::new();
        assert_eq!(editor.assemble(BACKSPACE), LineEdit::Ignored);
        assert_eq!(editor.assemble(DELETE), LineEdit::Ignored);
        assert_eq!(editor.buffer(), "");
    }

    #[test]
    fn no_length_cap() {
        let mut editor = LineEditor::new();
        let long = vec![b'a'; 10_000];
        feed(&mut editor, &long);
        assert_eq!(editor.buffer().len(), 10_000);
    }

    #[test]
    fn ctrl_c_interrupts_and_clears() {
        let mut editor = LineEditor::new();
        feed(&mut editor, b"pul");
        assert_eq!(editor.assemble(CTRL_C), LineEdit::Interrupted);
        assert_eq!(editor.buffer(), "");
    }
}
