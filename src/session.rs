//! Per-caller session data
//!
//! The session is owned by the game loop, which is its only writer. The
//! countdown thread shares the remaining time through `RemainingTime` and
//! never touches anything else here.

use std::fmt;

use crate::awards::{AwardRecord, InputLedger};
use crate::countdown::RemainingTime;
use crate::dropfile::User;

/// Game modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    MainMenu,
    Intro,
    Playing,
    GameOver,
    AwardsView,
    Quit,
}

impl Mode {
    /// Modes that clear the screen and draw their art on entry
    pub fn needs_setup(self) -> bool {
        matches!(self, Mode::MainMenu | Mode::Playing)
    }

    /// Modes whose input accumulates in the ledger
    pub fn accumulates(self) -> bool {
        matches!(self, Mode::MainMenu | Mode::Playing)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::MainMenu => "main menu",
            Mode::Intro => "intro",
            Mode::Playing => "playing",
            Mode::GameOver => "game over",
            Mode::AwardsView => "awards view",
            Mode::Quit => "quit",
        };
        f.write_str(name)
    }
}

/// Cursor position, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub col: u16,
    pub row: u16,
}

impl Cursor {
    pub fn new(col: u16, row: u16) -> Self {
        Cursor { col, row }
    }
}

#[derive(Debug)]
pub struct Session {
    pub user: User,
    mode: Mode,
    pub cursor: Cursor,
    pub remaining: RemainingTime,
    pub ledger: InputLedger,
    pub awards: AwardRecord,
}

impl Session {
    pub fn new(user: User) -> Self {
        Session {
            user,
            mode: Mode::MainMenu,
            cursor: Cursor::new(1, 1),
            remaining: RemainingTime::new(0),
            ledger: InputLedger::new(),
            awards: AwardRecord::new(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Only the game loop changes mode
    pub(crate) fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_starts_at_menu() {
        let session = Session::new(User::local());
        assert_eq!(session.mode(), Mode::MainMenu);
        assert!(session.ledger.is_empty());
        assert!(session.awards.is_empty());
        assert_eq!(session.remaining.get(), 0);
    }

    #[test]
    fn setup_modes() {
        assert!(Mode::MainMenu.needs_setup());
        assert!(Mode::Playing.needs_setup());
        assert!(!Mode::AwardsView.needs_setup());
        assert!(!Mode::GameOver.needs_setup());
        assert_eq!(Mode::AwardsView.to_string(), "awards view");
    }
}
