//! The game session state machine and its main loop
//!
//! One thread owns the session, the terminal and every mode change. Bytes
//! from the input worker and signals from the countdown worker arrive on a
//! single channel and are applied one at a time, so a timer expiry and a
//! typed command can never change the mode concurrently.

use log::{debug, error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::mpsc::RecvTimeoutError;
use std::thread;
use std::time::{Duration, Instant};

use crate::awards::{AwardContext, Grant};
use crate::config::GameConfig;
use crate::countdown::{CountdownHandle, CountdownSignal};
use crate::dropfile::User;
use crate::error::DoorError;
use crate::events::{self, EventReceiver, EventSender, SessionEvent};
use crate::line_editor::{LineEdit, LineEditor};
use crate::logging::INPUT_TARGET;
use crate::normalizer::sanitize_line;
use crate::scenario::{self, Layout, Scenario};
use crate::session::{Cursor, Mode, Session};
use crate::signal::DoneSignal;
use crate::terminal_trait::{Terminal, Tone};

const PROMPT: &str = "-> ";

/// Furthest ahead a deadline is ever set
const MAX_WAIT: Duration = Duration::from_secs(24 * 60 * 60);

fn deadline_after(delay: Duration) -> Instant {
    Instant::now() + delay.min(MAX_WAIT)
}

/// Why a session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The player quit (menu command or Ctrl+C)
    Quit,
    /// No keystrokes for the idle timeout
    IdleTimeout,
    /// Input reached end of file
    InputClosed,
    /// Reading input failed
    InputFailed(String),
}

impl SessionOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            SessionOutcome::InputFailed(_) => 1,
            _ => 0,
        }
    }
}

pub struct GameSession<T: Terminal> {
    terminal: T,
    session: Session,
    scenario: Scenario,
    config: GameConfig,
    layout: Layout,
    editor: LineEditor,
    events_tx: EventSender,
    events_rx: EventReceiver,
    countdown: Option<CountdownHandle>,
    next_epoch: u64,
    done: DoneSignal,
    /// Mode whose entry actions last ran; `None` before the first transition
    entered: Option<Mode>,
    setup_count: usize,
    pending_grant: Option<Grant>,
    notice_until: Option<Instant>,
    idle_deadline: Instant,
    rng: StdRng,
}

impl<T: Terminal> GameSession<T> {
    pub fn new(terminal: T, user: User, scenario: Scenario, config: GameConfig) -> Self {
        let (events_tx, events_rx) = events::channel();
        let layout = Layout::for_rows(user.rows);
        let idle_deadline = deadline_after(config.idle_timeout());
        GameSession {
            terminal,
            session: Session::new(user),
            scenario,
            config,
            layout,
            editor: LineEditor::new(),
            events_tx,
            events_rx,
            countdown: None,
            next_epoch: 1,
            done: DoneSignal::new(),
            entered: None,
            setup_count: 0,
            pending_grant: None,
            notice_until: None,
            idle_deadline,
            rng: StdRng::from_entropy(),
        }
    }

    /// Sender for workers that feed this session
    pub fn event_sender(&self) -> EventSender {
        self.events_tx.clone()
    }

    /// Fires when the session quits
    pub fn done_signal(&self) -> DoneSignal {
        self.done.clone()
    }

    pub fn mode(&self) -> Mode {
        self.session.mode()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    /// How many times a mode's screen setup has run
    pub fn setup_count(&self) -> usize {
        self.setup_count
    }

    /// Epoch of the running countdown, if any
    pub fn countdown_epoch(&self) -> Option<u64> {
        self.countdown.as_ref().map(|c| c.epoch())
    }

    /// Draw the main menu and arm the idle timer
    pub fn start(&mut self) -> Result<(), DoorError> {
        info!(
            "Session started for {} on node {}",
            self.session.user.alias, self.session.user.node
        );
        self.touch();
        self.transition(Mode::MainMenu)
    }

    /// Run until the player quits, input ends, or the session idles out
    pub fn run(&mut self) -> Result<SessionOutcome, DoorError> {
        self.start()?;
        loop {
            let wait = self.next_deadline().saturating_duration_since(Instant::now());
            let outcome = match self.events_rx.recv_timeout(wait) {
                Ok(event) => self.handle_event(event)?,
                Err(RecvTimeoutError::Timeout) => self.on_deadline()?,
                Err(RecvTimeoutError::Disconnected) => {
                    // The session holds a sender, so this only happens if it was dropped
                    warn!("Event channel disconnected");
                    self.finish(SessionOutcome::InputClosed)?
                }
            };
            if let Some(outcome) = outcome {
                info!("Session ended: {:?}", outcome);
                return Ok(outcome);
            }
        }
    }

    fn next_deadline(&self) -> Instant {
        match self.notice_until {
            Some(notice) if notice < self.idle_deadline => notice,
            _ => self.idle_deadline,
        }
    }

    fn touch(&mut self) {
        self.idle_deadline = deadline_after(self.config.idle_timeout());
    }

    fn on_deadline(&mut self) -> Result<Option<SessionOutcome>, DoorError> {
        let now = Instant::now();
        if let Some(until) = self.notice_until {
            if now >= until {
                self.clear_notice()?;
            }
        }
        if now >= self.idle_deadline {
            info!("Idle timeout after {:?}", self.config.idle_timeout());
            self.print_centered(
                self.layout.notice_row,
                "You fell asleep on the throne. Goodbye!",
                Tone::Yellow,
            )?;
            return self.finish(SessionOutcome::IdleTimeout);
        }
        Ok(None)
    }

    /// Apply one event from the workers
    pub fn handle_event(&mut self, event: SessionEvent) -> Result<Option<SessionOutcome>, DoorError> {
        match event {
            SessionEvent::Byte(byte) => self.on_byte(byte),
            SessionEvent::Countdown { epoch, signal } => {
                self.on_countdown(epoch, signal)?;
                Ok(None)
            }
            SessionEvent::InputClosed => {
                info!("Input closed");
                self.finish(SessionOutcome::InputClosed)
            }
            SessionEvent::InputFailed(reason) => {
                error!("Input failed: {}", reason);
                self.finish(SessionOutcome::InputFailed(reason))
            }
        }
    }

    /// Change mode. Requesting the mode that is already active does nothing.
    pub fn transition(&mut self, mode: Mode) -> Result<(), DoorError> {
        if self.entered == Some(mode) {
            debug!("Already in {}, no transition", mode);
            return Ok(());
        }
        let from = self.session.mode();
        info!("Mode {} -> {}", from, mode);

        if from == Mode::Playing {
            self.stop_countdown();
        }
        if from.accumulates() && from != mode {
            self.session.ledger.clear();
        }
        self.session.set_mode(mode);
        self.entered = Some(mode);
        self.editor.reset();
        self.notice_until = None;
        if mode.needs_setup() {
            self.setup_count += 1;
        }

        match mode {
            Mode::MainMenu => self.setup_main_menu(),
            Mode::Intro => self.run_intro(),
            Mode::Playing => self.setup_playing(),
            Mode::GameOver => self.run_game_over(),
            Mode::AwardsView => self.show_awards(),
            Mode::Quit => self.shut_down(),
        }
    }

    fn finish(&mut self, outcome: SessionOutcome) -> Result<Option<SessionOutcome>, DoorError> {
        self.transition(Mode::Quit)?;
        Ok(Some(outcome))
    }

    fn stop_countdown(&mut self) {
        if let Some(mut countdown) = self.countdown.take() {
            countdown.stop();
        }
    }

    // Screens

    fn setup_main_menu(&mut self) -> Result<(), DoorError> {
        self.terminal.clear_screen()?;
        self.terminal.show_art(scenario::MAIN_MENU_ART)?;
        let user = &self.session.user;
        let welcome = format!(
            " Welcome, {}! You have {} minutes left.",
            user.alias,
            user.time_left.as_secs() / 60
        );
        self.terminal.print_at(1, 1, &welcome, Tone::White)?;
        self.terminal.print_at(
            1,
            self.layout.response_row,
            " PLAY, AWARDS, HELP or QUIT",
            Tone::Normal,
        )?;
        self.prompt()
    }

    fn setup_playing(&mut self) -> Result<(), DoorError> {
        self.terminal.clear_screen()?;
        self.terminal.show_art(scenario::PLAYING_ART)?;
        self.terminal
            .print_at(1, self.layout.response_row, scenario::PLAYING_INTRO, Tone::White)?;
        self.prompt()?;

        let epoch = self.next_epoch;
        self.next_epoch += 1;
        let handle = CountdownHandle::start(
            self.config.countdown(),
            epoch,
            self.session.remaining.clone(),
            self.events_tx.clone(),
        )?;
        self.countdown = Some(handle);
        Ok(())
    }

    fn run_intro(&mut self) -> Result<(), DoorError> {
        self.terminal.clear_screen()?;
        self.terminal.show_cursor(false)?;
        let row = (self.layout.prompt_row / 2).max(1);
        self.print_centered(row, scenario::GET_READY, Tone::Yellow)?;
        for n in (1..=self.config.intro_secs).rev() {
            self.print_centered(row + 1, &n.to_string(), Tone::White)?;
            self.terminal.flush()?;
            thread::sleep(Duration::from_secs(1));
        }
        self.terminal.show_cursor(true)?;
        self.transition(Mode::Playing)
    }

    fn run_game_over(&mut self) -> Result<(), DoorError> {
        self.terminal.clear_screen()?;
        self.terminal.show_art(scenario::GAME_OVER_ART)?;
        let row = (self.layout.prompt_row / 2).max(1);
        self.print_centered(row, scenario::GAME_OVER_TEXT, Tone::Red)?;
        self.terminal.flush()?;
        let pause = self.config.game_over_pause();
        if !pause.is_zero() {
            thread::sleep(pause);
        }
        self.transition(Mode::MainMenu)
    }

    fn show_awards(&mut self) -> Result<(), DoorError> {
        self.terminal.clear_screen()?;
        let mut row = 3;
        match self.pending_grant.take() {
            Some(grant) => {
                if let Some(art) = &grant.art {
                    self.terminal.show_art(art)?;
                }
                let headline = format!(
                    "Congratulations! You've earned the {} award!",
                    grant.name
                );
                self.print_centered(row, &headline, Tone::Yellow)?;
                row += 2;
                if !grant.description.is_empty() {
                    self.print_centered(row, &grant.description, Tone::White)?;
                }
            }
            None => {
                let earned: Vec<String> = self
                    .scenario
                    .book()
                    .iter()
                    .filter(|a| self.session.awards.has(&a.definition.id))
                    .map(|a| a.definition.name.clone())
                    .collect();
                if earned.is_empty() {
                    self.terminal
                        .print_at(3, row, "You haven't earned any awards yet.", Tone::White)?;
                } else {
                    self.terminal.print_at(3, row, "Your awards:", Tone::Yellow)?;
                    for name in earned {
                        row += 1;
                        self.terminal.print_at(5, row, &name, Tone::White)?;
                    }
                }
            }
        }
        self.print_centered(self.layout.prompt_row, scenario::PRESS_ANY_KEY, Tone::Normal)?;
        self.terminal.flush()?;
        Ok(())
    }

    fn shut_down(&mut self) -> Result<(), DoorError> {
        self.stop_countdown();
        if self.done.fire() {
            debug!("Done signal fired");
        }
        let farewell = format!(
            "Thanks for playing, {}. Don't forget to wash your hands!",
            self.session.user.alias
        );
        self.terminal
            .print_at(1, self.layout.prompt_row, &farewell, Tone::White)?;
        self.terminal.show_cursor(true)?;
        self.terminal.flush()?;
        Ok(())
    }

    // Drawing helpers

    fn prompt(&mut self) -> Result<(), DoorError> {
        self.terminal
            .print_at(1, self.layout.prompt_row, PROMPT, Tone::White)?;
        self.session.cursor = Cursor::new(self.layout.prompt_col, self.layout.prompt_row);
        self.restore_cursor()
    }

    fn restore_cursor(&mut self) -> Result<(), DoorError> {
        let Cursor { col, row } = self.session.cursor;
        self.terminal.move_cursor(col, row)?;
        self.terminal.flush()?;
        Ok(())
    }

    fn print_centered(&mut self, row: u16, text: &str, tone: Tone) -> Result<(), DoorError> {
        let width = self.session.user.cols as usize;
        let col = width.saturating_sub(text.chars().count()) / 2 + 1;
        self.terminal.print_at(col as u16, row, text, tone)?;
        Ok(())
    }

    fn notice(&mut self, text: &str) -> Result<(), DoorError> {
        self.terminal
            .print_at(1, self.layout.notice_row, text, Tone::Red)?;
        self.notice_until = Some(deadline_after(self.config.notice()));
        self.restore_cursor()
    }

    fn clear_notice(&mut self) -> Result<(), DoorError> {
        self.notice_until = None;
        self.terminal.move_cursor(1, self.layout.notice_row)?;
        self.terminal.erase_line()?;
        self.restore_cursor()
    }

    fn show_help(&mut self, lines: &[&str]) -> Result<(), DoorError> {
        let count = lines.len() as u16;
        let top = self.layout.hurry_row.saturating_sub(count + 1).max(2);
        for (i, line) in lines.iter().enumerate() {
            self.terminal
                .print_at(3, top + i as u16, line, Tone::Green)?;
        }
        self.restore_cursor()
    }

    // Input

    fn on_byte(&mut self, byte: u8) -> Result<Option<SessionOutcome>, DoorError> {
        self.touch();
        match self.session.mode() {
            Mode::AwardsView => {
                // LF or NUL trailing a CR is part of the keypress that led here
                if byte != b'\n' && byte != 0 {
                    self.transition(Mode::MainMenu)?;
                }
                return Ok(None);
            }
            Mode::MainMenu | Mode::Playing => {}
            Mode::Intro | Mode::GameOver | Mode::Quit => return Ok(None),
        }

        match self.editor.assemble(byte) {
            LineEdit::Appended(ch) => {
                self.terminal.echo_char(ch)?;
                self.session.cursor.col = self.session.cursor.col.saturating_add(1);
                self.terminal.flush()?;
                Ok(None)
            }
            LineEdit::Erased => {
                let col = self
                    .session
                    .cursor
                    .col
                    .saturating_sub(1)
                    .max(self.layout.prompt_col);
                self.session.cursor.col = col;
                let row = self.session.cursor.row;
                self.terminal.move_cursor(col, row)?;
                self.terminal.print(" ", Tone::Normal)?;
                self.restore_cursor()?;
                Ok(None)
            }
            LineEdit::Ignored => Ok(None),
            LineEdit::Interrupted => {
                info!("Ctrl+C from {}", self.session.user.alias);
                self.finish(SessionOutcome::Quit)
            }
            LineEdit::Submitted(line) => {
                info!(target: INPUT_TARGET, "{} [{}]: {}", self.session.user.alias, self.session.mode(), line);
                self.prompt()?;
                self.dispatch(&line)
            }
        }
    }

    fn dispatch(&mut self, raw: &str) -> Result<Option<SessionOutcome>, DoorError> {
        let line = sanitize_line(raw);
        if line.is_empty() {
            return Ok(None);
        }
        match self.session.mode() {
            Mode::MainMenu => self.menu_command(&line),
            Mode::Playing => self.playing_command(&line),
            _ => Ok(None),
        }
    }

    fn menu_command(&mut self, line: &str) -> Result<Option<SessionOutcome>, DoorError> {
        match line {
            "play" => self.transition(Mode::Intro)?,
            "awards" => {
                self.pending_grant = None;
                self.transition(Mode::AwardsView)?;
            }
            "quit" | "exit" => return self.finish(SessionOutcome::Quit),
            "help" => self.show_help(scenario::MENU_HELP)?,
            _ => {
                let tokens = self.scenario.normalizer.normalize(line);
                match self.record_tokens(&tokens, AwardContext::Menu) {
                    Some(grant) => self.show_grant(grant)?,
                    None => self.notice(scenario::INVALID_CHOICE)?,
                }
            }
        }
        Ok(None)
    }

    fn playing_command(&mut self, line: &str) -> Result<Option<SessionOutcome>, DoorError> {
        match line {
            "quit" => self.transition(Mode::MainMenu)?,
            "help" => self.show_help(scenario::PLAYING_HELP)?,
            _ => {
                let tokens = self.scenario.normalizer.normalize(line);
                if tokens.is_empty() {
                    let quip = scenario::unknown_command(&mut self.rng, line);
                    self.notice(&quip)?;
                } else if let Some(grant) = self.record_tokens(&tokens, AwardContext::Gameplay) {
                    self.show_grant(grant)?;
                } else {
                    let response = tokens
                        .iter()
                        .find_map(|t| scenario::response_for(t))
                        .unwrap_or("Nothing happens.");
                    self.terminal
                        .print_at(1, self.layout.response_row, response, Tone::Normal)?;
                    self.restore_cursor()?;
                }
            }
        }
        Ok(None)
    }

    /// Append tokens one at a time, evaluating awards after each. Tokens after
    /// a grant are discarded along with the cleared ledger.
    fn record_tokens(&mut self, tokens: &[String], context: AwardContext) -> Option<Grant> {
        for token in tokens {
            self.session.ledger.append(token.as_str());
            let grant = self.scenario.engine.evaluate(
                &mut self.session.ledger,
                &mut self.session.awards,
                context,
            );
            if grant.is_some() {
                return grant;
            }
        }
        None
    }

    fn show_grant(&mut self, grant: Grant) -> Result<(), DoorError> {
        self.pending_grant = Some(grant);
        self.transition(Mode::AwardsView)
    }

    // Countdown

    fn on_countdown(&mut self, epoch: u64, signal: CountdownSignal) -> Result<(), DoorError> {
        if self.session.mode() != Mode::Playing || self.countdown_epoch() != Some(epoch) {
            debug!("Ignoring countdown {} {:?} in {}", epoch, signal, self.session.mode());
            return Ok(());
        }
        let (col, row) = self.layout.timer;
        match signal {
            CountdownSignal::Tick(secs) => {
                self.terminal
                    .print_at(col, row, &format!(" TIMER: {}s", secs), Tone::Green)?;
                self.restore_cursor()?;
            }
            CountdownSignal::Hurry => {
                self.terminal
                    .print_at(1, self.layout.hurry_row, scenario::HURRY_TEXT, Tone::Yellow)?;
                self.restore_cursor()?;
            }
            CountdownSignal::Expired => {
                info!("Countdown {} expired", epoch);
                self.terminal
                    .print_at(col, row, scenario::TIMES_UP_TEXT, Tone::Red)?;
                self.terminal.flush()?;
                self.transition(Mode::GameOver)?;
            }
        }
        Ok(())
    }
}

impl<T: Terminal> Drop for GameSession<T> {
    fn drop(&mut self) {
        self.stop_countdown();
        self.done.fire();
    }
}
