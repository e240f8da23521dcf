//! doorpanic: a race-against-the-clock BBS door game
//!
//! The caller has forty seconds to get to the bathroom by typing what they
//! do. Free text is normalized against a synonym vocabulary, accumulated in
//! a ledger and matched against award conditions while a countdown runs on
//! its own thread.

pub mod awards;
pub mod cli;
pub mod config;
pub mod countdown;
pub mod dropfile;
pub mod error;
pub mod events;
pub mod game;
pub mod input_pipeline;
pub mod line_editor;
pub mod logging;
pub mod normalizer;
pub mod scenario;
pub mod session;
pub mod signal;
pub mod terminal_crossterm;
pub mod terminal_headless;
pub mod terminal_logging;
pub mod terminal_manager;
pub mod terminal_trait;
pub mod vocabulary;

#[cfg(test)]
mod test_utils;
