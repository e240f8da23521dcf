use clap::Parser;
use doorpanic::cli::Args;
use doorpanic::config::GameConfig;
use doorpanic::dropfile::{self, User};
use doorpanic::error::DoorError;
use doorpanic::game::GameSession;
use doorpanic::input_pipeline;
use doorpanic::logging;
use doorpanic::scenario::Scenario;
use doorpanic::terminal_crossterm::RawModeGuard;
use doorpanic::terminal_manager::{create_terminal, TerminalCapabilities};
use log::{debug, error, info};
use std::io;

fn main() {
    let code = match run() {
        Ok(code) => code,
        Err(e) => {
            error!("Fatal: {}", e);
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    };
    // run() has returned, so the raw mode guard has already restored the terminal
    std::process::exit(code);
}

fn run() -> Result<i32, DoorError> {
    let args = Args::parse();

    // Checked before anything touches the filesystem so a bad invocation exits 2
    let drop_path = args.drop_path()?;

    let config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };

    if let Err(e) = logging::init(&config.log_file) {
        eprintln!("Warning: {} (continuing without a log)", e);
    }
    info!("doorpanic {} starting", env!("CARGO_PKG_VERSION"));

    let user = match drop_path {
        Some(path) => dropfile::load(path)?,
        None => {
            info!("Local mode, using default identity");
            User::local()
        }
    };
    let scenario = Scenario::load()?;

    let caps = TerminalCapabilities::detect();
    let mut guard = if caps.is_interactive() {
        Some(RawModeGuard::enable()?)
    } else {
        debug!("Input is not a terminal, staying in cooked mode");
        None
    };

    let terminal = create_terminal(&caps, &config.art_dir);
    let mut game = GameSession::new(terminal, user, scenario, config);
    input_pipeline::spawn_reader(io::stdin(), game.event_sender(), game.done_signal())?;

    let result = game.run();
    drop(game);
    if let Some(guard) = guard.as_mut() {
        guard.restore();
    }

    let outcome = result?;
    Ok(outcome.exit_code())
}
