//! Terminal board for a live poker tournament.
//!
//! Restores the last session from the state file, runs the tournament
//! clock, and reads operator commands from stdin until `quit` or Ctrl-C.

use anyhow::{Context, Result};
use cc_board::{
    board,
    commands::{Command, parse_command},
    logging, render,
};
use chip_clock::{
    AppState, ClockActor, ClockConfig,
    persistence::{FileStorage, PersistedState, StateStorage, spawn_writer},
};
use ctrlc::set_handler;
use pico_args::Arguments;
use std::{io::BufRead, path::PathBuf, sync::Arc, thread};
use tokio::sync::mpsc;

const HELP: &str = "\
Run a live poker tournament board

USAGE:
  cc_board [OPTIONS]

OPTIONS:
  --state PATH          Session state file  [default: tournament_state.json]
  --debounce-ms MS      Delay before writing state changes  [default: 1000]

FLAGS:
  -h, --help            Print help information

ENVIRONMENT:
  CHIP_CLOCK_STATE_FILE, CHIP_CLOCK_PERSIST_DEBOUNCE_MS and
  CHIP_CLOCK_EVENT_BUFFER are read when the matching option is absent.
  RUST_LOG sets the log filter.
";

struct Args {
    state_file: Option<PathBuf>,
    debounce_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        state_file: pargs.opt_value_from_str("--state")?,
        debounce_ms: pargs.opt_value_from_str("--debounce-ms")?,
    };

    logging::init();
    run(args).await
}

async fn run(args: Args) -> Result<()> {
    let config = ClockConfig::from_env(args.state_file, args.debounce_ms);
    config.validate().context("Invalid configuration")?;
    tracing::info!(
        state_file = %config.state_file.display(),
        debounce_ms = config.persist_debounce.as_millis() as u64,
        "Starting board"
    );

    let storage = Arc::new(FileStorage::new(config.state_file.clone()));
    let app = load_session(storage.as_ref()).await;

    let (persistence, writer_task) = spawn_writer(storage, config.persist_debounce);
    let (actor, clock) = ClockActor::new(app, Some(persistence));
    let clock_task = tokio::spawn(actor.run());

    let (_, mut events) = clock.subscribe(config.event_buffer).await?;
    let printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            logging::log_clock_event(&event);
            if let Some(line) = render::event_line(&event) {
                println!("{line}");
            }
        }
    });

    let (interrupt_tx, mut interrupt_rx) = mpsc::unbounded_channel();
    set_handler(move || {
        let _ = interrupt_tx.send(());
    })?;

    println!("{}", board::execute(&clock, Command::Status).await?);
    println!("Type 'help' for commands.");

    let mut lines = spawn_stdin_reader();
    loop {
        tokio::select! {
            line = lines.recv() => {
                let Some(line) = line else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_command(&line) {
                    Ok(Command::Quit) => break,
                    Ok(command) => match board::execute(&clock, command).await {
                        Ok(output) => println!("{}", output.trim_end()),
                        Err(e) => eprintln!("Error: {e:#}"),
                    },
                    Err(e) => eprintln!("{e}"),
                }
            }
            _ = interrupt_rx.recv() => {
                println!();
                break;
            }
        }
    }

    // Stopping the actor drops the last persistence handle, which makes the
    // writer flush any pending state before it exits.
    clock.shutdown().await?;
    clock_task.await?;
    writer_task.await?;
    printer.await?;
    tracing::info!("Board stopped");
    Ok(())
}

/// Read stdin on a plain thread; a blocked read never holds up shutdown
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (sender, receiver) = mpsc::channel(16);
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if sender.blocking_send(line).is_err() {
                break;
            }
        }
    });
    receiver
}

/// Restore the saved session, falling back to a fresh one
async fn load_session(storage: &FileStorage) -> AppState {
    match storage.read().await {
        Ok(Some(blob)) => match PersistedState::from_json(&blob) {
            Ok(persisted) => AppState::from_persisted(persisted),
            Err(e) => {
                tracing::warn!(error = %e, "Saved state unreadable, starting fresh");
                AppState::new()
            }
        },
        Ok(None) => AppState::new(),
        Err(e) => {
            tracing::error!(error = %e, path = %storage.path().display(), "Failed to read saved state");
            AppState::new()
        }
    }
}
