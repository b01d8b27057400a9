//! Binary entry point: argument parsing, logging, terminal setup.

use anyhow::Result;
use clap::Parser;
use dedit::{terminal, Document, Editor, RawTerminal, Terminal};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;

/// Minimal full-screen terminal text editor.
#[derive(Debug, Parser)]
#[command(name = "dedit", version, about)]
struct Args {
    /// File to edit. Starts with an empty buffer when omitted.
    file: Option<PathBuf>,
}

/// Set up file logging when `DEDIT_LOG` is set (e.g. `DEDIT_LOG=debug`).
///
/// Logs go to `dedit.log` in the working directory; stdout belongs to the
/// editor screen while raw mode is active.
fn init_logging() -> Option<WorkerGuard> {
    let filter = std::env::var("DEDIT_LOG").ok()?;
    let appender = tracing_appender::rolling::never(".", "dedit.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = init_logging();
    terminal::install_panic_hook();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "dedit starting");

    let document = match &args.file {
        Some(path) => Document::open(path)?,
        None => Document::new(),
    };

    let mut terminal = RawTerminal::new()?;
    let (width, height) = terminal.size()?;
    let mut editor = Editor::new(document, width, height);
    editor.set_status("HELP: Ctrl-S = save | Ctrl-Q = quit");
    editor.run(&mut terminal).map_err(|err| {
        tracing::error!(error = %err, "session failed");
        err
    })?;
    Ok(())
}
