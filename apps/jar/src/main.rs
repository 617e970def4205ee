use std::{
    fs,
    io::{self, BufRead, IsTerminal, Write},
    path::PathBuf,
    process::ExitCode,
    thread,
    time::Duration,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use picker_core::{PickError, PickerSession, RandomSource, RngSource, DEFAULT_DRAW_DELAY};
use shared::domain::Mode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod shell;

#[derive(Parser, Debug)]
#[command(name = "jar", about = "Leave your destiny to the jar")]
struct Cli {
    /// Pause before the result is revealed.
    #[arg(long, default_value_t = DEFAULT_DRAW_DELAY.as_millis() as u64)]
    delay_ms: u64,
    /// Seed for reproducible draws.
    #[arg(long)]
    seed: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Draw once from the given items, a file, or stdin (one item per line).
    Draw {
        #[arg(long, default_value = "jar")]
        mode: Mode,
        #[arg(long)]
        file: Option<PathBuf>,
        items: Vec<String>,
    },
    /// Keep a jar and a wheel around and draw from them interactively.
    Shell {
        #[arg(long, default_value = "jar")]
        mode: Mode,
    },
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();
    let cli = Cli::parse();
    let delay = Duration::from_millis(cli.delay_ms);
    let source: Box<dyn RandomSource> = match cli.seed {
        Some(seed) => Box::new(RngSource::seeded(seed)),
        None => Box::new(RngSource::from_os()),
    };
    let mut session = PickerSession::new(source);

    match cli.command {
        Command::Draw { mode, file, items } => {
            let text = gather_items(file, items)?;
            draw_once(&mut session, mode, &text, delay)
        }
        Command::Shell { mode } => {
            session.set_mode(mode)?;
            let stdin = io::stdin();
            let prompt = stdin.is_terminal();
            shell::run(&mut session, stdin.lock(), io::stdout(), delay, prompt)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn gather_items(file: Option<PathBuf>, items: Vec<String>) -> Result<String> {
    if let Some(path) = file {
        return fs::read_to_string(&path)
            .with_context(|| format!("failed to read items from '{}'", path.display()));
    }
    if !items.is_empty() {
        return Ok(items.join("\n"));
    }
    let mut text = String::new();
    for line in io::stdin().lock().lines() {
        text.push_str(&line.context("failed to read items from stdin")?);
        text.push('\n');
    }
    Ok(text)
}

fn draw_once(session: &mut PickerSession, mode: Mode, text: &str, delay: Duration) -> Result<ExitCode> {
    session.set_mode(mode)?;
    let added = session.add_lines(text)?;
    debug!(%mode, added, "items loaded");

    if let Some(warning) = session.draw_warning() {
        eprintln!("⚠️ {warning}");
        return Ok(ExitCode::from(2));
    }

    let reveal = match paced_draw(session, delay) {
        Ok(reveal) => reveal,
        Err(PickError::InsufficientItems { .. }) => return Ok(ExitCode::from(2)),
        Err(other) => return Err(other.into()),
    };
    let mut out = io::stdout().lock();
    writeln!(out, "The {mode} has spoken: {}", reveal.item)?;
    Ok(ExitCode::SUCCESS)
}

/// `begin_draw`, a plain sleep, then `complete_draw`.
pub(crate) fn paced_draw(
    session: &mut PickerSession,
    delay: Duration,
) -> Result<picker_core::Reveal, PickError> {
    session.begin_draw()?;
    if !delay.is_zero() {
        thread::sleep(delay);
    }
    session.complete_draw()
}
