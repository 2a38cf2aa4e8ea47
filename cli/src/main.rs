//! Quill CLI - Binary entry point and terminal session management.
//!
//! # Architecture
//!
//! The CLI bridges [`quill_engine`] (application state) and [`quill_tui`] (rendering),
//! providing RAII-based terminal management with guaranteed cleanup.
//!
//! ```text
//! main() -> resolve settings -> load document -> TerminalSession::new() -> run_app()
//! ```
//!
//! # Event Loop
//!
//! A fixed 8ms (~120 FPS) render cadence:
//!
//! 1. Wait for frame tick
//! 2. Drain input queue (non-blocking via [`quill_tui::InputPump`])
//! 3. Advance the typing session by the measured frame time (`app.tick()`)
//! 4. Render frame
//! 5. Check for quit

mod assets;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::{
    fs::{self, File, OpenOptions},
    io::{self, Read, Stdout, stdout},
    path::{Path, PathBuf},
    sync::Mutex,
    time::Duration,
};
use tokio::time::{self, MissedTickBehavior};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use quill_config::QuillConfig;
use quill_engine::{App, AppSettings, Fragment, SessionOptions};
use quill_tui::{InputPump, draw, handle_events};

/// Reveal a document one character at a time.
#[derive(Debug, Default, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Fragment file (JSON) to play, `-` for stdin. Plays a demo when omitted.
    fragment: Option<PathBuf>,

    /// Milliseconds between two typed characters
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    delay_ms: Option<u64>,

    /// Quit once the whole document has been typed
    #[arg(long)]
    exit_on_done: bool,

    /// Use ASCII-only glyphs
    #[arg(long)]
    ascii: bool,

    /// Use a high-contrast palette
    #[arg(long)]
    high_contrast: bool,

    /// Keep the cursor solid instead of blinking
    #[arg(long)]
    reduced_motion: bool,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_quill_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // If we can't open a log file, prefer "no logs" over corrupting the TUI
    // by writing to stdout/stderr.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_quill_log_file() -> (Option<(PathBuf, File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in quill_log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn quill_log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.quill/logs/quill.log
    if let Some(config_path) = QuillConfig::path()
        && let Some(config_dir) = config_path.parent()
    {
        candidates.push(config_dir.join("logs").join("quill.log"));
    }

    // Fallback: ./.quill/logs/quill.log (useful in constrained environments)
    candidates.push(PathBuf::from(".quill").join("logs").join("quill.log"));

    candidates
}

/// Layer settings: config file, then `QUILL_DELAY_MS`, then flags.
fn resolve_settings(
    cli: &Cli,
    config: Option<&QuillConfig>,
    env_delay: Option<Duration>,
) -> AppSettings {
    let mut session = config.map(QuillConfig::session_options).unwrap_or_default();
    if let Some(delay) = env_delay {
        session = SessionOptions::with_delay(delay);
    }
    if let Some(ms) = cli.delay_ms {
        session = SessionOptions::with_delay(Duration::from_millis(ms));
    }

    let mut ui = config.map(QuillConfig::ui_options).unwrap_or_default();
    ui.ascii_only |= cli.ascii;
    ui.high_contrast |= cli.high_contrast;
    ui.reduced_motion |= cli.reduced_motion;

    AppSettings {
        session,
        ui,
        exit_on_done: cli.exit_on_done || config.is_some_and(QuillConfig::exit_on_done),
    }
}

fn load_document(path: Option<&Path>) -> Result<Vec<Fragment>> {
    let Some(path) = path else {
        return assets::demo_document();
    };

    let raw = if path == Path::new("-") {
        let mut raw = String::new();
        io::stdin()
            .read_to_string(&mut raw)
            .context("failed to read fragment from stdin")?;
        raw
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("failed to read fragment file {}", path.display()))?
    };

    Fragment::parse_list(&raw)
        .with_context(|| format!("failed to parse fragment {}", path.display()))
}

/// RAII wrapper for terminal state with guaranteed cleanup on drop.
///
/// Enables raw mode and the alternate screen on creation. On drop, the
/// terminal is restored so it stays usable after panics or early returns.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self> {
        enable_raw_mode()?;

        let mut out = stdout();
        if let Err(err) = execute!(out, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err.into());
        }

        let terminal = match Terminal::new(CrosstermBackend::new(out)) {
            Ok(t) => t,
            Err(err) => {
                let _ = disable_raw_mode();
                let _ = execute!(stdout(), LeaveAlternateScreen);
                return Err(err.into());
            }
        };

        Ok(Self { terminal })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = QuillConfig::load().context("failed to load config")?;
    let env_delay = quill_config::delay_from_env()?;
    let settings = resolve_settings(&cli, config.as_ref(), env_delay);
    let document = load_document(cli.fragment.as_deref())?;

    tracing::info!(
        fragments = document.len(),
        delay_ms = settings.session.delay_time.as_millis() as u64,
        exit_on_done = settings.exit_on_done,
        "Starting"
    );
    let mut app = App::new(document, settings)?;

    let result = {
        let mut session = TerminalSession::new()?;
        run_app(&mut session.terminal, &mut app).await
    };

    if let Err(err) = &result {
        tracing::error!("Exited with error: {err:?}");
    }
    result
}

const FRAME_DURATION: Duration = Duration::from_millis(8);

async fn run_app<B>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
{
    let mut input = InputPump::new();
    let mut frames = time::interval(FRAME_DURATION);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let result: Result<()> = loop {
        frames.tick().await;

        // Non-blocking input (drain queue only)
        let quit_now = match handle_events(app, &mut input) {
            Ok(q) => q,
            Err(e) => break Err(e),
        };
        if quit_now {
            break Ok(());
        }

        let delta = app.frame_elapsed();
        app.tick(delta);

        if let Err(e) = terminal.draw(|frame| draw(frame, app)) {
            break Err(e.into());
        }

        if app.should_quit() {
            break Ok(());
        }
    };

    input.shutdown().await;
    result
}
