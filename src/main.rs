//! Diamond Quest runner (default binary).
//!
//! Runs the terminal game by default. With `--headless` it reads a command
//! script from stdin and writes JSON snapshots to stdout instead.

use std::fs::File;
use std::io;
use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use diamond_quest::config::GameConfig;
use diamond_quest::core::Session;
use diamond_quest::headless::run_script;
use diamond_quest::input::{handle_key_event, should_quit, InputCommand, SwipeTracker};
use diamond_quest::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use diamond_quest::types::TICK_MS;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = GameConfig::from_env().parse_args(&args)?;
    init_logging(&config)?;

    let seed = config.seed.unwrap_or_else(clock_seed);
    let mut session = Session::new(config.session_config(), seed);
    info!(seed, width = config.width, height = config.height, "starting");

    if config.headless {
        session.start()?;
        let stdin = io::stdin();
        run_script(&mut session, stdin.lock(), io::stdout().lock())?;
        return Ok(());
    }

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut session);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

/// The TUI owns stdout, so it only logs when a file is configured.
fn init_logging(config: &GameConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = FmtSubscriber::builder().with_env_filter(filter);

    if config.headless {
        let subscriber = builder.with_writer(io::stderr).finish();
        tracing::subscriber::set_global_default(subscriber)?;
    } else if let Some(path) = &config.log_path {
        let file = File::create(path).with_context(|| format!("open log file {}", path))?;
        let subscriber = builder
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }
    Ok(())
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u32)
        .unwrap_or(1)
}

fn run(term: &mut TerminalRenderer, session: &mut Session) -> Result<()> {
    session.start()?;

    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut swipe = SwipeTracker::default();

    let frame = Duration::from_millis(u64::from(TICK_MS));
    let mut last_tick = Instant::now();

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let snap = session.take_snapshot();
        view.render_into(&snap, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = frame.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            let command = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    handle_key_event(key)
                }
                Event::Mouse(mouse) => swipe.handle_mouse_event(mouse).map(InputCommand::Move),
                Event::Resize(..) => {
                    // Cell coordinates from before the resize no longer line up.
                    swipe.reset();
                    term.invalidate();
                    None
                }
                _ => None,
            };

            match command {
                Some(InputCommand::Move(dir)) => {
                    session.apply_direction(dir);
                }
                Some(InputCommand::Restart) => {
                    if let Err(err) = session.restart() {
                        warn!(%err, "restart failed");
                    }
                }
                None => {}
            }
        }

        // Tick by real elapsed time so the countdown tracks the wall clock.
        let elapsed = last_tick.elapsed();
        if elapsed >= frame {
            last_tick = Instant::now();
            session.advance_clock(elapsed.as_millis() as u32);
        }
    }
}
