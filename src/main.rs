use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::cursor;
use crossterm::event::{
    self, DisableFocusChange, EnableFocusChange, Event, KeyCode, KeyEventKind, KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use tracing_subscriber::EnvFilter;

use cube27::scene::SceneRenderer;
use cube27::state::AppState;
use cube27::{CubeError, MoveScheduler, Simulation, ViewportMonitor};

/// A console-based self-scrambling 3x3x3 cube animation
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Target frames per second
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Seed the move scheduler for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Start with the debug overlay enabled
    #[arg(short, long)]
    debug: bool,

    /// Start in wireframe mode
    #[arg(short, long)]
    wireframe: bool,

    /// Column count below which the mobile quality tier applies
    #[arg(long, default_value_t = 100)]
    breakpoint: u16,

    /// Append tracing output to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Restores the terminal on drop, whether the loop ended or errored.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self, CubeError> {
        terminal::enable_raw_mode()?;
        execute!(
            io::stdout(),
            EnterAlternateScreen,
            cursor::Hide,
            EnableFocusChange
        )?;
        Ok(TerminalGuard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(
            io::stdout(),
            DisableFocusChange,
            cursor::Show,
            LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}

fn init_tracing(args: &Args) -> Result<(), CubeError> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| CubeError::LogFile {
            path: path.clone(),
            source,
        })?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<(), CubeError> {
    let args = Args::parse();
    init_tracing(&args)?;

    let size = termsize::get().unwrap_or(termsize::Size { rows: 24, cols: 80 });
    let _guard = TerminalGuard::enter()?;
    run(&args, size.cols, size.rows)
}

fn run(args: &Args, mut cols: u16, mut rows: u16) -> Result<(), CubeError> {
    let scheduler = match args.seed {
        Some(seed) => MoveScheduler::seeded(seed),
        None => MoveScheduler::new(),
    };
    let monitor =
        ViewportMonitor::with_breakpoint(f64::from(cols), f64::from(rows), f64::from(args.breakpoint));
    let mut sim = Simulation::with_parts(scheduler, monitor);
    let mut state = AppState {
        debug: args.debug,
        wireframe: args.wireframe,
        ..AppState::default()
    };
    let mut renderer = SceneRenderer::new(cols, rows);
    let mut stdout = io::stdout();

    let frame = Duration::from_secs_f64(1.0 / f64::from(args.fps.max(1)));
    let mut last = Instant::now();

    loop {
        let timeout = frame.saturating_sub(last.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        break;
                    }
                    KeyCode::Char('p') => state.paused = !state.paused,
                    KeyCode::Char('d') => state.debug = !state.debug,
                    KeyCode::Char('w') => state.wireframe = !state.wireframe,
                    KeyCode::Char('r') => sim.reset(),
                    KeyCode::Char('+') | KeyCode::Char('=') => {
                        state.zoom = (state.zoom * 1.1).clamp(0.1, 10.0);
                    }
                    KeyCode::Char('-') => {
                        state.zoom = (state.zoom / 1.1).clamp(0.1, 10.0);
                    }
                    _ => {}
                },
                Event::Resize(new_cols, new_rows) => {
                    // A terminal has no orientation sensor; treat an aspect
                    // flip as one.
                    if (new_rows > new_cols) != (rows > cols) {
                        sim.orientation_changed();
                    }
                    cols = new_cols;
                    rows = new_rows;
                    renderer.resize(cols, rows);
                    sim.viewport_resized(f64::from(cols), f64::from(rows));
                }
                Event::FocusLost => sim.set_visible(false),
                Event::FocusGained => sim.set_visible(true),
                _ => {}
            }
        }

        if last.elapsed() >= frame {
            let now = Instant::now();
            let dt = now.duration_since(last).as_secs_f64();
            last = now;
            if !state.paused {
                sim.advance(dt);
            }
            renderer.draw(&mut stdout, &sim, &state)?;
        }
    }

    sim.teardown();
    Ok(())
}
