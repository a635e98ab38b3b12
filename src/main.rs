//! FALLBLOCK - a falling-block puzzle game for the terminal

mod board;
mod game;
mod input;
mod piece;
mod randomizer;
mod score;
mod settings;
mod tetromino;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use game::{Action, Game};
use input::InputHandler;
use randomizer::Randomizer;
use ratatui::{Terminal, backend::CrosstermBackend};
use settings::Settings;
use std::{
    io::{self, stdout},
    path::PathBuf,
    time::{Duration, Instant},
};

/// Target frame rate
const TARGET_FPS: u64 = 60;
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / TARGET_FPS);

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Settings file (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for a reproducible piece order
    #[arg(long)]
    seed: Option<u64>,
    /// Log filter, e.g. "fallblock=trace"
    #[arg(long, default_value = "fallblock=debug")]
    log_level: String,
}

/// Get the fallblock temp directory, creating it if needed
fn fallblock_temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join("fallblock");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Generate session ID for this instance
    let session_id: u32 = rand::random();

    // Setup tracing to log file, the terminal belongs to the game
    let log_dir = fallblock_temp_dir();
    let log_file = format!("{:08x}.log", session_id);
    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                args.log_level
                    .parse()
                    .with_context(|| format!("invalid log filter {:?}", args.log_level))?,
            ),
        )
        .with_ansi(false)
        .init();

    tracing::info!(
        "FALLBLOCK starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );

    let settings = Settings::load(args.config.as_deref())?;
    let randomizer = match args.seed {
        Some(seed) => {
            tracing::info!(seed, "using fixed seed");
            Randomizer::with_seed(seed)
        }
        None => Randomizer::new(),
    };
    let mut game = Game::new(
        settings.board.width,
        settings.board.height,
        Box::new(randomizer),
    );
    let input = InputHandler::from_settings(&settings);

    // Setup terminal
    enable_raw_mode().context("failed to enable raw mode")?;
    execute!(stdout(), EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout());
    let result = Terminal::new(backend)
        .map_err(anyhow::Error::from)
        .and_then(|mut terminal| {
            terminal.clear()?;
            run_app(&mut terminal, &mut game, &input, &settings).map_err(anyhow::Error::from)
        });

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;

    if let Err(e) = &result {
        tracing::error!("game loop failed: {:#}", e);
    }
    result?;

    let score = game.score();
    tracing::info!(points = score.points, level = score.level, "exiting");
    println!("\nThanks for playing FALLBLOCK!");
    println!("Final Score: {}", score.points);
    println!("Level: {} | Lines: {}", score.level, score.lines);

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    game: &mut Game,
    input: &InputHandler,
    settings: &Settings,
) -> io::Result<()> {
    let mut last_frame = Instant::now();

    loop {
        terminal.draw(|frame| ui::render(frame, game, settings))?;

        if event::poll(FRAME_DURATION)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match input.key_down(key) {
                        Action::Quit => return Ok(()),
                        action => game.process_action(action),
                    }
                }
            }
        }

        let now = Instant::now();
        game.tick(now - last_frame);
        last_frame = now;
    }
}
