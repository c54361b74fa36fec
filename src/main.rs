mod input;
mod render;

use std::io::{self, Stdout};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use norm_pacman::{Config, Game, Grid, HighScores, InputEvent, Screen};

use crate::input::{map_key, Command};
use crate::render::Renderer;

const DEFAULT_RENDER_FPS: u64 = 60;
const DEFAULT_CONFIG_PATH: &str = "pacman.toml";
const DEFAULT_SCORES_PATH: &str = "highscores.json";
const LOG_FILE: &str = "pacman.log";

/// Paths and knobs the front end reads from the environment.
struct Settings {
    config_path: PathBuf,
    maze_path: Option<PathBuf>,
    scores_path: PathBuf,
    render_fps: u64,
}

impl Settings {
    fn from_env() -> Self {
        let config_path = std::env::var_os("PACMAN_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        let maze_path = std::env::var_os("PACMAN_MAZE").map(PathBuf::from);
        let scores_path = std::env::var_os("PACMAN_SCORES")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCORES_PATH));
        let render_fps = std::env::var("PACMAN_FPS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_RENDER_FPS);
        Self {
            config_path,
            maze_path,
            scores_path,
            render_fps,
        }
    }
}

fn log_writer(dir: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(dir)?;
    let file_appender = tracing_appender::rolling::never(dir, LOG_FILE);
    Ok(tracing_appender::non_blocking(file_appender))
}

/// Installs the file logger. Buffered lines are flushed when the returned
/// guard is dropped.
fn setup_logging() -> Result<WorkerGuard> {
    let log_dir = std::env::var_os("PACMAN_LOG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir);

    // The terminal belongs to the game, so logs only go to a file.
    let (non_blocking_file, guard) = log_writer(&log_dir)?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    Ok(guard)
}

fn main() -> Result<()> {
    let _log_guard = setup_logging()?;
    let settings = Settings::from_env();

    let config = Config::load_or_default(&settings.config_path);
    let grid = Grid::load_or_builtin(settings.maze_path.as_deref(), &config);
    let high_scores = HighScores::load_or_default(&settings.scores_path, config.high_score_capacity);
    let mut game = Game::new(config, grid, high_scores);

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, &mut game, settings.render_fps, &settings.scores_path);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;

    save_scores(&game, &settings.scores_path);
    info!("exit");
    result
}

fn run(stdout: &mut Stdout, game: &mut Game, render_fps: u64, scores_path: &Path) -> Result<()> {
    let mut renderer = Renderer::new(game.grid().width(), game.grid().height());
    let frame_time = Duration::from_micros(1_000_000 / render_fps.max(1));
    let mut last_frame = Instant::now();

    while game.is_running() {
        let frame_start = Instant::now();
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                match map_key(key) {
                    Some(Command::Game(event)) => game.handle_input(event),
                    Some(Command::DebugPosition) => {
                        let pos = game.player().position();
                        debug!(x = pos.x, y = pos.y, tile = ?pos.tile(), "player position");
                    }
                    Some(Command::Other) if game.screen() == Screen::Start => {
                        game.handle_input(InputEvent::Confirm);
                    }
                    Some(Command::Other) | None => {}
                }
            }
        }

        let before = game.screen();
        game.update(last_frame.elapsed().as_secs_f64());
        last_frame = Instant::now();
        if before == Screen::Playing && game.screen() == Screen::GameOver {
            save_scores(game, scores_path);
        }

        renderer.draw(stdout, game)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
    Ok(())
}

fn save_scores(game: &Game, path: &Path) {
    match game.high_scores().save(path) {
        Ok(()) => debug!("high scores saved to {}", path.display()),
        Err(err) => warn!("{err}"),
    }
}
