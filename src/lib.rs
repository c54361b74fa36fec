//! Terminal Pac-Man where each ghost measures distance with a different norm.
//!
//! The library is the simulation core: feed it [`InputEvent`]s and frame
//! deltas through [`Game::handle_input`] and [`Game::update`], then read the
//! state back for drawing. The `pacman` binary wraps it in a crossterm UI.

pub mod collectible;
pub mod config;
pub mod error;
pub mod game;
pub mod ghost;
pub mod grid;
pub mod legality;
pub mod mode;
pub mod player;
pub mod position;
pub mod scores;

pub use collectible::{Collectible, CollectibleKind};
pub use config::Config;
pub use error::{ConfigError, ScoreError, TemplateError};
pub use game::{Game, GameState, InputEvent, Screen};
pub use ghost::{Encounter, Ghost, GhostKind};
pub use grid::{Cell, Grid};
pub use mode::{GameMode, ModeClock};
pub use player::Player;
pub use position::{Direction, Position, Tile};
pub use scores::{HighScore, HighScores};
