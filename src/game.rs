//! Screen flow, level progression and the per-frame update order.

use tracing::{debug, info};

use crate::collectible::{Collectible, CollectibleKind};
use crate::config::Config;
use crate::ghost::{Encounter, Ghost};
use crate::grid::{Cell, Grid};
use crate::mode::{GameMode, ModeClock};
use crate::player::Player;
use crate::position::Direction;
use crate::scores::HighScores;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Start,
    Playing,
    GameOver,
    ScoreBoard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Direction(Direction),
    Confirm,
    ToggleScoreboard,
    Quit,
}

/// Everything a frame mutates, shared by the entity updates.
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: Config,
    pub screen: Screen,
    pub grid: Grid,
    pub player: Player,
    pub mode: ModeClock,
    pub level: u32,
    pub score: u32,
    pub high_scores: HighScores,
}

impl GameState {
    pub fn new(config: Config, grid: Grid, mut high_scores: HighScores) -> Self {
        high_scores.set_capacity(config.high_score_capacity);
        Self {
            mode: ModeClock::new(&config),
            player: Player::new(grid.player_start()),
            screen: Screen::Start,
            level: 1,
            score: 0,
            config,
            grid,
            high_scores,
        }
    }

    /// Ends the run: the score goes into the table and the game-over screen
    /// is shown. Does nothing if the run has already ended.
    pub fn player_caught(&mut self) {
        if self.screen != Screen::Playing {
            return;
        }
        let rank = self.high_scores.record(self.score, self.level);
        info!(score = self.score, level = self.level, ?rank, "game over");
        self.screen = Screen::GameOver;
    }
}

/// Entities rebuilt from the maze template at every level start.
#[derive(Debug, Clone, Default)]
struct Entities {
    collectibles: Vec<Collectible>,
    ghosts: Vec<Ghost>,
}

impl Entities {
    fn from_grid(grid: &Grid) -> Self {
        let mut entities = Entities::default();
        for (tile, cell) in grid.tiles() {
            match cell {
                Cell::Coin => entities
                    .collectibles
                    .push(Collectible::new(CollectibleKind::Coin, tile)),
                Cell::PowerPellet => entities
                    .collectibles
                    .push(Collectible::new(CollectibleKind::PowerPellet, tile)),
                Cell::GhostStart(kind) => entities.ghosts.push(Ghost::new(kind, tile)),
                Cell::Wall | Cell::PlayerStart | Cell::Empty => {}
            }
        }
        entities
    }
}

pub struct Game {
    state: GameState,
    entities: Entities,
    running: bool,
}

impl Game {
    pub fn new(config: Config, grid: Grid, high_scores: HighScores) -> Self {
        let entities = Entities::from_grid(&grid);
        info!(
            width = grid.width(),
            height = grid.height(),
            coins = grid.template_coins(),
            ghosts = entities.ghosts.len(),
            "game ready"
        );
        Self {
            state: GameState::new(config, grid, high_scores),
            entities,
            running: true,
        }
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        if event == InputEvent::Quit {
            info!(score = self.state.score, level = self.state.level, "quit");
            self.running = false;
            return;
        }

        match (self.state.screen, event) {
            (Screen::Start, InputEvent::Direction(dir)) => {
                self.state.screen = Screen::Playing;
                self.state.player.request(dir);
            }
            (Screen::Start, _) => self.state.screen = Screen::Playing,
            (Screen::Playing, InputEvent::Direction(dir)) => self.state.player.request(dir),
            (Screen::GameOver | Screen::ScoreBoard, InputEvent::Confirm) => self.replay(),
            (Screen::GameOver, InputEvent::ToggleScoreboard) => {
                self.state.screen = Screen::ScoreBoard;
            }
            (Screen::ScoreBoard, InputEvent::ToggleScoreboard) => {
                self.state.screen = Screen::GameOver;
            }
            _ => {}
        }
    }

    /// Advances the simulation by `dt` seconds.
    pub fn update(&mut self, dt: f64) {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, self.state.config.max_frame_delta)
        } else {
            0.0
        };
        if self.state.screen != Screen::Playing {
            return;
        }

        if self.state.grid.coins_remaining() == 0 {
            self.next_level();
        }

        let state = &mut self.state;
        state
            .player
            .update(dt, state.config.player_speed, &state.grid);
        state.mode.tick(dt);

        for ghost in &mut self.entities.ghosts {
            if ghost.update(state, dt) == Encounter::CaughtPlayer {
                return;
            }
        }
        for item in &mut self.entities.collectibles {
            item.update(state);
        }
    }

    /// Starts a fresh run from level one. High scores are kept.
    pub fn replay(&mut self) {
        info!(previous_score = self.state.score, "replay");
        self.state.score = 0;
        self.state.level = 1;
        self.state.mode.reset();
        self.reload();
        self.state.screen = Screen::Playing;
    }

    fn next_level(&mut self) {
        self.state.level += 1;
        self.state.mode.level_up();
        self.reload();
        info!(
            level = self.state.level,
            power_up_time = self.state.mode.power_up_time(),
            guard_time = self.state.mode.guard_time(),
            "level up"
        );
    }

    fn reload(&mut self) {
        self.state.grid.reset_coins();
        self.entities = Entities::from_grid(&self.state.grid);
        let start = self.state.grid.player_start();
        self.state.player.reset(start);
        debug!(level = self.state.level, "entities reloaded");
    }

    pub fn screen(&self) -> Screen {
        self.state.screen
    }

    pub fn mode(&self) -> GameMode {
        self.state.mode.mode()
    }

    pub fn mode_clock(&self) -> &ModeClock {
        &self.state.mode
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn level(&self) -> u32 {
        self.state.level
    }

    pub fn grid(&self) -> &Grid {
        &self.state.grid
    }

    pub fn player(&self) -> &Player {
        &self.state.player
    }

    pub fn ghosts(&self) -> &[Ghost] {
        &self.entities.ghosts
    }

    pub fn collectibles(&self) -> &[Collectible] {
        &self.entities.collectibles
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.state.high_scores
    }

    pub fn coins_remaining(&self) -> usize {
        self.state.grid.coins_remaining()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn config(&self) -> &Config {
        &self.state.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Tile;

    fn game() -> Game {
        Game::new(Config::default(), Grid::builtin(), HighScores::default())
    }

    #[test]
    fn entities_come_from_the_template() {
        let game = game();
        let coins = game
            .collectibles()
            .iter()
            .filter(|c| c.kind() == CollectibleKind::Coin)
            .count();
        assert_eq!(coins, 240);
        assert_eq!(game.collectibles().len(), 244);
        assert_eq!(game.ghosts().len(), 3);
        assert_eq!(game.player().position().tile(), Tile::new(13, 23));
    }

    #[test]
    fn nothing_moves_before_the_game_starts() {
        let mut game = game();
        game.update(0.1);
        assert_eq!(game.screen(), Screen::Start);
        assert_eq!(game.mode_clock().next_guard_in(), 30.0);

        game.handle_input(InputEvent::Confirm);
        assert_eq!(game.screen(), Screen::Playing);
        game.update(0.1);
        assert!(game.mode_clock().next_guard_in() < 30.0);
    }

    #[test]
    fn direction_on_the_start_screen_starts_and_buffers() {
        let mut game = game();
        game.handle_input(InputEvent::Direction(Direction::Left));
        assert_eq!(game.screen(), Screen::Playing);
        assert_eq!(game.player().next_move(), Direction::Left);
    }

    #[test]
    fn frame_delta_is_clamped() {
        let mut game = game();
        game.handle_input(InputEvent::Confirm);
        game.update(f64::NAN);
        game.update(-1.0);
        assert_eq!(game.mode_clock().next_guard_in(), 30.0);
        game.update(100.0);
        assert_eq!(game.mode_clock().next_guard_in(), 29.75);
    }

    #[test]
    fn quit_stops_the_loop_from_any_screen() {
        let mut game = game();
        assert!(game.is_running());
        game.handle_input(InputEvent::Quit);
        assert!(!game.is_running());
        assert_eq!(game.screen(), Screen::Start);
    }
}
