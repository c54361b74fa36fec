//! Ghost AI.
//!
//! All ghosts share one update: pick a target, check for the player, list the
//! legal non-reversing moves and rank them by distance to the target. The
//! three kinds differ only in the norm used for that distance and in the
//! corner they retreat to during guard mode.

use tracing::debug;

use crate::game::GameState;
use crate::grid::Grid;
use crate::legality::{is_legal, substeps};
use crate::mode::GameMode;
use crate::position::{Direction, Position, Tile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GhostKind {
    /// L1: `|dx| + |dy|`
    Manhattan,
    /// L2: `sqrt(dx² + dy²)`
    Euclidean,
    /// L∞: `max(|dx|, |dy|)`
    Max,
}

impl GhostKind {
    pub const ALL: [GhostKind; 3] = [GhostKind::Manhattan, GhostKind::Euclidean, GhostKind::Max];

    pub fn norm(self, dx: f64, dy: f64) -> f64 {
        match self {
            GhostKind::Manhattan => dx.abs() + dy.abs(),
            GhostKind::Euclidean => dx.hypot(dy),
            GhostKind::Max => dx.abs().max(dy.abs()),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GhostKind::Manhattan => "manhattan",
            GhostKind::Euclidean => "euclidean",
            GhostKind::Max => "max",
        }
    }
}

/// What happened when a ghost and the player shared a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encounter {
    None,
    /// Powered-up player ate the ghost; it is back at its start.
    Eaten,
    /// The ghost caught the player; the game is over.
    CaughtPlayer,
}

#[derive(Debug, Clone)]
pub struct Ghost {
    kind: GhostKind,
    start: Tile,
    position: Position,
    next_tile: Tile,
    target: Position,
    heading: Direction,
}

impl Ghost {
    pub fn new(kind: GhostKind, start: Tile) -> Self {
        Self {
            kind,
            start,
            position: start.origin(),
            next_tile: start,
            target: start.origin(),
            heading: Direction::None,
        }
    }

    pub fn kind(&self) -> GhostKind {
        self.kind
    }

    pub fn start(&self) -> Tile {
        self.start
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    pub fn target(&self) -> Position {
        self.target
    }

    /// Tile the current heading leads into.
    pub fn next_tile(&self) -> Tile {
        self.next_tile
    }

    pub fn place(&mut self, position: Position, heading: Direction) {
        self.position = position;
        self.heading = heading;
    }

    pub fn respawn(&mut self) {
        self.position = self.start.origin();
        self.next_tile = self.start;
        self.heading = Direction::None;
    }

    pub fn update(&mut self, state: &mut GameState, dt: f64) -> Encounter {
        let mode = state.mode.mode();
        self.target = match mode {
            GameMode::Guard => state.grid.guard_post(self.kind).origin(),
            GameMode::Chase | GameMode::PowerUp => state.player.position(),
        };

        let encounter = self.check_player(state);
        if encounter == Encounter::CaughtPlayer {
            return encounter;
        }

        let mut speed = state.config.player_speed;
        if mode == GameMode::PowerUp {
            speed *= state.config.power_up_slowdown;
        }
        let (count, step) = substeps(speed * dt);
        for _ in 0..count {
            self.steer(&state.grid, mode);
            if self.heading == Direction::None {
                break;
            }
            self.position = self
                .position
                .advanced(self.heading, step)
                .wrapped(state.grid.width(), state.grid.height());
        }
        encounter
    }

    fn check_player(&mut self, state: &mut GameState) -> Encounter {
        if self.position != state.player.position() {
            return Encounter::None;
        }
        if state.mode.mode() == GameMode::PowerUp {
            state.score += state.config.ghost_points;
            debug!(ghost = self.kind.as_str(), score = state.score, "ghost eaten");
            self.respawn();
            Encounter::Eaten
        } else {
            state.player_caught();
            Encounter::CaughtPlayer
        }
    }

    /// Re-evaluates the heading at the current position.
    pub fn steer(&mut self, grid: &Grid, mode: GameMode) {
        match self.best_move(grid, mode) {
            Some((dir, tile)) => {
                if dir != self.heading {
                    self.position = self.position.snapped_for(dir);
                }
                self.heading = dir;
                self.next_tile = tile;
            }
            None => {
                self.heading = Direction::None;
                self.next_tile = self.position.tile();
            }
        }
    }

    /// Legal moves from the current position, in `Direction::MOVES` order,
    /// excluding a reversal of the current heading.
    pub fn candidates(&self, grid: &Grid) -> Vec<(Direction, Tile)> {
        let here = self.position.tile();
        let forbidden = self.heading.reverse();
        Direction::MOVES
            .into_iter()
            .filter(|&dir| dir != forbidden && is_legal(dir, self.position, grid))
            .map(|dir| (dir, here.step(dir)))
            .collect()
    }

    /// Closest candidate to the target under this ghost's norm, or the
    /// farthest one while fleeing a powered-up player. Ties keep the earlier
    /// candidate.
    pub fn best_move(&self, grid: &Grid, mode: GameMode) -> Option<(Direction, Tile)> {
        let flee = mode == GameMode::PowerUp;
        let target = self.target.tile();
        let mut best: Option<(Direction, Tile, f64)> = None;
        for (dir, tile) in self.candidates(grid) {
            let distance = self
                .kind
                .norm((tile.x - target.x) as f64, (tile.y - target.y) as f64);
            let better = match best {
                None => true,
                Some((_, _, current)) if flee => distance > current,
                Some((_, _, current)) => distance < current,
            };
            if better {
                best = Some((dir, tile, distance));
            }
        }
        best.map(|(dir, tile, _)| (dir, tile))
    }

    #[cfg(test)]
    pub(crate) fn set_target(&mut self, target: Position) {
        self.target = target;
    }
}
