use crate::grid::Grid;
use crate::legality::{is_legal, substeps};
use crate::position::{Direction, Position, Tile};

/// Player motion: a committed move plus one buffered request.
///
/// The buffered move replaces the committed one as soon as it becomes legal,
/// so a turn pressed early is taken at the first junction that allows it.
#[derive(Debug, Clone)]
pub struct Player {
    start: Tile,
    position: Position,
    this_move: Direction,
    next_move: Direction,
}

impl Player {
    pub fn new(start: Tile) -> Self {
        Self {
            start,
            position: start.origin(),
            this_move: Direction::None,
            next_move: Direction::None,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn start(&self) -> Tile {
        self.start
    }

    pub fn this_move(&self) -> Direction {
        self.this_move
    }

    pub fn next_move(&self) -> Direction {
        self.next_move
    }

    pub fn request(&mut self, dir: Direction) {
        self.next_move = dir;
    }

    /// Moves the player without touching its moves. Used by level setup and tests.
    pub fn place(&mut self, position: Position) {
        self.position = position;
    }

    pub fn reset(&mut self, start: Tile) {
        *self = Player::new(start);
    }

    pub fn update(&mut self, dt: f64, speed: f64, grid: &Grid) {
        let (count, step) = substeps(speed * dt);
        if count == 0 {
            self.promote(grid);
            return;
        }
        for _ in 0..count {
            if is_legal(self.this_move, self.position, grid) {
                self.position = self
                    .position
                    .advanced(self.this_move, step)
                    .wrapped(grid.width(), grid.height());
            }
            self.promote(grid);
        }
    }

    fn promote(&mut self, grid: &Grid) {
        if self.next_move == self.this_move || !is_legal(self.next_move, self.position, grid) {
            return;
        }
        self.position = self.position.snapped_for(self.next_move);
        self.this_move = self.next_move;
    }
}
