//! Continuous positions on the maze and the discrete tiles they fall in.

/// Integer tile coordinates. May lie one tile outside the grid while an
/// entity is passing through a tunnel mouth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub x: i32,
    pub y: i32,
}

impl Tile {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(self, dir: Direction) -> Tile {
        let (dx, dy) = dir.delta();
        Tile {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn origin(self) -> Position {
        Position::new(self.x as f64, self.y as f64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    None,
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Candidate order used whenever directions are enumerated.
    pub const MOVES: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::None => (0, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn reverse(self) -> Direction {
        match self {
            Direction::None => Direction::None,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }
}

/// A point in tile units. `(3.5, 2.0)` is halfway along tile `(3, 2)`.
///
/// Two positions compare equal when they fall in the same tile; sub-tile
/// drift never affects overlap checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn tile(self) -> Tile {
        Tile {
            x: self.x.floor() as i32,
            y: self.y.floor() as i32,
        }
    }

    /// Offset into the current tile along each axis, in `[0, 1)`.
    pub fn fraction(self) -> (f64, f64) {
        (self.x - self.x.floor(), self.y - self.y.floor())
    }

    pub fn advanced(self, dir: Direction, distance: f64) -> Position {
        let (dx, dy) = dir.delta();
        Position {
            x: self.x + dx as f64 * distance,
            y: self.y + dy as f64 * distance,
        }
    }

    /// Drops the sub-tile offset on the axis perpendicular to `dir`.
    pub fn snapped_for(self, dir: Direction) -> Position {
        if dir.is_horizontal() {
            Position::new(self.x, self.y.floor())
        } else if dir.is_vertical() {
            Position::new(self.x.floor(), self.y)
        } else {
            self
        }
    }

    /// Toroidal correction. An axis only wraps once the entity is a full tile
    /// past the edge, so the tunnel mouth stays visible while crossing it.
    pub fn wrapped(self, width: usize, height: usize) -> Position {
        let w = width as f64;
        let h = height as f64;
        let mut x = self.x;
        let mut y = self.y;
        if x < -1.0 {
            x += w;
        } else if x > w {
            x -= w;
        }
        if y < -1.0 {
            y += h;
        } else if y > h {
            y -= h;
        }
        debug_assert!(
            (-1.0..=w).contains(&x) && (-1.0..=h).contains(&y),
            "position ({x}, {y}) escaped a {width}x{height} grid"
        );
        if !(-1.0..=w).contains(&x) || !(-1.0..=h).contains(&y) {
            tracing::warn!(x, y, "position outside grid after wrap, clamping");
            x = x.clamp(-1.0, w);
            y = y.clamp(-1.0, h);
        }
        Position { x, y }
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.tile() == other.tile()
    }
}

impl From<Tile> for Position {
    fn from(tile: Tile) -> Self {
        tile.origin()
    }
}
