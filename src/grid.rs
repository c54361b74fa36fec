//! The maze: an immutable cell layout plus the running coin counter.

use std::path::Path;

use tracing::warn;

use crate::config::Config;
use crate::error::TemplateError;
use crate::ghost::GhostKind;
use crate::position::Tile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Wall,
    Coin,
    PowerPellet,
    PlayerStart,
    GhostStart(GhostKind),
    Empty,
}

impl Cell {
    pub fn from_symbol(symbol: char) -> Option<Cell> {
        let cell = match symbol {
            '#' => Cell::Wall,
            '.' => Cell::Coin,
            'o' => Cell::PowerPellet,
            'S' => Cell::PlayerStart,
            '1' => Cell::GhostStart(GhostKind::Manhattan),
            '2' => Cell::GhostStart(GhostKind::Euclidean),
            '3' => Cell::GhostStart(GhostKind::Max),
            ' ' => Cell::Empty,
            _ => return None,
        };
        Some(cell)
    }

    pub fn symbol(self) -> char {
        match self {
            Cell::Wall => '#',
            Cell::Coin => '.',
            Cell::PowerPellet => 'o',
            Cell::PlayerStart => 'S',
            Cell::GhostStart(GhostKind::Manhattan) => '1',
            Cell::GhostStart(GhostKind::Euclidean) => '2',
            Cell::GhostStart(GhostKind::Max) => '3',
            Cell::Empty => ' ',
        }
    }
}

const BUILTIN_MAZE: [&str; 31] = [
    "############################",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#o####.#####.##.#####.####o#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.##### ## #####.######",
    "######.##### ## #####.######",
    "######.##          ##.######",
    "######.## ###  ### ##.######",
    "######.## #      # ##.######",
    "      .   # 312  #   .      ",
    "######.## #      # ##.######",
    "######.## ######## ##.######",
    "######.##          ##.######",
    "######.## ######## ##.######",
    "######.## ######## ##.######",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#o..##.......S .......##..o#",
    "###.##.##.########.##.##.###",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#.##########.##.##########.#",
    "#.##########.##.##########.#",
    "#..........................#",
    "############################",
];

#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    player_start: Tile,
    template_coins: usize,
    coins_remaining: usize,
}

impl Grid {
    /// The classic 28x31 board with a horizontal tunnel on row 14.
    pub fn builtin() -> Grid {
        Grid::from_rows(&BUILTIN_MAZE).expect("built-in maze is valid")
    }

    pub fn parse(text: &str) -> Result<Grid, TemplateError> {
        let rows: Vec<&str> = text
            .lines()
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect();
        Grid::from_rows(&rows)
    }

    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Grid, TemplateError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.as_ref().chars().count());
        if height == 0 || width == 0 {
            return Err(TemplateError::Empty);
        }

        let mut cells = Vec::with_capacity(width * height);
        let mut player_start = None;
        let mut coins = 0;
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != width {
                return Err(TemplateError::RaggedRow {
                    row: y,
                    expected: width,
                    found,
                });
            }
            for (x, symbol) in row.chars().enumerate() {
                let cell = Cell::from_symbol(symbol).ok_or(TemplateError::UnknownSymbol {
                    symbol,
                    row: y,
                    column: x,
                })?;
                match cell {
                    Cell::Coin => coins += 1,
                    Cell::PlayerStart if player_start.is_some() => {
                        return Err(TemplateError::DuplicatePlayerStart { row: y, column: x });
                    }
                    Cell::PlayerStart => player_start = Some(Tile::new(x as i32, y as i32)),
                    _ => {}
                }
                cells.push(cell);
            }
        }

        let player_start = player_start.ok_or(TemplateError::MissingPlayerStart)?;
        if coins == 0 {
            return Err(TemplateError::NoCoins);
        }

        Ok(Grid {
            width,
            height,
            cells,
            player_start,
            template_coins: coins,
            coins_remaining: coins,
        })
    }

    pub fn load(path: &Path) -> Result<Grid, TemplateError> {
        let text = std::fs::read_to_string(path).map_err(|source| TemplateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Grid::parse(&text)
    }

    /// Loads a custom maze sized to the configured grid, falling back to the
    /// built-in board on any problem. The configured size only applies to
    /// custom mazes; without one the built-in board is used as is.
    pub fn load_or_builtin(path: Option<&Path>, config: &Config) -> Grid {
        let Some(path) = path else {
            let grid = Grid::builtin();
            if (grid.width, grid.height) != (config.grid_width, config.grid_height) {
                warn!(
                    "configured grid size {}x{} ignored without a custom maze; using the built-in {}x{} board",
                    config.grid_width, config.grid_height, grid.width, grid.height
                );
            }
            return grid;
        };
        let loaded = Grid::load(path).and_then(|grid| {
            if grid.width != config.grid_width || grid.height != config.grid_height {
                Err(TemplateError::DimensionMismatch {
                    width: config.grid_width,
                    height: config.grid_height,
                    found_width: grid.width,
                    found_height: grid.height,
                })
            } else {
                Ok(grid)
            }
        });
        match loaded {
            Ok(grid) => grid,
            Err(err) => {
                warn!("{err}; using the built-in maze");
                Grid::builtin()
            }
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell at `tile`, wrapping coordinates that fall outside the board.
    pub fn cell(&self, tile: Tile) -> Cell {
        let x = tile.x.rem_euclid(self.width as i32) as usize;
        let y = tile.y.rem_euclid(self.height as i32) as usize;
        self.cells[y * self.width + x]
    }

    pub fn is_wall(&self, tile: Tile) -> bool {
        self.cell(tile) == Cell::Wall
    }

    pub fn player_start(&self) -> Tile {
        self.player_start
    }

    /// Every cell in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = (Tile, Cell)> + '_ {
        self.cells.iter().enumerate().map(|(idx, cell)| {
            let tile = Tile::new((idx % self.width) as i32, (idx / self.width) as i32);
            (tile, *cell)
        })
    }

    pub fn coins_remaining(&self) -> usize {
        self.coins_remaining
    }

    pub fn template_coins(&self) -> usize {
        self.template_coins
    }

    pub fn collect_coin(&mut self) {
        debug_assert!(self.coins_remaining > 0, "coin collected from an empty board");
        self.coins_remaining = self.coins_remaining.saturating_sub(1);
    }

    pub fn reset_coins(&mut self) {
        self.coins_remaining = self.template_coins;
    }

    /// Guard-mode target for a ghost, one corner per ghost kind.
    pub fn guard_post(&self, kind: GhostKind) -> Tile {
        let right = self.width as i32 - 2;
        let bottom = self.height as i32 - 2;
        match kind {
            GhostKind::Euclidean => Tile::new(1, 1),
            GhostKind::Manhattan => Tile::new(1, bottom),
            GhostKind::Max => Tile::new(right, bottom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_maze_matches_the_classic_board() {
        let grid = Grid::builtin();
        assert_eq!((grid.width(), grid.height()), (28, 31));
        assert_eq!(grid.template_coins(), 240);
        assert_eq!(grid.coins_remaining(), 240);
        assert_eq!(grid.player_start(), Tile::new(13, 23));
        let pellets = grid.tiles().filter(|(_, c)| *c == Cell::PowerPellet).count();
        assert_eq!(pellets, 4);
        let ghosts: Vec<_> = grid
            .tiles()
            .filter_map(|(t, c)| match c {
                Cell::GhostStart(kind) => Some((t, kind)),
                _ => None,
            })
            .collect();
        assert_eq!(
            ghosts,
            vec![
                (Tile::new(12, 14), GhostKind::Max),
                (Tile::new(13, 14), GhostKind::Manhattan),
                (Tile::new(14, 14), GhostKind::Euclidean),
            ]
        );
    }

    #[test]
    fn lookups_wrap_around_the_edges() {
        let grid = Grid::builtin();
        assert_eq!(grid.cell(Tile::new(-1, 14)), grid.cell(Tile::new(27, 14)));
        assert_eq!(grid.cell(Tile::new(28, 14)), grid.cell(Tile::new(0, 14)));
        assert!(grid.is_wall(Tile::new(-1, 13)));
        assert!(!grid.is_wall(Tile::new(-1, 14)));
    }

    #[test]
    fn parse_accepts_crlf_and_round_trips_symbols() {
        let grid = Grid::parse("#####\r\n#S.o#\r\n#123#\r\n#####\r\n").unwrap();
        assert_eq!((grid.width(), grid.height()), (5, 4));
        let rendered: String = grid.tiles().map(|(_, c)| c.symbol()).collect();
        assert_eq!(rendered, "######S.o##123######");
    }

    #[test]
    fn rejects_unknown_symbols() {
        let err = Grid::from_rows(&["###", "#S.", "#X#"]).unwrap_err();
        assert!(matches!(
            err,
            TemplateError::UnknownSymbol { symbol: 'X', row: 2, column: 1 }
        ));
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = Grid::from_rows(&["####", "#S.", "####"]).unwrap_err();
        assert!(matches!(err, TemplateError::RaggedRow { row: 1, expected: 4, found: 3 }));
    }

    #[test]
    fn rejects_boards_without_player_or_coins() {
        assert!(matches!(
            Grid::from_rows(&["###", "#.#", "###"]),
            Err(TemplateError::MissingPlayerStart)
        ));
        assert!(matches!(
            Grid::from_rows(&["####", "#S #", "####"]),
            Err(TemplateError::NoCoins)
        ));
        assert!(matches!(
            Grid::from_rows(&["#####", "#S.S#", "#####"]),
            Err(TemplateError::DuplicatePlayerStart { row: 1, column: 3 })
        ));
        assert!(matches!(Grid::parse(""), Err(TemplateError::Empty)));
    }

    #[test]
    fn coin_counter_resets_to_template() {
        let mut grid = Grid::from_rows(&["#####", "#S..#", "#####"]).unwrap();
        grid.collect_coin();
        grid.collect_coin();
        assert_eq!(grid.coins_remaining(), 0);
        grid.reset_coins();
        assert_eq!(grid.coins_remaining(), 2);
    }

    #[test]
    fn custom_maze_must_match_configured_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("small.txt");
        std::fs::write(&path, "#####\n#S..#\n#####\n").unwrap();

        let fallback = Grid::load_or_builtin(Some(&path), &Config::default());
        assert_eq!(fallback.width(), 28);

        let config = Config {
            grid_width: 5,
            grid_height: 3,
            ..Config::default()
        };
        let custom = Grid::load_or_builtin(Some(&path), &config);
        assert_eq!((custom.width(), custom.height()), (5, 3));
        assert_eq!(custom.template_coins(), 2);
    }

    #[test]
    fn configured_size_without_a_maze_keeps_the_builtin_board() {
        let config = Config {
            grid_width: 10,
            grid_height: 12,
            ..Config::default()
        };
        let grid = Grid::load_or_builtin(None, &config);
        assert_eq!((grid.width(), grid.height()), (28, 31));
        assert_eq!(grid.template_coins(), 240);
    }

    #[test]
    fn guard_posts_are_distinct_corners() {
        let grid = Grid::builtin();
        let posts = [
            grid.guard_post(GhostKind::Manhattan),
            grid.guard_post(GhostKind::Euclidean),
            grid.guard_post(GhostKind::Max),
        ];
        assert_eq!(posts[0], Tile::new(1, 29));
        assert_eq!(posts[1], Tile::new(1, 1));
        assert_eq!(posts[2], Tile::new(26, 29));
        for post in posts {
            assert!(!grid.is_wall(post));
        }
    }
}
