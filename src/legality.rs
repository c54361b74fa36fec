//! Move legality on a continuous position constrained to the tile grid.
//!
//! A move is legal when the entity is aligned on the perpendicular axis and
//! the tile it is about to enter is not a wall. Entities are anchored at the
//! top-left corner of their tile, so a wall to the right or below is hit as
//! soon as the entity sits in the neighbouring tile, while a wall to the left
//! or above is only hit once the entity has drifted back to its tile origin.

use crate::grid::Grid;
use crate::position::{Direction, Position};

/// Tolerance for treating a sub-tile offset as "on the tile boundary".
pub const ALIGN_EPSILON: f64 = 0.05;

/// Longest distance an entity travels between two legality checks. Smaller
/// than [`ALIGN_EPSILON`] so no aligned window can be stepped over.
pub const MAX_SUBSTEP: f64 = 0.04;

/// Splits `distance` into equal sub-steps no longer than [`MAX_SUBSTEP`].
pub fn substeps(distance: f64) -> (usize, f64) {
    if !distance.is_finite() || distance <= 0.0 {
        return (0, 0.0);
    }
    let count = (distance / MAX_SUBSTEP).ceil() as usize;
    (count, distance / count as f64)
}

pub fn is_legal(dir: Direction, pos: Position, grid: &Grid) -> bool {
    let tile = pos.tile();
    let (fx, fy) = pos.fraction();
    let x_aligned = fx < ALIGN_EPSILON;
    let y_aligned = fy < ALIGN_EPSILON;
    let blocked = |d: Direction| grid.is_wall(tile.step(d));

    match dir {
        Direction::None => true,
        Direction::Left => y_aligned && !(x_aligned && blocked(Direction::Left)),
        Direction::Up => x_aligned && !(y_aligned && blocked(Direction::Up)),
        Direction::Right => y_aligned && !blocked(Direction::Right),
        Direction::Down => x_aligned && !blocked(Direction::Down),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Tile;

    // Column 2 is a corridor crossing row 2; everything else is wall.
    fn cross() -> Grid {
        Grid::from_rows(&[
            "#####", //
            "##.##", //
            "#S...", //
            "##.##", //
            "#####",
        ])
        .unwrap()
    }

    fn at(x: f64, y: f64) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn substeps_never_exceed_the_alignment_window() {
        assert_eq!(substeps(0.0), (0, 0.0));
        assert_eq!(substeps(f64::NAN), (0, 0.0));
        let (count, step) = substeps(4.0 / 60.0);
        assert_eq!(count, 2);
        assert!(step < ALIGN_EPSILON);
        let (count, step) = substeps(1.0);
        assert_eq!(count, 25);
        assert!((step * count as f64 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn none_is_always_legal() {
        let grid = cross();
        assert!(is_legal(Direction::None, at(0.0, 0.0), &grid));
        assert!(is_legal(Direction::None, at(2.5, 2.5), &grid));
    }

    #[test]
    fn aligned_wall_checks_are_symmetric() {
        let grid = cross();
        // (1, 2): wall left, open right, walls above and below.
        let p = at(1.0, 2.0);
        assert!(!is_legal(Direction::Left, p, &grid));
        assert!(is_legal(Direction::Right, p, &grid));
        assert!(!is_legal(Direction::Up, p, &grid));
        assert!(!is_legal(Direction::Down, p, &grid));

        // (2, 2): open in all four directions.
        let p = at(2.0, 2.0);
        for dir in Direction::MOVES {
            assert!(is_legal(dir, p, &grid), "{dir:?}");
        }

        // (2, 1): only down leads out.
        let p = at(2.0, 1.0);
        assert!(!is_legal(Direction::Up, p, &grid));
        assert!(is_legal(Direction::Down, p, &grid));
        assert!(!is_legal(Direction::Left, p, &grid));
        assert!(!is_legal(Direction::Right, p, &grid));
    }

    #[test]
    fn left_and_up_walls_only_block_at_the_tile_origin() {
        let grid = cross();
        assert!(is_legal(Direction::Left, at(1.5, 2.0), &grid));
        assert!(is_legal(Direction::Left, at(1.0 + ALIGN_EPSILON, 2.0), &grid));
        assert!(!is_legal(Direction::Left, at(1.01, 2.0), &grid));

        assert!(is_legal(Direction::Up, at(2.0, 1.5), &grid));
        assert!(!is_legal(Direction::Up, at(2.0, 1.02), &grid));
    }

    #[test]
    fn right_and_down_walls_block_anywhere_in_the_tile() {
        let grid = Grid::from_rows(&["#####", "#S.##", "#.###", "#####"]).unwrap();
        assert!(is_legal(Direction::Right, at(1.5, 1.0), &grid));
        assert!(!is_legal(Direction::Right, at(2.0, 1.0), &grid));
        assert!(!is_legal(Direction::Right, at(2.7, 1.0), &grid));
        assert!(is_legal(Direction::Down, at(1.0, 1.5), &grid));
        assert!(!is_legal(Direction::Down, at(1.0, 2.4), &grid));
    }

    #[test]
    fn perpendicular_misalignment_blocks_turns() {
        let grid = cross();
        // Half way between (1, 2) and (2, 2): up/down are not yet possible.
        assert!(!is_legal(Direction::Up, at(1.5, 2.0), &grid));
        assert!(!is_legal(Direction::Down, at(1.5, 2.0), &grid));
        // Mid-way down the vertical corridor: left/right are not possible.
        assert!(!is_legal(Direction::Left, at(2.0, 1.5), &grid));
        assert!(!is_legal(Direction::Right, at(2.0, 1.5), &grid));
        // Within the tolerance the turn opens up.
        assert!(is_legal(Direction::Up, at(2.03, 2.0), &grid));
        assert!(is_legal(Direction::Right, at(2.0, 2.04), &grid));
    }

    #[test]
    fn open_edges_act_as_tunnels() {
        let grid = cross();
        // Row 2 is open at x=4 but closed at x=0, so x=4 -> right wraps into a wall.
        assert!(grid.is_wall(Tile::new(5, 2)));
        assert!(!is_legal(Direction::Right, at(4.0, 2.0), &grid));

        let tunnel = Grid::from_rows(&["#####", " S.. ", "#####"]).unwrap();
        assert!(is_legal(Direction::Right, at(4.0, 1.0), &tunnel));
        assert!(is_legal(Direction::Left, at(0.0, 1.0), &tunnel));
        assert!(is_legal(Direction::Left, at(-0.5, 1.0), &tunnel));
        assert!(!is_legal(Direction::Up, at(-1.0, 1.0), &tunnel));
    }

    #[test]
    fn builtin_tunnel_row() {
        let grid = Grid::builtin();
        assert!(is_legal(Direction::Left, at(0.0, 14.0), &grid));
        assert!(is_legal(Direction::Right, at(27.0, 14.0), &grid));
        assert!(!is_legal(Direction::Left, at(1.0, 13.0), &grid));
    }
}
