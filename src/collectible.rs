use tracing::debug;

use crate::game::GameState;
use crate::position::{Position, Tile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectibleKind {
    Coin,
    PowerPellet,
}

/// A coin or power pellet sitting on a maze tile.
#[derive(Debug, Clone)]
pub struct Collectible {
    kind: CollectibleKind,
    position: Position,
    collected: bool,
}

impl Collectible {
    pub fn new(kind: CollectibleKind, tile: Tile) -> Self {
        Self {
            kind,
            position: tile.origin(),
            collected: false,
        }
    }

    pub fn kind(&self) -> CollectibleKind {
        self.kind
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_collected(&self) -> bool {
        self.collected
    }

    /// Collects the item if the player stands on its tile. Returns whether
    /// that happened on this call.
    pub fn update(&mut self, state: &mut GameState) -> bool {
        if self.collected || self.position != state.player.position() {
            return false;
        }
        match self.kind {
            CollectibleKind::Coin => {
                state.grid.collect_coin();
                state.score += state.config.coin_points;
            }
            CollectibleKind::PowerPellet => {
                debug!(tile = ?self.position.tile(), "power pellet collected");
                state.mode.start_power_up();
            }
        }
        self.collected = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::grid::Grid;
    use crate::mode::GameMode;

    fn state() -> GameState {
        let grid = Grid::from_rows(&["######", "#S.o.#", "######"]).unwrap();
        GameState::new(Config::default(), grid, Default::default())
    }

    #[test]
    fn coin_scores_once() {
        let mut state = state();
        let mut coin = Collectible::new(CollectibleKind::Coin, Tile::new(2, 1));
        assert!(!coin.update(&mut state));

        state.player.place(Position::new(2.6, 1.0));
        assert!(coin.update(&mut state));
        assert!(coin.is_collected());
        assert_eq!(state.score, 10);
        assert_eq!(state.grid.coins_remaining(), 1);

        assert!(!coin.update(&mut state));
        assert_eq!(state.score, 10);
        assert_eq!(state.grid.coins_remaining(), 1);
    }

    #[test]
    fn pellet_powers_up_without_scoring() {
        let mut state = state();
        let mut pellet = Collectible::new(CollectibleKind::PowerPellet, Tile::new(3, 1));
        state.player.place(Position::new(3.0, 1.0));
        assert!(pellet.update(&mut state));
        assert_eq!(state.mode.mode(), GameMode::PowerUp);
        assert_eq!(state.score, 0);
        assert_eq!(state.grid.coins_remaining(), 2);
    }
}
