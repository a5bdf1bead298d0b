#![no_std]

extern crate alloc;

use core::ops::{BitOr, Index};
use core::time::Duration;
use ndarray::Array4;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use error::*;
pub use generator::*;
pub use mines::*;
pub use snake::*;
pub use types::*;

mod cell;
mod error;
mod generator;
mod mines;
mod snake;
mod types;

/// Fixed mine-board configuration; the shell reads this instead of hardcoding
/// its own numbers.
pub const MINE_BOARD_CONFIG: GameConfig = GameConfig::new(4, 20);

/// Side length of the toroidal snake grid.
pub const SNAKE_GRID_SIZE: Coord = 6;

/// Cadence at which the external driver is expected to call
/// [`SnakeWorld::tick`].
pub const SNAKE_TICK_PERIOD: Duration = Duration::from_millis(400);

/// Mine-board dimensions. Validated when a layout is generated, not here.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new(size: Coord, mines: CellCount) -> Self {
        Self { size, mines }
    }

    pub const fn total_cells(&self) -> CellCount {
        total_cells(self.size)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }
}

/// Immutable mine placement over a `size^4` hypercube, plus the adjacency
/// counts derived from it once at construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array4<bool>,
    adjacency: Array4<u8>,
    mine_count: CellCount,
}

impl MineLayout {
    /// Builds a layout from a hypercubic mask, counting its mines and
    /// precomputing every safe cell's adjacent-mine count.
    pub fn from_mine_mask(mine_mask: Array4<bool>) -> Self {
        let mine_count = mine_mask
            .iter()
            .filter(|&&is_mine| is_mine)
            .count()
            .try_into()
            .unwrap();

        let size: Coord = mine_mask.dim().0.try_into().unwrap();
        let mut adjacency: Array4<u8> = Array4::default(mine_mask.raw_dim());
        for coords in iter_cells(size) {
            if mine_mask[coords.to_nd_index()] {
                continue;
            }
            adjacency[coords.to_nd_index()] = mine_mask
                .iter_neighbors(coords)
                .filter(|&pos| mine_mask[pos.to_nd_index()])
                .count()
                .try_into()
                .unwrap();
        }

        Self {
            mine_mask,
            adjacency,
            mine_count,
        }
    }

    pub fn from_mine_coords(size: Coord, mine_coords: &[Coord4]) -> Result<Self> {
        let mut mine_mask: Array4<bool> = Array4::default(hyper_dim(size));

        for &coords in mine_coords {
            if !in_bounds(coords, size) {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Ok(Self::from_mine_mask(mine_mask))
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            size: self.size(),
            mines: self.mine_count,
        }
    }

    pub fn size(&self) -> Coord {
        self.mine_mask.dim().0.try_into().unwrap()
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        self.mine_mask.len().try_into().unwrap()
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord4) -> bool {
        self[coords]
    }

    /// Static count fixed at construction; the flag-adjusted display value
    /// lives on [`MineBoard::display_count`].
    pub fn adjacent_mine_count(&self, coords: Coord4) -> u8 {
        self.adjacency[coords.to_nd_index()]
    }
}

impl Index<Coord4> for MineLayout {
    type Output = bool;

    fn index(&self, coords: Coord4) -> &Self::Output {
        &self.mine_mask[coords.to_nd_index()]
    }
}

/// Outcome of a reveal or flag request, also used to merge the per-cell
/// results of batch operations.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    NoChange,
    /// A flag was placed or removed without revealing anything.
    Marked,
    Revealed,
    Exploded,
    Won,
}

impl RevealOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (Exploded, _) | (_, Exploded) => Exploded,
            (Won, _) | (_, Won) => Won,
            (Revealed, _) | (_, Revealed) => Revealed,
            (Marked, _) | (_, Marked) => Marked,
            (NoChange, NoChange) => NoChange,
        }
    }
}

/// Outcome of one snake tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TickOutcome {
    NoChange,
    Moved,
    Ate,
    Died,
}

impl TickOutcome {
    /// Whether this outcome could have caused an update to the game
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}
