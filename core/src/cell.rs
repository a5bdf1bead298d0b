use serde::{Deserialize, Serialize};

/// Canonical player-visible state of one board cell.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CellState {
    Hidden,
    Flagged,
    /// Revealed safe cell carrying its static adjacent-mine count.
    Revealed(u8),
    /// Revealed mine; only reachable once the game has ended.
    Mine,
}

impl CellState {
    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed(_) | Self::Mine)
    }

    pub const fn is_unrevealed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged)
    }
}

impl Default for CellState {
    fn default() -> Self {
        Self::Hidden
    }
}
