use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::num::Saturating;
use hashbrown::HashSet;
use ndarray::Array4;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum BoardState {
    Ready,
    Active,
    Won,
    Lost,
}

impl BoardState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }

    pub const fn is_won(self) -> bool {
        matches!(self, Self::Won)
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::Ready
    }
}

/// 4-dimensional mine board: owns the cell grid and applies the shell's
/// reveal/flag requests. Invalid or stale requests are silent no-ops.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineBoard {
    layout: MineLayout,
    board: Array4<CellState>,
    revealed_count: Saturating<CellCount>,
    flagged_count: Saturating<CellCount>,
    state: BoardState,
    triggered: Option<Coord4>,
}

impl MineBoard {
    pub fn new(layout: MineLayout) -> Self {
        let dim = hyper_dim(layout.size());
        Self {
            layout,
            board: Array4::default(dim),
            revealed_count: Saturating(0),
            flagged_count: Saturating(0),
            state: Default::default(),
            triggered: None,
        }
    }

    /// Fresh board from the given configuration and placement seed.
    pub fn generate(config: GameConfig, seed: u64) -> Result<Self> {
        Ok(Self::new(RandomMineGenerator::new(seed).generate(config)?))
    }

    /// Replace the board with a freshly generated one of the same
    /// configuration.
    pub fn reset(&mut self, seed: u64) -> Result<()> {
        *self = Self::generate(self.layout.game_config(), seed)?;
        Ok(())
    }

    pub fn state(&self) -> BoardState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn size(&self) -> Coord {
        self.layout.size()
    }

    pub fn total_mines(&self) -> CellCount {
        self.layout.mine_count()
    }

    pub fn mines_left(&self) -> isize {
        (self.layout.mine_count() as isize) - (self.flagged_count.0 as isize)
    }

    pub fn cell_at(&self, coords: Coord4) -> CellState {
        self.board[coords.to_nd_index()]
    }

    pub fn has_mine_at(&self, coords: Coord4) -> bool {
        self.layout.contains_mine(coords)
    }

    pub fn triggered_mine(&self) -> Option<Coord4> {
        self.triggered
    }

    /// Count shown for a revealed safe cell: the static adjacency count minus
    /// the flags currently around it. Recomputed on every read, so it tracks
    /// flag changes; it can go negative under wrong flags.
    pub fn display_count(&self, coords: Coord4) -> Option<i8> {
        match self.cell_at(coords) {
            CellState::Revealed(count) => {
                Some(count as i8 - self.count_flagged_neighbors(coords) as i8)
            }
            _ => None,
        }
    }

    /// Reveal a single cell, flooding through its zero-count region.
    pub fn reveal(&mut self, coords: Coord4) -> RevealOutcome {
        use RevealOutcome::*;

        if self.state.is_finished() || !in_bounds(coords, self.size()) {
            return NoChange;
        }
        if !matches!(self.cell_at(coords), CellState::Hidden) {
            return NoChange;
        }

        let outcome = self.reveal_cell(coords);
        self.settle(outcome)
    }

    /// Batch reveal over the closed hyper-rectangle spanned by two corners.
    /// Every non-flagged, non-revealed member is revealed even when an
    /// earlier member detonated; the loss is declared once at the end.
    pub fn reveal_rect(&mut self, a: Coord4, b: Coord4) -> RevealOutcome {
        use RevealOutcome::*;

        let size = self.size();
        if self.state.is_finished() || !in_bounds(a, size) || !in_bounds(b, size) {
            return NoChange;
        }

        let mut outcome = NoChange;
        for coords in iter_rect(a, b) {
            if matches!(self.cell_at(coords), CellState::Hidden) {
                outcome = outcome | self.reveal_cell(coords);
            }
        }
        self.settle(outcome)
    }

    /// Flip the flag on an unrevealed cell, then run the one-level chain
    /// pass: any revealed neighbor whose adjusted count reaches zero has its
    /// remaining hidden neighbors revealed. A wrong flag can therefore
    /// detonate the board.
    pub fn toggle_flag(&mut self, coords: Coord4) -> RevealOutcome {
        use RevealOutcome::*;

        if self.state.is_finished() || !in_bounds(coords, self.size()) {
            return NoChange;
        }

        match self.cell_at(coords) {
            CellState::Hidden => {
                self.board[coords.to_nd_index()] = CellState::Flagged;
                self.flagged_count += 1;
            }
            CellState::Flagged => {
                self.board[coords.to_nd_index()] = CellState::Hidden;
                self.flagged_count -= 1;
            }
            CellState::Revealed(_) | CellState::Mine => return NoChange,
        }

        let outcome = Marked | self.chain_reveal(coords);
        self.settle(outcome)
    }

    /// One pass of the flag-driven chain around a toggled flag. The reveals
    /// it causes do not re-trigger the pass.
    fn chain_reveal(&mut self, coords: Coord4) -> RevealOutcome {
        use RevealOutcome::*;

        let zero_adjusted: SmallVec<[Coord4; 80]> = self
            .board
            .iter_neighbors(coords)
            .filter(|&pos| match self.board[pos.to_nd_index()] {
                CellState::Revealed(count) => count == self.count_flagged_neighbors(pos),
                _ => false,
            })
            .collect();

        let mut outcome = NoChange;
        for center in zero_adjusted {
            let hidden: SmallVec<[Coord4; 80]> = self
                .board
                .iter_neighbors(center)
                .filter(|&pos| matches!(self.board[pos.to_nd_index()], CellState::Hidden))
                .collect();
            for pos in hidden {
                outcome = outcome | self.reveal_cell(pos);
            }
        }
        outcome
    }

    /// Reveal one hidden cell. A mine becomes visible immediately, but the
    /// terminal transition is deferred to [`Self::settle`] so that batch
    /// operations keep processing their remaining cells.
    fn reveal_cell(&mut self, coords: Coord4) -> RevealOutcome {
        use CellState::*;

        if !matches!(self.cell_at(coords), Hidden) {
            return RevealOutcome::NoChange;
        }

        if self.layout.contains_mine(coords) {
            self.board[coords.to_nd_index()] = Mine;
            self.triggered.get_or_insert(coords);
            log::debug!("mine revealed at {:?}", coords);
            return RevealOutcome::Exploded;
        }

        let count = self.layout.adjacent_mine_count(coords);
        self.board[coords.to_nd_index()] = Revealed(count);
        self.revealed_count += 1;
        log::debug!("cell revealed at {:?}, adjacent mines: {}", coords, count);

        if count == 0 {
            let mut visited: HashSet<Coord4> = HashSet::new();
            visited.insert(coords);
            let mut to_visit: VecDeque<_> = self
                .board
                .iter_neighbors(coords)
                .filter(|&pos| matches!(self.board[pos.to_nd_index()], Hidden))
                .collect();

            while let Some(visit) = to_visit.pop_front() {
                if !visited.insert(visit) {
                    continue;
                }

                // flagged and already revealed cells stop the fill
                if !matches!(self.cell_at(visit), Hidden) {
                    continue;
                }

                let visit_count = self.layout.adjacent_mine_count(visit);
                self.board[visit.to_nd_index()] = Revealed(visit_count);
                self.revealed_count += 1;
                log::trace!("flood revealed {:?}, adjacent mines: {}", visit, visit_count);

                // a zero cell cannot border a mine, so the fill stays safe
                if visit_count == 0 {
                    to_visit.extend(
                        self.board
                            .iter_neighbors(visit)
                            .filter(|&pos| matches!(self.board[pos.to_nd_index()], Hidden))
                            .filter(|pos| !visited.contains(pos)),
                    );
                }
            }
        }

        RevealOutcome::Revealed
    }

    /// End-of-request rules shared by single, batch, and flag-driven reveals:
    /// detonate if any mine came up, otherwise check for the win.
    fn settle(&mut self, outcome: RevealOutcome) -> RevealOutcome {
        use RevealOutcome::*;

        match outcome {
            Exploded => {
                self.end_game(false);
                Exploded
            }
            Revealed | Marked => {
                if self.revealed_count == Saturating(self.layout.safe_cell_count()) {
                    self.end_game(true);
                    Won
                } else {
                    self.mark_started();
                    outcome
                }
            }
            NoChange | Won => outcome,
        }
    }

    fn mark_started(&mut self) {
        if matches!(self.state, BoardState::Ready) {
            self.state = BoardState::Active;
        }
    }

    fn end_game(&mut self, won: bool) {
        if self.state.is_finished() {
            return;
        }
        self.state = if won { BoardState::Won } else { BoardState::Lost };
        log::debug!("game ended, won: {}", won);
        self.reveal_mines(won);
    }

    /// Make every mine visible for the end-of-game display: flagged on a
    /// win, detonated on a loss.
    fn reveal_mines(&mut self, won: bool) {
        use CellState::*;

        for coords in iter_cells(self.size()) {
            if !self.layout.contains_mine(coords) {
                continue;
            }
            match self.cell_at(coords) {
                Hidden if won => {
                    self.board[coords.to_nd_index()] = Flagged;
                    self.flagged_count += 1;
                }
                Hidden => self.board[coords.to_nd_index()] = Mine,
                Flagged if !won => {
                    self.board[coords.to_nd_index()] = Mine;
                    self.flagged_count -= 1;
                }
                _ => {}
            }
        }
    }

    fn count_flagged_neighbors(&self, coords: Coord4) -> u8 {
        self.board
            .iter_neighbors(coords)
            .filter(|&pos| matches!(self.board[pos.to_nd_index()], CellState::Flagged))
            .count()
            .try_into()
            .unwrap()
    }

    /// Immutable render model for the shell.
    pub fn snapshot(&self) -> BoardSnapshot {
        let cells = iter_cells(self.size())
            .map(|coords| {
                let cell = self.cell_at(coords);
                CellView {
                    mine: self.layout.contains_mine(coords),
                    revealed: cell.is_revealed(),
                    flagged: matches!(cell, CellState::Flagged),
                    count: self.display_count(coords),
                }
            })
            .collect();

        BoardSnapshot {
            size: self.size(),
            state: self.state,
            mines_left: self.mines_left(),
            triggered: self.triggered,
            cells,
        }
    }
}

/// Per-cell entry of a [`BoardSnapshot`], in [`iter_cells`] order.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellView {
    pub mine: bool,
    pub revealed: bool,
    pub flagged: bool,
    /// Adjusted count for revealed safe cells, recomputed at snapshot time.
    pub count: Option<i8>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub size: Coord,
    pub state: BoardState,
    pub mines_left: isize,
    pub triggered: Option<Coord4>,
    pub cells: Vec<CellView>,
}
