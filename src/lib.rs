#![no_std]

extern crate alloc;

use alloc::collections::BTreeSet;
use core::ops::BitOr;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use difficulty::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use types::*;

mod cell;
mod difficulty;
mod engine;
mod error;
mod generator;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Clamps rows and columns to at least 1 and the mine count to the cell
    /// count. Never rejects: malformed requests always yield a valid config.
    pub fn new((rows, cols): Coord2, mines: CellCount) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        let mines = mines.min(mult(rows, cols));
        Self::new_unchecked((rows, cols), mines)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}

/// An immutable grid layout plus the engine-owned per-cell state. Mine
/// placement never changes after generation; any change of placement goes
/// through a full regeneration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub(crate) cells: Array2<Cell>,
    pub(crate) mines: CellCount,
}

impl Board {
    /// Builds a board with mines at exactly the given coordinates, mostly
    /// useful for deterministic setups.
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut cells: Array2<Cell> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoords);
            }
            cells[coords.to_nd_index()].is_mine = true;
        }

        let mines = cells
            .iter()
            .filter(|cell| cell.is_mine)
            .count()
            .try_into()
            .unwrap();
        let mut board = Self { cells, mines };
        board.compute_adjacency();
        Ok(board)
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.cells.dim();
        (dim.0.try_into().unwrap(), dim.1.try_into().unwrap())
    }

    pub fn rows(&self) -> Coord {
        self.size().0
    }

    pub fn cols(&self) -> Coord {
        self.size().1
    }

    pub fn config(&self) -> GameConfig {
        GameConfig {
            size: self.size(),
            mines: self.mines,
        }
    }

    pub fn total_cells(&self) -> CellCount {
        self.cells.len().try_into().unwrap()
    }

    pub fn mine_count(&self) -> CellCount {
        self.mines
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mines
    }

    pub fn flagged_count(&self) -> CellCount {
        self.cells
            .iter()
            .filter(|cell| cell.is_flagged)
            .count()
            .try_into()
            .unwrap()
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        let size = self.size();
        coords.0 < size.0 && coords.1 < size.1
    }

    pub fn cell(&self, coords: Coord2) -> Cell {
        self.cells[coords.to_nd_index()]
    }

    pub(crate) fn cell_mut(&mut self, coords: Coord2) -> &mut Cell {
        &mut self.cells[coords.to_nd_index()]
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> impl Iterator<Item = Coord2> + use<> {
        neighbors(coords, self.size())
    }

    /// The clicked cell plus its in-bounds neighbors; excluded from mine
    /// placement on the first move of a match.
    pub fn safe_zone(&self, coords: Coord2) -> BTreeSet<Coord2> {
        let mut zone: BTreeSet<Coord2> = self.iter_neighbors(coords).collect();
        zone.insert(coords);
        zone
    }

    /// Win scan: true when no cell is both safe and unrevealed.
    pub fn all_safe_revealed(&self) -> bool {
        !self.cells.iter().any(Cell::is_safe_unrevealed)
    }

    /// Computed once per generation, after mine placement is finalized.
    pub(crate) fn compute_adjacency(&mut self) {
        let bounds = self.size();
        for row in 0..bounds.0 {
            for col in 0..bounds.1 {
                let count = neighbors((row, col), bounds)
                    .filter(|&pos| self.cells[pos.to_nd_index()].is_mine)
                    .count()
                    .try_into()
                    .unwrap();
                self.cells[(row, col).to_nd_index()].adjacent_mines = count;
            }
        }
    }

    /// End-of-game display: uncovers every mine without touching flags or the
    /// exploded marker.
    pub(crate) fn reveal_all_mines(&mut self) {
        for cell in self.cells.iter_mut().filter(|cell| cell.is_mine) {
            cell.is_revealed = true;
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        matches!(self, Self::Changed)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }

    pub const fn ends_match(self) -> bool {
        matches!(self, Self::HitMine | Self::Won)
    }
}

/// Used to merge per-cell outcomes when a chord opens several neighbors.
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (HitMine, _) | (_, HitMine) => HitMine,
            (Won, _) | (_, Won) => Won,
            (Revealed, _) | (_, Revealed) => Revealed,
            (NoChange, NoChange) => NoChange,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_clamps_dimensions_and_mines() {
        let config = GameConfig::new((0, 0), 99);

        assert_eq!(config.size, (1, 1));
        assert_eq!(config.mines, 1);
    }

    #[test]
    fn config_allows_zero_mines() {
        let config = GameConfig::new((3, 3), 0);

        assert_eq!(config.mines, 0);
        assert_eq!(config.total_cells(), 9);
    }

    #[test]
    fn from_mine_coords_counts_adjacency() {
        let board = Board::from_mine_coords((3, 3), &[(0, 0), (2, 2)]).unwrap();

        assert_eq!(board.mine_count(), 2);
        assert_eq!(board.cell((1, 1)).adjacent_mines, 2);
        assert_eq!(board.cell((0, 1)).adjacent_mines, 1);
        assert_eq!(board.cell((0, 2)).adjacent_mines, 0);
        assert_eq!(board.cell((0, 0)).adjacent_mines, 0);
    }

    #[test]
    fn from_mine_coords_rejects_out_of_bounds() {
        let result = Board::from_mine_coords((2, 2), &[(2, 0)]);

        assert_eq!(result, Err(GameError::InvalidCoords));
    }

    #[test]
    fn duplicate_mine_coords_collapse() {
        let board = Board::from_mine_coords((2, 2), &[(0, 0), (0, 0)]).unwrap();

        assert_eq!(board.mine_count(), 1);
    }

    #[test]
    fn adjacency_matches_brute_force() {
        let board = Board::from_mine_coords((4, 4), &[(0, 1), (1, 1), (3, 0), (3, 3)]).unwrap();

        for row in 0..4 {
            for col in 0..4 {
                let expected = board
                    .iter_neighbors((row, col))
                    .filter(|&pos| board.cell(pos).is_mine)
                    .count() as u8;
                assert_eq!(board.cell((row, col)).adjacent_mines, expected);
            }
        }
    }

    #[test]
    fn safe_zone_covers_cell_and_neighbors() {
        let board = Board::from_mine_coords((5, 5), &[]).unwrap();

        assert_eq!(board.safe_zone((2, 2)).len(), 9);
        assert_eq!(board.safe_zone((0, 0)).len(), 4);
        assert_eq!(board.safe_zone((0, 2)).len(), 6);
    }

    #[test]
    fn reveal_all_mines_keeps_flags() {
        let mut board = Board::from_mine_coords((2, 2), &[(0, 0), (1, 1)]).unwrap();
        board.cell_mut((0, 0)).is_flagged = true;

        board.reveal_all_mines();

        assert!(board.cell((0, 0)).is_revealed);
        assert!(board.cell((0, 0)).is_flagged);
        assert!(board.cell((1, 1)).is_revealed);
        assert!(!board.cell((0, 1)).is_revealed);
    }

    #[test]
    fn reveal_outcome_merge_prefers_terminal_results() {
        use RevealOutcome::*;

        assert_eq!(NoChange | Revealed, Revealed);
        assert_eq!(Revealed | Won, Won);
        assert_eq!(Won | HitMine, HitMine);
        assert_eq!(NoChange | NoChange, NoChange);
        assert!(HitMine.ends_match());
        assert!(!Revealed.ends_match());
        assert!(Revealed.has_update());
        assert!(MarkOutcome::Changed.has_update());
    }

    #[test]
    fn board_survives_serde_round_trip() {
        let mut board = Board::from_mine_coords((3, 2), &[(1, 0)]).unwrap();
        board.cell_mut((0, 1)).is_revealed = true;

        let encoded = serde_json::to_string(&board).unwrap();
        let decoded: Board = serde_json::from_str(&encoded).unwrap();

        assert_eq!(decoded, board);
    }
}
