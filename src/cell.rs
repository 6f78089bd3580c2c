use serde::{Deserialize, Serialize};

/// Per-cell state. Mine placement and the adjacency count are fixed at board
/// generation; the three booleans are owned and mutated by the engine.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub is_mine: bool,
    pub adjacent_mines: u8,
    pub is_revealed: bool,
    pub is_flagged: bool,
    pub is_exploded: bool,
}

impl Cell {
    /// A cell that still has to be revealed for the match to be won.
    pub const fn is_safe_unrevealed(&self) -> bool {
        !self.is_mine && !self.is_revealed
    }

    /// Flag and reveal are mutually exclusive gates: either one blocks a reveal.
    pub const fn blocks_reveal(&self) -> bool {
        self.is_flagged || self.is_revealed
    }
}
