use serde::{Deserialize, Serialize};

use crate::{CellCount, Coord, GameConfig};

/// Named presets for the standard board sizes. The engine itself only ever
/// sees the raw numbers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Self::Beginner, Self::Intermediate, Self::Expert];

    pub const fn title(self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Expert => "Expert",
        }
    }

    pub const fn rows(self) -> Coord {
        match self {
            Self::Beginner => 10,
            Self::Intermediate => 20,
            Self::Expert => 50,
        }
    }

    pub const fn cols(self) -> Coord {
        match self {
            Self::Beginner => 10,
            Self::Intermediate => 20,
            Self::Expert => 30,
        }
    }

    pub const fn mines(self) -> CellCount {
        match self {
            Self::Beginner => 10,
            Self::Intermediate => 80,
            Self::Expert => 450,
        }
    }

    pub fn config(self) -> GameConfig {
        GameConfig::new((self.rows(), self.cols()), self.mines())
    }
}
