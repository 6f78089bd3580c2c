use alloc::collections::BTreeSet;

use crate::*;
pub use random::*;

mod random;

/// Produces a fully initialized board for a config, with every cell in
/// `excluded` kept mine-free. Out-of-bounds excluded entries are ignored.
pub trait BoardGenerator {
    fn generate(&mut self, config: GameConfig, excluded: &BTreeSet<Coord2>) -> Board;
}
