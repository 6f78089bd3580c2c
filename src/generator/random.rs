use alloc::vec::Vec;
use ndarray::Array2;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::index;

use super::*;

/// Uniform mine placement without replacement over the cells left eligible by
/// the exclusion set. Mine counts that do not fit are clamped, never rejected.
#[derive(Clone, Debug)]
pub struct RandomBoardGenerator {
    rng: SmallRng,
}

impl RandomBoardGenerator {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn from_rng(rng: &mut impl rand::RngCore) -> Self {
        Self {
            rng: SmallRng::from_rng(rng),
        }
    }
}

impl BoardGenerator for RandomBoardGenerator {
    fn generate(&mut self, config: GameConfig, excluded: &BTreeSet<Coord2>) -> Board {
        let config = GameConfig::new(config.size, config.mines);
        let (rows, cols) = config.size;

        let mut eligible = Vec::with_capacity(config.total_cells() as usize);
        for row in 0..rows {
            for col in 0..cols {
                if !excluded.contains(&(row, col)) {
                    eligible.push((row, col));
                }
            }
        }

        let mines = (config.mines as usize).min(eligible.len());
        if mines < config.mines as usize {
            log::warn!(
                "requested {} mines but only {} cells are eligible, clamping",
                config.mines,
                eligible.len()
            );
        }

        let mut cells: Array2<Cell> = Array2::default(config.size.to_nd_index());
        for pos in index::sample(&mut self.rng, eligible.len(), mines) {
            cells[eligible[pos].to_nd_index()].is_mine = true;
        }

        let mut board = Board {
            cells,
            mines: mines.try_into().unwrap(),
        };
        board.compute_adjacency();
        board
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn places_exactly_the_requested_mines() {
        for seed in 0..20 {
            let mut generator = RandomBoardGenerator::from_seed(seed);
            let board = generator.generate(GameConfig::new((10, 10), 10), &BTreeSet::new());

            assert_eq!(board.mine_count(), 10);
            let placed = (0..10)
                .flat_map(|row| (0..10).map(move |col| (row, col)))
                .filter(|&pos| board.cell(pos).is_mine)
                .count();
            assert_eq!(placed, 10);
        }
    }

    #[test]
    fn never_places_mines_on_excluded_cells() {
        for seed in 0..20 {
            let mut generator = RandomBoardGenerator::from_seed(seed);
            let excluded: BTreeSet<Coord2> =
                [(5, 5), (4, 4), (4, 5), (4, 6), (5, 4), (5, 6), (6, 4), (6, 5), (6, 6)]
                    .into_iter()
                    .collect();

            let board = generator.generate(GameConfig::new((10, 10), 10), &excluded);

            assert_eq!(board.mine_count(), 10);
            for &pos in &excluded {
                assert!(!board.cell(pos).is_mine, "mine on excluded cell {pos:?}");
            }
        }
    }

    #[test]
    fn adjacency_counts_match_placement() {
        let mut generator = RandomBoardGenerator::from_seed(7);
        let board = generator.generate(GameConfig::new((8, 8), 12), &BTreeSet::new());

        for row in 0..8 {
            for col in 0..8 {
                let expected = board
                    .iter_neighbors((row, col))
                    .filter(|&pos| board.cell(pos).is_mine)
                    .count() as u8;
                assert_eq!(board.cell((row, col)).adjacent_mines, expected);
            }
        }
    }

    #[test]
    fn clamps_mines_to_eligible_cells() {
        let mut generator = RandomBoardGenerator::from_seed(0);
        let excluded: BTreeSet<Coord2> = [(0, 0)].into_iter().collect();

        let board = generator.generate(GameConfig::new((2, 2), 99), &excluded);

        assert_eq!(board.mine_count(), 3);
        assert!(!board.cell((0, 0)).is_mine);
    }

    #[test]
    fn out_of_bounds_exclusions_are_ignored() {
        let mut generator = RandomBoardGenerator::from_seed(3);
        let excluded: BTreeSet<Coord2> = [(9, 9)].into_iter().collect();

        let board = generator.generate(GameConfig::new((2, 2), 4), &excluded);

        assert_eq!(board.mine_count(), 4);
    }

    #[test]
    fn zero_mines_yields_an_empty_field() {
        let mut generator = RandomBoardGenerator::from_seed(1);
        let board = generator.generate(GameConfig::new((4, 4), 0), &BTreeSet::new());

        assert_eq!(board.mine_count(), 0);
        assert!((0..4).all(|row| (0..4).all(|col| !board.cell((row, col)).is_mine)));
    }

    #[test]
    fn same_seed_generates_the_same_board() {
        let config = GameConfig::new((9, 9), 15);
        let first = RandomBoardGenerator::from_seed(42).generate(config, &BTreeSet::new());
        let second = RandomBoardGenerator::from_seed(42).generate(config, &BTreeSet::new());

        assert_eq!(first, second);
    }
}
