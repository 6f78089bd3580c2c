use alloc::collections::{BTreeSet, VecDeque};
use core::num::Saturating;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// External elapsed-time collaborator. The engine signals it on state
/// transitions; the host is expected to call [`GameEngine::tick`] once per
/// second between `start` and `stop`.
pub trait Clock {
    fn start(&mut self);
    fn stop(&mut self);
}

impl Clock for () {
    fn start(&mut self) {}

    fn stop(&mut self) {}
}

/// Single-threaded match session: one board, one status, one clock. Every
/// operation runs to completion; invalid input is a silent no-op rather than
/// an error.
#[derive(Clone, Debug)]
pub struct GameEngine<G, C = ()> {
    generator: G,
    clock: C,
    board: Board,
    status: GameStatus,
    first_move_pending: bool,
    has_started: bool,
    elapsed_secs: Saturating<u32>,
}

impl<G: BoardGenerator> GameEngine<G> {
    pub fn new(generator: G) -> Self {
        Self::with_clock(generator, ())
    }
}

impl<G: BoardGenerator, C: Clock> GameEngine<G, C> {
    /// Starts out with a placeholder 1x1 board; call [`Self::new_game`] to
    /// deal a real one.
    pub fn with_clock(mut generator: G, clock: C) -> Self {
        let board = generator.generate(GameConfig::new((1, 1), 0), &BTreeSet::new());
        Self {
            generator,
            clock,
            board,
            status: GameStatus::Playing,
            first_move_pending: true,
            has_started: false,
            elapsed_secs: Saturating(0),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn has_started(&self) -> bool {
        self.has_started
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs.0
    }

    /// How many mines have not been flagged yet, negative when overflagged.
    pub fn mines_left(&self) -> isize {
        (self.board.mine_count() as isize) - (self.board.flagged_count() as isize)
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Discards the session unconditionally and deals a fresh `Playing` board.
    /// The clock stays stopped until the first reveal.
    pub fn new_game(&mut self, rows: Coord, cols: Coord, mines: CellCount) {
        self.new_game_with(GameConfig::new((rows, cols), mines));
    }

    pub fn new_game_with(&mut self, config: GameConfig) {
        self.board = self.generator.generate(config, &BTreeSet::new());
        self.status = GameStatus::Playing;
        self.first_move_pending = true;
        self.has_started = true;
        self.elapsed_secs = Saturating(0);
        self.clock.stop();
    }

    pub fn reveal(&mut self, coords: Coord2) -> RevealOutcome {
        use RevealOutcome::*;

        if self.status.is_finished() || !self.board.contains(coords) {
            return NoChange;
        }
        if self.board.cell(coords).blocks_reveal() {
            return NoChange;
        }

        // The opening click can never detonate: the board is rebuilt around
        // it with the whole safe zone excluded from placement.
        if self.first_move_pending {
            let safe_zone = self.board.safe_zone(coords);
            self.board = self.generator.generate(self.board.config(), &safe_zone);
            self.first_move_pending = false;
            self.clock.start();
        }

        self.flood_reveal(coords);

        if self.board.cell(coords).is_mine {
            self.board.cell_mut(coords).is_exploded = true;
            self.end_game(false);
            return HitMine;
        }

        if self.board.all_safe_revealed() {
            self.end_game(true);
            Won
        } else {
            Revealed
        }
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> MarkOutcome {
        if self.status.is_finished() || !self.board.contains(coords) {
            return MarkOutcome::NoChange;
        }

        let cell = self.board.cell_mut(coords);
        if cell.is_revealed {
            return MarkOutcome::NoChange;
        }
        cell.is_flagged = !cell.is_flagged;
        MarkOutcome::Changed
    }

    /// Opens every unflagged neighbor of a revealed numbered cell, but only
    /// when its flagged-neighbor count matches its number exactly.
    pub fn chord_reveal(&mut self, coords: Coord2) -> RevealOutcome {
        use RevealOutcome::*;

        if self.status.is_finished() || !self.board.contains(coords) {
            return NoChange;
        }
        let cell = self.board.cell(coords);
        if !cell.is_revealed || cell.is_mine || cell.adjacent_mines == 0 {
            return NoChange;
        }
        if self.count_flagged_neighbors(coords) != cell.adjacent_mines {
            return NoChange;
        }

        let mut outcome = NoChange;
        for pos in self.board.iter_neighbors(coords) {
            let neighbor = self.board.cell(pos);
            if neighbor.is_flagged || neighbor.is_revealed {
                continue;
            }
            if neighbor.is_mine {
                // Match ends on the first mine hit; remaining neighbors are
                // left exactly as they were.
                let hit = self.board.cell_mut(pos);
                hit.is_revealed = true;
                hit.is_exploded = true;
                self.end_game(false);
                return HitMine;
            }
            self.flood_reveal(pos);
            outcome = outcome | Revealed;
        }

        if self.board.all_safe_revealed() {
            self.end_game(true);
            outcome = outcome | Won;
        }
        outcome
    }

    /// Once-per-second callback from the external timer. Counts only while a
    /// started match is still being played.
    pub fn tick(&mut self) {
        if self.status == GameStatus::Playing && !self.first_move_pending {
            self.elapsed_secs += 1;
        }
    }

    /// Breadth-first cascade. Zero-count cells expand to their neighbors;
    /// numbered cells are revealed without expanding; flagged cells act as
    /// barriers; a mine start is revealed but never used as a flood source.
    fn flood_reveal(&mut self, start: Coord2) {
        let mut visited = BTreeSet::new();
        let mut to_visit = VecDeque::from([start]);

        while let Some(coords) = to_visit.pop_front() {
            if !visited.insert(coords) {
                continue;
            }

            let cell = self.board.cell(coords);
            if cell.is_flagged || cell.is_revealed {
                continue;
            }
            self.board.cell_mut(coords).is_revealed = true;
            log::trace!("revealed {:?}, adjacent mines: {}", coords, cell.adjacent_mines);

            if cell.is_mine {
                continue;
            }
            if cell.adjacent_mines == 0 {
                to_visit.extend(
                    self.board
                        .iter_neighbors(coords)
                        .filter(|pos| !visited.contains(pos)),
                );
            }
        }
    }

    fn end_game(&mut self, won: bool) {
        if self.status.is_finished() {
            return;
        }

        self.status = if won { GameStatus::Won } else { GameStatus::Lost };
        log::debug!("match ended after {}s: {:?}", self.elapsed_secs.0, self.status);
        self.board.reveal_all_mines();
        self.clock.stop();
    }

    fn count_flagged_neighbors(&self, coords: Coord2) -> u8 {
        self.board
            .iter_neighbors(coords)
            .filter(|&pos| self.board.cell(pos).is_flagged)
            .count()
            .try_into()
            .unwrap()
    }
}
