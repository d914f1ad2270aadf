//! CPU engine facade
//!
//! This module ties the difficulty presets to the two move pickers:
//!
//! 1. **Easy**: no search; random pick among moves that do not hand the
//!    opponent a new reach line
//! 2. **Normal / Hard**: fixed-depth minimax over simulated copies, with
//!    beam truncation and alpha-beta on hard
//!
//! The engine never mutates the [`GameState`] it is given.
//!
//! # Example
//!
//! ```
//! use revingo::{CpuEngine, Difficulty, GameState, Pos};
//! use revingo::random::FixedRandom;
//!
//! let mut game = GameState::new();
//! game.place_move(Pos::new(3, 2)).unwrap();
//!
//! // White to move
//! let engine = CpuEngine::new(Difficulty::Normal);
//! let result = engine.choose_move_with_stats(&game, &mut FixedRandom(0.5));
//! println!("Best move: {:?}", result.best_move);
//! println!("Search type: {:?}", result.search_type);
//! println!("Time: {}ms", result.time_ms);
//! ```

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, instrument};

use crate::board::{Player, Pos};
use crate::eval::{CpuParams, Difficulty};
use crate::game::{GameState, Phase};
use crate::random::RandomSource;
use crate::rules::legal_moves_for;
use crate::search::{pick_easy_move, Searcher};

/// Which picker produced the result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    /// Easy picker
    Random,
    /// Minimax search
    Minimax,
    /// The side had no legal move
    NoMove,
}

/// Result of a move search with statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveResult {
    /// Best move found, if any
    pub best_move: Option<Pos>,
    /// Search score from the engine side's perspective (0 for easy)
    pub score: f64,
    pub search_type: SearchType,
    /// Time taken in milliseconds
    pub time_ms: u64,
    /// Number of nodes searched
    pub nodes: u64,
}

impl MoveResult {
    #[inline]
    fn no_move(time_ms: u64) -> Self {
        Self {
            best_move: None,
            score: 0.0,
            search_type: SearchType::NoMove,
            time_ms,
            nodes: 0,
        }
    }
}

/// What the CPU wants to do on its turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuAction {
    Place(Pos),
    /// Deadlocked with a lightning item in hand
    Lightning,
    /// Deadlocked without lightning
    DeclareGameOver,
}

/// Computer player for one side.
///
/// # Example
///
/// ```
/// use revingo::{CpuEngine, Difficulty, GameState, Player};
/// use revingo::random::RngSource;
///
/// let engine = CpuEngine::new(Difficulty::Hard).with_side(Player::Black);
/// let game = GameState::new();
/// if let Some(pos) = engine.choose_move(&game, &mut RngSource::seeded(1)) {
///     println!("Play at {pos}");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CpuEngine {
    difficulty: Difficulty,
    params: CpuParams,
    side: Player,
    time_limit: Option<Duration>,
    stop: Arc<AtomicBool>,
}

impl CpuEngine {
    /// Engine playing White with the preset for `difficulty`
    #[must_use]
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            params: difficulty.params(),
            side: Player::White,
            time_limit: None,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Replace the preset weights
    #[must_use]
    pub fn with_params(mut self, params: CpuParams) -> Self {
        self.params = params;
        self
    }

    #[must_use]
    pub fn with_side(mut self, side: Player) -> Self {
        self.side = side;
        self
    }

    /// Stop starting new root moves once `limit` has elapsed
    #[must_use]
    pub fn with_time_limit(mut self, limit: Option<Duration>) -> Self {
        self.time_limit = limit;
        self
    }

    /// Share a stop flag with the caller
    #[must_use]
    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop = flag;
        self
    }

    #[inline]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[inline]
    pub fn params(&self) -> &CpuParams {
        &self.params
    }

    #[inline]
    pub fn side(&self) -> Player {
        self.side
    }

    /// Best placement for the engine's side, or `None` without a legal move.
    #[must_use]
    pub fn choose_move<R: RandomSource>(&self, state: &GameState, rng: &mut R) -> Option<Pos> {
        self.choose_move_with_stats(state, rng).best_move
    }

    /// Best placement with search statistics.
    #[instrument(skip(self, state, rng), fields(side = %self.side, difficulty = %self.difficulty))]
    pub fn choose_move_with_stats<R: RandomSource>(
        &self,
        state: &GameState,
        rng: &mut R,
    ) -> MoveResult {
        let start = Instant::now();
        let board = state.board();
        let legal = if state.turn() == self.side {
            *state.legal_moves()
        } else {
            legal_moves_for(board, self.side)
        };

        if legal.is_empty() {
            return MoveResult::no_move(start.elapsed().as_millis() as u64);
        }

        let result = if self.params.uses_search() {
            let mut searcher = Searcher::new(self.params, self.side)
                .with_time_limit(self.time_limit)
                .with_stop_flag(Arc::clone(&self.stop));
            let found = searcher.search(board, rng);
            MoveResult {
                best_move: found.best_move,
                score: found.score,
                search_type: SearchType::Minimax,
                time_ms: start.elapsed().as_millis() as u64,
                nodes: found.nodes,
            }
        } else {
            MoveResult {
                best_move: pick_easy_move(board, self.side, &legal, &self.params, rng),
                score: 0.0,
                search_type: SearchType::Random,
                time_ms: start.elapsed().as_millis() as u64,
                nodes: legal.len() as u64,
            }
        };

        debug!(
            best_move = ?result.best_move,
            score = result.score,
            nodes = result.nodes,
            time_ms = result.time_ms,
            "cpu move chosen"
        );
        result
    }

    /// Decide the CPU's action when it is the side to move.
    ///
    /// At deadlock the CPU always strikes with lightning when it can.
    /// Returns `None` when it is not the CPU's turn or the game is over.
    pub fn plan<R: RandomSource>(&self, state: &GameState, rng: &mut R) -> Option<CpuAction> {
        if state.is_game_over() || state.turn() != self.side {
            return None;
        }
        if state.phase() == Phase::AwaitingLightning || state.is_deadlocked() {
            return Some(if state.can_use_lightning() {
                CpuAction::Lightning
            } else {
                CpuAction::DeclareGameOver
            });
        }
        self.choose_move(state, rng).map(CpuAction::Place)
    }
}

impl Default for CpuEngine {
    fn default() -> Self {
        Self::new(Difficulty::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::random::{FixedRandom, RngSource};

    fn corner_game() -> GameState {
        let mut board = Board::new();
        board.place(Pos::new(1, 0), Player::Black);
        board.place(Pos::new(2, 0), Player::White);
        board.place(Pos::new(2, 2), Player::White);
        board.place(Pos::new(1, 1), Player::Black);
        GameState::from_position(board, Player::White)
    }

    fn white_to_move() -> GameState {
        GameState::from_position(Board::initial(), Player::White)
    }

    #[test]
    fn test_engine_creation() {
        let engine = CpuEngine::new(Difficulty::Hard);
        assert_eq!(engine.side(), Player::White);
        assert_eq!(engine.params().depth, 3);
        assert_eq!(CpuEngine::default().difficulty(), Difficulty::Normal);
    }

    #[test]
    fn test_normal_prefers_corner() {
        let engine = CpuEngine::new(Difficulty::Normal);
        let result = engine.choose_move_with_stats(&corner_game(), &mut FixedRandom(0.0));
        assert_eq!(result.best_move, Some(Pos::new(0, 0)));
        assert_eq!(result.search_type, SearchType::Minimax);
    }

    #[test]
    fn test_hard_prefers_corner() {
        let engine = CpuEngine::new(Difficulty::Hard);
        assert_eq!(engine.choose_move(&corner_game(), &mut FixedRandom(0.0)), Some(Pos::new(0, 0)));
    }

    #[test]
    fn test_search_difficulties_are_deterministic() {
        let game = white_to_move();
        for difficulty in [Difficulty::Normal, Difficulty::Hard] {
            let engine = CpuEngine::new(difficulty);
            let a = engine.choose_move(&game, &mut FixedRandom(0.42));
            let b = engine.choose_move(&game, &mut FixedRandom(0.42));
            assert!(a.is_some());
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_easy_varies_with_random_source() {
        let game = white_to_move();
        let engine = CpuEngine::new(Difficulty::Easy);
        let low = engine.choose_move_with_stats(&game, &mut FixedRandom(0.01));
        let high = engine.choose_move_with_stats(&game, &mut FixedRandom(0.99));
        assert_eq!(low.search_type, SearchType::Random);
        assert!(low.best_move.is_some());
        assert!(high.best_move.is_some());
        assert_ne!(low.best_move, high.best_move);
    }

    #[test]
    fn test_no_legal_move() {
        let mut board = Board::new();
        board.place(Pos::new(0, 0), Player::White);
        board.place(Pos::new(7, 7), Player::Black);
        let game = GameState::from_position(board, Player::White);
        let engine = CpuEngine::new(Difficulty::Hard);
        let result = engine.choose_move_with_stats(&game, &mut FixedRandom(0.5));
        assert_eq!(result.best_move, None);
        assert_eq!(result.search_type, SearchType::NoMove);
    }

    #[test]
    fn test_engine_does_not_mutate_state() {
        let game = white_to_move();
        let before = game.clone();
        let engine = CpuEngine::new(Difficulty::Hard);
        let _ = engine.choose_move(&game, &mut RngSource::seeded(5));
        assert_eq!(game, before);
    }

    #[test]
    fn test_plan() {
        let engine = CpuEngine::new(Difficulty::Normal);
        // Black to move: not the CPU's turn
        assert_eq!(engine.plan(&GameState::new(), &mut FixedRandom(0.5)), None);

        assert_eq!(
            engine.plan(&corner_game(), &mut FixedRandom(0.0)),
            Some(CpuAction::Place(Pos::new(0, 0)))
        );

        // Deadlock with White to move and lightning in hand
        let mut board = Board::new();
        board.place(Pos::new(0, 0), Player::White);
        board.place(Pos::new(7, 7), Player::Black);
        let game = GameState::from_position(board, Player::White);
        assert!(game.is_deadlocked());
        assert_eq!(engine.plan(&game, &mut FixedRandom(0.5)), Some(CpuAction::Lightning));
    }
}
