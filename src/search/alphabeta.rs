//! Minimax search with optional alpha-beta pruning and beam truncation
//!
//! This module implements the search behind the normal and hard CPU.
//!
//! # Features
//!
//! - Fixed-depth minimax over simulated copies; the side being searched for
//!   maximizes and its opponent minimizes
//! - Move ordering by corner / edge / flip count, stable for ties
//! - Beam truncation once a node has more candidates than the threshold
//! - Alpha-beta cutoffs when the difficulty enables them
//! - Optional wall-clock deadline and stop flag, checked between root
//!   moves only, so a completed root move is always scored the same way
//!
//! # Example
//!
//! ```
//! use revingo::board::{Board, Player};
//! use revingo::eval::CpuParams;
//! use revingo::random::FixedRandom;
//! use revingo::search::Searcher;
//!
//! let mut searcher = Searcher::new(CpuParams::NORMAL, Player::White);
//! let result = searcher.search(&Board::initial(), &mut FixedRandom(0.5));
//! assert!(result.best_move.is_some());
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::trace;

use crate::board::{Board, Player, Pos};
use crate::eval::{move_immediate_score, move_order_score, static_evaluate, CpuParams};
use crate::random::RandomSource;
use crate::rules::{legal_moves_for, reach_for};

use super::simulate::{simulate_move, SimMove, SimState};

/// Search statistics for diagnostics and tuning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Alpha-beta cutoffs
    pub cutoffs: u64,
    /// Nodes whose move list was cut to the beam width
    pub beam_truncations: u64,
    /// Root moves fully searched
    pub root_moves_searched: usize,
    /// Root moves available after ordering and beam
    pub root_moves_total: usize,
}

/// Result of a search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Best move found, `None` if the side has no legal move
    pub best_move: Option<Pos>,
    /// Score of the best move, from the searched side's perspective
    pub score: f64,
    /// Nodes visited
    pub nodes: u64,
    /// False when the deadline or stop flag cut the root loop short
    pub completed: bool,
    pub stats: SearchStats,
}

/// A candidate with its ordering key
struct Candidate {
    mv: SimMove,
    order: f64,
}

/// Fixed-depth minimax searcher for one side.
///
/// The searcher holds no position; each call to [`search`](Self::search)
/// works on copies of the board it is given.
pub struct Searcher {
    params: CpuParams,
    side: Player,
    time_limit: Option<Duration>,
    stopped: Arc<AtomicBool>,
    nodes: u64,
    stats: SearchStats,
}

impl Searcher {
    /// Create a searcher playing `side` with the given weights.
    #[must_use]
    pub fn new(params: CpuParams, side: Player) -> Self {
        Self {
            params,
            side,
            time_limit: None,
            stopped: Arc::new(AtomicBool::new(false)),
            nodes: 0,
            stats: SearchStats::default(),
        }
    }

    /// Stop starting new root moves once `limit` has elapsed
    #[must_use]
    pub fn with_time_limit(mut self, limit: Option<Duration>) -> Self {
        self.time_limit = limit;
        self
    }

    /// Share an external stop flag (e.g. a UI abandoning the search)
    #[must_use]
    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stopped = flag;
        self
    }

    #[inline]
    pub fn params(&self) -> &CpuParams {
        &self.params
    }

    #[inline]
    pub fn side(&self) -> Player {
        self.side
    }

    /// Search `board` with `side` to move, `params.depth` plies deep.
    #[must_use]
    pub fn search<R: RandomSource>(&mut self, board: &Board, rng: &mut R) -> SearchResult {
        self.nodes = 0;
        self.stats = SearchStats::default();
        let deadline = self.time_limit.map(|limit| Instant::now() + limit);

        let root = SimState::new(*board, self.side);
        let depth = self.params.depth;
        let (score, best_move, completed) = self.search_root(&root, depth, rng, deadline);

        trace!(
            ?best_move,
            score,
            nodes = self.nodes,
            cutoffs = self.stats.cutoffs,
            completed,
            "search finished"
        );

        SearchResult {
            best_move,
            score,
            nodes: self.nodes,
            completed,
            stats: self.stats.clone(),
        }
    }

    fn should_stop(&self, deadline: Option<Instant>) -> bool {
        self.stopped.load(Ordering::Relaxed) || deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Legal moves for `player`, simulated, ordered and beam-truncated
    fn expand(&mut self, sim: &SimState, player: Player) -> Vec<SimMove> {
        let mut candidates: Vec<Candidate> = legal_moves_for(&sim.board, player)
            .iter()
            .filter_map(|pos| simulate_move(sim, player, pos))
            .map(|mv| {
                let order = move_order_score(mv.ctx.pos, mv.ctx.flips, &self.params);
                Candidate { mv, order }
            })
            .collect();

        // Stable: equal keys keep enumeration order
        candidates.sort_by(|a, b| b.order.total_cmp(&a.order));

        if let Some(beam) = self.params.beam {
            if candidates.len() > beam.threshold {
                candidates.truncate(beam.width);
                self.stats.beam_truncations += 1;
            }
        }

        candidates.into_iter().map(|c| c.mv).collect()
    }

    /// Immediate score of `mv`, drawing one jitter sample
    fn immediate<R: RandomSource>(&self, mv: &SimMove, pre_opp_reach: usize, rng: &mut R) -> f64 {
        let post_opp_reach = reach_for(&mv.state.board, self.side.opponent()).count();
        move_immediate_score(
            &mv.ctx,
            &self.params,
            self.side,
            pre_opp_reach,
            post_opp_reach,
            rng.next_unit(),
        )
    }

    /// Root loop. Identical to [`minimax`](Self::minimax) for the side to
    /// move, except that it may stop between moves.
    fn search_root<R: RandomSource>(
        &mut self,
        root: &SimState,
        depth: u8,
        rng: &mut R,
        deadline: Option<Instant>,
    ) -> (f64, Option<Pos>, bool) {
        self.nodes += 1;
        let player = self.side;
        if depth == 0 || legal_moves_for(&root.board, player).is_empty() {
            return (static_evaluate(&root.board, &self.params, self.side), None, true);
        }

        let pre_opp_reach = reach_for(&root.board, self.side.opponent()).count();
        let moves = self.expand(root, player);
        self.stats.root_moves_total = moves.len();

        let mut alpha = f64::NEG_INFINITY;
        let beta = f64::INFINITY;
        let mut best_score = f64::NEG_INFINITY;
        let mut best_move = None;
        let mut completed = true;

        for (i, mv) in moves.iter().enumerate() {
            if i > 0 && self.should_stop(deadline) {
                completed = false;
                break;
            }
            let (child, _) =
                self.minimax(&mv.state, depth - 1, player.opponent(), alpha, beta, rng);
            let score = child + self.immediate(mv, pre_opp_reach, rng);
            self.stats.root_moves_searched += 1;
            trace!(pos = %mv.ctx.pos, score, "root move");

            if score > best_score {
                best_score = score;
                best_move = Some(mv.ctx.pos);
            }
            alpha = alpha.max(best_score);
            if self.params.alpha_beta && beta <= alpha {
                self.stats.cutoffs += 1;
                break;
            }
        }

        (best_score, best_move, completed)
    }

    /// Minimax value of `sim` with `player` to move.
    ///
    /// The searched side adds each move's immediate score; its opponent
    /// subtracts it. Ties keep the earlier move.
    fn minimax<R: RandomSource>(
        &mut self,
        sim: &SimState,
        depth: u8,
        player: Player,
        mut alpha: f64,
        mut beta: f64,
        rng: &mut R,
    ) -> (f64, Option<Pos>) {
        self.nodes += 1;
        if depth == 0 || legal_moves_for(&sim.board, player).is_empty() {
            return (static_evaluate(&sim.board, &self.params, self.side), None);
        }

        let pre_opp_reach = reach_for(&sim.board, self.side.opponent()).count();
        let moves = self.expand(sim, player);
        let maximizing = player == self.side;

        let mut best_score = if maximizing {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        let mut best_move = None;

        for mv in &moves {
            let (child, _) =
                self.minimax(&mv.state, depth - 1, player.opponent(), alpha, beta, rng);
            let immediate = self.immediate(mv, pre_opp_reach, rng);

            if maximizing {
                let score = child + immediate;
                if score > best_score {
                    best_score = score;
                    best_move = Some(mv.ctx.pos);
                }
                alpha = alpha.max(best_score);
            } else {
                let score = child - immediate;
                if score < best_score {
                    best_score = score;
                    best_move = Some(mv.ctx.pos);
                }
                beta = beta.min(best_score);
            }

            if self.params.alpha_beta && beta <= alpha {
                self.stats.cutoffs += 1;
                break;
            }
        }

        (best_score, best_move)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{FixedRandom, SequenceRandom};

    /// White to move; (0,0) is a corner capturing on two axes.
    fn corner_position() -> Board {
        let mut board = Board::new();
        board.place(Pos::new(1, 0), Player::Black);
        board.place(Pos::new(1, 1), Player::Black);
        board.place(Pos::new(2, 0), Player::White);
        board.place(Pos::new(2, 2), Player::White);
        board
    }

    #[test]
    fn test_normal_and_hard_take_corner() {
        for params in [CpuParams::NORMAL, CpuParams::HARD] {
            let mut searcher = Searcher::new(params, Player::White);
            let result = searcher.search(&corner_position(), &mut FixedRandom(0.0));
            assert_eq!(result.best_move, Some(Pos::new(0, 0)));
            assert!(result.completed);
            assert!(result.nodes > 1);
        }
    }

    #[test]
    fn test_search_is_deterministic() {
        let board = Board::initial();
        for params in [CpuParams::NORMAL, CpuParams::HARD] {
            let first = Searcher::new(params, Player::White).search(&board, &mut FixedRandom(0.3));
            let second = Searcher::new(params, Player::White).search(&board, &mut FixedRandom(0.3));
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_no_legal_move_returns_none() {
        let mut board = Board::new();
        board.place(Pos::new(0, 0), Player::White);
        let mut searcher = Searcher::new(CpuParams::HARD, Player::White);
        let result = searcher.search(&board, &mut FixedRandom(0.5));
        assert_eq!(result.best_move, None);
        assert_eq!(result.nodes, 1);
    }

    #[test]
    fn test_search_for_black_side() {
        // Mirror of the corner position with colours swapped
        let mut board = Board::new();
        board.place(Pos::new(1, 0), Player::White);
        board.place(Pos::new(1, 1), Player::White);
        board.place(Pos::new(2, 0), Player::Black);
        board.place(Pos::new(2, 2), Player::Black);
        let mut searcher = Searcher::new(CpuParams::NORMAL, Player::Black);
        let result = searcher.search(&board, &mut FixedRandom(0.0));
        assert_eq!(result.best_move, Some(Pos::new(0, 0)));
    }

    #[test]
    fn test_alpha_beta_visits_subset() {
        let board = Board::initial();
        let mut plain = CpuParams::HARD;
        plain.alpha_beta = false;

        let pruned =
            Searcher::new(CpuParams::HARD, Player::White).search(&board, &mut FixedRandom(0.5));
        let full = Searcher::new(plain, Player::White).search(&board, &mut FixedRandom(0.5));
        assert!(pruned.best_move.is_some());
        assert!(pruned.nodes <= full.nodes);
        assert_eq!(full.stats.cutoffs, 0);
    }

    #[test]
    fn test_stop_flag_keeps_first_root_move() {
        let flag = Arc::new(AtomicBool::new(true));
        let mut searcher = Searcher::new(CpuParams::NORMAL, Player::White).with_stop_flag(flag);
        let result = searcher.search(&Board::initial(), &mut SequenceRandom::new(vec![0.5]));
        assert!(result.best_move.is_some());
        assert!(!result.completed);
        assert_eq!(result.stats.root_moves_searched, 1);
    }

    #[test]
    fn test_zero_time_limit_still_answers() {
        let mut searcher =
            Searcher::new(CpuParams::HARD, Player::White).with_time_limit(Some(Duration::ZERO));
        let result = searcher.search(&Board::initial(), &mut FixedRandom(0.5));
        assert!(result.best_move.is_some());
    }
}
