//! Heuristic evaluation for Revingo positions
//!
//! This module provides the scoring terms used by the minimax search:
//! - Corner and edge ownership
//! - Reach lines (bingo threats) for both sides
//! - Material
//! - Per-move immediate score and move-ordering score
//!
//! All scores are from `side`'s perspective: positive favours `side`.

use crate::board::{Bitboard, Board, Player, Pos};
use crate::rules::reach_for;

use super::params::CpuParams;

/// The four corner cells
const CORNER_MASK: u64 = 1 | 1 << 7 | 1 << 56 | 1 << 63;

/// Border cells excluding corners
const EDGE_MASK: u64 = {
    let row0: u64 = 0xFF;
    let row7: u64 = 0xFF << 56;
    let col0: u64 = 0x0101_0101_0101_0101;
    let col7: u64 = 0x8080_8080_8080_8080;
    (row0 | row7 | col0 | col7) & !CORNER_MASK
};

/// Bonus for a corner move in ordering
const ORDER_CORNER: f64 = 4.0;
/// Bonus for any border move in ordering (corners included)
const ORDER_EDGE: f64 = 1.0;

/// Facts about one candidate move, as the search recorded them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveContext {
    pub pos: Pos,
    pub player: Player,
    pub flips: usize,
    /// Lines deleted by the move's resolution
    pub lines: u32,
}

#[inline]
fn masked_count(stones: &Bitboard, mask: u64) -> i32 {
    (stones.bits() & mask).count_ones() as i32
}

/// Static evaluation of a position.
///
/// Weighted sum of corner difference, edge difference (corners excluded),
/// reach-line count difference and material difference.
///
/// # Arguments
/// * `board` - Position to score
/// * `params` - Difficulty weights
/// * `side` - Perspective; the computer's colour
#[must_use]
pub fn static_evaluate(board: &Board, params: &CpuParams, side: Player) -> f64 {
    let opp = side.opponent();
    let mine = board.stones(side);
    let theirs = board.stones(opp);

    let corner_diff = masked_count(mine, CORNER_MASK) - masked_count(theirs, CORNER_MASK);
    let edge_diff = masked_count(mine, EDGE_MASK) - masked_count(theirs, EDGE_MASK);
    let reach_diff =
        reach_for(board, side).count() as i32 - reach_for(board, opp).count() as i32;
    let material_diff = board.count(side) as i32 - board.count(opp) as i32;
    let material = material_diff as f64 * params.material_weight;

    corner_diff as f64 * params.corner_weight
        + edge_diff as f64 * params.edge_weight
        + reach_diff as f64 * params.reach_block_weight
        + material
}

/// Score earned by making a move, independent of the subtree below it.
///
/// `pre_opp_reach` / `post_opp_reach` are the reach counts of `side`'s
/// opponent before and after the move. `sample` is one draw from the
/// random source in `[0, 1)` and becomes `±randomness / 2` of jitter.
#[must_use]
pub fn move_immediate_score(
    ctx: &MoveContext,
    params: &CpuParams,
    side: Player,
    pre_opp_reach: usize,
    post_opp_reach: usize,
    sample: f64,
) -> f64 {
    let position = if ctx.pos.is_corner() {
        params.corner_weight
    } else if ctx.pos.is_edge() {
        params.edge_weight
    } else {
        0.0
    };
    let flips = ctx.flips as f64 * params.flip_weight;
    let reach = (pre_opp_reach as f64 - post_opp_reach as f64) * params.reach_block_weight;
    let sign = if ctx.player == side { 1.0 } else { -1.0 };
    let bingo = ctx.lines as f64 * params.bingo_bonus * sign;
    let jitter = (sample - 0.5) * params.randomness;

    position + flips + reach + bingo + jitter
}

/// Ordering key: corners first, then edges, then by flip count
#[inline]
#[must_use]
pub fn move_order_score(pos: Pos, flips: usize, params: &CpuParams) -> f64 {
    let corner = if pos.is_corner() { ORDER_CORNER } else { 0.0 };
    let edge = if pos.is_edge() { ORDER_EDGE } else { 0.0 };
    corner + edge + flips as f64 * params.flip_weight
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_masks() {
        assert_eq!(CORNER_MASK.count_ones(), 4);
        assert_eq!(EDGE_MASK.count_ones(), 24);
        for pos in Pos::all() {
            let bit = 1u64 << pos.to_index();
            assert_eq!(CORNER_MASK & bit != 0, pos.is_corner());
            assert_eq!(EDGE_MASK & bit != 0, pos.is_edge() && !pos.is_corner());
        }
    }

    #[test]
    fn test_initial_position_is_balanced() {
        let board = Board::initial();
        let params = CpuParams::HARD;
        assert!(static_evaluate(&board, &params, Player::White).abs() < EPS);
    }

    #[test]
    fn test_static_evaluate_is_antisymmetric() {
        let mut board = Board::initial();
        board.place(Pos::new(0, 0), Player::White);
        board.place(Pos::new(3, 0), Player::White);
        board.place(Pos::new(7, 4), Player::Black);
        let params = CpuParams::NORMAL;
        let w = static_evaluate(&board, &params, Player::White);
        let b = static_evaluate(&board, &params, Player::Black);
        assert!((w + b).abs() < EPS);
        // corner 8 + edge diff 0 + material 1 * 0.2
        assert!((w - 8.2).abs() < EPS);
    }

    #[test]
    fn test_immediate_score_terms() {
        let params = CpuParams::NORMAL;
        let ctx = MoveContext {
            pos: Pos::new(0, 0),
            player: Player::White,
            flips: 2,
            lines: 1,
        };
        // corner 8 + flips 1.8 + reach (1 - 0) * 10 + bingo 12 + jitter 0
        let s = move_immediate_score(&ctx, &params, Player::White, 1, 0, 0.5);
        assert!((s - 31.8).abs() < EPS);

        // Opponent's bingo counts against the side
        let opp = MoveContext {
            player: Player::Black,
            pos: Pos::new(3, 3),
            ..ctx
        };
        let s = move_immediate_score(&opp, &params, Player::White, 0, 0, 0.5);
        assert!((s - (1.8 - 12.0)).abs() < EPS);
    }

    #[test]
    fn test_edge_term_excludes_corners() {
        let params = CpuParams::NORMAL;
        let edge = MoveContext {
            pos: Pos::new(0, 3),
            player: Player::White,
            flips: 0,
            lines: 0,
        };
        let s = move_immediate_score(&edge, &params, Player::White, 0, 0, 0.5);
        assert!((s - params.edge_weight).abs() < EPS);
    }

    #[test]
    fn test_order_score() {
        let params = CpuParams::HARD;
        assert!((move_order_score(Pos::new(7, 7), 1, &params) - 6.2).abs() < EPS);
        assert!((move_order_score(Pos::new(0, 4), 0, &params) - 1.0).abs() < EPS);
        assert!((move_order_score(Pos::new(4, 4), 2, &params) - 2.4).abs() < EPS);
    }
}
