//! Easy CPU: no search, just avoid handing the opponent a new reach

use tracing::trace;

use crate::board::{Board, Player, Pos};
use crate::eval::CpuParams;
use crate::random::RandomSource;
use crate::rules::{reach_for, MoveSet};

use super::simulate::{simulate_move, SimState};

/// Pick a move for `side` from `legal`.
///
/// A move is dangerous when the opponent has more reach lines after it
/// than before. Safe moves are preferred; the pool is sorted by column then
/// row, and one random draw picks an index within the first
/// `ceil(randomness * len)` entries.
pub fn pick_easy_move<R: RandomSource>(
    board: &Board,
    side: Player,
    legal: &MoveSet,
    params: &CpuParams,
    rng: &mut R,
) -> Option<Pos> {
    let opp = side.opponent();
    let sim = SimState::new(*board, side);
    let pre_reach = reach_for(board, opp).count();

    let mut safe = Vec::new();
    let mut all = Vec::new();
    for pos in legal.iter() {
        let Some(mv) = simulate_move(&sim, side, pos) else {
            continue;
        };
        all.push(pos);
        if reach_for(&mv.state.board, opp).count() <= pre_reach {
            safe.push(pos);
        }
    }

    let mut pool = if safe.is_empty() { all } else { safe };
    if pool.is_empty() {
        return None;
    }
    pool.sort_by_key(|p| (p.x, p.y));

    let span = ((params.randomness * pool.len() as f64).ceil() as usize).max(1);
    let idx = ((rng.next_unit() * span as f64) as usize).min(pool.len() - 1);
    trace!(pool = pool.len(), span, idx, "easy pick");
    Some(pool[idx])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::FixedRandom;
    use crate::rules::legal_moves_for;

    #[test]
    fn test_random_value_changes_pick() {
        let board = Board::initial();
        let legal = legal_moves_for(&board, Player::White);
        let params = CpuParams::EASY;

        let a = pick_easy_move(&board, Player::White, &legal, &params, &mut FixedRandom(0.01));
        let b = pick_easy_move(&board, Player::White, &legal, &params, &mut FixedRandom(0.99));
        assert_eq!(a, Some(Pos::new(2, 4)));
        assert_eq!(b, Some(Pos::new(5, 3)));
    }

    #[test]
    fn test_low_randomness_narrows_pool() {
        let board = Board::initial();
        let legal = legal_moves_for(&board, Player::White);
        let mut params = CpuParams::EASY;
        params.randomness = 0.1;
        // span is 1: always the first move in column order
        let pick = pick_easy_move(&board, Player::White, &legal, &params, &mut FixedRandom(0.99));
        assert_eq!(pick, Some(Pos::new(2, 4)));
    }

    #[test]
    fn test_avoids_dangerous_move() {
        // Row 7 is black except the corner (7,7). Column 7 reads
        // B(7,3) W(7,4) B(7,5) from the top.
        let mut board = Board::new();
        for x in 0..7 {
            board.place(Pos::new(x, 7), Player::Black);
        }
        board.place(Pos::new(7, 3), Player::Black);
        board.place(Pos::new(7, 4), Player::White);
        board.place(Pos::new(7, 5), Player::Black);

        let legal = legal_moves_for(&board, Player::White);
        assert_eq!(legal.to_vec(), vec![Pos::new(7, 2), Pos::new(7, 6)]);

        // White (7,6) builds a white run that Black can close from (7,7),
        // completing row 7.
        let sim = SimState::new(board, Player::White);
        let after = simulate_move(&sim, Player::White, Pos::new(7, 6))
            .map(|mv| reach_for(&mv.state.board, Player::Black).count())
            .unwrap();
        assert_eq!(reach_for(&board, Player::Black).count(), 0);
        assert_eq!(after, 1);

        for sample in [0.0, 0.5, 0.99] {
            let mut rng = FixedRandom(sample);
            let pick = pick_easy_move(&board, Player::White, &legal, &CpuParams::EASY, &mut rng);
            assert_eq!(pick, Some(Pos::new(7, 2)));
        }
    }

    #[test]
    fn test_no_moves() {
        let board = Board::new();
        let legal = legal_moves_for(&board, Player::White);
        assert_eq!(
            pick_easy_move(&board, Player::White, &legal, &CpuParams::EASY, &mut FixedRandom(0.5)),
            None
        );
    }
}
