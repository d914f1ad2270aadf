//! Item effects: lightning strike and reverse
//!
//! Both items write straight onto the board. The caller owns inventory
//! bookkeeping and the deletion pass that follows.

use crate::board::{Board, Player, Pos};
use crate::random::RandomSource;

use super::capture::collect_flips_from_anchor;

/// Cells a lightning strike converts
pub const LIGHTNING_TARGETS: usize = 5;
/// Lightning items each player starts with
pub const INITIAL_LIGHTNING_ITEMS: u32 = 1;
/// Reverse item inventory cap
pub const REVERSE_ITEM_CAP: u32 = 5;

/// Pick up to `desired` lightning targets for `player`.
///
/// Empty cells are used first; opponent stones only fill the remainder.
/// Each group is shuffled with `rng`. The acting player's stones are never
/// selected.
pub fn lightning_targets<R: RandomSource>(
    board: &Board,
    player: Player,
    desired: usize,
    rng: &mut R,
) -> Vec<Pos> {
    let mut empties: Vec<Pos> = board.empties().iter_ones().collect();
    let mut enemies: Vec<Pos> = board.stones(player.opponent()).iter_ones().collect();

    rng.shuffle(&mut empties);
    rng.shuffle(&mut enemies);

    // Pop from the back like a stack, matching the shuffle direction
    let mut targets = Vec::with_capacity(desired);
    while targets.len() < desired {
        match empties.pop().or_else(|| enemies.pop()) {
            Some(pos) => targets.push(pos),
            None => break,
        }
    }
    targets
}

/// Overwrite `targets` with `player`'s stones. No captures are computed.
pub fn apply_lightning(board: &mut Board, player: Player, targets: &[Pos]) {
    for &pos in targets {
        board.place(pos, player);
    }
}

/// Convert an opponent stone at `pos` and flip the runs it now anchors.
///
/// Returns `None` (board untouched) unless `pos` holds an opponent stone.
/// The captured cells are returned on success; the converted anchor is
/// not included.
pub fn apply_reverse(board: &mut Board, pos: Pos, player: Player) -> Option<Vec<Pos>> {
    if !is_reverse_target(board, pos, player) {
        return None;
    }
    board.place(pos, player);
    let flips = collect_flips_from_anchor(board, pos, player);
    for &p in &flips {
        board.place(p, player);
    }
    Some(flips)
}

/// Whether a reverse target is acceptable for `player`
#[inline]
pub fn is_reverse_target(board: &Board, pos: Pos, player: Player) -> bool {
    pos.is_on_board() && board.get(pos) == player.opponent().cell()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;
    use crate::random::{FixedRandom, RngSource};

    #[test]
    fn test_lightning_prefers_empty_cells() {
        let mut board = Board::new();
        board.place(Pos::new(0, 0), Player::White);
        let targets = lightning_targets(&board, Player::Black, 5, &mut FixedRandom(0.3));
        assert_eq!(targets.len(), 5);
        assert!(targets.iter().all(|&p| board.is_empty(p)));
        // Targeting does not touch the board
        assert_eq!(board.count(Player::White), 1);
    }

    #[test]
    fn test_lightning_falls_back_to_opponent_stones() {
        let mut board = Board::new();
        for pos in Pos::all() {
            board.place(pos, Player::White);
        }
        board.remove(Pos::new(2, 2));
        board.remove(Pos::new(6, 6));

        let targets = lightning_targets(&board, Player::Black, 5, &mut RngSource::seeded(11));
        assert_eq!(targets.len(), 5);
        // Empties strictly first
        assert!(board.is_empty(targets[0]));
        assert!(board.is_empty(targets[1]));
        assert!(targets[2..]
            .iter()
            .all(|&p| board.get(p) == Cell::White));
    }

    #[test]
    fn test_lightning_never_targets_own_stones() {
        let mut board = Board::new();
        for pos in Pos::all() {
            board.place(pos, Player::Black);
        }
        board.place(Pos::new(1, 1), Player::White);
        board.place(Pos::new(2, 1), Player::White);

        let targets = lightning_targets(&board, Player::Black, 5, &mut FixedRandom(0.5));
        assert_eq!(targets.len(), 2);
        assert!(targets.iter().all(|&p| board.get(p) == Cell::White));

        let mut full_own = Board::new();
        for pos in Pos::all() {
            full_own.place(pos, Player::Black);
        }
        assert!(lightning_targets(&full_own, Player::Black, 5, &mut FixedRandom(0.5)).is_empty());
    }

    #[test]
    fn test_apply_lightning_overwrites_without_capture() {
        let mut board = Board::new();
        board.place(Pos::new(0, 0), Player::Black);
        board.place(Pos::new(1, 0), Player::White);
        apply_lightning(&mut board, Player::Black, &[Pos::new(2, 0)]);
        assert_eq!(board.get(Pos::new(2, 0)), Cell::Black);
        // (1,0) stays White: lightning does not flip
        assert_eq!(board.get(Pos::new(1, 0)), Cell::White);
    }

    #[test]
    fn test_reverse_flips_flanked_run() {
        let mut board = Board::new();
        // B W W [W] : reversing (3,0) closes the run (1,0)-(2,0)
        board.place(Pos::new(0, 0), Player::Black);
        board.place(Pos::new(1, 0), Player::White);
        board.place(Pos::new(2, 0), Player::White);
        board.place(Pos::new(3, 0), Player::White);

        let flips = apply_reverse(&mut board, Pos::new(3, 0), Player::Black).unwrap();
        assert_eq!(flips.len(), 2);
        for x in 0..4 {
            assert_eq!(board.get(Pos::new(x, 0)), Cell::Black);
        }
    }

    #[test]
    fn test_reverse_rejects_non_opponent_cells() {
        let mut board = Board::initial();
        let before = board;
        assert!(apply_reverse(&mut board, Pos::new(4, 3), Player::Black).is_none());
        assert!(apply_reverse(&mut board, Pos::new(0, 0), Player::Black).is_none());
        assert_eq!(board, before);
        assert!(is_reverse_target(&board, Pos::new(3, 3), Player::Black));

        let off = Pos { x: 11, y: 0 };
        assert!(!is_reverse_target(&board, off, Player::Black));
        assert!(apply_reverse(&mut board, off, Player::Black).is_none());
        assert_eq!(board, before);
    }
}
