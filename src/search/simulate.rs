//! Throwaway simulation states for the search
//!
//! A [`SimState`] is a plain copy of the board plus the side to move. The
//! authoritative [`GameState`](crate::GameState) is never touched; every
//! candidate move produces a fresh copy that is dropped after scoring.

use crate::board::{Board, Player, Pos};
use crate::eval::MoveContext;
use crate::game::GameState;
use crate::rules::{apply_move, resolve_deletions};

/// Board and side to move, copied per node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SimState {
    pub board: Board,
    pub turn: Player,
}

impl SimState {
    #[inline]
    pub fn new(board: Board, turn: Player) -> Self {
        Self { board, turn }
    }

    pub fn from_game(state: &GameState) -> Self {
        Self::new(*state.board(), state.turn())
    }
}

/// Outcome of one simulated placement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimMove {
    pub ctx: MoveContext,
    /// Cells cleared by the deletion chain
    pub cells: u32,
    /// Position after the move, opponent to move
    pub state: SimState,
}

/// Apply `player`'s placement at `pos` and its deletion chain on a copy.
///
/// Returns `None` if the placement captures nothing. Scores and items are
/// not tracked in simulation.
pub fn simulate_move(sim: &SimState, player: Player, pos: Pos) -> Option<SimMove> {
    let mut board = sim.board;
    let flips = apply_move(&mut board, pos, player);
    if flips.is_empty() {
        return None;
    }
    let resolution = resolve_deletions(&mut board);

    Some(SimMove {
        ctx: MoveContext {
            pos,
            player,
            flips: flips.len(),
            lines: resolution.lines,
        },
        cells: resolution.cells,
        state: SimState::new(board, player.opponent()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulate_leaves_source_untouched() {
        let sim = SimState::new(Board::initial(), Player::Black);
        let mv = simulate_move(&sim, Player::Black, Pos::new(3, 2)).unwrap();
        assert_eq!(sim.board, Board::initial());
        assert_eq!(mv.ctx.flips, 1);
        assert_eq!(mv.ctx.lines, 0);
        assert_eq!(mv.state.turn, Player::White);
        assert_eq!(mv.state.board.count(Player::Black), 4);
    }

    #[test]
    fn test_simulate_illegal_is_none() {
        let sim = SimState::new(Board::initial(), Player::Black);
        assert!(simulate_move(&sim, Player::Black, Pos::new(0, 0)).is_none());
        assert!(simulate_move(&sim, Player::Black, Pos::new(3, 3)).is_none());
    }

    #[test]
    fn test_simulate_resolves_deletions() {
        let mut board = Board::new();
        for x in 0..7 {
            board.place(Pos::new(x, 0), Player::White);
        }
        board.place(Pos::new(7, 1), Player::Black);
        board.place(Pos::new(7, 2), Player::White);

        let sim = SimState::new(board, Player::White);
        let mv = simulate_move(&sim, Player::White, Pos::new(7, 0)).unwrap();
        assert_eq!(mv.ctx.lines, 1);
        assert_eq!(mv.cells, 8);
        assert_eq!(mv.state.board.count(Player::White), 2);
    }

    #[test]
    fn test_from_game() {
        let game = GameState::new();
        let sim = SimState::from_game(&game);
        assert_eq!(sim.turn, Player::Black);
        assert_eq!(&sim.board, game.board());
    }
}
