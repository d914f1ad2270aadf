//! Reach detection: lines one legal move away from a bingo

use crate::board::{Bitboard, Board, Cell, LineDef, Player, Pos};

use super::capture::{collect_flips, legal_moves_for};

/// Lines `player` can complete with a single legal move, and the cells
/// that complete them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReachInfo {
    pub line_defs: Vec<LineDef>,
    pub empty_cells: Vec<Pos>,
}

impl ReachInfo {
    /// Number of distinct reach lines
    #[inline]
    pub fn count(&self) -> usize {
        self.line_defs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.line_defs.is_empty()
    }

    fn add(&mut self, line: LineDef, cell: Pos) {
        if !self.line_defs.contains(&line) {
            self.line_defs.push(line);
        }
        if !self.empty_cells.contains(&cell) {
            self.empty_cells.push(cell);
        }
    }
}

/// The single empty cell of a line holding exactly 7 of `player`'s stones
fn near_full_gap(board: &Board, line: LineDef, player: Player) -> Option<Pos> {
    let own = player.cell();
    let mut gap = None;
    for pos in line.cells() {
        match board.get(pos) {
            Cell::Empty if gap.is_none() => gap = Some(pos),
            cell if cell == own => {}
            _ => return None,
        }
    }
    gap
}

/// Compute reach lines for `player`.
///
/// Two sources qualify, both gated on the completing cell being a legal
/// move for `player`:
/// - a line with 7 own stones and one empty cell;
/// - a line through a legal move that the move's own captures fill.
pub fn reach_for(board: &Board, player: Player) -> ReachInfo {
    let legal = legal_moves_for(board, player);
    let mut reach = ReachInfo::default();

    for line in LineDef::ALL {
        if let Some(gap) = near_full_gap(board, line, player) {
            if legal.contains(gap) {
                reach.add(line, gap);
            }
        }
    }

    let own = *board.stones(player);
    for mv in legal.iter() {
        let mut after: Bitboard = collect_flips(board, mv, player).into_iter().collect();
        after.set(mv);
        let after = after.union(own);

        for line in LineDef::through(mv) {
            let mask = line.mask();
            if after.bits() & mask.bits() == mask.bits() {
                reach.add(line, mv);
            }
        }
    }

    reach
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_reach_requires_legal_gap() {
        let mut board = Board::new();
        for x in 0..8 {
            board.place(Pos::new(x, 2), Player::Black);
        }
        board.remove(Pos::new(5, 2));

        // Gap is not yet legal: nothing to flank
        assert!(reach_for(&board, Player::Black).is_empty());

        // Flank below makes (5,2) legal for Black
        board.place(Pos::new(5, 3), Player::White);
        board.place(Pos::new(5, 4), Player::Black);
        let reach = reach_for(&board, Player::Black);
        assert!(reach.line_defs.contains(&LineDef::Row(2)));
        assert!(reach.empty_cells.contains(&Pos::new(5, 2)));

        // White has no reach on this board
        assert!(reach_for(&board, Player::White).is_empty());
    }

    #[test]
    fn test_opponent_stone_blocks_reach() {
        let mut board = Board::new();
        for x in 0..7 {
            board.place(Pos::new(x, 0), Player::Black);
        }
        board.place(Pos::new(3, 0), Player::White);
        assert!(reach_for(&board, Player::Black).is_empty());
    }

    #[test]
    fn test_reach_completed_by_capture() {
        let mut board = Board::new();
        for y in 0..8 {
            board.place(Pos::new(3, y), Player::Black);
        }
        board.remove(Pos::new(3, 1));
        board.place(Pos::new(3, 2), Player::White);

        // Column has only 6 black stones; the move at (3,1) flips (3,2).
        let reach = reach_for(&board, Player::Black);
        assert!(reach.line_defs.contains(&LineDef::Col(3)));
        assert!(reach.empty_cells.contains(&Pos::new(3, 1)));
    }

    #[test]
    fn test_anti_diagonal_reach() {
        let mut board = Board::new();
        for p in LineDef::Diag(1).cells() {
            board.place(p, Player::White);
        }
        // Open the corner (7,0) and make it legal via row 0
        board.remove(Pos::new(7, 0));
        board.place(Pos::new(6, 0), Player::Black);
        board.place(Pos::new(5, 0), Player::White);

        let reach = reach_for(&board, Player::White);
        assert!(reach.line_defs.contains(&LineDef::Diag(1)));
        assert_eq!(reach.empty_cells, vec![Pos::new(7, 0)]);
    }

    #[test]
    fn test_initial_board_has_no_reach() {
        let board = Board::initial();
        assert_eq!(reach_for(&board, Player::Black).count(), 0);
        assert_eq!(reach_for(&board, Player::White).count(), 0);
    }
}
