//! Capture rules (Othello-style disc flipping)
//!
//! A placement captures every straight run of opponent stones that is
//! closed on the far end by one of the mover's stones. Runs that reach the
//! board edge or an empty cell capture nothing.

use crate::board::{Bitboard, Board, Player, Pos};

/// Direction vectors for capture checking (8 directions)
pub const DIRECTIONS: [(i32, i32); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Set of legal placements, iterated in ascending index order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveSet(Bitboard);

impl MoveSet {
    #[inline]
    pub fn contains(&self, pos: Pos) -> bool {
        pos.is_on_board() && self.0.get(pos)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.count() as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Pos> {
        self.0.iter_ones()
    }

    pub fn to_vec(&self) -> Vec<Pos> {
        self.iter().collect()
    }
}

/// Walk every direction from `pos` and collect closed opponent runs.
/// `pos` itself is not inspected.
fn walk_captures(board: &Board, pos: Pos, player: Player) -> Vec<Pos> {
    let opp = player.opponent().cell();
    let own = player.cell();
    let mut flips = Vec::new();

    for &(dx, dy) in &DIRECTIONS {
        let mut x = pos.x as i32 + dx;
        let mut y = pos.y as i32 + dy;
        let start = flips.len();
        let mut closed = false;

        while let Some(cell) = board.get_at(x, y) {
            if cell == opp {
                flips.push(Pos::new(x as u8, y as u8));
                x += dx;
                y += dy;
                continue;
            }
            closed = cell == own;
            break;
        }

        if !closed {
            flips.truncate(start);
        }
    }

    flips
}

/// Cells captured if `player` places on `pos`.
///
/// Returns an empty list when `pos` is occupied or off the board.
pub fn collect_flips(board: &Board, pos: Pos, player: Player) -> Vec<Pos> {
    if !pos.is_on_board() || !board.is_empty(pos) {
        return Vec::new();
    }
    walk_captures(board, pos, player)
}

/// Checked variant of [`collect_flips`] for raw coordinates.
pub fn collect_flips_at(board: &Board, x: i32, y: i32, player: Player) -> Vec<Pos> {
    Pos::try_new(x, y).map_or_else(Vec::new, |pos| collect_flips(board, pos, player))
}

/// Captures radiating from a stone that already sits on `pos`.
///
/// Used by the reverse item: the anchor has just been converted, so the
/// walk starts from an occupied cell rather than an empty one.
pub fn collect_flips_from_anchor(board: &Board, pos: Pos, player: Player) -> Vec<Pos> {
    if !pos.is_on_board() {
        return Vec::new();
    }
    walk_captures(board, pos, player)
}

/// Does placing on `pos` capture at least one stone?
#[inline]
pub fn is_legal_move(board: &Board, pos: Pos, player: Player) -> bool {
    if !pos.is_on_board() || !board.is_empty(pos) {
        return false;
    }
    let opp = player.opponent().cell();
    let own = player.cell();
    DIRECTIONS.iter().any(|&(dx, dy)| {
        let mut x = pos.x as i32 + dx;
        let mut y = pos.y as i32 + dy;
        let mut run = 0;
        while let Some(cell) = board.get_at(x, y) {
            if cell != opp {
                return cell == own && run > 0;
            }
            run += 1;
            x += dx;
            y += dy;
        }
        false
    })
}

/// All empty cells where `player` would capture something.
pub fn legal_moves_for(board: &Board, player: Player) -> MoveSet {
    MoveSet(
        board
            .empties()
            .iter_ones()
            .filter(|&pos| is_legal_move(board, pos, player))
            .collect(),
    )
}

#[inline]
pub fn has_legal_move(board: &Board, player: Player) -> bool {
    board
        .empties()
        .iter_ones()
        .any(|pos| is_legal_move(board, pos, player))
}

/// Place a stone and flip its captures. No deletion logic is run here.
///
/// Returns the captured cells; the board is untouched when the list would
/// be empty (the placement is not legal).
pub fn apply_move(board: &mut Board, pos: Pos, player: Player) -> Vec<Pos> {
    let flips = collect_flips(board, pos, player);
    if flips.is_empty() {
        return flips;
    }
    board.place(pos, player);
    for &p in &flips {
        board.place(p, player);
    }
    flips
}
