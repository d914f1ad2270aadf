//! Board structure: two colour bitboards

use super::bitboard::Bitboard;
use super::{Cell, Player, Pos, BOARD_SIZE, TOTAL_CELLS};

/// Game board. `Copy` so search nodes can own a private copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Board {
    /// Black stones bitboard
    pub black: Bitboard,
    /// White stones bitboard
    pub white: Bitboard,
}

impl Board {
    /// Empty board
    pub fn new() -> Self {
        Self {
            black: Bitboard::new(),
            white: Bitboard::new(),
        }
    }

    /// Opening position. The centre diagonal is White and the
    /// anti-diagonal is Black.
    pub fn initial() -> Self {
        let mut board = Self::new();
        board.place(Pos::new(3, 3), Player::White);
        board.place(Pos::new(4, 4), Player::White);
        board.place(Pos::new(4, 3), Player::Black);
        board.place(Pos::new(3, 4), Player::Black);
        board
    }

    #[inline]
    pub fn size(&self) -> usize {
        BOARD_SIZE
    }

    /// Get cell at position
    #[inline]
    pub fn get(&self, pos: Pos) -> Cell {
        if self.black.get(pos) {
            Cell::Black
        } else if self.white.get(pos) {
            Cell::White
        } else {
            Cell::Empty
        }
    }

    /// Get cell at signed coordinates, `None` off the board
    #[inline]
    pub fn get_at(&self, x: i32, y: i32) -> Option<Cell> {
        Pos::try_new(x, y).map(|pos| self.get(pos))
    }

    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        !self.black.get(pos) && !self.white.get(pos)
    }

    /// Overwrite a cell
    #[inline]
    pub fn set(&mut self, pos: Pos, cell: Cell) {
        match cell.owner() {
            Some(player) => self.place(pos, player),
            None => self.remove(pos),
        }
    }

    /// Put `player`'s stone on `pos`, replacing whatever was there
    #[inline]
    pub fn place(&mut self, pos: Pos, player: Player) {
        match player {
            Player::Black => {
                self.white.clear(pos);
                self.black.set(pos);
            }
            Player::White => {
                self.black.clear(pos);
                self.white.set(pos);
            }
        }
    }

    /// Remove a stone
    #[inline]
    pub fn remove(&mut self, pos: Pos) {
        self.black.clear(pos);
        self.white.clear(pos);
    }

    /// Get bitboard for a color
    #[inline]
    pub fn stones(&self, player: Player) -> &Bitboard {
        match player {
            Player::Black => &self.black,
            Player::White => &self.white,
        }
    }

    #[inline]
    pub fn count(&self, player: Player) -> u32 {
        self.stones(player).count()
    }

    /// Total stones on board
    #[inline]
    pub fn stone_count(&self) -> u32 {
        self.black.count() + self.white.count()
    }

    #[inline]
    pub fn empty_count(&self) -> u32 {
        TOTAL_CELLS as u32 - self.stone_count()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.empty_count() == 0
    }

    /// Mask of empty cells
    #[inline]
    pub fn empties(&self) -> Bitboard {
        Bitboard::from_bits(!(self.black.bits() | self.white.bits()))
    }

    /// Remove every stone on the mask
    pub fn clear_mask(&mut self, mask: Bitboard) {
        self.black = Bitboard::from_bits(self.black.bits() & !mask.bits());
        self.white = Bitboard::from_bits(self.white.bits() & !mask.bits());
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in 0..BOARD_SIZE as u8 {
            for x in 0..BOARD_SIZE as u8 {
                let c = match self.get(Pos::new(x, y)) {
                    Cell::Empty => '.',
                    Cell::Black => 'X',
                    Cell::White => 'O',
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
