//! Board representation for Revingo

pub mod bitboard;
pub mod board;
pub mod line;


// Re-exports
pub use bitboard::Bitboard;
pub use board::Board;
pub use line::LineDef;

/// Board size (8x8)
pub const BOARD_SIZE: usize = 8;
pub const TOTAL_CELLS: usize = BOARD_SIZE * BOARD_SIZE; // 64

/// Contents of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Black,
    White,
}

impl Cell {
    /// Player owning this cell, if any
    #[inline]
    pub fn owner(self) -> Option<Player> {
        match self {
            Cell::Black => Some(Player::Black),
            Cell::White => Some(Player::White),
            Cell::Empty => None,
        }
    }
}

/// One of the two sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Player {
    Black,
    White,
}

impl Player {
    pub const BOTH: [Player; 2] = [Player::Black, Player::White];

    /// Get opponent color
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }

    /// Cell value for this player's stone
    #[inline]
    pub fn cell(self) -> Cell {
        match self {
            Player::Black => Cell::Black,
            Player::White => Cell::White,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Player::Black => 0,
            Player::White => 1,
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::Black => f.write_str("Black"),
            Player::White => f.write_str("White"),
        }
    }
}

/// Position on the board, `x` is the column and `y` the row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos {
    pub x: u8,
    pub y: u8,
}

impl Pos {
    #[inline]
    pub fn new(x: u8, y: u8) -> Self {
        debug_assert!(x < BOARD_SIZE as u8 && y < BOARD_SIZE as u8);
        Self { x, y }
    }

    /// Checked constructor from signed coordinates
    #[inline]
    pub fn try_new(x: i32, y: i32) -> Option<Self> {
        if Self::is_valid(x, y) {
            Some(Self {
                x: x as u8,
                y: y as u8,
            })
        } else {
            None
        }
    }

    #[inline]
    pub fn to_index(self) -> usize {
        self.y as usize * BOARD_SIZE + self.x as usize
    }

    #[inline]
    pub fn from_index(idx: usize) -> Self {
        Self {
            x: (idx % BOARD_SIZE) as u8,
            y: (idx / BOARD_SIZE) as u8,
        }
    }

    #[inline]
    pub fn is_valid(x: i32, y: i32) -> bool {
        x >= 0 && x < BOARD_SIZE as i32 && y >= 0 && y < BOARD_SIZE as i32
    }

    /// Both coordinates inside the board; hand-built values may not be
    #[inline]
    pub fn is_on_board(self) -> bool {
        (self.x as usize) < BOARD_SIZE && (self.y as usize) < BOARD_SIZE
    }

    #[inline]
    pub fn is_corner(self) -> bool {
        let last = BOARD_SIZE as u8 - 1;
        (self.x == 0 || self.x == last) && (self.y == 0 || self.y == last)
    }

    /// True for every border cell, corners included
    #[inline]
    pub fn is_edge(self) -> bool {
        let last = BOARD_SIZE as u8 - 1;
        self.x == 0 || self.x == last || self.y == 0 || self.y == last
    }

    /// Iterate all 64 positions in index order
    pub fn all() -> impl Iterator<Item = Pos> {
        (0..TOTAL_CELLS).map(Pos::from_index)
    }
}

impl PartialOrd for Pos {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pos {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.to_index().cmp(&other.to_index())
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}
