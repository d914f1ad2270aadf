//! The 18 scoring lines: 8 rows, 8 columns and the two long diagonals

use super::{Bitboard, Pos, BOARD_SIZE};

/// Identifies one scoring line.
///
/// `Diag(0)` is the main diagonal (x == y), `Diag(1)` the anti-diagonal
/// (x + y == 7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LineDef {
    Row(u8),
    Col(u8),
    Diag(u8),
}

impl LineDef {
    /// All lines in scan order: rows, columns, main diagonal, anti-diagonal
    pub const ALL: [LineDef; 18] = [
        LineDef::Row(0),
        LineDef::Row(1),
        LineDef::Row(2),
        LineDef::Row(3),
        LineDef::Row(4),
        LineDef::Row(5),
        LineDef::Row(6),
        LineDef::Row(7),
        LineDef::Col(0),
        LineDef::Col(1),
        LineDef::Col(2),
        LineDef::Col(3),
        LineDef::Col(4),
        LineDef::Col(5),
        LineDef::Col(6),
        LineDef::Col(7),
        LineDef::Diag(0),
        LineDef::Diag(1),
    ];

    /// Cells of the line, ordered along the line
    pub fn cells(self) -> [Pos; BOARD_SIZE] {
        let last = BOARD_SIZE as u8 - 1;
        std::array::from_fn(|i| {
            let i = i as u8;
            match self {
                LineDef::Row(y) => Pos::new(i, y),
                LineDef::Col(x) => Pos::new(x, i),
                LineDef::Diag(0) => Pos::new(i, i),
                LineDef::Diag(_) => Pos::new(last - i, i),
            }
        })
    }

    pub fn mask(self) -> Bitboard {
        self.cells().into_iter().collect()
    }

    pub fn contains(self, pos: Pos) -> bool {
        match self {
            LineDef::Row(y) => pos.y == y,
            LineDef::Col(x) => pos.x == x,
            LineDef::Diag(0) => pos.x == pos.y,
            LineDef::Diag(_) => pos.x as usize + pos.y as usize == BOARD_SIZE - 1,
        }
    }

    /// Lines passing through `pos`: its row, its column, and any diagonal
    pub fn through(pos: Pos) -> impl Iterator<Item = LineDef> {
        [
            Some(LineDef::Row(pos.y)),
            Some(LineDef::Col(pos.x)),
            LineDef::Diag(0).contains(pos).then_some(LineDef::Diag(0)),
            LineDef::Diag(1).contains(pos).then_some(LineDef::Diag(1)),
        ]
        .into_iter()
        .flatten()
    }
}

impl std::fmt::Display for LineDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineDef::Row(y) => write!(f, "row {y}"),
            LineDef::Col(x) => write!(f, "col {x}"),
            LineDef::Diag(0) => f.write_str("diag \\"),
            LineDef::Diag(_) => f.write_str("diag /"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anti_diagonal_cells() {
        let cells = LineDef::Diag(1).cells();
        assert_eq!(cells[0], Pos::new(7, 0));
        assert_eq!(cells[7], Pos::new(0, 7));
        assert!(cells.iter().all(|p| LineDef::Diag(1).contains(*p)));
    }

    #[test]
    fn test_through_corner_and_centre() {
        let corner: Vec<_> = LineDef::through(Pos::new(0, 0)).collect();
        assert_eq!(corner, vec![LineDef::Row(0), LineDef::Col(0), LineDef::Diag(0)]);

        let side: Vec<_> = LineDef::through(Pos::new(1, 0)).collect();
        assert_eq!(side.len(), 2);
    }

    #[test]
    fn test_every_line_has_eight_cells() {
        for line in LineDef::ALL {
            assert_eq!(line.mask().count(), 8, "{line}");
        }
    }
}
