//! Line deletion ("bingo") detection and chain resolution
//!
//! A line qualifies when all 8 of its cells hold stones of one colour.
//! Qualifying lines are cleared together; clearing can complete another
//! line, so resolution repeats until the board is stable.

use tracing::{error, trace};

use crate::board::{Bitboard, Board, Cell, LineDef, Pos};

/// Upper bound on resolution passes
pub const MAX_CHAIN: usize = 8;

/// Result of one scan for completed lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deletions {
    /// Union of all cells on completed lines
    pub cells: Bitboard,
    /// Number of completed lines (shared cells count once in `cells`)
    pub line_count: u32,
    pub line_defs: Vec<LineDef>,
}

impl Deletions {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.line_count == 0
    }

    #[inline]
    pub fn cell_count(&self) -> u32 {
        self.cells.count()
    }
}

/// One pass of the resolution loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionStep {
    pub cells: Vec<Pos>,
    pub line_defs: Vec<LineDef>,
    pub line_count: u32,
    pub gain: u32,
}

/// Everything the resolution loop removed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub steps: Vec<DeletionStep>,
    /// Total lines over all passes
    pub lines: u32,
    /// Total cells cleared over all passes
    pub cells: u32,
    /// Total combo score over all passes
    pub gain: u32,
}

impl Resolution {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines == 0
    }
}

fn line_is_full(board: &Board, line: LineDef) -> bool {
    let cells = line.cells();
    let first = board.get(cells[0]);
    first != Cell::Empty && cells[1..].iter().all(|&p| board.get(p) == first)
}

/// Scan all 18 lines for completed mono-colour lines.
pub fn find_deletions(board: &Board) -> Deletions {
    let mut result = Deletions::default();
    for line in LineDef::ALL {
        if line_is_full(board, line) {
            result.line_count += 1;
            result.line_defs.push(line);
            result.cells = result.cells.union(line.mask());
        }
    }
    result
}

/// Score for one pass: `round(cells * (1 + 0.5 * max(0, lines - 1)))`.
///
/// Computed in integers; the product only ever has a fractional part of
/// one half, which rounds up.
pub fn combo_gain(cell_count: u32, line_count: u32) -> u32 {
    let half_steps = 2 + line_count.saturating_sub(1);
    (cell_count * half_steps + 1) / 2
}

/// Clear completed lines until none remain (at most [`MAX_CHAIN`] passes).
pub fn resolve_deletions(board: &mut Board) -> Resolution {
    let mut resolution = Resolution::default();

    for chain in 0..MAX_CHAIN {
        let found = find_deletions(board);
        if found.is_empty() {
            return resolution;
        }

        let cell_count = found.cell_count();
        let gain = combo_gain(cell_count, found.line_count);
        trace!(chain, lines = found.line_count, cells = cell_count, gain, "deletion pass");

        board.clear_mask(found.cells);
        resolution.lines += found.line_count;
        resolution.cells += cell_count;
        resolution.gain += gain;
        resolution.steps.push(DeletionStep {
            cells: found.cells.iter_ones().collect(),
            line_defs: found.line_defs,
            line_count: found.line_count,
            gain,
        });
    }

    // Every pass empties at least 8 cells, so a ninth qualifying line
    // cannot exist on a 64-cell board.
    let leftover = find_deletions(board);
    if !leftover.is_empty() {
        error!(lines = leftover.line_count, "deletion chain did not stabilise");
        debug_assert!(false, "deletion chain exceeded {MAX_CHAIN} passes");
    }
    resolution
}
