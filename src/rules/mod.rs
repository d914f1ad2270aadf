//! Game rules for Revingo
//!
//! This module implements the rule set:
//! - Capture rules (Othello-style flipping, legal moves)
//! - Reach detection (lines one move from completion)
//! - Bingo line deletion and combo scoring
//! - Items (lightning, reverse) and the bonus gauge

pub mod bingo;
pub mod bonus;
pub mod capture;
pub mod items;
pub mod reach;

// Re-exports for convenient access
pub use bingo::{
    combo_gain, find_deletions, resolve_deletions, DeletionStep, Deletions, Resolution, MAX_CHAIN,
};
pub use bonus::{
    placement_bonus, BonusGauge, BonusTransition, BONUS_PLACEMENT_FACTOR, BONUS_TURN_COUNT,
    GAUGE_MAX,
};
pub use capture::{
    apply_move, collect_flips, collect_flips_at, collect_flips_from_anchor, has_legal_move,
    is_legal_move, legal_moves_for, MoveSet,
};
pub use items::{
    apply_lightning, apply_reverse, is_reverse_target, lightning_targets, INITIAL_LIGHTNING_ITEMS,
    LIGHTNING_TARGETS, REVERSE_ITEM_CAP,
};
pub use reach::{reach_for, ReachInfo};
