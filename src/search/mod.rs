//! Search module for the Revingo CPU
//!
//! Contains:
//! - Simulation copies of the board for candidate moves
//! - Minimax search with beam truncation and optional alpha-beta
//! - The search-free easy picker

pub mod alphabeta;
pub mod easy;
pub mod simulate;

pub use alphabeta::{SearchResult, SearchStats, Searcher};
pub use easy::pick_easy_move;
pub use simulate::{simulate_move, SimMove, SimState};
