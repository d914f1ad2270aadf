//! Revingo: Othello capture with bingo line clears
//!
//! A rules engine and computer opponent for an 8x8 disc-flipping game:
//! - Othello-style capture; a placement must flip at least one stone
//! - Any full single-colour row, column or main diagonal is deleted
//!   ("bingo"), scored, and may cascade
//! - Reverse items (earned per deleted line) and lightning items (usable
//!   when both sides are stuck)
//! - A 3-step bingo gauge opening a window of bonus placement scoring
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//! - [`board`]: Board representation with bitboards, scoring lines
//! - [`rules`]: Capture, reach, deletion, items and bonus gauge
//! - [`game`]: Authoritative match state and the turn pipeline
//! - [`eval`]: Difficulty presets and heuristics
//! - [`search`]: Simulation, minimax search and the easy picker
//! - [`engine`]: CPU facade
//! - [`ui`]: egui front end
//!
//! # Quick Start
//!
//! ```
//! use revingo::{CpuEngine, Difficulty, GameState, Player, Pos};
//! use revingo::random::RngSource;
//!
//! let mut game = GameState::new();
//! let mut rng = RngSource::seeded(7);
//! let engine = CpuEngine::new(Difficulty::Normal);
//!
//! // Black opens, the CPU answers as White
//! game.place_move(Pos::new(3, 2)).unwrap();
//! if let Some(pos) = engine.choose_move(&game, &mut rng) {
//!     let report = game.place_move(pos).unwrap();
//!     println!("CPU plays {pos}, flipping {}", report.flipped.len());
//! }
//! assert_eq!(game.turn(), Player::Black);
//! ```

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod eval;
pub mod game;
pub mod random;
pub mod rules;
pub mod search;
pub mod ui;

// Re-export commonly used types for convenience
pub use board::{Board, Cell, LineDef, Player, Pos, BOARD_SIZE};
pub use config::Config;
pub use engine::{CpuAction, CpuEngine, MoveResult, SearchType};
pub use error::{ConfigError, GameError};
pub use eval::{CpuParams, Difficulty};
pub use game::{ActionKind, GameState, Outcome, Phase, TurnReport};
