//! Evaluation module for the computer player
//!
//! Contains:
//! - Difficulty presets and their weights
//! - Static position evaluation and per-move scores

pub mod heuristic;
pub mod params;

pub use heuristic::{move_immediate_score, move_order_score, static_evaluate, MoveContext};
pub use params::{Beam, CpuParams, Difficulty};
