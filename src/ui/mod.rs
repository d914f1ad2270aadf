//! GUI module for Revingo
//!
//! A thin egui/eframe front end over [`crate::GameState`]. The CPU searches
//! on a worker thread so the window stays responsive.

mod app;
mod board_view;
mod session;
mod theme;

pub use app::RevingoApp;
pub use session::{GameMode, Session};
