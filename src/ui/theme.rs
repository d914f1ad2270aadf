//! Theme constants for the Revingo GUI

use egui::Color32;

// Board colors - classic felt
pub const BOARD_BG: Color32 = Color32::from_rgb(34, 120, 74);
pub const GRID_LINE: Color32 = Color32::from_rgb(18, 70, 42);
pub const COORD_TEXT: Color32 = Color32::from_rgb(200, 230, 210);

// Stone colors
pub const BLACK_STONE: Color32 = Color32::from_rgb(25, 25, 30);
pub const BLACK_STONE_HIGHLIGHT: Color32 = Color32::from_rgb(70, 70, 80);
pub const WHITE_STONE: Color32 = Color32::from_rgb(250, 250, 252);
pub const WHITE_STONE_SHADOW: Color32 = Color32::from_rgb(190, 190, 195);

// Markers
pub const LAST_MOVE_MARKER: Color32 = Color32::from_rgb(230, 60, 60);
pub const REACH_HIGHLIGHT: Color32 = Color32::from_rgb(255, 200, 40);
pub const REVERSE_TARGET: Color32 = Color32::from_rgb(190, 90, 255);

// Functions for colors that can't be const
pub fn legal_hint() -> Color32 {
    Color32::from_rgba_unmultiplied(0, 0, 0, 60)
}

pub fn reach_fill() -> Color32 {
    Color32::from_rgba_unmultiplied(255, 200, 40, 50)
}

pub fn hover_invalid() -> Color32 {
    Color32::from_rgba_unmultiplied(255, 50, 50, 100)
}

// Panel colors - dark modern theme
pub const PANEL_BG: Color32 = Color32::from_rgb(25, 27, 31);
pub const CARD_BG: Color32 = Color32::from_rgb(35, 38, 43);
pub const BUTTON_BG: Color32 = Color32::from_rgb(50, 53, 58);
pub const BOARD_AREA_BG: Color32 = Color32::from_rgb(40, 42, 46);
pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(240, 240, 245);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(160, 165, 175);
pub const TEXT_MUTED: Color32 = Color32::from_rgb(120, 125, 135);

// Status colors
pub const STATUS_OK: Color32 = Color32::from_rgb(80, 200, 120);
pub const STATUS_WARNING: Color32 = Color32::from_rgb(255, 180, 50);
pub const WIN_HIGHLIGHT: Color32 = Color32::from_rgb(50, 220, 50);
pub const GAUGE_EMPTY: Color32 = Color32::from_rgb(60, 62, 66);

// Sizes
pub const BOARD_MARGIN: f32 = 28.0;
pub const STONE_RADIUS_RATIO: f32 = 0.42;
pub const GRID_LINE_WIDTH: f32 = 1.5;
pub const LAST_MOVE_MARKER_RADIUS: f32 = 5.0;
pub const LEGAL_HINT_RADIUS_RATIO: f32 = 0.12;
