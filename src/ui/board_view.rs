//! Board rendering for the Revingo GUI

use egui::{Color32, CornerRadius, Painter, Pos2, Rect, Sense, Stroke, Vec2};

use crate::board::{Board, Cell, Player, Pos, BOARD_SIZE};
use crate::game::LastMove;
use crate::rules::{is_reverse_target, MoveSet, ReachInfo};

use super::theme::*;

/// What the board should show this frame
pub struct BoardScene<'a> {
    pub board: &'a Board,
    pub turn: Player,
    pub legal: &'a MoveSet,
    pub reach: &'a ReachInfo,
    pub last_move: Option<&'a LastMove>,
    /// Clicks pick an opponent stone instead of an empty cell
    pub reverse_mode: bool,
    /// Human input accepted
    pub interactive: bool,
}

impl BoardScene<'_> {
    fn accepts(&self, pos: Pos) -> bool {
        if self.reverse_mode {
            is_reverse_target(self.board, pos, self.turn)
        } else {
            self.legal.contains(pos)
        }
    }
}

/// Board view handles rendering and input for the game board
pub struct BoardView {
    /// Cached cell size for coordinate calculations
    cell_size: f32,
    /// Board drawing area
    board_rect: Rect,
}

impl Default for BoardView {
    fn default() -> Self {
        Self {
            cell_size: 60.0,
            board_rect: Rect::NOTHING,
        }
    }
}

impl BoardView {
    /// Render the board and return the clicked cell if it accepts input
    pub fn show(&mut self, ui: &mut egui::Ui, scene: &BoardScene<'_>) -> Option<Pos> {
        let available_size = ui.available_size();

        let board_size = available_size.x.min(available_size.y) - 20.0;
        self.cell_size = (board_size - 2.0 * BOARD_MARGIN) / BOARD_SIZE as f32;

        let (response, painter) =
            ui.allocate_painter(Vec2::new(board_size, board_size), Sense::click());
        self.board_rect = response.rect;

        painter.rect_filled(self.board_rect, CornerRadius::same(4), BOARD_BG);
        self.draw_grid(&painter);
        self.draw_coordinates(&painter);
        self.draw_reach(&painter, scene.reach);
        self.draw_stones(&painter, scene.board);

        if let Some(last) = scene.last_move {
            self.draw_last_move_marker(&painter, last.pos);
        }

        if !scene.interactive {
            return None;
        }

        if !scene.reverse_mode {
            self.draw_legal_hints(&painter, scene.legal);
        }

        let pointer = response.hover_pos()?;
        let pos = self.screen_to_board(pointer)?;
        let valid = scene.accepts(pos);
        self.draw_hover_preview(&painter, pos, scene, valid);

        (response.clicked() && valid).then_some(pos)
    }

    /// Draw the 8x8 cell grid
    fn draw_grid(&self, painter: &Painter) {
        let stroke = Stroke::new(GRID_LINE_WIDTH, GRID_LINE);
        let span = BOARD_SIZE as f32 * self.cell_size;

        for i in 0..=BOARD_SIZE {
            let offset = BOARD_MARGIN + i as f32 * self.cell_size;

            let start = self.board_rect.min + Vec2::new(offset, BOARD_MARGIN);
            let end = self.board_rect.min + Vec2::new(offset, BOARD_MARGIN + span);
            painter.line_segment([start, end], stroke);

            let start = self.board_rect.min + Vec2::new(BOARD_MARGIN, offset);
            let end = self.board_rect.min + Vec2::new(BOARD_MARGIN + span, offset);
            painter.line_segment([start, end], stroke);
        }
    }

    /// Column letters a-h across the top, row numbers 1-8 down the left
    fn draw_coordinates(&self, painter: &Painter) {
        let font = egui::FontId::proportional(12.0);

        for i in 0..BOARD_SIZE {
            let center = BOARD_MARGIN + (i as f32 + 0.5) * self.cell_size;

            let letter = (b'a' + i as u8) as char;
            let min = self.board_rect.min;
            let top = Pos2::new(min.x + center, min.y + BOARD_MARGIN * 0.5);
            painter.text(top, egui::Align2::CENTER_CENTER, letter, font.clone(), COORD_TEXT);

            let left = Pos2::new(min.x + BOARD_MARGIN * 0.5, min.y + center);
            let number = format!("{}", i + 1);
            painter.text(left, egui::Align2::CENTER_CENTER, number, font.clone(), COORD_TEXT);
        }
    }

    /// Tint the lines one move from a bingo and ring their completing cells
    fn draw_reach(&self, painter: &Painter, reach: &ReachInfo) {
        for line in &reach.line_defs {
            for pos in line.cells() {
                painter.rect_filled(self.cell_rect(pos), CornerRadius::same(0), reach_fill());
            }
        }
        let radius = self.cell_size * STONE_RADIUS_RATIO;
        let stroke = Stroke::new(2.5, REACH_HIGHLIGHT);
        for &pos in &reach.empty_cells {
            painter.circle_stroke(self.board_to_screen(pos), radius, stroke);
        }
    }

    fn draw_stones(&self, painter: &Painter, board: &Board) {
        for pos in Pos::all() {
            if let Some(player) = board.get(pos).owner() {
                self.draw_stone(painter, pos, player);
            }
        }
    }

    /// Draw a single stone with visual polish
    fn draw_stone(&self, painter: &Painter, pos: Pos, player: Player) {
        let center = self.board_to_screen(pos);
        let radius = self.cell_size * STONE_RADIUS_RATIO;
        let shadow_offset = Vec2::new(2.0, 2.0);

        match player {
            Player::Black => {
                painter.circle_filled(
                    center + shadow_offset,
                    radius,
                    Color32::from_rgba_unmultiplied(0, 0, 0, 60),
                );
                painter.circle_filled(center, radius, BLACK_STONE);

                let highlight_offset = Vec2::new(-radius * 0.3, -radius * 0.3);
                painter.circle_filled(
                    center + highlight_offset,
                    radius * 0.2,
                    BLACK_STONE_HIGHLIGHT,
                );
            }
            Player::White => {
                painter.circle_filled(
                    center + shadow_offset,
                    radius,
                    Color32::from_rgba_unmultiplied(0, 0, 0, 40),
                );
                painter.circle_filled(center, radius, WHITE_STONE);
                painter.circle_stroke(
                    center,
                    radius * 0.85,
                    Stroke::new(radius * 0.1, WHITE_STONE_SHADOW),
                );
            }
        }
    }

    fn draw_last_move_marker(&self, painter: &Painter, pos: Pos) {
        let center = self.board_to_screen(pos);
        painter.circle_filled(center, LAST_MOVE_MARKER_RADIUS, LAST_MOVE_MARKER);
    }

    fn draw_legal_hints(&self, painter: &Painter, legal: &MoveSet) {
        let radius = self.cell_size * LEGAL_HINT_RADIUS_RATIO;
        for pos in legal.iter() {
            painter.circle_filled(self.board_to_screen(pos), radius, legal_hint());
        }
    }

    fn draw_hover_preview(&self, painter: &Painter, pos: Pos, scene: &BoardScene<'_>, valid: bool) {
        let center = self.board_to_screen(pos);
        let radius = self.cell_size * STONE_RADIUS_RATIO;

        if !valid {
            if scene.board.get(pos) == Cell::Empty || scene.reverse_mode {
                painter.circle_filled(center, radius, hover_invalid());
            }
            return;
        }

        if scene.reverse_mode {
            painter.circle_stroke(center, radius + 2.0, Stroke::new(3.0, REVERSE_TARGET));
            return;
        }

        let color = match scene.turn {
            Player::Black => Color32::from_rgba_unmultiplied(20, 20, 20, 110),
            Player::White => Color32::from_rgba_unmultiplied(240, 240, 240, 110),
        };
        painter.circle_filled(center, radius, color);
    }

    fn cell_rect(&self, pos: Pos) -> Rect {
        let min = self.board_rect.min
            + Vec2::new(
                BOARD_MARGIN + pos.x as f32 * self.cell_size,
                BOARD_MARGIN + pos.y as f32 * self.cell_size,
            );
        Rect::from_min_size(min, Vec2::splat(self.cell_size))
    }

    /// Convert screen coordinates to board position
    pub fn screen_to_board(&self, screen_pos: Pos2) -> Option<Pos> {
        let relative = screen_pos - self.board_rect.min;
        let x = ((relative.x - BOARD_MARGIN) / self.cell_size).floor() as i32;
        let y = ((relative.y - BOARD_MARGIN) / self.cell_size).floor() as i32;
        Pos::try_new(x, y)
    }

    /// Centre of the cell at `pos`
    pub fn board_to_screen(&self, pos: Pos) -> Pos2 {
        self.cell_rect(pos).center()
    }
}
