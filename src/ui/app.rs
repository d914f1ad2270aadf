//! Main application for the Revingo GUI

use eframe::egui;
use egui::{CentralPanel, Context, CornerRadius, Frame, RichText, SidePanel, TopBottomPanel, Vec2};

use crate::config::Config;
use crate::eval::Difficulty;
use crate::game::{Outcome, Phase};
use crate::rules::{BONUS_TURN_COUNT, GAUGE_MAX};
use crate::Player;

use super::board_view::{BoardScene, BoardView};
use super::session::{GameMode, Session};
use super::theme::*;

/// Main Revingo application
pub struct RevingoApp {
    session: Session,
    board_view: BoardView,
    show_debug: bool,
}

impl RevingoApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        Self {
            session: Session::new(config),
            board_view: BoardView::default(),
            show_debug: false,
        }
    }

    /// Render the top menu bar
    fn render_menu_bar(&mut self, ctx: &Context) {
        TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("Game", |ui| {
                    if ui.button("New Game (vs CPU - Black)").clicked() {
                        self.session.set_mode(GameMode::VsCpu { human: Player::Black });
                        ui.close_menu();
                    }
                    if ui.button("New Game (vs CPU - White)").clicked() {
                        self.session.set_mode(GameMode::VsCpu { human: Player::White });
                        ui.close_menu();
                    }
                    if ui.button("New Game (Hot seat)").clicked() {
                        self.session.set_mode(GameMode::HotSeat);
                        ui.close_menu();
                    }
                });

                ui.menu_button("View", |ui| {
                    ui.checkbox(&mut self.show_debug, "CPU Panel (D)");
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let mode_text = match self.session.mode() {
                        GameMode::VsCpu { human } => format!("vs CPU - You: {human}"),
                        GameMode::HotSeat => "Hot seat".to_string(),
                    };
                    ui.label(mode_text);
                });
            });
        });
    }

    /// Render the side panel with game info
    fn render_side_panel(&mut self, ctx: &Context) {
        SidePanel::right("info_panel")
            .min_width(250.0)
            .max_width(290.0)
            .frame(Frame::new().fill(PANEL_BG))
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.add_space(12.0);
                    self.render_title_card(ui);
                    ui.add_space(12.0);

                    self.render_turn_card(ui);
                    ui.add_space(10.0);

                    self.render_player_card(ui, Player::Black);
                    ui.add_space(6.0);
                    self.render_player_card(ui, Player::White);
                    ui.add_space(10.0);

                    self.render_actions_card(ui);
                    ui.add_space(10.0);

                    self.render_difficulty_card(ui);

                    if self.show_debug {
                        ui.add_space(10.0);
                        self.render_debug_card(ui);
                    }

                    if let Some(outcome) = self.session.game().outcome() {
                        ui.add_space(10.0);
                        self.render_game_over_card(ui, outcome);
                    }

                    ui.add_space(10.0);
                    self.render_message_card(ui);
                });
            });
    }

    /// Helper to create a card frame
    fn card_frame() -> Frame {
        Frame::new()
            .fill(CARD_BG)
            .corner_radius(CornerRadius::same(8))
            .inner_margin(12.0)
    }

    fn render_title_card(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.add_space(8.0);
            ui.label(RichText::new("●○").size(20.0).color(TEXT_SECONDARY));
            ui.add_space(4.0);
            ui.label(RichText::new("REVINGO").size(22.0).strong().color(TEXT_PRIMARY));
        });
        ui.horizontal(|ui| {
            ui.add_space(8.0);
            ui.label(RichText::new("Reversi + Bingo").size(11.0).color(TEXT_MUTED));
        });
    }

    /// Render turn indicator card
    fn render_turn_card(&self, ui: &mut egui::Ui) {
        let game = self.session.game();
        Self::card_frame().show(ui, |ui| {
            let turn = game.turn();
            let (fill, ink) = stone_colors(turn);

            ui.horizontal(|ui| {
                let (rect, _) = ui.allocate_exact_size(Vec2::new(48.0, 48.0), egui::Sense::hover());
                ui.painter().circle_filled(rect.center(), 20.0, fill);
                ui.painter().circle_stroke(rect.center(), 20.0, egui::Stroke::new(1.0, ink));

                ui.add_space(12.0);

                ui.vertical(|ui| {
                    ui.add_space(4.0);
                    ui.label(
                        RichText::new(turn.to_string().to_uppercase())
                            .size(18.0)
                            .strong()
                            .color(TEXT_PRIMARY),
                    );

                    let status = if self.session.is_cpu_thinking() {
                        let secs = self
                            .session
                            .cpu_thinking_elapsed()
                            .map_or(0.0, |d| d.as_secs_f32());
                        (format!("CPU thinking... {secs:.1}s"), STATUS_WARNING)
                    } else {
                        match game.phase() {
                            Phase::GameOver => ("Game Over".to_string(), WIN_HIGHLIGHT),
                            Phase::AwaitingLightning => {
                                ("Use lightning or end the game".to_string(), STATUS_WARNING)
                            }
                            Phase::Playing if self.session.reverse_mode() => {
                                ("Pick a stone to reverse".to_string(), REVERSE_TARGET)
                            }
                            Phase::Playing => {
                                let moves = game.legal_moves().len();
                                (format!("{moves} legal moves"), STATUS_OK)
                            }
                        }
                    };
                    ui.label(RichText::new(status.0).size(12.0).color(status.1));
                });
            });
        });
    }

    /// Score, items and bonus gauge for one side
    fn render_player_card(&self, ui: &mut egui::Ui, player: Player) {
        let game = self.session.game();
        let gauge = game.bonus(player);
        let (fill, _) = stone_colors(player);

        Self::card_frame().show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new("●").size(18.0).color(fill));
                ui.label(RichText::new(player.to_string()).size(14.0).strong().color(TEXT_PRIMARY));
                if game.turn() == player && !game.is_game_over() {
                    ui.label(RichText::new("◀").size(12.0).color(STATUS_OK));
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let score = RichText::new(game.score(player).to_string())
                        .size(22.0)
                        .strong()
                        .color(TEXT_PRIMARY);
                    ui.label(score);
                });
            });

            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new(format!(
                        "Stones {}   Reverse {}   Lightning {}",
                        game.board().count(player),
                        game.reverse_items(player),
                        game.lightning_items(player)
                    ))
                    .size(11.0)
                    .color(TEXT_SECONDARY),
                );
            });

            ui.horizontal(|ui| {
                ui.label(RichText::new("Gauge").size(11.0).color(TEXT_MUTED));
                for i in 0..GAUGE_MAX {
                    let color = if i < gauge.gauge { STATUS_WARNING } else { GAUGE_EMPTY };
                    ui.label(RichText::new("■").size(14.0).color(color));
                }
                if gauge.is_active() {
                    ui.label(
                        RichText::new(format!("BONUS {}/{}", gauge.bonus_turns, BONUS_TURN_COUNT))
                            .size(11.0)
                            .strong()
                            .color(WIN_HIGHLIGHT),
                    );
                }
            });
        });
    }

    /// Render actions card
    fn render_actions_card(&mut self, ui: &mut egui::Ui) {
        let input = self.session.accepts_input();
        let game = self.session.game();
        let can_reverse = input && (game.can_use_reverse() || self.session.reverse_mode());
        let can_lightning = input && game.can_use_lightning();
        let can_end = input && game.phase() == Phase::AwaitingLightning;

        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("ACTIONS").size(10.0).color(TEXT_MUTED));
            ui.add_space(8.0);

            ui.horizontal_wrapped(|ui| {
                if action_button(ui, "New Game (N)", true) {
                    self.session.reset();
                }
                let reverse_label = if self.session.reverse_mode() {
                    "Cancel Reverse"
                } else {
                    "Reverse (R)"
                };
                if action_button(ui, reverse_label, can_reverse) {
                    self.session.toggle_reverse();
                }
                if action_button(ui, "Lightning (L)", can_lightning) {
                    self.session.use_lightning();
                }
                if action_button(ui, "Game Over", can_end) {
                    self.session.declare_game_over();
                }
            });
        });
    }

    fn render_difficulty_card(&mut self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("CPU").size(10.0).color(TEXT_MUTED));
            ui.add_space(6.0);

            let mut selected = self.session.difficulty();
            egui::ComboBox::from_id_salt("difficulty")
                .selected_text(selected.to_string())
                .show_ui(ui, |ui| {
                    for difficulty in Difficulty::ALL {
                        ui.selectable_value(&mut selected, difficulty, difficulty.to_string());
                    }
                });
            self.session.set_difficulty(selected);
        });
    }

    /// Last search statistics
    fn render_debug_card(&self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("CPU DEBUG").size(10.0).color(TEXT_MUTED));
            ui.add_space(6.0);

            let Some(result) = self.session.last_cpu_result() else {
                ui.label(RichText::new("Waiting for CPU...").size(10.0).color(TEXT_MUTED));
                return;
            };

            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    let kind = format!("{:?}", result.search_type);
                    ui.label(RichText::new(kind).size(11.0).strong().color(STATUS_OK));
                    let score = format!("Score: {:.2}", result.score);
                    ui.label(RichText::new(score).size(10.0).color(TEXT_SECONDARY));
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
                    ui.vertical(|ui| {
                        let time = format!("{}ms", result.time_ms);
                        ui.label(RichText::new(time).size(10.0).color(TEXT_SECONDARY));
                        let nodes = format!("{} nodes", result.nodes);
                        ui.label(RichText::new(nodes).size(10.0).color(TEXT_MUTED));
                    });
                });
            });

            if let Some(pos) = result.best_move {
                ui.add_space(4.0);
                let best = RichText::new(format!("→ {pos}")).size(12.0).strong();
                ui.label(best.color(WIN_HIGHLIGHT));
            }
            if let Some(time) = self.session.cpu_thinking_time() {
                ui.label(
                    RichText::new(format!("Last reply: {:.3}s", time.as_secs_f32()))
                        .size(10.0)
                        .color(TEXT_SECONDARY),
                );
            }
        });
    }

    fn render_game_over_card(&mut self, ui: &mut egui::Ui, outcome: Outcome) {
        let game = self.session.game();
        let headline = match outcome {
            Outcome::Winner(player) => format!("{} WINS!", player.to_string().to_uppercase()),
            Outcome::Draw => "DRAW".to_string(),
        };
        let tally = format!(
            "{} - {}",
            game.score(Player::Black),
            game.score(Player::White)
        );

        Frame::new()
            .fill(egui::Color32::from_rgb(45, 80, 55))
            .corner_radius(CornerRadius::same(8))
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    let banner = egui::Color32::from_rgb(180, 255, 180);
                    ui.label(RichText::new("GAME OVER").size(12.0).color(banner));
                    ui.add_space(8.0);
                    ui.label(RichText::new(headline).size(18.0).strong().color(TEXT_PRIMARY));
                    ui.label(RichText::new(tally).size(14.0).color(TEXT_SECONDARY));
                    ui.add_space(12.0);

                    if action_button(ui, "New Game", true) {
                        self.session.reset();
                    }
                });
            });
    }

    fn render_message_card(&self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("LOG").size(10.0).color(TEXT_MUTED));
            ui.add_space(6.0);
            for (i, message) in self.session.messages().enumerate() {
                let color = if i == 0 { TEXT_PRIMARY } else { TEXT_SECONDARY };
                ui.label(RichText::new(message).size(11.0).color(color));
            }
        });
    }

    /// Render the main board
    fn render_board(&mut self, ctx: &Context) {
        CentralPanel::default()
            .frame(Frame::new().fill(BOARD_AREA_BG).inner_margin(10.0))
            .show(ctx, |ui| {
                let game = self.session.game();
                let scene = BoardScene {
                    board: game.board(),
                    turn: game.turn(),
                    legal: game.legal_moves(),
                    reach: game.reach(),
                    last_move: game.last_move(),
                    reverse_mode: self.session.reverse_mode(),
                    interactive: self.session.accepts_input() && game.phase() == Phase::Playing,
                };

                if let Some(pos) = self.board_view.show(ui, &scene) {
                    self.session.click(pos);
                }
            });
    }

    /// Handle keyboard shortcuts
    fn handle_input(&mut self, ctx: &Context) {
        let (debug, new_game, reverse, lightning) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::D),
                i.key_pressed(egui::Key::N),
                i.key_pressed(egui::Key::R),
                i.key_pressed(egui::Key::L),
            )
        });

        if debug {
            self.show_debug = !self.show_debug;
        }
        if new_game {
            self.session.reset();
        }
        if reverse {
            self.session.toggle_reverse();
        }
        if lightning && self.session.game().can_use_lightning() {
            self.session.use_lightning();
        }
    }
}

/// Fill and outline for a player's stone
fn stone_colors(player: Player) -> (egui::Color32, egui::Color32) {
    match player {
        Player::Black => (BLACK_STONE, BLACK_STONE_HIGHLIGHT),
        Player::White => (WHITE_STONE, WHITE_STONE_SHADOW),
    }
}

/// Flat card-style button; returns whether it was clicked
fn action_button(ui: &mut egui::Ui, label: &str, enabled: bool) -> bool {
    let color = if enabled { TEXT_PRIMARY } else { TEXT_MUTED };
    let button = egui::Button::new(RichText::new(label).size(12.0).color(color))
        .fill(BUTTON_BG)
        .corner_radius(CornerRadius::same(6));
    ui.add_enabled(enabled, button).clicked()
}

impl eframe::App for RevingoApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.handle_input(ctx);

        self.session.check_cpu_result();
        self.session.start_cpu_thinking();

        self.render_menu_bar(ctx);
        self.render_side_panel(ctx);
        self.render_board(ctx);

        if self.session.is_cpu_thinking() {
            ctx.request_repaint();
        }
    }
}
