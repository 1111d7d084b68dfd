//! Navigator Panel Widget
//! Shows the active position and emits navigation requests.

use crate::data::{AnalysisTree, Piece, PositionNode, Side, SfenBoard, BOARD_SIZE};
use crate::navigator::{NavigatorAction, NavigatorState};
use egui::{Color32, RichText, ScrollArea};

const BLACK_PIECE: Color32 = Color32::from_rgb(230, 230, 230);
const WHITE_PIECE: Color32 = Color32::from_rgb(255, 99, 132);
const NOTICE_COLOR: Color32 = Color32::from_rgb(255, 193, 7);

/// Right side panel bound to a `NavigatorState`.
pub struct NavigatorPanel {
    pub show_board: bool,
}

impl Default for NavigatorPanel {
    fn default() -> Self {
        Self { show_board: true }
    }
}

impl NavigatorPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the panel. At most one action is returned per frame.
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        state: &NavigatorState,
        tree: &AnalysisTree,
    ) -> Option<NavigatorAction> {
        let mut action = None;
        let node = state.current_node(tree);

        if let Some(meta) = &tree.meta {
            let black = meta.data.black_player.as_deref().unwrap_or("?");
            let white = meta.data.white_player.as_deref().unwrap_or("?");
            ui.label(RichText::new(format!("☗ {}  vs  ☖ {}", black, white)).size(13.0));
            ui.add_space(5.0);
            ui.separator();
        }

        ui.label(RichText::new("🧭 Position").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                Self::draw_node_text(ui, node, state.current_index());
            });

        if self.show_board {
            if let Some(board) = node.and_then(|n| SfenBoard::parse(&n.sfen).ok()) {
                ui.add_space(8.0);
                Self::draw_board(ui, &board);
            }
        }
        ui.checkbox(&mut self.show_board, "Show board");

        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Controls =====
        ui.horizontal(|ui| {
            if ui.button("⏴ Previous").clicked() {
                action = Some(NavigatorAction::Previous);
            }
            if ui.button("Next ⏵").clicked() {
                action = Some(NavigatorAction::Next);
            }
            let mut mode_pv = state.mode_pv();
            if ui.checkbox(&mut mode_pv, "PV Mode").changed() {
                action = Some(NavigatorAction::SetPvMode(mode_pv));
            }
        });

        if let Some(notice) = state.notice() {
            ui.add_space(5.0);
            ui.horizontal_wrapped(|ui| {
                ui.label(RichText::new(notice.message()).size(12.0).color(NOTICE_COLOR));
                if ui.small_button("✕").clicked() {
                    action = Some(NavigatorAction::DismissNotice);
                }
            });
        }

        // ===== Branch choice =====
        if let Some(options) = state.next_options(tree).filter(|o| o.len() > 1) {
            ui.add_space(10.0);
            let header = RichText::new("Select Next Move:").size(13.0).strong();
            ui.label(if state.awaiting_choice() {
                header.color(NOTICE_COLOR)
            } else {
                header
            });
            ui.add_space(5.0);
            ScrollArea::vertical()
                .id_salt("next_options")
                .max_height(180.0)
                .show(ui, |ui| {
                    for option in options {
                        match option {
                            Some(next) => {
                                let text = format!("Move: {}, Index: {}", next.move_label, next.index);
                                if ui.button(text).clicked() {
                                    action = Some(NavigatorAction::GoTo {
                                        index: next.index,
                                        id: next.id.clone(),
                                    });
                                }
                            }
                            None => {
                                ui.add_enabled(false, egui::Button::new("Move: ?, Index: ?"));
                            }
                        }
                    }
                });
        }

        ui.add_space(10.0);
        let trail: Vec<String> = state
            .history()
            .iter()
            .map(|entry| entry.index.to_string())
            .collect();
        ui.label(
            RichText::new(format!("History: {}", trail.join(" → ")))
                .size(11.0)
                .color(Color32::GRAY),
        );

        action
    }

    fn draw_node_text(ui: &mut egui::Ui, node: Option<&PositionNode>, index: i64) {
        let sfen = node
            .map(|n| n.sfen.as_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("No data");
        let cp = node
            .and_then(|n| n.cp)
            .map(|cp| cp.to_string())
            .unwrap_or_else(|| "N/A".to_string());

        ui.label(RichText::new(format!("Index: {}", index)).size(12.0));
        ui.horizontal_wrapped(|ui| {
            ui.label(RichText::new("SFEN:").strong());
            ui.label(RichText::new(sfen).monospace().size(11.0));
        });
        ui.label(RichText::new(format!("CP: {}", cp)).size(12.0));

        if let Some(node) = node {
            if !node.move_label.is_empty() {
                ui.label(RichText::new(format!("Move: {}", node.move_label)).size(12.0));
            }
            if !node.comment.is_empty() {
                ui.add_space(4.0);
                ui.label(RichText::new(&node.comment).italics().size(11.0));
            }
        }
    }

    fn draw_board(ui: &mut egui::Ui, board: &SfenBoard) {
        Self::draw_hand(ui, board, Side::White);

        egui::Grid::new("sfen_board")
            .spacing([2.0, 2.0])
            .min_col_width(22.0)
            .show(ui, |ui| {
                for rank in board.squares.iter() {
                    for square in rank.iter().take(BOARD_SIZE) {
                        match square {
                            Some(piece) => {
                                ui.label(Self::piece_text(piece));
                            }
                            None => {
                                ui.label(RichText::new("·").monospace().color(Color32::DARK_GRAY));
                            }
                        }
                    }
                    ui.end_row();
                }
            });

        Self::draw_hand(ui, board, Side::Black);

        let turn = match board.side_to_move {
            Side::Black => "Black to move",
            Side::White => "White to move",
        };
        let turn = match board.move_number {
            Some(n) => format!("{} (move {})", turn, n),
            None => turn.to_string(),
        };
        ui.label(RichText::new(turn).size(11.0).color(Color32::GRAY));
    }

    fn draw_hand(ui: &mut egui::Ui, board: &SfenBoard, side: Side) {
        let hand = board.hand_of(side);
        let text = if hand.is_empty() {
            "-".to_string()
        } else {
            hand.iter()
                .map(|&(letter, count)| {
                    if count > 1 {
                        format!("{}{}", letter, count)
                    } else {
                        letter.to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(" ")
        };
        let owner = match side {
            Side::Black => "☗ hand",
            Side::White => "☖ hand",
        };
        ui.label(RichText::new(format!("{}: {}", owner, text)).size(11.0).monospace());
    }

    fn piece_text(piece: &Piece) -> RichText {
        let color = match piece.side() {
            Side::Black => BLACK_PIECE,
            Side::White => WHITE_PIECE,
        };
        RichText::new(piece.label()).monospace().color(color)
    }
}
