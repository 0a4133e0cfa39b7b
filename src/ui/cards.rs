//! egui rendering of message and user cards.

use crate::theme::Theme;
use chatstats::session::avatar;
use chatstats::view::MessageRenderer;
use eframe::egui::{self, Color32, RichText};

const AVATAR_SIZE: f32 = 28.0;

#[derive(Debug, Clone, PartialEq)]
pub enum CardBody {
    Message { text: String, timestamp: String },
    Stat { count: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub username: String,
    pub initial: String,
    pub avatar: Color32,
    pub body: CardBody,
}

impl Card {
    fn new(username: &str, body: CardBody) -> Self {
        Self {
            username: username.to_string(),
            initial: avatar::initial_for(username),
            avatar: Theme::avatar_color(username),
            body,
        }
    }

    pub fn show(&self, ui: &mut egui::Ui, theme: &Theme) {
        theme.card_frame().show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal_top(|ui| {
                self.show_avatar(ui, theme);
                ui.vertical(|ui| {
                    ui.spacing_mut().item_spacing.y = theme.spacing_4;
                    ui.label(RichText::new(&self.username).strong().color(self.avatar));
                    match &self.body {
                        CardBody::Message { text, timestamp } => {
                            ui.label(RichText::new(text).color(theme.text_primary));
                            ui.label(RichText::new(timestamp).small().color(theme.text_muted));
                        }
                        CardBody::Stat { count } => {
                            ui.label(
                                RichText::new(format!("{count} messages"))
                                    .small()
                                    .color(theme.text_muted),
                            );
                        }
                    }
                });
            });
        });
    }

    fn show_avatar(&self, ui: &mut egui::Ui, theme: &Theme) {
        let (rect, _) =
            ui.allocate_exact_size(egui::vec2(AVATAR_SIZE, AVATAR_SIZE), egui::Sense::hover());
        let painter = ui.painter();
        painter.circle_filled(rect.center(), AVATAR_SIZE / 2.0, self.avatar);
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            &self.initial,
            egui::FontId::proportional(13.0),
            theme.text_on_accent,
        );
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CardRenderer;

impl MessageRenderer for CardRenderer {
    type Node = Card;

    fn render_message(&self, username: &str, text: &str, timestamp: &str) -> Card {
        Card::new(
            username,
            CardBody::Message {
                text: text.to_string(),
                timestamp: timestamp.to_string(),
            },
        )
    }

    fn render_stat_entry(&self, username: &str, count: u32) -> Card {
        Card::new(username, CardBody::Stat { count })
    }
}
