use crate::theme::Theme;
use crate::ui::cards::CardRenderer;
use crate::ui::chart::DonutBackend;
use chatstats::command::{command_channel, CommandQueue, CommandSender};
use chatstats::session::store::{FileStore, KeyValueStore, MemoryStore};
use chatstats::session::SystemClock;
use chatstats::view::PanelState;
use chatstats::{ChatConfig, Command, CommandSurface};
use eframe::egui::{self, RichText, ScrollArea};

type ChatSurface = CommandSurface<Box<dyn KeyValueStore>, CardRenderer, DonutBackend>;

pub struct ChatApp {
    surface: ChatSurface,
    queue: CommandQueue,
    commands: CommandSender,
    theme: Theme,
    username_input: String,
    message_input: String,
    diagnostics_log: Vec<String>,
}

impl ChatApp {
    pub fn new(ctx: &egui::Context, config: ChatConfig) -> Self {
        let theme = Theme::default();
        theme.apply_visuals(ctx);

        let mut diagnostics_log = Vec::new();
        let store: Box<dyn KeyValueStore> = match FileStore::open(&config.data_dir) {
            Ok(store) => {
                tracing::info!(dir = %store.dir().display(), "using file-backed snapshot store");
                Box::new(store)
            }
            Err(err) => {
                tracing::warn!(
                    dir = %config.data_dir.display(),
                    error = %err,
                    "data dir unavailable; history will not survive restart"
                );
                diagnostics_log.push(format!(
                    "[{}] data dir {} unavailable: {err}",
                    Self::timestamp(),
                    config.data_dir.display()
                ));
                Box::new(MemoryStore::new())
            }
        };

        let backend = DonutBackend::new(ctx.clone(), config.chart_enabled);
        let surface = CommandSurface::start(&config, store, CardRenderer, backend, Box::new(SystemClock));
        let (commands, queue) = command_channel();

        let mut app = Self {
            surface,
            queue,
            commands,
            theme,
            username_input: "User".to_string(),
            message_input: String::new(),
            diagnostics_log,
        };
        app.collect_warnings();
        app
    }

    fn timestamp() -> String {
        chrono::Local::now().format("%H:%M:%S").to_string()
    }

    fn log_diagnostic(&mut self, message: impl Into<String>) {
        self.diagnostics_log
            .push(format!("[{}] {}", Self::timestamp(), message.into()));
    }

    fn collect_warnings(&mut self) {
        for warning in self.surface.take_warnings() {
            self.log_diagnostic(warning);
        }
    }

    fn send(&self, ctx: &egui::Context, command: Command) {
        self.commands.send(command);
        ctx.request_repaint();
    }

    fn drain_commands(&mut self) {
        let drained = self.queue.drain(&mut self.surface);
        if drained.posted > 0 {
            self.message_input.clear();
        }
        self.collect_warnings();
    }

    fn submit_message(&mut self, ctx: &egui::Context) {
        self.send(
            ctx,
            Command::Submit {
                username: self.username_input.clone(),
                text: self.message_input.clone(),
            },
        );
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Chat");
                ui.separator();
                let view = self.surface.view();
                ui.label(
                    RichText::new(format!(
                        "{} messages from {} users",
                        view.summary.total_messages, view.summary.active_users
                    ))
                    .color(self.theme.text_muted),
                );
            });
        });
    }

    fn render_stats_panel(&mut self, ctx: &egui::Context) {
        if self.surface.panel() != PanelState::Visible {
            return;
        }

        let mut close = false;
        egui::SidePanel::right("stats_panel")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Stats");
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        close = ui.button("×").clicked();
                    });
                });
                ui.separator();

                let theme = &self.theme;
                let view = self.surface.view();
                ScrollArea::vertical().id_salt("stats_scroll").show(ui, |ui| {
                    theme.card_frame().show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.strong("Overview");
                        ui.horizontal(|ui| {
                            let summary = view.summary;
                            summary_card(ui, theme, "Total Messages", summary.total_messages, theme.accent_primary);
                            summary_card(ui, theme, "Active Users", summary.active_users, theme.success);
                        });
                    });

                    match self.surface.views().chart() {
                        Some(chart) => {
                            ui.add_space(theme.spacing_8);
                            chart.show(ui, theme);
                        }
                        None => {
                            ui.label(RichText::new("Chart unavailable").small().color(theme.text_muted));
                        }
                    }

                    if !view.stat_entries.is_empty() {
                        ui.add_space(theme.spacing_8);
                        ui.strong("User Activity");
                        for card in &view.stat_entries {
                            card.show(ui, theme);
                        }
                    }
                });
            });

        if close {
            self.send(ctx, Command::CloseStats);
        }
    }

    fn render_composer(&mut self, ctx: &egui::Context) {
        let mut pending = Vec::new();
        let mut send_now = false;
        let theme = self.theme.clone();

        egui::TopBottomPanel::bottom("composer").show(ctx, |ui| {
            ui.add_space(theme.spacing_8);
            egui::CollapsingHeader::new("Diagnostics")
                .default_open(false)
                .show(ui, |ui| {
                    ScrollArea::vertical()
                        .id_salt("diagnostics_log")
                        .max_height(90.0)
                        .stick_to_bottom(true)
                        .show(ui, |ui| {
                            for entry in &self.diagnostics_log {
                                ui.label(entry);
                            }
                        });
                });

            let stats_label = match self.surface.panel() {
                PanelState::Hidden => "Show Stats",
                PanelState::Visible => "Hide Stats",
            };
            theme.composer_frame().show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.add(
                        egui::TextEdit::singleline(&mut self.username_input)
                            .desired_width(140.0)
                            .hint_text("Your name"),
                    );
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut self.message_input)
                            .desired_width((ui.available_width() - 320.0).max(120.0))
                            .hint_text("Type your message..."),
                    );
                    if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        send_now = true;
                        response.request_focus();
                    }

                    send_now |= ui
                        .button(RichText::new("Send").color(theme.text_on_accent))
                        .clicked();
                    if ui.button(RichText::new("Clear").color(theme.danger)).clicked() {
                        pending.push(Command::ClearAll);
                    }
                    if ui.button(stats_label).clicked() {
                        pending.push(Command::ToggleStats);
                    }
                    if ui.button("Demo").clicked() {
                        pending.push(Command::SeedDemo);
                    }
                });
            });
            ui.add_space(theme.spacing_8);
        });

        if send_now {
            self.submit_message(ctx);
        }
        for command in pending {
            self.send(ctx, command);
        }
    }

    fn render_messages(&mut self, ctx: &egui::Context) {
        let scroll_to_latest = self.surface.views_mut().take_scroll_request();
        egui::CentralPanel::default().show(ctx, |ui| {
            let theme = &self.theme;
            let view = self.surface.view();
            ScrollArea::vertical()
                .id_salt("chat_transcript")
                .auto_shrink([false, false])
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    if view.messages.is_empty() {
                        ui.label(RichText::new("No messages yet").color(theme.text_muted));
                    }
                    for card in &view.messages {
                        card.show(ui, theme);
                    }
                    if scroll_to_latest {
                        ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
                    }
                });
        });
    }
}

fn summary_card(ui: &mut egui::Ui, theme: &Theme, title: &str, value: usize, accent: egui::Color32) {
    theme.panel_frame(theme.surface_3, 8).show(ui, |ui| {
        ui.vertical(|ui| {
            ui.label(RichText::new(title).small().color(theme.text_muted));
            ui.label(RichText::new(value.to_string()).heading().color(accent));
        });
    });
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_commands();
        self.render_top_bar(ctx);
        self.render_composer(ctx);
        self.render_stats_panel(ctx);
        self.render_messages(ctx);
    }
}
