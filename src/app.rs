use crate::api::Backend;
use crate::bridge::{BackgroundEvent, UiCommand};
use crate::config::Config;
use crate::state::{AppState, Tab};
use crate::ui::{dashboard, detail, knowledge, notices, send_command, sidebar};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

pub struct TriageApp {
    state: AppState,
    cmd_tx: UnboundedSender<UiCommand>,
    event_rx: std::sync::mpsc::Receiver<BackgroundEvent>,
}

impl std::fmt::Debug for TriageApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriageApp")
            .field("tab", &self.state.tab)
            .field("emails", &self.state.store.len())
            .finish_non_exhaustive()
    }
}

impl TriageApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: &Config, backend: Arc<dyn Backend>) -> Self {
        let bridge = crate::bridge::setup_bridge(cc.egui_ctx.clone(), backend);
        let mut state = AppState::new(config);
        for cmd in state.startup_commands() {
            send_command(&bridge.cmd_tx, cmd);
        }
        Self {
            state,
            cmd_tx: bridge.cmd_tx,
            event_rx: bridge.event_rx,
        }
    }

    fn drain_events(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.event_rx.try_recv() {
            for cmd in self.state.apply(event) {
                send_command(&self.cmd_tx, cmd);
            }
            ctx.request_repaint();
        }
    }

    fn draw_top_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("📧 Support Triage");
            ui.separator();
            ui.selectable_value(&mut self.state.tab, Tab::Emails, "📬 Emails");
            ui.selectable_value(&mut self.state.tab, Tab::Analytics, "📊 Analytics");
            ui.selectable_value(&mut self.state.tab, Tab::KnowledgeBase, "📚 Knowledge Base");
            ui.separator();

            let label = if self.state.fetching {
                "Fetching..."
            } else {
                "📬 Fetch & Process"
            };
            if ui
                .add_enabled(!self.state.fetching, egui::Button::new(label))
                .clicked()
            {
                if let Some(cmd) = self.state.fetch_and_process() {
                    send_command(&self.cmd_tx, cmd);
                }
            }
            if self.state.fetching {
                ui.spinner();
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.weak(format!("API: {}", self.state.api_base));
            });
        });
        notices::draw_notices(ui, &mut self.state);
    }
}

impl eframe::App for TriageApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events(ctx);

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            self.draw_top_bar(ui);
        });

        match self.state.tab {
            Tab::Emails => {
                egui::SidePanel::left("email_list")
                    .resizable(true)
                    .default_width(340.0)
                    .show(ctx, |ui| {
                        sidebar::draw_sidebar(ui, &mut self.state, &self.cmd_tx);
                    });

                egui::CentralPanel::default().show(ctx, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        detail::draw_detail(ui, &mut self.state, &self.cmd_tx);
                    });
                });
            }
            Tab::Analytics => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        dashboard::draw_dashboard(ui, &mut self.state, &self.cmd_tx);
                    });
                });
            }
            Tab::KnowledgeBase => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        knowledge::draw_knowledge(ui, &mut self.state, &self.cmd_tx);
                    });
                });
            }
        }
    }
}
