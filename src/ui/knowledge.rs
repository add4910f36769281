use crate::bridge::UiCommand;
use crate::knowledge::{parse_tags, KnowledgeList, CATEGORIES};
use crate::model::{format_timestamp, KnowledgeItem};
use crate::state::AppState;
use crate::ui::{badge, send_command};
use egui::{Color32, RichText, Ui};
use tokio::sync::mpsc::UnboundedSender;

pub fn draw_knowledge(ui: &mut Ui, state: &mut AppState, cmd_tx: &UnboundedSender<UiCommand>) {
    ui.horizontal(|ui| {
        ui.heading("📚 Knowledge Base");
        if ui.button("🔄 Refresh").clicked() {
            let cmd = state.refresh_knowledge();
            send_command(cmd_tx, cmd);
        }
        let toggle = if state.knowledge_form.open {
            "Cancel"
        } else {
            "➕ Add New Item"
        };
        if ui.button(toggle).clicked() {
            state.knowledge_form.toggle();
        }
    });
    ui.add_space(8.0);

    if state.knowledge_form.open {
        draw_form(ui, state, cmd_tx);
        ui.add_space(8.0);
        ui.separator();
        ui.add_space(4.0);
    }

    match &state.knowledge {
        KnowledgeList::Loading => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading knowledge base...");
            });
        }
        KnowledgeList::Failed => {
            ui.label("Failed to load knowledge base items. Try refreshing.");
        }
        KnowledgeList::Loaded(items) if items.is_empty() => {
            ui.label("No knowledge base items found. Create your first item above!");
        }
        KnowledgeList::Loaded(items) => {
            ui.strong(format!("Knowledge Base Items ({})", items.len()));
            ui.add_space(4.0);
            for item in items {
                draw_item(ui, item);
                ui.add_space(6.0);
            }
        }
    }
}

fn draw_form(ui: &mut Ui, state: &mut AppState, cmd_tx: &UnboundedSender<UiCommand>) {
    let form = &mut state.knowledge_form;
    let enabled = !form.submitting;
    ui.strong("Add New Knowledge Base Item");
    egui::Grid::new("kb_form")
        .num_columns(2)
        .spacing([12.0, 6.0])
        .show(ui, |ui| {
            ui.label("Title");
            ui.add_enabled(
                enabled,
                egui::TextEdit::singleline(&mut form.title)
                    .hint_text("e.g., How to reset password"),
            );
            ui.end_row();

            ui.label("Category");
            ui.add_enabled_ui(enabled, |ui| {
                egui::ComboBox::from_id_salt("kb_category")
                    .selected_text(form.category.as_str())
                    .show_ui(ui, |ui| {
                        for category in CATEGORIES {
                            ui.selectable_value(&mut form.category, category.to_string(), category);
                        }
                    });
            });
            ui.end_row();

            ui.label("Content");
            ui.add_enabled(
                enabled,
                egui::TextEdit::multiline(&mut form.content)
                    .desired_rows(4)
                    .hint_text("Detailed content for this KB article..."),
            );
            ui.end_row();

            ui.label("Tags");
            ui.add_enabled(
                enabled,
                egui::TextEdit::singleline(&mut form.tags).hint_text("tag1, tag2, tag3"),
            );
            ui.end_row();
        });

    let preview = parse_tags(&state.knowledge_form.tags);
    if !preview.is_empty() {
        ui.label(RichText::new(format!("Tags: {}", preview.join(", "))).small().weak());
    }

    ui.add_space(4.0);
    let label = if state.knowledge_form.submitting {
        "Creating..."
    } else {
        "✅ Add Item"
    };
    if ui
        .add_enabled(!state.knowledge_form.submitting, egui::Button::new(label))
        .clicked()
    {
        if let Some(cmd) = state.submit_knowledge() {
            send_command(cmd_tx, cmd);
        }
    }
}

fn draw_item(ui: &mut Ui, item: &KnowledgeItem) {
    egui::Frame::default()
        .inner_margin(8.0)
        .corner_radius(4.0)
        .fill(ui.visuals().faint_bg_color)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.heading(&item.title);
            ui.horizontal(|ui| {
                badge(
                    ui,
                    item.category.as_str(),
                    Color32::from_rgb(30, 64, 175),
                    Color32::from_rgb(219, 234, 254),
                );
                if let Some(created) = &item.created_at {
                    ui.label(
                        RichText::new(format!("Created {}", format_timestamp(created)))
                            .small()
                            .weak(),
                    );
                }
                if let Some(updated) = &item.updated_at {
                    ui.label(
                        RichText::new(format!("Updated {}", format_timestamp(updated)))
                            .small()
                            .weak(),
                    );
                }
            });
            if !item.tags.is_empty() {
                ui.horizontal_wrapped(|ui| {
                    for tag in &item.tags {
                        badge(
                            ui,
                            format!("#{tag}"),
                            Color32::from_rgb(31, 41, 55),
                            Color32::from_rgb(243, 244, 246),
                        );
                    }
                });
            }
            ui.add_space(4.0);
            ui.label(&item.content);
        });
}
