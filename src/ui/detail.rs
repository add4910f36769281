use crate::bridge::UiCommand;
use crate::state::AppState;
use crate::ui::{classification_badges, send_command};
use crate::workflow::ReplyAction;
use egui::{Color32, RichText, Ui};
use tokio::sync::mpsc::UnboundedSender;

pub fn draw_detail(ui: &mut Ui, state: &mut AppState, cmd_tx: &UnboundedSender<UiCommand>) {
    // Looked up by id every frame so a refresh shows the latest record.
    let Some(email) = state.selected_email().cloned() else {
        ui.centered_and_justified(|ui| {
            ui.label("Select an email from the list to view details, edit the AI response, or send it.");
        });
        return;
    };
    let busy = state.reply_in_flight();

    ui.heading(&email.subject);
    ui.label(format!("From: {} • {}", email.sender, email.display_date()));
    if let Some(recipient) = &email.recipient {
        ui.label(format!("To: {recipient}"));
    }
    ui.add_space(4.0);
    ui.horizontal(|ui| {
        classification_badges(ui, &email);
        if let Some(score) = email.sentiment_score {
            ui.label(RichText::new(format!("score {score:.2}")).small().weak());
        }
        if email.is_response_sent {
            ui.colored_label(Color32::from_rgb(22, 163, 74), "✅ Response sent");
        }
    });

    ui.add_space(8.0);
    ui.separator();
    ui.add_space(4.0);

    ui.strong("Original Message");
    egui::Frame::default()
        .inner_margin(8.0)
        .corner_radius(4.0)
        .fill(ui.visuals().faint_bg_color)
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.add(egui::Label::new(&email.body).wrap().selectable(true));
        });

    let fields = email.extracted_fields();
    if !fields.is_empty() {
        ui.add_space(8.0);
        ui.strong("Extracted Information");
        egui::Grid::new("extracted_info")
            .num_columns(2)
            .spacing([16.0, 4.0])
            .show(ui, |ui| {
                for (key, values) in &fields {
                    ui.label(RichText::new(key).strong());
                    ui.label(values.join(", "));
                    ui.end_row();
                }
            });
    }

    ui.add_space(8.0);
    ui.separator();
    ui.add_space(4.0);

    ui.strong("AI Generated Response");
    if email.generated_response().is_none() {
        ui.label(
            RichText::new("No AI response generated yet. Processing may still be in progress.")
                .weak(),
        );
    }

    let mut text = state.draft_text().unwrap_or_default().to_string();
    let response = ui.add_enabled(
        !busy,
        egui::TextEdit::multiline(&mut text)
            .desired_rows(8)
            .desired_width(f32::INFINITY)
            .hint_text("AI response will appear here..."),
    );
    if response.changed() {
        state.edit_draft(text);
    }

    ui.add_space(4.0);
    ui.horizontal(|ui| {
        let send_label = if busy { "Sending..." } else { "📤 Send Response" };
        if ui.add_enabled(!busy, egui::Button::new(send_label)).clicked() {
            if let Some(cmd) = state.request_reply(ReplyAction::Send) {
                send_command(cmd_tx, cmd);
            }
        }
        if ui
            .add_enabled(!busy, egui::Button::new("💾 Save Response"))
            .clicked()
        {
            if let Some(cmd) = state.request_reply(ReplyAction::Save) {
                send_command(cmd_tx, cmd);
            }
        }
        if busy {
            ui.spinner();
        } else if state.replies.has_draft(email.id) {
            ui.label(RichText::new("edited").small().weak());
        }
    });
}
