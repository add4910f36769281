use crate::bridge::UiCommand;
use crate::config::LOAD_LIMIT_RANGE;
use crate::filter::FilterMode;
use crate::model::EmailId;
use crate::state::{AppState, EmptyList};
use crate::store::LoadState;
use crate::ui::{classification_badges, send_command};
use egui::{Color32, RichText, Ui};
use tokio::sync::mpsc::UnboundedSender;

pub fn draw_sidebar(ui: &mut Ui, state: &mut AppState, cmd_tx: &UnboundedSender<UiCommand>) {
    ui.heading("📬 Emails");
    ui.add_space(4.0);

    ui.add(
        egui::TextEdit::singleline(&mut state.query)
            .hint_text("Search emails...")
            .desired_width(f32::INFINITY),
    );

    ui.add_space(4.0);
    egui::ComboBox::from_id_salt("filter_mode")
        .selected_text(state.filter_mode.label())
        .width(ui.available_width())
        .show_ui(ui, |ui| {
            for mode in FilterMode::ALL {
                ui.selectable_value(&mut state.filter_mode, mode, mode.label());
            }
        });
    if !state.query.trim().is_empty() && state.filter_mode != FilterMode::All {
        ui.label(
            RichText::new("Search applies to all emails, ignoring the filter.")
                .small()
                .weak(),
        );
    }

    ui.add_space(4.0);
    ui.horizontal(|ui| {
        ui.label("Load limit");
        ui.add(egui::Slider::new(&mut state.load_limit, LOAD_LIMIT_RANGE).step_by(10.0));
    });
    if ui.button("🔄 Reload List").clicked() {
        let cmd = state.refresh_emails();
        send_command(cmd_tx, cmd);
    }

    ui.add_space(8.0);
    ui.separator();
    ui.add_space(4.0);

    let mut clicked: Option<EmailId> = None;
    {
        let visible = state.visible_emails();
        ui.label(format!("{} of {} emails", visible.len(), state.store.len()));
        ui.add_space(4.0);

        if visible.is_empty() {
            let text = match state.empty_list_reason() {
                EmptyList::Loading => "Loading emails...".to_string(),
                EmptyList::LoadFailed => match state.store.load_state() {
                    LoadState::Failed(reason) => {
                        format!("Failed to load emails: {reason}. Try reloading.")
                    }
                    _ => "Failed to load emails. Try reloading.".to_string(),
                },
                EmptyList::NothingLoaded => {
                    "No emails found. Click 'Fetch & Process' to pull new emails.".to_string()
                }
                EmptyList::NoMatches => "No emails match the current filter.".to_string(),
            };
            ui.centered_and_justified(|ui| {
                ui.label(text);
            });
        }

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for email in visible {
                    let selected = state.selection.is_selected(email.id);
                    let fill = if selected {
                        ui.visuals().selection.bg_fill.gamma_multiply(0.4)
                    } else if email.is_processed {
                        Color32::TRANSPARENT
                    } else {
                        Color32::from_rgba_unmultiplied(254, 240, 138, 40)
                    };
                    let response = egui::Frame::default()
                        .inner_margin(6.0)
                        .corner_radius(4.0)
                        .fill(fill)
                        .show(ui, |ui| {
                            ui.set_width(ui.available_width());
                            ui.horizontal(|ui| {
                                let pending = if email.is_processed { "" } else { "⏳ " };
                                ui.strong(format!("{pending}{}", email.subject));
                            });
                            ui.label(RichText::new(&email.sender).weak());
                            ui.label(RichText::new(email.display_date()).small().weak());
                            classification_badges(ui, email);
                        })
                        .response
                        .interact(egui::Sense::click());
                    if response.clicked() && !selected {
                        clicked = Some(email.id);
                    }
                    ui.add_space(2.0);
                }
            });
    }

    if let Some(id) = clicked {
        tracing::debug!("Selected email {}", id);
        state.select(id);
    }
}
