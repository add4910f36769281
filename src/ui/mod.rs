pub mod bars;
pub mod dashboard;
pub mod detail;
pub mod donut;
pub mod knowledge;
pub mod notices;
pub mod sidebar;

use egui::{Color32, RichText, Ui};
use tokio::sync::mpsc::UnboundedSender;

use crate::bridge::UiCommand;
use crate::model::{Email, UrgencyLevel};

pub fn send_command(cmd_tx: &UnboundedSender<UiCommand>, cmd: UiCommand) {
    if let Err(e) = cmd_tx.send(cmd) {
        tracing::error!("Background worker is gone, dropped command: {:?}", e.0);
    }
}

pub fn badge(ui: &mut Ui, text: impl Into<String>, fg: Color32, bg: Color32) {
    egui::Frame::default()
        .inner_margin(egui::Margin::symmetric(6, 2))
        .corner_radius(4.0)
        .fill(bg)
        .show(ui, |ui| {
            ui.label(RichText::new(text).small().color(fg));
        });
}

/// Sentiment, urgency and category badges shared by the list and detail views.
pub fn classification_badges(ui: &mut Ui, email: &Email) {
    ui.horizontal(|ui| {
        let (fg, bg) = match email.sentiment_label() {
            "positive" => (Color32::from_rgb(22, 101, 52), Color32::from_rgb(220, 252, 231)),
            "negative" => (Color32::from_rgb(153, 27, 27), Color32::from_rgb(254, 226, 226)),
            _ => (Color32::from_rgb(31, 41, 55), Color32::from_rgb(243, 244, 246)),
        };
        badge(ui, email.sentiment_label(), fg, bg);

        let (fg, bg) = match email.urgency_level() {
            UrgencyLevel::High => (Color32::from_rgb(153, 27, 27), Color32::from_rgb(254, 226, 226)),
            UrgencyLevel::Medium => (Color32::from_rgb(133, 77, 14), Color32::from_rgb(254, 249, 195)),
            UrgencyLevel::Low => (Color32::from_rgb(22, 101, 52), Color32::from_rgb(220, 252, 231)),
        };
        badge(ui, format!("Urgency: {}", email.urgency_score()), fg, bg);

        if let Some(category) = &email.category {
            badge(
                ui,
                category.as_str(),
                Color32::from_rgb(30, 64, 175),
                Color32::from_rgb(219, 234, 254),
            );
        }
    });
}

/// A labelled number in a tinted box, as used in the metric rows.
pub fn metric(ui: &mut Ui, label: &str, value: impl ToString) {
    egui::Frame::default()
        .inner_margin(8.0)
        .corner_radius(4.0)
        .fill(ui.visuals().faint_bg_color)
        .show(ui, |ui| {
            ui.vertical(|ui| {
                ui.label(label);
                ui.heading(value.to_string());
            });
        });
}
