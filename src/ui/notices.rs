use crate::state::{AppState, NoticeLevel};
use egui::{Color32, Ui};

pub fn draw_notices(ui: &mut Ui, state: &mut AppState) {
    let mut dismissed = None;
    for notice in state.notices() {
        let (color, prefix) = match notice.level {
            NoticeLevel::Success => (Color32::from_rgb(22, 163, 74), "✅"),
            NoticeLevel::Warning => (Color32::from_rgb(202, 138, 4), "⚠"),
            NoticeLevel::Error => (Color32::RED, "❌"),
        };
        ui.horizontal(|ui| {
            ui.colored_label(color, format!("{prefix} {}", notice.text));
            if ui.small_button("✖").clicked() {
                dismissed = Some(notice.id);
            }
        });
    }
    if let Some(id) = dismissed {
        state.dismiss(id);
    }
}
