use crate::analytics::SeriesPoint;
use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Vec2};

const HEIGHT: f32 = 220.0;
const LABEL_SPACE: f32 = 18.0;

/// Vertical bar chart, one bar per point in the given order.
pub fn draw_bars(ui: &mut egui::Ui, points: &[SeriesPoint], color: Color32) {
    let width = ui.available_width().max(120.0);
    let (response, painter) = ui.allocate_painter(Vec2::new(width, HEIGHT), Sense::hover());
    let rect = response.rect;

    let max = points.iter().map(|p| p.value).max().unwrap_or(0);
    if points.is_empty() || max == 0 {
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            "No data",
            FontId::proportional(14.0),
            Color32::GRAY,
        );
        return;
    }

    let plot = Rect::from_min_max(
        rect.min + Vec2::new(0.0, LABEL_SPACE),
        rect.max - Vec2::new(0.0, LABEL_SPACE),
    );
    let axis = ui.visuals().weak_text_color();
    painter.line_segment(
        [plot.left_bottom(), plot.right_bottom()],
        Stroke::new(1.0, axis),
    );

    let slot = plot.width() / points.len() as f32;
    let bar_width = (slot * 0.6).min(60.0);
    let hover = response.hover_pos();

    for (i, point) in points.iter().enumerate() {
        let x = plot.left() + slot * (i as f32 + 0.5);
        let bar_height = plot.height() * point.value as f32 / max as f32;
        let bar = Rect::from_min_max(
            Pos2::new(x - bar_width / 2.0, plot.bottom() - bar_height),
            Pos2::new(x + bar_width / 2.0, plot.bottom()),
        );
        let hovered = hover.is_some_and(|p| bar.contains(p));
        let fill = if hovered {
            color.gamma_multiply(0.7)
        } else {
            color
        };
        painter.rect_filled(bar, 2.0, fill);

        painter.text(
            Pos2::new(x, bar.top() - 2.0),
            Align2::CENTER_BOTTOM,
            point.value.to_string(),
            FontId::proportional(11.0),
            ui.visuals().text_color(),
        );
        painter.text(
            Pos2::new(x, plot.bottom() + 2.0),
            Align2::CENTER_TOP,
            &point.label,
            FontId::proportional(11.0),
            axis,
        );
    }
}
