use crate::analytics::SeriesPoint;
use egui::{Color32, Pos2, Sense, Shape, Stroke, Vec2};
use std::f32::consts::TAU;

pub const PALETTE: &[Color32] = &[
    Color32::from_rgb(0, 136, 254),
    Color32::from_rgb(0, 196, 159),
    Color32::from_rgb(255, 187, 40),
    Color32::from_rgb(255, 128, 66),
    Color32::from_rgb(136, 132, 216),
];

pub fn draw_donut(ui: &mut egui::Ui, points: &[SeriesPoint]) {
    let available = ui.available_size();
    let size = available.x.clamp(120.0, 300.0);
    let (response, painter) = ui.allocate_painter(Vec2::splat(size), Sense::hover());
    let rect = response.rect;
    let center = rect.center();
    let outer_r = size * 0.45;
    let inner_r = size * 0.25;

    let total: u64 = points.iter().map(|p| p.value).sum();
    if total == 0 {
        painter.text(
            center,
            egui::Align2::CENTER_CENTER,
            "No data",
            egui::FontId::proportional(14.0),
            Color32::GRAY,
        );
        return;
    }

    let mouse_pos = response.hover_pos();
    let mut start_angle: f32 = -TAU / 4.0;
    let mut hovered: Option<&SeriesPoint> = None;

    for (i, point) in points.iter().enumerate() {
        if point.value == 0 {
            continue;
        }
        let sweep = point.value as f32 / total as f32 * TAU;
        let color = PALETTE[i % PALETTE.len()];

        let segments = (sweep / 0.05).max(2.0) as usize;
        let ring: Vec<(Pos2, Pos2)> = (0..=segments)
            .map(|j| {
                let angle = start_angle + sweep * (j as f32 / segments as f32);
                let dir = Vec2::angled(angle);
                (center + dir * outer_r, center + dir * inner_r)
            })
            .collect();

        let is_hovered = mouse_pos.is_some_and(|mp| {
            let offset = mp - center;
            let dist = offset.length();
            if dist < inner_r || dist > outer_r {
                return false;
            }
            let mut angle = offset.y.atan2(offset.x);
            if angle < start_angle {
                angle += TAU;
            }
            angle >= start_angle && angle <= start_angle + sweep
        });
        if is_hovered {
            hovered = Some(point);
        }

        let fill = if is_hovered {
            Color32::from_rgb(
                color.r().saturating_add(40),
                color.g().saturating_add(40),
                color.b().saturating_add(40),
            )
        } else {
            color
        };

        // Each step of the ring is a small convex quad.
        for pair in ring.windows(2) {
            let [(outer_a, inner_a), (outer_b, inner_b)] = [pair[0], pair[1]];
            painter.add(Shape::convex_polygon(
                vec![outer_a, outer_b, inner_b, inner_a],
                fill,
                Stroke::NONE,
            ));
        }

        start_angle += sweep;
    }

    if let Some(point) = hovered {
        painter.text(
            center + Vec2::new(0.0, -8.0),
            egui::Align2::CENTER_CENTER,
            &point.label,
            egui::FontId::proportional(11.0),
            ui.visuals().strong_text_color(),
        );
        painter.text(
            center + Vec2::new(0.0, 8.0),
            egui::Align2::CENTER_CENTER,
            point.value.to_string(),
            egui::FontId::proportional(11.0),
            ui.visuals().weak_text_color(),
        );
    }

    draw_legend(ui, points);
}

fn draw_legend(ui: &mut egui::Ui, points: &[SeriesPoint]) {
    ui.horizontal_wrapped(|ui| {
        for (i, point) in points.iter().enumerate() {
            let (rect, _) = ui.allocate_exact_size(Vec2::splat(10.0), Sense::hover());
            ui.painter()
                .rect_filled(rect, 2.0, PALETTE[i % PALETTE.len()]);
            ui.label(format!("{} ({})", point.label, point.value));
        }
    });
}
