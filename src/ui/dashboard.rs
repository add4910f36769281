use crate::analytics::{AnalyticsView, ChartSeries, SeriesPoint};
use crate::bridge::UiCommand;
use crate::model::AnalyticsSummary;
use crate::state::AppState;
use crate::ui::{bars, donut, metric, send_command};
use egui::{Color32, Ui};
use tokio::sync::mpsc::UnboundedSender;

pub fn draw_dashboard(ui: &mut Ui, state: &mut AppState, cmd_tx: &UnboundedSender<UiCommand>) {
    ui.horizontal(|ui| {
        ui.heading("Analytics");
        let loading = state.analytics == AnalyticsView::Loading;
        if ui
            .add_enabled(!loading, egui::Button::new("🔄 Refresh Analytics"))
            .clicked()
        {
            let cmd = state.refresh_analytics();
            send_command(cmd_tx, cmd);
        }
    });
    ui.add_space(8.0);

    match &state.analytics {
        AnalyticsView::Loading => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading analytics...");
            });
        }
        AnalyticsView::NoData => {
            ui.label("No analytics data available. Try fetching emails first.");
        }
        AnalyticsView::Ready { summary, series } => draw_ready(ui, summary, series),
    }
}

fn draw_ready(ui: &mut Ui, summary: &AnalyticsSummary, series: &ChartSeries) {
    // Metrics row
    ui.horizontal(|ui| {
        metric(ui, "Total Emails", summary.total_emails);
        metric(ui, "Processed", summary.processed_emails);
        metric(ui, "Pending", summary.pending_emails);
        metric(ui, "Last 24h", summary.emails_last_24h);
    });

    ui.add_space(8.0);
    ui.separator();
    ui.add_space(4.0);

    ui.columns(2, |columns| {
        columns[0].heading("Sentiment Distribution");
        columns[0].add_space(4.0);
        donut::draw_donut(&mut columns[0], &series.sentiment);

        columns[1].heading("Urgency Distribution");
        columns[1].add_space(4.0);
        bars::draw_bars(&mut columns[1], &series.urgency, Color32::from_rgb(136, 132, 216));
    });

    ui.add_space(8.0);
    ui.separator();
    ui.add_space(4.0);

    ui.heading("Category Distribution");
    ui.add_space(4.0);
    bars::draw_bars(ui, &series.category, Color32::from_rgb(0, 196, 159));

    ui.add_space(8.0);
    ui.separator();
    ui.add_space(4.0);

    draw_raw_table(ui, series);
}

fn draw_raw_table(ui: &mut Ui, series: &ChartSeries) {
    let rows: Vec<(&str, &SeriesPoint)> = [
        ("Sentiment", &series.sentiment),
        ("Urgency", &series.urgency),
        ("Category", &series.category),
    ]
    .into_iter()
    .flat_map(|(name, points)| points.iter().map(move |p| (name, p)))
    .collect();

    ui.collapsing("Raw Data", |ui| {
        egui_extras::TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .column(egui_extras::Column::initial(100.0))
            .column(egui_extras::Column::remainder().at_least(150.0))
            .column(egui_extras::Column::initial(80.0))
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong("Distribution");
                });
                header.col(|ui| {
                    ui.strong("Label");
                });
                header.col(|ui| {
                    ui.strong("Count");
                });
            })
            .body(|body| {
                body.rows(18.0, rows.len(), |mut row| {
                    let idx = row.index();
                    if let Some((name, point)) = rows.get(idx) {
                        row.col(|ui| {
                            ui.label(*name);
                        });
                        row.col(|ui| {
                            ui.label(&point.label);
                        });
                        row.col(|ui| {
                            ui.label(point.value.to_string());
                        });
                    }
                });
            });
    });
}
