// Triage Desk - Support inbox triage dashboard
// Copyright (C) 2026  Asa V. Schaeffer
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use mimalloc::MiMalloc;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod analytics;
mod api;
mod app;
mod bridge;
mod config;
mod error;
mod filter;
mod knowledge;
mod model;
mod selection;
mod state;
mod store;
mod ui;
mod workflow;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let (config, backend) = match config::Config::from_env()
        .and_then(|config| api::http::HttpBackend::new(&config).map(|b| (config, b)))
    {
        Ok(ready) => ready,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };
    tracing::info!("Using triage backend at {}", config.api_base);
    let backend: Arc<dyn api::Backend> = Arc::new(backend);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([700.0, 450.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Support Triage",
        options,
        Box::new(move |cc| Ok(Box::new(app::TriageApp::new(cc, &config, backend)))),
    )
}
