use std::time::Instant;

use eframe::egui;

use crate::config::AppConfig;
use crate::state::AppState;
use crate::ui::{panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SiftTableApp {
    pub state: AppState,
}

impl SiftTableApp {
    /// Create the app and kick off the startup load.
    pub fn new(cc: &eframe::CreationContext<'_>, config: &AppConfig) -> Self {
        let mut state = AppState::new(config);
        let ctx = cc.egui_ctx.clone();
        state.begin_load(config.data_path.clone(), move || ctx.request_repaint());
        Self { state }
    }
}

impl eframe::App for SiftTableApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Background work: finished load, due filter ----
        self.state.poll_load();

        self.state.tick(Instant::now());

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            table::data_table(ui, &mut self.state);
        });

        // ---- Wake up when a filter queued this frame becomes due ----
        if let Some(deadline) = self.state.next_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(Instant::now()));
        }
    }
}
