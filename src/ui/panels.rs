use std::time::Instant;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel: one dropdown per column plus "Clear filters".
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.dataset.is_none() {
        ui.label(if state.loading {
            "Loading…"
        } else {
            "No dataset loaded."
        });
        return;
    }

    if ui.button("Clear filters").clicked() {
        state.clear_filters();
    }
    ui.add_space(4.0);

    // Collected while rendering, applied after state is no longer borrowed.
    let mut requested: Option<(String, String)> = None;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for col in &state.columns {
                let options = state
                    .filter_options
                    .get(&col.key)
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                let current = state.selected_value(&col.key);
                let placeholder = format!("Select {}…", col.label);
                let shown = if current.is_empty() {
                    placeholder.as_str()
                } else {
                    current
                };

                ui.strong(&col.label);
                egui::ComboBox::from_id_salt(&col.key)
                    .selected_text(shown)
                    .width(ui.available_width())
                    .show_ui(ui, |ui: &mut Ui| {
                        if ui
                            .selectable_label(current.is_empty(), &placeholder)
                            .clicked()
                        {
                            requested = Some((col.key.clone(), String::new()));
                        }
                        for value in options {
                            if ui
                                .selectable_label(current == value.as_str(), value)
                                .clicked()
                            {
                                requested = Some((col.key.clone(), value.clone()));
                            }
                        }
                    });
                ui.add_space(6.0);
            }
        });

    if let Some((field, value)) = requested {
        state.request_filter(&field, &value, Instant::now());
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(ui.ctx(), state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} rows loaded, {} visible",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(filter) = &state.active_filter {
            ui.separator();
            ui.label(RichText::new(format!("Filter: {filter}")).strong());
        }

        if state.loading {
            ui.separator();
            ui.spinner();
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(ctx: &egui::Context, state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open CSV dataset")
        .add_filter("CSV", &["csv"])
        .add_filter("All files", &["*"])
        .pick_file();

    if let Some(path) = file {
        let ctx = ctx.clone();
        state.begin_load(path, move || ctx.request_repaint());
    }
}
