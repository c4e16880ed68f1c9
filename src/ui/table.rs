use eframe::egui::{self, Button, TextStyle, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Data table (central panel)
// ---------------------------------------------------------------------------

/// Render the current page of visible rows under a sticky header.
pub fn data_table(ui: &mut Ui, state: &mut AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            if state.loading {
                ui.heading("Loading dataset…");
            } else {
                ui.heading("Open a CSV file to view it  (File → Open…)");
            }
        });
        return;
    }

    pagination_bar(ui, state);
    ui.separator();

    let rows = state.page_rows();
    let row_height = TextStyle::Body
        .resolve(ui.style())
        .size
        .max(ui.spacing().interact_size.y);

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .auto_shrink([false, false])
        .columns(Column::remainder().at_least(60.0), state.columns.len())
        .header(row_height + 4.0, |mut header| {
            for col in &state.columns {
                header.col(|ui: &mut Ui| {
                    ui.strong(&col.label);
                });
            }
        })
        .body(|body| {
            body.rows(row_height, rows.len(), |mut table_row| {
                let row = rows[table_row.index()];
                for col in &state.columns {
                    table_row.col(|ui: &mut Ui| {
                        ui.label(row.get(&col.key).unwrap_or_default());
                    });
                }
            });
        });
}

// ---------------------------------------------------------------------------
// Pagination controls
// ---------------------------------------------------------------------------

fn pagination_bar(ui: &mut Ui, state: &mut AppState) {
    let total = state.visible_indices.len();
    let range = state.page_range();
    let page_count = state.page_count();
    let at_start = state.page == 0;
    let at_end = state.page + 1 >= page_count;

    ui.horizontal(|ui: &mut Ui| {
        if ui.add_enabled(!at_start, Button::new("⏮")).clicked() {
            state.first_page();
        }
        if ui.add_enabled(!at_start, Button::new("◀")).clicked() {
            state.prev_page();
        }
        ui.label(format!("Page {} of {page_count}", state.page + 1));
        if ui.add_enabled(!at_end, Button::new("▶")).clicked() {
            state.next_page();
        }
        if ui.add_enabled(!at_end, Button::new("⏭")).clicked() {
            state.last_page();
        }

        ui.separator();

        let dataset_empty = state.dataset.as_ref().is_some_and(|ds| ds.is_empty());
        if dataset_empty {
            ui.label(egui::RichText::new("Dataset has no rows").italics());
        } else if total == 0 {
            ui.label(egui::RichText::new("No matching rows").italics());
        } else {
            ui.label(format!(
                "Rows {}–{} of {total}  ({} per page)",
                range.start + 1,
                range.end,
                state.page_size
            ));
        }
    });
}
