use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::cohort::Cohort;
use crate::data::domain::{STIMULI, VARIABLES, ZONES};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – selectors
// ---------------------------------------------------------------------------

/// Render the zone / variable / stimulus selectors.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Selection");
    ui.separator();

    if state.session.is_none() {
        ui.label("No file loaded.");
        return;
    }

    let mut selection = state.selection.clone();

    selector(ui, "Zone", "zone_select", &mut selection.zone, &ZONES);
    selector(ui, "Variable", "variable_select", &mut selection.variable, &VARIABLES);
    selector(ui, "Visage", "visage_select", &mut selection.stimulus, &STIMULI);

    ui.separator();
    if let Some(chart) = &state.chart {
        ui.label(RichText::new(&chart.column).monospace());
        if !chart.resolved {
            ui.label(RichText::new("column not found in sheet").italics());
        }
        for cohort in Cohort::ALL {
            let n = chart.series(cohort).map_or(0, |s| s.values.len());
            ui.label(format!("{cohort}: {n} valid values"));
        }
    }

    // Recomputes only when a combo box actually changed the selection.
    state.set_selection(selection);
}

fn selector(ui: &mut Ui, label: &str, id: &str, current: &mut String, options: &[&str]) {
    ui.strong(label);
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.as_str())
        .show_ui(ui, |ui: &mut Ui| {
            for option in options {
                ui.selectable_value(&mut *current, option.to_string(), *option);
            }
        });
    ui.add_space(6.0);
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state.chart.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export chart data…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(session) = &state.session {
            ui.label(format!(
                "{} rows loaded, {} {} / {} {}",
                session.table.len(),
                session.cohort_size(Cohort::Tsa),
                Cohort::Tsa,
                session.cohort_size(Cohort::Dt),
                Cohort::Dt,
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open measurement sheet")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let default_name = state
        .chart
        .as_ref()
        .map(|c| format!("{}.json", c.column))
        .unwrap_or_else(|| "chart.json".to_string());

    let file = rfd::FileDialog::new()
        .set_title("Export chart data")
        .set_file_name(default_name)
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.export(&path) {
            log::error!("Failed to export: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
