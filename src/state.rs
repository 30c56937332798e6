use std::path::Path;

use anyhow::{Context, Result};

use crate::data::loader::load_file;
use crate::data::model::Table;
use crate::data::pipeline::{compute, ChartData, Session};
use crate::data::variable::Selection;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded sheet and everything derived from it (None until a file is loaded).
    pub session: Option<Session>,

    /// Current zone / variable / stimulus choice.
    pub selection: Selection,

    /// Output of the last recompute.
    pub chart: Option<ChartData>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Replace the session with one built from `table` and recompute.
    pub fn set_table(&mut self, table: Table) {
        self.session = Some(Session::from_table(table));
        self.status_message = None;
        self.recompute();
    }

    /// Rebuild chart data from the current session and selection.
    pub fn recompute(&mut self) {
        self.chart = self
            .session
            .as_ref()
            .map(|session| compute(session, &self.selection));
    }

    /// Apply a new selection; recomputes only when something changed.
    pub fn set_selection(&mut self, selection: Selection) {
        if selection != self.selection {
            self.selection = selection;
            self.recompute();
        }
    }

    /// Load a file into a fresh session, or keep the current one and report.
    pub fn open(&mut self, path: &Path) {
        match load_file(path) {
            Ok(table) => {
                log::info!("Loaded {} rows from {}", table.len(), path.display());
                self.set_table(table);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Write the current chart data as pretty JSON.
    pub fn export(&self, path: &Path) -> Result<()> {
        let chart = self.chart.as_ref().context("no chart data to export")?;
        let json = serde_json::to_string_pretty(chart).context("serializing chart data")?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        log::info!("Exported {} to {}", chart.column, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::cohort::Cohort;
    use crate::data::model::Cell;
    use tempfile::TempDir;

    fn table() -> Table {
        let t = |s: &str| Cell::Text(s.to_string());
        Table::new(vec![
            vec![],
            vec![t("Case"), t("Age (ans)"), t("TTT_Visage1"), t("TF_Yeux_Visage1")],
            vec![t("TSA"), Cell::Number(3.2), Cell::Number(14.0), Cell::Number(2.0)],
            vec![t("DT"), Cell::Number(3.9), Cell::Number(9.0), Cell::Number(1000.0)],
        ])
    }

    #[test]
    fn test_set_table_computes_default_selection() {
        let mut state = AppState::default();
        assert!(state.chart.is_none());
        state.set_table(table());
        let chart = state.chart.as_ref().unwrap();
        assert_eq!(chart.column, "TTT_Visage1");
        assert_eq!(chart.series(Cohort::Tsa).unwrap().values, vec![14.0]);
    }

    #[test]
    fn test_selection_change_recomputes() {
        let mut state = AppState::default();
        state.set_table(table());
        state.set_selection(Selection::new("TF", "Yeux", "Visage1"));
        let chart = state.chart.as_ref().unwrap();
        assert_eq!(chart.column, "TF_Yeux_Visage1");
        assert!(chart.series(Cohort::Dt).unwrap().values.is_empty());
    }

    #[test]
    fn test_selection_without_session() {
        let mut state = AppState::default();
        state.set_selection(Selection::new("TF", "Yeux", "Visage1"));
        assert!(state.chart.is_none());
    }

    #[test]
    fn test_open_failure_keeps_session() {
        let mut state = AppState::default();
        state.set_table(table());
        state.open(Path::new("missing.xlsx"));
        assert!(state.session.is_some());
        assert!(state.status_message.as_deref().unwrap().starts_with("Error"));
    }

    #[test]
    fn test_export_writes_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chart.json");
        let mut state = AppState::default();
        assert!(state.export(&path).is_err());

        state.set_table(table());
        state.export(&path).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["column"], "TTT_Visage1");
        assert_eq!(json["series"][0]["cohort"], "DT");
        assert_eq!(json["series"][1]["trend"][0]["age"], 3.0);
    }
}
