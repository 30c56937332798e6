use std::fmt;

use serde::Serialize;

use super::model::{Row, Table};

// ---------------------------------------------------------------------------
// Cohort label
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Cohort {
    #[serde(rename = "DT")]
    Dt,
    #[serde(rename = "TSA")]
    Tsa,
}

impl Cohort {
    /// Display order used by both charts.
    pub const ALL: [Cohort; 2] = [Cohort::Dt, Cohort::Tsa];

    pub fn label(self) -> &'static str {
        match self {
            Cohort::Dt => "DT",
            Cohort::Tsa => "TSA",
        }
    }

    /// Exact match on the case-column text; anything else belongs to no cohort.
    pub fn from_label(s: &str) -> Option<Cohort> {
        match s {
            "DT" => Some(Cohort::Dt),
            "TSA" => Some(Cohort::Tsa),
            _ => None,
        }
    }
}

impl fmt::Display for Cohort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Partition
// ---------------------------------------------------------------------------

/// The two cohort sub-tables, each in source row order.
#[derive(Debug, Clone, Default)]
pub struct CohortTables {
    pub tsa: Vec<Row>,
    pub dt: Vec<Row>,
}

impl CohortTables {
    pub fn get(&self, cohort: Cohort) -> &[Row] {
        match cohort {
            Cohort::Tsa => &self.tsa,
            Cohort::Dt => &self.dt,
        }
    }

    /// Split `table` on the case column. Rows whose label is neither cohort
    /// are dropped; with no case column both sides are empty.
    pub fn partition(table: &Table, case_column: Option<usize>) -> Self {
        let mut out = CohortTables::default();
        let Some(col) = case_column else {
            return out;
        };

        for row in &table.rows {
            let cohort = Table::cell(row, col).as_str().and_then(Cohort::from_label);
            match cohort {
                Some(Cohort::Tsa) => out.tsa.push(row.clone()),
                Some(Cohort::Dt) => out.dt.push(row.clone()),
                None => {}
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Cell;

    fn row(case: Cell, id: f64) -> Row {
        vec![case, Cell::Number(id)]
    }

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    fn sample_table() -> Table {
        Table::new(vec![
            vec![text("Etude")],
            vec![text("Case"), text("Id")],
            row(text("TSA"), 1.0),
            row(text("DT"), 2.0),
            row(text("tsa"), 3.0),
            row(Cell::Empty, 4.0),
            row(text("TSA"), 5.0),
            row(text("Autre"), 6.0),
            vec![],
            row(text("DT"), 7.0),
        ])
    }

    fn ids(rows: &[Row]) -> Vec<f64> {
        rows.iter().filter_map(|r| r[1].as_f64()).collect()
    }

    #[test]
    fn test_partition_preserves_order() {
        let parts = CohortTables::partition(&sample_table(), Some(0));
        assert_eq!(ids(&parts.tsa), vec![1.0, 5.0]);
        assert_eq!(ids(&parts.dt), vec![2.0, 7.0]);
    }

    #[test]
    fn test_partition_drops_unknown_labels() {
        let table = sample_table();
        let parts = CohortTables::partition(&table, Some(0));
        let kept = parts.tsa.len() + parts.dt.len();
        let dropped = table
            .rows
            .iter()
            .filter(|r| {
                Table::cell(r, 0)
                    .as_str()
                    .and_then(Cohort::from_label)
                    .is_none()
            })
            .count();
        assert_eq!(kept + dropped, table.len());
    }

    #[test]
    fn test_partition_without_case_column() {
        let parts = CohortTables::partition(&sample_table(), None);
        assert!(parts.tsa.is_empty());
        assert!(parts.dt.is_empty());
    }

    #[test]
    fn test_cohort_labels() {
        assert_eq!(Cohort::from_label("TSA"), Some(Cohort::Tsa));
        assert_eq!(Cohort::from_label("DT"), Some(Cohort::Dt));
        assert_eq!(Cohort::from_label("Dt"), None);
        assert_eq!(Cohort::Tsa.to_string(), "TSA");
    }
}
