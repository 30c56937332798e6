use serde::Serialize;

use super::aggregate::{aggregate_by_age, BoxSummary};
use super::cohort::{Cohort, CohortTables};
use super::domain::{AGE_COLUMN, CASE_COLUMN};
use super::filter::{extract_pairs, extract_values};
use super::model::{AggregatedPoint, Table};
use super::variable::{Selection, VariableList};

// ---------------------------------------------------------------------------
// Session – everything derived once per file load
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub table: Table,
    pub variables: VariableList,
    pub cohorts: CohortTables,
    pub age_column: Option<usize>,
}

impl Session {
    pub fn from_table(table: Table) -> Self {
        let variables = VariableList::from_header(table.header());

        let case_column = variables.position(CASE_COLUMN);
        let age_column = variables.position(AGE_COLUMN);
        if case_column.is_none() {
            log::warn!("header has no {CASE_COLUMN:?} column; cohorts will be empty");
        }
        if age_column.is_none() {
            log::warn!("header has no {AGE_COLUMN:?} column; trend series will be empty");
        }

        let cohorts = CohortTables::partition(&table, case_column);
        log::info!(
            "session ready: {} rows, {} named columns, TSA={} DT={}",
            table.len(),
            variables.len(),
            cohorts.tsa.len(),
            cohorts.dt.len()
        );

        Session {
            table,
            variables,
            cohorts,
            age_column,
        }
    }

    pub fn cohort_size(&self, cohort: Cohort) -> usize {
        self.cohorts.get(cohort).len()
    }
}

// ---------------------------------------------------------------------------
// ChartData – one recompute's output
// ---------------------------------------------------------------------------

/// Both chart inputs for a single cohort.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortSeries {
    pub cohort: Cohort,
    /// Valid values for the distribution chart.
    pub values: Vec<f64>,
    pub summary: Option<BoxSummary>,
    /// Mean value per half-year age bucket for the trend chart.
    pub trend: Vec<AggregatedPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    /// Base variable, used to label the distribution chart.
    pub variable: String,
    /// Composite column name, used to label the trend chart.
    pub column: String,
    pub resolved: bool,
    /// One entry per cohort, in [`Cohort::ALL`] order.
    pub series: Vec<CohortSeries>,
}

impl ChartData {
    pub fn series(&self, cohort: Cohort) -> Option<&CohortSeries> {
        self.series.iter().find(|s| s.cohort == cohort)
    }

    pub fn trend_title(&self) -> String {
        format!("Evolution of {} by Age", self.column)
    }

    pub fn distribution_title(&self) -> String {
        format!("Boxplot of {}", self.variable)
    }
}

/// Resolve, extract and aggregate for `selection`. Never fails: missing
/// columns produce empty series.
pub fn compute(session: &Session, selection: &Selection) -> ChartData {
    let resolved = session.variables.resolve(selection);
    let column = resolved.column;

    let series = Cohort::ALL
        .iter()
        .map(|&cohort| {
            let rows = session.cohorts.get(cohort);
            let values = extract_values(rows, column);
            let pairs = extract_pairs(rows, session.age_column, column);
            CohortSeries {
                cohort,
                summary: BoxSummary::from_values(&values),
                values,
                trend: aggregate_by_age(&pairs),
            }
        })
        .collect();

    ChartData {
        variable: selection.variable.clone(),
        resolved: resolved.is_resolved(),
        column: resolved.name,
        series,
    }
}
