use super::domain::{composite_name, STIMULI, VARIABLES, ZONES};
use super::model::{header_name, Cell, ColumnIndex};

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// The three selector values driving a recompute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub zone: String,
    pub variable: String,
    pub stimulus: String,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::new(VARIABLES[0], ZONES[0], STIMULI[0])
    }
}

impl Selection {
    pub fn new(variable: &str, zone: &str, stimulus: &str) -> Self {
        Selection {
            zone: zone.to_string(),
            variable: variable.to_string(),
            stimulus: stimulus.to_string(),
        }
    }

    /// Spreadsheet column name for this selection.
    pub fn composite_name(&self) -> String {
        composite_name(&self.variable, &self.zone, &self.stimulus)
    }
}

// ---------------------------------------------------------------------------
// Variable list / resolution
// ---------------------------------------------------------------------------

/// Header lookup for the sheet's named columns.
#[derive(Debug, Clone, Default)]
pub struct VariableList {
    index: ColumnIndex,
    named: usize,
}

impl VariableList {
    pub fn from_header(header: &[Cell]) -> Self {
        VariableList {
            index: ColumnIndex::from_header(header),
            named: header.iter().filter_map(header_name).count(),
        }
    }

    /// Number of non-empty header cells.
    pub fn len(&self) -> usize {
        self.named
    }

    /// Position of `name` in the header row.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.position(name)
    }

    /// Resolve the composite column for `selection`.
    pub fn resolve(&self, selection: &Selection) -> ResolvedVariable {
        let name = selection.composite_name();
        let column = self.position(&name);
        if column.is_none() {
            log::debug!("column {name:?} not present in header");
        }
        ResolvedVariable { name, column }
    }
}

/// Result of resolving a composite name. `column` is `None` when the sheet
/// has no such header; extraction then produces empty series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVariable {
    pub name: String,
    pub column: Option<usize>,
}

impl ResolvedVariable {
    pub fn is_resolved(&self) -> bool {
        self.column.is_some()
    }
}
