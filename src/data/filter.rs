use super::model::{Cell, Row, SeriesPoint, Table};

// ---------------------------------------------------------------------------
// Validity predicate
// ---------------------------------------------------------------------------

/// Numeric codes the source sheets use to mark a missing measurement.
///
/// Whether 1000 is a missing-code for every instrument or only some of them
/// has not been confirmed against the full dataset; it is excluded everywhere.
pub const MISSING_CODES: [f64; 2] = [0.0, 1000.0];

/// `false` for empty cells, empty text and the missing-data codes.
pub fn is_valid(cell: &Cell) -> bool {
    match cell {
        Cell::Empty => false,
        Cell::Text(s) => !s.is_empty(),
        Cell::Number(v) => !MISSING_CODES.contains(v),
    }
}

/// Numeric value of a cell that passes [`is_valid`]. Valid text cells carry
/// no number and are skipped by every extractor, as are NaN and infinities.
fn valid_number(cell: &Cell) -> Option<f64> {
    if !is_valid(cell) {
        return None;
    }
    cell.as_f64().filter(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// Extractors
// ---------------------------------------------------------------------------

/// Valid values of one column, in row order. Empty when the column is unresolved.
pub fn extract_values(rows: &[Row], column: Option<usize>) -> Vec<f64> {
    let Some(col) = column else {
        return Vec::new();
    };
    rows.iter()
        .filter_map(|row| valid_number(Table::cell(row, col)))
        .collect()
}

/// (age, value) pairs from rows where both cells are valid.
pub fn extract_pairs(
    rows: &[Row],
    age_column: Option<usize>,
    value_column: Option<usize>,
) -> Vec<SeriesPoint> {
    let (Some(age_col), Some(value_col)) = (age_column, value_column) else {
        return Vec::new();
    };
    rows.iter()
        .filter_map(|row| {
            let age = valid_number(Table::cell(row, age_col))?;
            let value = valid_number(Table::cell(row, value_col))?;
            Some(SeriesPoint { age, value })
        })
        .collect()
}
