use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Cell – a single spreadsheet cell
// ---------------------------------------------------------------------------

/// A dynamically-typed spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => write!(f, "<empty>"),
            Cell::Number(v) => write!(f, "{v}"),
            Cell::Text(s) => write!(f, "{s}"),
        }
    }
}

impl Cell {
    /// Type a raw textual cell the way a spreadsheet would: blank → `Empty`,
    /// finite number literal → `Number`, anything else → `Text`.
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim();
        if s.is_empty() {
            return Cell::Empty;
        }
        match s.parse::<f64>() {
            Ok(v) if v.is_finite() => Cell::Number(v),
            _ => Cell::Text(s.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Row / Table
// ---------------------------------------------------------------------------

pub type Row = Vec<Cell>;

/// Position of the header row within a loaded sheet. Row 0 is a title row.
pub const HEADER_ROW: usize = 1;

static EMPTY: Cell = Cell::Empty;

/// The raw sheet as loaded, rows in file order.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(rows: Vec<Row>) -> Self {
        Table { rows }
    }

    /// The header row, or an empty slice when the sheet is too short.
    pub fn header(&self) -> &[Cell] {
        self.rows.get(HEADER_ROW).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Cell lookup that treats out-of-range positions as empty.
    pub fn cell(row: &[Cell], index: usize) -> &Cell {
        row.get(index).unwrap_or(&EMPTY)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

// ---------------------------------------------------------------------------
// ColumnIndex – header name → position
// ---------------------------------------------------------------------------

/// Mapping from header name to column position, built once per load.
///
/// Empty header cells name no column. When a name occurs more than once the
/// leftmost position wins.
#[derive(Debug, Clone, Default)]
pub struct ColumnIndex {
    positions: HashMap<String, usize>,
}

impl ColumnIndex {
    pub fn from_header(header: &[Cell]) -> Self {
        let mut positions = HashMap::new();
        for (i, cell) in header.iter().enumerate() {
            if let Some(name) = header_name(cell) {
                positions.entry(name).or_insert(i);
            }
        }
        ColumnIndex { positions }
    }

    /// Exact, case-sensitive lookup.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }
}

/// The name a header cell contributes, if any. Numeric headers are kept in
/// their display form so a column titled `2024` is still addressable.
pub fn header_name(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Empty => None,
        Cell::Text(s) if s.is_empty() => None,
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Output points
// ---------------------------------------------------------------------------

/// One row's (age, value) pair where both cells passed the validity filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub age: f64,
    pub value: f64,
}

/// Mean value of all points sharing a half-year age bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AggregatedPoint {
    pub age: f64,
    pub mean: f64,
}
