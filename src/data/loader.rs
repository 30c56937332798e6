use std::path::Path;

use anyhow::{Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use arrow::error::ArrowError;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{Cell, Row, Table};

/// Failures callers may want to tell apart from plain I/O or parse errors.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("expected a JSON array of row arrays: {0}")]
    NotARowArray(String),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the first sheet of a measurement file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – raw sheet export: row 0 title, row 1 header, then data
/// * `.json`    – `[[...], [...], ...]`, one inner array per sheet row
/// * `.parquet` – one column per header; a blank title row is prepended
pub fn load_file(path: &Path) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => return Err(LoadError::UnsupportedExtension(other.to_string()).into()),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::debug!("read {} rows from {}", table.len(), path.display());
    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Every record becomes one row; rows may have different lengths.
fn load_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(Cell::parse).collect());
    }

    Ok(Table::new(rows))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON layout (a sheet exported row by row):
///
/// ```json
/// [
///   ["Etude"],
///   ["Case", "Age (ans)", "TTT_Visage1"],
///   ["TSA", 4.5, 12.0],
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .ok_or_else(|| LoadError::NotARowArray("top level is not an array".into()))?;

    let mut rows = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let cells = match rec {
            JsonValue::Array(cells) => cells.iter().map(json_to_cell).collect(),
            JsonValue::Null => Row::new(),
            _ => return Err(LoadError::NotARowArray(format!("row {i} is not an array")).into()),
        };
        rows.push(cells);
    }

    Ok(Table::new(rows))
}

fn json_to_cell(val: &JsonValue) -> Cell {
    match val {
        JsonValue::Null => Cell::Empty,
        JsonValue::Number(n) => match n.as_f64() {
            Some(f) => Cell::Number(f),
            None => Cell::Text(n.to_string()),
        },
        JsonValue::String(s) => Cell::parse(s),
        other => Cell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file whose column names are the sheet headers.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;

    let header: Row = builder
        .schema()
        .fields()
        .iter()
        .map(|f| Cell::Text(f.name().clone()))
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = vec![Row::new(), header];

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let columns: Vec<Vec<Cell>> = batch
            .columns()
            .iter()
            .zip(schema.fields().iter())
            .map(|(col, field)| column_cells(col, field.name()))
            .collect();

        for row in 0..batch.num_rows() {
            rows.push(columns.iter().map(|col| col[row].clone()).collect());
        }
    }

    Ok(Table::new(rows))
}

/// Convert one Arrow column into cells.
///
/// Strings are typed like CSV text, numeric types of any width become
/// numbers, other types go through their text form. A column that cannot be
/// converted at all reads as empty rather than failing the load.
fn column_cells(col: &ArrayRef, name: &str) -> Vec<Cell> {
    match col.data_type() {
        DataType::Utf8 => text_cells(col.as_string::<i32>().iter()),
        DataType::LargeUtf8 => text_cells(col.as_string::<i64>().iter()),
        DataType::Boolean => col
            .as_boolean()
            .iter()
            .map(|v| v.map_or(Cell::Empty, |b| Cell::Text(b.to_string())))
            .collect(),
        dt if dt.is_numeric() => match cast(col.as_ref(), &DataType::Float64) {
            Ok(arr) => arr
                .as_primitive::<Float64Type>()
                .iter()
                .map(|v| v.map_or(Cell::Empty, number_cell))
                .collect(),
            Err(e) => empty_column(col, name, &e),
        },
        _ => match cast(col.as_ref(), &DataType::Utf8) {
            Ok(arr) => text_cells(arr.as_string::<i32>().iter()),
            Err(e) => empty_column(col, name, &e),
        },
    }
}

fn text_cells<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<Cell> {
    values.map(|v| v.map_or(Cell::Empty, Cell::parse)).collect()
}

/// Non-finite floats are not measurements.
fn number_cell(v: f64) -> Cell {
    if v.is_finite() {
        Cell::Number(v)
    } else {
        Cell::Empty
    }
}

fn empty_column(col: &ArrayRef, name: &str, err: &ArrowError) -> Vec<Cell> {
    log::warn!(
        "column {name:?} of type {:?} read as empty: {err}",
        col.data_type()
    );
    vec![Cell::Empty; col.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int16Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use tempfile::TempDir;

    use crate::data::cohort::Cohort;
    use crate::data::model::AggregatedPoint;
    use crate::data::pipeline::{compute, Session};
    use crate::data::variable::Selection;

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    fn write_parquet(
        dir: &TempDir,
        fields: Vec<Field>,
        columns: Vec<ArrayRef>,
    ) -> std::path::PathBuf {
        let path = dir.path().join("sheet.parquet");
        let schema = Arc::new(Schema::new(fields));
        let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
        path
    }

    #[test]
    fn test_load_csv_keeps_title_and_ragged_rows() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "sheet.csv",
            "Etude 2023\nCase,Age (ans),,TTT_Visage1\nTSA,4.5,,12\nDT,3\n",
        );
        let table = load_file(&path).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.rows[0], vec![Cell::Text("Etude 2023".into())]);
        assert_eq!(table.header()[2], Cell::Empty);
        assert_eq!(table.rows[2][1], Cell::Number(4.5));
        assert_eq!(table.rows[3].len(), 2);
    }

    #[test]
    fn test_load_json_rows() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "sheet.json",
            r#"[["titre"], ["Case", "Age (ans)"], ["DT", 5.25], null, ["TSA", null]]"#,
        );
        let table = load_file(&path).unwrap();
        assert_eq!(table.len(), 5);
        assert_eq!(table.rows[2][1], Cell::Number(5.25));
        assert!(table.rows[3].is_empty());
        assert_eq!(table.rows[4][1], Cell::Empty);
    }

    #[test]
    fn test_load_json_rejects_objects() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "sheet.json", r#"[{"Case": "TSA"}]"#);
        let err = load_file(&path).unwrap_err();
        assert!(err.downcast_ref::<LoadError>().is_some());
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_file(Path::new("data.xlsx")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::UnsupportedExtension(ext)) if ext == "xlsx"
        ));
    }

    #[test]
    fn test_load_json_types_string_cells() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            &dir,
            "sheet.json",
            r#"[["t"], ["Case", "Age (ans)", "TTT_Visage1"], ["TSA", "4.5", "12"], [" DT ", 3.0, 9.0], ["DT", " ", "n/a"]]"#,
        );
        let table = load_file(&path).unwrap();
        assert_eq!(
            table.rows[2],
            vec![Cell::Text("TSA".into()), Cell::Number(4.5), Cell::Number(12.0)]
        );
        assert_eq!(table.rows[3][0], Cell::Text("DT".into()));
        assert_eq!(table.rows[4][1], Cell::Empty);
        assert_eq!(table.rows[4][2], Cell::Text("n/a".into()));

        let session = Session::from_table(table);
        assert_eq!(session.cohort_size(Cohort::Dt), 2);
        let chart = compute(&session, &Selection::default());
        assert_eq!(chart.series(Cohort::Tsa).unwrap().values, vec![12.0]);
        assert_eq!(chart.series(Cohort::Dt).unwrap().values, vec![9.0]);
    }

    #[test]
    fn test_load_parquet_prepends_title_row() {
        let dir = TempDir::new().unwrap();
        let path = write_parquet(
            &dir,
            vec![
                Field::new("Case", DataType::Utf8, true),
                Field::new("Age (ans)", DataType::Float64, true),
            ],
            vec![
                Arc::new(StringArray::from(vec![Some("TSA"), Some(" DT ")])),
                Arc::new(Float64Array::from(vec![Some(4.5), None])),
            ],
        );

        let table = load_file(&path).unwrap();
        assert_eq!(table.len(), 4);
        assert!(table.rows[0].is_empty());
        assert_eq!(table.header()[1], Cell::Text("Age (ans)".into()));
        assert_eq!(table.rows[2][0], Cell::Text("TSA".into()));
        assert_eq!(table.rows[3][0], Cell::Text("DT".into()));
        assert_eq!(table.rows[3][1], Cell::Empty);
    }

    #[test]
    fn test_load_parquet_narrow_ints_and_non_finite_floats() {
        let dir = TempDir::new().unwrap();
        let path = write_parquet(
            &dir,
            vec![
                Field::new("Case", DataType::Utf8, true),
                Field::new("Age (ans)", DataType::Float64, true),
                Field::new("Visit", DataType::Int16, true),
                Field::new("TTT_Visage1", DataType::Float64, true),
            ],
            vec![
                Arc::new(StringArray::from(vec![Some("TSA"), Some("TSA"), Some("DT")])),
                Arc::new(Float64Array::from(vec![Some(f64::NAN), Some(0.1), Some(3.0)])),
                Arc::new(Int16Array::from(vec![Some(1), None, Some(2)])),
                Arc::new(Float64Array::from(vec![
                    Some(50.0),
                    Some(2.0),
                    Some(f64::INFINITY),
                ])),
            ],
        );

        let table = load_file(&path).unwrap();
        assert_eq!(table.len(), 5);
        assert_eq!(table.rows[2][2], Cell::Number(1.0));
        assert_eq!(table.rows[3][2], Cell::Empty);
        assert_eq!(table.rows[2][1], Cell::Empty);
        assert_eq!(table.rows[4][3], Cell::Empty);

        let session = Session::from_table(table);
        let chart = compute(&session, &Selection::default());
        let tsa = chart.series(Cohort::Tsa).unwrap();
        assert_eq!(tsa.values, vec![50.0, 2.0]);
        assert_eq!(tsa.trend, vec![AggregatedPoint { age: 0.0, mean: 2.0 }]);
        assert!(chart.series(Cohort::Dt).unwrap().values.is_empty());
    }
}
