use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

#[path = "../data/domain.rs"]
mod domain;

use domain::{
    composite_name, AGE_COLUMN, CASE_COLUMN, NO_ZONE_VARIABLE, STIMULI, VARIABLES, ZONES,
};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Header names for every measurement column, in sheet order.
fn measurement_columns() -> Vec<String> {
    let mut cols = Vec::new();
    for variable in VARIABLES {
        for stimulus in STIMULI {
            if variable == NO_ZONE_VARIABLE {
                cols.push(composite_name(variable, "", stimulus));
            } else {
                for zone in ZONES {
                    cols.push(composite_name(variable, zone, stimulus));
                }
            }
        }
    }
    cols
}

/// A measurement, or one of the sheet's missing markers (None = blank cell).
fn measurement(rng: &mut SimpleRng, base: f64, age: f64) -> Option<f64> {
    let roll = rng.next_f64();
    if roll < 0.05 {
        None
    } else if roll < 0.10 {
        Some(0.0)
    } else if roll < 0.13 {
        Some(1000.0)
    } else {
        let v = rng.gauss(base + age * 0.8, base * 0.15).max(0.1);
        Some((v * 100.0).round() / 100.0)
    }
}

struct Subject {
    case: &'static str,
    age: Option<f64>,
    values: Vec<Option<f64>>,
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let columns = measurement_columns();

    let mut subjects = Vec::new();
    for i in 0..120 {
        let case = match i % 10 {
            9 => "Pilote",
            n if n % 2 == 0 => "TSA",
            _ => "DT",
        };
        let base = if case == "TSA" { 8.0 } else { 10.0 };
        let age = if rng.next_f64() < 0.03 {
            None
        } else {
            Some(((1.5 + rng.next_f64() * 6.5) * 100.0).round() / 100.0)
        };
        let values = columns
            .iter()
            .map(|_| measurement(&mut rng, base, age.unwrap_or(4.0)))
            .collect();
        subjects.push(Subject { case, age, values });
    }

    write_csv("sample_data.csv", &columns, &subjects)?;
    write_parquet("sample_data.parquet", &columns, &subjects)?;

    println!(
        "Wrote {} subjects ({} measurement columns) to sample_data.csv and sample_data.parquet",
        subjects.len(),
        columns.len()
    );
    Ok(())
}

fn write_csv(path: &str, columns: &[String], subjects: &[Subject]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("creating {path}"))?;

    let fmt = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();

    writer.write_record(["Etude oculometrie – donnees simulees"])?;

    let mut header = vec![
        "Id".to_string(),
        CASE_COLUMN.to_string(),
        AGE_COLUMN.to_string(),
        String::new(),
    ];
    header.extend(columns.iter().cloned());
    writer.write_record(&header)?;

    for (i, s) in subjects.iter().enumerate() {
        let mut record = vec![format!("S{:03}", i + 1), s.case.to_string(), fmt(s.age), String::new()];
        record.extend(s.values.iter().map(|v| fmt(*v)));
        writer.write_record(&record)?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &str, columns: &[String], subjects: &[Subject]) -> Result<()> {
    let mut fields = vec![
        Field::new(CASE_COLUMN, DataType::Utf8, false),
        Field::new(AGE_COLUMN, DataType::Float64, true),
    ];
    fields.extend(columns.iter().map(|c| Field::new(c, DataType::Float64, true)));
    let schema = Arc::new(Schema::new(fields));

    let mut arrays: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(
            subjects.iter().map(|s| s.case).collect::<Vec<_>>(),
        )),
        Arc::new(Float64Array::from(
            subjects.iter().map(|s| s.age).collect::<Vec<_>>(),
        )),
    ];
    for j in 0..columns.len() {
        let col: Vec<Option<f64>> = subjects.iter().map(|s| s.values[j]).collect();
        arrays.push(Arc::new(Float64Array::from(col)));
    }

    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}
