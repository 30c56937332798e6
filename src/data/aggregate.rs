use std::collections::BTreeMap;

use serde::Serialize;

use super::model::{AggregatedPoint, SeriesPoint};

// ---------------------------------------------------------------------------
// Age buckets
// ---------------------------------------------------------------------------

/// Age rounded to the nearest half year, expressed in half-year units.
///
/// Ties go up (towards +inf): 1.25 → 1.5, 1.75 → 2.0.
fn half_year_key(age: f64) -> i64 {
    (age * 2.0 + 0.5).floor() as i64
}

/// Mean value per half-year age bucket, ascending by age.
///
/// The result does not depend on input order: buckets are keyed, and values
/// inside a bucket are summed in sorted order.
pub fn aggregate_by_age(points: &[SeriesPoint]) -> Vec<AggregatedPoint> {
    let mut buckets: BTreeMap<i64, Vec<f64>> = BTreeMap::new();
    for p in points {
        buckets.entry(half_year_key(p.age)).or_default().push(p.value);
    }

    buckets
        .into_iter()
        .map(|(key, mut values)| {
            values.sort_by(f64::total_cmp);
            let sum: f64 = values.iter().sum();
            AggregatedPoint {
                age: key as f64 / 2.0,
                mean: sum / values.len() as f64,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Box summary (distribution display)
// ---------------------------------------------------------------------------

/// Five-number summary with Tukey whiskers (1.5 × IQR) and outliers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSummary {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
    pub count: usize,
}

impl BoxSummary {
    /// `None` for an empty series.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile(&sorted, 0.25);
        let median = quantile(&sorted, 0.5);
        let q3 = quantile(&sorted, 0.75);
        let iqr = q3 - q1;
        let lo_fence = q1 - 1.5 * iqr;
        let hi_fence = q3 + 1.5 * iqr;

        let lower_whisker = sorted.iter().copied().find(|v| *v >= lo_fence).unwrap_or(q1);
        let upper_whisker = sorted.iter().copied().rev().find(|v| *v <= hi_fence).unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| *v < lo_fence || *v > hi_fence)
            .collect();

        Some(BoxSummary {
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
            outliers,
            count: sorted.len(),
        })
    }
}

/// Linear-interpolated quantile of an ascending, non-empty slice.
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let pos = p * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}
