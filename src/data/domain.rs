//! Sheet layout constants and the column naming rule.
//!
//! Kept free of other crate imports so `bin/generate_sample.rs` can include
//! this file directly and write sheets the viewer reads back.

/// Header of the column carrying the cohort label.
pub const CASE_COLUMN: &str = "Case";

/// Header of the subject age column, in years.
pub const AGE_COLUMN: &str = "Age (ans)";

/// Base variable measured across the whole face; its columns carry no zone.
pub const NO_ZONE_VARIABLE: &str = "TTT";

pub const ZONES: [&str; 4] = ["Tete", "Yeux", "Bouche", "Ecran"];
pub const VARIABLES: [&str; 6] = ["TTT", "TF", "TP", "NBF", "NBEZ", "Lat"];
pub const STIMULI: [&str; 4] = ["Visage1", "Visage2", "Visage3", "Visage4"];

/// Spreadsheet column name for a measurement:
/// `{variable}_{zone}_{stimulus}`, or `{variable}_{stimulus}` for `TTT`.
pub fn composite_name(variable: &str, zone: &str, stimulus: &str) -> String {
    if variable == NO_ZONE_VARIABLE {
        format!("{variable}_{stimulus}")
    } else {
        format!("{variable}_{zone}_{stimulus}")
    }
}
