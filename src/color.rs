use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::cohort::Cohort;

// ---------------------------------------------------------------------------
// Cohort colours
// ---------------------------------------------------------------------------

fn hsl_to_color32(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let rgb: Srgb = Hsl::new(hue, saturation, lightness).into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// Line/stroke colour: DT red, TSA blue.
pub fn cohort_color(cohort: Cohort) -> Color32 {
    match cohort {
        Cohort::Dt => hsl_to_color32(0.0, 1.0, 0.5),
        Cohort::Tsa => hsl_to_color32(240.0, 1.0, 0.5),
    }
}

/// Translucent fill matching [`cohort_color`].
pub fn cohort_fill(cohort: Cohort) -> Color32 {
    let c = cohort_color(cohort);
    Color32::from_rgba_unmultiplied(c.r(), c.g(), c.b(), 26)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cohort_colors() {
        let dt = cohort_color(Cohort::Dt);
        assert!(dt.r() >= 254 && dt.g() <= 1 && dt.b() <= 1);
        let tsa = cohort_color(Cohort::Tsa);
        assert!(tsa.b() >= 254 && tsa.r() <= 1 && tsa.g() <= 1);
        assert_eq!(cohort_fill(Cohort::Tsa).a(), 26);
    }
}
