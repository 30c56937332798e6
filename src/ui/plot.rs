use eframe::egui::{Stroke, Ui};
use egui_plot::{BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoints, Points};

use crate::color::{cohort_color, cohort_fill};
use crate::data::pipeline::ChartData;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Central panel: trend on top, distribution below
// ---------------------------------------------------------------------------

pub fn charts(ui: &mut Ui, state: &AppState) {
    let Some(chart) = &state.chart else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to compare cohorts  (File → Open…)");
        });
        return;
    };

    let height = (ui.available_height() - 80.0).max(200.0) / 2.0;

    ui.vertical_centered(|ui: &mut Ui| ui.heading(chart.trend_title()));
    trend_plot(ui, chart, height);

    ui.separator();

    ui.vertical_centered(|ui: &mut Ui| ui.heading(chart.distribution_title()));
    distribution_plot(ui, chart, height);
}

/// Mean value per half-year of age, one line per cohort.
fn trend_plot(ui: &mut Ui, chart: &ChartData, height: f32) {
    Plot::new("trend_plot")
        .height(height)
        .legend(Legend::default())
        .x_axis_label("Age (years)")
        .y_axis_label(chart.column.clone())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for series in &chart.series {
                let name = series.cohort.label();
                let color = cohort_color(series.cohort);
                let coords: Vec<[f64; 2]> =
                    series.trend.iter().map(|p| [p.age, p.mean]).collect();

                plot_ui.line(
                    Line::new(PlotPoints::from(coords.clone()))
                        .name(name)
                        .color(color)
                        .width(1.5),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from(coords))
                        .name(name)
                        .color(color)
                        .radius(3.0),
                );
            }
        });
}

/// One box per cohort, placed at x = 0, 1, … in series order.
fn distribution_plot(ui: &mut Ui, chart: &ChartData, height: f32) {
    Plot::new("distribution_plot")
        .height(height)
        .legend(Legend::default())
        .y_axis_label(chart.variable.clone())
        .allow_drag(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (i, series) in chart.series.iter().enumerate() {
                let Some(summary) = &series.summary else {
                    continue;
                };
                let name = series.cohort.label();
                let color = cohort_color(series.cohort);
                let x = i as f64;

                let elem = BoxElem::new(
                    x,
                    BoxSpread::new(
                        summary.lower_whisker,
                        summary.q1,
                        summary.median,
                        summary.q3,
                        summary.upper_whisker,
                    ),
                )
                .name(name)
                .box_width(0.5)
                .fill(cohort_fill(series.cohort))
                .stroke(Stroke::new(1.5, color));

                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(name).color(color));

                if !summary.outliers.is_empty() {
                    let outliers: Vec<[f64; 2]> =
                        summary.outliers.iter().map(|&v| [x, v]).collect();
                    plot_ui.points(
                        Points::new(PlotPoints::from(outliers))
                            .name(name)
                            .color(color)
                            .radius(2.5),
                    );
                }
            }
        });
}
