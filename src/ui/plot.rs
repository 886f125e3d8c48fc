use std::ops::RangeInclusive;

use eframe::egui::{Color32, RichText, ScrollArea, Ui};
use egui_plot::{GridMark, Line, LineStyle, Plot, PlotPoint, PlotPoints, Points};

use crate::color::{metric_color, LIGHT_SLATE_GRAY};
use crate::data::date::{from_epoch_days, to_epoch_days};
use crate::state::AppState;
use crate::view::{AthleteView, ChartPoint, Metric};

const PLOT_HEIGHT: f32 = 320.0;
const COHORT_RADIUS: f32 = 5.0;
const ATHLETE_RADIUS: f32 = 7.5;

// ---------------------------------------------------------------------------
// Chart rows (central panel)
// ---------------------------------------------------------------------------

/// Render the cohort row, then one row per athlete.
pub fn chart_rows(ui: &mut Ui, state: &AppState) {
    if state.cohort.points.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No athlete has two or more measurements.");
        });
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.columns(2, |cols| {
                for (col, metric) in cols.iter_mut().zip(Metric::ALL) {
                    cohort_plot(col, state, metric);
                }
            });
            for view in &state.athletes {
                ui.separator();
                ui.columns(2, |cols| {
                    for (col, metric) in cols.iter_mut().zip(Metric::ALL) {
                        athlete_plot(col, view, metric);
                    }
                });
            }
        });
}

fn chart_title(ui: &mut Ui, text: String, color: Color32) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new(text).size(20.0).color(color.gamma_multiply(0.8)));
    });
}

/// Points with a date and a finite value; the rest cannot be placed.
fn plot_points<'a>(
    points: impl IntoIterator<Item = &'a ChartPoint>,
    metric: Metric,
) -> Vec<[f64; 2]> {
    points
        .into_iter()
        .filter_map(|p| {
            let y = metric.value(p);
            let date = p.date?;
            y.is_finite().then(|| [to_epoch_days(date), y])
        })
        .collect()
}

fn month_axis(mark: GridMark, _range: &RangeInclusive<f64>) -> String {
    from_epoch_days(mark.value)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_default()
}

fn tooltip_date(x: f64) -> String {
    from_epoch_days(x)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Non-interactive plot frame shared by both chart families.
fn base_plot(id: impl std::hash::Hash, metric: Metric) -> Plot<'static> {
    Plot::new(id)
        .height(PLOT_HEIGHT)
        .x_axis_label("Measurement Date")
        .y_axis_label(metric.axis_label())
        .x_axis_formatter(month_axis)
        .allow_boxed_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_double_click_reset(false)
}

// ---------------------------------------------------------------------------
// Cohort scatter
// ---------------------------------------------------------------------------

/// Scatter of every measurement. Each athlete is its own series so the
/// hover label can name them.
pub fn cohort_plot(ui: &mut Ui, state: &AppState, metric: Metric) {
    let color = metric_color(metric);
    chart_title(ui, metric.cohort_title(), color);

    let colors = state.colors.get(&metric);
    let label = metric.label();

    base_plot(("cohort", metric), metric)
        .label_formatter(move |name: &str, value: &PlotPoint| {
            if name.is_empty() {
                return String::new();
            }
            format!(
                "Athlete ID: {name}\n{label}: {:.3}\nDate: {}",
                value.y,
                tooltip_date(value.x)
            )
        })
        .show(ui, |plot_ui| {
            for id in state.cohort_athletes() {
                let pts = plot_points(state.cohort.points.iter().filter(|p| p.id == id), metric);
                if pts.is_empty() {
                    continue;
                }
                let shade = colors.map_or(color, |c| c.color_for(&id));
                plot_ui.points(
                    Points::new(PlotPoints::from(pts))
                        .name(id.to_string())
                        .color(shade.gamma_multiply(0.7))
                        .radius(COHORT_RADIUS)
                        .filled(true),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Per-athlete line + points
// ---------------------------------------------------------------------------

pub fn athlete_plot(ui: &mut Ui, view: &AthleteView, metric: Metric) {
    let color = metric_color(metric);
    chart_title(ui, metric.athlete_title(&view.id), color);

    let label = metric.label();
    let pts = plot_points(&view.points, metric);

    base_plot(("athlete", view.id.to_string(), metric), metric)
        .label_formatter(move |name: &str, value: &PlotPoint| {
            if name.is_empty() {
                return String::new();
            }
            format!("{label}: {:.3}\nDate: {}", value.y, tooltip_date(value.x))
        })
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(pts.clone()))
                    .name(label)
                    .color(LIGHT_SLATE_GRAY.gamma_multiply(0.5))
                    .width(2.0)
                    .style(LineStyle::Dashed { length: 5.0 }),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(pts))
                    .name(label)
                    .color(color.gamma_multiply(0.8))
                    .radius(ATHLETE_RADIUS)
                    .filled(true),
            );
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::AthleteId;
    use chrono::NaiveDate;

    #[test]
    fn test_plot_points_skip_unplaceable() {
        let date = NaiveDate::from_ymd_opt(2020, 1, 2);
        let points = vec![
            ChartPoint {
                id: AthleteId::Integer(1),
                date,
                lean_mass_index: 36.5,
                sum_of_seven: 100.0,
            },
            ChartPoint {
                id: AthleteId::Integer(1),
                date: None,
                lean_mass_index: 36.5,
                sum_of_seven: 100.0,
            },
            ChartPoint {
                id: AthleteId::Integer(1),
                date,
                lean_mass_index: f64::INFINITY,
                sum_of_seven: 0.0,
            },
        ];
        let lmi = plot_points(&points, Metric::LeanMassIndex);
        assert_eq!(lmi, vec![[18263.0, 36.5]]);
        let sum = plot_points(&points, Metric::SumOfSeven);
        assert_eq!(sum.len(), 2);
    }

    #[test]
    fn test_tooltip_date() {
        assert_eq!(tooltip_date(18263.0), "2020-01-02");
    }
}
