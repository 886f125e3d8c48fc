use chrono::NaiveDate;

use crate::data::model::{AthleteId, Measurement, WorkingSet};

// ---------------------------------------------------------------------------
// Metric – which derived index a chart shows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    LeanMassIndex,
    SumOfSeven,
}

impl Metric {
    /// Chart order within a row.
    pub const ALL: [Metric; 2] = [Metric::LeanMassIndex, Metric::SumOfSeven];

    pub fn label(self) -> &'static str {
        match self {
            Metric::LeanMassIndex => "Lean Mass Index",
            Metric::SumOfSeven => "Sum of 7 Skinfolds",
        }
    }

    pub fn axis_label(self) -> &'static str {
        match self {
            Metric::LeanMassIndex => "Lean Mass Index (mm.kg^-0.14)",
            Metric::SumOfSeven => "Sum of 7 Skinfolds (mm)",
        }
    }

    pub fn value(self, point: &ChartPoint) -> f64 {
        match self {
            Metric::LeanMassIndex => point.lean_mass_index,
            Metric::SumOfSeven => point.sum_of_seven,
        }
    }

    pub fn cohort_title(self) -> String {
        format!("{} of All Athletes", self.label())
    }

    pub fn athlete_title(self, id: &AthleteId) -> String {
        format!("{} of Athlete {id}", self.label())
    }
}

// ---------------------------------------------------------------------------
// Chart sources
// ---------------------------------------------------------------------------

/// The columns a chart needs from one measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub id: AthleteId,
    pub date: Option<NaiveDate>,
    pub lean_mass_index: f64,
    pub sum_of_seven: f64,
}

impl From<&Measurement> for ChartPoint {
    fn from(m: &Measurement) -> Self {
        ChartPoint {
            id: m.record.id.clone(),
            date: m.record.date,
            lean_mass_index: m.metrics.lean_mass_index,
            sum_of_seven: m.metrics.sum_of_seven,
        }
    }
}

/// Every retained measurement, in working-set order.
#[derive(Debug, Clone, Default)]
pub struct CohortView {
    pub points: Vec<ChartPoint>,
}

/// One athlete's measurements in chronological order.
#[derive(Debug, Clone)]
pub struct AthleteView {
    pub id: AthleteId,
    pub points: Vec<ChartPoint>,
}

pub fn cohort_view(set: &WorkingSet) -> CohortView {
    CohortView {
        points: set.measurements.iter().map(ChartPoint::from).collect(),
    }
}

/// Rows of `id`, stably sorted by date with undated rows last.
pub fn athlete_view(set: &WorkingSet, id: &AthleteId) -> AthleteView {
    let mut points: Vec<ChartPoint> = set
        .measurements
        .iter()
        .filter(|m| &m.record.id == id)
        .map(ChartPoint::from)
        .collect();
    points.sort_by_key(|p| (p.date.is_none(), p.date));
    AthleteView {
        id: id.clone(),
        points,
    }
}

/// One view per athlete, in order of first appearance.
pub fn athlete_views(set: &WorkingSet) -> Vec<AthleteView> {
    set.athlete_ids()
        .iter()
        .map(|id| athlete_view(set, id))
        .collect()
}

// ---------------------------------------------------------------------------
// Rendering boundary
// ---------------------------------------------------------------------------

/// Receives chart sources; each call stands for one row of two charts
/// (lean mass index, sum of seven).
pub trait ChartRenderer {
    fn render_cohort(&mut self, view: &CohortView);
    fn render_athlete(&mut self, view: &AthleteView);
}

/// Feed the cohort view, then every athlete view, to `renderer`.
pub fn render_all(set: &WorkingSet, renderer: &mut dyn ChartRenderer) {
    renderer.render_cohort(&cohort_view(set));
    for view in athlete_views(set) {
        log::debug!("Rendering {} measurement(s) for athlete {}", view.points.len(), view.id);
        renderer.render_athlete(&view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{default_labels, DerivedMetrics, MeasurementRecord, Skinfolds};

    fn measurement(id: i64, date: Option<(i32, u32, u32)>, sum: f64) -> Measurement {
        Measurement {
            record: MeasurementRecord {
                id: AthleteId::Integer(id),
                date: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
                weight: 70.0,
                skinfolds: Skinfolds::default(),
            },
            metrics: DerivedMetrics {
                sum_of_seven: sum,
                lean_mass_index: 70.0 / sum.powf(0.14),
            },
        }
    }

    fn set() -> WorkingSet {
        WorkingSet {
            labels: default_labels(),
            measurements: vec![
                measurement(2, Some((2021, 3, 1)), 1.0),
                measurement(1, Some((2020, 5, 1)), 2.0),
                measurement(2, Some((2020, 1, 1)), 3.0),
                measurement(1, None, 4.0),
                measurement(2, Some((2020, 6, 1)), 5.0),
                measurement(1, Some((2019, 5, 1)), 6.0),
            ],
        }
    }

    #[test]
    fn test_cohort_keeps_working_set_order() {
        let view = cohort_view(&set());
        let sums: Vec<f64> = view.points.iter().map(|p| p.sum_of_seven).collect();
        assert_eq!(sums, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_athlete_views_sorted_by_date() {
        let views = athlete_views(&set());
        assert_eq!(views.len(), 2);

        assert_eq!(views[0].id, AthleteId::Integer(2));
        let sums: Vec<f64> = views[0].points.iter().map(|p| p.sum_of_seven).collect();
        assert_eq!(sums, vec![3.0, 5.0, 1.0]);

        assert_eq!(views[1].id, AthleteId::Integer(1));
        let sums: Vec<f64> = views[1].points.iter().map(|p| p.sum_of_seven).collect();
        assert_eq!(sums, vec![6.0, 2.0, 4.0], "undated rows sort last");
        assert!(views[1].points.iter().all(|p| p.id == AthleteId::Integer(1)));
    }

    #[test]
    fn test_titles() {
        assert_eq!(Metric::LeanMassIndex.cohort_title(), "Lean Mass Index of All Athletes");
        assert_eq!(
            Metric::SumOfSeven.athlete_title(&AthleteId::Integer(12)),
            "Sum of 7 Skinfolds of Athlete 12"
        );
    }

    #[derive(Default)]
    struct Recorder {
        cohorts: usize,
        athletes: Vec<AthleteId>,
    }

    impl ChartRenderer for Recorder {
        fn render_cohort(&mut self, _view: &CohortView) {
            self.cohorts += 1;
        }
        fn render_athlete(&mut self, view: &AthleteView) {
            self.athletes.push(view.id.clone());
        }
    }

    #[test]
    fn test_render_all_on_empty_set() {
        let empty = WorkingSet {
            labels: default_labels(),
            measurements: Vec::new(),
        };
        let mut rec = Recorder::default();
        render_all(&empty, &mut rec);
        assert_eq!(rec.cohorts, 1);
        assert!(rec.athletes.is_empty());
    }
}
