use std::collections::HashMap;
use std::path::PathBuf;

use crate::color::AthleteColors;
use crate::data::model::AthleteId;
use crate::view::{AthleteView, ChartRenderer, CohortView, Metric};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Everything the chart window shows, collected before it opens.
#[derive(Default)]
pub struct AppState {
    /// File the measurements were read from.
    pub source: Option<PathBuf>,

    /// Spreadsheet written for this run.
    pub report_path: Option<PathBuf>,

    /// Cohort chart source (all athletes).
    pub cohort: CohortView,

    /// Per-athlete chart sources, in display order.
    pub athletes: Vec<AthleteView>,

    /// Per-metric athlete shades for the cohort charts.
    pub colors: HashMap<Metric, AthleteColors>,
}

impl AppState {
    pub fn new(source: PathBuf, report_path: PathBuf) -> Self {
        Self {
            source: Some(source),
            report_path: Some(report_path),
            ..Default::default()
        }
    }

    /// Distinct athletes of the cohort chart, first appearance first.
    pub fn cohort_athletes(&self) -> Vec<AthleteId> {
        let mut seen = std::collections::HashSet::new();
        self.cohort
            .points
            .iter()
            .filter(|p| seen.insert(&p.id))
            .map(|p| p.id.clone())
            .collect()
    }

    pub fn measurement_count(&self) -> usize {
        self.cohort.points.len()
    }
}

impl ChartRenderer for AppState {
    fn render_cohort(&mut self, view: &CohortView) {
        self.cohort = view.clone();
        let athletes = self.cohort_athletes();
        self.colors = Metric::ALL
            .iter()
            .map(|&m| (m, AthleteColors::new(m, &athletes)))
            .collect();
    }

    fn render_athlete(&mut self, view: &AthleteView) {
        self.athletes.push(view.clone());
    }
}
