use std::path::Path;

use crate::data::model::WorkingSet;
use crate::data::{filter, loader, metrics};
use crate::error::{ExportError, LoadError};
use crate::export::ReportExporter;
use crate::view::{render_all, ChartRenderer};

/// Load → cohort filter → derive. Pure apart from reading `path`.
pub fn prepare(path: &Path) -> Result<WorkingSet, LoadError> {
    let raw = loader::load_file(path)?;
    if raw.is_empty() {
        log::warn!("{} contains no measurements", path.display());
    }
    let cohort = filter::retain_longitudinal(raw);
    let set = metrics::derive(cohort);

    if set.is_empty() {
        log::warn!("No athlete has two or more measurements; charts and report will be empty");
    }
    let undated = set.measurements.iter().filter(|m| m.record.date.is_none()).count();
    if undated > 0 {
        log::warn!("{undated} measurement(s) have no readable date and will not be plotted");
    }
    log::info!(
        "Cohort: {} athlete(s), {} measurement(s)",
        set.athlete_ids().len(),
        set.len()
    );
    Ok(set)
}

/// Hand the working set to the output collaborators: charts first, then the
/// report.
pub fn publish(
    set: &WorkingSet,
    renderer: &mut dyn ChartRenderer,
    exporter: &dyn ReportExporter,
) -> Result<(), ExportError> {
    render_all(set, renderer);
    exporter.export(set)
}
