use super::model::{DerivedMetrics, Measurement, MeasurementRecord, RawTable, WorkingSet};

/// Empirical exponent of the lean mass index (Slater et al., 2006).
pub const LEAN_MASS_EXPONENT: f64 = 0.14;

/// Compute both indices for a single record.
///
/// No validation is done: NaN inputs give NaN outputs, and a zero sum gives
/// an infinite (or NaN, for zero weight) lean mass index.
pub fn derive_record(rec: &MeasurementRecord) -> DerivedMetrics {
    let sum_of_seven: f64 = rec.skinfolds.sites().iter().sum();
    DerivedMetrics {
        sum_of_seven,
        lean_mass_index: rec.weight / sum_of_seven.powf(LEAN_MASS_EXPONENT),
    }
}

/// Append the derived indices to every row of the filtered table.
pub fn derive(table: RawTable) -> WorkingSet {
    let RawTable { labels, records } = table;
    let measurements: Vec<Measurement> = records
        .into_iter()
        .map(|record| Measurement {
            metrics: derive_record(&record),
            record,
        })
        .collect();

    let non_finite = measurements
        .iter()
        .filter(|m| !m.metrics.lean_mass_index.is_finite() || !m.metrics.sum_of_seven.is_finite())
        .count();
    if non_finite > 0 {
        log::warn!("{non_finite} measurement(s) have missing or degenerate skinfold/weight values");
    }

    WorkingSet {
        labels,
        measurements,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{default_labels, AthleteId, Skinfolds};

    fn record(weight: f64, sites: [f64; 7]) -> MeasurementRecord {
        MeasurementRecord {
            id: AthleteId::Integer(1),
            date: None,
            weight,
            skinfolds: Skinfolds::from_sites(sites),
        }
    }

    #[test]
    fn test_reference_values() {
        let m = derive_record(&record(70.0, [10.0, 15.0, 5.0, 20.0, 25.0, 15.0, 10.0]));
        assert_eq!(m.sum_of_seven, 100.0);
        // 100^0.14 ≈ 1.9055
        assert!((m.lean_mass_index - 36.74).abs() < 0.01, "{}", m.lean_mass_index);
        assert_eq!(m.lean_mass_index, 70.0 / 100f64.powf(0.14));
    }

    #[test]
    fn test_sum_is_exact_sum_of_sites() {
        let sites = [6.2, 8.4, 3.1, 11.7, 14.9, 12.3, 7.5];
        let m = derive_record(&record(72.3, sites));
        let expected = 6.2 + 8.4 + 3.1 + 11.7 + 14.9 + 12.3 + 7.5;
        assert!((m.sum_of_seven - expected).abs() < 1e-12);
        assert_eq!(m.lean_mass_index, 72.3 / m.sum_of_seven.powf(LEAN_MASS_EXPONENT));
    }

    #[test]
    fn test_zero_sum_does_not_panic() {
        let m = derive_record(&record(70.0, [0.0; 7]));
        assert_eq!(m.sum_of_seven, 0.0);
        assert_eq!(m.lean_mass_index, f64::INFINITY);

        let m = derive_record(&record(0.0, [0.0; 7]));
        assert!(m.lean_mass_index.is_nan());
    }

    #[test]
    fn test_nan_propagates() {
        let m = derive_record(&record(70.0, [1.0, f64::NAN, 1.0, 1.0, 1.0, 1.0, 1.0]));
        assert!(m.sum_of_seven.is_nan());
        assert!(m.lean_mass_index.is_nan());

        let m = derive_record(&record(f64::NAN, [1.0; 7]));
        assert_eq!(m.sum_of_seven, 7.0);
        assert!(m.lean_mass_index.is_nan());
    }

    #[test]
    fn test_derive_keeps_order_and_labels() {
        let table = RawTable {
            labels: default_labels(),
            records: vec![record(60.0, [1.0; 7]), record(80.0, [2.0; 7])],
        };
        let set = derive(table);
        assert_eq!(set.len(), 2);
        assert_eq!(set.labels, default_labels());
        assert_eq!(set.measurements[0].record.weight, 60.0);
        assert_eq!(set.measurements[1].metrics.sum_of_seven, 14.0);
    }

    #[test]
    fn test_derive_empty() {
        let set = derive(RawTable {
            labels: default_labels(),
            records: Vec::new(),
        });
        assert!(set.is_empty());
    }
}
