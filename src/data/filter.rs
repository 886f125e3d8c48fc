use std::collections::HashMap;

use super::model::{AthleteId, RawTable};

// ---------------------------------------------------------------------------
// Cohort filter: keep athletes measured more than once
// ---------------------------------------------------------------------------

/// Minimum number of measurements for an athlete to stay in the cohort.
pub const MIN_MEASUREMENTS: usize = 2;

/// Count rows per athlete ID.
pub fn measurement_counts(table: &RawTable) -> HashMap<&AthleteId, usize> {
    let mut counts = HashMap::new();
    for rec in &table.records {
        *counts.entry(&rec.id).or_insert(0) += 1;
    }
    counts
}

/// Drop every row whose athlete appears only once.
///
/// The filter is stable: retained rows keep their relative source order and
/// are reindexed contiguously by their position in the returned table.
pub fn retain_longitudinal(table: RawTable) -> RawTable {
    let keep: Vec<bool> = {
        let counts = measurement_counts(&table);
        table
            .records
            .iter()
            .map(|rec| counts.get(&rec.id).copied().unwrap_or(0) >= MIN_MEASUREMENTS)
            .collect()
    };

    let before = table.len();
    let RawTable { labels, records } = table;
    let records: Vec<_> = records
        .into_iter()
        .zip(keep)
        .filter_map(|(rec, k)| k.then_some(rec))
        .collect();

    log::debug!(
        "Cohort filter kept {} of {before} rows ({} single-measurement rows dropped)",
        records.len(),
        before - records.len()
    );

    RawTable { labels, records }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{default_labels, MeasurementRecord, Skinfolds};

    fn table(ids: &[&str]) -> RawTable {
        RawTable {
            labels: default_labels(),
            records: ids
                .iter()
                .enumerate()
                .map(|(i, id)| MeasurementRecord {
                    id: AthleteId::parse(id),
                    date: None,
                    weight: i as f64,
                    skinfolds: Skinfolds::default(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_singletons_dropped() {
        let out = retain_longitudinal(table(&["A", "B", "C", "B", "C", "C"]));
        let ids: Vec<String> = out.records.iter().map(|r| r.id.to_string()).collect();
        assert_eq!(ids, vec!["B", "C", "B", "C", "C"]);
    }

    #[test]
    fn test_order_is_stable() {
        let out = retain_longitudinal(table(&["1", "2", "9", "1", "2", "7"]));
        // `weight` carries the source row index.
        let rows: Vec<f64> = out.records.iter().map(|r| r.weight).collect();
        assert_eq!(rows, vec![0.0, 1.0, 3.0, 4.0]);
    }

    #[test]
    fn test_membership_iff_repeated() {
        let input = table(&["x", "y", "y", "z", "x", "w", "v", "v", "v"]);
        let counts: HashMap<String, usize> = measurement_counts(&input)
            .into_iter()
            .map(|(id, n)| (id.to_string(), n))
            .collect();
        let out = retain_longitudinal(input);

        for (id, n) in &counts {
            let present = out.records.iter().any(|r| &r.id.to_string() == id);
            assert_eq!(present, *n >= 2, "athlete {id} seen {n} times");
        }
    }

    #[test]
    fn test_no_repeated_ids_gives_empty_table() {
        let out = retain_longitudinal(table(&["a", "b", "c"]));
        assert!(out.is_empty());
        assert_eq!(out.labels, default_labels());

        let out = retain_longitudinal(table(&[]));
        assert!(out.is_empty());
    }

    #[test]
    fn test_integer_and_text_ids_are_distinct() {
        // "7" parses to an integer ID, "7a" stays text.
        let out = retain_longitudinal(table(&["7", "7a", "7.0"]));
        assert_eq!(out.len(), 2);
        assert!(out.records.iter().all(|r| r.id == AthleteId::Integer(7)));
    }
}
