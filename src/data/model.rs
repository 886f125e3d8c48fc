use std::fmt;

use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// Source layout
// ---------------------------------------------------------------------------

/// Positions of the kept columns in the source table, in output order:
/// ID, Date, Weight, then the seven skinfold sites.
pub const SOURCE_COLUMNS: [usize; 10] = [0, 1, 3, 4, 5, 6, 7, 9, 10, 11];

/// Minimum number of columns a source must have.
pub const MIN_SOURCE_COLUMNS: usize = 12;

/// Header labels of the ten kept columns, taken from the source header row.
pub type ColumnLabels = [String; 10];

/// Labels used when a source has no header text for a kept column.
pub fn default_labels() -> ColumnLabels {
    [
        "ID",
        "Date",
        "Weight",
        "Triceps (mm)",
        "SubScap (mm)",
        "Biceps (mm)",
        "Illiac (mm)",
        "Abdomen (mm)",
        "Thigh (mm)",
        "Calf (mm)",
    ]
    .map(String::from)
}

// ---------------------------------------------------------------------------
// AthleteId
// ---------------------------------------------------------------------------

/// Athlete identifier. Sources hold either integer or free-text IDs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AthleteId {
    Integer(i64),
    Text(String),
}

impl AthleteId {
    /// Interpret a raw cell. Integer-looking text (including `7.0`) becomes
    /// [`AthleteId::Integer`].
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim();
        if let Ok(i) = s.parse::<i64>() {
            return AthleteId::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            if let Some(id) = Self::from_f64(f) {
                return id;
            }
        }
        AthleteId::Text(s.to_string())
    }

    /// Whole finite floats map to integer IDs; anything else has no ID form.
    pub fn from_f64(f: f64) -> Option<Self> {
        if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
            Some(AthleteId::Integer(f as i64))
        } else {
            None
        }
    }
}

impl fmt::Display for AthleteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AthleteId::Integer(i) => write!(f, "{i}"),
            AthleteId::Text(s) if s.is_empty() => write!(f, "(blank)"),
            AthleteId::Text(s) => write!(f, "{s}"),
        }
    }
}

// ---------------------------------------------------------------------------
// MeasurementRecord – one row of the source table
// ---------------------------------------------------------------------------

/// The seven skinfold sites, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Skinfolds {
    pub triceps: f64,
    pub subscap: f64,
    pub biceps: f64,
    pub illiac: f64,
    pub abdomen: f64,
    pub thigh: f64,
    pub calf: f64,
}

impl Skinfolds {
    /// Sites in column order.
    pub fn sites(&self) -> [f64; 7] {
        [
            self.triceps,
            self.subscap,
            self.biceps,
            self.illiac,
            self.abdomen,
            self.thigh,
            self.calf,
        ]
    }

    pub fn from_sites(sites: [f64; 7]) -> Self {
        let [triceps, subscap, biceps, illiac, abdomen, thigh, calf] = sites;
        Skinfolds {
            triceps,
            subscap,
            biceps,
            illiac,
            abdomen,
            thigh,
            calf,
        }
    }
}

/// A single measurement session for one athlete.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementRecord {
    pub id: AthleteId,
    /// `None` when the source date could not be parsed.
    pub date: Option<NaiveDate>,
    /// Body mass (kg).
    pub weight: f64,
    pub skinfolds: Skinfolds,
}

// ---------------------------------------------------------------------------
// RawTable – loader / filter output
// ---------------------------------------------------------------------------

/// Loaded rows reduced to the kept columns, in source order.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub labels: ColumnLabels,
    pub records: Vec<MeasurementRecord>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// WorkingSet – deriver output, read-only downstream
// ---------------------------------------------------------------------------

/// Body-composition indices computed for one record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedMetrics {
    /// Sum of the seven skinfold sites (mm).
    pub sum_of_seven: f64,
    /// `weight / sum_of_seven^0.14`.
    pub lean_mass_index: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub record: MeasurementRecord,
    pub metrics: DerivedMetrics,
}

/// The filtered, derived table that charts and export consume.
#[derive(Debug, Clone)]
pub struct WorkingSet {
    pub labels: ColumnLabels,
    pub measurements: Vec<Measurement>,
}

impl WorkingSet {
    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    /// Distinct athlete IDs in order of first appearance.
    pub fn athlete_ids(&self) -> Vec<AthleteId> {
        let mut seen = std::collections::HashSet::new();
        self.measurements
            .iter()
            .filter(|m| seen.insert(&m.record.id))
            .map(|m| m.record.id.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_athlete_id_parse() {
        assert_eq!(AthleteId::parse("12"), AthleteId::Integer(12));
        assert_eq!(AthleteId::parse(" 7.0 "), AthleteId::Integer(7));
        assert_eq!(AthleteId::parse("7.5"), AthleteId::Text("7.5".into()));
        assert_eq!(AthleteId::parse("AB-3"), AthleteId::Text("AB-3".into()));
    }

    #[test]
    fn test_blank_id_has_visible_name() {
        assert_eq!(AthleteId::Text(String::new()).to_string(), "(blank)");
        assert_eq!(AthleteId::parse("  ").to_string(), "(blank)");
        assert_eq!(AthleteId::Integer(3).to_string(), "3");
    }

    #[test]
    fn test_athlete_ids_first_appearance_order() {
        let make = |id: i64| Measurement {
            record: MeasurementRecord {
                id: AthleteId::Integer(id),
                date: None,
                weight: 70.0,
                skinfolds: Skinfolds::default(),
            },
            metrics: DerivedMetrics {
                sum_of_seven: 0.0,
                lean_mass_index: f64::INFINITY,
            },
        };
        let set = WorkingSet {
            labels: default_labels(),
            measurements: vec![make(3), make(1), make(3), make(2), make(1)],
        };
        assert_eq!(
            set.athlete_ids(),
            vec![
                AthleteId::Integer(3),
                AthleteId::Integer(1),
                AthleteId::Integer(2)
            ]
        );
    }

    #[test]
    fn test_skinfold_sites_roundtrip_order() {
        let sites = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let s = Skinfolds::from_sites(sites);
        assert_eq!(s.subscap, 2.0);
        assert_eq!(s.calf, 7.0);
        assert_eq!(s.sites(), sites);
    }
}
