use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::AthleteId;
use crate::view::Metric;

pub const SALMON: Color32 = Color32::from_rgb(250, 128, 114);
pub const CADET_BLUE: Color32 = Color32::from_rgb(95, 158, 160);
pub const LIGHT_SLATE_GRAY: Color32 = Color32::from_rgb(119, 136, 153);

/// Signature colour of each metric's charts.
pub fn metric_color(metric: Metric) -> Color32 {
    match metric {
        Metric::LeanMassIndex => SALMON,
        Metric::SumOfSeven => CADET_BLUE,
    }
}

// ---------------------------------------------------------------------------
// Shade generator
// ---------------------------------------------------------------------------

/// Generates `n` shades of `base`, keeping its hue and saturation and
/// spreading lightness evenly between 35% and 75%.
pub fn generate_shades(base: Color32, n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    let rgb = Srgb::new(
        base.r() as f32 / 255.0,
        base.g() as f32 / 255.0,
        base.b() as f32 / 255.0,
    );
    let hsl: Hsl = rgb.into_color();
    (0..n)
        .map(|i| {
            let t = if n == 1 { 0.5 } else { i as f32 / (n - 1) as f32 };
            let shade = Hsl::new(hsl.hue, hsl.saturation, 0.35 + 0.4 * t);
            let rgb: Srgb = shade.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0).round() as u8,
                (rgb.green * 255.0).round() as u8,
                (rgb.blue * 255.0).round() as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: athlete → Color32
// ---------------------------------------------------------------------------

/// Maps athletes of the cohort chart to shades of the metric colour.
#[derive(Debug, Clone)]
pub struct AthleteColors {
    mapping: BTreeMap<AthleteId, Color32>,
    default_color: Color32,
}

impl AthleteColors {
    pub fn new(metric: Metric, athletes: &[AthleteId]) -> Self {
        let base = metric_color(metric);
        let mapping = athletes
            .iter()
            .cloned()
            .zip(generate_shades(base, athletes.len()))
            .collect();
        AthleteColors {
            mapping,
            default_color: base,
        }
    }

    pub fn color_for(&self, id: &AthleteId) -> Color32 {
        self.mapping.get(id).copied().unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shade_count() {
        assert!(generate_shades(SALMON, 0).is_empty());
        assert_eq!(generate_shades(SALMON, 1).len(), 1);
        assert_eq!(generate_shades(CADET_BLUE, 6).len(), 6);
    }

    #[test]
    fn test_shades_get_lighter() {
        let shades = generate_shades(CADET_BLUE, 4);
        let brightness = |c: &Color32| c.r() as u32 + c.g() as u32 + c.b() as u32;
        for pair in shades.windows(2) {
            assert!(brightness(&pair[0]) < brightness(&pair[1]));
        }
    }

    #[test]
    fn test_unknown_athlete_gets_metric_color() {
        let ids = vec![AthleteId::Integer(1), AthleteId::Integer(2)];
        let colors = AthleteColors::new(Metric::LeanMassIndex, &ids);
        assert_ne!(colors.color_for(&ids[0]), colors.color_for(&ids[1]));
        assert_eq!(colors.color_for(&AthleteId::Integer(99)), SALMON);
    }
}
