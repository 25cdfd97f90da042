use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Bar colours
// ---------------------------------------------------------------------------

/// Hue step between consecutive bars, in degrees.
const HUE_STEP: f32 = 137.508;

/// Colour of the `i`-th bar.  Hues advance by the golden angle so that
/// neighbouring bars never get similar colours however many categories
/// there are; lightness alternates to separate bars of close hue.
pub fn category_color(i: usize) -> Color32 {
    let hue = (210.0 + i as f32 * HUE_STEP) % 360.0;
    let lightness = if i % 2 == 0 { 0.52 } else { 0.64 };
    let rgb: Srgb = Hsl::new(hue, 0.7, lightness).into_color();
    let [r, g, b] =
        [rgb.red, rgb.green, rgb.blue].map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
    Color32::from_rgb(r, g, b)
}

// ---------------------------------------------------------------------------
// Category label → Color32
// ---------------------------------------------------------------------------

/// Maps the category labels of a chart's x axis to bar colours, in order
/// of first appearance.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new(labels: &[String]) -> Self {
        let mapping = labels
            .iter()
            .enumerate()
            .map(|(i, label)| (label.clone(), category_color(i)))
            .collect();
        ColorMap {
            mapping,
            default_color: Color32::LIGHT_BLUE,
        }
    }

    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbouring_bars_differ() {
        for i in 0..24 {
            assert_ne!(category_color(i), category_color(i + 1));
        }
    }

    #[test]
    fn labels_keep_their_colour() {
        let labels = vec!["Oslo".to_string(), "Bergen".to_string()];
        let map = ColorMap::new(&labels);
        assert_eq!(map.color_for("Oslo"), category_color(0));
        assert_eq!(map.color_for("Bergen"), category_color(1));
        assert_eq!(map.color_for("Tromsø"), Color32::LIGHT_BLUE);
    }
}
