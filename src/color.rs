use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: class label → Color32
// ---------------------------------------------------------------------------

/// Maps normalised class labels (see `StudentRecord::class_key`) to
/// distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new(class_keys: &BTreeSet<String>) -> Self {
        let palette = generate_palette(class_keys.len());
        let mapping = class_keys.iter().cloned().zip(palette).collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a class key.
    pub fn color_for(&self, class_key: &str) -> Color32 {
        self.mapping
            .get(class_key)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colours_are_distinct() {
        let palette = generate_palette(4);
        assert_eq!(palette.len(), 4);
        let unique: std::collections::HashSet<_> = palette.iter().map(|c| c.to_array()).collect();
        assert_eq!(unique.len(), 4);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn unknown_class_gets_the_default_colour() {
        let keys: BTreeSet<String> = ["A".to_string(), "B".to_string()].into();
        let map = ColorMap::new(&keys);
        assert_ne!(map.color_for("A"), map.color_for("B"));
        assert_eq!(map.color_for("Z"), Color32::GRAY);
    }
}
