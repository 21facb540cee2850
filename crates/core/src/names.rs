//! Nearest human-readable name for a color.

use serde::{Deserialize, Serialize};

use crate::convert::{delta_e, hex_to_rgb, parse_color};
use crate::error::{ColorError, Result};

/// Reference colors, CSS names where one exists.
pub static NAMED_COLORS: &[(&str, &str)] = &[
    ("black", "#000000"),
    ("white", "#ffffff"),
    ("gray", "#808080"),
    ("silver", "#c0c0c0"),
    ("dim gray", "#696969"),
    ("gainsboro", "#dcdcdc"),
    ("red", "#ff0000"),
    ("dark red", "#8b0000"),
    ("crimson", "#dc143c"),
    ("salmon", "#fa8072"),
    ("coral", "#ff7f50"),
    ("tomato", "#ff6347"),
    ("orange", "#ffa500"),
    ("dark orange", "#ff8c00"),
    ("gold", "#ffd700"),
    ("yellow", "#ffff00"),
    ("khaki", "#f0e68c"),
    ("olive", "#808000"),
    ("chartreuse", "#7fff00"),
    ("lime", "#00ff00"),
    ("green", "#008000"),
    ("forest green", "#228b22"),
    ("sea green", "#2e8b57"),
    ("mint", "#98ff98"),
    ("teal", "#008080"),
    ("turquoise", "#40e0d0"),
    ("cyan", "#00ffff"),
    ("sky blue", "#87ceeb"),
    ("dodger blue", "#1e90ff"),
    ("royal blue", "#4169e1"),
    ("blue", "#0000ff"),
    ("navy", "#000080"),
    ("indigo", "#4b0082"),
    ("slate blue", "#6a5acd"),
    ("purple", "#800080"),
    ("violet", "#ee82ee"),
    ("magenta", "#ff00ff"),
    ("orchid", "#da70d6"),
    ("pink", "#ffc0cb"),
    ("hot pink", "#ff69b4"),
    ("maroon", "#800000"),
    ("brown", "#a52a2a"),
    ("chocolate", "#d2691e"),
    ("tan", "#d2b48c"),
    ("beige", "#f5f5dc"),
    ("ivory", "#fffff0"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorName {
    pub name: String,
    pub hex: String,
    /// CIE76 ΔE between the input and the named color
    pub distance: f64,
}

pub fn nearest_color_name(color: &str) -> Result<ColorName> {
    let lab = parse_color(color)?.to_lab();

    let mut best: Option<ColorName> = None;
    for &(name, hex) in NAMED_COLORS {
        let Some(reference) = hex_to_rgb(hex) else { continue };
        let distance = delta_e(&lab, &reference.to_lab());
        if best.as_ref().map_or(true, |b| distance < b.distance) {
            best = Some(ColorName {
                name: name.to_string(),
                hex: hex.to_string(),
                distance,
            });
        }
    }

    best.ok_or_else(|| ColorError::InvalidArgument("no named colors available".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_has_zero_distance() {
        let name = nearest_color_name("#1E90FF").unwrap();
        assert_eq!(name.name, "dodger blue");
        assert!(name.distance < 1e-9);
    }

    #[test]
    fn near_colors_resolve() {
        assert_eq!(nearest_color_name("#fe0101").unwrap().name, "red");
        assert_eq!(nearest_color_name("#7f7f7f").unwrap().name, "gray");
    }

    #[test]
    fn table_entries_are_valid_and_unique() {
        let mut seen = std::collections::HashSet::new();
        for &(name, hex) in NAMED_COLORS {
            assert!(hex_to_rgb(hex).is_some(), "{}", name);
            assert!(seen.insert(hex), "{}", hex);
        }
    }

    #[test]
    fn invalid_input_fails() {
        assert!(nearest_color_name("blue").is_err());
    }
}
