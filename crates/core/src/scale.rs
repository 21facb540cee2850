//! Ordered 10-step color scales per semantic category and theme mode.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::convert::{hsl_to_hex, parse_color, Rgb};
use crate::error::{ColorError, Result};
use crate::interp::{lerp, smoothstep};
use crate::ramp::{dark_ramp, light_ramp, RAMP_LEN};

/// Gray anchor lightness values, light to dark.
pub const LIGHT_GRAY_ANCHORS: [f64; 4] = [88.0, 68.0, 45.0, 22.0];
/// Gray anchor lightness values, dark to light.
pub const DARK_GRAY_ANCHORS: [f64; 4] = [22.0, 38.0, 58.0, 85.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl FromStr for ThemeMode {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            _ => Err(ColorError::InvalidArgument(format!("unknown theme mode: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleCategory {
    Primary,
    Success,
    Warning,
    Danger,
    Gray,
    Border,
    Background,
    Text,
    White,
    Shadow,
}

impl ScaleCategory {
    pub const ALL: [ScaleCategory; 10] = [
        ScaleCategory::Primary,
        ScaleCategory::Success,
        ScaleCategory::Warning,
        ScaleCategory::Danger,
        ScaleCategory::Gray,
        ScaleCategory::Border,
        ScaleCategory::Background,
        ScaleCategory::Text,
        ScaleCategory::White,
        ScaleCategory::Shadow,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ScaleCategory::Primary => "primary",
            ScaleCategory::Success => "success",
            ScaleCategory::Warning => "warning",
            ScaleCategory::Danger => "danger",
            ScaleCategory::Gray => "gray",
            ScaleCategory::Border => "border",
            ScaleCategory::Background => "background",
            ScaleCategory::Text => "text",
            ScaleCategory::White => "white",
            ScaleCategory::Shadow => "shadow",
        }
    }
}

impl fmt::Display for ScaleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScaleCategory {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self> {
        ScaleCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ColorError::InvalidArgument(format!("unknown scale category: {}", s)))
    }
}

/// Ten ordered hex colors plus the step index each one is published under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorScale {
    pub colors: Vec<String>,
    pub indices: BTreeMap<u32, String>,
}

impl ColorScale {
    fn from_colors(colors: Vec<String>, indices: &[u32]) -> Self {
        let indices = indices.iter().copied().zip(colors.iter().cloned()).collect();
        Self { colors, indices }
    }

    /// Color published under `index`, if any.
    pub fn get(&self, index: u32) -> Option<&str> {
        self.indices.get(&index).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleSet {
    pub scales: BTreeMap<ScaleCategory, ColorScale>,
    pub warnings: Vec<String>,
}

const DEFAULT_INDICES: [u32; RAMP_LEN] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];

/// Lightness of gray step `step` (0-based) interpolated across four anchors.
pub fn gray_lightness(anchors: &[f64; 4], step: usize) -> f64 {
    let t = step as f64 / (RAMP_LEN - 1) as f64;
    let scaled = t * 3.0;
    let segment = scaled.floor() as usize;
    if segment >= 3 {
        return anchors[3];
    }
    let local = scaled - segment as f64;
    lerp(anchors[segment], anchors[segment + 1], smoothstep(local))
}

fn gray_scale(mode: ThemeMode) -> Vec<String> {
    let anchors = match mode {
        ThemeMode::Light => &LIGHT_GRAY_ANCHORS,
        ThemeMode::Dark => &DARK_GRAY_ANCHORS,
    };
    (0..RAMP_LEN)
        .map(|step| hsl_to_hex(0.0, 0.0, gray_lightness(anchors, step)))
        .collect()
}

fn scale_colors(seed: Rgb, category: ScaleCategory, mode: ThemeMode) -> Vec<String> {
    if category == ScaleCategory::Gray {
        return gray_scale(mode);
    }
    let ramp = match mode {
        ThemeMode::Light => light_ramp(seed),
        ThemeMode::Dark => dark_ramp(seed),
    };
    ramp.iter().map(Rgb::to_hex).collect()
}

pub fn generate_scale(color: &str, category: ScaleCategory, mode: ThemeMode) -> Result<ColorScale> {
    generate_scale_with_indices(color, category, mode, &DEFAULT_INDICES)
}

/// Like [`generate_scale`] but publishes the steps under caller-chosen
/// indices. Exactly ten distinct indices are required.
pub fn generate_scale_with_indices(
    color: &str,
    category: ScaleCategory,
    mode: ThemeMode,
    indices: &[u32],
) -> Result<ColorScale> {
    if indices.len() != RAMP_LEN {
        return Err(ColorError::InvalidArgument(format!(
            "expected {} scale indices, got {}",
            RAMP_LEN,
            indices.len()
        )));
    }
    let mut sorted = indices.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    if sorted.len() != RAMP_LEN {
        return Err(ColorError::InvalidArgument("scale indices must be distinct".to_string()));
    }

    let seed = parse_color(color)?;
    Ok(ColorScale::from_colors(scale_colors(seed, category, mode), indices))
}

/// The seed repeated across every step. Stands in for a category that failed.
pub fn fallback_scale(color: &str) -> ColorScale {
    ColorScale::from_colors(vec![color.to_string(); RAMP_LEN], &DEFAULT_INDICES)
}

/// Batch generation. A category with an invalid seed gets [`fallback_scale`]
/// and a warning; the other categories are unaffected.
pub fn generate_scales<S: AsRef<str>>(colors: &BTreeMap<ScaleCategory, S>, mode: ThemeMode) -> ScaleSet {
    let mut scales = BTreeMap::new();
    let mut warnings = Vec::new();

    for (&category, color) in colors {
        let color = color.as_ref();
        let scale = match generate_scale(color, category, mode) {
            Ok(scale) => scale,
            Err(e) => {
                crate::log_warn!("Failed to generate {} scale: {}", category, e);
                warnings.push(format!("{}: {}", category, e));
                fallback_scale(color)
            }
        };
        scales.insert(category, scale);
    }

    ScaleSet { scales, warnings }
}

/// Seed colors of the neutral categories for a mode.
pub fn neutral_seeds(mode: ThemeMode) -> BTreeMap<ScaleCategory, &'static str> {
    let seeds = match mode {
        ThemeMode::Light => [
            (ScaleCategory::Border, "#d9d9d9"),
            (ScaleCategory::Background, "#f5f5f5"),
            (ScaleCategory::Text, "#262626"),
            (ScaleCategory::White, "#ffffff"),
            (ScaleCategory::Shadow, "#000000"),
        ],
        ThemeMode::Dark => [
            (ScaleCategory::Border, "#434343"),
            (ScaleCategory::Background, "#141414"),
            (ScaleCategory::Text, "#f0f0f0"),
            (ScaleCategory::White, "#1f1f1f"),
            (ScaleCategory::Shadow, "#000000"),
        ],
    };
    seeds.into_iter().collect()
}

pub fn generate_neutral_colors(mode: ThemeMode) -> BTreeMap<ScaleCategory, ColorScale> {
    generate_scales(&neutral_seeds(mode), mode).scales
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::hex_to_hsl;

    fn lightness(hex: &str) -> f64 {
        hex_to_hsl(hex).unwrap().l
    }

    #[test]
    fn primary_scale_has_ten_steps_and_seed_at_six() {
        let scale = generate_scale("#1890FF", ScaleCategory::Primary, ThemeMode::Light).unwrap();
        assert_eq!(scale.colors.len(), 10);
        assert_eq!(scale.indices.len(), 10);
        assert_eq!(scale.get(6), Some("#1890ff"));
    }

    #[test]
    fn gray_light_descends() {
        let scale = generate_scale("#1890ff", ScaleCategory::Gray, ThemeMode::Light).unwrap();
        for pair in scale.colors.windows(2) {
            assert!(lightness(&pair[0]) >= lightness(&pair[1]));
        }
        assert!((lightness(&scale.colors[0]) - 88.0).abs() <= 1.0);
        assert!((lightness(&scale.colors[9]) - 22.0).abs() <= 1.0);
    }

    #[test]
    fn gray_dark_ascends() {
        let scale = generate_scale("#1890ff", ScaleCategory::Gray, ThemeMode::Dark).unwrap();
        for pair in scale.colors.windows(2) {
            assert!(lightness(&pair[0]) <= lightness(&pair[1]));
        }
        assert!((lightness(&scale.colors[0]) - 22.0).abs() <= 1.0);
        assert!((lightness(&scale.colors[9]) - 85.0).abs() <= 1.0);
    }

    #[test]
    fn gray_is_neutral_whatever_the_seed() {
        let scale = generate_scale("#ff00aa", ScaleCategory::Gray, ThemeMode::Light).unwrap();
        for hex in &scale.colors {
            assert_eq!(hex_to_hsl(hex).unwrap().s, 0.0);
        }
    }

    #[test]
    fn gray_lightness_uses_smoothstep_between_anchors() {
        let anchors = LIGHT_GRAY_ANCHORS;
        assert_eq!(gray_lightness(&anchors, 0), 88.0);
        assert_eq!(gray_lightness(&anchors, 9), 22.0);
        // step 1 sits a third of the way into the first segment
        let expected = 88.0 + (68.0 - 88.0) * smoothstep(1.0 / 3.0);
        assert!((gray_lightness(&anchors, 1) - expected).abs() < 1e-9);
    }

    #[test]
    fn invalid_seed_names_the_input() {
        let err = generate_scale("not-a-color", ScaleCategory::Primary, ThemeMode::Light).unwrap_err();
        assert_eq!(err, ColorError::InvalidColor("not-a-color".into()));
    }

    #[test]
    fn custom_indices() {
        let indices = [50, 100, 200, 300, 400, 500, 600, 700, 800, 900];
        let scale = generate_scale_with_indices("#52c41a", ScaleCategory::Success, ThemeMode::Light, &indices).unwrap();
        assert_eq!(scale.get(500), Some("#52c41a"));
        assert!(generate_scale_with_indices("#52c41a", ScaleCategory::Success, ThemeMode::Light, &[1, 2]).is_err());
        assert!(generate_scale_with_indices("#52c41a", ScaleCategory::Success, ThemeMode::Light, &[1; 10]).is_err());
    }

    #[test]
    fn batch_isolates_failures() {
        let mut colors = BTreeMap::new();
        colors.insert(ScaleCategory::Primary, "#1890ff");
        colors.insert(ScaleCategory::Danger, "nope");
        let set = generate_scales(&colors, ThemeMode::Light);

        assert_eq!(set.scales.len(), 2);
        assert_eq!(set.scales[&ScaleCategory::Primary].get(6), Some("#1890ff"));
        assert_eq!(set.scales[&ScaleCategory::Danger].colors, vec!["nope".to_string(); 10]);
        assert_eq!(set.warnings.len(), 1);
        assert!(set.warnings[0].starts_with("danger"));
    }

    #[test]
    fn neutral_colors_cover_five_categories() {
        for mode in [ThemeMode::Light, ThemeMode::Dark] {
            let neutrals = generate_neutral_colors(mode);
            assert_eq!(neutrals.len(), 5);
            assert!(neutrals.values().all(|s| s.colors.len() == 10));
        }
    }

    #[test]
    fn category_names_parse() {
        assert_eq!("Gray".parse::<ScaleCategory>().unwrap(), ScaleCategory::Gray);
        assert!("teal".parse::<ScaleCategory>().is_err());
        assert_eq!("dark".parse::<ThemeMode>().unwrap(), ThemeMode::Dark);
    }
}
