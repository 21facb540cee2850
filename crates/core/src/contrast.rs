//! WCAG 2.1 contrast and legibility checks.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::convert::{parse_color, srgb_to_linear, Rgb};
use crate::error::Result;

/// Default perceived-brightness boundary between dark and light colors.
pub const DARK_THRESHOLD: u8 = 128;

/// Blend steps used to derive darker/lighter variants of a base color.
const VARIANT_STEPS: [f64; 4] = [0.2, 0.4, 0.6, 0.8];
const MAX_SUGGESTIONS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextSize {
    #[default]
    Normal,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum WcagLevel {
    #[default]
    AA,
    AAA,
}

impl WcagLevel {
    /// Minimum contrast ratio for this level at the given text size.
    pub fn threshold(self, size: TextSize) -> f64 {
        match (self, size) {
            (WcagLevel::AA, TextSize::Normal) => 4.5,
            (WcagLevel::AA, TextSize::Large) => 3.0,
            (WcagLevel::AAA, TextSize::Normal) => 7.0,
            (WcagLevel::AAA, TextSize::Large) => 4.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessibilityResult {
    pub ratio: f64,
    pub passes: bool,
    /// Highest level met, `None` when even AA fails.
    pub level: Option<WcagLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorPair {
    pub foreground: String,
    pub background: String,
    pub ratio: f64,
}

/// WCAG relative luminance of an sRGB color, in [0, 1].
pub fn get_relative_luminance(rgb: Rgb) -> f64 {
    0.2126 * srgb_to_linear(rgb.r) + 0.7152 * srgb_to_linear(rgb.g) + 0.0722 * srgb_to_linear(rgb.b)
}

/// Contrast ratio between two parsed colors, in [1, 21].
pub fn contrast_ratio(a: Rgb, b: Rgb) -> f64 {
    let l1 = get_relative_luminance(a);
    let l2 = get_relative_luminance(b);
    let (lighter, darker) = if l1 >= l2 { (l1, l2) } else { (l2, l1) };
    (lighter + 0.05) / (darker + 0.05)
}

pub fn get_contrast_ratio(color1: &str, color2: &str) -> Result<f64> {
    Ok(contrast_ratio(parse_color(color1)?, parse_color(color2)?))
}

pub fn is_accessible(foreground: &str, background: &str, level: WcagLevel, size: TextSize) -> Result<bool> {
    Ok(get_contrast_ratio(foreground, background)? >= level.threshold(size))
}

pub fn check_accessibility(foreground: &str, background: &str, size: TextSize) -> Result<AccessibilityResult> {
    let fg = parse_color(foreground)?;
    let bg = parse_color(background)?;
    let ratio = contrast_ratio(fg, bg);

    let level = if ratio >= WcagLevel::AAA.threshold(size) {
        Some(WcagLevel::AAA)
    } else if ratio >= WcagLevel::AA.threshold(size) {
        Some(WcagLevel::AA)
    } else {
        None
    };

    let recommendation = match level {
        Some(_) => None,
        None => {
            let target = WcagLevel::AA.threshold(size);
            let advice = if perceived_brightness(fg) > perceived_brightness(bg) {
                "Lighten the foreground or darken the background"
            } else {
                "Darken the foreground or lighten the background"
            };
            Some(format!(
                "{} to reach at least {:.1}:1 (currently {:.2}:1)",
                advice, target, ratio
            ))
        }
    };

    Ok(AccessibilityResult {
        ratio,
        passes: level.is_some(),
        level,
        recommendation,
    })
}

/// Foreground/background pairs derived from `base` that meet `level`.
///
/// Both orderings of each pair are considered. Results are deduplicated,
/// sorted by descending ratio and capped at ten.
pub fn get_accessible_color_suggestions(base: &str, level: WcagLevel, size: TextSize) -> Result<Vec<ColorPair>> {
    let rgb = parse_color(base)?;
    let threshold = level.threshold(size);

    let darker: Vec<Rgb> = VARIANT_STEPS.iter().map(|&t| rgb.mix(&Rgb::BLACK, t)).collect();
    let lighter: Vec<Rgb> = VARIANT_STEPS.iter().map(|&t| rgb.mix(&Rgb::WHITE, t)).collect();

    let mut seen = HashSet::new();
    let mut pairs = Vec::new();
    for dark in &darker {
        for light in &lighter {
            let ratio = contrast_ratio(*dark, *light);
            if ratio < threshold {
                continue;
            }
            for (fg, bg) in [(dark, light), (light, dark)] {
                if seen.insert((*fg, *bg)) {
                    pairs.push(ColorPair {
                        foreground: fg.to_hex(),
                        background: bg.to_hex(),
                        ratio,
                    });
                }
            }
        }
    }

    pairs.sort_by(|a, b| b.ratio.total_cmp(&a.ratio));
    pairs.truncate(MAX_SUGGESTIONS);
    Ok(pairs)
}

/// ITU-R BT.601 luma, rounded to an 8-bit value.
pub fn perceived_brightness(rgb: Rgb) -> u8 {
    (0.299 * rgb.r as f64 + 0.587 * rgb.g as f64 + 0.114 * rgb.b as f64)
        .round()
        .min(255.0) as u8
}

pub fn get_perceived_brightness(color: &str) -> Result<u8> {
    Ok(perceived_brightness(parse_color(color)?))
}

pub fn is_dark(color: &str, threshold: u8) -> Result<bool> {
    Ok(get_perceived_brightness(color)? < threshold)
}

pub fn is_light(color: &str, threshold: u8) -> Result<bool> {
    Ok(!is_dark(color, threshold)?)
}

/// Pure white on dark backgrounds, pure black otherwise.
pub fn get_best_text_color(background: &str) -> Result<String> {
    get_best_text_color_with(background, DARK_THRESHOLD)
}

/// [`get_best_text_color`] with a caller-chosen darkness threshold.
pub fn get_best_text_color_with(background: &str, threshold: u8) -> Result<String> {
    let color = if is_dark(background, threshold)? { "#ffffff" } else { "#000000" };
    Ok(color.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ColorError;

    #[test]
    fn black_on_white_is_21() {
        let ratio = get_contrast_ratio("#000000", "#ffffff").unwrap();
        assert!((ratio - 21.0).abs() < 0.01);
    }

    #[test]
    fn identical_colors_are_exactly_one() {
        assert_eq!(get_contrast_ratio("#ff0000", "#ff0000").unwrap(), 1.0);
        assert_eq!(get_contrast_ratio("#1890ff", "1890FF").unwrap(), 1.0);
    }

    #[test]
    fn ratio_is_symmetric() {
        let a = get_contrast_ratio("#1890ff", "#fafafa").unwrap();
        let b = get_contrast_ratio("#fafafa", "#1890ff").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_input_is_rejected() {
        assert_eq!(
            get_contrast_ratio("#zzzzzz", "#ffffff"),
            Err(ColorError::InvalidColor("#zzzzzz".into()))
        );
        assert!(check_accessibility("#000", "oops", TextSize::Normal).is_err());
    }

    #[test]
    fn black_on_white_reaches_aaa() {
        let result = check_accessibility("#000000", "#ffffff", TextSize::Normal).unwrap();
        assert!(result.passes);
        assert_eq!(result.level, Some(WcagLevel::AAA));
        assert!(result.recommendation.is_none());
    }

    #[test]
    fn large_text_uses_relaxed_thresholds() {
        // #777777 on white sits between 3 and 4.5
        let normal = check_accessibility("#777777", "#ffffff", TextSize::Normal).unwrap();
        let large = check_accessibility("#777777", "#ffffff", TextSize::Large).unwrap();
        assert!(!normal.passes);
        assert_eq!(large.level, Some(WcagLevel::AA));
    }

    #[test]
    fn failing_pair_recommends_direction() {
        let dark_on_light = check_accessibility("#777777", "#ffffff", TextSize::Normal).unwrap();
        assert!(dark_on_light.recommendation.unwrap().starts_with("Darken the foreground"));

        let light_on_dark = check_accessibility("#888888", "#000000", TextSize::Large).unwrap();
        assert!(light_on_dark.passes);

        let light_on_mid = check_accessibility("#cccccc", "#999999", TextSize::Normal).unwrap();
        assert!(light_on_mid.recommendation.unwrap().starts_with("Lighten the foreground"));
    }

    #[test]
    fn suggestions_are_sorted_capped_and_passing() {
        let pairs = get_accessible_color_suggestions("#1890ff", WcagLevel::AA, TextSize::Normal).unwrap();
        assert!(!pairs.is_empty());
        assert!(pairs.len() <= 10);
        for window in pairs.windows(2) {
            assert!(window[0].ratio >= window[1].ratio);
        }
        for pair in &pairs {
            assert!(pair.ratio >= 4.5);
            let recomputed = get_contrast_ratio(&pair.foreground, &pair.background).unwrap();
            assert!((recomputed - pair.ratio).abs() < 1e-9);
        }
        let unique: HashSet<_> = pairs.iter().map(|p| (&p.foreground, &p.background)).collect();
        assert_eq!(unique.len(), pairs.len());
    }

    #[test]
    fn brightness_and_text_color() {
        assert_eq!(get_perceived_brightness("#ffffff").unwrap(), 255);
        assert_eq!(get_perceived_brightness("#000000").unwrap(), 0);
        assert_eq!(get_perceived_brightness("#ff0000").unwrap(), 76);
        assert!(is_dark("#1a1a1a", DARK_THRESHOLD).unwrap());
        assert!(is_light("#f0f0f0", DARK_THRESHOLD).unwrap());
        assert_eq!(get_best_text_color("#001529").unwrap(), "#ffffff");
        assert_eq!(get_best_text_color("#fafafa").unwrap(), "#000000");
    }

    #[test]
    fn text_color_follows_threshold() {
        assert_eq!(get_perceived_brightness("#808080").unwrap(), 128);
        assert_eq!(get_best_text_color("#808080").unwrap(), "#000000");
        assert_eq!(get_best_text_color_with("#808080", 200).unwrap(), "#ffffff");
        assert_eq!(get_best_text_color_with("#808080", 128).unwrap(), "#000000");
    }
}
