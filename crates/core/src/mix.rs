//! Blend modes, interpolation and quick channel adjustments.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::convert::{clamp, parse_color, Hsl, Rgb};
use crate::error::{ColorError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    SoftLight,
    HardLight,
    ColorDodge,
    ColorBurn,
    Darken,
    Lighten,
    Difference,
    Exclusion,
}

impl BlendMode {
    pub const ALL: [BlendMode; 12] = [
        BlendMode::Normal,
        BlendMode::Multiply,
        BlendMode::Screen,
        BlendMode::Overlay,
        BlendMode::SoftLight,
        BlendMode::HardLight,
        BlendMode::ColorDodge,
        BlendMode::ColorBurn,
        BlendMode::Darken,
        BlendMode::Lighten,
        BlendMode::Difference,
        BlendMode::Exclusion,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BlendMode::Normal => "normal",
            BlendMode::Multiply => "multiply",
            BlendMode::Screen => "screen",
            BlendMode::Overlay => "overlay",
            BlendMode::SoftLight => "soft-light",
            BlendMode::HardLight => "hard-light",
            BlendMode::ColorDodge => "color-dodge",
            BlendMode::ColorBurn => "color-burn",
            BlendMode::Darken => "darken",
            BlendMode::Lighten => "lighten",
            BlendMode::Difference => "difference",
            BlendMode::Exclusion => "exclusion",
        }
    }

    /// Blend one 0-255 channel of `overlay` onto `base` at full opacity.
    fn channel(self, base: f64, overlay: f64) -> f64 {
        match self {
            BlendMode::Normal => overlay,
            BlendMode::Multiply => base * overlay / 255.0,
            BlendMode::Screen => 255.0 - (255.0 - base) * (255.0 - overlay) / 255.0,
            BlendMode::Overlay => hard_light(overlay, base),
            BlendMode::HardLight => hard_light(base, overlay),
            BlendMode::SoftLight => {
                let b = base / 255.0;
                let o = overlay / 255.0;
                if o < 0.5 {
                    255.0 * (b - (1.0 - 2.0 * o) * b * (1.0 - b))
                } else {
                    let d = if b < 0.25 { ((16.0 * b - 12.0) * b + 4.0) * b } else { b.sqrt() };
                    255.0 * (b + (2.0 * o - 1.0) * (d - b))
                }
            }
            BlendMode::ColorDodge => {
                if overlay >= 255.0 {
                    255.0
                } else {
                    (base * 255.0 / (255.0 - overlay)).min(255.0)
                }
            }
            BlendMode::ColorBurn => {
                if overlay <= 0.0 {
                    0.0
                } else {
                    (255.0 - (255.0 - base) * 255.0 / overlay).max(0.0)
                }
            }
            BlendMode::Darken => base.min(overlay),
            BlendMode::Lighten => base.max(overlay),
            BlendMode::Difference => (base - overlay).abs(),
            BlendMode::Exclusion => base + overlay - 2.0 * base * overlay / 255.0,
        }
    }
}

impl FromStr for BlendMode {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self> {
        BlendMode::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ColorError::InvalidArgument(format!("unknown blend mode: {}", s)))
    }
}

// Multiply below the midpoint of `mask`, screen above it
fn hard_light(base: f64, mask: f64) -> f64 {
    if mask < 128.0 {
        2.0 * base * mask / 255.0
    } else {
        255.0 - 2.0 * (255.0 - base) * (255.0 - mask) / 255.0
    }
}

fn over(base: Rgb, blended: [f64; 3], opacity: f64) -> Rgb {
    let mix = |b: u8, o: f64| b as f64 * (1.0 - opacity) + o * opacity;
    Rgb::from_f64(mix(base.r, blended[0]), mix(base.g, blended[1]), mix(base.b, blended[2]))
}

pub fn blend_rgb(base: Rgb, overlay: Rgb, mode: BlendMode, opacity: f64) -> Rgb {
    let opacity = clamp(opacity, 0.0, 1.0);
    let blended = [
        mode.channel(base.r as f64, overlay.r as f64),
        mode.channel(base.g as f64, overlay.g as f64),
        mode.channel(base.b as f64, overlay.b as f64),
    ];
    over(base, blended, opacity)
}

/// Composite `overlay` onto `base`; opacity is clamped into [0, 1].
pub fn blend_colors(base: &str, overlay: &str, mode: BlendMode, opacity: f64) -> Result<String> {
    Ok(blend_rgb(parse_color(base)?, parse_color(overlay)?, mode, opacity).to_hex())
}

pub fn interpolate_colors(color1: &str, color2: &str, factor: f64) -> Result<String> {
    Ok(parse_color(color1)?.mix(&parse_color(color2)?, factor).to_hex())
}

/// Evenly spaced RGB interpolation including both endpoints.
pub fn generate_color_gradient(start: &str, end: &str, steps: usize) -> Result<Vec<String>> {
    if steps < 2 {
        return Err(ColorError::InvalidArgument("gradient needs at least 2 steps".to_string()));
    }
    let from = parse_color(start)?;
    let to = parse_color(end)?;
    Ok((0..steps)
        .map(|i| from.mix(&to, i as f64 / (steps - 1) as f64).to_hex())
        .collect())
}

/// Positive amounts move toward white, negative toward black. Range ±100.
pub fn adjust_brightness(color: &str, amount: f64) -> Result<String> {
    let rgb = parse_color(color)?;
    let factor = clamp(amount, -100.0, 100.0) / 100.0;
    let adjust = |v: u8| {
        let v = v as f64;
        if factor > 0.0 {
            v + (255.0 - v) * factor
        } else {
            v + v * factor
        }
    };
    Ok(Rgb::from_f64(adjust(rgb.r), adjust(rgb.g), adjust(rgb.b)).to_hex())
}

pub fn adjust_saturation(color: &str, amount: f64) -> Result<String> {
    let hsl = parse_color(color)?.to_hsl().rounded();
    let amount = clamp(amount, -100.0, 100.0);
    Ok(Hsl::new(hsl.h, hsl.s + amount, hsl.l).to_hex())
}

pub fn adjust_hue(color: &str, degrees: f64) -> Result<String> {
    let hsl = parse_color(color)?.to_hsl().rounded();
    Ok(Hsl::new(hsl.h + degrees, hsl.s, hsl.l).to_hex())
}

fn spread(count: usize, from: f64, to: f64) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![0.0],
        n => (0..n).map(|i| from + (to - from) * i as f64 / (n - 1) as f64).collect(),
    }
}

/// Brightness steps from -40 to +40. A single color is the base itself.
pub fn monochromatic_palette(base: &str, count: usize) -> Result<Vec<String>> {
    parse_color(base)?;
    spread(count, -40.0, 40.0)
        .into_iter()
        .map(|amount| adjust_brightness(base, amount))
        .collect()
}

/// Hue steps from -30° to +30°.
pub fn analogous_palette(base: &str, count: usize) -> Result<Vec<String>> {
    parse_color(base)?;
    spread(count, -30.0, 30.0)
        .into_iter()
        .map(|shift| adjust_hue(base, shift))
        .collect()
}

fn rotations(base: &str, shifts: &[f64]) -> Result<Vec<String>> {
    let mut colors = vec![parse_color(base)?.to_hex()];
    for &shift in shifts {
        colors.push(adjust_hue(base, shift)?);
    }
    Ok(colors)
}

pub fn complementary_palette(base: &str) -> Result<Vec<String>> {
    rotations(base, &[180.0])
}

pub fn triadic_palette(base: &str) -> Result<Vec<String>> {
    rotations(base, &[120.0, 240.0])
}

pub fn tetradic_palette(base: &str) -> Result<Vec<String>> {
    rotations(base, &[90.0, 180.0, 270.0])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuickScheme {
    Monochromatic,
    Analogous,
    Complementary,
    Triadic,
    Tetradic,
}

/// Quick palette for `scheme`. `count` only applies to the monochromatic and
/// analogous spreads; the rotations have a fixed size.
pub fn quick_palette(base: &str, scheme: QuickScheme, count: usize) -> Result<Vec<String>> {
    match scheme {
        QuickScheme::Monochromatic => monochromatic_palette(base, count),
        QuickScheme::Analogous => analogous_palette(base, count),
        QuickScheme::Complementary => complementary_palette(base),
        QuickScheme::Triadic => triadic_palette(base),
        QuickScheme::Tetradic => tetradic_palette(base),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::hex_to_hsl;

    #[test]
    fn blend_mode_basics() {
        assert_eq!(blend_colors("#ff0000", "#0000ff", BlendMode::Normal, 1.0).unwrap(), "#0000ff");
        assert_eq!(blend_colors("#ff0000", "#0000ff", BlendMode::Normal, 0.0).unwrap(), "#ff0000");
        assert_eq!(blend_colors("#808080", "#ffffff", BlendMode::Multiply, 1.0).unwrap(), "#808080");
        assert_eq!(blend_colors("#808080", "#000000", BlendMode::Screen, 1.0).unwrap(), "#808080");
        assert_eq!(blend_colors("#ff8000", "#ff8000", BlendMode::Difference, 1.0).unwrap(), "#000000");
        assert_eq!(blend_colors("#102030", "#302010", BlendMode::Darken, 1.0).unwrap(), "#102010");
        assert_eq!(blend_colors("#102030", "#302010", BlendMode::Lighten, 1.0).unwrap(), "#302030");
    }

    #[test]
    fn dodge_and_burn_saturate() {
        assert_eq!(blend_colors("#808080", "#ffffff", BlendMode::ColorDodge, 1.0).unwrap(), "#ffffff");
        assert_eq!(blend_colors("#808080", "#000000", BlendMode::ColorBurn, 1.0).unwrap(), "#000000");
    }

    #[test]
    fn every_mode_accepts_extremes() {
        for mode in BlendMode::ALL {
            for (a, b) in [("#000000", "#ffffff"), ("#ffffff", "#000000"), ("#1890ff", "#faad14")] {
                let out = blend_colors(a, b, mode, 2.0).unwrap();
                assert!(crate::convert::is_valid_hex(&out), "{:?}", mode);
            }
        }
        assert_eq!("soft-light".parse::<BlendMode>().unwrap(), BlendMode::SoftLight);
    }

    #[test]
    fn gradient_requires_two_steps() {
        assert!(generate_color_gradient("#000000", "#ffffff", 1).is_err());
        let gradient = generate_color_gradient("#000000", "#ffffff", 3).unwrap();
        assert_eq!(gradient, vec!["#000000", "#808080", "#ffffff"]);
    }

    #[test]
    fn brightness_moves_toward_extremes() {
        assert_eq!(adjust_brightness("#808080", 100.0).unwrap(), "#ffffff");
        assert_eq!(adjust_brightness("#808080", -100.0).unwrap(), "#000000");
        assert_eq!(adjust_brightness("#808080", 0.0).unwrap(), "#808080");
    }

    #[test]
    fn hue_and_saturation_adjustments() {
        assert_eq!(adjust_hue("#ff0000", 120.0).unwrap(), "#00ff00");
        assert_eq!(adjust_hue("#ff0000", -120.0).unwrap(), "#0000ff");
        assert_eq!(hex_to_hsl(&adjust_saturation("#ff0000", -100.0).unwrap()).unwrap().s, 0.0);
    }

    #[test]
    fn quick_palettes() {
        assert_eq!(monochromatic_palette("#1890ff", 5).unwrap().len(), 5);
        assert_eq!(monochromatic_palette("#1890ff", 1).unwrap(), vec!["#1890ff"]);
        assert_eq!(analogous_palette("#ff0000", 3).unwrap()[1], "#ff0000");
        assert_eq!(complementary_palette("#FF0000").unwrap(), vec!["#ff0000", "#00ffff"]);
        assert_eq!(triadic_palette("#ff0000").unwrap().len(), 3);
        assert_eq!(tetradic_palette("#ff0000").unwrap()[2], "#00ffff");
    }
}
