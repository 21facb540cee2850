//! Semantic companion colors derived from a primary color, and full themes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::convert::{clamp, hsl_to_hex, normalize_hue, parse_color, Hsl};
use crate::error::Result;
use crate::scale::{generate_neutral_colors, generate_scales, ColorScale, ScaleCategory, ThemeMode};

/// Base gray lightness values: light, mid-light, mid-dark, dark.
pub const BASE_GRAY_LIGHTNESS: [f64; 4] = [88.0, 68.0, 45.0, 22.0];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemanticColors {
    pub success: String,
    pub warning: String,
    pub danger: String,
    pub gray: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub mode: ThemeMode,
    pub primary: String,
    pub semantic: SemanticColors,
    pub scales: BTreeMap<ScaleCategory, ColorScale>,
    pub neutrals: BTreeMap<ScaleCategory, ColorScale>,
    pub warnings: Vec<String>,
}

fn primary_hsl(primary: &str) -> Result<Hsl> {
    Ok(parse_color(primary)?.to_hsl().rounded())
}

fn success(p: &Hsl) -> String {
    let hue = if (90.0..=150.0).contains(&p.h) {
        normalize_hue(p.h + 15.0)
    } else if (0.0..=60.0).contains(&p.h) {
        110.0
    } else if (180.0..=270.0).contains(&p.h) {
        130.0
    } else {
        120.0
    };
    let lightness = if p.l < 40.0 {
        45.0
    } else if p.l > 70.0 {
        55.0
    } else {
        p.l
    };
    hsl_to_hex(hue, clamp(p.s * 0.9, 40.0, 85.0), lightness)
}

fn warning(p: &Hsl) -> String {
    let hue = if (20.0..=70.0).contains(&p.h) {
        normalize_hue(p.h + 10.0)
    } else if (180.0..=270.0).contains(&p.h) {
        25.0
    } else if (90.0..=150.0).contains(&p.h) {
        15.0
    } else {
        35.0
    };
    hsl_to_hex(hue, clamp(p.s * 1.1, 60.0, 95.0), clamp(p.l * 1.1, 50.0, 70.0))
}

fn danger(p: &Hsl) -> String {
    let hue = if p.h >= 330.0 || p.h <= 30.0 {
        normalize_hue(p.h - 10.0)
    } else if (30.0..=90.0).contains(&p.h) {
        10.0
    } else if (240.0..=300.0).contains(&p.h) {
        350.0
    } else {
        0.0
    };
    hsl_to_hex(hue, clamp(p.s * 0.95, 65.0, 90.0), clamp(p.l * 0.9, 40.0, 60.0))
}

/// Hue and saturation shared by every generated gray.
fn gray_tone(p: &Hsl, config: &EngineConfig) -> (f64, f64) {
    if config.gray_mix_primary {
        (p.h, clamp(p.s * 0.2, 3.0, 15.0))
    } else {
        (0.0, 0.0)
    }
}

pub fn generate_semantic_colors(primary: &str, config: &EngineConfig) -> Result<SemanticColors> {
    let p = primary_hsl(primary)?;
    let (gray_h, gray_s) = gray_tone(&p, config);
    Ok(SemanticColors {
        success: success(&p),
        warning: warning(&p),
        danger: danger(&p),
        gray: hsl_to_hex(gray_h, gray_s, 55.0),
    })
}

/// Semantic colors for `mode`; dark mode runs each through [`adjust_for_dark_mode`].
pub fn generate_semantic_colors_for_mode(
    primary: &str,
    mode: ThemeMode,
    config: &EngineConfig,
) -> Result<SemanticColors> {
    let colors = generate_semantic_colors(primary, config)?;
    match mode {
        ThemeMode::Light => Ok(colors),
        ThemeMode::Dark => Ok(SemanticColors {
            success: adjust_for_dark_mode(&colors.success)?,
            warning: adjust_for_dark_mode(&colors.warning)?,
            danger: adjust_for_dark_mode(&colors.danger)?,
            gray: adjust_for_dark_mode(&colors.gray)?,
        }),
    }
}

pub fn base_grays(primary: &str, config: &EngineConfig) -> Result<Vec<String>> {
    let p = primary_hsl(primary)?;
    let (hue, saturation) = gray_tone(&p, config);
    Ok(BASE_GRAY_LIGHTNESS
        .iter()
        .map(|&l| hsl_to_hex(hue, saturation, l))
        .collect())
}

/// Darken and slightly saturate a color for dark backgrounds.
pub fn adjust_for_dark_mode(color: &str) -> Result<String> {
    let hsl = primary_hsl(color)?;
    Ok(hsl_to_hex(hsl.h, (hsl.s * 1.1).min(100.0), (hsl.l * 0.7).max(20.0)))
}

/// Semantic colors, their scales and the neutral scales for one mode.
pub fn generate_theme(primary: &str, mode: ThemeMode, config: &EngineConfig) -> Result<Theme> {
    let primary = parse_color(primary)?.to_hex();
    let seeds = generate_semantic_colors(&primary, config)?;

    let mut by_category = BTreeMap::new();
    by_category.insert(ScaleCategory::Primary, primary.clone());
    by_category.insert(ScaleCategory::Success, seeds.success.clone());
    by_category.insert(ScaleCategory::Warning, seeds.warning.clone());
    by_category.insert(ScaleCategory::Danger, seeds.danger.clone());
    by_category.insert(ScaleCategory::Gray, seeds.gray.clone());
    let set = generate_scales(&by_category, mode);

    crate::log_info!("Generated {:?} theme for {}", mode, primary);

    Ok(Theme {
        mode,
        semantic: generate_semantic_colors_for_mode(&primary, mode, config)?,
        primary,
        scales: set.scales,
        neutrals: generate_neutral_colors(mode),
        warnings: set.warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::hex_to_hsl;

    #[test]
    fn blue_primary_gets_teal_green_and_warm_orange() {
        let colors = generate_semantic_colors("#1890ff", &EngineConfig::default()).unwrap();
        let success = hex_to_hsl(&colors.success).unwrap();
        let warning = hex_to_hsl(&colors.warning).unwrap();
        let danger = hex_to_hsl(&colors.danger).unwrap();
        assert!((success.h - 130.0).abs() <= 1.0);
        assert!((warning.h - 25.0).abs() <= 1.0);
        assert!(danger.h <= 1.0 || danger.h >= 359.0);
        assert_eq!(colors.gray, hsl_to_hex(0.0, 0.0, 55.0));
    }

    #[test]
    fn green_primary_shifts_success_hue() {
        let colors = generate_semantic_colors("#52c41a", &EngineConfig::default()).unwrap();
        let primary = hex_to_hsl("#52c41a").unwrap();
        let success = hex_to_hsl(&colors.success).unwrap();
        assert!((success.h - (primary.h + 15.0)).abs() <= 1.5);
    }

    #[test]
    fn tinted_grays_follow_primary_hue() {
        let config = EngineConfig { gray_mix_primary: true, ..EngineConfig::default() };
        let grays = base_grays("#1890ff", &config).unwrap();
        assert_eq!(grays.len(), 4);
        let first = hex_to_hsl(&grays[0]).unwrap();
        assert!(first.s > 0.0);
        assert!((first.l - 88.0).abs() <= 1.0);

        let neutral = base_grays("#1890ff", &EngineConfig::default()).unwrap();
        assert_eq!(neutral[3], hsl_to_hex(0.0, 0.0, 22.0));
    }

    #[test]
    fn dark_mode_darkens() {
        let dark = adjust_for_dark_mode("#52c41a").unwrap();
        assert!(hex_to_hsl(&dark).unwrap().l < hex_to_hsl("#52c41a").unwrap().l);
        assert_eq!(hex_to_hsl(&adjust_for_dark_mode("#111111").unwrap()).unwrap().l, 20.0);
    }

    #[test]
    fn theme_has_all_scales() {
        let theme = generate_theme("#1890FF", ThemeMode::Light, &EngineConfig::default()).unwrap();
        assert_eq!(theme.primary, "#1890ff");
        assert_eq!(theme.scales.len(), 5);
        assert_eq!(theme.neutrals.len(), 5);
        assert!(theme.warnings.is_empty());
        assert_eq!(theme.scales[&ScaleCategory::Primary].get(6), Some("#1890ff"));
        assert!(generate_theme("bad", ThemeMode::Dark, &EngineConfig::default()).is_err());
    }
}
