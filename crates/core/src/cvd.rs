//! Color vision deficiency simulation.
//!
//! Each simulation is a pure pipeline: sRGB -> linear -> 3x3 cone matrix ->
//! gamma encode -> severity blend against the original. Matrix results are
//! memoized per simulator instance.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::cache::{CacheStats, MemoCache};
use crate::config::EngineConfig;
use crate::contrast::contrast_ratio;
use crate::convert::{clamp, linear_to_srgb, parse_color, srgb_to_linear, Hsl, Rgb};
use crate::error::{ColorError, Result};

/// Distance below which two simulated colors are considered confusable.
pub const DEFAULT_DISTINGUISH_THRESHOLD: f64 = 20.0;

type Matrix = [[f64; 3]; 3];

// Brettel, Viénot & Mollon (1997) derived approximations
const PROTANOPIA: Matrix = [[0.567, 0.433, 0.000], [0.558, 0.442, 0.000], [0.000, 0.242, 0.758]];
const PROTANOMALY: Matrix = [[0.817, 0.183, 0.000], [0.333, 0.667, 0.000], [0.000, 0.125, 0.875]];
const DEUTERANOPIA: Matrix = [[0.625, 0.375, 0.000], [0.700, 0.300, 0.000], [0.000, 0.300, 0.700]];
const DEUTERANOMALY: Matrix = [[0.800, 0.200, 0.000], [0.258, 0.742, 0.000], [0.000, 0.142, 0.858]];
const TRITANOPIA: Matrix = [[0.950, 0.050, 0.000], [0.000, 0.433, 0.567], [0.000, 0.475, 0.525]];
const TRITANOMALY: Matrix = [[0.967, 0.033, 0.000], [0.000, 0.733, 0.267], [0.000, 0.183, 0.817]];
const ACHROMATOPSIA: Matrix = [[0.299, 0.587, 0.114], [0.299, 0.587, 0.114], [0.299, 0.587, 0.114]];
const ACHROMATOMALY: Matrix = [[0.618, 0.320, 0.062], [0.163, 0.775, 0.062], [0.163, 0.320, 0.516]];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CvdType {
    Protanopia,
    Protanomaly,
    Deuteranopia,
    Deuteranomaly,
    Tritanopia,
    Tritanomaly,
    Achromatopsia,
    Achromatomaly,
}

impl CvdType {
    pub const ALL: [CvdType; 8] = [
        CvdType::Protanopia,
        CvdType::Protanomaly,
        CvdType::Deuteranopia,
        CvdType::Deuteranomaly,
        CvdType::Tritanopia,
        CvdType::Tritanomaly,
        CvdType::Achromatopsia,
        CvdType::Achromatomaly,
    ];

    /// The three dichromacies checked by palette analysis.
    pub const COMMON: [CvdType; 3] = [CvdType::Protanopia, CvdType::Deuteranopia, CvdType::Tritanopia];

    pub fn matrix(self) -> &'static Matrix {
        match self {
            CvdType::Protanopia => &PROTANOPIA,
            CvdType::Protanomaly => &PROTANOMALY,
            CvdType::Deuteranopia => &DEUTERANOPIA,
            CvdType::Deuteranomaly => &DEUTERANOMALY,
            CvdType::Tritanopia => &TRITANOPIA,
            CvdType::Tritanomaly => &TRITANOMALY,
            CvdType::Achromatopsia => &ACHROMATOPSIA,
            CvdType::Achromatomaly => &ACHROMATOMALY,
        }
    }

    /// For the weak forms: the full-loss type they lean toward and by how much.
    pub fn anomaly_of(self) -> Option<(CvdType, f64)> {
        match self {
            CvdType::Protanomaly => Some((CvdType::Protanopia, 0.6)),
            CvdType::Deuteranomaly => Some((CvdType::Deuteranopia, 0.6)),
            CvdType::Tritanomaly => Some((CvdType::Tritanopia, 0.8)),
            CvdType::Achromatomaly => Some((CvdType::Achromatopsia, 0.5)),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CvdType::Protanopia => "protanopia",
            CvdType::Protanomaly => "protanomaly",
            CvdType::Deuteranopia => "deuteranopia",
            CvdType::Deuteranomaly => "deuteranomaly",
            CvdType::Tritanopia => "tritanopia",
            CvdType::Tritanomaly => "tritanomaly",
            CvdType::Achromatopsia => "achromatopsia",
            CvdType::Achromatomaly => "achromatomaly",
        }
    }

    fn advice(self) -> Option<&'static str> {
        match self {
            CvdType::Protanopia => Some("Avoid relying solely on red-green distinctions"),
            CvdType::Deuteranopia => Some("Ensure sufficient brightness contrast between greens and reds"),
            CvdType::Tritanopia => Some("Be careful with blue-yellow distinctions"),
            _ => None,
        }
    }
}

impl fmt::Display for CvdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CvdType {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self> {
        CvdType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ColorError::InvalidArgument(format!("unknown color vision deficiency: {}", s)))
    }
}

/// Apply a cone matrix in linear light and re-encode.
pub fn apply_matrix(rgb: Rgb, matrix: &Matrix) -> Rgb {
    let lin = [srgb_to_linear(rgb.r), srgb_to_linear(rgb.g), srgb_to_linear(rgb.b)];
    let row = |i: usize| matrix[i][0] * lin[0] + matrix[i][1] * lin[1] + matrix[i][2] * lin[2];
    Rgb::from_f64(linear_to_srgb(row(0)), linear_to_srgb(row(1)), linear_to_srgb(row(2)))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvdSimulation {
    pub original: String,
    pub simulated: String,
    pub cvd_type: CvdType,
    pub severity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvdIssue {
    pub cvd_type: CvdType,
    /// Index pairs into the analyzed palette
    pub conflicts: Vec<(usize, usize)>,
    pub severity: IssueSeverity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvdPaletteAnalysis {
    pub issues: Vec<CvdIssue>,
    pub score: u32,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessibleContrast {
    pub normal: f64,
    pub simulated: f64,
    #[serde(rename = "meetsWCAG_AA")]
    pub meets_wcag_aa: bool,
    #[serde(rename = "meetsWCAG_AAA")]
    pub meets_wcag_aaa: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaletteHarmony {
    Monochromatic,
    #[default]
    Analogous,
    Complementary,
    Triadic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccessiblePaletteOptions {
    pub include_types: Vec<CvdType>,
    /// Distinguishability threshold applied to each candidate
    pub min_distance: f64,
    pub preferred_harmony: PaletteHarmony,
}

impl Default for AccessiblePaletteOptions {
    fn default() -> Self {
        Self {
            include_types: CvdType::COMMON.to_vec(),
            min_distance: 3.0,
            preferred_harmony: PaletteHarmony::Analogous,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatedColor {
    pub input: String,
    pub valid: bool,
    pub simulations: BTreeMap<CvdType, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorBlindnessReport {
    pub entries: Vec<SimulatedColor>,
    pub warnings: Vec<String>,
}

/// Simulator with a private memo of matrix results.
pub struct CvdSimulator {
    cache: Mutex<MemoCache<(Rgb, CvdType), Rgb>>,
    threshold: f64,
    max_attempts: usize,
}

impl Default for CvdSimulator {
    fn default() -> Self {
        Self::with_config(&EngineConfig::default())
    }
}

impl CvdSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &EngineConfig) -> Self {
        Self {
            cache: Mutex::new(MemoCache::new(config.cvd_cache_capacity)),
            threshold: config.distinguish_threshold,
            max_attempts: config.palette_max_attempts.max(1),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.lock().stats()
    }

    fn transform(&self, rgb: Rgb, cvd_type: CvdType) -> Rgb {
        let key = (rgb, cvd_type);
        if let Some(hit) = self.cache.lock().get(&key) {
            return hit;
        }

        let full = apply_matrix(rgb, cvd_type.matrix());
        let simulated = match cvd_type.anomaly_of() {
            Some((loss, factor)) => full.mix(&apply_matrix(rgb, loss.matrix()), factor),
            None => full,
        };

        self.cache.lock().insert(key, simulated);
        simulated
    }

    /// Severity is clamped into [0, 1]; 0 returns the input unchanged.
    pub fn simulate_rgb(&self, rgb: Rgb, cvd_type: CvdType, severity: f64) -> Rgb {
        let severity = clamp(severity, 0.0, 1.0);
        if severity == 0.0 {
            return rgb;
        }
        rgb.mix(&self.transform(rgb, cvd_type), severity)
    }

    pub fn simulate_color_blindness(&self, color: &str, cvd_type: CvdType, severity: f64) -> Result<CvdSimulation> {
        let rgb = parse_color(color)?;
        let severity = clamp(severity, 0.0, 1.0);
        Ok(CvdSimulation {
            original: rgb.to_hex(),
            simulated: self.simulate_rgb(rgb, cvd_type, severity).to_hex(),
            cvd_type,
            severity,
        })
    }

    pub fn simulate_all(&self, color: &str, severity: f64) -> Result<BTreeMap<CvdType, String>> {
        let rgb = parse_color(color)?;
        Ok(CvdType::ALL
            .into_iter()
            .map(|t| (t, self.simulate_rgb(rgb, t, severity).to_hex()))
            .collect())
    }

    fn distinguishable_rgb(&self, a: Rgb, b: Rgb, cvd_type: CvdType, threshold: f64) -> bool {
        let sa = self.simulate_rgb(a, cvd_type, 1.0);
        let sb = self.simulate_rgb(b, cvd_type, 1.0);
        sa.distance(&sb) > threshold
    }

    pub fn are_distinguishable(&self, color1: &str, color2: &str, cvd_type: CvdType, threshold: f64) -> Result<bool> {
        let a = parse_color(color1)?;
        let b = parse_color(color2)?;
        Ok(self.distinguishable_rgb(a, b, cvd_type, threshold))
    }

    fn fits_palette(&self, candidate: Rgb, palette: &[Rgb], types: &[CvdType], threshold: f64) -> bool {
        palette
            .iter()
            .all(|existing| types.iter().all(|&t| self.distinguishable_rgb(candidate, *existing, t, threshold)))
    }

    /// Pairwise conflict check under the three common dichromacies.
    pub fn analyze_palette<S: AsRef<str>>(&self, colors: &[S]) -> Result<CvdPaletteAnalysis> {
        let parsed = colors
            .iter()
            .map(|c| parse_color(c.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        let n = parsed.len() as f64;

        let mut issues = Vec::new();
        for cvd_type in CvdType::COMMON {
            let mut conflicts = Vec::new();
            for i in 0..parsed.len() {
                for j in (i + 1)..parsed.len() {
                    if !self.distinguishable_rgb(parsed[i], parsed[j], cvd_type, self.threshold) {
                        conflicts.push((i, j));
                    }
                }
            }

            if conflicts.is_empty() {
                continue;
            }

            let count = conflicts.len() as f64;
            let severity = if count > n / 2.0 {
                IssueSeverity::High
            } else if count > n / 4.0 {
                IssueSeverity::Medium
            } else {
                IssueSeverity::Low
            };
            issues.push(CvdIssue { cvd_type, conflicts, severity });
        }

        let high = issues.iter().filter(|i| i.severity == IssueSeverity::High).count() as i64;
        let score = (100 - issues.len() as i64 * 10 - high * 20).max(0) as u32;

        let hexes: Vec<String> = parsed.iter().map(Rgb::to_hex).collect();
        let recommendations = recommendations_for(&issues, &hexes);

        Ok(CvdPaletteAnalysis { issues, score, recommendations })
    }

    fn alternatives_for(&self, rgb: Rgb, existing: &[Rgb], types: &[CvdType]) -> Vec<Rgb> {
        let mut suggestions = Vec::new();

        for factor in [0.7, 0.85, 1.15, 1.3] {
            let adjusted = Rgb::from_f64(rgb.r as f64 * factor, rgb.g as f64 * factor, rgb.b as f64 * factor);
            if self.fits_palette(adjusted, existing, types, self.threshold) {
                suggestions.push(adjusted);
            }
        }

        let hsl = rgb.to_hsl();
        for shift in [30.0, 60.0, 90.0, 120.0, 150.0] {
            let shifted = Hsl::new(hsl.h + shift, hsl.s, hsl.l).to_rgb();
            if self.fits_palette(shifted, existing, types, self.threshold) {
                suggestions.push(shifted);
            }
        }

        suggestions.truncate(5);
        suggestions
    }

    /// Up to five variants of `color` that stay distinguishable from every
    /// existing color under every listed deficiency.
    pub fn suggest_accessible_alternative<S: AsRef<str>>(
        &self,
        color: &str,
        existing: &[S],
        types: &[CvdType],
    ) -> Result<Vec<String>> {
        let rgb = parse_color(color)?;
        let existing = existing
            .iter()
            .map(|c| parse_color(c.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(self
            .alternatives_for(rgb, &existing, types)
            .iter()
            .map(Rgb::to_hex)
            .collect())
    }

    /// WCAG contrast before and after simulation; pass/fail uses the worse of the two.
    pub fn calculate_accessible_contrast(
        &self,
        foreground: &str,
        background: &str,
        cvd_type: Option<CvdType>,
    ) -> Result<AccessibleContrast> {
        let fg = parse_color(foreground)?;
        let bg = parse_color(background)?;
        let normal = contrast_ratio(fg, bg);

        let simulated = match cvd_type {
            Some(t) => contrast_ratio(self.simulate_rgb(fg, t, 1.0), self.simulate_rgb(bg, t, 1.0)),
            None => normal,
        };

        let min = normal.min(simulated);
        Ok(AccessibleContrast {
            normal,
            simulated,
            meets_wcag_aa: min >= 4.5,
            meets_wcag_aaa: min >= 7.0,
        })
    }

    /// Grow a palette from `base`, accepting only candidates distinguishable
    /// from every accepted color. Each slot gets a bounded number of attempts
    /// before an evenly spaced hue is used instead.
    pub fn generate_accessible_palette(
        &self,
        base: &str,
        count: usize,
        options: &AccessiblePaletteOptions,
    ) -> Result<Vec<String>> {
        let base_rgb = parse_color(base)?;
        if count == 0 {
            return Ok(Vec::new());
        }

        let base_hsl = base_rgb.to_hsl();
        let mut palette = vec![base_rgb];

        while palette.len() < count {
            let slot = palette.len();
            let mut accepted = None;

            for attempt in 0..self.max_attempts {
                let candidate = palette_candidate(base_hsl, options.preferred_harmony, slot, attempt);
                if self.fits_palette(candidate, &palette, &options.include_types, options.min_distance) {
                    accepted = Some(candidate);
                    break;
                }
                if attempt == 0 {
                    if let Some(alt) = self.alternatives_for(candidate, &palette, &options.include_types).first() {
                        accepted = Some(*alt);
                        break;
                    }
                }
            }

            let color = accepted.unwrap_or_else(|| {
                let hue = 360.0 / count as f64 * slot as f64;
                Hsl::new(hue, 70.0, 50.0).to_rgb()
            });
            palette.push(color);
        }

        Ok(palette.iter().map(Rgb::to_hex).collect())
    }

    /// Batch simulation. Invalid entries are kept in place, flagged and
    /// reported as warnings instead of failing the whole batch.
    pub fn check_color_blindness_accessibility<S: AsRef<str>>(
        &self,
        colors: &[S],
        types: &[CvdType],
    ) -> ColorBlindnessReport {
        let mut entries = Vec::with_capacity(colors.len());
        let mut warnings = Vec::new();

        for color in colors {
            let input = color.as_ref();
            match parse_color(input) {
                Ok(rgb) => {
                    let simulations = types
                        .iter()
                        .map(|&t| (t, self.simulate_rgb(rgb, t, 1.0).to_hex()))
                        .collect();
                    entries.push(SimulatedColor {
                        input: input.to_string(),
                        valid: true,
                        simulations,
                    });
                }
                Err(e) => {
                    crate::log_warn!("Skipping color blindness check for '{}': {}", input, e);
                    warnings.push(format!("{}: {}", input, e));
                    entries.push(SimulatedColor {
                        input: input.to_string(),
                        valid: false,
                        simulations: BTreeMap::new(),
                    });
                }
            }
        }

        ColorBlindnessReport { entries, warnings }
    }
}

fn palette_candidate(base: Hsl, harmony: PaletteHarmony, slot: usize, attempt: usize) -> Rgb {
    let slot = slot as f64;
    let jitter = attempt as f64 * 7.5;
    let hsl = match harmony {
        PaletteHarmony::Monochromatic => {
            let lightness = (base.l + slot * 15.0 + attempt as f64 * 5.0) % 100.0;
            Hsl::new(base.h, base.s, lightness)
        }
        PaletteHarmony::Analogous => Hsl::new(base.h + slot * 30.0 + jitter, base.s, base.l),
        PaletteHarmony::Complementary => Hsl::new(
            base.h + 180.0 + (slot - 1.0) * 20.0 + jitter,
            base.s,
            base.l + (slot - 1.0) * 10.0,
        ),
        PaletteHarmony::Triadic => Hsl::new(base.h + 120.0 * slot + jitter, base.s, base.l),
    };
    hsl.to_rgb()
}

fn recommendations_for(issues: &[CvdIssue], colors: &[String]) -> Vec<String> {
    if issues.is_empty() {
        return vec!["Palette is accessible for common types of color blindness".to_string()];
    }

    let mut recommendations = Vec::new();

    let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
    for issue in issues {
        for &(i, j) in &issue.conflicts {
            *counts.entry(i).or_default() += 1;
            *counts.entry(j).or_default() += 1;
        }
    }

    // Ties go to the lowest index
    let worst = counts
        .iter()
        .fold(None, |best: Option<(usize, usize)>, (&index, &count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((index, count)),
        });
    if let Some((index, count)) = worst {
        recommendations.push(format!(
            "Color {} conflicts with {} other colors. Consider adjusting its brightness or hue.",
            colors[index], count
        ));
    }

    for issue in issues.iter().filter(|i| i.severity == IssueSeverity::High) {
        if let Some(advice) = issue.cvd_type.advice() {
            recommendations.push(advice.to_string());
        }
    }

    if issues.iter().any(|i| i.severity == IssueSeverity::High) {
        recommendations.push("Consider using patterns, textures, or labels in addition to color".to_string());
        recommendations.push("Increase brightness contrast between conflicting colors".to_string());
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::hsl_to_hex;

    const SAMPLES: [&str; 6] = ["#ff0000", "#1890ff", "#52c41a", "#faad14", "#000000", "#ffffff"];

    #[test]
    fn zero_severity_is_identity() {
        let sim = CvdSimulator::new();
        for color in SAMPLES {
            for t in CvdType::ALL {
                assert_eq!(sim.simulate_color_blindness(color, t, 0.0).unwrap().simulated, color);
            }
        }
    }

    #[test]
    fn full_severity_is_the_matrix_transform() {
        let sim = CvdSimulator::new();
        for color in SAMPLES {
            let rgb = parse_color(color).unwrap();
            for t in [CvdType::Protanopia, CvdType::Deuteranopia, CvdType::Tritanopia, CvdType::Achromatopsia] {
                let expected = apply_matrix(rgb, t.matrix()).to_hex();
                assert_eq!(sim.simulate_color_blindness(color, t, 1.0).unwrap().simulated, expected);
            }
        }
    }

    #[test]
    fn severity_is_clamped() {
        let sim = CvdSimulator::new();
        let low = sim.simulate_color_blindness("#1890ff", CvdType::Protanopia, -1.0).unwrap();
        let high = sim.simulate_color_blindness("#1890ff", CvdType::Protanopia, 2.0).unwrap();
        assert_eq!(low.severity, 0.0);
        assert_eq!(low.simulated, "#1890ff");
        assert_eq!(high.severity, 1.0);
        assert_eq!(
            high.simulated,
            sim.simulate_color_blindness("#1890ff", CvdType::Protanopia, 1.0).unwrap().simulated
        );
    }

    #[test]
    fn achromatopsia_is_gray() {
        let sim = CvdSimulator::new();
        for color in SAMPLES {
            let out = sim.simulate_rgb(parse_color(color).unwrap(), CvdType::Achromatopsia, 1.0);
            assert!((out.r as i16 - out.g as i16).abs() <= 1);
            assert!((out.g as i16 - out.b as i16).abs() <= 1);
        }
    }

    #[test]
    fn anomaly_lies_between_original_and_full_loss() {
        let sim = CvdSimulator::new();
        let red = Rgb::new(255, 0, 0);
        let weak = sim.simulate_rgb(red, CvdType::Protanomaly, 1.0);
        let full = sim.simulate_rgb(red, CvdType::Protanopia, 1.0);
        assert!(weak.distance(&red) > 0.0);
        assert_ne!(weak, full);
    }

    #[test]
    fn protanomaly_mixes_toward_protanopia() {
        let sim = CvdSimulator::new();
        let red = Rgb::new(255, 0, 0);
        // own matrix gives #e99c00, protanopia gives #c6c500; 60% of the way across
        assert_eq!(apply_matrix(red, &PROTANOMALY).to_hex(), "#e99c00");
        assert_eq!(apply_matrix(red, &PROTANOPIA).to_hex(), "#c6c500");
        assert_eq!(sim.simulate_rgb(red, CvdType::Protanomaly, 1.0).to_hex(), "#d4b500");

        let green = Rgb::new(0, 255, 0);
        assert_eq!(sim.simulate_rgb(green, CvdType::Protanomaly, 1.0).to_hex(), "#99bf79");
    }

    #[test]
    fn simulate_all_covers_every_type() {
        let sim = CvdSimulator::new();
        let all = sim.simulate_all("#ff0000", 1.0).unwrap();
        assert_eq!(all.len(), 8);
        assert!(sim.simulate_all("red", 1.0).is_err());
    }

    #[test]
    fn distinguishability() {
        let sim = CvdSimulator::new();
        assert!(sim.are_distinguishable("#000000", "#ffffff", CvdType::Deuteranopia, 20.0).unwrap());
        assert!(!sim.are_distinguishable("#ff0000", "#fe0101", CvdType::Deuteranopia, 20.0).unwrap());
    }

    #[test]
    fn identical_palette_is_flagged_high() {
        let sim = CvdSimulator::new();
        let analysis = sim.analyze_palette(&["#ff0000", "#ff0000", "#ff0000"]).unwrap();
        assert_eq!(analysis.issues.len(), 3);
        assert!(analysis.issues.iter().all(|i| i.severity == IssueSeverity::High));
        assert_eq!(analysis.score, 10);
        assert!(analysis.recommendations[0].contains("#ff0000 conflicts with"));
        assert!(analysis.recommendations.iter().any(|r| r.contains("labels")));
    }

    #[test]
    fn black_and_white_palette_is_clean() {
        let sim = CvdSimulator::new();
        let analysis = sim.analyze_palette(&["#000000", "#ffffff"]).unwrap();
        assert!(analysis.issues.is_empty());
        assert_eq!(analysis.score, 100);
        assert_eq!(analysis.recommendations.len(), 1);
    }

    #[test]
    fn accessible_palette_has_requested_size() {
        let sim = CvdSimulator::new();
        for harmony in [
            PaletteHarmony::Monochromatic,
            PaletteHarmony::Analogous,
            PaletteHarmony::Complementary,
            PaletteHarmony::Triadic,
        ] {
            let options = AccessiblePaletteOptions {
                preferred_harmony: harmony,
                ..AccessiblePaletteOptions::default()
            };
            let palette = sim.generate_accessible_palette("#1890FF", 5, &options).unwrap();
            assert_eq!(palette.len(), 5, "{:?}", harmony);
            assert_eq!(palette[0], "#1890ff");
        }
    }

    #[test]
    fn impossible_threshold_falls_back_to_even_hues() {
        let sim = CvdSimulator::new();
        let options = AccessiblePaletteOptions {
            min_distance: 10_000.0,
            ..AccessiblePaletteOptions::default()
        };
        let palette = sim.generate_accessible_palette("#808080", 4, &options).unwrap();
        assert_eq!(palette.len(), 4);
        // gray candidates have no hue to rotate, so alternatives fail too
        assert_eq!(palette[1], hsl_to_hex(90.0, 70.0, 50.0));
        assert_eq!(palette[3], hsl_to_hex(270.0, 70.0, 50.0));
    }

    #[test]
    fn cache_records_hits() {
        let sim = CvdSimulator::new();
        sim.simulate_color_blindness("#1890ff", CvdType::Tritanopia, 1.0).unwrap();
        sim.simulate_color_blindness("#1890ff", CvdType::Tritanopia, 0.5).unwrap();
        let stats = sim.cache_stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
    }

    #[test]
    fn batch_check_isolates_bad_entries() {
        let sim = CvdSimulator::new();
        let report = sim.check_color_blindness_accessibility(&["#ff0000", "bogus"], &CvdType::COMMON);
        assert_eq!(report.entries.len(), 2);
        assert!(report.entries[0].valid);
        assert_eq!(report.entries[0].simulations.len(), 3);
        assert!(!report.entries[1].valid);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn accessible_contrast_uses_worse_ratio() {
        let sim = CvdSimulator::new();
        let result = sim
            .calculate_accessible_contrast("#000000", "#ffffff", Some(CvdType::Protanopia))
            .unwrap();
        assert!((result.normal - 21.0).abs() < 0.01);
        assert!(result.meets_wcag_aaa);

        let red_green = sim
            .calculate_accessible_contrast("#ff0000", "#00ff00", Some(CvdType::Deuteranopia))
            .unwrap();
        assert!(!red_green.meets_wcag_aa);
    }

    #[test]
    fn parses_type_names() {
        assert_eq!("Deuteranomaly".parse::<CvdType>().unwrap(), CvdType::Deuteranomaly);
        assert!("colorless".parse::<CvdType>().is_err());
    }
}
