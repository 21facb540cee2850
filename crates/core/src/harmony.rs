//! Color harmony generation and palette analysis on the HSL wheel.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::convert::{clamp, normalize_hue, parse_color, Hsl};
use crate::error::{ColorError, Result};
use crate::interp::{lerp, lerp_hue, Curve, HuePath};

pub const GOLDEN_RATIO: f64 = 0.618033988749895;

/// Minimum HSL distance from the ideal position before a color is moved.
const IMPROVE_THRESHOLD: f64 = 10.0;
/// How far an off-position color is pulled toward its ideal.
const IMPROVE_BLEND: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HarmonyType {
    Monochromatic,
    Analogous,
    Complementary,
    SplitComplementary,
    Triadic,
    Tetradic,
    Square,
    DoubleComplementary,
}

impl HarmonyType {
    pub const ALL: [HarmonyType; 8] = [
        HarmonyType::Monochromatic,
        HarmonyType::Analogous,
        HarmonyType::Complementary,
        HarmonyType::SplitComplementary,
        HarmonyType::Triadic,
        HarmonyType::Tetradic,
        HarmonyType::Square,
        HarmonyType::DoubleComplementary,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HarmonyType::Monochromatic => "monochromatic",
            HarmonyType::Analogous => "analogous",
            HarmonyType::Complementary => "complementary",
            HarmonyType::SplitComplementary => "split-complementary",
            HarmonyType::Triadic => "triadic",
            HarmonyType::Tetradic => "tetradic",
            HarmonyType::Square => "square",
            HarmonyType::DoubleComplementary => "double-complementary",
        }
    }

    fn score_bonus(self) -> f64 {
        match self {
            HarmonyType::Complementary | HarmonyType::Triadic => 15.0,
            HarmonyType::Tetradic | HarmonyType::SplitComplementary => 12.0,
            HarmonyType::Analogous | HarmonyType::Square | HarmonyType::DoubleComplementary => 10.0,
            HarmonyType::Monochromatic => 8.0,
        }
    }

    /// Colors the recipe yields on its own, base included. `None` means the
    /// recipe scales with the requested count.
    fn natural_count(self) -> Option<usize> {
        match self {
            HarmonyType::Monochromatic | HarmonyType::Analogous => None,
            HarmonyType::Complementary => Some(2),
            HarmonyType::SplitComplementary | HarmonyType::Triadic => Some(3),
            HarmonyType::Tetradic | HarmonyType::Square | HarmonyType::DoubleComplementary => Some(4),
        }
    }
}

impl fmt::Display for HarmonyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HarmonyType {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self> {
        HarmonyType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ColorError::InvalidArgument(format!("unknown harmony type: {}", s)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HarmonyOptions {
    pub count: usize,
    /// 0-1, how far generated colors drift from the pure recipe
    pub variation: f64,
    pub preserve_lightness: bool,
    pub preserve_saturation: bool,
}

impl Default for HarmonyOptions {
    fn default() -> Self {
        Self {
            count: 5,
            variation: 0.2,
            preserve_lightness: false,
            preserve_saturation: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Temperature {
    Cool,
    Warm,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Energetic,
    Calm,
    Natural,
    Elegant,
    Playful,
    Sophisticated,
    Fresh,
    Dramatic,
}

struct MoodRule {
    mood: Mood,
    hues: &'static [(f64, f64)],
    saturation: (f64, f64),
    lightness: (f64, f64),
}

impl MoodRule {
    fn matches(&self, hsl: &Hsl) -> bool {
        let within = |v: f64, (lo, hi): (f64, f64)| v >= lo && v <= hi;
        self.hues.iter().any(|&range| within(hsl.h, range))
            && within(hsl.s, self.saturation)
            && within(hsl.l, self.lightness)
    }
}

const MOOD_RULES: [MoodRule; 8] = [
    MoodRule { mood: Mood::Energetic, hues: &[(0.0, 60.0), (300.0, 360.0)], saturation: (70.0, 100.0), lightness: (40.0, 70.0) },
    MoodRule { mood: Mood::Calm, hues: &[(180.0, 260.0)], saturation: (30.0, 60.0), lightness: (50.0, 80.0) },
    MoodRule { mood: Mood::Natural, hues: &[(60.0, 150.0)], saturation: (30.0, 70.0), lightness: (30.0, 70.0) },
    MoodRule { mood: Mood::Elegant, hues: &[(0.0, 360.0)], saturation: (10.0, 40.0), lightness: (20.0, 40.0) },
    MoodRule { mood: Mood::Playful, hues: &[(0.0, 360.0)], saturation: (60.0, 100.0), lightness: (50.0, 80.0) },
    MoodRule { mood: Mood::Sophisticated, hues: &[(0.0, 30.0), (200.0, 280.0)], saturation: (20.0, 50.0), lightness: (20.0, 50.0) },
    MoodRule { mood: Mood::Fresh, hues: &[(60.0, 180.0)], saturation: (50.0, 80.0), lightness: (60.0, 90.0) },
    MoodRule { mood: Mood::Dramatic, hues: &[(0.0, 360.0)], saturation: (0.0, 100.0), lightness: (0.0, 30.0) },
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarmonyAnalysis {
    #[serde(rename = "type")]
    pub harmony_type: HarmonyType,
    pub score: u32,
    pub balance: Balance,
    pub temperature: Temperature,
    pub mood: Vec<Mood>,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipKind {
    Monochromatic,
    Analogous,
    Similar,
    Complementary,
    Triadic,
    Square,
    Contrasting,
}

impl RelationshipKind {
    pub fn classify(angle: f64) -> Self {
        if angle < 15.0 {
            RelationshipKind::Monochromatic
        } else if angle < 45.0 {
            RelationshipKind::Analogous
        } else if angle < 75.0 {
            RelationshipKind::Similar
        } else if (165.0..=195.0).contains(&angle) {
            RelationshipKind::Complementary
        } else if (110.0..=130.0).contains(&angle) {
            RelationshipKind::Triadic
        } else if (85.0..=95.0).contains(&angle) {
            RelationshipKind::Square
        } else {
            RelationshipKind::Contrasting
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorRelationship {
    pub color1: String,
    pub color2: String,
    pub angle: f64,
    pub relationship: RelationshipKind,
    /// 0-1
    pub harmony: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarmonyChange {
    pub index: usize,
    pub from: String,
    pub to: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarmonyImprovement {
    pub original: Vec<String>,
    pub improved: Vec<String>,
    pub changes: Vec<HarmonyChange>,
}

/// Smaller of the two arcs between two hues, in [0, 180].
pub fn hue_angle(h1: f64, h2: f64) -> f64 {
    let diff = (h1 - h2).abs();
    diff.min(360.0 - diff)
}

fn parse_all<S: AsRef<str>>(colors: &[S]) -> Result<Vec<Hsl>> {
    colors
        .iter()
        .map(|c| parse_color(c.as_ref()).map(|rgb| rgb.to_hsl()))
        .collect()
}

fn shifted(base: &Hsl, dh: f64, s: f64, l: f64) -> Hsl {
    Hsl::new(base.h + dh, s, l)
}

fn monochromatic(base: &Hsl, count: usize, variation: f64) -> Vec<Hsl> {
    (0..count)
        .map(|i| {
            let factor = (i + 1) as f64 / (count + 1) as f64;
            Hsl::new(
                base.h,
                base.s * (1.0 - variation * factor),
                clamp(base.l + (50.0 - base.l) * factor, 10.0, 90.0),
            )
        })
        .collect()
}

fn analogous(base: &Hsl, count: usize, variation: f64) -> Vec<Hsl> {
    let step = 30.0 * variation;
    (0..count)
        .map(|i| {
            let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
            // Golden-ratio jitter keeps neighbours apart in lightness without randomness
            let jitter = (((i + 1) as f64 * GOLDEN_RATIO).fract() - 0.5) * variation * 20.0;
            shifted(base, step * (i + 1) as f64 * sign, base.s * (1.0 - variation * 0.2), base.l + jitter)
        })
        .collect()
}

fn recipe(base: &Hsl, harmony: HarmonyType, v: f64) -> Vec<Hsl> {
    let (s, l) = (base.s, base.l);
    match harmony {
        HarmonyType::Complementary => vec![shifted(base, 180.0, s * (1.0 - v * 0.1), l)],
        HarmonyType::SplitComplementary => {
            let split = 30.0 * (1.0 + v);
            vec![
                shifted(base, 180.0 - split, s, l * (1.0 - v * 0.1)),
                shifted(base, 180.0 + split, s, l * (1.0 + v * 0.1)),
            ]
        }
        HarmonyType::Triadic => vec![
            shifted(base, 120.0, s * (1.0 - v * 0.1), l),
            shifted(base, 240.0, s * (1.0 + v * 0.1), l),
        ],
        HarmonyType::Tetradic => vec![
            shifted(base, 60.0, s, l * (1.0 - v * 0.1)),
            shifted(base, 180.0, s * (1.0 - v * 0.1), l),
            shifted(base, 240.0, s, l * (1.0 + v * 0.1)),
        ],
        HarmonyType::Square => vec![
            shifted(base, 90.0, s * (1.0 - v * 0.05), l),
            shifted(base, 180.0, s, l * (1.0 - v * 0.1)),
            shifted(base, 270.0, s * (1.0 + v * 0.05), l),
        ],
        HarmonyType::DoubleComplementary => {
            let shift = 30.0 * (1.0 + v);
            vec![
                shifted(base, shift, s, l * (1.0 - v * 0.1)),
                shifted(base, 180.0, s * (1.0 - v * 0.1), l),
                shifted(base, 180.0 + shift, s, l * (1.0 + v * 0.1)),
            ]
        }
        HarmonyType::Monochromatic | HarmonyType::Analogous => Vec::new(),
    }
}

/// Lighter, desaturated versions of `sources`; the factor grows from 0.3 toward 0.7.
fn tints(sources: &[Hsl], count: usize) -> Vec<Hsl> {
    (0..count)
        .map(|i| {
            let source = &sources[i % sources.len()];
            let factor = 0.3 + (i as f64 / count as f64) * 0.4;
            Hsl::new(
                source.h,
                source.s * factor,
                (source.l + (100.0 - source.l) * factor).min(95.0),
            )
        })
        .collect()
}

pub fn generate_harmony(base: &str, harmony: HarmonyType, options: &HarmonyOptions) -> Result<Vec<String>> {
    let base_hsl = parse_color(base)?.to_hsl();
    let count = options.count;
    let variation = options.variation;

    let mut colors = vec![base_hsl];
    match harmony {
        HarmonyType::Monochromatic => colors.extend(monochromatic(&base_hsl, count.saturating_sub(1), variation)),
        HarmonyType::Analogous => colors.extend(analogous(&base_hsl, count.saturating_sub(1), variation)),
        _ => colors.extend(recipe(&base_hsl, harmony, variation)),
    }

    if let Some(natural) = harmony.natural_count() {
        if count > natural {
            let extra = tints(&colors, count - colors.len());
            colors.extend(extra);
        }
    }

    for color in colors.iter_mut().skip(1) {
        if options.preserve_lightness {
            color.l = base_hsl.l;
        }
        if options.preserve_saturation {
            color.s = base_hsl.s;
        }
    }

    colors.truncate(count);
    Ok(colors.iter().map(Hsl::to_hex).collect())
}

fn all_angles(hues: &[f64]) -> Vec<f64> {
    let mut angles = Vec::new();
    for i in 0..hues.len() {
        for j in (i + 1)..hues.len() {
            angles.push(hue_angle(hues[i], hues[j]));
        }
    }
    angles
}

/// First matching band wins; the order matters for scoring.
fn detect_harmony_type(colors: &[Hsl]) -> HarmonyType {
    if colors.len() < 2 {
        return HarmonyType::Monochromatic;
    }

    let hues: Vec<f64> = colors.iter().map(|c| c.h).collect();
    let buckets: HashSet<i64> = hues.iter().map(|h| (h / 10.0).round() as i64).collect();
    if buckets.len() == 1 {
        return HarmonyType::Monochromatic;
    }

    let angles = all_angles(&hues);
    let within = |a: f64, lo: f64, hi: f64| a >= lo && a <= hi;

    if angles.iter().any(|&a| within(a, 170.0, 190.0)) {
        return HarmonyType::Complementary;
    }
    if angles.iter().filter(|&&a| within(a, 110.0, 130.0)).count() >= 2 {
        return HarmonyType::Triadic;
    }
    if angles
        .iter()
        .filter(|&&a| within(a, 85.0, 95.0) || within(a, 175.0, 185.0))
        .count()
        >= 3
    {
        return HarmonyType::Tetradic;
    }
    if angles.iter().all(|&a| a <= 60.0) {
        return HarmonyType::Analogous;
    }
    if angles.iter().any(|&a| within(a, 150.0, 170.0)) && angles.iter().any(|&a| within(a, 190.0, 210.0)) {
        return HarmonyType::SplitComplementary;
    }

    HarmonyType::Analogous
}

fn std_dev(values: impl Iterator<Item = f64> + Clone) -> f64 {
    let n = values.clone().count() as f64;
    if n == 0.0 {
        return 0.0;
    }
    let mean = values.clone().sum::<f64>() / n;
    (values.map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt()
}

fn balance(colors: &[Hsl]) -> Balance {
    let axis = |sd: f64, scale: f64| (100.0 - (sd / scale).min(100.0)).round();
    Balance {
        hue: axis(std_dev(colors.iter().map(|c| c.h)), 1.8),
        saturation: axis(std_dev(colors.iter().map(|c| c.s)), 0.5),
        lightness: axis(std_dev(colors.iter().map(|c| c.l)), 0.5),
    }
}

fn temperature(colors: &[Hsl]) -> Temperature {
    let warm = colors
        .iter()
        .filter(|c| (0.0..=60.0).contains(&c.h) || (300.0..=360.0).contains(&c.h))
        .count();
    let ratio = warm as f64 / colors.len() as f64;
    if ratio > 0.6 {
        Temperature::Warm
    } else if ratio < 0.4 {
        Temperature::Cool
    } else {
        Temperature::Neutral
    }
}

fn moods(colors: &[Hsl]) -> Vec<Mood> {
    let required = colors.len() as f64 * 0.6;
    MOOD_RULES
        .iter()
        .filter(|rule| colors.iter().filter(|c| rule.matches(c)).count() as f64 >= required)
        .map(|rule| rule.mood)
        .collect()
}

fn score(colors: &[Hsl], harmony: HarmonyType, balance: &Balance) -> u32 {
    let mut score = 50.0 + harmony.score_bonus();
    score += (balance.hue + balance.saturation + balance.lightness) / 12.0;

    let variety: HashSet<i64> = colors.iter().map(|c| (c.h / 30.0).round() as i64).collect();
    if variety.len() == 1 && harmony != HarmonyType::Monochromatic {
        score -= 10.0;
    } else if variety.len() as f64 >= colors.len() as f64 * 0.7 {
        score += 5.0;
    }

    clamp(score.round(), 0.0, 100.0) as u32
}

fn suggestions(colors: &[Hsl], harmony: HarmonyType, balance: &Balance, score: u32) -> Vec<String> {
    let mut out = Vec::new();
    if score >= 80 {
        out.push("Excellent harmony! Your palette is well-balanced.");
    }
    if balance.hue < 50.0 {
        out.push("Try adjusting hues to create more visual interest");
    }
    if balance.saturation < 50.0 {
        out.push("Consider varying saturation levels for better depth");
    }
    if balance.lightness < 50.0 {
        out.push("Add more contrast by varying lightness values");
    }
    if harmony == HarmonyType::Monochromatic && colors.len() > 3 {
        out.push("Consider adding an accent color for more variety");
    }
    out.into_iter().map(String::from).collect()
}

pub fn analyze_palette<S: AsRef<str>>(colors: &[S]) -> Result<HarmonyAnalysis> {
    let hsl = parse_all(colors)?;

    if hsl.len() < 2 {
        return Ok(HarmonyAnalysis {
            harmony_type: HarmonyType::Monochromatic,
            score: 100,
            balance: Balance { hue: 100.0, saturation: 100.0, lightness: 100.0 },
            temperature: Temperature::Neutral,
            mood: Vec::new(),
            suggestions: vec!["Add more colors to create a palette".to_string()],
        });
    }

    let harmony_type = detect_harmony_type(&hsl);
    let balance = balance(&hsl);
    let score = score(&hsl, harmony_type, &balance);

    Ok(HarmonyAnalysis {
        harmony_type,
        score,
        balance,
        temperature: temperature(&hsl),
        mood: moods(&hsl),
        suggestions: suggestions(&hsl, harmony_type, &balance, score),
    })
}

fn pair_harmony(a: &Hsl, b: &Hsl) -> f64 {
    let angle = hue_angle(a.h, b.h);
    let angle_score = [0.0, 30.0, 60.0, 90.0, 120.0, 180.0]
        .iter()
        .map(|ideal| 1.0 - (angle - ideal).abs() / 180.0)
        .fold(f64::NEG_INFINITY, f64::max);
    let sat_score = 1.0 - ((a.s - b.s).abs() - 30.0).abs() / 100.0;
    let light_score = 1.0 - ((a.l - b.l).abs() - 20.0).abs() / 100.0;
    angle_score * 0.5 + sat_score * 0.25 + light_score * 0.25
}

/// Every unordered pair, best-harmonizing first.
pub fn find_relationships<S: AsRef<str>>(colors: &[S]) -> Result<Vec<ColorRelationship>> {
    let hsl = parse_all(colors)?;
    let mut relationships = Vec::new();

    for i in 0..hsl.len() {
        for j in (i + 1)..hsl.len() {
            let angle = hue_angle(hsl[i].h, hsl[j].h);
            relationships.push(ColorRelationship {
                color1: colors[i].as_ref().to_string(),
                color2: colors[j].as_ref().to_string(),
                angle,
                relationship: RelationshipKind::classify(angle),
                harmony: pair_harmony(&hsl[i], &hsl[j]),
            });
        }
    }

    relationships.sort_by(|a, b| b.harmony.total_cmp(&a.harmony));
    Ok(relationships)
}

fn ideal_positions(base: &Hsl, harmony: HarmonyType, count: usize) -> Vec<Hsl> {
    let mut positions = vec![*base];
    let at = |dh: f64| Hsl { h: normalize_hue(base.h + dh), ..*base };

    match harmony {
        HarmonyType::Complementary => positions.push(at(180.0)),
        HarmonyType::Triadic => positions.extend([at(120.0), at(240.0)]),
        HarmonyType::Analogous => positions.extend((1..count).map(|i| at(i as f64 * 30.0))),
        _ => {}
    }

    while positions.len() < count {
        let last = positions[positions.len() - 1];
        positions.push(Hsl::new(last.h, last.s + 10.0, last.l + 10.0));
    }
    positions
}

fn hsl_distance(a: &Hsl, b: &Hsl) -> f64 {
    let dh = hue_angle(a.h, b.h);
    let ds = a.s - b.s;
    let dl = a.l - b.l;
    (dh * dh + ds * ds + dl * dl).sqrt()
}

/// Pull colors toward the ideal positions of `target` (or the detected type).
/// The first color is the anchor and never moves.
pub fn improve_harmony<S: AsRef<str>>(colors: &[S], target: Option<HarmonyType>) -> Result<HarmonyImprovement> {
    let hsl = parse_all(colors)?;
    let original: Vec<String> = colors.iter().map(|c| c.as_ref().to_string()).collect();
    let mut improved = original.clone();
    let mut changes = Vec::new();

    if let Some(base) = hsl.first() {
        let harmony = target.unwrap_or_else(|| detect_harmony_type(&hsl));
        let ideals = ideal_positions(base, harmony, hsl.len());

        for (index, (current, ideal)) in hsl.iter().zip(&ideals).enumerate().skip(1) {
            if hsl_distance(current, ideal) <= IMPROVE_THRESHOLD {
                continue;
            }

            let adjusted = Hsl::new(
                lerp_hue(current.h, ideal.h, IMPROVE_BLEND, HuePath::Shorter),
                lerp(current.s, ideal.s, IMPROVE_BLEND),
                lerp(current.l, ideal.l, IMPROVE_BLEND),
            );
            let to = adjusted.to_hex();
            changes.push(HarmonyChange {
                index,
                from: original[index].clone(),
                to: to.clone(),
                reason: format!("Adjusted to better fit {} harmony", harmony),
            });
            improved[index] = to;
        }
    }

    Ok(HarmonyImprovement { original, improved, changes })
}

pub fn generate_golden_ratio_palette(base: &str, count: usize) -> Result<Vec<String>> {
    let rgb = parse_color(base)?;
    let hsl = rgb.to_hsl();

    let mut colors = vec![rgb.to_hex()];
    for i in 1..count {
        let i = i as f64;
        let hue_shift = (360.0 * GOLDEN_RATIO * i) % 360.0;
        colors.push(
            Hsl::new(
                hsl.h + hue_shift,
                hsl.s + (i * GOLDEN_RATIO).sin() * 20.0,
                hsl.l + (i * GOLDEN_RATIO).cos() * 15.0,
            )
            .to_hex(),
        );
    }
    colors.truncate(count);
    Ok(colors)
}

pub fn create_harmonic_gradient(start: &str, end: &str, steps: usize, curve: Curve) -> Result<Vec<String>> {
    create_harmonic_gradient_with_path(start, end, steps, curve, HuePath::Shorter)
}

/// `steps == 1` yields just the start color.
pub fn create_harmonic_gradient_with_path(
    start: &str,
    end: &str,
    steps: usize,
    curve: Curve,
    path: HuePath,
) -> Result<Vec<String>> {
    let from = parse_color(start)?.to_hsl();
    let to = parse_color(end)?.to_hsl();

    Ok((0..steps)
        .map(|i| {
            let t = if steps == 1 { 0.0 } else { curve.apply(i as f64 / (steps - 1) as f64) };
            Hsl::new(lerp_hue(from.h, to.h, t, path), lerp(from.s, to.s, t), lerp(from.l, to.l, t)).to_hex()
        })
        .collect())
}
