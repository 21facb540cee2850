//! `{id, type, payload}` requests and `{id, type, result|error}` responses,
//! and the engine that answers them.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use chromakit_core::contrast::{self, TextSize, WcagLevel};
use chromakit_core::convert::{self, Rgb};
use chromakit_core::cvd::{AccessiblePaletteOptions, CvdSimulator, CvdType};
use chromakit_core::harmony::{self, HarmonyOptions, HarmonyType};
use chromakit_core::interp::{Curve, HuePath};
use chromakit_core::mix::{self, BlendMode, QuickScheme};
use chromakit_core::scale::{self, ScaleCategory, ThemeMode};
use chromakit_core::{names, semantic, EngineConfig};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerRequest {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: Value,
}

impl WorkerRequest {
    pub fn new(id: u64, kind: impl Into<String>, payload: Value) -> Self {
        Self {
            id,
            kind: kind.into(),
            payload,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerResponse {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WorkerResponse {
    pub fn ok(id: u64, kind: impl Into<String>, result: Value) -> Self {
        Self {
            id,
            kind: kind.into(),
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: u64, kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id,
            kind: kind.into(),
            result: None,
            error: Some(message.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

fn one() -> f64 {
    1.0
}

fn five() -> usize {
    5
}

fn common_types() -> Vec<CvdType> {
    CvdType::COMMON.to_vec()
}

fn all_types() -> Vec<CvdType> {
    CvdType::ALL.to_vec()
}

#[derive(Deserialize)]
struct HexArgs {
    hex: String,
}

#[derive(Deserialize)]
struct RgbArgs {
    r: f64,
    g: f64,
    b: f64,
}

#[derive(Deserialize)]
struct HslArgs {
    h: f64,
    s: f64,
    l: f64,
}

#[derive(Deserialize)]
struct HueArgs {
    hue: f64,
}

#[derive(Deserialize)]
struct ClampArgs {
    value: f64,
    min: f64,
    max: f64,
}

#[derive(Deserialize)]
struct ColorArgs {
    color: String,
}

#[derive(Deserialize)]
struct ColorsArgs {
    colors: Vec<String>,
}

#[derive(Deserialize)]
struct TwoColorArgs {
    color1: String,
    color2: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccessibilityArgs {
    foreground: String,
    background: String,
    #[serde(default)]
    text_size: TextSize,
    #[serde(default)]
    level: WcagLevel,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SuggestionArgs {
    color: String,
    #[serde(default)]
    level: WcagLevel,
    #[serde(default)]
    text_size: TextSize,
}

#[derive(Deserialize)]
struct BrightnessArgs {
    color: String,
    threshold: Option<u8>,
}

#[derive(Deserialize)]
struct SimulateArgs {
    color: String,
    #[serde(rename = "type")]
    cvd_type: CvdType,
    #[serde(default = "one")]
    severity: f64,
}

#[derive(Deserialize)]
struct SimulateAllArgs {
    color: String,
    #[serde(default = "one")]
    severity: f64,
}

#[derive(Deserialize)]
struct DistinguishArgs {
    color1: String,
    color2: String,
    #[serde(rename = "type")]
    cvd_type: CvdType,
    threshold: Option<f64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccessiblePaletteArgs {
    base_color: String,
    #[serde(default = "five")]
    count: usize,
    #[serde(flatten)]
    options: AccessiblePaletteOptions,
}

#[derive(Deserialize)]
struct AccessibleContrastArgs {
    foreground: String,
    background: String,
    #[serde(rename = "type")]
    cvd_type: Option<CvdType>,
}

#[derive(Deserialize)]
struct AlternativeArgs {
    color: String,
    #[serde(default)]
    existing: Vec<String>,
    #[serde(default = "common_types")]
    types: Vec<CvdType>,
}

#[derive(Deserialize)]
struct BatchSimulationArgs {
    colors: Vec<String>,
    #[serde(default = "all_types")]
    types: Vec<CvdType>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HarmonyArgs {
    base_color: String,
    #[serde(rename = "type")]
    harmony_type: HarmonyType,
    #[serde(flatten)]
    options: HarmonyOptions,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImproveArgs {
    colors: Vec<String>,
    target_type: Option<HarmonyType>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoldenArgs {
    base_color: String,
    #[serde(default = "five")]
    count: usize,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HarmonicGradientArgs {
    start_color: String,
    end_color: String,
    #[serde(default = "five")]
    steps: usize,
    #[serde(default)]
    curve: Curve,
    #[serde(default)]
    hue_path: HuePath,
}

#[derive(Deserialize)]
struct ScaleArgs {
    color: String,
    category: ScaleCategory,
    #[serde(default)]
    mode: ThemeMode,
    indices: Option<Vec<u32>>,
}

#[derive(Deserialize)]
struct ScalesArgs {
    colors: BTreeMap<ScaleCategory, String>,
    #[serde(default)]
    mode: ThemeMode,
}

#[derive(Deserialize)]
struct ModeArgs {
    #[serde(default)]
    mode: ThemeMode,
}

#[derive(Deserialize)]
struct PrimaryArgs {
    primary: String,
    #[serde(default)]
    mode: ThemeMode,
}

#[derive(Deserialize)]
struct BlendArgs {
    color1: String,
    color2: String,
    #[serde(default)]
    mode: BlendMode,
    #[serde(default = "one")]
    opacity: f64,
}

#[derive(Deserialize)]
struct InterpolateArgs {
    color1: String,
    color2: String,
    factor: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ColorGradientArgs {
    start_color: String,
    end_color: String,
    steps: usize,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuickPaletteArgs {
    base_color: String,
    scheme: QuickScheme,
    #[serde(default = "five")]
    count: usize,
}

#[derive(Deserialize)]
struct AdjustArgs {
    color: String,
    amount: f64,
}

fn args<T: DeserializeOwned>(kind: &str, payload: Value) -> Result<T> {
    serde_json::from_value(payload).with_context(|| format!("Invalid payload for {}", kind))
}

fn json<T: Serialize>(value: T) -> Result<Value> {
    serde_json::to_value(value).context("Failed to serialize result")
}

/// One engine instance: configuration plus the CVD simulator and its cache.
pub struct Engine {
    config: EngineConfig,
    simulator: CvdSimulator,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let simulator = CvdSimulator::with_config(&config);
        Self { config, simulator }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Answer a request. Failures become an `error` response and never panic.
    pub fn handle(&self, request: WorkerRequest) -> WorkerResponse {
        let WorkerRequest { id, kind, payload } = request;
        match self.dispatch(&kind, payload) {
            Ok(result) => WorkerResponse::ok(id, kind, result),
            Err(e) => {
                chromakit_core::log_warn!("Request {} ({}) failed: {:#}", id, kind, e);
                WorkerResponse::error(id, kind, format!("{:#}", e))
            }
        }
    }

    pub fn dispatch(&self, kind: &str, payload: Value) -> Result<Value> {
        let sim = &self.simulator;
        match kind {
            // Conversion, null tier: malformed hex answers `null`
            "hexToRgb" => json(convert::hex_to_rgb(&args::<HexArgs>(kind, payload)?.hex)),
            "rgbToHex" => {
                let a: RgbArgs = args(kind, payload)?;
                json(convert::rgb_to_hex(a.r, a.g, a.b))
            }
            "rgbToHsl" => {
                let a: RgbArgs = args(kind, payload)?;
                let rgb = Rgb::from_f64(a.r, a.g, a.b);
                json(convert::rgb_to_hsl(rgb.r, rgb.g, rgb.b))
            }
            "hslToRgb" => {
                let a: HslArgs = args(kind, payload)?;
                json(convert::hsl_to_rgb(a.h, a.s, a.l))
            }
            "hexToHsl" => json(convert::hex_to_hsl(&args::<HexArgs>(kind, payload)?.hex)),
            "hslToHex" => {
                let a: HslArgs = args(kind, payload)?;
                json(convert::hsl_to_hex(a.h, a.s, a.l))
            }
            "normalizeHex" => json(convert::normalize_hex(&args::<HexArgs>(kind, payload)?.hex)),
            "isValidHex" => json(convert::is_valid_hex(&args::<HexArgs>(kind, payload)?.hex)),
            "normalizeHue" => json(convert::normalize_hue(args::<HueArgs>(kind, payload)?.hue)),
            "clamp" => {
                let a: ClampArgs = args(kind, payload)?;
                json(convert::clamp(a.value, a.min, a.max))
            }
            "rgbToHsv" => {
                let a: RgbArgs = args(kind, payload)?;
                json(Rgb::from_f64(a.r, a.g, a.b).to_hsv())
            }
            "hexToLab" => {
                let a: HexArgs = args(kind, payload)?;
                json(convert::hex_to_rgb(&a.hex).map(|rgb| rgb.to_lab()))
            }

            // Accessibility
            "getContrastRatio" => {
                let a: TwoColorArgs = args(kind, payload)?;
                json(contrast::get_contrast_ratio(&a.color1, &a.color2)?)
            }
            "isAccessible" => {
                let a: AccessibilityArgs = args(kind, payload)?;
                json(contrast::is_accessible(&a.foreground, &a.background, a.level, a.text_size)?)
            }
            "checkAccessibility" => {
                let a: AccessibilityArgs = args(kind, payload)?;
                json(contrast::check_accessibility(&a.foreground, &a.background, a.text_size)?)
            }
            "getAccessibleColorSuggestions" => {
                let a: SuggestionArgs = args(kind, payload)?;
                json(contrast::get_accessible_color_suggestions(&a.color, a.level, a.text_size)?)
            }
            "getPerceivedBrightness" => {
                json(contrast::get_perceived_brightness(&args::<ColorArgs>(kind, payload)?.color)?)
            }
            "isDark" | "isLight" => {
                let a: BrightnessArgs = args(kind, payload)?;
                let threshold = a.threshold.unwrap_or(self.config.dark_text_threshold);
                let dark = contrast::is_dark(&a.color, threshold)?;
                json(if kind == "isDark" { dark } else { !dark })
            }
            "getBestTextColor" => {
                let a: BrightnessArgs = args(kind, payload)?;
                let threshold = a.threshold.unwrap_or(self.config.dark_text_threshold);
                json(contrast::get_best_text_color_with(&a.color, threshold)?)
            }

            // Color vision deficiency
            "simulateColorBlindness" => {
                let a: SimulateArgs = args(kind, payload)?;
                json(sim.simulate_color_blindness(&a.color, a.cvd_type, a.severity)?)
            }
            "simulateAll" => {
                let a: SimulateAllArgs = args(kind, payload)?;
                json(sim.simulate_all(&a.color, a.severity)?)
            }
            "areDistinguishable" => {
                let a: DistinguishArgs = args(kind, payload)?;
                let threshold = a.threshold.unwrap_or(sim.threshold());
                json(sim.are_distinguishable(&a.color1, &a.color2, a.cvd_type, threshold)?)
            }
            "analyzeColorBlindness" => json(sim.analyze_palette(&args::<ColorsArgs>(kind, payload)?.colors)?),
            "generateAccessiblePalette" => {
                let a: AccessiblePaletteArgs = args(kind, payload)?;
                json(sim.generate_accessible_palette(&a.base_color, a.count, &a.options)?)
            }
            "calculateAccessibleContrast" => {
                let a: AccessibleContrastArgs = args(kind, payload)?;
                json(sim.calculate_accessible_contrast(&a.foreground, &a.background, a.cvd_type)?)
            }
            "suggestAccessibleAlternative" => {
                let a: AlternativeArgs = args(kind, payload)?;
                json(sim.suggest_accessible_alternative(&a.color, &a.existing, &a.types)?)
            }
            "checkColorBlindnessAccessibility" => {
                let a: BatchSimulationArgs = args(kind, payload)?;
                json(sim.check_color_blindness_accessibility(&a.colors, &a.types))
            }
            "cacheStats" => json(sim.cache_stats()),

            // Harmony
            "generateHarmony" => {
                let a: HarmonyArgs = args(kind, payload)?;
                json(harmony::generate_harmony(&a.base_color, a.harmony_type, &a.options)?)
            }
            "analyzePalette" => json(harmony::analyze_palette(&args::<ColorsArgs>(kind, payload)?.colors)?),
            "findRelationships" => json(harmony::find_relationships(&args::<ColorsArgs>(kind, payload)?.colors)?),
            "improveHarmony" => {
                let a: ImproveArgs = args(kind, payload)?;
                json(harmony::improve_harmony(&a.colors, a.target_type)?)
            }
            "generateGoldenRatioPalette" => {
                let a: GoldenArgs = args(kind, payload)?;
                json(harmony::generate_golden_ratio_palette(&a.base_color, a.count)?)
            }
            "createHarmonicGradient" => {
                let a: HarmonicGradientArgs = args(kind, payload)?;
                json(harmony::create_harmonic_gradient_with_path(
                    &a.start_color,
                    &a.end_color,
                    a.steps,
                    a.curve,
                    a.hue_path,
                )?)
            }

            // Scales and themes
            "generateScale" => {
                let a: ScaleArgs = args(kind, payload)?;
                let scale = match a.indices {
                    Some(indices) => scale::generate_scale_with_indices(&a.color, a.category, a.mode, &indices)?,
                    None => scale::generate_scale(&a.color, a.category, a.mode)?,
                };
                json(scale)
            }
            "generateScales" => {
                let a: ScalesArgs = args(kind, payload)?;
                json(scale::generate_scales(&a.colors, a.mode))
            }
            "generateNeutralColors" => json(scale::generate_neutral_colors(args::<ModeArgs>(kind, payload)?.mode)),
            "generateSemanticColors" => {
                let a: PrimaryArgs = args(kind, payload)?;
                json(semantic::generate_semantic_colors_for_mode(&a.primary, a.mode, &self.config)?)
            }
            "generateBaseGrays" => {
                let a: PrimaryArgs = args(kind, payload)?;
                json(semantic::base_grays(&a.primary, &self.config)?)
            }
            "generateTheme" => {
                let a: PrimaryArgs = args(kind, payload)?;
                json(semantic::generate_theme(&a.primary, a.mode, &self.config)?)
            }

            // Mixing
            "blendColors" => {
                let a: BlendArgs = args(kind, payload)?;
                json(mix::blend_colors(&a.color1, &a.color2, a.mode, a.opacity)?)
            }
            "interpolateColors" => {
                let a: InterpolateArgs = args(kind, payload)?;
                json(mix::interpolate_colors(&a.color1, &a.color2, a.factor)?)
            }
            "generateColorGradient" => {
                let a: ColorGradientArgs = args(kind, payload)?;
                json(mix::generate_color_gradient(&a.start_color, &a.end_color, a.steps)?)
            }
            "adjustBrightness" => {
                let a: AdjustArgs = args(kind, payload)?;
                json(mix::adjust_brightness(&a.color, a.amount)?)
            }
            "adjustSaturation" => {
                let a: AdjustArgs = args(kind, payload)?;
                json(mix::adjust_saturation(&a.color, a.amount)?)
            }
            "adjustHue" => {
                let a: AdjustArgs = args(kind, payload)?;
                json(mix::adjust_hue(&a.color, a.amount)?)
            }
            "generateQuickPalette" => {
                let a: QuickPaletteArgs = args(kind, payload)?;
                json(mix::quick_palette(&a.base_color, a.scheme, a.count)?)
            }
            "nearestColorName" => json(names::nearest_color_name(&args::<ColorArgs>(kind, payload)?.color)?),

            _ => anyhow::bail!("Unknown request type: {}", kind),
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(kind: &str, payload: Value) -> WorkerResponse {
        Engine::default().handle(WorkerRequest::new(7, kind, payload))
    }

    #[test]
    fn null_tier_answers_null() {
        let ok = call("hexToRgb", json!({ "hex": "#FF0000" }));
        assert_eq!(ok.result, Some(json!({ "r": 255, "g": 0, "b": 0 })));

        let bad = call("hexToRgb", json!({ "hex": "#ff00" }));
        assert_eq!(bad.result, Some(Value::Null));
        assert!(!bad.is_error());
    }

    #[test]
    fn throw_tier_answers_error_string() {
        let response = call("getContrastRatio", json!({ "color1": "nope", "color2": "#fff" }));
        assert_eq!(response.id, 7);
        assert_eq!(response.kind, "getContrastRatio");
        assert!(response.error.unwrap().contains("invalid color: nope"));
    }

    #[test]
    fn text_color_uses_configured_threshold() {
        let payload = json!({ "color": "#808080" });
        assert_eq!(call("getBestTextColor", payload.clone()).result, Some(json!("#000000")));

        let engine = Engine::new(EngineConfig {
            dark_text_threshold: 200,
            ..EngineConfig::default()
        });
        for kind in ["getBestTextColor", "isDark"] {
            let response = engine.handle(WorkerRequest::new(1, kind, payload.clone()));
            let expected = if kind == "isDark" { json!(true) } else { json!("#ffffff") };
            assert_eq!(response.result, Some(expected));
        }
    }

    #[test]
    fn quick_palettes_are_reachable() {
        let mono = call("generateQuickPalette", json!({ "baseColor": "#1890ff", "scheme": "monochromatic", "count": 3 }));
        assert_eq!(mono.result.unwrap().as_array().unwrap().len(), 3);

        let comp = call("generateQuickPalette", json!({ "baseColor": "#FF0000", "scheme": "complementary" }));
        assert_eq!(comp.result, Some(json!(["#ff0000", "#00ffff"])));

        let bad = call("generateQuickPalette", json!({ "baseColor": "#ff0000", "scheme": "pastel" }));
        assert!(bad.is_error());
    }

    #[test]
    fn unknown_type_is_an_error() {
        let response = call("paintItBlack", Value::Null);
        assert!(response.error.unwrap().contains("Unknown request type"));
    }

    #[test]
    fn bad_payload_is_an_error() {
        let response = call("generateScale", json!({ "color": "#1890ff" }));
        assert!(response.error.unwrap().contains("Invalid payload for generateScale"));
    }

    #[test]
    fn simulation_defaults_to_full_severity() {
        let response = call("simulateColorBlindness", json!({ "color": "#ff0000", "type": "achromatopsia" }));
        let result = response.result.unwrap();
        assert_eq!(result["severity"], json!(1.0));
        let hex = result["simulated"].as_str().unwrap();
        assert_eq!(&hex[1..3], &hex[3..5]);
        assert_eq!(&hex[3..5], &hex[5..7]);
    }

    #[test]
    fn harmony_options_flatten_into_payload() {
        let response = call(
            "generateHarmony",
            json!({ "baseColor": "#ff0000", "type": "complementary", "count": 2 }),
        );
        assert_eq!(response.result.unwrap().as_array().unwrap().len(), 2);
    }

    #[test]
    fn scale_payload_uses_lowercase_names() {
        let response = call("generateScale", json!({ "color": "#1890ff", "category": "primary", "mode": "light" }));
        assert_eq!(response.result.unwrap()["indices"]["6"], json!("#1890ff"));
    }

    #[test]
    fn response_serializes_without_empty_fields() {
        let text = serde_json::to_string(&WorkerResponse::ok(1, "clamp", json!(5.0))).unwrap();
        assert_eq!(text, r#"{"id":1,"type":"clamp","result":5.0}"#);
    }
}
