//! Color model conversions: hex, RGB, HSL, HSV and CIE L*a*b*.
//!
//! Everything in here is the "null tier": functions that consume hex strings
//! return `None` for malformed input instead of failing. The throw-tier entry
//! point used by the higher layers is [`parse_color`].

use serde::{Deserialize, Serialize};

use crate::error::{ColorError, Result};

/// D65 reference white
const D65_X: f64 = 0.95047;
const D65_Y: f64 = 1.00000;
const D65_Z: f64 = 1.08883;

const SRGB_TO_XYZ: [[f64; 3]; 3] = [
    [0.4124564, 0.3575761, 0.1804375],
    [0.2126729, 0.7151522, 0.0721750],
    [0.0193339, 0.1191920, 0.9503041],
];

const XYZ_TO_SRGB: [[f64; 3]; 3] = [
    [3.2404542, -1.5371385, -0.4985314],
    [-0.9692660, 1.8760108, 0.0415560],
    [0.0556434, -0.2040259, 1.0572252],
];

/// 8-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
    pub const WHITE: Rgb = Rgb { r: 255, g: 255, b: 255 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from real-valued channels, rounding and clamping each into [0, 255].
    pub fn from_f64(r: f64, g: f64, b: f64) -> Self {
        Self {
            r: channel(r),
            g: channel(g),
            b: channel(b),
        }
    }

    /// Canonical `#rrggbb` lowercase serialization.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// HSL without rounding. Used where small hue differences matter.
    pub fn to_hsl(&self) -> Hsl {
        let r = self.r as f64 / 255.0;
        let g = self.g as f64 / 255.0;
        let b = self.b as f64 / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        if max == min {
            return Hsl { h: 0.0, s: 0.0, l: l * 100.0 };
        }

        let d = max - min;
        let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };

        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };

        Hsl {
            h: normalize_hue(h * 60.0),
            s: s * 100.0,
            l: l * 100.0,
        }
    }

    pub fn to_hsv(&self) -> Hsv {
        rgb_to_hsv(self.r, self.g, self.b)
    }

    pub fn to_lab(&self) -> Lab {
        rgb_to_lab(*self)
    }

    /// Euclidean distance in 8-bit RGB space.
    pub fn distance(&self, other: &Rgb) -> f64 {
        let dr = other.r as f64 - self.r as f64;
        let dg = other.g as f64 - self.g as f64;
        let db = other.b as f64 - self.b as f64;
        (dr * dr + dg * dg + db * db).sqrt()
    }

    /// Per-channel linear interpolation toward `other`.
    pub fn mix(&self, other: &Rgb, t: f64) -> Rgb {
        let t = clamp(t, 0.0, 1.0);
        Rgb::from_f64(
            self.r as f64 + (other.r as f64 - self.r as f64) * t,
            self.g as f64 + (other.g as f64 - self.g as f64) * t,
            self.b as f64 + (other.b as f64 - self.b as f64) * t,
        )
    }
}

/// Hue in degrees [0, 360), saturation and lightness in percent [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    /// Normalizes the hue and clamps saturation/lightness into their domains.
    pub fn new(h: f64, s: f64, l: f64) -> Self {
        Self {
            h: normalize_hue(h),
            s: clamp(s, 0.0, 100.0),
            l: clamp(l, 0.0, 100.0),
        }
    }

    pub fn to_rgb(&self) -> Rgb {
        hsl_to_rgb(self.h, self.s, self.l)
    }

    pub fn to_hex(&self) -> String {
        self.to_rgb().to_hex()
    }

    /// Integer-rounded copy, the shape exposed by [`rgb_to_hsl`].
    pub fn rounded(&self) -> Hsl {
        Hsl {
            h: normalize_hue(self.h.round()),
            s: self.s.round(),
            l: self.l.round(),
        }
    }
}

/// Hue in degrees [0, 360), saturation and value in percent [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

impl Hsv {
    pub fn new(h: f64, s: f64, v: f64) -> Self {
        Self {
            h: normalize_hue(h),
            s: clamp(s, 0.0, 100.0),
            v: clamp(v, 0.0, 100.0),
        }
    }

    pub fn to_rgb(&self) -> Rgb {
        hsv_to_rgb(self.h, self.s, self.v)
    }
}

/// CIE L*a*b* (D65). L in [0, 100], a/b unbounded but typically within ±128.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

impl Lab {
    pub fn to_rgb(&self) -> Rgb {
        lab_to_rgb(*self)
    }
}

fn channel(value: f64) -> u8 {
    clamp(value.round(), 0.0, 255.0) as u8
}

/// Standard clamp. NaN collapses to `min`.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return min;
    }
    value.max(min).min(max)
}

/// Wrap any real number into [0, 360).
pub fn normalize_hue(hue: f64) -> f64 {
    if !hue.is_finite() {
        return 0.0;
    }
    let wrapped = hue.rem_euclid(360.0);
    // rem_euclid of a tiny negative value can round up to exactly 360
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// 3- or 6-digit hex, with or without a leading `#`.
pub fn is_valid_hex(hex: &str) -> bool {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    matches!(digits.len(), 3 | 6) && digits.bytes().all(|c| c.is_ascii_hexdigit())
}

/// Canonical `#rrggbb` form: expands shorthand and lowercases.
pub fn normalize_hex(hex: &str) -> Option<String> {
    if !is_valid_hex(hex) {
        return None;
    }
    let digits = hex.strip_prefix('#').unwrap_or(hex).to_ascii_lowercase();
    if digits.len() == 3 {
        let expanded: String = digits.chars().flat_map(|c| [c, c]).collect();
        Some(format!("#{}", expanded))
    } else {
        Some(format!("#{}", digits))
    }
}

/// Parse a 6-digit hex color. Shorthand is not accepted here.
pub fn hex_to_rgb(hex: &str) -> Option<Rgb> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;

    Some(Rgb { r, g, b })
}

pub fn rgb_to_hex(r: f64, g: f64, b: f64) -> String {
    Rgb::from_f64(r, g, b).to_hex()
}

/// HSL with each component rounded to the nearest integer.
pub fn rgb_to_hsl(r: u8, g: u8, b: u8) -> Hsl {
    Rgb::new(r, g, b).to_hsl().rounded()
}

pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> Rgb {
    let h = normalize_hue(h) / 360.0;
    let s = clamp(s, 0.0, 100.0) / 100.0;
    let l = clamp(l, 0.0, 100.0) / 100.0;

    if s == 0.0 {
        return Rgb::from_f64(l * 255.0, l * 255.0, l * 255.0);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    Rgb::from_f64(
        hue_to_channel(p, q, h + 1.0 / 3.0) * 255.0,
        hue_to_channel(p, q, h) * 255.0,
        hue_to_channel(p, q, h - 1.0 / 3.0) * 255.0,
    )
}

fn hue_to_channel(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

pub fn hex_to_hsl(hex: &str) -> Option<Hsl> {
    let rgb = hex_to_rgb(hex)?;
    Some(rgb_to_hsl(rgb.r, rgb.g, rgb.b))
}

pub fn hsl_to_hex(h: f64, s: f64, l: f64) -> String {
    hsl_to_rgb(h, s, l).to_hex()
}

pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> Hsv {
    let r = r as f64 / 255.0;
    let g = g as f64 / 255.0;
    let b = b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let s = if max == 0.0 { 0.0 } else { delta / max };

    let h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / delta) % 6.0)
    } else if max == g {
        60.0 * (((b - r) / delta) + 2.0)
    } else {
        60.0 * (((r - g) / delta) + 4.0)
    };

    Hsv {
        h: normalize_hue(h),
        s: s * 100.0,
        v: max * 100.0,
    }
}

pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgb {
    let h = normalize_hue(h);
    let s = clamp(s, 0.0, 100.0) / 100.0;
    let v = clamp(v, 0.0, 100.0) / 100.0;

    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    Rgb::from_f64((r + m) * 255.0, (g + m) * 255.0, (b + m) * 255.0)
}

/// sRGB transfer function, 8-bit channel to linear light.
///
/// Uses the WCAG 2.x breakpoint of 0.03928.
pub fn srgb_to_linear(channel: u8) -> f64 {
    let c = channel as f64 / 255.0;
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Inverse transfer function, linear light to a gamma-encoded 0-255 value (unrounded).
pub fn linear_to_srgb(linear: f64) -> f64 {
    let encoded = if linear <= 0.0031308 {
        linear * 12.92
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    };
    encoded * 255.0
}

fn lab_f(t: f64) -> f64 {
    const DELTA: f64 = 6.0 / 29.0;
    if t > DELTA * DELTA * DELTA {
        t.cbrt()
    } else {
        t / (3.0 * DELTA * DELTA) + 4.0 / 29.0
    }
}

fn lab_f_inv(t: f64) -> f64 {
    const DELTA: f64 = 6.0 / 29.0;
    if t > DELTA {
        t * t * t
    } else {
        3.0 * DELTA * DELTA * (t - 4.0 / 29.0)
    }
}

pub fn rgb_to_lab(rgb: Rgb) -> Lab {
    let lin = [
        srgb_to_linear(rgb.r),
        srgb_to_linear(rgb.g),
        srgb_to_linear(rgb.b),
    ];
    let m = &SRGB_TO_XYZ;
    let x = m[0][0] * lin[0] + m[0][1] * lin[1] + m[0][2] * lin[2];
    let y = m[1][0] * lin[0] + m[1][1] * lin[1] + m[1][2] * lin[2];
    let z = m[2][0] * lin[0] + m[2][1] * lin[1] + m[2][2] * lin[2];

    let fx = lab_f(x / D65_X);
    let fy = lab_f(y / D65_Y);
    let fz = lab_f(z / D65_Z);

    Lab {
        l: 116.0 * fy - 16.0,
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    }
}

pub fn lab_to_rgb(lab: Lab) -> Rgb {
    let fy = (lab.l + 16.0) / 116.0;
    let fx = fy + lab.a / 500.0;
    let fz = fy - lab.b / 200.0;

    let x = lab_f_inv(fx) * D65_X;
    let y = lab_f_inv(fy) * D65_Y;
    let z = lab_f_inv(fz) * D65_Z;

    let m = &XYZ_TO_SRGB;
    let r = m[0][0] * x + m[0][1] * y + m[0][2] * z;
    let g = m[1][0] * x + m[1][1] * y + m[1][2] * z;
    let b = m[2][0] * x + m[2][1] * y + m[2][2] * z;

    Rgb::from_f64(
        linear_to_srgb(r.max(0.0)),
        linear_to_srgb(g.max(0.0)),
        linear_to_srgb(b.max(0.0)),
    )
}

/// CIE76 color difference.
pub fn delta_e(a: &Lab, b: &Lab) -> f64 {
    let dl = a.l - b.l;
    let da = a.a - b.a;
    let db = a.b - b.b;
    (dl * dl + da * da + db * db).sqrt()
}

/// Strict parse for the layers above the converters.
///
/// Accepts anything [`is_valid_hex`] accepts and fails with
/// [`ColorError::InvalidColor`] carrying the input otherwise.
pub fn parse_color(hex: &str) -> Result<Rgb> {
    normalize_hex(hex)
        .and_then(|normalized| hex_to_rgb(&normalized))
        .ok_or_else(|| ColorError::InvalidColor(hex.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_with_and_without_hash() {
        assert_eq!(hex_to_rgb("#ff0000"), Some(Rgb::new(255, 0, 0)));
        assert_eq!(hex_to_rgb("1890FF"), Some(Rgb::new(0x18, 0x90, 0xff)));
        assert_eq!(hex_to_rgb("#fff"), None);
        assert_eq!(hex_to_rgb("#gg0000"), None);
        assert_eq!(hex_to_rgb("##ff0000"), None);
        assert_eq!(hex_to_rgb(""), None);
    }

    #[test]
    fn rgb_to_hex_rounds_and_clamps() {
        assert_eq!(rgb_to_hex(24.0, 144.0, 255.0), "#1890ff");
        assert_eq!(rgb_to_hex(-12.0, 300.0, 127.5), "#00ff80");
        assert_eq!(rgb_to_hex(0.4, 0.6, 15.0), "#00010f");
    }

    #[test]
    fn hsl_of_primaries() {
        assert_eq!(rgb_to_hsl(255, 0, 0), Hsl { h: 0.0, s: 100.0, l: 50.0 });
        assert_eq!(rgb_to_hsl(0, 255, 0), Hsl { h: 120.0, s: 100.0, l: 50.0 });
        assert_eq!(rgb_to_hsl(0, 0, 255), Hsl { h: 240.0, s: 100.0, l: 50.0 });
    }

    #[test]
    fn achromatic_has_zero_hue_and_saturation() {
        let hsl = rgb_to_hsl(128, 128, 128);
        assert_eq!(hsl.h, 0.0);
        assert_eq!(hsl.s, 0.0);
        assert_eq!(hsl.l, 50.0);
    }

    #[test]
    fn hsl_round_trip_on_saturated_colors() {
        for (r, g, b) in [(255, 0, 0), (0, 255, 0), (0, 0, 255), (255, 255, 0), (0, 0, 0), (255, 255, 255)] {
            let hsl = rgb_to_hsl(r, g, b);
            assert_eq!(hsl_to_rgb(hsl.h, hsl.s, hsl.l), Rgb::new(r, g, b));
        }
    }

    #[test]
    fn precise_hsl_round_trip_is_within_one_unit() {
        for r in (0..=255u16).step_by(51) {
            for g in (0..=255u16).step_by(17) {
                for b in (0..=255u16).step_by(85) {
                    let rgb = Rgb::new(r as u8, g as u8, b as u8);
                    let back = rgb.to_hsl().to_rgb();
                    assert!((back.r as i16 - rgb.r as i16).abs() <= 1, "{:?} -> {:?}", rgb, back);
                    assert!((back.g as i16 - rgb.g as i16).abs() <= 1, "{:?} -> {:?}", rgb, back);
                    assert!((back.b as i16 - rgb.b as i16).abs() <= 1, "{:?} -> {:?}", rgb, back);
                }
            }
        }
    }

    #[test]
    fn normalizes_shorthand() {
        assert_eq!(normalize_hex("#ABC").as_deref(), Some("#aabbcc"));
        assert_eq!(normalize_hex("1890FF").as_deref(), Some("#1890ff"));
        assert_eq!(normalize_hex("#12345"), None);
    }

    #[test]
    fn validates_hex_lengths() {
        assert!(is_valid_hex("#fff"));
        assert!(is_valid_hex("fff"));
        assert!(is_valid_hex("#A1b2C3"));
        assert!(!is_valid_hex("#ffff"));
        assert!(!is_valid_hex("not-a-color"));
    }

    #[test]
    fn hue_wraps_both_directions() {
        assert_eq!(normalize_hue(360.0), 0.0);
        assert_eq!(normalize_hue(-30.0), 330.0);
        assert_eq!(normalize_hue(725.0), 5.0);
        assert_eq!(normalize_hue(f64::NAN), 0.0);
        assert!(normalize_hue(-1e-20) < 360.0);
    }

    #[test]
    fn hsv_round_trip() {
        let rgb = Rgb::new(24, 144, 255);
        let hsv = rgb.to_hsv();
        assert!((hsv.h - 208.83).abs() < 0.05);
        assert_eq!(hsv.to_rgb(), rgb);
    }

    #[test]
    fn lab_reference_points() {
        let white = Rgb::WHITE.to_lab();
        assert!((white.l - 100.0).abs() < 0.01);
        assert!(white.a.abs() < 0.01 && white.b.abs() < 0.01);

        let black = Rgb::BLACK.to_lab();
        assert!(black.l.abs() < 0.01);

        let red = Rgb::new(255, 0, 0);
        let lab = red.to_lab();
        assert!((lab.l - 53.24).abs() < 0.1);
        assert_eq!(lab.to_rgb(), red);
    }

    #[test]
    fn parse_color_reports_offending_input() {
        assert_eq!(parse_color("#abc"), Ok(Rgb::new(0xaa, 0xbb, 0xcc)));
        assert_eq!(
            parse_color("not-a-color"),
            Err(ColorError::InvalidColor("not-a-color".to_string()))
        );
    }
}
