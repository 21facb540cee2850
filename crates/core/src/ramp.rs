//! Ten-step tint/shade ramp in HSV space.
//!
//! Step 6 is the seed itself. Steps 1-5 get lighter and less saturated,
//! steps 7-10 darker and more saturated, with a small hue rotation per step.

use crate::convert::{Hsv, Rgb};

pub const RAMP_LEN: usize = 10;
pub const BASE_STEP: usize = 6;

const HUE_STEP: f64 = 2.0;
const MAX_SATURATION_STEP: f64 = 100.0;
const MIN_SATURATION_STEP: f64 = 9.0;
const MAX_VALUE: f64 = 100.0;
const MIN_VALUE: f64 = 30.0;

fn shifted_hue(h: f64, light: bool, i: f64) -> f64 {
    // Cool hues drift toward lower angles when lightened, warm ones toward higher
    let toward_lower = (60.0..=240.0).contains(&h) == light;
    let hue = if toward_lower { h - HUE_STEP * i } else { h + HUE_STEP * i };
    hue.rem_euclid(360.0).round()
}

fn shifted_saturation(s: f64, light: bool, i: f64) -> f64 {
    if light {
        if s <= MIN_SATURATION_STEP {
            s
        } else {
            s - (s - MIN_SATURATION_STEP) / 5.0 * i
        }
    } else {
        s + (MAX_SATURATION_STEP - s) / 4.0 * i
    }
}

fn shifted_value(v: f64, light: bool, i: f64) -> f64 {
    if light {
        v + (MAX_VALUE - v) / 5.0 * i
    } else if v <= MIN_VALUE {
        v
    } else {
        v - (v - MIN_VALUE) / 4.0 * i
    }
}

/// One step (1-based) of the light ramp.
pub fn light_step(seed: Rgb, step: usize) -> Rgb {
    let step = step.clamp(1, RAMP_LEN);
    if step == BASE_STEP {
        return seed;
    }

    let hsv = seed.to_hsv();
    let light = step < BASE_STEP;
    let i = step.abs_diff(BASE_STEP) as f64;
    Hsv::new(
        shifted_hue(hsv.h, light, i),
        shifted_saturation(hsv.s, light, i),
        shifted_value(hsv.v, light, i),
    )
    .to_rgb()
}

/// One step (1-based) of the dark ramp: the light ramp read backwards with
/// saturation recomputed around a dimmed base.
pub fn dark_step(seed: Rgb, step: usize) -> Rgb {
    let step = step.clamp(1, RAMP_LEN);
    let mirrored = light_step(seed, RAMP_LEN - step + 1).to_hsv();

    let origin = seed.to_hsv();
    let dimmed = if (50.0..191.0).contains(&origin.h) { origin.s - 20.0 } else { origin.s - 15.0 };
    let base = dimmed.max(0.0);

    let saturation = if step < BASE_STEP {
        let step_up = ((100.0 - base) / 5.0).ceil();
        base + (BASE_STEP - step) as f64 * step_up
    } else if step == BASE_STEP {
        base
    } else {
        let step_down = ((base - MIN_SATURATION_STEP) / 4.0).ceil();
        base - step_down * (step - BASE_STEP) as f64
    };

    Hsv::new(mirrored.h, saturation, mirrored.v).to_rgb()
}

pub fn light_ramp(seed: Rgb) -> Vec<Rgb> {
    (1..=RAMP_LEN).map(|step| light_step(seed, step)).collect()
}

pub fn dark_ramp(seed: Rgb) -> Vec<Rgb> {
    (1..=RAMP_LEN).map(|step| dark_step(seed, step)).collect()
}
