//! Conversion between raw platform brightness and normalized brightness.
//!
//! Every function here is pure. Which [`ConversionMode`] applies is decided by
//! the caller; nothing in this module looks at the running system.

use serde::Deserialize;
use smart_default::SmartDefault;

use crate::consts::*;
use crate::errors::*;

/// How the platform stores its brightness setting.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConversionMode {
    /// Raw integer, linear in `[minimum, maximum]`.
    #[default]
    Linear,
    /// Raw integer, remapped into perceptual space with the HLG curve.
    Gamma,
    /// The platform stores an already normalized float.
    Float,
}

/// Platform-reported bounds of the raw brightness setting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, SmartDefault)]
pub struct BrightnessRange {
    #[default(DEFAULT_MINIMUM_BRIGHTNESS)]
    pub minimum: u32,
    #[default(DEFAULT_MAXIMUM_BRIGHTNESS)]
    pub maximum: u32,
}

impl BrightnessRange {
    pub fn new(minimum: u32, maximum: u32) -> Self {
        Self { minimum, maximum }
    }

    /// A range where no raw value can be mapped onto [0, 1].
    pub fn is_degenerate(&self) -> bool {
        self.minimum >= self.maximum
    }

    pub fn contains(&self, raw: u32) -> bool {
        (self.minimum..=self.maximum).contains(&raw)
    }

    fn check(&self, raw: u32) -> Result<()> {
        if self.is_degenerate() {
            return Err(BrightnessError::DegenerateRange {
                minimum: self.minimum,
                maximum: self.maximum,
            });
        }
        if !self.contains(raw) {
            return Err(self.out_of_domain(raw));
        }
        Ok(())
    }

    fn out_of_domain(&self, raw: u32) -> BrightnessError {
        BrightnessError::InputOutOfDomain {
            raw,
            minimum: self.minimum,
            maximum: self.maximum,
        }
    }
}

pub fn lerp(start: f64, stop: f64, fraction: f64) -> f64 {
    start + (stop - start) * fraction
}

/// Map `raw` linearly onto 0.0-1.0.
pub fn normalize_linear(raw: u32, range: BrightnessRange) -> Result<f64> {
    range.check(raw)?;
    Ok(f64::from(raw - range.minimum) / f64::from(range.maximum - range.minimum))
}

/// Map `raw` onto 0.0-1.0 in perceptual (HLG) space, quantized to 1/1023 steps.
pub fn normalize_gamma(raw: u32, range: BrightnessRange) -> Result<f64> {
    let x = normalize_linear(raw, range)? * HLG_SCALE;

    let y = if x <= 1.0 {
        x.sqrt() * HLG_R
    } else {
        let shifted = x - HLG_B;
        if shifted <= 0.0 {
            return Err(range.out_of_domain(raw));
        }
        HLG_A * shifted.ln() + HLG_C
    };

    Ok((lerp(0.0, GAMMA_SPACE_MAX, y).round() / GAMMA_SPACE_MAX).clamp(0.0, 1.0))
}

/// Normalize a raw integer reading according to `mode`.
///
/// [`ConversionMode::Float`] readings are not integers and are rejected here,
/// use [`validate_normalized`] for them instead.
pub fn normalize(raw: u32, range: BrightnessRange, mode: ConversionMode) -> Result<f64> {
    match mode {
        ConversionMode::Linear => normalize_linear(raw, range),
        ConversionMode::Gamma => normalize_gamma(raw, range),
        ConversionMode::Float => Err(BrightnessError::UnsupportedReading(mode)),
    }
}

pub fn validate_normalized(value: f64) -> Result<f64> {
    if NORMALIZED_RANGE.contains(&value) {
        Ok(value)
    } else {
        Err(BrightnessError::InvalidBrightness(value))
    }
}

/// Inverse of [`normalize_linear`], rounding to the nearest raw step.
pub fn to_raw(value: f64, range: BrightnessRange) -> u32 {
    let value = value.clamp(0.0, 1.0);
    lerp(f64::from(range.minimum), f64::from(range.maximum), value).round() as u32
}

/// Inverse of [`normalize`]: the raw value that reads back as `value` in `mode`.
pub fn denormalize(value: f64, range: BrightnessRange, mode: ConversionMode) -> u32 {
    match mode {
        ConversionMode::Linear | ConversionMode::Float => to_raw(value, range),
        ConversionMode::Gamma => to_raw(gamma_to_linear(value), range),
    }
}

fn gamma_to_linear(value: f64) -> f64 {
    let y = value.clamp(0.0, 1.0);
    let x = if y <= HLG_R {
        (y / HLG_R).powi(2)
    } else {
        ((y - HLG_C) / HLG_A).exp() + HLG_B
    };
    (x / HLG_SCALE).clamp(0.0, 1.0)
}
