//! The host side of brightness control.

#[cfg(feature = "watch")]
use std::path::PathBuf;

use crate::converter::{BrightnessRange, ConversionMode};
use crate::errors::*;

/// What to put on the display surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DisplayBrightness {
    /// Force this normalized brightness for the session.
    Override(f64),
    /// Drop any override and let the system setting apply again.
    SystemDefault,
}

/// Access to the platform's brightness settings and display surface.
///
/// Every call is synchronous and may fail. Failures are reported to the
/// caller as is; [`ScreenBrightness`](crate::ScreenBrightness) never retries.
pub trait DisplayPlatform {
    /// Bounds of the raw system brightness setting.
    fn read_brightness_range(&mut self) -> Result<BrightnessRange>;

    /// Raw integer system brightness, used in the linear and gamma modes.
    fn read_system_brightness_raw(&mut self) -> Result<u32>;

    /// Normalized system brightness, used in the float mode.
    fn read_system_brightness_float(&mut self) -> Result<f64> {
        Err(BrightnessError::UnsupportedReading(ConversionMode::Float))
    }

    /// The range and mode the session settled on. Platforms that map
    /// normalized writes back to raw values must use these.
    fn use_conversion(&mut self, _range: BrightnessRange, _mode: ConversionMode) {}

    fn write_display_brightness(&mut self, brightness: DisplayBrightness) -> Result<()>;

    /// A file that is modified whenever the system brightness changes.
    #[cfg(feature = "watch")]
    #[cfg_attr(docsrs, doc(cfg(feature = "watch")))]
    fn watch_path(&self) -> Option<PathBuf> {
        None
    }
}
