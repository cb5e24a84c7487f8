//! In-memory platform for tests and hosts without a real display.

use crate::converter::BrightnessRange;
use crate::errors::*;
use crate::platform::{DisplayBrightness, DisplayPlatform};

/// A [`DisplayPlatform`] backed by plain fields.
///
/// ```
/// use screen_brightness::{MockPlatform, ScreenBrightnessBuilder};
///
/// let platform = MockPlatform::new().with_system_raw(51);
/// let mut session = ScreenBrightnessBuilder::new()
///     .build_with_platform(platform)
///     .unwrap();
/// assert_eq!(session.current_brightness(), 0.2);
/// session.set_brightness(0.8).unwrap();
/// assert!(session.has_changed());
/// ```
#[derive(Clone, Debug)]
pub struct MockPlatform {
    /// `None` makes [`DisplayPlatform::read_brightness_range`] fail.
    pub range: Option<BrightnessRange>,
    pub system_raw: u32,
    pub system_float: f64,
    /// Last brightness put on the display, `None` while the system default applies.
    pub display: Option<f64>,
    /// Whether a display surface exists to write to.
    pub surface_attached: bool,
    /// Reject writes with [`BrightnessError::DisplayWriteFailed`].
    pub fail_writes: bool,
    pub writes: Vec<DisplayBrightness>,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self {
            range: Some(BrightnessRange::default()),
            system_raw: 0,
            system_float: 0.0,
            display: None,
            surface_attached: true,
            fail_writes: false,
            writes: Vec::new(),
        }
    }

    pub fn with_range(mut self, range: Option<BrightnessRange>) -> Self {
        self.range = range;
        self
    }

    pub fn with_system_raw(mut self, raw: u32) -> Self {
        self.system_raw = raw;
        self
    }

    pub fn with_system_float(mut self, value: f64) -> Self {
        self.system_float = value;
        self
    }
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayPlatform for MockPlatform {
    fn read_brightness_range(&mut self) -> Result<BrightnessRange> {
        self.range
            .ok_or_else(|| BrightnessError::Other("brightness range unavailable".into()))
    }

    fn read_system_brightness_raw(&mut self) -> Result<u32> {
        Ok(self.system_raw)
    }

    fn read_system_brightness_float(&mut self) -> Result<f64> {
        Ok(self.system_float)
    }

    fn write_display_brightness(&mut self, brightness: DisplayBrightness) -> Result<()> {
        if !self.surface_attached {
            return Err(BrightnessError::NoActiveSurface);
        }
        if self.fail_writes {
            return Err(BrightnessError::DisplayWriteFailed("rejected by mock".into()));
        }
        self.display = match brightness {
            DisplayBrightness::Override(value) => Some(value),
            DisplayBrightness::SystemDefault => None,
        };
        self.writes.push(brightness);
        Ok(())
    }
}
