use std::ops::RangeInclusive;

/// Location of backlight devices
pub const DEVICES_PATH: &str = "/sys/class/backlight";

/// Filename for device's max brightness
pub const FILE_MAX_BRIGHTNESS: &str = "max_brightness";

/// Filename for current brightness.
pub const FILE_BRIGHTNESS: &str = "actual_brightness";

/// amdgpu drivers set the actual_brightness in a different scale than
/// [0, max_brightness], so we have to use the 'brightness' file instead.
pub const FILE_BRIGHTNESS_AMD: &str = "brightness";

/// set the requested brightness level
pub const FILE_BRIGHTNESS_WRITE: &str = "brightness";

/// Directory under the user's config dir holding `config.toml`
pub const CONFIG_DIR_NAME: &str = "screen_brightness";

/// Range assumed when the platform cannot report one.
/// Most devices use 0-255, some OEMs (e.g. POCO) ship other bounds.
pub const DEFAULT_MINIMUM_BRIGHTNESS: u32 = 0;
pub const DEFAULT_MAXIMUM_BRIGHTNESS: u32 = 255;

/// Valid normalized brightness values
pub const NORMALIZED_RANGE: RangeInclusive<f64> = 0.0..=1.0;

/// Resolution of the perceptual brightness slider
pub const GAMMA_SPACE_MAX: f64 = 1023.0;

/// HLG inverse OETF constants (ITU-R BT.2100)
pub const HLG_R: f64 = 0.5;
pub const HLG_A: f64 = 0.178_832_77;
pub const HLG_B: f64 = 0.284_668_92;
pub const HLG_C: f64 = 0.559_910_73;

/// HLG is normalized to [0, 12]
pub const HLG_SCALE: f64 = 12.0;
