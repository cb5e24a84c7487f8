use crate::consts::*;
use crate::converter::{BrightnessRange, ConversionMode};
use crate::errors::*;
use crate::util::*;

use std::collections::HashMap;

use serde::Deserialize;
use serde::Deserializer;
use smart_default::SmartDefault;

make_log_macro!(debug, "config");

#[derive(Deserialize, Clone, Debug, SmartDefault, PartialEq)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct DeviceConfig {
    /// How the device's raw brightness maps to the normalized value.
    pub mode: ConversionMode,

    /// Replaces the range reported by the device, given as `[minimum, maximum]`.
    #[default(None)]
    #[serde(deserialize_with = "deserialize_range")]
    pub range: Option<[u32; 2]>,
}

impl DeviceConfig {
    /// The configured range if any, otherwise what the device reported.
    pub fn apply_range(&self, reported: BrightnessRange) -> BrightnessRange {
        match self.range {
            Some([minimum, maximum]) => BrightnessRange::new(minimum, maximum),
            None => reported,
        }
    }
}

fn deserialize_range<'de, D>(deserializer: D) -> Result<Option<[u32; 2]>, D::Error>
where
    D: Deserializer<'de>,
{
    let range: [u32; 2] = Deserialize::deserialize(deserializer)?;
    debug!("{:?}", range);
    if range[0] >= range[1] {
        return Err(serde::de::Error::invalid_value(
            serde::de::Unexpected::Other(format!("{range:?}").as_str()),
            &format!("Invalid range: {} >= {}", range[0], range[1]).as_str(),
        ));
    }
    Ok(Some(range))
}

#[derive(Deserialize, Clone, Debug, SmartDefault, PartialEq)]
#[serde(default)]
pub struct ScreenBrightnessConfig {
    global: DeviceConfig,
    #[serde(flatten)]
    overrides: HashMap<String, DeviceConfig>,
}

impl ScreenBrightnessConfig {
    /// Read `config.toml` from the user's config dir, or use the defaults
    /// when there is none.
    pub fn new() -> Result<Self> {
        match dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join("config.toml")) {
            Some(config_path) if config_path.exists() => {
                debug!("loading {}", config_path.display());
                deserialize_toml_file(config_path)
            }
            _ => {
                debug!("no config file, using defaults");
                Ok(ScreenBrightnessConfig::default())
            }
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        deserialize_toml_str(contents)
    }

    pub fn global(&self) -> &DeviceConfig {
        &self.global
    }

    pub(crate) fn get_device_config(&self, device_name: &str) -> DeviceConfig {
        debug!("{}", device_name);
        if let Some(device_config) = self.overrides.get(device_name) {
            debug!("{:?}", device_config);
            device_config.clone()
        } else {
            debug!("using global config");
            self.global.clone()
        }
    }
}
