use crate::config::DeviceConfig;
use crate::consts::*;
use crate::converter::{BrightnessRange, ConversionMode, denormalize, normalize_linear};
use crate::errors::*;
use crate::platform::{DisplayBrightness, DisplayPlatform};
use crate::util::*;

use std::cmp::max;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use regex::Regex;
use zbus::blocking::Connection;

make_log_macro!(debug, "device");

#[zbus::dbus_proxy(
    interface = "org.freedesktop.login1.Session",
    default_service = "org.freedesktop.login1",
    default_path = "/org/freedesktop/login1/session/auto"
)]
trait Session {
    fn set_brightness(&self, subsystem: &str, name: &str, brightness: u32) -> zbus::Result<()>;
}

/// A sysfs backlight device used as the display surface.
///
/// The backlight has no separate "system" setting, so the value read while no
/// override is active is remembered. It is what reads report while an
/// override is on the panel, and what [`DisplayBrightness::SystemDefault`]
/// writes back.
pub struct Device {
    pub device_name: String,
    pub read_brightness_file: PathBuf,
    write_brightness_file: PathBuf,
    max_brightness_file: PathBuf,
    config: DeviceConfig,
    range: BrightnessRange,
    mode: ConversionMode,
    system_raw: Option<u32>,
    overriding: bool,
    dbus_proxy: Option<SessionProxyBlocking<'static>>,
}

impl Device {
    pub fn new(device_name: &str, config: DeviceConfig) -> Result<Self> {
        let mut device = Self::at(Path::new(DEVICES_PATH), device_name, config)?;
        let dbus_proxy = Connection::system().and_then(|conn| SessionProxyBlocking::new(&conn));
        device.dbus_proxy = match dbus_proxy {
            Ok(proxy) => Some(proxy),
            Err(e) => {
                debug!("logind unavailable, writing sysfs directly: {e}");
                None
            }
        };
        Ok(device)
    }

    /// A device under `devices_path` that only talks to sysfs.
    pub(crate) fn at(devices_path: &Path, device_name: &str, config: DeviceConfig) -> Result<Self> {
        let device_path = devices_path.join(device_name);
        if !device_path.is_dir() {
            return Err(BrightnessError::NoDevices);
        }

        Ok(Self {
            read_brightness_file: device_path.join({
                if device_path.ends_with("amdgpu_bl0") {
                    FILE_BRIGHTNESS_AMD
                } else {
                    FILE_BRIGHTNESS
                }
            }),
            write_brightness_file: device_path.join(FILE_BRIGHTNESS_WRITE),
            max_brightness_file: device_path.join(FILE_MAX_BRIGHTNESS),
            device_name: device_name.into(),
            config,
            range: BrightnessRange::default(),
            mode: ConversionMode::default(),
            system_raw: None,
            overriding: false,
            dbus_proxy: None,
        })
    }

    /// Name of the first (sorted) backlight device matching `device_regex`.
    pub fn find(device_regex: &Regex) -> Result<String> {
        Self::find_in(Path::new(DEVICES_PATH), device_regex)
    }

    pub(crate) fn find_in(devices_path: &Path, device_regex: &Regex) -> Result<String> {
        let mut device_names = Vec::new();
        for entry in std::fs::read_dir(devices_path)? {
            let device_name = entry?.file_name().to_string_lossy().to_string();
            if device_regex.is_match(&device_name) {
                debug!("{:?} matched {}", device_name, device_regex.as_str());
                device_names.push(device_name);
            }
        }
        device_names.sort();
        device_names.into_iter().next().ok_or(BrightnessError::NoDevices)
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    fn write_raw(&self, raw: u32) -> Result<()> {
        let via_dbus = match &self.dbus_proxy {
            Some(proxy) => proxy
                .set_brightness("backlight", &self.device_name, raw)
                .map_err(|e| {
                    debug!("{e}");
                }),
            None => Err(()),
        };
        if via_dbus.is_ok() {
            return Ok(());
        }

        // Fall back to writing to sysfs brightness file
        let mut file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&self.write_brightness_file)
            .map_err(|e| {
                BrightnessError::DisplayWriteFailed(format!(
                    "could not open {}: {e}",
                    self.write_brightness_file.display()
                ))
            })?;
        file.write_all(raw.to_string().as_bytes()).map_err(|e| {
            BrightnessError::DisplayWriteFailed(format!("could not write sysfs brightness: {e}"))
        })
    }
}

impl DisplayPlatform for Device {
    fn read_brightness_range(&mut self) -> Result<BrightnessRange> {
        let max_brightness = read_u32(&self.max_brightness_file)?;
        let range = self
            .config
            .apply_range(BrightnessRange::new(0, max_brightness));
        debug!("{} range {:?}", self.device_name, range);
        self.range = range;
        Ok(range)
    }

    fn read_system_brightness_raw(&mut self) -> Result<u32> {
        if let (true, Some(raw)) = (self.overriding, self.system_raw) {
            // actual_brightness shows our override, not the system value
            return Ok(raw);
        }
        let raw = read_u32(&self.read_brightness_file)?;
        self.system_raw = Some(raw);
        Ok(raw)
    }

    fn read_system_brightness_float(&mut self) -> Result<f64> {
        let raw = self.read_system_brightness_raw()?;
        normalize_linear(raw, self.range)
    }

    fn use_conversion(&mut self, range: BrightnessRange, mode: ConversionMode) {
        debug!("{} using {:?} over {:?}", self.device_name, mode, range);
        self.range = range;
        self.mode = mode;
    }

    fn write_display_brightness(&mut self, brightness: DisplayBrightness) -> Result<()> {
        let raw = match brightness {
            DisplayBrightness::Override(value) => max(1, denormalize(value, self.range, self.mode)),
            DisplayBrightness::SystemDefault => match self.system_raw {
                Some(raw) => raw,
                None => self.read_system_brightness_raw()?,
            },
        };
        debug!("{} <- {raw} ({:?})", self.device_name, brightness);
        self.write_raw(raw)?;
        self.overriding = matches!(brightness, DisplayBrightness::Override(_));
        Ok(())
    }

    #[cfg(feature = "watch")]
    fn watch_path(&self) -> Option<PathBuf> {
        Some(self.read_brightness_file.clone())
    }
}
