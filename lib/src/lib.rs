//! Screen brightness for a single session.
//!
//! [`ScreenBrightness`] reads the system brightness setting through a
//! [`DisplayPlatform`], lets the user override it for the session, restores
//! the system default, and tells one listener whenever the effective
//! brightness changes. All brightness values are normalized to 0.0-1.0.
//!
//! ```
//! use screen_brightness::{BrightnessRange, ConversionMode, MockPlatform, ScreenBrightnessBuilder};
//!
//! let platform = MockPlatform::new()
//!     .with_range(Some(BrightnessRange::new(0, 12)))
//!     .with_system_raw(3);
//! let mut session = ScreenBrightnessBuilder::new()
//!     .with_mode(ConversionMode::Gamma)
//!     .build_with_platform(platform)?;
//! assert_eq!(session.system_brightness(), 756.0 / 1023.0);
//!
//! let mut changes = session.subscribe();
//! session.set_brightness(0.8)?;
//! assert_eq!(changes.try_recv(), Ok(0.8));
//! # Ok::<(), screen_brightness::BrightnessError>(())
//! ```
#![warn(clippy::match_same_arms)]
#![warn(clippy::semicolon_if_nothing_returned)]
#![warn(clippy::unnecessary_wraps)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[macro_use]
mod util;
mod config;
mod consts;
mod converter;
mod device;
mod errors;
mod mock;
mod notifier;
mod platform;
mod state;
#[cfg(feature = "watch")]
mod watcher;

#[cfg(feature = "watch")]
use std::time::Instant;

use regex::Regex;

pub use crate::config::{DeviceConfig, ScreenBrightnessConfig};
pub use crate::converter::{
    BrightnessRange, ConversionMode, denormalize, lerp, normalize, normalize_gamma,
    normalize_linear, to_raw, validate_normalized,
};
pub use crate::device::Device;
pub use crate::errors::{BrightnessError, Result};
pub use crate::mock::MockPlatform;
pub use crate::notifier::BrightnessReceiver;
pub use crate::platform::{DisplayBrightness, DisplayPlatform};
pub use crate::state::{SessionPhase, SessionState};
#[cfg(feature = "watch")]
pub use crate::watcher::Duration;

use crate::notifier::ChangeNotifier;
#[cfg(feature = "watch")]
use crate::watcher::*;

make_log_macro!(debug, "screen_brightness");
make_log_macro!(warn, "screen_brightness");

/// Used to construct [`ScreenBrightness`]
pub struct ScreenBrightnessBuilder<'a> {
    device_regex: &'a str,
    config: Option<ScreenBrightnessConfig>,
    mode: Option<ConversionMode>,
    #[cfg(feature = "watch")]
    poll_interval: Duration,
}

impl Default for ScreenBrightnessBuilder<'_> {
    fn default() -> Self {
        Self {
            device_regex: ".",
            config: None,
            mode: None,
            #[cfg(feature = "watch")]
            poll_interval: Duration::from_secs(2),
        }
    }
}

impl<'a> ScreenBrightnessBuilder<'a> {
    /// Create a new [`ScreenBrightnessBuilder`].
    pub fn new() -> Self {
        ScreenBrightnessBuilder::default()
    }

    /// Defaults to `"."` (first backlight device in name order).
    pub fn with_device_regex(mut self, device_regex: &'a str) -> Self {
        self.device_regex = device_regex;
        self
    }

    /// Defaults to [`ScreenBrightnessConfig::new()`] for [`build`](Self::build)
    /// and to the default config for [`build_with_platform`](Self::build_with_platform).
    pub fn with_config(mut self, config: ScreenBrightnessConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Takes precedence over the configured mode.
    pub fn with_mode(mut self, mode: ConversionMode) -> Self {
        self.mode = Some(mode);
        self
    }

    #[cfg(feature = "watch")]
    #[cfg_attr(docsrs, doc(cfg(feature = "watch")))]
    /// Default poll_interval is 2 seconds.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Returns a [`ScreenBrightness`] driving the matching sysfs backlight device.
    pub fn build(self) -> Result<ScreenBrightness<Device>> {
        let config = match self.config {
            Some(config) => config,
            None => ScreenBrightnessConfig::new()?,
        };

        let device_name = Device::find(&Regex::new(self.device_regex)?)?;
        let device_config = config.get_device_config(&device_name);
        let device = Device::new(&device_name, device_config.clone())?;

        ScreenBrightness::new(
            device,
            self.mode.unwrap_or(device_config.mode),
            &device_config,
            #[cfg(feature = "watch")]
            self.poll_interval,
        )
    }

    /// Returns a [`ScreenBrightness`] driving a host supplied platform.
    /// The global section of the config applies.
    pub fn build_with_platform<P: DisplayPlatform>(
        self,
        platform: P,
    ) -> Result<ScreenBrightness<P>> {
        let config = self.config.unwrap_or_default();
        let device_config = config.global();

        ScreenBrightness::new(
            platform,
            self.mode.unwrap_or(device_config.mode),
            device_config,
            #[cfg(feature = "watch")]
            self.poll_interval,
        )
    }
}

/// Brightness control for one session on one display surface.
pub struct ScreenBrightness<P: DisplayPlatform> {
    platform: P,
    range: BrightnessRange,
    mode: ConversionMode,
    state: SessionState,
    notifier: ChangeNotifier,
    #[cfg(feature = "watch")]
    watcher: Option<(PollWatcher, Receiver<notify::Result<notify::Event>>)>,
    #[cfg(feature = "watch")]
    last_write: Option<Instant>,
    #[cfg(feature = "watch")]
    poll_interval: Duration,
}

impl<P: DisplayPlatform> ScreenBrightness<P> {
    pub(crate) fn new(
        mut platform: P,
        mode: ConversionMode,
        device_config: &DeviceConfig,
        #[cfg(feature = "watch")] poll_interval: Duration,
    ) -> Result<Self> {
        let reported = platform.read_brightness_range().unwrap_or_else(|e| {
            warn!("could not read brightness range, using default: {e}");
            BrightnessRange::default()
        });
        let mut range = device_config.apply_range(reported);
        if range.is_degenerate() {
            warn!("degenerate brightness range {:?}, using default", range);
            range = BrightnessRange::default();
        }

        platform.use_conversion(range, mode);
        let system_brightness = read_system_brightness(&mut platform, range, mode)?;
        debug!(
            "range {:?}, mode {:?}, system brightness {}",
            range, mode, system_brightness
        );

        #[cfg(feature = "watch")]
        let watcher = match platform.watch_path() {
            Some(path) => Some(brightness_file_watcher(path, poll_interval)?),
            None => None,
        };

        Ok(Self {
            platform,
            range,
            mode,
            state: SessionState::new(system_brightness),
            notifier: ChangeNotifier::default(),
            #[cfg(feature = "watch")]
            watcher,
            #[cfg(feature = "watch")]
            last_write: None,
            #[cfg(feature = "watch")]
            poll_interval,
        })
    }

    /// Last known system brightness, ignoring any override.
    pub fn system_brightness(&self) -> f64 {
        self.state.system_brightness()
    }

    /// The brightness currently applied: the override if any, else the system brightness.
    pub fn current_brightness(&self) -> f64 {
        self.state.current_effective_brightness()
    }

    /// Whether the brightness was overridden in this session.
    pub fn has_changed(&self) -> bool {
        self.state.has_override()
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase()
    }

    pub fn range(&self) -> BrightnessRange {
        self.range
    }

    pub fn mode(&self) -> ConversionMode {
        self.mode
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Override the brightness for this session.
    /// Brightness is in range 0.0 to 1.0 (inclusive).
    ///
    /// Nothing changes and no listener is told when the display rejects the value.
    pub fn set_brightness(&mut self, brightness: f64) -> Result<()> {
        let brightness = validate_normalized(brightness)?;
        self.platform
            .write_display_brightness(DisplayBrightness::Override(brightness))?;
        self.mark_written();

        let changed = self.state.set_override(brightness);
        self.notifier.notify(changed);
        Ok(())
    }

    /// Drop the override and go back to the system brightness.
    pub fn reset_brightness(&mut self) -> Result<()> {
        self.platform
            .write_display_brightness(DisplayBrightness::SystemDefault)?;
        self.mark_written();

        let changed = self.state.reset_override();
        self.notifier.notify(changed);
        Ok(())
    }

    /// Re-read the system brightness, e.g. after the host saw the setting change.
    pub fn refresh_system_brightness(&mut self) -> Result<f64> {
        let brightness = read_system_brightness(&mut self.platform, self.range, self.mode)?;
        self.report_system_brightness(brightness)?;
        Ok(brightness)
    }

    /// Record an already normalized system brightness.
    /// Listeners only hear about it while no override is active.
    pub fn report_system_brightness(&mut self, brightness: f64) -> Result<()> {
        let brightness = validate_normalized(brightness)?;
        match self.state.report_system_brightness_changed(brightness) {
            Some(changed) => self.notifier.notify(changed),
            None => {
                debug!("system brightness {brightness} masked by override");
            }
        }
        Ok(())
    }

    /// Start receiving brightness changes. Replaces the previous listener.
    pub fn subscribe(&mut self) -> BrightnessReceiver {
        self.notifier.subscribe()
    }

    pub fn unsubscribe(&mut self) {
        self.notifier.unsubscribe();
    }

    pub fn has_listener(&self) -> bool {
        self.notifier.is_subscribed()
    }

    #[cfg(feature = "watch")]
    fn mark_written(&mut self) {
        self.last_write = Some(Instant::now());
    }

    #[cfg(not(feature = "watch"))]
    fn mark_written(&mut self) {}

    #[cfg(feature = "watch")]
    #[cfg_attr(docsrs, doc(cfg(feature = "watch")))]
    /// Block until the system brightness changes, then refresh it.
    ///
    /// Changes within one poll interval of our own writes are ignored.
    pub fn next(&mut self) -> Result<f64> {
        use futures::StreamExt as _;

        loop {
            let Some((_, rx)) = self.watcher.as_mut() else {
                break;
            };
            let Some(res) = futures::executor::block_on(rx.next()) else {
                break;
            };
            let event = res?;
            debug!("{:?}", event);
            if !event.kind.is_modify() {
                continue;
            }
            if self
                .last_write
                .is_some_and(|written| written.elapsed() <= self.poll_interval)
            {
                debug!("ignoring change caused by our own write");
                continue;
            }
            return self.refresh_system_brightness();
        }
        Err(BrightnessError::Other("Nothing to watch".into()))
    }
}

fn read_system_brightness<P: DisplayPlatform>(
    platform: &mut P,
    range: BrightnessRange,
    mode: ConversionMode,
) -> Result<f64> {
    match mode {
        ConversionMode::Float => validate_normalized(platform.read_system_brightness_float()?),
        ConversionMode::Linear | ConversionMode::Gamma => {
            normalize(platform.read_system_brightness_raw()?, range, mode)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::error::TryRecvError;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// Session over a 0-10 linear range at the given raw system value.
    fn session_at(raw: u32) -> ScreenBrightness<MockPlatform> {
        init_logger();
        let platform = MockPlatform::new()
            .with_range(Some(BrightnessRange::new(0, 10)))
            .with_system_raw(raw);
        ScreenBrightnessBuilder::new()
            .build_with_platform(platform)
            .unwrap()
    }

    #[test]
    fn test_set_then_reset() {
        let mut session = session_at(5);
        assert_eq!(session.current_brightness(), 0.5);
        assert!(!session.has_changed());

        session.set_brightness(0.8).unwrap();
        assert_eq!(session.current_brightness(), 0.8);
        assert_eq!(session.system_brightness(), 0.5);
        assert!(session.has_changed());
        assert_eq!(session.platform().display, Some(0.8));

        session.reset_brightness().unwrap();
        assert_eq!(session.current_brightness(), 0.5);
        assert!(!session.has_changed());
        assert_eq!(session.platform().display, None);
        assert_eq!(
            session.platform().writes,
            vec![
                DisplayBrightness::Override(0.8),
                DisplayBrightness::SystemDefault
            ]
        );
    }

    #[test]
    fn test_notifications() {
        let mut session = session_at(5);
        let mut changes = session.subscribe();

        session.set_brightness(0.8).unwrap();
        session.report_system_brightness(0.3).unwrap();
        assert_eq!(session.current_brightness(), 0.8);
        session.reset_brightness().unwrap();
        session.report_system_brightness(0.6).unwrap();

        assert_eq!(changes.try_recv(), Ok(0.8));
        assert_eq!(changes.try_recv(), Ok(0.3));
        assert_eq!(changes.try_recv(), Ok(0.6));
        assert_eq!(changes.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn test_system_change_while_following() {
        let mut session = session_at(5);
        let mut changes = session.subscribe();
        session.report_system_brightness(0.3).unwrap();
        assert_eq!(session.current_brightness(), 0.3);
        assert_eq!(changes.try_recv(), Ok(0.3));
    }

    #[test]
    fn test_system_change_masked_by_override() {
        let mut session = session_at(5);
        let mut changes = session.subscribe();
        session.set_brightness(0.8).unwrap();
        assert_eq!(changes.try_recv(), Ok(0.8));

        session.report_system_brightness(0.3).unwrap();
        assert_eq!(session.current_brightness(), 0.8);
        assert_eq!(session.system_brightness(), 0.3);
        assert_eq!(changes.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn test_unsubscribe() {
        let mut session = session_at(5);
        let mut changes = session.subscribe();
        assert!(session.has_listener());
        session.unsubscribe();
        assert!(!session.has_listener());
        session.set_brightness(0.1).unwrap();
        assert_eq!(changes.try_recv(), Err(TryRecvError::Disconnected));
    }

    #[test]
    fn test_refresh_reads_platform() {
        let mut session = session_at(5);
        let mut changes = session.subscribe();

        session.platform.system_raw = 2;
        assert_eq!(session.refresh_system_brightness().unwrap(), 0.2);
        assert_eq!(session.current_brightness(), 0.2);
        assert_eq!(changes.try_recv(), Ok(0.2));

        session.platform.system_raw = 11;
        assert!(matches!(
            session.refresh_system_brightness(),
            Err(BrightnessError::InputOutOfDomain { raw: 11, .. })
        ));
        assert_eq!(session.system_brightness(), 0.2);
    }

    #[test]
    fn test_failed_write_leaves_state() {
        let mut session = session_at(5);
        let mut changes = session.subscribe();

        session.platform.fail_writes = true;
        assert!(matches!(
            session.set_brightness(0.9),
            Err(BrightnessError::DisplayWriteFailed(_))
        ));
        assert!(!session.has_changed());
        assert_eq!(session.current_brightness(), 0.5);

        session.platform.fail_writes = false;
        session.set_brightness(0.9).unwrap();
        session.platform.surface_attached = false;
        assert!(matches!(
            session.reset_brightness(),
            Err(BrightnessError::NoActiveSurface)
        ));
        assert!(session.has_changed());
        assert_eq!(session.current_brightness(), 0.9);

        assert_eq!(changes.try_recv(), Ok(0.9));
        assert_eq!(changes.try_recv(), Err(TryRecvError::Empty));
    }

    #[test]
    fn test_invalid_brightness_rejected() {
        let mut session = session_at(5);
        assert!(matches!(
            session.set_brightness(1.5),
            Err(BrightnessError::InvalidBrightness(_))
        ));
        assert!(session.report_system_brightness(f64::NAN).is_err());
        assert!(session.platform().writes.is_empty());
        assert_eq!(session.phase(), SessionPhase::Following);
    }

    #[test]
    fn test_range_fallbacks() {
        init_logger();
        let missing = MockPlatform::new().with_range(None).with_system_raw(51);
        let session = ScreenBrightnessBuilder::new()
            .build_with_platform(missing)
            .unwrap();
        assert_eq!(session.range(), BrightnessRange::default());
        assert_eq!(session.current_brightness(), 0.2);

        let degenerate = MockPlatform::new()
            .with_range(Some(BrightnessRange::new(100, 100)))
            .with_system_raw(51);
        let session = ScreenBrightnessBuilder::new()
            .build_with_platform(degenerate)
            .unwrap();
        assert_eq!(session.range(), BrightnessRange::new(0, 255));
    }

    #[test]
    fn test_config_range_and_mode() {
        init_logger();
        let config = ScreenBrightnessConfig::from_toml_str(
            "[global]\nmode = \"gamma\"\nrange = [0, 12]",
        )
        .unwrap();
        let platform = MockPlatform::new().with_system_raw(6);
        let session = ScreenBrightnessBuilder::new()
            .with_config(config)
            .build_with_platform(platform)
            .unwrap();
        assert_eq!(session.mode(), ConversionMode::Gamma);
        assert_eq!(session.range(), BrightnessRange::new(0, 12));
        assert_eq!(session.system_brightness(), 892.0 / 1023.0);
    }

    #[test]
    fn test_float_mode() {
        init_logger();
        let platform = MockPlatform::new().with_system_float(0.42);
        let mut session = ScreenBrightnessBuilder::new()
            .with_mode(ConversionMode::Float)
            .build_with_platform(platform)
            .unwrap();
        assert_eq!(session.system_brightness(), 0.42);

        session.platform.system_float = 1.2;
        assert!(matches!(
            session.refresh_system_brightness(),
            Err(BrightnessError::InvalidBrightness(_))
        ));
    }

    #[test]
    fn test_unreadable_system_brightness() {
        init_logger();
        let platform = MockPlatform::new().with_system_raw(300);
        assert!(
            ScreenBrightnessBuilder::new()
                .build_with_platform(platform)
                .is_err()
        );
    }
}
