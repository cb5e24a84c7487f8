use thiserror::Error;

use crate::converter::ConversionMode;

/// Result type returned from functions that can have our `Error`s.
pub type Result<T, E = BrightnessError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum BrightnessError {
    #[error("Degenerate brightness range [{minimum}, {maximum}]")]
    DegenerateRange { minimum: u32, maximum: u32 },

    #[error("Raw brightness {raw} is outside of [{minimum}, {maximum}]")]
    InputOutOfDomain { raw: u32, minimum: u32, maximum: u32 },

    #[error("Brightness {0} is not in the range 0.0 to 1.0")]
    InvalidBrightness(f64),

    #[error("Unable to change screen brightness: {0}")]
    DisplayWriteFailed(String),

    #[error("No display surface is available")]
    NoActiveSurface,

    #[error("Brightness reading is not supported in {0:?} mode")]
    UnsupportedReading(ConversionMode),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    InvalidRegex(#[from] regex::Error),

    #[cfg(feature = "watch")]
    #[error("{0}")]
    Notify(#[from] notify::Error),

    #[error("{0}")]
    DBus(#[from] zbus::Error),

    #[error("{0}")]
    ParseInt(#[from] std::num::ParseIntError),

    #[error("No matching devices exist")]
    NoDevices,

    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}
