use screen_brightness::{
    BrightnessError, ConversionMode, Device, ScreenBrightness, ScreenBrightnessBuilder,
};

use clap::{ArgGroup, Parser, ValueEnum};

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Mode {
    Linear,
    Gamma,
    Float,
}

impl From<Mode> for ConversionMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Linear => ConversionMode::Linear,
            Mode::Gamma => ConversionMode::Gamma,
            Mode::Float => ConversionMode::Float,
        }
    }
}

/// Query and adjust screen brightness as a normalized percentage
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(group(
            ArgGroup::new("action")
                .required(true)
                .args(["get", "get_system", "set", "inc", "dec", "watch"]),
        ))]
struct Args {
    /// Regular expression for the backlight device to use
    #[arg(long, value_name = "regex", default_value_t = String::from("."))]
    device: String,

    /// How the raw device brightness maps to a percentage (overrides the config file)
    #[arg(long, value_enum)]
    mode: Option<Mode>,

    /// Print out the current brightness as a percentage.
    #[arg(long)]
    get: bool,

    /// Print out the system brightness as a percentage.
    #[arg(long)]
    get_system: bool,

    /// Sets the brightness to the specified level.
    #[arg(long, value_name = "percent")]
    set: Option<f64>,

    /// Increases brightness by the specified amount.
    #[arg(long, value_name = "percent")]
    inc: Option<f64>,

    /// Decreases brightness by the specified amount.
    #[arg(long, value_name = "percent")]
    dec: Option<f64>,

    /// Print the brightness every time the system brightness changes.
    #[arg(long)]
    watch: bool,
}

fn to_percent(brightness: f64) -> f64 {
    (brightness * 100.0).round()
}

fn main() -> Result<(), BrightnessError> {
    env_logger::init();
    let args = Args::parse();
    log::debug!("{:?}", args);

    let mut builder = ScreenBrightnessBuilder::new().with_device_regex(args.device.as_str());
    if let Some(mode) = args.mode {
        builder = builder.with_mode(mode.into());
    }
    let mut session = builder.build()?;

    let brightness = session.current_brightness();
    if args.get {
        println!("{:?}", to_percent(brightness));
    } else if args.get_system {
        println!("{:?}", to_percent(session.system_brightness()));
    } else if let Some(set) = args.set {
        session.set_brightness((set / 100.0).clamp(0.0, 1.0))?;
    } else if let Some(inc) = args.inc {
        session.set_brightness((brightness + inc / 100.0).clamp(0.0, 1.0))?;
    } else if let Some(dec) = args.dec {
        session.set_brightness((brightness - dec / 100.0).clamp(0.0, 1.0))?;
    } else if args.watch {
        watch(session)?;
    }

    Ok(())
}

#[cfg(feature = "watch")]
fn watch(mut session: ScreenBrightness<Device>) -> Result<(), BrightnessError> {
    let mut changes = session.subscribe();
    println!("{:?}", to_percent(session.current_brightness()));
    loop {
        session.next()?;
        while let Ok(brightness) = changes.try_recv() {
            println!("{:?}", to_percent(brightness));
        }
    }
}

#[cfg(not(feature = "watch"))]
fn watch(_session: ScreenBrightness<Device>) -> Result<(), BrightnessError> {
    Err(BrightnessError::Other("built without the `watch` feature".into()))
}
