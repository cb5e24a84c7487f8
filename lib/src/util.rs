use std::path::Path;

use serde::de::DeserializeOwned;

use crate::errors::*;

macro_rules! make_log_macro {
    (@wdoll $macro_name:ident, $block_name:literal, ($dol:tt)) => {
        #[allow(unused_macros)]
        macro_rules! $macro_name {
            ($dol($args:tt)+) => {
                ::log::$macro_name!(target: $block_name, $dol($args)+);
            };
        }
    };
    ($macro_name:ident, $block_name:literal) => {
        make_log_macro!(@wdoll $macro_name, $block_name, ($));
    };
}

pub fn deserialize_toml_file<T, P>(path: P) -> Result<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    let contents = read_file(path)?;

    toml::from_str(&contents).map_err(|err| {
        BrightnessError::Config(format!(
            "Failed to deserialize TOML file {}{}",
            path.display(),
            describe_toml_error(&contents, &err)
        ))
    })
}

pub fn deserialize_toml_str<T>(contents: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    toml::from_str(contents).map_err(|err| {
        BrightnessError::Config(format!(
            "Failed to deserialize TOML{}",
            describe_toml_error(contents, &err)
        ))
    })
}

fn describe_toml_error(contents: &str, err: &toml::de::Error) -> String {
    let location_msg = err
        .span()
        .map(|span| {
            let line = 1 + contents.as_bytes()[..(span.start)]
                .iter()
                .filter(|b| **b == b'\n')
                .count();
            format!(" at line {line}")
        })
        .unwrap_or_default();
    format!("{location_msg}: {}", err.message())
}

pub fn read_file(path: impl AsRef<Path>) -> std::io::Result<String> {
    let content = std::fs::read_to_string(path)?;
    Ok(content.trim_end().to_string())
}

pub fn read_u32(path: impl AsRef<Path>) -> Result<u32> {
    Ok(read_file(path)?.trim().parse()?)
}
