use std::{
    env,
    path::{Path, PathBuf},
};

use config::{Config, File};
use log::debug;
use serde::Deserialize;

use crate::cli::Args;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    pub token: Option<String>,
    pub api_url: Option<String>,
    pub post_delay_ms: Option<u64>,
}

const CONFIG_FILE_NAME: &str = env!("CARGO_PKG_NAME");

// $XDG_CONFIG_HOME, or $HOME/.config when unset
fn get_xdg_config_path() -> Option<PathBuf> {
    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg_config));
    }

    if let Ok(home) = env::var("HOME") {
        return Some(PathBuf::from(home).join(".config"));
    }

    None
}

pub fn config_file_path() -> Option<PathBuf> {
    get_xdg_config_path().map(|xdg_config| xdg_config.join(CONFIG_FILE_NAME).join("config.toml"))
}

pub fn load_settings(config_path: &Path) -> anyhow::Result<Settings> {
    if !config_path.exists() {
        return Ok(Settings::default());
    }

    Config::builder()
        .add_source(File::from(config_path).required(false))
        .build()?
        .try_deserialize()
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to deserialize config file {}: {}",
                config_path.display(),
                e
            )
        })
}

/// Fill values missing from the command line with the config file's.
pub fn apply_settings(args: &Args, settings: Settings) -> Args {
    let mut new_args = args.clone();

    if let Some(token) = settings.token
        && new_args.token.is_empty()
    {
        new_args.token = token;
    }

    if new_args.api_url.is_none() {
        new_args.api_url = settings.api_url;
    }

    if new_args.post_delay_ms.is_none() {
        new_args.post_delay_ms = settings.post_delay_ms;
    }

    new_args
}

pub fn merge_settings_with_args(args: &Args) -> anyhow::Result<Args> {
    let settings = match config_file_path() {
        Some(config_path) => load_settings(&config_path)?,
        None => Settings::default(),
    };

    let new_args = apply_settings(args, settings);
    debug!(
        "merged config: new_channel={} previous_channels={:?} api_url={:?} post_delay_ms={:?}",
        new_args.new_channel, new_args.previous_channels, new_args.api_url, new_args.post_delay_ms
    );

    Ok(new_args)
}
