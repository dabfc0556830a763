use std::fmt;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Slack API token of the user running the merge
    #[arg(
        long,
        env = "SLACK_TOKEN",
        default_value = "",
        hide_default_value = true,
        hide_env_values = true
    )]
    pub token: String,

    /// Channel to merge into
    #[arg(long = "new_channel", visible_alias = "new-channel")]
    pub new_channel: String,

    /// Channels to merge from, comma separated
    #[arg(
        long = "previous_channels",
        visible_alias = "previous-channels",
        value_delimiter = ',',
        required = true
    )]
    pub previous_channels: Vec<String>,

    /// Pause between two posts in milliseconds [default: 1000]
    #[arg(long, value_name = "MS")]
    pub post_delay_ms: Option<u64>,

    /// Slack Web API base URL
    #[arg(long, env = "SLACK_API_URL")]
    pub api_url: Option<String>,

    /// Log verbosity
    #[arg(short, long, value_name = "LEVEL", default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

impl From<LogLevel> for LevelFilter {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Off => LevelFilter::Off,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
            LogLevel::Off => write!(f, "off"),
        }
    }
}
