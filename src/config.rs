use crate::error::ConfigError;
use chrono::NaiveDate;
use ratatui::style::Color;
use serde::Deserialize;
use std::{fmt::Write, fs, path::PathBuf, str::FromStr};

pub const APP_NAME: &str = "taskcards";

const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Loads the configuration.
///
/// An explicit `path` must exist. Without one, the user config directory is
/// tried and a missing file falls back to the defaults.
#[tracing::instrument]
pub fn load(path: Option<PathBuf>) -> Result<Config, ConfigError> {
    let path = match path {
        Some(path) => path,
        None => match default_path() {
            Some(path) if path.exists() => path,
            _ => {
                tracing::debug!("no config file found, using defaults");
                return Ok(Config::default());
            }
        },
    };

    let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    content.parse()
}

fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_NAME).join("config.toml"))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Card background for tasks due before today.
    pub past_due_color: Color,
    /// Card background for everything else.
    pub default_color: Color,
    /// strftime pattern used to show due dates on cards.
    pub date_format: String,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            past_due_color: Color::Red,
            default_color: Color::Reset,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            log_file: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigRaw {
    past_due_color: Option<String>,
    default_color: Option<String>,
    date_format: Option<String>,
    log_file: Option<PathBuf>,
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: ConfigRaw = toml::from_str(s)?;
        let defaults = Config::default();

        let date_format = match raw.date_format {
            Some(format) => check_date_format(format)?,
            None => defaults.date_format,
        };

        Ok(Config {
            past_due_color: parse_color(raw.past_due_color)?.unwrap_or(defaults.past_due_color),
            default_color: parse_color(raw.default_color)?.unwrap_or(defaults.default_color),
            date_format,
            log_file: raw.log_file,
        })
    }
}

/// Due dates carry no time or offset, so a pattern is only usable if it
/// formats a plain date without error.
fn check_date_format(format: String) -> Result<String, ConfigError> {
    let mut sample = String::new();
    match write!(sample, "{}", NaiveDate::default().format(&format)) {
        Ok(()) => Ok(format),
        Err(_) => Err(ConfigError::DateFormat(format)),
    }
}

fn parse_color(value: Option<String>) -> Result<Option<Color>, ConfigError> {
    value
        .map(|name| Color::from_str(&name).map_err(|_| ConfigError::Color(name)))
        .transpose()
}
