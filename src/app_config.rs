//! File configuration for CLI defaults and its merge with command-line flags.
//!
//! The file is a flat `key = value` list at
//! `$XDG_CONFIG_HOME/tracker-scraper/config.toml`. Strings are double-quoted,
//! `#` starts a comment. Unknown keys are rejected.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tracker_core::ScraperConfig;

use crate::cli::Args;

const APP_DIR: &str = "tracker-scraper";

/// Values read from the config file; `None` means "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    pub base_url: Option<String>,
    pub request_delay_ms: Option<u64>,
    pub max_retries: Option<u32>,
    pub rate_limit_fallback_secs: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
    pub read_timeout_secs: Option<u64>,
    pub output_dir: Option<PathBuf>,
    pub verbosity: Option<VerbositySetting>,
}

impl FileConfig {
    /// Applies the same ranges the command line enforces.
    pub fn validate(&self) -> Result<()> {
        if let Some(delay) = self.request_delay_ms.filter(|delay| *delay > 60_000) {
            bail!("Invalid config value for `request_delay_ms`: {delay}. Expected range: 0..=60000");
        }
        if let Some(retries) = self.max_retries.filter(|n| !(1..=10).contains(n)) {
            bail!("Invalid config value for `max_retries`: {retries}. Expected range: 1..=10");
        }
        validate_secs("rate_limit_fallback_secs", self.rate_limit_fallback_secs, 0)?;
        validate_secs("connect_timeout_secs", self.connect_timeout_secs, 1)?;
        validate_secs("read_timeout_secs", self.read_timeout_secs, 1)?;
        Ok(())
    }
}

fn validate_secs(field: &str, value: Option<u64>, min: u64) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(min..=3600).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: {min}..=3600");
    }
    Ok(())
}

/// Config-file verbosity labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbositySetting {
    Default,
    Verbose,
    Quiet,
    Debug,
}

impl VerbositySetting {
    /// Log level this setting selects.
    #[must_use]
    pub fn level(self) -> &'static str {
        match self {
            Self::Default => "info",
            Self::Verbose => "debug",
            Self::Quiet => "error",
            Self::Debug => "trace",
        }
    }
}

/// Resolves the default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/tracker-scraper/config.toml`
/// 2. `$HOME/.config/tracker-scraper/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg_config_home).join(APP_DIR).join("config.toml"));
    }
    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads the config file from the default path; `None` when there is none.
pub fn load_default_file_config() -> Result<Option<(PathBuf, FileConfig)>> {
    let Some(path) = resolve_default_config_path() else {
        return Ok(None);
    };
    if !path.exists() {
        return Ok(None);
    }
    let config = load_file_config(&path)?;
    Ok(Some((path, config)))
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line_no = line_index + 1;
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_no}: expected key = value");
        };
        let key = raw_key.trim();
        let value = raw_value.trim();
        let context = || format!("Invalid `{key}` value on line {line_no}");

        match key {
            "base_url" => cfg.base_url = Some(parse_string_literal(value).with_context(context)?),
            "request_delay_ms" => {
                cfg.request_delay_ms = Some(parse_integer_u64(value).with_context(context)?);
            }
            "max_retries" => {
                let parsed = parse_integer_u64(value).with_context(context)?;
                let n = u32::try_from(parsed)
                    .map_err(|_| anyhow::anyhow!("max_retries out of range for u32"))?;
                cfg.max_retries = Some(n);
            }
            "rate_limit_fallback_secs" => {
                cfg.rate_limit_fallback_secs = Some(parse_integer_u64(value).with_context(context)?);
            }
            "connect_timeout_secs" => {
                cfg.connect_timeout_secs = Some(parse_integer_u64(value).with_context(context)?);
            }
            "read_timeout_secs" => {
                cfg.read_timeout_secs = Some(parse_integer_u64(value).with_context(context)?);
            }
            "output_dir" => {
                cfg.output_dir = Some(PathBuf::from(
                    parse_string_literal(value).with_context(context)?,
                ));
            }
            "verbosity" => {
                let parsed = parse_string_literal(value).with_context(context)?;
                cfg.verbosity = Some(parse_verbosity(&parsed).with_context(|| {
                    format!("Invalid `verbosity` value '{parsed}' on line {line_no}")
                })?);
            }
            unknown => bail!("Unknown configuration key: '{unknown}' on line {line_no}"),
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        bail!("Expected double-quoted string");
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}

fn parse_integer_u64(raw_value: &str) -> Result<u64> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<i128>()?;
    if value < 0 {
        bail!("Expected non-negative integer");
    }
    u64::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for u64"))
}

fn parse_verbosity(value: &str) -> Result<VerbositySetting> {
    match value {
        "default" => Ok(VerbositySetting::Default),
        "verbose" => Ok(VerbositySetting::Verbose),
        "quiet" => Ok(VerbositySetting::Quiet),
        "debug" => Ok(VerbositySetting::Debug),
        _ => bail!("Expected one of: default, verbose, quiet, debug"),
    }
}

/// Everything a run needs after merging flags, file and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub client_id: String,
    pub scraper: ScraperConfig,
    pub output_dir: PathBuf,
    /// Default log level when `RUST_LOG` is unset.
    pub log_level: &'static str,
}

/// Merges command-line flags over file values over built-in defaults.
#[must_use]
pub fn resolve_run_settings(args: &Args, file: Option<&FileConfig>) -> RunSettings {
    let file = file.cloned().unwrap_or_default();
    let mut scraper = ScraperConfig::default();

    if let Some(base_url) = args.base_url.clone().or(file.base_url) {
        scraper.base_url = base_url;
    }
    if let Some(delay_ms) = args.delay_ms.or(file.request_delay_ms) {
        scraper.fetch.request_delay = Duration::from_millis(delay_ms);
    }
    if let Some(attempts) = args.max_retries.or(file.max_retries) {
        scraper.fetch.max_attempts = attempts;
    }
    if let Some(secs) = file.rate_limit_fallback_secs {
        scraper.fetch.rate_limit_fallback = Duration::from_secs(secs);
    }
    if let Some(secs) = file.connect_timeout_secs {
        scraper.fetch.connect_timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = file.read_timeout_secs {
        scraper.fetch.read_timeout = Duration::from_secs(secs);
    }

    let log_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => file.verbosity.map_or("info", VerbositySetting::level),
            1 => "debug",
            _ => "trace",
        }
    };

    RunSettings {
        client_id: args.client_id().to_string(),
        scraper,
        output_dir: args
            .output_dir
            .clone()
            .or(file.output_dir)
            .unwrap_or_else(|| PathBuf::from(".")),
        log_level,
    }
}
