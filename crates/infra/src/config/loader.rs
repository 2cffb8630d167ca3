//! Configuration loader
//!
//! Loads application configuration from a file and/or environment variables.
//!
//! ## Loading Strategy
//! 1. Probe the standard locations for a config file (JSON or TOML)
//! 2. Start from that file, or from defaults when none is found
//! 3. Apply `SLOTWISE_*` environment overrides on top
//!
//! ## Environment Variables
//! - `SLOTWISE_GOOGLE_CLIENT_ID`: OAuth client id
//! - `SLOTWISE_GOOGLE_CLIENT_SECRET`: OAuth client secret
//! - `SLOTWISE_GOOGLE_API_BASE_URL`: Calendar API base URL
//! - `SLOTWISE_GOOGLE_TOKEN_ENDPOINT`: OAuth token endpoint
//! - `SLOTWISE_HTTP_TIMEOUT_SECS`: Per-request timeout
//! - `SLOTWISE_HTTP_MAX_ATTEMPTS`: Attempts per outbound request
//! - `SLOTWISE_MAX_PAGES`: Event pages fetched per calendar
//! - `SLOTWISE_TOKEN_LIFETIME_SECS`: Assumed token lifetime when the provider omits it
//! - `SLOTWISE_DEFAULT_CALENDAR_ID`: Fallback calendar id
//! - `SLOTWISE_BIND_ADDRESS`: HTTP listen address
//! - `SLOTWISE_DATA_PATH`: JSON record file
//! - `SLOTWISE_LOG_LEVEL`: Default log filter
//! - `SLOTWISE_LOG_JSON`: Emit JSON log lines (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./slotwise.json` or `./slotwise.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. The same names one and two directories up
//! 4. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use slotwise_domain::{Config, Result, SlotwiseError};

const CONFIG_FILE_NAMES: [&str; 4] = ["slotwise.json", "slotwise.toml", "config.json", "config.toml"];

/// Load configuration with automatic fallback strategy
///
/// Uses the first config file found by [`probe_config_paths`], or the
/// built-in defaults when there is none, then applies environment
/// overrides.
///
/// # Errors
/// Returns `SlotwiseError::Config` if a config file exists but cannot be
/// parsed, or an environment override has an invalid value.
pub fn load() -> Result<Config> {
    let base = match probe_config_paths() {
        Some(path) => load_from_file(Some(path))?,
        None => {
            tracing::debug!("No config file found, starting from defaults");
            Config::default()
        }
    };

    let config = apply_env_overrides(base)?;
    validate(&config)?;
    Ok(config)
}

/// Load configuration from environment variables only
///
/// Unset variables keep their default. The Google client credentials are
/// required.
///
/// # Errors
/// Returns `SlotwiseError::Config` if a required variable is missing or a
/// value does not parse.
pub fn load_from_env() -> Result<Config> {
    let mut config = apply_env_overrides(Config::default())?;
    config.google.client_id = env_var("SLOTWISE_GOOGLE_CLIENT_ID")?;
    config.google.client_secret = env_var("SLOTWISE_GOOGLE_CLIENT_SECRET")?;
    validate(&config)?;
    tracing::info!("Configuration loaded from environment variables");
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `SlotwiseError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(SlotwiseError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            SlotwiseError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| SlotwiseError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| SlotwiseError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| SlotwiseError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(SlotwiseError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.extend([exe_dir.to_path_buf(), exe_dir.join(".."), exe_dir.join("../..")]);
        }
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

fn apply_env_overrides(mut config: Config) -> Result<Config> {
    override_string("SLOTWISE_GOOGLE_CLIENT_ID", &mut config.google.client_id);
    override_string("SLOTWISE_GOOGLE_CLIENT_SECRET", &mut config.google.client_secret);
    override_string("SLOTWISE_GOOGLE_API_BASE_URL", &mut config.google.api_base_url);
    override_string("SLOTWISE_GOOGLE_TOKEN_ENDPOINT", &mut config.google.token_endpoint);
    override_parsed("SLOTWISE_HTTP_TIMEOUT_SECS", &mut config.google.request_timeout_secs)?;
    override_parsed("SLOTWISE_HTTP_MAX_ATTEMPTS", &mut config.google.max_attempts)?;

    override_parsed("SLOTWISE_MAX_PAGES", &mut config.availability.max_pages_per_calendar)?;
    override_parsed(
        "SLOTWISE_TOKEN_LIFETIME_SECS",
        &mut config.availability.default_token_lifetime_secs,
    )?;
    override_string("SLOTWISE_DEFAULT_CALENDAR_ID", &mut config.availability.default_calendar_id);

    override_string("SLOTWISE_BIND_ADDRESS", &mut config.server.bind_address);
    override_string("SLOTWISE_DATA_PATH", &mut config.storage.data_path);
    override_string("SLOTWISE_LOG_LEVEL", &mut config.logging.level);
    config.logging.json = env_bool("SLOTWISE_LOG_JSON", config.logging.json);

    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.availability.max_pages_per_calendar == 0 {
        return Err(SlotwiseError::Config(
            "availability.max_pages_per_calendar must be at least 1".to_string(),
        ));
    }
    if config.availability.default_token_lifetime_secs <= 0 {
        return Err(SlotwiseError::Config(
            "availability.default_token_lifetime_secs must be positive".to_string(),
        ));
    }
    if config.availability.default_calendar_id.trim().is_empty() {
        return Err(SlotwiseError::Config(
            "availability.default_calendar_id must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or_else(|| SlotwiseError::Config(format!("Missing required environment variable: {key}")))
}

fn override_string(key: &str, target: &mut String) {
    if let Ok(value) = std::env::var(key) {
        if !value.is_empty() {
            *target = value;
        }
    }
}

fn override_parsed<T>(key: &str, target: &mut T) -> Result<()>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if let Ok(raw) = std::env::var(key) {
        *target = raw
            .trim()
            .parse()
            .map_err(|e| SlotwiseError::Config(format!("Invalid value for {key}: {e}")))?;
    }
    Ok(())
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
