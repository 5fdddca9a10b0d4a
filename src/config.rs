use config::{Config, ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::payroll::batch::{PayrollRunOptions, ProcessingMode};
use crate::stock::reposting::RecencyPolicy;
use crate::stock::timeslot::RepostingWindow;

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_PORT: u16 = 8080;
const CONFIG_DIR: &str = "config";
const DEFAULT_DEFER_THRESHOLD: usize = 30;
const DEFAULT_REPOST_START: &str = "00:00:00";
const DEFAULT_REPOST_END: &str = "00:00:00";

/// Manufacturing settings
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ManufacturingConfig {
    /// Percentage a work order may exceed the planned quantity by
    #[serde(default)]
    #[validate(custom = "validate_percentage")]
    pub overproduction_percentage_for_work_order: Decimal,
}

impl Default for ManufacturingConfig {
    fn default() -> Self {
        Self {
            overproduction_percentage_for_work_order: Decimal::ZERO,
        }
    }
}

/// Payroll settings
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct PayrollConfig {
    /// How salary slip batches run: "immediate", "deferred" or "threshold"
    #[serde(default)]
    pub processing_mode: ProcessingMode,

    /// Employee count above which the threshold mode defers
    #[serde(default = "default_defer_threshold")]
    #[validate(range(min = 1))]
    pub defer_threshold: usize,

    /// Create consolidated payment entries once every slip is submitted
    #[serde(default)]
    pub make_payment_entry: bool,
}

impl Default for PayrollConfig {
    fn default() -> Self {
        Self {
            processing_mode: ProcessingMode::default(),
            defer_threshold: default_defer_threshold(),
            make_payment_entry: false,
        }
    }
}

impl PayrollConfig {
    pub fn run_options(&self) -> PayrollRunOptions {
        PayrollRunOptions {
            mode: self.processing_mode,
            defer_threshold: self.defer_threshold,
            make_payment_entry: self.make_payment_entry,
        }
    }
}

/// Stock reposting settings
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct StockRepostingConfig {
    /// Only repost inside the configured window
    #[serde(default)]
    pub limit_reposting_timeslot: bool,

    #[serde(default = "default_repost_start")]
    #[validate(custom = "validate_time_of_day")]
    pub start_time: String,

    #[serde(default = "default_repost_end")]
    #[validate(custom = "validate_time_of_day")]
    pub end_time: String,

    /// Weekday on which the window does not apply (e.g. "Sunday")
    #[serde(default)]
    #[validate(custom = "validate_weekday")]
    pub limits_dont_apply_on: Option<String>,

    /// Which queued entry survives deduplication
    #[serde(default)]
    pub recency_policy: RecencyPolicy,

    /// How often the worker is asked to run queued reposts (seconds)
    #[serde(default = "default_repost_interval_secs")]
    #[validate(range(min = 1))]
    pub repost_interval_secs: u64,
}

impl Default for StockRepostingConfig {
    fn default() -> Self {
        Self {
            limit_reposting_timeslot: false,
            start_time: default_repost_start(),
            end_time: default_repost_end(),
            limits_dont_apply_on: None,
            recency_policy: RecencyPolicy::default(),
            repost_interval_secs: default_repost_interval_secs(),
        }
    }
}

impl StockRepostingConfig {
    /// Converts the textual settings into a window the gate can evaluate.
    pub fn window(&self) -> Result<RepostingWindow, AppConfigError> {
        let start = parse_time_of_day(&self.start_time)
            .ok_or_else(|| AppConfigError::Invalid(format!("start_time {}", self.start_time)))?;
        let end = parse_time_of_day(&self.end_time)
            .ok_or_else(|| AppConfigError::Invalid(format!("end_time {}", self.end_time)))?;
        let exempt_weekday = match &self.limits_dont_apply_on {
            Some(day) if !day.trim().is_empty() => Some(
                day.trim()
                    .parse::<chrono::Weekday>()
                    .map_err(|_| AppConfigError::Invalid(format!("weekday {}", day)))?,
            ),
            _ => None,
        };

        Ok(RepostingWindow {
            enabled: self.limit_reposting_timeslot,
            start,
            end,
            exempt_weekday,
        })
    }
}

/// Application configuration structure with validation
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Database connection URL
    #[validate(length(min = 1))]
    pub database_url: String,

    /// Server host address
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Application environment
    #[validate(length(min = 1))]
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    #[validate(custom = "validate_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// Whether to run database migrations on startup
    #[serde(default)]
    pub auto_migrate: bool,

    /// DB pool: max connections
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,

    /// DB pool: min connections
    #[serde(default = "default_db_min_connections")]
    pub db_min_connections: u32,

    /// DB timeouts (seconds)
    #[serde(default = "default_db_connect_timeout_secs")]
    pub db_connect_timeout_secs: u64,
    #[serde(default = "default_db_idle_timeout_secs")]
    pub db_idle_timeout_secs: u64,
    #[serde(default = "default_db_acquire_timeout_secs")]
    pub db_acquire_timeout_secs: u64,

    /// Event channel capacity for async event processing
    #[serde(default = "default_event_channel_capacity")]
    #[validate(range(min = 1, max = 1000000))]
    pub event_channel_capacity: usize,

    /// Request timeout for HTTP handlers (seconds)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    #[validate]
    pub manufacturing: ManufacturingConfig,

    #[serde(default)]
    #[validate]
    pub payroll: PayrollConfig,

    #[serde(default)]
    #[validate]
    pub stock_reposting: StockRepostingConfig,
}

impl AppConfig {
    /// Builds a configuration with defaults for everything but the connection details.
    pub fn new(database_url: String, host: String, port: u16, environment: String) -> Self {
        Self {
            database_url,
            host,
            port,
            environment,
            log_level: default_log_level(),
            log_json: false,
            auto_migrate: false,
            db_max_connections: default_db_max_connections(),
            db_min_connections: default_db_min_connections(),
            db_connect_timeout_secs: default_db_connect_timeout_secs(),
            db_idle_timeout_secs: default_db_idle_timeout_secs(),
            db_acquire_timeout_secs: default_db_acquire_timeout_secs(),
            event_channel_capacity: default_event_channel_capacity(),
            request_timeout_secs: default_request_timeout_secs(),
            manufacturing: ManufacturingConfig::default(),
            payroll: PayrollConfig::default(),
            stock_reposting: StockRepostingConfig::default(),
        }
    }

    /// Gets log level reference
    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    fn validate_additional_constraints(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.db_min_connections > self.db_max_connections {
            let mut err = ValidationError::new("db_pool_bounds");
            err.message = Some("db_min_connections cannot exceed db_max_connections".into());
            errors.add("db_min_connections", err);
        }

        if self.stock_reposting.limit_reposting_timeslot
            && self.stock_reposting.start_time == self.stock_reposting.end_time
        {
            let mut err = ValidationError::new("empty_reposting_window");
            err.message = Some("start_time and end_time must differ when the timeslot is limited".into());
            errors.add("stock_reposting", err);
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] ConfigError),

    #[error("Configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid configuration value: {0}")]
    Invalid(String),
}

/// Default value functions
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_db_max_connections() -> u32 {
    16
}
fn default_db_min_connections() -> u32 {
    2
}
fn default_db_connect_timeout_secs() -> u64 {
    30
}
fn default_db_idle_timeout_secs() -> u64 {
    600
}
fn default_db_acquire_timeout_secs() -> u64 {
    8
}

fn default_event_channel_capacity() -> usize {
    1024
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_defer_threshold() -> usize {
    DEFAULT_DEFER_THRESHOLD
}

fn default_repost_interval_secs() -> u64 {
    3600
}

fn default_repost_start() -> String {
    DEFAULT_REPOST_START.to_string()
}

fn default_repost_end() -> String {
    DEFAULT_REPOST_END.to_string()
}

fn parse_time_of_day(value: &str) -> Option<chrono::NaiveTime> {
    chrono::NaiveTime::parse_from_str(value.trim(), "%H:%M:%S")
        .or_else(|_| chrono::NaiveTime::parse_from_str(value.trim(), "%H:%M"))
        .ok()
}

/// Validates log level values
fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if valid_levels.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("log_level");
        err.message = Some("Must be one of: trace, debug, info, warn, error".into());
        Err(err)
    }
}

fn validate_percentage(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() {
        let mut err = ValidationError::new("percentage");
        err.message = Some("Percentage cannot be negative".into());
        return Err(err);
    }
    Ok(())
}

fn validate_time_of_day(value: &str) -> Result<(), ValidationError> {
    if parse_time_of_day(value).is_some() {
        Ok(())
    } else {
        let mut err = ValidationError::new("time_of_day");
        err.message = Some("Expected HH:MM:SS".into());
        Err(err)
    }
}

fn validate_weekday(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || value.trim().parse::<chrono::Weekday>().is_ok() {
        Ok(())
    } else {
        let mut err = ValidationError::new("weekday");
        err.message = Some("Expected a weekday name such as Sunday".into());
        Err(err)
    }
}

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set.
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_directive = format!("erp_rules={},tower_http=debug", level);
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    if json {
        let _ = fmt()
            .with_env_filter(EnvFilter::new(filter_directive))
            .json()
            .try_init();
    } else {
        let _ = fmt()
            .with_env_filter(EnvFilter::new(filter_directive))
            .try_init();
    }
}

/// Loads application configuration
///
/// Layers configuration sources in this order:
/// 1. Built-in defaults
/// 2. Default config (config/default.toml)
/// 3. Environment-specific config (config/{env}.toml)
/// 4. Environment variables (APP__*)
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!("Loading configuration for environment: {}", run_env);

    load_config_from(Path::new(CONFIG_DIR), &run_env)
}

/// Same layering as [`load_config`], reading files from `config_dir`.
pub fn load_config_from(config_dir: &Path, run_env: &str) -> Result<AppConfig, AppConfigError> {
    if !config_dir.exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            config_dir.display()
        );
    }

    let config = Config::builder()
        .set_default("database_url", "sqlite://erp_rules.db?mode=rwc")?
        .set_default("host", "0.0.0.0")?
        .set_default("port", DEFAULT_PORT as i64)?
        .set_default("environment", DEFAULT_ENV)?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("log_json", false)?
        .add_source(File::from(config_dir.join("default")).required(false))
        .add_source(File::from(config_dir.join(run_env)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;

    app_config.validate().map_err(|e| {
        error!("Configuration validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    app_config.validate_additional_constraints().map_err(|e| {
        error!("Configuration constraint validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    info!("Configuration loaded successfully");
    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, Weekday};
    use rust_decimal_macros::dec;

    fn base_config() -> AppConfig {
        AppConfig::new(
            "sqlite::memory:".into(),
            "127.0.0.1".into(),
            8080,
            "development".into(),
        )
    }

    #[test]
    fn defaults_validate() {
        let cfg = base_config();
        assert!(cfg.validate().is_ok());
        assert!(cfg.validate_additional_constraints().is_ok());
        assert_eq!(cfg.environment, "development");
    }

    #[test]
    fn negative_overproduction_is_rejected() {
        let mut cfg = base_config();
        cfg.manufacturing.overproduction_percentage_for_work_order = dec!(-5);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn bad_log_level_is_rejected() {
        let mut cfg = base_config();
        cfg.log_level = "verbose".into();
        let errors = cfg.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("log_level"));
    }

    #[test]
    fn limited_timeslot_needs_distinct_bounds() {
        let mut cfg = base_config();
        cfg.stock_reposting.limit_reposting_timeslot = true;
        assert!(cfg.validate_additional_constraints().is_err());

        cfg.stock_reposting.start_time = "23:00:00".into();
        cfg.stock_reposting.end_time = "09:00:00".into();
        assert!(cfg.validate_additional_constraints().is_ok());
    }

    #[test]
    fn reposting_window_is_parsed() {
        let section = StockRepostingConfig {
            limit_reposting_timeslot: true,
            start_time: "23:00".into(),
            end_time: "09:00:00".into(),
            limits_dont_apply_on: Some("Sunday".into()),
            recency_policy: RecencyPolicy::LatestWins,
            ..Default::default()
        };

        let window = section.window().unwrap();
        assert!(window.enabled);
        assert_eq!(window.start, NaiveTime::from_hms_opt(23, 0, 0).unwrap());
        assert_eq!(window.end, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(window.exempt_weekday, Some(Weekday::Sun));
    }

    #[test]
    fn unknown_weekday_fails_window_conversion() {
        let section = StockRepostingConfig {
            limits_dont_apply_on: Some("Someday".into()),
            ..Default::default()
        };
        assert!(section.validate().is_err());
        assert!(matches!(section.window(), Err(AppConfigError::Invalid(_))));
    }

    #[test]
    fn environment_file_overrides_default_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("default.toml"),
            r#"
database_url = "sqlite::memory:"
port = 9000

[payroll]
processing_mode = "deferred"

[stock_reposting]
limit_reposting_timeslot = true
start_time = "23:00:00"
end_time = "09:00:00"
"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("staging.toml"), "port = 9100\n").unwrap();

        let cfg = load_config_from(dir.path(), "staging").unwrap();
        assert_eq!(cfg.port, 9100);
        assert_eq!(cfg.database_url, "sqlite::memory:");
        assert_eq!(cfg.payroll.processing_mode, ProcessingMode::Deferred);
        assert!(cfg.stock_reposting.window().unwrap().enabled);
    }

    #[test]
    fn empty_reposting_window_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("default.toml"),
            "[stock_reposting]\nlimit_reposting_timeslot = true\n",
        )
        .unwrap();

        assert!(matches!(
            load_config_from(dir.path(), "test"),
            Err(AppConfigError::Validation(_))
        ));
    }

    #[test]
    fn payroll_section_maps_to_run_options() {
        let section = PayrollConfig {
            processing_mode: ProcessingMode::Threshold,
            defer_threshold: 10,
            make_payment_entry: true,
        };
        let options = section.run_options();
        assert_eq!(options.mode, ProcessingMode::Threshold);
        assert!(options.make_payment_entry);
        assert!(options.should_defer(11));
        assert!(!options.should_defer(10));
    }
}
