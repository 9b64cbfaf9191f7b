//! Configuration management for the mytracker dashboard client
//!
//! This module handles loading, validation, and management of
//! client configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use error::ConfigError;

// ==================== Configuration Types ====================

/// Backend server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the tracker backend
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { base_url: default_base_url() }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:10000".to_string()
}

/// Backend endpoint paths
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsConfig {
    /// Quick-add form submission (POST)
    #[serde(default = "default_add_path")]
    pub add: String,
    /// Current month totals (GET)
    #[serde(default = "default_summary_path")]
    pub summary: String,
    /// Pie and bar chart aggregates (GET)
    #[serde(default = "default_chart_data_path")]
    pub chart_data: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            add: default_add_path(),
            summary: default_summary_path(),
            chart_data: default_chart_data_path(),
        }
    }
}

fn default_add_path() -> String {
    "/add".to_string()
}

fn default_summary_path() -> String {
    "/api/summary".to_string()
}

fn default_chart_data_path() -> String {
    "/api/chart_data".to_string()
}

/// Ids of the page elements the dashboard binds to.
///
/// These must match the page markup exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementsConfig {
    #[serde(default = "default_quick_add_button")]
    pub quick_add_button: String,
    #[serde(default = "default_modal")]
    pub modal: String,
    #[serde(default = "default_close_button")]
    pub close_button: String,
    #[serde(default = "default_form")]
    pub form: String,
    #[serde(default = "default_pie_chart")]
    pub pie_chart: String,
    #[serde(default = "default_bar_chart")]
    pub bar_chart: String,
    #[serde(default = "default_sum_income")]
    pub sum_income: String,
    #[serde(default = "default_sum_expense")]
    pub sum_expense: String,
    #[serde(default = "default_sum_invest")]
    pub sum_invest: String,
}

impl Default for ElementsConfig {
    fn default() -> Self {
        Self {
            quick_add_button: default_quick_add_button(),
            modal: default_modal(),
            close_button: default_close_button(),
            form: default_form(),
            pie_chart: default_pie_chart(),
            bar_chart: default_bar_chart(),
            sum_income: default_sum_income(),
            sum_expense: default_sum_expense(),
            sum_invest: default_sum_invest(),
        }
    }
}

impl ElementsConfig {
    /// All configured ids, in markup order
    pub fn all(&self) -> Vec<&str> {
        vec![
            self.quick_add_button.as_str(),
            self.modal.as_str(),
            self.close_button.as_str(),
            self.form.as_str(),
            self.pie_chart.as_str(),
            self.bar_chart.as_str(),
            self.sum_income.as_str(),
            self.sum_expense.as_str(),
            self.sum_invest.as_str(),
        ]
    }
}

fn default_quick_add_button() -> String {
    "quick-add-btn".to_string()
}

fn default_modal() -> String {
    "quickAddModal".to_string()
}

fn default_close_button() -> String {
    "quickClose".to_string()
}

fn default_form() -> String {
    "quickAddForm".to_string()
}

fn default_pie_chart() -> String {
    "pieChart".to_string()
}

fn default_bar_chart() -> String {
    "barChart".to_string()
}

fn default_sum_income() -> String {
    "sum-income".to_string()
}

fn default_sum_expense() -> String {
    "sum-expense".to_string()
}

fn default_sum_invest() -> String {
    "sum-invest".to_string()
}

/// Polling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Seconds between refresh cycles
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self { interval_secs: default_interval_secs() }
    }
}

fn default_interval_secs() -> u64 {
    5
}

/// HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: default_timeout_secs() }
    }
}

fn default_timeout_secs() -> u64 {
    10
}

/// Chart and visualization settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Pie slice colors, assigned cyclically by slice position
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self { palette: default_palette() }
    }
}

/// Default pie slice palette
pub const DEFAULT_PALETTE: [&str; 5] = ["#e62429", "#ffb86b", "#66b2ff", "#7efc5f", "#d78cff"];

fn default_palette() -> Vec<String> {
    DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect()
}

/// Quick-add form behavior
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FormConfig {
    /// Treat any non-redirected response as a successful submission,
    /// even a failed one (hide the modal and refresh regardless)
    #[serde(default = "default_false")]
    pub treat_failure_as_success: bool,
}

fn default_false() -> bool {
    false
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level() }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Backend settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Endpoint paths
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    /// Page element ids
    #[serde(default)]
    pub elements: ElementsConfig,
    /// Polling settings
    #[serde(default)]
    pub polling: PollingConfig,
    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
    /// Chart settings
    #[serde(default)]
    pub charts: ChartConfig,
    /// Quick-add form settings
    #[serde(default)]
    pub form: FormConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ConfigError::IoError,
        })?;

        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::InvalidYaml { message: e.to_string() })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base_url = self.server.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "server.base_url".to_string(),
                reason: "Base URL must start with http:// or https://".to_string(),
            });
        }

        for (field, path) in [
            ("endpoints.add", &self.endpoints.add),
            ("endpoints.summary", &self.endpoints.summary),
            ("endpoints.chart_data", &self.endpoints.chart_data),
        ] {
            if !path.starts_with('/') {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: "Endpoint paths must start with '/'".to_string(),
                });
            }
        }

        if self.polling.interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "polling.interval_secs".to_string(),
                reason: "Polling interval must be greater than 0".to_string(),
            });
        }

        if self.http.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "http.timeout_secs".to_string(),
                reason: "Request timeout must be greater than 0".to_string(),
            });
        }

        if self.charts.palette.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "charts.palette".to_string(),
                reason: "Palette must contain at least one color".to_string(),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Default config file location
    pub fn default_path() -> PathBuf {
        PathBuf::from("config.yaml")
    }

    /// Full URL of an endpoint path
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}", self.server.base_url.trim().trim_end_matches('/'), path)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.polling.interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs)
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.polling.interval_secs, 5);
        assert_eq!(config.endpoints.add, "/add");
        assert_eq!(config.elements.sum_invest, "sum-invest");
        assert_eq!(config.charts.palette.len(), 5);
        assert_eq!(config.charts.palette[0], "#e62429");
        assert!(!config.form.treat_failure_as_success);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bundled_template_is_valid() {
        let config = Config::from_yaml(Config::generate_default()).unwrap();
        assert_eq!(config.poll_interval(), Duration::from_secs(5));
        assert_eq!(config.elements.all().len(), 9);
        assert_eq!(config.elements.quick_add_button, "quick-add-btn");
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config = Config::from_yaml("server:\n  base_url: http://tracker.local:8080/\npolling:\n  interval_secs: 30\n").unwrap();
        assert_eq!(config.polling.interval_secs, 30);
        assert_eq!(config.http.timeout_secs, 10);
        assert_eq!(config.endpoint_url("/api/summary"), "http://tracker.local:8080/api/summary");
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let err = Config::from_yaml("polling:\n  interval_secs: 0\n").unwrap_err();
        match err {
            ConfigError::InvalidValue { field, .. } => assert_eq!(field, "polling.interval_secs"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_rejects_bad_base_url() {
        let err = Config::from_yaml("server:\n  base_url: tracker.local\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_validate_rejects_empty_palette() {
        let err = Config::from_yaml("charts:\n  palette: []\n").unwrap_err();
        assert!(err.to_string().contains("charts.palette"));
    }

    #[test]
    fn test_validate_rejects_relative_endpoint() {
        let err = Config::from_yaml("endpoints:\n  add: add\n").unwrap_err();
        assert!(err.to_string().contains("endpoints.add"));
    }

    #[test]
    fn test_invalid_yaml() {
        let err = Config::from_yaml("polling: [").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidYaml { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/nonexistent/mytracker/config.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }
}
