//! # Dashboard Configuration
//!
//! Settings loaded once at startup and read-only afterwards.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     SALES_LATENCY_MS=0                                                 │
//! │     SALES_ASSUME_YES=true                                              │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/dashboard/dashboard.toml (Linux)                         │
//! │     ~/Library/Application Support/com.sales.dashboard/... (macOS)      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # dashboard.toml
//! [services]
//! latency_ms = 300
//!
//! [display]
//! currency_symbol = "$"
//! id_width = 3
//!
//! [list]
//! default_from = "2024-10-01"   # quoted: parsed as an ISO date string
//! default_to = "2024-10-31"
//!
//! [confirm]
//! assume_yes = false
//! ```

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use sales_cache::CacheConfig;
use sales_core::validation::validate_iso_date;
use sales_core::{DateRange, Money, DEFAULT_ID_WIDTH};

use crate::error::{ConfigError, ConfigResult};

/// Widest zero-padding accepted for sale ids.
pub const MAX_ID_WIDTH: usize = 12;

/// Longest artificial service delay accepted, in milliseconds.
pub const MAX_LATENCY_MS: u64 = 60_000;

// =============================================================================
// Sections
// =============================================================================

/// Mock data service settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSettings {
    /// Artificial delay of every fetch.
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,
}

fn default_latency_ms() -> u64 {
    300
}

impl Default for ServiceSettings {
    fn default() -> Self {
        ServiceSettings {
            latency_ms: default_latency_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySettings {
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Zero-padding of sale ids on list cards.
    #[serde(default = "default_id_width")]
    pub id_width: usize,
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_id_width() -> usize {
    DEFAULT_ID_WIDTH
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            currency_symbol: default_currency_symbol(),
            id_width: default_id_width(),
        }
    }
}

/// Initial date filter of the sale list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSettings {
    #[serde(default)]
    pub default_from: Option<NaiveDate>,

    #[serde(default)]
    pub default_to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmSettings {
    /// Skip the delete confirmation prompt.
    #[serde(default)]
    pub assume_yes: bool,
}

// =============================================================================
// DashboardConfig
// =============================================================================

/// Complete dashboard configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub services: ServiceSettings,

    #[serde(default)]
    pub display: DisplaySettings,

    #[serde(default)]
    pub list: ListSettings,

    #[serde(default)]
    pub confirm: ConfirmSettings,
}

impl DashboardConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (dashboard.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading dashboard config from file");
                let contents = std::fs::read_to_string(&path).map_err(|source| {
                    ConfigError::Read {
                        path: path.clone(),
                        source,
                    }
                })?;
                config = Self::from_toml(&contents).map_err(|source| ConfigError::Parse {
                    path: path.clone(),
                    source,
                })?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load dashboard config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.display.id_width == 0 || self.display.id_width > MAX_ID_WIDTH {
            return Err(ConfigError::Invalid(format!(
                "display.id_width must be between 1 and {}, got {}",
                MAX_ID_WIDTH, self.display.id_width
            )));
        }

        if self.services.latency_ms > MAX_LATENCY_MS {
            return Err(ConfigError::Invalid(format!(
                "services.latency_ms must be at most {}, got {}",
                MAX_LATENCY_MS, self.services.latency_ms
            )));
        }

        if let (Some(from), Some(to)) = (self.list.default_from, self.list.default_to) {
            if from > to {
                return Err(ConfigError::Invalid(format!(
                    "list.default_from ({}) is after list.default_to ({})",
                    from, to
                )));
            }
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `SALES_*` overrides read through `lookup`.
    ///
    /// Unparseable values are ignored with a warning.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(latency) = lookup("SALES_LATENCY_MS") {
            match latency.parse::<u64>() {
                Ok(ms) => {
                    debug!(latency_ms = ms, "Overriding service latency from environment");
                    self.services.latency_ms = ms;
                }
                Err(_) => warn!(value = %latency, "Invalid SALES_LATENCY_MS"),
            }
        }

        if let Some(symbol) = lookup("SALES_CURRENCY_SYMBOL") {
            self.display.currency_symbol = symbol;
        }

        if let Some(width) = lookup("SALES_ID_WIDTH") {
            match width.parse::<usize>() {
                Ok(w) => self.display.id_width = w,
                Err(_) => warn!(value = %width, "Invalid SALES_ID_WIDTH"),
            }
        }

        if let Some(from) = lookup("SALES_LIST_FROM") {
            match validate_iso_date("SALES_LIST_FROM", &from) {
                Ok(d) => self.list.default_from = Some(d),
                Err(e) => warn!("{}", e),
            }
        }

        if let Some(to) = lookup("SALES_LIST_TO") {
            match validate_iso_date("SALES_LIST_TO", &to) {
                Ok(d) => self.list.default_to = Some(d),
                Err(e) => warn!("{}", e),
            }
        }

        if let Some(yes) = lookup("SALES_ASSUME_YES") {
            match yes.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.confirm.assume_yes = true,
                "0" | "false" | "no" => self.confirm.assume_yes = false,
                _ => warn!(value = %yes, "Invalid SALES_ASSUME_YES"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "sales", "dashboard")
            .map(|dirs| dirs.config_dir().join("dashboard.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.services.latency_ms)
    }

    /// Cache settings derived from this configuration.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::default().latency(self.latency())
    }

    /// The list filter used when none is given.
    pub fn default_range(&self) -> DateRange {
        DateRange::new(self.list.default_from, self.list.default_to)
    }

    /// `Money` with the configured currency symbol, e.g. `€999.00`.
    pub fn format_money(&self, amount: Money) -> String {
        let sign = if amount.is_negative() { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            self.display.currency_symbol,
            amount.major().abs(),
            amount.minor().abs()
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, d).unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();
        assert_eq!(config.services.latency_ms, 300);
        assert_eq!(config.display.currency_symbol, "$");
        assert_eq!(config.display.id_width, 3);
        assert!(!config.confirm.assume_yes);
        assert!(config.default_range().is_unbounded());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = DashboardConfig::from_toml(
            r#"
            [display]
            currency_symbol = "€"

            [list]
            default_from = "2024-10-10"
            "#,
        )
        .unwrap();

        assert_eq!(config.display.currency_symbol, "€");
        assert_eq!(config.display.id_width, 3);
        assert_eq!(config.services.latency_ms, 300);
        assert_eq!(config.list.default_from, Some(day(10)));
        assert_eq!(config.list.default_to, None);
    }

    #[test]
    fn test_config_validation() {
        let mut config = DashboardConfig::default();
        config.display.id_width = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = DashboardConfig::default();
        config.list.default_from = Some(day(14));
        config.list.default_to = Some(day(10));
        assert!(config.validate().is_err());

        let mut config = DashboardConfig::default();
        config.services.latency_ms = MAX_LATENCY_MS + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("SALES_LATENCY_MS", "0"),
            ("SALES_ID_WIDTH", "5"),
            ("SALES_LIST_TO", "2024-10-13"),
            ("SALES_ASSUME_YES", "TRUE"),
        ]
        .into_iter()
        .collect();

        let mut config = DashboardConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.latency(), Duration::ZERO);
        assert_eq!(config.display.id_width, 5);
        assert_eq!(config.list.default_to, Some(day(13)));
        assert!(config.confirm.assume_yes);
    }

    #[test]
    fn test_invalid_overrides_are_ignored() {
        let mut config = DashboardConfig::default();
        config.apply_overrides(|key| match key {
            "SALES_LATENCY_MS" => Some("fast".into()),
            "SALES_LIST_FROM" => Some("14/10/2024".into()),
            _ => None,
        });
        assert_eq!(config.services.latency_ms, 300);
        assert_eq!(config.list.default_from, None);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("sales-dashboard-does-not-exist.toml");
        let config = DashboardConfig::load_or_default(Some(path));
        assert_eq!(config.display.id_width, 3);
    }

    #[test]
    fn test_format_money() {
        let mut config = DashboardConfig::default();
        assert_eq!(config.format_money(Money::from_major(999)), "$999.00");
        config.display.currency_symbol = "€".into();
        assert_eq!(config.format_money(Money::from_cents(-150)), "-€1.50");
    }

    #[test]
    fn test_toml_serialization() {
        let config = DashboardConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed = DashboardConfig::from_toml(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }
}
