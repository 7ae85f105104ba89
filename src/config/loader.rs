//! Configuration Loader
//!
//! Loads and validates configuration from TOML files matching
//! config/default.toml. Every field has a default, so an empty file is a
//! valid configuration.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::strategy::params::{self, EngineConfig, StrategyConfig};

/// Environment variable overriding `[engine].capital`
pub const CAPITAL_ENV: &str = "LOCO_CAPITAL";

/// Main configuration structure matching config/default.toml
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineSection,
    pub signal: SignalSection,
    pub risk: RiskSection,
    pub logging: LoggingSection,
}

/// Engine configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineSection {
    /// Trading capital; fixed for the engine's lifetime
    pub capital: f64,
    /// Number of recent prices kept per symbol
    pub lookback: usize,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            capital: params::DEFAULT_CAPITAL,
            lookback: params::DEFAULT_LOOKBACK,
        }
    }
}

impl EngineSection {
    /// Get capital with environment variable override.
    /// Checks LOCO_CAPITAL first, falls back to config value.
    pub fn get_capital(&self) -> Result<f64, ConfigError> {
        match std::env::var(CAPITAL_ENV) {
            Ok(raw) => raw.trim().parse().map_err(|_| {
                ConfigError::ValidationError(format!("{} is not a number: {:?}", CAPITAL_ENV, raw))
            }),
            Err(_) => Ok(self.capital),
        }
    }
}

/// Signal generation section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SignalSection {
    /// Band half-width in standard deviations
    pub band_width: f64,
    /// Fixed units per signal
    pub order_size: u32,
    /// Confidence attached to each signal
    pub confidence: f64,
}

impl Default for SignalSection {
    fn default() -> Self {
        Self {
            band_width: params::DEFAULT_BAND_WIDTH,
            order_size: params::DEFAULT_ORDER_SIZE,
            confidence: params::DEFAULT_CONFIDENCE,
        }
    }
}

/// Risk gate section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RiskSection {
    /// VaR limit as a fraction of capital (0.02 = 2%)
    pub var_limit_pct: f64,
}

impl Default for RiskSection {
    fn default() -> Self {
        Self {
            var_limit_pct: crate::domain::risk::DEFAULT_VAR_LIMIT_PCT,
        }
    }
}

/// Logging configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error(transparent)]
    InvalidParams(#[from] params::ConfigError),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
        if !LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.level must be one of {:?}, got {:?}",
                LEVELS, self.logging.level
            )));
        }

        self.to_engine_config(self.engine.capital).validate()?;
        Ok(())
    }

    /// Engine settings, applying the LOCO_CAPITAL override
    pub fn engine_config(&self) -> Result<EngineConfig, ConfigError> {
        let config = self.to_engine_config(self.engine.get_capital()?);
        config.validate()?;
        Ok(config)
    }

    fn to_engine_config(&self, capital: f64) -> EngineConfig {
        EngineConfig {
            capital,
            strategy: StrategyConfig {
                lookback: self.engine.lookback,
                band_width: self.signal.band_width,
                order_size: self.signal.order_size,
                confidence: self.signal.confidence,
                var_limit_pct: self.risk.var_limit_pct,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_valid_config() -> &'static str {
        r#"
[engine]
capital = 250000.0
lookback = 30

[signal]
band_width = 2.5
order_size = 50
confidence = 0.7

[risk]
var_limit_pct = 0.03

[logging]
level = "info"
"#
    }

    #[test]
    fn test_load_valid_config() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(create_valid_config().as_bytes()).unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.engine.capital, 250_000.0);
        assert_eq!(config.engine.lookback, 30);
        assert_eq!(config.signal.band_width, 2.5);
        assert_eq!(config.signal.order_size, 50);
        assert_eq!(config.risk.var_limit_pct, 0.03);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.engine.capital, 100_000.0);
        assert_eq!(config.engine.lookback, 20);
        assert_eq!(config.signal.band_width, 2.0);
        assert_eq!(config.signal.order_size, 100);
        assert_eq!(config.signal.confidence, 0.8);
        assert_eq!(config.risk.var_limit_pct, 0.02);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = parse_config("[engine]\nlookback = 5\n").unwrap();
        assert_eq!(config.engine.lookback, 5);
        assert_eq!(config.engine.capital, 100_000.0);
    }

    #[test]
    fn test_invalid_capital() {
        let result = parse_config("[engine]\ncapital = -10.0\n");
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParams(params::ConfigError::InvalidCapital(_)))
        ));
    }

    #[test]
    fn test_invalid_lookback() {
        let result = parse_config("[engine]\nlookback = 0\n");
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParams(params::ConfigError::InvalidLookback(0)))
        ));
    }

    #[test]
    fn test_invalid_log_level() {
        let result = parse_config("[logging]\nlevel = \"loud\"\n");
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(parse_config("[engine"), Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = load_config("/nonexistent/loco.toml");
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }
}
