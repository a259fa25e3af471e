//! Loading [`GameConfig`] from JSON files.

use std::fs;
use std::path::Path;

use bistro_logic::config::{validate_config, ConfigError, GameConfig};

/// Why a configuration file could not be used.
#[derive(Debug)]
pub enum ConfigLoadError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Invalid(Vec<ConfigError>),
}

impl From<std::io::Error> for ConfigLoadError {
    fn from(e: std::io::Error) -> Self {
        ConfigLoadError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigLoadError {
    fn from(e: serde_json::Error) -> Self {
        ConfigLoadError::Json(e)
    }
}

impl std::fmt::Display for ConfigLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigLoadError::Io(e) => write!(f, "IO error: {}", e),
            ConfigLoadError::Json(e) => write!(f, "Config parse error: {}", e),
            ConfigLoadError::Invalid(errors) => {
                write!(f, "Invalid config:")?;
                for e in errors {
                    write!(f, " {};", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigLoadError {}

/// Parse and validate a JSON config. Missing fields keep their defaults.
pub fn config_from_json(json: &str) -> Result<GameConfig, ConfigLoadError> {
    let config: GameConfig = serde_json::from_str(json)?;
    let errors = validate_config(&config);
    if !errors.is_empty() {
        return Err(ConfigLoadError::Invalid(errors));
    }
    Ok(config)
}

/// Read, parse and validate a config file.
pub fn load_config(path: impl AsRef<Path>) -> Result<GameConfig, ConfigLoadError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)?;
    let config = config_from_json(&json)?;
    log::info!("Loaded config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = config_from_json(r#"{ "seed": 7, "order_chance": 1.0 }"#).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.order_chance, 1.0);
        assert_eq!(config.order_interval_ms, 3_000);
        assert_eq!(config.world_width, 960.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = config_from_json(r#"{ "respawn_min_ms": 9000, "respawn_max_ms": 100 }"#).unwrap_err();
        match err {
            ConfigLoadError::Invalid(errors) => assert_eq!(errors.len(), 1),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(config_from_json("{ seed: }"), Err(ConfigLoadError::Json(_))));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_config("/nonexistent/bistro/config.json"),
            Err(ConfigLoadError::Io(_))
        ));
    }
}
