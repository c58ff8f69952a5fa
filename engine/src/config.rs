use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use types::HouseRules;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Settings read from an optional YAML file. Every field may be omitted.
///
/// ```yaml
/// database_url: sqlite://lupus.db
/// include_jester: true
/// house_rules:
///   allow_skip_day_voting: true
///   phase_timer_seconds: 90
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub house_rules: HouseRules,
    pub include_jester: bool,
}

impl AppConfig {
    pub fn from_yaml_str(path: &Path, yaml: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_yaml::from_str(yaml).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(AppConfig {
            house_rules: config.house_rules.sanitized(),
            ..config
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(path, &yaml)
    }

    /// No path means defaults.
    pub fn load_optional(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = AppConfig::from_yaml_str(
            Path::new("lupus.yaml"),
            "include_jester: true\nhouse_rules:\n  phase_timer_seconds: 400\n",
        )
        .unwrap();
        assert!(config.include_jester);
        assert_eq!(config.database_url, None);
        assert_eq!(config.house_rules.phase_timer_seconds, 180);
        assert!(!config.house_rules.allow_skip_day_voting);
    }

    #[test]
    fn bad_yaml_names_the_file() {
        let err =
            AppConfig::from_yaml_str(Path::new("broken.yaml"), "include_jester: [").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
        assert!(err.to_string().contains("broken.yaml"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = AppConfig::load(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert_eq!(AppConfig::load_optional(None).unwrap(), AppConfig::default());
    }
}
