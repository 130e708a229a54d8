// Copyright 2026 aceqd Contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration management for aceqd.
//!
//! Configuration is loaded from multiple sources with the following priority
//! (later sources override earlier ones):
//!
//! 1. Built-in defaults
//! 2. aceqd.yaml file
//! 3. Environment variables (ACEQD_*)
//! 4. CLI arguments

use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Solver invocation settings
    #[serde(default)]
    pub solver: SolverConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file and environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(path) = config_path {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                config = serde_yaml::from_str(&content)?;
            }
        } else {
            for path in &["aceqd.yaml", "aceqd.yml", "/etc/aceqd/config.yaml"] {
                let path = Path::new(path);
                if path.exists() {
                    let content = std::fs::read_to_string(path)?;
                    config = serde_yaml::from_str(&content)?;
                    break;
                }
            }
        }

        config.apply_env_overrides();

        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("ACEQD_SOLVER_BINARY") {
            self.solver.binary = val;
        }
        if let Some(val) = lookup("ACEQD_TEMP_DIR") {
            self.solver.temp_dir = PathBuf::from(val);
        }
        if let Some(val) = lookup("ACEQD_VERBOSE") {
            self.solver.verbose = val.to_lowercase() == "true" || val == "1";
        }
        if let Some(val) = lookup("ACEQD_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Some(val) = lookup("ACEQD_LOG_FORMAT") {
            self.logging.format = val;
        }
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        if self.solver.binary.trim().is_empty() {
            return Err(Error::Config("solver binary cannot be empty".into()));
        }
        if self.solver.temp_dir.as_os_str().is_empty() {
            return Err(Error::Config("temp_dir cannot be empty".into()));
        }
        if !matches!(self.logging.format.as_str(), "json" | "pretty") {
            return Err(Error::Config(format!(
                "unknown log format '{}', expected 'json' or 'pretty'",
                self.logging.format
            )));
        }
        if !self.solver.temp_dir.is_dir() {
            tracing::warn!(
                temp_dir = %self.solver.temp_dir.display(),
                "Working directory does not exist; solver runs will fail to write files"
            );
        }
        Ok(())
    }
}

/// Solver invocation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Executable name or path of the solver
    #[serde(default = "default_binary")]
    pub binary: String,

    /// Directory for parameter, pulse and output files
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,

    /// Stream solver output instead of discarding it
    #[serde(default)]
    pub verbose: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            temp_dir: default_temp_dir(),
            verbose: false,
        }
    }
}

fn default_binary() -> String {
    "ACE".into()
}

fn default_temp_dir() -> PathBuf {
    env::temp_dir()
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write as _;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.solver.binary, "ACE");
        assert!(!config.solver.verbose);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_config_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());

        let mut bad_config = Config::default();
        bad_config.solver.binary = "  ".into();
        assert!(bad_config.validate().is_err());
    }

    #[test]
    fn test_validate_unknown_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".into();
        let msg = config.validate().unwrap_err().to_string();
        assert!(msg.contains("xml"));
    }

    #[test]
    fn test_validate_empty_temp_dir() {
        let mut config = Config::default();
        config.solver.temp_dir = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_load_from_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            f,
            r#"
solver:
  binary: "/opt/ace/bin/ACE"
  temp_dir: "/scratch/ace"
logging:
  format: json
"#
        )
        .unwrap();

        let config = Config::load(Some(f.path())).unwrap();
        assert_eq!(config.solver.binary, "/opt/ace/bin/ACE");
        assert_eq!(config.solver.temp_dir, PathBuf::from("/scratch/ace"));
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_config_load_nonexistent_file() {
        let path = Path::new("/tmp/does_not_exist_aceqd_test.yaml");
        let config = Config::load(Some(path)).unwrap();
        assert_eq!(config.solver.binary, "ACE");
    }

    #[test]
    fn test_config_load_invalid_yaml() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "{{{{not: valid: yaml::::").unwrap();

        let result = Config::load(Some(f.path()));
        assert!(result.is_err());
    }

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_overrides_solver_section() {
        let mut config = Config::default();
        config.apply_overrides(lookup_from(&[
            ("ACEQD_SOLVER_BINARY", "ACE-dev"),
            ("ACEQD_TEMP_DIR", "/var/tmp/ace"),
            ("ACEQD_VERBOSE", "1"),
        ]));
        assert_eq!(config.solver.binary, "ACE-dev");
        assert_eq!(config.solver.temp_dir, PathBuf::from("/var/tmp/ace"));
        assert!(config.solver.verbose);

        config.apply_overrides(lookup_from(&[("ACEQD_VERBOSE", "False")]));
        assert!(!config.solver.verbose);
    }

    #[test]
    fn test_overrides_logging_section() {
        let mut config = Config::default();
        config.apply_overrides(lookup_from(&[
            ("ACEQD_LOG_LEVEL", "debug"),
            ("ACEQD_LOG_FORMAT", "json"),
        ]));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_overrides_absent_keep_values() {
        let mut config = Config::default();
        config.apply_overrides(|_| None);
        assert_eq!(config.solver.binary, "ACE");
        assert_eq!(config.logging.level, "info");
    }
}
