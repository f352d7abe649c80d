//! Reader configuration
//!
//! Configuration of a UE-NIB reader process: which gNBs and event categories
//! to subscribe to, how to log, and an optional key/value snapshot used to
//! seed an in-memory backend.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::logging::LogLevel;

/// Event category subscribed when a configuration names none.
pub const DEFAULT_CATEGORY: &str = "DUAL_CONNECTIVITY";

fn default_categories() -> Vec<String> {
    vec![DEFAULT_CATEGORY.to_string()]
}

/// UE-NIB reader configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Log level, overridden by `RUST_LOG`
    #[serde(default)]
    pub log_level: LogLevel,
    /// Optional `EnvFilter` directive string, takes precedence over `log_level`
    #[serde(default)]
    pub log_filter: Option<String>,
    /// gNB RAN names whose events are subscribed
    pub gnbs: Vec<String>,
    /// Event category names (or numeric IDs) to subscribe per gNB
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
    /// Initial UE-NIB key/value snapshot
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

impl ReaderConfig {
    /// Creates a configuration subscribing the default category of the given gNBs.
    pub fn new<I, S>(gnbs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            log_level: LogLevel::default(),
            log_filter: None,
            gnbs: gnbs.into_iter().map(Into::into).collect(),
            categories: default_categories(),
            data: BTreeMap::new(),
        }
    }

    /// Returns the logging filter directive for this configuration.
    pub fn filter_directive(&self) -> String {
        self.log_filter
            .clone()
            .unwrap_or_else(|| self.log_level.to_string())
    }

    /// Checks the configuration for values a reader cannot work with.
    pub fn validate(&self) -> Result<(), Error> {
        if self.gnbs.is_empty() {
            return Err(Error::Config("at least one gNB is required".to_string()));
        }
        if self.gnbs.iter().any(|gnb| gnb.is_empty()) {
            return Err(Error::Config("gNB name must not be empty".to_string()));
        }
        if self.categories.iter().any(|c| c.trim().is_empty()) {
            return Err(Error::Config("event category must not be empty".to_string()));
        }
        Ok(())
    }

    /// Parses a reader configuration from a YAML string.
    ///
    /// # Example
    /// ```
    /// use uenib_common::ReaderConfig;
    ///
    /// let yaml = r#"
    /// gnbs: ["somegnb:310-410-b5c67788"]
    /// data:
    ///   "100,UE_PSCELL_PCI": "12"
    /// "#;
    ///
    /// let config = ReaderConfig::from_yaml(yaml).unwrap();
    /// assert_eq!(config.categories, vec!["DUAL_CONNECTIVITY".to_string()]);
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self, Error> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Loads a reader configuration from a YAML file.
    ///
    /// # Returns
    /// * `Ok(ReaderConfig)` - Successfully loaded configuration
    /// * `Err(Error)` - File I/O or YAML parsing error
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Serializes the configuration to a YAML string.
    pub fn to_yaml(&self) -> Result<String, Error> {
        Ok(serde_yaml::to_string(self)?)
    }
}
