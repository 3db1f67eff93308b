//! Configuration system for GroundForge.
//!
//! Load exploration configuration from TOML (or YAML) files to select the
//! applicable-action generator, bound exploration time and size, and size the
//! worker pool used for batches of problems.
//!
//! # Examples
//!
//! ```
//! use groundforge_config::{ExplorationConfig, GeneratorKind, ThreadCount};
//! use std::time::Duration;
//!
//! let config = ExplorationConfig::from_toml_str(r#"
//!     generator = "grounded"
//!     thread_count = { count = 4 }
//!
//!     [termination]
//!     seconds_spent_limit = 30
//!     max_num_states = 100000
//! "#).unwrap();
//!
//! assert_eq!(config.generator, GeneratorKind::Grounded);
//! assert_eq!(config.thread_count, ThreadCount::Count(4));
//! assert_eq!(config.time_limit(), Some(Duration::from_secs(30)));
//! assert_eq!(config.max_num_states(), Some(100000));
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use groundforge_config::ExplorationConfig;
//!
//! let config = ExplorationConfig::load("exploration.toml").unwrap_or_default();
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main exploration configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ExplorationConfig {
    /// Which applicable-action generator to build.
    #[serde(default)]
    pub generator: GeneratorKind,

    /// Termination configuration.
    #[serde(default)]
    pub termination: Option<TerminationConfig>,

    /// Number of worker threads for batch exploration.
    #[serde(default)]
    pub thread_count: ThreadCount,
}

impl ExplorationConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.thread_count == ThreadCount::Count(0) {
            return Err(ConfigError::Invalid(
                "thread_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Sets the generator kind.
    pub fn with_generator(mut self, generator: GeneratorKind) -> Self {
        self.generator = generator;
        self
    }

    /// Sets the exploration time limit in milliseconds.
    pub fn with_time_limit_millis(mut self, millis: u64) -> Self {
        self.termination = Some(TerminationConfig {
            millis_spent_limit: Some(millis),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    /// Sets the maximum number of states to create.
    pub fn with_max_states(mut self, max_num_states: usize) -> Self {
        self.termination = Some(TerminationConfig {
            max_num_states: Some(max_num_states),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    /// Sets the batch thread count.
    pub fn with_thread_count(mut self, thread_count: ThreadCount) -> Self {
        self.thread_count = thread_count;
        self
    }

    /// Returns the exploration time limit, if configured.
    pub fn time_limit(&self) -> Option<Duration> {
        self.termination.as_ref().and_then(|t| t.time_limit())
    }

    /// Returns the state limit, if configured.
    pub fn max_num_states(&self) -> Option<usize> {
        self.termination.as_ref().and_then(|t| t.max_num_states)
    }
}

/// Applicable-action generator selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorKind {
    /// Ground schemas per state through consistency graphs.
    #[default]
    Lifted,

    /// Pre-ground everything reachable in the delete relaxation and answer
    /// queries with match trees.
    Grounded,
}

/// Termination configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TerminationConfig {
    /// Maximum seconds to spend exploring.
    pub seconds_spent_limit: Option<u64>,

    /// Maximum milliseconds to spend exploring, added to the seconds limit.
    pub millis_spent_limit: Option<u64>,

    /// Maximum number of distinct states.
    pub max_num_states: Option<usize>,
}

impl TerminationConfig {
    /// Returns the time limit as a Duration, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        match (self.seconds_spent_limit, self.millis_spent_limit) {
            (None, None) => None,
            (seconds, millis) => Some(
                Duration::from_secs(seconds.unwrap_or(0))
                    + Duration::from_millis(millis.unwrap_or(0)),
            ),
        }
    }
}

/// Worker thread count for batch exploration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadCount {
    /// One thread per available CPU, capped by the number of problems.
    #[default]
    Auto,

    /// Explore problems sequentially on the calling thread.
    None,

    /// Specific number of threads, capped by the number of problems.
    Count(usize),
}

impl ThreadCount {
    /// Resolves the thread count to an actual number.
    ///
    /// # Arguments
    ///
    /// * `problem_count` - Number of problems to explore
    ///
    /// # Returns
    ///
    /// The number of threads to use, at least 1.
    pub fn resolve(&self, problem_count: usize) -> usize {
        let wanted = match self {
            ThreadCount::Auto => std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(1),
            ThreadCount::None => 1,
            ThreadCount::Count(n) => *n,
        };
        wanted.min(problem_count).max(1)
    }
}

impl std::fmt::Display for ThreadCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThreadCount::Auto => write!(f, "Auto"),
            ThreadCount::None => write!(f, "None"),
            ThreadCount::Count(n) => write!(f, "{}", n),
        }
    }
}

#[cfg(test)]
mod tests;
