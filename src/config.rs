//! Solve settings loaded from TOML.
//!
//! ```
//! use eight_puzzle::config::SolveConfig;
//! use eight_puzzle::Board;
//!
//! let config = SolveConfig::from_toml_str(r#"
//!     start = [[1, 0, 3], [4, 2, 5], [7, 8, 6]]
//!     max_expansions = 50000
//! "#).unwrap();
//!
//! assert_eq!(config.goal, Board::GOAL);
//! assert_eq!(config.max_expansions, Some(50000));
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::board::Board;
use crate::search::Solver;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolveConfig {
    pub start: Board,
    pub goal: Board,
    /// Stop after this many expansions.
    pub max_expansions: Option<usize>,
    /// Colored terminal output.
    pub color: bool,
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self {
            start: Board::from_cells([1, 0, 3, 4, 2, 5, 7, 8, 6]),
            goal: Board::GOAL,
            max_expansions: None,
            color: true,
        }
    }
}

/// Values that take precedence over a loaded config, such as CLI flags.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub start: Option<Board>,
    pub goal: Option<Board>,
    pub max_expansions: Option<usize>,
    pub color: Option<bool>,
}

impl SolveConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks settings that the field types alone do not rule out.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_expansions == Some(0) {
            return Err(ConfigError::Invalid(
                "max_expansions must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Applies `overrides` and validates the merged result.
    pub fn merge(mut self, overrides: Overrides) -> Result<Self, ConfigError> {
        if let Some(start) = overrides.start {
            self.start = start;
        }
        if let Some(goal) = overrides.goal {
            self.goal = goal;
        }
        if overrides.max_expansions.is_some() {
            self.max_expansions = overrides.max_expansions;
        }
        if let Some(color) = overrides.color {
            self.color = color;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn solver(&self) -> Solver<'static> {
        Solver::new(self.goal).with_max_expansions(self.max_expansions)
    }
}
