//! Error types
//!
//! Only configuration can fail. Simulation invariants are enforced by
//! construction and never surface as errors.

use std::fmt;

/// Errors raised while loading or validating a [`crate::SimConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// Population must contain at least one ball.
    EmptyPopulation,
    /// The board needs at least one column.
    NoColumns,
    /// Start column lies outside `[0, total_columns)`.
    StartColumnOutOfRange { column: usize, total_columns: usize },
    /// Balls must enter above the ground row.
    StartRowAtGround,
    /// A step size is zero, negative or not finite.
    NonPositiveStep { name: &'static str, value: f32 },
    /// A sub-step count is zero.
    ZeroSubsteps { name: &'static str },
    /// A height or threshold is not a finite number.
    NotFinite { name: &'static str },
    /// Scatter band lower bound sits above its upper bound.
    InvertedScatterBand { lower: f32, upper: f32 },
    /// Tick interval must be positive.
    NonPositiveInterval(f64),
    /// Config text is not valid JSON for a `SimConfig`.
    Parse(serde_json::Error),
    /// Config file could not be read.
    Io(std::io::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyPopulation => write!(f, "population must be at least 1"),
            ConfigError::NoColumns => write!(f, "total_columns must be at least 1"),
            ConfigError::StartColumnOutOfRange {
                column,
                total_columns,
            } => write!(
                f,
                "start_column {} is outside the board (0..{})",
                column, total_columns
            ),
            ConfigError::StartRowAtGround => write!(f, "start_row must be above the ground row"),
            ConfigError::NonPositiveStep { name, value } => {
                write!(f, "{} must be a positive finite number, got {}", name, value)
            }
            ConfigError::ZeroSubsteps { name } => write!(f, "{} must be at least 1", name),
            ConfigError::NotFinite { name } => write!(f, "{} must be a finite number", name),
            ConfigError::InvertedScatterBand { lower, upper } => write!(
                f,
                "scatter_lower ({}) must not be above scatter_upper ({})",
                lower, upper
            ),
            ConfigError::NonPositiveInterval(ms) => {
                write!(f, "tick_interval_ms must be positive, got {}", ms)
            }
            ConfigError::Parse(e) => write!(f, "Failed to parse config: {}", e),
            ConfigError::Io(e) => write!(f, "Failed to read config file: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            ConfigError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
