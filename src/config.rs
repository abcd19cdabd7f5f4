//! Run configuration
//!
//! Fixed for the lifetime of a run. Persisted in LocalStorage on the web,
//! read from a JSON file on native.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Board and timing parameters for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Number of balls
    pub population: usize,
    /// Number of settling columns
    pub total_columns: usize,
    /// Column every ball starts in
    pub start_column: usize,
    /// Row every ball starts in (rows count up from the ground, row 0)
    pub start_row: usize,

    // === Steps ===
    /// Horizontal move per deflection tick
    pub x_step: f32,
    /// Vertical move per descent/free-fall tick
    pub y_step: f32,
    /// Upward move per deflection tick (0 = flat sideways hop)
    pub deflect_rise: f32,
    /// Ticks to descend one row
    pub descent_substeps: u32,
    /// Ticks to cross one column
    pub deflect_substeps: u32,

    // === Heights (field units, y up) ===
    /// Height of row 0
    pub ground_y: f32,
    /// Lateral decisions start once a ball is at or below this height
    pub scatter_upper: f32,
    /// Below this height a ball stops scattering and free-falls
    pub scatter_lower: f32,
    /// Dropping below this height lets the next ball go
    pub release_threshold: f32,

    // === Run control ===
    /// Start a fresh run once the last ball has settled
    pub restart_enabled: bool,
    /// Milliseconds between ticks
    pub tick_interval_ms: f64,
    /// Fixed RNG seed (None = time based)
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            population: DEFAULT_POPULATION,
            total_columns: DEFAULT_COLUMNS,
            start_column: DEFAULT_START_COLUMN,
            start_row: DEFAULT_START_ROW,

            x_step: DEFAULT_X_STEP,
            y_step: DEFAULT_Y_STEP,
            deflect_rise: DEFAULT_DEFLECT_RISE,
            descent_substeps: DEFAULT_DESCENT_SUBSTEPS,
            deflect_substeps: DEFAULT_DEFLECT_SUBSTEPS,

            ground_y: DEFAULT_GROUND_Y,
            scatter_upper: DEFAULT_SCATTER_UPPER,
            scatter_lower: DEFAULT_SCATTER_LOWER,
            release_threshold: DEFAULT_RELEASE_THRESHOLD,

            restart_enabled: false,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Reject configurations the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if self.total_columns == 0 {
            return Err(ConfigError::NoColumns);
        }
        if self.start_column >= self.total_columns {
            return Err(ConfigError::StartColumnOutOfRange {
                column: self.start_column,
                total_columns: self.total_columns,
            });
        }
        if self.start_row == 0 {
            return Err(ConfigError::StartRowAtGround);
        }

        for (name, value) in [("x_step", self.x_step), ("y_step", self.y_step)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositiveStep { name, value });
            }
        }
        if !(self.deflect_rise.is_finite() && self.deflect_rise >= 0.0) {
            return Err(ConfigError::NonPositiveStep {
                name: "deflect_rise",
                value: self.deflect_rise,
            });
        }
        if self.descent_substeps == 0 {
            return Err(ConfigError::ZeroSubsteps {
                name: "descent_substeps",
            });
        }
        if self.deflect_substeps == 0 {
            return Err(ConfigError::ZeroSubsteps {
                name: "deflect_substeps",
            });
        }

        for (name, value) in [
            ("ground_y", self.ground_y),
            ("scatter_upper", self.scatter_upper),
            ("scatter_lower", self.scatter_lower),
            ("release_threshold", self.release_threshold),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { name });
            }
        }
        if self.scatter_lower > self.scatter_upper {
            return Err(ConfigError::InvertedScatterBand {
                lower: self.scatter_lower,
                upper: self.scatter_upper,
            });
        }

        if !(self.tick_interval_ms.is_finite() && self.tick_interval_ms > 0.0) {
            return Err(ConfigError::NonPositiveInterval(self.tick_interval_ms));
        }

        Ok(())
    }

    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Tick rate implied by the interval
    pub fn ticks_per_second(&self) -> f64 {
        1000.0 / self.tick_interval_ms
    }

    /// Load and validate a JSON config file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "galton_cascade_config";

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored config: {}", e),
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Save config to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Config saved");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_population() {
        let config = SimConfig {
            population: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyPopulation)));
    }

    #[test]
    fn test_rejects_zero_columns() {
        let config = SimConfig {
            total_columns: 0,
            start_column: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoColumns)));
    }

    #[test]
    fn test_rejects_start_column_off_board() {
        let config = SimConfig {
            total_columns: 5,
            start_column: 5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::StartColumnOutOfRange { column: 5, .. })
        ));
    }

    #[test]
    fn test_rejects_bad_steps() {
        let config = SimConfig {
            y_step: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositiveStep { name: "y_step", .. })
        ));

        let config = SimConfig {
            x_step: -0.1,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositiveStep { name: "x_step", .. })
        ));

        let config = SimConfig {
            x_step: f32::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SimConfig {
            deflect_substeps: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroSubsteps {
                name: "deflect_substeps"
            })
        ));
    }

    #[test]
    fn test_rejects_inverted_band() {
        let config = SimConfig {
            scatter_lower: 0.9,
            scatter_upper: 0.3,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedScatterBand { .. })
        ));
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = SimConfig::from_json(r#"{ "population": 7, "restart_enabled": true }"#)
            .expect("valid config");
        assert_eq!(config.population, 7);
        assert!(config.restart_enabled);
        assert_eq!(config.total_columns, DEFAULT_COLUMNS);
    }

    #[test]
    fn test_from_json_validates() {
        let err = SimConfig::from_json(r#"{ "total_columns": 0, "start_column": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::NoColumns));

        let err = SimConfig::from_json("not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_ticks_per_second() {
        let config = SimConfig {
            tick_interval_ms: 50.0,
            ..Default::default()
        };
        assert!((config.ticks_per_second() - 20.0).abs() < 1e-9);
    }
}
