//! Galton Cascade - a bean machine in a window
//!
//! Core modules:
//! - `sim`: Deterministic simulation (particles, occupancy, motion, release)
//! - `layout`: Board geometry derived from the configuration
//! - `config`: Run configuration and validation
//! - `stats`: Settling distribution summaries
//! - `renderer`: WebGPU rendering pipeline

pub mod config;
pub mod error;
pub mod layout;
pub mod renderer;
pub mod sim;
pub mod stats;

pub use config::SimConfig;
pub use error::ConfigError;
pub use layout::Layout;
pub use stats::Distribution;

/// Board defaults: 100 balls, 26 scatter rows, bins deep enough for the
/// center column
pub mod consts {
    /// Number of balls in a run
    pub const DEFAULT_POPULATION: usize = 100;
    /// Number of settling columns
    pub const DEFAULT_COLUMNS: usize = 31;
    /// Column every ball enters through (center of the board)
    pub const DEFAULT_START_COLUMN: usize = 15;
    /// Row every ball enters at
    pub const DEFAULT_START_ROW: usize = 47;

    /// Horizontal move per deflection tick
    pub const DEFAULT_X_STEP: f32 = 0.0145;
    /// Vertical move per descent tick
    pub const DEFAULT_Y_STEP: f32 = 0.01;
    /// Upward hop per deflection tick (arc over the peg)
    pub const DEFAULT_DEFLECT_RISE: f32 = 0.003;
    pub const DEFAULT_DESCENT_SUBSTEPS: u32 = 2;
    pub const DEFAULT_DEFLECT_SUBSTEPS: u32 = 2;

    /// Bottom of the bins
    pub const DEFAULT_GROUND_Y: f32 = 0.02;
    /// Scatter band (lateral decisions allowed between these heights)
    pub const DEFAULT_SCATTER_UPPER: f32 = 0.87;
    pub const DEFAULT_SCATTER_LOWER: f32 = 0.35;
    /// Height a ball must drop below before the next one is let go
    pub const DEFAULT_RELEASE_THRESHOLD: f32 = 0.9;

    /// Milliseconds between simulation ticks (30 FPS timer, half speed)
    pub const DEFAULT_TICK_INTERVAL_MS: f64 = 2000.0 / 30.0;
    /// Maximum ticks per rendered frame to prevent spiral of death
    pub const MAX_TICKS_PER_FRAME: u32 = 8;

    /// Ball radius in field units
    pub const BALL_RADIUS: f32 = 0.009;
    /// Peg radius in field units
    pub const PEG_RADIUS: f32 = 0.003;
    /// Column boundary line width in field units
    pub const BOUNDARY_WIDTH: f32 = 0.002;
}
