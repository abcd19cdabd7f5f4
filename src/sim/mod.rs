//! Deterministic simulation module
//!
//! All cascade logic lives here. This module must be pure and deterministic:
//! - One full pass over the population per tick
//! - Injected, seedable randomness only
//! - Stable iteration order (by particle index)
//! - No rendering or platform dependencies

pub mod motion;
pub mod occupancy;
pub mod particle;
pub mod release;
pub mod rng;
pub mod state;
pub mod tick;

pub use motion::{Direction, Effect, Transition, advance};
pub use occupancy::OccupancyTable;
pub use particle::{MotionState, Particle};
pub use release::{eligible_count, is_eligible};
pub use rng::{RandomSource, ScriptedSource, SeededSource};
pub use state::{Frame, FrameBall, SimState};
pub use tick::{SimEvent, tick};
