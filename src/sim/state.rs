//! Simulation state
//!
//! One owned context per run: config, derived layout, the balls and the
//! occupancy table. Mutated only by [`super::tick`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::occupancy::OccupancyTable;
use super::particle::Particle;
use super::rng::RandomSource;
use crate::config::SimConfig;
use crate::error::ConfigError;
use crate::layout::Layout;

/// Complete simulation state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimState {
    pub config: SimConfig,
    pub layout: Layout,
    /// Balls, sorted by index
    pub particles: Vec<Particle>,
    pub occupancy: OccupancyTable,
    /// Tick passes completed
    pub time_ticks: u64,
    /// Runs started (0 = first run)
    pub run: u32,
    /// Balls that have been let go this run
    pub(crate) released: usize,
    /// Set once the run's completion has been reported
    pub(crate) complete_reported: bool,
}

impl SimState {
    /// Validate the config and create the population at the inlet
    ///
    /// Ball colors are drawn from `rng` in index order.
    pub fn new(config: SimConfig, rng: &mut dyn RandomSource) -> Result<Self, ConfigError> {
        config.validate()?;
        let layout = Layout::new(&config);

        let particles = (0..config.population)
            .map(|index| {
                let color = [rng.unit(), rng.unit(), rng.unit()];
                Particle::new(index, color, &layout)
            })
            .collect();

        log::info!(
            "Board ready: {} balls, {} columns, inlet {:?}",
            config.population,
            config.total_columns,
            layout.start
        );

        Ok(Self {
            occupancy: OccupancyTable::new(config.total_columns),
            config,
            layout,
            particles,
            time_ticks: 0,
            run: 0,
            released: 0,
            complete_reported: false,
        })
    }

    /// Put every ball back at the inlet and empty the bins
    ///
    /// Reuses the existing population; colors are kept.
    pub fn restart(&mut self) {
        for particle in &mut self.particles {
            particle.reset(&self.layout);
        }
        self.occupancy.clear();
        self.released = 0;
        self.complete_reported = false;
        self.run += 1;
        log::info!("Run {} started", self.run);
    }

    /// Balls at rest
    pub fn settled_count(&self) -> usize {
        self.particles.iter().filter(|p| p.is_settled()).count()
    }

    /// Every ball is at rest
    pub fn all_settled(&self) -> bool {
        self.particles.iter().all(|p| p.is_settled())
    }

    /// Whether the last ball (by index) has settled
    pub fn last_settled(&self) -> bool {
        self.particles.last().is_some_and(|p| p.is_settled())
    }

    /// Balls let go so far this run
    pub fn released(&self) -> usize {
        self.released
    }

    /// Copy of everything the renderer draws
    pub fn snapshot(&self) -> Frame {
        Frame {
            tick: self.time_ticks,
            run: self.run,
            balls: self
                .particles
                .iter()
                .map(|p| FrameBall {
                    pos: p.pos,
                    color: p.color(),
                })
                .collect(),
        }
    }
}

/// One ball as drawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameBall {
    pub pos: Vec2,
    pub color: [f32; 3],
}

/// Stable view of the board between two tick passes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub tick: u64,
    pub run: u32,
    /// In draw order (by index)
    pub balls: Vec<FrameBall>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::particle::MotionState;
    use crate::sim::rng::{ScriptedSource, SeededSource};

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = SimConfig {
            population: 0,
            ..Default::default()
        };
        let mut rng = SeededSource::new(1);
        assert!(matches!(
            SimState::new(config, &mut rng),
            Err(ConfigError::EmptyPopulation)
        ));
    }

    #[test]
    fn test_new_population_at_inlet() {
        let config = SimConfig {
            population: 5,
            ..Default::default()
        };
        let mut rng = SeededSource::new(3);
        let state = SimState::new(config, &mut rng).expect("valid config");
        assert_eq!(state.particles.len(), 5);
        assert_eq!(state.occupancy.len(), state.config.total_columns);
        for (i, p) in state.particles.iter().enumerate() {
            assert_eq!(p.index, i);
            assert_eq!(p.cell, state.layout.start);
            assert_eq!(p.state, MotionState::Descending);
            for c in p.color() {
                assert!((0.0..1.0).contains(&c));
            }
        }
    }

    #[test]
    fn test_restart_resets_everything() {
        let config = SimConfig {
            population: 2,
            total_columns: 3,
            start_column: 1,
            ..Default::default()
        };
        let mut rng = ScriptedSource::new(vec![true]).with_unit(0.25);
        let mut state = SimState::new(config, &mut rng).expect("valid config");
        state.particles[0].state = MotionState::Settled;
        state.particles[0].ready_for_next = true;
        state.occupancy.increment(1);
        state.released = 2;

        state.restart();
        assert_eq!(state.run, 1);
        assert_eq!(state.occupancy.total(), 0);
        assert_eq!(state.released(), 0);
        assert_eq!(state.particles[0].state, MotionState::Descending);
        assert!(!state.particles[0].ready_for_next);
        assert_eq!(state.particles[0].color(), [0.25; 3]);
    }

    #[test]
    fn test_snapshot_matches_particles() {
        let config = SimConfig {
            population: 3,
            ..Default::default()
        };
        let mut rng = SeededSource::new(9);
        let state = SimState::new(config, &mut rng).expect("valid config");
        let frame = state.snapshot();
        assert_eq!(frame.balls.len(), 3);
        assert_eq!(frame.balls[1].pos, state.particles[1].pos);
        assert_eq!(frame.balls[2].color, state.particles[2].color());
    }
}
