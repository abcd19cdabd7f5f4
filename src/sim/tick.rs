//! Fixed tick pass
//!
//! One call advances every movable ball exactly once, in index order. The
//! occupancy table is consistent again by the time the call returns.

use serde::{Deserialize, Serialize};

use super::motion::{Effect, advance};
use super::release::eligible_count;
use super::rng::RandomSource;
use super::state::SimState;

/// Things that happened during a tick pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimEvent {
    /// Ball left the inlet (first tick it moved)
    Released { index: usize },
    /// Ball came to rest
    Settled {
        index: usize,
        column: usize,
        row: usize,
    },
    /// Every ball of the run has settled
    RunComplete { run: u32 },
    /// The board was reset for a fresh run
    Restarted { run: u32 },
}

/// Advance the simulation by one tick
///
/// If restarts are enabled and the last ball settled during an earlier pass,
/// this pass only performs the restart.
pub fn tick(state: &mut SimState, rng: &mut dyn RandomSource) -> Vec<SimEvent> {
    let mut events = Vec::new();
    state.time_ticks += 1;

    if state.config.restart_enabled && state.last_settled() {
        state.restart();
        events.push(SimEvent::Restarted { run: state.run });
        return events;
    }

    let eligible = eligible_count(&state.particles);
    for index in state.released..eligible {
        log::debug!("Ball {} released at tick {}", index, state.time_ticks);
        events.push(SimEvent::Released { index });
    }
    state.released = state.released.max(eligible);

    for particle in state.particles.iter_mut().take(eligible) {
        let effect = advance(particle, &mut state.occupancy, &state.layout, rng);
        if let Effect::Settle { column, row } = effect {
            log::debug!(
                "Ball {} settled in column {} row {} (floor now {})",
                particle.index,
                column,
                row,
                state.occupancy.floor_of(column)
            );
            events.push(SimEvent::Settled {
                index: particle.index,
                column,
                row,
            });
        }
        log::trace!(
            "Ball {} at ({:.3}, {:.3}) {:?}",
            particle.index,
            particle.pos.x,
            particle.pos.y,
            particle.state
        );
    }

    let done = if state.config.restart_enabled {
        state.last_settled()
    } else {
        state.all_settled()
    };
    if done && !state.complete_reported {
        state.complete_reported = true;
        log::info!(
            "Run {} complete after {} ticks: {:?}",
            state.run,
            state.time_ticks,
            state.occupancy.as_slice()
        );
        events.push(SimEvent::RunComplete { run: state.run });
    }

    events
}
