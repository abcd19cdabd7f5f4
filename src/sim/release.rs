//! Release sequencing
//!
//! Balls leave the inlet single file: ball `i` may move only once ball
//! `i - 1` has dropped below the release threshold. Because the flag is
//! monotonic, the movable balls always form a prefix of the population.

use super::particle::Particle;

/// Number of balls allowed to move this tick (always a prefix)
///
/// Evaluated from the flags as they stand before the pass. Never cached.
pub fn eligible_count(particles: &[Particle]) -> usize {
    if particles.is_empty() {
        return 0;
    }
    let ready_prefix = particles
        .iter()
        .take_while(|p| p.ready_for_next)
        .count();
    (ready_prefix + 1).min(particles.len())
}

/// Whether ball `index` may move this tick
pub fn is_eligible(particles: &[Particle], index: usize) -> bool {
    match index {
        0 => !particles.is_empty(),
        i if i < particles.len() => particles[i - 1].ready_for_next,
        _ => false,
    }
}
