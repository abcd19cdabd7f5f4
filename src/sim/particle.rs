//! Balls and their motion states

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::layout::{Cell, Layout};

/// Where a ball is in its fall
///
/// Legal sequences follow
/// `Descending -> (Deflecting* -> Descending)* -> FreeFalling -> Settled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MotionState {
    /// Dropping one row at a time, scattering at each row inside the band
    #[default]
    Descending,
    /// Hopping one column left over a peg
    DeflectingLeft,
    /// Hopping one column right over a peg
    DeflectingRight,
    /// Below the scatter band, dropping straight onto its column's stack
    FreeFalling,
    /// At rest on top of its column (terminal)
    Settled,
}

impl MotionState {
    /// Mid-way through a sideways hop
    pub fn is_deflecting(&self) -> bool {
        matches!(self, MotionState::DeflectingLeft | MotionState::DeflectingRight)
    }
}

/// A ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    /// Creation order; release and draw order
    pub index: usize,
    /// Continuous position (rendering only)
    pub pos: Vec2,
    /// Authoritative board cell
    pub cell: Cell,
    /// RGB, each channel in [0, 1)
    color: [f32; 3],
    pub state: MotionState,
    /// Ticks spent in the current phase
    pub step: u32,
    /// Set once the ball drops below the release threshold, never cleared
    /// until restart
    pub ready_for_next: bool,
}

impl Particle {
    pub fn new(index: usize, color: [f32; 3], layout: &Layout) -> Self {
        Self {
            index,
            pos: layout.start_position(),
            cell: layout.start,
            color,
            state: MotionState::Descending,
            step: 0,
            ready_for_next: false,
        }
    }

    /// Back to the inlet for a fresh run (color is kept)
    pub fn reset(&mut self, layout: &Layout) {
        self.pos = layout.start_position();
        self.cell = layout.start;
        self.state = MotionState::Descending;
        self.step = 0;
        self.ready_for_next = false;
    }

    #[inline]
    pub fn color(&self) -> [f32; 3] {
        self.color
    }

    #[inline]
    pub fn is_settled(&self) -> bool {
        self.state == MotionState::Settled
    }

    /// Snap the position onto the current cell
    #[inline]
    pub(crate) fn snap(&mut self, layout: &Layout) {
        self.pos = layout.cell_center(self.cell);
    }

    /// Latch `ready_for_next` once below the release threshold.
    /// A settled ball never holds up the queue, even if it came to rest
    /// above the threshold.
    #[inline]
    pub(crate) fn check_release(&mut self, layout: &Layout) {
        if !self.ready_for_next
            && (self.pos.y < layout.release_threshold || self.is_settled())
        {
            self.ready_for_next = true;
        }
    }
}
