//! Per-ball motion state machine
//!
//! Each state has its own transition function. A transition mutates the
//! ball's position and counters and reports the next state plus any side
//! effect the caller must apply to shared state (the occupancy table).

use serde::{Deserialize, Serialize};

use super::occupancy::OccupancyTable;
use super::particle::{MotionState, Particle};
use super::rng::RandomSource;
use crate::layout::Layout;

/// Lateral direction of a deflection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// `true` is right
    #[inline]
    pub fn from_coin(coin: bool) -> Self {
        if coin { Direction::Right } else { Direction::Left }
    }

    #[inline]
    pub fn sign(&self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    /// Motion state that carries a hop in this direction
    pub fn deflecting_state(&self) -> MotionState {
        match self {
            Direction::Left => MotionState::DeflectingLeft,
            Direction::Right => MotionState::DeflectingRight,
        }
    }

    /// Neighbouring column, or None if it would leave the board
    pub fn target_column(&self, column: usize, total_columns: usize) -> Option<usize> {
        match self {
            Direction::Left => column.checked_sub(1),
            Direction::Right => (column + 1 < total_columns).then_some(column + 1),
        }
    }
}

/// Side effect of a transition on shared state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    None,
    /// The ball came to rest; its column floor must rise by one
    Settle { column: usize, row: usize },
}

/// Result of one transition function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next: MotionState,
    pub effect: Effect,
}

impl Transition {
    #[inline]
    pub fn next(state: MotionState) -> Self {
        Self {
            next: state,
            effect: Effect::None,
        }
    }

    #[inline]
    pub fn settle(column: usize, row: usize) -> Self {
        Self {
            next: MotionState::Settled,
            effect: Effect::Settle { column, row },
        }
    }
}

/// Advance one ball by one tick
///
/// Applies the transition for the ball's current state, raises the column
/// floor when it settles, and latches the release flag. Advancing a settled
/// ball changes nothing.
pub fn advance(
    particle: &mut Particle,
    occupancy: &mut OccupancyTable,
    layout: &Layout,
    rng: &mut dyn RandomSource,
) -> Effect {
    let transition = match particle.state {
        MotionState::Descending => descend(particle, layout, rng),
        MotionState::DeflectingLeft => deflect(particle, Direction::Left, layout),
        MotionState::DeflectingRight => deflect(particle, Direction::Right, layout),
        MotionState::FreeFalling => {
            let floor = occupancy.floor_of(particle.cell.column);
            free_fall(particle, floor, layout)
        }
        MotionState::Settled => Transition::next(MotionState::Settled),
    };

    particle.state = transition.next;
    if let Effect::Settle { column, .. } = transition.effect {
        occupancy.increment(column);
    }
    particle.check_release(layout);

    debug_assert!(particle.cell.column < layout.total_columns);
    transition.effect
}

/// Drop by one sub-step; at each full row decide what happens next
pub fn descend(particle: &mut Particle, layout: &Layout, rng: &mut dyn RandomSource) -> Transition {
    particle.pos.y -= layout.y_step;
    particle.step += 1;
    if particle.step < layout.descent_substeps {
        return Transition::next(MotionState::Descending);
    }

    particle.step = 0;
    particle.cell.row = particle.cell.row.saturating_sub(1);
    particle.snap(layout);

    if particle.cell.row == 0 || particle.pos.y < layout.scatter_lower {
        return Transition::next(MotionState::FreeFalling);
    }
    if particle.pos.y > layout.scatter_upper {
        return Transition::next(MotionState::Descending);
    }

    let direction = Direction::from_coin(rng.coin());
    match direction.target_column(particle.cell.column, layout.total_columns) {
        Some(column) => {
            particle.cell.column = column;
            Transition::next(direction.deflecting_state())
        }
        None => {
            // Against the wall: the ball bounces straight down instead
            log::trace!(
                "Ball {} clamped at wall (column {}, {:?})",
                particle.index,
                particle.cell.column,
                direction
            );
            Transition::next(MotionState::Descending)
        }
    }
}

/// Hop sideways over a peg; the column already points at the destination
pub fn deflect(particle: &mut Particle, direction: Direction, layout: &Layout) -> Transition {
    particle.pos.x += direction.sign() * layout.x_step;
    particle.pos.y += layout.deflect_rise;
    particle.step += 1;
    if particle.step < layout.deflect_substeps {
        return Transition::next(direction.deflecting_state());
    }

    particle.step = 0;
    particle.snap(layout);
    Transition::next(MotionState::Descending)
}

/// Drop straight down until the column's stack (or the ground) stops it
///
/// `floor` is the column's stack height: rows `0..floor` are taken, so the
/// ball comes to rest in row `floor`.
pub fn free_fall(particle: &mut Particle, floor: usize, layout: &Layout) -> Transition {
    if particle.cell.row > floor && particle.pos.y > layout.ground_y {
        particle.pos.y -= layout.y_step;
        particle.step += 1;
        if particle.step >= layout.descent_substeps {
            particle.step = 0;
            particle.cell.row -= 1;
            particle.snap(layout);
        }
        return Transition::next(MotionState::FreeFalling);
    }

    particle.step = 0;
    particle.cell.row = floor;
    particle.snap(layout);
    Transition::settle(particle.cell.column, floor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::layout::Cell;
    use crate::sim::rng::ScriptedSource;

    /// 5 columns, inlet at column 2 row 4, decisions on rows 3 and 2
    fn small_layout() -> Layout {
        Layout::new(&SimConfig {
            population: 1,
            total_columns: 5,
            start_column: 2,
            start_row: 4,
            x_step: 0.05,
            y_step: 0.025,
            deflect_rise: 0.01,
            descent_substeps: 2,
            deflect_substeps: 2,
            ground_y: 0.0,
            scatter_upper: 1.0,
            scatter_lower: 0.075,
            release_threshold: 0.02,
            ..Default::default()
        })
    }

    #[test]
    fn test_descend_substeps_then_decide() {
        let layout = small_layout();
        let mut p = Particle::new(0, [0.0; 3], &layout);
        let mut rng = ScriptedSource::new(vec![true]);

        let t = descend(&mut p, &layout, &mut rng);
        assert_eq!(t.next, MotionState::Descending);
        assert_eq!(p.step, 1);
        assert_eq!(p.cell.row, 4);
        assert_eq!(rng.consumed(), 0);

        let t = descend(&mut p, &layout, &mut rng);
        assert_eq!(t.next, MotionState::DeflectingRight);
        assert_eq!(p.step, 0);
        assert_eq!(p.cell, Cell::new(3, 3));
        assert_eq!(rng.consumed(), 1);
    }

    #[test]
    fn test_descend_below_band_free_falls_without_coin() {
        let layout = small_layout();
        let mut p = Particle::new(0, [0.0; 3], &layout);
        p.cell.row = 2;
        p.snap(&layout);
        let mut rng = ScriptedSource::new(vec![true]);

        descend(&mut p, &layout, &mut rng);
        let t = descend(&mut p, &layout, &mut rng);
        assert_eq!(t.next, MotionState::FreeFalling);
        assert_eq!(p.cell.row, 1);
        assert_eq!(rng.consumed(), 0);
    }

    #[test]
    fn test_descend_above_band_keeps_descending() {
        let mut layout = small_layout();
        layout.scatter_upper = 0.12;
        let mut p = Particle::new(0, [0.0; 3], &layout);
        let mut rng = ScriptedSource::new(vec![true]);

        descend(&mut p, &layout, &mut rng);
        let t = descend(&mut p, &layout, &mut rng);
        // Row 3 (y = 0.15) is above the band
        assert_eq!(t.next, MotionState::Descending);
        assert_eq!(p.cell.column, 2);
        assert_eq!(rng.consumed(), 0);
    }

    #[test]
    fn test_wall_clamps_column() {
        let layout = small_layout();
        let mut p = Particle::new(0, [0.0; 3], &layout);
        p.cell.column = 0;
        p.snap(&layout);
        let mut rng = ScriptedSource::new(vec![false]);

        descend(&mut p, &layout, &mut rng);
        let t = descend(&mut p, &layout, &mut rng);
        assert_eq!(t.next, MotionState::Descending);
        assert_eq!(p.cell.column, 0);

        let mut p = Particle::new(0, [0.0; 3], &layout);
        p.cell.column = 4;
        let mut rng = ScriptedSource::new(vec![true]);
        descend(&mut p, &layout, &mut rng);
        descend(&mut p, &layout, &mut rng);
        assert_eq!(p.cell.column, 4);
    }

    #[test]
    fn test_single_column_never_moves_sideways() {
        let layout = Layout::new(&SimConfig {
            total_columns: 1,
            start_column: 0,
            ..Default::default()
        });
        assert_eq!(Direction::Left.target_column(0, 1), None);
        assert_eq!(Direction::Right.target_column(0, 1), None);

        let mut p = Particle::new(0, [0.0; 3], &layout);
        let mut occupancy = OccupancyTable::new(1);
        let mut rng = ScriptedSource::new(vec![true, false]);
        for _ in 0..500 {
            advance(&mut p, &mut occupancy, &layout, &mut rng);
            assert_eq!(p.cell.column, 0);
            assert!(!p.state.is_deflecting());
        }
        assert!(p.is_settled());
        assert_eq!(occupancy.as_slice(), &[1]);
    }

    #[test]
    fn test_deflect_moves_then_returns_to_descending() {
        let layout = small_layout();
        let mut p = Particle::new(0, [0.0; 3], &layout);
        let start_x = p.pos.x;
        p.cell.column = 1;

        let t = deflect(&mut p, Direction::Left, &layout);
        assert_eq!(t.next, MotionState::DeflectingLeft);
        assert!(p.pos.x < start_x);
        assert!(p.pos.y > layout.row_y(4));

        let t = deflect(&mut p, Direction::Left, &layout);
        assert_eq!(t.next, MotionState::Descending);
        assert_eq!(p.step, 0);
        assert_eq!(p.pos, layout.cell_center(Cell::new(1, 4)));
    }

    #[test]
    fn test_free_fall_stops_on_stack() {
        let layout = small_layout();
        let mut p = Particle::new(0, [0.0; 3], &layout);
        p.state = MotionState::FreeFalling;
        p.cell = Cell::new(2, 3);
        p.snap(&layout);

        // Two balls already in the column: rest in row 2
        let mut ticks = 0;
        let t = loop {
            let t = free_fall(&mut p, 2, &layout);
            ticks += 1;
            if t.next == MotionState::Settled {
                break t;
            }
            assert!(ticks < 100);
        };
        assert_eq!(t.effect, Effect::Settle { column: 2, row: 2 });
        assert_eq!(p.cell, Cell::new(2, 2));
        assert_eq!(p.pos, layout.cell_center(Cell::new(2, 2)));
    }

    #[test]
    fn test_free_fall_reaches_ground() {
        let layout = small_layout();
        let mut p = Particle::new(0, [0.0; 3], &layout);
        p.cell = Cell::new(2, 1);
        p.snap(&layout);

        assert_eq!(free_fall(&mut p, 0, &layout).next, MotionState::FreeFalling);
        assert_eq!(free_fall(&mut p, 0, &layout).next, MotionState::FreeFalling);
        assert_eq!(p.cell.row, 0);
        let t = free_fall(&mut p, 0, &layout);
        assert_eq!(t.effect, Effect::Settle { column: 2, row: 0 });
    }

    #[test]
    fn test_settle_is_idempotent() {
        let layout = small_layout();
        let mut p = Particle::new(0, [0.0; 3], &layout);
        p.state = MotionState::FreeFalling;
        p.cell = Cell::new(2, 0);
        p.snap(&layout);
        let mut occupancy = OccupancyTable::new(5);
        let mut rng = ScriptedSource::new(Vec::new());

        let effect = advance(&mut p, &mut occupancy, &layout, &mut rng);
        assert_eq!(effect, Effect::Settle { column: 2, row: 0 });
        assert_eq!(occupancy.as_slice(), &[0, 0, 1, 0, 0]);
        let frozen = p.clone();

        for _ in 0..10 {
            assert_eq!(advance(&mut p, &mut occupancy, &layout, &mut rng), Effect::None);
        }
        assert_eq!(occupancy.as_slice(), &[0, 0, 1, 0, 0]);
        assert_eq!(p.pos, frozen.pos);
        assert_eq!(p.cell, frozen.cell);
        assert_eq!(p.state, MotionState::Settled);
    }

    #[test]
    fn test_release_flag_set_while_moving() {
        let layout = small_layout();
        let mut p = Particle::new(0, [0.0; 3], &layout);
        p.state = MotionState::FreeFalling;
        p.cell = Cell::new(2, 1);
        p.snap(&layout);
        let mut occupancy = OccupancyTable::new(5);
        let mut rng = ScriptedSource::new(Vec::new());

        advance(&mut p, &mut occupancy, &layout, &mut rng);
        assert!(!p.ready_for_next); // y = 0.025
        advance(&mut p, &mut occupancy, &layout, &mut rng);
        assert!(p.ready_for_next); // y = 0.0
        assert_eq!(p.state, MotionState::FreeFalling);
    }
}
