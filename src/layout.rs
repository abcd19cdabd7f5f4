//! Board geometry
//!
//! Everything the renderer needs to draw pegs and bins, derived once from the
//! config so drawing code never repeats simulation math.
//!
//! Field coordinates are normalized to [0, 1] x [0, 1] with y pointing up.
//! Columns are centered on x = 0.5, rows count up from `ground_y`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::SimConfig;

/// Discrete board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub column: usize,
    pub row: usize,
}

impl Cell {
    pub const fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }
}

/// Derived layout constants for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub total_columns: usize,
    /// Cell every ball starts in
    pub start: Cell,
    /// Horizontal distance between column centers
    pub column_pitch: f32,
    /// Vertical distance between row centers
    pub row_pitch: f32,
    pub ground_y: f32,
    pub scatter_upper: f32,
    pub scatter_lower: f32,
    pub release_threshold: f32,

    pub x_step: f32,
    pub y_step: f32,
    pub deflect_rise: f32,
    pub descent_substeps: u32,
    pub deflect_substeps: u32,
}

impl Layout {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            total_columns: config.total_columns,
            start: Cell::new(config.start_column, config.start_row),
            column_pitch: config.x_step * config.deflect_substeps as f32,
            row_pitch: config.y_step * config.descent_substeps as f32,
            ground_y: config.ground_y,
            scatter_upper: config.scatter_upper,
            scatter_lower: config.scatter_lower,
            release_threshold: config.release_threshold,
            x_step: config.x_step,
            y_step: config.y_step,
            deflect_rise: config.deflect_rise,
            descent_substeps: config.descent_substeps,
            deflect_substeps: config.deflect_substeps,
        }
    }

    /// X of a column center
    #[inline]
    pub fn column_x(&self, column: usize) -> f32 {
        let center = (self.total_columns as f32 - 1.0) / 2.0;
        0.5 + (column as f32 - center) * self.column_pitch
    }

    /// Y of a row center
    #[inline]
    pub fn row_y(&self, row: usize) -> f32 {
        self.ground_y + row as f32 * self.row_pitch
    }

    /// Canonical position of a cell
    #[inline]
    pub fn cell_center(&self, cell: Cell) -> Vec2 {
        Vec2::new(self.column_x(cell.column), self.row_y(cell.row))
    }

    /// Where every ball enters the board
    #[inline]
    pub fn start_position(&self) -> Vec2 {
        self.cell_center(self.start)
    }

    /// X of the left and right boundary lines of a column
    pub fn column_bounds(&self, column: usize) -> (f32, f32) {
        let x = self.column_x(column);
        let half = self.column_pitch / 2.0;
        (x - half, x + half)
    }

    /// Whether a height lies inside the scatter band
    #[inline]
    pub fn in_scatter_band(&self, y: f32) -> bool {
        y >= self.scatter_lower && y <= self.scatter_upper
    }

    /// Rows whose center lies inside the scatter band (where decisions fire)
    pub fn scatter_rows(&self) -> impl Iterator<Item = usize> + '_ {
        (1..self.start.row).filter(|&row| self.in_scatter_band(self.row_y(row)))
    }

    /// Peg centers, staggered row to row like a bean machine
    ///
    /// A peg sits half a row below every decision point a ball can reach on
    /// that row. Rows above the band only carry the ball straight down, so the
    /// pattern widens by one column per decision row, not per row.
    pub fn pegs(&self) -> Vec<Vec2> {
        let mut pegs = Vec::new();
        for row in self.scatter_rows() {
            // Decisions already taken by the time a ball reaches this row
            let reach = self.scatter_rows().filter(|&r| r > row).count();
            let first = self.start.column.saturating_sub(reach);
            let last = (self.start.column + reach).min(self.total_columns - 1);
            let y = self.row_y(row) - self.row_pitch / 2.0;
            for column in first..=last {
                // Only columns with the same parity as the inlet are reachable
                if (column + reach) % 2 == self.start.column % 2 {
                    pegs.push(Vec2::new(self.column_x(column), y));
                }
            }
        }
        pegs
    }

    /// Bin walls: one vertical segment per column edge, ground to scatter band
    pub fn column_boundaries(&self) -> Vec<(Vec2, Vec2)> {
        let bottom = self.ground_y - self.row_pitch / 2.0;
        let top = self.scatter_lower;
        (0..=self.total_columns)
            .map(|edge| {
                let x = if edge == self.total_columns {
                    self.column_bounds(edge - 1).1
                } else {
                    self.column_bounds(edge).0
                };
                (Vec2::new(x, bottom), Vec2::new(x, top))
            })
            .collect()
    }

    /// Lower-left and upper-right corners of the drawn board
    pub fn field_bounds(&self) -> (Vec2, Vec2) {
        let (left, _) = self.column_bounds(0);
        let (_, right) = self.column_bounds(self.total_columns - 1);
        let bottom = self.ground_y - self.row_pitch / 2.0;
        let top = self.row_y(self.start.row) + self.row_pitch / 2.0;
        (Vec2::new(left, bottom), Vec2::new(right, top))
    }
}
