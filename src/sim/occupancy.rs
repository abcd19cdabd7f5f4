//! Column occupancy (stack heights)

use serde::{Deserialize, Serialize};

/// Number of balls stacked in each column
///
/// A column's floor only rises, one ball at a time. The whole table is
/// cleared on restart; nothing else lowers it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyTable {
    floors: Vec<usize>,
}

impl OccupancyTable {
    pub fn new(columns: usize) -> Self {
        Self {
            floors: vec![0; columns],
        }
    }

    /// Record a ball settling in `column`
    pub fn increment(&mut self, column: usize) {
        debug_assert!(
            column < self.floors.len(),
            "column {} outside occupancy table of {}",
            column,
            self.floors.len()
        );
        if let Some(floor) = self.floors.get_mut(column) {
            *floor += 1;
        } else {
            log::error!("Ignoring settle in column {} (table has {})", column, self.floors.len());
        }
    }

    /// Current stack height of `column` (0 when out of range)
    #[inline]
    pub fn floor_of(&self, column: usize) -> usize {
        self.floors.get(column).copied().unwrap_or(0)
    }

    /// Zero every column (restart only)
    pub fn clear(&mut self) {
        self.floors.iter_mut().for_each(|f| *f = 0);
    }

    /// Total balls recorded
    pub fn total(&self) -> usize {
        self.floors.iter().sum()
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.floors.len()
    }

    /// True only for a zero-column table
    pub fn is_empty(&self) -> bool {
        self.floors.is_empty()
    }

    /// Stack heights in column order
    pub fn as_slice(&self) -> &[usize] {
        &self.floors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_raises_floor() {
        let mut table = OccupancyTable::new(5);
        table.increment(2);
        table.increment(3);
        table.increment(2);
        assert_eq!(table.as_slice(), &[0, 0, 2, 1, 0]);
        assert_eq!(table.floor_of(2), 2);
        assert_eq!(table.total(), 3);
    }

    #[test]
    fn test_clear() {
        let mut table = OccupancyTable::new(3);
        table.increment(0);
        table.increment(1);
        table.clear();
        assert_eq!(table.as_slice(), &[0, 0, 0]);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_floor_of_out_of_range() {
        let table = OccupancyTable::new(2);
        assert_eq!(table.floor_of(9), 0);
    }
}
