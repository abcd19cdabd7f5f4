//! Settling distribution summaries

use serde::{Deserialize, Serialize};

use crate::sim::OccupancyTable;

/// Summary of how balls spread across the columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub counts: Vec<usize>,
    pub total: usize,
    /// Mean column index (0 when empty)
    pub mean: f64,
    pub variance: f64,
    /// Fullest column (lowest index on ties)
    pub mode: Option<usize>,
}

impl Distribution {
    /// Summarize raw per-column counts
    pub fn from_counts(counts: &[usize]) -> Self {
        let total: usize = counts.iter().sum();
        let (mean, variance) = if total == 0 {
            (0.0, 0.0)
        } else {
            let n = total as f64;
            let mean = counts
                .iter()
                .enumerate()
                .map(|(c, &k)| c as f64 * k as f64)
                .sum::<f64>()
                / n;
            let variance = counts
                .iter()
                .enumerate()
                .map(|(c, &k)| (c as f64 - mean).powi(2) * k as f64)
                .sum::<f64>()
                / n;
            (mean, variance)
        };

        let mode = if total == 0 {
            None
        } else {
            counts
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(&a.0)))
                .map(|(c, _)| c)
        };

        Self {
            counts: counts.to_vec(),
            total,
            mean,
            variance,
            mode,
        }
    }

    pub fn from_table(table: &OccupancyTable) -> Self {
        Self::from_counts(table.as_slice())
    }

    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }

    /// One text bar per column, the fullest column `width` characters long
    pub fn histogram(&self, width: usize) -> String {
        let max = self.counts.iter().copied().max().unwrap_or(0);
        let label_width = self.counts.len().saturating_sub(1).to_string().len();
        let mut out = String::new();
        for (column, &count) in self.counts.iter().enumerate() {
            let bar = if max == 0 { 0 } else { (count * width).div_ceil(max) };
            out.push_str(&format!(
                "{:>lw$} | {:<bw$} {}\n",
                column,
                "#".repeat(bar),
                count,
                lw = label_width,
                bw = width
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symmetric_distribution() {
        let d = Distribution::from_counts(&[1, 2, 4, 2, 1]);
        assert_eq!(d.total, 10);
        assert!((d.mean - 2.0).abs() < 1e-12);
        // (4*1 + 1*2 + 0 + 1*2 + 4*1) / 10
        assert!((d.variance - 1.2).abs() < 1e-12);
        assert_eq!(d.mode, Some(2));
    }

    #[test]
    fn test_empty_distribution() {
        let d = Distribution::from_counts(&[0, 0, 0]);
        assert_eq!(d.total, 0);
        assert_eq!(d.mean, 0.0);
        assert_eq!(d.mode, None);
        assert_eq!(d.histogram(10).lines().count(), 3);
    }

    #[test]
    fn test_mode_prefers_lowest_column() {
        let d = Distribution::from_counts(&[0, 3, 1, 3]);
        assert_eq!(d.mode, Some(1));
    }

    #[test]
    fn test_histogram_scales_to_width() {
        let d = Distribution::from_counts(&[0, 2, 4]);
        let text = d.histogram(8);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[2].contains("########"));
        assert!(lines[1].contains("####") && !lines[1].contains("#####"));
        assert!(!lines[0].contains('#'));
    }

    #[test]
    fn test_from_table() {
        let mut table = OccupancyTable::new(5);
        table.increment(2);
        table.increment(3);
        table.increment(2);
        let d = Distribution::from_table(&table);
        assert_eq!(d.counts, vec![0, 0, 2, 1, 0]);
        assert_eq!(d.mode, Some(2));
    }
}
