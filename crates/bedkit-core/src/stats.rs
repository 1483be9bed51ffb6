//! Mesh statistics read-model for frontends.

use serde::{Deserialize, Serialize};

use crate::grid::MeshGrid;

/// Summary statistics over a mesh grid, in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeshStats {
    pub rows: usize,
    pub cols: usize,
    pub min: f64,
    pub max: f64,
    /// `max - min`, the total bed deviation.
    pub range: f64,
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
}

impl MeshStats {
    /// Compute statistics for a grid.
    pub fn of(grid: &MeshGrid) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        let mut count = 0usize;
        for row in 0..grid.rows() {
            for &v in grid.row_slice(row).expect("row index in range") {
                min = min.min(v);
                max = max.max(v);
                sum += v;
                count += 1;
            }
        }
        let mean = sum / count as f64;
        let mut var = 0.0;
        for row in 0..grid.rows() {
            for &v in grid.row_slice(row).expect("row index in range") {
                var += (v - mean) * (v - mean);
            }
        }
        Self {
            rows: grid.rows(),
            cols: grid.cols(),
            min,
            max,
            range: max - min,
            mean,
            std_dev: (var / count as f64).sqrt(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::MeshBounds;

    #[test]
    fn test_stats_simple() {
        let bounds = MeshBounds::new((0.0, 0.0), (10.0, 10.0)).unwrap();
        let grid =
            MeshGrid::from_rows(vec![vec![-0.1, 0.1], vec![0.3, -0.3]], bounds).unwrap();
        let stats = MeshStats::of(&grid);
        assert_eq!(stats.min, -0.3);
        assert_eq!(stats.max, 0.3);
        assert!((stats.range - 0.6).abs() < 1e-12);
        assert!(stats.mean.abs() < 1e-12);
        assert!((stats.std_dev - 0.22360679).abs() < 1e-6);
    }
}
