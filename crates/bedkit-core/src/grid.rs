//! The probed bed mesh: a fixed-shape grid of height offsets in millimeters.
//!
//! `MeshGrid` is a pure in-memory value type. It owns no I/O and no session
//! semantics; every operation is a plain transformation of the 2D array.
//! Mutating operations return the set of affected coordinates so a
//! presentation layer can decide what to redraw.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, GridResult};
use crate::selection::CoordSet;

/// Tolerance used by [`MeshGrid::diff_from`] when deciding whether two
/// height values differ.
pub const DIFF_EPSILON: f64 = 1e-9;

/// The physical bed rectangle the grid maps onto.
///
/// Grid indices are spaced linearly between `min` and `max` on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeshBounds {
    /// Lower-left corner `(x0, y0)` in bed millimeters.
    pub min: (f64, f64),
    /// Upper-right corner `(x1, y1)` in bed millimeters.
    pub max: (f64, f64),
}

impl MeshBounds {
    /// Create bounds, enforcing `x1 > x0` and `y1 > y0`.
    pub fn new(min: (f64, f64), max: (f64, f64)) -> GridResult<Self> {
        if max.0 <= min.0 || max.1 <= min.1 {
            return Err(GridError::InvalidBounds {
                min_x: min.0,
                min_y: min.1,
                max_x: max.0,
                max_y: max.1,
            });
        }
        Ok(Self { min, max })
    }

    /// Cell spacing `(dx, dy)` for a grid of the given shape.
    pub fn spacing(&self, rows: usize, cols: usize) -> (f64, f64) {
        let dx = (self.max.0 - self.min.0) / (cols.saturating_sub(1).max(1)) as f64;
        let dy = (self.max.1 - self.min.1) / (rows.saturating_sub(1).max(1)) as f64;
        (dx, dy)
    }
}

/// A probed bed-leveling mesh: `rows x cols` signed height offsets (mm).
///
/// The shape is fixed at construction; only the values mutate. Offsets are
/// stored row-major, row 0 at the bed front (minimum Y).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshGrid {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
    bounds: MeshBounds,
}

impl MeshGrid {
    /// Build a grid from row vectors. Rows must be non-empty and all the
    /// same length.
    pub fn from_rows(rows: Vec<Vec<f64>>, bounds: MeshBounds) -> GridResult<Self> {
        if rows.is_empty() || rows[0].is_empty() {
            return Err(GridError::Empty);
        }
        let cols = rows[0].len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(GridError::RaggedRows {
                    row: i,
                    len: row.len(),
                    expected: cols,
                });
            }
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            values: rows.into_iter().flatten().collect(),
            bounds,
        })
    }

    /// Build a grid filled with a constant value.
    pub fn filled(rows: usize, cols: usize, value: f64, bounds: MeshBounds) -> GridResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(GridError::Empty);
        }
        Ok(Self {
            rows,
            cols,
            values: vec![value; rows * cols],
            bounds,
        })
    }

    /// Number of grid rows (probed points along Y).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of grid columns (probed points along X).
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of probed points.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the grid holds no points. Never true for a constructed
    /// grid; provided for API completeness.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The physical bed rectangle this grid maps onto.
    pub fn bounds(&self) -> &MeshBounds {
        &self.bounds
    }

    fn check(&self, row: usize, col: usize) -> GridResult<usize> {
        if row >= self.rows || col >= self.cols {
            return Err(GridError::IndexOutOfRange {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(row * self.cols + col)
    }

    fn check_selection(&self, selection: &CoordSet) -> GridResult<()> {
        for &(row, col) in selection {
            self.check(row, col)?;
        }
        Ok(())
    }

    /// Read the offset at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> GridResult<f64> {
        Ok(self.values[self.check(row, col)?])
    }

    /// Set the offset at `(row, col)`, returning the affected coordinate.
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> GridResult<CoordSet> {
        let idx = self.check(row, col)?;
        self.values[idx] = value;
        Ok(crate::selection::single(row, col))
    }

    /// Physical bed position `(x, y)` in millimeters of a grid point.
    pub fn physical_position(&self, row: usize, col: usize) -> GridResult<(f64, f64)> {
        self.check(row, col)?;
        let fx = if self.cols > 1 {
            col as f64 / (self.cols - 1) as f64
        } else {
            0.0
        };
        let fy = if self.rows > 1 {
            row as f64 / (self.rows - 1) as f64
        } else {
            0.0
        };
        let (min, max) = (self.bounds.min, self.bounds.max);
        Ok((min.0 + fx * (max.0 - min.0), min.1 + fy * (max.1 - min.1)))
    }

    /// Arithmetic mean over all points.
    pub fn mean(&self) -> f64 {
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    /// Set every point to the mean of the current values.
    ///
    /// Deterministic given the current state, and idempotent: flattening a
    /// flat grid changes nothing.
    pub fn flatten_all(&mut self) -> CoordSet {
        let mean = self.mean();
        self.values.fill(mean);
        tracing::debug!(mean, "flattened mesh");
        self.all_coords()
    }

    /// Add `delta` to every point.
    pub fn offset_all(&mut self, delta: f64) -> CoordSet {
        for v in &mut self.values {
            *v += delta;
        }
        tracing::debug!(delta, "offset applied to all points");
        self.all_coords()
    }

    /// Assign the mean over exactly the selected points to each of them.
    ///
    /// An empty selection is a no-op, reported by the empty affected set
    /// rather than an error. Points outside the selection are untouched.
    pub fn average_region(&mut self, selection: &CoordSet) -> GridResult<CoordSet> {
        self.check_selection(selection)?;
        if selection.is_empty() {
            return Ok(CoordSet::new());
        }
        let sum: f64 = selection
            .iter()
            .map(|&(r, c)| self.values[r * self.cols + c])
            .sum();
        let mean = sum / selection.len() as f64;
        for &(r, c) in selection {
            self.values[r * self.cols + c] = mean;
        }
        Ok(selection.clone())
    }

    /// Replace each selected point with the mean of itself and its
    /// in-bounds 3x3 neighbors.
    ///
    /// Neighbor values are read from a snapshot taken before any write, so
    /// the result is independent of iteration order. Edge and corner cells
    /// use only the neighbors that exist; there is no wraparound and no
    /// synthetic padding.
    pub fn smooth_region(&mut self, selection: &CoordSet) -> GridResult<CoordSet> {
        self.check_selection(selection)?;
        if selection.is_empty() {
            return Ok(CoordSet::new());
        }
        let snapshot = self.values.clone();
        for &(row, col) in selection {
            let mut sum = 0.0;
            let mut count = 0u32;
            for dr in -1i64..=1 {
                for dc in -1i64..=1 {
                    let nr = row as i64 + dr;
                    let nc = col as i64 + dc;
                    if nr >= 0 && nr < self.rows as i64 && nc >= 0 && nc < self.cols as i64 {
                        sum += snapshot[nr as usize * self.cols + nc as usize];
                        count += 1;
                    }
                }
            }
            self.values[row * self.cols + col] = sum / count as f64;
        }
        Ok(selection.clone())
    }

    /// Coordinates whose values differ from `other` beyond [`DIFF_EPSILON`].
    ///
    /// Used to highlight unsaved changes against the originally loaded grid.
    pub fn diff_from(&self, other: &MeshGrid) -> GridResult<CoordSet> {
        if self.rows != other.rows || self.cols != other.cols {
            return Err(GridError::ShapeMismatch {
                rows_a: self.rows,
                cols_a: self.cols,
                rows_b: other.rows,
                cols_b: other.cols,
            });
        }
        let mut diff = BTreeSet::new();
        for row in 0..self.rows {
            for col in 0..self.cols {
                let idx = row * self.cols + col;
                if (self.values[idx] - other.values[idx]).abs() > DIFF_EPSILON {
                    diff.insert((row, col));
                }
            }
        }
        Ok(diff)
    }

    /// Borrow one row of values.
    pub fn row_slice(&self, row: usize) -> GridResult<&[f64]> {
        self.check(row, 0)?;
        let start = row * self.cols;
        Ok(&self.values[start..start + self.cols])
    }

    /// Snapshot the grid as row vectors, for rendering or serialization.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.values.chunks(self.cols).map(|c| c.to_vec()).collect()
    }

    fn all_coords(&self) -> CoordSet {
        let mut set = BTreeSet::new();
        for row in 0..self.rows {
            for col in 0..self.cols {
                set.insert((row, col));
            }
        }
        set
    }
}
