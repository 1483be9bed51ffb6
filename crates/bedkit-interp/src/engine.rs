//! Reproduction of the firmware's mesh expansion for preview purposes.
//!
//! The firmware does not apply the probed grid directly: it expands it to a
//! finer compensation grid, splitting every segment of every axis into
//! `mesh_pps` steps. This module reproduces that expansion as a tensor
//! product: every row is expanded along X first, then every column of the
//! widened intermediate is expanded along Y.
//!
//! Two algorithms are supported, matching the firmware:
//!
//! - `lagrange`: one Lagrange polynomial per axis line through all of its
//!   probed samples.
//! - `bicubic`: piecewise cardinal splines. Each segment is a Hermite cubic
//!   whose tangents are `tension * (p2 - p0)`; border segments clamp by
//!   duplicating the first/last sample instead of extrapolating.
//!
//! The output is a freshly allocated grid; the engine holds no state and
//! never feeds back into the editable mesh.

use bedkit_core::{MeshGrid, MeshParams};
use tracing::debug;

use crate::error::{InterpError, InterpResult};

/// Sub-positions land exactly on probed indices every `pps` steps;
/// values there must be reproduced exactly.
const INDEX_SNAP_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Algorithm {
    Lagrange,
    Bicubic,
}

impl Algorithm {
    fn resolve(name: &str) -> InterpResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "lagrange" => Ok(Self::Lagrange),
            "bicubic" => Ok(Self::Bicubic),
            _ => Err(InterpError::UnsupportedAlgorithm(name.to_string())),
        }
    }
}

/// Expand a probed mesh to the compensation grid the firmware would use.
///
/// Output shape is `(rows - 1) * pps_y + 1` by `(cols - 1) * pps_x + 1`,
/// a `pps` of 0 leaving that axis at its probed size; with the reference
/// 10x10 grid and `mesh_pps = 4, 4` that is 37x37. Identical inputs
/// always produce identical output.
pub fn expand(grid: &MeshGrid, params: &MeshParams) -> InterpResult<MeshGrid> {
    let algorithm = Algorithm::resolve(&params.algorithm)?;
    if grid.rows() < 2 || grid.cols() < 2 {
        return Err(InterpError::DegenerateGrid {
            rows: grid.rows(),
            cols: grid.cols(),
        });
    }

    let (pps_x, pps_y) = (params.mesh_pps.0, params.mesh_pps.1);
    let tension = params.bicubic_tension;

    // Pass 1: expand every probed row along X.
    let mut wide: Vec<Vec<f64>> = Vec::with_capacity(grid.rows());
    for samples in grid.to_rows() {
        wide.push(expand_axis(&samples, pps_x, algorithm, tension));
    }

    // Pass 2: expand every column of the widened grid along Y.
    let cols_out = wide[0].len();
    let rows_out = expanded_len(grid.rows(), pps_y);
    let mut out = vec![Vec::with_capacity(cols_out); rows_out];
    let mut column = Vec::with_capacity(grid.rows());
    for col in 0..cols_out {
        column.clear();
        column.extend(wide.iter().map(|row| row[col]));
        let expanded = expand_axis(&column, pps_y, algorithm, tension);
        for (row, value) in expanded.into_iter().enumerate() {
            out[row].push(value);
        }
    }

    debug!(
        rows_in = grid.rows(),
        cols_in = grid.cols(),
        rows_out,
        cols_out,
        algorithm = ?algorithm,
        "expanded mesh"
    );

    let expanded = MeshGrid::from_rows(out, *grid.bounds())
        .expect("expanded rows are rectangular by construction");
    Ok(expanded)
}

fn expanded_len(n: usize, pps: u32) -> usize {
    if pps == 0 {
        n
    } else {
        (n - 1) * pps as usize + 1
    }
}

/// Expand one line of samples to `(n - 1) * pps + 1` values at index
/// positions `k / pps`. A `pps` of 0 returns the samples unchanged.
fn expand_axis(samples: &[f64], pps: u32, algorithm: Algorithm, tension: f64) -> Vec<f64> {
    if pps == 0 {
        return samples.to_vec();
    }
    let step = pps as f64;
    let count = expanded_len(samples.len(), pps);
    (0..count)
        .map(|k| {
            let t = k as f64 / step;
            match algorithm {
                Algorithm::Lagrange => lagrange_at(samples, t),
                Algorithm::Bicubic => cardinal_at(samples, t, tension),
            }
        })
        .collect()
}

/// Evaluate the Lagrange polynomial through `samples` (at integer index
/// positions) at position `t`.
fn lagrange_at(samples: &[f64], t: f64) -> f64 {
    // Probed positions are returned verbatim; the polynomial would agree
    // analytically but accumulates rounding.
    let nearest = t.round();
    if (t - nearest).abs() < INDEX_SNAP_EPSILON {
        let idx = nearest as usize;
        if idx < samples.len() {
            return samples[idx];
        }
    }
    let mut acc = 0.0;
    for (j, &value) in samples.iter().enumerate() {
        let mut basis = 1.0;
        for m in 0..samples.len() {
            if m != j {
                basis *= (t - m as f64) / (j as f64 - m as f64);
            }
        }
        acc += value * basis;
    }
    acc
}

/// Evaluate the cardinal spline through `samples` at position `t`.
///
/// Hermite form with tangents `m1 = tension * (p2 - p0)` and
/// `m2 = tension * (p3 - p1)`; out-of-range control points are clamped to
/// the border sample.
fn cardinal_at(samples: &[f64], t: f64, tension: f64) -> f64 {
    let n = samples.len();
    let i = t.floor() as usize;
    if i + 1 >= n {
        return samples[n - 1];
    }
    let u = t - i as f64;

    let p0 = samples[i.saturating_sub(1)];
    let p1 = samples[i];
    let p2 = samples[i + 1];
    let p3 = samples[(i + 2).min(n - 1)];

    let m1 = tension * (p2 - p0);
    let m2 = tension * (p3 - p1);

    let u2 = u * u;
    let u3 = u2 * u;
    let h00 = 2.0 * u3 - 3.0 * u2 + 1.0;
    let h10 = u3 - 2.0 * u2 + u;
    let h01 = -2.0 * u3 + 3.0 * u2;
    let h11 = u3 - u2;

    h00 * p1 + h10 * m1 + h01 * p2 + h11 * m2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_resolution() {
        assert_eq!(Algorithm::resolve("bicubic").unwrap(), Algorithm::Bicubic);
        assert_eq!(Algorithm::resolve("Lagrange").unwrap(), Algorithm::Lagrange);
        assert!(matches!(
            Algorithm::resolve("spline"),
            Err(InterpError::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn test_lagrange_linear_data_stays_linear() {
        let samples = [0.0, 1.0, 2.0, 3.0];
        assert!((lagrange_at(&samples, 0.5) - 0.5).abs() < 1e-12);
        assert!((lagrange_at(&samples, 2.25) - 2.25).abs() < 1e-12);
    }

    #[test]
    fn test_cardinal_hits_segment_endpoints() {
        let samples = [0.1, -0.2, 0.3, 0.0];
        for (i, &s) in samples.iter().enumerate() {
            assert_eq!(cardinal_at(&samples, i as f64, 0.2), s);
        }
    }

    #[test]
    fn test_expanded_len_per_axis() {
        assert_eq!(expanded_len(10, 4), 37);
        assert_eq!(expanded_len(3, 2), 5);
        assert_eq!(expanded_len(2, 1), 2);
        assert_eq!(expanded_len(10, 0), 10);
    }

    #[test]
    fn test_expand_axis_pps_zero_is_identity() {
        let samples = [0.1, -0.2, 0.3];
        assert_eq!(
            expand_axis(&samples, 0, Algorithm::Bicubic, 0.2),
            samples.to_vec()
        );
        assert_eq!(
            expand_axis(&samples, 0, Algorithm::Lagrange, 0.2),
            samples.to_vec()
        );
    }
}
