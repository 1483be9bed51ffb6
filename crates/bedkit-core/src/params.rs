//! Mesh parameters read from the `[bed_mesh]` config block.

use serde::{Deserialize, Serialize};

/// Interpolation and fade parameters persisted alongside the mesh points.
///
/// Immutable for the lifetime of an edit session; only a re-parse produces
/// new values. `algorithm` is kept as the raw config string so a file with
/// an unrecognized algorithm still loads and can be edited; the
/// interpolation engine rejects it when a preview is requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshParams {
    /// Lower-left corner of the probed area `(x, y)` in bed millimeters.
    pub mesh_min: (f64, f64),
    /// Upper-right corner of the probed area `(x, y)` in bed millimeters.
    pub mesh_max: (f64, f64),
    /// Probed points per axis `(x, y)`; must match the grid shape.
    pub probe_count: (usize, usize),
    /// Interpolation algorithm name as written in the config
    /// (`lagrange` or `bicubic` for the supported firmware algorithms).
    pub algorithm: String,
    /// Interpolated points inserted per segment, per axis `(x, y)`.
    pub mesh_pps: (u32, u32),
    /// Tangent scale for the bicubic (cardinal spline) algorithm.
    pub bicubic_tension: f64,
    /// Height at which compensation starts to fade out. Opaque scalar,
    /// preserved for the firmware but not computed on.
    pub fade_start: f64,
    /// Height at which compensation is fully faded out. Opaque scalar.
    pub fade_end: f64,
}

impl MeshParams {
    /// Expanded shape `(rows_out, cols_out)` the firmware interpolates a
    /// `rows x cols` mesh to: `(n - 1) * pps + 1` points per axis, a
    /// `pps` of 0 leaving that axis at its probed size.
    pub fn expanded_shape(&self, rows: usize, cols: usize) -> (usize, usize) {
        (
            Self::axis_len(rows, self.mesh_pps.1),
            Self::axis_len(cols, self.mesh_pps.0),
        )
    }

    fn axis_len(n: usize, pps: u32) -> usize {
        if pps == 0 {
            n
        } else {
            n.saturating_sub(1) * pps as usize + 1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expanded_shape_reference_config() {
        let params = MeshParams {
            mesh_min: (16.0, 10.0),
            mesh_max: (786.0, 767.0),
            probe_count: (10, 10),
            algorithm: "bicubic".to_string(),
            mesh_pps: (4, 4),
            bicubic_tension: 0.2,
            fade_start: 1.0,
            fade_end: 10.0,
        };
        assert_eq!(params.expanded_shape(10, 10), (37, 37));
    }

    #[test]
    fn test_expanded_shape_pps_zero_is_probed_size() {
        let params = MeshParams {
            mesh_min: (0.0, 0.0),
            mesh_max: (200.0, 200.0),
            probe_count: (5, 5),
            algorithm: "lagrange".to_string(),
            mesh_pps: (0, 3),
            bicubic_tension: 0.2,
            fade_start: 1.0,
            fade_end: 10.0,
        };
        assert_eq!(params.expanded_shape(5, 5), (13, 5));
    }
}
