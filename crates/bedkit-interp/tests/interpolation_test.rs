use bedkit_core::{MeshBounds, MeshGrid, MeshParams};
use bedkit_interp::{expand, InterpError};

fn params(algorithm: &str, pps: (u32, u32)) -> MeshParams {
    MeshParams {
        mesh_min: (16.0, 10.0),
        mesh_max: (786.0, 767.0),
        probe_count: (10, 10),
        algorithm: algorithm.to_string(),
        mesh_pps: pps,
        bicubic_tension: 0.2,
        fade_start: 1.0,
        fade_end: 10.0,
    }
}

fn bounds() -> MeshBounds {
    MeshBounds::new((16.0, 10.0), (786.0, 767.0)).unwrap()
}

/// A mildly wavy 10x10 probed grid.
fn probed10() -> MeshGrid {
    let rows = (0..10)
        .map(|r| {
            (0..10)
                .map(|c| 0.05 * ((r as f64) * 0.7).sin() - 0.03 * ((c as f64) * 1.1).cos())
                .collect()
        })
        .collect();
    MeshGrid::from_rows(rows, bounds()).unwrap()
}

#[test]
fn test_reference_shape_is_37x37() {
    for algorithm in ["lagrange", "bicubic"] {
        let out = expand(&probed10(), &params(algorithm, (4, 4))).unwrap();
        assert_eq!(out.rows(), 37, "{algorithm}");
        assert_eq!(out.cols(), 37, "{algorithm}");
    }
}

#[test]
fn test_asymmetric_pps_shape() {
    let out = expand(&probed10(), &params("bicubic", (2, 5))).unwrap();
    assert_eq!(out.cols(), 9 * 2 + 1);
    assert_eq!(out.rows(), 9 * 5 + 1);
}

#[test]
fn test_pps_zero_reproduces_probed_grid() {
    let probed = probed10();
    let out = expand(&probed, &params("bicubic", (0, 0))).unwrap();
    assert_eq!(out.rows(), 10);
    assert_eq!(out.cols(), 10);
    assert!(out.diff_from(&probed).unwrap().is_empty());
}

#[test]
fn test_probed_points_reproduced_exactly() {
    let probed = probed10();
    for algorithm in ["lagrange", "bicubic"] {
        let out = expand(&probed, &params(algorithm, (4, 4))).unwrap();
        for row in 0..10 {
            for col in 0..10 {
                let probed_v = probed.get(row, col).unwrap();
                let out_v = out.get(row * 4, col * 4).unwrap();
                assert!(
                    (probed_v - out_v).abs() < 1e-6,
                    "{algorithm} at ({row},{col}): {probed_v} vs {out_v}"
                );
            }
        }
    }
}

#[test]
fn test_deterministic() {
    let probed = probed10();
    let p = params("bicubic", (4, 4));
    assert_eq!(expand(&probed, &p).unwrap(), expand(&probed, &p).unwrap());
}

#[test]
fn test_flat_mesh_expands_flat() {
    let flat = MeshGrid::filled(5, 5, -0.125, bounds()).unwrap();
    for algorithm in ["lagrange", "bicubic"] {
        let out = expand(&flat, &params(algorithm, (3, 3))).unwrap();
        for row in 0..out.rows() {
            for col in 0..out.cols() {
                assert!((out.get(row, col).unwrap() + 0.125).abs() < 1e-9, "{algorithm}");
            }
        }
    }
}

#[test]
fn test_lagrange_matches_polynomial_data() {
    // Samples from z = x^2 / 10 along each row; a Lagrange polynomial
    // through them must reproduce the parabola at sub-positions.
    let rows = (0..4)
        .map(|_| (0..4).map(|c| (c * c) as f64 / 10.0).collect())
        .collect();
    let grid = MeshGrid::from_rows(rows, bounds()).unwrap();
    let mut p = params("lagrange", (2, 0));
    p.probe_count = (4, 4);
    let out = expand(&grid, &p).unwrap();
    // With two steps per segment, output column 3 sits at index 1.5.
    let expected = 1.5f64 * 1.5 / 10.0;
    assert!((out.get(0, 3).unwrap() - expected).abs() < 1e-9);
}

#[test]
fn test_bicubic_interior_values_bounded_on_monotone_ramp() {
    // A cardinal spline through a monotone ramp stays within each
    // segment's endpoints away from the borders.
    let rows = (0..6)
        .map(|r| (0..6).map(|c| (r + c) as f64 * 0.01).collect())
        .collect();
    let grid = MeshGrid::from_rows(rows, bounds()).unwrap();
    let out = expand(&grid, &params("bicubic", (4, 4))).unwrap();
    let min = grid.get(0, 0).unwrap();
    let max = grid.get(5, 5).unwrap();
    for row in 0..out.rows() {
        for col in 0..out.cols() {
            let v = out.get(row, col).unwrap();
            assert!(v >= min - 1e-9 && v <= max + 1e-9);
        }
    }
}

#[test]
fn test_unsupported_algorithm() {
    let err = expand(&probed10(), &params("quadratic", (4, 4))).unwrap_err();
    assert!(matches!(err, InterpError::UnsupportedAlgorithm(name) if name == "quadratic"));
}

#[test]
fn test_degenerate_grid() {
    let line = MeshGrid::from_rows(vec![vec![0.0, 0.1, 0.2]], bounds()).unwrap();
    let err = expand(&line, &params("bicubic", (4, 4))).unwrap_err();
    assert!(matches!(err, InterpError::DegenerateGrid { rows: 1, cols: 3 }));
}

#[test]
fn test_output_keeps_input_bounds() {
    let probed = probed10();
    let out = expand(&probed, &params("bicubic", (4, 4))).unwrap();
    assert_eq!(out.bounds(), probed.bounds());
}
