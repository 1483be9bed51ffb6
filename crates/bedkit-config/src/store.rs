//! Parsing and serialization of the `[bed_mesh]` block in a printer.cfg.
//!
//! Klipper persists the probed mesh either as a plain config section or,
//! more commonly, inside the SAVE_CONFIG tail where every line carries a
//! `#*#` marker:
//!
//! ```text
//! #*# [bed_mesh default]
//! #*# points =
//! #*# 	  0.013750, -0.021250, ...
//! #*# mesh_min = 16.0, 10.0
//! #*# mesh_max = 786.0, 767.0
//! #*# probe_count = 10, 10
//! ...
//! ```
//!
//! Both shapes are accepted. Only the rows under `points =` are ever
//! rewritten; every other byte of the file, including comments, ordering,
//! and the scalar parameter lines themselves, is preserved exactly so that
//! saving an unchanged mesh reproduces the input file byte for byte.

use bedkit_core::{MeshBounds, MeshGrid, MeshParams};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};

/// Line marker used by Klipper's SAVE_CONFIG block.
const SAVE_CONFIG_MARKER: &str = "#*#";

/// Decimal places used when writing mesh values, matching the firmware's
/// own `%.6f` output.
const POINT_PRECISION: usize = 6;

/// Byte-preserving description of where the points block sits in the file.
///
/// `before` and `after` carry every byte of the config outside the points
/// rows; `serialize` splices freshly formatted rows between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshLayout {
    before: String,
    after: String,
    /// Leading decoration of each row (marker plus indentation).
    row_prefix: String,
    /// Line ending of the row lines (`\n` or `\r\n`).
    row_ending: String,
    /// Whether the final row carried a line ending in the source.
    last_row_terminated: bool,
}

/// A parsed printer configuration: the mesh, its parameters, and the
/// untouched remainder of the file.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshDocument {
    grid: MeshGrid,
    params: MeshParams,
    layout: MeshLayout,
}

impl MeshDocument {
    /// Parse the `[bed_mesh default]` profile out of a config text.
    pub fn parse(text: &str) -> ConfigResult<Self> {
        Self::parse_profile(text, "default")
    }

    /// Parse a specific `[bed_mesh <profile>]` section.
    pub fn parse_profile(text: &str, profile: &str) -> ConfigResult<Self> {
        Parser::new(text, profile).run()
    }

    /// The probed mesh grid.
    pub fn grid(&self) -> &MeshGrid {
        &self.grid
    }

    /// Mutable access to the mesh grid. The shape is fixed; edits change
    /// values only.
    pub fn grid_mut(&mut self) -> &mut MeshGrid {
        &mut self.grid
    }

    /// Replace the grid wholesale (used by session reset). The new grid
    /// must have the same shape as the parsed one.
    pub fn set_grid(&mut self, grid: MeshGrid) -> ConfigResult<()> {
        if grid.rows() != self.grid.rows() || grid.cols() != self.grid.cols() {
            return Err(bedkit_core::GridError::ShapeMismatch {
                rows_a: grid.rows(),
                cols_a: grid.cols(),
                rows_b: self.grid.rows(),
                cols_b: self.grid.cols(),
            }
            .into());
        }
        self.grid = grid;
        Ok(())
    }

    /// The scalar parameters parsed from the section.
    pub fn params(&self) -> &MeshParams {
        &self.params
    }

    /// Re-emit the full config text with the current grid values spliced
    /// into the original points block location.
    pub fn serialize(&self) -> String {
        let rows = self.grid.to_rows();
        let mut out = String::with_capacity(
            self.layout.before.len() + self.layout.after.len() + rows.len() * 16 * rows[0].len(),
        );
        out.push_str(&self.layout.before);
        for (i, row) in rows.iter().enumerate() {
            out.push_str(&self.layout.row_prefix);
            let formatted: Vec<String> = row
                .iter()
                .map(|v| format!("{:.*}", POINT_PRECISION, v))
                .collect();
            out.push_str(&formatted.join(", "));
            if i + 1 < rows.len() || self.layout.last_row_terminated {
                out.push_str(&self.layout.row_ending);
            }
        }
        out.push_str(&self.layout.after);
        out
    }
}

/// Strip the SAVE_CONFIG marker (and one following space) from a line.
fn strip_marker(line: &str) -> Option<&str> {
    line.strip_prefix(SAVE_CONFIG_MARKER)
        .map(|rest| rest.strip_prefix(' ').unwrap_or(rest))
}

/// Split a `key = value` (or `key: value`) line.
fn split_key_value(content: &str) -> Option<(&str, &str)> {
    let sep = content.find(['=', ':'])?;
    let key = content[..sep].trim();
    if key.is_empty() || key.contains(char::is_whitespace) {
        return None;
    }
    Some((key, content[sep + 1..].trim()))
}

struct Parser<'a> {
    text: &'a str,
    profile: &'a str,
    // Scalar keys collected from the section, raw.
    mesh_min: Option<String>,
    mesh_max: Option<String>,
    probe_count: Option<String>,
    algorithm: Option<String>,
    mesh_pps: Option<String>,
    bicubic_tension: Option<String>,
    fade_start: Option<String>,
    fade_end: Option<String>,
    rows: Vec<Vec<f64>>,
    points_start: usize,
    points_end: usize,
    row_prefix: String,
    row_ending: String,
    last_row_terminated: bool,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str, profile: &'a str) -> Self {
        Self {
            text,
            profile,
            mesh_min: None,
            mesh_max: None,
            probe_count: None,
            algorithm: None,
            mesh_pps: None,
            bicubic_tension: None,
            fade_start: None,
            fade_end: None,
            rows: Vec::new(),
            points_start: 0,
            points_end: 0,
            row_prefix: String::new(),
            row_ending: "\n".to_string(),
            last_row_terminated: true,
        }
    }

    fn run(mut self) -> ConfigResult<MeshDocument> {
        self.scan()?;
        if self.rows.is_empty() {
            return Err(ConfigError::EmptyPoints);
        }

        let mesh_min = parse_f64_pair("mesh_min", &require(self.mesh_min.take(), "mesh_min")?)?;
        let mesh_max = parse_f64_pair("mesh_max", &require(self.mesh_max.take(), "mesh_max")?)?;
        let probe_count =
            parse_count_pair("probe_count", &require(self.probe_count.take(), "probe_count")?)?;
        let algorithm = require(self.algorithm.take(), "algorithm")?;
        let mesh_pps = parse_count_pair("mesh_pps", &require(self.mesh_pps.take(), "mesh_pps")?)?;
        let bicubic_tension = parse_f64(
            "bicubic_tension",
            &require(self.bicubic_tension.take(), "bicubic_tension")?,
        )?;
        let fade_start = parse_f64("fade_start", &require(self.fade_start.take(), "fade_start")?)?;
        let fade_end = parse_f64("fade_end", &require(self.fade_end.take(), "fade_end")?)?;

        let (rows_n, cols_n) = (self.rows.len(), self.rows[0].len());
        if probe_count.0 != cols_n || probe_count.1 != rows_n {
            return Err(ConfigError::ProbeCountMismatch {
                expected_x: probe_count.0,
                expected_y: probe_count.1,
                cols: cols_n,
                rows: rows_n,
            });
        }

        let bounds = MeshBounds::new(mesh_min, mesh_max)?;
        let grid = MeshGrid::from_rows(std::mem::take(&mut self.rows), bounds)?;
        let params = MeshParams {
            mesh_min,
            mesh_max,
            probe_count,
            algorithm,
            mesh_pps: (mesh_pps.0 as u32, mesh_pps.1 as u32),
            bicubic_tension,
            fade_start,
            fade_end,
        };

        debug!(
            rows = grid.rows(),
            cols = grid.cols(),
            algorithm = %params.algorithm,
            "parsed bed_mesh section"
        );

        let layout = MeshLayout {
            before: self.text[..self.points_start].to_string(),
            after: self.text[self.points_end..].to_string(),
            row_prefix: std::mem::take(&mut self.row_prefix),
            row_ending: std::mem::take(&mut self.row_ending),
            last_row_terminated: self.last_row_terminated,
        };

        Ok(MeshDocument {
            grid,
            params,
            layout,
        })
    }

    fn record_scalar(&mut self, key: &str, value: &str) {
        let slot = match key {
            "mesh_min" => &mut self.mesh_min,
            "mesh_max" => &mut self.mesh_max,
            "probe_count" => &mut self.probe_count,
            "algorithm" | "algo" => &mut self.algorithm,
            "mesh_pps" => &mut self.mesh_pps,
            "bicubic_tension" | "tension" => &mut self.bicubic_tension,
            "fade_start" => &mut self.fade_start,
            "fade_end" => &mut self.fade_end,
            // Unknown keys (version, ...) stay untouched in the residual.
            _ => return,
        };
        *slot = Some(value.to_string());
    }

    fn scan(&mut self) -> ConfigResult<()> {
        let header = format!("[bed_mesh {}]", self.profile);
        let mut offset = 0usize;
        let mut in_section = false;
        let mut saw_section = false;
        let mut marker_section = false;
        let mut collecting_points = false;

        for raw in self.text.split_inclusive('\n') {
            let start = offset;
            offset += raw.len();
            let body = raw.trim_end_matches(['\n', '\r']);

            if !in_section {
                let content = strip_marker(body).unwrap_or(body);
                if content.trim() == header {
                    in_section = true;
                    saw_section = true;
                    marker_section = strip_marker(body).is_some();
                }
                continue;
            }

            // Resolve the effective content of the line inside the section.
            let content = if marker_section {
                match strip_marker(body) {
                    Some(c) => c,
                    // Leaving the SAVE_CONFIG block ends the section.
                    None => break,
                }
            } else {
                body
            };

            if content.trim_start().starts_with('[') {
                break;
            }

            if collecting_points {
                let is_row = content.starts_with([' ', '\t']) && !content.trim().is_empty();
                if is_row {
                    self.push_row(start, raw, body, content)?;
                    continue;
                }
                collecting_points = false;
            }

            if let Some((key, value)) = split_key_value(content) {
                if key == "points" && value.is_empty() {
                    collecting_points = true;
                    self.points_start = offset;
                    self.points_end = offset;
                } else {
                    self.record_scalar(key, value);
                }
            }
        }

        if !saw_section {
            return Err(ConfigError::MissingSection(self.profile.to_string()));
        }
        Ok(())
    }

    fn push_row(&mut self, start: usize, raw: &str, body: &str, content: &str) -> ConfigResult<()> {
        let trimmed = content.trim_start();
        let mut values = Vec::new();
        for field in trimmed.split(',') {
            let field = field.trim();
            if field.is_empty() {
                continue;
            }
            let v: f64 = field.parse().map_err(|_| ConfigError::MalformedValue {
                key: "points".to_string(),
                value: field.to_string(),
            })?;
            values.push(v);
        }
        if let Some(first) = self.rows.first() {
            if values.len() != first.len() {
                return Err(ConfigError::RaggedRow {
                    row: self.rows.len(),
                    len: values.len(),
                    expected: first.len(),
                });
            }
        } else {
            // First row fixes the decoration reused for every emitted row.
            self.row_prefix = body[..body.len() - trimmed.len()].to_string();
            self.row_ending = if raw.ends_with("\r\n") { "\r\n" } else { "\n" }.to_string();
        }
        self.rows.push(values);
        self.points_end = start + raw.len();
        self.last_row_terminated = raw.ends_with('\n');
        Ok(())
    }
}

fn require(value: Option<String>, key: &'static str) -> ConfigResult<String> {
    value.ok_or(ConfigError::MissingKey(key))
}

fn parse_f64(key: &str, value: &str) -> ConfigResult<f64> {
    value.trim().parse().map_err(|_| ConfigError::MalformedValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_f64_pair(key: &str, value: &str) -> ConfigResult<(f64, f64)> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    if parts.len() != 2 {
        return Err(ConfigError::MalformedValue {
            key: key.to_string(),
            value: value.to_string(),
        });
    }
    Ok((parse_f64(key, parts[0])?, parse_f64(key, parts[1])?))
}

/// Parse a `x, y` count pair. A single value applies to both axes, the way
/// the firmware reads `probe_count` and `mesh_pps`.
fn parse_count_pair(key: &str, value: &str) -> ConfigResult<(usize, usize)> {
    let malformed = || ConfigError::MalformedValue {
        key: key.to_string(),
        value: value.to_string(),
    };
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [single] => {
            let n: usize = single.parse().map_err(|_| malformed())?;
            Ok((n, n))
        }
        [x, y] => Ok((
            x.parse().map_err(|_| malformed())?,
            y.parse().map_err(|_| malformed())?,
        )),
        _ => Err(malformed()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_key_value() {
        assert_eq!(split_key_value("algo = bicubic"), Some(("algo", "bicubic")));
        assert_eq!(split_key_value("mesh_min: 16, 10"), Some(("mesh_min", "16, 10")));
        assert_eq!(split_key_value("just a comment line"), None);
    }

    #[test]
    fn test_strip_marker() {
        assert_eq!(strip_marker("#*# points ="), Some("points ="));
        assert_eq!(strip_marker("#*#\t  0.1, 0.2"), Some("\t  0.1, 0.2"));
        assert_eq!(strip_marker("points ="), None);
    }

    #[test]
    fn test_parse_count_pair_single_value() {
        assert_eq!(parse_count_pair("mesh_pps", "4").unwrap(), (4, 4));
        assert_eq!(parse_count_pair("probe_count", "10, 8").unwrap(), (10, 8));
        assert!(parse_count_pair("mesh_pps", "a, b").is_err());
    }
}
