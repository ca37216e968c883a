//! Core data types produced by the splat decoder.
//!
//! These are CPU-side arrays laid out one attribute per buffer, matching
//! how a renderer uploads them.

use glam::{Vec3, Vec4};
use serde::Serialize;

/// Axis-aligned bounding box grown over decoded splat positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Bounds {
    /// Create a zero-extent box at `point`.
    pub fn from_point(point: Vec3) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Grow the box so it contains `point`.
    pub fn encapsulate(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Half of the box size along each axis.
    pub fn extents(&self) -> Vec3 {
        self.size() * 0.5
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::from_point(Vec3::ZERO)
    }
}

/// Decoded splat attributes, one parallel array per field.
///
/// All per-point arrays are indexed by vertex index. SH coefficients are
/// stored `sh_coeffs_per_point()` entries per point, each entry holding the
/// three colour channels of one coefficient.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplatAttributes {
    /// Splat centers.
    pub positions: Vec<Vec3>,
    /// DC colour (RGB) with sigmoid-activated opacity in `w`.
    pub colors: Vec<Vec4>,
    /// Higher-order SH coefficients, empty when the file has none.
    pub sh_coefficients: Vec<Vec3>,
    /// Per-axis scale, already exponentiated.
    pub scales: Vec<Vec3>,
    /// Unit rotation quaternions in file order (`rot_0..rot_3`).
    pub rotations: Vec<Vec4>,
    /// Bounds of all positions.
    pub bounds: Bounds,
    /// SH band count (0-3).
    pub sh_bands: u8,
}

impl SplatAttributes {
    /// Number of decoded splats.
    pub fn splat_count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of SH coefficients stored per splat.
    pub fn sh_coeffs_per_point(&self) -> usize {
        crate::sh::coefficient_count_for_bands(self.sh_bands)
    }

    /// SH coefficients belonging to splat `index`.
    pub fn sh_for(&self, index: usize) -> &[Vec3] {
        let k = self.sh_coeffs_per_point();
        if k == 0 {
            return &[];
        }
        &self.sh_coefficients[index * k..(index + 1) * k]
    }
}
