/// Least-squares recovery of linear combination coefficients
use nalgebra::{Matrix3x2, Vector2};

use crate::error::{GeometryError, Result};
use crate::geometry::Point3D;

/// Relative threshold below which det(AᵀA) is treated as zero
pub const SINGULAR_TOLERANCE: f64 = 1e-12;

/// Coefficients (u, v) with `u·B + v·C ≈ P`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearCombination {
    pub u: f64,
    pub v: f64,
    /// ‖u·B + v·C − P‖
    pub residual: f64,
}

impl LinearCombination {
    pub fn evaluate(&self, b: &Point3D, c: &Point3D) -> Point3D {
        b * self.u + c * self.v
    }
}

/// Solves the normal equations `(AᵀA)⁻¹ AᵀP` with A = [B C].
///
/// Fails with [`GeometryError::SingularSystem`] when B and C are linearly
/// dependent.
pub fn solve_linear_combination(b: &Point3D, c: &Point3D, p: &Point3D) -> Result<LinearCombination> {
    let a = Matrix3x2::from_columns(&[*b, *c]);
    let ata = a.transpose() * a;

    let det = ata.determinant();
    if !(det.abs() > SINGULAR_TOLERANCE * ata[(0, 0)] * ata[(1, 1)]) {
        return Err(GeometryError::SingularSystem);
    }
    let inverse = ata.try_inverse().ok_or(GeometryError::SingularSystem)?;

    let uv: Vector2<f64> = inverse * (a.transpose() * p);
    let residual = (a * uv - p).norm();
    Ok(LinearCombination {
        u: uv.x,
        v: uv.y,
        residual,
    })
}
