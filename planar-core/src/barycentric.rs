/// Barycentric coordinates and the point-in-triangle test
use crate::error::{GeometryError, Result};
use crate::geometry::{Point2D, Point3D, Triangle2D};

/// Relative threshold below which the Gram determinant of the triangle's
/// edge vectors is treated as zero.
pub const DEGENERACY_TOLERANCE: f64 = 1e-12;

/// Weights (u, v, w) of a point relative to vertices (A, B, C)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarycentricCoordinates {
    pub u: f64,
    pub v: f64,
    pub w: f64,
}

impl BarycentricCoordinates {
    /// Inside or on the boundary of the triangle
    pub fn is_inside(&self) -> bool {
        self.u >= 0.0 && self.v >= 0.0 && self.w >= 0.0
    }

    pub fn sum(&self) -> f64 {
        self.u + self.v + self.w
    }

    pub fn interpolate(&self, values: [f64; 3]) -> f64 {
        self.u * values[0] + self.v * values[1] + self.w * values[2]
    }

    pub fn interpolate_point(&self, a: &Point3D, b: &Point3D, c: &Point3D) -> Point3D {
        a * self.u + b * self.v + c * self.w
    }
}

/// Barycentric coordinates of `p` with respect to the triangle (a, b, c).
///
/// Uses the two-edge dot-product form. Fails with
/// [`GeometryError::DegenerateTriangle`] when the vertices are collinear
/// (or coincident), where the determinant would divide by zero.
pub fn compute_barycentric(
    p: &Point2D,
    a: &Point2D,
    b: &Point2D,
    c: &Point2D,
) -> Result<BarycentricCoordinates> {
    let v0 = b - a;
    let v1 = c - a;
    let v2 = p - a;

    let d00 = v0.dot(&v0);
    let d01 = v0.dot(&v1);
    let d11 = v1.dot(&v1);
    let d20 = v2.dot(&v0);
    let d21 = v2.dot(&v1);

    let denom = d00 * d11 - d01 * d01;
    if !(denom.abs() > DEGENERACY_TOLERANCE * d00 * d11) {
        return Err(GeometryError::DegenerateTriangle);
    }

    let v = (d11 * d20 - d01 * d21) / denom;
    let w = (d00 * d21 - d01 * d20) / denom;
    Ok(BarycentricCoordinates { u: 1.0 - v - w, v, w })
}

/// Whether `point` lies inside `triangle`, boundary inclusive
pub fn is_point_in_triangle(point: &Point2D, triangle: &Triangle2D) -> Result<bool> {
    let [a, b, c] = &triangle.vertices;
    Ok(compute_barycentric(point, a, b, c)?.is_inside())
}
