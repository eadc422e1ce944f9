/// Orthogonal projection onto planes through the origin
use nalgebra::Vector3;

use crate::barycentric::{compute_barycentric, BarycentricCoordinates};
use crate::error::{GeometryError, Result};
use crate::geometry::{PlaneNormal, Point2D, Point3D, Triangle2D, Triangle3D};

/// Projects `point` onto the plane through the origin orthogonal to `normal`.
///
/// `normal` is unit length, so this is `p - (p·n) n`.
pub fn project_point(point: &Point3D, normal: &PlaneNormal) -> Point3D {
    let n = normal.as_vector();
    point - n * point.dot(n)
}

/// Projection onto the plane orthogonal to an arbitrary, unnormalized `normal`
pub fn project_onto_plane(point: &Point3D, normal: &Vector3<f64>) -> Result<Point3D> {
    let norm_sq = normal.norm_squared();
    if norm_sq == 0.0 || !norm_sq.is_finite() {
        return Err(GeometryError::invalid(
            "plane normal must be a finite, non-zero vector",
        ));
    }
    Ok(point - normal * (point.dot(normal) / norm_sq))
}

/// Orthonormal frame (normal, e1, e2) of a plane through the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneBasis {
    pub normal: Vector3<f64>,
    pub e1: Vector3<f64>,
    pub e2: Vector3<f64>,
}

impl PlaneBasis {
    /// Gram–Schmidt from the standard axis least aligned with the normal,
    /// so the result is deterministic for a given normal.
    pub fn from_normal(normal: &PlaneNormal) -> Self {
        let n = *normal.as_vector();
        let abs = n.abs();
        let helper = if abs.x <= abs.y && abs.x <= abs.z {
            Vector3::x()
        } else if abs.y <= abs.z {
            Vector3::y()
        } else {
            Vector3::z()
        };

        // The helper is never parallel to a unit normal, so this is non-zero
        let e1 = (helper - n * helper.dot(&n)).normalize();
        let e2 = n.cross(&e1);
        Self { normal: n, e1, e2 }
    }

    /// Coordinates of `point` along (e1, e2)
    pub fn local_coords(&self, point: &Point3D) -> Point2D {
        Point2D::new(point.dot(&self.e1), point.dot(&self.e2))
    }

    /// Maps plane coordinates back to a 3D point on the plane
    pub fn unproject(&self, coords: &Point2D) -> Point3D {
        self.e1 * coords.x + self.e2 * coords.y
    }
}

/// Projects points and triangles onto a fixed plane and answers
/// containment queries in plane-local coordinates.
#[derive(Debug, Clone, Copy)]
pub struct PlanarProjector {
    normal: PlaneNormal,
    basis: PlaneBasis,
}

impl PlanarProjector {
    pub fn new(normal: PlaneNormal) -> Self {
        Self {
            normal,
            basis: PlaneBasis::from_normal(&normal),
        }
    }

    pub fn from_vector(normal: Vector3<f64>) -> Result<Self> {
        Ok(Self::new(PlaneNormal::new(normal)?))
    }

    pub fn normal(&self) -> &PlaneNormal {
        &self.normal
    }

    pub fn basis(&self) -> &PlaneBasis {
        &self.basis
    }

    /// The plane frame as [normal, e1, e2]
    pub fn axes(&self) -> [Vector3<f64>; 3] {
        [self.basis.normal, self.basis.e1, self.basis.e2]
    }

    pub fn project(&self, point: &Point3D) -> Point3D {
        project_point(point, &self.normal)
    }

    pub fn project_triangle(&self, triangle: &Triangle3D) -> Triangle3D {
        let [a, b, c] = &triangle.vertices;
        Triangle3D::new(self.project(a), self.project(b), self.project(c))
    }

    /// Signed distance of `point` from the plane along the normal
    pub fn depth(&self, point: &Point3D) -> f64 {
        point.dot(self.normal.as_vector())
    }

    /// Plane-local coordinates of a point: the first two coordinates of
    /// its projection.
    pub fn flatten(&self, point: &Point3D) -> Point2D {
        self.project(point).xy()
    }

    pub fn flatten_triangle(&self, triangle: &Triangle3D) -> Triangle2D {
        let [a, b, c] = &triangle.vertices;
        Triangle2D::new(self.flatten(a), self.flatten(b), self.flatten(c))
    }

    /// Coordinates of the projection along the plane basis
    pub fn local_coords(&self, point: &Point3D) -> Point2D {
        self.basis.local_coords(point)
    }

    /// Barycentric coordinates of a plane-local point relative to the
    /// flattened projection of `triangle`
    pub fn barycentric(&self, point: &Point2D, triangle: &Triangle3D) -> Result<BarycentricCoordinates> {
        let [a, b, c] = self.flatten_triangle(triangle).vertices;
        compute_barycentric(point, &a, &b, &c)
    }

    pub fn contains(&self, point: &Point2D, triangle: &Triangle3D) -> Result<bool> {
        Ok(self.barycentric(point, triangle)?.is_inside())
    }
}
