/// Rigid and affine transformation matrices for positioning geometry
use nalgebra::{Matrix4, Point3, Rotation3, Vector3};

use crate::geometry::Point3D;

/// Coordinate axis used for rotations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn unit(self) -> nalgebra::Unit<Vector3<f64>> {
        match self {
            Axis::X => Vector3::x_axis(),
            Axis::Y => Vector3::y_axis(),
            Axis::Z => Vector3::z_axis(),
        }
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Right-handed rotation about `axis` by `degrees`
    pub fn rotation_matrix(axis: Axis, degrees: f64) -> Matrix4<f64> {
        Rotation3::from_axis_angle(&axis.unit(), degrees.to_radians()).to_homogeneous()
    }

    /// Rotation about an axis-parallel line through `pivot`
    pub fn rotation_about(axis: Axis, degrees: f64, pivot: &Point3D) -> Matrix4<f64> {
        Self::translation_matrix(pivot.x, pivot.y, pivot.z)
            * Self::rotation_matrix(axis, degrees)
            * Self::translation_matrix(-pivot.x, -pivot.y, -pivot.z)
    }

    pub fn translation_matrix(x: f64, y: f64, z: f64) -> Matrix4<f64> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    /// Uniform scale about the origin
    pub fn scale_matrix(k: f64) -> Matrix4<f64> {
        Matrix4::new_scaling(k)
    }

    pub fn apply(matrix: &Matrix4<f64>, point: &Point3D) -> Point3D {
        matrix.transform_point(&Point3::from(*point)).coords
    }
}
