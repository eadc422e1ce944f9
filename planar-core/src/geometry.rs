/// Geometry primitives: points, plane normals, triangles and meshes
use nalgebra::{Vector2, Vector3};

use crate::error::{GeometryError, Result};
use crate::transform::{Axis, Transform};

/// A point (or vector from the origin) in 3D space
pub type Point3D = Vector3<f64>;

/// A point in plane-local coordinates
pub type Point2D = Vector2<f64>;

/// Unit normal of a plane passing through the origin.
///
/// The wrapped vector is normalized once at construction; a zero or
/// non-finite vector is rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneNormal(Vector3<f64>);

impl PlaneNormal {
    pub fn new(normal: Vector3<f64>) -> Result<Self> {
        if !normal.iter().all(|c| c.is_finite()) {
            return Err(GeometryError::invalid(format!(
                "plane normal must be finite, got ({}, {}, {})",
                normal.x, normal.y, normal.z
            )));
        }
        let magnitude = normal.norm();
        if magnitude == 0.0 {
            return Err(GeometryError::invalid("plane normal cannot be a zero vector"));
        }
        Ok(Self(normal / magnitude))
    }

    pub fn from_components(x: f64, y: f64, z: f64) -> Result<Self> {
        Self::new(Vector3::new(x, y, z))
    }

    pub fn as_vector(&self) -> &Vector3<f64> {
        &self.0
    }
}

/// A triangle defined by three vertices A, B, C
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle3D {
    pub vertices: [Point3D; 3],
}

impl Triangle3D {
    pub fn new(a: Point3D, b: Point3D, c: Point3D) -> Self {
        Self { vertices: [a, b, c] }
    }

    pub fn a(&self) -> &Point3D {
        &self.vertices[0]
    }

    pub fn b(&self) -> &Point3D {
        &self.vertices[1]
    }

    pub fn c(&self) -> &Point3D {
        &self.vertices[2]
    }

    pub fn centroid(&self) -> Point3D {
        (self.vertices[0] + self.vertices[1] + self.vertices[2]) / 3.0
    }

    /// Unit face normal following the A→B→C winding
    pub fn normal(&self) -> Result<Vector3<f64>> {
        let edge1 = self.vertices[1] - self.vertices[0];
        let edge2 = self.vertices[2] - self.vertices[0];
        edge1
            .cross(&edge2)
            .try_normalize(0.0)
            .ok_or(GeometryError::DegenerateTriangle)
    }

    pub fn rotate_around_x(&mut self, degrees: f64, pivot: &Point3D) {
        self.rotate(Axis::X, degrees, pivot);
    }

    pub fn rotate_around_y(&mut self, degrees: f64, pivot: &Point3D) {
        self.rotate(Axis::Y, degrees, pivot);
    }

    pub fn rotate_around_z(&mut self, degrees: f64, pivot: &Point3D) {
        self.rotate(Axis::Z, degrees, pivot);
    }

    pub fn rotate(&mut self, axis: Axis, degrees: f64, pivot: &Point3D) {
        self.apply(&Transform::rotation_about(axis, degrees, pivot));
    }

    /// Scale about the origin
    pub fn scale(&mut self, k: f64) {
        self.apply(&Transform::scale_matrix(k));
    }

    pub fn translate(&mut self, dx: f64, dy: f64, dz: f64) {
        self.apply(&Transform::translation_matrix(dx, dy, dz));
    }

    fn apply(&mut self, matrix: &nalgebra::Matrix4<f64>) {
        for vertex in &mut self.vertices {
            *vertex = Transform::apply(matrix, vertex);
        }
    }
}

/// A triangle in plane-local coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle2D {
    pub vertices: [Point2D; 3],
}

impl Triangle2D {
    pub fn new(a: Point2D, b: Point2D, c: Point2D) -> Self {
        Self { vertices: [a, b, c] }
    }

    pub fn centroid(&self) -> Point2D {
        (self.vertices[0] + self.vertices[1] + self.vertices[2]) / 3.0
    }

    /// Axis-aligned bounds as (min, max)
    pub fn bounds(&self) -> (Point2D, Point2D) {
        let [a, b, c] = self.vertices;
        (
            Point2D::new(a.x.min(b.x).min(c.x), a.y.min(b.y).min(c.y)),
            Point2D::new(a.x.max(b.x).max(c.x), a.y.max(b.y).max(c.y)),
        )
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub triangles: Vec<Triangle3D>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle3D) {
        self.triangles.push(triangle);
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn rotate(&mut self, axis: Axis, degrees: f64, pivot: &Point3D) {
        for triangle in &mut self.triangles {
            triangle.rotate(axis, degrees, pivot);
        }
    }

    pub fn scale(&mut self, k: f64) {
        for triangle in &mut self.triangles {
            triangle.scale(k);
        }
    }

    pub fn translate(&mut self, dx: f64, dy: f64, dz: f64) {
        for triangle in &mut self.triangles {
            triangle.translate(dx, dy, dz);
        }
    }

    /// Axis-aligned bounds as (min, max), or `None` for an empty mesh
    pub fn bounds(&self) -> Option<(Point3D, Point3D)> {
        let mut vertices = self.triangles.iter().flat_map(|t| t.vertices.iter());
        let first = *vertices.next()?;
        Some(vertices.fold((first, first), |(min, max), v| (min.inf(v), max.sup(v))))
    }

    /// Axis-aligned cube of edge `size` centred at the origin
    pub fn cube(size: f64) -> Self {
        let h = size / 2.0;
        let corners = [
            Point3D::new(-h, -h, h),
            Point3D::new(h, -h, h),
            Point3D::new(h, h, h),
            Point3D::new(-h, h, h),
            Point3D::new(-h, -h, -h),
            Point3D::new(h, -h, -h),
            Point3D::new(h, h, -h),
            Point3D::new(-h, h, -h),
        ];
        // Two triangles per face, counter-clockwise seen from outside
        const FACES: [[usize; 3]; 12] = [
            [0, 1, 2], [0, 2, 3], // front
            [5, 4, 7], [5, 7, 6], // back
            [3, 2, 6], [3, 6, 7], // top
            [4, 5, 1], [4, 1, 0], // bottom
            [1, 5, 6], [1, 6, 2], // right
            [4, 0, 3], [4, 3, 7], // left
        ];

        let mut mesh = Self::with_capacity(FACES.len());
        for [a, b, c] in FACES {
            mesh.add_triangle(Triangle3D::new(corners[a], corners[b], corners[c]));
        }
        mesh
    }
}
