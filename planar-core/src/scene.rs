//! Scene configuration stored as RON.
//!
//! Every field has a default, so a scene file only needs to list what it
//! changes:
//!
//! ```ron
//! (
//!     vertices: [(0.0, 0.0, 0.0), (1.0, 0.0, 1.0), (0.0, 1.0, 2.0)],
//!     normal: (0.0, 1.0, 0.5),
//! )
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::canvas::Color;
use crate::error::GeometryError;
use crate::geometry::{PlaneNormal, Point2D, Point3D, Triangle3D};
use crate::projection::PlanarProjector;
use crate::raster::{SphereSurface, Viewport};

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid scene file: {0}")]
    Parse(String),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Output canvas settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: usize,
    pub height: usize,
    /// Pixels per plane unit; `None` fits the geometry to the canvas
    pub scale: Option<f64>,
    pub offset: [f64; 2],
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 400,
            scale: None,
            offset: [0.0, 0.0],
        }
    }
}

/// A sphere drawn alongside the triangle geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphereConfig {
    pub center: [f64; 3],
    pub radius: f64,
    pub color: Color,
}

impl Default for SphereConfig {
    fn default() -> Self {
        Self {
            center: [0.0, 0.0, 0.0],
            radius: 1.0,
            color: [1.0, 0.0, 0.0],
        }
    }
}

impl SphereConfig {
    pub fn surface(&self) -> Result<SphereSurface, GeometryError> {
        SphereSurface::new(Point3D::from(self.center), self.radius, self.color)
    }
}

/// Inputs of a single projection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scene {
    /// Triangle vertices A, B, C
    pub vertices: [[f64; 3]; 3],
    /// Normal of the projection plane (need not be unit length)
    pub normal: [f64; 3],
    /// Plane-local point for the containment test
    pub query_point: [f64; 2],
    pub color: Color,
    pub canvas: CanvasConfig,
    /// Basis vectors B, C for the linear-combination solve
    pub basis: [[f64; 3]; 2],
    /// Coefficients (u, v) used to build the target P = uB + vC
    pub coefficients: [f64; 2],
    pub spheres: Vec<SphereConfig>,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            vertices: [[0.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 1.0, 2.0]],
            normal: [0.0, 0.0, 1.0],
            query_point: [0.5, 0.5],
            color: [1.0, 0.0, 0.0],
            canvas: CanvasConfig::default(),
            basis: [[2.0, 1.0, 3.0], [1.0, 2.0, 1.0]],
            coefficients: [1.5, -0.5],
            spheres: Vec::new(),
        }
    }
}

impl Scene {
    pub fn from_ron(text: &str) -> Result<Self, SceneError> {
        let scene: Self = ron::from_str(text).map_err(|e| SceneError::Parse(e.to_string()))?;
        scene.validate()?;
        Ok(scene)
    }

    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron(&text)
    }

    pub fn to_ron(&self) -> Result<String, SceneError> {
        let config = ron::ser::PrettyConfig::new().depth_limit(3);
        ron::ser::to_string_pretty(self, config).map_err(|e| SceneError::Parse(e.to_string()))
    }

    /// Rejects values that would only fail later, mid-computation
    pub fn validate(&self) -> Result<(), GeometryError> {
        self.plane_normal()?;
        if let Some(scale) = self.canvas.scale {
            Viewport::new(scale, Point2D::from(self.canvas.offset))?;
        }
        for sphere in &self.spheres {
            sphere.surface()?;
        }
        Ok(())
    }

    pub fn triangle(&self) -> Triangle3D {
        let [a, b, c] = self.vertices.map(Point3D::from);
        Triangle3D::new(a, b, c)
    }

    pub fn plane_normal(&self) -> Result<PlaneNormal, GeometryError> {
        PlaneNormal::new(Point3D::from(self.normal))
    }

    pub fn projector(&self) -> Result<PlanarProjector, GeometryError> {
        Ok(PlanarProjector::new(self.plane_normal()?))
    }

    pub fn query_point(&self) -> Point2D {
        Point2D::from(self.query_point)
    }

    pub fn basis_vectors(&self) -> (Point3D, Point3D) {
        (Point3D::from(self.basis[0]), Point3D::from(self.basis[1]))
    }
}
