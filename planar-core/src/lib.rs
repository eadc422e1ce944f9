/// Planar Core Library - projection of triangle surfaces onto planes
///
/// This library provides the stateless geometric core: orthogonal projection
/// onto planes through the origin, barycentric containment tests,
/// least-squares recovery of linear combinations, and a small depth-buffered
/// rasterizer for presenting the results.

pub mod barycentric;
pub mod canvas;
pub mod error;
pub mod geometry;
pub mod least_squares;
pub mod projection;
pub mod raster;
pub mod scene;
pub mod stl;
pub mod surface;
pub mod transform;

// Re-export commonly used types
pub use barycentric::{compute_barycentric, is_point_in_triangle, BarycentricCoordinates};
pub use canvas::{Canvas, Color};
pub use error::{GeometryError, Result};
pub use geometry::{Mesh, PlaneNormal, Point2D, Point3D, Triangle2D, Triangle3D};
pub use least_squares::{solve_linear_combination, LinearCombination};
pub use projection::{project_onto_plane, project_point, PlanarProjector, PlaneBasis};
pub use raster::{render, RenderStats, SphereSurface, TriangleSurface, Viewport};
pub use scene::{CanvasConfig, Scene, SceneError, SphereConfig};
pub use transform::{Axis, Transform};
