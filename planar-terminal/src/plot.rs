//! Data shown by the `plot` command: the sampled triangle surface before and
//! after projection, plus the containment query lifted back into 3D.

use planar_core::surface::{project_surface, sample_surface};
use planar_core::{GeometryError, PlanarProjector, Point2D, Point3D, Scene};

#[derive(Debug, Clone)]
pub struct PlotData {
    pub original: Vec<Point3D>,
    pub projected: Vec<Point3D>,
    /// Query point on the plane, if it can be placed there
    pub query: Option<Point3D>,
    pub query_inside: bool,
}

impl PlotData {
    pub fn from_scene(scene: &Scene, samples: usize) -> Result<Self, GeometryError> {
        let projector = scene.projector()?;
        let triangle = scene.triangle();
        let original = sample_surface(&triangle, samples)?;
        let projected = project_surface(&original, projector.normal());
        let query_point = scene.query_point();

        Ok(Self {
            query: lift_query(&projector, &query_point),
            query_inside: projector.contains(&query_point, &triangle)?,
            original,
            projected,
        })
    }
}

/// Places a plane-local (x, y) query on the plane by solving the plane
/// equation for z. Planes parallel to the z axis have no such point.
pub fn lift_query(projector: &PlanarProjector, point: &Point2D) -> Option<Point3D> {
    let n = projector.normal().as_vector();
    if n.z.abs() < 1e-12 {
        return None;
    }
    let z = -(n.x * point.x + n.y * point.y) / n.z;
    Some(Point3D::new(point.x, point.y, z))
}
