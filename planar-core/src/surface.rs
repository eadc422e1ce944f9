/// Parametric sampling of triangle surfaces
use crate::error::{GeometryError, Result};
use crate::geometry::{PlaneNormal, Point3D, Triangle3D};
use crate::projection::project_point;

/// Samples `(1-u-v)·A + u·B + v·C` on an `n × n` grid of (u, v) values in
/// [0, 1], keeping only the pairs with `u + v ≤ 1`.
pub fn sample_surface(triangle: &Triangle3D, num_points: usize) -> Result<Vec<Point3D>> {
    if num_points < 2 {
        return Err(GeometryError::invalid(format!(
            "surface sampling needs at least 2 points per axis, got {num_points}"
        )));
    }

    let [a, b, c] = &triangle.vertices;
    let step = 1.0 / (num_points - 1) as f64;
    let mut samples = Vec::with_capacity(num_points * (num_points + 1) / 2);

    for j in 0..num_points {
        let v = j as f64 * step;
        for i in 0..num_points {
            let u = i as f64 * step;
            // Slack keeps grid points that land on the u + v = 1 edge
            if u + v <= 1.0 + 1e-12 {
                samples.push(a * (1.0 - u - v) + b * u + c * v);
            }
        }
    }
    Ok(samples)
}

pub fn project_surface(samples: &[Point3D], normal: &PlaneNormal) -> Vec<Point3D> {
    samples.iter().map(|p| project_point(p, normal)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn prototype_triangle() -> Triangle3D {
        Triangle3D::new(
            Point3D::new(0.0, 0.0, 0.0),
            Point3D::new(1.0, 0.0, 1.0),
            Point3D::new(0.0, 1.0, 2.0),
        )
    }

    #[test]
    fn test_sample_count_is_triangular_number() {
        let samples = sample_surface(&prototype_triangle(), 50).unwrap();
        assert_eq!(samples.len(), 50 * 51 / 2);
        let samples = sample_surface(&prototype_triangle(), 2).unwrap();
        assert_eq!(samples.len(), 3);
    }

    #[test]
    fn test_samples_include_vertices() {
        let t = prototype_triangle();
        let samples = sample_surface(&t, 11).unwrap();
        for vertex in &t.vertices {
            assert!(samples.iter().any(|s| (s - vertex).norm() < 1e-12));
        }
    }

    #[test]
    fn test_too_few_points_is_invalid() {
        assert!(matches!(
            sample_surface(&prototype_triangle(), 1),
            Err(GeometryError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_projected_surface_lies_in_plane() {
        let normal = PlaneNormal::from_components(0.0, 1.0, 0.5).unwrap();
        let samples = sample_surface(&prototype_triangle(), 20).unwrap();
        for p in project_surface(&samples, &normal) {
            assert_relative_eq!(p.dot(normal.as_vector()), 0.0, epsilon = 1e-12);
        }
    }
}
