//! Properties of the projection, containment and least-squares operations,
//! checked over small deterministic families of inputs.

use approx::assert_relative_eq;
use nalgebra::Vector3;
use planar_core::{
    compute_barycentric, is_point_in_triangle, project_point, solve_linear_combination,
    GeometryError, PlanarProjector, PlaneNormal, Point2D, Point3D, Triangle2D, Triangle3D,
};

fn normals() -> Vec<PlaneNormal> {
    [
        Vector3::new(0.0, 0.0, 1.0),
        Vector3::new(0.0, 1.0, 0.5),
        Vector3::new(1.0, 1.0, 1.0),
        Vector3::new(-2.0, 0.3, 5.0),
        Vector3::new(1e-3, -4.0, 0.0),
    ]
    .into_iter()
    .map(|n| PlaneNormal::new(n).unwrap())
    .collect()
}

fn points() -> Vec<Point3D> {
    let mut points = Vec::new();
    for i in -2..=2 {
        for j in -1..=1 {
            points.push(Point3D::new(i as f64 * 1.7, j as f64 * 3.1 + 0.4, (i * j) as f64 - 2.5));
        }
    }
    points
}

fn triangles() -> Vec<Triangle2D> {
    vec![
        Triangle2D::new(Point2D::new(0.0, 0.0), Point2D::new(1.0, 0.0), Point2D::new(0.0, 1.0)),
        Triangle2D::new(Point2D::new(300.0, 300.0), Point2D::new(400.0, 300.0), Point2D::new(400.0, 400.0)),
        Triangle2D::new(Point2D::new(-1.5, 2.0), Point2D::new(3.0, -0.5), Point2D::new(0.25, 4.0)),
    ]
}

#[test]
fn test_projection_is_idempotent() {
    for n in normals() {
        for p in points() {
            let once = project_point(&p, &n);
            let twice = project_point(&once, &n);
            assert_relative_eq!(twice, once, epsilon = 1e-12);
        }
    }
}

#[test]
fn test_projection_is_orthogonal_to_normal() {
    for n in normals() {
        for p in points() {
            let projected = project_point(&p, &n);
            assert_relative_eq!(projected.dot(n.as_vector()), 0.0, epsilon = 1e-12);
        }
    }
}

#[test]
fn test_vertices_and_centroid_are_inside() {
    for t in triangles() {
        for vertex in &t.vertices {
            assert!(is_point_in_triangle(vertex, &t).unwrap());
        }
        assert!(is_point_in_triangle(&t.centroid(), &t).unwrap());
    }
}

#[test]
fn test_points_outside_hull_are_rejected() {
    for t in triangles() {
        let centroid = t.centroid();
        // Reflect the centroid through each vertex: strictly outside
        for vertex in &t.vertices {
            let outside = vertex * 2.0 - centroid;
            assert!(!is_point_in_triangle(&outside, &t).unwrap());
        }
    }
}

#[test]
fn test_barycentric_weights_sum_to_one() {
    for t in triangles() {
        let [a, b, c] = &t.vertices;
        for p in points() {
            let query = p.xy() * 10.0;
            let weights = compute_barycentric(&query, a, b, c).unwrap();
            assert_relative_eq!(weights.sum(), 1.0, epsilon = 1e-9);
        }
    }
}

#[test]
fn test_least_squares_recovers_coefficients() {
    let bases = [
        (Point3D::new(2.0, 1.0, 3.0), Point3D::new(1.0, 2.0, 1.0)),
        (Point3D::new(1.0, 0.0, 0.0), Point3D::new(1.0, 0.1, 0.0)),
        (Point3D::new(-5.0, 0.5, 2.0), Point3D::new(0.0, 3.0, -1.0)),
    ];
    for (b, c) in bases {
        for (u_true, v_true) in [(1.5, -0.5), (0.0, 2.0), (-3.25, 7.0)] {
            let p = b * u_true + c * v_true;
            let solution = solve_linear_combination(&b, &c, &p).unwrap();
            assert_relative_eq!(solution.u, u_true, epsilon = 1e-9);
            assert_relative_eq!(solution.v, v_true, epsilon = 1e-9);
        }
    }
}

#[test]
fn test_degenerate_inputs_raise_errors() {
    assert!(matches!(
        PlaneNormal::new(Vector3::zeros()),
        Err(GeometryError::InvalidArgument(_))
    ));

    let collinear = Triangle2D::new(Point2D::new(0.0, 0.0), Point2D::new(1.0, 2.0), Point2D::new(2.0, 4.0));
    assert_eq!(
        is_point_in_triangle(&Point2D::new(0.5, 0.5), &collinear),
        Err(GeometryError::DegenerateTriangle)
    );

    let b = Point3D::new(1.0, 2.0, 3.0);
    assert_eq!(
        solve_linear_combination(&b, &(b * 2.0), &Point3D::new(1.0, 0.0, 0.0)),
        Err(GeometryError::SingularSystem)
    );
}

#[test]
fn test_reference_query_on_projected_triangle() {
    // Triangle A(0,0,0) B(1,0,1) C(0,1,2) projected along z; (0.5, 0.5)
    // lies on the hypotenuse of the projection.
    let triangle = Triangle3D::new(
        Point3D::new(0.0, 0.0, 0.0),
        Point3D::new(1.0, 0.0, 1.0),
        Point3D::new(0.0, 1.0, 2.0),
    );
    let projector = PlanarProjector::from_vector(Vector3::z()).unwrap();
    assert!(projector.contains(&Point2D::new(0.5, 0.5), &triangle).unwrap());
    assert!(!projector.contains(&Point2D::new(0.75, 0.5), &triangle).unwrap());

    let projected = projector.project_triangle(&triangle);
    for vertex in &projected.vertices {
        assert_relative_eq!(vertex.z, 0.0);
    }
}
