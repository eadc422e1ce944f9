/// Triangle rasterization onto a depth-buffered canvas
use crate::barycentric::compute_barycentric;
use crate::canvas::{Canvas, Color};
use crate::error::{GeometryError, Result};
use crate::geometry::{Mesh, Point2D, Point3D, Triangle3D};
use crate::projection::PlanarProjector;

/// Maps canvas pixels to plane-local coordinates:
/// `plane = (pixel - offset) / scale`.
///
/// Image rows grow with plane +y, so written images show +y pointing
/// down, matching the row order of the PPM reference output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    scale: f64,
    offset: Point2D,
}

impl Viewport {
    pub fn new(scale: f64, offset: Point2D) -> Result<Self> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(GeometryError::invalid(format!(
                "viewport scale must be positive and finite, got {scale}"
            )));
        }
        if !(offset.x.is_finite() && offset.y.is_finite()) {
            return Err(GeometryError::invalid("viewport offset must be finite"));
        }
        Ok(Self { scale, offset })
    }

    /// Scale and offset that fit the flattened projection of `mesh` inside
    /// a `width × height` canvas, leaving `margin` pixels on every side.
    /// `None` for an empty mesh or one that flattens to a single point.
    pub fn fit(projector: &PlanarProjector, mesh: &Mesh, width: usize, height: usize, margin: usize) -> Option<Self> {
        let mut points = mesh
            .triangles
            .iter()
            .flat_map(|t| t.vertices.iter())
            .map(|v| projector.flatten(v));
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| (min.inf(&p), max.sup(&p)));

        let extent = max - min;
        let usable_w = width.saturating_sub(2 * margin).max(1) as f64;
        let usable_h = height.saturating_sub(2 * margin).max(1) as f64;
        let scale = match (extent.x > 0.0, extent.y > 0.0) {
            (true, true) => (usable_w / extent.x).min(usable_h / extent.y),
            (true, false) => usable_w / extent.x,
            (false, true) => usable_h / extent.y,
            (false, false) => return None,
        };

        let center = (min + max) / 2.0;
        let offset = Point2D::new(width as f64 / 2.0, height as f64 / 2.0) - center * scale;
        Self::new(scale, offset).ok()
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset(&self) -> &Point2D {
        &self.offset
    }

    pub fn to_plane(&self, x: i64, y: i64) -> Point2D {
        (Point2D::new(x as f64, y as f64) - self.offset) / self.scale
    }

    pub fn to_pixel(&self, point: &Point2D) -> Point2D {
        point * self.scale + self.offset
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Point2D::zeros(),
        }
    }
}

/// A coloured triangle to be drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleSurface {
    pub triangle: Triangle3D,
    pub color: Color,
}

impl TriangleSurface {
    pub fn new(triangle: Triangle3D, color: Color) -> Self {
        Self { triangle, color }
    }

    /// Projects the triangle onto the projector's plane and fills the
    /// pixels whose plane points fall inside it, boundary inclusive.
    /// Depth is the interpolated signed distance of the original surface
    /// along the plane normal. Returns the number of pixels written.
    pub fn rasterize(&self, projector: &PlanarProjector, viewport: &Viewport, canvas: &mut Canvas) -> Result<usize> {
        let flat = projector.flatten_triangle(&self.triangle);
        let [a, b, c] = flat.vertices;
        // Fail on an edge-on triangle even when it is entirely off-canvas
        compute_barycentric(&a, &a, &b, &c)?;

        if canvas.width() == 0 || canvas.height() == 0 {
            return Ok(0);
        }

        let depths = self.triangle.vertices.map(|v| projector.depth(&v));
        let (min, max) = flat.bounds();
        let min = viewport.to_pixel(&min);
        let max = viewport.to_pixel(&max);

        let min_x = (min.x.floor() as i64).max(0);
        let max_x = (max.x.ceil() as i64).min(canvas.width() as i64 - 1);
        let min_y = (min.y.floor() as i64).max(0);
        let max_y = (max.y.ceil() as i64).min(canvas.height() as i64 - 1);

        let mut written = 0;
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = viewport.to_plane(x, y);
                let weights = compute_barycentric(&p, &a, &b, &c)?;
                if weights.is_inside() && canvas.put_pixel(x, y, weights.interpolate(depths), self.color) {
                    written += 1;
                }
            }
        }
        Ok(written)
    }
}

/// A sphere drawn as its orthographic silhouette: a filled disc around the
/// flattened centre, shaded by the depth of the nearest surface point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereSurface {
    center: Point3D,
    radius: f64,
    pub color: Color,
}

impl SphereSurface {
    pub fn new(center: Point3D, radius: f64, color: Color) -> Result<Self> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(GeometryError::invalid(format!(
                "sphere radius must be positive and finite, got {radius}"
            )));
        }
        if !center.iter().all(|c| c.is_finite()) {
            return Err(GeometryError::invalid("sphere centre must be finite"));
        }
        Ok(Self { center, radius, color })
    }

    pub fn center(&self) -> &Point3D {
        &self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Fills every pixel whose plane point lies within `radius` of the
    /// flattened centre. Returns the number of pixels written.
    pub fn rasterize(&self, projector: &PlanarProjector, viewport: &Viewport, canvas: &mut Canvas) -> usize {
        if canvas.width() == 0 || canvas.height() == 0 {
            return 0;
        }

        let centre = projector.flatten(&self.center);
        let centre_depth = projector.depth(&self.center);
        let r2 = self.radius * self.radius;

        let pixel = viewport.to_pixel(&centre);
        let reach = self.radius * viewport.scale();
        let min_x = ((pixel.x - reach).floor() as i64).max(0);
        let max_x = ((pixel.x + reach).ceil() as i64).min(canvas.width() as i64 - 1);
        let min_y = ((pixel.y - reach).floor() as i64).max(0);
        let max_y = ((pixel.y + reach).ceil() as i64).min(canvas.height() as i64 - 1);

        let mut written = 0;
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let d2 = (viewport.to_plane(x, y) - centre).norm_squared();
                if d2 <= r2 && canvas.put_pixel(x, y, centre_depth - (r2 - d2).sqrt(), self.color) {
                    written += 1;
                }
            }
        }
        written
    }
}

/// Outcome of rendering a set of surfaces
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub pixels_written: usize,
    pub faces_drawn: usize,
    /// Faces seen edge-on, whose projection has no area
    pub faces_skipped: usize,
}

/// Renders every surface; degenerate projections are skipped and counted.
pub fn render(
    surfaces: &[TriangleSurface],
    projector: &PlanarProjector,
    viewport: &Viewport,
    canvas: &mut Canvas,
) -> Result<RenderStats> {
    let mut stats = RenderStats::default();
    for surface in surfaces {
        match surface.rasterize(projector, viewport, canvas) {
            Ok(pixels) => {
                stats.pixels_written += pixels;
                stats.faces_drawn += 1;
            }
            Err(GeometryError::DegenerateTriangle) => stats.faces_skipped += 1,
            Err(e) => return Err(e),
        }
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{BLACK, CYAN, RED};
    use nalgebra::Vector3;

    fn reference_surface(color: Color) -> TriangleSurface {
        TriangleSurface::new(
            Triangle3D::new(
                Point3D::new(30.0, 30.0, 30.0),
                Point3D::new(40.0, 30.0, 30.0),
                Point3D::new(40.0, 40.0, 30.0),
            ),
            color,
        )
    }

    #[test]
    fn test_rasterize_fills_triangle() {
        let projector = PlanarProjector::from_vector(Vector3::z()).unwrap();
        let mut canvas = Canvas::new(100, 100).unwrap();
        let written = reference_surface(RED)
            .rasterize(&projector, &Viewport::default(), &mut canvas)
            .unwrap();

        assert_eq!(written, canvas.covered());
        // Strict interior: 30 < y < x < 40
        for y in 31..40 {
            for x in (y + 1)..40 {
                assert_eq!(canvas.pixel(x, y), Some(RED), "({x}, {y})");
            }
        }
        // Closed triangle holds at most 11 + 10 + ... + 1 lattice points
        assert!((36..=66).contains(&written));
        for (x, y) in [(30, 30), (40, 30), (40, 40)] {
            assert_eq!(canvas.pixel(x, y), Some(RED));
        }
        assert_eq!(canvas.pixel(32, 35), Some(BLACK));
        assert_eq!(canvas.pixel(41, 35), Some(BLACK));
        assert!((canvas.depth_at(35, 32).unwrap() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_viewport_scales_plane_coordinates() {
        let viewport = Viewport::new(10.0, Point2D::new(5.0, 5.0)).unwrap();
        assert_eq!(viewport.to_plane(15, 25), Point2D::new(1.0, 2.0));
        assert_eq!(viewport.to_pixel(&Point2D::new(1.0, 2.0)), Point2D::new(15.0, 25.0));
        assert!(Viewport::new(0.0, Point2D::zeros()).is_err());
    }

    #[test]
    fn test_nearer_surface_wins() {
        let projector = PlanarProjector::from_vector(Vector3::z()).unwrap();
        let mut canvas = Canvas::new(100, 100).unwrap();
        let near = reference_surface(CYAN);
        let mut far = reference_surface(RED);
        far.triangle.translate(0.0, 0.0, 100.0);

        let stats = render(&[near, far], &projector, &Viewport::default(), &mut canvas).unwrap();
        assert_eq!(stats.faces_drawn, 2);
        assert_eq!(stats.pixels_written, canvas.covered());
        assert_eq!(canvas.pixel(35, 32), Some(CYAN));
    }

    #[test]
    fn test_edge_on_face_is_skipped() {
        let projector = PlanarProjector::from_vector(Vector3::x()).unwrap();
        let mut canvas = Canvas::new(10, 10).unwrap();
        let stats = render(&[reference_surface(RED)], &projector, &Viewport::default(), &mut canvas).unwrap();
        assert_eq!(stats.faces_skipped, 1);
        assert_eq!(canvas.covered(), 0);
    }

    #[test]
    fn test_fit_centres_mesh() {
        let projector = PlanarProjector::from_vector(Vector3::z()).unwrap();
        let viewport = Viewport::fit(&projector, &Mesh::cube(2.0), 100, 50, 5).unwrap();
        assert!((viewport.scale() - 20.0).abs() < 1e-12);
        assert_eq!(viewport.to_pixel(&Point2D::zeros()), Point2D::new(50.0, 25.0));
        assert!(Viewport::fit(&projector, &Mesh::new(), 100, 50, 5).is_none());
    }

    #[test]
    fn test_viewport_rows_follow_plane_y() {
        let viewport = Viewport::new(10.0, Point2D::new(50.0, 50.0)).unwrap();
        let up = viewport.to_pixel(&Point2D::new(0.0, 1.0));
        let down = viewport.to_pixel(&Point2D::new(0.0, -1.0));
        assert!(up.y > down.y);
    }

    #[test]
    fn test_sphere_fills_disc() {
        let projector = PlanarProjector::from_vector(Vector3::z()).unwrap();
        let mut canvas = Canvas::new(100, 100).unwrap();
        let sphere = SphereSurface::new(Point3D::new(50.0, 30.0, 0.0), 10.0, RED).unwrap();
        let written = sphere.rasterize(&projector, &Viewport::default(), &mut canvas);

        assert_eq!(written, canvas.covered());
        assert_eq!(canvas.pixel(50, 30), Some(RED));
        assert_eq!(canvas.pixel(60, 30), Some(RED));
        assert_eq!(canvas.pixel(58, 38), Some(BLACK));
        assert_eq!(canvas.pixel(61, 30), Some(BLACK));
        // Nearest point of the surface sits one radius in front of the centre
        assert!((canvas.depth_at(50, 30).unwrap() + 10.0).abs() < 1e-9);
        assert!((canvas.depth_at(60, 30).unwrap()).abs() < 1e-9);
    }

    #[test]
    fn test_sphere_occludes_triangle_behind_it() {
        let projector = PlanarProjector::from_vector(Vector3::z()).unwrap();
        let mut canvas = Canvas::new(100, 100).unwrap();
        reference_surface(CYAN)
            .rasterize(&projector, &Viewport::default(), &mut canvas)
            .unwrap();
        SphereSurface::new(Point3D::new(36.0, 33.0, 0.0), 2.0, RED)
            .unwrap()
            .rasterize(&projector, &Viewport::default(), &mut canvas);
        assert_eq!(canvas.pixel(36, 33), Some(RED));
        assert_eq!(canvas.pixel(39, 31), Some(CYAN));
    }

    #[test]
    fn test_sphere_rejects_bad_radius() {
        for radius in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                SphereSurface::new(Point3D::zeros(), radius, RED),
                Err(GeometryError::InvalidArgument(_))
            ));
        }
    }
}
