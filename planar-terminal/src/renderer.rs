/// ASCII scatter plot for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3, Vector3};
use planar_core::Point3D;
use std::io::Write;

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f64 = 0.5;

/// Marker used for each plotted series
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Series {
    Original,
    Projected,
    Query,
}

impl Series {
    pub fn glyph(self) -> char {
        match self {
            Series::Original => '#',
            Series::Projected => '+',
            Series::Query => 'X',
        }
    }
}

/// Orthographic view looking at `target` from the given azimuth and
/// elevation (degrees), with +z up.
pub struct PlotCamera {
    pub eye: Point3<f64>,
    pub target: Point3<f64>,
    pub up: Vector3<f64>,
}

impl PlotCamera {
    pub fn new(azimuth: f64, elevation: f64, target: Point3D) -> Self {
        let elevation = elevation.clamp(-89.0, 89.0).to_radians();
        let azimuth = azimuth.to_radians();
        let direction = Vector3::new(
            elevation.cos() * azimuth.cos(),
            elevation.cos() * azimuth.sin(),
            elevation.sin(),
        );
        Self {
            eye: Point3::from(target + direction),
            target: Point3::from(target),
            up: Vector3::z(),
        }
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f64> {
        Matrix4::look_at_rh(&self.eye, &self.target, &self.up)
    }
}

/// Character grid that plots 3D points seen through a [`PlotCamera`]
pub struct AsciiPlot {
    width: usize,
    height: usize,
    depth_buffer: Vec<f64>,
    char_buffer: Vec<char>,
}

impl AsciiPlot {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f64::INFINITY; size],
            char_buffer: vec![' '; size],
        }
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f64::INFINITY);
        self.char_buffer.fill(' ');
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.char_buffer[y * self.width + x])
    }

    pub fn count(&self, glyph: char) -> usize {
        self.char_buffer.iter().filter(|&&c| c == glyph).count()
    }

    /// Plots every series, scaled so that all points fit the grid.
    /// Nearer points hide farther ones within a cell.
    pub fn plot(&mut self, series: &[(Series, &[Point3D])], camera: &PlotCamera) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let view = camera.view_matrix();
        let to_view = |p: &Point3D| view.transform_point(&Point3::from(*p)).coords;

        let mut all = series.iter().flat_map(|(_, points)| points.iter()).map(to_view);
        let Some(first) = all.next() else {
            return;
        };
        let (min, max) = all.fold((first, first), |(min, max), v| (min.inf(&v), max.sup(&v)));

        let extent_x = (max.x - min.x).max(f64::EPSILON);
        let extent_y = ((max.y - min.y) * CELL_ASPECT).max(f64::EPSILON);
        let scale = ((self.width - 1) as f64 / extent_x).min((self.height - 1) as f64 / extent_y);
        let center = (min + max) / 2.0;
        // Extremes land on the first and last cell of each axis
        let mid_col = (self.width - 1) as f64 / 2.0;
        let mid_row = (self.height - 1) as f64 / 2.0;

        for (kind, points) in series {
            for p in points.iter().map(to_view) {
                let col = (mid_col + (p.x - center.x) * scale).round();
                let row = (mid_row - (p.y - center.y) * scale * CELL_ASPECT).round();
                // The camera looks down -z, so larger z is nearer
                self.put(col as i64, row as i64, -p.z, kind.glyph());
            }
        }
    }

    fn put(&mut self, x: i64, y: i64, depth: f64, glyph: char) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        if depth <= self.depth_buffer[idx] {
            self.depth_buffer[idx] = depth;
            self.char_buffer[idx] = glyph;
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for row in self.char_buffer.chunks(self.width.max(1)) {
            for &c in row {
                let color = match c {
                    '#' => Color::Red,
                    '+' => Color::Cyan,
                    'X' => Color::Green,
                    _ => Color::DarkGrey,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
            writer.queue(Print("\r\n"))?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_point_lands_in_centre() {
        let mut plot = AsciiPlot::new(21, 11);
        let camera = PlotCamera::new(-60.0, 30.0, Point3D::zeros());
        let point = [Point3D::new(1.0, 2.0, 3.0)];
        plot.plot(&[(Series::Query, &point[..])], &camera);
        assert_eq!(plot.count('X'), 1);
        assert_eq!(plot.cell(10, 5), Some('X'));
    }

    #[test]
    fn test_extreme_points_are_drawn() {
        let mut plot = AsciiPlot::new(21, 11);
        // Nearly straight down, with +x pointing right on screen
        let camera = PlotCamera::new(-90.0, 89.0, Point3D::zeros());
        let points = [Point3D::new(-10.0, 0.0, 0.0), Point3D::new(10.0, 0.0, 0.0)];
        plot.plot(&[(Series::Original, &points[..])], &camera);
        assert_eq!(plot.count('#'), 2);
        assert_eq!(plot.cell(0, 5), Some('#'));
        assert_eq!(plot.cell(20, 5), Some('#'));
    }

    #[test]
    fn test_every_point_fits_the_grid() {
        let mut plot = AsciiPlot::new(41, 21);
        // Looking along -y: screen x is world x, screen y is world z
        let camera = PlotCamera::new(-90.0, 0.0, Point3D::zeros());
        // Corners and centre of a square in the x-z plane. Cells are twice as
        // tall as wide, so it spans the full 41 x 21 grid.
        let points = [
            Point3D::new(-4.0, 0.0, -4.0),
            Point3D::new(4.0, 0.0, -4.0),
            Point3D::new(-4.0, 0.0, 4.0),
            Point3D::new(4.0, 0.0, 4.0),
            Point3D::new(0.0, 0.0, 0.0),
        ];
        plot.plot(&[(Series::Original, &points[..])], &camera);
        assert_eq!(plot.count('#'), points.len());
        for (x, y) in [(0, 0), (40, 0), (0, 20), (40, 20), (20, 10)] {
            assert_eq!(plot.cell(x, y), Some('#'), "({x}, {y})");
        }
    }

    #[test]
    fn test_nearer_series_wins_shared_cell() {
        let mut plot = AsciiPlot::new(11, 11);
        // Looking straight down the x axis from +x
        let camera = PlotCamera::new(0.0, 0.0, Point3D::zeros());
        let near = [Point3D::new(1.0, 0.0, 0.0)];
        let far = [Point3D::new(-1.0, 0.0, 0.0)];
        plot.plot(&[(Series::Projected, &near[..]), (Series::Original, &far[..])], &camera);
        assert_eq!(plot.count('+'), 1);
        assert_eq!(plot.count('#'), 0);
    }

    #[test]
    fn test_draw_emits_every_row() {
        let plot = AsciiPlot::new(3, 2);
        let mut out = Vec::new();
        plot.draw(&mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert_eq!(text.matches("\r\n").count(), 2);
    }
}
