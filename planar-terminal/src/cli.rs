//! Command-line interface of the `planar` binary.
//!
//! Every command loads an optional RON scene, applies flag overrides and
//! prints its results to the given writer. Progress lines are skipped with
//! `--quiet`; warnings go to stderr.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use clap::{Args, Parser, Subcommand};
use nalgebra::{Vector2, Vector3};
use planar_core::{
    project_point, render, solve_linear_combination, stl, Axis, Canvas, Mesh, PlaneNormal, Point2D,
    Point3D, Scene, SphereConfig, Triangle3D, TriangleSurface, Viewport,
};

use crate::plot::PlotData;
use crate::PlotApp;

/// Pixels left around fitted geometry
const FIT_MARGIN: usize = 10;

#[derive(Debug, Parser)]
#[command(name = "planar", version, about = "Project triangle surfaces onto planes through the origin")]
pub struct Cli {
    /// Suppress progress messages
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Project a point onto the plane with the given normal
    Project {
        /// Point as X,Y,Z
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
        point: Vector3<f64>,
        /// Plane normal as X,Y,Z (need not be unit length)
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true, default_value = "0,0,1")]
        normal: Vector3<f64>,
    },

    /// Test whether a plane-local point lies on the projected triangle
    Inside {
        /// Query point as X,Y
        #[arg(long, value_parser = parse_vec2, allow_hyphen_values = true)]
        point: Option<Vector2<f64>>,
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
        normal: Option<Vector3<f64>>,
        /// RON scene file
        #[arg(long)]
        scene: Option<PathBuf>,
    },

    /// Recover (u, v) from P = uB + vC by least squares
    Solve {
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
        b: Option<Vector3<f64>>,
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
        c: Option<Vector3<f64>>,
        #[arg(long, allow_negative_numbers = true)]
        u: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        v: Option<f64>,
        #[arg(long)]
        scene: Option<PathBuf>,
    },

    /// Rasterize the projected triangle, or an STL mesh, to an image file
    Render {
        /// Output image; `.ppm` is written as plain-text P3
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long)]
        scene: Option<PathBuf>,
        /// Render this mesh instead of the scene triangle
        #[arg(long)]
        stl: Option<PathBuf>,
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
        normal: Option<Vector3<f64>>,
        #[arg(long)]
        width: Option<usize>,
        #[arg(long)]
        height: Option<usize>,
        /// Pixels per plane unit; fits the geometry when omitted
        #[arg(long)]
        scale: Option<f64>,
        /// Extra sphere as X,Y,Z,RADIUS, drawn in the scene colour (repeatable)
        #[arg(long = "sphere", value_parser = parse_sphere, allow_hyphen_values = true)]
        spheres: Vec<[f64; 4]>,
        #[command(flatten)]
        placement: Placement,
    },

    /// Plot the sampled surface and its projection in the terminal
    Plot {
        #[arg(long)]
        scene: Option<PathBuf>,
        /// Grid points per parameter axis
        #[arg(long, default_value_t = 30)]
        samples: usize,
        #[arg(long, default_value_t = -60.0, allow_negative_numbers = true)]
        azimuth: f64,
        #[arg(long, default_value_t = 30.0, allow_negative_numbers = true)]
        elevation: f64,
    },
}

/// Positions the mesh before it is projected: scale about the origin,
/// rotate about X, Y then Z around the pivot, then translate.
#[derive(Debug, Default, Clone, Args)]
pub struct Placement {
    /// Uniform scale about the origin
    #[arg(long, allow_negative_numbers = true)]
    pub scale_mesh: Option<f64>,
    /// Rotation about the X axis in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub rotate_x: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub rotate_y: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    pub rotate_z: Option<f64>,
    /// Rotation centre as X,Y,Z; defaults to the centre of the mesh bounds
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
    pub pivot: Option<Vector3<f64>>,
    /// Offset as X,Y,Z applied last
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
    pub translate: Option<Vector3<f64>>,
}

impl Placement {
    pub fn apply(&self, mesh: &mut Mesh) -> Result<()> {
        if let Some(k) = self.scale_mesh {
            ensure!(k.is_finite() && k != 0.0, "mesh scale must be finite and non-zero, got {k}");
            mesh.scale(k);
        }

        let pivot = match self.pivot {
            Some(pivot) => pivot,
            None => mesh.bounds().map_or_else(Point3D::zeros, |(min, max)| (min + max) / 2.0),
        };
        for (axis, degrees) in [(Axis::X, self.rotate_x), (Axis::Y, self.rotate_y), (Axis::Z, self.rotate_z)] {
            if let Some(degrees) = degrees {
                mesh.rotate(axis, degrees, &pivot);
            }
        }

        if let Some(t) = self.translate {
            mesh.translate(t.x, t.y, t.z);
        }
        Ok(())
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(&cli, &mut out)
}

pub fn execute<W: Write>(cli: &Cli, out: &mut W) -> Result<()> {
    let quiet = cli.quiet;
    match &cli.command {
        Commands::Project { point, normal } => {
            let normal = PlaneNormal::new(*normal).context("invalid plane normal")?;
            let projected = project_point(point, &normal);
            writeln!(out, "Projection of {}: {}", fmt3(point), fmt3(&projected))?;
            writeln!(out, "Distance from plane: {:.4}", point.dot(normal.as_vector()))?;
        }

        Commands::Inside { point, normal, scene } => {
            let mut scene = load_scene(scene.as_deref(), quiet, out)?;
            if let Some(point) = point {
                scene.query_point = [point.x, point.y];
            }
            if let Some(normal) = normal {
                scene.normal = (*normal).into();
            }
            let projector = scene.projector().context("invalid plane normal")?;
            let triangle = scene.triangle();
            let query = scene.query_point();

            let projected = projector.project_triangle(&triangle);
            let [a, b, c] = &projected.vertices;
            writeln!(out, "Projected triangle: A' = {}, B' = {}, C' = {}", fmt3(a), fmt3(b), fmt3(c))?;

            let weights = projector
                .barycentric(&query, &triangle)
                .context("projected triangle has no area")?;
            writeln!(
                out,
                "Barycentric coordinates: u = {:.4}, v = {:.4}, w = {:.4}",
                weights.u, weights.v, weights.w
            )?;
            let verdict = if weights.is_inside() { "lies" } else { "does not lie" };
            writeln!(out, "The point {} {verdict} on the projected triangle.", fmt2(&query))?;
        }

        Commands::Solve { b, c, u, v, scene } => {
            let scene = load_scene(scene.as_deref(), quiet, out)?;
            let (scene_b, scene_c) = scene.basis_vectors();
            let b = b.unwrap_or(scene_b);
            let c = c.unwrap_or(scene_c);
            let u = u.unwrap_or(scene.coefficients[0]);
            let v = v.unwrap_or(scene.coefficients[1]);

            let target = b * u + c * v;
            writeln!(out, "Target P = uB + vC = {}", fmt3(&target))?;
            let solution = solve_linear_combination(&b, &c, &target).context("B and C do not span a plane")?;
            writeln!(out, "Computed values: u = {:.4}, v = {:.4}", solution.u, solution.v)?;
            writeln!(out, "Original values: u = {u:.4}, v = {v:.4}")?;
            writeln!(out, "Residual: {:.3e}", solution.residual)?;
        }

        Commands::Render { output, scene, stl: stl_path, normal, width, height, scale, spheres, placement } => {
            let mut scene = load_scene(scene.as_deref(), quiet, out)?;
            if let Some(normal) = normal {
                scene.normal = (*normal).into();
            }
            if let Some(width) = width {
                scene.canvas.width = *width;
            }
            if let Some(height) = height {
                scene.canvas.height = *height;
            }
            if scale.is_some() {
                scene.canvas.scale = *scale;
            }
            scene.spheres.extend(spheres.iter().map(|&[x, y, z, radius]| SphereConfig {
                center: [x, y, z],
                radius,
                color: scene.color,
            }));
            scene.validate().context("invalid render settings")?;
            let (width, height) = (scene.canvas.width, scene.canvas.height);
            ensure!(width > 0 && height > 0, "canvas must be at least 1x1, got {width}x{height}");

            let mut mesh = match stl_path {
                Some(path) => {
                    let mesh = stl::load_stl(path).with_context(|| format!("failed to load STL {}", path.display()))?;
                    progress(quiet, out, format_args!("Loaded {} triangles from {}", mesh.len(), path.display()))?;
                    mesh
                }
                None => single_triangle(scene.triangle()),
            };
            ensure!(!mesh.is_empty(), "nothing to render: the mesh has no triangles");
            placement.apply(&mut mesh)?;

            let projector = scene.projector()?;
            let viewport = match scene.canvas.scale {
                Some(scale) => Viewport::new(scale, Point2D::from(scene.canvas.offset))?,
                None => Viewport::fit(&projector, &mesh, width, height, FIT_MARGIN)
                    .context("geometry projects to a single point; pass --scale")?,
            };

            let surfaces: Vec<_> = mesh
                .triangles
                .iter()
                .map(|t| TriangleSurface::new(*t, scene.color))
                .collect();
            let mut canvas = Canvas::new(width, height).context("invalid canvas size")?;
            let mut stats = render(&surfaces, &projector, &viewport, &mut canvas)?;
            for sphere in &scene.spheres {
                stats.pixels_written += sphere.surface()?.rasterize(&projector, &viewport, &mut canvas);
            }
            if stats.faces_skipped > 0 {
                eprintln!("warning: skipped {} faces seen edge-on", stats.faces_skipped);
            }

            canvas
                .save(output)
                .with_context(|| format!("failed to write {}", output.display()))?;
            progress(
                quiet,
                out,
                format_args!(
                    "Rendered {} faces ({} pixels) to {}",
                    stats.faces_drawn,
                    stats.pixels_written,
                    output.display()
                ),
            )?;
        }

        Commands::Plot { scene, samples, azimuth, elevation } => {
            let scene = load_scene(scene.as_deref(), quiet, out)?;
            let data = PlotData::from_scene(&scene, *samples).context("cannot sample the scene triangle")?;
            let inside = data.query_inside;

            let mut app = PlotApp::new(data, *azimuth, *elevation).context("terminal unavailable")?;
            app.run().context("terminal plot failed")?;

            let verdict = if inside { "lies" } else { "does not lie" };
            writeln!(out, "The point {} {verdict} on the projected triangle.", fmt2(&scene.query_point()))?;
        }
    }
    Ok(())
}

fn load_scene<W: Write>(path: Option<&Path>, quiet: bool, out: &mut W) -> Result<Scene> {
    match path {
        Some(path) => {
            let scene = Scene::load(path).with_context(|| format!("failed to load scene {}", path.display()))?;
            progress(quiet, out, format_args!("Loaded scene from {}", path.display()))?;
            Ok(scene)
        }
        None => Ok(Scene::default()),
    }
}

fn single_triangle(triangle: Triangle3D) -> Mesh {
    let mut mesh = Mesh::with_capacity(1);
    mesh.add_triangle(triangle);
    mesh
}

fn progress<W: Write>(quiet: bool, out: &mut W, message: std::fmt::Arguments) -> io::Result<()> {
    if quiet {
        return Ok(());
    }
    writeln!(out, "{message}")
}

fn fmt3(p: &Point3D) -> String {
    format!("({:.4}, {:.4}, {:.4})", p.x, p.y, p.z)
}

fn fmt2(p: &Point2D) -> String {
    format!("({:.4}, {:.4})", p.x, p.y)
}

fn parse_components<const N: usize>(s: &str) -> Result<[f64; N], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != N {
        return Err(format!("expected {N} comma-separated numbers, got {}", parts.len()));
    }
    let mut values = [0.0; N];
    for (value, part) in values.iter_mut().zip(&parts) {
        *value = part.parse().map_err(|e| format!("invalid number {part:?}: {e}"))?;
    }
    Ok(values)
}

fn parse_vec3(s: &str) -> Result<Vector3<f64>, String> {
    parse_components::<3>(s).map(Vector3::from)
}

fn parse_sphere(s: &str) -> Result<[f64; 4], String> {
    parse_components::<4>(s)
}

fn parse_vec2(s: &str) -> Result<Vector2<f64>, String> {
    parse_components::<2>(s).map(Vector2::from)
}
