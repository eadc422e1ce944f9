/// Depth-buffered pixel canvas with image output
use std::io::{self, Write};
use std::path::Path;

use image::{Rgb, RgbImage};

use crate::error::{GeometryError, Result};

/// RGB colour with channels in [0, 1]
pub type Color = [f32; 3];

pub const BLACK: Color = [0.0, 0.0, 0.0];
pub const RED: Color = [1.0, 0.0, 0.0];
pub const CYAN: Color = [0.0, 1.0, 1.0];

/// Largest accepted width or height
pub const MAX_DIMENSION: usize = 16_384;
/// Largest accepted pixel count
pub const MAX_PIXELS: usize = 1 << 26;

/// A width × height framebuffer. Pixel (x, y) has x along the width
/// and y along the height; smaller depth values are nearer.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
    depth: Vec<f64>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let size = width
            .checked_mul(height)
            .filter(|&size| width <= MAX_DIMENSION && height <= MAX_DIMENSION && size <= MAX_PIXELS)
            .ok_or_else(|| {
                GeometryError::invalid(format!(
                    "canvas {width}x{height} exceeds {MAX_DIMENSION} pixels per side or {MAX_PIXELS} pixels"
                ))
            })?;
        Ok(Self {
            width,
            height,
            pixels: vec![BLACK; size],
            depth: vec![f64::INFINITY; size],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.pixels.fill(BLACK);
        self.depth.fill(f64::INFINITY);
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    /// Writes `color` if (x, y) is on the canvas and `depth` is nearer than
    /// what is already stored there. Returns whether the pixel was written.
    pub fn put_pixel(&mut self, x: i64, y: i64, depth: f64, color: Color) -> bool {
        let Some(idx) = self.index(x, y) else {
            return false;
        };
        if depth < self.depth[idx] {
            self.depth[idx] = depth;
            self.pixels[idx] = color;
            true
        } else {
            false
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        self.index(x as i64, y as i64).map(|idx| self.pixels[idx])
    }

    /// Stored depth, `f64::INFINITY` where nothing has been drawn
    pub fn depth_at(&self, x: usize, y: usize) -> Option<f64> {
        self.index(x as i64, y as i64).map(|idx| self.depth[idx])
    }

    /// Number of pixels that have been written since the last clear
    pub fn covered(&self) -> usize {
        self.depth.iter().filter(|d| d.is_finite()).count()
    }

    /// ASCII PPM (P3), one canvas row per line
    pub fn write_ppm<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "P3")?;
        writeln!(writer, "{} {}", self.width, self.height)?;
        writeln!(writer, "255")?;
        for row in self.pixels.chunks(self.width.max(1)) {
            for [r, g, b] in row.iter().map(|c| to_rgb8(*c)) {
                write!(writer, "{} {} {} ", r, g, b)?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }

    pub fn to_image(&self) -> RgbImage {
        // `new` caps both sides at MAX_DIMENSION, so they fit in u32
        let mut img = RgbImage::new(self.width as u32, self.height as u32);
        for (i, color) in self.pixels.iter().enumerate() {
            let x = (i % self.width) as u32;
            let y = (i / self.width) as u32;
            img.put_pixel(x, y, Rgb(to_rgb8(*color)));
        }
        img
    }

    /// Saves in the format implied by the file extension. `.ppm` is
    /// written as ASCII P3; other extensions go through `image`.
    pub fn save(&self, path: &Path) -> std::result::Result<(), image::ImageError> {
        let is_ppm = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("ppm"));
        if is_ppm {
            let mut file = io::BufWriter::new(std::fs::File::create(path)?);
            self.write_ppm(&mut file)?;
            file.flush()?;
            return Ok(());
        }
        self.to_image().save(path)
    }
}

/// Intensity × 255, truncated
fn to_rgb8(color: Color) -> [u8; 3] {
    color.map(|c| (c.clamp(0.0, 1.0) * 255.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_canvas_is_empty() {
        let canvas = Canvas::new(100, 50).unwrap();
        assert_eq!(canvas.width(), 100);
        assert_eq!(canvas.height(), 50);
        assert_eq!(canvas.pixel(99, 49), Some(BLACK));
        assert_eq!(canvas.depth_at(0, 0), Some(f64::INFINITY));
        assert_eq!(canvas.pixel(100, 0), None);
        assert_eq!(canvas.covered(), 0);
    }

    #[test]
    fn test_depth_test_keeps_nearest() {
        let mut canvas = Canvas::new(10, 10).unwrap();
        assert!(canvas.put_pixel(3, 4, 5.0, RED));
        assert!(!canvas.put_pixel(3, 4, 6.0, CYAN));
        assert_eq!(canvas.pixel(3, 4), Some(RED));
        assert!(canvas.put_pixel(3, 4, -1.0, CYAN));
        assert_eq!(canvas.pixel(3, 4), Some(CYAN));
        assert_eq!(canvas.depth_at(3, 4), Some(-1.0));
    }

    #[test]
    fn test_out_of_bounds_is_ignored() {
        let mut canvas = Canvas::new(4, 4).unwrap();
        assert!(!canvas.put_pixel(-1, 0, 0.0, RED));
        assert!(!canvas.put_pixel(0, 4, 0.0, RED));
        assert_eq!(canvas.covered(), 0);
    }

    #[test]
    fn test_clear_resets_pixels_and_depth() {
        let mut canvas = Canvas::new(20, 20).unwrap();
        canvas.put_pixel(10, 10, 0.5, RED);
        canvas.clear();
        assert_eq!(canvas.pixel(10, 10), Some(BLACK));
        assert_eq!(canvas.depth_at(10, 10), Some(f64::INFINITY));
    }

    #[test]
    fn test_write_ppm() {
        let mut canvas = Canvas::new(2, 1).unwrap();
        canvas.put_pixel(1, 0, 0.0, [1.0, 0.5, 0.0]);
        let mut out = Vec::new();
        canvas.write_ppm(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "P3\n2 1\n255\n0 0 0 255 127 0 \n");
    }

    #[test]
    fn test_oversized_canvas_is_rejected() {
        let huge = usize::MAX / 2;
        assert!(matches!(Canvas::new(huge, huge), Err(GeometryError::InvalidArgument(_))));
        assert!(Canvas::new(MAX_DIMENSION + 1, 1).is_err());
        assert!(Canvas::new(MAX_DIMENSION, MAX_DIMENSION).is_err());
        assert!(Canvas::new(MAX_DIMENSION, 16).is_ok());
    }

    #[test]
    fn test_to_image() {
        let mut canvas = Canvas::new(3, 2).unwrap();
        canvas.put_pixel(2, 1, 0.0, CYAN);
        let img = canvas.to_image();
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(2, 1).0, [0, 255, 255]);
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0]);
    }
}
