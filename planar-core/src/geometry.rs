/// Line primitives and the calibration test pattern
use nalgebra::Point2;

/// Cells per side of the test grid
pub const GRID: usize = 10;

/// RGB stroke color with components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// A colored segment in object space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub from: Point2<f32>,
    pub to: Point2<f32>,
    pub color: Rgb,
}

impl GridLine {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32, color: Rgb) -> Self {
        Self {
            from: Point2::new(x0, y0),
            to: Point2::new(x1, y1),
            color,
        }
    }
}

/// Create a `scale`-wide grid centred on the origin.
///
/// Lines in the right half get green, lines in the top half get blue, so
/// the quadrants reveal flips and rotations at a glance.
pub fn test_grid(scale: f32) -> Vec<GridLine> {
    let left = -scale / 2.0;
    let right = scale / 2.0;
    let bottom = -scale / 2.0;
    let top = scale / 2.0;
    let step = scale / GRID as f32;

    let mut lines = Vec::with_capacity(GRID * GRID * 2);
    for i in 0..GRID {
        for j in 0..GRID {
            let x = left + step * i as f32;
            let y = bottom + step * j as f32;
            let color = Rgb::new(
                1.0,
                if i > GRID / 2 { 1.0 } else { 0.0 },
                if j > GRID / 2 { 1.0 } else { 0.0 },
            );

            lines.push(GridLine::new(left, y, right, y, color));
            lines.push(GridLine::new(x, bottom, x, top, color));
        }
    }
    lines
}
