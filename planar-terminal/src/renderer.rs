/// ASCII line rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::Point2;
use planar_core::{LineSink, Rgb, ViewportParams};
use std::io::Write;

/// Character grid that device-space lines are rasterized into.
///
/// Device pixels (the viewport's `width x height` surface) are scaled
/// down onto `columns x rows` terminal cells.
pub struct LineRenderer {
    columns: usize,
    rows: usize,
    surface: ViewportParams,
    char_buffer: Vec<char>,
    color_buffer: Vec<Color>,
}

impl LineRenderer {
    pub fn new(columns: usize, rows: usize, surface: ViewportParams) -> Self {
        let size = columns * rows;
        Self {
            columns,
            rows,
            surface,
            char_buffer: vec![' '; size],
            color_buffer: vec![Color::Reset; size],
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn resize(&mut self, columns: usize, rows: usize) {
        *self = Self::new(columns, rows, self.surface);
    }

    pub fn clear(&mut self) {
        self.char_buffer.fill(' ');
        self.color_buffer.fill(Color::Reset);
    }

    /// Terminal cell under a device-space point
    pub fn to_cell(&self, p: Point2<f32>) -> (f32, f32) {
        (
            p.x / self.surface.width * self.columns as f32,
            p.y / self.surface.height * self.rows as f32,
        )
    }

    /// Device-space point at the centre of a terminal cell
    pub fn to_surface(&self, column: u16, row: u16) -> Point2<f32> {
        Point2::new(
            (column as f32 + 0.5) / self.columns.max(1) as f32 * self.surface.width,
            (row as f32 + 0.5) / self.rows.max(1) as f32 * self.surface.height,
        )
    }

    pub fn cell(&self, column: usize, row: usize) -> Option<char> {
        (column < self.columns && row < self.rows)
            .then(|| self.char_buffer[row * self.columns + column])
    }

    fn plot(&mut self, x: i64, y: i64, glyph: char, color: Color) {
        if x < 0 || y < 0 || x >= self.columns as i64 || y >= self.rows as i64 {
            return;
        }
        let idx = y as usize * self.columns + x as usize;
        self.char_buffer[idx] = glyph;
        self.color_buffer[idx] = color;
    }

    /// Bresenham over the clipped segment, in cell space
    fn rasterize(&mut self, from: (f32, f32), to: (f32, f32), color: Color) {
        let bounds = (self.columns as f32, self.rows as f32);
        let Some(((x0, y0), (x1, y1))) = clip_segment(from, to, bounds) else {
            return;
        };
        let glyph = line_glyph(x1 - x0, y1 - y0);

        let (mut x, mut y) = (x0.floor() as i64, y0.floor() as i64);
        let (x_end, y_end) = (x1.floor() as i64, y1.floor() as i64);
        let dx = (x_end - x).abs();
        let dy = -(y_end - y).abs();
        let sx = if x < x_end { 1 } else { -1 };
        let sy = if y < y_end { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.plot(x, y, glyph, color);
            if x == x_end && y == y_end {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut active = None;
        for y in 0..self.rows {
            for x in 0..self.columns {
                let idx = y * self.columns + x;
                let color = self.color_buffer[idx];
                if active != Some(color) {
                    writer.queue(SetForegroundColor(color))?;
                    active = Some(color);
                }
                writer.queue(Print(self.char_buffer[idx]))?;
            }
            if y + 1 < self.rows {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl LineSink for LineRenderer {
    type Color = Color;

    fn line(&mut self, from: Point2<f32>, to: Point2<f32>, color: Color) {
        let from = self.to_cell(from);
        let to = self.to_cell(to);
        self.rasterize(from, to, color);
    }
}

/// Nearest terminal color for a pattern stroke
pub fn stroke_color(rgb: Rgb) -> Color {
    match (rgb.r > 0.5, rgb.g > 0.5, rgb.b > 0.5) {
        (true, false, false) => Color::Red,
        (true, true, false) => Color::Yellow,
        (true, false, true) => Color::Magenta,
        (true, true, true) => Color::White,
        (false, true, false) => Color::Green,
        (false, false, true) => Color::Blue,
        (false, true, true) => Color::Cyan,
        (false, false, false) => Color::DarkGrey,
    }
}

/// Pick a glyph from the direction of a cell-space segment (+y down).
fn line_glyph(dx: f32, dy: f32) -> char {
    let (ax, ay) = (dx.abs(), dy.abs());
    if ay <= ax * 0.5 {
        '-'
    } else if ax <= ay * 0.5 {
        '|'
    } else if (dx > 0.0) == (dy > 0.0) {
        '\\'
    } else {
        '/'
    }
}

/// Liang-Barsky clip against `[0, w) x [0, h)`.
fn clip_segment(
    from: (f32, f32),
    to: (f32, f32),
    bounds: (f32, f32),
) -> Option<((f32, f32), (f32, f32))> {
    if ![from.0, from.1, to.0, to.1].iter().all(|v| v.is_finite()) {
        return None;
    }

    let (max_x, max_y) = (bounds.0 - 1e-3, bounds.1 - 1e-3);
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    let mut t0 = 0.0f32;
    let mut t1 = 1.0f32;

    for (p, q) in [
        (-dx, from.0),
        (dx, max_x - from.0),
        (-dy, from.1),
        (dy, max_y - from.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }

    Some((
        (from.0 + t0 * dx, from.1 + t0 * dy),
        (from.0 + t1 * dx, from.1 + t1 * dy),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> LineRenderer {
        LineRenderer::new(64, 32, ViewportParams::new(640, 640))
    }

    #[test]
    fn test_horizontal_line_fills_row() {
        let mut r = renderer();
        r.line(Point2::new(0.0, 320.0), Point2::new(639.0, 320.0), Color::Red);
        for x in 0..64 {
            assert_eq!(r.cell(x, 16), Some('-'));
        }
        assert_eq!(r.cell(0, 15), Some(' '));
    }

    #[test]
    fn test_vertical_line_glyph() {
        let mut r = renderer();
        r.line(Point2::new(320.0, 0.0), Point2::new(320.0, 639.0), Color::Red);
        assert_eq!(r.cell(32, 0), Some('|'));
        assert_eq!(r.cell(32, 31), Some('|'));
    }

    #[test]
    fn test_offscreen_line_is_clipped() {
        let mut r = renderer();
        r.line(Point2::new(-1e9, -50.0), Point2::new(1e9, -50.0), Color::Red);
        assert!(r.char_buffer.iter().all(|&c| c == ' '));

        r.line(Point2::new(-1e4, 100.0), Point2::new(1e4, 100.0), Color::Red);
        assert_eq!(r.cell(0, 5), Some('-'));
        assert_eq!(r.cell(63, 5), Some('-'));
    }

    #[test]
    fn test_nan_line_is_ignored() {
        let mut r = renderer();
        r.line(Point2::new(f32::NAN, 0.0), Point2::new(10.0, 10.0), Color::Red);
        assert!(r.char_buffer.iter().all(|&c| c == ' '));
    }

    #[test]
    fn test_cell_surface_round_trip() {
        let r = renderer();
        let p = r.to_surface(10, 20);
        let (cx, cy) = r.to_cell(p);
        assert_eq!((cx.floor(), cy.floor()), (10.0, 20.0));
    }

    #[test]
    fn test_clear_resets_buffer() {
        let mut r = renderer();
        r.line(Point2::new(0.0, 0.0), Point2::new(639.0, 639.0), Color::Red);
        r.clear();
        assert!(r.char_buffer.iter().all(|&c| c == ' '));
    }

    #[test]
    fn test_stroke_colors() {
        assert_eq!(stroke_color(Rgb::new(1.0, 0.0, 0.0)), Color::Red);
        assert_eq!(stroke_color(Rgb::new(1.0, 1.0, 1.0)), Color::White);
    }

    #[test]
    fn test_draw_writes_every_cell() {
        let r = LineRenderer::new(4, 2, ViewportParams::new(640, 640));
        let mut out = Vec::new();
        r.draw(&mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("    \r\n"));
    }
}
