/// What gets drawn each frame: the calibration pattern or the demo scene
use crossterm::style::Color;
use planar_core::{test_grid, LineSink, Painter};
use std::f32::consts::FRAC_PI_2;

use crate::renderer::stroke_color;

/// Grid sizes drawn together so every projection mode shows something.
pub const PATTERN_SCALES: [f32; 3] = [1000.0, 100.0, 1.0];

pub fn draw_test_pattern<S: LineSink<Color = Color>>(painter: &mut Painter<'_, S>) {
    for scale in PATTERN_SCALES {
        for line in test_grid(scale) {
            painter.line(line.from.x, line.from.y, line.to.x, line.to.y, stroke_color(line.color));
        }
    }
}

const BLADE: [(f32, f32); 4] = [(0.0, 0.0), (30.0, 20.0), (160.0, 10.0), (160.0, -10.0)];
const TOWER: [(f32, f32); 4] = [(-50.0, -260.0), (50.0, -260.0), (15.0, 60.0), (-15.0, 60.0)];
const UNIT_SQUARE: [(f32, f32); 4] = [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)];

/// A windmill whose blades turn with `spin` (radians).
///
/// Every part is drawn in its own local frame: tower in world space, hub
/// relative to the tower top, blades relative to the hub, and a lamp
/// spinning at each blade tip.
pub fn draw_scene<S: LineSink<Color = Color>>(painter: &mut Painter<'_, S>, spin: f32) {
    painter.line(-320.0, -260.0, 320.0, -260.0, Color::DarkGreen);
    painter.polygon(&TOWER, Color::Grey);

    painter.nested(|p| {
        p.model().translate(0.0, 80.0);
        p.model().rotate(spin);

        p.nested(|hub| {
            hub.model().scale(24.0);
            hub.polygon(&UNIT_SQUARE, Color::White);
        });

        for k in 0..4 {
            p.nested(|blade| {
                blade.model().rotate(k as f32 * FRAC_PI_2);
                blade.polygon(&BLADE, Color::Cyan);

                blade.nested(|lamp| {
                    lamp.model().translate(170.0, 0.0);
                    lamp.model().rotate(-2.0 * spin);
                    lamp.model().scale(16.0);
                    lamp.polygon(&UNIT_SQUARE, Color::Yellow);
                });
            });
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;
    use planar_core::TransformContext;

    #[derive(Default)]
    struct Count {
        lines: usize,
        colors: Vec<Color>,
    }

    impl LineSink for Count {
        type Color = Color;

        fn line(&mut self, _from: Point2<f32>, _to: Point2<f32>, color: Color) {
            self.lines += 1;
            self.colors.push(color);
        }
    }

    #[test]
    fn test_scene_balances_model_stack() {
        let ctx = TransformContext::identity();
        let mut sink = Count::default();
        let mut painter = Painter::new(&ctx, &mut sink);
        draw_scene(&mut painter, 0.7);
        assert_eq!(painter.finish(), 0);

        // ground + tower + hub + 4 blades + 4 lamps
        assert_eq!(sink.lines, 1 + 4 + 4 + 4 * 4 + 4 * 4);
    }

    #[test]
    fn test_pattern_draws_all_scales() {
        let ctx = TransformContext::identity();
        let mut sink = Count::default();
        let mut painter = Painter::new(&ctx, &mut sink);
        draw_test_pattern(&mut painter);
        assert_eq!(painter.finish(), 0);

        assert_eq!(sink.lines, PATTERN_SCALES.len() * test_grid(1.0).len());
        assert!(sink.colors.contains(&Color::Red));
        assert!(sink.colors.contains(&Color::White));
    }
}
