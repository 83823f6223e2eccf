/// Example: print the viewport matrix and its three reference points
///
/// Usage: cargo run --example viewport_check -- [width] [height]
///
/// For 640x640 the expected output is [320 320 1], [640 0 1] and [0 640 1].

use nalgebra::Vector3;
use planar_core::{format_matrix, ViewportParams};
use std::env;

fn main() {
    let args: Vec<String> = env::args().collect();
    let width = args.get(1).and_then(|a| a.parse().ok()).unwrap_or(640);
    let height = args.get(2).and_then(|a| a.parse().ok()).unwrap_or(640);

    let viewport = ViewportParams::new(width, height).viewport_matrix();
    print!("{}", format_matrix(&viewport));

    for (x, y) in [(0.0, 0.0), (1.0, 1.0), (-1.0, -1.0)] {
        let p = planar_core::transform::transform_point(&viewport, &Vector3::new(x, y, 1.0));
        println!("[ {} {} 1 ] -> [ {} {} {} ]", x, y, p.x, p.y, p.z);
    }
}
