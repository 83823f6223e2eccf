/// 2D affine transforms held in 4x4 homogeneous matrices
use nalgebra::{Matrix4, Vector3, Vector4};

/// Composition helper that keeps operand order visible at the call site.
pub trait Compose {
    /// Pre-apply `next`: the returned matrix maps `p` to `next(self(p))`.
    fn then(&self, next: &Matrix4<f32>) -> Matrix4<f32>;
}

impl Compose for Matrix4<f32> {
    fn then(&self, next: &Matrix4<f32>) -> Matrix4<f32> {
        next * self
    }
}

/// Multiply a homogeneous point `(x, y, w)` by `m`.
///
/// The point is embedded as `(x, y, 0, w)`, so translations live in the
/// fourth column and the third row/column stay inert.
pub fn transform_point(m: &Matrix4<f32>, p: &Vector3<f32>) -> Vector3<f32> {
    let r = m * Vector4::new(p.x, p.y, 0.0, p.z);
    Vector3::new(r.x, r.y, r.w)
}

/// Counter-clockwise rotation about the origin
pub fn rotation(theta: f32) -> Matrix4<f32> {
    let (s, c) = theta.sin_cos();
    #[rustfmt::skip]
    let m = Matrix4::new(
        c,  -s,  0.0, 0.0,
        s,   c,  0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    );
    m
}

pub fn scale(sx: f32, sy: f32) -> Matrix4<f32> {
    Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, 1.0))
}

pub fn uniform_scale(s: f32) -> Matrix4<f32> {
    scale(s, s)
}

pub fn translation(tx: f32, ty: f32) -> Matrix4<f32> {
    Matrix4::new_translation(&Vector3::new(tx, ty, 0.0))
}

/// Row-major dump of all 16 entries, one bracketed row per line.
pub fn format_matrix(m: &Matrix4<f32>) -> String {
    let mut out = String::new();
    for row in m.row_iter() {
        let cells: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        out.push_str(&format!("[ {} ]\n", cells.join(" ")));
    }
    out
}
