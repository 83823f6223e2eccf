/// Stage matrix builders: viewport, camera (view) and orthographic projection
use nalgebra::{Matrix4, Vector2, Vector3};

use crate::error::TransformError;
use crate::transform::{scale, translation, uniform_scale, Compose};

const EPSILON: f32 = 1e-6;

/// Output surface size in device pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportParams {
    pub width: f32,
    pub height: f32,
}

impl ViewportParams {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
        }
    }

    /// Map NDC `[-1, 1]²` to device pixels with +y pointing down.
    ///
    /// Scale by `(width/2, -height/2)` first, then translate by
    /// `(width/2, height/2)`.
    pub fn viewport_matrix(&self) -> Matrix4<f32> {
        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;

        let scale_and_flip_y = scale(half_w, -half_h);
        let to_corner = translation(half_w, half_h);

        scale_and_flip_y.then(&to_corner)
    }
}

impl Default for ViewportParams {
    fn default() -> Self {
        Self::new(640, 640)
    }
}

/// Camera configuration for the world -> camera transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraParams {
    pub up: Vector3<f32>,
    pub centre: Vector3<f32>,
    pub zoom: f32,
}

impl CameraParams {
    pub fn new(up: Vector3<f32>, centre: Vector3<f32>, zoom: f32) -> Self {
        Self { up, centre, zoom }
    }

    /// Create the view matrix: `basis · scale · translate_to_centre`.
    ///
    /// A smaller zoom magnifies. The up-vector is normalized in the plane
    /// (its w component is ignored) before it becomes the basis.
    pub fn view_matrix(&self) -> Result<Matrix4<f32>, TransformError> {
        // also rejects NaN
        if !(self.zoom > EPSILON) || self.zoom.is_infinite() {
            return Err(TransformError::InvalidZoom(self.zoom));
        }

        let up = Vector2::new(self.up.x, self.up.y);
        if !up.norm().is_finite() || up.norm() < EPSILON {
            return Err(TransformError::DegenerateUpVector);
        }
        let up = up.normalize();

        let translate_to_centre = translation(-self.centre.x, -self.centre.y);
        let zoom = uniform_scale(1.0 / self.zoom);
        #[rustfmt::skip]
        let basis = Matrix4::new(
            up.y, -up.x, 0.0, 0.0,
            up.x,  up.y, 0.0, 0.0,
            0.0,   0.0,  1.0, 0.0,
            0.0,   0.0,  0.0, 1.0,
        );

        Ok(translate_to_centre.then(&zoom).then(&basis))
    }
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            up: Vector3::new(0.0, 1.0, 1.0),
            centre: Vector3::new(0.0, 0.0, 1.0),
            zoom: 1.0,
        }
    }
}

/// World rectangle mapped onto the NDC square
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthoBounds {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
}

impl OrthoBounds {
    pub const fn new(left: f32, right: f32, bottom: f32, top: f32) -> Self {
        Self {
            left,
            right,
            bottom,
            top,
        }
    }

    /// Create the orthographic matrix: move the rectangle's centre to the
    /// origin, then scale it to a 2x2 square. Swapped bounds mirror the axis.
    pub fn projection_matrix(&self) -> Result<Matrix4<f32>, TransformError> {
        let width = self.right - self.left;
        let height = self.top - self.bottom;
        let finite = width.is_finite() && height.is_finite();
        if !finite || width.abs() < EPSILON || height.abs() < EPSILON {
            return Err(TransformError::DegenerateBounds {
                left: self.left,
                right: self.right,
                bottom: self.bottom,
                top: self.top,
            });
        }

        let move_to_centre = translation(
            -((self.left + self.right) / 2.0),
            -((self.top + self.bottom) / 2.0),
        );
        let to_unit = scale(2.0 / width, 2.0 / height);

        Ok(move_to_centre.then(&to_unit))
    }
}

/// What a projection mode feeds into the projection stage
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// World coordinates are already NDC.
    PassThrough,
    Ortho(OrthoBounds),
}

impl Projection {
    pub fn matrix(&self) -> Result<Matrix4<f32>, TransformError> {
        match self {
            Projection::PassThrough => Ok(Matrix4::identity()),
            Projection::Ortho(bounds) => bounds.projection_matrix(),
        }
    }
}

/// Projection mode for rendering, cycled by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProjectionMode {
    Identity,
    #[default]
    CenterSquare,
    BottomLeftSquare,
    FlipX,
    Aspect,
}

/// Per-mode parameters, looked up by `ProjectionMode::preset`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModePreset {
    pub name: &'static str,
    pub projection: Projection,
    /// World extent swept by the pointer across the surface when panning.
    pub pointer_range: f32,
    /// Horizontal axis is mirrored: pointer pan and rotation keys invert.
    pub mirrored: bool,
}

static PRESETS: [ModePreset; 5] = [
    ModePreset {
        name: "IDENTITY",
        projection: Projection::PassThrough,
        pointer_range: 2.0,
        mirrored: false,
    },
    ModePreset {
        name: "CENTER_SQUARE",
        projection: Projection::Ortho(OrthoBounds::new(-320.0, 320.0, -320.0, 320.0)),
        pointer_range: 640.0,
        mirrored: false,
    },
    ModePreset {
        name: "BOTTOM_LEFT_SQUARE",
        projection: Projection::Ortho(OrthoBounds::new(0.0, 640.0, 0.0, 640.0)),
        pointer_range: 640.0,
        mirrored: false,
    },
    ModePreset {
        name: "FLIP_X",
        projection: Projection::Ortho(OrthoBounds::new(320.0, -320.0, -320.0, 320.0)),
        pointer_range: 640.0,
        mirrored: true,
    },
    ModePreset {
        name: "ASPECT",
        projection: Projection::Ortho(OrthoBounds::new(-320.0, 320.0, -100.0, 100.0)),
        pointer_range: 640.0,
        mirrored: false,
    },
];

impl ProjectionMode {
    /// Cycling order
    pub const ALL: [ProjectionMode; 5] = [
        ProjectionMode::Identity,
        ProjectionMode::CenterSquare,
        ProjectionMode::BottomLeftSquare,
        ProjectionMode::FlipX,
        ProjectionMode::Aspect,
    ];

    pub fn preset(self) -> &'static ModePreset {
        &PRESETS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.preset().name
    }

    pub fn next(self) -> Self {
        Self::ALL[(self as usize + 1) % Self::ALL.len()]
    }

    pub fn projection_matrix(self) -> Result<Matrix4<f32>, TransformError> {
        self.preset().projection.matrix()
    }
}

impl std::fmt::Display for ProjectionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
