/// Planar Core Library - 2D transform pipeline for line drawing
///
/// This library maps object-space points through model, view, projection
/// and viewport matrices into device pixels, and holds the interactive
/// state (zoom, rotation, projection mode) that drives those matrices.

pub mod controller;
pub mod error;
pub mod geometry;
pub mod pipeline;
pub mod projection;
pub mod stack;
pub mod transform;

// Re-export commonly used types
pub use controller::{Controller, ControllerSettings, InputEvent, InteractiveState};
pub use error::TransformError;
pub use geometry::{test_grid, GridLine, Rgb};
pub use pipeline::{LineSink, Painter, TransformContext, VertexTrace};
pub use projection::{
    CameraParams, ModePreset, OrthoBounds, Projection, ProjectionMode, ViewportParams,
};
pub use stack::{ModelScope, ModelStack, SavePoint};
pub use transform::{format_matrix, Compose};
