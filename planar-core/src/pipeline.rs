/// Per-vertex evaluation of the model -> view -> projection -> viewport chain
use nalgebra::{Matrix4, Point2, Vector3};

use crate::stack::ModelStack;
use crate::transform::{format_matrix, transform_point, Compose};

/// Stage matrices for one frame, rebuilt from scratch every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformContext {
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
    pub viewport: Matrix4<f32>,
}

/// Source and result of one traced vertex
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexTrace {
    pub source: Point2<f32>,
    /// Device-space `(x, y, w)`; w stays 1 for affine stages.
    pub result: Vector3<f32>,
}

impl VertexTrace {
    pub fn device(&self) -> Point2<f32> {
        Point2::new(self.result.x, self.result.y)
    }
}

impl std::fmt::Display for VertexTrace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} --> {} {} {}",
            self.source.x, self.source.y, self.result.x, self.result.y, self.result.z
        )
    }
}

impl TransformContext {
    pub fn new(view: Matrix4<f32>, projection: Matrix4<f32>, viewport: Matrix4<f32>) -> Self {
        Self {
            view,
            projection,
            viewport,
        }
    }

    pub fn identity() -> Self {
        Self::new(Matrix4::identity(), Matrix4::identity(), Matrix4::identity())
    }

    /// Model, then view, then projection, then viewport.
    pub fn combined(&self, model: &Matrix4<f32>) -> Matrix4<f32> {
        model
            .then(&self.view)
            .then(&self.projection)
            .then(&self.viewport)
    }

    /// Map an object-space point to device pixels.
    pub fn vertex(&self, model: &Matrix4<f32>, x: f32, y: f32) -> Point2<f32> {
        self.evaluate(model, x, y).device()
    }

    /// Like [`vertex`](Self::vertex), additionally logging the mapping.
    pub fn trace_vertex(&self, model: &Matrix4<f32>, x: f32, y: f32) -> VertexTrace {
        let trace = self.evaluate(model, x, y);
        tracing::debug!("{}", trace);
        trace
    }

    /// Log all four matrices of the chain for `model`.
    pub fn dump(&self, model: &Matrix4<f32>) {
        tracing::debug!("model:\n{}", format_matrix(model));
        tracing::debug!("view:\n{}", format_matrix(&self.view));
        tracing::debug!("projection:\n{}", format_matrix(&self.projection));
        tracing::debug!("viewport:\n{}", format_matrix(&self.viewport));
    }

    fn evaluate(&self, model: &Matrix4<f32>, x: f32, y: f32) -> VertexTrace {
        let result = transform_point(&self.combined(model), &Vector3::new(x, y, 1.0));
        debug_assert!(
            (result.z - 1.0).abs() < 1e-3,
            "homogeneous w drifted to {} for ({}, {})",
            result.z,
            x,
            y
        );
        VertexTrace {
            source: Point2::new(x, y),
            result,
        }
    }
}

impl Default for TransformContext {
    fn default() -> Self {
        Self::identity()
    }
}

/// Receiver for finished device-space lines
pub trait LineSink {
    type Color: Copy;

    fn line(&mut self, from: Point2<f32>, to: Point2<f32>, color: Self::Color);
}

/// One render pass: the frame's stage matrices plus its model stack.
pub struct Painter<'a, S: LineSink> {
    context: &'a TransformContext,
    model: ModelStack,
    sink: &'a mut S,
    debug: bool,
}

impl<'a, S: LineSink> Painter<'a, S> {
    pub fn new(context: &'a TransformContext, sink: &'a mut S) -> Self {
        Self {
            context,
            model: ModelStack::new(),
            sink,
            debug: false,
        }
    }

    /// Trace every emitted vertex at debug level.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn model(&mut self) -> &mut ModelStack {
        &mut self.model
    }

    /// Run `f` in a saved model frame; on return the model stack is
    /// unwound to where it was, even if `f` left pushes unmatched.
    pub fn nested<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let point = self.model.save();
        let result = f(self);
        self.model.restore(point);
        result
    }

    pub fn vertex(&self, x: f32, y: f32) -> Point2<f32> {
        if self.debug {
            self.context.trace_vertex(self.model.current(), x, y).device()
        } else {
            self.context.vertex(self.model.current(), x, y)
        }
    }

    pub fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: S::Color) {
        let from = self.vertex(x0, y0);
        let to = self.vertex(x1, y1);
        self.sink.line(from, to, color);
    }

    /// Closed outline through `points` in object space.
    pub fn polygon(&mut self, points: &[(f32, f32)], color: S::Color) {
        for (i, &(x0, y0)) in points.iter().enumerate() {
            let (x1, y1) = points[(i + 1) % points.len()];
            self.line(x0, y0, x1, y1, color);
        }
    }

    /// Unbalanced pushes left at the end of the pass
    pub fn finish(self) -> usize {
        let depth = self.model.depth();
        if depth > 0 {
            tracing::warn!(depth, "render pass ended with unbalanced model pushes");
        }
        depth
    }
}
