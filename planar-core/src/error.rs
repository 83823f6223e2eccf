/// Error categories for transform construction and model stack use.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    /// Orthographic rectangle with zero (or non-finite) width or height.
    #[error("degenerate projection bounds: left={left} right={right} bottom={bottom} top={top}")]
    DegenerateBounds {
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
    },

    /// Zoom of zero, near zero or non-finite; the view matrix divides by it.
    #[error("invalid zoom factor: {0}")]
    InvalidZoom(f32),

    /// Up-vector too short to normalize into a basis.
    #[error("camera up-vector cannot be normalized")]
    DegenerateUpVector,

    /// Pop on an empty model stack.
    #[error("the model matrix stack is empty")]
    StackUnderflow,
}
