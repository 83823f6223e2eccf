/// Model matrix stack for nested local coordinate frames
use std::ops::{Deref, DerefMut};

use nalgebra::Matrix4;

use crate::error::TransformError;
use crate::transform::{rotation, translation, uniform_scale};

/// Save/restore stack of model matrices.
///
/// `current` is the active model matrix; `saved` holds the frames pushed
/// above it. Local operations compose onto `current` so that the most
/// recent call acts first on a point.
#[derive(Debug, Clone)]
pub struct ModelStack {
    current: Matrix4<f32>,
    saved: Vec<Matrix4<f32>>,
}

impl ModelStack {
    pub fn new() -> Self {
        Self {
            current: Matrix4::identity(),
            saved: Vec::new(),
        }
    }

    pub fn current(&self) -> &Matrix4<f32> {
        &self.current
    }

    /// Number of unmatched pushes
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    pub fn push(&mut self) {
        self.saved.push(self.current);
    }

    /// Restore the last pushed matrix. On an empty stack nothing changes.
    pub fn pop(&mut self) -> Result<(), TransformError> {
        match self.saved.pop() {
            Some(previous) => {
                self.current = previous;
                Ok(())
            }
            None => {
                tracing::warn!("the model matrix stack is empty, pop ignored");
                Err(TransformError::StackUnderflow)
            }
        }
    }

    /// Drop all saved frames and return to identity.
    pub fn reset(&mut self) {
        self.saved.clear();
        self.current = Matrix4::identity();
    }

    /// Compose `local` so it is applied before the accumulated transform.
    pub fn apply(&mut self, local: &Matrix4<f32>) {
        self.current *= local;
    }

    pub fn rotate(&mut self, theta: f32) {
        self.apply(&rotation(theta));
    }

    pub fn scale(&mut self, s: f32) {
        self.apply(&uniform_scale(s));
    }

    pub fn translate(&mut self, tx: f32, ty: f32) {
        self.apply(&translation(tx, ty));
    }

    /// Push and return a marker for [`restore`](Self::restore).
    pub fn save(&mut self) -> SavePoint {
        let depth = self.depth();
        self.push();
        SavePoint { depth }
    }

    /// Unwind to `point`: drop every frame pushed since, including any the
    /// caller left unmatched, and bring back the matrix current at `save`.
    pub fn restore(&mut self, point: SavePoint) {
        let unmatched = self.depth().saturating_sub(point.depth + 1);
        if unmatched > 0 {
            tracing::warn!(unmatched, "discarding unmatched model pushes");
        }

        if self.saved.len() > point.depth {
            self.current = self.saved[point.depth];
            self.saved.truncate(point.depth);
        } else {
            tracing::warn!("save point was already popped, model left unchanged");
        }
    }

    /// Save now, restore when the returned guard is dropped.
    pub fn scope(&mut self) -> ModelScope<'_> {
        let point = self.save();
        ModelScope {
            stack: self,
            point: Some(point),
        }
    }

    /// Run `f` between a push and its matching pop.
    pub fn with_pushed<R>(&mut self, f: impl FnOnce(&mut ModelStack) -> R) -> R {
        let mut scope = self.scope();
        f(&mut *scope)
    }
}

impl Default for ModelStack {
    fn default() -> Self {
        Self::new()
    }
}

/// Depth marker returned by [`ModelStack::save`]
#[derive(Debug, PartialEq, Eq)]
pub struct SavePoint {
    depth: usize,
}

/// Guard returned by [`ModelStack::scope`]
pub struct ModelScope<'a> {
    stack: &'a mut ModelStack,
    point: Option<SavePoint>,
}

impl Deref for ModelScope<'_> {
    type Target = ModelStack;

    fn deref(&self) -> &ModelStack {
        self.stack
    }
}

impl DerefMut for ModelScope<'_> {
    fn deref_mut(&mut self) -> &mut ModelStack {
        self.stack
    }
}

impl Drop for ModelScope<'_> {
    fn drop(&mut self) {
        if let Some(point) = self.point.take() {
            self.stack.restore(point);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::transform_point;
    use nalgebra::Vector3;

    fn map(stack: &ModelStack, x: f32, y: f32) -> (f32, f32) {
        let p = transform_point(stack.current(), &Vector3::new(x, y, 1.0));
        (p.x, p.y)
    }

    #[test]
    fn test_push_pop_restores() {
        let mut stack = ModelStack::new();
        stack.translate(5.0, 0.0);
        let before = *stack.current();

        for n in 1..=4 {
            stack.push();
            stack.rotate(0.5 * n as f32);
            stack.scale(2.0);
        }
        for _ in 0..4 {
            stack.pop().unwrap();
        }

        assert_eq!(*stack.current(), before);
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn test_pop_on_empty_is_noop() {
        let mut stack = ModelStack::new();
        assert_eq!(stack.pop(), Err(TransformError::StackUnderflow));
        assert_eq!(*stack.current(), Matrix4::identity());

        stack.translate(1.0, 2.0);
        let before = *stack.current();
        assert!(stack.pop().is_err());
        assert_eq!(*stack.current(), before);
    }

    #[test]
    fn test_most_recent_operation_acts_first() {
        let mut stack = ModelStack::new();
        stack.translate(10.0, 0.0);
        stack.scale(2.0);

        // scale first, then translate
        let (x, y) = map(&stack, 1.0, 1.0);
        assert!((x - 12.0).abs() < 1e-5);
        assert!((y - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_scope_pops_on_drop() {
        let mut stack = ModelStack::new();
        {
            let mut scope = stack.scope();
            scope.translate(3.0, 4.0);
            assert_eq!(scope.depth(), 1);
            assert_eq!(map(&scope, 0.0, 0.0), (3.0, 4.0));
        }
        assert_eq!(stack.depth(), 0);
        assert_eq!(*stack.current(), Matrix4::identity());
    }

    #[test]
    fn test_with_pushed_restores_on_early_return() {
        fn draw(stack: &mut ModelStack, bail: bool) -> Result<(), TransformError> {
            stack.with_pushed(|s| {
                s.translate(1.0, 1.0);
                if bail {
                    return Err(TransformError::InvalidZoom(0.0));
                }
                s.rotate(1.0);
                Ok(())
            })
        }

        let mut stack = ModelStack::new();
        assert!(draw(&mut stack, true).is_err());
        assert!(draw(&mut stack, false).is_ok());
        assert_eq!(stack.depth(), 0);
        assert_eq!(*stack.current(), Matrix4::identity());
    }

    #[test]
    fn test_scope_discards_unmatched_inner_push() {
        let mut stack = ModelStack::new();
        {
            let mut scope = stack.scope();
            scope.translate(3.0, 4.0);
            scope.push();
            scope.scale(2.0);
        }
        assert_eq!(stack.depth(), 0);
        assert_eq!(*stack.current(), Matrix4::identity());
    }

    #[test]
    fn test_restore_returns_to_saved_depth() {
        let mut stack = ModelStack::new();
        stack.push();
        stack.translate(1.0, 0.0);
        let outer = *stack.current();

        let point = stack.save();
        stack.rotate(1.0);
        stack.push();
        stack.push();
        stack.restore(point);

        assert_eq!(stack.depth(), 1);
        assert_eq!(*stack.current(), outer);
    }

    #[test]
    fn test_restore_after_body_popped_past_it() {
        let mut stack = ModelStack::new();
        stack.translate(2.0, 2.0);
        let point = stack.save();
        stack.pop().unwrap();
        stack.scale(5.0);
        let after = *stack.current();

        stack.restore(point);
        assert_eq!(stack.depth(), 0);
        assert_eq!(*stack.current(), after);
    }

    #[test]
    fn test_reset_clears_saved_frames() {
        let mut stack = ModelStack::new();
        stack.push();
        stack.push();
        stack.scale(3.0);
        stack.reset();
        assert_eq!(stack.depth(), 0);
        assert_eq!(*stack.current(), Matrix4::identity());
    }
}
