/// Interactive zoom/rotation/projection state driven by discrete input events
use nalgebra::{Point2, Vector3};

use crate::error::TransformError;
use crate::pipeline::TransformContext;
use crate::projection::{CameraParams, ProjectionMode, ViewportParams};
use crate::transform::{rotation, transform_point};

/// Decoded user commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputEvent {
    ZoomIn,
    ZoomOut,
    RotateLeft,
    RotateRight,
    Reset,
    CycleProjectionMode,
    ToggleTestMode,
}

/// Step sizes for zoom and rotation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerSettings {
    /// Multiplicative, must be > 1.
    pub zoom_step: f32,
    /// Additive, in radians.
    pub angle_step: f32,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            zoom_step: 1.1,
            angle_step: std::f32::consts::PI / 16.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractiveState {
    pub zoom: f32,
    /// Radians
    pub rotation: f32,
    pub mode: ProjectionMode,
    pub test_mode: bool,
}

impl Default for InteractiveState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            rotation: 0.0,
            mode: ProjectionMode::default(),
            test_mode: true,
        }
    }
}

/// Owns the interactive state and turns it into per-frame matrices.
#[derive(Debug, Clone, Default)]
pub struct Controller {
    state: InteractiveState,
    settings: ControllerSettings,
}

impl Controller {
    pub fn new(settings: ControllerSettings) -> Self {
        Self {
            state: InteractiveState::default(),
            settings,
        }
    }

    pub fn with_state(mut self, state: InteractiveState) -> Self {
        self.state = state;
        self
    }

    pub fn state(&self) -> &InteractiveState {
        &self.state
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    pub fn apply(&mut self, event: InputEvent) {
        let rotation_sign = if self.state.mode.preset().mirrored { -1.0 } else { 1.0 };

        match event {
            InputEvent::ZoomIn => self.state.zoom /= self.settings.zoom_step,
            InputEvent::ZoomOut => self.state.zoom *= self.settings.zoom_step,
            InputEvent::RotateRight => {
                self.state.rotation += rotation_sign * self.settings.angle_step
            }
            InputEvent::RotateLeft => {
                self.state.rotation -= rotation_sign * self.settings.angle_step
            }
            InputEvent::Reset => {
                self.state = InteractiveState {
                    test_mode: self.state.test_mode,
                    ..InteractiveState::default()
                };
                tracing::info!("reset");
            }
            InputEvent::CycleProjectionMode => {
                self.state.mode = self.state.mode.next();
                tracing::info!("projection mode: {}", self.state.mode);
            }
            InputEvent::ToggleTestMode => {
                self.state.test_mode = !self.state.test_mode;
                tracing::debug!(test_mode = self.state.test_mode, "toggled test mode");
            }
        }
    }

    pub fn apply_all(&mut self, events: impl IntoIterator<Item = InputEvent>) {
        for event in events {
            self.apply(event);
        }
    }

    /// Camera for a pointer at `pointer` (surface pixels).
    ///
    /// The pointer offset from the surface centre pans the camera across
    /// the mode's pointer range, scaled by zoom; centre and up are then
    /// rotated by the current rotation angle.
    pub fn camera_params(&self, pointer: Point2<f32>, viewport: &ViewportParams) -> CameraParams {
        let preset = self.state.mode.preset();
        let u = pointer.x / viewport.width - 0.5;
        let v = pointer.y / viewport.height - 0.5;

        let pan_x = u * preset.pointer_range * self.state.zoom;
        let pan_y = v * preset.pointer_range * self.state.zoom;
        let centre = Vector3::new(if preset.mirrored { -pan_x } else { pan_x }, -pan_y, 1.0);

        let rotate = rotation(self.state.rotation);
        CameraParams::new(
            transform_point(&rotate, &Vector3::new(0.0, 1.0, 1.0)),
            transform_point(&rotate, &centre),
            self.state.zoom,
        )
    }

    /// Rebuild all stage matrices for this frame.
    pub fn frame(
        &self,
        pointer: Point2<f32>,
        viewport: &ViewportParams,
    ) -> Result<TransformContext, TransformError> {
        let view = self.camera_params(pointer, viewport).view_matrix()?;
        let projection = self.state.mode.projection_matrix()?;
        Ok(TransformContext::new(view, projection, viewport.viewport_matrix()))
    }
}
