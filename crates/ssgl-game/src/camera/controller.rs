//! Free-roaming camera with keyboard movement, stepwise zoom and mouse look

use glam::{Mat4, Quat, Vec3};

use crate::error::CameraError;
use crate::input::{InputAction, InputState};

use super::{CameraConfig, Frustum};

/// Shortest accepted look/up vector before normalizing
const MIN_VECTOR_LENGTH: f32 = 1e-6;

/// Largest |direction · up| the camera accepts. Closer to 1.0 and the
/// side axis `up × direction` stops being usable.
const MAX_UP_ALIGNMENT: f32 = 0.9995;

/// Free-roaming camera.
///
/// Holds a position and a unit look direction, moves on a plane
/// perpendicular to the fixed up vector, and recomputes its view matrix
/// and frustum on every [`Camera::update`].
#[derive(Debug, Clone)]
pub struct Camera {
    config: CameraConfig,
    position: Vec3,
    /// Unit look direction
    direction: Vec3,
    /// Unit up vector, fixed at construction
    up: Vec3,
    aspect_ratio: f32,
    projection: Mat4,
    view: Mat4,
    frustum: Frustum,
    /// Input from the previous frame, for key edges and mouse deltas
    previous_input: Option<InputState>,
}

impl Camera {
    /// Create a camera with the default config
    pub fn new(position: Vec3, target: Vec3, up: Vec3, aspect_ratio: f32) -> Result<Self, CameraError> {
        Self::with_config(position, target, up, aspect_ratio, CameraConfig::default())
    }

    /// Create a camera looking from `position` towards `target`.
    ///
    /// The initial look direction is tilted down by the config's
    /// `initial_pitch_degrees`.
    pub fn with_config(
        position: Vec3,
        target: Vec3,
        up: Vec3,
        aspect_ratio: f32,
        config: CameraConfig,
    ) -> Result<Self, CameraError> {
        config.validate()?;
        validate_aspect_ratio(aspect_ratio)?;

        let look = target - position;
        if !look.is_finite() || look.length() < MIN_VECTOR_LENGTH {
            return Err(CameraError::DegenerateLookDirection);
        }
        if !up.is_finite() || up.length() < MIN_VECTOR_LENGTH {
            return Err(CameraError::DegenerateUpVector);
        }
        let direction = look.normalize();
        let up = up.normalize();
        if direction.dot(up).abs() > MAX_UP_ALIGNMENT {
            return Err(CameraError::LookParallelToUp);
        }

        let projection = perspective(&config, aspect_ratio);
        let mut camera = Self {
            position,
            direction,
            up,
            aspect_ratio,
            projection,
            view: Mat4::IDENTITY,
            frustum: Frustum::from_view_projection(projection),
            previous_input: None,
            config,
        };

        // Tilt towards a more top-down view
        camera.rotate_pitch(camera.config.initial_pitch_degrees.to_radians());
        camera.refresh();

        tracing::debug!(
            "Camera created at {:?} looking {:?} (aspect {:.3})",
            camera.position,
            camera.direction,
            camera.aspect_ratio
        );
        Ok(camera)
    }

    /// Record the host's current input so the first update sees no
    /// spurious key presses or mouse jump
    pub fn initialize(&mut self, input: &InputState) {
        self.previous_input = Some(input.clone());
    }

    // ===== GETTERS =====

    /// Camera world position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Unit look direction
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Unit up vector
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Height of the camera along the up axis
    pub fn height(&self) -> f32 {
        self.position.dot(self.up)
    }

    /// View matrix, recomputed on every update
    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    /// Projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    /// Combined view-projection matrix (projection * view)
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection * self.view
    }

    /// Frustum planes for culling, recomputed on every update
    pub fn frustum(&self) -> &Frustum {
        &self.frustum
    }

    pub fn near(&self) -> f32 {
        self.config.near
    }

    pub fn far(&self) -> f32 {
        self.config.far
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    // ===== PER-FRAME =====

    /// Apply one frame of input.
    ///
    /// `elapsed` is the frame time in seconds. The view matrix and frustum
    /// are rebuilt even when nothing moved.
    pub fn update(&mut self, input: &InputState, elapsed: f32) {
        let previous = self
            .previous_input
            .take()
            .unwrap_or_else(|| input.clone());

        self.apply_movement(input, elapsed);

        if input.pressed_since(&previous, InputAction::ZoomIn) {
            self.zoom_in();
        }
        if input.pressed_since(&previous, InputAction::ZoomOut) {
            self.zoom_out();
        }

        if input.is_held(InputAction::FreeLook) {
            let delta = input.mouse_delta_since(&previous);
            if delta.x != 0.0 {
                self.rotate_yaw(delta.x * self.config.yaw_sensitivity);
            }
            if delta.y != 0.0 {
                self.rotate_pitch(delta.y * self.config.pitch_sensitivity);
            }
        }

        self.refresh();
        self.previous_input = Some(input.clone());
    }

    fn apply_movement(&mut self, input: &InputState, elapsed: f32) {
        let side = self.horizontal(self.up.cross(self.direction));
        let forward = self.horizontal(side.cross(self.up));

        let mut offset = Vec3::ZERO;
        if input.is_held(InputAction::MoveLeft) {
            offset += side;
        }
        if input.is_held(InputAction::MoveRight) {
            offset -= side;
        }
        if input.is_held(InputAction::MoveForward) {
            offset += forward;
        }
        if input.is_held(InputAction::MoveBackward) {
            offset -= forward;
        }

        self.position += offset * (self.config.move_speed * elapsed);
    }

    /// Unit vector with the component along `up` removed
    fn horizontal(&self, v: Vec3) -> Vec3 {
        (v - self.up * v.dot(self.up)).normalize_or_zero()
    }

    /// Halve the height, never dropping below the zoom floor
    pub fn zoom_in(&mut self) {
        let height = self.height();
        if height > self.config.zoom_floor {
            let target = (height * 0.5).max(self.config.zoom_floor);
            self.set_height(target);
            tracing::debug!("Camera zoom in: height {height} -> {target}");
        }
    }

    /// Double the height, never rising above the zoom ceiling.
    ///
    /// Only the upper bound is clamped: a camera below the floor keeps
    /// doubling from where it is.
    pub fn zoom_out(&mut self) {
        let height = self.height();
        if height < self.config.zoom_ceiling {
            let target = (height * 2.0).min(self.config.zoom_ceiling);
            self.set_height(target);
            tracing::debug!("Camera zoom out: height {height} -> {target}");
        }
    }

    fn set_height(&mut self, height: f32) {
        self.position += self.up * (height - self.height());
    }

    /// Turn the look direction around the up axis
    pub fn rotate_yaw(&mut self, angle: f32) {
        self.direction = (Quat::from_axis_angle(self.up, angle) * self.direction).normalize();
    }

    /// Tilt the look direction around the side axis; positive looks down.
    ///
    /// The resulting elevation is clamped so the direction never reaches
    /// or swings past the up axis. Returns `false` when the direction did
    /// not change.
    pub fn rotate_pitch(&mut self, angle: f32) -> bool {
        let axis = self.up.cross(self.direction);
        if axis.length() < MIN_VECTOR_LENGTH {
            return false;
        }

        let max_elevation = MAX_UP_ALIGNMENT.asin();
        let elevation = self.direction.dot(self.up).clamp(-1.0, 1.0).asin();
        let target = (elevation - angle).clamp(-max_elevation, max_elevation);
        let applied = elevation - target;
        if applied == 0.0 {
            tracing::trace!("Camera pitch of {angle} rad dropped at the pitch limit");
            return false;
        }
        if applied != angle {
            tracing::trace!("Camera pitch of {angle} rad clamped to {applied} rad");
        }

        self.direction = (Quat::from_axis_angle(axis.normalize(), applied) * self.direction).normalize();
        true
    }

    // ===== VIEWPORT =====

    /// Rebuild the projection for a resized viewport
    pub fn set_viewport(&mut self, width: u32, height: u32) -> Result<(), CameraError> {
        if width == 0 || height == 0 {
            return Err(CameraError::InvalidViewport { width, height });
        }
        self.set_aspect_ratio(width as f32 / height as f32)
    }

    /// Rebuild the projection for a new aspect ratio
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) -> Result<(), CameraError> {
        validate_aspect_ratio(aspect_ratio)?;
        self.aspect_ratio = aspect_ratio;
        self.projection = perspective(&self.config, aspect_ratio);
        self.refresh();
        tracing::debug!("Camera aspect ratio set to {aspect_ratio:.3}");
        Ok(())
    }

    /// Rebuild the view matrix and frustum from the current state
    fn refresh(&mut self) {
        self.view = Mat4::look_at_rh(self.position, self.position + self.direction, self.up);
        self.frustum = Frustum::from_view_projection(self.projection * self.view);
    }
}

fn perspective(config: &CameraConfig, aspect_ratio: f32) -> Mat4 {
    Mat4::perspective_rh(config.fov_radians(), aspect_ratio, config.near, config.far)
}

fn validate_aspect_ratio(aspect_ratio: f32) -> Result<(), CameraError> {
    if aspect_ratio.is_finite() && aspect_ratio > 0.0 {
        Ok(())
    } else {
        Err(CameraError::InvalidAspectRatio(aspect_ratio))
    }
}
