//! Camera configuration

use std::f32::consts::FRAC_PI_4;

use serde::{Deserialize, Serialize};

use crate::error::CameraError;

/// Camera configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Near clipping plane distance
    pub near: f32,
    /// Far clipping plane distance
    pub far: f32,
    /// Movement speed in world units per second
    pub move_speed: f32,
    /// Yaw per pixel of horizontal mouse movement (radians)
    pub yaw_sensitivity: f32,
    /// Pitch per pixel of vertical mouse movement (radians)
    pub pitch_sensitivity: f32,
    /// Downward tilt applied once when the camera is created, in degrees
    pub initial_pitch_degrees: f32,
    /// Zoom in only halves the height while it is above this
    pub zoom_floor: f32,
    /// Zoom out only doubles the height while it is below this
    pub zoom_ceiling: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 1.0,
            far: 1500.0,
            move_speed: 250.0,
            yaw_sensitivity: -FRAC_PI_4 / 150.0,
            pitch_sensitivity: FRAC_PI_4 / 100.0,
            initial_pitch_degrees: 22.5,
            zoom_floor: 25.0,
            zoom_ceiling: 200.0,
        }
    }
}

impl CameraConfig {
    /// Check that the config describes a usable camera
    pub fn validate(&self) -> Result<(), CameraError> {
        let values = [
            ("fov_degrees", self.fov_degrees),
            ("near", self.near),
            ("far", self.far),
            ("move_speed", self.move_speed),
            ("yaw_sensitivity", self.yaw_sensitivity),
            ("pitch_sensitivity", self.pitch_sensitivity),
            ("initial_pitch_degrees", self.initial_pitch_degrees),
            ("zoom_floor", self.zoom_floor),
            ("zoom_ceiling", self.zoom_ceiling),
        ];
        if let Some((name, value)) = values.iter().find(|(_, v)| !v.is_finite()) {
            return Err(invalid(format!("{name} is not finite ({value})")));
        }

        if self.fov_degrees <= 0.0 || self.fov_degrees >= 180.0 {
            return Err(invalid(format!(
                "fov_degrees must be in (0, 180), got {}",
                self.fov_degrees
            )));
        }
        if self.near <= 0.0 {
            return Err(invalid(format!("near must be positive, got {}", self.near)));
        }
        if self.far <= self.near {
            return Err(invalid(format!(
                "far ({}) must be greater than near ({})",
                self.far, self.near
            )));
        }
        if self.move_speed < 0.0 {
            return Err(invalid(format!(
                "move_speed must not be negative, got {}",
                self.move_speed
            )));
        }
        if self.zoom_floor <= 0.0 || self.zoom_floor >= self.zoom_ceiling {
            return Err(invalid(format!(
                "zoom range must satisfy 0 < floor < ceiling, got {}..{}",
                self.zoom_floor, self.zoom_ceiling
            )));
        }
        Ok(())
    }

    /// Vertical field of view in radians
    pub fn fov_radians(&self) -> f32 {
        self.fov_degrees.to_radians()
    }
}

fn invalid(message: String) -> CameraError {
    CameraError::InvalidConfig(message)
}
