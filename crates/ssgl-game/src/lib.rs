//! SSGL Game - Input handling and the free-roaming camera
//!
//! Input events from the host window are folded into an [`InputState`]
//! snapshot, which drives the [`Camera`] once per frame.

pub mod camera;
pub mod error;
pub mod input;

pub use camera::{Camera, CameraConfig, Frustum, FrustumTest, Plane};
pub use error::CameraError;
pub use input::{InputAction, InputBinding, InputBindings, InputHandler, InputState};
