//! Camera system module
//!
//! Provides a free-roaming camera with keyboard movement, stepwise zoom,
//! mouse free-look and per-frame frustum extraction.

mod config;
mod controller;
mod frustum;

pub use config::CameraConfig;
pub use controller::Camera;
pub use frustum::{Frustum, FrustumTest, Plane};
