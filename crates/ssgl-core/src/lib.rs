//! SSGL Core - Core types and utilities
//!
//! This crate provides the foundational types shared by the game crates:
//! - Mathematical primitives (re-exported from glam)
//! - Axis-aligned bounding boxes for visibility culling
//! - Frame timing with clamping, scaling and pause

pub mod time;
pub mod types;

pub use glam;
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
pub use time::{GameTime, TimeConfig};
pub use types::Aabb;
