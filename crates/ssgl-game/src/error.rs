/// Errors raised when a camera is built or resized with invalid parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CameraError {
    #[error("look direction has zero length (position equals target)")]
    DegenerateLookDirection,

    #[error("up vector has zero length")]
    DegenerateUpVector,

    #[error("look direction is parallel to the up vector")]
    LookParallelToUp,

    #[error("invalid viewport {width}x{height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid aspect ratio: {0}")]
    InvalidAspectRatio(f32),

    #[error("invalid camera config: {0}")]
    InvalidConfig(String),
}
