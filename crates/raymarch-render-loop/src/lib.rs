use raymarch_units::Distance;

mod frame;
pub mod presets;
mod renderer;

pub use frame::{render_frame, render_frame_accelerated};
pub use renderer::ImageRenderer;

/// Maximum distance a ray is marched from the sensor.
pub const DEFAULT_RAY_LENGTH: Distance = Distance::meters(5.0);

/// When the camera pose advances while a frame is rendered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PosePolicy {
    /// The pose advances after every pixel, rows are traced in order (rolling shutter).
    #[default]
    PerPixel,
    /// The whole frame sees the pose at its start, which lets rows render in parallel.
    PerFrame,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    pub ray_length: Distance,
    pub pose_policy: PosePolicy,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            ray_length: DEFAULT_RAY_LENGTH,
            pose_policy: PosePolicy::default(),
        }
    }
}
