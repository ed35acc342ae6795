mod accelerated;
mod context;
mod kernel;

pub use accelerated::AcceleratedPinholeCamera;
pub use context::ComputeContext;
pub use kernel::{DevicePoint, RayKernel};
