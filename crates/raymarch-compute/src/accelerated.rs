use core::ops::Range;

use anyhow::Result;
use raymarch_camera::{Camera, RayGenerator, Resolution};
use raymarch_units::{Distance, Point};

use crate::{ComputeContext, RayKernel};

/// Pinhole camera whose rays are generated a row at a time on a [`ComputeContext`].
///
/// Backend failures never propagate: they are logged and the affected rays come back empty, which
/// the scene evaluates to background.
pub struct AcceleratedPinholeCamera<'a> {
    camera: Camera,
    context: &'a ComputeContext,
}

impl<'a> AcceleratedPinholeCamera<'a> {
    pub fn new(camera: Camera, context: &'a ComputeContext) -> Self {
        Self { camera, context }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn points_per_ray(&self, distance: Distance) -> Option<usize> {
        self.camera.points_per_ray(distance)
    }

    /// Samples the rays of every pixel in row `v`. The result holds `points_per_ray` points for
    /// column 0, followed by those of column 1 and so on.
    pub fn trace_row(&self, v: i32, distance: Distance) -> Vec<Point> {
        let width = self.camera.resolution().horizontal as i32;
        self.try_trace(v, 0..width, distance).unwrap_or_else(|err| {
            log::error!("Accelerated trace of row {} failed: {:#}", v, err);
            Vec::new()
        })
    }

    fn try_trace(&self, v: i32, columns: Range<i32>, distance: Distance) -> Result<Vec<Point>> {
        let kernel = RayKernel::build(&self.camera, distance)?;
        self.context.dispatch(&kernel, v, columns)
    }
}

impl RayGenerator for AcceleratedPinholeCamera<'_> {
    fn resolution(&self) -> Resolution {
        self.camera.resolution()
    }

    fn generate_ray(&self, u: i32, v: i32, distance: Distance) -> Vec<Point> {
        self.try_trace(v, u..u + 1, distance).unwrap_or_else(|err| {
            log::error!("Accelerated trace of pixel ({}, {}) failed: {:#}", u, v, err);
            Vec::new()
        })
    }
}
