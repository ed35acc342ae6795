use anyhow::{anyhow, bail, Result};
use bytemuck::{Pod, Zeroable};
use raymarch_camera::{Camera, Projection, RayGenerator, MAX_POINTS_PER_RAY};
use raymarch_units::{Distance, Point};

/// Point layout shared with the device, single precision and tightly packed.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct DevicePoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<Point> for DevicePoint {
    fn from(point: Point) -> Self {
        Self {
            x: point.x.get() as f32,
            y: point.y.get() as f32,
            z: point.z.get() as f32,
        }
    }
}

impl From<DevicePoint> for Point {
    fn from(point: DevicePoint) -> Self {
        Point::meters(point.x as f64, point.y as f64, point.z as f64)
    }
}

/// Pinhole ray marching arguments for one camera pose, evaluated one work item per pixel.
#[derive(Debug, Clone, Copy)]
pub struct RayKernel {
    width: i32,
    height: i32,
    u_c: i32,
    v_c: i32,
    diff_u: f32,
    diff_v: f32,
    pitch_horizontal: f32,
    pitch_vertical: f32,
    yaw: f32,
    pitch: f32,
    step_length: f32,
    centre: DevicePoint,
    points_per_ray: usize,
}

impl RayKernel {
    /// Captures the camera's current pose. Fails when any argument cannot be represented on the
    /// device or the ray would hold too many points.
    pub fn build(camera: &Camera, distance: Distance) -> Result<Self> {
        if !distance.is_finite() || distance < Distance::ZERO {
            bail!("Invalid ray distance {}", distance);
        }
        let points_per_ray = camera.points_per_ray(distance).ok_or_else(|| {
            anyhow!("Ray distance {} needs more than {} points", distance, MAX_POINTS_PER_RAY)
        })?;

        let resolution = camera.resolution();
        let Projection {
            u_c,
            v_c,
            diff_u,
            diff_v,
        } = camera.projection();
        let pitch = camera.sensor().pitch;
        let orientation = camera.orientation();

        let kernel = Self {
            width: i32::try_from(resolution.horizontal)?,
            height: i32::try_from(resolution.vertical)?,
            u_c,
            v_c,
            diff_u: diff_u.get() as f32,
            diff_v: diff_v.get() as f32,
            pitch_horizontal: pitch.horizontal.get() as f32,
            pitch_vertical: pitch.vertical.get() as f32,
            yaw: orientation.yaw.get() as f32,
            pitch: orientation.pitch.get() as f32,
            step_length: camera.step_length().get() as f32,
            centre: DevicePoint::from(camera.centre()),
            points_per_ray,
        };

        let arguments = [
            kernel.diff_u,
            kernel.diff_v,
            kernel.pitch_horizontal,
            kernel.pitch_vertical,
            kernel.yaw,
            kernel.pitch,
            kernel.step_length,
            kernel.centre.x,
            kernel.centre.y,
            kernel.centre.z,
        ];
        if arguments.iter().any(|argument| !argument.is_finite()) {
            bail!("Kernel arguments are not finite: {:?}", kernel);
        }
        if kernel.step_length <= 0.0 {
            bail!("Kernel step length must be positive, got {}", kernel.step_length);
        }

        Ok(kernel)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn points_per_ray(&self) -> usize {
        self.points_per_ray
    }

    /// Fills `out` with the samples of the ray through pixel `(u, v)` and returns how many were
    /// written.
    pub fn trace(&self, u: i32, v: i32, out: &mut [DevicePoint]) -> usize {
        let theta_u = self.diff_u * (self.u_c - u) as f32 + self.yaw;
        let theta_v =
            self.diff_v * (v - self.v_c) as f32 + core::f32::consts::FRAC_PI_2 + self.pitch;

        let step = [
            self.step_length * theta_v.sin() * theta_u.cos(),
            self.step_length * theta_v.sin() * theta_u.sin(),
            self.step_length * theta_v.cos(),
        ];
        let start = [
            self.centre.x,
            self.centre.y + self.pitch_horizontal * (u - self.u_c) as f32,
            self.centre.z + self.pitch_vertical * (v - self.v_c) as f32,
        ];

        for (i, point) in out.iter_mut().enumerate() {
            let n = (i + 1) as f32;
            *point = DevicePoint {
                x: start[0] + step[0] * n,
                y: start[1] + step[1] * n,
                z: start[2] + step[2] * n,
            };
        }

        out.len()
    }
}
