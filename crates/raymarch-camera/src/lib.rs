use glam::DVec3;
use raymarch_units::{az_incl_range_to_point, Angle, Distance, Orientation, Point, Time, Velocity};

mod sensor;
pub use sensor::*;

/// Distance between two consecutive points of a generated ray.
pub const DEFAULT_STEP_LENGTH: Distance = Distance::meters(0.005);
pub const DEFAULT_FRAMERATE: u32 = 2;
/// Longest ray `generate_ray` will sample, in points.
pub const MAX_POINTS_PER_RAY: usize = 1 << 20;

/// Anything that can turn a pixel into an ordered, finite sequence of world space sample points.
pub trait RayGenerator {
    fn resolution(&self) -> Resolution;

    /// Samples the ray through pixel `(u, v)` from the sensor outwards up to `distance`.
    fn generate_ray(&self, u: i32, v: i32, distance: Distance) -> Vec<Point>;
}

/// Per-camera constants of the pinhole projection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Centre pixel column.
    pub u_c: i32,
    /// Centre pixel row.
    pub v_c: i32,
    /// Angle between the rays of two horizontally adjacent pixels.
    pub diff_u: Angle,
    /// Angle between the rays of two vertically adjacent pixels.
    pub diff_v: Angle,
}

impl Projection {
    fn new(resolution: &Resolution, field_of_view: &FieldOfView) -> Self {
        let u_c = (resolution.horizontal / 2) as i32;
        let v_c = (resolution.vertical / 2) as i32;

        Self {
            u_c,
            v_c,
            diff_u: (field_of_view.horizontal / 2.0) / f64::from(u_c.max(1)),
            diff_v: (field_of_view.vertical / 2.0) / f64::from(v_c.max(1)),
        }
    }
}

/// Pinhole camera that marches rays in fixed steps and moves with a constant velocity.
///
/// Projection constants and the sampling time are derived from the sensor, field of view and
/// framerate. They are recomputed by the setters and never per ray.
#[derive(Debug, Clone)]
pub struct Camera {
    centre: Point,
    orientation: Orientation,
    velocity: Velocity,

    sensor: Sensor,
    field_of_view: FieldOfView,
    framerate: u32,
    step_length: Distance,

    sampling_time: Time,
    projection: Projection,
}

impl Camera {
    pub fn new(centre: Point, orientation: Orientation, velocity: Velocity) -> Self {
        let sensor = Sensor::default();
        let field_of_view = FieldOfView::default();

        Self {
            centre,
            orientation,
            velocity,
            sensor,
            field_of_view,
            framerate: DEFAULT_FRAMERATE,
            step_length: DEFAULT_STEP_LENGTH,
            sampling_time: Self::sampling_time_for(DEFAULT_FRAMERATE, &sensor.resolution),
            projection: Projection::new(&sensor.resolution, &field_of_view),
        }
    }

    pub fn centre(&self) -> Point {
        self.centre
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn velocity(&self) -> Velocity {
        self.velocity
    }

    pub fn sensor(&self) -> Sensor {
        self.sensor
    }

    pub fn field_of_view(&self) -> FieldOfView {
        self.field_of_view
    }

    pub fn framerate(&self) -> u32 {
        self.framerate
    }

    pub fn step_length(&self) -> Distance {
        self.step_length
    }

    /// Time that passes between two traced pixels.
    pub fn sampling_time(&self) -> Time {
        self.sampling_time
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    pub fn set_resolution(&mut self, resolution: Resolution) {
        self.sensor.resolution = resolution;
        self.update_derived();
    }

    pub fn set_pixel_pitch(&mut self, pitch: PixelPitch) {
        self.sensor.pitch = pitch;
    }

    pub fn set_field_of_view(&mut self, field_of_view: FieldOfView) {
        self.field_of_view = field_of_view;
        self.update_derived();
    }

    pub fn set_framerate(&mut self, framerate: u32) {
        self.framerate = framerate;
        self.update_derived();
    }

    pub fn set_step_length(&mut self, step_length: Distance) {
        if step_length.is_finite() && step_length > Distance::ZERO {
            self.step_length = step_length;
        } else {
            log::warn!("Ignoring invalid step length {}", step_length);
        }
    }

    /// Unit direction of the ray through the centre pixel.
    pub fn forward(&self) -> DVec3 {
        let step = az_incl_range_to_point(
            self.orientation.yaw,
            Angle::HALF_PI + self.orientation.pitch,
            Distance::meters(1.0),
        );
        step.to_dvec3()
    }

    /// Number of points `generate_ray` produces for `distance`. `None` when the distance is
    /// negative, not finite, or needs more than [`MAX_POINTS_PER_RAY`] points.
    pub fn points_per_ray(&self, distance: Distance) -> Option<usize> {
        if !distance.is_finite() || distance < Distance::ZERO {
            return None;
        }

        let steps = (distance / self.step_length).floor();
        if steps >= MAX_POINTS_PER_RAY as f64 {
            return None;
        }

        (steps as usize).checked_add(1)
    }

    /// Advances the pose by the time it takes to trace a single pixel.
    pub fn integrate_pose(&mut self) {
        self.integrate_over(self.sampling_time);
    }

    /// Advances the pose as if `pixel_count` pixels had been traced one after another.
    pub fn integrate_pose_for(&mut self, pixel_count: u64) {
        self.integrate_over(self.sampling_time * pixel_count as f64);
    }

    fn integrate_over(&mut self, dt: Time) {
        self.centre.x += self.velocity.linear_x * dt;
        self.centre.y += self.velocity.linear_y * dt;
        self.centre.z += self.velocity.linear_z * dt;

        self.orientation.roll += self.velocity.angular_x * dt;
        self.orientation.pitch += self.velocity.angular_y * dt;
        self.orientation.yaw += self.velocity.angular_z * dt;
    }

    fn update_derived(&mut self) {
        self.sampling_time = Self::sampling_time_for(self.framerate, &self.sensor.resolution);
        self.projection = Projection::new(&self.sensor.resolution, &self.field_of_view);
    }

    fn sampling_time_for(framerate: u32, resolution: &Resolution) -> Time {
        let samples_per_second = u64::from(framerate) * resolution.pixel_count();
        if samples_per_second == 0 {
            log::warn!("Zero framerate or resolution, the camera pose will not advance");
            return Time::ZERO;
        }

        Time::from_frequency(samples_per_second as f64)
    }
}

impl RayGenerator for Camera {
    fn resolution(&self) -> Resolution {
        self.sensor.resolution
    }

    fn generate_ray(&self, u: i32, v: i32, distance: Distance) -> Vec<Point> {
        let Projection {
            u_c,
            v_c,
            diff_u,
            diff_v,
        } = self.projection;

        let theta_u = diff_u * f64::from(u_c - u) + self.orientation.yaw;
        let theta_v = diff_v * f64::from(v - v_c) + Angle::HALF_PI + self.orientation.pitch;

        // Each pixel sits at its own spot on the sensor plane
        let offset = Point::new(
            Distance::ZERO,
            self.sensor.pitch.horizontal * f64::from(u - u_c),
            self.sensor.pitch.vertical * f64::from(v - v_c),
        );
        let start = self.centre + offset;
        let step = az_incl_range_to_point(theta_u, theta_v, self.step_length);

        let count = self.points_per_ray(distance).unwrap_or(0);
        (1..=count).map(|i| start + step * i as f64).collect()
    }
}

#[cfg(test)]
mod tests {
    use raymarch_units::{AngularVelocity, LinearVelocity};

    use super::*;

    const EPSILON: f64 = 1e-9;

    fn still_camera(orientation: Orientation) -> Camera {
        Camera::new(Point::meters(0.0, 1.5, 1.0), orientation, Velocity::ZERO)
    }

    fn assert_close(a: DVec3, b: DVec3) {
        assert!((a - b).length() < EPSILON, "{} != {}", a, b);
    }

    #[test]
    fn defaults() {
        let camera = still_camera(Orientation::default());

        assert_eq!(camera.sensor().resolution, Resolution::new(640, 480));
        assert_eq!(camera.framerate(), 2);
        assert_eq!(camera.step_length(), Distance::meters(0.005));
        assert_eq!(
            camera.sampling_time(),
            Time::seconds(1.0 / (2.0 * 480.0 * 640.0))
        );
        assert_eq!(camera.projection().u_c, 320);
        assert_eq!(camera.projection().v_c, 240);
    }

    #[test]
    fn centre_pixel_marches_along_forward_axis() {
        let camera = still_camera(Orientation::radians(0.0, 0.1, 0.3));
        let Projection { u_c, v_c, .. } = camera.projection();
        let distance = Distance::meters(5.0);

        let points = camera.generate_ray(u_c, v_c, distance);

        let expected_len = (distance / camera.step_length()).floor() as usize + 1;
        assert_eq!(points.len(), expected_len);
        assert_eq!(points.len(), 1001);

        let first_step = points[0].to_dvec3() - camera.centre().to_dvec3();
        let second_step = points[1].to_dvec3() - points[0].to_dvec3();
        assert_close(first_step.normalize(), camera.forward());
        assert_close(second_step, first_step);
        assert!((first_step.length() - 0.005).abs() < EPSILON);

        let expected_forward = DVec3::new(
            0.1f64.cos() * 0.3f64.cos(),
            0.1f64.cos() * 0.3f64.sin(),
            -0.1f64.sin(),
        );
        assert_close(camera.forward(), expected_forward);
    }

    #[test]
    fn ray_length_edge_cases() {
        let camera = still_camera(Orientation::default());

        assert_eq!(camera.generate_ray(0, 0, Distance::ZERO).len(), 1);
        assert!(camera.generate_ray(0, 0, Distance::meters(-1.0)).is_empty());
        assert_eq!(camera.generate_ray(0, 0, Distance::meters(0.0125)).len(), 3);
    }

    #[test]
    fn oversized_rays_are_not_sampled() {
        let camera = still_camera(Orientation::default());

        assert_eq!(camera.points_per_ray(Distance::meters(1.0e20)), None);
        assert_eq!(camera.points_per_ray(Distance::meters(f64::MAX)), None);
        assert!(camera.generate_ray(0, 0, Distance::meters(1.0e20)).is_empty());

        // 0.005 m steps cover a bit over 5 km
        assert_eq!(camera.points_per_ray(Distance::meters(5000.0)), Some(1_000_001));
        assert_eq!(camera.points_per_ray(Distance::meters(6000.0)), None);
    }

    #[test]
    fn off_centre_pixel_starts_on_sensor_plane() {
        let camera = still_camera(Orientation::default());
        let Projection {
            u_c, v_c, diff_u, ..
        } = camera.projection();

        let points = camera.generate_ray(u_c + 10, v_c - 4, Distance::meters(1.0));

        let step = points[1].to_dvec3() - points[0].to_dvec3();
        let start = points[0].to_dvec3() - step;
        assert_close(start, DVec3::new(0.0, 1.5 + 10.0 * 0.000003, 1.0 - 4.0 * 0.000004));

        // Columns to the right of centre look towards negative azimuth
        let azimuth = step.y.atan2(step.x);
        assert!((azimuth + 10.0 * diff_u.get()).abs() < EPSILON);
        // Rows above centre look upwards
        assert!(step.z > 0.0);
    }

    #[test]
    fn setters_refresh_derived_values() {
        let mut camera = still_camera(Orientation::default());

        camera.set_resolution(Resolution::new(200, 100));
        assert_eq!(camera.projection().u_c, 100);
        assert_eq!(camera.projection().v_c, 50);
        assert!((camera.projection().diff_u.get() - 0.698 / 2.0 / 100.0).abs() < EPSILON);
        assert_eq!(camera.sampling_time(), Time::seconds(1.0 / (2.0 * 200.0 * 100.0)));

        camera.set_framerate(10);
        assert_eq!(camera.sampling_time(), Time::seconds(1.0 / (10.0 * 200.0 * 100.0)));

        camera.set_step_length(Distance::meters(-1.0));
        assert_eq!(camera.step_length(), DEFAULT_STEP_LENGTH);
        camera.set_step_length(Distance::meters(0.01));
        assert_eq!(camera.points_per_ray(Distance::meters(1.0)), Some(101));
    }

    #[test]
    fn field_of_view_sets_angular_resolution() {
        let mut camera = still_camera(Orientation::default());

        camera.set_field_of_view(FieldOfView {
            vertical: Angle::radians(0.48),
            horizontal: Angle::radians(0.64),
        });

        let projection = camera.projection();
        assert!((projection.diff_u.get() - 0.32 / 320.0).abs() < EPSILON);
        assert!((projection.diff_v.get() - 0.24 / 240.0).abs() < EPSILON);

        // Ten columns off centre now turn the ray by ten times the new angle
        let points = camera.generate_ray(330, 240, Distance::meters(0.01));
        let step = points[1].to_dvec3() - points[0].to_dvec3();
        assert!((step.y.atan2(step.x) + 10.0 * 0.001).abs() < EPSILON);
    }

    #[test]
    fn pixel_pitch_moves_sensor_plane_start() {
        let mut camera = still_camera(Orientation::default());
        camera.set_pixel_pitch(PixelPitch {
            vertical: Distance::meters(0.001),
            horizontal: Distance::meters(0.002),
        });

        assert_eq!(camera.sensor().pitch.horizontal, Distance::meters(0.002));

        let points = camera.generate_ray(325, 238, Distance::meters(0.01));
        let step = points[1].to_dvec3() - points[0].to_dvec3();
        let start = points[0].to_dvec3() - step;
        assert_close(start, DVec3::new(0.0, 1.5 + 5.0 * 0.002, 1.0 - 2.0 * 0.001));
    }

    #[test]
    fn pose_integrates_velocity() {
        let velocity = Velocity::new(
            [
                LinearVelocity::meters_per_second(1.0),
                LinearVelocity::ZERO,
                LinearVelocity::meters_per_second(-2.0),
            ],
            [
                AngularVelocity::ZERO,
                AngularVelocity::ZERO,
                AngularVelocity::radians_per_second(0.5),
            ],
        );
        let mut camera = Camera::new(Point::ORIGIN, Orientation::default(), velocity);
        let dt = camera.sampling_time().get();

        camera.integrate_pose();
        assert!((camera.centre().x.get() - dt).abs() < EPSILON);
        assert!((camera.centre().z.get() + 2.0 * dt).abs() < EPSILON);
        assert!((camera.orientation().yaw.get() - 0.5 * dt).abs() < EPSILON);

        let mut stepped = camera.clone();
        let mut jumped = camera.clone();
        for _ in 0..1000 {
            stepped.integrate_pose();
        }
        jumped.integrate_pose_for(1000);
        assert_close(stepped.centre().to_dvec3(), jumped.centre().to_dvec3());

        // A whole frame's worth of pixels covers one frame period
        let mut camera = Camera::new(Point::ORIGIN, Orientation::default(), velocity);
        camera.integrate_pose_for(camera.sensor().resolution.pixel_count());
        assert!((camera.centre().x.get() - 0.5).abs() < EPSILON);
    }

    #[test]
    fn still_camera_does_not_move() {
        let mut camera = still_camera(Orientation::radians(0.0, 0.0, 6.2));
        let before = camera.clone();

        camera.integrate_pose_for(1_000_000);

        assert_eq!(camera.centre(), before.centre());
        assert_eq!(camera.orientation(), before.orientation());
    }
}
