use rayon::prelude::*;
use raymarch_camera::{Camera, RayGenerator, Resolution};
use raymarch_compute::AcceleratedPinholeCamera;
use raymarch_image::Bitmap;
use raymarch_scene::Scene;
use raymarch_units::Distance;

use crate::{PosePolicy, RenderSettings};

/// Renders one frame of `scene` as seen by `camera`, advancing the camera pose according to the
/// settings' [`PosePolicy`].
pub fn render_frame(scene: &Scene, camera: &mut Camera, settings: &RenderSettings) -> Bitmap {
    raymarch_profiling::profile_function!();

    if camera.points_per_ray(settings.ray_length).is_none() {
        log::warn!(
            "Ray length {} cannot be sampled, frame stays background",
            settings.ray_length
        );
    }

    match settings.pose_policy {
        PosePolicy::PerPixel => render_rolling_shutter(scene, camera, settings.ray_length),
        PosePolicy::PerFrame => render_snapshot(scene, camera, settings.ray_length),
    }
}

/// Pixels are traced in row-major order and the pose advances after every single ray.
fn render_rolling_shutter(scene: &Scene, camera: &mut Camera, ray_length: Distance) -> Bitmap {
    let Resolution {
        vertical: height,
        horizontal: width,
    } = camera.resolution();
    let mut bitmap = Bitmap::new(width, height);

    for y in 0..height {
        raymarch_profiling::profile_scope!("row");

        for x in 0..width {
            let points = camera.generate_ray(x as i32, y as i32, ray_length);
            camera.integrate_pose();

            bitmap.set_pixel(x, y, scene.evaluate_ray(&points));
        }
    }

    bitmap
}

/// Every pixel sees the pose the camera had at the start of the frame. Rows are independent and
/// traced in parallel, the pose then advances by a whole frame.
fn render_snapshot(scene: &Scene, camera: &mut Camera, ray_length: Distance) -> Bitmap {
    let resolution = camera.resolution();
    let mut bitmap = Bitmap::new(resolution.horizontal, resolution.vertical);

    if resolution.pixel_count() > 0 {
        let snapshot: &Camera = camera;
        bitmap
            .pixels_mut()
            .par_chunks_mut(resolution.horizontal as usize)
            .enumerate()
            .for_each(|(y, row)| {
                raymarch_profiling::profile_scope!("row");

                for (x, pixel) in row.iter_mut().enumerate() {
                    let points = snapshot.generate_ray(x as i32, y as i32, ray_length);
                    *pixel = scene.evaluate_ray(&points);
                }
            });
    }

    camera.integrate_pose_for(resolution.pixel_count());
    bitmap
}

/// Renders one frame with row batches from the compute backend. Rows that fail to trace stay
/// background. The pose is snapshotted for the frame and advanced by a whole frame afterwards.
pub fn render_frame_accelerated(
    scene: &Scene,
    camera: &mut AcceleratedPinholeCamera<'_>,
    ray_length: Distance,
) -> Bitmap {
    raymarch_profiling::profile_function!();

    let resolution = camera.resolution();
    let mut bitmap = Bitmap::new(resolution.horizontal, resolution.vertical);

    match camera.points_per_ray(ray_length) {
        Some(points_per_ray) => trace_rows(scene, camera, ray_length, points_per_ray, &mut bitmap),
        None => log::warn!("Ray length {} cannot be sampled, frame stays background", ray_length),
    }

    camera.camera_mut().integrate_pose_for(resolution.pixel_count());
    bitmap
}

fn trace_rows(
    scene: &Scene,
    camera: &AcceleratedPinholeCamera<'_>,
    ray_length: Distance,
    points_per_ray: usize,
    bitmap: &mut Bitmap,
) {
    for y in 0..bitmap.height() {
        let traced = camera.trace_row(y as i32, ray_length);
        if traced.is_empty() {
            continue;
        }

        if let Some(row) = bitmap.row_mut(y) {
            for (pixel, ray) in row.iter_mut().zip(traced.chunks_exact(points_per_ray)) {
                *pixel = scene.evaluate_ray(ray);
            }
        }
    }
}
