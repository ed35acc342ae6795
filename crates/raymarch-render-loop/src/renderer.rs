use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use anyhow::{bail, Result};
use raymarch_camera::{Camera, RayGenerator};
use raymarch_compute::AcceleratedPinholeCamera;
use raymarch_image::{Bitmap, ImageSink, PngImage};
use raymarch_scene::Scene;

use crate::{render_frame, render_frame_accelerated, RenderSettings};

/// Renders scenes into numbered PNG files `render-1.png`, `render-2.png`, ... inside an output
/// directory.
pub struct ImageRenderer {
    output_dir: PathBuf,
    render_count: u32,
    settings: RenderSettings,
}

impl ImageRenderer {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        Self::with_settings(output_dir, RenderSettings::default())
    }

    pub fn with_settings<P: AsRef<Path>>(output_dir: P, settings: RenderSettings) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_owned(),
            render_count: 0,
            settings,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Number of images written so far.
    pub fn render_count(&self) -> u32 {
        self.render_count
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut RenderSettings {
        &mut self.settings
    }

    /// Path the next rendered image will be written to.
    pub fn next_output_path(&self) -> PathBuf {
        self.output_dir.join(format!("render-{}.png", self.render_count + 1))
    }

    /// Renders one frame of `scene` and writes it to [`Self::next_output_path`].
    pub fn render_scene(&mut self, scene: &Scene, camera: &mut Camera) -> Result<PathBuf> {
        raymarch_profiling::new_frame();
        raymarch_profiling::profile_function!();

        let resolution = camera.resolution();
        log::info!(
            "Rendering {}x{} frame with {:?} pose updates",
            resolution.horizontal,
            resolution.vertical,
            self.settings.pose_policy
        );

        let start = Instant::now();
        let bitmap = render_frame(scene, camera, &self.settings);
        log::info!("Frame traced in {:.2?}", start.elapsed());

        self.write(bitmap)
    }

    /// Same as [`Self::render_scene`] with rays generated on the compute backend.
    pub fn render_scene_accelerated(
        &mut self,
        scene: &Scene,
        camera: &mut AcceleratedPinholeCamera<'_>,
    ) -> Result<PathBuf> {
        raymarch_profiling::new_frame();
        raymarch_profiling::profile_function!();

        let resolution = camera.resolution();
        log::info!(
            "Rendering {}x{} frame on the compute backend",
            resolution.horizontal,
            resolution.vertical
        );

        let start = Instant::now();
        let bitmap = render_frame_accelerated(scene, camera, self.settings.ray_length);
        log::info!("Frame traced in {:.2?}", start.elapsed());

        self.write(bitmap)
    }

    /// Renders `scene` once per camera, in order. Stops at the first image that fails to write.
    pub fn render_scenes(&mut self, scene: &Scene, cameras: &mut [Camera]) -> Result<Vec<PathBuf>> {
        if cameras.is_empty() {
            bail!("No cameras to render the scene with");
        }

        cameras
            .iter_mut()
            .map(|camera| self.render_scene(scene, camera))
            .collect()
    }

    fn write(&mut self, bitmap: Bitmap) -> Result<PathBuf> {
        let path = self.next_output_path();
        PngImage::from_bitmap(&path, bitmap).write()?;

        self.render_count += 1;
        Ok(path)
    }
}
