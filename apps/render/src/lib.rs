use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use raymarch::raymarch_camera::Camera;
use raymarch::raymarch_compute::{AcceleratedPinholeCamera, ComputeContext};
use raymarch::raymarch_render_loop::{presets, ImageRenderer, PosePolicy, RenderSettings};
use raymarch::raymarch_scene::Scene;
use raymarch::raymarch_units::Distance;
use raymarch::Raymarch;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ScenePreset {
    /// Black and white stripes in front of a gray wall
    Zebra,
    /// Red and blue stripes in a room with a floor and walls
    ViconLab,
}

impl ScenePreset {
    fn build(self) -> Result<Scene> {
        match self {
            Self::Zebra => presets::zebra(),
            Self::ViconLab => presets::vicon_lab(),
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum PoseUpdates {
    /// Advance the pose after every pixel (rolling shutter)
    PerPixel,
    /// Advance the pose once per frame, rows render in parallel
    PerFrame,
}

impl From<PoseUpdates> for PosePolicy {
    fn from(value: PoseUpdates) -> Self {
        match value {
            PoseUpdates::PerPixel => PosePolicy::PerPixel,
            PoseUpdates::PerFrame => PosePolicy::PerFrame,
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory the rendered images are written to
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Scene to render
    #[arg(long, value_enum, default_value_t = ScenePreset::Zebra)]
    scene: ScenePreset,

    /// When the camera pose advances during a frame
    #[arg(long, value_enum, default_value_t = PoseUpdates::PerPixel)]
    pose_policy: PoseUpdates,

    /// Maximum distance in meters a ray is marched
    #[arg(long, default_value_t = 5.0)]
    ray_length: f64,

    /// Distance in meters between two points of a ray
    #[arg(long, default_value_t = 0.005)]
    step_length: f64,

    /// Generate rays on the compute backend
    #[arg(long, default_value_t = false)]
    accelerated: bool,

    /// Compute backend threads, 0 picks the number of cores
    #[arg(long, default_value_t = 0)]
    threads: usize,

    /// Enable profiler scopes
    #[arg(long, default_value_t = false)]
    profile: bool,
}

impl Args {
    fn settings(&self) -> RenderSettings {
        RenderSettings {
            ray_length: Distance::meters(self.ray_length),
            pose_policy: self.pose_policy.into(),
        }
    }

    fn camera(&self) -> Camera {
        let mut camera = presets::default_camera();
        camera.set_step_length(Distance::meters(self.step_length));
        camera
    }
}

pub fn internal_main() -> Result<()> {
    let _ = Raymarch::new("Render");
    let args = Args::parse();

    raymarch::raymarch_profiling::set_enabled(args.profile);

    let scene = args.scene.build()?;
    let mut renderer = ImageRenderer::with_settings(&args.output_dir, args.settings());

    let path = if args.accelerated {
        let context = ComputeContext::new(args.threads)?;
        let mut camera = AcceleratedPinholeCamera::new(args.camera(), &context);
        renderer.render_scene_accelerated(&scene, &mut camera)?
    } else {
        renderer.render_scene(&scene, &mut args.camera())?
    };

    log::info!("Rendered {:?} scene to {}", args.scene, path.display());
    Ok(())
}
