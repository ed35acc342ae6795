//! Ready made scenes and the camera pose they were set up for.

use anyhow::Result;
use raymarch_camera::Camera;
use raymarch_scene::{Color, Scene};
use raymarch_units::{Orientation, Point, Size, Velocity};

/// Extent shared by all preset scenes.
pub const SCENE_BOUNDS: Size = Size::meters(4.0, 4.0, 2.0);

const STRIPE_WIDTH: f64 = 0.1;

/// Paints `count` vertical stripes in the plane `x`, alternating between `even` and `odd` along y
/// starting at `y0`.
fn paint_stripes(
    scene: &mut Scene,
    x: f64,
    y0: f64,
    z: (f64, f64),
    count: usize,
    [even, odd]: [Color; 2],
) {
    for i in 0..count {
        let y = y0 + STRIPE_WIDTH * i as f64;
        let color = if i % 2 == 0 { even } else { odd };

        scene.paint_slab(
            Point::meters(x, y, z.0),
            Point::meters(x, y + STRIPE_WIDTH, z.1),
            color,
        );
    }
}

/// Black and white stripes in front of a gray wall.
pub fn zebra() -> Result<Scene> {
    raymarch_profiling::profile_function!();

    let mut scene = Scene::with_bounds(SCENE_BOUNDS)?;

    scene.paint_slab(
        Point::meters(3.01, 0.0, 0.1),
        Point::meters(3.01, 4.0, 2.0),
        Color::gray(136),
    );
    paint_stripes(
        &mut scene,
        3.0,
        1.0,
        (0.5, 1.5),
        10,
        [Color::gray(1), Color::WHITE],
    );

    log::info!("Built zebra scene, {} cells painted", scene.painted_cell_count());
    Ok(scene)
}

/// Red and blue calibration stripes inside a room with a floor and two walls.
pub fn vicon_lab() -> Result<Scene> {
    raymarch_profiling::profile_function!();

    let mut scene = Scene::with_bounds(SCENE_BOUNDS)?;

    paint_stripes(
        &mut scene,
        2.2,
        0.0,
        (0.5, 2.0),
        10,
        [Color::new(255, 0, 0), Color::new(0, 0, 255)],
    );

    // Floor
    scene.paint_slab(
        Point::meters(0.0, 0.0, 0.0),
        Point::meters(4.0, 2.5, 0.0),
        Color::gray(136),
    );
    // Side and back wall
    scene.paint_slab(
        Point::meters(0.0, 0.0, 0.0),
        Point::meters(4.0, 0.0, 2.0),
        Color::gray(212),
    );
    scene.paint_slab(
        Point::meters(3.99, 0.0, 0.0),
        Point::meters(3.99, 2.49, 2.0),
        Color::gray(200),
    );

    log::info!("Built vicon lab scene, {} cells painted", scene.painted_cell_count());
    Ok(scene)
}

/// Still camera at head height looking down the x axis, slightly turned towards negative y.
pub fn default_camera() -> Camera {
    Camera::new(
        Point::meters(0.0, 1.5, 1.0),
        Orientation::radians(0.0, 0.0, 6.2),
        Velocity::ZERO,
    )
}
