#![doc(html_no_source)]

mod raymarch;
pub use raymarch::Raymarch;

// Reexport all crates
pub use raymarch_camera;
pub use raymarch_compute;
pub use raymarch_image;
pub use raymarch_profiling;
pub use raymarch_render_loop;
pub use raymarch_scene;
pub use raymarch_units;
