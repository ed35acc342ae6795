mod color;
mod scene;

pub use color::Color;
pub use scene::{Scene, DEFAULT_CELL_SIZE};
