use anyhow::Result;
use raymarch_scene::Color;

mod bitmap;
mod png;

pub use bitmap::Bitmap;
pub use png::PngImage;

/// Destination for rendered pixels. Pixels may be set in any order, `write` commits them.
pub trait ImageSink {
    fn set_pixel(&mut self, x: u32, y: u32, color: Color);

    fn write(&self) -> Result<()>;
}
