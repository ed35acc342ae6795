use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use image::{ImageFormat, RgbImage};
use raymarch_scene::Color;

use crate::{Bitmap, ImageSink};

/// Bitmap that is written to disk as an 8-bit RGB PNG.
#[derive(Debug, Clone)]
pub struct PngImage {
    path: PathBuf,
    bitmap: Bitmap,
}

impl PngImage {
    pub fn new<P: AsRef<Path>>(path: P, width: u32, height: u32) -> Self {
        Self {
            path: path.as_ref().to_owned(),
            bitmap: Bitmap::new(width, height),
        }
    }

    pub fn from_bitmap<P: AsRef<Path>>(path: P, bitmap: Bitmap) -> Self {
        Self {
            path: path.as_ref().to_owned(),
            bitmap,
        }
    }

    /// Loads an existing PNG, converting it to 8-bit RGB.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        raymarch_profiling::profile_function!();

        let path = path.as_ref();
        let image = image::open(path)
            .with_context(|| format!("Failed to read image {}", path.display()))?
            .to_rgb8();

        let (width, height) = image.dimensions();
        let pixels: Vec<Color> = bytemuck::cast_slice(image.as_raw()).to_vec();
        let bitmap = Bitmap::from_pixels(width, height, pixels)
            .ok_or_else(|| anyhow!("Image {} has a truncated pixel buffer", path.display()))?;

        Ok(Self::from_bitmap(path, bitmap))
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }
}

impl ImageSink for PngImage {
    fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        self.bitmap.set_pixel(x, y, color);
    }

    fn write(&self) -> Result<()> {
        raymarch_profiling::profile_function!();

        let image = RgbImage::from_raw(
            self.bitmap.width(),
            self.bitmap.height(),
            self.bitmap.as_bytes().to_vec(),
        )
        .ok_or_else(|| anyhow!("Bitmap does not match its dimensions"))?;

        image
            .save_with_format(&self.path, ImageFormat::Png)
            .with_context(|| format!("Failed to write image {}", self.path.display()))?;

        log::info!(
            "Wrote {}x{} image to {}",
            self.bitmap.width(),
            self.bitmap.height(),
            self.path.display()
        );
        Ok(())
    }
}
