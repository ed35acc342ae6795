use raymarch_scene::Color;

/// Row-major RGB pixel buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Box<[Color]>,
}

impl Bitmap {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::BACKGROUND; width as usize * height as usize].into_boxed_slice(),
        }
    }

    /// Wraps existing pixel data, returns `None` when its length does not match the dimensions.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Color>) -> Option<Self> {
        if pixels.len() != width as usize * height as usize {
            return None;
        }

        Some(Self {
            width,
            height,
            pixels: pixels.into_boxed_slice(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Pixel data as tightly packed RGB8 bytes.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Pixels outside of the bitmap are dropped with a warning.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        match self.index(x, y) {
            Some(i) => self.pixels[i] = color,
            None => log::warn!(
                "Ignoring pixel ({}, {}) outside of {}x{} bitmap",
                x,
                y,
                self.width,
                self.height
            ),
        }
    }

    /// Mutable access to row `y`.
    pub fn row_mut(&mut self, y: u32) -> Option<&mut [Color]> {
        if y >= self.height {
            return None;
        }

        let width = self.width as usize;
        let start = y as usize * width;
        Some(&mut self.pixels[start..start + width])
    }

    pub fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }
}
