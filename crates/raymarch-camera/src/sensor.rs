use raymarch_units::{Angle, Distance};

/// Physical size of a single pixel on the sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPitch {
    pub vertical: Distance,
    pub horizontal: Distance,
}

impl Default for PixelPitch {
    fn default() -> Self {
        Self {
            vertical: Distance::meters(0.000004),
            horizontal: Distance::meters(0.000003),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub vertical: u32,
    pub horizontal: u32,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            vertical: 480,
            horizontal: 640,
        }
    }
}

impl Resolution {
    pub fn new(horizontal: u32, vertical: u32) -> Self {
        Self {
            vertical,
            horizontal,
        }
    }

    pub fn pixel_count(&self) -> u64 {
        u64::from(self.vertical) * u64::from(self.horizontal)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Sensor {
    pub pitch: PixelPitch,
    pub resolution: Resolution,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldOfView {
    pub vertical: Angle,
    pub horizontal: Angle,
}

impl Default for FieldOfView {
    /// Roughly 30 by 40 degrees.
    fn default() -> Self {
        Self {
            vertical: Angle::radians(0.524),
            horizontal: Angle::radians(0.698),
        }
    }
}
