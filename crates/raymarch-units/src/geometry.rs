use core::ops::{Add, Mul, Sub};

use glam::DVec3;

use crate::{Angle, AngularVelocity, Distance, LinearVelocity};

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: Distance,
    pub y: Distance,
    pub z: Distance,
}

impl Point {
    pub const ORIGIN: Self = Self::new(Distance::ZERO, Distance::ZERO, Distance::ZERO);

    pub const fn new(x: Distance, y: Distance, z: Distance) -> Self {
        Self { x, y, z }
    }

    pub const fn meters(x: f64, y: f64, z: f64) -> Self {
        Self::new(Distance::meters(x), Distance::meters(y), Distance::meters(z))
    }

    pub fn min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
    }

    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
    }

    pub fn to_dvec3(self) -> DVec3 {
        DVec3::new(self.x.get(), self.y.get(), self.z.get())
    }

    pub fn from_dvec3(v: DVec3) -> Self {
        Self::meters(v.x, v.y, v.z)
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Point {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl From<Size> for Point {
    fn from(size: Size) -> Self {
        Self::new(size.length, size.width, size.height)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Orientation {
    pub roll: Angle,
    pub pitch: Angle,
    pub yaw: Angle,
}

impl Orientation {
    pub const fn new(roll: Angle, pitch: Angle, yaw: Angle) -> Self {
        Self { roll, pitch, yaw }
    }

    pub const fn radians(roll: f64, pitch: f64, yaw: f64) -> Self {
        Self::new(Angle::radians(roll), Angle::radians(pitch), Angle::radians(yaw))
    }
}

/// Extent along the x (length), y (width) and z (height) axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub length: Distance,
    pub width: Distance,
    pub height: Distance,
}

impl Size {
    pub const fn new(length: Distance, width: Distance, height: Distance) -> Self {
        Self {
            length,
            width,
            height,
        }
    }

    pub const fn meters(length: f64, width: f64, height: f64) -> Self {
        Self::new(
            Distance::meters(length),
            Distance::meters(width),
            Distance::meters(height),
        )
    }

    pub fn is_positive(&self) -> bool {
        [self.length, self.width, self.height]
            .iter()
            .all(|d| d.is_finite() && *d > Distance::ZERO)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Velocity {
    pub linear_x: LinearVelocity,
    pub linear_y: LinearVelocity,
    pub linear_z: LinearVelocity,
    pub angular_x: AngularVelocity,
    pub angular_y: AngularVelocity,
    pub angular_z: AngularVelocity,
}

impl Velocity {
    pub const ZERO: Self = Self::new(
        [LinearVelocity::ZERO; 3],
        [AngularVelocity::ZERO; 3],
    );

    pub const fn new(linear: [LinearVelocity; 3], angular: [AngularVelocity; 3]) -> Self {
        Self {
            linear_x: linear[0],
            linear_y: linear[1],
            linear_z: linear[2],
            angular_x: angular[0],
            angular_y: angular[1],
            angular_z: angular[2],
        }
    }
}

/// Converts an azimuth, inclination and range to a cartesian offset, with the inclination measured
/// from +z.
pub fn az_incl_range_to_point(azimuth: Angle, inclination: Angle, range: Distance) -> Point {
    let direction = DVec3::new(
        inclination.sin() * azimuth.cos(),
        inclination.sin() * azimuth.sin(),
        inclination.cos(),
    );

    Point::from_dvec3(direction * range.get())
}
