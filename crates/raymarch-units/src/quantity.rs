use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Declares an `f64` newtype tagged with a physical dimension. Only operations between values of
/// the same dimension are generated here, cross-dimension products are listed explicitly below.
macro_rules! quantity {
    ($(#[$meta:meta])* $name:ident, $ctor:ident, $unit:literal) => {
        $(#[$meta])*
        #[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd)]
        pub struct $name(f64);

        impl $name {
            pub const ZERO: Self = Self(0.0);

            pub const fn $ctor(value: f64) -> Self {
                Self(value)
            }

            pub const fn get(self) -> f64 {
                self.0
            }

            pub fn abs(self) -> Self {
                Self(self.0.abs())
            }

            pub fn min(self, other: Self) -> Self {
                Self(self.0.min(other.0))
            }

            pub fn max(self, other: Self) -> Self {
                Self(self.0.max(other.0))
            }

            pub fn clamp(self, lo: Self, hi: Self) -> Self {
                Self(self.0.clamp(lo.0, hi.0))
            }

            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{} {}", self.0, $unit)
            }
        }

        impl Add for $name {
            type Output = Self;

            fn add(self, rhs: Self) -> Self {
                Self(self.0 + rhs.0)
            }
        }

        impl AddAssign for $name {
            fn add_assign(&mut self, rhs: Self) {
                self.0 += rhs.0;
            }
        }

        impl Sub for $name {
            type Output = Self;

            fn sub(self, rhs: Self) -> Self {
                Self(self.0 - rhs.0)
            }
        }

        impl SubAssign for $name {
            fn sub_assign(&mut self, rhs: Self) {
                self.0 -= rhs.0;
            }
        }

        impl Neg for $name {
            type Output = Self;

            fn neg(self) -> Self {
                Self(-self.0)
            }
        }

        impl Mul<f64> for $name {
            type Output = Self;

            fn mul(self, rhs: f64) -> Self {
                Self(self.0 * rhs)
            }
        }

        impl Mul<$name> for f64 {
            type Output = $name;

            fn mul(self, rhs: $name) -> $name {
                $name(self * rhs.0)
            }
        }

        impl Div<f64> for $name {
            type Output = Self;

            fn div(self, rhs: f64) -> Self {
                Self(self.0 / rhs)
            }
        }

        /// Same-dimension division yields a plain ratio.
        impl Div for $name {
            type Output = f64;

            fn div(self, rhs: Self) -> f64 {
                self.0 / rhs.0
            }
        }
    };
}

/// Declares `$lhs * $rhs = $out` in both operand orders.
macro_rules! product {
    ($lhs:ident * $rhs:ident = $out:ident) => {
        impl Mul<$rhs> for $lhs {
            type Output = $out;

            fn mul(self, rhs: $rhs) -> $out {
                $out(self.0 * rhs.0)
            }
        }

        impl Mul<$lhs> for $rhs {
            type Output = $out;

            fn mul(self, rhs: $lhs) -> $out {
                $out(self.0 * rhs.0)
            }
        }

        impl Div<$rhs> for $out {
            type Output = $lhs;

            fn div(self, rhs: $rhs) -> $lhs {
                $lhs(self.0 / rhs.0)
            }
        }
    };
}

quantity!(
    /// Length in metres.
    Distance,
    meters,
    "m"
);
quantity!(
    /// Plane angle in radians.
    Angle,
    radians,
    "rad"
);
quantity!(
    /// Time in seconds.
    Time,
    seconds,
    "s"
);
quantity!(LinearVelocity, meters_per_second, "m/s");
quantity!(AngularVelocity, radians_per_second, "rad/s");

product!(LinearVelocity * Time = Distance);
product!(AngularVelocity * Time = Angle);

impl Angle {
    pub const HALF_PI: Self = Self(core::f64::consts::FRAC_PI_2);

    pub fn sin(self) -> f64 {
        self.0.sin()
    }

    pub fn cos(self) -> f64 {
        self.0.cos()
    }
}

impl Time {
    /// The time between two events happening at `hz` per second.
    pub fn from_frequency(hz: f64) -> Self {
        Self(1.0 / hz)
    }
}
