//! Physical quantities and the geometric primitives built from them. Values of different dimensions
//! cannot be mixed: `Distance + Angle` has no implementation and fails to compile.

mod geometry;
mod quantity;

pub use geometry::*;
pub use quantity::*;
