//! Grid geometry: points, compass directions and rotatable footprints.

mod footprint;
mod point;

pub use footprint::{Cell, Footprint, FootprintError};
pub use point::{Direction, Point};
