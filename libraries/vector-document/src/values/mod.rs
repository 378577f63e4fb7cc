//! Resolvers that turn attribute strings into typed values.

pub mod color;
pub mod length;
pub mod number;
pub mod style;
pub mod transform;

pub use color::{Color, parse_color};
pub use length::{Axis, Length, LengthUnit, UnitContext, parse_length};
pub use style::{PaintSpec, parse_paint, parse_style};
pub use transform::parse_transform;
