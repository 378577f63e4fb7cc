//! Vector-document: parses SVG-like markup into filled cubic bezier shapes
pub mod consts;
mod document;
mod error;
pub mod path;
mod rect;
pub mod tokenizer;
pub mod values;

pub use document::{Document, Gradient, GradientKind, GradientStop, Paint, ParseOptions, Shape, SpreadMethod};
pub use error::{ParseError, UnknownUnit};
pub use path::Path;
pub use rect::Rect;
pub use values::{Color, LengthUnit};
