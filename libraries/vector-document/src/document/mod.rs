//! The immutable document model and the parser that builds it.

pub mod attributes;
pub mod builder;
pub mod gradient;
pub mod viewbox;

use crate::consts::{DEFAULT_DPI, DEFAULT_MAX_DEPTH};
use crate::error::ParseError;
use crate::path::Path;
use crate::rect::Rect;
use crate::values::{Color, LengthUnit};
use glam::{DAffine2, DVec2};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Settings for [Document::parse].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParseOptions {
	/// The unit the output coordinates are expressed in.
	pub units: LengthUnit,
	/// Resolution used to convert physical units to pixels.
	pub dpi: f64,
	/// How deeply elements may nest before parsing fails with [ParseError::DepthExceeded].
	pub max_depth: usize,
}

impl Default for ParseOptions {
	fn default() -> Self {
		Self {
			units: LengthUnit::Px,
			dpi: DEFAULT_DPI,
			max_depth: DEFAULT_MAX_DEPTH,
		}
	}
}

/// How a gradient continues past its first and last stops.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SpreadMethod {
	#[default]
	Pad,
	Reflect,
	Repeat,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradientKind {
	/// The gradient parameter is the y coordinate in gradient space.
	Linear,
	/// The gradient parameter is the distance from the origin in gradient space.
	///
	/// `focal` is the focal point relative to the center in units of the radius. It is kept for consumers but
	/// the rasterizer renders every radial gradient as if the focal point were at the center.
	Radial { focal: DVec2 },
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
	/// In `[0, 1]`, non-decreasing along a gradient's stop list.
	pub offset: f64,
	/// The stop color with its opacity in the alpha channel.
	pub color: Color,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
	pub kind: GradientKind,
	/// At least two stops, sorted by offset.
	pub stops: Vec<GradientStop>,
	pub spread: SpreadMethod,
	/// Maps document coordinates into gradient space.
	pub transform: DAffine2,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Paint {
	#[default]
	None,
	Color(Color),
	Gradient(Gradient),
}

impl Paint {
	pub fn is_none(&self) -> bool {
		matches!(self, Paint::None)
	}
}

/// One fillable region: a set of subpaths sharing a paint.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
	id: Option<String>,
	paths: Vec<Path>,
	fill: Paint,
	stroke: Paint,
	opacity: f64,
	stroke_width: f64,
	bounds: Rect,
}

impl Shape {
	pub fn id(&self) -> Option<&str> {
		self.id.as_deref()
	}

	/// Subpaths in document coordinates.
	pub fn paths(&self) -> &[Path] {
		&self.paths
	}

	pub fn fill(&self) -> &Paint {
		&self.fill
	}

	/// The stroke paint. It is parsed and kept, but not rendered.
	pub fn stroke(&self) -> &Paint {
		&self.stroke
	}

	/// Group opacity in `[0, 1]`, applied on top of the paint's own alpha.
	pub fn opacity(&self) -> f64 {
		self.opacity
	}

	pub fn stroke_width(&self) -> f64 {
		self.stroke_width
	}

	pub fn bounds(&self) -> Rect {
		self.bounds
	}
}

/// A parsed vector image.
///
/// Every coordinate is final: the view box has already been mapped onto the intrinsic size, so consumers never deal with
/// user space.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
	width: f64,
	height: f64,
	shapes: Vec<Shape>,
}

impl Document {
	/// Parses markup text. Malformed content is skipped rather than reported.
	///
	/// # Example
	/// ```
	/// use vector_document::{Document, ParseOptions};
	/// let document = Document::parse(r#"<svg width="10" height="10"><rect width="10" height="10"/></svg>"#, &ParseOptions::default()).unwrap();
	/// assert_eq!((document.width(), document.height()), (10., 10.));
	/// assert_eq!(document.shapes().len(), 1);
	/// ```
	pub fn parse(text: &str, options: &ParseOptions) -> Result<Self, ParseError> {
		builder::DocumentBuilder::new(options).build(text)
	}

	/// Like [Document::parse], replacing invalid UTF-8 sequences instead of failing.
	pub fn parse_bytes(bytes: &[u8], options: &ParseOptions) -> Result<Self, ParseError> {
		Self::parse(&String::from_utf8_lossy(bytes), options)
	}

	/// Intrinsic width in output units.
	pub fn width(&self) -> f64 {
		self.width
	}

	/// Intrinsic height in output units.
	pub fn height(&self) -> f64 {
		self.height
	}

	/// Shapes in paint order.
	pub fn shapes(&self) -> &[Shape] {
		&self.shapes
	}

	/// The union of all shape bounds, or `None` for a document without shapes.
	pub fn bounds(&self) -> Option<Rect> {
		self.shapes.iter().map(Shape::bounds).reduce(Rect::combine_bounds)
	}
}
