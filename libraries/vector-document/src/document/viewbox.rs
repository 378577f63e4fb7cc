//! Mapping of the root element's view box onto its intrinsic size.

use crate::rect::Rect;
use crate::values::number::Cursor;
use glam::{DAffine2, DVec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
	Min,
	Mid,
	Max,
}

impl Align {
	/// Offset that places `content` inside `container`.
	fn offset(self, content: f64, container: f64) -> f64 {
		match self {
			Align::Min => 0.,
			Align::Mid => (container - content) * 0.5,
			Align::Max => container - content,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectMode {
	/// Scale each axis independently.
	None,
	/// Uniform scale that fits the whole view box inside the image.
	Meet,
	/// Uniform scale that covers the whole image.
	Slice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreserveAspectRatio {
	pub x: Align,
	pub y: Align,
	pub mode: AspectMode,
}

impl Default for PreserveAspectRatio {
	fn default() -> Self {
		Self {
			x: Align::Mid,
			y: Align::Mid,
			mode: AspectMode::Meet,
		}
	}
}

impl PreserveAspectRatio {
	fn align(text: &str, min: &str, max: &str) -> Align {
		if text.contains(min) {
			Align::Min
		} else if text.contains(max) {
			Align::Max
		} else {
			Align::Mid
		}
	}

	pub fn parse(text: &str) -> Self {
		if text.contains("none") {
			return Self {
				mode: AspectMode::None,
				..Self::default()
			};
		}

		Self {
			x: Self::align(text, "xMin", "xMax"),
			y: Self::align(text, "YMin", "YMax"),
			mode: if text.contains("slice") { AspectMode::Slice } else { AspectMode::Meet },
		}
	}
}

/// Parses `min-x min-y width height`. Returns `None` unless all four numbers are present.
pub fn parse_view_box(text: &str) -> Option<Rect> {
	let mut cursor = Cursor::new(text);
	let origin = DVec2::new(cursor.number()?, cursor.number()?);
	let size = DVec2::new(cursor.number()?, cursor.number()?);
	Some(Rect([origin, origin + size]))
}

/// The sizing attributes of the root element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
	/// Intrinsic size in pixels. Zero means unspecified.
	pub size: DVec2,
	pub view_box: Option<Rect>,
	pub aspect: PreserveAspectRatio,
}

/// The outcome of fitting a view box: the final intrinsic size and the map from user space into it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalization {
	pub size: DVec2,
	pub transform: DAffine2,
	/// Mean of the two axis scales, applied to stroke widths.
	pub average_scale: f64,
}

impl Viewport {
	/// The origin and size percentages resolve against while parsing.
	pub fn reference_box(&self) -> (DVec2, DVec2) {
		match self.view_box {
			Some(view_box) => (view_box.min(), view_box.size()),
			None => (DVec2::ZERO, self.size),
		}
	}

	/// Reconciles the view box with the intrinsic size. Missing dimensions are inferred from the size or else from
	/// the far edge of the content bounds. `unit_scale` converts pixels into the requested output unit.
	pub fn normalize(&self, content_bounds: Option<Rect>, unit_scale: f64) -> Normalization {
		let content_max = content_bounds.map_or(DVec2::ZERO, |bounds| bounds.max());
		let (view_origin, declared_view_size) = match self.view_box {
			Some(view_box) => (view_box[0], view_box[1] - view_box[0]),
			None => (DVec2::ZERO, DVec2::ZERO),
		};

		let infer = |declared: f64, size: f64, content: f64| {
			if declared > 0. {
				declared
			} else if size > 0. {
				size
			} else {
				content
			}
		};
		let view_size = DVec2::new(
			infer(declared_view_size.x, self.size.x, content_max.x),
			infer(declared_view_size.y, self.size.y, content_max.y),
		);
		let image_size = DVec2::new(
			if self.size.x > 0. { self.size.x } else { view_size.x },
			if self.size.y > 0. { self.size.y } else { view_size.y },
		);

		let mut translation = -view_origin;
		let mut scale = DVec2::new(
			if view_size.x > 0. { image_size.x / view_size.x } else { 0. },
			if view_size.y > 0. { image_size.y / view_size.y } else { 0. },
		);

		let uniform = match self.aspect.mode {
			AspectMode::None => None,
			AspectMode::Meet => Some(scale.x.min(scale.y)),
			AspectMode::Slice => Some(scale.x.max(scale.y)),
		};
		if let Some(uniform) = uniform.filter(|&uniform| uniform > 0.) {
			scale = DVec2::splat(uniform);
			translation.x += self.aspect.x.offset(view_size.x * uniform, image_size.x) / uniform;
			translation.y += self.aspect.y.offset(view_size.y * uniform, image_size.y) / uniform;
		}

		let scale = scale * unit_scale;
		Normalization {
			size: image_size * unit_scale,
			transform: DAffine2::from_scale(scale) * DAffine2::from_translation(translation),
			average_scale: (scale.x + scale.y) * 0.5,
		}
	}
}
