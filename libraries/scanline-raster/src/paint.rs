//! Per-pixel color lookup for shape fills.

use crate::consts::LUT_SIZE;
use glam::{DAffine2, DVec2};
use vector_document::{Color, Gradient, GradientKind, GradientStop, Paint, SpreadMethod};

/// A non-premultiplied RGBA color.
pub type Rgba = [u8; 4];

/// Scales alpha by `opacity` in 8-bit fixed point.
fn apply_opacity(color: Color, opacity: f64) -> Rgba {
	let weight = (opacity.clamp(0., 1.) * 256.) as u32;
	let [red, green, blue, alpha] = color.to_rgba8();
	[red, green, blue, ((alpha as u32 * weight) >> 8) as u8]
}

fn lerp(from: Rgba, to: Rgba, factor: f64) -> Rgba {
	let weight = (factor.clamp(0., 1.) * 256.) as u32;
	std::array::from_fn(|channel| ((from[channel] as u32 * (256 - weight) + to[channel] as u32 * weight) >> 8) as u8)
}

/// Gradient colors sampled at 256 evenly spaced parameters, with the shape opacity already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradientLut {
	colors: [Rgba; LUT_SIZE],
}

impl Default for GradientLut {
	fn default() -> Self {
		Self { colors: [[0; 4]; LUT_SIZE] }
	}
}

impl GradientLut {
	pub fn new(stops: &[GradientStop], opacity: f64) -> Self {
		let mut lut = Self::default();
		lut.build(stops, opacity);
		lut
	}

	/// Refills the table. Entries before the first stop take its color and entries after the last stop take the last
	/// stop's color. Without stops the table is transparent.
	pub fn build(&mut self, stops: &[GradientStop], opacity: f64) {
		let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
			self.colors = [[0; 4]; LUT_SIZE];
			return;
		};

		let index = |offset: f64| (offset.clamp(0., 1.) * 255.) as usize;
		let first_color = apply_opacity(first.color, opacity);
		let last_color = apply_opacity(last.color, opacity);
		let start = index(first.offset);
		let end = index(last.offset).max(start);

		self.colors[..start].fill(first_color);
		for pair in stops.windows(2) {
			let (from, to) = (index(pair[0].offset), index(pair[1].offset));
			let count = to.saturating_sub(from);
			let (from_color, to_color) = (apply_opacity(pair[0].color, opacity), apply_opacity(pair[1].color, opacity));
			for step in 0..count {
				self.colors[from + step] = lerp(from_color, to_color, step as f64 / count as f64);
			}
		}
		self.colors[end..].fill(last_color);
	}

	pub fn colors(&self) -> &[Rgba; LUT_SIZE] {
		&self.colors
	}

	/// The color at gradient parameter `t`, extended past `[0, 1]` by `spread`.
	pub fn sample(&self, t: f64, spread: SpreadMethod) -> Rgba {
		let t = match spread {
			SpreadMethod::Pad => t,
			SpreadMethod::Repeat => t - t.floor(),
			SpreadMethod::Reflect => {
				let t = t.rem_euclid(2.);
				if t > 1. { 2. - t } else { t }
			}
		};
		// NaN saturates to zero.
		self.colors[(t * 255.).clamp(0., 255.) as usize]
	}
}

/// A shape's fill prepared for rasterization.
#[derive(Debug, Clone, Copy)]
pub enum ShapePaint<'a> {
	Solid(Rgba),
	Gradient {
		kind: GradientKind,
		spread: SpreadMethod,
		/// Document space to gradient space.
		transform: DAffine2,
		lut: &'a GradientLut,
	},
}

impl<'a> ShapePaint<'a> {
	/// Prepares `paint` for a shape with the given opacity, building gradient tables into `lut`. Returns `None` for
	/// paints that draw nothing.
	pub fn new(paint: &Paint, opacity: f64, lut: &'a mut GradientLut) -> Option<Self> {
		match paint {
			Paint::None => None,
			Paint::Color(color) => Some(ShapePaint::Solid(apply_opacity(*color, opacity))),
			Paint::Gradient(Gradient { kind, stops, spread, transform }) => {
				lut.build(stops, opacity);
				Some(ShapePaint::Gradient {
					kind: *kind,
					spread: *spread,
					transform: *transform,
					lut,
				})
			}
		}
	}

	/// The color at a point in document space.
	pub fn color_at(&self, point: DVec2) -> Rgba {
		match *self {
			ShapePaint::Solid(color) => color,
			ShapePaint::Gradient { kind, spread, transform, lut } => {
				let point = transform.transform_point2(point);
				let t = match kind {
					GradientKind::Linear => point.y,
					GradientKind::Radial { .. } => point.length(),
				};
				lut.sample(t, spread)
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	fn stop(offset: f64, color: Color) -> GradientStop {
		GradientStop { offset, color }
	}

	fn red_to_blue() -> GradientLut {
		GradientLut::new(&[stop(0., Color::from_rgb8(255, 0, 0)), stop(1., Color::from_rgb8(0, 0, 255))], 1.)
	}

	#[test]
	fn test_midpoint_is_even_mix() {
		let lut = red_to_blue();
		let [red, green, blue, alpha] = lut.colors()[128];
		assert!(red.abs_diff(128) <= 2 && blue.abs_diff(128) <= 2, "got {red} {blue}");
		assert_eq!((green, alpha), (0, 255));
		assert_eq!(lut.colors()[0], [255, 0, 0, 255]);
		assert_eq!(lut.colors()[255], [0, 0, 255, 255]);
	}

	#[test]
	fn test_padding_outside_stops() {
		let lut = GradientLut::new(&[stop(0.25, Color::WHITE), stop(0.5, Color::BLACK)], 1.);
		assert_eq!(lut.colors()[0], [255, 255, 255, 255]);
		assert_eq!(lut.colors()[63], [255, 255, 255, 255]);
		assert_eq!(lut.colors()[127], [0, 0, 0, 255]);
		assert_eq!(lut.colors()[255], [0, 0, 0, 255]);
	}

	#[test]
	fn test_degenerate_stop_lists() {
		assert_eq!(GradientLut::new(&[], 1.).colors()[10], [0; 4]);
		let single = GradientLut::new(&[stop(0.3, Color::from_rgb8(1, 2, 3))], 1.);
		assert!(single.colors().iter().all(|&color| color == [1, 2, 3, 255]));
		let coincident = GradientLut::new(&[stop(0.5, Color::WHITE), stop(0.5, Color::BLACK)], 1.);
		assert_eq!(coincident.colors()[0], [255, 255, 255, 255]);
		assert_eq!(coincident.colors()[200], [0, 0, 0, 255]);
	}

	#[test]
	fn test_opacity_scales_alpha() {
		let lut = GradientLut::new(&[stop(0., Color::WHITE), stop(1., Color::WHITE)], 0.5);
		assert_eq!(lut.colors()[100], [255, 255, 255, 127]);
	}

	#[test]
	fn test_spread_methods() {
		let lut = red_to_blue();
		assert_eq!(lut.sample(-1., SpreadMethod::Pad), lut.colors()[0]);
		assert_eq!(lut.sample(2., SpreadMethod::Pad), lut.colors()[255]);
		assert_eq!(lut.sample(1.25, SpreadMethod::Repeat), lut.sample(0.25, SpreadMethod::Pad));
		assert_eq!(lut.sample(1.25, SpreadMethod::Reflect), lut.sample(0.75, SpreadMethod::Pad));
		assert_eq!(lut.sample(-0.25, SpreadMethod::Reflect), lut.sample(0.25, SpreadMethod::Pad));
		assert_eq!(lut.sample(f64::NAN, SpreadMethod::Pad), lut.colors()[0]);
	}

	#[test]
	fn test_gradient_lookup_uses_transform() {
		let mut lut = GradientLut::default();
		let gradient = Paint::Gradient(Gradient {
			kind: GradientKind::Linear,
			stops: vec![stop(0., Color::BLACK), stop(1., Color::WHITE)],
			spread: SpreadMethod::Pad,
			transform: DAffine2::from_scale(DVec2::splat(0.1)),
		});
		let paint = ShapePaint::new(&gradient, 1., &mut lut).unwrap();
		assert_eq!(paint.color_at(DVec2::new(3., 0.)), [0, 0, 0, 255]);
		assert_eq!(paint.color_at(DVec2::new(0., 10.)), [255, 255, 255, 255]);
		assert!(ShapePaint::new(&Paint::None, 1., &mut lut).is_none());
	}
}
