//! Gradient definitions collected while parsing, and their resolution into shape paints.

use super::{Gradient, GradientKind, GradientStop, Paint, SpreadMethod};
use crate::consts::MAX_GRADIENT_REFERENCE_DEPTH;
use crate::rect::Rect;
use crate::tokenizer::Attribute;
use crate::values::style::parse_fragment;
use crate::values::{Axis, Length, LengthUnit, UnitContext, parse_length, parse_transform};
use glam::{DAffine2, DVec2};
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GradientUnits {
	#[default]
	ObjectBoundingBox,
	UserSpaceOnUse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientElement {
	Linear,
	Radial,
}

/// The geometric attributes of both gradient elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Coordinate {
	X1,
	Y1,
	X2,
	Y2,
	Cx,
	Cy,
	R,
	Fx,
	Fy,
}

impl Coordinate {
	const COUNT: usize = 9;

	fn from_name(element: GradientElement, name: &str) -> Option<Self> {
		match (element, name) {
			(GradientElement::Linear, "x1") => Some(Self::X1),
			(GradientElement::Linear, "y1") => Some(Self::Y1),
			(GradientElement::Linear, "x2") => Some(Self::X2),
			(GradientElement::Linear, "y2") => Some(Self::Y2),
			(GradientElement::Radial, "cx") => Some(Self::Cx),
			(GradientElement::Radial, "cy") => Some(Self::Cy),
			(GradientElement::Radial, "r") => Some(Self::R),
			(GradientElement::Radial, "fx") => Some(Self::Fx),
			(GradientElement::Radial, "fy") => Some(Self::Fy),
			_ => None,
		}
	}
}

/// A `linearGradient` or `radialGradient` element as written. Unset attributes may be inherited through `href`.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientDefinition {
	pub id: Option<String>,
	pub element: GradientElement,
	coordinates: [Option<Length>; Coordinate::COUNT],
	pub units: Option<GradientUnits>,
	pub transform: Option<DAffine2>,
	pub spread: Option<SpreadMethod>,
	pub href: Option<String>,
	pub stops: Vec<GradientStop>,
}

impl GradientDefinition {
	pub fn new(element: GradientElement) -> Self {
		Self {
			id: None,
			element,
			coordinates: [None; Coordinate::COUNT],
			units: None,
			transform: None,
			spread: None,
			href: None,
			stops: Vec::new(),
		}
	}

	pub fn linear() -> Self {
		Self::new(GradientElement::Linear)
	}

	pub fn radial() -> Self {
		Self::new(GradientElement::Radial)
	}

	pub fn apply_attributes(&mut self, attributes: &[Attribute]) {
		for &Attribute { name, value } in attributes {
			match name {
				"id" => self.id = Some(value.to_string()),
				"gradientUnits" => {
					self.units = Some(match value.trim() {
						"userSpaceOnUse" => GradientUnits::UserSpaceOnUse,
						_ => GradientUnits::ObjectBoundingBox,
					})
				}
				"gradientTransform" => self.transform = Some(parse_transform(value)),
				"spreadMethod" => {
					self.spread = match value.trim() {
						"pad" => Some(SpreadMethod::Pad),
						"reflect" => Some(SpreadMethod::Reflect),
						"repeat" => Some(SpreadMethod::Repeat),
						other => {
							log::debug!("Unknown spread method `{other}`");
							None
						}
					}
				}
				"href" | "xlink:href" => self.href = parse_fragment(value).map(str::to_string),
				_ => {
					if let Some(coordinate) = Coordinate::from_name(self.element, name) {
						self.coordinates[coordinate as usize] = Some(parse_length(value));
					}
				}
			}
		}
	}

	/// Inserts a stop after any existing stops with an offset less than or equal to its own.
	pub fn insert_stop(&mut self, stop: GradientStop) {
		let index = self.stops.partition_point(|existing| existing.offset <= stop.offset);
		self.stops.insert(index, stop);
	}
}

/// What a shape contributes to resolving its gradient paint.
#[derive(Debug, Clone, Copy)]
pub struct PaintContext {
	/// The shape's transform from local to user space.
	pub transform: DAffine2,
	/// The shape's bounds in local space, used by `objectBoundingBox` gradients.
	pub local_bounds: Rect,
	/// Multiplied into every stop's alpha.
	pub opacity: f64,
	pub units: UnitContext,
}

#[derive(Debug, Default)]
pub struct GradientRegistry {
	definitions: Vec<GradientDefinition>,
	ids: FxHashMap<String, usize>,
}

impl GradientRegistry {
	/// Stores a definition, returning its index. A later definition with the same id replaces the earlier one for lookups.
	pub fn define(&mut self, definition: GradientDefinition) -> usize {
		let index = self.definitions.len();
		if let Some(id) = &definition.id {
			self.ids.insert(id.clone(), index);
		}
		self.definitions.push(definition);
		index
	}

	pub fn get_mut(&mut self, index: usize) -> Option<&mut GradientDefinition> {
		self.definitions.get_mut(index)
	}

	pub(crate) fn len(&self) -> usize {
		self.definitions.len()
	}

	/// The definition named `id` followed by the definitions it inherits from. Stops at missing ids and cycles.
	fn chain(&self, id: &str) -> Vec<&GradientDefinition> {
		let mut chain = Vec::new();
		let mut visited = Vec::new();
		let mut next = self.ids.get(id).copied();

		while let Some(index) = next {
			if visited.contains(&index) || chain.len() >= MAX_GRADIENT_REFERENCE_DEPTH {
				log::debug!("Gradient reference chain from `{id}` loops or is too long");
				break;
			}
			visited.push(index);
			let definition = &self.definitions[index];
			chain.push(definition);
			next = definition.href.as_deref().and_then(|href| self.ids.get(href).copied());
		}

		chain
	}

	/// Resolves `url(#id)` for a shape. Returns `None` if no gradient has that id.
	pub fn resolve(&self, id: &str, context: &PaintContext) -> Option<Paint> {
		let chain = self.chain(id);
		let head = *chain.first()?;
		let stops = chain.iter().map(|definition| &definition.stops).find(|stops| !stops.is_empty());
		let stops: Vec<_> = stops
			.into_iter()
			.flatten()
			.map(|stop| GradientStop {
				offset: stop.offset,
				color: stop.color.with_opacity(stop.color.a() as f64 / 255. * context.opacity),
			})
			.collect();

		let [.., last] = stops.as_slice() else {
			log::debug!("Gradient `{id}` has no stops");
			return Some(Paint::None);
		};
		if stops.len() == 1 {
			return Some(Paint::Color(last.color));
		}

		let units = chain.iter().find_map(|definition| definition.units).unwrap_or_default();
		let gradient_transform = chain.iter().find_map(|definition| definition.transform).unwrap_or(DAffine2::IDENTITY);
		let spread = chain.iter().find_map(|definition| definition.spread).unwrap_or_default();

		let resolver = CoordinateResolver { units, context };
		let length = |coordinate: Coordinate| {
			chain
				.iter()
				.filter(|definition| definition.element == head.element)
				.find_map(|definition| definition.coordinates[coordinate as usize])
		};
		let (kind, unit_transform) = match head.element {
			GradientElement::Linear => {
				let start = DVec2::new(
					resolver.coordinate(length(Coordinate::X1).unwrap_or(Length::ZERO), Axis::Horizontal),
					resolver.coordinate(length(Coordinate::Y1).unwrap_or(Length::ZERO), Axis::Vertical),
				);
				let end = DVec2::new(
					resolver.coordinate(length(Coordinate::X2).unwrap_or(Length::percent(100.)), Axis::Horizontal),
					resolver.coordinate(length(Coordinate::Y2).unwrap_or(Length::ZERO), Axis::Vertical),
				);
				let delta = end - start;
				// The gradient axis maps onto the unit y axis.
				(GradientKind::Linear, DAffine2::from_cols(DVec2::new(delta.y, -delta.x), delta, start))
			}
			GradientElement::Radial => {
				let center = DVec2::new(
					resolver.coordinate(length(Coordinate::Cx).unwrap_or(Length::percent(50.)), Axis::Horizontal),
					resolver.coordinate(length(Coordinate::Cy).unwrap_or(Length::percent(50.)), Axis::Vertical),
				);
				let radius = resolver.distance(length(Coordinate::R).unwrap_or(Length::percent(50.)));
				let focal = DVec2::new(
					length(Coordinate::Fx).map_or(center.x, |fx| resolver.coordinate(fx, Axis::Horizontal)),
					length(Coordinate::Fy).map_or(center.y, |fy| resolver.coordinate(fy, Axis::Vertical)),
				);
				let focal = if radius != 0. { (focal - center) / radius } else { DVec2::ZERO };
				(GradientKind::Radial { focal }, DAffine2::from_scale_angle_translation(DVec2::splat(radius), 0., center))
			}
		};

		let bounding_box = match units {
			GradientUnits::ObjectBoundingBox => DAffine2::from_scale_angle_translation(context.local_bounds.size(), 0., context.local_bounds.min()),
			GradientUnits::UserSpaceOnUse => DAffine2::IDENTITY,
		};
		let forward = context.transform * bounding_box * gradient_transform * unit_transform;

		let determinant = forward.matrix2.determinant();
		if !determinant.is_finite() || determinant.abs() < 1e-12 {
			log::debug!("Gradient `{id}` has degenerate geometry, painting its last stop");
			return Some(Paint::Color(last.color));
		}

		Some(Paint::Gradient(Gradient {
			kind,
			stops,
			spread,
			transform: forward.inverse(),
		}))
	}
}

struct CoordinateResolver<'a> {
	units: GradientUnits,
	context: &'a PaintContext,
}

impl CoordinateResolver<'_> {
	/// A fraction of the bounding box, where both plain numbers and percentages are accepted.
	fn fraction(length: Length) -> f64 {
		match length.unit {
			LengthUnit::Percent => length.value / 100.,
			_ => length.value,
		}
	}

	fn coordinate(&self, length: Length, axis: Axis) -> f64 {
		match self.units {
			GradientUnits::ObjectBoundingBox => Self::fraction(length),
			GradientUnits::UserSpaceOnUse => self.context.units.coordinate(length, axis),
		}
	}

	fn distance(&self, length: Length) -> f64 {
		match self.units {
			GradientUnits::ObjectBoundingBox => Self::fraction(length),
			GradientUnits::UserSpaceOnUse => self.context.units.to_pixels(length, Axis::Diagonal),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::values::Color;

	fn attributes<'a>(pairs: &[(&'a str, &'a str)]) -> Vec<Attribute<'a>> {
		pairs.iter().map(|&(name, value)| Attribute { name, value }).collect()
	}

	fn stop(offset: f64, color: Color) -> GradientStop {
		GradientStop { offset, color }
	}

	fn context() -> PaintContext {
		PaintContext {
			transform: DAffine2::IDENTITY,
			local_bounds: Rect([DVec2::new(10., 10.), DVec2::new(30., 20.)]),
			opacity: 1.,
			units: UnitContext {
				dpi: 96.,
				viewport_origin: DVec2::ZERO,
				viewport_size: DVec2::new(100., 100.),
				font_size: 16.,
			},
		}
	}

	fn red_to_blue(id: &str) -> GradientDefinition {
		let mut definition = GradientDefinition::linear();
		definition.apply_attributes(&attributes(&[("id", id)]));
		definition.insert_stop(stop(1., Color::from_rgb8(0, 0, 255)));
		definition.insert_stop(stop(0., Color::from_rgb8(255, 0, 0)));
		definition
	}

	fn gradient(paint: Option<Paint>) -> Gradient {
		match paint {
			Some(Paint::Gradient(gradient)) => gradient,
			other => panic!("expected a gradient, got {other:?}"),
		}
	}

	#[test]
	fn test_stops_are_sorted_stably() {
		let mut definition = GradientDefinition::linear();
		definition.insert_stop(stop(0.5, Color::WHITE));
		definition.insert_stop(stop(0., Color::BLACK));
		definition.insert_stop(stop(0.5, Color::TRANSPARENT));
		let offsets: Vec<_> = definition.stops.iter().map(|stop| (stop.offset, stop.color)).collect();
		assert_eq!(offsets, vec![(0., Color::BLACK), (0.5, Color::WHITE), (0.5, Color::TRANSPARENT)]);
	}

	#[test]
	fn test_object_bounding_box_linear() {
		let mut registry = GradientRegistry::default();
		registry.define(red_to_blue("g"));

		let gradient = gradient(registry.resolve("g", &context()));
		assert_eq!(gradient.kind, GradientKind::Linear);
		// The default axis runs along the top edge of the bounding box, from its left to its right side.
		let start = gradient.transform.transform_point2(DVec2::new(10., 15.));
		let end = gradient.transform.transform_point2(DVec2::new(30., 15.));
		assert!((start.y - 0.).abs() < 1e-9, "{start:?}");
		assert!((end.y - 1.).abs() < 1e-9, "{end:?}");
	}

	#[test]
	fn test_user_space_radial() {
		let mut registry = GradientRegistry::default();
		let mut definition = GradientDefinition::radial();
		definition.apply_attributes(&attributes(&[("id", "r"), ("gradientUnits", "userSpaceOnUse"), ("cx", "50"), ("cy", "40"), ("r", "10"), ("fx", "55")]));
		definition.stops = red_to_blue("unused").stops;
		registry.define(definition);

		let gradient = gradient(registry.resolve("r", &context()));
		assert_eq!(gradient.kind, GradientKind::Radial { focal: DVec2::new(0.5, 0.) });
		let edge = gradient.transform.transform_point2(DVec2::new(60., 40.));
		assert!((edge.length() - 1.).abs() < 1e-9);
		assert!(gradient.transform.transform_point2(DVec2::new(50., 40.)).length() < 1e-9);
	}

	#[test]
	fn test_href_inherits_stops_and_survives_cycles() {
		let mut registry = GradientRegistry::default();
		registry.define(red_to_blue("base"));
		let mut child = GradientDefinition::linear();
		child.apply_attributes(&attributes(&[("id", "child"), ("xlink:href", "#base"), ("spreadMethod", "reflect")]));
		registry.define(child);

		let resolved = gradient(registry.resolve("child", &context()));
		assert_eq!(resolved.stops.len(), 2);
		assert_eq!(resolved.spread, SpreadMethod::Reflect);

		let mut a = GradientDefinition::linear();
		a.apply_attributes(&attributes(&[("id", "a"), ("href", "#b")]));
		let mut b = GradientDefinition::linear();
		b.apply_attributes(&attributes(&[("id", "b"), ("href", "#a")]));
		registry.define(a);
		registry.define(b);
		assert_eq!(registry.resolve("a", &context()), Some(Paint::None));
	}

	#[test]
	fn test_fallbacks() {
		let mut registry = GradientRegistry::default();
		assert_eq!(registry.resolve("missing", &context()), None);

		let mut single = GradientDefinition::linear();
		single.apply_attributes(&attributes(&[("id", "single")]));
		single.insert_stop(stop(0.3, Color::from_rgb8(1, 2, 3)));
		registry.define(single);
		assert_eq!(registry.resolve("single", &context()), Some(Paint::Color(Color::from_rgb8(1, 2, 3))));

		let mut flat = red_to_blue("flat");
		flat.apply_attributes(&attributes(&[("x2", "0")]));
		registry.define(flat);
		assert_eq!(registry.resolve("flat", &context()), Some(Paint::Color(Color::from_rgb8(0, 0, 255))));
	}

	#[test]
	fn test_opacity_applies_to_stops() {
		let mut registry = GradientRegistry::default();
		registry.define(red_to_blue("g"));
		let context = PaintContext { opacity: 0.5, ..context() };
		let gradient = gradient(registry.resolve("g", &context));
		assert!(gradient.stops.iter().all(|stop| stop.color.a() == 127));
	}
}
