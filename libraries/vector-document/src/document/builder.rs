//! Turns tokenizer events into a [Document].
//!
//! Elements are dispatched by an explicit state machine. Each open element records the state it put the parser in, and
//! whether it pushed an entry onto the attribute stack, so closing it restores the enclosing state exactly.

use super::attributes::AttributeStack;
use super::gradient::{GradientDefinition, GradientRegistry, PaintContext};
use super::viewbox::{PreserveAspectRatio, Viewport, parse_view_box};
use super::{Document, GradientStop, Paint, ParseOptions, Shape};
use crate::error::ParseError;
use crate::path::data::parse_path_data;
use crate::path::{Path, shapes};
use crate::rect::Rect;
use crate::tokenizer::{Attribute, Tokenizer, XmlEvent};
use crate::values::number::Cursor;
use crate::values::{Axis, Length, PaintSpec, UnitContext, parse_length};
use glam::{DAffine2, DVec2};

/// What the innermost open element allows as children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
	/// Top level, before or outside any group.
	Content,
	/// Inside `svg` or `g`: shapes, groups, gradients and `defs` are accepted.
	Group,
	/// Inside a shape element. Children are ignored.
	Shape,
	/// Inside a gradient element. Only `stop` is accepted.
	Gradient,
	/// Inside a `stop`. Children are ignored.
	GradientStop,
	/// Inside `defs`. Only gradients are accepted.
	Defs,
}

impl ParserState {
	/// The state entered by opening `element` in this state, or `None` if the element is ignored here.
	pub fn transition(self, element: &str) -> Option<ParserState> {
		match (self, element) {
			(ParserState::Gradient, "stop") => Some(ParserState::GradientStop),
			(ParserState::Defs, "linearGradient" | "radialGradient") => Some(ParserState::Gradient),
			(ParserState::Content | ParserState::Group, "svg" | "g") => Some(ParserState::Group),
			(ParserState::Content | ParserState::Group, "path" | "rect" | "circle" | "ellipse" | "line" | "polyline" | "polygon") => Some(ParserState::Shape),
			(ParserState::Content | ParserState::Group, "linearGradient" | "radialGradient") => Some(ParserState::Gradient),
			(ParserState::Content | ParserState::Group, "defs") => Some(ParserState::Defs),
			_ => None,
		}
	}
}

struct Frame<'a> {
	name: &'a str,
	state: ParserState,
	pushed_attributes: bool,
	opened_gradient: bool,
}

/// A shape whose paints still refer to gradients by id.
struct PendingShape {
	id: Option<String>,
	paths: Vec<Path>,
	local_bounds: Rect,
	transform: DAffine2,
	fill: PaintSpec,
	fill_opacity: f64,
	stroke: PaintSpec,
	stroke_opacity: f64,
	opacity: f64,
	stroke_width: f64,
}

pub struct DocumentBuilder {
	options: ParseOptions,
	attributes: AttributeStack,
	gradients: GradientRegistry,
	current_gradient: Option<usize>,
	shapes: Vec<PendingShape>,
	viewport: Viewport,
	seen_root: bool,
}

impl DocumentBuilder {
	pub fn new(options: &ParseOptions) -> Self {
		Self {
			options: *options,
			attributes: AttributeStack::new(options.max_depth),
			gradients: GradientRegistry::default(),
			current_gradient: None,
			shapes: Vec::new(),
			viewport: Viewport::default(),
			seen_root: false,
		}
	}

	pub fn build(mut self, text: &str) -> Result<Document, ParseError> {
		let mut frames: Vec<Frame> = Vec::new();

		for event in Tokenizer::new(text) {
			match event {
				XmlEvent::StartTag { name, attributes } => {
					if frames.len() >= self.options.max_depth {
						return Err(ParseError::DepthExceeded { limit: self.options.max_depth });
					}
					let parent = frames.last().map_or(ParserState::Content, |frame| frame.state);
					let frame = self.start_element(parent, name, &attributes)?;
					frames.push(frame);
				}
				XmlEvent::EndTag { name } => {
					let Some(index) = frames.iter().rposition(|frame| frame.name == name) else {
						log::debug!("Ignoring unmatched </{name}>");
						continue;
					};
					for frame in frames.drain(index..).rev() {
						self.end_element(&frame);
					}
				}
				XmlEvent::Content(_) => {}
			}
		}

		Ok(self.finish())
	}

	fn units(&self) -> UnitContext {
		let (viewport_origin, viewport_size) = self.viewport.reference_box();
		UnitContext {
			dpi: self.options.dpi,
			viewport_origin,
			viewport_size,
			font_size: self.attributes.current().font_size,
		}
	}

	fn start_element<'a>(&mut self, parent: ParserState, name: &'a str, attributes: &[Attribute]) -> Result<Frame<'a>, ParseError> {
		let mut frame = Frame {
			name,
			state: parent,
			pushed_attributes: false,
			opened_gradient: false,
		};
		// Unknown or misplaced elements keep the enclosing state for their children.
		let Some(state) = parent.transition(name) else { return Ok(frame) };
		frame.state = state;

		match state {
			ParserState::Group => {
				if name == "svg" && !self.seen_root {
					self.seen_root = true;
					self.read_root(attributes);
				}
				self.attributes.push()?;
				frame.pushed_attributes = true;
				self.apply_presentation(attributes);
			}
			ParserState::Shape => self.add_shape(name, attributes)?,
			ParserState::Gradient => {
				let mut definition = if name == "radialGradient" { GradientDefinition::radial() } else { GradientDefinition::linear() };
				definition.apply_attributes(attributes);
				self.current_gradient = Some(self.gradients.define(definition));
				frame.opened_gradient = true;
			}
			ParserState::GradientStop => self.add_stop(attributes),
			ParserState::Content | ParserState::Defs => {}
		}

		Ok(frame)
	}

	fn end_element(&mut self, frame: &Frame) {
		if frame.pushed_attributes {
			self.attributes.pop();
		}
		if frame.opened_gradient {
			self.current_gradient = None;
		}
	}

	fn apply_presentation(&mut self, attributes: &[Attribute]) {
		let units = self.units();
		let state = self.attributes.current_mut();
		for attribute in attributes {
			state.apply(attribute.name, attribute.value, &units);
		}
	}

	fn read_root(&mut self, attributes: &[Attribute]) {
		let units = self.units();
		for &Attribute { name, value } in attributes {
			match name {
				"width" => self.viewport.size.x = units.to_pixels(parse_length(value), Axis::Horizontal),
				"height" => self.viewport.size.y = units.to_pixels(parse_length(value), Axis::Vertical),
				"viewBox" => self.viewport.view_box = parse_view_box(value),
				"preserveAspectRatio" => self.viewport.aspect = PreserveAspectRatio::parse(value),
				_ => {}
			}
		}
	}

	fn add_stop(&mut self, attributes: &[Attribute]) {
		let units = self.units();
		let mut state = self.attributes.current().clone();
		state.stop_offset = 0.;
		state.stop_color = crate::values::Color::BLACK;
		state.stop_opacity = 1.;
		for attribute in attributes {
			state.apply(attribute.name, attribute.value, &units);
		}

		let stop = GradientStop {
			offset: state.stop_offset,
			color: state.stop_color.with_opacity(state.stop_opacity),
		};
		if let Some(gradient) = self.current_gradient.and_then(|index| self.gradients.get_mut(index)) {
			gradient.insert_stop(stop);
		}
	}

	fn add_shape(&mut self, element: &str, attributes: &[Attribute]) -> Result<(), ParseError> {
		self.attributes.push()?;
		self.apply_presentation(attributes);

		let units = self.units();
		let local_paths = lower_shape(element, attributes, &units);
		let state = self.attributes.current();

		if !state.visible {
			log::trace!("Skipping hidden <{element}>");
		} else if let Some(local_bounds) = local_paths.iter().map(Path::bounds).reduce(Rect::combine_bounds) {
			let transform = state.transform;
			let scale = transform.matrix2.x_axis.x.abs().max(transform.matrix2.y_axis.y.abs());
			self.shapes.push(PendingShape {
				id: attribute(attributes, "id").map(str::to_string),
				paths: local_paths.iter().map(|path| path.transformed(transform)).collect(),
				local_bounds,
				transform,
				fill: state.fill.clone(),
				fill_opacity: state.fill_opacity,
				stroke: state.stroke.clone(),
				stroke_opacity: state.stroke_opacity,
				opacity: state.opacity,
				stroke_width: state.stroke_width * scale,
			});
		}

		self.attributes.pop();
		Ok(())
	}

	fn resolve_paint(&self, spec: &PaintSpec, opacity: f64, shape: &PendingShape, units: &UnitContext) -> Paint {
		match spec {
			PaintSpec::None => Paint::None,
			PaintSpec::Color(color) => Paint::Color(color.with_opacity(opacity)),
			PaintSpec::Reference(id) => {
				let context = PaintContext {
					transform: shape.transform,
					local_bounds: shape.local_bounds,
					opacity,
					units: *units,
				};
				self.gradients.resolve(id, &context).unwrap_or_else(|| {
					log::warn!("Unresolved paint reference `url(#{id})`");
					Paint::None
				})
			}
		}
	}

	fn finish(self) -> Document {
		let units = self.units();

		let mut shapes: Vec<Shape> = self
			.shapes
			.iter()
			.map(|pending| {
				let bounds = pending.paths.iter().map(Path::bounds).reduce(Rect::combine_bounds).unwrap_or_default();
				Shape {
					id: pending.id.clone(),
					paths: pending.paths.clone(),
					fill: self.resolve_paint(&pending.fill, pending.fill_opacity, pending, &units),
					stroke: self.resolve_paint(&pending.stroke, pending.stroke_opacity, pending, &units),
					opacity: pending.opacity,
					stroke_width: pending.stroke_width,
					bounds,
				}
			})
			.collect();

		let content_bounds = shapes.iter().map(Shape::bounds).reduce(Rect::combine_bounds);
		let pixels_per_unit = units.to_pixels(Length::new(1., self.options.units), Axis::Horizontal);
		let unit_scale = if pixels_per_unit.is_finite() && pixels_per_unit > 0. { 1. / pixels_per_unit } else { 1. };
		let normalization = self.viewport.normalize(content_bounds, unit_scale);

		let determinant = normalization.transform.matrix2.determinant();
		if determinant.is_finite() && determinant > 0. {
			let inverse = normalization.transform.inverse();
			for shape in &mut shapes {
				shape.paths = shape.paths.iter().map(|path| path.transformed(normalization.transform)).collect();
				shape.bounds = shape.paths.iter().map(Path::bounds).reduce(Rect::combine_bounds).unwrap_or_default();
				shape.stroke_width *= normalization.average_scale;
				for paint in [&mut shape.fill, &mut shape.stroke] {
					if let Paint::Gradient(gradient) = paint {
						gradient.transform = gradient.transform * inverse;
					}
				}
			}
		} else if !shapes.is_empty() {
			log::debug!("Degenerate view box, leaving coordinates unscaled");
		}

		log::debug!(
			"Parsed {} shapes and {} gradients, intrinsic size {}x{}",
			shapes.len(),
			self.gradients.len(),
			normalization.size.x,
			normalization.size.y
		);

		Document {
			width: normalization.size.x,
			height: normalization.size.y,
			shapes,
		}
	}
}

/// The last value of the named attribute.
fn attribute<'a>(attributes: &[Attribute<'a>], name: &str) -> Option<&'a str> {
	attributes.iter().rev().find(|attribute| attribute.name == name).map(|attribute| attribute.value)
}

/// Converts a shape element's geometry attributes into local subpaths.
fn lower_shape(element: &str, attributes: &[Attribute], units: &UnitContext) -> Vec<Path> {
	let length = |name: &str| attribute(attributes, name).map(parse_length);
	let coordinate = |name: &str, axis: Axis| length(name).map_or(0., |length| units.coordinate(length, axis));
	let distance = |name: &str, axis: Axis| length(name).map(|length| units.to_pixels(length, axis));

	match element {
		"path" => attribute(attributes, "d").map(parse_path_data).unwrap_or_default(),
		"rect" => {
			let origin = DVec2::new(coordinate("x", Axis::Horizontal), coordinate("y", Axis::Vertical));
			let size = DVec2::new(distance("width", Axis::Horizontal).unwrap_or(0.), distance("height", Axis::Vertical).unwrap_or(0.));
			if size.x <= 0. || size.y <= 0. {
				return Vec::new();
			}
			let rx = distance("rx", Axis::Horizontal).filter(|&rx| rx > 0.);
			let ry = distance("ry", Axis::Vertical).filter(|&ry| ry > 0.);
			let radii = DVec2::new(rx.or(ry).unwrap_or(0.), ry.or(rx).unwrap_or(0.)).min(size / 2.);
			shapes::rect(origin, size, radii)
		}
		"circle" => {
			let center = DVec2::new(coordinate("cx", Axis::Horizontal), coordinate("cy", Axis::Vertical));
			match distance("r", Axis::Diagonal) {
				Some(r) if r > 0. => shapes::ellipse(center, DVec2::splat(r)),
				_ => Vec::new(),
			}
		}
		"ellipse" => {
			let center = DVec2::new(coordinate("cx", Axis::Horizontal), coordinate("cy", Axis::Vertical));
			match (distance("rx", Axis::Horizontal), distance("ry", Axis::Vertical)) {
				(Some(rx), Some(ry)) if rx > 0. && ry > 0. => shapes::ellipse(center, DVec2::new(rx, ry)),
				_ => Vec::new(),
			}
		}
		"line" => {
			let start = DVec2::new(coordinate("x1", Axis::Horizontal), coordinate("y1", Axis::Vertical));
			let end = DVec2::new(coordinate("x2", Axis::Horizontal), coordinate("y2", Axis::Vertical));
			shapes::polyline(&[start, end], false)
		}
		"polyline" | "polygon" => {
			let numbers = attribute(attributes, "points").map(|points| Cursor::new(points).numbers()).unwrap_or_default();
			let points: Vec<_> = numbers.chunks_exact(2).map(|pair| DVec2::new(pair[0], pair[1])).collect();
			shapes::polyline(&points, element == "polygon")
		}
		_ => Vec::new(),
	}
}
