use crate::error::ParseError;
use crate::values::style::{parse_offset, parse_opacity};
use crate::values::{Axis, Color, PaintSpec, UnitContext, parse_color, parse_length, parse_paint, parse_style, parse_transform};
use glam::DAffine2;

/// Font size assumed until a `font-size` attribute says otherwise, used to resolve `em` and `ex`.
const DEFAULT_FONT_SIZE: f64 = 16.;

/// Presentation state inherited from enclosing elements.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeState {
	pub transform: DAffine2,
	pub fill: PaintSpec,
	pub fill_opacity: f64,
	pub stroke: PaintSpec,
	pub stroke_opacity: f64,
	pub opacity: f64,
	/// In local units, before the transform is applied.
	pub stroke_width: f64,
	pub font_size: f64,
	pub visible: bool,
	pub stop_color: Color,
	pub stop_opacity: f64,
	pub stop_offset: f64,
}

impl Default for AttributeState {
	fn default() -> Self {
		Self {
			transform: DAffine2::IDENTITY,
			fill: PaintSpec::Color(Color::BLACK),
			fill_opacity: 1.,
			stroke: PaintSpec::None,
			stroke_opacity: 1.,
			opacity: 1.,
			stroke_width: 1.,
			font_size: DEFAULT_FONT_SIZE,
			visible: true,
			stop_color: Color::BLACK,
			stop_opacity: 1.,
			stop_offset: 0.,
		}
	}
}

impl AttributeState {
	/// Applies one presentation attribute or style declaration. Returns false if `name` is not a presentation attribute.
	pub fn apply(&mut self, name: &str, value: &str, units: &UnitContext) -> bool {
		match name {
			"style" => {
				for (name, value) in parse_style(value) {
					if !self.apply(name, value, units) {
						log::trace!("Ignoring style declaration `{name}: {value}`");
					}
				}
			}
			"display" => self.visible = value.trim() != "none",
			"fill" => self.fill = parse_paint(value),
			"fill-opacity" => self.fill_opacity = parse_opacity(value),
			"stroke" => self.stroke = parse_paint(value),
			"stroke-opacity" => self.stroke_opacity = parse_opacity(value),
			"opacity" => self.opacity = parse_opacity(value),
			"stroke-width" => self.stroke_width = self.units(units).to_pixels(parse_length(value), Axis::Diagonal),
			"font-size" => self.font_size = self.units(units).to_pixels(parse_length(value), Axis::Diagonal),
			"transform" => self.transform = self.transform * parse_transform(value),
			"stop-color" => self.stop_color = parse_color(value),
			"stop-opacity" => self.stop_opacity = parse_opacity(value),
			"offset" => self.stop_offset = parse_offset(value),
			_ => return false,
		}
		true
	}

	/// The unit context with this state's font size substituted.
	pub fn units(&self, units: &UnitContext) -> UnitContext {
		UnitContext { font_size: self.font_size, ..*units }
	}
}

/// The stack of inherited states, one entry per open state-carrying element.
#[derive(Debug)]
pub struct AttributeStack {
	states: Vec<AttributeState>,
	max_depth: usize,
}

impl AttributeStack {
	pub fn new(max_depth: usize) -> Self {
		Self {
			states: vec![AttributeState::default()],
			max_depth,
		}
	}

	pub fn current(&self) -> &AttributeState {
		// The root entry is never popped.
		&self.states[self.states.len() - 1]
	}

	pub fn current_mut(&mut self) -> &mut AttributeState {
		let last = self.states.len() - 1;
		&mut self.states[last]
	}

	/// Opens a child scope holding a copy of the current state.
	pub fn push(&mut self) -> Result<(), ParseError> {
		if self.states.len() > self.max_depth {
			return Err(ParseError::DepthExceeded { limit: self.max_depth });
		}
		let state = self.current().clone();
		self.states.push(state);
		Ok(())
	}

	pub fn pop(&mut self) {
		if self.states.len() > 1 {
			self.states.pop();
		}
	}
}
