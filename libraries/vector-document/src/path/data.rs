use super::arc::EndpointArc;
use super::{Path, PathBuilder};
use crate::values::number::Cursor;
use glam::DVec2;

/// Interprets a path `d` attribute into subpaths in local coordinates.
///
/// Parsing stops at the first malformed command, keeping everything drawn before it.
pub fn parse_path_data(data: &str) -> Vec<Path> {
	let mut interpreter = Interpreter::default();
	let mut cursor = Cursor::new(data);
	let mut command = None;

	while let Some(next) = cursor.peek() {
		if next.is_ascii_alphabetic() {
			cursor.advance(next);
			if !"MmLlHhVvCcSsQqTtAaZz".contains(next) {
				log::debug!("Unknown path command `{next}`, ignoring the rest of the path");
				break;
			}
			command = Some(next);
		} else if let Some(repeated) = command {
			// Extra coordinates after a move are implicit line commands.
			command = Some(match repeated {
				'M' => 'L',
				'm' => 'l',
				other => other,
			});
		} else {
			log::debug!("Path data does not start with a command");
			break;
		}

		let Some(command) = command else { break };
		if interpreter.execute(command, &mut cursor).is_none() {
			log::debug!("Path command `{command}` is missing arguments");
			break;
		}
		if matches!(command, 'Z' | 'z') {
			// A close path takes no arguments and so never repeats.
			if cursor.peek().is_some_and(|c| !c.is_ascii_alphabetic()) {
				log::debug!("Unexpected coordinates after a close path command");
				break;
			}
		}
	}

	interpreter.builder.finish()
}

#[derive(Default)]
struct Interpreter {
	builder: PathBuilder,
	/// The second control point of the previous `C` or `S` segment.
	cubic_control: Option<DVec2>,
	/// The control point of the previous `Q` or `T` segment.
	quadratic_control: Option<DVec2>,
}

impl Interpreter {
	fn point(&self, cursor: &mut Cursor, relative: bool) -> Option<DVec2> {
		let point = DVec2::new(cursor.number()?, cursor.number()?);
		Some(if relative { self.builder.current() + point } else { point })
	}

	fn execute(&mut self, command: char, cursor: &mut Cursor) -> Option<()> {
		let relative = command.is_ascii_lowercase();
		let current = self.builder.current();
		let mut cubic_control = None;
		let mut quadratic_control = None;

		match command.to_ascii_uppercase() {
			'M' => {
				let point = self.point(cursor, relative)?;
				self.builder.move_to(point);
			}
			'L' => {
				let point = self.point(cursor, relative)?;
				self.builder.line_to(point);
			}
			'H' => {
				let x = cursor.number()?;
				self.builder.line_to(DVec2::new(if relative { current.x + x } else { x }, current.y));
			}
			'V' => {
				let y = cursor.number()?;
				self.builder.line_to(DVec2::new(current.x, if relative { current.y + y } else { y }));
			}
			'C' => {
				let control1 = self.point(cursor, relative)?;
				let control2 = self.point(cursor, relative)?;
				let end = self.point(cursor, relative)?;
				self.builder.cubic_to(control1, control2, end);
				cubic_control = Some(control2);
			}
			'S' => {
				let control2 = self.point(cursor, relative)?;
				let end = self.point(cursor, relative)?;
				let control1 = self.cubic_control.map_or(current, |previous| reflect_control_point(current, previous));
				self.builder.cubic_to(control1, control2, end);
				cubic_control = Some(control2);
			}
			'Q' => {
				let control = self.point(cursor, relative)?;
				let end = self.point(cursor, relative)?;
				self.builder.quadratic_to(control, end);
				quadratic_control = Some(control);
			}
			'T' => {
				let end = self.point(cursor, relative)?;
				let control = self.quadratic_control.map_or(current, |previous| reflect_control_point(current, previous));
				self.builder.quadratic_to(control, end);
				quadratic_control = Some(control);
			}
			'A' => {
				let radii = DVec2::new(cursor.number()?, cursor.number()?);
				let x_axis_rotation = cursor.number()?;
				let large_arc = cursor.flag()?;
				let sweep = cursor.flag()?;
				let end = self.point(cursor, relative)?;
				self.arc_to(EndpointArc {
					start: current,
					radii,
					x_axis_rotation,
					large_arc,
					sweep,
					end,
				});
			}
			'Z' => self.builder.close(),
			_ => return None,
		}

		self.cubic_control = cubic_control;
		self.quadratic_control = quadratic_control;
		Some(())
	}

	fn arc_to(&mut self, arc: EndpointArc) {
		let Some(center) = arc.to_center() else {
			self.builder.line_to(arc.end);
			return;
		};
		let cubics = center.to_cubics();
		let last = cubics.len() - 1;
		for (index, [control1, control2, end]) in cubics.into_iter().enumerate() {
			// Snap the final point so rounding never opens a gap before the next command.
			let end = if index == last { arc.end } else { end };
			self.builder.cubic_to(control1, control2, end);
		}
	}
}

/// Mirror a control point about the point it is attached to.
fn reflect_control_point(point: DVec2, control: DVec2) -> DVec2 {
	point * 2. - control
}
