use super::number::Cursor;
use glam::{DAffine2, DMat2, DVec2};

/// Parses a `transform` list such as `translate(10 20) rotate(45)`.
///
/// Each function is composed onto the right of the running matrix, so the rightmost function applies to points first.
/// Functions with the wrong number of arguments are skipped, and parsing stops at the first token that is not a function.
pub fn parse_transform(text: &str) -> DAffine2 {
	let mut transform = DAffine2::IDENTITY;
	let mut rest = text;

	loop {
		rest = rest.trim_start_matches(|c: char| c.is_ascii_whitespace() || c == ',');
		let name_length = rest.find(|c: char| !c.is_ascii_alphabetic()).unwrap_or(rest.len());
		if name_length == 0 {
			break;
		}
		let name = &rest[..name_length];

		let Some(arguments) = rest[name_length..].trim_start().strip_prefix('(') else {
			log::debug!("Transform function `{name}` is missing its argument list");
			break;
		};
		let Some(close) = arguments.find(')') else {
			log::debug!("Transform function `{name}` is missing a closing parenthesis");
			break;
		};
		rest = &arguments[close + 1..];

		let values = Cursor::new(&arguments[..close]).numbers();
		match transform_function(name, &values) {
			Some(function) => transform = transform * function,
			None => log::debug!("Ignoring transform `{name}` with arguments {values:?}"),
		}
	}

	transform
}

fn transform_function(name: &str, values: &[f64]) -> Option<DAffine2> {
	Some(match (name, values) {
		("matrix", &[a, b, c, d, e, f]) => DAffine2::from_cols_array(&[a, b, c, d, e, f]),
		("translate", &[x]) => DAffine2::from_translation(DVec2::new(x, 0.)),
		("translate", &[x, y]) => DAffine2::from_translation(DVec2::new(x, y)),
		("scale", &[s]) => DAffine2::from_scale(DVec2::splat(s)),
		("scale", &[x, y]) => DAffine2::from_scale(DVec2::new(x, y)),
		("rotate", &[angle]) => DAffine2::from_angle(angle.to_radians()),
		("rotate", &[angle, x, y]) => {
			let center = DVec2::new(x, y);
			DAffine2::from_translation(center) * DAffine2::from_angle(angle.to_radians()) * DAffine2::from_translation(-center)
		}
		("skewX", &[angle]) => DAffine2::from_mat2(DMat2::from_cols(DVec2::X, DVec2::new(angle.to_radians().tan(), 1.))),
		("skewY", &[angle]) => DAffine2::from_mat2(DMat2::from_cols(DVec2::new(1., angle.to_radians().tan()), DVec2::Y)),
		_ => return None,
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn assert_close(a: DAffine2, b: DAffine2) {
		assert!(a.abs_diff_eq(b, 1e-9), "{a:?} != {b:?}");
	}

	#[test]
	fn test_functions() {
		assert_close(parse_transform("matrix(1 2 3 4 5 6)"), DAffine2::from_cols_array(&[1., 2., 3., 4., 5., 6.]));
		assert_close(parse_transform("translate(5)"), DAffine2::from_translation(DVec2::new(5., 0.)));
		assert_close(parse_transform("scale(2)"), DAffine2::from_scale(DVec2::splat(2.)));
		assert_close(parse_transform("scale(2,3)"), DAffine2::from_scale(DVec2::new(2., 3.)));

		let skew = parse_transform("skewX(45)");
		assert!((skew.transform_point2(DVec2::new(0., 1.)) - DVec2::new(1., 1.)).length() < 1e-9);
		let skew = parse_transform("skewY(45)");
		assert!((skew.transform_point2(DVec2::new(1., 0.)) - DVec2::new(1., 1.)).length() < 1e-9);
	}

	#[test]
	fn test_rotate_about_center() {
		let transform = parse_transform("rotate(90 10 10)");
		assert!((transform.transform_point2(DVec2::new(20., 10.)) - DVec2::new(10., 20.)).length() < 1e-9);
		assert!((transform.transform_point2(DVec2::new(10., 10.)) - DVec2::new(10., 10.)).length() < 1e-9);
	}

	#[test]
	fn test_composition_order() {
		// The scale applies first, then the translation.
		let transform = parse_transform("translate(10, 0) scale(2)");
		assert_eq!(transform.transform_point2(DVec2::new(1., 1.)), DVec2::new(12., 2.));
	}

	#[test]
	fn test_malformed_lists() {
		assert_close(parse_transform("matrix(1 2 3) scale(2)"), DAffine2::from_scale(DVec2::splat(2.)));
		assert_close(parse_transform("scale(2) bogus"), DAffine2::from_scale(DVec2::splat(2.)));
		assert_close(parse_transform("scale(2"), DAffine2::IDENTITY);
		assert_close(parse_transform(""), DAffine2::IDENTITY);
	}
}
