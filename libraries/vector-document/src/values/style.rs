use super::color::{Color, parse_color};
use super::number::{parse_number, split_number};

/// A `fill` or `stroke` value before gradient references are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaintSpec {
	None,
	/// An opaque color. Opacity is applied once the shape is assembled.
	Color(Color),
	/// The id inside `url(#id)`.
	Reference(String),
}

pub fn parse_paint(text: &str) -> PaintSpec {
	let text = text.trim();
	if text == "none" {
		return PaintSpec::None;
	}
	if let Some(inner) = text.strip_prefix("url(") {
		return match parse_reference(inner) {
			Some(id) => PaintSpec::Reference(id.to_string()),
			None => {
				log::debug!("Malformed paint reference `{text}`");
				PaintSpec::None
			}
		};
	}
	PaintSpec::Color(parse_color(text))
}

/// Extracts `id` from the inside of `url(#id)`, tolerating whitespace and quotes.
fn parse_reference(inner: &str) -> Option<&str> {
	let close = inner.find(')')?;
	let id = inner[..close].trim().trim_matches(|c| c == '"' || c == '\'').trim().strip_prefix('#')?;
	(!id.is_empty()).then_some(id)
}

/// Extracts `id` from an `href`/`xlink:href` value such as `#id`.
pub fn parse_fragment(text: &str) -> Option<&str> {
	text.trim().strip_prefix('#').filter(|id| !id.is_empty())
}

/// Parses an opacity-like number clamped to `[0, 1]`.
pub fn parse_opacity(text: &str) -> f64 {
	parse_number(text).clamp(0., 1.)
}

/// Parses a gradient stop offset, either a plain number or a percentage, clamped to `[0, 1]`.
pub fn parse_offset(text: &str) -> f64 {
	let text = text.trim();
	let offset = match split_number(text) {
		Some((value, rest)) if rest.trim_start().starts_with('%') => value / 100.,
		Some((value, _)) => value,
		None => 0.,
	};
	offset.clamp(0., 1.)
}

/// Splits a `style` attribute into `(name, value)` declarations in source order.
pub fn parse_style(text: &str) -> impl Iterator<Item = (&str, &str)> {
	text.split(';').filter_map(|declaration| {
		let (name, value) = declaration.split_once(':')?;
		let name = name.trim();
		(!name.is_empty()).then(|| (name, value.trim()))
	})
}
