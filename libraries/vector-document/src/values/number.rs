use crate::tokenizer::is_space;

/// Splits the longest numeric prefix off `text`.
///
/// Accepts an optional sign, digits with an optional fraction, and an optional exponent. An `e` followed
/// by `m` or `x` is left alone so that `2em` and `3ex` keep their units. A second `.` ends the number, so
/// `0.5.5` scans as `0.5` followed by `.5`.
pub fn split_number(text: &str) -> Option<(f64, &str)> {
	let bytes = text.as_bytes();
	let mut end = 0;

	if matches!(bytes.first(), Some(b'+' | b'-')) {
		end += 1;
	}
	let integer_start = end;
	while bytes.get(end).is_some_and(u8::is_ascii_digit) {
		end += 1;
	}
	let mut digits = end - integer_start;

	if bytes.get(end) == Some(&b'.') {
		let fraction_start = end + 1;
		let mut fraction_end = fraction_start;
		while bytes.get(fraction_end).is_some_and(u8::is_ascii_digit) {
			fraction_end += 1;
		}
		digits += fraction_end - fraction_start;
		end = fraction_end;
	}
	if digits == 0 {
		return None;
	}

	if matches!(bytes.get(end), Some(b'e' | b'E')) && !matches!(bytes.get(end + 1), Some(b'm' | b'x')) {
		let mut exponent_end = end + 1;
		if matches!(bytes.get(exponent_end), Some(b'+' | b'-')) {
			exponent_end += 1;
		}
		let exponent_digits_start = exponent_end;
		while bytes.get(exponent_end).is_some_and(u8::is_ascii_digit) {
			exponent_end += 1;
		}
		if exponent_end > exponent_digits_start {
			end = exponent_end;
		}
	}

	let value = text[..end].parse::<f64>().ok()?;
	Some((value, &text[end..]))
}

/// Parses a leading number, ignoring anything that follows it. Returns zero if there is none.
pub fn parse_number(text: &str) -> f64 {
	split_number(text.trim_start_matches(is_space)).map_or(0., |(value, _)| value)
}

/// A cursor over whitespace and comma separated numeric data, shared by path data, point lists,
/// transform arguments and the `viewBox` attribute.
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
	rest: &'a str,
}

impl<'a> Cursor<'a> {
	pub fn new(text: &'a str) -> Self {
		Self { rest: text }
	}

	pub fn skip_separators(&mut self) {
		self.rest = self.rest.trim_start_matches(|c: char| is_space(c) || c == ',');
	}

	pub fn is_empty(&mut self) -> bool {
		self.skip_separators();
		self.rest.is_empty()
	}

	pub fn peek(&mut self) -> Option<char> {
		self.skip_separators();
		self.rest.chars().next()
	}

	pub fn advance(&mut self, c: char) {
		self.rest = &self.rest[c.len_utf8()..];
	}

	pub fn number(&mut self) -> Option<f64> {
		self.skip_separators();
		let (value, rest) = split_number(self.rest)?;
		self.rest = rest;
		Some(value)
	}

	/// Reads a single `0` or `1` character, which arc flags may pack without separators.
	pub fn flag(&mut self) -> Option<bool> {
		self.skip_separators();
		let flag = match self.rest.as_bytes().first() {
			Some(b'0') => false,
			Some(b'1') => true,
			_ => return None,
		};
		self.rest = &self.rest[1..];
		Some(flag)
	}

	/// Collects numbers until the first non-numeric token.
	pub fn numbers(&mut self) -> Vec<f64> {
		std::iter::from_fn(|| self.number()).collect()
	}
}
