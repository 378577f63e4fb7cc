//! A small, forgiving XML tokenizer.
//!
//! It walks the whole buffer once and yields start-tag, end-tag and content events. It knows nothing about
//! namespaces, entities or DTDs: comments, processing instructions, CDATA sections and doctype declarations
//! are skipped as opaque blocks. Malformed attributes are dropped, and an unterminated document simply ends
//! the event stream at the last complete token.

use crate::consts::MAX_ATTRIBUTES;

/// A single `name="value"` pair of a start tag. Both slices borrow from the input buffer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Attribute<'a> {
	pub name: &'a str,
	pub value: &'a str,
}

/// An event produced by the [Tokenizer].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum XmlEvent<'a> {
	/// An opening tag such as `<rect x="1">`. A self-closing tag yields this followed by a matching [XmlEvent::EndTag].
	StartTag { name: &'a str, attributes: Vec<Attribute<'a>> },
	/// A closing tag such as `</g>`.
	EndTag { name: &'a str },
	/// Text between tags, with leading whitespace removed. Never empty.
	Content(&'a str),
}

pub struct Tokenizer<'a> {
	input: &'a str,
	position: usize,
	pending_end: Option<&'a str>,
}

impl<'a> Tokenizer<'a> {
	pub fn new(input: &'a str) -> Self {
		Self { input, position: 0, pending_end: None }
	}

	fn remaining(&self) -> &'a str {
		&self.input[self.position..]
	}

	/// Moves past the first occurrence of `terminator` after `skip` bytes, or to the end of input if it never occurs.
	fn skip_past(&mut self, skip: usize, terminator: &str) {
		let rest = self.remaining();
		self.position = match rest.get(skip..).and_then(|tail| tail.find(terminator)) {
			Some(offset) => self.position + skip + offset + terminator.len(),
			None => self.input.len(),
		};
	}

	/// Finds the `>` closing the tag that starts at the current position, ignoring any `>` inside quoted values.
	///
	/// A value still open at the next `<` or at the end of input was never terminated. The tag then ends at its first `>`
	/// so only the broken attribute is lost.
	fn find_tag_end(&self) -> Option<usize> {
		let rest = self.remaining();
		let mut quote = None;
		for (index, byte) in rest.bytes().enumerate().skip(1) {
			match (quote, byte) {
				(None, b'"' | b'\'') => quote = Some(byte),
				(Some(open), _) if open == byte => quote = None,
				(Some(_), b'<') => break,
				(None, b'>') => return Some(index),
				_ => {}
			}
		}
		rest.find('>')
	}
}

impl<'a> Iterator for Tokenizer<'a> {
	type Item = XmlEvent<'a>;

	fn next(&mut self) -> Option<Self::Item> {
		if let Some(name) = self.pending_end.take() {
			return Some(XmlEvent::EndTag { name });
		}

		while self.position < self.input.len() {
			let rest = self.remaining();

			if !rest.starts_with('<') {
				let length = rest.find('<').unwrap_or(rest.len());
				self.position += length;
				let text = rest[..length].trim_start_matches(is_space);
				if !text.is_empty() {
					return Some(XmlEvent::Content(text));
				}
				continue;
			}

			if rest.starts_with("<!--") {
				self.skip_past(4, "-->");
				continue;
			}
			if rest.starts_with("<![CDATA[") {
				self.skip_past(9, "]]>");
				continue;
			}
			if rest.starts_with("<?") {
				self.skip_past(2, "?>");
				continue;
			}
			if rest.starts_with("<!") {
				self.skip_past(2, ">");
				continue;
			}

			let Some(end) = self.find_tag_end() else {
				log::debug!("Unterminated tag at byte {}, stopping", self.position);
				self.position = self.input.len();
				return None;
			};
			let body = &rest[1..end];
			self.position += end + 1;

			if let Some(event) = self.parse_tag(body) {
				return Some(event);
			}
		}

		None
	}
}

impl<'a> Tokenizer<'a> {
	fn parse_tag(&mut self, body: &'a str) -> Option<XmlEvent<'a>> {
		let body = body.trim_start_matches(is_space);

		if let Some(closing) = body.strip_prefix('/') {
			let name = take_name(closing.trim_start_matches(is_space));
			return (!name.is_empty()).then_some(XmlEvent::EndTag { name });
		}

		let trimmed = body.trim_end_matches(is_space);
		let (body, self_closing) = match trimmed.strip_suffix('/') {
			Some(body) => (body, true),
			None => (trimmed, false),
		};

		let name = take_name(body);
		if name.is_empty() {
			return None;
		}

		let attributes = parse_attributes(&body[name.len()..], name);
		if self_closing {
			self.pending_end = Some(name);
		}
		Some(XmlEvent::StartTag { name, attributes })
	}
}

fn parse_attributes<'a>(mut rest: &'a str, tag: &str) -> Vec<Attribute<'a>> {
	let mut attributes = Vec::new();

	loop {
		rest = rest.trim_start_matches(is_space);
		if rest.is_empty() {
			break;
		}
		if attributes.len() >= MAX_ATTRIBUTES {
			log::warn!("<{tag}> has more than {MAX_ATTRIBUTES} attributes, ignoring the rest");
			break;
		}

		let name_length = rest.find(|c: char| is_space(c) || c == '=').unwrap_or(rest.len());
		let name = &rest[..name_length];
		rest = rest[name_length..].trim_start_matches(is_space);

		let Some(after_equals) = rest.strip_prefix('=') else {
			log::debug!("Dropping attribute `{name}` of <{tag}> without a value");
			continue;
		};
		rest = after_equals.trim_start_matches(is_space);

		let quote = match rest.chars().next() {
			Some(quote @ ('"' | '\'')) => quote,
			_ => {
				log::debug!("Dropping attribute `{name}` of <{tag}> with an unquoted value");
				rest = rest.trim_start_matches(|c: char| !is_space(c));
				continue;
			}
		};
		let Some(value_length) = rest[1..].find(quote) else {
			log::debug!("Dropping attribute `{name}` of <{tag}> with an unterminated value");
			rest = rest[1..].trim_start_matches(|c: char| !is_space(c));
			continue;
		};
		let value = &rest[1..1 + value_length];
		rest = &rest[value_length + 2..];

		if !name.is_empty() {
			attributes.push(Attribute { name, value });
		}
	}

	attributes
}

fn take_name(text: &str) -> &str {
	let length = text.find(|c: char| is_space(c) || c == '/').unwrap_or(text.len());
	&text[..length]
}

pub(crate) fn is_space(c: char) -> bool {
	matches!(c, ' ' | '\t' | '\n' | '\u{b}' | '\u{c}' | '\r')
}
