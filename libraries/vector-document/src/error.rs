use thiserror::Error;

/// The error type returned when a document cannot be built.
///
/// Parsing is permissive: malformed tags, unknown units, unknown colors and unresolved paint references
/// are recovered from silently. Only structural limits abort the parse.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
	#[error("Elements are nested deeper than the configured limit of {limit}")]
	DepthExceeded { limit: usize },
}

/// Returned by [crate::LengthUnit]'s `FromStr` implementation for an unrecognised unit name.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("Unknown length unit `{0}`, expected one of px, pt, pc, mm, cm, in, %, em, ex")]
pub struct UnknownUnit(pub String);
