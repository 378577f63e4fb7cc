use super::number::split_number;
use crate::consts::EX_PER_EM;
use crate::error::UnknownUnit;
use glam::DVec2;
use std::str::FromStr;

/// The unit suffix of a length value.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LengthUnit {
	/// A bare number in user units, treated as pixels.
	User,
	#[default]
	Px,
	Pt,
	Pc,
	Mm,
	Cm,
	In,
	Percent,
	Em,
	Ex,
}

impl LengthUnit {
	fn from_suffix(suffix: &str) -> Option<Self> {
		Some(match suffix {
			"" => Self::User,
			"px" => Self::Px,
			"pt" => Self::Pt,
			"pc" => Self::Pc,
			"mm" => Self::Mm,
			"cm" => Self::Cm,
			"in" => Self::In,
			"%" => Self::Percent,
			"em" => Self::Em,
			"ex" => Self::Ex,
			_ => return None,
		})
	}
}

impl FromStr for LengthUnit {
	type Err = UnknownUnit;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim() {
			"" => Err(UnknownUnit(s.to_string())),
			unit => Self::from_suffix(unit).ok_or_else(|| UnknownUnit(s.to_string())),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length {
	pub value: f64,
	pub unit: LengthUnit,
}

impl Length {
	pub const ZERO: Length = Length::new(0., LengthUnit::User);

	pub const fn new(value: f64, unit: LengthUnit) -> Self {
		Self { value, unit }
	}

	pub const fn percent(value: f64) -> Self {
		Self::new(value, LengthUnit::Percent)
	}
}

/// Parses a number followed by an optional unit suffix. Unknown suffixes keep the number as user units.
pub fn parse_length(text: &str) -> Length {
	let Some((value, suffix)) = split_number(text.trim()) else {
		return Length::ZERO;
	};
	let suffix = suffix.trim();
	let unit = LengthUnit::from_suffix(suffix).unwrap_or_else(|| {
		log::debug!("Unknown unit `{suffix}` in `{text}`, using user units");
		LengthUnit::User
	});
	Length::new(value, unit)
}

/// Which viewport dimension a percentage resolves against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
	Horizontal,
	Vertical,
	/// The normalized diagonal, `sqrt(w² + h²) / sqrt(2)`, used for radii and stroke widths.
	Diagonal,
}

/// Everything needed to turn a [Length] into pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitContext {
	pub dpi: f64,
	pub viewport_origin: DVec2,
	pub viewport_size: DVec2,
	pub font_size: f64,
}

impl UnitContext {
	/// Converts a distance to pixels. Percentages are relative to the chosen viewport extent.
	pub fn to_pixels(&self, length: Length, axis: Axis) -> f64 {
		let Length { value, unit } = length;
		match unit {
			LengthUnit::User | LengthUnit::Px => value,
			LengthUnit::Pt => value / 72. * self.dpi,
			LengthUnit::Pc => value / 6. * self.dpi,
			LengthUnit::Mm => value / 25.4 * self.dpi,
			LengthUnit::Cm => value / 2.54 * self.dpi,
			LengthUnit::In => value * self.dpi,
			LengthUnit::Em => value * self.font_size,
			LengthUnit::Ex => value * self.font_size * EX_PER_EM,
			LengthUnit::Percent => value / 100. * self.extent(axis),
		}
	}

	/// Converts a position to pixels. Percentages are additionally offset by the viewport origin.
	pub fn coordinate(&self, length: Length, axis: Axis) -> f64 {
		let origin = match (length.unit, axis) {
			(LengthUnit::Percent, Axis::Horizontal) => self.viewport_origin.x,
			(LengthUnit::Percent, Axis::Vertical) => self.viewport_origin.y,
			_ => 0.,
		};
		origin + self.to_pixels(length, axis)
	}

	fn extent(&self, axis: Axis) -> f64 {
		match axis {
			Axis::Horizontal => self.viewport_size.x,
			Axis::Vertical => self.viewport_size.y,
			Axis::Diagonal => self.viewport_size.length() / std::f64::consts::SQRT_2,
		}
	}
}
