//! Cubic bezier paths, and the interpreters that build them from path data and primitive shapes.

pub mod arc;
pub mod bounds;
pub mod data;
pub mod shapes;

use crate::rect::Rect;
use bounds::path_bounds;
use glam::{DAffine2, DVec2};

/// A connected chain of cubic bezier segments.
///
/// The points are laid out as `start, (control, control, end)*`, so consecutive segments share an end point.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
	points: Vec<DVec2>,
	closed: bool,
	bounds: Rect,
}

impl Path {
	/// Builds a path from its point list, computing tight bounds. Returns `None` unless the list holds at least one segment.
	pub fn new(points: Vec<DVec2>, closed: bool) -> Option<Self> {
		if points.len() < 4 {
			return None;
		}
		let bounds = path_bounds(&points)?;
		Some(Self { points, closed, bounds })
	}

	pub fn points(&self) -> &[DVec2] {
		&self.points
	}

	/// Whether the subpath was explicitly closed. Open subpaths are still filled as if closed.
	pub fn is_closed(&self) -> bool {
		self.closed
	}

	pub fn bounds(&self) -> Rect {
		self.bounds
	}

	/// Iterate over the cubic segments as `[start, control, control, end]`.
	pub fn segments(&self) -> impl Iterator<Item = [DVec2; 4]> + '_ {
		self.points.windows(4).step_by(3).map(|window| [window[0], window[1], window[2], window[3]])
	}

	pub fn segment_count(&self) -> usize {
		(self.points.len() - 1) / 3
	}

	/// Applies an affine transform to every point and recomputes the bounds.
	#[must_use]
	pub fn transformed(&self, transform: DAffine2) -> Self {
		self.map_points(|point| transform.transform_point2(point))
	}

	#[must_use]
	pub(crate) fn map_points(&self, map: impl Fn(DVec2) -> DVec2) -> Self {
		let points: Vec<_> = self.points.iter().copied().map(map).collect();
		let bounds = path_bounds(&points).unwrap_or_default();
		Self { points, closed: self.closed, bounds }
	}
}

/// Accumulates subpaths from move/line/cubic commands.
#[derive(Debug, Default)]
pub struct PathBuilder {
	points: Vec<DVec2>,
	paths: Vec<Path>,
}

impl PathBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// The pen position, or the origin if nothing has been drawn.
	pub fn current(&self) -> DVec2 {
		self.points.last().copied().unwrap_or_default()
	}

	fn start(&self) -> Option<DVec2> {
		self.points.first().copied()
	}

	/// Ends the current subpath as open and starts a new one at `point`.
	pub fn move_to(&mut self, point: DVec2) {
		self.commit(false);
		self.points.push(point);
	}

	fn ensure_started(&mut self) {
		if self.points.is_empty() {
			self.points.push(DVec2::ZERO);
		}
	}

	/// A straight line, stored as a cubic with its controls at the thirds.
	pub fn line_to(&mut self, point: DVec2) {
		self.ensure_started();
		let from = self.current();
		let delta = point - from;
		self.points.extend([from + delta / 3., from + delta * 2. / 3., point]);
	}

	pub fn cubic_to(&mut self, control1: DVec2, control2: DVec2, point: DVec2) {
		self.ensure_started();
		self.points.extend([control1, control2, point]);
	}

	/// Elevates a quadratic segment to a cubic one.
	pub fn quadratic_to(&mut self, control: DVec2, point: DVec2) {
		self.ensure_started();
		let from = self.current();
		self.cubic_to(from + (control - from) * 2. / 3., point + (control - point) * 2. / 3., point);
	}

	/// Closes the current subpath with a line back to its start, then begins a new one there.
	pub fn close(&mut self) {
		let Some(start) = self.start() else { return };
		if self.current() != start {
			self.line_to(start);
		}
		self.commit(true);
		self.points.push(start);
	}

	fn commit(&mut self, closed: bool) {
		let points = std::mem::take(&mut self.points);
		if let Some(path) = Path::new(points, closed) {
			self.paths.push(path);
		}
	}

	/// Ends the current subpath as open and returns every subpath built, in local coordinates.
	pub fn finish(mut self) -> Vec<Path> {
		self.commit(false);
		self.paths
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_line_is_cubic_at_thirds() {
		let mut builder = PathBuilder::new();
		builder.move_to(DVec2::ZERO);
		builder.line_to(DVec2::new(3., 6.));
		let paths = builder.finish();
		assert_eq!(paths.len(), 1);
		assert_eq!(paths[0].points(), &[DVec2::ZERO, DVec2::new(1., 2.), DVec2::new(2., 4.), DVec2::new(3., 6.)]);
		assert!(!paths[0].is_closed());
	}

	#[test]
	fn test_close_adds_closing_segment() {
		let mut builder = PathBuilder::new();
		builder.move_to(DVec2::ZERO);
		builder.line_to(DVec2::new(10., 0.));
		builder.line_to(DVec2::new(10., 10.));
		builder.close();
		builder.line_to(DVec2::new(0., 10.));
		let paths = builder.finish();

		assert_eq!(paths.len(), 2);
		assert!(paths[0].is_closed());
		assert_eq!(paths[0].segment_count(), 3);
		assert_eq!(paths[0].points().last(), Some(&DVec2::ZERO));
		assert_eq!(paths[1].points()[0], DVec2::ZERO);
		assert_eq!(paths[0].bounds(), Rect([DVec2::ZERO, DVec2::new(10., 10.)]));
	}

	#[test]
	fn test_lone_moves_are_dropped() {
		let mut builder = PathBuilder::new();
		builder.move_to(DVec2::ONE);
		builder.move_to(DVec2::new(2., 2.));
		builder.close();
		assert!(builder.finish().is_empty());
	}

	#[test]
	fn test_quadratic_elevation() {
		let mut builder = PathBuilder::new();
		builder.move_to(DVec2::ZERO);
		builder.quadratic_to(DVec2::new(3., 3.), DVec2::new(6., 0.));
		let paths = builder.finish();
		assert_eq!(paths[0].points(), &[DVec2::ZERO, DVec2::new(2., 2.), DVec2::new(4., 2.), DVec2::new(6., 0.)]);
	}

	#[test]
	fn test_transformed_updates_bounds() {
		let path = Path::new(vec![DVec2::ZERO, DVec2::new(1., 0.), DVec2::new(2., 0.), DVec2::new(3., 0.)], false).unwrap();
		let moved = path.transformed(DAffine2::from_scale_angle_translation(DVec2::splat(2.), 0., DVec2::new(1., 1.)));
		assert_eq!(moved.bounds(), Rect([DVec2::new(1., 1.), DVec2::new(7., 1.)]));
	}
}
