//! Conversion of cubic subpaths into the non-horizontal edges the scanner consumes.

use crate::consts::{FLATNESS_TOLERANCE, MAX_FLATTEN_DEPTH, SUBSAMPLES};
use glam::DVec2;
use std::collections::TryReserveError;
use vector_document::Path;

/// A line segment oriented downwards, with y in sub-scanline units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
	pub x0: f64,
	pub y0: f64,
	pub x1: f64,
	pub y1: f64,
	/// +1 if the original segment pointed down, -1 if it pointed up.
	pub direction: i32,
}

/// Collects the edges of one shape's subpaths. Points stay in document space until [EdgeList::finish].
pub struct EdgeList<'a> {
	edges: &'a mut Vec<Edge>,
	previous: DVec2,
	tolerance: f64,
}

impl<'a> EdgeList<'a> {
	/// Starts an empty list reusing the storage of `edges`. `scale` sets how finely curves are subdivided.
	pub fn new(edges: &'a mut Vec<Edge>, scale: f64) -> Self {
		edges.clear();
		Self {
			edges,
			previous: DVec2::ZERO,
			tolerance: FLATNESS_TOLERANCE / scale,
		}
	}

	/// Flattens one subpath, closing it back to its first point.
	pub fn add_path(&mut self, path: &Path) -> Result<(), TryReserveError> {
		let Some(&start) = path.points().first() else { return Ok(()) };
		self.previous = start;
		for [p0, p1, p2, p3] in path.segments() {
			self.flatten_cubic(p0, p1, p2, p3, 0)?;
		}
		self.line_to(start)
	}

	fn flatten_cubic(&mut self, p1: DVec2, p2: DVec2, p3: DVec2, p4: DVec2, depth: u32) -> Result<(), TryReserveError> {
		let deviation = (p1 + p3 - p2 * 2.).abs() + (p2 + p4 - p3 * 2.).abs();
		if depth >= MAX_FLATTEN_DEPTH || deviation.x + deviation.y < self.tolerance {
			return self.line_to(p4);
		}

		let p12 = (p1 + p2) * 0.5;
		let p23 = (p2 + p3) * 0.5;
		let p34 = (p3 + p4) * 0.5;
		let p123 = (p12 + p23) * 0.5;
		let p234 = (p23 + p34) * 0.5;
		let p1234 = (p123 + p234) * 0.5;

		self.flatten_cubic(p1, p12, p123, p1234, depth + 1)?;
		self.flatten_cubic(p1234, p234, p34, p4, depth + 1)
	}

	fn line_to(&mut self, point: DVec2) -> Result<(), TryReserveError> {
		let from = std::mem::replace(&mut self.previous, point);
		if from.y == point.y || !from.is_finite() || !point.is_finite() {
			return Ok(());
		}

		let (top, bottom, direction) = if from.y < point.y { (from, point, 1) } else { (point, from, -1) };
		self.edges.try_reserve(1)?;
		self.edges.push(Edge {
			x0: top.x,
			y0: top.y,
			x1: bottom.x,
			y1: bottom.y,
			direction,
		});
		Ok(())
	}

	/// Moves the edges into device space with y in sub-scanline units and sorts them by their top.
	pub fn finish(self, translation: DVec2, scale: f64) -> &'a [Edge] {
		let subsamples = SUBSAMPLES as f64;
		let edges = self.edges;
		for edge in edges.iter_mut() {
			edge.x0 = translation.x + edge.x0 * scale;
			edge.y0 = (translation.y + edge.y0 * scale) * subsamples;
			edge.x1 = translation.x + edge.x1 * scale;
			edge.y1 = (translation.y + edge.y1 * scale) * subsamples;
		}
		edges.retain(|edge| edge.y0 < edge.y1 && edge.x0.is_finite() && edge.x1.is_finite());
		edges.sort_by(|a, b| a.y0.total_cmp(&b.y0));
		&edges[..]
	}
}
