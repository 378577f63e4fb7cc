use super::{Path, PathBuilder};
use crate::consts::KAPPA90;
use glam::DVec2;

/// A rectangle, with elliptical corners when both radii are positive. Radii must already be clamped to half the size.
pub fn rect(origin: DVec2, size: DVec2, radii: DVec2) -> Vec<Path> {
	let mut builder = PathBuilder::new();
	let (x, y, w, h) = (origin.x, origin.y, size.x, size.y);

	if radii.x <= 0. || radii.y <= 0. {
		builder.move_to(origin);
		builder.line_to(DVec2::new(x + w, y));
		builder.line_to(origin + size);
		builder.line_to(DVec2::new(x, y + h));
	} else {
		let (rx, ry) = (radii.x, radii.y);
		let (hx, hy) = (rx * (1. - KAPPA90), ry * (1. - KAPPA90));
		builder.move_to(DVec2::new(x + rx, y));
		builder.line_to(DVec2::new(x + w - rx, y));
		builder.cubic_to(DVec2::new(x + w - hx, y), DVec2::new(x + w, y + hy), DVec2::new(x + w, y + ry));
		builder.line_to(DVec2::new(x + w, y + h - ry));
		builder.cubic_to(DVec2::new(x + w, y + h - hy), DVec2::new(x + w - hx, y + h), DVec2::new(x + w - rx, y + h));
		builder.line_to(DVec2::new(x + rx, y + h));
		builder.cubic_to(DVec2::new(x + hx, y + h), DVec2::new(x, y + h - hy), DVec2::new(x, y + h - ry));
		builder.line_to(DVec2::new(x, y + ry));
		builder.cubic_to(DVec2::new(x, y + hy), DVec2::new(x + hx, y), DVec2::new(x + rx, y));
	}

	builder.close();
	builder.finish()
}

/// An ellipse as four quarter arcs, starting at the rightmost point and turning toward +y.
pub fn ellipse(center: DVec2, radii: DVec2) -> Vec<Path> {
	let mut builder = PathBuilder::new();
	let axes = [DVec2::X, DVec2::Y, DVec2::NEG_X, DVec2::NEG_Y];

	builder.move_to(center + axes[0] * radii);
	for quadrant in 0..4 {
		let from = axes[quadrant] * radii;
		let to = axes[(quadrant + 1) % 4] * radii;
		builder.cubic_to(center + from + to * KAPPA90, center + to + from * KAPPA90, center + to);
	}

	builder.close();
	builder.finish()
}

/// A polyline through `points`, closed for polygons. Fewer than two points draw nothing.
pub fn polyline(points: &[DVec2], closed: bool) -> Vec<Path> {
	let [first, rest @ ..] = points else { return Vec::new() };
	let mut builder = PathBuilder::new();

	builder.move_to(*first);
	for &point in rest {
		builder.line_to(point);
	}
	if closed {
		builder.close();
	}
	builder.finish()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::rect::Rect;

	#[test]
	fn test_plain_rect() {
		let paths = rect(DVec2::new(1., 2.), DVec2::new(10., 20.), DVec2::ZERO);
		assert_eq!(paths.len(), 1);
		assert!(paths[0].is_closed());
		assert_eq!(paths[0].segment_count(), 4);
		assert_eq!(paths[0].bounds(), Rect([DVec2::new(1., 2.), DVec2::new(11., 22.)]));
	}

	#[test]
	fn test_rounded_rect() {
		let paths = rect(DVec2::ZERO, DVec2::new(10., 10.), DVec2::new(2., 3.));
		assert_eq!(paths[0].segment_count(), 8);
		assert_eq!(paths[0].points()[0], DVec2::new(2., 0.));
		let bounds = paths[0].bounds();
		assert!((bounds.min() - DVec2::ZERO).length() < 1e-9 && (bounds.max() - DVec2::new(10., 10.)).length() < 1e-9);
	}

	#[test]
	fn test_circle_bounds() {
		let paths = ellipse(DVec2::new(5., 5.), DVec2::splat(5.));
		assert_eq!(paths[0].segment_count(), 4);
		assert_eq!(paths[0].points()[0], DVec2::new(10., 5.));
		assert_eq!(paths[0].points()[3], DVec2::new(5., 10.));
		let bounds = paths[0].bounds();
		assert!((bounds.min() - DVec2::ZERO).length() < 1e-9 && (bounds.max() - DVec2::splat(10.)).length() < 1e-9);
	}

	#[test]
	fn test_polylines() {
		let points = [DVec2::ZERO, DVec2::new(4., 0.), DVec2::new(4., 4.)];
		let open = polyline(&points, false);
		assert!(!open[0].is_closed());
		assert_eq!(open[0].segment_count(), 2);
		let closed = polyline(&points, true);
		assert!(closed[0].is_closed());
		assert_eq!(closed[0].segment_count(), 3);
		assert!(polyline(&points[..1], false).is_empty());
		assert!(polyline(&[], true).is_empty());
	}
}
