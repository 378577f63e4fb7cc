use crate::consts::ROOT_EPSILON;
use crate::rect::Rect;
use glam::DVec2;

/// Find the roots of the linear equation `ax + b`.
fn solve_linear(a: f64, b: f64) -> [Option<f64>; 2] {
	if a.abs() > ROOT_EPSILON { [Some(-b / a), None] } else { [None; 2] }
}

/// Find the roots of the quadratic equation `ax^2 + bx + c`, falling back to the linear case when `a` vanishes.
fn solve_quadratic(a: f64, b: f64, c: f64) -> [Option<f64>; 2] {
	if a.abs() <= ROOT_EPSILON {
		return solve_linear(b, c);
	}
	let discriminant = b * b - 4. * a * c;
	if discriminant < 0. {
		return [None; 2];
	}
	let root_discriminant = discriminant.sqrt();
	[Some((-b + root_discriminant) / (2. * a)), Some((-b - root_discriminant) / (2. * a))]
}

fn eval_cubic_1d(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
	let mt = 1. - t;
	mt * mt * mt * p0 + 3. * mt * mt * t * p1 + 3. * mt * t * t * p2 + t * t * t * p3
}

/// The extent of a one dimensional cubic over `t ∈ [0, 1]`, using the roots of its derivative.
fn cubic_bounding_interval(p0: f64, p1: f64, p2: f64, p3: f64) -> (f64, f64) {
	let mut min = p0.min(p3);
	let mut max = p0.max(p3);

	let a = -3. * p0 + 9. * p1 - 9. * p2 + 3. * p3;
	let b = 6. * p0 - 12. * p1 + 6. * p2;
	let c = 3. * p1 - 3. * p0;

	for t in solve_quadratic(a, b, c).into_iter().flatten() {
		if t > 0. && t < 1. {
			let value = eval_cubic_1d(p0, p1, p2, p3, t);
			min = min.min(value);
			max = max.max(value);
		}
	}

	(min, max)
}

/// Tight bounds of a cubic bezier segment, including extrema that lie between the end points.
pub fn cubic_bounds([p0, p1, p2, p3]: [DVec2; 4]) -> Rect {
	let (min_x, max_x) = cubic_bounding_interval(p0.x, p1.x, p2.x, p3.x);
	let (min_y, max_y) = cubic_bounding_interval(p0.y, p1.y, p2.y, p3.y);
	Rect([DVec2::new(min_x, min_y), DVec2::new(max_x, max_y)])
}

/// Tight bounds of a chain of cubic segments sharing end points. `None` if there are no points.
pub fn path_bounds(points: &[DVec2]) -> Option<Rect> {
	let first = *points.first()?;
	Some(
		points
			.windows(4)
			.step_by(3)
			.map(|window| cubic_bounds([window[0], window[1], window[2], window[3]]))
			.fold(Rect::from_point(first), Rect::combine_bounds),
	)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn eval(points: [DVec2; 4], t: f64) -> DVec2 {
		DVec2::new(eval_cubic_1d(points[0].x, points[1].x, points[2].x, points[3].x, t), eval_cubic_1d(points[0].y, points[1].y, points[2].y, points[3].y, t))
	}

	#[test]
	fn test_control_points_outside_curve() {
		let curve = [DVec2::new(0., 0.), DVec2::new(0., 100.), DVec2::new(100., 100.), DVec2::new(100., 0.)];
		let bounds = cubic_bounds(curve);
		assert_eq!(bounds.min(), DVec2::ZERO);
		// The peak is at t = 0.5 where y = 75, well inside the control polygon's 100.
		assert!((bounds.max() - DVec2::new(100., 75.)).length() < 1e-9);
	}

	#[test]
	fn test_sampled_points_stay_inside() {
		let curves = [
			[DVec2::new(10., 80.), DVec2::new(-40., -60.), DVec2::new(140., 200.), DVec2::new(50., 10.)],
			[DVec2::new(0., 0.), DVec2::new(100., 0.), DVec2::new(0., 100.), DVec2::new(100., 100.)],
			[DVec2::new(5., 5.), DVec2::new(5., 5.), DVec2::new(5., 5.), DVec2::new(5., 5.)],
			[DVec2::new(0., 0.), DVec2::new(30., 30.), DVec2::new(60., 60.), DVec2::new(90., 90.)],
			[DVec2::new(-3., 7.), DVec2::new(12., -20.), DVec2::new(-25., 13.), DVec2::new(8., 2.)],
		];
		for curve in curves {
			let bounds = cubic_bounds(curve);
			for i in 0..1000 {
				let point = eval(curve, i as f64 / 999.);
				assert!(point.cmpge(bounds.min() - 1e-9).all() && point.cmple(bounds.max() + 1e-9).all(), "{point:?} escapes {bounds:?}");
			}
		}
	}

	#[test]
	fn test_path_bounds() {
		assert_eq!(path_bounds(&[]), None);
		assert_eq!(path_bounds(&[DVec2::new(1., 2.)]), Some(Rect::from_point(DVec2::new(1., 2.))));
		let points = [DVec2::ZERO, DVec2::new(1., 0.), DVec2::new(2., 0.), DVec2::new(3., 0.), DVec2::new(3., 1.), DVec2::new(3., 2.), DVec2::new(3., 3.)];
		assert_eq!(path_bounds(&points), Some(Rect([DVec2::ZERO, DVec2::new(3., 3.)])));
	}
}
