use crate::consts::ARC_DEGENERATE_EPSILON;
use glam::{DMat2, DVec2};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// An elliptical arc in endpoint form, as written in path data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndpointArc {
	pub start: DVec2,
	pub radii: DVec2,
	/// Rotation of the ellipse's x axis, in degrees.
	pub x_axis_rotation: f64,
	pub large_arc: bool,
	pub sweep: bool,
	pub end: DVec2,
}

/// The same arc in center form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterArc {
	pub center: DVec2,
	pub radii: DVec2,
	/// Rotation of the ellipse's x axis, in radians.
	pub rotation: f64,
	pub theta1: f64,
	pub delta_theta: f64,
}

fn vector_angle(u: DVec2, v: DVec2) -> f64 {
	const EPS: f64 = 1e-12;

	let sign = u.x * v.y - u.y * v.x;
	if sign.abs() < EPS && (u + v).length_squared() < EPS * EPS {
		return PI;
	}

	let cosine = (u.dot(v) / (u.length() * v.length())).clamp(-1., 1.);
	if sign < 0. { -cosine.acos() } else { cosine.acos() }
}

impl EndpointArc {
	/// Converts to center form. Returns `None` for degenerate arcs, which should be drawn as a straight line.
	///
	/// Radii too small to span the two end points are scaled up uniformly until they fit.
	pub fn to_center(&self) -> Option<CenterArc> {
		let mut radii = self.radii.abs();
		if radii.x < ARC_DEGENERATE_EPSILON || radii.y < ARC_DEGENERATE_EPSILON || self.start.distance(self.end) < ARC_DEGENERATE_EPSILON {
			return None;
		}

		let rotation = self.x_axis_rotation.to_radians();
		let rotation_matrix = DMat2::from_angle(-rotation);
		let p = rotation_matrix * (self.start - self.end) * 0.5;

		let lambda = (p.x * p.x) / (radii.x * radii.x) + (p.y * p.y) / (radii.y * radii.y);
		if lambda > 1. {
			radii *= lambda.sqrt();
		}
		let (rx2, ry2) = (radii.x * radii.x, radii.y * radii.y);
		let (px2, py2) = (p.x * p.x, p.y * p.y);

		let numerator = (rx2 * ry2 - rx2 * py2 - ry2 * px2).max(0.);
		let denominator = rx2 * py2 + ry2 * px2;
		if denominator <= 0. {
			return None;
		}
		let sign = if self.large_arc == self.sweep { -1. } else { 1. };
		let multiplier = sign * (numerator / denominator).sqrt();
		let center_prime = DVec2::new(multiplier * radii.x * p.y / radii.y, -multiplier * radii.y * p.x / radii.x);

		let center = rotation_matrix.transpose() * center_prime + (self.start + self.end) * 0.5;

		let u = (p - center_prime) / radii;
		let v = (-p - center_prime) / radii;
		let theta1 = vector_angle(DVec2::X, u);
		let mut delta_theta = vector_angle(u, v);

		if !self.sweep && delta_theta > 0. {
			delta_theta -= TAU;
		} else if self.sweep && delta_theta < 0. {
			delta_theta += TAU;
		}

		Some(CenterArc {
			center,
			radii,
			rotation,
			theta1,
			delta_theta,
		})
	}
}

impl CenterArc {
	fn point(&self, theta: f64) -> DVec2 {
		self.center + DMat2::from_angle(self.rotation) * DVec2::new(self.radii.x * theta.cos(), self.radii.y * theta.sin())
	}

	fn derivative(&self, theta: f64) -> DVec2 {
		DMat2::from_angle(self.rotation) * DVec2::new(-self.radii.x * theta.sin(), self.radii.y * theta.cos())
	}

	/// Approximates the arc with cubic segments spanning at most 90° each.
	///
	/// Returns the three control points that follow the start point of every segment.
	pub fn to_cubics(&self) -> Vec<[DVec2; 3]> {
		let count = ((self.delta_theta.abs() / FRAC_PI_2 - 1e-9).ceil() as usize).max(1);
		let step = self.delta_theta / count as f64;
		let kappa = 4. / 3. * (step / 4.).tan();

		(0..count)
			.map(|i| {
				let from = self.theta1 + step * i as f64;
				let to = from + step;
				let (start, end) = (self.point(from), self.point(to));
				[start + self.derivative(from) * kappa, end - self.derivative(to) * kappa, end]
			})
			.collect()
	}
}
