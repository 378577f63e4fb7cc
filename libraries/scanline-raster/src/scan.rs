//! Active-edge scan conversion with non-zero winding and vertical supersampling.

use crate::composite::blend_pixel;
use crate::consts::{FIX, FIX_MASK, FIX_SHIFT, MAX_WEIGHT, SUBSAMPLES};
use crate::context::{PixelBufferMut, RasterOptions};
use crate::flatten::Edge;
use crate::paint::ShapePaint;
use crate::pool::{ActiveEdge, ActiveEdgePool, EdgeHandle};
use glam::DVec2;
use std::collections::TryReserveError;

/// Starts tracking `edge` at sub-scanline `scan_y`.
fn activate(edge: &Edge, scan_y: f64) -> ActiveEdge {
	let fix = FIX as f64;
	let slope = (edge.x1 - edge.x0) / (edge.y1 - edge.y0);
	// Round the step towards zero so edges never overshoot.
	let dx = if slope < 0. { -(fix * -slope).floor() } else { (fix * slope).floor() };
	ActiveEdge {
		x: (fix * (edge.x0 + slope * (scan_y - edge.y0))).floor() as i32,
		dx: dx as i32,
		end_y: edge.y1,
		direction: edge.direction,
	}
}

/// Adds the coverage of one sub-scanline to `coverage`, widening `[min_x, max_x]` to the touched pixels.
fn accumulate(coverage: &mut [u8], active: &[EdgeHandle], pool: &ActiveEdgePool, min_x: &mut i32, max_x: &mut i32) {
	let len = i32::try_from(coverage.len()).unwrap_or(i32::MAX);
	let mut add = |index: i32, amount: i32| {
		let pixel = &mut coverage[index as usize];
		*pixel = pixel.saturating_add(amount as u8);
	};

	let mut winding = 0;
	let mut span_start = 0;
	for &handle in active {
		let edge = pool.get(handle);
		if winding == 0 {
			span_start = edge.x;
			winding += edge.direction;
			continue;
		}

		winding += edge.direction;
		if winding != 0 {
			continue;
		}

		let (x0, x1) = (span_start, edge.x);
		let (mut first, mut last) = (x0 >> FIX_SHIFT, x1 >> FIX_SHIFT);
		*min_x = (*min_x).min(first);
		*max_x = (*max_x).max(last);
		if first >= len || last < 0 {
			continue;
		}

		if first == last {
			add(first, ((x1 - x0) * MAX_WEIGHT) >> FIX_SHIFT);
			continue;
		}

		if first >= 0 {
			add(first, ((FIX - (x0 & FIX_MASK)) * MAX_WEIGHT) >> FIX_SHIFT);
		} else {
			first = -1;
		}
		if last < len {
			add(last, ((x1 & FIX_MASK) * MAX_WEIGHT) >> FIX_SHIFT);
		} else {
			last = len;
		}
		for index in first + 1..last {
			add(index, MAX_WEIGHT);
		}
	}
}

/// Scratch state for scanning one shape at a time. Kept across shapes and calls.
#[derive(Debug, Default)]
pub struct Scanner {
	pool: ActiveEdgePool,
	active: Vec<EdgeHandle>,
	coverage: Vec<u8>,
}

impl Scanner {
	/// Makes room for rows of `width` pixels.
	pub fn prepare(&mut self, width: usize) -> Result<(), TryReserveError> {
		self.coverage.clear();
		self.coverage.try_reserve(width)?;
		self.coverage.resize(width, 0);
		Ok(())
	}

	/// Fills the region enclosed by `edges`, which must be sorted by `y0`, with `paint`.
	pub fn fill(&mut self, edges: &[Edge], paint: &ShapePaint, options: &RasterOptions, target: &mut PixelBufferMut) -> Result<(), TryReserveError> {
		self.pool.reset();
		self.active.clear();

		let width = i32::try_from(target.width).unwrap_or(i32::MAX);
		let mut next_edge = 0;

		for y in 0..target.height {
			self.coverage.fill(0);
			let (mut min_x, mut max_x) = (width, 0);

			for sample in 0..SUBSAMPLES {
				let scan_y = (y as f64) * SUBSAMPLES as f64 + sample as f64 + 0.5;
				self.advance(scan_y);

				while let Some(edge) = edges.get(next_edge).filter(|edge| edge.y0 <= scan_y) {
					if edge.y1 > scan_y {
						self.insert(activate(edge, scan_y))?;
					}
					next_edge += 1;
				}

				if !self.active.is_empty() {
					accumulate(&mut self.coverage, &self.active, &self.pool, &mut min_x, &mut max_x);
				}
			}

			let (min_x, max_x) = (min_x.max(0), max_x.min(width - 1));
			if min_x <= max_x {
				let (min_x, max_x) = (min_x as usize, max_x as usize);
				let row = target.row_mut(y);
				let pixels = row[min_x * 4..(max_x + 1) * 4].chunks_exact_mut(4);
				for ((x, pixel), &coverage) in (min_x..).zip(pixels).zip(&self.coverage[min_x..=max_x]) {
					if coverage == 0 {
						continue;
					}
					let point = (DVec2::new(x as f64, y as f64) - options.translation()) / options.scale;
					blend_pixel(pixel, coverage, paint.color_at(point));
				}
			}

			if next_edge == edges.len() && self.active.is_empty() {
				break;
			}
		}

		Ok(())
	}

	/// Drops edges that end above `scan_y`, steps the rest down one sub-scanline and restores x order.
	fn advance(&mut self, scan_y: f64) {
		let pool = &mut self.pool;
		self.active.retain(|&handle| {
			if pool.get(handle).end_y <= scan_y {
				pool.release(handle);
				return false;
			}
			let edge = pool.get_mut(handle);
			edge.x = edge.x.saturating_add(edge.dx);
			true
		});

		let mut changed = true;
		while changed {
			changed = false;
			for index in 1..self.active.len() {
				if pool.get(self.active[index - 1]).x > pool.get(self.active[index]).x {
					self.active.swap(index - 1, index);
					changed = true;
				}
			}
		}
	}

	fn insert(&mut self, edge: ActiveEdge) -> Result<(), TryReserveError> {
		self.active.try_reserve(1)?;
		let handle = self.pool.allocate(edge)?;
		let pool = &self.pool;
		let position = self.active.partition_point(|&other| pool.get(other).x < edge.x);
		self.active.insert(position, handle);
		Ok(())
	}
}
