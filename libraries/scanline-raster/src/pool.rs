//! Paged storage for active edges.
//!
//! Edges enter and leave the active list many times per row, so they live in fixed-size pages that are kept across
//! calls. Released slots go on a free list and are handed out again before fresh slots. Resetting only rewinds two
//! counters; the pages themselves stay allocated.

use crate::consts::POOL_PAGE_SIZE;
use std::collections::TryReserveError;

/// An edge crossing the current sub-scanline.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ActiveEdge {
	/// Fixed point x at the current sub-scanline.
	pub x: i32,
	/// Fixed point x step per sub-scanline.
	pub dx: i32,
	/// The edge ends before sub-scanlines at or past this y.
	pub end_y: f64,
	/// Winding direction, +1 or -1.
	pub direction: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeHandle(usize);

#[derive(Debug, Default)]
pub struct ActiveEdgePool {
	pages: Vec<Vec<ActiveEdge>>,
	/// Index of the next never-used slot since the last reset.
	next: usize,
	free: Vec<EdgeHandle>,
}

impl ActiveEdgePool {
	/// Forgets every allocation while keeping the pages.
	pub fn reset(&mut self) {
		self.next = 0;
		self.free.clear();
	}

	pub fn allocate(&mut self, edge: ActiveEdge) -> Result<EdgeHandle, TryReserveError> {
		if let Some(handle) = self.free.pop() {
			*self.get_mut(handle) = edge;
			return Ok(handle);
		}

		let (page, slot) = (self.next / POOL_PAGE_SIZE, self.next % POOL_PAGE_SIZE);
		if page == self.pages.len() {
			self.grow()?;
		}
		let handle = EdgeHandle(self.next);
		self.pages[page][slot] = edge;
		self.next += 1;
		Ok(handle)
	}

	/// Returns a slot for reuse. The handle must not be used afterwards.
	pub fn release(&mut self, handle: EdgeHandle) {
		// Capacity for every slot is reserved in `grow`, so this never reallocates.
		self.free.push(handle);
	}

	pub fn get(&self, handle: EdgeHandle) -> &ActiveEdge {
		let index = handle.0;
		&self.pages[index / POOL_PAGE_SIZE][index % POOL_PAGE_SIZE]
	}

	pub fn get_mut(&mut self, handle: EdgeHandle) -> &mut ActiveEdge {
		let index = handle.0;
		&mut self.pages[index / POOL_PAGE_SIZE][index % POOL_PAGE_SIZE]
	}

	/// Number of slots handed out since the last reset, including released ones.
	#[cfg(test)]
	pub fn allocated(&self) -> usize {
		self.next
	}

	#[cfg(test)]
	pub fn page_count(&self) -> usize {
		self.pages.len()
	}

	fn grow(&mut self) -> Result<(), TryReserveError> {
		let mut page = Vec::new();
		page.try_reserve_exact(POOL_PAGE_SIZE)?;
		page.resize(POOL_PAGE_SIZE, ActiveEdge::default());

		let slots = (self.pages.len() + 1) * POOL_PAGE_SIZE;
		self.free.try_reserve(slots.saturating_sub(self.free.len()))?;
		self.pages.try_reserve(1)?;
		self.pages.push(page);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	fn edge(x: i32) -> ActiveEdge {
		ActiveEdge { x, dx: 0, end_y: 0., direction: 1 }
	}

	#[test]
	fn test_allocate_across_pages() {
		let mut pool = ActiveEdgePool::default();
		let handles: Vec<_> = (0..POOL_PAGE_SIZE as i32 * 2 + 1).map(|x| pool.allocate(edge(x)).unwrap()).collect();
		assert_eq!(pool.page_count(), 3);
		for (x, handle) in handles.into_iter().enumerate() {
			assert_eq!(pool.get(handle).x, x as i32);
		}
	}

	#[test]
	fn test_released_slots_are_reused() {
		let mut pool = ActiveEdgePool::default();
		let first = pool.allocate(edge(1)).unwrap();
		pool.allocate(edge(2)).unwrap();
		pool.release(first);
		let reused = pool.allocate(edge(3)).unwrap();
		assert_eq!(reused, first);
		assert_eq!(pool.get(reused).x, 3);
		assert_eq!(pool.allocated(), 2);
	}

	#[test]
	fn test_reset_keeps_pages() {
		let mut pool = ActiveEdgePool::default();
		for x in 0..POOL_PAGE_SIZE as i32 + 1 {
			pool.allocate(edge(x)).unwrap();
		}
		pool.reset();
		assert_eq!(pool.allocated(), 0);
		assert_eq!(pool.page_count(), 2);
		let handle = pool.allocate(edge(7)).unwrap();
		assert_eq!(handle, EdgeHandle(0));
		assert_eq!(pool.page_count(), 2);
	}
}
