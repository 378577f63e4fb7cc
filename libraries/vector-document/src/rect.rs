use glam::DVec2;

#[derive(Debug, Clone, Default, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
/// An axis aligned bounding box defined by its minimum and maximum corners.
pub struct Rect(pub [DVec2; 2]);

impl Rect {
	/// Create a zero sized rect at the point
	#[must_use]
	pub fn from_point(point: DVec2) -> Self {
		Self([point; 2])
	}

	/// Convert a box defined by two arbitrary corner points to a rect.
	#[must_use]
	pub fn from_box(bbox: [DVec2; 2]) -> Self {
		Self([bbox[0].min(bbox[1]), bbox[0].max(bbox[1])])
	}

	/// Take the outside bounds of two axis aligned rectangles.
	#[must_use]
	pub fn combine_bounds(a: Self, b: Self) -> Self {
		Self::from_box([a[0].min(b[0]), a[1].max(b[1])])
	}

	#[must_use]
	pub fn min(&self) -> DVec2 {
		self.0[0].min(self.0[1])
	}

	#[must_use]
	pub fn max(&self) -> DVec2 {
		self.0[0].max(self.0[1])
	}

	#[must_use]
	pub fn size(&self) -> DVec2 {
		self.max() - self.min()
	}
}

impl std::ops::Index<usize> for Rect {
	type Output = DVec2;
	fn index(&self, index: usize) -> &Self::Output {
		&self.0[index]
	}
}
