use crate::composite::{defringe, unpremultiply};
use crate::error::RasterError;
use crate::flatten::{Edge, EdgeList};
use crate::paint::{GradientLut, ShapePaint};
use crate::scan::Scanner;
use glam::DVec2;
use vector_document::Document;

/// Where the document lands in the destination buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterOptions {
	/// Destination x of the document origin, in pixels.
	pub tx: f64,
	/// Destination y of the document origin, in pixels.
	pub ty: f64,
	/// Pixels per document unit.
	pub scale: f64,
}

impl Default for RasterOptions {
	fn default() -> Self {
		Self { tx: 0., ty: 0., scale: 1. }
	}
}

impl RasterOptions {
	pub fn translation(&self) -> DVec2 {
		DVec2::new(self.tx, self.ty)
	}
}

/// A caller-owned RGBA8 image. Row `y` starts at byte `y * stride`; bytes past `width * 4` in a row are left alone.
#[derive(Debug)]
pub struct PixelBufferMut<'a> {
	pub data: &'a mut [u8],
	pub width: usize,
	pub height: usize,
	pub stride: usize,
}

impl<'a> PixelBufferMut<'a> {
	/// A tightly packed buffer.
	pub fn new(data: &'a mut [u8], width: usize, height: usize) -> Self {
		Self {
			data,
			width,
			height,
			stride: width * 4,
		}
	}

	fn validate(&self) -> Result<(), RasterError> {
		if self.width == 0 || self.height == 0 {
			return Ok(());
		}

		let too_large = RasterError::DimensionsTooLarge {
			width: self.width,
			height: self.height,
		};
		let row_bytes = self.width.checked_mul(4).ok_or(too_large.clone())?;
		if self.stride < row_bytes {
			return Err(RasterError::InvalidStride {
				stride: self.stride,
				width: self.width,
			});
		}
		let required = self.stride.checked_mul(self.height - 1).and_then(|bytes| bytes.checked_add(row_bytes)).ok_or(too_large)?;
		if self.data.len() < required {
			return Err(RasterError::BufferTooSmall {
				required,
				actual: self.data.len(),
			});
		}
		Ok(())
	}

	pub(crate) fn row_mut(&mut self, y: usize) -> &mut [u8] {
		let start = y * self.stride;
		&mut self.data[start..start + self.width * 4]
	}

	fn clear(&mut self) {
		for y in 0..self.height {
			self.row_mut(y).fill(0);
		}
	}
}

/// The width and height an image should be rendered at to show `document` at the requested size.
///
/// A zero dimension follows the document's aspect ratio from the other one. If both are zero the document's own size is used.
pub fn fitted_size(document: &Document, width: usize, height: usize) -> (usize, usize) {
	let (document_width, document_height) = (document.width(), document.height());
	let scaled = |length: usize, numerator: f64, denominator: f64| {
		if denominator > 0. {
			(length as f64 * numerator / denominator).round().max(1.) as usize
		} else {
			length
		}
	};
	match (width, height) {
		(0, 0) => (document_width.ceil().max(0.) as usize, document_height.ceil().max(0.) as usize),
		(0, height) => (scaled(height, document_width, document_height), height),
		(width, 0) => (width, scaled(width, document_height, document_width)),
		size => size,
	}
}

/// Runs `draw`, wiping any partially drawn rows from `target` if it fails.
fn draw_or_clear(target: &mut PixelBufferMut, draw: impl FnOnce(&mut PixelBufferMut) -> Result<(), RasterError>) -> Result<(), RasterError> {
	draw(&mut *target).inspect_err(|error| {
		log::debug!("Rasterization aborted: {error}");
		target.clear();
	})
}

/// Reusable scratch memory for rasterizing documents.
///
/// Buffers grow to the largest shape and image seen and are reused by later calls. A context is not meant to be shared
/// between threads; give each rendering thread its own.
#[derive(Debug, Default)]
pub struct RasterContext {
	edges: Vec<Edge>,
	scanner: Scanner,
	lut: GradientLut,
}

impl RasterContext {
	pub fn new() -> Self {
		Self::default()
	}

	/// Draws the fills of `document` into `target`, replacing its previous contents. On return the pixels hold straight
	/// (non-premultiplied) alpha. If an error is returned the target is left fully transparent.
	pub fn rasterize(&mut self, document: &Document, options: &RasterOptions, target: &mut PixelBufferMut) -> Result<(), RasterError> {
		target.validate()?;
		if target.width == 0 || target.height == 0 {
			return Ok(());
		}
		target.clear();
		if !(options.scale.is_finite() && options.scale > 0.) {
			log::debug!("Nothing to draw at scale {}", options.scale);
			return Ok(());
		}

		draw_or_clear(target, |target| self.draw_shapes(document, options, target))?;

		unpremultiply(target.data, target.width, target.height, target.stride);
		defringe(target.data, target.width, target.height, target.stride);
		Ok(())
	}

	fn draw_shapes(&mut self, document: &Document, options: &RasterOptions, target: &mut PixelBufferMut) -> Result<(), RasterError> {
		self.scanner.prepare(target.width)?;

		let mut drawn = 0;
		for shape in document.shapes() {
			let Some(paint) = ShapePaint::new(shape.fill(), shape.opacity(), &mut self.lut) else { continue };

			let mut edge_list = EdgeList::new(&mut self.edges, options.scale);
			for path in shape.paths() {
				edge_list.add_path(path)?;
			}
			let edges = edge_list.finish(options.translation(), options.scale);
			log::trace!("Shape {:?} flattened into {} edges", shape.id(), edges.len());

			self.scanner.fill(edges, &paint, options, target)?;
			drawn += 1;
		}

		log::trace!("Rasterized {drawn} of {} shapes into {}x{}", document.shapes().len(), target.width, target.height);
		Ok(())
	}

	/// Renders `document` fitted into a new tightly packed RGBA8 image, as sized by [fitted_size]. The document is scaled
	/// to the image height, or to its width when the document has no height.
	pub fn render_to_vec(&mut self, document: &Document, width: usize, height: usize) -> Result<Vec<u8>, RasterError> {
		let (width, height) = fitted_size(document, width, height);
		let length = width
			.checked_mul(height)
			.and_then(|pixels| pixels.checked_mul(4))
			.ok_or(RasterError::DimensionsTooLarge { width, height })?;

		let mut data = Vec::new();
		data.try_reserve_exact(length)?;
		data.resize(length, 0);

		let scale = if document.height() > 0. {
			height as f64 / document.height()
		} else if document.width() > 0. {
			width as f64 / document.width()
		} else {
			1.
		};
		let options = RasterOptions { scale, ..RasterOptions::default() };
		self.rasterize(document, &options, &mut PixelBufferMut::new(&mut data, width, height))?;
		Ok(data)
	}
}
