//! 8-bit compositing into the destination buffer.
//!
//! Pixels are premultiplied while shapes are drawn and converted back to straight alpha once at the end.

use crate::paint::Rgba;

/// `a * b / 255`, rounded to nearest.
#[inline]
fn multiply(a: u32, b: u32) -> u32 {
	let product = a * b + 128;
	(product + (product >> 8)) >> 8
}

/// Blends `color` scaled by `coverage` over a premultiplied destination pixel.
#[inline]
pub fn blend_pixel(destination: &mut [u8], coverage: u8, color: Rgba) {
	let [red, green, blue, alpha] = color.map(u32::from);
	let alpha = multiply(coverage as u32, alpha);
	let inverse = 255 - alpha;

	let over = |source: u32, destination: u8| (multiply(source, alpha) + multiply(inverse, destination as u32)) as u8;
	destination[0] = over(red, destination[0]);
	destination[1] = over(green, destination[1]);
	destination[2] = over(blue, destination[2]);
	destination[3] = (alpha + multiply(inverse, destination[3] as u32)) as u8;
}

/// Converts the first `width` pixels of every row from premultiplied to straight alpha.
pub fn unpremultiply(data: &mut [u8], width: usize, height: usize, stride: usize) {
	for row in data.chunks_mut(stride).take(height) {
		for pixel in row[..width * 4].chunks_exact_mut(4) {
			let alpha = pixel[3] as u32;
			if alpha != 0 {
				for channel in &mut pixel[..3] {
					*channel = (*channel as u32 * 255 / alpha).min(255) as u8;
				}
			}
		}
	}
}

/// Gives fully transparent pixels the average color of their non-transparent 4-neighbours, so that filtering the image
/// later does not bleed black into edges.
pub fn defringe(data: &mut [u8], width: usize, height: usize, stride: usize) {
	for y in 0..height {
		for x in 0..width {
			let index = y * stride + x * 4;
			if data[index + 3] != 0 {
				continue;
			}

			let neighbours = [
				(x > 0).then(|| index - 4),
				(x + 1 < width).then(|| index + 4),
				(y > 0).then(|| index - stride),
				(y + 1 < height).then(|| index + stride),
			];
			let mut sum = [0_u32; 3];
			let mut count = 0;
			for neighbour in neighbours.into_iter().flatten().filter(|&neighbour| data[neighbour + 3] != 0) {
				for (channel, total) in sum.iter_mut().enumerate() {
					*total += data[neighbour + channel] as u32;
				}
				count += 1;
			}

			// Neighbours with alpha are never rewritten here, so reading them in place is stable.
			if count > 0 {
				for (channel, total) in sum.into_iter().enumerate() {
					data[index + channel] = (total / count) as u8;
				}
			}
		}
	}
}
