//! The pre-built marker stamped at each photo location: an anti-aliased
//! disk built by supersampling a hard-edged circle and downsampling.

use image::{GrayImage, Luma};
use imageproc::drawing::draw_filled_circle_mut;

/// Supersampling factor used before downsampling to the final marker size.
const SUPERSAMPLE: u32 = 4;

/// A square alpha mask of side `2*radius + 1`, values `0..=255`.
pub struct Symbol {
	pub side: u32,
	pub radius: u32,
	alpha: Vec<u8>,
}

impl Symbol {
	/// Builds the marker for `radius` pixels.
	#[must_use]
	pub fn build(radius: u32) -> Self {
		let side = radius * 2 + 1;
		let super_side = side * SUPERSAMPLE;
		let mut canvas = GrayImage::new(super_side, super_side);
		let center = (radius * SUPERSAMPLE) as i32;
		draw_filled_circle_mut(&mut canvas, (center, center), (radius * SUPERSAMPLE) as i32, Luma([255u8]));

		let resized = image::imageops::resize(&canvas, side, side, image::imageops::FilterType::Triangle);
		Symbol { side, radius, alpha: resized.into_raw() }
	}

	/// Alpha value (`0..=255`) at local mask coordinates `(dx, dy)`, both in
	/// `0..side`.
	#[must_use]
	pub fn alpha_at(&self, dx: u32, dy: u32) -> u8 {
		self.alpha[(dy * self.side + dx) as usize]
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn center_is_fully_opaque_and_corners_are_not() {
		let symbol = Symbol::build(5);
		assert_eq!(symbol.side, 11);
		assert_eq!(symbol.alpha_at(5, 5), 255);
		assert!(symbol.alpha_at(0, 0) < 255);
	}

	#[test]
	fn edges_are_anti_aliased_not_just_binary() {
		let symbol = Symbol::build(5);
		let values: std::collections::HashSet<u8> = (0..symbol.side)
			.flat_map(|x| (0..symbol.side).map(move |y| (x, y)))
			.map(|(x, y)| symbol.alpha_at(x, y))
			.collect();
		// a hard-edged circle would only ever produce 0 or 255.
		assert!(values.iter().any(|&v| v != 0 && v != 255));
	}
}
