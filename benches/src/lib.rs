//! Benchmark helper utilities for acs-rs
//!
//! This module generates synthetic sprites and characters for the decoder
//! benchmarks. Sprites are drawn as horizontal bands with a few noisy pixels per
//! row, which gives the LZ codec a realistic mix of short literals and long
//! back references.

use acs_types::file::{AcsFileBuilder, Color, IndexedImage};

/// Number of colors in the generated palette
pub const PALETTE_SIZE: usize = 16;

/// Generates a banded sprite, deterministic for a given `seed`
pub fn generate_sprite(width: u16, height: u16, seed: u32) -> IndexedImage {
	let mut state = seed.wrapping_mul(2_654_435_761).max(1);
	let mut pixels = Vec::with_capacity(usize::from(width) * usize::from(height));

	for y in 0..height {
		let band = ((u32::from(y) / 8 + seed) % PALETTE_SIZE as u32) as u8;
		for x in 0..width {
			// xorshift
			state ^= state << 13;
			state ^= state >> 17;
			state ^= state << 5;
			let pixel = if state % 29 == 0 {
				(state % PALETTE_SIZE as u32) as u8
			} else if x < width / 6 || x >= width - width / 6 {
				0
			} else {
				band
			};
			pixels.push(pixel);
		}
	}

	IndexedImage::new(width, height, pixels).unwrap_or_else(|| unreachable!("pixel count matches size"))
}

/// Generates the palette shared by generated characters
pub fn generate_palette() -> Vec<Color> {
	(0..PALETTE_SIZE as u8).map(|i| Color::rgb(i * 16, 255 - i * 16, i.wrapping_mul(37))).collect()
}

/// Generates a serialized character holding `count` sprites of the given size
pub fn generate_character(count: usize, width: u16, height: u16, compress: bool) -> Vec<u8> {
	let mut builder = AcsFileBuilder::new().size(width, height).palette(generate_palette(), 0);
	for seed in 0..count {
		builder = builder.image(&generate_sprite(width, height, seed as u32), compress);
	}
	builder.build()
}

/// Common benchmark sizes for synthetic sprites
pub mod sizes {
	/// Small sprite: 32x32, a balloon tail or icon
	pub const SMALL: (u16, u16) = (32, 32);
	/// Typical character frame: 128x128
	pub const FRAME: (u16, u16) = (128, 128);
	/// Large sprite: 320x240
	pub const LARGE: (u16, u16) = (320, 240);
}

#[cfg(test)]
mod tests {
	use super::*;
	use acs_types::file::{AcsFile, lz};

	#[test]
	fn test_generate_sprite_is_deterministic() {
		let a = generate_sprite(40, 24, 7);
		let b = generate_sprite(40, 24, 7);
		assert_eq!(a, b);
		assert_eq!(a.pixels().len(), 40 * 24);
		assert!(a.pixels().iter().all(|&p| usize::from(p) < PALETTE_SIZE));
	}

	#[test]
	fn test_generated_sprite_compresses() {
		let sprite = generate_sprite(sizes::FRAME.0, sizes::FRAME.1, 3);
		let packed = lz::compress(sprite.pixels());
		assert!(packed.len() < sprite.pixels().len());
		assert_eq!(lz::decompress(&packed, sprite.pixels().len()).unwrap(), sprite.pixels());
	}

	#[test]
	fn test_generate_character_parses() {
		let data = generate_character(3, 16, 12, true);
		let acs = AcsFile::from_bytes("BENCH", data).unwrap();
		let images = acs.decode_images(None, |_, _| {}).unwrap();
		assert_eq!(images.len(), 3);
		assert_eq!(images[2], generate_sprite(16, 12, 2));
	}
}
