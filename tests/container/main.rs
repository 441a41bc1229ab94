//! Integration tests for `acs-rs`

mod bounds;
mod end_to_end;
mod playback;

use acs_rs::prelude::*;

/// Little-endian container assembled by hand, without the in-crate builder
pub(crate) struct RawContainer {
	data: Vec<u8>,
}

impl RawContainer {
	/// Header with the four locators left zero
	pub(crate) fn new() -> Self {
		let mut data = vec![0xC3, 0xAB, 0xCD, 0xAB];
		data.resize(36, 0);
		Self {
			data,
		}
	}

	pub(crate) fn position(&self) -> usize {
		self.data.len()
	}

	pub(crate) fn bytes(&mut self, bytes: &[u8]) -> &mut Self {
		self.data.extend_from_slice(bytes);
		self
	}

	pub(crate) fn u16(&mut self, value: u16) -> &mut Self {
		self.bytes(&value.to_le_bytes())
	}

	pub(crate) fn u32(&mut self, value: u32) -> &mut Self {
		self.bytes(&value.to_le_bytes())
	}

	pub(crate) fn locator_at(&mut self, at: usize, offset: usize, size: usize) -> &mut Self {
		self.data[at..at + 4].copy_from_slice(&(offset as u32).to_le_bytes());
		self.data[at + 4..at + 8].copy_from_slice(&(size as u32).to_le_bytes());
		self
	}

	pub(crate) fn into_bytes(self) -> Vec<u8> {
		self.data
	}
}

/// Magic, a character block without localized records, and empty lists
pub(crate) fn minimal_container() -> Vec<u8> {
	let mut raw = RawContainer::new();

	let character = raw.position();
	raw.u16(2).u16(0);
	let localized_locator = raw.position();
	raw.bytes(&[0; 8]);
	raw.bytes(&[0x11; 16]).u16(100).u16(80);
	// Transparency index, flags and frame durations
	raw.bytes(&[0]).bytes(&[0; 8]);
	// Balloon with an empty font name
	raw.bytes(&[0; 14]).u32(0).bytes(&[0; 10]);
	// Palette, tray icon flag and states
	raw.u32(0).bytes(&[0]).u16(0);
	let character_size = raw.position() - character;
	raw.locator_at(4, character, character_size);

	let localized = raw.position();
	raw.u16(0);
	raw.locator_at(localized_locator, localized, 2);

	for locator in [12, 20, 28] {
		let list = raw.position();
		raw.u32(0);
		raw.locator_at(locator, list, 4);
	}

	raw.into_bytes()
}

pub(crate) fn frame(duration: u16, exit_index: i16, branches: &[(u16, u16)]) -> FrameInfo {
	FrameInfo {
		images: vec![FrameImage {
			image_index: 0,
			x: 0,
			y: 0,
		}],
		audio_index: 0,
		duration,
		exit_index,
		branches: branches
			.iter()
			.map(|&(target, probability)| BranchInfo {
				target,
				probability,
			})
			.collect(),
	}
}

pub(crate) fn sprite(width: u16, height: u16, seed: u8) -> IndexedImage {
	let pixels = (0..usize::from(width) * usize::from(height))
		.map(|i| if (i / 7) % 3 == 0 { 0 } else { seed.wrapping_add((i % 2) as u8) % 4 })
		.collect();
	IndexedImage::new(width, height, pixels).unwrap()
}

/// A small character with a greeting, a looping idle and a return chain
pub(crate) fn sample_character() -> AcsFileBuilder {
	AcsFileBuilder::new()
		.size(64, 48)
		.palette(
			vec![Color::rgb(255, 0, 255), Color::rgb(0, 0, 0), Color::rgb(255, 255, 255), Color::rgb(0, 128, 255)],
			0,
		)
		.localized(LocalizedInfo {
			language_id: 0x0009,
			name: "Clippit".to_string(),
			description: "A paper clip".to_string(),
			extra: String::new(),
		})
		.state("GREETING", ["WAVE"])
		.state("IDLINGLEVEL1", ["IDLE1_1"])
		.animation(AnimInfo {
			name: "WAVE".to_string(),
			transition: TransitionType::UseReturnAnimation,
			return_animation: Some("RESTPOSE".to_string()),
			frames: vec![frame(10, -1, &[]), frame(10, -1, &[])],
		})
		.animation(AnimInfo {
			name: "RESTPOSE".to_string(),
			transition: TransitionType::NoTransition,
			return_animation: None,
			frames: vec![frame(10, -1, &[])],
		})
		.animation(AnimInfo {
			name: "IDLE1_1".to_string(),
			transition: TransitionType::UseExitBranches,
			return_animation: None,
			frames: vec![frame(10, 2, &[(0, 100)]), frame(10, -1, &[]), frame(10, -1, &[])],
		})
		.image(&sprite(48, 40, 1), true)
		.image(&sprite(17, 9, 2), true)
		.image(&sprite(8, 8, 3), false)
		.sound(b"RIFF\x04\x00\x00\x00WAVE".to_vec())
}
