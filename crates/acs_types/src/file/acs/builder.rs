//! File construction and serialization for ACS files.
//!
//! The writer lays sections out in dependency order so that every locator can be
//! patched once the addressed region has been written: localized info before the
//! character block, animation records before the animation list, and so on.

use std::path::Path;

use crate::file::{AcsError, Color, ImageRecord, IndexedImage};

use super::animation::{AnimInfo, FrameInfo};
use super::character::{Guid, LocalizedInfo};
use super::constants::{
	ANIMATION_LOCATOR_OFFSET, BALLOON_HEAD_SIZE, BALLOON_TAIL_SIZE, CHARACTER_LOCATOR_OFFSET,
	HEADER_SIZE, IMAGE_LOCATOR_OFFSET, MAGIC, SOUND_CHECKSUM_SIZE, SOUND_LOCATOR_OFFSET,
};
use super::extra_width_for;

/// Little-endian output buffer with locator patching
#[derive(Debug, Default)]
pub(crate) struct Writer {
	data: Vec<u8>,
}

impl Writer {
	pub(crate) fn new() -> Self {
		Self::default()
	}

	pub(crate) fn position(&self) -> usize {
		self.data.len()
	}

	pub(crate) fn put_u8(&mut self, value: u8) {
		self.data.push(value);
	}

	pub(crate) fn put_u16(&mut self, value: u16) {
		self.data.extend_from_slice(&value.to_le_bytes());
	}

	pub(crate) fn put_i16(&mut self, value: i16) {
		self.data.extend_from_slice(&value.to_le_bytes());
	}

	pub(crate) fn put_u32(&mut self, value: u32) {
		self.data.extend_from_slice(&value.to_le_bytes());
	}

	pub(crate) fn put_bytes(&mut self, bytes: &[u8]) {
		self.data.extend_from_slice(bytes);
	}

	pub(crate) fn put_zeros(&mut self, count: usize) {
		self.data.resize(self.data.len() + count, 0);
	}

	/// Writes a length-prefixed UTF-16LE string
	pub(crate) fn put_string(&mut self, text: &str) {
		let units: Vec<u16> = text.encode_utf16().collect();
		self.put_u32(units.len() as u32);
		for unit in &units {
			self.put_u16(*unit);
		}
		if !units.is_empty() {
			self.put_u16(0);
		}
	}

	pub(crate) fn put_locator(&mut self, offset: usize, size: usize) {
		self.put_u32(offset as u32);
		self.put_u32(size as u32);
	}

	/// Overwrites the locator stored at `at`
	pub(crate) fn patch_locator(&mut self, at: usize, offset: usize, size: usize) {
		self.data[at..at + 4].copy_from_slice(&(offset as u32).to_le_bytes());
		self.data[at + 4..at + 8].copy_from_slice(&(size as u32).to_le_bytes());
	}

	pub(crate) fn into_bytes(self) -> Vec<u8> {
		self.data
	}
}

impl LocalizedInfo {
	pub(crate) fn write(&self, w: &mut Writer) {
		w.put_u16(self.language_id);
		w.put_string(&self.name);
		w.put_string(&self.description);
		w.put_string(&self.extra);
	}
}

impl FrameInfo {
	pub(crate) fn write(&self, w: &mut Writer) {
		w.put_u16(self.images.len() as u16);
		for image in &self.images {
			w.put_u32(image.image_index);
			w.put_i16(image.x);
			w.put_i16(image.y);
		}
		w.put_u16(self.audio_index);
		w.put_u16(self.duration);
		w.put_i16(self.exit_index);
		w.put_u8(self.branches.len() as u8);
		for branch in &self.branches {
			w.put_u16(branch.target);
			w.put_u16(branch.probability);
		}
		// Mouth overlays
		w.put_u8(0);
	}
}

impl AnimInfo {
	pub(crate) fn write(&self, w: &mut Writer) {
		w.put_string(&self.name);
		w.put_u8(self.transition.to_raw());
		w.put_string(self.return_animation.as_deref().unwrap_or_default());
		w.put_u16(self.frames.len() as u16);
		for frame in &self.frames {
			frame.write(w);
		}
	}
}

/// Builder for `.ACS` files
#[derive(Debug, Clone, Default)]
pub struct FileBuilder {
	guid: Guid,
	width: u16,
	height: u16,
	transparency_index: u8,
	palette: Vec<Color>,
	localized: Vec<LocalizedInfo>,
	states: Vec<(String, Vec<String>)>,
	animations: Vec<AnimInfo>,
	images: Vec<ImageRecord>,
	sounds: Vec<Vec<u8>>,
}

impl FileBuilder {
	/// Creates a builder for an empty character
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the character GUID
	pub fn guid(mut self, guid: Guid) -> Self {
		self.guid = guid;
		self
	}

	/// Sets the display size
	pub fn size(mut self, width: u16, height: u16) -> Self {
		self.width = width;
		self.height = height;
		self
	}

	/// Sets the palette and its transparency index
	pub fn palette(mut self, colors: Vec<Color>, transparency_index: u8) -> Self {
		self.palette = colors;
		self.transparency_index = transparency_index;
		self
	}

	/// Adds a localized info record
	pub fn localized(mut self, info: LocalizedInfo) -> Self {
		self.localized.push(info);
		self
	}

	/// Adds a state and the names of its animations
	pub fn state<I, S>(mut self, name: &str, animations: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.states.push((name.to_string(), animations.into_iter().map(Into::into).collect()));
		self
	}

	/// Adds an animation
	pub fn animation(mut self, animation: AnimInfo) -> Self {
		self.animations.push(animation);
		self
	}

	/// Adds an image, LZ packing it when `compress` is set
	pub fn image(mut self, image: &IndexedImage, compress: bool) -> Self {
		let record = ImageRecord::from_image(image, compress, extra_width_for(&self.guid));
		self.images.push(record);
		self
	}

	/// Adds an already encoded image record
	pub fn image_record(mut self, record: ImageRecord) -> Self {
		self.images.push(record);
		self
	}

	/// Adds an embedded sound file
	pub fn sound(mut self, data: impl Into<Vec<u8>>) -> Self {
		self.sounds.push(data.into());
		self
	}

	/// Serializes the file
	pub fn build(&self) -> Vec<u8> {
		let mut w = Writer::new();
		w.put_bytes(&MAGIC);
		w.put_zeros(HEADER_SIZE - MAGIC.len());

		// Localized info list, addressed from the character block
		let localized_start = w.position();
		w.put_u16(self.localized.len() as u16);
		for info in &self.localized {
			info.write(&mut w);
		}
		let localized_size = w.position() - localized_start;

		let character_start = w.position();
		self.write_character(&mut w, localized_start, localized_size);
		w.patch_locator(CHARACTER_LOCATOR_OFFSET, character_start, w.position() - character_start);

		let mut records = Vec::with_capacity(self.animations.len());
		for animation in &self.animations {
			let start = w.position();
			animation.write(&mut w);
			records.push((start, w.position() - start));
		}
		let list_start = w.position();
		w.put_u32(self.animations.len() as u32);
		for (animation, (offset, size)) in self.animations.iter().zip(records) {
			w.put_string(&animation.name);
			w.put_locator(offset, size);
		}
		w.patch_locator(ANIMATION_LOCATOR_OFFSET, list_start, w.position() - list_start);

		let mut records = Vec::with_capacity(self.images.len());
		for image in &self.images {
			let start = w.position();
			w.put_bytes(&image.to_bytes());
			records.push((start, w.position() - start));
		}
		let list_start = w.position();
		write_located_list(&mut w, &records);
		w.patch_locator(IMAGE_LOCATOR_OFFSET, list_start, w.position() - list_start);

		let mut records = Vec::with_capacity(self.sounds.len());
		for sound in &self.sounds {
			let start = w.position();
			w.put_bytes(sound);
			w.put_zeros(SOUND_CHECKSUM_SIZE);
			records.push((start, w.position() - start));
		}
		let list_start = w.position();
		write_located_list(&mut w, &records);
		w.patch_locator(SOUND_LOCATOR_OFFSET, list_start, w.position() - list_start);

		w.into_bytes()
	}

	/// Serializes the file and writes it to `path`
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), AcsError> {
		std::fs::write(path, self.build())?;
		Ok(())
	}

	fn write_character(&self, w: &mut Writer, localized_start: usize, localized_size: usize) {
		// Version
		w.put_u16(2);
		w.put_u16(0);
		w.put_locator(localized_start, localized_size);
		w.put_bytes(self.guid.as_bytes());
		w.put_u16(self.width);
		w.put_u16(self.height);
		w.put_u8(self.transparency_index);
		w.put_zeros(4 + 2 + 2);

		// Balloon info with an empty font name
		w.put_zeros(BALLOON_HEAD_SIZE);
		w.put_string("");
		w.put_zeros(BALLOON_TAIL_SIZE);

		w.put_u32(self.palette.len() as u32);
		for color in &self.palette {
			w.put_bytes(&color.to_bgrx());
		}

		// Tray icon
		w.put_u8(0);

		w.put_u16(self.states.len() as u16);
		for (name, animations) in &self.states {
			w.put_string(name);
			w.put_u16(animations.len() as u16);
			for animation in animations {
				w.put_string(animation);
			}
		}
	}
}

/// Writes a counted list of locators, each followed by a zero checksum
fn write_located_list(w: &mut Writer, records: &[(usize, usize)]) {
	w.put_u32(records.len() as u32);
	for &(offset, size) in records {
		w.put_locator(offset, size);
		w.put_u32(0);
	}
}
