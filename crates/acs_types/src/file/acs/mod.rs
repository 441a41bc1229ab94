//! `.ACS` character file support.
//!
//! An ACS file bundles everything a desktop-assistant character needs: metadata and
//! localized names, a palette, named animations made of frames, the indexed-color
//! images those frames draw, and embedded sound files.
//!
//! # File Structure
//!
//! | Offset | Size | Field        | Description                      |
//! |--------|------|--------------|----------------------------------|
//! | 0x00   | 4    | `magic`      | `C3 AB CD AB`                    |
//! | 0x04   | 8    | `character`  | Locator of the character info    |
//! | 0x0C   | 8    | `animations` | Locator of the animation list    |
//! | 0x14   | 8    | `images`     | Locator of the image list        |
//! | 0x1C   | 8    | `sounds`     | Locator of the sound list        |
//!
//! Parsing reads everything except the images, which are decoded on request since
//! decompressing them takes a while.
//!
//! # Examples
//!
//! ```no_run
//! use acs_types::file::AcsFile;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let acs = AcsFile::open("KAIRU.ACS")?;
//! println!("{} [{}]", acs.localized_info(None).name, acs.character().guid);
//!
//! for animation in acs.animations().values() {
//!     println!("{}: {} frames", animation.name, animation.frame_count());
//! }
//!
//! let images = acs.decode_images(None, |done, total| println!("{done}/{total}"))?;
//! # Ok(())
//! # }
//! ```

mod animation;
mod builder;
mod character;
pub mod constants;


use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use bytes::Bytes;
use log::warn;

use crate::file::{
	AcsError, AtlasMetadata, Buffer, CountWidth, ImageCache, ImageRecord, IndexedImage,
	SoundTable, read_image_records, read_images,
};

pub use animation::{AnimInfo, BranchInfo, FrameImage, FrameInfo, TransitionType};
pub use builder::FileBuilder;
pub use character::{CharacterInfo, Guid, LocalizedInfo, language_id, locale_code, system_locale};

use constants::{
	ANIMATION_LOCATOR_OFFSET, CHARACTER_LOCATOR_OFFSET, EXTRA_WIDTH_QUIRKS, FALLBACK_LOCALE,
	IMAGE_LOCATOR_OFFSET, MAGIC, SOUND_LOCATOR_OFFSET,
};

/// Returns the extra row width used by a character's image payloads.
pub fn extra_width_for(guid: &Guid) -> usize {
	EXTRA_WIDTH_QUIRKS
		.iter()
		.find(|(bytes, _)| bytes == guid.as_bytes())
		.map_or(0, |(_, extra)| *extra)
}

/// Parsed `.ACS` file
#[derive(Debug, Clone)]
pub struct AcsFile {
	name: String,
	character: CharacterInfo,
	animations: BTreeMap<String, Arc<AnimInfo>>,
	sounds: SoundTable,
	images: Buffer,
}

impl AcsFile {
	/// Parses an ACS file held in memory.
	///
	/// `name` labels the character where no localized name is available, usually the
	/// file stem.
	pub fn from_bytes(name: impl Into<String>, data: impl Into<Bytes>) -> Result<Self, AcsError> {
		let root = Buffer::new(data);

		let actual: [u8; 4] = root.clone().read_fixed()?;
		if actual != MAGIC {
			return Err(AcsError::InvalidMagic {
				expected: MAGIC,
				actual,
			});
		}

		let character = CharacterInfo::read(&mut root.at(CHARACTER_LOCATOR_OFFSET)?.locator()?)?;

		let mut animations = BTreeMap::new();
		let list = root
			.at(ANIMATION_LOCATOR_OFFSET)?
			.locator()?
			.read_list(CountWidth::Long, AnimInfo::read_entry)?;
		for animation in list {
			let name = animation.name.clone();
			if animations.contains_key(&name) {
				warn!("Duplicate animation name {name}, keeping the later one");
			}
			animations.insert(name, Arc::new(animation));
		}

		let sounds = SoundTable::read(&mut root.at(SOUND_LOCATOR_OFFSET)?.locator()?)?;
		let images = root.at(IMAGE_LOCATOR_OFFSET)?.locator()?;

		Ok(Self {
			name: name.into(),
			character,
			animations,
			sounds,
			images,
		})
	}

	/// Reads and parses an ACS file.
	pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, AcsError> {
		let path = path.as_ref();
		let data = std::fs::read(path)?;
		let name = path.file_stem().map_or_else(String::new, |stem| stem.to_string_lossy().into_owned());
		Self::from_bytes(name, data)
	}

	/// Returns the label given at load time.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns the character info.
	pub fn character(&self) -> &CharacterInfo {
		&self.character
	}

	/// Returns the animations keyed by name.
	pub fn animations(&self) -> &BTreeMap<String, Arc<AnimInfo>> {
		&self.animations
	}

	/// Returns an animation by its exact name.
	pub fn animation(&self, name: &str) -> Option<&Arc<AnimInfo>> {
		self.animations.get(name)
	}

	/// Returns the embedded sounds.
	pub fn sounds(&self) -> &SoundTable {
		&self.sounds
	}

	/// Returns the extra row width of this character's images.
	pub fn extra_width(&self) -> usize {
		extra_width_for(&self.character.guid)
	}

	/// Reads the image records without decoding them.
	pub fn image_records(&self) -> Result<Vec<ImageRecord>, AcsError> {
		read_image_records(&mut self.images.clone())
	}

	/// Decodes every image. See [`read_images`] for `cancel` and `progress`.
	pub fn decode_images<F>(&self, cancel: Option<&AtomicBool>, progress: F) -> Result<Vec<IndexedImage>, AcsError>
	where
		F: FnMut(usize, usize),
	{
		self.decode_images_with(self.extra_width(), cancel, progress)
	}

	/// Decodes every image with an explicit extra row width.
	pub fn decode_images_with<F>(
		&self,
		extra_width: usize,
		cancel: Option<&AtomicBool>,
		progress: F,
	) -> Result<Vec<IndexedImage>, AcsError>
	where
		F: FnMut(usize, usize),
	{
		read_images(&mut self.images.clone(), extra_width, cancel, progress)
	}

	/// Loads the sprite cache in `dir`, decoding the images into it if needed.
	pub fn ensure_image_cache<P, F>(
		&self,
		dir: P,
		cancel: Option<&AtomicBool>,
		progress: F,
	) -> Result<AtlasMetadata, AcsError>
	where
		P: AsRef<Path>,
		F: FnMut(usize, usize),
	{
		ImageCache::new(dir.as_ref())
			.ensure(&self.character.palette, || self.decode_images(cancel, progress))
	}

	/// Returns the localized info for `locale`, the process locale when `None`.
	///
	/// Falls back to `en_US`, then to a placeholder named after the file.
	pub fn localized_info(&self, locale: Option<&str>) -> LocalizedInfo {
		let locale = locale.filter(|l| !l.is_empty()).map_or_else(system_locale, str::to_string);

		self.character
			.localized
			.get(&locale)
			.or_else(|| self.character.localized.get(FALLBACK_LOCALE))
			.cloned()
			.unwrap_or_else(|| LocalizedInfo::placeholder(&self.name, &locale))
	}

	/// Describes the states and every animation's frame structure.
	pub fn report(&self) -> String {
		let mut text = String::new();
		let _ = write!(text, "{} [{}]\n\n", self.localized_info(None), self.character.guid);

		for (state, animations) in &self.character.states {
			let _ = writeln!(text, "{state}: {}", animations.join(", "));
		}
		text.push('\n');

		for animation in self.animations.values() {
			let _ = writeln!(text, "==============={}===============", animation.name);
			if animation.transition != TransitionType::NoTransition {
				let _ = writeln!(text, "Transition Type: {}", animation.transition);
			}
			if let Some(name) = &animation.return_animation {
				let _ = writeln!(text, "Return Animation Name: {name}");
			}
			text.push_str(&animation.frames_summary());
			text.push_str("\n\n");
		}

		text
	}

	/// Writes [`Self::report`] to `path`.
	pub fn write_report<P: AsRef<Path>>(&self, path: P) -> Result<(), AcsError> {
		std::fs::write(path.as_ref(), self.report())?;
		log::info!("Wrote animation report to {}", path.as_ref().display());
		Ok(())
	}
}
