//! Embedded sound files.
//!
//! The sound list is a 4-byte count of entries, each an `ACSLOCATOR` followed by a
//! 4-byte checksum. The located region holds a complete RIFF/WAVE file followed by
//! 4 more bytes that are not part of the sound.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use log::warn;

use super::{AcsError, Buffer, CountWidth};

/// Directory below a cache root holding the extracted clips
pub const SOUND_CACHE_DIR: &str = "sounds";

/// An embedded sound file, shared with the container's backing array
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundClip {
	data: Bytes,
}

impl SoundClip {
	/// Wraps the bytes of a sound file.
	pub fn new(data: impl Into<Bytes>) -> Self {
		Self {
			data: data.into(),
		}
	}

	/// Returns the sound file bytes.
	pub fn data(&self) -> &[u8] {
		&self.data
	}

	/// Returns the sound file bytes as a shared handle.
	pub fn bytes(&self) -> Bytes {
		self.data.clone()
	}

	/// Returns the length of the sound file in bytes.
	pub fn len(&self) -> usize {
		self.data.len()
	}

	/// Returns `true` for a zero-length clip.
	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	/// Probes the WAVE header.
	///
	/// Returns `None` when the clip is not a WAVE file or uses a codec other than PCM
	/// or IEEE float, which is common for clips that need transcoding.
	pub fn wav_spec(&self) -> Option<hound::WavSpec> {
		hound::WavReader::new(Cursor::new(&self.data[..]))
			.ok()
			.map(|reader| reader.spec())
	}

	/// Returns the playing time in milliseconds, if the header can be probed.
	pub fn duration_ms(&self) -> Option<u64> {
		let reader = hound::WavReader::new(Cursor::new(&self.data[..])).ok()?;
		let sample_rate = u64::from(reader.spec().sample_rate);
		(sample_rate > 0).then(|| u64::from(reader.duration()) * 1000 / sample_rate)
	}
}

/// Sound clips addressable by a frame's audio index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SoundTable {
	clips: Vec<SoundClip>,
}

impl SoundTable {
	/// Reads the sound list.
	pub fn read(buf: &mut Buffer) -> Result<Self, AcsError> {
		let clips = buf.read_list(CountWidth::Long, |entry| {
			let mut located = entry.locator()?;
			// Checksum
			entry.skip(4)?;

			let length = located.len().saturating_sub(4);
			Ok(SoundClip::new(located.read_bytes(length)?))
		})?;

		Ok(Self {
			clips,
		})
	}

	/// Returns the number of clips.
	pub fn len(&self) -> usize {
		self.clips.len()
	}

	/// Returns `true` when there are no clips.
	pub fn is_empty(&self) -> bool {
		self.clips.is_empty()
	}

	/// Returns a clip by index.
	pub fn get(&self, index: usize) -> Option<&SoundClip> {
		self.clips.get(index)
	}

	/// Returns an iterator over the clips in list order.
	pub fn iter(&self) -> std::slice::Iter<'_, SoundClip> {
		self.clips.iter()
	}

	/// Writes each clip to `<cache_dir>/sounds/<index>.wav` unless it already exists.
	///
	/// The result has one entry per clip: the file path, or `None` when the file could not
	/// be written. A failed clip is logged and does not stop the others.
	pub fn write_cache<P: AsRef<Path>>(&self, cache_dir: P) -> Result<Vec<Option<PathBuf>>, AcsError> {
		let dir = cache_dir.as_ref().join(SOUND_CACHE_DIR);
		std::fs::create_dir_all(&dir)?;

		let paths = self
			.clips
			.iter()
			.enumerate()
			.map(|(index, clip)| {
				let path = dir.join(format!("{index}.wav"));
				if !path.is_file()
					&& let Err(err) = std::fs::write(&path, clip.data())
				{
					warn!("Failed to write sound {index} to {}: {err}", path.display());
				}
				path.is_file().then_some(path)
			})
			.collect();

		Ok(paths)
	}
}

impl<'a> IntoIterator for &'a SoundTable {
	type Item = &'a SoundClip;
	type IntoIter = std::slice::Iter<'a, SoundClip>;

	fn into_iter(self) -> Self::IntoIter {
		self.clips.iter()
	}
}
