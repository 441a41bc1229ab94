//! Character palette support.
//!
//! ACS characters carry a single palette shared by every image. It is stored as a
//! 4-byte color count followed by `count` entries in BGRX order. One entry, the
//! transparency index, is rendered fully transparent.

use std::fmt;

use super::{AcsError, Buffer, CountWidth};

/// RGBA color representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
	/// Red component (0-255)
	pub r: u8,
	/// Green component (0-255)
	pub g: u8,
	/// Blue component (0-255)
	pub b: u8,
	/// Alpha component (0-255)
	pub a: u8,
}

impl Color {
	/// Creates a new RGBA color.
	pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
		Self {
			r,
			g,
			b,
			a,
		}
	}

	/// Creates a new RGB color with full opacity.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self::new(r, g, b, 255)
	}

	/// Creates a transparent black color.
	pub const fn transparent() -> Self {
		Self::new(0, 0, 0, 0)
	}

	/// Creates an opaque color from a stored BGRX entry.
	pub const fn from_bgrx(entry: [u8; 4]) -> Self {
		Self::rgb(entry[2], entry[1], entry[0])
	}

	/// Returns the color as a stored BGRX entry.
	pub const fn to_bgrx(&self) -> [u8; 4] {
		[self.b, self.g, self.r, 0]
	}

	/// Returns the color as `[r, g, b, a]`.
	pub const fn to_array(&self) -> [u8; 4] {
		[self.r, self.g, self.b, self.a]
	}
}

impl Default for Color {
	fn default() -> Self {
		Self::transparent()
	}
}

impl fmt::Display for Color {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "RGBA({}, {}, {}, {})", self.r, self.g, self.b, self.a)
	}
}

/// Character palette with its transparency index applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
	colors: Vec<Color>,
	transparency_index: u8,
}

impl Palette {
	/// Builds a palette from stored BGRX entries.
	///
	/// The entry at `transparency_index` becomes [`Color::transparent`]. A non-empty palette
	/// must contain the transparency index.
	///
	/// An empty palette is accepted with any index. Characters without colors exist,
	/// and they have no row to clear: [`Self::get`] returns `None` for every index and
	/// every pixel renders transparent.
	pub fn from_bgrx(entries: &[[u8; 4]], transparency_index: u8) -> Result<Self, AcsError> {
		let mut colors: Vec<Color> = entries.iter().copied().map(Color::from_bgrx).collect();

		if !colors.is_empty() {
			let slot = colors.get_mut(usize::from(transparency_index)).ok_or(
				AcsError::InvalidTransparencyIndex {
					index: transparency_index,
					palette_len: entries.len(),
				},
			)?;
			*slot = Color::transparent();
		}

		Ok(Self {
			colors,
			transparency_index,
		})
	}

	/// Reads a counted list of BGRX entries.
	pub fn read(buf: &mut Buffer, transparency_index: u8) -> Result<Self, AcsError> {
		let entries = buf.read_list(CountWidth::Long, Buffer::read_fixed::<4>)?;
		Self::from_bgrx(&entries, transparency_index)
	}

	/// Returns the number of colors.
	#[inline]
	pub fn len(&self) -> usize {
		self.colors.len()
	}

	/// Returns `true` when the palette has no colors.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.colors.is_empty()
	}

	/// Returns the transparency index.
	#[inline]
	pub fn transparency_index(&self) -> u8 {
		self.transparency_index
	}

	/// Gets a color by index, `None` if the index is out of range.
	#[inline]
	pub fn get(&self, index: u8) -> Option<Color> {
		self.colors.get(usize::from(index)).copied()
	}

	/// Returns the colors in palette order.
	#[inline]
	pub fn colors(&self) -> &[Color] {
		&self.colors
	}

	/// Returns the palette as `N×4` RGBA bytes.
	pub fn to_rgba_bytes(&self) -> Vec<u8> {
		self.colors.iter().flat_map(Color::to_array).collect()
	}

	/// Returns the palette in its stored BGRX form.
	pub fn to_bgrx_entries(&self) -> Vec<[u8; 4]> {
		self.colors.iter().map(Color::to_bgrx).collect()
	}
}

impl fmt::Display for Palette {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"Palette: {} colors, transparency index {}",
			self.colors.len(),
			self.transparency_index
		)
	}
}
