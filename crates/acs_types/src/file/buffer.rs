//! Bounds-checked reader over ACS container data.
//!
//! Every structure in an ACS file is reached through a `Buffer`: a cursor over a
//! view of the whole-file backing array. Views are cheap to clone and never copy
//! the underlying bytes.
//!
//! ## Locators
//!
//! The container addresses its sections with `ACSLOCATOR` records:
//!
//! | Offset | Size | Field    | Description                              |
//! |--------|------|----------|------------------------------------------|
//! | 0x00   | 4    | `offset` | Absolute offset from the start of file   |
//! | 0x04   | 4    | `size`   | Size of the addressed region in bytes    |
//!
//! The offset is always absolute, no matter which view the locator was read from.
//!
//! ## Strings
//!
//! Strings are stored as a 4-byte character count followed by that many UTF-16LE
//! code units. Non-empty strings carry an extra null code unit.

use bytes::Bytes;
use encoding_rs::UTF_16LE;

use super::AcsError;

/// Exclusive upper bound for list counts, anything above is treated as corruption
pub const LIST_COUNT_LIMIT: u32 = 65536;

/// Width of the count field preceding a list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CountWidth {
	/// 1-byte count
	Byte,
	/// 2-byte count
	Short,
	/// 4-byte count
	Long,
}

/// Cursor over a view of the container's backing array
#[derive(Clone)]
pub struct Buffer {
	/// Whole-file backing array, locators resolve against it
	root: Bytes,
	/// The region this buffer reads from
	view: Bytes,
	/// Absolute offset of `view` within `root`
	abs_offset: usize,
	/// Read cursor relative to `view`
	pos: usize,
}

impl Buffer {
	/// Creates a buffer over the whole backing array.
	pub fn new(data: impl Into<Bytes>) -> Self {
		let root = data.into();
		Self {
			view: root.clone(),
			root,
			abs_offset: 0,
			pos: 0,
		}
	}

	/// Returns the length of this view in bytes.
	pub fn len(&self) -> usize {
		self.view.len()
	}

	/// Returns `true` when the view is empty.
	pub fn is_empty(&self) -> bool {
		self.view.is_empty()
	}

	/// Returns the cursor position relative to the start of the view.
	pub fn position(&self) -> usize {
		self.pos
	}

	/// Returns the number of unread bytes in the view.
	pub fn remaining(&self) -> usize {
		self.view.len().saturating_sub(self.pos)
	}

	/// Returns the absolute offset of the view within the backing array.
	pub fn abs_offset(&self) -> usize {
		self.abs_offset
	}

	/// Returns the bytes of the whole view, independent of the cursor.
	pub fn as_bytes(&self) -> &[u8] {
		&self.view
	}

	/// Returns the length of the backing array.
	pub fn root_len(&self) -> usize {
		self.root.len()
	}

	/// Returns a new buffer viewing this one from `offset` to its end.
	pub fn at(&self, offset: usize) -> Result<Buffer, AcsError> {
		if offset > self.view.len() {
			return Err(AcsError::insufficient_data(
				self.abs_offset + self.view.len(),
				offset - self.view.len(),
				0,
			));
		}

		Ok(Buffer {
			root: self.root.clone(),
			view: self.view.slice(offset..),
			abs_offset: self.abs_offset + offset,
			pos: 0,
		})
	}

	fn take(&mut self, count: usize) -> Result<&[u8], AcsError> {
		let remaining = self.remaining();
		if count > remaining {
			return Err(AcsError::insufficient_data(self.abs_offset + self.pos, count, remaining));
		}

		let start = self.pos;
		self.pos += count;
		Ok(&self.view[start..start + count])
	}

	fn read_array<const N: usize>(&mut self) -> Result<[u8; N], AcsError> {
		let mut bytes = [0u8; N];
		bytes.copy_from_slice(self.take(N)?);
		Ok(bytes)
	}

	/// Reads an unsigned byte.
	pub fn read_u8(&mut self) -> Result<u8, AcsError> {
		Ok(self.read_array::<1>()?[0])
	}

	/// Reads a signed byte.
	pub fn read_i8(&mut self) -> Result<i8, AcsError> {
		Ok(i8::from_le_bytes(self.read_array()?))
	}

	/// Reads a little-endian `u16`.
	pub fn read_u16(&mut self) -> Result<u16, AcsError> {
		Ok(u16::from_le_bytes(self.read_array()?))
	}

	/// Reads a little-endian `i16`.
	pub fn read_i16(&mut self) -> Result<i16, AcsError> {
		Ok(i16::from_le_bytes(self.read_array()?))
	}

	/// Reads a little-endian `u32`.
	pub fn read_u32(&mut self) -> Result<u32, AcsError> {
		Ok(u32::from_le_bytes(self.read_array()?))
	}

	/// Reads a little-endian `i32`.
	pub fn read_i32(&mut self) -> Result<i32, AcsError> {
		Ok(i32::from_le_bytes(self.read_array()?))
	}

	/// Reads a fixed-size byte array.
	pub fn read_fixed<const N: usize>(&mut self) -> Result<[u8; N], AcsError> {
		self.read_array()
	}

	/// Returns a zero-copy view of the next `count` bytes and advances past them.
	pub fn read_bytes(&mut self, count: usize) -> Result<Bytes, AcsError> {
		let remaining = self.remaining();
		if count > remaining {
			return Err(AcsError::insufficient_data(self.abs_offset + self.pos, count, remaining));
		}

		let bytes = self.view.slice(self.pos..self.pos + count);
		self.pos += count;
		Ok(bytes)
	}

	/// Advances the cursor by `count` bytes.
	pub fn skip(&mut self, count: usize) -> Result<(), AcsError> {
		self.take(count).map(|_| ())
	}

	/// Reads a length-prefixed UTF-16LE string.
	pub fn read_string(&mut self) -> Result<String, AcsError> {
		let length = self.read_u32()? as usize;
		let raw = self.take(length.saturating_mul(2))?;
		let text = UTF_16LE.decode_without_bom_handling(raw).0.into_owned();

		// Only non-empty strings are null terminated
		if length > 0 {
			self.skip(2)?;
		}

		Ok(text)
	}

	/// Reads a list count of the given width, rejecting implausible values.
	pub fn read_count(&mut self, width: CountWidth) -> Result<usize, AcsError> {
		let count = match width {
			CountWidth::Byte => u32::from(self.read_u8()?),
			CountWidth::Short => u32::from(self.read_u16()?),
			CountWidth::Long => self.read_u32()?,
		};

		if count >= LIST_COUNT_LIMIT {
			return Err(AcsError::ListTooLong {
				count,
				limit: LIST_COUNT_LIMIT,
			});
		}

		Ok(count as usize)
	}

	/// Reads a counted list, decoding each element with `reader`.
	pub fn read_list<T, F>(&mut self, width: CountWidth, mut reader: F) -> Result<Vec<T>, AcsError>
	where
		F: FnMut(&mut Buffer) -> Result<T, AcsError>,
	{
		self.read_list_with_len(width, |buf, _| reader(buf))
	}

	/// Reads a counted list, passing the total element count to `reader` as well.
	pub fn read_list_with_len<T, F>(
		&mut self,
		width: CountWidth,
		mut reader: F,
	) -> Result<Vec<T>, AcsError>
	where
		F: FnMut(&mut Buffer, usize) -> Result<T, AcsError>,
	{
		let count = self.read_count(width)?;
		let mut items = Vec::with_capacity(count);
		for _ in 0..count {
			items.push(reader(self, count)?);
		}
		Ok(items)
	}

	/// Reads an `ACSLOCATOR` and returns a buffer over the region it addresses.
	pub fn locator(&mut self) -> Result<Buffer, AcsError> {
		let offset = self.read_u32()?;
		let size = self.read_u32()?;

		let start = offset as usize;
		let end = match start.checked_add(size as usize) {
			Some(end) if end <= self.root.len() => end,
			_ => {
				return Err(AcsError::LocatorOutOfBounds {
					offset,
					size,
					data_len: self.root.len(),
				});
			}
		};

		Ok(Buffer {
			root: self.root.clone(),
			view: self.root.slice(start..end),
			abs_offset: start,
			pos: 0,
		})
	}
}

impl std::fmt::Debug for Buffer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Buffer")
			.field("abs_offset", &self.abs_offset)
			.field("len", &self.view.len())
			.field("pos", &self.pos)
			.field("root_len", &self.root.len())
			.finish()
	}
}
