//! Indexed-color image records and their reconstruction.
//!
//! ## Image list
//!
//! The image list is a 4-byte count of entries, each an `ACSLOCATOR` followed by a
//! 4-byte checksum that is ignored. A located record is laid out as:
//!
//! | Offset | Size | Field        | Description                            |
//! |--------|------|--------------|----------------------------------------|
//! | 0x00   | 1    | `unknown`    | Ignored                                |
//! | 0x01   | 2    | `width`      | Image width in pixels                  |
//! | 0x03   | 2    | `height`     | Image height in pixels                 |
//! | 0x05   | 1    | `compressed` | Non-zero when the payload is LZ packed |
//! | 0x06   | 4    | `length`     | Payload length in bytes                |
//! | 0x0A   | N    | `payload`    | Pixel rows                             |
//!
//! ## Pixel rows
//!
//! Rows are padded to a 4-byte stride of `(width + extra_width + 3) & !3` bytes and
//! stored bottom row first. `extra_width` is zero except for a few characters whose
//! payloads carry extra padding columns.

use std::sync::atomic::{AtomicBool, Ordering};

use bytes::Bytes;
use log::info;

use super::{AcsError, Buffer, CountWidth, Palette, lz};

/// Progress is logged every this many images
const PROGRESS_LOG_INTERVAL: usize = 10;

/// Returns the stored row stride for an image of the given width.
#[inline]
pub fn row_stride(width: u16, extra_width: usize) -> usize {
	(usize::from(width) + extra_width + 3) & !3
}

/// Decoded image made of palette indices, top row first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexedImage {
	width: u16,
	height: u16,
	pixels: Vec<u8>,
}

impl IndexedImage {
	/// Creates an image from top-down, unpadded rows.
	///
	/// Returns `None` when `pixels` does not hold exactly `width * height` indices.
	pub fn new(width: u16, height: u16, pixels: Vec<u8>) -> Option<Self> {
		(pixels.len() == usize::from(width) * usize::from(height)).then_some(Self {
			width,
			height,
			pixels,
		})
	}

	/// Rebuilds an image from stored bottom-up, stride-padded rows.
	pub fn from_stored_rows(
		data: &[u8],
		width: u16,
		height: u16,
		extra_width: usize,
	) -> Result<Self, AcsError> {
		let stride = row_stride(width, extra_width);
		let row_len = usize::from(width);

		if height > 0 {
			let expected = (usize::from(height) - 1) * stride + row_len;
			if data.len() < expected {
				return Err(AcsError::ImageDataTooShort {
					width,
					height,
					expected,
					actual: data.len(),
				});
			}
		}

		let mut pixels = Vec::with_capacity(row_len * usize::from(height));
		for row in (0..usize::from(height)).rev() {
			let start = row * stride;
			pixels.extend_from_slice(&data[start..start + row_len]);
		}

		Ok(Self {
			width,
			height,
			pixels,
		})
	}

	/// Returns the image in stored form: bottom-up rows padded with zeros to the stride.
	pub fn to_stored_rows(&self, extra_width: usize) -> Vec<u8> {
		let stride = row_stride(self.width, extra_width);
		let mut data = vec![0u8; stride * usize::from(self.height)];

		for (index, row) in self.rows().rev().enumerate() {
			data[index * stride..index * stride + row.len()].copy_from_slice(row);
		}

		data
	}

	/// Returns the image width in pixels.
	#[inline]
	pub fn width(&self) -> u16 {
		self.width
	}

	/// Returns the image height in pixels.
	#[inline]
	pub fn height(&self) -> u16 {
		self.height
	}

	/// Returns the palette indices, row-major, top row first.
	#[inline]
	pub fn pixels(&self) -> &[u8] {
		&self.pixels
	}

	/// Returns the palette index at `(x, y)`.
	pub fn pixel(&self, x: u16, y: u16) -> Option<u8> {
		if x >= self.width || y >= self.height {
			return None;
		}
		Some(self.pixels[usize::from(y) * usize::from(self.width) + usize::from(x)])
	}

	/// Returns an iterator over the rows, top row first.
	pub fn rows(&self) -> impl DoubleEndedIterator<Item = &[u8]> + ExactSizeIterator {
		// A zero-width image has no pixels, so any non-zero chunk size yields no rows
		self.pixels.chunks_exact(usize::from(self.width).max(1))
	}

	/// Converts the image to RGBA through `palette`.
	///
	/// Indices outside of the palette become transparent.
	pub fn to_rgba(&self, palette: &Palette) -> image::RgbaImage {
		let mut rgba = image::RgbaImage::new(u32::from(self.width), u32::from(self.height));
		for (pixel, &index) in rgba.pixels_mut().zip(&self.pixels) {
			*pixel = image::Rgba(palette.get(index).unwrap_or_default().to_array());
		}
		rgba
	}
}

/// An image record as stored in the image list, not yet decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
	/// Image width in pixels
	pub width: u16,
	/// Image height in pixels
	pub height: u16,
	/// Whether the payload is LZ packed
	pub compressed: bool,
	/// Payload bytes, shared with the container
	pub data: Bytes,
}

impl ImageRecord {
	/// Reads a record from its located region.
	pub fn read(buf: &mut Buffer) -> Result<Self, AcsError> {
		buf.skip(1)?;
		let width = buf.read_u16()?;
		let height = buf.read_u16()?;
		let compressed = buf.read_u8()? != 0;
		let length = buf.read_u32()? as usize;
		let data = buf.read_bytes(length)?;

		Ok(Self {
			width,
			height,
			compressed,
			data,
		})
	}

	/// Builds a record from a decoded image, packing it when `compress` is set.
	pub fn from_image(image: &IndexedImage, compress: bool, extra_width: usize) -> Self {
		let rows = image.to_stored_rows(extra_width);
		let data = if compress {
			lz::compress(&rows)
		} else {
			rows
		};

		Self {
			width: image.width(),
			height: image.height(),
			compressed: compress,
			data: Bytes::from(data),
		}
	}

	/// Returns the record in its stored form.
	pub fn to_bytes(&self) -> Vec<u8> {
		let mut out = Vec::with_capacity(10 + self.data.len());
		out.push(0);
		out.extend_from_slice(&self.width.to_le_bytes());
		out.extend_from_slice(&self.height.to_le_bytes());
		out.push(u8::from(self.compressed));
		out.extend_from_slice(&(self.data.len() as u32).to_le_bytes());
		out.extend_from_slice(&self.data);
		out
	}

	/// Decodes the record into an image.
	///
	/// `index` is the record's position in the image list and is only used for error
	/// reporting.
	pub fn decode(&self, index: usize, extra_width: usize) -> Result<IndexedImage, AcsError> {
		if !self.compressed {
			return IndexedImage::from_stored_rows(&self.data, self.width, self.height, extra_width);
		}

		let bound = row_stride(self.width, extra_width) * usize::from(self.height);
		let rows = lz::decompress(&self.data, bound).map_err(|source| AcsError::Decompression {
			index,
			source,
		})?;

		IndexedImage::from_stored_rows(&rows, self.width, self.height, extra_width)
	}
}

/// Reads the records of an image list without decoding them.
pub fn read_image_records(buf: &mut Buffer) -> Result<Vec<ImageRecord>, AcsError> {
	buf.read_list(CountWidth::Long, |entry| {
		let mut record = entry.locator()?;
		// Checksum
		entry.skip(4)?;
		ImageRecord::read(&mut record)
	})
}

/// Decodes every image of an image list.
///
/// `cancel` is checked before each image; once it is set, decoding stops with
/// [`AcsError::DecompressionInterrupted`]. `progress` is called with
/// `(images processed, total)` after each image.
pub fn read_images<F>(
	buf: &mut Buffer,
	extra_width: usize,
	cancel: Option<&AtomicBool>,
	mut progress: F,
) -> Result<Vec<IndexedImage>, AcsError>
where
	F: FnMut(usize, usize),
{
	let records = read_image_records(buf)?;
	let total = records.len();
	let mut images = Vec::with_capacity(total);

	for (index, record) in records.iter().enumerate() {
		if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
			return Err(AcsError::DecompressionInterrupted {
				completed: index,
				total,
			});
		}

		images.push(record.decode(index, extra_width)?);

		let processed = index + 1;
		progress(processed, total);
		if processed % PROGRESS_LOG_INTERVAL == 0 || processed == total {
			info!("Decoded {processed}/{total} images");
		}
	}

	Ok(images)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample_image() -> IndexedImage {
		// 3x2, top row first
		IndexedImage::new(3, 2, vec![1, 2, 3, 4, 5, 6]).unwrap()
	}

	#[test]
	fn test_row_stride() {
		assert_eq!(row_stride(0, 0), 0);
		assert_eq!(row_stride(1, 0), 4);
		assert_eq!(row_stride(4, 0), 4);
		assert_eq!(row_stride(5, 0), 8);
		assert_eq!(row_stride(6, 2), 8);
		assert_eq!(row_stride(7, 2), 12);
	}

	#[test]
	fn test_stored_rows_are_flipped_and_padded() {
		let image = sample_image();
		assert_eq!(image.to_stored_rows(0), vec![4, 5, 6, 0, 1, 2, 3, 0]);

		let rebuilt = IndexedImage::from_stored_rows(&[4, 5, 6, 9, 1, 2, 3, 9], 3, 2, 0).unwrap();
		assert_eq!(rebuilt, image);
	}

	#[test]
	fn test_extra_width_widens_the_stride() {
		let image = sample_image();
		let stored = image.to_stored_rows(2);
		assert_eq!(stored.len(), 16);

		assert_eq!(IndexedImage::from_stored_rows(&stored, 3, 2, 2).unwrap(), image);
	}

	#[test]
	fn test_last_row_padding_is_optional() {
		// (height - 1) * stride + width bytes are enough
		let rebuilt = IndexedImage::from_stored_rows(&[4, 5, 6, 0, 1, 2, 3], 3, 2, 0).unwrap();
		assert_eq!(rebuilt, sample_image());
	}

	#[test]
	fn test_short_data_fails() {
		match IndexedImage::from_stored_rows(&[4, 5, 6, 0, 1, 2], 3, 2, 0).unwrap_err() {
			AcsError::ImageDataTooShort {
				expected,
				actual,
				..
			} => {
				assert_eq!(expected, 7);
				assert_eq!(actual, 6);
			}
			err => panic!("Unexpected error: {err:?}"),
		}
	}

	#[test]
	fn test_empty_image() {
		let image = IndexedImage::from_stored_rows(&[], 0, 0, 0).unwrap();
		assert!(image.pixels().is_empty());
		assert_eq!(image.rows().len(), 0);
	}

	#[test]
	fn test_pixel_access() {
		let image = sample_image();
		assert_eq!(image.pixel(0, 0), Some(1));
		assert_eq!(image.pixel(2, 1), Some(6));
		assert_eq!(image.pixel(3, 0), None);
		assert_eq!(image.rows().collect::<Vec<_>>(), vec![&[1, 2, 3][..], &[4, 5, 6][..]]);
	}

	#[test]
	fn test_record_decode_compressed_and_raw() {
		let image = sample_image();

		for compress in [true, false] {
			let record = ImageRecord::from_image(&image, compress, 0);
			let mut buf = Buffer::new(record.to_bytes());
			let parsed = ImageRecord::read(&mut buf).unwrap();
			assert_eq!(parsed, record);
			assert_eq!(parsed.decode(0, 0).unwrap(), image);
		}
	}

	#[test]
	fn test_corrupted_payload_reports_index() {
		let record = ImageRecord {
			width: 4,
			height: 4,
			compressed: true,
			data: Bytes::from_static(&[0x00, 0x02, 0x02, 0xFE, 0x1F]),
		};

		match record.decode(7, 0).unwrap_err() {
			AcsError::Decompression {
				index,
				..
			} => assert_eq!(index, 7),
			err => panic!("Unexpected error: {err:?}"),
		}
	}

	#[test]
	fn test_to_rgba_uses_palette() {
		let palette = Palette::from_bgrx(&[[0, 0, 0, 0], [0, 0, 255, 0]], 0).unwrap();
		let image = IndexedImage::new(2, 1, vec![0, 1]).unwrap();

		let rgba = image.to_rgba(&palette);
		assert_eq!(rgba.get_pixel(0, 0).0, [0, 0, 0, 0]);
		assert_eq!(rgba.get_pixel(1, 0).0, [255, 0, 0, 255]);
	}
}
