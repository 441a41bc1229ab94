//! Decompression of bit-reversed LZ payloads.

use crate::file::DecompressError;

use super::{
	END_OF_STREAM, FAR_CLASS, HEADER_BITS, MAX_LENGTH_RUN, MIN_TOKEN_BITS, OFFSET_BIAS, OFFSET_BITS,
	min_copy_length,
};

/// Upper bound for the output preallocation, larger outputs grow on demand
const MAX_PREALLOCATION: usize = 1 << 22;

/// Reader walking each byte from its least significant bit
#[derive(Debug)]
struct BitReader<'a> {
	data: &'a [u8],
	position: usize,
}

impl<'a> BitReader<'a> {
	fn new(data: &'a [u8]) -> Self {
		Self {
			data,
			position: 0,
		}
	}

	fn remaining(&self) -> usize {
		(self.data.len() * 8).saturating_sub(self.position)
	}

	fn read_bit(&mut self) -> Result<bool, DecompressError> {
		let byte = self.data.get(self.position / 8).ok_or(DecompressError::UnexpectedEnd {
			bit_position: self.position,
		})?;

		let bit = (byte >> (self.position % 8)) & 1;
		self.position += 1;
		Ok(bit == 1)
	}

	/// Reads `count` bits, the first one landing in bit 0 of the result
	fn read_reversed(&mut self, count: u32) -> Result<u32, DecompressError> {
		let mut value = 0;
		for i in 0..count {
			if self.read_bit()? {
				value |= 1 << i;
			}
		}
		Ok(value)
	}

	/// Counts consecutive one-bits, consuming the terminating zero if the limit is not hit
	fn read_ones(&mut self, limit: u32) -> Result<u32, DecompressError> {
		let mut count = 0;
		while count < limit && self.read_bit()? {
			count += 1;
		}
		Ok(count)
	}
}

/// Decompresses an LZ payload.
///
/// `max_size` is the declared size of the output. A stream that tries to grow past it is
/// rejected, the result may however be shorter.
///
/// # Errors
///
/// - [`DecompressError::UnexpectedEnd`] when a token is cut short
/// - [`DecompressError::LengthRunTooLong`] when a length prefix has 12 leading ones
/// - [`DecompressError::InvalidBackReference`] when a copy reaches before the output start
/// - [`DecompressError::OutputOverflow`] when the output would exceed `max_size`
pub fn decompress(data: &[u8], max_size: usize) -> Result<Vec<u8>, DecompressError> {
	let mut reader = BitReader::new(data);
	let mut output = Vec::with_capacity(max_size.min(MAX_PREALLOCATION));

	reader.position = HEADER_BITS;

	while reader.remaining() >= MIN_TOKEN_BITS {
		if !reader.read_bit()? {
			if output.len() >= max_size {
				return Err(DecompressError::OutputOverflow {
					limit: max_size,
					needed: output.len() + 1,
				});
			}
			output.push(reader.read_reversed(8)? as u8);
			continue;
		}

		let class = reader.read_ones(FAR_CLASS as u32)? as usize;
		let offset_field = reader.read_reversed(OFFSET_BITS[class])?;
		if class == FAR_CLASS && offset_field == END_OF_STREAM {
			break;
		}

		let distance = offset_field as usize + OFFSET_BIAS[class];

		let run = reader.read_ones(MAX_LENGTH_RUN)?;
		if run == MAX_LENGTH_RUN {
			return Err(DecompressError::LengthRunTooLong {
				bit_position: reader.position,
				run,
			});
		}
		let extra = ((1usize << run) - 1) + reader.read_reversed(run)? as usize;
		let length = min_copy_length(class) + extra;

		if distance > output.len() {
			return Err(DecompressError::InvalidBackReference {
				distance,
				decoded: output.len(),
			});
		}

		let needed = output.len() + length;
		if needed > max_size {
			return Err(DecompressError::OutputOverflow {
				limit: max_size,
				needed,
			});
		}

		// Byte by byte, the source may overlap the bytes being written
		let start = output.len() - distance;
		for i in 0..length {
			let byte = output[start + i];
			output.push(byte);
		}
	}

	Ok(output)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_decompress_known_payload() {
		let data = [
			0x00, 0x40, 0x00, 0x04, 0x10, 0xD0, 0x90, 0x80, 0x42, 0xED, 0x98, 0x01, 0xB7, 0xFF,
			0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
		];

		let output = decompress(&data, 256).unwrap();

		let mut expected = vec![0x20, 0, 0, 0, 0x01, 0, 0, 0, 0, 0, 0, 0, 0xA8];
		expected.resize(32, 0);
		assert_eq!(output, expected);
	}

	#[test]
	fn test_literal_only_stream() {
		let output = decompress(&[0x00, 0x24, 0xD0, 0x58, 0x05], 16).unwrap();
		assert_eq!(output, vec![0x12, 0x34, 0xAB]);
	}

	#[test]
	fn test_overlapping_back_reference() {
		// Literal 0xAA, then a copy with offset 1 and length 5
		let output = decompress(&[0x00, 0x54, 0x03, 0x06], 16).unwrap();
		assert_eq!(output, vec![0xAA; 6]);
	}

	#[test]
	fn test_sentinel_ignores_trailing_tokens() {
		// Literal 0x42, end marker, then a literal 0x99 that must not be emitted
		let output = decompress(&[0x00, 0x84, 0xFE, 0xFF, 0xFF, 0x65, 0x02], 16).unwrap();
		assert_eq!(output, vec![0x42]);
	}

	#[test]
	fn test_short_input_is_padding() {
		assert!(decompress(&[], 16).unwrap().is_empty());
		assert!(decompress(&[0x00], 16).unwrap().is_empty());
		// 8 bits after the header are below the minimal token size
		assert!(decompress(&[0x00, 0xFF], 16).unwrap().is_empty());
	}

	#[test]
	fn test_length_run_too_long() {
		let err = decompress(&[0x00, 0x02, 0x02, 0xFE, 0x1F], 64).unwrap_err();
		assert_eq!(
			err,
			DecompressError::LengthRunTooLong {
				bit_position: 37,
				run: 12,
			}
		);
	}

	#[test]
	fn test_back_reference_before_start() {
		let err = decompress(&[0x00, 0x01, 0x00, 0x00], 64).unwrap_err();
		assert_eq!(
			err,
			DecompressError::InvalidBackReference {
				distance: 1,
				decoded: 0,
			}
		);
	}

	#[test]
	fn test_truncated_token() {
		// Far back-reference with only 12 of its 20 offset bits present
		let err = decompress(&[0x00, 0x0F, 0x00], 64).unwrap_err();
		assert_eq!(
			err,
			DecompressError::UnexpectedEnd {
				bit_position: 24,
			}
		);
	}

	#[test]
	fn test_output_overflow_is_fatal() {
		let err = decompress(&[0x00, 0x24, 0xD0, 0x58, 0x05], 2).unwrap_err();
		assert_eq!(
			err,
			DecompressError::OutputOverflow {
				limit: 2,
				needed: 3,
			}
		);

		let err = decompress(&[0x00, 0x54, 0x03, 0x06], 4).unwrap_err();
		assert_eq!(
			err,
			DecompressError::OutputOverflow {
				limit: 4,
				needed: 6,
			}
		);
	}
}
