//! Reference compressor producing bit-reversed LZ payloads.
//!
//! ## Strategy
//!
//! Greedy LZ over a hash chain of 3-byte prefixes:
//! 1. Write a zero header byte
//! 2. At each position, walk the chain for the longest match within the maximum distance
//! 3. Emit a back-reference when the match reaches the class minimum, a literal otherwise
//! 4. Close the stream with the end marker and pad the last byte with zeros
//!
//! Payloads from other encoders use the same token grammar but may choose different
//! matches, so only the decompressed bytes are comparable.

use super::{
	END_OF_STREAM, FAR_CLASS, HEADER_BITS, MAX_LENGTH_RUN, OFFSET_BIAS, OFFSET_BITS,
	min_copy_length,
};

const HASH_BITS: u32 = 15;
const MAX_CHAIN: usize = 128;
const NO_POSITION: usize = usize::MAX;

/// Largest value the extra-length field can carry
const MAX_EXTRA_LENGTH: usize = (1 << MAX_LENGTH_RUN) - 2;

/// Largest distance a back-reference can express
const MAX_DISTANCE: usize = OFFSET_BIAS[FAR_CLASS] + END_OF_STREAM as usize - 1;

/// Bit writer filling each byte from its least significant bit
#[derive(Debug)]
struct BitWriter {
	data: Vec<u8>,
	bit_buffer: u8,
	bits_in_buffer: u32,
}

impl BitWriter {
	fn new() -> Self {
		Self {
			data: Vec::new(),
			bit_buffer: 0,
			bits_in_buffer: 0,
		}
	}

	fn write_bit(&mut self, bit: bool) {
		self.bit_buffer |= u8::from(bit) << self.bits_in_buffer;
		self.bits_in_buffer += 1;

		if self.bits_in_buffer == 8 {
			self.data.push(self.bit_buffer);
			self.bit_buffer = 0;
			self.bits_in_buffer = 0;
		}
	}

	/// Writes `count` bits of `value`, bit 0 first
	fn write_reversed(&mut self, value: u32, count: u32) {
		for i in 0..count {
			self.write_bit((value >> i) & 1 == 1);
		}
	}

	fn write_ones(&mut self, count: usize) {
		for _ in 0..count {
			self.write_bit(true);
		}
	}

	fn write_literal(&mut self, byte: u8) {
		self.write_bit(false);
		self.write_reversed(u32::from(byte), 8);
	}

	fn write_copy(&mut self, distance: usize, length: usize) {
		let class = (0..FAR_CLASS)
			.find(|&class| distance < OFFSET_BIAS[class] + (1 << OFFSET_BITS[class]))
			.unwrap_or(FAR_CLASS);

		self.write_bit(true);
		self.write_ones(class);
		if class < FAR_CLASS {
			self.write_bit(false);
		}
		self.write_reversed((distance - OFFSET_BIAS[class]) as u32, OFFSET_BITS[class]);

		let extra = length - min_copy_length(class);
		let mut run = 0u32;
		while extra >= (1 << (run + 1)) - 1 {
			run += 1;
		}
		self.write_ones(run as usize);
		self.write_bit(false);
		self.write_reversed((extra - ((1 << run) - 1)) as u32, run);
	}

	fn write_end_marker(&mut self) {
		self.write_bit(true);
		self.write_ones(FAR_CLASS);
		self.write_reversed(END_OF_STREAM, OFFSET_BITS[FAR_CLASS]);
	}

	/// Returns the compressed data, padding the last byte with zeros
	fn into_data(mut self) -> Vec<u8> {
		if self.bits_in_buffer > 0 {
			self.data.push(self.bit_buffer);
		}
		self.data
	}
}

/// Hash chain over 3-byte prefixes
struct MatchFinder<'a> {
	data: &'a [u8],
	head: Vec<usize>,
	prev: Vec<usize>,
}

impl<'a> MatchFinder<'a> {
	fn new(data: &'a [u8]) -> Self {
		Self {
			data,
			head: vec![NO_POSITION; 1 << HASH_BITS],
			prev: vec![NO_POSITION; data.len()],
		}
	}

	fn hash(&self, pos: usize) -> Option<usize> {
		let prefix = self.data.get(pos..pos + 3)?;
		let key = u32::from(prefix[0]) | (u32::from(prefix[1]) << 8) | (u32::from(prefix[2]) << 16);
		Some((key.wrapping_mul(0x9E37_79B1) >> (32 - HASH_BITS)) as usize)
	}

	fn insert(&mut self, pos: usize) {
		if let Some(hash) = self.hash(pos) {
			self.prev[pos] = self.head[hash];
			self.head[hash] = pos;
		}
	}

	/// Returns the nearest longest match as `(distance, length)`
	fn find(&self, pos: usize) -> Option<(usize, usize)> {
		let hash = self.hash(pos)?;
		let mut candidate = self.head[hash];
		let mut best: Option<(usize, usize)> = None;

		for _ in 0..MAX_CHAIN {
			if candidate == NO_POSITION {
				break;
			}

			let distance = pos - candidate;
			if distance > MAX_DISTANCE {
				break;
			}

			let min_length = if distance >= OFFSET_BIAS[FAR_CLASS] {
				min_copy_length(FAR_CLASS)
			} else {
				min_copy_length(0)
			};
			let limit = (min_length + MAX_EXTRA_LENGTH).min(self.data.len() - pos);

			let mut length = 0;
			while length < limit && self.data[pos + length] == self.data[candidate + length] {
				length += 1;
			}

			if length >= min_length && best.is_none_or(|(_, best_length)| length > best_length) {
				best = Some((distance, length));
				if length == limit {
					break;
				}
			}

			candidate = self.prev[candidate];
		}

		best
	}
}

/// Compresses `data` into an LZ payload that [`super::decompress`] restores exactly.
pub fn compress(data: &[u8]) -> Vec<u8> {
	let mut writer = BitWriter::new();
	let mut finder = MatchFinder::new(data);

	writer.write_reversed(0, HEADER_BITS as u32);

	let mut pos = 0;
	while pos < data.len() {
		let advance = match finder.find(pos) {
			Some((distance, length)) => {
				writer.write_copy(distance, length);
				length
			}
			None => {
				writer.write_literal(data[pos]);
				1
			}
		};

		for p in pos..pos + advance {
			finder.insert(p);
		}
		pos += advance;
	}

	writer.write_end_marker();
	writer.into_data()
}
