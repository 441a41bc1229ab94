//! Bit-reversed LZ codec used by ACS image payloads.
//!
//! ## Bitstream
//!
//! Every byte of the payload is bit-reversed and the result is consumed as an
//! MSB-first bitstream. Equivalently, each original byte is consumed starting from
//! its least significant bit, which is how the reader here walks it. The first 8 bits
//! are a header and carry no data.
//!
//! Multi-bit fields are "reversed reads": the first bit read is bit 0 of the value,
//! the next one bit 1, and so on.
//!
//! ## Tokens
//!
//! | Prefix      | Meaning                                                       |
//! |-------------|---------------------------------------------------------------|
//! | `0`         | Literal, followed by an 8-bit byte                            |
//! | `1` + `k`×1 | Back-reference of class `k` (0..=3), see the table below      |
//!
//! | Class | Terminated by | Offset bits | Offset bias | Min length |
//! |-------|---------------|-------------|-------------|------------|
//! | 0     | `0`           | 6           | 1           | 2          |
//! | 1     | `10`          | 9           | 65          | 2          |
//! | 2     | `110`         | 12          | 577         | 2          |
//! | 3     | `111`         | 20          | 4673        | 3          |
//!
//! A class 3 offset field of `0xFFFFF` ends the stream. Otherwise the offset field is
//! followed by a length prefix: `m` one-bits (at most 11) terminated by a zero, then
//! `m` more bits. The copy length is `min + (2^m - 1) + bits`.
//!
//! The decode loop stops when fewer than 9 bits remain; those bits are padding.

mod decode;
mod encode;

pub use decode::decompress;
pub use encode::compress;

/// Number of leading header bits discarded by the decoder
pub const HEADER_BITS: usize = 8;

/// Size of the smallest token (a literal)
pub const MIN_TOKEN_BITS: usize = 9;

/// Offset field widths, indexed by back-reference class
pub const OFFSET_BITS: [u32; 4] = [6, 9, 12, 20];

/// Offset biases, indexed by back-reference class
pub const OFFSET_BIAS: [usize; 4] = [1, 65, 577, 4673];

/// Class 3 offset field value marking the end of the stream
pub const END_OF_STREAM: u32 = 0xFFFFF;

/// Length prefix run that marks a corrupted stream
pub const MAX_LENGTH_RUN: u32 = 12;

/// Largest back-reference class
const FAR_CLASS: usize = 3;

/// Returns the minimum copy length of a back-reference class.
const fn min_copy_length(class: usize) -> usize {
	if class == FAR_CLASS {
		3
	} else {
		2
	}
}
