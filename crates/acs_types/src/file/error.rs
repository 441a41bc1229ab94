//! Error types for ACS container parsing and image decompression.

use thiserror::Error;

/// Unsupported optional sections of the ACS format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnsupportedFeature {
	/// Character info declares a tray icon
	TrayIcon,
	/// A frame declares mouth overlays
	MouthOverlay,
}

impl std::fmt::Display for UnsupportedFeature {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::TrayIcon => write!(f, "tray icon"),
			Self::MouthOverlay => write!(f, "mouth overlay"),
		}
	}
}

/// Errors raised by the bit-level decompressor
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecompressError {
	/// The bitstream ended in the middle of a token
	#[error("Compressed stream ended mid-token at bit {bit_position}")]
	UnexpectedEnd {
		/// Bit position at which the read was attempted
		bit_position: usize,
	},

	/// The length prefix reached its forbidden maximal run of ones
	#[error("Corrupted length prefix at bit {bit_position}: run of {run} ones")]
	LengthRunTooLong {
		/// Bit position just after the run
		bit_position: usize,
		/// Length of the run
		run: u32,
	},

	/// A back-reference points before the start of the output
	#[error("Back-reference distance {distance} exceeds decoded length {decoded}")]
	InvalidBackReference {
		/// Distance requested by the token
		distance: usize,
		/// Bytes decoded so far
		decoded: usize,
	},

	/// Decoding would produce more bytes than the declared maximum
	#[error("Decompressed data exceeds the declared size of {limit} bytes (needed {needed})")]
	OutputOverflow {
		/// Declared maximum size
		limit: usize,
		/// Size the stream tried to reach
		needed: usize,
	},
}

/// Errors that can occur when parsing or building ACS files
#[derive(Debug, Error)]
pub enum AcsError {
	/// Invalid magic number
	#[error("Invalid magic number: expected {expected:02X?}, got {actual:02X?}")]
	InvalidMagic {
		/// Expected magic bytes
		expected: [u8; 4],
		/// Actual magic bytes
		actual: [u8; 4],
	},

	/// A read ran past the end of the current view
	#[error(
		"Insufficient data at absolute offset {offset:#X}: expected {expected} bytes, got {actual} bytes"
	)]
	InsufficientData {
		/// Absolute offset of the attempted read
		offset: usize,
		/// Number of bytes requested
		expected: usize,
		/// Number of bytes available
		actual: usize,
	},

	/// A locator points outside of the backing array
	#[error("Locator ({offset:#X}, {size:#X}) exceeds the data length {data_len:#X}")]
	LocatorOutOfBounds {
		/// Absolute offset stored in the locator
		offset: u32,
		/// Size stored in the locator
		size: u32,
		/// Length of the backing array
		data_len: usize,
	},

	/// A list count exceeds the sanity ceiling
	#[error("List count {count} exceeds the limit of {limit}")]
	ListTooLong {
		/// Count read from the file
		count: u32,
		/// Maximum accepted count (exclusive)
		limit: u32,
	},

	/// File uses a section this decoder does not support
	#[error("Unsupported feature: {0}")]
	Unsupported(UnsupportedFeature),

	/// The transparency index does not address a palette entry
	#[error("Transparency index {index} is out of range for a palette of {palette_len} colors")]
	InvalidTransparencyIndex {
		/// Transparency index
		index: u8,
		/// Number of palette entries
		palette_len: usize,
	},

	/// Pixel data is too short for the declared image size
	#[error("Image data too short for {width}x{height}: expected {expected} bytes, got {actual} bytes")]
	ImageDataTooShort {
		/// Image width
		width: u16,
		/// Image height
		height: u16,
		/// Minimum number of bytes
		expected: usize,
		/// Number of bytes available
		actual: usize,
	},

	/// Compressed image data is corrupted
	#[error("Decompression failed for image {index}: {source}")]
	Decompression {
		/// Index of the image in the image list
		index: usize,
		/// Underlying codec error
		#[source]
		source: DecompressError,
	},

	/// Image decoding was cancelled by the caller
	#[error("Image decompression interrupted after {completed} of {total} images")]
	DecompressionInterrupted {
		/// Images decoded before the interruption
		completed: usize,
		/// Total number of images in the list
		total: usize,
	},

	/// Image cache metadata does not match the decoded images
	#[error("Image cache is inconsistent: {0}")]
	InvalidCache(String),

	/// IO error
	#[error(transparent)]
	Io(#[from] std::io::Error),

	/// Metadata serialization error
	#[error(transparent)]
	Json(#[from] serde_json::Error),

	/// Image encoding error
	#[error(transparent)]
	Image(#[from] image::ImageError),
}

impl AcsError {
	/// Creates an `InsufficientData` error
	pub fn insufficient_data(offset: usize, expected: usize, actual: usize) -> Self {
		Self::InsufficientData {
			offset,
			expected,
			actual,
		}
	}

	/// Returns `true` when the error was caused by a caller-requested interruption
	pub fn is_interruption(&self) -> bool {
		matches!(self, Self::DecompressionInterrupted { .. })
	}
}
