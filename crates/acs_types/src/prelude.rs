//! Prelude module for `acs_types`.
//!
//! This module provides a convenient way to import commonly used types, traits, and constants.
//!
//! # Examples
//!
//! ```no_run
//! use acs_types::prelude::*;
//!
//! # fn main() -> Result<(), AcsError> {
//! let acs = AcsFile::open("KAIRU.ACS")?;
//! let images: Vec<IndexedImage> = acs.decode_images(None, |_, _| {})?;
//! # Ok(())
//! # }
//! ```

// File module types
#[doc(inline)]
pub use crate::file::{
	// Container types
	AcsError,
	AcsFile,
	AcsFileBuilder,
	AnimInfo,
	BranchInfo,
	CharacterInfo,
	FrameImage,
	FrameInfo,
	Guid,
	LocalizedInfo,
	TransitionType,

	// Image types
	Color,
	IndexedImage,
	Palette,

	// Cache types
	AtlasMetadata,
	ImageCache,

	// Sound types
	SoundClip,
	SoundTable,
};

// Re-export the file module for advanced usage
#[doc(inline)]
pub use crate::file;
