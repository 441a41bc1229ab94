//! File type support for `acs-rs` project.

mod error;

pub mod acs;
pub mod atlas;
pub mod buffer;
pub mod image;
pub mod lz;
pub mod palette;
pub mod sound;

// Re-export unified error types
pub use error::{AcsError, DecompressError, UnsupportedFeature};

// Re-export main file types
pub use acs::{
	AcsFile, AnimInfo, BranchInfo, CharacterInfo, FileBuilder as AcsFileBuilder, FrameImage,
	FrameInfo, Guid, LocalizedInfo, TransitionType,
};
pub use atlas::{Atlas, AtlasMetadata, ImageCache, SubimageBox};
pub use buffer::{Buffer, CountWidth, LIST_COUNT_LIMIT};
pub use self::image::{ImageRecord, IndexedImage, read_image_records, read_images, row_stride};
pub use palette::{Color, Palette};
pub use sound::{SoundClip, SoundTable};
