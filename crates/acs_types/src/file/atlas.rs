//! Sprite atlas of decoded images and its on-disk cache.
//!
//! Images are placed in a grid of [`ATLAS_COLUMNS`] cells per row, each cell as large as
//! the largest image. The sheet is saved as an RGBA PNG next to a JSON sidecar:
//!
//! ```json
//! {"max_size": [w, h], "subimages": [[x, y, w, h], ...]}
//! ```

use std::path::{Path, PathBuf};

use log::{error, info};
use serde::{Deserialize, Serialize};

use super::{AcsError, IndexedImage, Palette};

/// Number of cells per atlas row
pub const ATLAS_COLUMNS: usize = 16;

/// File name of the sprite sheet inside a cache directory
pub const SHEET_FILE_NAME: &str = "sprites.png";

/// File name of the sidecar metadata inside a cache directory
pub const METADATA_FILE_NAME: &str = "sprites.png.json";

/// Sprite box as `[x, y, width, height]`
pub type SubimageBox = [u32; 4];

/// Atlas sidecar metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtlasMetadata {
	/// Cell size, the largest image width and height
	pub max_size: [u32; 2],
	/// One box per source image, in image list order
	pub subimages: Vec<SubimageBox>,
}

/// A sprite sheet with its layout
#[derive(Debug, Clone)]
pub struct Atlas {
	/// RGBA sheet
	pub sheet: image::RgbaImage,
	/// Layout of the sheet
	pub metadata: AtlasMetadata,
}

impl Atlas {
	/// Lays out `images` and renders them through `palette`.
	///
	/// Unused space is filled with the palette's transparent color.
	pub fn build(images: &[IndexedImage], palette: &Palette) -> Self {
		let max_width = images.iter().map(|image| u32::from(image.width())).max().unwrap_or(0);
		let max_height = images.iter().map(|image| u32::from(image.height())).max().unwrap_or(0);

		let rows = images.len().div_ceil(ATLAS_COLUMNS) as u32;
		// Zero-sized PNGs cannot be encoded
		let sheet_width = (ATLAS_COLUMNS as u32 * max_width).max(1);
		let sheet_height = (rows * max_height).max(1);

		let background = palette.get(palette.transparency_index()).unwrap_or_default().to_array();
		let mut sheet = image::RgbaImage::from_pixel(sheet_width, sheet_height, image::Rgba(background));

		let mut subimages = Vec::with_capacity(images.len());
		for (index, image) in images.iter().enumerate() {
			let x = (index % ATLAS_COLUMNS) as u32 * max_width;
			let y = (index / ATLAS_COLUMNS) as u32 * max_height;

			image::imageops::replace(&mut sheet, &image.to_rgba(palette), i64::from(x), i64::from(y));
			subimages.push([x, y, u32::from(image.width()), u32::from(image.height())]);
		}

		Self {
			sheet,
			metadata: AtlasMetadata {
				max_size: [max_width, max_height],
				subimages,
			},
		}
	}

	/// Saves the sheet and its sidecar into `dir`.
	pub fn save<P: AsRef<Path>>(&self, dir: P) -> Result<(), AcsError> {
		let dir = dir.as_ref();
		std::fs::create_dir_all(dir)?;

		self.sheet.save_with_format(dir.join(SHEET_FILE_NAME), image::ImageFormat::Png)?;
		let json = serde_json::to_vec(&self.metadata)?;
		std::fs::write(dir.join(METADATA_FILE_NAME), json)?;

		info!("Saved sprite cache to {}", dir.display());
		Ok(())
	}
}

/// On-disk sprite cache of one character
#[derive(Debug, Clone)]
pub struct ImageCache {
	dir: PathBuf,
}

impl ImageCache {
	/// Creates a cache rooted at `dir`. Nothing is touched until it is used.
	pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
		Self {
			dir: dir.into(),
		}
	}

	/// Returns the cache directory.
	pub fn dir(&self) -> &Path {
		&self.dir
	}

	/// Returns the sprite sheet path.
	pub fn sheet_path(&self) -> PathBuf {
		self.dir.join(SHEET_FILE_NAME)
	}

	/// Returns the sidecar path.
	pub fn metadata_path(&self) -> PathBuf {
		self.dir.join(METADATA_FILE_NAME)
	}

	/// Loads the sidecar, failing when the sheet or the sidecar is missing or unreadable.
	pub fn load(&self) -> Result<AtlasMetadata, AcsError> {
		let sheet = self.sheet_path();
		if !sheet.is_file() {
			return Err(AcsError::InvalidCache(format!("{} is missing", sheet.display())));
		}

		let json = std::fs::read(self.metadata_path())?;
		Ok(serde_json::from_slice(&json)?)
	}

	/// Loads the cache, rebuilding it once from `decode` if it is missing or corrupt.
	///
	/// `decode` is only called when a rebuild is needed. An error from `decode` (such as
	/// an interrupted decompression) is returned unchanged, as is a failure to load the
	/// freshly written cache.
	pub fn ensure<F>(&self, palette: &Palette, decode: F) -> Result<AtlasMetadata, AcsError>
	where
		F: FnOnce() -> Result<Vec<IndexedImage>, AcsError>,
	{
		match self.load() {
			Ok(metadata) => return Ok(metadata),
			Err(err) => error!("Sprite cache is missing or corrupt, rebuilding it: {err}"),
		}

		let images = decode()?;
		Atlas::build(&images, palette).save(&self.dir)?;
		self.load()
	}
}
