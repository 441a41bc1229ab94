//! Player configuration.
//!
//! Settings are read from an optional TOML file and overridden by `ACS_PLAYER_*`
//! environment variables:
//!
//! ```toml
//! speed = 1.0
//! no_idle = false
//! idle_all_anims = false
//! do_not_skip_zero_duration_frames = false
//! seed = 42
//! ```

use std::path::Path;

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::PlaybackError;

/// Prefix of the environment variables read by [`PlayerConfig::load`]
pub const ENV_PREFIX: &str = "ACS_PLAYER";

/// Settings of an [`AnimController`](crate::AnimController).
///
/// # Examples
///
/// ```
/// use acs_anim::PlayerConfig;
///
/// let config = PlayerConfig::default();
/// assert_eq!(config.speed, 1.0);
///
/// // Every frame drawn, nothing waited for
/// let config = PlayerConfig::export();
/// assert_eq!(config.speed, 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
	/// Multiplier applied to every frame duration; `0` plays without waiting
	pub speed: f64,
	/// Do not schedule an idle animation after one finishes
	pub no_idle: bool,
	/// Pick idle animations among all animations rather than the `idle*` ones
	pub idle_all_anims: bool,
	/// Draw frames whose scaled duration is zero
	pub do_not_skip_zero_duration_frames: bool,
	/// Seed of the controller's random generator, from OS entropy when unset
	pub seed: Option<u64>,
}

impl Default for PlayerConfig {
	fn default() -> Self {
		Self {
			speed: 1.0,
			no_idle: false,
			idle_all_anims: false,
			do_not_skip_zero_duration_frames: false,
			seed: None,
		}
	}
}

impl PlayerConfig {
	/// Settings for rendering every frame as fast as possible, such as when exporting.
	pub fn export() -> Self {
		Self {
			speed: 0.0,
			no_idle: true,
			do_not_skip_zero_duration_frames: true,
			..Self::default()
		}
	}

	/// Loads the settings from `path`, if it exists, layered with the environment.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PlaybackError> {
		let path = path.as_ref().to_string_lossy();
		let config = Config::builder()
			.add_source(File::new(&path, FileFormat::Toml).required(false))
			.add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
			.build()?;
		Ok(config.try_deserialize()?)
	}
}

#[cfg(test)]
mod tests {
	use tempfile::{TempDir, tempdir};

	use super::*;

	fn settings_file(contents: &str) -> (TempDir, std::path::PathBuf) {
		let dir = tempdir().unwrap();
		let path = dir.path().join("player.toml");
		std::fs::write(&path, contents).unwrap();
		(dir, path)
	}

	#[test]
	fn test_missing_file_uses_defaults() {
		let dir = tempdir().unwrap();
		let config = PlayerConfig::load(dir.path().join("missing.toml")).unwrap();
		assert_eq!(config.no_idle, PlayerConfig::default().no_idle);
		assert_eq!(config.seed, None);
	}

	#[test]
	fn test_load_partial_file() {
		let (_dir, path) = settings_file("speed = 0.5\nidle_all_anims = true\nseed = 7\n");
		let config = PlayerConfig::load(&path).unwrap();

		assert_eq!(config.speed, 0.5);
		assert!(config.idle_all_anims);
		assert_eq!(config.seed, Some(7));
		assert!(!config.do_not_skip_zero_duration_frames);
	}

	#[test]
	fn test_invalid_file_is_an_error() {
		let (_dir, path) = settings_file("speed = \"fast\"\n");
		let result = PlayerConfig::load(&path);

		assert!(matches!(result, Err(PlaybackError::Config(_))));
	}
}
