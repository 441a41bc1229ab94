//! Animation records: frames, their images and branches.
//!
//! ## Animation info
//!
//! | Field              | Type                     |
//! |--------------------|--------------------------|
//! | `name`             | string                   |
//! | `transition_type`  | u8                       |
//! | `return_animation` | string, empty for none   |
//! | `frames`           | u16-counted frame list   |
//!
//! ## Frame info
//!
//! | Field         | Type                               |
//! |---------------|------------------------------------|
//! | `images`      | u16-counted (u32, i16, i16) list   |
//! | `audio_index` | u16, `0xFFFF` for none             |
//! | `duration`    | u16, in centiseconds               |
//! | `exit_index`  | i16, negative for none             |
//! | `branches`    | u8-counted (u16, u16) list         |
//! | `overlays`    | u8 count, must be zero             |

use std::collections::BTreeSet;
use std::fmt::{self, Write as _};

use log::warn;

use crate::file::{AcsError, Buffer, CountWidth, UnsupportedFeature};

use super::constants::AUDIO_NONE;

/// How an animation hands over once its last frame is done
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionType {
	/// Continue with the animation named by `return_animation`
	UseReturnAnimation,
	/// Exit through the frames' exit indices
	UseExitBranches,
	/// Nothing follows
	NoTransition,
}

impl TransitionType {
	/// Converts a stored value, `None` for values outside of the known range.
	pub fn from_raw(value: u8) -> Option<Self> {
		match value {
			0 => Some(Self::UseReturnAnimation),
			1 => Some(Self::UseExitBranches),
			2 => Some(Self::NoTransition),
			_ => None,
		}
	}

	/// Returns the stored value.
	pub fn to_raw(self) -> u8 {
		match self {
			Self::UseReturnAnimation => 0,
			Self::UseExitBranches => 1,
			Self::NoTransition => 2,
		}
	}
}

impl fmt::Display for TransitionType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::UseReturnAnimation => write!(f, "Uses Return Animation"),
			Self::UseExitBranches => write!(f, "Uses Exit Branches"),
			Self::NoTransition => write!(f, "No Transition"),
		}
	}
}

/// An image drawn as part of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameImage {
	/// Index into the image list
	pub image_index: u32,
	/// Horizontal offset in pixels
	pub x: i16,
	/// Vertical offset in pixels
	pub y: i16,
}

impl FrameImage {
	/// Reads a frame image entry.
	pub fn read(buf: &mut Buffer) -> Result<Self, AcsError> {
		Ok(Self {
			image_index: buf.read_u32()?,
			x: buf.read_i16()?,
			y: buf.read_i16()?,
		})
	}
}

/// A probabilistic jump to another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BranchInfo {
	/// Frame index jumped to
	pub target: u16,
	/// Probability in percent
	pub probability: u16,
}

impl BranchInfo {
	/// Reads a branch entry.
	pub fn read(buf: &mut Buffer) -> Result<Self, AcsError> {
		Ok(Self {
			target: buf.read_u16()?,
			probability: buf.read_u16()?,
		})
	}
}

/// A single animation frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameInfo {
	/// Images composited into the frame, in drawing order
	pub images: Vec<FrameImage>,
	/// Index into the sound list, [`AUDIO_NONE`] for none
	pub audio_index: u16,
	/// Display time in centiseconds
	pub duration: u16,
	/// Frame to jump to when an exit is requested, negative for none
	pub exit_index: i16,
	/// Branches in evaluation order
	pub branches: Vec<BranchInfo>,
}

impl FrameInfo {
	/// Reads a frame.
	pub fn read(buf: &mut Buffer) -> Result<Self, AcsError> {
		let images = buf.read_list(CountWidth::Short, FrameImage::read)?;
		let audio_index = buf.read_u16()?;
		let duration = buf.read_u16()?;
		let exit_index = buf.read_i16()?;
		let branches = buf.read_list(CountWidth::Byte, BranchInfo::read)?;

		if buf.read_u8()? > 0 {
			return Err(AcsError::Unsupported(UnsupportedFeature::MouthOverlay));
		}

		Ok(Self {
			images,
			audio_index,
			duration,
			exit_index,
			branches,
		})
	}

	/// Returns the branch target selected by `draw`, a value in `0..100`.
	///
	/// Probabilities accumulate in order; the first branch whose running sum exceeds the
	/// draw wins. Branches past a sum of 100 are never reached.
	pub fn pick_branch(&self, draw: u32) -> Option<u16> {
		let mut sum = 0u32;
		for branch in &self.branches {
			sum += u32::from(branch.probability);
			if draw < sum {
				return Some(branch.target);
			}
		}
		None
	}

	/// Returns the exit override, if any.
	pub fn exit_target(&self) -> Option<usize> {
		usize::try_from(self.exit_index).ok()
	}

	/// Returns the index of the frame shown after this one.
	///
	/// With an exit requested and an exit index present, the exit index is used and no
	/// value is drawn. Otherwise `draw` is called once and fed to [`Self::pick_branch`],
	/// falling back to `current + 1`.
	pub fn next_index<F>(&self, current: usize, exit_requested: bool, draw: F) -> usize
	where
		F: FnOnce() -> u32,
	{
		if exit_requested && let Some(target) = self.exit_target() {
			return target;
		}

		match self.pick_branch(draw()) {
			Some(target) => usize::from(target),
			None => current + 1,
		}
	}

	/// Returns the sound list index to play, if this frame has a playable sound.
	pub fn audio_index(&self, sound_count: usize) -> Option<usize> {
		let index = usize::from(self.audio_index);
		(self.audio_index != AUDIO_NONE && index < sound_count).then_some(index)
	}

	/// Returns the sum of the branch probabilities.
	pub fn probability_sum(&self) -> u32 {
		self.branches.iter().map(|branch| u32::from(branch.probability)).sum()
	}
}

/// A named animation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimInfo {
	/// Animation name
	pub name: String,
	/// Hand-over behavior after the last frame
	pub transition: TransitionType,
	/// Animation played next for [`TransitionType::UseReturnAnimation`]
	pub return_animation: Option<String>,
	/// Frames in index order
	pub frames: Vec<FrameInfo>,
}

impl AnimInfo {
	/// Reads an animation record from its located region.
	pub fn read(buf: &mut Buffer) -> Result<Self, AcsError> {
		let name = buf.read_string()?;

		let raw_transition = buf.read_u8()?;
		let transition = TransitionType::from_raw(raw_transition).unwrap_or_else(|| {
			warn!("Unknown transition type {raw_transition} in {name}, treating it as none");
			TransitionType::NoTransition
		});

		let return_animation = Some(buf.read_string()?).filter(|name| !name.is_empty());
		let frames = buf.read_list(CountWidth::Short, FrameInfo::read)?;

		Ok(Self {
			name,
			transition,
			return_animation,
			frames,
		})
	}

	/// Reads an animation list entry: an outer name and a locator to the record.
	pub fn read_entry(buf: &mut Buffer) -> Result<Self, AcsError> {
		let outer_name = buf.read_string()?;
		let info = Self::read(&mut buf.locator()?)?;

		if !same_name(&outer_name, &info.name) {
			warn!("Animation list name {outer_name} differs from record name {}", info.name);
		}

		Ok(info)
	}

	/// Returns the number of frames.
	pub fn frame_count(&self) -> usize {
		self.frames.len()
	}

	/// Describes the frame ranges between branch junctions and their branches.
	pub fn frames_summary(&self) -> String {
		let mut junctions = BTreeSet::from([0, self.frames.len()]);
		for (index, frame) in self.frames.iter().enumerate() {
			if !frame.branches.is_empty() {
				junctions.insert(index + 1);
				junctions.extend(frame.branches.iter().map(|branch| usize::from(branch.target)));
			}
		}

		let junctions: Vec<usize> = junctions.into_iter().collect();
		let mut text = String::new();

		for pair in junctions.windows(2) {
			let (start, end) = (pair[0], pair[1] - 1);
			if start == end {
				let _ = write!(text, "Frame {start:>3}    : ");
			} else {
				let _ = write!(text, "Frame {start:>3}-{end:>3}: ");
			}

			if let Some(frame) = self.frames.get(end) {
				let branches: Vec<String> = frame
					.branches
					.iter()
					.map(|branch| format!("[->{} {}%]", branch.target, branch.probability))
					.collect();
				text.push_str(&branches.join(", "));

				if frame.probability_sum() >= 100 {
					text.push('\n');
				}
			}
			text.push('\n');
		}

		text
	}
}

/// Compares animation names the way the list and the records are matched, ignoring case
/// with full Unicode case mapping.
pub(super) fn same_name(a: &str, b: &str) -> bool {
	a == b || a.to_uppercase() == b.to_uppercase()
}
