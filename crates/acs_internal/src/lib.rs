//! This module is separated into its own crate to enable simple dynamic linking for `acs-rs`, and should not be used directly.

/// `use acs_rs::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export the member crates for convenience
pub use acs_anim;
pub use acs_types;

// Re-export commonly used types at crate root
pub use acs_anim::{AnimController, AnimationGraph, PlayOptions, PlaybackError, PlayerConfig, Worker};
pub use acs_types::file::{AcsError, AcsFile, AnimInfo, FrameInfo, IndexedImage};
