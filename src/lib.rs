#![allow(clippy::single_component_path_imports)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `acs-rs` reads legacy ACS desktop-assistant characters and plays their animations.
//!
//! - [`acs_types`] parses the container, decodes its LZ-packed images, and caches sprite
//!   sheets and sounds on disk.
//! - [`acs_anim`] schedules animations and speech balloons on a dedicated thread.
//!
pub use acs_internal::*;

#[cfg(all(feature = "dynamic_linking", not(target_family = "wasm")))]
#[allow(unused_imports)]
use acs_dylib;
