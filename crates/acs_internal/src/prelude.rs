//! Prelude module for `acs_internal`.
//!
//! This module provides a convenient way to import commonly used types and traits.
//!
//! # Examples
//!
//! ```rust
//! use acs_internal::prelude::*;
//!
//! // Build a character in memory and parse it back
//! let data = AcsFileBuilder::new().size(64, 64).build();
//! let acs = AcsFile::from_bytes("EMPTY", data).unwrap();
//! let graph = AnimationGraph::from_acs(&acs);
//! assert!(graph.animations().is_empty());
//! ```

// Re-export everything from the member preludes
#[doc(inline)]
pub use acs_anim::prelude::*;
#[doc(inline)]
pub use acs_types::prelude::*;

// Re-export the member crates for advanced usage
#[doc(inline)]
pub use acs_anim;
#[doc(inline)]
pub use acs_types;
