//! This crate provides the data types and file format support for the `acs-rs` project.
//!
//! # File Formats
//!
//! - **ACS**: Character containers holding metadata, a palette, animations, images and sounds
//! - **LZ**: The bit-reversed LZ variant used for image payloads, with a matching compressor
//!
//! # Examples
//!
//! Using the prelude (recommended):
//!
//! ```no_run
//! use acs_types::prelude::*;
//!
//! # fn main() -> Result<(), AcsError> {
//! let acs = AcsFile::open("KAIRU.ACS")?;
//! let idle = acs.animation("IDLE1_1");
//! # Ok(())
//! # }
//! ```
//!
//! Or use explicit paths:
//!
//! ```
//! use acs_types::file::lz;
//!
//! let packed = lz::compress(b"ABABABABAB");
//! assert_eq!(lz::decompress(&packed, 10).unwrap(), b"ABABABABAB");
//! ```

pub mod file;

/// `use acs_types::prelude::*;` to import commonly used items.
pub mod prelude;
