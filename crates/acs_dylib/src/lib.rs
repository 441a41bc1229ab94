//! Forces dynamic linking of `acs-rs` when the `dynamic_linking` feature is enabled.

#[allow(unused_imports)]
#[allow(clippy::single_component_path_imports)]
use acs_internal;
