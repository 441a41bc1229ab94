//! Prelude module for `acs_anim`.

#[doc(inline)]
pub use crate::{
	AnimController, AnimRef, AnimationGraph, AnimationHandle, Backend, Choice, ChoiceAction,
	Message, PlayOptions, PlaybackError, PlayerConfig, SayHandle, Spawner, StopReason, Timeline,
	Worker,
};
