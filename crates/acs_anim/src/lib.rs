//! Animation playback for ACS characters.
//!
//! This crate schedules the animations of a parsed character: it walks each
//! animation's frames with their branches and exit branches, chains return animations,
//! keeps the character busy with idle animations, and shows speech balloon messages.
//! Drawing is left to a [`Backend`].
//!
//! # Examples
//!
//! ```no_run
//! use acs_anim::prelude::*;
//! use acs_types::file::AcsFile;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let acs = AcsFile::open("KAIRU.ACS")?;
//! let worker = Worker::new()?;
//! let timeline = Timeline::new();
//! let controller = AnimController::new(
//! 	timeline.clone(),
//! 	AnimationGraph::from_acs(&acs),
//! 	PlayerConfig::load("player.toml")?,
//! 	worker.spawner(),
//! );
//!
//! let finished = controller.play_animation("#GREETING", PlayOptions::default()).await?;
//! let choice = controller.say(Some(Message::new("Hello!").with_choice(Choice::key("Hi", "hi")))).await?;
//! # Ok(())
//! # }
//! ```

mod backend;
mod config;
mod controller;
mod dialogue;
mod error;
mod graph;
mod handle;
mod stop;
mod worker;

/// `use acs_anim::prelude::*;` to import commonly used items.
pub mod prelude;

pub use self::backend::{Backend, Timeline, TimelineEvent};
pub use self::config::{ENV_PREFIX, PlayerConfig};
pub use self::controller::{AnimController, DELAY_STEP, IDLE_DELAY_SECS, PlayOptions, REAPPEAR_DELAY};
pub use self::dialogue::{Choice, ChoiceAction, ChoiceResponder, Message};
pub use self::error::PlaybackError;
pub use self::graph::{AnimRef, AnimationGraph, HIDING_ANIMATIONS, SHOWING_STATE};
pub use self::handle::{AnimationHandle, SayHandle};
pub use self::stop::{CancelToken, StopReason};
pub use self::worker::{Spawner, Worker};
