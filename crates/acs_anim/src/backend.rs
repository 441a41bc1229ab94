//! Rendering side of the player.

use std::sync::{Arc, Mutex, PoisonError};

use acs_types::file::{AnimInfo, FrameInfo};
use log::{info, warn};

use crate::{ChoiceResponder, Message};

/// Draws frames and speech balloons for an [`AnimController`](crate::AnimController).
///
/// Both methods are called from the animation thread and must not block.
pub trait Backend: Send + Sync + 'static {
	/// Shows frame `index` of `animation` and starts its sound.
	fn play_frame(&self, animation: &AnimInfo, frame: &FrameInfo, index: usize);

	/// Shows `message`, reporting the pressed button through `responder`.
	///
	/// Dropping the responder leaves the dialogue without an answer.
	fn say(&self, message: &Message, responder: ChoiceResponder) {
		let _ = responder;
		warn!("Speech balloons are not supported by this backend: {}", message.text);
	}
}

/// Something a [`Timeline`] saw
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimelineEvent {
	/// A frame was drawn
	Frame {
		/// Animation name
		animation: String,
		/// Frame index
		index: usize,
	},
	/// A message was shown
	Say {
		/// Message text
		text: String,
		/// Button labels
		choices: Vec<String>,
	},
}

#[derive(Debug, Default)]
struct TimelineState {
	events: Vec<TimelineEvent>,
	responder: Option<ChoiceResponder>,
}

/// Backend that logs and records everything it is asked to show
#[derive(Debug, Clone, Default)]
pub struct Timeline {
	state: Arc<Mutex<TimelineState>>,
}

impl Timeline {
	/// Creates an empty timeline.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns a copy of the recorded events.
	pub fn events(&self) -> Vec<TimelineEvent> {
		self.lock().events.clone()
	}

	/// Returns the recorded frames as `(animation, index)` pairs.
	pub fn frames(&self) -> Vec<(String, usize)> {
		self.lock()
			.events
			.iter()
			.filter_map(|event| match event {
				TimelineEvent::Frame {
					animation,
					index,
				} => Some((animation.clone(), *index)),
				TimelineEvent::Say {
					..
				} => None,
			})
			.collect()
	}

	/// Forgets the recorded events.
	pub fn clear(&self) {
		self.lock().events.clear();
	}

	/// Presses button `index` of the last message shown.
	pub fn respond(&self, index: usize) -> bool {
		self.lock().responder.take().is_some_and(|responder| responder.choose(index))
	}

	fn lock(&self) -> std::sync::MutexGuard<'_, TimelineState> {
		self.state.lock().unwrap_or_else(PoisonError::into_inner)
	}
}

impl Backend for Timeline {
	fn play_frame(&self, animation: &AnimInfo, frame: &FrameInfo, index: usize) {
		info!("{} frame {index} ({} cs)", animation.name, frame.duration);
		self.lock().events.push(TimelineEvent::Frame {
			animation: animation.name.clone(),
			index,
		});
	}

	fn say(&self, message: &Message, responder: ChoiceResponder) {
		info!("Say: {}", message.text);
		let mut state = self.lock();
		state.events.push(TimelineEvent::Say {
			text: message.text.clone(),
			choices: message.choices.iter().map(|choice| choice.label.clone()).collect(),
		});
		state.responder = Some(responder);
	}
}
