//! Speech balloon messages and their choices.

use std::fmt;
use std::sync::Arc;

use acs_types::file::Color;
use tokio::sync::oneshot;

/// What activating a choice does
#[derive(Clone)]
pub enum ChoiceAction {
	/// Hands the key back to whoever awaits the dialogue
	Key(String),
	/// Runs a callback on the animation thread
	Callback(Arc<dyn Fn() + Send + Sync>),
}

impl fmt::Debug for ChoiceAction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Key(key) => f.debug_tuple("Key").field(key).finish(),
			Self::Callback(_) => f.write_str("Callback(..)"),
		}
	}
}

/// A button shown under a message
#[derive(Debug, Clone)]
pub struct Choice {
	/// Button text
	pub label: String,
	/// Result of pressing the button
	pub action: ChoiceAction,
}

impl Choice {
	/// Creates a choice that resolves to `key`.
	pub fn key(label: impl Into<String>, key: impl Into<String>) -> Self {
		Self {
			label: label.into(),
			action: ChoiceAction::Key(key.into()),
		}
	}

	/// Creates a choice that runs `callback`.
	pub fn callback<F>(label: impl Into<String>, callback: F) -> Self
	where
		F: Fn() + Send + Sync + 'static,
	{
		Self {
			label: label.into(),
			action: ChoiceAction::Callback(Arc::new(callback)),
		}
	}

	/// Returns the key of a [`ChoiceAction::Key`] choice.
	pub fn key_str(&self) -> Option<&str> {
		match &self.action {
			ChoiceAction::Key(key) => Some(key),
			ChoiceAction::Callback(_) => None,
		}
	}
}

/// Text shown in the speech balloon
#[derive(Debug, Clone, Default)]
pub struct Message {
	/// Message text
	pub text: String,
	/// Text color, the backend's default when unset
	pub color: Option<Color>,
	/// Buttons offered with the message
	pub choices: Vec<Choice>,
	/// Balloon width in pixels, `0` for the backend's default
	pub width: u32,
}

impl Message {
	/// Creates a plain message.
	pub fn new(text: impl Into<String>) -> Self {
		Self {
			text: text.into(),
			..Self::default()
		}
	}

	/// Sets the text color.
	pub fn with_color(mut self, color: Color) -> Self {
		self.color = Some(color);
		self
	}

	/// Adds a button.
	pub fn with_choice(mut self, choice: Choice) -> Self {
		self.choices.push(choice);
		self
	}
}

impl From<&str> for Message {
	fn from(text: &str) -> Self {
		Self::new(text)
	}
}

impl From<String> for Message {
	fn from(text: String) -> Self {
		Self::new(text)
	}
}

/// Reports which button of a message was pressed
#[derive(Debug)]
pub struct ChoiceResponder {
	tx: oneshot::Sender<usize>,
	count: usize,
}

impl ChoiceResponder {
	pub(crate) fn new(count: usize) -> (Self, oneshot::Receiver<usize>) {
		let (tx, rx) = oneshot::channel();
		(
			Self {
				tx,
				count,
			},
			rx,
		)
	}

	/// Returns the number of choices that can be picked.
	pub fn len(&self) -> usize {
		self.count
	}

	/// Returns `true` when the message has no choices.
	pub fn is_empty(&self) -> bool {
		self.count == 0
	}

	/// Picks the choice at `index`.
	///
	/// Returns `false` if the index is out of range or the dialogue is gone.
	pub fn choose(self, index: usize) -> bool {
		index < self.count && self.tx.send(index).is_ok()
	}
}
