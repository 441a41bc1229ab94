//! Awaitable results of animation and dialogue requests.

use std::future::{Future, IntoFuture};
use std::pin::Pin;

use tokio::task::JoinHandle;

use crate::{Choice, PlaybackError};

enum Pending<T> {
	Ready(T),
	Task(JoinHandle<T>),
}

impl<T> std::fmt::Debug for Pending<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Ready(_) => f.write_str("Ready"),
			Self::Task(_) => f.write_str("Task"),
		}
	}
}

/// Outcome of a [`play_animation`](crate::AnimController::play_animation) request.
///
/// Resolves to `Ok(true)` when the animation played to the end and `Ok(false)` when it
/// was replaced, interrupted, not found, or started as not awaitable.
#[derive(Debug)]
pub struct AnimationHandle {
	name: Option<String>,
	pending: Pending<Result<bool, PlaybackError>>,
}

impl AnimationHandle {
	pub(crate) fn ready(name: Option<String>, played: bool) -> Self {
		Self {
			name,
			pending: Pending::Ready(Ok(played)),
		}
	}

	pub(crate) fn task(name: Option<String>, task: JoinHandle<Result<bool, PlaybackError>>) -> Self {
		Self {
			name,
			pending: Pending::Task(task),
		}
	}

	/// Returns the name of the resolved animation, `None` if nothing is played.
	pub fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	/// Returns `true` once the result is available.
	pub fn is_finished(&self) -> bool {
		match &self.pending {
			Pending::Ready(_) => true,
			Pending::Task(task) => task.is_finished(),
		}
	}

	/// Waits for the animation to end.
	pub async fn wait(self) -> Result<bool, PlaybackError> {
		match self.pending {
			Pending::Ready(result) => result,
			Pending::Task(task) => task.await?,
		}
	}
}

impl IntoFuture for AnimationHandle {
	type Output = Result<bool, PlaybackError>;
	type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

	fn into_future(self) -> Self::IntoFuture {
		Box::pin(self.wait())
	}
}

/// Outcome of a [`say`](crate::AnimController::say) request.
///
/// Resolves to the pressed choice, or `None` for a message without choices or a
/// dialogue that was replaced or interrupted.
#[derive(Debug)]
pub struct SayHandle {
	pending: Pending<Option<Choice>>,
}

impl SayHandle {
	pub(crate) fn ready() -> Self {
		Self {
			pending: Pending::Ready(None),
		}
	}

	pub(crate) fn task(task: JoinHandle<Option<Choice>>) -> Self {
		Self {
			pending: Pending::Task(task),
		}
	}

	/// Returns `true` once the result is available.
	pub fn is_finished(&self) -> bool {
		match &self.pending {
			Pending::Ready(_) => true,
			Pending::Task(task) => task.is_finished(),
		}
	}

	/// Waits for a choice.
	pub async fn wait(self) -> Result<Option<Choice>, PlaybackError> {
		match self.pending {
			Pending::Ready(choice) => Ok(choice),
			Pending::Task(task) => Ok(task.await?),
		}
	}
}

impl IntoFuture for SayHandle {
	type Output = Result<Option<Choice>, PlaybackError>;
	type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

	fn into_future(self) -> Self::IntoFuture {
		Box::pin(self.wait())
	}
}
