//! Cancellation of animation and dialogue tasks.
//!
//! A [`CancelToken`] carries the [`StopReason`] of its task over a `watch` channel. The
//! first reason sent wins; later requests are ignored.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;

/// Why a task was asked to stop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
	/// A newer animation or dialogue took over
	Replaced,
	/// The controller was interrupted
	Interrupted,
	/// Any other reason, reported as an error by the stopped task
	Custom(String),
}

impl StopReason {
	/// Returns `true` for reasons that end a task without an error.
	pub fn is_clean(&self) -> bool {
		matches!(self, Self::Replaced | Self::Interrupted)
	}
}

impl fmt::Display for StopReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Replaced => write!(f, "replaced"),
			Self::Interrupted => write!(f, "interrupted"),
			Self::Custom(reason) => write!(f, "{reason}"),
		}
	}
}

/// Cancellation signal of a single task
#[derive(Debug, Clone)]
pub struct CancelToken {
	tx: Arc<watch::Sender<Option<StopReason>>>,
}

impl Default for CancelToken {
	fn default() -> Self {
		Self::new()
	}
}

impl CancelToken {
	/// Creates a token that has not been cancelled.
	pub fn new() -> Self {
		let (tx, _) = watch::channel(None);
		Self {
			tx: Arc::new(tx),
		}
	}

	/// Requests cancellation. Returns `false` if a reason was already sent.
	pub fn cancel(&self, reason: StopReason) -> bool {
		self.tx.send_if_modified(|current| {
			if current.is_some() {
				return false;
			}
			*current = Some(reason);
			true
		})
	}

	/// Returns the reason sent, if any.
	pub fn reason(&self) -> Option<StopReason> {
		self.tx.borrow().clone()
	}

	/// Returns `true` once a reason was sent.
	pub fn is_cancelled(&self) -> bool {
		self.tx.borrow().is_some()
	}

	/// Returns `true` if both tokens signal the same task.
	pub(crate) fn same_task(&self, other: &CancelToken) -> bool {
		Arc::ptr_eq(&self.tx, &other.tx)
	}

	/// Completes with the stop reason once the token is cancelled.
	pub async fn cancelled(&self) -> StopReason {
		let mut rx = self.tx.subscribe();
		let reason = rx.wait_for(Option::is_some).await.ok().and_then(|reason| (*reason).clone());
		match reason {
			Some(reason) => reason,
			// The sender lives in `self`, so the channel cannot close while waiting
			None => std::future::pending().await,
		}
	}
}

/// Handle on the current animation or dialogue task
#[derive(Debug, Clone)]
pub(crate) struct TaskSlot {
	pub(crate) cancel: CancelToken,
	finished: watch::Receiver<bool>,
}

impl TaskSlot {
	/// A slot with nothing running
	pub(crate) fn idle() -> Self {
		let (_, finished) = watch::channel(true);
		Self {
			cancel: CancelToken::new(),
			finished,
		}
	}

	/// A slot for a new task and the guard the task holds while it runs
	pub(crate) fn start(exit_flag: Option<Arc<AtomicBool>>) -> (Self, TaskGuard) {
		let (tx, finished) = watch::channel(false);
		let slot = Self {
			cancel: CancelToken::new(),
			finished,
		};
		let guard = TaskGuard {
			finished: tx,
			exit_flag,
		};
		(slot, guard)
	}

	pub(crate) fn is_finished(&self) -> bool {
		*self.finished.borrow()
	}

	/// Waits until the task's guard is dropped
	pub(crate) async fn wait_finished(&self) {
		let mut finished = self.finished.clone();
		// A closed channel means the guard is gone as well
		let _ = finished.wait_for(|done| *done).await;
	}
}

/// Raises the finished signal, and clears the exit flag, however the task ends
#[derive(Debug)]
pub(crate) struct TaskGuard {
	finished: watch::Sender<bool>,
	exit_flag: Option<Arc<AtomicBool>>,
}

impl Drop for TaskGuard {
	fn drop(&mut self) {
		if let Some(flag) = &self.exit_flag {
			flag.store(false, Ordering::SeqCst);
		}
		self.finished.send_replace(true);
	}
}
