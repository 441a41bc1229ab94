//! Dedicated animation thread.
//!
//! A [`Worker`] owns a thread running a single-threaded tokio runtime. Every animation
//! and dialogue task runs there, and callers on any thread submit work through a
//! [`Spawner`].

use std::future::Future;
use std::thread::JoinHandle;

use log::{debug, warn};
use tokio::runtime::Handle;
use tokio::sync::oneshot;

use crate::PlaybackError;

/// Thread-safe entry point for submitting tasks to the animation runtime
#[derive(Debug, Clone)]
pub struct Spawner {
	handle: Handle,
}

impl Spawner {
	/// Wraps the handle of an existing runtime.
	pub fn new(handle: Handle) -> Self {
		Self {
			handle,
		}
	}

	/// Uses the runtime the caller is running on.
	///
	/// # Panics
	///
	/// Panics when called outside of a tokio runtime.
	pub fn current() -> Self {
		Self::new(Handle::current())
	}

	/// Starts `future` on the runtime.
	pub fn spawn<F>(&self, future: F) -> tokio::task::JoinHandle<F::Output>
	where
		F: Future + Send + 'static,
		F::Output: Send + 'static,
	{
		self.handle.spawn(future)
	}
}

/// Thread hosting the animation runtime; stops the runtime when dropped
#[derive(Debug)]
pub struct Worker {
	spawner: Spawner,
	shutdown: Option<oneshot::Sender<()>>,
	thread: Option<JoinHandle<()>>,
}

impl Worker {
	/// Starts the `animation` thread.
	pub fn new() -> Result<Self, PlaybackError> {
		let runtime = tokio::runtime::Builder::new_current_thread().enable_time().build()?;
		let spawner = Spawner::new(runtime.handle().clone());
		let (shutdown, stopped) = oneshot::channel::<()>();

		let thread = std::thread::Builder::new().name("animation".to_string()).spawn(move || {
			// Tasks only make progress while the runtime is driven here
			runtime.block_on(async {
				let _ = stopped.await;
			});
			debug!("Animation worker stopped");
		})?;

		Ok(Self {
			spawner,
			shutdown: Some(shutdown),
			thread: Some(thread),
		})
	}

	/// Returns a spawner for this worker's runtime.
	pub fn spawner(&self) -> Spawner {
		self.spawner.clone()
	}
}

impl Drop for Worker {
	fn drop(&mut self) {
		if let Some(shutdown) = self.shutdown.take() {
			let _ = shutdown.send(());
		}
		if let Some(thread) = self.thread.take()
			&& thread.join().is_err()
		{
			warn!("Animation worker panicked");
		}
	}
}
