//! Error types for animation playback.

use thiserror::Error;

use crate::StopReason;

/// Errors raised by the animation scheduler
#[derive(Debug, Error)]
pub enum PlaybackError {
	/// An animation that chains into a return animation names one that does not exist
	#[error("Return animation {name} of {animation} not found")]
	UnknownReturnAnimation {
		/// Animation being played
		animation: String,
		/// Missing return animation name
		name: String,
	},

	/// The task was stopped with a reason that is not a clean stop
	#[error("Animation stopped: {0}")]
	Stopped(StopReason),

	/// The task panicked or was dropped with its runtime
	#[error("Animation task failed: {0}")]
	Join(#[from] tokio::task::JoinError),

	/// The player configuration could not be loaded
	#[error("Failed to load player config: {0}")]
	Config(#[from] config::ConfigError),

	/// The worker thread or its runtime could not be started
	#[error("Failed to start animation worker: {0}")]
	Io(#[from] std::io::Error),
}
