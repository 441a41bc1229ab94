//! Animation scheduling.
//!
//! An [`AnimController`] plays one animation and shows one message at a time. Every
//! request returns right away with a handle; the work runs as a task on the runtime
//! behind the controller's [`Spawner`], normally a [`Worker`](crate::Worker) thread.
//!
//! # Frame Loop
//!
//! | Step | Behavior                                                                 |
//! |------|--------------------------------------------------------------------------|
//! | 1    | Wait out the start delay in steps of at most 50 ms                       |
//! | 2    | Draw the frame unless its scaled duration is zero, then sleep for it     |
//! | 3    | Move to the exit index when an exit is requested, else branch or advance |
//! | 4    | Past the last frame, chain into the return animation if there is one     |
//! | 5    | Bring a hidden character back with a `SHOWING` animation when asked to   |
//! | 6    | Schedule a random idle animation 1 to 4 seconds later                    |
//!
//! Cancellation is observed at every sleep. A task stopped with
//! [`StopReason::Replaced`] or [`StopReason::Interrupted`] resolves to `Ok(false)`;
//! [`StopReason::Custom`] and failures are logged and returned as errors.


use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use acs_types::file::{AnimInfo, TransitionType};
use log::{debug, error, info};
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::graph::{HIDING_ANIMATIONS, SHOWING_STATE};
use crate::stop::TaskSlot;
use crate::{
	AnimRef, AnimationGraph, AnimationHandle, Backend, CancelToken, Choice, ChoiceAction,
	ChoiceResponder, Message, PlaybackError, PlayerConfig, SayHandle, Spawner, StopReason,
};

/// Longest uninterrupted sleep while waiting for a start delay
pub const DELAY_STEP: Duration = Duration::from_millis(50);

/// Delay before a hidden character reappears
pub const REAPPEAR_DELAY: Duration = Duration::from_millis(500);

/// Range of the delay, in seconds, before an idle animation starts
pub const IDLE_DELAY_SECS: std::ops::Range<f64> = 1.0..4.0;

/// Options of [`AnimController::play_animation`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayOptions {
	/// Time to wait before the first frame
	pub start_delay: Duration,
	/// Index of the first frame
	pub starting_frame: usize,
	/// Values in `0..100` used for branch selection before random ones
	pub jump_sequence: Vec<u32>,
	/// Play a `SHOWING` animation after `HIDE` or `GOODBYE`
	pub reappear: bool,
	/// Make the handle resolve to `false` immediately
	pub not_awaitable: bool,
	/// Replace the current animation
	pub stop_previous: bool,
}

impl Default for PlayOptions {
	fn default() -> Self {
		Self {
			start_delay: Duration::ZERO,
			starting_frame: 0,
			jump_sequence: Vec::new(),
			reappear: false,
			not_awaitable: false,
			stop_previous: true,
		}
	}
}

impl PlayOptions {
	/// Options that wait `delay` before the first frame.
	pub fn delayed(delay: Duration) -> Self {
		Self {
			start_delay: delay,
			..Self::default()
		}
	}
}

struct Inner {
	backend: Arc<dyn Backend>,
	graph: AnimationGraph,
	config: PlayerConfig,
	spawner: Spawner,
	rng: Mutex<SmallRng>,
	exit_requested: Arc<AtomicBool>,
	animation: Mutex<TaskSlot>,
	dialogue: Mutex<TaskSlot>,
}

/// Plays the animations of one character.
///
/// Cloning yields another handle on the same controller.
///
/// # Examples
///
/// ```no_run
/// use acs_anim::{AnimController, AnimationGraph, PlayOptions, PlayerConfig, Timeline, Worker};
/// use acs_types::file::AcsFile;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let acs = AcsFile::open("KAIRU.ACS")?;
/// let worker = Worker::new()?;
/// let controller = AnimController::new(
/// 	Timeline::new(),
/// 	AnimationGraph::from_acs(&acs),
/// 	PlayerConfig::default(),
/// 	worker.spawner(),
/// );
///
/// let handle = controller.play_animation("#SHOWING", PlayOptions::default());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct AnimController {
	inner: Arc<Inner>,
}

impl std::fmt::Debug for AnimController {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AnimController")
			.field("animations", &self.inner.graph.animations().len())
			.field("config", &self.inner.config)
			.finish_non_exhaustive()
	}
}

impl AnimController {
	/// Creates a controller seeded from `config.seed`, or from OS entropy.
	pub fn new<B: Backend>(backend: B, graph: AnimationGraph, config: PlayerConfig, spawner: Spawner) -> Self {
		let rng = match config.seed {
			Some(seed) => SmallRng::seed_from_u64(seed),
			None => SmallRng::from_os_rng(),
		};
		Self::with_rng(backend, graph, config, spawner, rng)
	}

	/// Creates a controller drawing from `rng`.
	pub fn with_rng<B: Backend>(
		backend: B,
		graph: AnimationGraph,
		config: PlayerConfig,
		spawner: Spawner,
		rng: SmallRng,
	) -> Self {
		Self {
			inner: Arc::new(Inner {
				backend: Arc::new(backend),
				graph,
				config,
				spawner,
				rng: Mutex::new(rng),
				exit_requested: Arc::new(AtomicBool::new(false)),
				animation: Mutex::new(TaskSlot::idle()),
				dialogue: Mutex::new(TaskSlot::idle()),
			}),
		}
	}

	/// Returns the player settings.
	pub fn config(&self) -> &PlayerConfig {
		&self.inner.config
	}

	/// Returns the playable animations.
	pub fn graph(&self) -> &AnimationGraph {
		&self.inner.graph
	}

	/// Resolves an animation reference, picking state members at random.
	pub fn search_animation(&self, reference: impl Into<AnimRef>) -> Option<Arc<AnimInfo>> {
		self.inner.graph.resolve(&reference.into(), &mut *self.rng())
	}

	/// Returns the animations eligible for idle playback.
	pub fn idle_candidates(&self) -> Vec<Arc<AnimInfo>> {
		self.inner.graph.idle_candidates(self.inner.config.idle_all_anims)
	}

	/// Starts an animation and returns without waiting for it.
	///
	/// A reference that resolves to nothing yields a handle resolving to `Ok(false)`.
	pub fn play_animation(&self, reference: impl Into<AnimRef>, options: PlayOptions) -> AnimationHandle {
		if options.stop_previous {
			self.stop_animation(StopReason::Replaced);
		}
		let animation = self.search_animation(reference);
		self.inner.exit_requested.store(false, Ordering::SeqCst);

		let Some(animation) = animation else {
			*self.animation_slot() = TaskSlot::idle();
			debug!("Nothing to play");
			return AnimationHandle::ready(None, false);
		};

		let mut current = self.animation_slot();
		self.spawn_animation(&mut current, animation, options)
	}

	/// Installs and starts a task for `animation` in the locked slot
	fn spawn_animation(&self, current: &mut TaskSlot, animation: Arc<AnimInfo>, options: PlayOptions) -> AnimationHandle {
		debug!("Scheduling animation {}", animation.name);

		let (slot, guard) = TaskSlot::start(Some(self.inner.exit_requested.clone()));
		let cancel = slot.cancel.clone();
		*current = slot;

		let name = animation.name.clone();
		let not_awaitable = options.not_awaitable;
		let controller = self.clone();
		let task = self.inner.spawner.spawn(async move {
			let _guard = guard;
			controller.run(animation, options, cancel).await
		});

		if not_awaitable {
			AnimationHandle::ready(Some(name), false)
		} else {
			AnimationHandle::task(Some(name), task)
		}
	}

	/// Asks the current animation to leave through its exit branches.
	///
	/// Returns `true` if the current animation has already finished.
	pub fn request_exit(&self) -> bool {
		self.inner.exit_requested.store(true, Ordering::SeqCst);
		self.animation_slot().is_finished()
	}

	/// Cancels the current animation.
	pub fn stop_animation(&self, reason: StopReason) {
		self.animation_slot().cancel.cancel(reason);
	}

	/// Shows a message, or clears the balloon with `None`.
	///
	/// The handle resolves to the pressed choice once one is picked, after running its
	/// callback if it has one. Messages without choices resolve to `None` immediately.
	/// The previous message is replaced.
	pub fn say(&self, message: Option<Message>) -> SayHandle {
		let (slot, guard) = TaskSlot::start(None);
		let previous = std::mem::replace(&mut *self.dialogue_slot(), slot.clone());
		previous.cancel.cancel(StopReason::Replaced);

		let Some(message) = message else {
			drop(guard);
			return SayHandle::ready();
		};

		let has_choices = !message.choices.is_empty();
		let backend = self.inner.backend.clone();
		let cancel = slot.cancel;
		let task = self.inner.spawner.spawn(async move {
			let _guard = guard;
			let (responder, chosen) = ChoiceResponder::new(message.choices.len());
			backend.say(&message, responder);
			if message.choices.is_empty() {
				return None;
			}

			tokio::select! {
				biased;
				reason = cancel.cancelled() => {
					debug!("Dialogue {reason}");
					None
				}
				index = chosen => {
					let choice: Option<Choice> = index.ok().and_then(|index| message.choices.get(index).cloned());
					if let Some(Choice {
						action: ChoiceAction::Callback(callback),
						..
					}) = &choice
					{
						callback();
					}
					choice
				}
			}
		});

		if has_choices {
			SayHandle::task(task)
		} else {
			SayHandle::ready()
		}
	}

	/// Stops the current animation and message, then waits for the animation to unwind.
	pub async fn interrupt(&self) {
		// Cancel under the lock so a finishing task cannot install an idle animation
		// between the lookup and the cancellation
		let animation = {
			let current = self.animation_slot();
			current.cancel.cancel(StopReason::Interrupted);
			current.clone()
		};
		self.dialogue_slot().cancel.cancel(StopReason::Interrupted);
		animation.wait_finished().await;
	}

	async fn run(&self, animation: Arc<AnimInfo>, options: PlayOptions, cancel: CancelToken) -> Result<bool, PlaybackError> {
		let name = animation.name.clone();
		let outcome = tokio::select! {
			biased;
			reason = cancel.cancelled() => Err(reason),
			result = self.play(animation, options) => Ok(result),
		};

		match outcome {
			Ok(Ok(())) => {
				info!("Animation {name} finished");
				self.schedule_idle(&cancel);
				Ok(true)
			}
			Ok(Err(err)) => {
				error!("Animation {name} failed: {err}");
				Err(err)
			}
			Err(reason) if reason.is_clean() => {
				info!("Animation {name} {reason}");
				Ok(false)
			}
			Err(reason) => {
				error!("Animation {name} stopped: {reason}");
				Err(PlaybackError::Stopped(reason))
			}
		}
	}

	async fn play(&self, animation: Arc<AnimInfo>, options: PlayOptions) -> Result<(), PlaybackError> {
		let mut jumps = options.jump_sequence.into_iter();

		wait_delay(options.start_delay).await;
		let last = self.play_chain(animation, options.starting_frame, &mut jumps).await?;

		if options.reappear
			&& HIDING_ANIMATIONS.contains(&last.name.as_str())
			&& self.inner.graph.state(SHOWING_STATE).is_some()
			&& let Some(show) = self.search_animation(AnimRef::State(SHOWING_STATE.to_string()))
		{
			wait_delay(REAPPEAR_DELAY).await;
			self.play_chain(show, 0, &mut jumps).await?;
		}

		Ok(())
	}

	/// Plays `animation` and the return animations it chains into, returning the last one
	async fn play_chain<I>(&self, mut animation: Arc<AnimInfo>, mut index: usize, jumps: &mut I) -> Result<Arc<AnimInfo>, PlaybackError>
	where
		I: Iterator<Item = u32> + Send,
	{
		loop {
			info!("Playing animation {}", animation.name);
			self.play_frames(&animation, index, jumps).await;

			if animation.transition != TransitionType::UseReturnAnimation {
				return Ok(animation);
			}

			let name = animation.return_animation.clone().unwrap_or_default();
			let Some(next) = self.inner.graph.animation(&name).cloned() else {
				return Err(PlaybackError::UnknownReturnAnimation {
					animation: animation.name.clone(),
					name,
				});
			};
			animation = next;
			index = 0;
		}
	}

	async fn play_frames<I>(&self, animation: &AnimInfo, mut index: usize, jumps: &mut I)
	where
		I: Iterator<Item = u32> + Send,
	{
		let config = &self.inner.config;

		while let Some(frame) = animation.frames.get(index) {
			let seconds = f64::from(frame.duration) * config.speed / 100.0;
			if seconds > 0.0 || config.do_not_skip_zero_duration_frames {
				self.inner.backend.play_frame(animation, frame, index);
			}
			debug!("{} frame {index}, {seconds:.2}s", animation.name);
			tokio::time::sleep(Duration::try_from_secs_f64(seconds).unwrap_or(Duration::ZERO)).await;

			let exit_requested = self.inner.exit_requested.load(Ordering::SeqCst);
			index = frame.next_index(index, exit_requested, || self.draw(jumps));
		}
	}

	fn draw<I: Iterator<Item = u32>>(&self, jumps: &mut I) -> u32 {
		jumps.next().unwrap_or_else(|| self.rng().random_range(0..100))
	}

	/// Follows the task owning `finished` with an idle animation, unless it was stopped
	/// or replaced in the meantime
	fn schedule_idle(&self, finished: &CancelToken) {
		if self.inner.config.no_idle || finished.is_cancelled() {
			return;
		}

		let candidates = self.idle_candidates();
		let (animation, delay) = {
			let mut rng = self.rng();
			let animation = candidates.choose(&mut *rng).cloned();
			(animation, rng.random_range(IDLE_DELAY_SECS))
		};
		let Some(animation) = animation else {
			return;
		};

		let mut current = self.animation_slot();
		if !current.cancel.same_task(finished) || current.cancel.is_cancelled() {
			debug!("Not idling, playback moved on");
			return;
		}

		debug!("Idling with {} in {delay:.2}s", animation.name);
		self.inner.exit_requested.store(false, Ordering::SeqCst);
		let _ = self.spawn_animation(
			&mut current,
			animation,
			PlayOptions {
				start_delay: Duration::from_secs_f64(delay),
				reappear: true,
				not_awaitable: true,
				stop_previous: false,
				..PlayOptions::default()
			},
		);
	}

	fn rng(&self) -> MutexGuard<'_, SmallRng> {
		self.inner.rng.lock().unwrap_or_else(PoisonError::into_inner)
	}

	fn animation_slot(&self) -> MutexGuard<'_, TaskSlot> {
		self.inner.animation.lock().unwrap_or_else(PoisonError::into_inner)
	}

	fn dialogue_slot(&self) -> MutexGuard<'_, TaskSlot> {
		self.inner.dialogue.lock().unwrap_or_else(PoisonError::into_inner)
	}
}

async fn wait_delay(delay: Duration) {
	let mut remaining = delay;
	while !remaining.is_zero() {
		let step = remaining.min(DELAY_STEP);
		tokio::time::sleep(step).await;
		remaining -= step;
	}
}
