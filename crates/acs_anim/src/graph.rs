//! Animation lookup by name or state.

use std::collections::BTreeMap;
use std::sync::Arc;

use acs_types::file::{AcsFile, AnimInfo};
use log::error;
use rand::Rng;
use rand::seq::IndexedRandom;

/// Name of the state whose animations bring a hidden character back
pub const SHOWING_STATE: &str = "SHOWING";

/// Animations after which a character is hidden
pub const HIDING_ANIMATIONS: [&str; 2] = ["HIDE", "GOODBYE"];

/// Reference to an animation to play.
///
/// Strings convert to [`AnimRef::Name`], or to [`AnimRef::State`] when they start with
/// `#`:
///
/// ```
/// use acs_anim::AnimRef;
///
/// assert_eq!(AnimRef::from("#SHOWING"), AnimRef::State("SHOWING".to_string()));
/// assert_eq!(AnimRef::from("WAVE"), AnimRef::Name("WAVE".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AnimRef {
	/// A specific animation
	Resolved(Arc<AnimInfo>),
	/// An animation by exact name
	Name(String),
	/// A random animation of a state
	State(String),
	/// Nothing to play
	#[default]
	None,
}

impl From<&str> for AnimRef {
	fn from(value: &str) -> Self {
		match value.strip_prefix('#') {
			Some(state) => Self::State(state.to_string()),
			None if value.is_empty() => Self::None,
			None => Self::Name(value.to_string()),
		}
	}
}

impl From<String> for AnimRef {
	fn from(value: String) -> Self {
		Self::from(value.as_str())
	}
}

impl From<Arc<AnimInfo>> for AnimRef {
	fn from(value: Arc<AnimInfo>) -> Self {
		Self::Resolved(value)
	}
}

impl<T: Into<AnimRef>> From<Option<T>> for AnimRef {
	fn from(value: Option<T>) -> Self {
		value.map_or(Self::None, Into::into)
	}
}

/// Animations of a character and the states grouping them
#[derive(Debug, Clone, Default)]
pub struct AnimationGraph {
	animations: BTreeMap<String, Arc<AnimInfo>>,
	states: BTreeMap<String, Vec<String>>,
}

impl AnimationGraph {
	/// Creates a graph from animations keyed by name and the state lists.
	pub fn new(animations: BTreeMap<String, Arc<AnimInfo>>, states: BTreeMap<String, Vec<String>>) -> Self {
		Self {
			animations,
			states,
		}
	}

	/// Creates a graph from a parsed character.
	pub fn from_acs(acs: &AcsFile) -> Self {
		Self::new(acs.animations().clone(), acs.character().states.clone())
	}

	/// Returns an animation by exact name.
	pub fn animation(&self, name: &str) -> Option<&Arc<AnimInfo>> {
		self.animations.get(name)
	}

	/// Returns the animations keyed by name.
	pub fn animations(&self) -> &BTreeMap<String, Arc<AnimInfo>> {
		&self.animations
	}

	/// Returns the animation names of a state.
	pub fn state(&self, name: &str) -> Option<&[String]> {
		self.states.get(name).map(Vec::as_slice)
	}

	/// Resolves `reference`, picking state members with `rng`.
	///
	/// Unknown names and empty or unknown states are logged and resolve to `None`.
	pub fn resolve<R: Rng + ?Sized>(&self, reference: &AnimRef, rng: &mut R) -> Option<Arc<AnimInfo>> {
		let name = match reference {
			AnimRef::None => return None,
			AnimRef::Resolved(animation) => return Some(animation.clone()),
			AnimRef::Name(name) => name,
			AnimRef::State(state) => match self.state(state).and_then(|names| names.choose(rng)) {
				Some(name) => name,
				None => {
					error!("State {state} does not exist");
					return None;
				}
			},
		};

		let animation = self.animations.get(name).cloned();
		if animation.is_none() {
			error!("Animation {name} does not exist");
		}
		animation
	}

	/// Returns the animations eligible for idle playback.
	///
	/// These are the animations whose name starts with `idle` in any case, or all of
	/// them when `all` is set.
	pub fn idle_candidates(&self, all: bool) -> Vec<Arc<AnimInfo>> {
		self.animations
			.values()
			.filter(|animation| all || is_idle_name(&animation.name))
			.cloned()
			.collect()
	}
}

fn is_idle_name(name: &str) -> bool {
	name.to_lowercase().starts_with("idle")
}

#[cfg(test)]
mod tests {
	use acs_types::file::TransitionType;
	use rand::SeedableRng;
	use rand::rngs::SmallRng;

	use super::*;

	fn animation(name: &str) -> Arc<AnimInfo> {
		Arc::new(AnimInfo {
			name: name.to_string(),
			transition: TransitionType::NoTransition,
			return_animation: None,
			frames: Vec::new(),
		})
	}

	fn graph() -> AnimationGraph {
		let animations = ["IDLE1_1", "Idle2", "idle_wave", "idling", "WAVE", "ID"]
			.into_iter()
			.map(|name| (name.to_string(), animation(name)))
			.collect();
		let states = BTreeMap::from([
			("GREETING".to_string(), vec!["WAVE".to_string()]),
			("IDLINGLEVEL1".to_string(), vec!["IDLE1_1".to_string(), "Idle2".to_string()]),
			("EMPTY".to_string(), Vec::new()),
		]);
		AnimationGraph::new(animations, states)
	}

	#[test]
	fn test_resolve_variants() {
		let graph = graph();
		let mut rng = SmallRng::seed_from_u64(1);

		assert_eq!(graph.resolve(&AnimRef::None, &mut rng), None);
		assert_eq!(graph.resolve(&"WAVE".into(), &mut rng).unwrap().name, "WAVE");
		assert_eq!(graph.resolve(&"#GREETING".into(), &mut rng).unwrap().name, "WAVE");

		let custom = animation("NOT_IN_GRAPH");
		assert!(Arc::ptr_eq(&graph.resolve(&custom.clone().into(), &mut rng).unwrap(), &custom));
	}

	#[test_log::test]
	fn test_resolve_missing() {
		let graph = graph();
		let mut rng = SmallRng::seed_from_u64(1);

		assert_eq!(graph.resolve(&"wave".into(), &mut rng), None);
		assert_eq!(graph.resolve(&"#MISSING".into(), &mut rng), None);
		assert_eq!(graph.resolve(&"#EMPTY".into(), &mut rng), None);
	}

	#[test]
	fn test_state_members_are_all_reachable() {
		let graph = graph();
		let mut rng = SmallRng::seed_from_u64(3);

		let mut seen = std::collections::BTreeSet::new();
		for _ in 0..64 {
			seen.insert(graph.resolve(&"#IDLINGLEVEL1".into(), &mut rng).unwrap().name.clone());
		}
		assert_eq!(seen.into_iter().collect::<Vec<_>>(), ["IDLE1_1", "Idle2"]);
	}

	#[test]
	fn test_idle_candidates() {
		let graph = graph();

		let names: Vec<_> = graph.idle_candidates(false).iter().map(|a| a.name.clone()).collect();
		// "idling" and "ID" do not start with "idle"
		assert_eq!(names, ["IDLE1_1", "Idle2", "idle_wave"]);
		assert_eq!(graph.idle_candidates(true).len(), 6);
	}

	#[test]
	fn test_anim_ref_conversions() {
		assert_eq!(AnimRef::from(""), AnimRef::None);
		assert_eq!(AnimRef::from(None::<&str>), AnimRef::None);
		assert_eq!(AnimRef::from(Some("#X".to_string())), AnimRef::State("X".to_string()));
	}
}
