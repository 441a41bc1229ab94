use std::time::Duration;

use acs_rs::prelude::*;

use crate::sample_character;

fn controller(timeline: &Timeline, spawner: Spawner) -> AnimController {
	let acs = AcsFile::from_bytes("CLIPPIT", sample_character().build()).unwrap();
	let config = PlayerConfig {
		speed: 0.1,
		no_idle: true,
		seed: Some(3),
		..PlayerConfig::default()
	};
	AnimController::new(timeline.clone(), AnimationGraph::from_acs(&acs), config, spawner)
}

fn names(timeline: &Timeline) -> Vec<String> {
	timeline.frames().into_iter().map(|(name, index)| format!("{name}:{index}")).collect()
}

#[test_log::test]
fn test_state_playback_on_worker() {
	let worker = Worker::new().unwrap();
	let timeline = Timeline::new();
	let controller = controller(&timeline, worker.spawner());

	let handle = controller.play_animation("#GREETING", PlayOptions::default());
	assert_eq!(handle.name(), Some("WAVE"));

	let runtime = tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap();
	assert!(runtime.block_on(handle.into_future()).unwrap());
	assert_eq!(names(&timeline), ["WAVE:0", "WAVE:1", "RESTPOSE:0"]);
}

#[test_log::test(tokio::test(start_paused = true))]
async fn test_exit_request_ends_idle_loop() {
	let timeline = Timeline::new();
	let controller = controller(&timeline, Spawner::current());

	let handle = controller.play_animation("IDLE1_1", PlayOptions::default());
	tokio::time::sleep(Duration::from_millis(35)).await;
	assert!(!controller.request_exit());
	assert!(handle.await.unwrap());

	let recorded = names(&timeline);
	assert_eq!(recorded.last().map(String::as_str), Some("IDLE1_1:2"));
	assert!(!recorded.iter().any(|name| name == "IDLE1_1:1"));
}
