use acs_rs::prelude::*;
use tempfile::tempdir;

use crate::{minimal_container, sample_character, sprite};

#[test_log::test]
fn test_minimal_container_has_empty_maps() {
	let acs = AcsFile::from_bytes("MINIMAL", minimal_container()).unwrap();
	let character = acs.character();

	assert_eq!(character.guid.to_string(), "11111111-1111-1111-1111-111111111111");
	assert_eq!((character.width, character.height), (100, 80));
	assert!(character.localized.is_empty());
	assert!(character.states.is_empty());
	assert!(character.palette.is_empty());
	assert!(acs.animations().is_empty());
	assert!(acs.sounds().is_empty());
	assert!(acs.decode_images(None, |_, _| {}).unwrap().is_empty());
	assert_eq!(acs.extra_width(), 0);
}

#[test_log::test]
fn test_built_character_round_trip() {
	let acs = AcsFile::from_bytes("CLIPPIT", sample_character().build()).unwrap();

	assert_eq!(acs.localized_info(Some("en_US")).name, "Clippit");
	assert_eq!(acs.character().localized.keys().collect::<Vec<_>>(), ["en_US"]);
	assert_eq!(acs.animations().len(), 3);
	assert_eq!(acs.character().state("GREETING").unwrap(), ["WAVE"]);

	let images = acs.decode_images(None, |_, _| {}).unwrap();
	assert_eq!(images, vec![sprite(48, 40, 1), sprite(17, 9, 2), sprite(8, 8, 3)]);

	let report = acs.report();
	assert!(report.contains("GREETING: WAVE\n"));
	assert!(report.contains("Return Animation Name: RESTPOSE\n"));
}

#[test_log::test]
fn test_windows_language_ids_are_not_locales() {
	// 0x0409 is the full Windows id of en-US, only the primary language id is known
	let data = sample_character()
		.localized(LocalizedInfo {
			language_id: 0x0409,
			name: "Clippy".to_string(),
			description: String::new(),
			extra: String::new(),
		})
		.build();
	let acs = AcsFile::from_bytes("CLIPPIT", data).unwrap();

	assert_eq!(acs.character().localized.len(), 1);
	assert_eq!(acs.localized_info(Some("en_US")).name, "Clippit");
}

#[test_log::test]
fn test_caches_on_disk() {
	let temp = tempdir().unwrap();
	let dir = temp.path().join("CLIPPIT_cache");
	let acs = AcsFile::from_bytes("CLIPPIT", sample_character().build()).unwrap();

	let mut progress = Vec::new();
	let metadata = acs.ensure_image_cache(&dir, None, |done, total| progress.push((done, total))).unwrap();
	assert_eq!(progress, vec![(1, 3), (2, 3), (3, 3)]);
	assert_eq!(metadata.max_size, [48, 40]);
	assert_eq!(metadata.subimages, vec![[0, 0, 48, 40], [48, 0, 17, 9], [96, 0, 8, 8]]);

	let sheet = image::open(ImageCache::new(&dir).sheet_path()).unwrap().to_rgba8();
	assert_eq!(sheet.dimensions(), (16 * 48, 40));
	// Index 0 is the transparency index
	assert_eq!(sheet.get_pixel(0, 0).0, [0, 0, 0, 0]);

	// A second call reuses the cache without decoding
	let again = acs.ensure_image_cache(&dir, None, |_, _| panic!("cache should be reused")).unwrap();
	assert_eq!(again, metadata);

	let sounds = acs.sounds().write_cache(&dir).unwrap();
	assert_eq!(sounds.len(), 1);
	let path = sounds[0].as_ref().unwrap();
	assert_eq!(std::fs::read(path).unwrap(), b"RIFF\x04\x00\x00\x00WAVE");
}

#[test_log::test]
fn test_save_and_open() {
	let dir = tempdir().unwrap();
	let path = dir.path().join("CLIPPIT.ACS");

	sample_character().save(&path).unwrap();
	let acs = AcsFile::open(&path).unwrap();
	assert_eq!(acs.name(), "CLIPPIT");
	assert_eq!(acs.sounds().len(), 1);
}
