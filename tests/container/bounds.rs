use acs_rs::acs_types::file::{DecompressError, ImageRecord};
use acs_rs::prelude::*;

use crate::{minimal_container, sample_character};

#[test]
fn test_locators_past_the_end_are_rejected() {
	for locator in [4, 12, 20, 28] {
		let mut data = minimal_container();
		let len = data.len() as u32;
		data[locator..locator + 4].copy_from_slice(&len.to_le_bytes());
		data[locator + 4..locator + 8].copy_from_slice(&1u32.to_le_bytes());

		match AcsFile::from_bytes("OOB", data) {
			Err(AcsError::LocatorOutOfBounds {
				offset,
				size,
				..
			}) => assert_eq!((offset, size), (len, 1)),
			other => panic!("Locator at {locator}: unexpected result {other:?}"),
		}
	}
}

#[test]
fn test_overflowing_locator_is_rejected() {
	let mut data = minimal_container();
	data[12..16].copy_from_slice(&u32::MAX.to_le_bytes());
	data[16..20].copy_from_slice(&u32::MAX.to_le_bytes());

	assert!(matches!(AcsFile::from_bytes("OVERFLOW", data), Err(AcsError::LocatorOutOfBounds { .. })));
}

#[test]
fn test_every_truncation_fails_cleanly() {
	let data = sample_character().build();
	for len in 0..data.len() {
		assert!(AcsFile::from_bytes("CUT", data[..len].to_vec()).is_err(), "prefix of {len} bytes parsed");
	}
	assert!(AcsFile::from_bytes("FULL", data).is_ok());
}

#[test_log::test]
fn test_corrupt_image_payload() {
	let record = ImageRecord {
		width: 4,
		height: 4,
		compressed: true,
		// A run of twelve ones in a length prefix
		data: vec![0x00, 0x02, 0x02, 0xFE, 0x1F].into(),
	};
	let data = AcsFileBuilder::new().image_record(record).build();
	let acs = AcsFile::from_bytes("CORRUPT", data).unwrap();

	match acs.decode_images(None, |_, _| {}) {
		Err(AcsError::Decompression {
			index,
			source,
		}) => {
			assert_eq!(index, 0);
			assert!(matches!(source, DecompressError::LengthRunTooLong { run: 12, .. }));
		}
		other => panic!("Unexpected result: {other:?}"),
	}
}
