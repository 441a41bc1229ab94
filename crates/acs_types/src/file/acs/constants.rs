//! Constants used in `.ACS` files

/// Magic bytes at the start of every `.ACS` file
pub const MAGIC: [u8; 4] = [0xC3, 0xAB, 0xCD, 0xAB];

/// Offset of the character info locator
pub const CHARACTER_LOCATOR_OFFSET: usize = 4;

/// Offset of the animation list locator
pub const ANIMATION_LOCATOR_OFFSET: usize = 12;

/// Offset of the image list locator
pub const IMAGE_LOCATOR_OFFSET: usize = 20;

/// Offset of the sound list locator
pub const SOUND_LOCATOR_OFFSET: usize = 28;

/// Size of the file header: magic plus four locators
pub const HEADER_SIZE: usize = 36;

/// Size of an `ACSLOCATOR` record
pub const LOCATOR_SIZE: usize = 8;

/// Audio index meaning "no sound"
pub const AUDIO_NONE: u16 = 0xFFFF;

/// Size of the balloon block fields before its font name
pub const BALLOON_HEAD_SIZE: usize = 1 + 1 + 4 + 4 + 4;

/// Size of the balloon block fields after its font name
pub const BALLOON_TAIL_SIZE: usize = 4 + 4 + 1 + 1;

/// Size of the trailing checksum after each located sound clip
pub const SOUND_CHECKSUM_SIZE: usize = 4;

/// Characters whose image rows carry extra padding columns, keyed by GUID bytes
pub const EXTRA_WIDTH_QUIRKS: &[([u8; 16], usize)] = &[(
	[
		0x9E, 0xFB, 0x12, 0x87, 0xF4, 0xF1, 0xD1, 0x11, 0x86, 0xFE, 0x00, 0x00, 0xF8, 0x75, 0x93,
		0x39,
	],
	2,
)];

/// Locale code used when no requested locale is available
pub const FALLBACK_LOCALE: &str = "en_US";

/// Numeric language ids and their locale codes
pub const LOCALES: &[(u16, &str)] = &[
	(0x0401, "ar_SA"),
	(0x0404, "zh_TW"),
	(0x0405, "cs_CZ"),
	(0x0406, "da_DK"),
	(0x0407, "de_DE"),
	(0x0408, "el_GR"),
	(0x0009, "en_US"),
	(0x040B, "fi_FI"),
	(0x040C, "fr_FR"),
	(0x040D, "he_IL"),
	(0x040E, "hu_HU"),
	(0x0410, "it_IT"),
	(0x0411, "ja_JP"),
	(0x0412, "ko_KR"),
	(0x0413, "nl_NL"),
	(0x0414, "nb_NO"),
	(0x0415, "pl_PL"),
	(0x0416, "pt_BR"),
	(0x0418, "ro_RO"),
	(0x0419, "ru_RU"),
	(0x041A, "hr_HR"),
	(0x041B, "sk_SK"),
	(0x041D, "sv_SE"),
	(0x041E, "th_TH"),
	(0x041F, "tr_TR"),
	(0x0424, "sl_SI"),
	(0x042D, "eu_ES"),
	(0x0804, "zh_CN"),
	(0x0816, "pt_PT"),
	(0x0C0A, "es_ES"),
];
