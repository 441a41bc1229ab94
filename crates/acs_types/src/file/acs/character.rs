//! Character metadata stored in the character info block.

use std::collections::BTreeMap;
use std::fmt;

use log::{info, warn};

use crate::file::{AcsError, Buffer, CountWidth, Palette, UnsupportedFeature};

use super::constants::{BALLOON_HEAD_SIZE, BALLOON_TAIL_SIZE, FALLBACK_LOCALE, LOCALES};

/// Returns the locale code for a numeric language id.
pub fn locale_code(language_id: u16) -> Option<&'static str> {
	LOCALES.iter().find(|(id, _)| *id == language_id).map(|(_, code)| *code)
}

/// Returns the numeric language id for a locale code.
pub fn language_id(locale: &str) -> Option<u16> {
	LOCALES.iter().find(|(_, code)| *code == locale).map(|(id, _)| *id)
}

/// Returns the process locale as `ll_CC`, read from the usual environment variables.
pub fn system_locale() -> String {
	["LC_ALL", "LC_MESSAGES", "LANG"]
		.iter()
		.filter_map(|key| std::env::var(key).ok())
		.map(|value| {
			// ja_JP.UTF-8@variant -> ja_JP
			let end = value.find(['.', '@']).unwrap_or(value.len());
			value[..end].to_string()
		})
		.find(|value| !value.is_empty() && value != "C" && value != "POSIX")
		.unwrap_or_else(|| FALLBACK_LOCALE.to_string())
}

/// 16-byte character identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Guid([u8; 16]);

impl Guid {
	/// Creates a GUID from its stored bytes.
	pub const fn from_bytes(bytes: [u8; 16]) -> Self {
		Self(bytes)
	}

	/// Returns the stored bytes.
	pub const fn as_bytes(&self) -> &[u8; 16] {
		&self.0
	}
}

impl fmt::Display for Guid {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let hex = hex::encode(self.0);
		write!(f, "{}-{}-{}-{}-{}", &hex[0..8], &hex[8..12], &hex[12..16], &hex[16..20], &hex[20..32])
	}
}

impl fmt::Debug for Guid {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Guid({self})")
	}
}

/// Character name and descriptions for one language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalizedInfo {
	/// Numeric language id, zero when unset
	pub language_id: u16,
	/// Character name
	pub name: String,
	/// Character description
	pub description: String,
	/// Extra text
	pub extra: String,
}

impl LocalizedInfo {
	/// Language id of placeholders built when no record matches.
	pub const PLACEHOLDER_LANGUAGE_ID: u16 = u16::MAX;

	/// Reads a record from the localized info list.
	pub fn read(buf: &mut Buffer) -> Result<Self, AcsError> {
		Ok(Self {
			language_id: buf.read_u16()?,
			name: buf.read_string()?,
			description: buf.read_string()?,
			extra: buf.read_string()?,
		})
	}

	/// Builds a placeholder for a character without usable records.
	pub fn placeholder(name: &str, locale: &str) -> Self {
		Self {
			language_id: Self::PLACEHOLDER_LANGUAGE_ID,
			name: name.to_string(),
			description: format!("<Couldn't find LocalizedInfo for {locale} and {FALLBACK_LOCALE}>"),
			extra: String::new(),
		}
	}

	/// Returns `true` when the record carries a language id.
	pub fn is_set(&self) -> bool {
		self.language_id != 0
	}
}

impl fmt::Display for LocalizedInfo {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} (language {:#06X})", self.name, self.language_id)?;
		if !self.description.is_empty() {
			write!(f, ": {}", self.description)?;
		}
		Ok(())
	}
}

/// Parsed character info block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterInfo {
	/// Character identifier
	pub guid: Guid,
	/// Display width in pixels
	pub width: u16,
	/// Display height in pixels
	pub height: u16,
	/// Palette with the transparency index applied
	pub palette: Palette,
	/// Localized records keyed by locale code
	pub localized: BTreeMap<String, LocalizedInfo>,
	/// Animation names keyed by state name
	pub states: BTreeMap<String, Vec<String>>,
}

impl CharacterInfo {
	/// Reads the character info block.
	pub fn read(buf: &mut Buffer) -> Result<Self, AcsError> {
		// Version
		buf.skip(2 + 2)?;

		let mut localized = BTreeMap::new();
		let records = buf.locator()?.read_list(CountWidth::Short, LocalizedInfo::read)?;
		for record in records {
			match locale_code(record.language_id) {
				Some(code) => {
					localized.insert(code.to_string(), record);
				}
				None => warn!("Unknown locale id: {:#X}", record.language_id),
			}
		}

		let guid = Guid::from_bytes(buf.read_fixed()?);
		info!("GUID: {guid}");

		let width = buf.read_u16()?;
		let height = buf.read_u16()?;
		let transparency_index = buf.read_u8()?;

		// Flags and the default animation frame durations
		buf.skip(4 + 2 + 2)?;
		skip_balloon_info(buf)?;

		let palette = Palette::read(buf, transparency_index)?;

		if buf.read_u8()? != 0 {
			return Err(AcsError::Unsupported(UnsupportedFeature::TrayIcon));
		}

		let states = buf
			.read_list(CountWidth::Short, |b| {
				let name = b.read_string()?;
				let animations = b.read_list(CountWidth::Short, Buffer::read_string)?;
				Ok((name, animations))
			})?
			.into_iter()
			.collect();

		Ok(Self {
			guid,
			width,
			height,
			palette,
			localized,
			states,
		})
	}

	/// Returns the transparency index.
	pub fn transparency_index(&self) -> u8 {
		self.palette.transparency_index()
	}

	/// Returns the animation names of a state, matched exactly.
	pub fn state(&self, name: &str) -> Option<&[String]> {
		self.states.get(name).map(Vec::as_slice)
	}
}

fn skip_balloon_info(buf: &mut Buffer) -> Result<(), AcsError> {
	buf.skip(BALLOON_HEAD_SIZE)?;
	// Font name
	buf.read_string()?;
	buf.skip(BALLOON_TAIL_SIZE)
}
