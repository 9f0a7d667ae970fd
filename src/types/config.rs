use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::error::ExportError;

/// Separator between the segments of a deck path, as Anki writes it
pub const DECK_DELIMITER: &str = "::";

/// Name of the configuration file looked up inside an export folder
pub const CONFIG_FILE_NAME: &str = "togglecards.toml";

/// Pinned so that re-imports update the same deck instead of creating a new
/// one. Every derived identifier hangs off this value.
pub const DEFAULT_ROOT_UUID: Uuid = Uuid::from_u128(0xcf724d70_6d64_4414_9e08_d0e424fc4567);

#[derive(Deserialize, Serialize, Clone, PartialEq, Debug)]
#[serde(default)]
pub struct ExportConfig {
	// Display name of the top-level deck
	pub deck_name: String,

	pub root_uuid: Uuid,

	// Both relative to the export folder
	pub media_output: String,
	pub csv_output:   String,

	pub slug_max_len: usize,

	pub markers: Markers,
}

/// The textual tokens that give a toggle section its meaning
#[derive(Deserialize, Serialize, Clone, PartialEq, Debug)]
#[serde(default)]
pub struct Markers {
	pub heading:  String,
	pub question: String,

	// Inline delimiters inside a question body
	pub front: String,
	pub back:  String,
}

impl Default for ExportConfig {
	fn default() -> Self {
		Self {
			deck_name:    "Data_Science".to_string(),
			root_uuid:    DEFAULT_ROOT_UUID,
			media_output: "anki_media".to_string(),
			csv_output:   "anki_cards.csv".to_string(),
			slug_max_len: 50,
			markers:      Markers::default(),
		}
	}
}

impl Default for Markers {
	fn default() -> Self {
		Self {
			heading:  "H:".to_string(),
			question: "Q:".to_string(),
			front:    "Q:".to_string(),
			back:     "A:".to_string(),
		}
	}
}

impl ExportConfig {
	#[instrument]
	pub fn load(path: &Path) -> Result<Self, ExportError> {
		debug!("Loading configuration from {:?}", path);
		let content = fs_err::read_to_string(path)?;
		toml::from_str(&content)
			.map_err(|source| ExportError::Config { path: path.to_path_buf(), source })
	}

	/// An explicit file wins, then a config file inside the export folder,
	/// then the built-in defaults.
	#[instrument]
	pub fn discover(explicit: Option<&Path>, folder: &Path) -> Result<Self, ExportError> {
		if let Some(path) = explicit {
			return Self::load(path);
		}

		let local = folder.join(CONFIG_FILE_NAME);
		if local.is_file() {
			info!("Using configuration found at {:?}", local);
			return Self::load(&local);
		}

		debug!("No configuration file, using defaults");
		Ok(Self::default())
	}

	pub fn media_output_dir(&self, folder: &Path) -> PathBuf { folder.join(&self.media_output) }

	pub fn csv_output_path(&self, folder: &Path) -> PathBuf { folder.join(&self.csv_output) }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_file_yields_defaults() {
		let config: ExportConfig = toml::from_str("").unwrap();
		assert_eq!(config, ExportConfig::default());
		assert_eq!(config.root_uuid.to_string(), "cf724d70-6d64-4414-9e08-d0e424fc4567");
	}

	#[test]
	fn partial_file_overrides_only_given_keys() {
		let config: ExportConfig = toml::from_str(
			r##"
deck_name = "Biology"
root_uuid = "0b3a4f1e-7c55-4d8e-9a43-3e9f1b6c2d10"

[markers]
heading = "#"
"##,
		)
		.unwrap();

		assert_eq!(config.deck_name, "Biology");
		assert_eq!(config.root_uuid.to_string(), "0b3a4f1e-7c55-4d8e-9a43-3e9f1b6c2d10");
		assert_eq!(config.markers.heading, "#");
		assert_eq!(config.markers.question, "Q:");
		assert_eq!(config.slug_max_len, 50);
	}

	#[test]
	fn discover_prefers_folder_config() {
		let dir = tempfile::tempdir().unwrap();
		fs_err::write(dir.path().join(CONFIG_FILE_NAME), "deck_name = \"Local\"\n").unwrap();

		let config = ExportConfig::discover(None, dir.path()).unwrap();
		assert_eq!(config.deck_name, "Local");
	}

	#[test]
	fn malformed_config_is_reported() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("broken.toml");
		fs_err::write(&path, "slug_max_len = \"many\"\n").unwrap();

		let err = ExportConfig::discover(Some(&path), dir.path()).unwrap_err();
		assert!(matches!(err, ExportError::Config { .. }));
	}
}
