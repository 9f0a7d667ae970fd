//! Name-based identifiers. Everything is a UUID v5 under the pinned root deck
//! UUID, so the same document exported twice yields the same identifiers and
//! a re-import updates decks in place.

use tracing::{debug, instrument};
use uuid::Uuid;

/// Identifier of a sub-deck, derived from its full `::`-joined path
/// (including the root deck's name).
#[instrument]
pub fn deck_uuid(root_uuid: &Uuid, full_path: &str) -> Uuid {
	let uuid = Uuid::new_v5(root_uuid, full_path.as_bytes());
	debug!("Deck '{}' -> {}", full_path, uuid);
	uuid
}

pub fn deck_config_uuid(root_uuid: &Uuid) -> Uuid { Uuid::new_v5(root_uuid, b"deck_config") }

pub fn note_model_uuid(root_uuid: &Uuid) -> Uuid { Uuid::new_v5(root_uuid, b"note_model_basic_plus") }

/// Generate the guid for a note based on its front. Anki matches existing
/// notes on it, so an edited back updates the note in place.
#[instrument(skip(front))]
pub fn generate_note_guid(note_model_uuid: &Uuid, front: &str) -> Uuid {
	Uuid::new_v5(note_model_uuid, front.as_bytes())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::config::DEFAULT_ROOT_UUID;

	#[test]
	fn deck_uuid_is_stable() {
		let first = deck_uuid(&DEFAULT_ROOT_UUID, "Data_Science::Statistics");
		let second = deck_uuid(&DEFAULT_ROOT_UUID, "Data_Science::Statistics");
		assert_eq!(first, second);
		assert_eq!(first.get_version_num(), 5);
	}

	#[test]
	fn deck_uuid_depends_on_path_and_root() {
		let other_root = Uuid::new_v5(&Uuid::NAMESPACE_DNS, b"other");
		let base = deck_uuid(&DEFAULT_ROOT_UUID, "Data_Science::A");

		assert_ne!(base, deck_uuid(&DEFAULT_ROOT_UUID, "Data_Science::B"));
		assert_ne!(base, deck_uuid(&other_root, "Data_Science::A"));
	}

	#[test]
	fn fixed_identifiers_differ() {
		assert_ne!(deck_config_uuid(&DEFAULT_ROOT_UUID), note_model_uuid(&DEFAULT_ROOT_UUID));
	}
}
