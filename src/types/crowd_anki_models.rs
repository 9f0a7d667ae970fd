use serde::{Serialize, Serializer};
use uuid::Uuid;

use crate::types::crowd_anki_config::DeckConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoteModelType {
	Standard,
}

impl Serialize for NoteModelType {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		let v = match self {
			NoteModelType::Standard => 0,
		};
		serializer.serialize_i32(v)
	}
}

/// A deck as CrowdAnki reads it. Only the top-level deck carries the note
/// models, configurations and media list; sub-decks leave them out.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "__type__")]
pub struct Deck {
	pub name:             String,
	pub crowdanki_uuid:   Uuid,
	pub deck_config_uuid: Uuid,
	pub desc:             String,

	#[serde(rename = "dyn")]
	pub is_dynamic: i32,

	#[serde(rename = "extendNew")]
	pub extend_new: i32,

	#[serde(rename = "extendRev")]
	pub extend_rev: i32,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub note_models:         Option<Vec<NoteModel>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub deck_configurations: Option<Vec<DeckConfig>>,
	pub notes:               Vec<Note>,
	pub children:            Vec<Deck>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub media_files:         Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "__type__")]
pub struct NoteModel {
	pub crowdanki_uuid: Uuid,
	pub name:           String,

	#[serde(rename = "type")]
	pub kind: NoteModelType,

	#[serde(rename = "mod")]
	pub modified: i64,

	pub sortf: i32,

	#[serde(rename = "latexPre")]
	pub latex_pre: String,

	#[serde(rename = "latexPost")]
	pub latex_post: String,

	pub css:   String,
	pub flds:  Vec<Field>,
	pub tmpls: Vec<Template>,

	// [ordinal, "any" | "all", required field ordinals]
	pub req:  Vec<(i32, String, Vec<i32>)>,
	pub tags: Vec<String>,
	pub vers: Vec<String>,

	pub latexsvg: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
	pub name:                String,
	pub ord:                 i32,
	pub font:                String,
	pub size:                i32,
	pub rtl:                 bool,
	pub sticky:              bool,
	pub media:               Vec<String>,
	pub description:         String,
	pub collapsed:           bool,
	pub exclude_from_search: bool,
	pub plain_text:          bool,
	pub prevent_deletion:    bool,
	pub tag:                 Option<i32>,
	pub id:                  Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Template {
	pub name:   String,
	pub ord:    i32,
	pub qfmt:   String,
	pub afmt:   String,
	pub bqfmt:  String,
	pub bafmt:  String,
	pub did:    Option<i64>,
	pub sticky: bool,
	pub id:     Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "__type__")]
pub struct Note {
	pub guid:            String,
	pub note_model_uuid: Uuid,
	pub fields:          Vec<String>,
	pub tags:            Vec<String>,
	pub flags:           i32,

	#[serde(rename = "newlyAdded")]
	pub newly_added: bool,

	pub data: String,
}
