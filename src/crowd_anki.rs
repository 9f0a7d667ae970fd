use std::collections::BTreeMap;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::{deck_tree::{DeckNode, build_deck_tree}, types::{card::Card, config::ExportConfig, crowd_anki_config::DeckConfig, crowd_anki_models::{Deck, Field, Note, NoteModel, NoteModelType, Template}}, uuid_generator};

const LATEX_PRE: &str = "\\documentclass[12pt]{article}\n\\special{papersize=3in,5in}\n\\usepackage[utf8]{inputenc}\n\\usepackage{amssymb,amsmath}\n\\pagestyle{empty}\n\\setlength{\\parindent}{0in}\n\\begin{document}\n";
const LATEX_POST: &str = "\\end{document}";
const CARD_CSS: &str = ".card {\n font-family: arial;\n font-size: 20px;\n text-align: center;\n color: black;\n background-color: white;\n}\n";

fn field(name: &str, ord: i32) -> Field {
	Field {
		name: name.to_string(),
		ord,
		font: "Arial".to_string(),
		size: 20,
		rtl: false,
		sticky: false,
		media: vec![],
		description: String::new(),
		collapsed: false,
		exclude_from_search: false,
		plain_text: false,
		prevent_deletion: false,
		tag: None,
		id: None,
	}
}

/// Two fields, one card showing the front and then the back under a rule.
pub fn basic_plus_model(crowdanki_uuid: Uuid) -> NoteModel {
	NoteModel {
		crowdanki_uuid,
		name: "Basic+".to_string(),
		kind: NoteModelType::Standard,
		modified: 0,
		sortf: 0,
		latex_pre: LATEX_PRE.to_string(),
		latex_post: LATEX_POST.to_string(),
		css: CARD_CSS.to_string(),
		flds: vec![field("Front", 0), field("Back", 1)],
		tmpls: vec![Template {
			name:   "Card 1".to_string(),
			ord:    0,
			qfmt:   "{{Front}}".to_string(),
			afmt:   "{{FrontSide}}<hr id=answer>{{Back}}".to_string(),
			bqfmt:  String::new(),
			bafmt:  String::new(),
			did:    None,
			sticky: false,
			id:     None,
		}],
		req: vec![(0, "any".to_string(), vec![0])],
		tags: vec![],
		vers: vec![],
		latexsvg: false,
	}
}

pub fn note_for(card: &Card, note_model_uuid: &Uuid) -> Note {
	Note {
		guid:            uuid_generator::generate_note_guid(note_model_uuid, &card.front).to_string(),
		note_model_uuid: *note_model_uuid,
		fields:          vec![card.front.clone(), card.back.clone()],
		tags:            vec![],
		flags:           0,
		newly_added:     false,
		data:            String::new(),
	}
}

/// Notes grouped by the full path of their deck, document order kept within
/// each deck.
pub fn notes_by_deck(cards: &[Card], note_model_uuid: &Uuid) -> BTreeMap<String, Vec<Note>> {
	let mut grouped: BTreeMap<String, Vec<Note>> = BTreeMap::new();
	for card in cards {
		grouped.entry(card.deck.to_string()).or_default().push(note_for(card, note_model_uuid));
	}
	grouped
}

/// Deck tree for a set of cards, rooted at the configured deck.
#[instrument(skip_all)]
pub fn card_deck_tree(cards: &[Card], config: &ExportConfig) -> DeckNode {
	let root = &config.root_uuid;
	let grouped = notes_by_deck(cards, &uuid_generator::note_model_uuid(root));
	let paths: Vec<String> = grouped.keys().cloned().collect();

	build_deck_tree(
		&config.deck_name,
		*root,
		uuid_generator::deck_config_uuid(root),
		paths.iter().map(String::as_str),
		grouped,
	)
}

/// A sub-deck: only its own notes and children.
pub fn deck_from_node(node: &DeckNode) -> Deck {
	Deck {
		name:                node.name.clone(),
		crowdanki_uuid:      node.uuid,
		deck_config_uuid:    node.deck_config_uuid,
		desc:                String::new(),
		is_dynamic:          0,
		extend_new:          10,
		extend_rev:          50,
		note_models:         None,
		deck_configurations: None,
		notes:               node.notes.clone(),
		children:            node.children.iter().map(deck_from_node).collect(),
		media_files:         None,
	}
}

/// The complete export: the root deck with the shared model, configuration
/// and media list, and the whole tree below it.
#[instrument(skip_all)]
pub fn crowd_anki_export(tree: &DeckNode, media_files: &[String], config: &ExportConfig) -> Deck {
	let root = &config.root_uuid;
	let mut deck = deck_from_node(tree);

	deck.note_models = Some(vec![basic_plus_model(uuid_generator::note_model_uuid(root))]);
	deck.deck_configurations = Some(vec![DeckConfig::standard(uuid_generator::deck_config_uuid(root))]);
	deck.media_files = Some(media_files.to_vec());

	info!("Export holds {} notes in {} top-level decks", tree.note_count(), deck.children.len());
	deck
}

#[cfg(test)]
mod tests {
	use serde_json::{Value, json};

	use super::*;
	use crate::types::card::DeckPath;

	fn card(front: &str, deck: DeckPath) -> Card {
		Card { front: front.to_string(), back: "back".to_string(), deck }
	}

	fn config() -> ExportConfig { ExportConfig { deck_name: "Root".to_string(), ..ExportConfig::default() } }

	#[test]
	fn notes_follow_their_cards() {
		let config = config();
		let cards = vec![
			card("a", DeckPath::default_for("Root")),
			card("b", DeckPath::under_root("Root", "Topic")),
			card("c", DeckPath::default_for("Root")),
		];

		let tree = card_deck_tree(&cards, &config);
		let default = tree.find("Root::Default").unwrap();
		assert_eq!(default.notes.iter().map(|n| n.fields[0].as_str()).collect::<Vec<_>>(), ["a", "c"]);
		assert_eq!(tree.find("Root::Topic").unwrap().notes.len(), 1);
		assert!(tree.notes.is_empty());
	}

	#[test]
	fn note_guid_depends_on_front_only() {
		let model = uuid_generator::note_model_uuid(&config().root_uuid);
		let one = note_for(&card("front", DeckPath::root("Root")), &model);
		let two = note_for(&Card { back: "changed".to_string(), ..card("front", DeckPath::root("Root")) }, &model);

		assert_eq!(one.guid, two.guid);
	}

	#[test]
	fn top_level_carries_shared_blocks_and_children_do_not() {
		let config = config();
		let cards = vec![card("q", DeckPath::under_root("Root", "A"))];
		let tree = card_deck_tree(&cards, &config);

		let export = serde_json::to_value(crowd_anki_export(&tree, &["img_q_1.png".to_string()], &config)).unwrap();

		assert_eq!(export["__type__"], "Deck");
		assert_eq!(export["crowdanki_uuid"], config.root_uuid.to_string());
		assert_eq!(export["name"], "Root");
		assert_eq!(export["media_files"], json!(["img_q_1.png"]));
		assert_eq!(export["notes"], json!([]));
		assert_eq!(export["deck_configurations"][0]["crowdanki_uuid"], export["deck_config_uuid"]);
		assert_eq!(export["deck_configurations"][0]["new"]["perDay"], 20);
		assert_eq!(export["deck_configurations"][0]["rev"]["maxIvl"], 36500);
		assert_eq!(export["deck_configurations"][0]["lapse"]["leechFails"], 8);

		// Anki writes these two as integers
		assert!(export["deck_configurations"][0]["rev"]["ivlFct"].is_u64());
		assert!(export["deck_configurations"][0]["lapse"]["mult"].is_u64());
		assert_eq!(export["deck_configurations"][0]["rev"]["ivlFct"], 1);
		assert_eq!(export["deck_configurations"][0]["lapse"]["mult"], 0);

		let model = &export["note_models"][0];
		assert_eq!(model["name"], "Basic+");
		assert_eq!(model["type"], 0);
		assert_eq!(model["flds"][0]["name"], "Front");
		assert_eq!(model["flds"][1]["name"], "Back");
		assert_eq!(model["tmpls"][0]["afmt"], "{{FrontSide}}<hr id=answer>{{Back}}");
		assert_eq!(model["req"], json!([[0, "any", [0]]]));

		let child = &export["children"][0];
		assert_eq!(child["name"], "A");
		assert_eq!(child["deck_config_uuid"], export["deck_config_uuid"]);
		assert_eq!(child["notes"][0]["__type__"], "Note");
		assert_eq!(child["notes"][0]["note_model_uuid"], model["crowdanki_uuid"]);
		assert_eq!(child["notes"][0]["fields"], json!(["q", "back"]));
		for key in ["note_models", "deck_configurations", "media_files"] {
			assert_eq!(child[key], Value::Null, "{key} should be absent from sub-decks");
		}
	}
}
