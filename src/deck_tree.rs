//! Turns the flat set of `::`-delimited deck paths into the nested deck tree.
//!
//! Paths are first inserted into a trie, which only knows about membership.
//! A separate pass then materializes every trie node into a [`DeckNode`],
//! attaching identifiers and notes. Children are kept in name order so the
//! output does not depend on the order decks were first seen.

use std::{collections::{BTreeMap, HashMap}, fmt};

use tracing::{debug, instrument};
use uuid::Uuid;

use crate::{types::{config::DECK_DELIMITER, crowd_anki_models::Note}, uuid_generator};

#[derive(Debug, Default)]
struct TrieNode {
	children: BTreeMap<String, TrieNode>,
}

impl TrieNode {
	fn insert<'p>(&mut self, segments: impl IntoIterator<Item = &'p str>) {
		let mut node = self;
		for segment in segments {
			node = node.children.entry(segment.to_string()).or_default();
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeckNode {
	pub uuid:             Uuid,
	pub name:             String,
	pub full_path:        String,
	pub notes:            Vec<Note>,
	pub children:         Vec<DeckNode>,
	pub deck_config_uuid: Uuid,
}

impl DeckNode {
	pub fn find(&self, full_path: &str) -> Option<&DeckNode> {
		if self.full_path == full_path {
			return Some(self);
		}
		self.children.iter().find_map(|child| child.find(full_path))
	}

	pub fn note_count(&self) -> usize {
		self.notes.len() + self.children.iter().map(DeckNode::note_count).sum::<usize>()
	}

	fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
		writeln!(f, "{}{} ({} notes) [{}]", "  ".repeat(depth), self.name, self.notes.len(), self.uuid)?;
		for child in &self.children {
			child.write_indented(f, depth + 1)?;
		}
		Ok(())
	}
}

impl fmt::Display for DeckNode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.write_indented(f, 0) }
}

pub struct DeckTreeBuilder<'r> {
	root_name:        &'r str,
	root_uuid:        Uuid,
	deck_config_uuid: Uuid,
	trie:             TrieNode,
}

impl<'r> DeckTreeBuilder<'r> {
	pub fn new(root_name: &'r str, root_uuid: Uuid, deck_config_uuid: Uuid) -> Self {
		Self { root_name, root_uuid, deck_config_uuid, trie: TrieNode::default() }
	}

	/// Segments below the root. A leading root segment is dropped so the
	/// root is not nested inside itself.
	fn relative_segments<'p>(&self, path: &'p str) -> Vec<&'p str> {
		let mut segments: Vec<&str> = path.split(DECK_DELIMITER).collect();
		if segments.first() == Some(&self.root_name) {
			segments.remove(0);
		}
		segments.retain(|segment| !segment.is_empty());
		segments
	}

	fn full_path(&self, segments: &[&str]) -> String {
		std::iter::once(self.root_name).chain(segments.iter().copied()).collect::<Vec<_>>().join(DECK_DELIMITER)
	}

	pub fn insert(&mut self, path: &str) {
		let segments = self.relative_segments(path);
		self.trie.insert(segments);
	}

	/// Every path that has notes is part of the tree, whether or not it was
	/// inserted beforehand.
	#[instrument(skip_all)]
	pub fn build(mut self, notes_by_deck: BTreeMap<String, Vec<Note>>) -> DeckNode {
		let mut notes: HashMap<String, Vec<Note>> = HashMap::new();
		for (path, deck_notes) in notes_by_deck {
			let segments = self.relative_segments(&path);
			let full_path = self.full_path(&segments);
			self.trie.insert(segments);
			notes.entry(full_path).or_default().extend(deck_notes);
		}

		let root_path = self.root_name.to_string();
		let children = self.materialize_children(&self.trie, &root_path, &mut notes);

		debug!("Built deck tree with {} top-level decks", children.len());
		DeckNode {
			uuid: self.root_uuid,
			name: self.root_name.to_string(),
			notes: notes.remove(&root_path).unwrap_or_default(),
			full_path: root_path,
			children,
			deck_config_uuid: self.deck_config_uuid,
		}
	}

	fn materialize_children(
		&self,
		node: &TrieNode,
		parent_path: &str,
		notes: &mut HashMap<String, Vec<Note>>,
	) -> Vec<DeckNode> {
		node
			.children
			.iter()
			.map(|(name, child)| {
				let full_path = format!("{parent_path}{DECK_DELIMITER}{name}");
				DeckNode {
					uuid:             uuid_generator::deck_uuid(&self.root_uuid, &full_path),
					name:             name.clone(),
					notes:            notes.remove(&full_path).unwrap_or_default(),
					children:         self.materialize_children(child, &full_path, notes),
					full_path,
					deck_config_uuid: self.deck_config_uuid,
				}
			})
			.collect()
	}
}

/// Builds the tree from every observed path plus the notes filed under them.
pub fn build_deck_tree<'p>(
	root_name: &str,
	root_uuid: Uuid,
	deck_config_uuid: Uuid,
	paths: impl IntoIterator<Item = &'p str>,
	notes_by_deck: BTreeMap<String, Vec<Note>>,
) -> DeckNode {
	let mut builder = DeckTreeBuilder::new(root_name, root_uuid, deck_config_uuid);
	for path in paths {
		builder.insert(path);
	}
	builder.build(notes_by_deck)
}
