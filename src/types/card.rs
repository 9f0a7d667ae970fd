use std::fmt;

use crate::types::{config::DECK_DELIMITER, fragment::{Fragment, keep_image_source}};

/// Hierarchical address of a deck. The first segment is always the root deck.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeckPath {
	segments: Vec<String>,
}

impl DeckPath {
	pub fn root(root: &str) -> Self { Self { segments: vec![root.to_string()] } }

	/// Where cards land before the first heading is seen.
	pub fn default_for(root: &str) -> Self { Self::under_root(root, "Default") }

	/// `root::<heading>`; a heading containing the delimiter addresses a nested
	/// deck and an empty heading addresses the root itself.
	pub fn under_root(root: &str, heading: &str) -> Self {
		let mut segments = vec![root.to_string()];
		segments.extend(heading.split(DECK_DELIMITER).filter(|s| !s.is_empty()).map(str::to_string));
		Self { segments }
	}

	pub fn segments(&self) -> &[String] { &self.segments }
}

impl fmt::Display for DeckPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.segments.join(DECK_DELIMITER)) }
}

/// A question section as found in the document, split but not yet resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionBlock {
	pub question:    String,
	pub front_extra: Fragment,
	pub back:        Fragment,
	pub deck:        DeckPath,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
	pub front: String,
	pub back:  String,
	pub deck:  DeckPath,
}

impl Card {
	/// Sanitizes both sides and puts the question text on top of the front.
	pub fn from_block(block: QuestionBlock) -> Self {
		let QuestionBlock { question, mut front_extra, mut back, deck } = block;

		front_extra.sanitize(keep_image_source);
		back.sanitize(keep_image_source);

		let front = format!(
			"<strong>{}</strong><br>{}",
			html_escape::encode_text(&question),
			front_extra.to_html().trim()
		);

		Self { front, back: back.to_html().trim().to_string(), deck }
	}
}
