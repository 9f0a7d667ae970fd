use std::path::Path;

use tracing::{info, instrument};

use crate::{error::ExportError, types::{card::Card, crowd_anki_models::Deck}};

/// One row per card, in document order, under a `Front,Back,Deck` header.
#[instrument(skip(cards))]
pub fn write_csv(path: &Path, cards: &[Card]) -> Result<(), ExportError> {
	let mut writer = csv::Writer::from_path(path)?;
	writer.write_record(["Front", "Back", "Deck"])?;
	for card in cards {
		writer.write_record([card.front.as_str(), card.back.as_str(), card.deck.to_string().as_str()])?;
	}
	writer.flush()?;

	info!("Saved {} cards to {:?}", cards.len(), path);
	Ok(())
}

pub fn render_crowd_anki(deck: &Deck) -> Result<String, ExportError> { Ok(serde_json::to_string_pretty(deck)?) }

#[instrument(skip(deck))]
pub fn write_crowd_anki(path: &Path, deck: &Deck) -> Result<(), ExportError> {
	fs_err::write(path, render_crowd_anki(deck)?)?;
	info!("Exported CrowdAnki JSON: {:?}", path);
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::card::DeckPath;

	#[test]
	fn csv_quotes_html_and_keeps_order() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("cards.csv");
		let cards = vec![
			Card {
				front: r#"<strong>First</strong><br><img src="img_first_1.png">"#.to_string(),
				back:  "one, two".to_string(),
				deck:  DeckPath::default_for("Root"),
			},
			Card {
				front: "<strong>Second</strong><br>".to_string(),
				back:  "plain".to_string(),
				deck:  DeckPath::under_root("Root", "Topic"),
			},
		];

		write_csv(&path, &cards).unwrap();

		let mut reader = csv::Reader::from_path(&path).unwrap();
		assert_eq!(reader.headers().unwrap(), vec!["Front", "Back", "Deck"]);
		let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
		assert_eq!(rows.len(), 2);
		assert_eq!(&rows[0][0], r#"<strong>First</strong><br><img src="img_first_1.png">"#);
		assert_eq!(&rows[0][1], "one, two");
		assert_eq!(&rows[0][2], "Root::Default");
		assert_eq!(&rows[1][2], "Root::Topic");
	}
}
