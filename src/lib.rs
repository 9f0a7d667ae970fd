use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::{crowd_anki::{card_deck_tree, crowd_anki_export}, deck_tree::DeckNode, error::ExportError, export::{write_crowd_anki, write_csv}, export_locator::locate_export, media::MediaResolver, parse::parse_document, types::{card::Card, config::ExportConfig}};

pub mod crowd_anki;
pub mod deck_tree;
pub mod error;
pub mod export;
pub mod export_locator;
pub mod media;
pub mod parse;
pub mod picker;
pub mod types;
pub mod uuid_generator;

/// What a finished run produced
#[derive(Debug, Clone)]
pub struct ExportSummary {
	pub section_count:    usize,
	pub cards:            Vec<Card>,
	pub deck_tree:        DeckNode,
	pub media_files:      Vec<String>,
	pub unresolved_media: Vec<String>,
	pub csv_path:         PathBuf,
	pub json_path:        PathBuf,
}

/// Parses the page, resolves its images and builds one card per question
/// toggle, in document order.
#[instrument(skip_all)]
pub fn build_cards(
	html: &str,
	resolver: &mut MediaResolver,
	config: &ExportConfig,
) -> Result<(usize, Vec<Card>), ExportError> {
	let parsed = parse_document(html, config)?;

	let mut cards = Vec::with_capacity(parsed.blocks.len());
	for mut block in parsed.blocks {
		resolver.resolve(&block.question, &mut block.front_extra)?;
		resolver.resolve(&block.question, &mut block.back)?;
		cards.push(Card::from_block(block));
	}

	Ok((parsed.section_count, cards))
}

/// Converts the export in `folder`, writing the CSV, the CrowdAnki JSON and
/// the renamed images next to it. Nothing is written when the folder holds no
/// page.
#[instrument(skip(config))]
pub fn run_export(folder: &Path, config: &ExportConfig) -> Result<ExportSummary, ExportError> {
	let export = locate_export(folder, &config.media_output)?;
	let html = fs_err::read_to_string(&export.html_file)?;

	let media_output = config.media_output_dir(&export.root);
	fs_err::create_dir_all(&media_output)?;

	let mut resolver = MediaResolver::new(export.media_dir.clone(), media_output.clone(), config.slug_max_len);
	let (section_count, cards) = build_cards(&html, &mut resolver, config)?;

	let csv_path = config.csv_output_path(&export.root);
	write_csv(&csv_path, &cards)?;
	info!("Images saved to {:?}", media_output);

	let deck_tree = card_deck_tree(&cards, config);
	let json_path = export.json_output_path();
	write_crowd_anki(&json_path, &crowd_anki_export(&deck_tree, resolver.media_files(), config))?;

	if !resolver.unresolved().is_empty() {
		warn!("{} image references could not be resolved", resolver.unresolved().len());
	}

	Ok(ExportSummary {
		section_count,
		cards,
		deck_tree,
		media_files: resolver.media_files().to_vec(),
		unresolved_media: resolver.unresolved().to_vec(),
		csv_path,
		json_path,
	})
}
