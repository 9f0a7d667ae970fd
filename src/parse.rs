use std::{borrow::Cow, sync::LazyLock};

use chumsky::prelude::*;
use regex::{Captures, Regex};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument};

use crate::{error::ExportError, types::{card::{DeckPath, QuestionBlock}, config::{ExportConfig, Markers}, fragment::Fragment}};

/// Comments, start tags and end tags of serialized markup
static TAG: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?s)<!--.*?-->|<(/?)([A-Za-z][A-Za-z0-9-]*)[^>]*>").expect("static pattern is valid")
});

/// What a toggle's summary says about the toggle
#[derive(Debug, Clone, PartialEq)]
pub enum Label<'a> {
	Heading(&'a str),
	Question(&'a str),
	Other,
}

/// A toggle section read from the document, reduced to what the parser needs
#[derive(Debug, Clone, PartialEq)]
pub enum Section {
	Heading(String),
	Question { question: String, body: String },
	Skipped,
}

/// Output of a full document pass
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
	pub blocks:        Vec<QuestionBlock>,
	pub section_count: usize,
}

/// Accumulator threaded through the sections in document order. A heading
/// replaces the current deck for every later question; there is no nesting.
#[derive(Debug, Clone)]
pub struct ParseState<'c> {
	config:       &'c ExportConfig,
	current_deck: DeckPath,
	blocks:       Vec<QuestionBlock>,
}

impl<'c> ParseState<'c> {
	pub fn new(config: &'c ExportConfig) -> Self {
		Self { config, current_deck: DeckPath::default_for(&config.deck_name), blocks: Vec::new() }
	}

	pub fn current_deck(&self) -> &DeckPath { &self.current_deck }

	pub fn apply(mut self, section: Section) -> Self {
		match section {
			Section::Heading(name) => {
				self.current_deck = DeckPath::under_root(&self.config.deck_name, &name);
				debug!("Switched to deck {}", self.current_deck);
			}

			Section::Question { question, body } => {
				let (front_extra, back) = match split_body(&body, &self.config.markers) {
					Some((front_raw, back_raw)) => (parse_half(front_raw), parse_half(back_raw)),
					None => (Fragment::default(), Fragment::parse(body.trim())),
				};
				self.blocks.push(QuestionBlock { question, front_extra, back, deck: self.current_deck.clone() });
			}

			Section::Skipped => {}
		}
		self
	}

	pub fn into_blocks(self) -> Vec<QuestionBlock> { self.blocks }
}

fn marker<'a>(token: &'a str) -> impl Parser<'a, &'a str, &'a str, extra::Err<Rich<'a, char>>> + Clone {
	just(token).ignore_then(any().repeated().to_slice()).map(str::trim)
}

/// Label grammar: a heading token, a question token, or anything else. The
/// heading token is tried first.
pub fn label<'a>(
	markers: &'a Markers,
) -> impl Parser<'a, &'a str, Label<'a>, extra::Err<Rich<'a, char>>> + Clone {
	choice((
		marker(&markers.heading).map(Label::Heading),
		marker(&markers.question).map(Label::Question),
		any().repeated().to(Label::Other),
	))
}

pub fn classify<'a>(text: &'a str, markers: &'a Markers) -> Label<'a> {
	label(markers).parse(text).into_output().unwrap_or(Label::Other)
}

/// Splits a question body on the inline front/back delimiters. Without both
/// delimiters in order there is no split and the whole body is the back.
pub fn split_body<'b>(body: &'b str, markers: &Markers) -> Option<(&'b str, &'b str)> {
	let front_at = body.find(markers.front.as_str());
	let back_at = body.find(markers.back.as_str());

	match (front_at, back_at) {
		(Some(front), Some(back)) if back > front => {
			// Overlapping delimiters leave no room for front content
			let front_start = (front + markers.front.len()).min(back);
			Some((body[front_start..back].trim(), body[back + markers.back.len()..].trim()))
		}
		_ => None,
	}
}

/// Removes end tags whose start tag lies before the cut. Left in, the parser
/// turns a stray `</p>` into an empty paragraph.
pub fn drop_stray_end_tags(half: &str) -> Cow<'_, str> {
	let mut open: Vec<String> = Vec::new();

	TAG.replace_all(half, |caps: &Captures| {
		let (Some(slash), Some(name)) = (caps.get(1), caps.get(2)) else {
			return caps[0].to_string();
		};
		let name = name.as_str().to_ascii_lowercase();

		if slash.is_empty() {
			open.push(name);
			return caps[0].to_string();
		}
		match open.iter().rposition(|opened| *opened == name) {
			Some(at) => {
				open.truncate(at);
				caps[0].to_string()
			}
			None => String::new(),
		}
	})
}

/// A split half parsed on its own, without what the cut left behind
fn parse_half(half: &str) -> Fragment { Fragment::parse(&drop_stray_end_tags(half)).trim_edges() }

fn selector(css: &str) -> Result<Selector, ExportError> {
	Selector::parse(css).map_err(|e| ExportError::Selector(format!("{css}: {e}")))
}

/// Summary text the way a reader sees it: every text run trimmed and joined.
fn label_text(summary: ElementRef<'_>) -> String {
	summary.text().map(str::trim).collect()
}

fn read_section(details: ElementRef<'_>, summary_selector: &Selector, markers: &Markers) -> Section {
	let Some(summary) = details.select(summary_selector).next() else {
		debug!("Skipping toggle without a summary");
		return Section::Skipped;
	};

	let text = label_text(summary);
	match classify(&text, markers) {
		Label::Heading(name) => Section::Heading(name.to_string()),
		Label::Question(question) => {
			// The summary must not leak into the answer
			let body = Fragment::from_children(details, Some(summary)).to_html();
			Section::Question { question: question.to_string(), body }
		}
		Label::Other => {
			debug!("Skipping toggle '{}'", text);
			Section::Skipped
		}
	}
}

#[instrument(skip_all)]
pub fn parse_document(html: &str, config: &ExportConfig) -> Result<ParsedDocument, ExportError> {
	let document = Html::parse_document(html);
	let details_selector = selector("details")?;
	let summary_selector = selector("summary")?;

	let toggles: Vec<ElementRef> = document.select(&details_selector).collect();
	info!("Found {} toggle blocks", toggles.len());

	let state = toggles
		.iter()
		.map(|details| read_section(*details, &summary_selector, &config.markers))
		.fold(ParseState::new(config), ParseState::apply);

	let blocks = state.into_blocks();
	info!("Found {} questions", blocks.len());

	Ok(ParsedDocument { blocks, section_count: toggles.len() })
}
