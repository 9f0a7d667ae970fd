use std::path::Path;

use serde_json::Value;
use togglecards::{run_export, types::config::ExportConfig, uuid_generator};

const PAGE: &str = r#"<!DOCTYPE html>
<html><head><meta charset="utf-8"><title>Statistics</title></head>
<body><article class="page sans">
<details open=""><summary>Q: Which card lands in the default deck?</summary><p id="p1">This one.</p></details>
<details open=""><summary>H: Descriptive statistics</summary><p>Heading content is ignored</p></details>
<details open=""><summary><strong>Q:</strong> Guess the distribution</summary>
<p>Q:</p><figure class="image"><a href="Statistics%201a2b/plot.png"><img style="width:300px" src="Statistics%201a2b/plot.png"/></a></figure><p>A: Normal distribution</p>
</details>
<details><summary>Just a collapsible note</summary><p>nothing</p></details>
<details open=""><summary>H: Inferential statistics::Hypothesis testing</summary></details>
<details open=""><summary>Q: What is a p-value?</summary><p class="block">The probability of data at least this extreme.</p><img src="Statistics%201a2b/missing.png"/></details>
</article></body></html>
"#;

fn export_folder(root: &Path) -> std::path::PathBuf {
	let folder = root.join("Statistics");
	let media = folder.join("Statistics 1a2b");
	fs_err::create_dir_all(&media).unwrap();
	fs_err::write(folder.join("Statistics 1a2b.html"), PAGE).unwrap();
	fs_err::write(media.join("plot.png"), b"\x89PNG fake").unwrap();
	folder
}

fn config() -> ExportConfig { ExportConfig { deck_name: "Stats".to_string(), ..ExportConfig::default() } }

#[test]
fn one_card_per_question_toggle() {
	let dir = tempfile::tempdir().unwrap();
	let folder = export_folder(dir.path());

	let summary = run_export(&folder, &config()).unwrap();

	assert_eq!(summary.section_count, 6);
	assert_eq!(summary.cards.len(), 3);

	let decks: Vec<String> = summary.cards.iter().map(|c| c.deck.to_string()).collect();
	assert_eq!(decks, [
		"Stats::Default",
		"Stats::Descriptive statistics",
		"Stats::Inferential statistics::Hypothesis testing"
	]);
}

#[test]
fn front_image_is_resolved_and_back_is_clean() {
	let dir = tempfile::tempdir().unwrap();
	let folder = export_folder(dir.path());

	let summary = run_export(&folder, &config()).unwrap();
	let card = &summary.cards[1];

	assert!(card.front.starts_with("<strong>Guess the distribution</strong><br>"));
	assert!(card.front.contains(r#"<img src="img_guess_the_distribution_1.png">"#));
	assert!(!card.front.contains("style="));
	assert_eq!(card.back, "Normal distribution");

	assert!(folder.join("anki_media/img_guess_the_distribution_1.png").is_file());
	assert_eq!(summary.media_files, ["img_guess_the_distribution_1.png"]);
}

#[test]
fn missing_image_keeps_reference() {
	let dir = tempfile::tempdir().unwrap();
	let folder = export_folder(dir.path());

	let summary = run_export(&folder, &config()).unwrap();
	let card = &summary.cards[2];

	assert_eq!(card.front, "<strong>What is a p-value?</strong><br>");
	assert!(card.back.starts_with("<p>The probability of data at least this extreme.</p>"));
	assert!(card.back.contains(r#"<img src="Statistics%201a2b/missing.png">"#));
	assert_eq!(summary.unresolved_media, ["Statistics%201a2b/missing.png"]);
}

#[test]
fn outputs_are_written() {
	let dir = tempfile::tempdir().unwrap();
	let folder = export_folder(dir.path());

	let summary = run_export(&folder, &config()).unwrap();
	assert_eq!(summary.json_path.file_name().unwrap(), "Statistics.json");

	let mut reader = csv::Reader::from_path(&summary.csv_path).unwrap();
	assert_eq!(reader.records().count(), 3);

	let json: Value = serde_json::from_str(&fs_err::read_to_string(&summary.json_path).unwrap()).unwrap();
	let root_uuid = config().root_uuid;
	assert_eq!(json["crowdanki_uuid"], root_uuid.to_string());
	assert_eq!(json["media_files"][0], "img_guess_the_distribution_1.png");

	let children = json["children"].as_array().unwrap();
	let names: Vec<&str> = children.iter().map(|c| c["name"].as_str().unwrap()).collect();
	assert_eq!(names, ["Default", "Descriptive statistics", "Inferential statistics"]);

	let inferential = &children[2];
	assert_eq!(
		inferential["crowdanki_uuid"],
		uuid_generator::deck_uuid(&root_uuid, "Stats::Inferential statistics").to_string()
	);
	assert!(inferential["notes"].as_array().unwrap().is_empty());
	let testing = &inferential["children"][0];
	assert_eq!(testing["name"], "Hypothesis testing");
	assert_eq!(testing["notes"].as_array().unwrap().len(), 1);
}

#[test]
fn repeated_runs_are_byte_identical() {
	let dir = tempfile::tempdir().unwrap();
	let folder = export_folder(dir.path());

	let first = run_export(&folder, &config()).unwrap();
	let first_json = fs_err::read(&first.json_path).unwrap();
	let first_csv = fs_err::read(&first.csv_path).unwrap();

	// The output media folder now exists next to the page and must be ignored
	let second = run_export(&folder, &config()).unwrap();
	assert_eq!(first_json, fs_err::read(&second.json_path).unwrap());
	assert_eq!(first_csv, fs_err::read(&second.csv_path).unwrap());
	assert_eq!(fs_err::read_dir(folder.join("anki_media")).unwrap().count(), 1);
}

#[test]
fn folder_without_page_writes_nothing() {
	let dir = tempfile::tempdir().unwrap();
	let folder = dir.path().join("Empty");
	fs_err::create_dir_all(folder.join("images")).unwrap();

	assert!(run_export(&folder, &config()).is_err());
	assert!(!folder.join("anki_media").exists());
	assert!(!folder.join("anki_cards.csv").exists());
}
