use std::path::PathBuf;

use clap::Parser;
use eyre::{Result, WrapErr};
use togglecards::{picker::{FolderPicker, PromptPicker}, run_export, types::config::ExportConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Turn the toggle lists of an HTML notes export into Anki cards
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
	/// Unzipped export folder; asked for when left out
	folder: Option<PathBuf>,

	/// Configuration file, defaults to togglecards.toml inside the folder
	#[arg(short, long)]
	config: Option<PathBuf>,

	/// Name of the top-level deck
	#[arg(long)]
	deck_name: Option<String>,

	/// Fixed UUID of the top-level deck
	#[arg(long)]
	root_uuid: Option<Uuid>,

	/// Print the resulting deck tree
	#[arg(long)]
	print_tree: bool,
}

fn main() -> Result<()> {
	color_eyre::install()?;
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.with_writer(std::io::stderr)
		.init();

	let args = Args::parse();

	let picked = match args.folder.clone() {
		Some(folder) => Some(folder).pick(),
		None => PromptPicker::terminal().pick(),
	};
	let Some(folder) = picked else {
		println!("No folder selected.");
		return Ok(());
	};

	let mut config = ExportConfig::discover(args.config.as_deref(), &folder)?;
	if let Some(deck_name) = args.deck_name {
		config.deck_name = deck_name;
	}
	if let Some(root_uuid) = args.root_uuid {
		config.root_uuid = root_uuid;
	}

	let summary = run_export(&folder, &config).wrap_err_with(|| format!("Failed to convert {:?}", folder))?;

	info!(
		"Converted {} of {} toggle blocks; {} images copied, {} missing",
		summary.cards.len(),
		summary.section_count,
		summary.media_files.len(),
		summary.unresolved_media.len()
	);
	if args.print_tree {
		print!("{}", summary.deck_tree);
	}
	println!("CSV:  {}", summary.csv_path.display());
	println!("JSON: {}", summary.json_path.display());

	Ok(())
}
