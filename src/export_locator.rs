use std::path::{Path, PathBuf};

use tracing::{debug, error, info, instrument, warn};

use crate::error::ExportError;

/// The pieces of an unpacked HTML export
#[derive(Debug, Clone, PartialEq)]
pub struct ExportFolder {
	pub root:      PathBuf,
	pub html_file: PathBuf,
	pub media_dir: Option<PathBuf>,
}

impl ExportFolder {
	/// CrowdAnki wants the JSON named after the folder it is imported from.
	pub fn json_output_path(&self) -> PathBuf {
		let name = self.root.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_else(|| "deck".to_string());
		self.root.join(format!("{name}.json"))
	}
}

fn is_html(path: &Path) -> bool {
	path.is_file() && path.extension().and_then(|e| e.to_str()).is_some_and(|e| e.eq_ignore_ascii_case("html"))
}

/// Finds the exported page and the folder holding its images. The page's
/// media folder shares its file stem; failing that, any other sub-directory
/// is used. `media_output` is never taken for a source.
#[instrument]
pub fn locate_export(folder: &Path, media_output: &str) -> Result<ExportFolder, ExportError> {
	info!("Scanning export folder {:?}", folder);

	if !folder.is_dir() {
		error!("Export folder does not exist");
		return Err(ExportError::FolderNotFound(folder.to_path_buf()));
	}
	let root = fs_err::canonicalize(folder)?;

	let mut entries = fs_err::read_dir(&root)?.map(|entry| entry.map(|e| e.path())).collect::<Result<Vec<_>, _>>()?;
	entries.sort();

	let html_files: Vec<&PathBuf> = entries.iter().filter(|p| is_html(p)).collect();
	let Some(html_file) = html_files.first().map(|p| (*p).clone()) else {
		error!("No .html file found in folder");
		return Err(ExportError::NoHtmlFound(root));
	};
	if html_files.len() > 1 {
		warn!("Found {} .html files, using {:?}", html_files.len(), html_file);
	}

	let directories: Vec<&PathBuf> = entries
		.iter()
		.filter(|p| p.is_dir() && p.file_name().is_some_and(|n| n != media_output))
		.collect();

	let stem = html_file.file_stem();
	let media_dir = directories
		.iter()
		.find(|dir| dir.file_name() == stem)
		.or_else(|| directories.first())
		.map(|dir| (*dir).clone());

	match &media_dir {
		Some(dir) => debug!("Using media folder {:?}", dir),
		None => warn!("No media folder found, images will not be resolved"),
	}

	Ok(ExportFolder { root, html_file, media_dir })
}
