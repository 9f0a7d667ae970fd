use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
	#[error("No .html file found in folder {0}")]
	NoHtmlFound(PathBuf),

	#[error("Export folder {0} does not exist")]
	FolderNotFound(PathBuf),

	#[error("Invalid selector '{0}'")]
	Selector(String),

	#[error("Failed to parse configuration {path}: {source}")]
	Config {
		path:   PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Failed to write CSV: {0}")]
	Csv(#[from] csv::Error),

	#[error("Failed to serialize deck: {0}")]
	Json(#[from] serde_json::Error),
}
