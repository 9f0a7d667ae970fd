use std::{path::{Path, PathBuf}, sync::LazyLock};

use regex::Regex;
use tracing::{debug, info, instrument, warn};

use crate::{error::ExportError, types::fragment::Fragment};

static NON_ALPHANUMERIC: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("static pattern is valid"));

/// An image that was found in the media folder and copied under its new name
#[derive(Debug, Clone, PartialEq)]
pub struct MediaAsset {
	pub original_reference: String,
	pub source_path:        PathBuf,
	pub new_name:           String,
}

/// Lowercase, every run of non `[a-z0-9]` characters collapsed to `_`, outer
/// underscores trimmed, cut at `max_len`.
pub fn slugify(text: &str, max_len: usize) -> String {
	let lowered = text.to_lowercase();
	let collapsed = NON_ALPHANUMERIC.replace_all(&lowered, "_");
	collapsed.trim_matches('_').chars().take(max_len).collect()
}

/// File name part of an image reference with percent-encoding undone.
fn decode_file_name(reference: &str) -> String {
	let base = reference.rsplit('/').next().unwrap_or(reference);
	urlencoding::decode(base).map(|decoded| decoded.into_owned()).unwrap_or_else(|_| base.to_string())
}

/// `.png` for `plot.png`, nothing for names without an extension.
fn extension_of(name: &str) -> String {
	Path::new(name).extension().and_then(|e| e.to_str()).map(|e| format!(".{e}")).unwrap_or_default()
}

pub struct MediaResolver {
	source_dir:   Option<PathBuf>,
	output_dir:   PathBuf,
	slug_max_len: usize,
	media_files:  Vec<String>,
	unresolved:   Vec<String>,
}

impl MediaResolver {
	pub fn new(source_dir: Option<PathBuf>, output_dir: PathBuf, slug_max_len: usize) -> Self {
		Self { source_dir, output_dir, slug_max_len, media_files: Vec::new(), unresolved: Vec::new() }
	}

	fn locate(&self, file_name: &str) -> Option<PathBuf> {
		// A decoded name must not reach outside the media folder
		if file_name.is_empty() || file_name == ".." || file_name.contains(['/', '\\']) {
			return None;
		}
		let path = self.source_dir.as_ref()?.join(file_name);
		path.is_file().then_some(path)
	}

	/// Copies every image of `fragment` that exists in the media folder to the
	/// output folder as `img_<slug>_<index><ext>` and points the reference at
	/// the copy. Indices start at 1 for every fragment. Missing images keep
	/// their original reference.
	#[instrument(skip(self, fragment))]
	pub fn resolve(&mut self, question: &str, fragment: &mut Fragment) -> Result<Vec<MediaAsset>, ExportError> {
		let slug = slugify(question, self.slug_max_len);
		let mut assets = Vec::new();

		for (position, image) in fragment.images_mut().into_iter().enumerate() {
			let Some(reference) = image.attr("src").filter(|src| !src.is_empty()).map(str::to_string) else {
				debug!("Image without a source at position {}", position + 1);
				continue;
			};

			let file_name = decode_file_name(&reference);
			let new_name = format!("img_{}_{}{}", slug, position + 1, extension_of(&file_name));

			let Some(source_path) = self.locate(&file_name) else {
				warn!("Missing image file: {}", file_name);
				self.unresolved.push(reference);
				continue;
			};

			fs_err::copy(&source_path, self.output_dir.join(&new_name))?;
			info!("Copied image: {}", new_name);

			image.set_attr("src", new_name.as_str());
			if !self.media_files.contains(&new_name) {
				self.media_files.push(new_name.clone());
			}

			assets.push(MediaAsset { original_reference: reference, source_path, new_name });
		}

		Ok(assets)
	}

	/// Every copied file name, each once, in the order first copied
	pub fn media_files(&self) -> &[String] { &self.media_files }

	/// References that could not be found in the media folder
	pub fn unresolved(&self) -> &[String] { &self.unresolved }
}
