use std::{io::{self, BufRead, Write}, path::PathBuf};

use tracing::debug;

/// Source of the export folder to convert. `None` means the user cancelled.
pub trait FolderPicker {
	fn pick(&mut self) -> Option<PathBuf>;
}

/// A folder that is already known, e.g. from the command line
impl FolderPicker for Option<PathBuf> {
	fn pick(&mut self) -> Option<PathBuf> { self.take() }
}

/// Asks for a folder on a line-based terminal. An empty answer cancels.
pub struct PromptPicker<R, W> {
	input:  R,
	output: W,
}

impl<R: BufRead, W: Write> PromptPicker<R, W> {
	pub fn new(input: R, output: W) -> Self { Self { input, output } }
}

impl PromptPicker<io::StdinLock<'static>, io::Stderr> {
	pub fn terminal() -> Self { Self::new(io::stdin().lock(), io::stderr()) }
}

impl<R: BufRead, W: Write> FolderPicker for PromptPicker<R, W> {
	fn pick(&mut self) -> Option<PathBuf> {
		write!(self.output, "Select Notion HTML export folder: ").ok()?;
		self.output.flush().ok()?;

		let mut line = String::new();
		self.input.read_line(&mut line).ok()?;

		// Terminals quote dropped paths that contain spaces
		let answer = line.trim().trim_matches(|c: char| c == '"' || c == '\'');
		debug!("Folder prompt answered with {:?}", answer);
		(!answer.is_empty()).then(|| PathBuf::from(answer))
	}
}
