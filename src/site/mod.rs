//! Site materialization: turning the frozen aggregate into files on disk.
//!
//! Output ordering is the consistency mechanism here. The target directory
//! is cleaned first, assets and content pages are written next, and the
//! entry page goes down strictly last: any observer polling the entry page
//! sees either the old complete site or the new complete site.

/// Static assets and the stylesheet compiler.
pub mod assets;
/// Page identities and rendering.
pub mod pages;

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use glob::Pattern;

pub use self::assets::{StyleScheme, compile_stylesheet};
pub use self::pages::{HtmlRenderer, Page, PageRenderer, escape_html};
use crate::error::{LetterpressError, Result};
use crate::host::fetch_with_retry;
use crate::model::Letter;
use crate::scan::diagnostics::{Diagnostic, DiagnosticListener, silent_listener};

/// Pause after cleaning, letting file watchers settle before new writes.
const SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Retry budget for the optional changelog fetch.
const CHANGELOG_ATTEMPTS: u32 = 3;

const CHANGELOG_BACKOFF: Duration = Duration::from_millis(200);

/// Writes a complete site under one target directory.
pub struct SiteMaterializer {
	root: PathBuf,
	protected: Vec<Pattern>,
	scheme: StyleScheme,
	listener: DiagnosticListener,
}

impl SiteMaterializer {
	/// Create a materializer for `root`. Nothing is written until
	/// [`SiteMaterializer::materialize`] runs.
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self {
			root: root.into(),
			protected: Vec::new(),
			scheme: StyleScheme::default(),
			listener: silent_listener(),
		}
	}

	/// Protect paths matching `pattern` from the pre-write clean.
	pub fn guard(mut self, pattern: &str) -> Result<Self> {
		let compiled = Pattern::new(pattern)
			.map_err(|err| LetterpressError::Scan {
				code: "site",
				message: format!("Invalid guard pattern {pattern}: {err}"),
			})?;
		self.protected.push(compiled);
		Ok(self)
	}

	/// Report progress through `listener`.
	pub fn with_listener(mut self, listener: DiagnosticListener) -> Self {
		self.listener = listener;
		self
	}

	/// Restyle the generated stylesheet.
	pub fn with_scheme(mut self, scheme: StyleScheme) -> Self {
		self.scheme = scheme;
		self
	}

	/// Remove previous output from the target directory.
	///
	/// Dotfiles and anything matching a guard pattern survive, at any depth;
	/// directories are kept only while something inside them survives. A
	/// missing target directory is not an error; it is created on write.
	pub fn clean(&self) -> Result<()> {
		match self.clean_dir(&self.root) {
			Ok(_) => Ok(()),
			Err(LetterpressError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
			Err(err) => Err(err),
		}
	}

	/// Returns whether any entry under `dir` survived.
	fn clean_dir(&self, dir: &Path) -> Result<bool> {
		let mut kept = false;
		for entry in fs::read_dir(dir)? {
			let path = entry?.path();
			if self.is_protected(&path) {
				kept = true;
				continue;
			}
			if path.is_dir() {
				if self.clean_dir(&path)? {
					kept = true;
				} else {
					fs::remove_dir(&path)?;
				}
			} else {
				fs::remove_file(&path)?;
			}
		}
		Ok(kept)
	}

	fn is_protected(&self, path: &Path) -> bool {
		let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
			return true;
		};
		if name.starts_with('.') {
			return true;
		}
		// Patterns match the path relative to the site root, not bare names.
		let Ok(relative) = path.strip_prefix(&self.root) else {
			return true;
		};
		self.protected
			.iter()
			.any(|pattern| pattern.matches_path(relative))
	}

	/// Materialize the complete site for `letter`, entry page last.
	pub fn materialize(&self, letter: &Letter, renderer: &dyn PageRenderer) -> Result<()> {
		self.clean()?;
		thread::sleep(SETTLE_DELAY);

		self.write("main.css", compile_stylesheet(&self.scheme).as_bytes())?;
		self.write("main.js", assets::MAIN_JS.as_bytes())?;
		self.write("mimic.js", assets::MIMIC_JS.as_bytes())?;
		self.write("highlight.js", assets::HIGHLIGHT_JS.as_bytes())?;
		self.write("main.svg", assets::MAIN_SVG.as_bytes())?;

		for descriptor in letter.types() {
			let page = Page::Api {
				id: descriptor.id.clone(),
			};
			self.write(&page.path(), renderer.render(letter, &page)?.as_bytes())?;
		}
		for descriptor in letter.documents() {
			let page = Page::Document {
				id: descriptor.id.clone(),
			};
			self.write(&page.path(), renderer.render(letter, &page)?.as_bytes())?;
		}

		self.write(
			&Page::OnePager.path(),
			renderer.render(letter, &Page::OnePager)?.as_bytes(),
		)?;
		self.write_activity(letter, renderer)?;

		// Strictly last: the entry page is the completion marker.
		self.write(
			&Page::Landing.path(),
			renderer.render(letter, &Page::Landing)?.as_bytes(),
		)?;
		Ok(())
	}

	/// Write the changelog page when a hosting authority resolves one.
	///
	/// The changelog text comes over the network; a failed fetch omits the
	/// page entirely rather than failing the build.
	fn write_activity(&self, letter: &Letter, renderer: &dyn PageRenderer) -> Result<()> {
		let Some(authority) = letter.authority() else {
			return Ok(());
		};

		let text = match fetch_with_retry(
			&authority.locate_changelog(),
			CHANGELOG_ATTEMPTS,
			CHANGELOG_BACKOFF,
		) {
			Ok(text) => text,
			Err(err) => {
				self.report(Diagnostic::note(
					"site",
					format!("Omitting changelog page: {err}"),
				));
				return Ok(());
			}
		};

		let mut sections = String::new();
		for section in authority.changelog(&text) {
			append_section(&section, 2, &mut sections);
		}
		let html = renderer.render(letter, &Page::Activity)?.replace(
			"<div class=\"activity\">\n",
			&format!("<div class=\"activity\">\n{sections}"),
		);
		self.write(&Page::Activity.path(), html.as_bytes())
	}

	fn write(&self, relative: &str, data: &[u8]) -> Result<()> {
		let path = self.root.join(relative);
		if let Some(parent) = path.parent() {
			fs::create_dir_all(parent)?;
		}
		fs::write(&path, data)?;
		self.report(Diagnostic::note("site", format!("Wrote {relative}")));
		Ok(())
	}

	fn report(&self, diagnostic: Diagnostic) {
		(self.listener)(&diagnostic);
	}
}

fn append_section(section: &crate::host::ChangelogSection, level: usize, out: &mut String) {
	let level = level.min(6);
	out.push_str(&format!(
		"<h{level}>{}</h{level}>\n",
		escape_html(&section.title)
	));
	for line in &section.body {
		out.push_str(&format!("<p>{}</p>\n", escape_html(line)));
	}
	for child in &section.children {
		append_section(child, level + 1, out);
	}
}
