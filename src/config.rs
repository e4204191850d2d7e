//! Build configuration.
//!
//! [`Letterpress`] is the chainable entry point callers assemble; calling
//! [`Letterpress::write`] snapshots it into a frozen [`BuildConfig`], runs
//! both scan phases and materializes the site. Nothing observes the builder
//! after the snapshot, so reconfiguring between builds is safe.

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::Result;
use crate::host::{Hosting, ResponseCache, resolve};
use crate::model::Letter;
use crate::scan::analyzer::Analyzer;
use crate::scan::diagnostics::{
	Diagnostic, DiagnosticListener, silent_listener, stdout_listener,
};
use crate::scan::scan;
use crate::site::{HtmlRenderer, SiteMaterializer, StyleScheme};

/// Output names always spared from the pre-write clean. The entry page and
/// stylesheet must keep serving until their replacements are written.
const DEFAULT_GUARDS: [&str; 2] = ["index.html", "main.css"];

/// Chainable configuration for one documentation build.
pub struct Letterpress {
	title: String,
	address: PathBuf,
	description: String,
	charset: String,
	sources: Vec<PathBuf>,
	documents: Vec<PathBuf>,
	classpath: Vec<PathBuf>,
	host: Option<String>,
	external_docs: Vec<String>,
	listener: DiagnosticListener,
	scheme: StyleScheme,
	protected: Vec<String>,
}

impl Letterpress {
	/// Start a configuration with the site title and output directory.
	pub fn new(title: impl Into<String>, address: impl Into<PathBuf>) -> Self {
		Self {
			title: title.into(),
			address: address.into(),
			description: String::new(),
			charset: "utf-8".to_string(),
			sources: Vec::new(),
			documents: Vec::new(),
			classpath: Vec::new(),
			host: None,
			external_docs: Vec::new(),
			listener: stdout_listener(),
			scheme: StyleScheme::default(),
			protected: Vec::new(),
		}
	}

	/// Set the short site description.
	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = description.into();
		self
	}

	/// Set the character encoding of the source files and generated pages.
	pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
		self.charset = charset.into();
		self
	}

	/// Add a primary source root for the API scan.
	pub fn with_source(mut self, root: impl Into<PathBuf>) -> Self {
		self.sources.push(root.into());
		self
	}

	/// Add a document root for the manual and sample scan.
	pub fn with_document(mut self, root: impl Into<PathBuf>) -> Self {
		self.documents.push(root.into());
		self
	}

	/// Add a classpath entry for symbol resolution.
	pub fn with_classpath(mut self, entry: impl Into<PathBuf>) -> Self {
		self.classpath.push(entry.into());
		self
	}

	/// Declare the repository URI to resolve a hosting authority from.
	pub fn with_host(mut self, uri: impl Into<String>) -> Self {
		self.host = Some(uri.into());
		self
	}

	/// Add an external documentation site to link foreign symbols against.
	pub fn use_external_doc(mut self, url: impl Into<String>) -> Self {
		self.external_docs.push(url.into());
		self
	}

	/// Report progress through `listener` instead of standard output.
	pub fn with_listener(mut self, listener: DiagnosticListener) -> Self {
		self.listener = listener;
		self
	}

	/// Discard progress reporting entirely.
	pub fn mute(mut self) -> Self {
		self.listener = silent_listener();
		self
	}

	/// Restyle the generated stylesheet.
	pub fn with_scheme(mut self, scheme: StyleScheme) -> Self {
		self.scheme = scheme;
		self
	}

	/// Protect output paths matching `pattern` from the pre-write clean.
	pub fn with_protected(mut self, pattern: impl Into<String>) -> Self {
		self.protected.push(pattern.into());
		self
	}

	/// Run the complete build: scan, aggregate, materialize.
	///
	/// Returns the frozen aggregate so callers can inspect what was built.
	pub fn write(&self, analyzer: &dyn Analyzer) -> Result<Letter> {
		let config = self.snapshot();
		let letter = scan(&config, analyzer)?;

		let mut materializer = SiteMaterializer::new(self.address.clone())
			.with_listener(self.listener.clone())
			.with_scheme(self.scheme.clone());
		for guard in DEFAULT_GUARDS {
			materializer = materializer.guard(guard)?;
		}
		for guard in &self.protected {
			materializer = materializer.guard(guard)?;
		}
		materializer.materialize(&letter, &HtmlRenderer::new())?;

		Ok(letter)
	}

	/// Freeze the builder into the immutable per-build configuration.
	///
	/// Host resolution happens here; an unreachable or unsupported service
	/// degrades to no authority with a note rather than failing the build.
	fn snapshot(&self) -> BuildConfig {
		let authority = self.host.as_ref().and_then(|uri| {
			match resolve(uri, ResponseCache::open()) {
				Ok(authority) => authority,
				Err(err) => {
					(self.listener)(&Diagnostic::note(
						"host",
						format!("Proceeding without hosting metadata: {err}"),
					));
					None
				}
			}
		});

		BuildConfig {
			title: self.title.clone(),
			address: self.address.clone(),
			description: self.description.clone(),
			charset: self.charset.clone(),
			sources: self.sources.clone(),
			documents: self.documents.clone(),
			classpath: self.classpath.clone(),
			external_docs: self.external_docs.clone(),
			listener: self.listener.clone(),
			authority,
		}
	}
}

/// Immutable configuration snapshot one build runs against.
///
/// Both scan phases read from the same snapshot, so mid-build reconfiguration
/// of the [`Letterpress`] builder cannot produce a torn view.
pub struct BuildConfig {
	/// Site title.
	pub title: String,
	/// Output directory.
	pub address: PathBuf,
	/// Short site description.
	pub description: String,
	/// Character encoding of sources and generated pages.
	pub charset: String,
	/// Primary source roots.
	pub sources: Vec<PathBuf>,
	/// Manual and sample document roots.
	pub documents: Vec<PathBuf>,
	/// Classpath entries for symbol resolution.
	pub classpath: Vec<PathBuf>,
	/// External documentation sites.
	pub external_docs: Vec<String>,
	/// Progress listener shared across phases.
	pub listener: DiagnosticListener,
	/// Resolved hosting authority, if any.
	pub authority: Option<Arc<dyn Hosting>>,
}
