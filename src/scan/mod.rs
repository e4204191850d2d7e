//! Scan orchestration: two concurrent analyzer phases joined into one model.
//!
//! The document phase collects manual pages and example snippets from
//! auxiliary sources; the API phase registers every discovered type. Both
//! run as independent units of work against the external analyzer; the
//! orchestrator blocks on the join, then wires relationships and the
//! outline synchronously and freezes the aggregate.

/// The collaborator boundary to the external analyzer.
pub mod analyzer;
/// Build progress reporting.
pub mod diagnostics;
/// Analyzer adapter over serialized element streams.
pub mod json;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;

use self::analyzer::{Analyzer, ElementSink, ScanKind, ScanRequest};
use self::diagnostics::{Diagnostic, DiagnosticListener};
use crate::config::BuildConfig;
use crate::error::{LetterpressError, Result};
use crate::host::fetch_with_retry;
use crate::model::{Doodle, Letter, LetterDraft, LetterMeta, Registry, SampleRegistry, TypeDescriptor};

/// File-stem suffix marking a manual document source.
const MANUAL_SUFFIX: &str = "Manual";

/// File-stem suffix marking a sample (test) source.
const SAMPLE_SUFFIX: &str = "Test";

/// Retry budget for external documentation index fetches.
const EXTERNAL_DOC_ATTEMPTS: u32 = 20;

/// Fixed backoff between external documentation fetch attempts.
const EXTERNAL_DOC_BACKOFF: Duration = Duration::from_millis(200);

static MANUAL_NAME: Lazy<Regex> =
	Lazy::new(|| Regex::new("(.*)Manual$").unwrap_or_else(|err| panic!("{err}")));

/// Run both scan phases against `analyzer` and freeze the completed model.
///
/// The document phase is skipped entirely when no document roots are
/// configured. The first failing phase aborts the build; already-dispatched
/// work in the other phase is left to finish and its results are dropped.
pub fn scan(config: &BuildConfig, analyzer: &dyn Analyzer) -> Result<Letter> {
	let externals = resolve_external_docs(&config.external_docs, &config.listener);
	let internals = collect_internal_packages(&config.sources);

	let (doc, api) = thread::scope(|scope| -> Result<(DocSink, Registry)> {
		let doc_task = (!config.documents.is_empty())
			.then(|| scope.spawn(|| run_document_phase(config, analyzer, &externals, &internals)));
		let api_task = scope.spawn(|| run_api_phase(config, analyzer, &externals, &internals));

		let doc = match doc_task {
			Some(handle) => join_phase(handle, "doc")?,
			None => DocSink::default(),
		};
		let api = join_phase(api_task, "api")?;
		Ok((doc, api))
	})?;

	let mut draft = LetterDraft::new();
	draft.registry = api;
	draft.documents = doc.documents;
	draft.samples = doc.samples;

	Ok(draft.finish(LetterMeta {
		title: config.title.clone(),
		description: config.description.clone(),
		charset: config.charset.clone(),
		authority: config.authority.clone(),
	}))
}

fn join_phase<T>(
	handle: thread::ScopedJoinHandle<'_, Result<T>>,
	code: &'static str,
) -> Result<T> {
	handle.join().map_err(|_| LetterpressError::Scan {
		code,
		message: "scan task panicked".to_string(),
	})?
}

fn report(listener: &DiagnosticListener, diagnostic: Diagnostic) {
	(listener)(&diagnostic);
}

/// Document/sample phase: filters candidate files to manual- or test-marked
/// stems under a configured document root, then feeds discoveries into the
/// document list and sample registry.
fn run_document_phase(
	config: &BuildConfig,
	analyzer: &dyn Analyzer,
	externals: &HashMap<String, String>,
	internals: &[String],
) -> Result<DocSink> {
	let mut roots = config.documents.clone();
	roots.extend(config.sources.iter().cloned());

	let files: Vec<PathBuf> = analyzer
		.list_files(&roots)?
		.into_iter()
		.filter(|file| is_document_candidate(file, &config.documents))
		.collect();

	if files.is_empty() {
		report(
			&config.listener,
			Diagnostic::note("doc", "No manual or sample sources found."),
		);
		return Ok(DocSink::default());
	}

	let request = ScanRequest {
		kind: ScanKind::Documents,
		sources: roots,
		classpath: config.classpath.clone(),
		output: None,
		files,
		charset: config.charset.clone(),
		externals: externals.clone(),
		internals: internals.to_vec(),
	};

	let mut sink = DocSink::default();
	match analyzer.analyze(&request, &mut sink) {
		Ok(()) => {
			report(
				&config.listener,
				Diagnostic::note("doc", "Succeeded in scanning manual and sample sources."),
			);
			Ok(sink)
		}
		Err(err) => {
			let message = format!("Failed to scan manual and sample sources: {err}");
			report(&config.listener, Diagnostic::error("doc", message.clone()));
			Err(LetterpressError::Scan {
				code: "doc",
				message,
			})
		}
	}
}

/// API phase: registers every element the analyzer discovers under the
/// primary source roots and classpath entries.
fn run_api_phase(
	config: &BuildConfig,
	analyzer: &dyn Analyzer,
	externals: &HashMap<String, String>,
	internals: &[String],
) -> Result<Registry> {
	let request = ScanRequest {
		kind: ScanKind::Api,
		sources: config.sources.clone(),
		classpath: config.classpath.clone(),
		output: Some(config.address.clone()),
		files: Vec::new(),
		charset: config.charset.clone(),
		externals: externals.clone(),
		internals: internals.to_vec(),
	};

	let mut sink = ApiSink::default();
	match analyzer.analyze(&request, &mut sink) {
		Ok(()) => {
			report(
				&config.listener,
				Diagnostic::note("api", "Succeeded in scanning API sources."),
			);
			Ok(sink.registry)
		}
		Err(err) => {
			let message = format!("Failed to scan API sources: {err}");
			report(&config.listener, Diagnostic::error("api", message.clone()));
			Err(LetterpressError::Scan {
				code: "api",
				message,
			})
		}
	}
}

fn is_document_candidate(file: &Path, documents: &[PathBuf]) -> bool {
	if !documents.iter().any(|root| file.starts_with(root)) {
		return false;
	}
	file.file_stem()
		.and_then(|stem| stem.to_str())
		.is_some_and(|stem| stem.ends_with(MANUAL_SUFFIX) || stem.ends_with(SAMPLE_SUFFIX))
}

/// Derive internal package names from the directory structure under each
/// source root. Unreadable roots are skipped.
fn collect_internal_packages(sources: &[PathBuf]) -> Vec<String> {
	let mut packages = Vec::new();
	for root in sources {
		walk_packages(root, root, &mut packages);
	}
	packages
}

fn walk_packages(root: &Path, dir: &Path, packages: &mut Vec<String>) {
	let Ok(entries) = fs::read_dir(dir) else {
		return;
	};
	for entry in entries.flatten() {
		let path = entry.path();
		if !path.is_dir() {
			continue;
		}
		if let Ok(relative) = path.strip_prefix(root) {
			let name = relative
				.components()
				.map(|c| c.as_os_str().to_string_lossy())
				.collect::<Vec<_>>()
				.join(".");
			if !name.is_empty() && !packages.contains(&name) {
				packages.push(name);
			}
		}
		walk_packages(root, &path, packages);
	}
}

/// Resolve external documentation link indexes into package-to-URL mappings.
///
/// Each candidate URL's package index is fetched with a bounded, fixed
/// backoff retry; exhausting the budget omits that one source and reports a
/// note, never a failure.
fn resolve_external_docs(
	urls: &[String],
	listener: &DiagnosticListener,
) -> HashMap<String, String> {
	static PACKAGE_LINK: Lazy<Regex> = Lazy::new(|| {
		Regex::new("<a[^>]*>([A-Za-z_][A-Za-z0-9_.]*)</a>").unwrap_or_else(|err| panic!("{err}"))
	});

	let mut externals = HashMap::new();
	for url in urls {
		if !url.starts_with("http") || !url.ends_with("/api/") {
			continue;
		}
		let index = format!("{url}overview-tree.html");
		match fetch_with_retry(&index, EXTERNAL_DOC_ATTEMPTS, EXTERNAL_DOC_BACKOFF) {
			Ok(body) => {
				for capture in PACKAGE_LINK.captures_iter(&body) {
					externals.insert(capture[1].to_string(), url.clone());
				}
			}
			Err(err) => {
				report(
					listener,
					Diagnostic::note("extern", format!("Omitting external docs at {url}: {err}")),
				);
			}
		}
	}
	externals
}

/// Sink for the document phase: manual documents are prepended (newest
/// first); every other type contributes example snippets through its
/// members' cross-reference tags.
#[derive(Default)]
pub(crate) struct DocSink {
	pub(crate) documents: Vec<TypeDescriptor>,
	pub(crate) samples: SampleRegistry,
}

impl ElementSink for DocSink {
	fn on_module(&mut self, _name: &str) {}

	fn on_package(&mut self, _name: &str) {}

	fn on_type(&mut self, descriptor: TypeDescriptor) {
		if MANUAL_NAME.is_match(&descriptor.id) && descriptor.public {
			self.documents.insert(0, descriptor);
			return;
		}

		for member in &descriptor.members {
			if member.refs.is_empty() {
				continue;
			}
			let code = member.source.clone().unwrap_or_default();
			for reference in &member.refs {
				let (class_id, member_id) = descriptor.identify(reference);
				let mut doodle = Doodle::new(class_id, member_id, code.clone());
				if let Some(comment) = &member.comment {
					doodle = doodle.with_comment(comment.clone());
				}
				self.samples.register(doodle);
			}
		}
	}
}

/// Sink for the API phase: every discovered element lands in the registry.
#[derive(Default)]
struct ApiSink {
	registry: Registry,
}

impl ElementSink for ApiSink {
	fn on_module(&mut self, name: &str) {
		self.registry.register_module(name);
	}

	fn on_package(&mut self, name: &str) {
		self.registry.register_package(name);
	}

	fn on_type(&mut self, descriptor: TypeDescriptor) {
		self.registry.register(descriptor);
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::model::{AncestorSet, MemberDescriptor, SymbolId};

	fn descriptor(id: &str, public: bool, members: Vec<MemberDescriptor>) -> TypeDescriptor {
		TypeDescriptor {
			id: id.to_string(),
			package: "sample".to_string(),
			symbol: SymbolId::new(id),
			ancestors: AncestorSet::default(),
			members,
			comment: None,
			title: None,
			public,
			sections: Vec::new(),
			region: None,
		}
	}

	#[test]
	fn manual_documents_are_prepended() {
		let mut sink = DocSink::default();
		sink.on_type(descriptor("SetupManual", true, Vec::new()));
		sink.on_type(descriptor("GuideManual", true, Vec::new()));

		let ids: Vec<&str> = sink.documents.iter().map(|d| d.id.as_str()).collect();
		assert_eq!(ids, vec!["GuideManual", "SetupManual"]);
	}

	#[test]
	fn private_manuals_are_not_documents() {
		let mut sink = DocSink::default();
		sink.on_type(descriptor("HiddenManual", false, Vec::new()));
		assert!(sink.documents.is_empty());
	}

	#[test]
	fn cross_references_become_doodles() {
		let member = MemberDescriptor {
			name: "spins".to_string(),
			refs: vec!["Widget#spin".to_string(), "Gadget".to_string()],
			source: Some("widget.spin();".to_string()),
			comment: Some("Demonstrates spinning.".to_string()),
			region: None,
		};
		let mut sink = DocSink::default();
		sink.on_type(descriptor("WidgetTest", true, vec![member]));

		let spins = sink.samples.lookup("Widget#spin");
		assert_eq!(spins.len(), 1);
		assert_eq!(spins[0].code, "widget.spin();");
		assert_eq!(spins[0].comment.as_deref(), Some("Demonstrates spinning."));
		assert_eq!(sink.samples.lookup("Gadget#").len(), 1);
	}

	#[test]
	fn document_candidates_require_root_and_suffix() {
		let docs = vec![PathBuf::from("/project/docs")];
		assert!(is_document_candidate(
			Path::new("/project/docs/GuideManual.json"),
			&docs
		));
		assert!(is_document_candidate(
			Path::new("/project/docs/WidgetTest.json"),
			&docs
		));
		assert!(!is_document_candidate(
			Path::new("/project/docs/Readme.json"),
			&docs
		));
		assert!(!is_document_candidate(
			Path::new("/project/src/GuideManual.json"),
			&docs
		));
	}

	#[test]
	fn internal_packages_follow_directory_structure() {
		let dir = tempfile::tempdir().unwrap();
		fs::create_dir_all(dir.path().join("alpha/beta")).unwrap();
		let packages = collect_internal_packages(&[dir.path().to_path_buf()]);
		assert!(packages.contains(&"alpha".to_string()));
		assert!(packages.contains(&"alpha.beta".to_string()));
	}
}
