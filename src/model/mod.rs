//! The aggregation model: a mutable draft filled in by the scan phases and
//! frozen into an immutable [`Letter`] at the join point.

/// Element descriptors consumed from the external analyzer.
pub mod descriptor;
/// Navigable document outline.
pub mod outline;
/// Flat element collections.
pub mod registry;
/// Super/subtype wiring.
pub mod relationship;
/// Example-snippet registry.
pub mod samples;

use std::sync::Arc;

pub use self::descriptor::{
	AncestorSet, MemberDescriptor, Region, SectionDescriptor, SymbolId, TypeDescriptor,
};
pub use self::outline::{DocNode, build_document_tree};
pub use self::registry::Registry;
pub use self::relationship::{SubtypeIndex, build_type_relationships};
pub use self::samples::{Doodle, SampleRegistry};
use crate::host::Hosting;

/// Configured metadata attached to the aggregate, supplied by the build
/// configuration rather than derived from scanning.
#[derive(Clone)]
pub struct LetterMeta {
	/// Site title.
	pub title: String,
	/// Short site description.
	pub description: String,
	/// Character encoding declared on every generated page.
	pub charset: String,
	/// Resolved hosting authority, when a repository URI was configured.
	pub authority: Option<Arc<dyn Hosting>>,
}

impl Default for LetterMeta {
	fn default() -> Self {
		Self {
			title: String::new(),
			description: String::new(),
			charset: "utf-8".to_string(),
			authority: None,
		}
	}
}

/// Mutable accumulator for one build invocation.
///
/// The scan phases receive the draft's collections explicitly (no ambient
/// build slot); at the join point the orchestrator calls [`LetterDraft::finish`]
/// to wire relationships, build the outline, sort, and freeze the result.
#[derive(Default)]
pub struct LetterDraft {
	/// Flat element collections filled by the API scan.
	pub registry: Registry,
	/// Manual documents discovered by the document scan, newest first.
	pub documents: Vec<TypeDescriptor>,
	/// Example snippets discovered by the document scan.
	pub samples: SampleRegistry,
}

impl LetterDraft {
	/// Create an empty draft.
	pub fn new() -> Self {
		Self::default()
	}

	/// Prepend a manual document, keeping the newest discovery first.
	pub fn register_document(&mut self, info: TypeDescriptor) {
		self.documents.insert(0, info);
	}

	/// Wire relationships, build the outline, sort the flat collections and
	/// freeze the aggregate.
	pub fn finish(mut self, meta: LetterMeta) -> Letter {
		let subtypes = build_type_relationships(&self.registry.types);
		let docs = build_document_tree(&self.documents);
		self.registry.finalize();

		Letter {
			registry: self.registry,
			documents: self.documents,
			docs,
			subtypes,
			samples: self.samples,
			meta,
		}
	}
}

/// The completed aggregate: one consistent, cross-referenced model of the
/// scanned codebase, read-only after the build's join point.
pub struct Letter {
	registry: Registry,
	documents: Vec<TypeDescriptor>,
	docs: Vec<DocNode>,
	subtypes: SubtypeIndex,
	samples: SampleRegistry,
	meta: LetterMeta,
}

impl Letter {
	/// Site title.
	pub fn title(&self) -> &str {
		&self.meta.title
	}

	/// Short site description.
	pub fn description(&self) -> &str {
		&self.meta.description
	}

	/// Character encoding declared on generated pages.
	pub fn charset(&self) -> &str {
		&self.meta.charset
	}

	/// The resolved hosting authority, if any.
	pub fn authority(&self) -> Option<&Arc<dyn Hosting>> {
		self.meta.authority.as_ref()
	}

	/// Declared module names, sorted.
	pub fn modules(&self) -> &[String] {
		&self.registry.modules
	}

	/// Discovered package names, sorted.
	pub fn packages(&self) -> &[String] {
		&self.registry.packages
	}

	/// Discovered type descriptors, sorted by identifier.
	pub fn types(&self) -> &[TypeDescriptor] {
		&self.registry.types
	}

	/// Manual documents, newest discovery first.
	pub fn documents(&self) -> &[TypeDescriptor] {
		&self.documents
	}

	/// The navigable document outline.
	pub fn docs(&self) -> &[DocNode] {
		&self.docs
	}

	/// The root outline node, when any manual document exists.
	pub fn doc(&self) -> Option<&DocNode> {
		self.docs.first()
	}

	/// The primary API entry point, when any type was discovered.
	pub fn api(&self) -> Option<&TypeDescriptor> {
		self.registry.types.first()
	}

	/// Subtypes recorded for the given symbol.
	pub fn subtypes_of(&self, symbol: &SymbolId) -> &[SymbolId] {
		self.subtypes.subtypes_of(symbol)
	}

	/// Example snippets registered under `classID#memberID`.
	pub fn doodle(&self, id: &str) -> Vec<Doodle> {
		self.samples.lookup(id)
	}
}
