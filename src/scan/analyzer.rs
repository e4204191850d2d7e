//! The collaborator boundary to the external source-analysis tool.
//!
//! The analyzer is an opaque producer: it walks declared source roots and
//! delivers one callback per discovered program element, strictly
//! sequentially within a run, followed by a completion callback. How source
//! text is parsed is outside this crate's scope.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::Result;
use crate::model::TypeDescriptor;

/// Which scan phase a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanKind {
	/// Manual/sample document scan.
	Documents,
	/// Primary API source scan.
	Api,
}

/// Parameters of one analyzer run.
#[derive(Debug, Clone)]
pub struct ScanRequest {
	/// Phase this run belongs to.
	pub kind: ScanKind,
	/// Source roots to analyze.
	pub sources: Vec<PathBuf>,
	/// Classpath entries available for symbol resolution.
	pub classpath: Vec<PathBuf>,
	/// Output root, declared so the analyzer never scans its own output.
	pub output: Option<PathBuf>,
	/// Explicit candidate files; empty means every file under the roots.
	pub files: Vec<PathBuf>,
	/// Character encoding of the source files.
	pub charset: String,
	/// Package name to external documentation URL mappings.
	pub externals: HashMap<String, String>,
	/// Package names internal to the scanned project.
	pub internals: Vec<String>,
}

/// Callback surface the analyzer drives while it discovers elements.
///
/// Within one run the analyzer invokes these strictly sequentially, one
/// element at a time, and finishes with [`ElementSink::on_complete`].
pub trait ElementSink {
	/// A declared module was discovered.
	fn on_module(&mut self, name: &str);

	/// A package was discovered.
	fn on_package(&mut self, name: &str);

	/// A type declaration was discovered.
	fn on_type(&mut self, descriptor: TypeDescriptor);

	/// All elements for this run were delivered.
	fn on_complete(&mut self) {}
}

/// The external source-analysis tool.
///
/// Implementations must be shareable across the two concurrent scan phases.
pub trait Analyzer: Sync {
	/// List candidate files under the given roots.
	fn list_files(&self, roots: &[PathBuf]) -> Result<Vec<PathBuf>>;

	/// Run an analysis pass, delivering every discovered element to `sink`.
	///
	/// A non-success result aborts the owning scan phase; finding zero
	/// matching elements is success.
	fn analyze(&self, request: &ScanRequest, sink: &mut dyn ElementSink) -> Result<()>;
}
