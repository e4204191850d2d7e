//! Shared fixtures for the integration tests.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use letterpress::error::Result;
use letterpress::scan::analyzer::{Analyzer, ElementSink, ScanKind, ScanRequest};
use letterpress::scan::diagnostics::{Diagnostic, DiagnosticListener};
use letterpress::{LetterpressError, TypeDescriptor};

/// Analyzer double replaying canned elements per scan phase.
#[derive(Default)]
pub struct StubAnalyzer {
	pub files: Vec<PathBuf>,
	pub document_types: Vec<TypeDescriptor>,
	pub api_modules: Vec<String>,
	pub api_packages: Vec<String>,
	pub api_types: Vec<TypeDescriptor>,
	pub fail: Option<ScanKind>,
}

impl Analyzer for StubAnalyzer {
	fn list_files(&self, _roots: &[PathBuf]) -> Result<Vec<PathBuf>> {
		Ok(self.files.clone())
	}

	fn analyze(&self, request: &ScanRequest, sink: &mut dyn ElementSink) -> Result<()> {
		if self.fail == Some(request.kind) {
			return Err(LetterpressError::Scan {
				code: "stub",
				message: "canned failure".to_string(),
			});
		}
		match request.kind {
			ScanKind::Documents => {
				for descriptor in &self.document_types {
					sink.on_type(descriptor.clone());
				}
			}
			ScanKind::Api => {
				for module in &self.api_modules {
					sink.on_module(module);
				}
				for package in &self.api_packages {
					sink.on_package(package);
				}
				for descriptor in &self.api_types {
					sink.on_type(descriptor.clone());
				}
			}
		}
		sink.on_complete();
		Ok(())
	}
}

/// A listener that records every diagnostic for later assertions.
#[allow(dead_code)]
pub fn collecting_listener() -> (DiagnosticListener, Arc<Mutex<Vec<Diagnostic>>>) {
	let collected = Arc::new(Mutex::new(Vec::new()));
	let sink = Arc::clone(&collected);
	let listener: DiagnosticListener = Arc::new(move |diagnostic: &Diagnostic| {
		sink.lock().unwrap().push(diagnostic.clone());
	});
	(listener, collected)
}

/// A plain public descriptor with no members.
#[allow(dead_code)]
pub fn descriptor(id: &str, package: &str) -> TypeDescriptor {
	serde_json::from_str(&format!(
		r#"{{"id": "{id}", "package": "{package}", "symbol": "{package}.{id}"}}"#
	))
	.unwrap()
}
