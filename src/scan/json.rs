//! Analyzer adapter that replays serialized element streams.
//!
//! External analysis tools can dump their discoveries as JSON index files
//! (one file per compilation unit, carrying module/package/type arrays).
//! This adapter replays those files through the standard callback contract,
//! which makes the binary usable end-to-end without linking the front end
//! into this process.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::analyzer::{Analyzer, ElementSink, ScanRequest};
use crate::error::Result;
use crate::model::TypeDescriptor;

/// Serialized element stream of one analyzed unit.
#[derive(Debug, Default, Deserialize)]
struct ElementFile {
	#[serde(default)]
	modules: Vec<String>,
	#[serde(default)]
	packages: Vec<String>,
	#[serde(default)]
	types: Vec<TypeDescriptor>,
}

/// Analyzer that reads `.json` element dumps from the scan roots.
#[derive(Debug, Default)]
pub struct JsonAnalyzer;

impl JsonAnalyzer {
	/// Create the adapter.
	pub fn new() -> Self {
		Self
	}

	fn collect(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
		for entry in fs::read_dir(dir)? {
			let path = entry?.path();
			if path.is_dir() {
				Self::collect(&path, out)?;
			} else if path.extension().is_some_and(|ext| ext == "json") {
				out.push(path);
			}
		}
		Ok(())
	}
}

impl Analyzer for JsonAnalyzer {
	fn list_files(&self, roots: &[PathBuf]) -> Result<Vec<PathBuf>> {
		let mut files = Vec::new();
		for root in roots {
			if root.is_dir() {
				Self::collect(root, &mut files)?;
			}
		}
		// Directory iteration order is platform dependent.
		files.sort();
		Ok(files)
	}

	fn analyze(&self, request: &ScanRequest, sink: &mut dyn ElementSink) -> Result<()> {
		let files = if request.files.is_empty() {
			self.list_files(&request.sources)?
		} else {
			request.files.clone()
		};

		for file in &files {
			let text = fs::read_to_string(file)?;
			let parsed: ElementFile = serde_json::from_str(&text)?;

			for module in &parsed.modules {
				sink.on_module(module);
			}
			for package in &parsed.packages {
				sink.on_package(package);
			}
			for descriptor in parsed.types {
				sink.on_type(descriptor);
			}
		}

		sink.on_complete();
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;

	use pretty_assertions::assert_eq;

	use super::*;
	use crate::scan::analyzer::ScanKind;

	#[derive(Default)]
	struct Collected {
		modules: Vec<String>,
		packages: Vec<String>,
		types: Vec<String>,
		completed: bool,
	}

	impl ElementSink for Collected {
		fn on_module(&mut self, name: &str) {
			self.modules.push(name.to_string());
		}

		fn on_package(&mut self, name: &str) {
			self.packages.push(name.to_string());
		}

		fn on_type(&mut self, descriptor: TypeDescriptor) {
			self.types.push(descriptor.id);
		}

		fn on_complete(&mut self) {
			self.completed = true;
		}
	}

	#[test]
	fn replays_element_files_and_signals_completion() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(
			dir.path().join("widget.json"),
			r#"{
				"packages": ["sample"],
				"types": [{"id": "Widget", "package": "sample", "symbol": "sample.Widget"}]
			}"#,
		)
		.unwrap();
		fs::write(
			dir.path().join("module.json"),
			r#"{"modules": ["sample.core"]}"#,
		)
		.unwrap();

		let analyzer = JsonAnalyzer::new();
		let request = ScanRequest {
			kind: ScanKind::Api,
			sources: vec![dir.path().to_path_buf()],
			classpath: Vec::new(),
			output: None,
			files: Vec::new(),
			charset: "utf-8".to_string(),
			externals: HashMap::new(),
			internals: Vec::new(),
		};

		let mut sink = Collected::default();
		analyzer.analyze(&request, &mut sink).unwrap();

		assert_eq!(sink.modules, vec!["sample.core"]);
		assert_eq!(sink.packages, vec!["sample"]);
		assert_eq!(sink.types, vec!["Widget"]);
		assert!(sink.completed);
	}

	#[test]
	fn list_files_finds_nested_json_only() {
		let dir = tempfile::tempdir().unwrap();
		fs::create_dir_all(dir.path().join("nested")).unwrap();
		fs::write(dir.path().join("nested/a.json"), "{}").unwrap();
		fs::write(dir.path().join("b.txt"), "ignored").unwrap();

		let files = JsonAnalyzer::new()
			.list_files(&[dir.path().to_path_buf()])
			.unwrap();
		assert_eq!(files.len(), 1);
		assert!(files[0].ends_with("nested/a.json"));
	}
}
