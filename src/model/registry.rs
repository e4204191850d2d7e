//! Flat element collections discovered during a scan.

use super::descriptor::TypeDescriptor;

/// Flat registry of modules, packages and types discovered during a scan.
///
/// All collections are append-only while scanning. Packages are deduplicated
/// on registration, preserving first-seen order; a single sorting pass runs
/// once the whole build's aggregation is complete.
#[derive(Debug, Default)]
pub struct Registry {
	/// Declared module names, in discovery order until [`Registry::finalize`].
	pub modules: Vec<String>,
	/// Package names, deduplicated, first-seen order until finalization.
	pub packages: Vec<String>,
	/// Discovered type descriptors, in registration order until finalization.
	pub types: Vec<TypeDescriptor>,
}

impl Registry {
	/// Create an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a discovered type, recording its package on first sight.
	///
	/// Types are not deduplicated; the upstream analyzer delivers each type
	/// at most once per scan by contract.
	pub fn register(&mut self, descriptor: TypeDescriptor) {
		if !self.packages.contains(&descriptor.package) {
			self.packages.push(descriptor.package.clone());
		}
		self.types.push(descriptor);
	}

	/// Record a declared module name.
	pub fn register_module(&mut self, name: &str) {
		self.modules.push(name.to_string());
	}

	/// Record a package name, ignoring duplicates.
	pub fn register_package(&mut self, name: &str) {
		if !self.packages.iter().any(|p| p == name) {
			self.packages.push(name.to_string());
		}
	}

	/// Sort modules, packages and types into natural order.
	///
	/// Runs exactly once, at the very end of the build, after both scan
	/// phases have joined and relationships are wired.
	pub fn finalize(&mut self) {
		self.modules.sort();
		self.packages.sort();
		self.types.sort_by(|a, b| a.id.cmp(&b.id));
	}
}
