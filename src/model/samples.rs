//! Example-snippet registry keyed by `class#member` identifiers.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};

/// A unit of example code associated with a specific API member, discovered
/// via a cross-reference tag on an auxiliary test or manual source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doodle {
	/// Identifier of the referenced type.
	pub class_id: String,
	/// Identifier of the referenced member, possibly empty for type-level
	/// references.
	pub member_id: String,
	/// Raw example code text.
	pub code: String,
	/// Optional structured comment attached to the example.
	#[serde(default)]
	pub comment: Option<String>,
}

impl Doodle {
	/// Create an example snippet without a comment.
	pub fn new(
		class_id: impl Into<String>,
		member_id: impl Into<String>,
		code: impl Into<String>,
	) -> Self {
		Self {
			class_id: class_id.into(),
			member_id: member_id.into(),
			code: code.into(),
			comment: None,
		}
	}

	/// Attach a structured comment to the example.
	pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
		self.comment = Some(comment.into());
		self
	}

	/// The snippet key, `classID#memberID`.
	pub fn id(&self) -> String {
		format!("{}#{}", self.class_id, self.member_id)
	}
}

/// Accumulates example snippets keyed by their identifier.
///
/// Registration happens from the document-scan callbacks; lookups happen
/// later, potentially from several page-rendering workers at once. The lock
/// lives inside the registry so callers need no external synchronization.
#[derive(Debug, Default)]
pub struct SampleRegistry {
	doodles: RwLock<HashMap<String, Vec<Doodle>>>,
}

impl SampleRegistry {
	/// Create an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Append a snippet under its identifier, creating the list on first use.
	pub fn register(&self, doodle: Doodle) {
		let mut doodles = self
			.doodles
			.write()
			.unwrap_or_else(PoisonError::into_inner);
		doodles.entry(doodle.id()).or_default().push(doodle);
	}

	/// Snippets registered under the identifier, in discovery order.
	///
	/// Returns an empty list for unknown identifiers, never an error.
	pub fn lookup(&self, id: &str) -> Vec<Doodle> {
		let doodles = self.doodles.read().unwrap_or_else(PoisonError::into_inner);
		doodles.get(id).cloned().unwrap_or_default()
	}

	/// Number of distinct snippet identifiers.
	pub fn len(&self) -> usize {
		let doodles = self.doodles.read().unwrap_or_else(PoisonError::into_inner);
		doodles.len()
	}

	/// Whether no snippets were registered.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
