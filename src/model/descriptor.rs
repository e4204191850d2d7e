//! Element descriptors delivered by the external source analyzer.
//!
//! These shapes are the input half of the aggregation model: the analyzer
//! discovers program declarations and hands them over as [`TypeDescriptor`]
//! values. Everything beyond the fields consumed here is opaque to this
//! crate, so descriptors carry data only, no behavior tied to any particular
//! source language.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identity of an underlying program symbol, used only for lookup
/// when wiring type relationships.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolId(String);

impl SymbolId {
	/// Create a symbol identity from its analyzer-assigned key.
	pub fn new(key: impl Into<String>) -> Self {
		Self(key.into())
	}

	/// The raw identity key.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for SymbolId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for SymbolId {
	fn from(key: &str) -> Self {
		Self(key.to_string())
	}
}

/// A contiguous span of a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
	/// Path of the file, relative to its scan root.
	pub location: String,
	/// First line of the span (1-based).
	pub start_line: u32,
	/// Last line of the span (1-based, inclusive).
	pub end_line: u32,
}

/// Supertypes of a declaration, fully resolved up the chain by the analyzer.
///
/// The universal root supertype is excluded by contract. Superclasses keep
/// distance-first order (nearest ancestor first); interfaces are ordered
/// lexicographically by simple name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AncestorSet {
	/// Transitive superclasses, nearest first.
	#[serde(default)]
	pub superclasses: Vec<SymbolId>,
	/// Transitive interfaces, lexicographic by simple name.
	#[serde(default)]
	pub interfaces: Vec<SymbolId>,
}

impl AncestorSet {
	/// Iterate over every ancestor, superclasses before interfaces.
	pub fn iter(&self) -> impl Iterator<Item = &SymbolId> {
		self.superclasses.iter().chain(self.interfaces.iter())
	}

	/// Whether the declaration has no ancestors beyond the universal root.
	pub fn is_empty(&self) -> bool {
		self.superclasses.is_empty() && self.interfaces.is_empty()
	}
}

/// One member (method, field, etc.) of a discovered declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDescriptor {
	/// Member name, unique within its declaring type.
	pub name: String,
	/// Cross-reference tags (`Type#member` form) attached to the member's
	/// comment. These drive example-snippet association.
	#[serde(default)]
	pub refs: Vec<String>,
	/// Raw source text of the member body, when the analyzer captured it.
	#[serde(default)]
	pub source: Option<String>,
	/// Structured comment content, when present.
	#[serde(default)]
	pub comment: Option<String>,
	/// Source span of the member declaration.
	#[serde(default)]
	pub region: Option<Region>,
}

/// A nested section of a manual document, at most two levels deep below the
/// document itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionDescriptor {
	/// Anchor identifier, unique within the owning document page.
	pub id: String,
	/// Display title.
	pub title: String,
	/// Child sections.
	#[serde(default)]
	pub children: Vec<SectionDescriptor>,
}

fn default_public() -> bool {
	true
}

/// A discovered program declaration (class, interface, etc.) and its members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
	/// Simple identifier of the declaration, unique within the scan.
	pub id: String,
	/// Name of the package the declaration belongs to.
	pub package: String,
	/// Identity of the underlying symbol.
	pub symbol: SymbolId,
	/// Resolved ancestor sets.
	#[serde(default)]
	pub ancestors: AncestorSet,
	/// Members declared by this type.
	#[serde(default)]
	pub members: Vec<MemberDescriptor>,
	/// Structured comment content, when present.
	#[serde(default)]
	pub comment: Option<String>,
	/// Display title; falls back to the identifier when absent.
	#[serde(default)]
	pub title: Option<String>,
	/// Whether the declaration is publicly visible.
	#[serde(default = "default_public")]
	pub public: bool,
	/// Nested sections, populated for manual documents.
	#[serde(default)]
	pub sections: Vec<SectionDescriptor>,
	/// Source span of the declaration.
	#[serde(default)]
	pub region: Option<Region>,
}

impl TypeDescriptor {
	/// Display title of the declaration.
	pub fn title(&self) -> &str {
		self.title.as_deref().unwrap_or(&self.id)
	}

	/// Split a cross-reference tag into its `(class, member)` parts.
	///
	/// A reference without a class part (`#member`) resolves against this
	/// descriptor; a reference without a `#` names a type alone.
	pub fn identify(&self, reference: &str) -> (String, String) {
		match reference.split_once('#') {
			Some((class, member)) => {
				let class = if class.is_empty() {
					self.id.clone()
				} else {
					class.to_string()
				};
				(class, member.to_string())
			}
			None => (reference.to_string(), String::new()),
		}
	}
}
