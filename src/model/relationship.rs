//! Super/subtype wiring over the completed registry.

use std::collections::HashMap;

use super::descriptor::{SymbolId, TypeDescriptor};

/// Subtype back-edges computed from the registered types.
///
/// Keys are ancestor symbols; values list the symbols registered as their
/// subtypes, in registration order.
#[derive(Debug, Default)]
pub struct SubtypeIndex {
	edges: HashMap<SymbolId, Vec<SymbolId>>,
}

impl SubtypeIndex {
	/// Subtypes recorded for the given symbol, empty when none are known.
	pub fn subtypes_of(&self, symbol: &SymbolId) -> &[SymbolId] {
		self.edges.get(symbol).map(Vec::as_slice).unwrap_or(&[])
	}

	/// Number of ancestors that gained at least one subtype edge.
	pub fn len(&self) -> usize {
		self.edges.len()
	}

	/// Whether no subtype edges were recorded.
	pub fn is_empty(&self) -> bool {
		self.edges.is_empty()
	}
}

/// Compute subtype relationships for a registry snapshot.
///
/// Builds an identity lookup in one pass, then records each type as a
/// subtype of every ancestor present in the snapshot. Ancestors outside the
/// scanned set (library types) are skipped silently; that is a routine gap,
/// not an error. The index is rebuilt from scratch on every call, so
/// repeated runs over the same snapshot yield identical edge sets.
///
/// Must only run after all types for the current build are registered.
pub fn build_type_relationships(types: &[TypeDescriptor]) -> SubtypeIndex {
	let known: HashMap<&SymbolId, &TypeDescriptor> =
		types.iter().map(|info| (&info.symbol, info)).collect();

	let mut edges: HashMap<SymbolId, Vec<SymbolId>> = HashMap::new();
	for info in types {
		for ancestor in info.ancestors.iter() {
			if known.contains_key(ancestor) {
				edges
					.entry(ancestor.clone())
					.or_default()
					.push(info.symbol.clone());
			}
		}
	}

	SubtypeIndex { edges }
}
