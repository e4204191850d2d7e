//! Navigable document outline built from the flat manual-document list.

use serde::Serialize;

use super::descriptor::TypeDescriptor;

/// One node of the documentation outline: a page or a page section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocNode {
	/// Display title used in navigation.
	pub title: String,
	/// Reference path, e.g. `doc/Guide.html#Install`.
	pub path: String,
	/// Ordered child nodes; empty for leaves.
	pub children: Vec<DocNode>,
}

impl DocNode {
	/// Create a leaf node.
	pub fn new(title: impl Into<String>, path: impl Into<String>) -> Self {
		Self {
			title: title.into(),
			path: path.into(),
			children: Vec::new(),
		}
	}
}

/// Convert the flat manual-document list into an ordered navigable tree.
///
/// Each document becomes a top-level node at `doc/<id>.html`; its sections
/// become second-level nodes anchored on the same page, and their children
/// third-level leaves. Deeper nesting is deliberately not represented: the
/// outline caps at three levels. Node order mirrors discovery order; no
/// sorting is applied here.
pub fn build_document_tree(documents: &[TypeDescriptor]) -> Vec<DocNode> {
	let mut outline = Vec::with_capacity(documents.len());

	for info in documents {
		let page = format!("doc/{}.html", info.id);
		let mut chapter = DocNode::new(info.title(), page.clone());

		for child in &info.sections {
			let mut section = DocNode::new(child.title.clone(), format!("{page}#{}", child.id));
			for grandchild in &child.children {
				section
					.children
					.push(DocNode::new(
						grandchild.title.clone(),
						format!("{page}#{}", grandchild.id),
					));
			}
			chapter.children.push(section);
		}

		outline.push(chapter);
	}

	outline
}
