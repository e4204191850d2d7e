//! Page identities and HTML rendering.

use crate::error::Result;
use crate::model::{DocNode, Letter, TypeDescriptor};

/// One addressable page of the generated site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
	/// The entry page. Written last so a partially materialized site never
	/// advertises itself as complete.
	Landing,
	/// All API elements on a single page.
	OnePager,
	/// Repository activity: releases and the sectioned changelog.
	Activity,
	/// Reference page for one API type.
	Api {
		/// Identifier of the described type.
		id: String,
	},
	/// One manual document.
	Document {
		/// Identifier of the manual document.
		id: String,
	},
}

impl Page {
	/// Output path of this page, relative to the site root.
	pub fn path(&self) -> String {
		match self {
			Self::Landing => "index.html".to_string(),
			Self::OnePager => "doc/onepager.html".to_string(),
			Self::Activity => "doc/changelog.html".to_string(),
			Self::Api { id } => format!("api/{id}.html"),
			Self::Document { id } => format!("doc/{id}.html"),
		}
	}
}

/// Renders a page of the frozen aggregate to its final markup.
pub trait PageRenderer {
	/// Render `page` against the completed model.
	fn render(&self, letter: &Letter, page: &Page) -> Result<String>;
}

/// The built-in renderer: dependency-free HTML with the shipped assets.
#[derive(Debug, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
	/// Create the renderer.
	pub fn new() -> Self {
		Self
	}

	fn shell(&self, letter: &Letter, heading: &str, depth: usize, body: &str) -> String {
		let prefix = "../".repeat(depth);
		let mut nav = String::new();
		if let Some(root) = letter.doc() {
			nav.push_str("<nav><ul>\n");
			render_outline(root, &prefix, &mut nav);
			nav.push_str("</ul></nav>\n");
		}

		format!(
			concat!(
				"<!DOCTYPE html>\n<html>\n<head>\n",
				"<meta charset=\"{charset}\">\n",
				"<title>{heading} - {title}</title>\n",
				"<link rel=\"icon\" href=\"{prefix}main.svg\">\n",
				"<link rel=\"stylesheet\" href=\"{prefix}main.css\">\n",
				"<script src=\"{prefix}main.js\" defer></script>\n",
				"<script src=\"{prefix}highlight.js\" defer></script>\n",
				"<script src=\"{prefix}mimic.js\" defer></script>\n",
				"</head>\n<body>\n",
				"<header><h1>{title}</h1><p>{description}</p></header>\n",
				"{nav}",
				"<main>\n{body}\n</main>\n",
				"</body>\n</html>\n",
			),
			charset = escape_html(letter.charset()),
			title = escape_html(letter.title()),
			description = escape_html(letter.description()),
			heading = escape_html(heading),
			prefix = prefix,
			nav = nav,
			body = body,
		)
	}

	fn render_type(&self, letter: &Letter, descriptor: &TypeDescriptor) -> String {
		let mut body = String::new();
		body.push_str(&format!("<h2>{}</h2>\n", escape_html(descriptor.title())));
		if let Some(comment) = &descriptor.comment {
			body.push_str(&format!("<p>{}</p>\n", escape_html(comment)));
		}

		let subtypes = letter.subtypes_of(&descriptor.symbol);
		if !subtypes.is_empty() {
			body.push_str("<h3>Known subtypes</h3>\n<ul>\n");
			for subtype in subtypes {
				body.push_str(&format!("<li><code>{}</code></li>\n", escape_html(subtype.as_str())));
			}
			body.push_str("</ul>\n");
		}

		for member in &descriptor.members {
			body.push_str(&format!(
				"<h3 id=\"{id}\"><code class=\"signature\">{name}</code></h3>\n",
				id = escape_html(&member.name),
				name = escape_html(&member.name),
			));
			if let Some(comment) = &member.comment {
				body.push_str(&format!("<p>{}</p>\n", escape_html(comment)));
			}
			let key = format!("{}#{}", descriptor.id, member.name);
			for doodle in letter.doodle(&key) {
				if let Some(comment) = &doodle.comment {
					body.push_str(&format!("<p>{}</p>\n", escape_html(comment)));
				}
				body.push_str(&format!(
					"<pre><code>{}</code></pre>\n",
					escape_html(&doodle.code)
				));
			}
		}
		body
	}

	fn render_document(&self, descriptor: &TypeDescriptor) -> String {
		let mut body = String::new();
		body.push_str(&format!("<h2>{}</h2>\n", escape_html(descriptor.title())));
		if let Some(comment) = &descriptor.comment {
			body.push_str(&format!("<p>{}</p>\n", escape_html(comment)));
		}
		for section in &descriptor.sections {
			body.push_str(&format!(
				"<h3 id=\"{id}\">{title}</h3>\n",
				id = escape_html(&section.id),
				title = escape_html(&section.title),
			));
			for child in &section.children {
				body.push_str(&format!(
					"<h4 id=\"{id}\">{title}</h4>\n",
					id = escape_html(&child.id),
					title = escape_html(&child.title),
				));
			}
		}
		body
	}

	fn render_landing(&self, letter: &Letter) -> String {
		let mut body = String::new();
		body.push_str(&format!("<h2>{}</h2>\n", escape_html(letter.title())));
		body.push_str(&format!("<p>{}</p>\n", escape_html(letter.description())));

		body.push_str("<ul>\n");
		if let Some(doc) = letter.doc() {
			body.push_str(&format!(
				"<li><a href=\"{path}\">{title}</a></li>\n",
				path = escape_html(&doc.path),
				title = escape_html(&doc.title),
			));
		}
		if let Some(api) = letter.api() {
			body.push_str(&format!(
				"<li><a href=\"api/{id}.html\">API reference</a></li>\n",
				id = escape_html(&api.id),
			));
		}
		body.push_str("<li><a href=\"doc/onepager.html\">Everything on one page</a></li>\n");
		if letter.authority().is_some() {
			body.push_str("<li><a href=\"doc/changelog.html\">Changelog</a></li>\n");
		}
		body.push_str("</ul>\n");

		if let Some(authority) = letter.authority() {
			body.push_str(&format!(
				"<p>Hosted on {service}: <a href=\"{url}\">{id}</a> \
				 ({stars} stars, {forks} forks, {contributors} contributors)</p>\n",
				service = escape_html(authority.service()),
				url = escape_html(&authority.location()),
				id = escape_html(&authority.id()),
				stars = authority.count_star(),
				forks = authority.count_fork(),
				contributors = authority.contributors().len(),
			));
		}
		body
	}

	fn render_one_pager(&self, letter: &Letter) -> String {
		let mut body = String::new();
		for package in letter.packages() {
			body.push_str(&format!("<h2><code>{}</code></h2>\n", escape_html(package)));
			for descriptor in letter.types().iter().filter(|t| &t.package == package) {
				body.push_str(&format!(
					"<h3><a href=\"api/{id}.html\">{title}</a></h3>\n",
					id = escape_html(&descriptor.id),
					title = escape_html(descriptor.title()),
				));
				if let Some(comment) = &descriptor.comment {
					body.push_str(&format!("<p>{}</p>\n", escape_html(comment)));
				}
			}
		}
		body
	}

	fn render_activity(&self, letter: &Letter) -> String {
		let mut body = String::from("<div class=\"activity\">\n");
		if let Some(authority) = letter.authority() {
			for release in authority.releases() {
				body.push_str(&format!(
					"<h2>{tag} <small>{date}</small></h2>\n",
					tag = escape_html(&release.tag),
					date = escape_html(&release.date),
				));
				body.push_str(&format!("<p>{}</p>\n", escape_html(&release.notes)));
			}
		}
		body.push_str("</div>\n");
		body
	}
}

impl PageRenderer for HtmlRenderer {
	fn render(&self, letter: &Letter, page: &Page) -> Result<String> {
		let depth = match page {
			Page::Landing => 0,
			_ => 1,
		};
		let (heading, body) = match page {
			Page::Landing => (letter.title().to_string(), self.render_landing(letter)),
			Page::OnePager => ("Everything".to_string(), self.render_one_pager(letter)),
			Page::Activity => ("Activity".to_string(), self.render_activity(letter)),
			Page::Api { id } => {
				let descriptor = letter.types().iter().find(|t| &t.id == id);
				match descriptor {
					Some(descriptor) => (
						descriptor.title().to_string(),
						self.render_type(letter, descriptor),
					),
					None => (id.clone(), String::new()),
				}
			}
			Page::Document { id } => {
				let descriptor = letter.documents().iter().find(|t| &t.id == id);
				match descriptor {
					Some(descriptor) => {
						(descriptor.title().to_string(), self.render_document(descriptor))
					}
					None => (id.clone(), String::new()),
				}
			}
		};
		Ok(self.shell(letter, &heading, depth, &body))
	}
}

fn render_outline(node: &DocNode, prefix: &str, out: &mut String) {
	out.push_str(&format!(
		"<li><a href=\"{prefix}{path}\">{title}</a>",
		path = escape_html(&node.path),
		title = escape_html(&node.title),
	));
	if !node.children.is_empty() {
		out.push_str("<ul>\n");
		for child in &node.children {
			render_outline(child, prefix, out);
		}
		out.push_str("</ul>");
	}
	out.push_str("</li>\n");
}

/// Escape text for interpolation into HTML element content and attributes.
pub fn escape_html(text: &str) -> String {
	let mut escaped = String::with_capacity(text.len());
	for ch in text.chars() {
		match ch {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			'\'' => escaped.push_str("&#39;"),
			_ => escaped.push(ch),
		}
	}
	escaped
}
