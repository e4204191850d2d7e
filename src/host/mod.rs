//! Repository hosting adapters.
//!
//! A hosting authority supplies repository metadata (stars, contributors,
//! releases, changelog text) and builds service-specific URLs. All remote
//! traffic goes through the time-boxed [`ResponseCache`]; every fetch here
//! is optional to the overall build and degrades gracefully.

/// GitHub implementation of the hosting contract.
pub mod github;
/// Time-boxed local response cache.
pub mod rest;

use std::io::Read;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;

pub use self::github::Github;
pub use self::rest::ResponseCache;
use crate::error::{LetterpressError, Result};
use crate::model::Region;

/// Upper bound on any single HTTP request, connect to last byte.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// A repository contributor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contributor {
	/// Login or display name.
	pub name: String,
	/// Avatar image URL.
	pub avatar_url: String,
	/// Profile page URL.
	pub profile_url: String,
}

/// A published release of the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
	/// Release tag, e.g. `v1.4.0`.
	pub tag: String,
	/// Publication date, ISO formatted.
	pub date: String,
	/// Raw release notes.
	pub notes: String,
	/// URL of the release assets page.
	pub asset_url: String,
}

/// One section of a parsed changelog, nested by heading level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogSection {
	/// Section heading text.
	pub title: String,
	/// Body lines between this heading and the next.
	pub body: Vec<String>,
	/// Nested subsections.
	pub children: Vec<ChangelogSection>,
}

/// A repository hosting service resolved from a configured URI.
pub trait Hosting: Send + Sync {
	/// Name of the hosting service, e.g. `GitHub`.
	fn service(&self) -> &str;

	/// Repository owner.
	fn owner(&self) -> &str;

	/// Repository name.
	fn name(&self) -> &str;

	/// `owner/name` identifier.
	fn id(&self) -> String {
		format!("{}/{}", self.owner(), self.name())
	}

	/// Repository description.
	fn description(&self) -> String;

	/// SPDX license identifier.
	fn license(&self) -> String;

	/// Primary implementation language.
	fn language(&self) -> String;

	/// Owner avatar URL.
	fn icon(&self) -> String;

	/// Number of forks.
	fn count_fork(&self) -> u64;

	/// Number of stars.
	fn count_star(&self) -> u64;

	/// Number of watchers.
	fn count_watch(&self) -> u64;

	/// Number of open issues.
	fn count_issue(&self) -> u64;

	/// Repository contributors.
	fn contributors(&self) -> Vec<Contributor>;

	/// Published releases, newest first.
	fn releases(&self) -> Vec<Release>;

	/// Publication date of the latest release, when known.
	fn latest_published_date(&self) -> Option<String>;

	/// URL of the repository's main page.
	fn location(&self) -> String;

	/// URL of the community discussion page.
	fn locate_community(&self) -> String;

	/// URL of the raw changelog text.
	fn locate_changelog(&self) -> String;

	/// URL of the raw readme text.
	fn locate_readme(&self) -> String;

	/// URL of the issue tracker.
	fn locate_issues(&self) -> String;

	/// URL that opens a prefilled new issue.
	fn locate_new_issue(&self, title: &str, label: &str, body: &str) -> String;

	/// URL for reading a specific source region.
	fn locate_reader(&self, region: &Region) -> String;

	/// URL for editing a specific source region.
	fn locate_editor(&self, region: &Region) -> String;

	/// Parse raw changelog text into nested sections.
	fn changelog(&self, text: &str) -> Vec<ChangelogSection> {
		section_changelog(text)
	}
}

/// Resolve a repository URI to its hosting service.
///
/// Returns `Ok(None)` for URIs pointing at services this crate has no
/// adapter for.
pub fn resolve(uri: &str, cache: ResponseCache) -> Result<Option<Arc<dyn Hosting>>> {
	let trimmed = uri
		.strip_prefix("https://")
		.or_else(|| uri.strip_prefix("http://"))
		.unwrap_or(uri);
	let (authority, path) = trimmed.split_once('/').ok_or_else(|| {
		LetterpressError::InvalidHost(format!("Repository URI has no path: {uri}"))
	})?;

	match authority {
		"github.com" => Ok(Some(Arc::new(Github::connect(path, cache)?))),
		_ => Ok(None),
	}
}

/// Fetch a URL, retrying with a fixed backoff up to `attempts` times.
pub fn fetch_with_retry(url: &str, attempts: u32, backoff: Duration) -> Result<String> {
	let mut last = None;
	for attempt in 0..attempts.max(1) {
		if attempt > 0 {
			thread::sleep(backoff);
		}
		match http_get_string(url) {
			Ok(body) => return Ok(body),
			Err(err) => last = Some(err),
		}
	}
	Err(last.unwrap_or_else(|| LetterpressError::Fetch(format!("No attempts made for {url}"))))
}

pub(crate) fn http_get_string(url: &str) -> Result<String> {
	static AGENT: Lazy<ureq::Agent> = Lazy::new(|| {
		ureq::Agent::config_builder()
			.timeout_global(Some(HTTP_TIMEOUT))
			.build()
			.into()
	});

	let mut response = AGENT
		.get(url)
		.call()
		.map_err(|err| LetterpressError::Fetch(format!("Failed to reach {url}: {err}")))?;

	let mut body = String::new();
	response
		.body_mut()
		.as_reader()
		.read_to_string(&mut body)
		.map_err(|err| {
			LetterpressError::Fetch(format!("Failed to read response from {url}: {err}"))
		})?;
	Ok(body)
}

/// Structure flat changelog markdown into sections nested by heading level.
///
/// Release headings written as `### 1.2.3 (2024-01-01)` are promoted one
/// level so versions sit directly under the changelog title.
pub fn section_changelog(text: &str) -> Vec<ChangelogSection> {
	static HEADING: Lazy<Regex> =
		Lazy::new(|| Regex::new("^(#+)[ \t]+(.+)$").unwrap_or_else(|err| panic!("{err}")));

	let mut roots: Vec<ChangelogSection> = Vec::new();
	let mut stack: Vec<(usize, ChangelogSection)> = Vec::new();

	fn close_down_to(
		level: usize,
		stack: &mut Vec<(usize, ChangelogSection)>,
		roots: &mut Vec<ChangelogSection>,
	) {
		while stack.last().is_some_and(|(depth, _)| *depth >= level) {
			let (_, section) = stack.pop().unwrap_or_else(|| unreachable!());
			match stack.last_mut() {
				Some((_, parent)) => parent.children.push(section),
				None => roots.push(section),
			}
		}
	}

	for line in text.lines() {
		if let Some(capture) = HEADING.captures(line) {
			let mut level = capture[1].len();
			let title = capture[2].trim().to_string();
			if level == 3 && title.contains('(') {
				level = 2;
			}
			close_down_to(level, &mut stack, &mut roots);
			stack.push((
				level,
				ChangelogSection {
					title,
					body: Vec::new(),
					children: Vec::new(),
				},
			));
		} else if let Some((_, section)) = stack.last_mut() {
			if !line.trim().is_empty() {
				section.body.push(line.to_string());
			}
		}
	}
	close_down_to(0, &mut stack, &mut roots);

	roots
}

/// Percent-encode a query parameter value.
pub(crate) fn encode_query(value: &str) -> String {
	let mut encoded = String::with_capacity(value.len());
	for byte in value.bytes() {
		match byte {
			b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
				encoded.push(byte as char);
			}
			_ => {
				encoded.push('%');
				encoded.push_str(&format!("{byte:02X}"));
			}
		}
	}
	encoded
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn changelog_sections_nest_by_heading_level() {
		let text = "# Changelog\n\n## 2.0.0 (2025-03-01)\n\nNotes here.\n\n### Features\n\n- one\n\n## 1.0.0 (2024-01-01)\n\n- initial\n";
		let sections = section_changelog(text);

		assert_eq!(sections.len(), 1);
		let changelog = &sections[0];
		assert_eq!(changelog.title, "Changelog");
		assert_eq!(changelog.children.len(), 2);
		assert_eq!(changelog.children[0].title, "2.0.0 (2025-03-01)");
		assert_eq!(changelog.children[0].children[0].title, "Features");
		assert_eq!(changelog.children[1].title, "1.0.0 (2024-01-01)");
	}

	#[test]
	fn release_headings_promote_to_second_level() {
		let text = "# Changelog\n\n### 1.1.0 (2024-06-01)\n\n- fix\n";
		let sections = section_changelog(text);
		assert_eq!(sections[0].children[0].title, "1.1.0 (2024-06-01)");
	}

	#[test]
	fn body_lines_attach_to_nearest_section() {
		let text = "## Only\nline one\nline two\n";
		let sections = section_changelog(text);
		assert_eq!(sections[0].body, vec!["line one", "line two"]);
	}

	#[test]
	fn unsupported_hosts_resolve_to_none() {
		let dir = tempfile::tempdir().unwrap();
		let cache = ResponseCache::with_dir(dir.path().to_path_buf());
		let resolved = resolve("https://forge.example/owner/repo", cache).unwrap();
		assert!(resolved.is_none());
	}

	#[test]
	fn query_values_are_percent_encoded() {
		assert_eq!(encode_query("bug report"), "bug%20report");
		assert_eq!(encode_query("safe-1.0_~"), "safe-1.0_~");
	}
}
