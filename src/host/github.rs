//! GitHub hosting adapter.

use std::cmp::Reverse;

use semver::Version;
use serde_json::Value;

use super::rest::ResponseCache;
use super::{Contributor, Hosting, Release, encode_query};
use crate::error::{LetterpressError, Result};
use crate::model::Region;

const API_ROOT: &str = "https://api.github.com/repos";
const RAW_ROOT: &str = "https://raw.githubusercontent.com";

/// Hosting adapter backed by the GitHub REST API.
#[derive(Debug)]
pub struct Github {
	owner: String,
	name: String,
	branch: String,
	rest: ResponseCache,
}

impl Github {
	/// Resolve a `owner/name` repository path against the GitHub API.
	///
	/// The default branch is looked up through the response cache; when the
	/// lookup fails the adapter falls back to `main` rather than failing the
	/// build, since every hosting fetch is optional.
	pub(crate) fn connect(path: &str, rest: ResponseCache) -> Result<Self> {
		let trimmed = path.trim_matches('/');
		let (owner, name) = trimmed.split_once('/').ok_or_else(|| {
			LetterpressError::InvalidHost(format!(
				"GitHub repository path must be owner/name, got {path}"
			))
		})?;
		let name = name.trim_end_matches('/').trim_end_matches(".git");

		let mut github = Self {
			owner: owner.to_string(),
			name: name.to_string(),
			branch: "main".to_string(),
			rest,
		};
		if let Ok(metadata) = github.metadata()
			&& let Some(branch) = metadata["default_branch"].as_str()
		{
			github.branch = branch.to_string();
		}
		Ok(github)
	}

	#[cfg(test)]
	pub(crate) fn with_branch(owner: &str, name: &str, branch: &str, rest: ResponseCache) -> Self {
		Self {
			owner: owner.to_string(),
			name: name.to_string(),
			branch: branch.to_string(),
			rest,
		}
	}

	fn metadata(&self) -> Result<Value> {
		self.rest
			.fetch(&format!("{API_ROOT}/{}/{}", self.owner, self.name))
	}

	fn text_field(&self, key: &str) -> String {
		self.metadata()
			.ok()
			.and_then(|value| value[key].as_str().map(str::to_string))
			.unwrap_or_default()
	}

	fn count_field(&self, key: &str) -> u64 {
		self.metadata()
			.ok()
			.and_then(|value| value[key].as_u64())
			.unwrap_or(0)
	}
}

impl Hosting for Github {
	fn service(&self) -> &str {
		"GitHub"
	}

	fn owner(&self) -> &str {
		&self.owner
	}

	fn name(&self) -> &str {
		&self.name
	}

	fn description(&self) -> String {
		self.text_field("description")
	}

	fn license(&self) -> String {
		self.metadata()
			.ok()
			.and_then(|value| value["license"]["spdx_id"].as_str().map(str::to_string))
			.unwrap_or_default()
	}

	fn language(&self) -> String {
		self.text_field("language")
	}

	fn icon(&self) -> String {
		self.metadata()
			.ok()
			.and_then(|value| value["owner"]["avatar_url"].as_str().map(str::to_string))
			.unwrap_or_default()
	}

	fn count_fork(&self) -> u64 {
		self.count_field("forks_count")
	}

	fn count_star(&self) -> u64 {
		self.count_field("stargazers_count")
	}

	fn count_watch(&self) -> u64 {
		self.count_field("watchers_count")
	}

	fn count_issue(&self) -> u64 {
		self.count_field("open_issues_count")
	}

	fn contributors(&self) -> Vec<Contributor> {
		let url = format!("{API_ROOT}/{}/{}/contributors", self.owner, self.name);
		let Ok(value) = self.rest.fetch(&url) else {
			return Vec::new();
		};
		value
			.as_array()
			.map(|entries| {
				entries
					.iter()
					.map(|entry| Contributor {
						name: entry["login"].as_str().unwrap_or_default().to_string(),
						avatar_url: entry["avatar_url"].as_str().unwrap_or_default().to_string(),
						profile_url: entry["html_url"].as_str().unwrap_or_default().to_string(),
					})
					.collect()
			})
			.unwrap_or_default()
	}

	fn releases(&self) -> Vec<Release> {
		let url = format!("{API_ROOT}/{}/{}/releases", self.owner, self.name);
		let Ok(value) = self.rest.fetch(&url) else {
			return Vec::new();
		};
		let mut releases: Vec<Release> = value
			.as_array()
			.map(|entries| {
				entries
					.iter()
					.map(|entry| {
						let published = entry["published_at"].as_str().unwrap_or_default();
						Release {
							tag: entry["tag_name"].as_str().unwrap_or_default().to_string(),
							date: published.split('T').next().unwrap_or_default().to_string(),
							notes: entry["body"].as_str().unwrap_or_default().to_string(),
							asset_url: entry["html_url"].as_str().unwrap_or_default().to_string(),
						}
					})
					.collect()
			})
			.unwrap_or_default();

		// Tags that parse as versions order newest first; the rest fall to
		// the end, keeping the API's order among themselves.
		releases.sort_by_key(|release| {
			Reverse(Version::parse(release.tag.trim_start_matches('v')).ok())
		});
		releases
	}

	fn latest_published_date(&self) -> Option<String> {
		self.releases().first().map(|release| release.date.clone())
	}

	fn location(&self) -> String {
		format!("https://github.com/{}/{}", self.owner, self.name)
	}

	fn locate_community(&self) -> String {
		format!("{}/discussions", self.location())
	}

	fn locate_changelog(&self) -> String {
		format!(
			"{RAW_ROOT}/{}/{}/{}/CHANGELOG.md",
			self.owner, self.name, self.branch
		)
	}

	fn locate_readme(&self) -> String {
		format!(
			"{RAW_ROOT}/{}/{}/{}/README.md",
			self.owner, self.name, self.branch
		)
	}

	fn locate_issues(&self) -> String {
		format!("{}/issues", self.location())
	}

	fn locate_new_issue(&self, title: &str, label: &str, body: &str) -> String {
		format!(
			"{}/issues/new?title={}&labels={}&body={}",
			self.location(),
			encode_query(title),
			encode_query(label),
			encode_query(body)
		)
	}

	fn locate_reader(&self, region: &Region) -> String {
		format!(
			"{}/blob/{}/{}#L{}",
			self.location(),
			self.branch,
			region.location,
			region.start_line
		)
	}

	fn locate_editor(&self, region: &Region) -> String {
		format!(
			"{}/edit/{}/{}#L{}-L{}",
			self.location(),
			self.branch,
			region.location,
			region.start_line,
			region.end_line
		)
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	fn github() -> (tempfile::TempDir, Github) {
		let dir = tempfile::tempdir().unwrap();
		let rest = ResponseCache::with_dir(dir.path().to_path_buf());
		let github = Github::with_branch("violet", "letters", "trunk", rest);
		(dir, github)
	}

	#[test]
	fn locators_follow_repository_layout() {
		let (_dir, github) = github();
		assert_eq!(github.id(), "violet/letters");
		assert_eq!(github.location(), "https://github.com/violet/letters");
		assert_eq!(
			github.locate_changelog(),
			"https://raw.githubusercontent.com/violet/letters/trunk/CHANGELOG.md"
		);
		assert_eq!(
			github.locate_issues(),
			"https://github.com/violet/letters/issues"
		);
	}

	#[test]
	fn region_locators_include_line_anchors() {
		let (_dir, github) = github();
		let region = Region {
			location: "src/widget.rs".to_string(),
			start_line: 10,
			end_line: 24,
		};
		assert_eq!(
			github.locate_reader(&region),
			"https://github.com/violet/letters/blob/trunk/src/widget.rs#L10"
		);
		assert_eq!(
			github.locate_editor(&region),
			"https://github.com/violet/letters/edit/trunk/src/widget.rs#L10-L24"
		);
	}

	#[test]
	fn new_issue_url_encodes_parameters() {
		let (_dir, github) = github();
		let url = github.locate_new_issue("Broken page", "bug", "It fails on load");
		assert_eq!(
			url,
			"https://github.com/violet/letters/issues/new?title=Broken%20page&labels=bug&body=It%20fails%20on%20load"
		);
	}

	#[test]
	fn metadata_fields_come_from_cached_response() {
		let (_dir, github) = github();
		github.rest.insert(
			"https://api.github.com/repos/violet/letters",
			r#"{
				"description": "Letters for everyone",
				"language": "Rust",
				"forks_count": 3,
				"stargazers_count": 42,
				"watchers_count": 7,
				"open_issues_count": 1,
				"license": {"spdx_id": "MIT"},
				"owner": {"avatar_url": "https://avatars.test/violet"}
			}"#,
			std::time::SystemTime::now()
				.duration_since(std::time::UNIX_EPOCH)
				.unwrap()
				.as_secs(),
		);

		assert_eq!(github.description(), "Letters for everyone");
		assert_eq!(github.language(), "Rust");
		assert_eq!(github.license(), "MIT");
		assert_eq!(github.count_star(), 42);
		assert_eq!(github.count_fork(), 3);
		assert_eq!(github.icon(), "https://avatars.test/violet");
	}

	#[test]
	fn releases_parse_and_order_by_version() {
		let (_dir, github) = github();
		github.rest.insert(
			"https://api.github.com/repos/violet/letters/releases",
			r#"[
				{"tag_name": "v1.0.0", "published_at": "2024-01-05T10:00:00Z", "body": "first", "html_url": "https://github.com/violet/letters/releases/v1.0.0"},
				{"tag_name": "v1.2.0", "published_at": "2024-06-05T10:00:00Z", "body": "second", "html_url": "https://github.com/violet/letters/releases/v1.2.0"}
			]"#,
			std::time::SystemTime::now()
				.duration_since(std::time::UNIX_EPOCH)
				.unwrap()
				.as_secs(),
		);

		let releases = github.releases();
		assert_eq!(releases[0].tag, "v1.2.0");
		assert_eq!(releases[0].date, "2024-06-05");
		assert_eq!(github.latest_published_date().as_deref(), Some("2024-06-05"));
	}

	#[test]
	fn unparseable_tags_sort_after_versions_in_api_order() {
		let (_dir, github) = github();
		github.rest.insert(
			"https://api.github.com/repos/violet/letters/releases",
			r#"[
				{"tag_name": "nightly", "published_at": "2024-07-01T10:00:00Z", "body": "", "html_url": ""},
				{"tag_name": "v1.0.0", "published_at": "2024-01-05T10:00:00Z", "body": "", "html_url": ""},
				{"tag_name": "build-42", "published_at": "2024-02-01T10:00:00Z", "body": "", "html_url": ""},
				{"tag_name": "v1.2.0", "published_at": "2024-06-05T10:00:00Z", "body": "", "html_url": ""}
			]"#,
			std::time::SystemTime::now()
				.duration_since(std::time::UNIX_EPOCH)
				.unwrap()
				.as_secs(),
		);

		let releases = github.releases();
		let tags: Vec<&str> = releases.iter().map(|release| release.tag.as_str()).collect();
		assert_eq!(tags, vec!["v1.2.0", "v1.0.0", "nightly", "build-42"]);
	}
}
