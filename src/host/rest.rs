//! Time-boxed local cache for remote JSON responses.
//!
//! Hosting metadata is fetched repeatedly while pages render, so responses
//! are cached one entry per URL and refreshed only once the entry is older
//! than a fixed TTL. The cache persists across runs under the user cache
//! directory.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};
use std::{env, fs};

use serde::{Deserialize, Serialize};

use super::http_get_string;
use crate::error::{LetterpressError, Result};

/// Cache entry lifetime.
const TTL_SECS: u64 = 60 * 60;

const STORE_FILE: &str = "rest.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
	/// Seconds since the epoch at fetch time.
	fetched: u64,
	/// Raw response body.
	body: String,
}

/// Disk-backed response cache with a one hour expiry per URL.
///
/// Safe for concurrent fetch and store: the entry map is mutex-guarded and
/// repeated calls for the same key within the TTL window reuse the stored
/// body without touching the network.
#[derive(Debug)]
pub struct ResponseCache {
	dir: PathBuf,
	entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ResponseCache {
	/// Open the cache in its default location, restoring persisted entries.
	///
	/// The directory is taken from `LETTERPRESS_CACHE_DIR` when set,
	/// otherwise the platform cache directory.
	pub fn open() -> Self {
		let dir = env::var("LETTERPRESS_CACHE_DIR")
			.map(PathBuf::from)
			.ok()
			.or_else(|| dirs::cache_dir().map(|base| base.join("letterpress")))
			.unwrap_or_else(env::temp_dir);
		Self::with_dir(dir)
	}

	/// Open the cache in an explicit directory, restoring persisted entries.
	pub fn with_dir(dir: PathBuf) -> Self {
		let entries = fs::read(dir.join(STORE_FILE))
			.ok()
			.and_then(|data| serde_json::from_slice(&data).ok())
			.unwrap_or_default();
		Self {
			dir,
			entries: Mutex::new(entries),
		}
	}

	/// Fetch JSON from `url`, reusing the cached body while it is fresh.
	///
	/// The entry lock is never held across the network call, so one slow
	/// fetch cannot stall concurrent cache users on other URLs.
	pub fn fetch(&self, url: &str) -> Result<serde_json::Value> {
		if let Some(body) = self.cached(url) {
			return Ok(serde_json::from_str(&body)?);
		}

		let fetched_body = http_get_string(url)?;

		let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
		// Another thread may have refreshed this URL while we were on the
		// network; keep whichever entry is already fresh.
		let now = now_secs();
		let fresh = entries
			.get(url)
			.is_some_and(|entry| now.saturating_sub(entry.fetched) < TTL_SECS);
		if !fresh {
			entries.insert(
				url.to_string(),
				CacheEntry {
					fetched: now,
					body: fetched_body,
				},
			);
			self.persist(&entries);
		}

		let entry = entries.get(url).ok_or_else(|| {
			LetterpressError::Fetch(format!("Missing cache entry for {url} after fetch"))
		})?;
		Ok(serde_json::from_str(&entry.body)?)
	}

	/// The fresh cached body for `url`, if any.
	pub(crate) fn cached(&self, url: &str) -> Option<String> {
		let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
		entries
			.get(url)
			.filter(|entry| now_secs().saturating_sub(entry.fetched) < TTL_SECS)
			.map(|entry| entry.body.clone())
	}

	#[cfg(test)]
	pub(crate) fn insert(&self, url: &str, body: &str, fetched: u64) {
		let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
		entries.insert(
			url.to_string(),
			CacheEntry {
				fetched,
				body: body.to_string(),
			},
		);
		self.persist(&entries);
	}

	/// Best-effort persistence; a failed store only costs a refetch later.
	fn persist(&self, entries: &HashMap<String, CacheEntry>) {
		let Ok(data) = serde_json::to_vec(entries) else {
			return;
		};
		if fs::create_dir_all(&self.dir).is_err() {
			return;
		}
		let path = self.dir.join(STORE_FILE);
		let temp = path.with_extension("tmp");
		if fs::write(&temp, &data).is_ok() {
			let _ = fs::rename(&temp, &path);
		}
	}
}

fn now_secs() -> u64 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map(|elapsed| elapsed.as_secs())
		.unwrap_or(0)
}
